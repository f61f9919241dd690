//! # Relay bank
//! The four relay outputs, kept in a mutex so the tick loop and any other writer cannot interleave.
use console_clock::error::GatewayError;
use console_clock::gateway::{PinGateway, PinId};
use embassy_rp::gpio::Output;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, with_timeout};

/// How long a caller waits for the bank before giving up
const LOCK_TIMEOUT: Duration = Duration::from_millis(200);

/// Relay outputs, indexed by [`PinId::index`]
pub type RelayOutputs = [Output<'static>; 4];

/// The outputs, `None` until [`init`] ran
static RELAYS: Mutex<CriticalSectionRawMutex, Option<RelayOutputs>> = Mutex::new(None);

/// Hand the relay outputs to the bank
pub async fn init(outputs: RelayOutputs) {
    *(RELAYS.lock().await) = Some(outputs);
}

/// Handle on the relay bank
#[derive(Clone, Copy)]
pub struct RelayBank;

impl RelayBank {
    /// Run `f` on the output of `pin` with the bank locked
    async fn with<R>(
        self,
        pin: PinId,
        f: impl FnOnce(&mut Output<'static>) -> R,
    ) -> Result<R, GatewayError> {
        let mut guard = with_timeout(LOCK_TIMEOUT, RELAYS.lock())
            .await
            .map_err(|_| GatewayError::Timeout)?;
        let outputs = guard.as_mut().ok_or(GatewayError::Fault)?;
        Ok(f(&mut outputs[pin.index()]))
    }
}

impl PinGateway for RelayBank {
    async fn on(&self, pin: PinId) -> Result<(), GatewayError> {
        self.with(pin, Output::set_high).await
    }

    async fn off(&self, pin: PinId) -> Result<(), GatewayError> {
        self.with(pin, Output::set_low).await
    }

    async fn toggle(&self, pin: PinId) -> Result<bool, GatewayError> {
        self.with(pin, |output| {
            output.toggle();
            output.is_set_high()
        })
        .await
    }

    async fn get(&self, pin: PinId) -> Result<bool, GatewayError> {
        self.with(pin, |output| output.is_set_high()).await
    }
}
