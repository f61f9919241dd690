//! # Relays
//! The core's handle on the relay bank.
//!
//! On and off are idempotent, so a write that fails is queued and tried again on every tick until
//! it succeeds or a newer write to the same relay replaces it. Toggles are not idempotent and are
//! never retried, a failed toggle is only logged.

use crate::error::GatewayError;
use crate::gateway::{PinGateway, PinId};

/// Relay bank plus the queue of writes still owed to it
pub struct Relays<P> {
    /// Relay access
    gateway: P,
    /// Per relay, the state a failed write still has to establish
    pending: [Option<bool>; 4],
}

impl<P: PinGateway> Relays<P> {
    /// Wrap a relay bank
    pub const fn new(gateway: P) -> Self {
        Self {
            gateway,
            pending: [None; 4],
        }
    }

    /// Switch `pin` on, queued for retry on failure
    pub async fn on(&mut self, pin: PinId) {
        self.set(pin, true).await;
    }

    /// Switch `pin` off, queued for retry on failure
    pub async fn off(&mut self, pin: PinId) {
        self.set(pin, false).await;
    }

    /// Write `on` to `pin`, superseding any queued write to it
    async fn set(&mut self, pin: PinId, on: bool) {
        self.pending[pin.index()] = None;
        if let Err(e) = self.write(pin, on).await {
            warn!("relay {} write failed, queued for retry: {}", pin.number(), e);
            self.pending[pin.index()] = Some(on);
        }
    }

    /// One attempt at writing `on` to `pin`
    async fn write(&self, pin: PinId, on: bool) -> Result<(), GatewayError> {
        if on {
            self.gateway.on(pin).await
        } else {
            self.gateway.off(pin).await
        }
    }

    /// Flip `pin`. Drops any queued write to it, returns the new state or `None` on failure.
    pub async fn toggle(&mut self, pin: PinId) -> Option<bool> {
        self.pending[pin.index()] = None;
        match self.gateway.toggle(pin).await {
            Ok(state) => {
                debug!("relay {} toggled to {}", pin.number(), state);
                Some(state)
            }
            Err(e) => {
                warn!("relay {} toggle failed: {}", pin.number(), e);
                None
            }
        }
    }

    /// Try every queued write once more
    pub async fn retry_pending(&mut self) {
        for pin in PinId::ALL {
            if let Some(on) = self.pending[pin.index()] {
                if self.write(pin, on).await.is_ok() {
                    info!("relay {} retry succeeded", pin.number());
                    self.pending[pin.index()] = None;
                }
            }
        }
    }

    /// The state still owed to `pin`, if a write to it failed
    #[must_use]
    pub const fn pending(&self, pin: PinId) -> Option<bool> {
        self.pending[pin.index()]
    }

    /// The wrapped relay bank
    pub const fn gateway(&self) -> &P {
        &self.gateway
    }
}
