//! # Board probe
//! Telemetry for the Info menus: uptime, the LM75 sensor on the I2C bus and the RP2040 die sensor.
//!
//! The RP2040 keeps no load or memory statistics, those readings stay unavailable.
use crate::task::resources::SharedI2c;
use console_clock::gateway::SystemProbe;
use defmt::{Debug2Format, warn};
use embassy_rp::adc::{Adc, Async, Channel};
use embassy_time::{Duration, Instant, with_timeout};
use embedded_hal_async::i2c::I2c;

/// I2C address of the LM75 with all address pins low
const LM75_ADDRESS: u8 = 0x48;
/// LM75 temperature register
const LM75_TEMPERATURE: u8 = 0x00;
/// How long a single reading may take
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// ADC reference voltage
const ADC_REFERENCE: f32 = 3.3;
/// Full scale of the 12 bit ADC
const ADC_FULL_SCALE: f32 = 4096.0;

/// The board's sensors
pub struct BoardProbe {
    /// LM75 on the shared bus
    i2c: SharedI2c,
    /// The ADC
    adc: Adc<'static, Async>,
    /// The die temperature channel
    die_sensor: Channel<'static>,
}

impl BoardProbe {
    /// Collect the sensors
    pub const fn new(i2c: SharedI2c, adc: Adc<'static, Async>, die_sensor: Channel<'static>) -> Self {
        Self {
            i2c,
            adc,
            die_sensor,
        }
    }
}

/// Celsius to Fahrenheit
fn fahrenheit(celsius: f32) -> f32 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Die temperature in Celsius from a raw reading of the sensor channel
fn die_celsius(raw: u16) -> f32 {
    let volts = f32::from(raw) * ADC_REFERENCE / ADC_FULL_SCALE;
    27.0 - (volts - 0.706) / 0.001_721
}

/// LM75 temperature in Celsius from the register bytes, 9 bit two's complement in 0.5° steps
fn lm75_celsius(bytes: [u8; 2]) -> f32 {
    f32::from(i16::from_be_bytes(bytes) >> 7) * 0.5
}

impl SystemProbe for BoardProbe {
    async fn cpu_load(&mut self) -> Option<u8> {
        None
    }

    async fn memory_usage(&mut self) -> Option<u8> {
        None
    }

    async fn uptime_secs(&mut self) -> Option<u64> {
        Some(Instant::now().as_secs())
    }

    async fn sensor_temperature_f(&mut self) -> Option<f32> {
        let mut bytes = [0u8; 2];
        match with_timeout(
            READ_TIMEOUT,
            self.i2c
                .write_read(LM75_ADDRESS, &[LM75_TEMPERATURE], &mut bytes),
        )
        .await
        {
            Ok(Ok(())) => Some(fahrenheit(lm75_celsius(bytes))),
            Ok(Err(e)) => {
                warn!("LM75 read failed: {:?}", Debug2Format(&e));
                None
            }
            Err(_) => {
                warn!("LM75 read timed out");
                None
            }
        }
    }

    async fn cpu_temperature_f(&mut self) -> Option<f32> {
        match with_timeout(READ_TIMEOUT, self.adc.read(&mut self.die_sensor)).await {
            Ok(Ok(raw)) => Some(fahrenheit(die_celsius(raw))),
            Ok(Err(e)) => {
                warn!("Die sensor read failed: {:?}", Debug2Format(&e));
                None
            }
            Err(_) => {
                warn!("Die sensor read timed out");
                None
            }
        }
    }
}
