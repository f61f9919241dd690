//! Interrupt bindings and the peripherals shared between tasks.
use embassy_embedded_hal::shared_bus::asynch::i2c::I2cDevice;
use embassy_rp::adc::InterruptHandler as AdcInterruptHandler;
use embassy_rp::i2c::{Async, I2c, InterruptHandler as I2cInterruptHandler};
use embassy_rp::peripherals::{I2C0, UART1};
use embassy_rp::uart::BufferedInterruptHandler;
use embassy_rp::bind_interrupts;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;

bind_interrupts!(pub struct Irqs {
    I2C0_IRQ => I2cInterruptHandler<I2C0>;
    UART1_IRQ => BufferedInterruptHandler<UART1>;
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

/// The I2C0 bus, shared by the display and the LM75 sensor
pub type I2cBus = Mutex<CriticalSectionRawMutex, I2c<'static, I2C0, Async>>;

/// One device on [`I2cBus`]
pub type SharedI2c = I2cDevice<'static, CriticalSectionRawMutex, I2c<'static, I2C0, Async>>;
