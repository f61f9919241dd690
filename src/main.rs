//! # Console clock firmware
//! Wires the RP2040 peripherals to the console and spawns the tasks.
//!
//! | Function | Pins |
//! |---|---|
//! | Relays 9..12 | GPIO 9..12, active high |
//! | Buttons SW1..SW4 | GPIO 19..22, pulled up, low when pressed |
//! | I2C0 (OLED, LM75) | SDA GPIO 16, SCL GPIO 17 |
//! | DFPlayer | UART1 TX GPIO 4, RX GPIO 5, power GPIO 8, BUSY GPIO 6 |

// we are in an environment with constrained resources, so we do not use the standard library and we define a different entry point.
#![no_std]
#![no_main]

use crate::task::alarm_store::{AlarmFlash, FlashAlarmStore};
use crate::task::buttons::ButtonPanel;
use crate::task::clock::RtcClock;
use crate::task::display::{DisplayLink, display};
use crate::task::probe::BoardProbe;
use crate::task::relays::{self, RelayBank};
use crate::task::resources::{I2cBus, Irqs};
use crate::task::sound::{SoundLink, sound};
use crate::task::tick_loop::{BoardGateways, tick_loop};
use crate::task::watchdog::watchdog_task;
use console_clock::Gateways;
use console_clock::gateway::AlarmStore;
use defmt::{info, unwrap, warn};
use embassy_embedded_hal::shared_bus::asynch::i2c::I2cDevice;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc};
use embassy_rp::flash::Flash;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::rtc::Rtc;
use embassy_rp::uart::{self, Uart};
use embassy_sync::mutex::Mutex;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

mod settings;
mod task;

/// The I2C bus shared by the display and the sensor
static I2C_BUS: StaticCell<I2cBus> = StaticCell::new();
/// Transmit buffer of the DFPlayer UART
static UART_TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
/// Receive buffer of the DFPlayer UART
static UART_RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Program start");
    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // watchdog first, so a hang further down still resets the board
    unwrap!(spawner.spawn(watchdog_task(p.WATCHDOG)));

    // relays, all off until the console switches them
    relays::init([
        Output::new(p.PIN_9, Level::Low),
        Output::new(p.PIN_10, Level::Low),
        Output::new(p.PIN_11, Level::Low),
        Output::new(p.PIN_12, Level::Low),
    ])
    .await;

    let buttons = ButtonPanel::new([
        Input::new(p.PIN_19, Pull::Up),
        Input::new(p.PIN_20, Pull::Up),
        Input::new(p.PIN_21, Pull::Up),
        Input::new(p.PIN_22, Pull::Up),
    ]);

    // I2C bus for the display and the LM75
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = 400_000;
    let i2c = I2c::new_async(p.I2C0, p.PIN_17, p.PIN_16, Irqs, i2c_config);
    let i2c_bus: &'static I2cBus = I2C_BUS.init(Mutex::new(i2c));
    unwrap!(spawner.spawn(display(I2cDevice::new(i2c_bus))));

    // dfplayer
    let mut uart_config = uart::Config::default();
    uart_config.baudrate = 9600;
    let uart = Uart::new_blocking(p.UART1, p.PIN_4, p.PIN_5, uart_config).into_buffered(
        Irqs,
        UART_TX_BUF.init([0; 256]),
        UART_RX_BUF.init([0; 256]),
    );
    let pwr = Output::new(p.PIN_8, Level::Low);
    let busy = Input::new(p.PIN_6, Pull::Up);
    unwrap!(spawner.spawn(sound(uart, pwr, busy)));

    // alarm storage, seeded on first boot
    let flash: AlarmFlash = Flash::new(p.FLASH, p.DMA_CH0);
    let mut store = FlashAlarmStore::new(flash);
    match settings::default_alarm() {
        Ok(default) => {
            if let Err(e) = store.seed(default).await {
                warn!("Failed to seed the alarm: {}", e);
            }
        }
        Err(e) => warn!("Default alarm is invalid: {}", e),
    }
    if let Ok(alarm) = store.load().await {
        info!("Stored alarm: {}", alarm);
    }

    let adc = Adc::new(p.ADC, Irqs, adc::Config::default());
    let die_sensor = adc::Channel::new_temp_sensor(p.ADC_TEMP_SENSOR);
    let probe = BoardProbe::new(I2cDevice::new(i2c_bus), adc, die_sensor);

    let clock = RtcClock::new(Rtc::new(p.RTC));

    let gateways: BoardGateways = Gateways {
        pins: RelayBank,
        display: DisplayLink::default(),
        audio: SoundLink::default(),
        store,
        probe,
    };
    unwrap!(spawner.spawn(tick_loop(gateways, clock, buttons)));
}
