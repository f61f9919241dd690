//! This build script generates the firmware's build-time settings and copies the `memory.x`
//! file from the crate root into a directory where the linker can always find it at build time.
//!
//! `console_config.rs` is generated from `config/console_config.json`: relay names, volumes,
//! the alarm sound, the alarm stored on first boot and the time the build ran, shifted by the
//! configured UTC offset. The RTC starts from that time.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::print_stdout)]

use std::{
    env, fs,
    fs::File,
    io,
    io::Write,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

/// Settings used when `console_config.json` is missing
const DEFAULT_CONFIG: &str = r#"{
  "pin_names": ["Pin 9", "Pin 10", "Pin 11", "Pin 12"],
  "alarm_volume": 80,
  "start_volume": 80,
  "alarm_track": 1,
  "default_alarm": { "hour": 7, "minute": 0, "enabled": false },
  "utc_offset_minutes": 0
}
"#;

fn main() {
    // the build time goes stale otherwise, refresh it whenever the sources change
    println!("cargo:rerun-if-changed=src");
    if env::var_os("CARGO_FEATURE_EMBEDDED").is_some() {
        memory_x();
    }
    console_config().unwrap();
}

/// Generate `console_config.rs` from `console_config.json`
fn console_config() -> io::Result<()> {
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR environment variable not set");
    let dest_path = Path::new(&out_dir).join("console_config.rs");
    let mut f = File::create(dest_path).expect("Could not create console_config.rs file");

    // Read the console_config.json file, or create it with the stock settings if it doesn't exist
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR environment variable not set");
    let config_path = Path::new(&manifest_dir).join("config/console_config.json");
    println!("cargo:rerun-if-changed=config/console_config.json");
    let config_contents = if config_path.exists() {
        fs::read_to_string(&config_path).expect("Could not read console_config.json file")
    } else {
        println!("console_config.json not found, creating with stock settings");
        fs::create_dir_all(config_path.parent().expect("config path has a parent"))?;
        fs::write(&config_path, DEFAULT_CONFIG).expect("Could not write console_config.json file");
        DEFAULT_CONFIG.to_string()
    };

    let config: serde_json::Value =
        serde_json::from_str(&config_contents).expect("Could not parse console_config.json file");

    let names: Vec<String> = config["pin_names"]
        .as_array()
        .expect("pin_names not found in console_config.json file")
        .iter()
        .map(|name| {
            name.as_str()
                .expect("pin_names must be strings")
                .escape_default()
                .to_string()
        })
        .collect();
    assert_eq!(names.len(), 4, "pin_names needs one name per relay, 9 to 12");
    let number = |key: &str| {
        config[key]
            .as_u64()
            .unwrap_or_else(|| panic!("{key} not found in console_config.json file"))
    };
    let alarm = &config["default_alarm"];
    let alarm_hour = alarm["hour"].as_u64().expect("default_alarm.hour not found");
    let alarm_minute = alarm["minute"].as_u64().expect("default_alarm.minute not found");
    let alarm_enabled = alarm["enabled"].as_bool().expect("default_alarm.enabled not found");
    let offset_minutes = config["utc_offset_minutes"].as_i64().unwrap_or(0);

    writeln!(
        f,
        "pub const PIN_NAMES: [&str; 4] = [\"{}\", \"{}\", \"{}\", \"{}\"];",
        names[0], names[1], names[2], names[3]
    )?;
    writeln!(f, "pub const ALARM_VOLUME: u8 = {};", number("alarm_volume"))?;
    writeln!(f, "pub const START_VOLUME: u8 = {};", number("start_volume"))?;
    writeln!(f, "pub const ALARM_TRACK: u16 = {};", number("alarm_track"))?;
    writeln!(f, "pub const DEFAULT_ALARM_HOUR: u8 = {alarm_hour};")?;
    writeln!(f, "pub const DEFAULT_ALARM_MINUTE: u8 = {alarm_minute};")?;
    writeln!(f, "pub const DEFAULT_ALARM_ENABLED: bool = {alarm_enabled};")?;
    build_time(&mut f, offset_minutes)
}

/// Write the local time of the build as `BUILD_*` constants
fn build_time(f: &mut File, offset_minutes: i64) -> io::Result<()> {
    let unix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before 1970")
        .as_secs();
    let local = i64::try_from(unix).expect("time fits i64") + offset_minutes * 60;
    let days = local.div_euclid(86_400);
    let secs = local.rem_euclid(86_400);
    let (year, month, day) = civil_from_days(days);
    // 1970-01-01 was a Thursday, 0 = Sunday
    let weekday = (days + 4).rem_euclid(7);

    writeln!(f, "pub const BUILD_YEAR: u16 = {year};")?;
    writeln!(f, "pub const BUILD_MONTH: u8 = {month};")?;
    writeln!(f, "pub const BUILD_DAY: u8 = {day};")?;
    writeln!(f, "pub const BUILD_WEEKDAY: u8 = {weekday};")?;
    writeln!(f, "pub const BUILD_HOUR: u8 = {};", secs / 3600)?;
    writeln!(f, "pub const BUILD_MINUTE: u8 = {};", secs % 3600 / 60)?;
    writeln!(f, "pub const BUILD_SECOND: u8 = {};", secs % 60)?;
    Ok(())
}

/// Year, month and day of a count of days since 1970-01-01 (proleptic Gregorian)
fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Handle the `memory.x` linker script
fn memory_x() {
    // Put `memory.x` in our output directory and ensure it's
    // on the linker search path.
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());
    File::create(out.join("memory.x"))
        .unwrap()
        .write_all(include_bytes!("memory.x"))
        .unwrap();
    println!("cargo:rustc-link-search={}", out.display());

    // By default, Cargo will re-run a build script whenever
    // any file in the project changes. By specifying `memory.x`
    // here, we ensure the build script is only re-run when
    // `memory.x` is changed.
    println!("cargo:rerun-if-changed=memory.x");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
