//! Build script for tally-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates device.toml and turns it into a `DeviceConfig` constant,
//!   using the same file name and timestamp rules as `tally-core`

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tally_core::config::is_short_file_name;
use tally_core::tracking::TimeStamp;

fn main() {
    setup_linker();
    let config = load_config();
    let settings = validate_config(&config);
    generate_config(&settings);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read and parse device.toml
fn load_config() -> toml::Value {
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: device.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a device.toml configuration file.         ║\n\
            ║  Please create one in the tally-firmware directory.              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read device.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in device.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Validated device settings
struct Settings {
    poll_interval_ms: i64,
    debounce_ms: i64,
    ledger_file: String,
    clock_seed: Option<TimeStamp>,
    screen_active_high: bool,
    indicator_inverted: bool,
    ledger_fault_pulses: i64,
    clock_fault_pulses: i64,
    on_ms: i64,
    off_ms: i64,
}

/// Collects problems so every one of them is reported in a single build
struct Checker<'a> {
    config: &'a toml::Value,
    errors: Vec<String>,
}

impl<'a> Checker<'a> {
    fn section(&mut self, name: &str) -> Option<&'a toml::value::Table> {
        match self.config.get(name) {
            Some(toml::Value::Table(t)) => Some(t),
            Some(_) => {
                self.errors.push(format!("[{}] must be a table", name));
                None
            }
            None => {
                self.errors.push(format!("Missing [{}] section", name));
                None
            }
        }
    }

    fn integer(&mut self, section: &str, key: &str, min: i64, max: i64, default: i64) -> i64 {
        let Some(table) = self.config.get(section).and_then(|v| v.as_table()) else {
            return default;
        };
        match table.get(key) {
            Some(toml::Value::Integer(v)) if (min..=max).contains(v) => *v,
            Some(toml::Value::Integer(_)) => {
                self.errors
                    .push(format!("[{}] {} must be {}-{}", section, key, min, max));
                default
            }
            Some(_) => {
                self.errors.push(format!("[{}] {} must be an integer", section, key));
                default
            }
            None => {
                self.errors.push(format!("[{}] missing '{}'", section, key));
                default
            }
        }
    }

    fn boolean(&mut self, section: &str, key: &str, default: bool) -> bool {
        let Some(table) = self.config.get(section).and_then(|v| v.as_table()) else {
            return default;
        };
        match table.get(key) {
            Some(toml::Value::Boolean(v)) => *v,
            Some(_) => {
                self.errors.push(format!("[{}] {} must be true or false", section, key));
                default
            }
            None => default,
        }
    }
}

/// Validate every section of device.toml
fn validate_config(config: &toml::Value) -> Settings {
    let mut check = Checker {
        config,
        errors: Vec::new(),
    };

    check.section("timing");
    let ledger = check.section("ledger");
    let clock = check.section("clock");
    check.section("screen");
    check.section("indicator");

    let poll_interval_ms = check.integer("timing", "poll_interval_ms", 10, 1000, 125);
    let debounce_ms = check.integer("timing", "debounce_ms", 0, 100, 10);
    if debounce_ms >= poll_interval_ms {
        check
            .errors
            .push("[timing] debounce_ms must be shorter than poll_interval_ms".to_string());
    }

    let ledger_file = match ledger.and_then(|t| t.get("file")) {
        Some(toml::Value::String(name)) => {
            if !is_short_file_name(name) {
                check.errors.push(format!(
                    "[ledger] file '{}' is not an uppercase 8.3 name",
                    name
                ));
            }
            name.clone()
        }
        Some(_) => {
            check.errors.push("[ledger] file must be a string".to_string());
            String::new()
        }
        None => {
            check.errors.push("[ledger] missing 'file'".to_string());
            String::new()
        }
    };

    let clock_seed = match clock.and_then(|t| t.get("seed")) {
        Some(toml::Value::String(seed)) => match parse_seed(seed) {
            Ok(stamp) => Some(stamp),
            Err(e) => {
                check.errors.push(format!("[clock] seed: {}", e));
                None
            }
        },
        Some(_) => {
            check
                .errors
                .push("[clock] seed must be a \"YYYY-MM-DD HH:MM:SS\" string".to_string());
            None
        }
        None => None,
    };

    let screen_active_high = check.boolean("screen", "active_high", true);
    let indicator_inverted = check.boolean("indicator", "inverted", false);
    let ledger_fault_pulses = check.integer("indicator", "ledger_fault_pulses", 1, 10, 3);
    let clock_fault_pulses = check.integer("indicator", "clock_fault_pulses", 1, 10, 2);
    let on_ms = check.integer("indicator", "on_ms", 10, 1000, 100);
    let off_ms = check.integer("indicator", "off_ms", 10, 1000, 150);
    if ledger_fault_pulses == clock_fault_pulses {
        check.errors.push(
            "[indicator] ledger and clock faults need different pulse counts".to_string(),
        );
    }

    if !check.errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid settings in device.toml                          ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            check
                .errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=device.toml validated successfully");

    Settings {
        poll_interval_ms,
        debounce_ms,
        ledger_file,
        clock_seed,
        screen_active_high,
        indicator_inverted,
        ledger_fault_pulses,
        clock_fault_pulses,
        on_ms,
        off_ms,
    }
}

/// Parse "YYYY-MM-DD HH:MM:SS" into a timestamp the RTC can store
fn parse_seed(seed: &str) -> Result<TimeStamp, String> {
    let invalid = || format!("'{}' is not \"YYYY-MM-DD HH:MM:SS\"", seed);

    let (date, time) = seed.trim().split_once(' ').ok_or_else(invalid)?;
    let date: Vec<&str> = date.split('-').collect();
    let time: Vec<&str> = time.split(':').collect();
    if date.len() != 3 || time.len() != 3 {
        return Err(invalid());
    }

    let year: u16 = date[0].parse().map_err(|_| invalid())?;
    let mut fields = [0u8; 5];
    for (field, text) in fields.iter_mut().zip(date[1..].iter().chain(time.iter())) {
        *field = text.parse().map_err(|_| invalid())?;
    }

    if !(2000..=2099).contains(&year) {
        return Err(format!("year {} outside 2000-2099", year));
    }
    let [month, day, hour, minute, second] = fields;
    TimeStamp::new(year, month, day, hour, minute, second)
        .ok_or_else(|| format!("'{}' is not a valid date and time", seed))
}

/// Write the validated settings as Rust source into OUT_DIR
fn generate_config(s: &Settings) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let seed = match s.clock_seed {
        Some(t) => format!(
            "TimeStamp::new({}, {}, {}, {}, {}, {})",
            t.year(),
            t.month(),
            t.day(),
            t.hour(),
            t.minute(),
            t.second()
        ),
        None => "None".to_string(),
    };

    let source = format!(
        "// Generated by build.rs from device.toml\n\
        pub const DEVICE_CONFIG: DeviceConfig = DeviceConfig {{\n    \
            poll_interval_ms: {},\n    \
            debounce_ms: {},\n    \
            ledger_file: {:?},\n    \
            clock_seed: {},\n    \
            screen_active_high: {},\n    \
            indicator: IndicatorConfig {{\n        \
                inverted: {},\n        \
                ledger_fault_pulses: {},\n        \
                clock_fault_pulses: {},\n        \
                on_ms: {},\n        \
                off_ms: {},\n    \
            }},\n\
        }};\n",
        s.poll_interval_ms,
        s.debounce_ms,
        s.ledger_file,
        seed,
        s.screen_active_high,
        s.indicator_inverted,
        s.ledger_fault_pulses,
        s.clock_fault_pulses,
        s.on_ms,
        s.off_ms,
    );

    fs::write(out_dir.join("device_config.rs"), source).unwrap();
}
