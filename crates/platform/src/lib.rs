//! Raspberry Pi telemetry sources for pipower.
//!
//! This crate provides the [`TelemetrySource`] trait, which abstracts every
//! read pipower makes from the operating system and from the `vcgencmd`
//! firmware utility, together with the pure parsers that turn raw command
//! output into numbers.
//!
//! # Example
//!
//! ```ignore
//! use pipower_platform::{parse_temperature, RaspberryPi, TelemetrySource};
//!
//! let pi = RaspberryPi::new();
//! let raw = pi.temperature().await?;
//! println!("SoC temperature: {}°C", parse_temperature(&raw)?);
//! ```

mod command;
mod error;
mod parse;
mod rpi;
mod source;
mod types;

pub use command::run_command;
pub use error::SourceError;
pub use parse::{parse_model, parse_temperature, parse_throttled, parse_voltage};
pub use rpi::RaspberryPi;
pub use source::TelemetrySource;
pub use types::{CpuFrequency, Rail, ThrottleFlags};
