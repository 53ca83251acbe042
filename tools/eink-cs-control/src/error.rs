//! Chip-select error types

use crate::gpio::{GpioOp, Level};
use crate::selection::{CsLine, Selection};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CsError>;

#[derive(Debug, Error)]
pub enum CsError {
    /// The GPIO layer could not open, read or write a control file
    #[error("failed to {op} {line} (GPIO {gpio}): {source}")]
    Access {
        line: CsLine,
        gpio: u32,
        op: GpioOp,
        #[source]
        source: io::Error,
    },

    /// Writes succeeded but read-back disagrees, usually a wiring fault
    #[error("failed to select {expected}: read back CS0={cs0}, CS1={cs1}")]
    Verification {
        expected: Selection,
        cs0: Level,
        cs1: Level,
    },

    /// Both lines active at once
    #[error("invalid CS state: both CS0 (GPIO {cs0_gpio}) and CS1 (GPIO {cs1_gpio}) active")]
    InvalidState { cs0_gpio: u32, cs1_gpio: u32 },

    #[error("{0}")]
    InvalidArgument(String),

    #[error("failed to read board config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse board config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl CsError {
    /// True for faults raised by the access layer rather than the hardware
    pub fn is_access(&self) -> bool {
        matches!(self, CsError::Access { .. })
    }
}

/// Outcome of a best-effort cleanup.
///
/// Cleanup runs every step even when some fail; the failures are collected
/// here instead of aborting.
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub failures: Vec<CsError>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn record(&mut self, result: Result<()>) {
        if let Err(e) = result {
            log::warn!("cleanup: {}", e);
            self.failures.push(e);
        }
    }
}
