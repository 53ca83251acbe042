//! Board configuration
//!
//! Describes which GPIO numbers carry the two chip-select lines and how long
//! to wait between steps. Every field has a default taken from the i.MX93
//! E-Ink board, so a TOML file only needs to name what differs:
//!
//! ```toml
//! name = "my-board"
//!
//! [cs0]
//! gpio = 17
//! label = "GPIO0_IO17"
//!
//! [timing]
//! settle_delay_ms = 250
//! ```

use crate::error::{CsError, Result};
use crate::gpio::sysfs::DEFAULT_SYSFS_ROOT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One chip-select line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineConfig {
    /// Kernel GPIO number (bank base + offset)
    pub gpio: u32,
    /// Pad name printed in usage text
    #[serde(default)]
    pub label: String,
}

impl LineConfig {
    pub fn new(gpio: u32, label: &str) -> Self {
        Self {
            gpio,
            label: label.to_string(),
        }
    }
}

/// Delays applied while sequencing the lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Wait after export for sysfs to create the pin files
    pub settle_delay_ms: u64,
    /// Pause between half-cycles of the rapid switching test
    pub switch_delay_ms: u64,
    /// Pause between self-test phases
    pub phase_delay_ms: u64,
    /// Number of left/right alternations in the self-test
    pub rapid_cycles: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            settle_delay_ms: 100,
            switch_delay_ms: 100,
            phase_delay_ms: 1000,
            rapid_cycles: 5,
        }
    }
}

impl Timing {
    /// No delays at all, for fakes and tests
    pub fn immediate() -> Self {
        Self {
            settle_delay_ms: 0,
            switch_delay_ms: 0,
            phase_delay_ms: 0,
            ..Self::default()
        }
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn switch_delay(&self) -> Duration {
        Duration::from_millis(self.switch_delay_ms)
    }

    pub fn phase_delay(&self) -> Duration {
        Duration::from_millis(self.phase_delay_ms)
    }
}

/// Complete board description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Short identifier (e.g., "imx93-jaguar-eink")
    pub name: String,
    pub description: String,
    /// Left half
    pub cs0: LineConfig,
    /// Right half
    pub cs1: LineConfig,
    /// sysfs GPIO class directory
    pub sysfs_root: PathBuf,
    pub timing: Timing,
}

impl Default for BoardConfig {
    fn default() -> Self {
        crate::boards::IMX93_JAGUAR_EINK.clone()
    }
}

impl BoardConfig {
    /// Create a config for an arbitrary pin pair with default timing
    pub fn new(name: &str, cs0: LineConfig, cs1: LineConfig) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            cs0,
            cs1,
            sysfs_root: PathBuf::from(DEFAULT_SYSFS_ROOT),
            timing: Timing::default(),
        }
    }

    /// Load a board config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| CsError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse TOML content; missing fields fall back to the default board
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the controller cannot drive safely
    pub fn validate(&self) -> Result<()> {
        if self.cs0.gpio == self.cs1.gpio {
            return Err(CsError::InvalidArgument(format!(
                "CS0 and CS1 must be different GPIOs (both are {})",
                self.cs0.gpio
            )));
        }
        if self.timing.rapid_cycles == 0 {
            return Err(CsError::InvalidArgument(
                "timing.rapid_cycles must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_sysfs_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.sysfs_root = root.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_board() {
        let config = BoardConfig::default();
        assert_eq!(config.cs0.gpio, 529);
        assert_eq!(config.cs1.gpio, 619);
        assert_eq!(config.sysfs_root, PathBuf::from("/sys/class/gpio"));
        assert_eq!(config.timing.settle_delay(), Duration::from_millis(100));
        assert_eq!(config.timing.phase_delay(), Duration::from_secs(1));
        assert_eq!(config.timing.rapid_cycles, 5);
    }

    #[test]
    fn test_partial_override() {
        let content = r#"
name = "bench"

[cs1]
gpio = 42

[timing]
settle_delay_ms = 250
"#;
        let config = BoardConfig::parse(content).unwrap();
        assert_eq!(config.name, "bench");
        assert_eq!(config.cs0.gpio, 529);
        assert_eq!(config.cs1.gpio, 42);
        assert_eq!(config.cs1.label, "");
        assert_eq!(config.timing.settle_delay_ms, 250);
        assert_eq!(config.timing.switch_delay_ms, 100);
    }

    #[test]
    fn test_rejects_shared_gpio() {
        let content = "[cs0]\ngpio = 619\n";
        assert!(matches!(
            BoardConfig::parse(content),
            Err(CsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_rejects_zero_cycles() {
        let content = "[timing]\nrapid_cycles = 0\n";
        assert!(BoardConfig::parse(content).is_err());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            BoardConfig::parse("cs0 = \"nope\""),
            Err(CsError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[cs0]\ngpio = 10\nlabel = \"PIN10\"").unwrap();

        let config = BoardConfig::load(file.path()).unwrap();
        assert_eq!(config.cs0, LineConfig::new(10, "PIN10"));

        let missing = BoardConfig::load(Path::new("/nonexistent/board.toml"));
        assert!(matches!(missing, Err(CsError::Config { .. })));
    }

    #[test]
    fn test_immediate_timing() {
        let timing = Timing::immediate();
        assert_eq!(timing.settle_delay(), Duration::ZERO);
        assert_eq!(timing.rapid_cycles, 5);
    }
}
