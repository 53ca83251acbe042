//! Linux sysfs GPIO backend
//!
//! Layout under the sysfs root (normally `/sys/class/gpio`):
//!
//! | Path                 | Access | Content                  |
//! |----------------------|--------|--------------------------|
//! | `export`             | write  | decimal pin number       |
//! | `unexport`           | write  | decimal pin number       |
//! | `gpio<N>/direction`  | write  | `in` or `out`            |
//! | `gpio<N>/value`      | rw     | `0` or `1`               |
//!
//! The kernel only creates `gpio<N>/` some time after the export write, so
//! callers are expected to wait before touching the per-pin files.

use super::{Direction, GpioAccess, Level};
use std::fs::OpenOptions;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Default sysfs GPIO class directory
pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class/gpio";

/// GPIO access through the sysfs class interface
#[derive(Debug, Clone)]
pub struct SysfsGpio {
    root: PathBuf,
}

impl Default for SysfsGpio {
    fn default() -> Self {
        Self::new(DEFAULT_SYSFS_ROOT)
    }
}

impl SysfsGpio {
    /// Create a backend rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The sysfs root this backend writes under
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn pin_file(&self, gpio: u32, name: &str) -> PathBuf {
        self.root.join(format!("gpio{}", gpio)).join(name)
    }

    fn write_file(path: &Path, content: &str) -> io::Result<()> {
        log::trace!("write {:?} -> {}", content, path.display());
        let mut file = OpenOptions::new().write(true).truncate(true).open(path)?;
        file.write_all(content.as_bytes())
    }
}

/// True when an export write failed because the pin is already exported
pub fn is_busy(err: &io::Error) -> bool {
    err.raw_os_error() == Some(libc::EBUSY)
}

impl GpioAccess for SysfsGpio {
    fn export(&mut self, gpio: u32) -> io::Result<()> {
        match Self::write_file(&self.root.join("export"), &gpio.to_string()) {
            Err(e) if is_busy(&e) => {
                log::warn!("GPIO {} already exported, reusing existing claim", gpio);
                Ok(())
            }
            other => other,
        }
    }

    fn unexport(&mut self, gpio: u32) -> io::Result<()> {
        Self::write_file(&self.root.join("unexport"), &gpio.to_string())
    }

    fn set_direction(&mut self, gpio: u32, direction: Direction) -> io::Result<()> {
        Self::write_file(&self.pin_file(gpio, "direction"), direction.as_str())
    }

    fn set_value(&mut self, gpio: u32, level: Level) -> io::Result<()> {
        Self::write_file(&self.pin_file(gpio, "value"), &level.as_char().to_string())
    }

    fn get_value(&mut self, gpio: u32) -> io::Result<Level> {
        let path = self.pin_file(gpio, "value");
        let mut file = OpenOptions::new().read(true).open(&path)?;
        let mut byte = [0u8; 1];
        if file.read(&mut byte)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("{} is empty", path.display()),
            ));
        }

        Level::from_byte(byte[0]).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unexpected value {:?} in {}", byte[0] as char, path.display()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    /// Build a fake sysfs tree with control files and one exported pin
    fn fake_tree(gpio: u32) -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("export"), "").unwrap();
        fs::write(dir.path().join("unexport"), "").unwrap();
        let pin_dir = dir.path().join(format!("gpio{}", gpio));
        fs::create_dir(&pin_dir).unwrap();
        fs::write(pin_dir.join("direction"), "in").unwrap();
        fs::write(pin_dir.join("value"), "0").unwrap();
        dir
    }

    #[test]
    fn test_export_writes_decimal_pin() {
        let dir = fake_tree(529);
        let mut gpio = SysfsGpio::new(dir.path());

        gpio.export(529).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("export")).unwrap(), "529");

        gpio.unexport(619).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("unexport")).unwrap(), "619");
    }

    #[test]
    fn test_direction_and_value_files() {
        let dir = fake_tree(619);
        let mut gpio = SysfsGpio::new(dir.path());

        gpio.set_direction(619, Direction::Out).unwrap();
        gpio.set_value(619, Level::High).unwrap();

        let pin_dir = dir.path().join("gpio619");
        assert_eq!(fs::read_to_string(pin_dir.join("direction")).unwrap(), "out");
        assert_eq!(fs::read_to_string(pin_dir.join("value")).unwrap(), "1");
        assert_eq!(gpio.get_value(619).unwrap(), Level::High);
    }

    #[test]
    fn test_read_ignores_trailing_newline() {
        let dir = fake_tree(529);
        fs::write(dir.path().join("gpio529/value"), "0\n").unwrap();

        let mut gpio = SysfsGpio::new(dir.path());
        assert_eq!(gpio.get_value(529).unwrap(), Level::Low);
    }

    #[test]
    fn test_invalid_value_byte() {
        let dir = fake_tree(529);
        fs::write(dir.path().join("gpio529/value"), "x").unwrap();

        let mut gpio = SysfsGpio::new(dir.path());
        let err = gpio.get_value(529).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_missing_pin_directory() {
        let dir = fake_tree(529);
        let mut gpio = SysfsGpio::new(dir.path());

        let err = gpio.set_value(42, Level::Low).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(gpio.get_value(42).is_err());
    }

    #[test]
    fn test_missing_export_file() {
        let dir = tempdir().unwrap();
        let mut gpio = SysfsGpio::new(dir.path().join("absent"));
        assert!(gpio.export(529).is_err());
    }

    #[test]
    fn test_busy_detection() {
        assert!(is_busy(&io::Error::from_raw_os_error(libc::EBUSY)));
        assert!(!is_busy(&io::Error::from_raw_os_error(libc::EACCES)));
        assert!(!is_busy(&io::Error::new(io::ErrorKind::Other, "other")));
    }

    #[test]
    fn test_default_root() {
        assert_eq!(SysfsGpio::default().root(), Path::new("/sys/class/gpio"));
    }
}
