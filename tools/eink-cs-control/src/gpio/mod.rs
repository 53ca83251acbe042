//! GPIO access layer
//!
//! The chip-select controller never touches files directly. It drives pins
//! through the [`GpioAccess`] trait, which has two implementations:
//!
//! - [`SysfsGpio`]: the Linux `/sys/class/gpio` interface
//! - [`FakeGpio`]: an in-memory pin model for tests and dry runs

pub mod fake;
pub mod sysfs;

pub use fake::FakeGpio;
pub use sysfs::SysfsGpio;

use std::fmt;
use std::io;

/// Electrical level of a GPIO line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// Character written to / read from a sysfs `value` file
    pub fn as_char(self) -> char {
        match self {
            Level::Low => '0',
            Level::High => '1',
        }
    }

    /// Parse a sysfs `value` byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'0' => Some(Level::Low),
            b'1' => Some(Level::High),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The primitive operation that failed, carried in access errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpioOp {
    Export,
    Unexport,
    SetDirection,
    SetValue,
    GetValue,
}

impl fmt::Display for GpioOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GpioOp::Export => "export",
            GpioOp::Unexport => "unexport",
            GpioOp::SetDirection => "set direction",
            GpioOp::SetValue => "set value",
            GpioOp::GetValue => "read value",
        };
        f.write_str(name)
    }
}

/// Primitive GPIO operations the controller is built on.
///
/// Every call is independently fallible. Implementations must not retry.
pub trait GpioAccess {
    /// Claim a pin. A pin that is already claimed counts as success.
    fn export(&mut self, gpio: u32) -> io::Result<()>;

    /// Release a pin
    fn unexport(&mut self, gpio: u32) -> io::Result<()>;

    /// Configure a pin as input or output
    fn set_direction(&mut self, gpio: u32, direction: Direction) -> io::Result<()>;

    /// Drive an output pin
    fn set_value(&mut self, gpio: u32, level: Level) -> io::Result<()>;

    /// Read back the current pin level
    fn get_value(&mut self, gpio: u32) -> io::Result<Level>;
}
