//! In-memory GPIO backend
//!
//! Models exported pins with a direction and a driven level. Pins can be
//! marked "stuck" so that read-back ignores writes, and individual
//! operations can be made to fail, which lets the controller's error paths
//! run without hardware.

use super::{Direction, GpioAccess, GpioOp, Level};
use std::collections::{HashMap, HashSet};
use std::io;

#[derive(Debug, Clone)]
struct PinState {
    direction: Direction,
    level: Level,
}

/// Fake GPIO controller
#[derive(Debug, Default)]
pub struct FakeGpio {
    pins: HashMap<u32, PinState>,
    stuck: HashMap<u32, Level>,
    failures: HashSet<(GpioOp, u32)>,
    calls: Vec<(GpioOp, u32)>,
}

impl FakeGpio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future `op` on `gpio` fail with a permission error
    pub fn fail_on(&mut self, op: GpioOp, gpio: u32) {
        self.failures.insert((op, gpio));
    }

    /// Stop failing `op` on `gpio`
    pub fn clear_failure(&mut self, op: GpioOp, gpio: u32) {
        self.failures.remove(&(op, gpio));
    }

    /// Force reads of `gpio` to return `level` regardless of writes
    pub fn stick(&mut self, gpio: u32, level: Level) {
        self.stuck.insert(gpio, level);
    }

    /// Drive a pin level directly, bypassing the access API
    pub fn force_level(&mut self, gpio: u32, level: Level) {
        if let Some(pin) = self.pins.get_mut(&gpio) {
            pin.level = level;
        }
    }

    pub fn is_exported(&self, gpio: u32) -> bool {
        self.pins.contains_key(&gpio)
    }

    pub fn direction(&self, gpio: u32) -> Option<Direction> {
        self.pins.get(&gpio).map(|p| p.direction)
    }

    /// Last driven level of an exported pin
    pub fn level(&self, gpio: u32) -> Option<Level> {
        self.pins.get(&gpio).map(|p| p.level)
    }

    /// Every operation attempted, in order, including failed ones
    pub fn calls(&self) -> &[(GpioOp, u32)] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn enter(&mut self, op: GpioOp, gpio: u32) -> io::Result<()> {
        self.calls.push((op, gpio));
        if self.failures.contains(&(op, gpio)) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("injected {} failure on GPIO {}", op, gpio),
            ));
        }
        Ok(())
    }

    fn pin_mut(&mut self, gpio: u32) -> io::Result<&mut PinState> {
        self.pins.get_mut(&gpio).ok_or_else(|| not_exported(gpio))
    }
}

fn not_exported(gpio: u32) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("GPIO {} is not exported", gpio),
    )
}

impl GpioAccess for FakeGpio {
    fn export(&mut self, gpio: u32) -> io::Result<()> {
        self.enter(GpioOp::Export, gpio)?;
        // Freshly exported lines come up as floating inputs reading low
        self.pins.entry(gpio).or_insert(PinState {
            direction: Direction::In,
            level: Level::Low,
        });
        Ok(())
    }

    fn unexport(&mut self, gpio: u32) -> io::Result<()> {
        self.enter(GpioOp::Unexport, gpio)?;
        self.pins.remove(&gpio).map(|_| ()).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("GPIO {} is not exported", gpio),
            )
        })
    }

    fn set_direction(&mut self, gpio: u32, direction: Direction) -> io::Result<()> {
        self.enter(GpioOp::SetDirection, gpio)?;
        self.pin_mut(gpio)?.direction = direction;
        Ok(())
    }

    fn set_value(&mut self, gpio: u32, level: Level) -> io::Result<()> {
        self.enter(GpioOp::SetValue, gpio)?;
        let pin = self.pin_mut(gpio)?;
        if pin.direction != Direction::Out {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("GPIO {} is not an output", gpio),
            ));
        }
        pin.level = level;
        Ok(())
    }

    fn get_value(&mut self, gpio: u32) -> io::Result<Level> {
        self.enter(GpioOp::GetValue, gpio)?;
        let level = self.pin_mut(gpio)?.level;
        Ok(self.stuck.get(&gpio).copied().unwrap_or(level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_export() {
        let mut gpio = FakeGpio::new();
        assert_eq!(
            gpio.get_value(7).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );

        gpio.export(7).unwrap();
        assert!(gpio.is_exported(7));
        assert_eq!(gpio.direction(7), Some(Direction::In));
    }

    #[test]
    fn test_write_requires_output() {
        let mut gpio = FakeGpio::new();
        gpio.export(7).unwrap();
        assert!(gpio.set_value(7, Level::High).is_err());

        gpio.set_direction(7, Direction::Out).unwrap();
        gpio.set_value(7, Level::High).unwrap();
        assert_eq!(gpio.get_value(7).unwrap(), Level::High);
    }

    #[test]
    fn test_stuck_pin_ignores_writes() {
        let mut gpio = FakeGpio::new();
        gpio.export(7).unwrap();
        gpio.set_direction(7, Direction::Out).unwrap();
        gpio.stick(7, Level::Low);

        gpio.set_value(7, Level::High).unwrap();
        assert_eq!(gpio.level(7), Some(Level::High));
        assert_eq!(gpio.get_value(7).unwrap(), Level::Low);
    }

    #[test]
    fn test_injected_failure_is_recorded() {
        let mut gpio = FakeGpio::new();
        gpio.fail_on(GpioOp::Export, 3);

        assert!(gpio.export(3).is_err());
        assert!(!gpio.is_exported(3));
        assert_eq!(gpio.calls(), &[(GpioOp::Export, 3)]);

        gpio.clear_failure(GpioOp::Export, 3);
        gpio.export(3).unwrap();
    }

    #[test]
    fn test_export_is_idempotent() {
        let mut gpio = FakeGpio::new();
        gpio.export(7).unwrap();
        gpio.set_direction(7, Direction::Out).unwrap();
        gpio.export(7).unwrap();
        assert_eq!(gpio.direction(7), Some(Direction::Out));

        gpio.unexport(7).unwrap();
        assert!(gpio.unexport(7).is_err());
    }
}
