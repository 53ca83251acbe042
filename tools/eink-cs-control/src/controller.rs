//! Dual chip-select controller
//!
//! Owns the CS0 (left) and CS1 (right) lines and keeps them mutually
//! exclusive. Every selection is written and then read back; a selection
//! only counts as done once the read-back matches.
//!
//! | Selection | CS0  | CS1  |
//! |-----------|------|------|
//! | None      | high | high |
//! | Left      | low  | high |
//! | Right     | high | low  |
//!
//! Both lines low is never written and is reported as
//! [`CsError::InvalidState`] if it is ever read.

use crate::config::{BoardConfig, LineConfig};
use crate::error::{CleanupReport, CsError, Result};
use crate::gpio::{Direction, GpioAccess, GpioOp, Level};
use crate::selection::{CsLine, CsStatus, Selection};
use std::thread;
use std::time::Duration;

/// Diagnostics are promoted to `info` while debug output is enabled
macro_rules! diag {
    ($cs:expr, $($arg:tt)+) => {
        if $cs.debug {
            log::info!(target: "eink_cs", $($arg)+)
        } else {
            log::debug!(target: "eink_cs", $($arg)+)
        }
    };
}

/// Chip-select controller over a GPIO access layer
pub struct ChipSelect<G: GpioAccess> {
    gpio: G,
    config: BoardConfig,
    debug: bool,
    claimed: [bool; 2],
}

impl<G: GpioAccess> ChipSelect<G> {
    /// Create a controller. No pins are touched until [`ChipSelect::init`].
    pub fn new(gpio: G, config: BoardConfig) -> Self {
        Self {
            gpio,
            config,
            debug: false,
            claimed: [false; 2],
        }
    }

    /// Enable or disable verbose diagnostics for this controller
    pub fn set_debug(&mut self, enabled: bool) {
        self.debug = enabled;
        diag!(self, "Debug mode {}", if enabled { "enabled" } else { "disabled" });
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Pin configuration of one line
    pub fn line(&self, line: CsLine) -> &LineConfig {
        match line {
            CsLine::Cs0 => &self.config.cs0,
            CsLine::Cs1 => &self.config.cs1,
        }
    }

    /// Whether this controller exported the line and has not released it
    pub fn is_claimed(&self, line: CsLine) -> bool {
        self.claimed[line as usize]
    }

    pub fn gpio(&self) -> &G {
        &self.gpio
    }

    pub fn gpio_mut(&mut self) -> &mut G {
        &mut self.gpio
    }

    pub fn into_inner(self) -> G {
        self.gpio
    }

    /// Claim both lines, make them outputs and deselect both halves.
    ///
    /// Stops at the first failing step. Lines claimed before the failure
    /// stay claimed; call [`ChipSelect::cleanup`] to release them.
    pub fn init(&mut self) -> Result<()> {
        diag!(self, "Initializing E-Ink CS GPIOs...");

        for line in [CsLine::Cs0, CsLine::Cs1] {
            self.export(line)?;
            self.claimed[line as usize] = true;
        }

        pause(self.config.timing.settle_delay());

        for line in [CsLine::Cs0, CsLine::Cs1] {
            self.make_output(line)?;
        }
        for line in [CsLine::Cs0, CsLine::Cs1] {
            self.write(line, Level::High)?;
        }

        // A line that was already exported may have been left in any state
        self.verify(Selection::None)?;

        diag!(self, "CS GPIOs initialized - both deselected (HIGH)");
        Ok(())
    }

    /// Select a half, or neither, and verify the result
    pub fn select(&mut self, target: Selection) -> Result<()> {
        match target {
            Selection::None => self.deselect_all(),
            Selection::Left => self.select_left(),
            Selection::Right => self.select_right(),
        }
    }

    /// CS0 active, CS1 inactive
    pub fn select_left(&mut self) -> Result<()> {
        diag!(self, "Selecting left display half (CS0 active)");
        self.apply(Selection::Left)
    }

    /// CS0 inactive, CS1 active
    pub fn select_right(&mut self) -> Result<()> {
        diag!(self, "Selecting right display half (CS1 active)");
        self.apply(Selection::Right)
    }

    /// Both lines inactive
    pub fn deselect_all(&mut self) -> Result<()> {
        diag!(self, "Deselecting both display halves");
        self.apply(Selection::None)
    }

    /// Read both lines and derive the current selection
    pub fn status(&mut self) -> Result<CsStatus> {
        let cs0 = self.read(CsLine::Cs0)?;
        let cs1 = self.read(CsLine::Cs1)?;

        CsStatus::from_levels(cs0, cs1).ok_or_else(|| {
            let err = CsError::InvalidState {
                cs0_gpio: self.config.cs0.gpio,
                cs1_gpio: self.config.cs1.gpio,
            };
            log::error!("{}", err);
            err
        })
    }

    /// Exercise every selection, then alternate rapidly between halves.
    ///
    /// Aborts on the first failing step. The delays only give slow hardware
    /// time to settle.
    pub fn self_test(&mut self) -> Result<()> {
        diag!(self, "Testing CS switching functionality...");
        let timing = self.config.timing.clone();

        self.init()?;

        diag!(self, "=== Testing deselect all ===");
        self.deselect_all()?;
        pause(timing.phase_delay());

        diag!(self, "=== Testing left half selection ===");
        self.select_left()?;
        pause(timing.phase_delay());

        diag!(self, "=== Testing right half selection ===");
        self.select_right()?;
        pause(timing.phase_delay());

        diag!(self, "=== Testing rapid switching ===");
        for cycle in 1..=timing.rapid_cycles {
            diag!(self, "Switch cycle {}/{}", cycle, timing.rapid_cycles);
            self.select_left()?;
            pause(timing.switch_delay());
            self.select_right()?;
            pause(timing.switch_delay());
        }

        self.deselect_all()?;

        diag!(self, "CS switching test completed successfully!");
        Ok(())
    }

    /// Deselect both halves and release both lines.
    ///
    /// Every step runs even if an earlier one failed; failures are logged
    /// and collected in the returned report.
    pub fn cleanup(&mut self) -> CleanupReport {
        diag!(self, "Cleaning up CS GPIO exports...");
        let mut report = CleanupReport::default();

        // Drive each line separately so one failed write cannot leave the
        // other one selected
        for line in [CsLine::Cs0, CsLine::Cs1] {
            report.record(self.write(line, Level::High));
        }
        report.record(self.verify(Selection::None));

        for line in [CsLine::Cs0, CsLine::Cs1] {
            let result = self.unexport(line);
            if result.is_ok() {
                self.claimed[line as usize] = false;
            }
            report.record(result);
        }

        if report.is_clean() {
            diag!(self, "CS GPIO cleanup completed");
        } else {
            diag!(
                self,
                "CS GPIO cleanup completed with {} failure(s)",
                report.failures.len()
            );
        }
        report
    }

    /// Write the pattern for `target` and confirm it by reading back
    fn apply(&mut self, target: Selection) -> Result<()> {
        let (cs0, cs1) = target.levels();
        self.write(CsLine::Cs0, cs0)?;
        self.write(CsLine::Cs1, cs1)?;
        self.verify(target)
    }

    fn verify(&mut self, expected: Selection) -> Result<()> {
        let cs0 = self.read(CsLine::Cs0)?;
        let cs1 = self.read(CsLine::Cs1)?;

        if (cs0, cs1) != expected.levels() {
            let err = CsError::Verification { expected, cs0, cs1 };
            log::error!("{}", err);
            return Err(err);
        }

        diag!(
            self,
            "{} confirmed (CS0={}, CS1={})",
            expected.describe(),
            cs0,
            cs1
        );
        Ok(())
    }

    fn write(&mut self, line: CsLine, level: Level) -> Result<()> {
        let gpio = self.line(line).gpio;
        let result = self.gpio.set_value(gpio, level);
        self.check(line, GpioOp::SetValue, result)
    }

    fn read(&mut self, line: CsLine) -> Result<Level> {
        let gpio = self.line(line).gpio;
        let result = self.gpio.get_value(gpio);
        self.check(line, GpioOp::GetValue, result)
    }

    fn export(&mut self, line: CsLine) -> Result<()> {
        let gpio = self.line(line).gpio;
        let result = self.gpio.export(gpio);
        self.check(line, GpioOp::Export, result)
    }

    fn unexport(&mut self, line: CsLine) -> Result<()> {
        let gpio = self.line(line).gpio;
        let result = self.gpio.unexport(gpio);
        self.check(line, GpioOp::Unexport, result)
    }

    fn make_output(&mut self, line: CsLine) -> Result<()> {
        let gpio = self.line(line).gpio;
        let result = self.gpio.set_direction(gpio, Direction::Out);
        self.check(line, GpioOp::SetDirection, result)
    }

    fn check<T>(&self, line: CsLine, op: GpioOp, result: std::io::Result<T>) -> Result<T> {
        result.map_err(|source| {
            let err = CsError::Access {
                line,
                gpio: self.line(line).gpio,
                op,
                source,
            };
            log::error!("{}", err);
            err
        })
    }
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}
