//! Display-half selection and chip-select status
//!
//! Both chip-select lines are active low: a line reading [`Level::Low`]
//! means its half of the panel is addressed.

use crate::error::CsError;
use crate::gpio::Level;
use std::fmt;
use std::str::FromStr;

/// Which half of the panel receives the next transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection {
    /// Both halves deselected
    None,
    /// Left half (CS0 active)
    Left,
    /// Right half (CS1 active)
    Right,
}

impl Selection {
    pub const ALL: [Selection; 3] = [Selection::None, Selection::Left, Selection::Right];

    /// Line levels `(cs0, cs1)` that realize this selection
    pub fn levels(self) -> (Level, Level) {
        match self {
            Selection::None => (Level::High, Level::High),
            Selection::Left => (Level::Low, Level::High),
            Selection::Right => (Level::High, Level::Low),
        }
    }

    /// Human-readable description used in CLI output
    pub fn describe(self) -> &'static str {
        match self {
            Selection::None => "None (both deselected)",
            Selection::Left => "Left half (CS0)",
            Selection::Right => "Right half (CS1)",
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Selection::None => "none",
            Selection::Left => "left",
            Selection::Right => "right",
        };
        f.write_str(name)
    }
}

impl FromStr for Selection {
    type Err = CsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "deselect" => Ok(Selection::None),
            "left" => Ok(Selection::Left),
            "right" => Ok(Selection::Right),
            other => Err(CsError::InvalidArgument(format!(
                "invalid CS selection: {:?}",
                other
            ))),
        }
    }
}

/// One of the two chip-select lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CsLine {
    /// Left half
    Cs0,
    /// Right half
    Cs1,
}

impl fmt::Display for CsLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsLine::Cs0 => f.write_str("CS0"),
            CsLine::Cs1 => f.write_str("CS1"),
        }
    }
}

/// Snapshot of both lines, derived at query time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsStatus {
    pub cs0_active: bool,
    pub cs1_active: bool,
    pub selection: Selection,
}

impl CsStatus {
    /// Derive the status from raw line levels.
    ///
    /// Returns `None` when both lines are active, which no selection maps to.
    pub fn from_levels(cs0: Level, cs1: Level) -> Option<Self> {
        let cs0_active = cs0 == Level::Low;
        let cs1_active = cs1 == Level::Low;

        let selection = match (cs0_active, cs1_active) {
            (false, false) => Selection::None,
            (true, false) => Selection::Left,
            (false, true) => Selection::Right,
            (true, true) => return None,
        };

        Some(Self {
            cs0_active,
            cs1_active,
            selection,
        })
    }
}

impl fmt::Display for CsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = |active: bool| if active { "ACTIVE" } else { "inactive" };
        write!(
            f,
            "CS0={}, CS1={}",
            state(self.cs0_active),
            state(self.cs1_active)
        )
    }
}
