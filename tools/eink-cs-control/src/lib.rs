//! E-Ink dual chip-select control
//!
//! The 13.3" split E-Ink panel on the i.MX93 Jaguar board is addressed one
//! half at a time. Two active-low GPIO lines pick the half that receives the
//! next bus transaction:
//!
//! - **CS0**: left half
//! - **CS1**: right half
//!
//! [`ChipSelect`] sequences the GPIO writes, re-reads the lines to confirm
//! each selection and never drives both halves at once.
//!
//! # Example
//!
//! ```no_run
//! use eink_cs_control::{BoardConfig, ChipSelect, Selection, SysfsGpio};
//!
//! let config = BoardConfig::default();
//! let gpio = SysfsGpio::new(&config.sysfs_root);
//! let mut cs = ChipSelect::new(gpio, config);
//!
//! cs.init()?;
//! cs.select(Selection::Left)?;
//! assert_eq!(cs.status()?.selection, Selection::Left);
//! cs.cleanup();
//! # Ok::<(), eink_cs_control::CsError>(())
//! ```

pub mod boards;
pub mod config;
pub mod controller;
pub mod error;
pub mod gpio;
pub mod selection;

pub use boards::{board_names, get_board};
pub use config::{BoardConfig, LineConfig, Timing};
pub use controller::ChipSelect;
pub use error::{CleanupReport, CsError, Result};
pub use gpio::{Direction, FakeGpio, GpioAccess, GpioOp, Level, SysfsGpio};
pub use selection::{CsLine, CsStatus, Selection};
