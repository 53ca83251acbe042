//! i.MX93 Jaguar E-Ink board
//!
//! The 13.3" Spectra 6 panel is driven as two halves sharing one bus.
//!
//! | Line | Half  | Pad        | GPIO            |
//! |------|-------|------------|-----------------|
//! | CS0  | Left  | GPIO2_IO17 | 529 (512 + 17)  |
//! | CS1  | Right | GPIO1_IO11 | 619 (608 + 11)  |

use crate::config::{BoardConfig, LineConfig};
use once_cell::sync::Lazy;

pub static IMX93_JAGUAR_EINK: Lazy<BoardConfig> = Lazy::new(|| {
    let mut board = BoardConfig::new(
        "imx93-jaguar-eink",
        LineConfig::new(529, "GPIO2_IO17"),
        LineConfig::new(619, "GPIO1_IO11"),
    );
    board.description = "i.MX93 Jaguar with dual chip-select E-Ink panel".to_string();
    board
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jaguar_pins() {
        assert_eq!(IMX93_JAGUAR_EINK.cs0.gpio, 512 + 17);
        assert_eq!(IMX93_JAGUAR_EINK.cs1.gpio, 608 + 11);
        assert_eq!(IMX93_JAGUAR_EINK.cs0.label, "GPIO2_IO17");
    }
}
