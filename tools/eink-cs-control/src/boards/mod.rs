//! Built-in board profiles
//!
//! Each profile names the GPIO numbers wired to CS0/CS1 on a known board.
//! Profiles are looked up by name or alias; anything else has to come from
//! a TOML file (see [`crate::config::BoardConfig::load`]).

pub mod imx93_jaguar;

pub use imx93_jaguar::IMX93_JAGUAR_EINK;

use crate::config::BoardConfig;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Registry of built-in board profiles
pub static BOARD_PROFILES: Lazy<HashMap<&'static str, &'static BoardConfig>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("imx93-jaguar-eink", &*IMX93_JAGUAR_EINK);
    m.insert("jaguar-eink", &*IMX93_JAGUAR_EINK);
    m.insert("default", &*IMX93_JAGUAR_EINK);
    m
});

/// Get a board profile by name
pub fn get_board(name: &str) -> Option<&'static BoardConfig> {
    BOARD_PROFILES.get(name.to_lowercase().as_str()).copied()
}

/// Canonical board names (aliases excluded)
pub fn board_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = BOARD_PROFILES.values().map(|b| b.name.as_str()).collect();
    names.sort();
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_aliases() {
        let board = get_board("jaguar-eink").unwrap();
        assert_eq!(board.name, "imx93-jaguar-eink");
        assert!(std::ptr::eq(board, get_board("DEFAULT").unwrap()));
        assert!(get_board("rpi4").is_none());
    }

    #[test]
    fn test_board_names_deduplicated() {
        assert_eq!(board_names(), vec!["imx93-jaguar-eink"]);
    }

    #[test]
    fn test_builtin_profiles_are_valid() {
        for name in board_names() {
            get_board(name).unwrap().validate().unwrap();
        }
    }
}
