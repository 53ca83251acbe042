//! E-Ink Chip-Select Test Tool
//!
//! Drives the two chip-select lines of a split E-Ink panel from the shell.
//!
//! # Usage
//!
//! ```bash
//! # Claim both lines and deselect both halves
//! eink-cs-test init
//!
//! # Address the left or right half
//! eink-cs-test left
//! eink-cs-test right
//!
//! # Show which half is currently selected
//! eink-cs-test status
//!
//! # Run the switching self-test on a board described in a TOML file
//! eink-cs-test --config board.toml test
//!
//! # Release the lines again
//! eink-cs-test cleanup
//! ```

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use eink_cs_control::{get_board, BoardConfig, ChipSelect, CsStatus, SysfsGpio};

const DEFAULT_BOARD: &str = "imx93-jaguar-eink";

/// E-Ink Chip-Select Test Tool
///
/// Selects which half of a dual chip-select E-Ink panel is addressed
#[derive(Parser)]
#[command(name = "eink-cs-test")]
#[command(version = "0.1.0")]
#[command(about = "Control and test the dual chip-select lines of a split E-Ink panel")]
#[command(after_help = "CS Logic: Active LOW (0=selected, 1=deselected)")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Built-in board profile
    #[arg(short, long, global = true)]
    board: Option<String>,

    /// Board description file (TOML), overrides --board
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the CS0 (left) GPIO number
    #[arg(long, global = true)]
    cs0: Option<u32>,

    /// Override the CS1 (right) GPIO number
    #[arg(long, global = true)]
    cs1: Option<u32>,

    /// sysfs GPIO directory
    #[arg(long, global = true)]
    sysfs_root: Option<PathBuf>,

    /// Disable diagnostic output
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize CS GPIOs (both deselected)
    Init,

    /// Select left display half (CS0 active)
    Left,

    /// Select right display half (CS1 active)
    Right,

    /// Deselect both halves (both inactive)
    #[command(alias = "none")]
    Deselect,

    /// Show current CS status
    Status,

    /// Run comprehensive CS switching test
    Test,

    /// Clean up GPIO exports
    Cleanup,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "[ERROR]".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let board = resolve_board(&cli)?;

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        print_mapping(&board);
        return Ok(());
    };

    let gpio = SysfsGpio::new(&board.sysfs_root);
    let mut cs = ChipSelect::new(gpio, board);
    cs.set_debug(!cli.quiet);

    match command {
        Commands::Init => {
            cs.init().context("Failed to initialize CS GPIOs")?;
            ok("CS GPIOs initialized successfully");
        }

        Commands::Left => {
            cs.init()
                .and_then(|_| cs.select_left())
                .context("Failed to select left half")?;
            ok("Left half selected successfully");
        }

        Commands::Right => {
            cs.init()
                .and_then(|_| cs.select_right())
                .context("Failed to select right half")?;
            ok("Right half selected successfully");
        }

        Commands::Deselect => {
            cs.init()
                .and_then(|_| cs.deselect_all())
                .context("Failed to deselect both halves")?;
            ok("Both halves deselected successfully");
        }

        Commands::Status => {
            let status = cs.status().context("Failed to get CS status")?;
            print_status(&status);
        }

        Commands::Test => {
            cs.self_test().context("CS test failed")?;
            ok("CS test completed successfully");
        }

        Commands::Cleanup => {
            let report = cs.cleanup();
            for failure in &report.failures {
                eprintln!("{} {}", "[WARNING]".yellow().bold(), failure);
            }
            ok("CS GPIO cleanup completed");
        }
    }

    Ok(())
}

/// Pick the board from --config or --board, then apply pin overrides
fn resolve_board(cli: &Cli) -> Result<BoardConfig> {
    let mut board = if let Some(path) = &cli.config {
        BoardConfig::load(path)
            .with_context(|| format!("Failed to load board config {}", path.display()))?
    } else {
        let name = cli.board.as_deref().unwrap_or(DEFAULT_BOARD);
        get_board(name)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown board profile: {}. Available: {}",
                    name,
                    eink_cs_control::board_names().join(", ")
                )
            })?
            .clone()
    };

    if let Some(gpio) = cli.cs0 {
        board.cs0.gpio = gpio;
    }
    if let Some(gpio) = cli.cs1 {
        board.cs1.gpio = gpio;
    }
    if let Some(root) = &cli.sysfs_root {
        board.sysfs_root = root.clone();
    }

    board.validate()?;
    Ok(board)
}

fn ok(message: &str) {
    println!("{} {}", "[OK]".green().bold(), message);
}

fn print_status(status: &CsStatus) {
    let state = |active: bool| {
        if active {
            "ACTIVE".green().bold()
        } else {
            "inactive".dimmed()
        }
    };

    println!(
        "CS Status: CS0={}, CS1={}",
        state(status.cs0_active),
        state(status.cs1_active)
    );
    println!("Active: {}", status.selection.describe().white().bold());
}

fn print_mapping(board: &BoardConfig) {
    let pad = |label: &str| {
        if label.is_empty() {
            String::new()
        } else {
            format!(" ({})", label)
        }
    };

    println!("\n{}", format!("GPIO Mappings ({}):", board.name).white().bold());
    println!("  CS0 (Left):  GPIO {}{}", board.cs0.gpio, pad(&board.cs0.label));
    println!("  CS1 (Right): GPIO {}{}", board.cs1.gpio, pad(&board.cs1.label));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_none_alias() {
        let cli = Cli::try_parse_from(["eink-cs-test", "none"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Deselect)));
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        assert!(Cli::try_parse_from(["eink-cs-test", "middle"]).is_err());
    }

    #[test]
    fn test_resolve_default_board() {
        let cli = Cli::try_parse_from(["eink-cs-test", "status"]).unwrap();
        let board = resolve_board(&cli).unwrap();
        assert_eq!(board.cs0.gpio, 529);
        assert_eq!(board.cs1.gpio, 619);
    }

    #[test]
    fn test_resolve_overrides() {
        let cli = Cli::try_parse_from([
            "eink-cs-test",
            "left",
            "--cs0",
            "10",
            "--sysfs-root",
            "/tmp/gpio",
        ])
        .unwrap();
        let board = resolve_board(&cli).unwrap();
        assert_eq!(board.cs0.gpio, 10);
        assert_eq!(board.cs1.gpio, 619);
        assert_eq!(board.sysfs_root, PathBuf::from("/tmp/gpio"));
    }

    #[test]
    fn test_resolve_rejects_shared_gpio() {
        let cli = Cli::try_parse_from(["eink-cs-test", "init", "--cs1", "529"]).unwrap();
        assert!(resolve_board(&cli).is_err());
    }

    #[test]
    fn test_resolve_unknown_board() {
        let cli = Cli::try_parse_from(["eink-cs-test", "--board", "rpi4", "init"]).unwrap();
        assert!(resolve_board(&cli).is_err());
    }
}
