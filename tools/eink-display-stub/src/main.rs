//! EL133UF1 E-Ink display test application (stub)
//!
//! Walks the stub driver through init, clear, a single pixel write and an
//! update with an empty framebuffer, which the driver must reject.

use anyhow::{Context, Result};
use eink_display_stub::EinkDisplay;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("EL133UF1 E-Ink Display Test Application (Stub)");

    let mut display = EinkDisplay::new();
    display
        .init()
        .context("Failed to initialize E-Ink display")?;

    display.clear()?;
    display.set_pixel(100, 100, 255)?;

    // Expected to fail: the driver rejects an empty frame
    if let Err(e) = display.update(&[]) {
        log::error!("{}", e);
    }

    display.cleanup()?;

    println!("Test completed successfully");
    Ok(())
}
