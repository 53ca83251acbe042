//! EL133UF1 E-Ink display driver (stub)
//!
//! Placeholder for the 13.3" Spectra 6 panel driver. It exposes the
//! interface a real driver has to provide and checks its arguments, but
//! nothing reaches the panel: every accepted call only logs what it would
//! have done.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DisplayError {
    #[error("E-Ink Display: Not initialized")]
    NotInitialized,

    #[error("E-Ink Display: Pixel coordinates out of bounds ({x}, {y})")]
    OutOfBounds { x: u32, y: u32 },

    #[error("E-Ink Display: Invalid framebuffer ({len} bytes, expected {expected})")]
    InvalidFramebuffer { len: usize, expected: usize },
}

pub type Result<T> = std::result::Result<T, DisplayError>;

/// Stub display driver
#[derive(Debug, Default)]
pub struct EinkDisplay {
    initialized: bool,
}

impl EinkDisplay {
    /// Display width in pixels
    pub const WIDTH: u32 = 1600;
    /// Display height in pixels
    pub const HEIGHT: u32 = 1200;
    /// Framebuffer size in bytes, one byte per pixel
    pub const FRAMEBUFFER_LEN: usize = (Self::WIDTH * Self::HEIGHT) as usize;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn init(&mut self) -> Result<()> {
        log::info!("E-Ink Display: Initializing (stub implementation)");
        self.initialized = true;
        Ok(())
    }

    pub fn cleanup(&mut self) -> Result<()> {
        log::info!("E-Ink Display: Cleaning up (stub implementation)");
        self.initialized = false;
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.ensure_initialized()?;
        log::info!("E-Ink Display: Clearing display (stub implementation)");
        Ok(())
    }

    /// Push a full frame to the panel
    pub fn update(&mut self, framebuffer: &[u8]) -> Result<()> {
        self.ensure_initialized()?;
        if framebuffer.len() != Self::FRAMEBUFFER_LEN {
            return Err(DisplayError::InvalidFramebuffer {
                len: framebuffer.len(),
                expected: Self::FRAMEBUFFER_LEN,
            });
        }
        log::info!("E-Ink Display: Updating display (stub implementation)");
        Ok(())
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, value: u8) -> Result<()> {
        self.ensure_initialized()?;
        if x >= Self::WIDTH || y >= Self::HEIGHT {
            return Err(DisplayError::OutOfBounds { x, y });
        }
        log::info!(
            "E-Ink Display: Setting pixel ({}, {}) to {} (stub implementation)",
            x,
            y,
            value
        );
        Ok(())
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(DisplayError::NotInitialized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready() -> EinkDisplay {
        let mut display = EinkDisplay::new();
        display.init().unwrap();
        display
    }

    #[test]
    fn test_requires_init() {
        let mut display = EinkDisplay::new();
        assert_eq!(display.clear(), Err(DisplayError::NotInitialized));
        assert_eq!(display.set_pixel(0, 0, 1), Err(DisplayError::NotInitialized));
        assert_eq!(display.update(&[]), Err(DisplayError::NotInitialized));
    }

    #[test]
    fn test_cleanup_uninitializes() {
        let mut display = ready();
        assert!(display.is_initialized());
        display.cleanup().unwrap();
        assert_eq!(display.clear(), Err(DisplayError::NotInitialized));
    }

    #[test]
    fn test_pixel_bounds() {
        let mut display = ready();
        display.set_pixel(0, 0, 0).unwrap();
        display.set_pixel(1599, 1199, 255).unwrap();
        assert_eq!(
            display.set_pixel(1600, 0, 1),
            Err(DisplayError::OutOfBounds { x: 1600, y: 0 })
        );
        assert_eq!(
            display.set_pixel(0, 1200, 1),
            Err(DisplayError::OutOfBounds { x: 0, y: 1200 })
        );
    }

    #[test]
    fn test_update_checks_buffer() {
        let mut display = ready();
        assert_eq!(
            display.update(&[]),
            Err(DisplayError::InvalidFramebuffer {
                len: 0,
                expected: 1_920_000,
            })
        );
        assert!(display.update(&[0u8; 16]).is_err());

        let frame = vec![0u8; EinkDisplay::FRAMEBUFFER_LEN];
        display.update(&frame).unwrap();
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            DisplayError::NotInitialized.to_string(),
            "E-Ink Display: Not initialized"
        );
    }
}
