//! # Configuration Module
//!
//! Configuration structures and validation for scroll-capture sessions. This is the
//! common interface between the CLI, an external settings store, and the library.
//!
//! ## Configuration Parameters
//!
//! | Parameter | Type | Range | Description |
//! |-----------|------|-------|-------------|
//! | `screen` | `ScreenSize` | non-zero | Full display dimensions in pixels |
//! | `selection_timeout` | `SelectionTimeout` | 5s, 10s, 15s, 20s | Idle time before a selection finalizes |
//!
//! ## Timeout Formats
//!
//! Settings stores usually persist the timeout in milliseconds; the CLI accepts
//! the same values with optional units:
//! - Raw milliseconds: `5000`
//! - Explicit milliseconds: `10000ms`
//! - Seconds: `15s`
//!
//! Any value outside the four allowed durations is rejected.
//!
//! ## Examples
//!
//! ```rust
//! use scroll_capture::config::{CaptureConfig, SelectionTimeout};
//! use scroll_capture::core::ScreenSize;
//!
//! let config = CaptureConfig::new(ScreenSize::new(1080, 2400), "10s".parse().unwrap());
//! assert!(config.validate().is_ok());
//! assert_eq!(config.selection_timeout, SelectionTimeout::Seconds10);
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::core::ScreenSize;
use crate::error::{CaptureError, CaptureResult};

/// How long the selection waits after the last pointer event before finalizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionTimeout {
    #[default]
    Seconds5,
    Seconds10,
    Seconds15,
    Seconds20,
}

impl SelectionTimeout {
    /// Every allowed value, shortest first.
    pub const ALL: [SelectionTimeout; 4] = [
        SelectionTimeout::Seconds5,
        SelectionTimeout::Seconds10,
        SelectionTimeout::Seconds15,
        SelectionTimeout::Seconds20,
    ];

    /// Map a persisted millisecond value onto an allowed timeout.
    pub fn from_millis(millis: u64) -> CaptureResult<Self> {
        Self::ALL
            .into_iter()
            .find(|timeout| timeout.as_millis() == millis)
            .ok_or_else(|| {
                CaptureError::config(
                    "selection_timeout",
                    millis.to_string(),
                    "must be one of 5000, 10000, 15000 or 20000 ms",
                )
            })
    }

    pub fn as_millis(self) -> u64 {
        match self {
            Self::Seconds5 => 5_000,
            Self::Seconds10 => 10_000,
            Self::Seconds15 => 15_000,
            Self::Seconds20 => 20_000,
        }
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.as_millis())
    }
}

impl fmt::Display for SelectionTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.as_millis() / 1000)
    }
}

impl FromStr for SelectionTimeout {
    type Err = CaptureError;

    /// Parse `5000`, `5000ms` or `5s`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = |reason: &str| CaptureError::config("selection_timeout", s, reason);

        let millis = if let Some(num) = s.strip_suffix("ms") {
            num.parse::<u64>()
                .map_err(|_| invalid("invalid number of milliseconds"))?
        } else if let Some(num) = s.strip_suffix('s') {
            num.parse::<u64>()
                .map_err(|_| invalid("invalid number of seconds"))?
                .checked_mul(1000)
                .ok_or_else(|| invalid("duration out of range"))?
        } else {
            s.parse::<u64>()
                .map_err(|_| invalid("use milliseconds (5000) or seconds (5s)"))?
        };

        Self::from_millis(millis)
    }
}

/// Configuration for a scroll-capture pipeline.
///
/// # Examples
///
/// ```rust
/// use scroll_capture::config::CaptureConfig;
///
/// let config = CaptureConfig::default();
/// assert_eq!(config.selection_timeout.as_millis(), 5000);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureConfig {
    /// Full display dimensions. Frames, gestures and region clamping all use this.
    pub screen: ScreenSize,

    /// Idle time after the last pointer event before the selection finalizes.
    pub selection_timeout: SelectionTimeout,
}

impl Default for CaptureConfig {
    /// A 1080x2400 portrait display with the 5 second timeout.
    fn default() -> Self {
        Self {
            screen: ScreenSize::new(1080, 2400),
            selection_timeout: SelectionTimeout::default(),
        }
    }
}

impl CaptureConfig {
    pub fn new(screen: ScreenSize, selection_timeout: SelectionTimeout) -> Self {
        Self {
            screen,
            selection_timeout,
        }
    }

    /// Apply a timeout read from an external settings store.
    pub fn with_timeout_millis(mut self, millis: u64) -> CaptureResult<Self> {
        self.selection_timeout = SelectionTimeout::from_millis(millis)?;
        Ok(self)
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> CaptureResult<()> {
        if self.screen.width == 0 {
            return Err(CaptureError::config(
                "screen.width",
                "0",
                "must be greater than 0",
            ));
        }
        if self.screen.height == 0 {
            return Err(CaptureError::config(
                "screen.height",
                "0",
                "must be greater than 0",
            ));
        }
        if i32::try_from(self.screen.width).is_err() || i32::try_from(self.screen.height).is_err()
        {
            return Err(CaptureError::config(
                "screen",
                format!("{}x{}", self.screen.width, self.screen.height),
                "dimensions exceed the addressable pixel range",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CaptureConfig::default();
        assert_eq!(config.screen, ScreenSize::new(1080, 2400));
        assert_eq!(config.selection_timeout, SelectionTimeout::Seconds5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = CaptureConfig::default();

        config.screen.width = 0;
        assert!(config.validate().is_err());
        config.screen.width = 1080;

        config.screen.height = 0;
        assert!(config.validate().is_err());
        config.screen.height = 2400;

        config.screen.height = u32::MAX;
        assert!(config.validate().is_err());
        config.screen.height = 2400;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_timeout_from_settings() {
        for timeout in SelectionTimeout::ALL {
            assert_eq!(SelectionTimeout::from_millis(timeout.as_millis()).ok(), Some(timeout));
        }
        assert!(SelectionTimeout::from_millis(7000).is_err());

        let config = CaptureConfig::default().with_timeout_millis(20_000).unwrap();
        assert_eq!(config.selection_timeout.as_duration(), Duration::from_secs(20));
    }

    #[test]
    fn test_timeout_parsing() {
        assert_eq!("5000".parse::<SelectionTimeout>().ok(), Some(SelectionTimeout::Seconds5));
        assert_eq!("10s".parse::<SelectionTimeout>().ok(), Some(SelectionTimeout::Seconds10));
        assert_eq!("15000ms".parse::<SelectionTimeout>().ok(), Some(SelectionTimeout::Seconds15));
        assert_eq!(" 20s ".parse::<SelectionTimeout>().ok(), Some(SelectionTimeout::Seconds20));

        assert!("3s".parse::<SelectionTimeout>().is_err());
        assert!("fast".parse::<SelectionTimeout>().is_err());
        assert!("1m".parse::<SelectionTimeout>().is_err());
        assert_eq!(SelectionTimeout::Seconds15.to_string(), "15s");
    }
}
