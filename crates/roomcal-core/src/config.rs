use anyhow::Result;
use chrono_tz::Tz;
use config::Config;
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub calendar: CalendarConfig,
    pub layout: LayoutSettings,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// IANA zone name the institution's calendar lives in.
    pub timezone: String,
}

impl CalendarConfig {
    /// ## Summary
    /// Resolves the configured zone name.
    ///
    /// ## Errors
    /// Returns `CoreError::ConfigError` if the name is not a known IANA zone.
    pub fn tz(&self) -> CoreResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| CoreError::ConfigError(format!("calendar.timezone: {e}")))
    }
}

/// Pixel constants for turning column assignments into geometry.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LayoutSettings {
    /// Inset applied on both sides of a full-width event.
    pub margin_px: f32,
    /// Gap between neighboring columns.
    pub gap_px: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            margin_px: 4.0,
            gap_px: 2.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional `roomcal.toml`.
    /// Environment variables (`ROOMCAL_` prefix) take precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Self::load_from(Some("roomcal.toml"))
    }

    /// ## Summary
    /// Same as [`Settings::load`] with an explicit optional file path.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load_from(file: Option<&str>) -> Result<Self> {
        let defaults = LayoutSettings::default();
        let mut builder = Config::builder()
            .set_default("calendar.timezone", "UTC")?
            .set_default("layout.margin_px", f64::from(defaults.margin_px))?
            .set_default("layout.gap_px", f64::from(defaults.gap_px))?
            .set_default("logging.level", "info")?;

        if let Some(path) = file {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix("ROOMCAL")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        tracing::debug!(
            timezone = %settings.calendar.timezone,
            level = %settings.logging.level,
            "Settings loaded"
        );

        Ok(settings)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
