//! Loading and validating an `AppConfig`.
//!
//! Parsing only checks shape; `validate` rejects values that parse but make
//! no sense (non-positive spans, empty phone numbers, coordinates off the
//! globe, duplicate zone ids).

use std::{collections::HashSet, path::Path};

use tracing::{debug, info};

use vigia_contracts::{
    error::{VigiaError, VigiaResult},
    location::LocationSample,
};

use crate::schema::AppConfig;

impl AppConfig {
    /// Parse `s` as TOML and validate the result.
    ///
    /// Returns `VigiaError::ConfigError` if the TOML is malformed, does not
    /// match the schema, or fails validation.
    pub fn from_toml_str(s: &str) -> VigiaResult<Self> {
        let config: AppConfig = toml::from_str(s).map_err(|e| VigiaError::ConfigError {
            reason: format!("failed to parse config TOML: {}", e),
        })?;
        config.validate()?;
        debug!(
            contacts = config.emergency_contacts.len(),
            zones = config.alert_zones.len(),
            "configuration parsed"
        );
        Ok(config)
    }

    /// Read the file at `path` and parse it as TOML configuration.
    pub fn from_file(path: &Path) -> VigiaResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| VigiaError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        let config = Self::from_toml_str(&contents)?;
        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Load from `path` when given, otherwise fall back to the defaults.
    pub fn load(path: Option<&Path>) -> VigiaResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Check every value that the schema alone cannot constrain.
    pub fn validate(&self) -> VigiaResult<()> {
        let map = &self.map;
        positive("map.latitude_delta", map.latitude_delta)?;
        positive("map.viewport_width", map.viewport_width)?;
        positive("map.viewport_height", map.viewport_height)?;
        positive("map.own_radius_m", map.own_radius_m)?;

        if self.tracking.task_name.trim().is_empty() {
            return Err(invalid("tracking.task_name must not be empty".to_string()));
        }

        for (i, contact) in self.emergency_contacts.iter().enumerate() {
            if contact.number.trim().is_empty() {
                return Err(invalid(format!(
                    "emergency_contacts[{}] ('{}') has an empty number",
                    i, contact.label
                )));
            }
        }

        let mut seen = HashSet::new();
        for zone in &self.alert_zones {
            if !seen.insert(zone.id.as_str()) {
                return Err(invalid(format!("duplicate alert zone id '{}'", zone.id)));
            }
            if !LocationSample::new(zone.latitude, zone.longitude).is_valid() {
                return Err(invalid(format!(
                    "alert zone '{}' has out-of-range coordinates ({}, {})",
                    zone.id, zone.latitude, zone.longitude
                )));
            }
            positive(&format!("alert zone '{}' radius_m", zone.id), zone.radius_m)?;
        }

        Ok(())
    }
}

fn invalid(reason: String) -> VigiaError {
    VigiaError::ConfigError { reason }
}

fn positive(name: &str, value: f64) -> VigiaResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{} must be a positive number, got {}", name, value)))
    }
}
