//! # vigia-config
//!
//! TOML-driven application configuration for VIGIA.
//!
//! ## Overview
//!
//! [`AppConfig`] holds the map view parameters, the background tracking
//! settings, the fixed classification outcome, the emergency phone numbers
//! shown on the high-risk advice view, and the alert zones drawn on the map.
//! Every field has a default, so the application runs without a file.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use vigia_config::AppConfig;
//!
//! let config = AppConfig::from_file(Path::new("vigia.toml"))?;
//! let lon_delta = config.map.longitude_delta();
//! ```

pub mod loader;
pub mod schema;

pub use schema::{AppConfig, ClassificationConfig, EmergencyContact, MapConfig, TrackingConfig};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use vigia_contracts::{
        error::VigiaError, location::LocationAccuracy, outcome::ClassificationOutcome,
    };

    use crate::AppConfig;

    fn expect_config_error(toml: &str, needle: &str) {
        match AppConfig::from_toml_str(toml) {
            Err(VigiaError::ConfigError { reason }) => {
                assert!(reason.contains(needle), "expected '{needle}' in: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    // ── 1. defaults ───────────────────────────────────────────────────────────

    /// An empty document yields the shipped defaults.
    #[test]
    fn test_empty_document_is_default() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());

        assert_eq!(config.map.latitude_delta, 0.0922);
        assert_eq!(config.map.own_radius_m, 700.0);
        assert_eq!(config.tracking.task_name, "background-location-task");
        assert_eq!(config.tracking.accuracy, LocationAccuracy::Balanced);
        assert_eq!(config.classification.outcome, ClassificationOutcome::Negative);
        assert_eq!(config.emergency_contacts.len(), 3);
        assert_eq!(config.emergency_contacts[0].number, "148");
        assert_eq!(config.alert_zones.len(), 1);
    }

    #[test]
    fn test_default_config_is_valid() {
        AppConfig::default().validate().unwrap();
    }

    #[test]
    fn test_longitude_delta_follows_aspect_ratio() {
        let config = AppConfig::from_toml_str(
            r#"
            [map]
            latitude_delta = 0.1
            viewport_width = 400.0
            viewport_height = 800.0
            "#,
        )
        .unwrap();
        assert!((config.map.longitude_delta() - 0.05).abs() < 1e-12);
    }

    // ── 2. overrides ──────────────────────────────────────────────────────────

    /// Sections given in the file replace the defaults; others are kept.
    #[test]
    fn test_partial_override() {
        let toml = r#"
            [tracking]
            accuracy = "high"
            require_background_scope = false

            [classification]
            outcome = "neutral"

            [[emergency_contacts]]
            label = "Emergencies"
            number = "911"
        "#;

        let config = AppConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.tracking.accuracy, LocationAccuracy::High);
        assert!(!config.tracking.require_background_scope);
        // Unspecified field within a given section keeps its default.
        assert_eq!(config.tracking.task_name, "background-location-task");
        assert_eq!(config.classification.outcome, ClassificationOutcome::Neutral);
        assert_eq!(config.emergency_contacts.len(), 1);
        assert_eq!(config.emergency_contacts[0].note, None);
        // Untouched section keeps its default.
        assert_eq!(config.alert_zones, AppConfig::default().alert_zones);
    }

    #[test]
    fn test_alert_zones_parse() {
        let toml = r#"
            [[alert_zones]]
            id = "obelisco"
            label = "Downtown"
            latitude = -34.6037
            longitude = -58.3816
            radius_m = 500.0

            [[alert_zones]]
            id = "palermo"
            label = "Palermo"
            latitude = -34.5889
            longitude = -58.4307
            radius_m = 900.0
        "#;

        let config = AppConfig::from_toml_str(toml).unwrap();
        let ids: Vec<&str> = config.alert_zones.iter().map(|z| z.id.as_str()).collect();
        assert_eq!(ids, vec!["obelisco", "palermo"]);
    }

    // ── 3. rejection ──────────────────────────────────────────────────────────

    #[test]
    fn test_malformed_toml() {
        expect_config_error("this is not valid toml ][[[", "failed to parse config TOML");
    }

    #[test]
    fn test_unknown_outcome() {
        expect_config_error(
            r#"
            [classification]
            outcome = "catastrophic"
            "#,
            "failed to parse config TOML",
        );
    }

    #[test]
    fn test_non_positive_delta() {
        expect_config_error(
            r#"
            [map]
            latitude_delta = 0.0
            "#,
            "map.latitude_delta",
        );
    }

    #[test]
    fn test_empty_contact_number() {
        expect_config_error(
            r#"
            [[emergency_contacts]]
            label = "Nobody"
            number = "  "
            "#,
            "empty number",
        );
    }

    #[test]
    fn test_zone_out_of_range() {
        expect_config_error(
            r#"
            [[alert_zones]]
            id = "nowhere"
            label = "Nowhere"
            latitude = 123.0
            longitude = 0.0
            radius_m = 100.0
            "#,
            "out-of-range",
        );
    }

    #[test]
    fn test_duplicate_zone_ids() {
        expect_config_error(
            r#"
            [[alert_zones]]
            id = "a"
            label = "A"
            latitude = 1.0
            longitude = 1.0
            radius_m = 100.0

            [[alert_zones]]
            id = "a"
            label = "A again"
            latitude = 2.0
            longitude = 2.0
            radius_m = 100.0
            "#,
            "duplicate alert zone id",
        );
    }

    #[test]
    fn test_missing_file() {
        let result = AppConfig::from_file(std::path::Path::new("/nonexistent/vigia.toml"));
        assert!(matches!(result, Err(VigiaError::ConfigError { .. })));
    }

    #[test]
    fn test_load_without_path_is_default() {
        assert_eq!(AppConfig::load(None).unwrap(), AppConfig::default());
    }
}
