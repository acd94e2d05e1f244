//! Configuration schema.
//!
//! Every section has a `Default` carrying the values the application ships
//! with, so an empty TOML document is a complete configuration.
//!
//! Example:
//! ```toml
//! [map]
//! latitude_delta = 0.0922
//!
//! [tracking]
//! accuracy = "balanced"
//!
//! [[emergency_contacts]]
//! label = "Buenos Aires City Health Ministry"
//! number = "148"
//!
//! [[alert_zones]]
//! id = "village"
//! label = "Reported cases"
//! latitude = 40.729301
//! longitude = -73.996745
//! radius_m = 700.0
//! ```

use serde::{Deserialize, Serialize};

use vigia_contracts::{
    location::{AlertZone, LocationAccuracy},
    outcome::ClassificationOutcome,
};

/// Map view parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Vertical span of the visible region, in degrees.
    pub latitude_delta: f64,

    /// Viewport size, used only for its aspect ratio.
    pub viewport_width: f64,
    pub viewport_height: f64,

    /// Radius of the circle drawn around the user's initial fix, in metres.
    pub own_radius_m: f64,
}

impl MapConfig {
    /// Horizontal span: the latitude span scaled by the viewport aspect ratio.
    pub fn longitude_delta(&self) -> f64 {
        self.latitude_delta * (self.viewport_width / self.viewport_height)
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            latitude_delta: 0.0922,
            viewport_width: 375.0,
            viewport_height: 812.0,
            own_radius_m: 700.0,
        }
    }
}

/// Background tracking parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Name the background task is registered under.
    pub task_name: String,

    pub accuracy: LocationAccuracy,

    /// Refuse to track unless background access is scoped to `always`, on
    /// platforms that report a scope.
    pub require_background_scope: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            task_name: "background-location-task".to_string(),
            accuracy: LocationAccuracy::Balanced,
            require_background_scope: true,
        }
    }
}

/// Questionnaire classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// The outcome every submission receives.
    pub outcome: ClassificationOutcome,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            outcome: ClassificationOutcome::Negative,
        }
    }
}

/// A phone number offered on the high-risk advice view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub label: String,
    pub number: String,
    /// Extra dialling instruction, e.g. which menu option to pick.
    #[serde(default)]
    pub note: Option<String>,
}

/// The top-level structure deserialized from a TOML configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub map: MapConfig,
    pub tracking: TrackingConfig,
    pub classification: ClassificationConfig,
    pub emergency_contacts: Vec<EmergencyContact>,
    pub alert_zones: Vec<AlertZone>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            map: MapConfig::default(),
            tracking: TrackingConfig::default(),
            classification: ClassificationConfig::default(),
            emergency_contacts: vec![
                EmergencyContact {
                    label: "Buenos Aires City Health Ministry".to_string(),
                    number: "148".to_string(),
                    note: None,
                },
                EmergencyContact {
                    label: "Argentina Health Ministry".to_string(),
                    number: "0800-222-1002".to_string(),
                    note: Some("option 1".to_string()),
                },
                EmergencyContact {
                    label: "Buenos Aires City Government".to_string(),
                    number: "107".to_string(),
                    note: None,
                },
            ],
            alert_zones: vec![AlertZone {
                id: "village".to_string(),
                label: "Reported cases".to_string(),
                latitude: 40.729301,
                longitude: -73.996745,
                radius_m: 700.0,
            }],
        }
    }
}
