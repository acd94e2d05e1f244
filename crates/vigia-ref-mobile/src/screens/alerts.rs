//! The location alerts screen: a status line and nothing else.

use std::sync::Arc;

use vigia_config::TrackingConfig;
use vigia_contracts::{error::VigiaResult, location::LocationSample};
use vigia_core::traits::LocationProvider;
use vigia_hub::LocationHub;

use crate::{screens::location_view::LocationView, tracking::PermissionMode};

pub struct LocationAlertsScreen {
    location: LocationView,
}

impl LocationAlertsScreen {
    pub fn new(hub: LocationHub, provider: Arc<dyn LocationProvider>, tracking: TrackingConfig) -> Self {
        Self {
            location: LocationView::new(hub, provider, tracking),
        }
    }

    /// Prompt for permission, then start tracking.
    pub fn mount(&mut self) -> VigiaResult<LocationSample> {
        self.location.mount(PermissionMode::Request)
    }

    pub fn teardown(&mut self) -> VigiaResult<()> {
        self.location.teardown()
    }

    pub fn status_text(&self) -> VigiaResult<String> {
        self.location.status_text()
    }
}
