//! The location state shared by the map and alerts screens.
//!
//! A `LocationView` subscribes itself to the hub on mount, runs the
//! permission and start-up sequence, and keeps the latest position for the
//! screen to render. Teardown reverses both: background updates are stopped
//! and the subscription is removed.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use vigia_config::TrackingConfig;
use vigia_contracts::{
    error::{VigiaError, VigiaResult},
    location::LocationSample,
};
use vigia_core::traits::LocationProvider;
use vigia_hub::{LocationHub, Subscriber};

use crate::{
    screens::user_message,
    tracking::{acquire_location, PermissionMode},
};

/// Text shown until the first position or error arrives.
pub const LOADING_TEXT: &str = "Loading..";

/// What the screen currently knows about the user's position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationSnapshot {
    /// Message for the last mount failure, if any.
    pub error: Option<&'static str>,
    /// The one-shot fix taken on mount.
    pub initial_fix: Option<LocationSample>,
    /// The most recent position: the initial fix, then each hub delivery.
    pub latest: Option<LocationSample>,
    /// Hub deliveries received since mount.
    pub updates: usize,
}

impl LocationSnapshot {
    /// The status line: loading text, the error, or the latest coordinates as JSON.
    pub fn status_text(&self) -> String {
        if let Some(error) = self.error {
            return error.to_string();
        }
        match self.latest {
            None => LOADING_TEXT.to_string(),
            Some(sample) => serde_json::to_string(&sample).unwrap_or_else(|_| sample.to_string()),
        }
    }
}

fn lock_state(state: &Mutex<LocationSnapshot>) -> VigiaResult<MutexGuard<'_, LocationSnapshot>> {
    state.lock().map_err(|e| VigiaError::SubscriberFailed {
        reason: format!("location view state poisoned: {}", e),
    })
}

pub struct LocationView {
    hub: LocationHub,
    provider: Arc<dyn LocationProvider>,
    tracking: TrackingConfig,
    state: Arc<Mutex<LocationSnapshot>>,
    subscriber: Subscriber,
    mounted: bool,
}

impl LocationView {
    pub fn new(
        hub: LocationHub,
        provider: Arc<dyn LocationProvider>,
        tracking: TrackingConfig,
    ) -> Self {
        let state = Arc::new(Mutex::new(LocationSnapshot::default()));
        let sink = Arc::clone(&state);
        let subscriber = Subscriber::new(move |sample: &LocationSample| {
            let mut view = lock_state(&sink)?;
            view.latest = Some(*sample);
            view.updates += 1;
            Ok(())
        });

        Self {
            hub,
            provider,
            tracking,
            state,
            subscriber,
            mounted: false,
        }
    }

    /// Subscribe to the hub and run the start-up sequence.
    ///
    /// A start-up failure is stored as the screen's error message and also
    /// returned. The subscription stays in place either way; `teardown`
    /// removes it.
    pub fn mount(&mut self, mode: PermissionMode) -> VigiaResult<LocationSample> {
        if !self.mounted {
            self.hub.subscribe(self.subscriber.clone())?;
            self.mounted = true;
        }

        match acquire_location(self.provider.as_ref(), &self.tracking, mode) {
            Ok(fix) => {
                let mut view = lock_state(&self.state)?;
                view.error = None;
                view.initial_fix = Some(fix);
                view.latest = Some(fix);
                info!(task = %self.tracking.task_name, "location view mounted");
                Ok(fix)
            }
            Err(e) => {
                warn!(error = %e, "location start-up failed");
                lock_state(&self.state)?.error = Some(user_message(&e));
                Err(e)
            }
        }
    }

    /// Stop background updates and drop the hub subscription.
    ///
    /// Both steps are always attempted; the first error is returned. Safe to
    /// call more than once; later calls do nothing.
    pub fn teardown(&mut self) -> VigiaResult<()> {
        if !self.mounted {
            return Ok(());
        }
        let stopped = self.provider.stop_updates(&self.tracking.task_name);
        if let Err(e) = &stopped {
            warn!(task = %self.tracking.task_name, error = %e, "stopping location updates failed");
        }
        let unsubscribed = self.hub.unsubscribe(&self.subscriber);
        self.mounted = false;

        let removed = unsubscribed?;
        debug!(removed, task = %self.tracking.task_name, "location view torn down");
        stopped
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn snapshot(&self) -> VigiaResult<LocationSnapshot> {
        Ok(lock_state(&self.state)?.clone())
    }

    pub fn status_text(&self) -> VigiaResult<String> {
        Ok(self.snapshot()?.status_text())
    }

    pub fn hub(&self) -> &LocationHub {
        &self.hub
    }
}

impl Drop for LocationView {
    fn drop(&mut self) {
        if let Err(e) = self.teardown() {
            warn!(error = %e, "location view teardown failed on drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use vigia_config::TrackingConfig;
    use vigia_contracts::{error::VigiaError, location::LocationSample};
    use vigia_hub::LocationHub;

    use crate::{
        mock_platform::{MockLocationProvider, ROUTE_END, ROUTE_START},
        tracking::PermissionMode,
    };

    use super::{LocationSnapshot, LocationView, LOADING_TEXT};

    fn view_with(provider: Arc<MockLocationProvider>) -> (LocationHub, LocationView) {
        let hub = LocationHub::create();
        let view = LocationView::new(hub.clone(), provider, TrackingConfig::default());
        (hub, view)
    }

    #[test]
    fn status_starts_loading() {
        assert_eq!(LocationSnapshot::default().status_text(), LOADING_TEXT);
    }

    #[test]
    fn status_renders_coordinates_as_json() {
        let snapshot = LocationSnapshot {
            latest: Some(LocationSample::new(1.5, -2.25)),
            ..LocationSnapshot::default()
        };
        assert_eq!(snapshot.status_text(), r#"{"latitude":1.5,"longitude":-2.25}"#);
    }

    #[test]
    fn error_wins_over_coordinates() {
        let snapshot = LocationSnapshot {
            error: Some("Location permission was denied"),
            latest: Some(ROUTE_START),
            ..LocationSnapshot::default()
        };
        assert_eq!(snapshot.status_text(), "Location permission was denied");
    }

    #[test]
    fn mount_subscribes_and_records_the_fix() {
        let provider = Arc::new(MockLocationProvider::granted(ROUTE_START));
        let (hub, mut view) = view_with(provider);

        assert_eq!(view.mount(PermissionMode::Check).unwrap(), ROUTE_START);
        assert_eq!(hub.subscriber_count().unwrap(), 1);

        let snapshot = view.snapshot().unwrap();
        assert_eq!(snapshot.initial_fix, Some(ROUTE_START));
        assert_eq!(snapshot.latest, Some(ROUTE_START));
        assert_eq!(snapshot.error, None);
    }

    #[test]
    fn hub_deliveries_update_latest() {
        let provider = Arc::new(MockLocationProvider::granted(ROUTE_START));
        let (hub, mut view) = view_with(provider);
        view.mount(PermissionMode::Check).unwrap();

        hub.publish(ROUTE_END).unwrap();

        let snapshot = view.snapshot().unwrap();
        assert_eq!(snapshot.latest, Some(ROUTE_END));
        assert_eq!(snapshot.initial_fix, Some(ROUTE_START));
        assert_eq!(snapshot.updates, 1);
    }

    #[test]
    fn denied_mount_shows_message_but_stays_subscribed() {
        let provider = Arc::new(MockLocationProvider::denied());
        let (hub, mut view) = view_with(provider);

        let result = view.mount(PermissionMode::Check);
        assert!(matches!(result, Err(VigiaError::PermissionDenied { .. })));
        assert_eq!(view.status_text().unwrap(), "Location permission was denied");
        assert_eq!(hub.subscriber_count().unwrap(), 1);
    }

    #[test]
    fn failed_fix_shows_generic_message() {
        let provider = Arc::new(MockLocationProvider::granted(ROUTE_START).failing_fix());
        let (_hub, mut view) = view_with(provider);

        assert!(view.mount(PermissionMode::Check).is_err());
        assert_eq!(view.status_text().unwrap(), "Oops, could not get your location");
    }

    #[test]
    fn teardown_stops_updates_and_unsubscribes() {
        let provider = Arc::new(MockLocationProvider::granted(ROUTE_START));
        let (hub, mut view) = view_with(Arc::clone(&provider));
        view.mount(PermissionMode::Check).unwrap();

        view.teardown().unwrap();
        view.teardown().unwrap();

        assert_eq!(hub.subscriber_count().unwrap(), 0);
        assert_eq!(provider.stopped_tasks(), vec!["background-location-task".to_string()]);
        assert!(!view.is_mounted());

        hub.publish(ROUTE_END).unwrap();
        assert_eq!(view.snapshot().unwrap().updates, 0);
    }

    #[test]
    fn failed_stop_still_unsubscribes() {
        let provider = Arc::new(MockLocationProvider::denied().failing_stop());
        let (hub, mut view) = view_with(provider);
        assert!(view.mount(PermissionMode::Check).is_err());

        let first = view.teardown();
        assert!(matches!(first, Err(VigiaError::LocationUnavailable { .. })));
        assert_eq!(hub.subscriber_count().unwrap(), 0);
        assert!(!view.is_mounted());

        view.teardown().unwrap();
        drop(view);
        assert_eq!(hub.subscriber_count().unwrap(), 0);
    }

    #[test]
    fn dropping_a_mounted_view_unsubscribes() {
        let provider = Arc::new(MockLocationProvider::granted(ROUTE_START));
        let (hub, mut view) = view_with(provider);
        view.mount(PermissionMode::Check).unwrap();
        drop(view);
        assert_eq!(hub.subscriber_count().unwrap(), 0);
    }

    #[test]
    fn remount_does_not_double_subscribe() {
        let provider = Arc::new(MockLocationProvider::granted(ROUTE_START));
        let (hub, mut view) = view_with(provider);
        view.mount(PermissionMode::Check).unwrap();
        view.mount(PermissionMode::Check).unwrap();
        assert_eq!(hub.subscriber_count().unwrap(), 1);
    }
}
