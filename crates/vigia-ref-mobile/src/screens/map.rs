//! The map screen: the user's position, the visible region and the alert
//! zones drawn around it.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use vigia_config::{AppConfig, MapConfig};
use vigia_contracts::{
    error::VigiaResult,
    location::{AlertZone, LocationSample, MapRegion},
};
use vigia_core::traits::{LocationProvider, Navigator, Route};
use vigia_hub::LocationHub;

use crate::{
    screens::location_view::{LocationSnapshot, LocationView},
    tracking::PermissionMode,
};

/// Id of the zone drawn around the user's initial fix.
pub const OWN_ZONE_ID: &str = "own";

/// One zone as seen from the latest position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneStatus {
    pub zone: AlertZone,
    pub distance_m: f64,
    pub inside: bool,
}

impl ZoneStatus {
    fn measure(zone: AlertZone, position: &LocationSample) -> Self {
        let distance_m = zone.center().distance_m(position);
        Self {
            inside: distance_m <= zone.radius_m,
            distance_m,
            zone,
        }
    }
}

/// The region of `map` centred on `center`.
pub fn region_around(center: LocationSample, map: &MapConfig) -> MapRegion {
    MapRegion {
        latitude: center.latitude,
        longitude: center.longitude,
        latitude_delta: map.latitude_delta,
        longitude_delta: map.longitude_delta(),
    }
}

pub struct MapScreen {
    location: LocationView,
    navigator: Arc<dyn Navigator>,
    map: MapConfig,
    alert_zones: Vec<AlertZone>,
    region: Option<MapRegion>,
}

impl MapScreen {
    pub fn new(
        hub: LocationHub,
        provider: Arc<dyn LocationProvider>,
        navigator: Arc<dyn Navigator>,
        config: &AppConfig,
    ) -> Self {
        Self {
            location: LocationView::new(hub, provider, config.tracking.clone()),
            navigator,
            map: config.map.clone(),
            alert_zones: config.alert_zones.clone(),
            region: None,
        }
    }

    /// Check permission without prompting, take a fix, start tracking and
    /// centre the region on the fix.
    pub fn mount(&mut self) -> VigiaResult<LocationSample> {
        let fix = self.location.mount(PermissionMode::Check)?;
        self.region = Some(region_around(fix, &self.map));
        Ok(fix)
    }

    pub fn teardown(&mut self) -> VigiaResult<()> {
        self.location.teardown()
    }

    /// The visible region. `None` until a fix has been taken.
    pub fn region(&self) -> Option<MapRegion> {
        self.region
    }

    /// The user dragged or zoomed the map.
    pub fn move_region(&mut self, region: MapRegion) {
        self.region = Some(region);
    }

    /// Return the region to the initial fix.
    pub fn recenter(&mut self) -> VigiaResult<Option<MapRegion>> {
        if let Some(fix) = self.location.snapshot()?.initial_fix {
            self.region = Some(region_around(fix, &self.map));
            debug!(latitude = fix.latitude, longitude = fix.longitude, "map recentred");
        }
        Ok(self.region)
    }

    /// The user's own zone followed by the configured zones, each measured
    /// from the latest position. Empty until a position is known.
    pub fn zones(&self) -> VigiaResult<Vec<ZoneStatus>> {
        Ok(zones_for(&self.location.snapshot()?, &self.map, &self.alert_zones))
    }

    pub fn status_text(&self) -> VigiaResult<String> {
        self.location.status_text()
    }

    pub fn snapshot(&self) -> VigiaResult<LocationSnapshot> {
        self.location.snapshot()
    }

    /// The info button.
    pub fn open_info(&self) {
        self.navigator.navigate(Route::MapInfo);
    }
}

fn zones_for(
    snapshot: &LocationSnapshot,
    map: &MapConfig,
    alert_zones: &[AlertZone],
) -> Vec<ZoneStatus> {
    let Some(position) = snapshot.latest else {
        return Vec::new();
    };

    let own = snapshot.initial_fix.map(|fix| AlertZone {
        id: OWN_ZONE_ID.to_string(),
        label: "Your location".to_string(),
        latitude: fix.latitude,
        longitude: fix.longitude,
        radius_m: map.own_radius_m,
    });

    own.into_iter()
        .chain(alert_zones.iter().cloned())
        .map(|zone| ZoneStatus::measure(zone, &position))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use vigia_config::{AppConfig, MapConfig};
    use vigia_contracts::location::{LocationSample, MapRegion};
    use vigia_core::traits::Route;
    use vigia_hub::LocationHub;

    use crate::mock_platform::{MockLocationProvider, RecordingNavigator, ROUTE_END, ROUTE_START};

    use super::{region_around, MapScreen, OWN_ZONE_ID};

    fn screen(
        provider: MockLocationProvider,
    ) -> (LocationHub, Arc<MockLocationProvider>, Arc<RecordingNavigator>, MapScreen) {
        let hub = LocationHub::create();
        let provider = Arc::new(provider);
        let navigator = Arc::new(RecordingNavigator::new());
        let screen = MapScreen::new(
            hub.clone(),
            provider.clone(),
            navigator.clone(),
            &AppConfig::default(),
        );
        (hub, provider, navigator, screen)
    }

    #[test]
    fn region_spans_follow_viewport_aspect() {
        let map = MapConfig::default();
        let region = region_around(ROUTE_START, &map);
        assert_eq!(region.latitude_delta, 0.0922);
        assert!((region.longitude_delta - 0.0922 * 375.0 / 812.0).abs() < 1e-12);
        assert_eq!(region.center(), ROUTE_START);
    }

    #[test]
    fn mount_centres_region_on_fix() {
        let (_hub, provider, _nav, mut screen) = screen(MockLocationProvider::granted(ROUTE_START));
        assert_eq!(screen.region(), None);

        screen.mount().unwrap();

        assert_eq!(screen.region().map(|r| r.center()), Some(ROUTE_START));
        assert_eq!(provider.permission_prompts(), 0);
    }

    #[test]
    fn denied_mount_leaves_region_unset() {
        let (_hub, _provider, _nav, mut screen) = screen(MockLocationProvider::denied());
        assert!(screen.mount().is_err());
        assert_eq!(screen.region(), None);
        assert_eq!(screen.status_text().unwrap(), "Location permission was denied");
        assert!(screen.zones().unwrap().is_empty());
    }

    #[test]
    fn recenter_returns_to_initial_fix() {
        let (hub, _provider, _nav, mut screen) = screen(MockLocationProvider::granted(ROUTE_START));
        screen.mount().unwrap();
        hub.publish(ROUTE_END).unwrap();

        screen.move_region(MapRegion {
            latitude: 0.0,
            longitude: 0.0,
            latitude_delta: 1.0,
            longitude_delta: 1.0,
        });
        let region = screen.recenter().unwrap().unwrap();

        assert_eq!(region.center(), ROUTE_START);
    }

    #[test]
    fn own_zone_comes_first_and_moves_out_of_range() {
        let (hub, _provider, _nav, mut screen) = screen(MockLocationProvider::granted(ROUTE_START));
        screen.mount().unwrap();

        let zones = screen.zones().unwrap();
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].zone.id, OWN_ZONE_ID);
        assert_eq!(zones[0].zone.radius_m, 700.0);
        assert!(zones[0].inside);
        assert!(zones[0].distance_m < 1e-6);
        assert!(!zones[1].inside);

        hub.publish(ROUTE_END).unwrap();

        let zones = screen.zones().unwrap();
        assert!(!zones[0].inside);
        assert!(zones[0].distance_m > 2_000.0);
        assert_eq!(zones[1].zone.id, "village");
        assert!(zones[1].inside);
    }

    #[test]
    fn zone_distance_is_great_circle() {
        let (hub, _provider, _nav, mut screen) = screen(MockLocationProvider::granted(ROUTE_START));
        screen.mount().unwrap();
        let probe = LocationSample::new(ROUTE_END.latitude + 0.01, ROUTE_END.longitude);
        hub.publish(probe).unwrap();

        let village = &screen.zones().unwrap()[1];
        // 0.01 degrees of latitude is about 1.11 km.
        assert!((village.distance_m - 1_111.95).abs() < 1.0, "got {}", village.distance_m);
        assert!(!village.inside);
    }

    #[test]
    fn info_button_navigates() {
        let (_hub, _provider, nav, screen) = screen(MockLocationProvider::granted(ROUTE_START));
        screen.open_info();
        assert_eq!(nav.routes(), vec![Route::MapInfo]);
    }

    #[test]
    fn teardown_unsubscribes() {
        let (hub, provider, _nav, mut screen) = screen(MockLocationProvider::granted(ROUTE_START));
        screen.mount().unwrap();
        screen.teardown().unwrap();
        assert_eq!(hub.subscriber_count().unwrap(), 0);
        assert_eq!(provider.stopped_tasks().len(), 1);
    }
}
