//! Simulated platform services for the VIGIA reference screens.
//!
//! Everything here stands in for a phone: a location service with scripted
//! permissions and fixes, a dialer that can be told to fail, a navigator that
//! remembers where it was sent, and a background feed that replays a walking
//! route through a `BackgroundLocationTask` on its own thread. No real device
//! API is touched.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use tracing::debug;

use vigia_contracts::{
    error::{VigiaError, VigiaResult},
    location::{LocationAccuracy, LocationSample, PermissionGrant, PermissionScope, PermissionStatus},
};
use vigia_core::traits::{Dialer, LocationProvider, Navigator, Route};

use crate::tracking::{BackgroundLocationTask, TaskEvent};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Route data ────────────────────────────────────────────────────────────────

/// Where the simulated walk starts: lower Manhattan.
pub const ROUTE_START: LocationSample = LocationSample {
    latitude: 40.710065,
    longitude: -74.013714,
};

/// Where the simulated walk ends: inside the default alert zone.
pub const ROUTE_END: LocationSample = LocationSample {
    latitude: 40.729301,
    longitude: -73.996745,
};

/// `steps + 1` evenly spaced samples from `ROUTE_START` to `ROUTE_END`.
pub fn walking_route(steps: usize) -> Vec<LocationSample> {
    let steps = steps.max(1);
    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            LocationSample::new(
                ROUTE_START.latitude + (ROUTE_END.latitude - ROUTE_START.latitude) * t,
                ROUTE_START.longitude + (ROUTE_END.longitude - ROUTE_START.longitude) * t,
            )
        })
        .collect()
}

// ── Location provider ─────────────────────────────────────────────────────────

#[derive(Debug)]
struct ProviderState {
    grant: PermissionGrant,
    position: Option<LocationSample>,
    fail_start: bool,
    fail_stop: bool,
    prompts: u32,
    started: Vec<String>,
    stopped: Vec<String>,
}

/// A `LocationProvider` with scripted answers.
#[derive(Debug)]
pub struct MockLocationProvider {
    state: Mutex<ProviderState>,
}

impl MockLocationProvider {
    /// Answers every query with `grant`. `position = None` makes fixes fail.
    pub fn with_grant(grant: PermissionGrant, position: Option<LocationSample>) -> Self {
        Self {
            state: Mutex::new(ProviderState {
                grant,
                position,
                fail_start: false,
                fail_stop: false,
                prompts: 0,
                started: Vec::new(),
                stopped: Vec::new(),
            }),
        }
    }

    /// Granted with `always` scope, fixing at `position`.
    pub fn granted(position: LocationSample) -> Self {
        Self::with_grant(
            PermissionGrant {
                status: PermissionStatus::Granted,
                scope: Some(PermissionScope::Always),
            },
            Some(position),
        )
    }

    pub fn denied() -> Self {
        Self::with_grant(
            PermissionGrant {
                status: PermissionStatus::Denied,
                scope: Some(PermissionScope::None),
            },
            None,
        )
    }

    /// Granted, but only while the app is in use.
    pub fn when_in_use(position: LocationSample) -> Self {
        Self::with_grant(
            PermissionGrant {
                status: PermissionStatus::Granted,
                scope: Some(PermissionScope::WhenInUse),
            },
            Some(position),
        )
    }

    /// Make `current_position` fail.
    pub fn failing_fix(self) -> Self {
        lock(&self.state).position = None;
        self
    }

    /// Make `start_updates` fail.
    pub fn failing_start(self) -> Self {
        lock(&self.state).fail_start = true;
        self
    }

    /// Make `stop_updates` fail, as platforms do for a task never started.
    pub fn failing_stop(self) -> Self {
        lock(&self.state).fail_stop = true;
        self
    }

    pub fn started_tasks(&self) -> Vec<String> {
        lock(&self.state).started.clone()
    }

    pub fn stopped_tasks(&self) -> Vec<String> {
        lock(&self.state).stopped.clone()
    }

    pub fn permission_prompts(&self) -> u32 {
        lock(&self.state).prompts
    }
}

impl LocationProvider for MockLocationProvider {
    fn permissions(&self) -> VigiaResult<PermissionGrant> {
        Ok(lock(&self.state).grant)
    }

    fn request_permissions(&self) -> VigiaResult<PermissionGrant> {
        let mut state = lock(&self.state);
        state.prompts += 1;
        Ok(state.grant)
    }

    fn current_position(&self) -> VigiaResult<LocationSample> {
        lock(&self.state)
            .position
            .ok_or_else(|| VigiaError::LocationUnavailable {
                reason: "no position fix available".to_string(),
            })
    }

    fn start_updates(&self, task_name: &str, accuracy: LocationAccuracy) -> VigiaResult<()> {
        let mut state = lock(&self.state);
        if state.fail_start {
            return Err(VigiaError::LocationUnavailable {
                reason: "location updates could not be started".to_string(),
            });
        }
        debug!(task = task_name, ?accuracy, "mock updates started");
        state.started.push(task_name.to_string());
        Ok(())
    }

    fn stop_updates(&self, task_name: &str) -> VigiaResult<()> {
        let mut state = lock(&self.state);
        if state.fail_stop {
            return Err(VigiaError::LocationUnavailable {
                reason: format!("task '{}' is not registered", task_name),
            });
        }
        state.stopped.push(task_name.to_string());
        Ok(())
    }
}

// ── Dialer ────────────────────────────────────────────────────────────────────

/// A `Dialer` that records URLs, or fails every call.
#[derive(Debug, Default)]
pub struct MockDialer {
    fail: bool,
    dialled: Mutex<Vec<String>>,
}

impl MockDialer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dialer on a device without telephony.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn dialled(&self) -> Vec<String> {
        lock(&self.dialled).clone()
    }
}

impl Dialer for MockDialer {
    fn open_url(&self, url: &str) -> VigiaResult<()> {
        if self.fail {
            return Err(VigiaError::DialFailed {
                number: url.trim_start_matches("tel:").to_string(),
                reason: "device cannot place calls".to_string(),
            });
        }
        lock(&self.dialled).push(url.to_string());
        Ok(())
    }
}

// ── Navigator ─────────────────────────────────────────────────────────────────

/// A `Navigator` that remembers every route it was sent to.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<Route> {
        lock(&self.routes).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        debug!(?route, "navigate");
        lock(&self.routes).push(route);
    }
}

// ── Background feed ───────────────────────────────────────────────────────────

/// Replays a route into a `BackgroundLocationTask` from a separate thread,
/// one sample per `interval`, the way the platform would wake the task.
pub struct SimulatedFeed {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<usize>>,
}

impl SimulatedFeed {
    /// Start replaying `route`. With `repeat`, the route loops until stopped.
    pub fn start(
        task: BackgroundLocationTask,
        route: Vec<LocationSample>,
        interval: Duration,
        repeat: bool,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            let mut delivered = 0;
            if route.is_empty() {
                return delivered;
            }
            'feed: loop {
                for sample in &route {
                    if flag.load(Ordering::Relaxed) {
                        break 'feed;
                    }
                    if task.handle(TaskEvent::Locations(vec![*sample])).is_some() {
                        delivered += 1;
                    }
                    thread::sleep(interval);
                }
                if !repeat {
                    break;
                }
            }
            delivered
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Stop the feed and return how many samples were posted.
    pub fn stop(mut self) -> usize {
        self.stop.store(true, Ordering::Relaxed);
        self.handle
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or(0)
    }

    /// Wait for a non-repeating feed to run out and return how many samples
    /// were posted.
    pub fn join(mut self) -> usize {
        self.handle
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or(0)
    }
}

impl Drop for SimulatedFeed {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
