//! Scenario 2: Map tracking
//!
//! Mounts the map screen, then walks the simulated route towards the
//! configured alert zone. Each step arrives the way the platform delivers it:
//! the background task posts into the hub's mailbox, and the UI context pumps
//! the mailbox to fan the sample out to the screen.
//!
//! The second half runs the same route on a background thread with no pumping
//! in between, to show that the mailbox keeps only the latest sample.

use std::{sync::Arc, time::Duration};

use vigia_config::AppConfig;
use vigia_contracts::error::VigiaResult;
use vigia_hub::LocationHub;

use crate::{
    mock_platform::{walking_route, MockLocationProvider, RecordingNavigator, SimulatedFeed, ROUTE_START},
    screens::map::{MapScreen, ZoneStatus},
    tracking::{BackgroundLocationTask, TaskEvent},
};

/// Run Scenario 2 against a device that grants location access, or against
/// one that refuses it when `denied` is set.
pub fn run_scenario(config: &AppConfig, denied: bool) -> VigiaResult<()> {
    println!("=== Scenario 2: Map tracking ===");
    println!();

    let hub = LocationHub::create();
    let provider = Arc::new(if denied {
        MockLocationProvider::denied()
    } else {
        MockLocationProvider::granted(ROUTE_START)
    });
    let navigator = Arc::new(RecordingNavigator::new());
    let mut screen = MapScreen::new(hub.clone(), provider.clone(), navigator, config);

    println!("  Status before mount:  {}", screen.status_text()?);
    if let Err(e) = screen.mount() {
        println!("  Mount failed:         {}", e);
        println!("  Status:               {}", screen.status_text()?);
        screen.teardown()?;
        hub.shutdown()?;
        println!();
        println!("  Scenario 2 complete.");
        println!();
        return Ok(());
    }

    println!("  Status after mount:   {}", screen.status_text()?);
    println!("  Background task:      {}", provider.started_tasks().join(", "));
    if let Some(region) = screen.region() {
        println!(
            "  Region:               centre {} span {:.4} x {:.4}",
            region.center(),
            region.latitude_delta,
            region.longitude_delta
        );
    }
    println!();

    let task = BackgroundLocationTask::new(
        config.tracking.task_name.clone(),
        Arc::new(hub.publisher()),
    );

    for (step, sample) in walking_route(4).into_iter().enumerate().skip(1) {
        task.handle(TaskEvent::Locations(vec![sample]));
        let report = hub.pump()?;
        println!(
            "  Step {}: {}  delivered to {} subscriber(s)",
            step,
            sample,
            report.map(|r| r.delivered).unwrap_or(0)
        );
        print_zones(&screen.zones()?);
    }

    task.handle(TaskEvent::Error("GPS signal lost".to_string()));
    println!("  Task error event:     dropped, position unchanged at {}", hub.current()?);
    println!();

    let feed = SimulatedFeed::start(task, walking_route(20), Duration::from_millis(1), false);
    let posted = feed.join();
    let report = hub.pump()?;
    println!(
        "  Unpumped burst:       {} sample(s) posted, {} delivered",
        posted,
        usize::from(report.is_some())
    );
    println!("  Status:               {}", screen.status_text()?);

    if let Some(region) = screen.recenter()? {
        println!("  Re-centred on:        {}", region.center());
    }
    screen.open_info();

    screen.teardown()?;
    println!("  Teardown:             {} subscriber(s) left", hub.subscriber_count()?);
    hub.shutdown()?;

    println!();
    println!("  Scenario 2 complete.");
    println!();
    Ok(())
}

fn print_zones(zones: &[ZoneStatus]) {
    for status in zones {
        println!(
            "          {:<16} {:>8.0} m  {}",
            status.zone.label,
            status.distance_m,
            if status.inside { "INSIDE" } else { "outside" }
        );
    }
}

#[cfg(test)]
mod tests {
    use vigia_config::AppConfig;

    use super::run_scenario;

    #[test]
    fn granted_run_completes() {
        run_scenario(&AppConfig::default(), false).unwrap();
    }

    #[test]
    fn denied_run_completes() {
        run_scenario(&AppConfig::default(), true).unwrap();
    }
}
