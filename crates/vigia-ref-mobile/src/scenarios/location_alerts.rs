//! Scenario 3: Location alerts
//!
//! The lighter screen: prompt for permission, track in the background and
//! show the latest coordinates as a status line. Runs once on a device that
//! grants `always` access and once on one that only allows foreground use.

use std::sync::Arc;

use vigia_config::AppConfig;
use vigia_contracts::error::VigiaResult;
use vigia_core::traits::LocationSink;
use vigia_hub::LocationHub;

use crate::{
    mock_platform::{MockLocationProvider, ROUTE_END, ROUTE_START},
    screens::alerts::LocationAlertsScreen,
};

pub fn run_scenario(config: &AppConfig) -> VigiaResult<()> {
    println!("=== Scenario 3: Location alerts ===");
    println!();

    let devices = [
        ("always", MockLocationProvider::granted(ROUTE_START)),
        ("when-in-use", MockLocationProvider::when_in_use(ROUTE_START)),
    ];

    for (scope, provider) in devices {
        let hub = LocationHub::create();
        let provider = Arc::new(provider);
        let mut screen =
            LocationAlertsScreen::new(hub.clone(), provider.clone(), config.tracking.clone());

        println!("  Device scope: {}", scope);
        println!("    Status:   {}", screen.status_text()?);
        match screen.mount() {
            Ok(_) => {
                hub.publisher().post(ROUTE_END)?;
                hub.pump()?;
            }
            Err(e) => println!("    Mount:    {}", e),
        }
        println!("    Prompts:  {}", provider.permission_prompts());
        println!("    Status:   {}", screen.status_text()?);
        screen.teardown()?;
        hub.shutdown()?;
    }

    println!();
    println!("  Scenario 3 complete.");
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use vigia_config::AppConfig;

    use super::run_scenario;

    #[test]
    fn scenario_runs() {
        run_scenario(&AppConfig::default()).unwrap();
    }
}
