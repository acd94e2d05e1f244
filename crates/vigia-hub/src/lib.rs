//! # vigia-hub
//!
//! The location broadcast hub that decouples the background location task
//! from the map screens.
//!
//! ## Overview
//!
//! The background task posts samples through a `LocationPublisher` into a
//! single-slot mailbox. The UI context calls `LocationHub::pump()`, which
//! takes the pending sample, stores it as the hub's current sample and calls
//! every subscriber in registration order.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vigia_hub::{LocationHub, Subscriber};
//! use vigia_core::traits::LocationSink;
//!
//! let hub = LocationHub::create();
//! let publisher = hub.publisher();          // hand to the background task
//!
//! let on_update = Subscriber::new(|sample| { redraw(sample); Ok(()) });
//! hub.subscribe(on_update.clone())?;        // screen mount
//!
//! publisher.post(sample)?;                  // background context
//! hub.pump()?;                              // UI context
//!
//! hub.unsubscribe(&on_update)?;             // screen teardown
//! hub.shutdown()?;
//! ```

pub mod hub;
pub mod mailbox;

pub use hub::{DeliveryReport, LocationHub, Subscriber};
pub use mailbox::LocationPublisher;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::thread;

    use vigia_contracts::{error::VigiaError, location::LocationSample};
    use vigia_core::traits::LocationSink;

    use super::{LocationHub, Subscriber};

    // ── Helpers ───────────────────────────────────────────────────────────────

    type CallLog = Arc<Mutex<Vec<(String, LocationSample)>>>;

    /// A subscriber that appends `(name, sample)` to `log` on every call.
    fn recording(name: &str, log: &CallLog) -> Subscriber {
        let name = name.to_string();
        let log = Arc::clone(log);
        Subscriber::new(move |sample| {
            log.lock().unwrap().push((name.clone(), *sample));
            Ok(())
        })
    }

    fn names(log: &CallLog) -> Vec<String> {
        log.lock().unwrap().iter().map(|(n, _)| n.clone()).collect()
    }

    fn sample(lat: f64, lon: f64) -> LocationSample {
        LocationSample::new(lat, lon)
    }

    // ── Fan-out ───────────────────────────────────────────────────────────────

    /// Subscribers registered A, B, C are called A, B, C with the same sample.
    #[test]
    fn test_fan_out_in_registration_order() {
        let hub = LocationHub::create();
        let log = CallLog::default();
        hub.subscribe(recording("A", &log)).unwrap();
        hub.subscribe(recording("B", &log)).unwrap();
        hub.subscribe(recording("C", &log)).unwrap();

        let s = sample(-34.6037, -58.3816);
        let report = hub.publish(s).unwrap();

        assert_eq!(names(&log), vec!["A", "B", "C"]);
        assert!(log.lock().unwrap().iter().all(|(_, got)| *got == s));
        assert_eq!(report.delivered, 3);
        assert_eq!(report.failed, 0);
        assert_eq!(report.sample, s);
    }

    /// A subscriber registered twice is called twice.
    #[test]
    fn test_duplicate_registration_is_not_deduplicated() {
        let hub = LocationHub::create();
        let log = CallLog::default();
        let a = recording("A", &log);
        hub.subscribe(a.clone()).unwrap();
        hub.subscribe(a).unwrap();

        hub.publish(sample(1.0, 1.0)).unwrap();
        assert_eq!(names(&log), vec!["A", "A"]);
    }

    /// New subscribers are not replayed the current sample.
    #[test]
    fn test_subscribe_does_not_replay_current_sample() {
        let hub = LocationHub::create();
        hub.publish(sample(10.0, 20.0)).unwrap();

        let log = CallLog::default();
        hub.subscribe(recording("late", &log)).unwrap();
        assert!(log.lock().unwrap().is_empty());

        hub.publish(sample(11.0, 21.0)).unwrap();
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    /// A failing subscriber does not stop delivery to later ones.
    #[test]
    fn test_failing_subscriber_is_isolated() {
        let hub = LocationHub::create();
        let log = CallLog::default();
        hub.subscribe(recording("A", &log)).unwrap();
        hub.subscribe(Subscriber::new(|_| {
            Err(VigiaError::SubscriberFailed {
                reason: "render failed".to_string(),
            })
        }))
        .unwrap();
        hub.subscribe(recording("C", &log)).unwrap();

        let report = hub.publish(sample(0.5, 0.5)).unwrap();

        assert_eq!(names(&log), vec!["A", "C"]);
        assert_eq!(report.delivered, 2);
        assert_eq!(report.failed, 1);
    }

    /// A subscriber may unsubscribe itself from inside its own callback.
    #[test]
    fn test_unsubscribe_from_inside_callback() {
        let hub = LocationHub::create();
        let calls = Arc::new(Mutex::new(0u32));

        let slot: Arc<Mutex<Option<Subscriber>>> = Arc::default();
        let once = {
            let hub = hub.clone();
            let calls = Arc::clone(&calls);
            let slot = Arc::clone(&slot);
            Subscriber::new(move |_| {
                *calls.lock().unwrap() += 1;
                if let Some(me) = slot.lock().unwrap().as_ref() {
                    hub.unsubscribe(me)?;
                }
                Ok(())
            })
        };
        *slot.lock().unwrap() = Some(once.clone());
        hub.subscribe(once).unwrap();

        hub.publish(sample(1.0, 2.0)).unwrap();
        hub.publish(sample(3.0, 4.0)).unwrap();

        assert_eq!(*calls.lock().unwrap(), 1);
        assert_eq!(hub.subscriber_count().unwrap(), 0);
    }

    // ── Unsubscribe ───────────────────────────────────────────────────────────

    /// Subscribing [A, B, A] then unsubscribing A leaves exactly [B].
    #[test]
    fn test_unsubscribe_removes_all_matching_registrations() {
        let hub = LocationHub::create();
        let log = CallLog::default();
        let a = recording("A", &log);
        let b = recording("B", &log);
        hub.subscribe(a.clone()).unwrap();
        hub.subscribe(b).unwrap();
        hub.subscribe(a.clone()).unwrap();

        let removed = hub.unsubscribe(&a).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(hub.subscriber_count().unwrap(), 1);

        hub.publish(sample(2.0, 2.0)).unwrap();
        assert_eq!(names(&log), vec!["B"]);
    }

    /// Identity is by reference, not by behaviour.
    #[test]
    fn test_unsubscribe_matches_by_reference_only() {
        let hub = LocationHub::create();
        let log = CallLog::default();
        hub.subscribe(recording("A", &log)).unwrap();

        // Same name, same behaviour, different allocation.
        let lookalike = recording("A", &log);
        assert_eq!(hub.unsubscribe(&lookalike).unwrap(), 0);
        assert_eq!(hub.subscriber_count().unwrap(), 1);
    }

    #[test]
    fn test_unsubscribe_unknown_is_a_no_op() {
        let hub = LocationHub::create();
        let stranger = Subscriber::new(|_| Ok(()));
        assert_eq!(hub.unsubscribe(&stranger).unwrap(), 0);
    }

    // ── Latest-only ───────────────────────────────────────────────────────────

    #[test]
    fn test_initial_sample_is_origin() {
        let hub = LocationHub::create();
        assert_eq!(hub.current().unwrap(), LocationSample::default());
    }

    /// Publishing S1 then S2 leaves S2 as the only retrievable sample.
    #[test]
    fn test_retains_latest_only() {
        let hub = LocationHub::create();
        let s1 = sample(40.710065, -74.013714);
        let s2 = sample(40.729301, -73.996745);
        hub.publish(s1).unwrap();
        hub.publish(s2).unwrap();
        assert_eq!(hub.current().unwrap(), s2);
    }

    // ── Mailbox and pump ──────────────────────────────────────────────────────

    /// Posting does not call subscribers; pumping does.
    #[test]
    fn test_post_defers_delivery_until_pump() {
        let hub = LocationHub::create();
        let log = CallLog::default();
        hub.subscribe(recording("map", &log)).unwrap();

        let publisher = hub.publisher();
        publisher.post(sample(5.0, 6.0)).unwrap();
        assert!(log.lock().unwrap().is_empty());
        assert!(publisher.has_pending().unwrap());

        let report = hub.pump().unwrap().expect("a sample was pending");
        assert_eq!(report.sample, sample(5.0, 6.0));
        assert_eq!(names(&log), vec!["map"]);
        assert!(!publisher.has_pending().unwrap());

        // Nothing pending: pump is a no-op.
        assert!(hub.pump().unwrap().is_none());
    }

    /// Two posts before one pump deliver only the second.
    #[test]
    fn test_mailbox_keeps_latest_post() {
        let hub = LocationHub::create();
        let log = CallLog::default();
        hub.subscribe(recording("map", &log)).unwrap();

        let publisher = hub.publisher();
        publisher.post(sample(1.0, 1.0)).unwrap();
        publisher.post(sample(2.0, 2.0)).unwrap();
        hub.pump().unwrap();

        let calls = log.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, sample(2.0, 2.0));
    }

    /// Posts from another thread are delivered on the pumping thread.
    #[test]
    fn test_post_from_background_thread() {
        let hub = LocationHub::create();
        let pumping_thread = thread::current().id();
        let seen_on: Arc<Mutex<Vec<thread::ThreadId>>> = Arc::default();
        {
            let seen_on = Arc::clone(&seen_on);
            hub.subscribe(Subscriber::new(move |_| {
                seen_on.lock().unwrap().push(thread::current().id());
                Ok(())
            }))
            .unwrap();
        }

        let publisher = hub.publisher();
        thread::spawn(move || publisher.post(LocationSample::new(7.0, 8.0)))
            .join()
            .unwrap()
            .unwrap();

        hub.pump().unwrap();
        assert_eq!(hub.current().unwrap(), sample(7.0, 8.0));
        assert_eq!(*seen_on.lock().unwrap(), vec![pumping_thread]);
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    #[test]
    fn test_shutdown_closes_every_entry_point() {
        let hub = LocationHub::create();
        let log = CallLog::default();
        hub.subscribe(recording("map", &log)).unwrap();
        let publisher = hub.publisher();
        publisher.post(sample(1.0, 1.0)).unwrap();

        hub.shutdown().unwrap();

        assert!(!hub.is_open());
        assert_eq!(hub.subscriber_count().unwrap(), 0);
        assert!(matches!(
            publisher.post(sample(2.0, 2.0)),
            Err(VigiaError::HubShutdown { .. })
        ));
        assert!(matches!(
            hub.publish(sample(3.0, 3.0)),
            Err(VigiaError::HubShutdown { .. })
        ));
        assert!(matches!(
            hub.subscribe(recording("late", &log)),
            Err(VigiaError::HubShutdown { .. })
        ));
        // The pending sample was discarded, not delivered.
        assert!(hub.pump().unwrap().is_none());
        assert!(log.lock().unwrap().is_empty());
    }

    /// Clones share one hub.
    #[test]
    fn test_clones_share_state() {
        let hub = LocationHub::create();
        let screen_handle = hub.clone();
        screen_handle.subscribe(Subscriber::new(|_| Ok(()))).unwrap();
        hub.publish(sample(9.0, 9.0)).unwrap();

        assert_eq!(hub.subscriber_count().unwrap(), 1);
        assert_eq!(screen_handle.current().unwrap(), sample(9.0, 9.0));
    }
}
