//! End-to-end flow: operator overrides on a local clock, reconciled
//! through the always-local authority stub.

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use ixtime_application::use_cases::{CheckAuthorityHealth, SyncWithAuthority};
use ixtime_application::world_clock::WorldClock;
use ixtime_domain::ClockConfig;
use ixtime_infrastructure::{LocalAuthorityClient, SystemClock};

fn shared_clock() -> Arc<WorldClock<SystemClock>> {
    Arc::new(
        WorldClock::new(ClockConfig::standard(), SystemClock::new())
            .expect("standard schedule must validate"),
    )
}

#[tokio::test]
async fn sync_against_local_stub_clears_operator_overrides() {
    let clock = shared_clock();
    let pin = Utc
        .with_ymd_and_hms(2052, 4, 1, 0, 0, 0)
        .single()
        .expect("valid timestamp");

    clock.set_time_override(pin);
    clock
        .set_multiplier_override(0.0)
        .expect("zero multiplier is a valid pause");
    assert!(clock.is_paused());
    assert_eq!(clock.now(), pin);

    let sync = SyncWithAuthority::new(
        Arc::clone(&clock),
        LocalAuthorityClient::new(Arc::clone(&clock)),
    );
    let snapshot = sync.execute().await.expect("local stub never fails");

    // The stub reported the paused/pinned state, and adopting it cleared
    // the local overrides: the clock is tracking the schedule again.
    assert!(snapshot.is_paused);
    assert!(snapshot.has_time_override);
    let status = clock.status();
    assert!(status.authority_available);
    assert!(!status.has_time_override);
    assert!(!status.has_multiplier_override);
    assert!(!clock.is_paused());
    assert_eq!(status.authority_last_known_world_time, Some(snapshot.world_time));
}

#[tokio::test]
async fn health_probe_never_mutates_clock_state() {
    let clock = shared_clock();
    let pin = Utc
        .with_ymd_and_hms(2052, 4, 1, 0, 0, 0)
        .single()
        .expect("valid timestamp");
    clock.set_time_override(pin);

    let probe = CheckAuthorityHealth::new(LocalAuthorityClient::new(Arc::clone(&clock)));
    let out = probe.execute().await;

    assert!(out.available);
    assert!(clock.status().has_time_override);
}
