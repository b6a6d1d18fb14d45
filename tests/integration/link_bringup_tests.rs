//! Integration tests for bounded network bring-up.

use waterharvest::app::service::await_link;
use waterharvest::config::SystemConfig;
use waterharvest::error::{CommsError, Error};

use crate::mock_hw::{MockLink, RecordingDelay};

#[test]
fn link_already_up_returns_immediately() {
    let cfg = SystemConfig::default();
    let mut delay = RecordingDelay::default();
    let res = await_link(
        &MockLink::up(),
        &mut delay,
        cfg.link_timeout_secs,
        cfg.link_poll_interval_ms,
    );
    assert!(res.is_ok());
    assert_eq!(delay.total_ms, 0);
}

#[test]
fn link_that_never_comes_up_is_fatal_after_thirty_seconds() {
    let cfg = SystemConfig::default();
    let mut delay = RecordingDelay::default();
    let err = await_link(
        &MockLink::down(),
        &mut delay,
        cfg.link_timeout_secs,
        cfg.link_poll_interval_ms,
    )
    .unwrap_err();

    assert_eq!(err, Error::Comms(CommsError::LinkEstablishmentFailed));
    assert!(err.is_fatal());
    assert_eq!(delay.total_ms, 30_000);
}
