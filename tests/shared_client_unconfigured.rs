//! Using the process-wide client before configuring it is a programming
//! error and must fail loudly.

use clubhouse::api::ClubhouseClient;
use clubhouse::config::ConfigError;
use clubhouse::Error;

#[test]
fn test_empty_token_is_rejected() {
    let result = ClubhouseClient::configure("   ");
    assert!(matches!(result, Err(Error::Config(ConfigError::MissingToken))));
    assert!(ClubhouseClient::try_shared().is_none());
}

#[test]
#[should_panic(expected = "must be configured")]
fn test_shared_without_configure_panics() {
    let _ = ClubhouseClient::shared();
}
