//! Global subscriber installation, kept in its own test binary so the
//! subscriber does not leak into other tests

use aether::config::LoggingConfig;
use aether::logging::init_tracing;

#[test]
fn test_second_init_fails() {
    let config = LoggingConfig {
        level: "warn".to_string(),
        format: "json".to_string(),
    };

    assert!(init_tracing(&config, false).is_ok());
    assert!(init_tracing(&config, false).is_err());
}
