use custodian::presentation::config::ProvisioningSettings;
use custodian::presentation::{Environment, Settings, StorageBackend};
use std::time::Duration;

#[test]
fn given_known_names_when_parsing_environment_then_maps_aliases() {
    assert_eq!(
        Environment::try_from("local".to_string()).unwrap(),
        Environment::Local
    );
    assert_eq!(
        Environment::try_from("Testing".to_string()).unwrap(),
        Environment::Test
    );
    assert_eq!(
        Environment::try_from(" production ".to_string()).unwrap(),
        Environment::Prod
    );
}

#[test]
fn given_unknown_name_when_parsing_environment_then_error_lists_choices() {
    let err = Environment::try_from("staging".to_string()).unwrap_err();

    assert!(err.contains("staging"));
    assert!(err.contains("local, test, or prod"));
}

#[test]
fn given_test_environment_when_loading_settings_then_uses_memory_backend() {
    let settings = Settings::load_from("config", Environment::Test).unwrap();

    assert_eq!(settings.database.backend, StorageBackend::Memory);
    assert_eq!(settings.provisioning.workers, 2);
    assert_eq!(settings.provisioning.instance_id, "test");
    assert_eq!(settings.provisioning.simulated_latency_ms, 0);
}

#[test]
fn given_missing_config_dir_when_loading_settings_then_defaults_apply() {
    let settings = Settings::load_from("does-not-exist", Environment::Prod).unwrap();

    assert_eq!(settings.server.port, 3000);
    assert_eq!(settings.database.backend, StorageBackend::Postgres);
    assert_eq!(settings.provisioning.instance_id, "custodian-0");
    assert!(!settings.provisioning.recover_interrupted_jobs);

    let limits = settings.pagination.page_limits();
    assert_eq!(limits.default_limit, 100);
    assert_eq!(limits.max_limit, 1000);
}

#[test]
fn given_provisioning_settings_when_reading_durations_then_converts_milliseconds() {
    let settings = ProvisioningSettings {
        instance_id: "instance-a".to_string(),
        workers: 1,
        queue_capacity: 1,
        timeout_ms: 1_500,
        simulated_latency_ms: 20,
        recover_interrupted_jobs: true,
    };

    assert_eq!(settings.timeout(), Duration::from_millis(1_500));
    assert_eq!(settings.simulated_latency(), Duration::from_millis(20));
}
