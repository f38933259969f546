use std::fs;

use tempfile::TempDir;

use racetime::{
    config::{ConfigError, RaceConfig, RegistrationPolicy},
    contestant::Registration,
    core::store::RaceStore,
    runtime::handle::{RuntimeConfig, spawn_configured},
    types::Group,
};

#[test]
fn empty_object_yields_defaults() {
    let cfg = RaceConfig::from_json_str("{}").expect("parse");
    assert_eq!(cfg, RaceConfig::default());
    assert_eq!(cfg.registration.id_digits, 6);
    assert_eq!(cfg.registration.group_count, 30);
    assert!(cfg.registration.phone_required);
    assert_eq!(cfg.runtime.poll_interval_ms, 100);
    assert_eq!(cfg.admin_password, None);
}

#[test]
fn file_overrides_selected_fields() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("race.json");
    fs::write(
        &path,
        r#"{
            "registration": { "phone_required": false, "group_count": 12 },
            "admin_password": "963852",
            "runtime": { "poll_interval_ms": 250 }
        }"#,
    )
    .expect("write");

    let cfg = RaceConfig::from_path(&path).expect("load");
    assert_eq!(
        cfg.registration,
        RegistrationPolicy {
            phone_required: false,
            group_count: 12,
            ..RegistrationPolicy::default()
        }
    );
    assert_eq!(cfg.admin_password.as_deref(), Some("963852"));
    assert_eq!(
        cfg.runtime,
        RuntimeConfig {
            poll_interval_ms: 250,
            ..RuntimeConfig::default()
        }
    );

    let store = RaceStore::from_policy(cfg.registration.clone());
    assert!(!store.policy().phone_required);
}

#[test]
fn invalid_values_are_rejected() {
    let cases = [
        r#"{ "registration": { "id_digits": 0 } }"#,
        r#"{ "registration": { "id_digits": 19 } }"#,
        r#"{ "registration": { "group_count": 0 } }"#,
        r#"{ "registration": { "id_max_attempts": 0 } }"#,
        r#"{ "admin_password": "" }"#,
        r#"{ "runtime": { "poll_interval_ms": 0 } }"#,
    ];
    for case in cases {
        assert!(
            matches!(RaceConfig::from_json_str(case), Err(ConfigError::Invalid(_))),
            "accepted {case}"
        );
    }
    assert!(matches!(RaceConfig::from_json_str("{"), Err(ConfigError::Parse(_))));

    let tmp = TempDir::new().expect("tmp");
    assert!(matches!(
        RaceConfig::from_path(tmp.path().join("missing.json")),
        Err(ConfigError::Io(_))
    ));
}

#[tokio::test]
async fn configured_runtime_applies_registration_policy() {
    let cfg = RaceConfig::from_json_str(
        r#"{ "registration": { "phone_required": false, "group_count": 2, "id_digits": 4 } }"#,
    )
    .expect("parse");
    let handle = spawn_configured(&cfg);

    let id = handle
        .register(Registration::new("Alice", Group::new(2).expect("group")))
        .await
        .expect("register without phone");
    assert_eq!(id.as_str().len(), 4);
    assert!(
        handle
            .register(Registration::new("Bob", Group::new(3).expect("group")))
            .await
            .is_err()
    );
    assert_eq!(handle.poll_interval(), std::time::Duration::from_millis(100));
    handle.shutdown().await.expect("shutdown");
}
