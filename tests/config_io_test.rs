use strompris::config::Config;

#[test]
fn save_and_reload_yaml() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    let mut config = Config::default();
    config.settings_path = "/var/lib/strompris/data.json".to_string();
    config.pricing.rebate_threshold = 0.75;
    config.http.timeout_seconds = 10;
    config.save_to_file(tmp.path()).unwrap();

    let loaded = Config::from_file(tmp.path()).unwrap();
    assert_eq!(loaded.settings_path, "/var/lib/strompris/data.json");
    assert!((loaded.pricing.rebate_threshold - 0.75).abs() < f64::EPSILON);
    assert_eq!(loaded.http.timeout_seconds, 10);
    assert!(loaded.validate().is_ok());
}

#[test]
fn invalid_yaml_is_reported() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(tmp.path(), "pricing: [not, a, map]\n").unwrap();
    assert!(Config::from_file(tmp.path()).is_err());
}

#[test]
fn invalid_policy_fails_validation() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(tmp.path(), "pricing:\n  vat_multiplier: 0.5\n").unwrap();
    let config = Config::from_file(tmp.path()).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn example_config_is_valid() {
    let config = Config::from_file(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/strompris.example.yaml"
    ))
    .unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.pricing.currency, "NOK");
    assert_eq!(config.pricing.day_start_hour, 6);
}
