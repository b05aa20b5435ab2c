use questline::Error;
use questline::config::Config;
use questline::model::CharacterClass;

const VARS: [&str; 5] = [
    "QUESTLINE_LOG_LEVEL",
    "OTEL_ENDPOINT",
    "QUESTLINE_NOTIFICATION_TTL_MS",
    "QUESTLINE_ATTRIBUTE_CAP",
    "QUESTLINE_DEFAULT_CLASS",
];

fn clear_vars() {
    for name in VARS {
        unsafe { std::env::remove_var(name) };
    }
}

// Environment variables are process-global, so every env-based case runs
// inside this one test.
#[test]
fn config_from_env() {
    clear_vars();
    let config = Config::from_env().unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.notification_ttl_ms, 5000);
    assert_eq!(config.attribute_cap, 50);
    assert_eq!(config.default_class, CharacterClass::Warrior);

    unsafe {
        std::env::set_var("QUESTLINE_LOG_LEVEL", "debug");
        std::env::set_var("OTEL_ENDPOINT", "http://localhost:4317");
        std::env::set_var("QUESTLINE_NOTIFICATION_TTL_MS", "2500");
        std::env::set_var("QUESTLINE_ATTRIBUTE_CAP", "80");
        std::env::set_var("QUESTLINE_DEFAULT_CLASS", "mage");
    }
    let config = Config::from_env().unwrap();
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.otel_endpoint.as_deref(), Some("http://localhost:4317"));
    assert_eq!(config.notification_ttl_ms, 2500);
    assert_eq!(config.attribute_cap, 80);
    assert_eq!(config.default_class, CharacterClass::Mage);

    unsafe { std::env::set_var("QUESTLINE_NOTIFICATION_TTL_MS", "soon") };
    assert!(matches!(Config::from_env(), Err(Error::Config(_))));

    unsafe {
        std::env::set_var("QUESTLINE_NOTIFICATION_TTL_MS", "2500");
        std::env::set_var("QUESTLINE_DEFAULT_CLASS", "paladin");
    }
    assert!(matches!(Config::from_env(), Err(Error::Config(_))));

    unsafe {
        std::env::set_var("QUESTLINE_DEFAULT_CLASS", "Rogue");
        std::env::set_var("QUESTLINE_ATTRIBUTE_CAP", "0");
    }
    assert!(matches!(Config::from_env(), Err(Error::Config(_))));

    clear_vars();
}

#[test]
fn config_from_toml() {
    let config = Config::from_toml_str(
        r#"
        log_level = "warn"
        notification_ttl_ms = 1000
        default_class = "Bard"
        "#,
    )
    .unwrap();

    assert_eq!(config.log_level, "warn");
    assert_eq!(config.notification_ttl_ms, 1000);
    assert_eq!(config.default_class, CharacterClass::Bard);
    assert_eq!(config.attribute_cap, 50);
    assert_eq!(config.otel_endpoint, None);
}

#[test]
fn empty_toml_gives_defaults() {
    assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
}

#[test]
fn toml_rejects_unknown_keys_and_bad_values() {
    assert!(matches!(
        Config::from_toml_str("database_url = \"x\""),
        Err(Error::Toml(_))
    ));
    assert!(matches!(
        Config::from_toml_str("default_class = \"paladin\""),
        Err(Error::Config(_))
    ));
    assert!(matches!(
        Config::from_toml_str("attribute_cap = -3"),
        Err(Error::Config(_))
    ));
}

#[test]
fn config_from_file() {
    let path = std::env::temp_dir().join(format!("questline-{}.toml", uuid::Uuid::new_v4()));
    std::fs::write(&path, "attribute_cap = 40\n").unwrap();

    let config = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(config.attribute_cap, 40);
}

#[test]
fn missing_file_is_io_error() {
    let result = Config::from_file("/nonexistent/questline.toml");
    assert!(matches!(result, Err(Error::Io(_))));
}
