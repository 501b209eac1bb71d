use city_core::{logging_status, City, CityRepository, CoreConfig, SqliteCityRepository};
use std::path::PathBuf;

#[test]
fn config_deserializes_with_defaults_for_missing_keys() {
    let config: CoreConfig =
        serde_json::from_str(r#"{ "db_path": "/tmp/cities.db" }"#).unwrap();

    assert_eq!(config.db_path, Some(PathBuf::from("/tmp/cities.db")));
    assert_eq!(config.log_level, city_core::default_log_level());
    assert_eq!(config.log_dir, None);
}

#[test]
fn open_connection_starts_logging_and_persists_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig {
        db_path: Some(dir.path().join("cities.db")),
        log_level: "info".to_string(),
        log_dir: Some(dir.path().join("logs")),
    };

    {
        let conn = config.open_connection().unwrap();
        let repo = SqliteCityRepository::try_new(&conn).unwrap();
        repo.save(&City::new("Springfield", "USA", "IL", 60000))
            .unwrap();
    }

    let (level, log_dir) = logging_status().expect("logging should be active");
    assert_eq!(level, "info");
    assert_eq!(log_dir, dir.path().join("logs"));

    let conn = config.open_connection().unwrap();
    let repo = SqliteCityRepository::try_new(&conn).unwrap();
    assert_eq!(repo.find_all().unwrap().len(), 1);
}
