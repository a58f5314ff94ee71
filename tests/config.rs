#[cfg(test)]
mod tests {
    use dexus::libs::config::{CompanyConfig, Config, ReportConfig, ServerConfig};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ConfigTestContext {
        temp_dir: TempDir,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            ConfigTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server(), ServerConfig::default());
        assert_eq!(config.server().port, 8080);
        assert_eq!(config.report().per_page, 10);
        assert_eq!(config.report().pdf_max_age_hours, 24);
        assert!(config.lookup().api_url.contains("{document}"));
        assert!(config.database_path().is_none());
    }

    #[test]
    fn test_environment_overrides() {
        let vars = env(&[
            ("DEXUS_DB_PATH", "/srv/dexus/data.db"),
            ("DEXUS_HOST", "0.0.0.0"),
            ("DEXUS_PORT", "9090"),
        ]);
        let config = Config::default().with_overrides(|key| vars.get(key).cloned());

        assert_eq!(config.database_path(), Some(PathBuf::from("/srv/dexus/data.db")));
        assert_eq!(config.server().host, "0.0.0.0");
        assert_eq!(config.server().port, 9090);
    }

    #[test]
    fn test_bad_overrides_are_ignored() {
        let vars = env(&[("DEXUS_PORT", "not-a-port"), ("DEXUS_HOST", "  ")]);
        let config = Config {
            server: Some(ServerConfig {
                host: "10.0.0.5".to_string(),
                port: 3000,
            }),
            ..Default::default()
        }
        .with_overrides(|key| vars.get(key).cloned());

        assert_eq!(config.server().host, "10.0.0.5");
        assert_eq!(config.server().port, 3000);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_missing_file_gives_defaults(ctx: &mut ConfigTestContext) {
        let config = Config::read_from(ctx.temp_dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read_back(ctx: &mut ConfigTestContext) {
        let path = ctx.temp_dir.path().join("config.json");
        let config = Config {
            company: Some(CompanyConfig {
                name: "Dexus Consultoria".to_string(),
                document: "11222333000181".to_string(),
                ..Default::default()
            }),
            report: Some(ReportConfig {
                pdf_dir: ctx.temp_dir.path().join("out").to_string_lossy().to_string(),
                per_page: 50,
                pdf_max_age_hours: 2,
            }),
            ..Default::default()
        };

        config.save_to(&path).unwrap();
        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(!saved.contains("\"server\""));

        let loaded = Config::read_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.company().name, "Dexus Consultoria");
        assert_eq!(loaded.pdf_dir().unwrap(), ctx.temp_dir.path().join("out"));
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_partial_file(ctx: &mut ConfigTestContext) {
        let path = ctx.temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"server": {"host": "192.168.0.2", "port": 8181}}"#).unwrap();

        let config = Config::read_from(&path).unwrap();
        assert_eq!(config.server().host, "192.168.0.2");
        assert_eq!(config.report(), ReportConfig::default());
        assert_eq!(config.company(), CompanyConfig::default());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_malformed_file_is_an_error(ctx: &mut ConfigTestContext) {
        let path = ctx.temp_dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(Config::read_from(&path).is_err());
    }
}
