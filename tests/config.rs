#[cfg(test)]
mod tests {
    use lsup::libs::channel::Channel;
    use lsup::libs::config::{expand_tilde, Config, ServerConfig, UpdateConfig, RELOAD_KEYS};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    /// Test context to ensure a clean environment for each config test.
    /// It sets up a temporary directory to act as the user's home/appdata directory.
    struct ConfigTestContext {
        _temp_dir: TempDir,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            // Mock the home/appdata directory for cross-platform compatibility.
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            ConfigTestContext { _temp_dir: temp_dir }
        }
    }

    fn sample_config() -> Config {
        Config {
            server: Some(ServerConfig {
                path: None,
                features: vec!["proc-macros".to_string()],
                static_highlighting: true,
                inlay_hints: false,
            }),
            update: Some(UpdateConfig {
                channel: Channel::Nightly,
                repo_owner: "artefaden".to_string(),
                repo_name: "lsup-server".to_string(),
            }),
        }
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_default_config(_ctx: &mut ConfigTestContext) {
        let config = Config::default();
        assert!(config.server.is_none());
        assert!(config.update.is_none());
        // Effective sections fall back to defaults
        assert_eq!(config.update().channel, Channel::Stable);
        assert!(config.server_path().is_none());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_read_nonexistent_config(_ctx: &mut ConfigTestContext) {
        // When no config file exists, read() should return the default config.
        let config = Config::read().unwrap();
        assert!(config.server.is_none());
        assert!(config.update.is_none());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read_config(_ctx: &mut ConfigTestContext) {
        sample_config().save().unwrap();
        let read_config = Config::read().unwrap();
        let server = read_config.server.unwrap();
        let update = read_config.update.unwrap();

        assert_eq!(server.features, vec!["proc-macros".to_string()]);
        assert!(server.static_highlighting);
        assert!(!server.inlay_hints);
        assert_eq!(update.channel, Channel::Nightly);
        assert_eq!(update.repo_owner, "artefaden");
        assert_eq!(update.repo_name, "lsup-server");
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_partial_server_section_falls_back_to_defaults(_ctx: &mut ConfigTestContext) {
        // A hand-edited file may carry an empty or partial section.
        let config: Config = serde_json::from_str(r#"{ "server": {} }"#).unwrap();
        let server = config.server.unwrap();
        assert!(server.path.is_none());
        assert!(server.features.is_empty());
        assert!(server.static_highlighting);
        assert!(server.inlay_hints);

        let config: Config = serde_json::from_str(r#"{ "server": { "inlay_hints": false } }"#).unwrap();
        let server = config.server.unwrap();
        assert!(server.static_highlighting);
        assert!(!server.inlay_hints);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_changed_keys_are_dotted_names(_ctx: &mut ConfigTestContext) {
        let old = sample_config();
        let mut new = sample_config();
        new.server.as_mut().unwrap().inlay_hints = true;
        new.update.as_mut().unwrap().channel = Channel::Stable;

        let changed = old.changed_keys(&new);
        assert_eq!(changed, vec!["server.inlay_hints", "update.channel"]);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_unchanged_snapshots_report_nothing(_ctx: &mut ConfigTestContext) {
        let old = sample_config();
        let new = sample_config();
        assert!(old.changed_keys(&new).is_empty());

        // An explicit section equal to the defaults is not a change either.
        let explicit = Config {
            server: Some(ServerConfig::default()),
            update: None,
        };
        assert!(Config::default().changed_keys(&explicit).is_empty());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_requires_reload_covers_exactly_the_reload_keys(_ctx: &mut ConfigTestContext) {
        for key in RELOAD_KEYS {
            assert!(Config::requires_reload(&[key]), "{} should require a reload", key);
        }
        assert!(!Config::requires_reload(&["update.channel"]));
        assert!(!Config::requires_reload(&["update.repo_owner", "update.repo_name"]));
        assert!(!Config::requires_reload(&[]));
        assert!(Config::requires_reload(&["update.channel", "server.path"]));
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_expand_tilde(ctx: &mut ConfigTestContext) {
        let home = ctx._temp_dir.path().to_str().unwrap().to_string();
        assert_eq!(expand_tilde("~/bin/server"), std::path::PathBuf::from(format!("{}/bin/server", home)));
        assert_eq!(expand_tilde("~"), std::path::PathBuf::from(home));
        assert_eq!(expand_tilde("/usr/local/bin/server"), std::path::PathBuf::from("/usr/local/bin/server"));
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_server_path_expansion(_ctx: &mut ConfigTestContext) {
        let mut config = sample_config();
        config.server.as_mut().unwrap().path = Some("~/custom/lsup-server".to_string());
        let expanded = config.server_path().unwrap();
        assert!(!expanded.to_str().unwrap().starts_with('~'));
        assert!(expanded.to_str().unwrap().ends_with("custom/lsup-server"));
    }
}
