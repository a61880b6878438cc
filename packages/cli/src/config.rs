use formcraft_editor::DesignerConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "formcraft.config.json";

/// Formcraft configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding form records and submissions
    #[serde(default = "default_store_dir")]
    pub store_dir: String,

    /// Designer engine settings
    #[serde(default)]
    pub designer: DesignerConfig,
}

fn default_store_dir() -> String {
    ".formcraft".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the store directory
    pub fn get_store_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.store_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            designer: DesignerConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcraft_editor::HistoryPolicy;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "storeDir": "data",
            "designer": { "throttleMs": 1000, "maxHistory": 0, "historyPolicy": "clearOnSave" }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.store_dir, "data");
        assert_eq!(config.designer.throttle_ms, 1000);
        assert_eq!(config.designer.max_history, 0);
        assert_eq!(config.designer.history_policy, HistoryPolicy::ClearOnSave);
    }

    #[test]
    fn test_default_config() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.store_dir, ".formcraft");
        assert_eq!(config.designer, DesignerConfig::default());
    }

    #[test]
    fn test_load_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        let config = Config::load(&cwd).unwrap();
        assert_eq!(config.get_store_dir(&cwd), dir.path().join(".formcraft"));
    }
}
