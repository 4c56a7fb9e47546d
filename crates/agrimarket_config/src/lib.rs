use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::Path;
use tracing::debug;

pub mod models;
pub use models::*;

/// Prefix for environment overrides, e.g. `AGRI__API__BASE_URL`.
pub const ENV_PREFIX: &str = "AGRI";

/// Loads the application configuration rooted at the current working directory.
///
/// Sources are layered in this order, later ones winning:
/// `config/default`, `config/<RUN_ENV>` and `AGRI__*` environment variables.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let cwd = env::current_dir()
        .map_err(|err| ConfigError::Message(format!("cannot resolve working directory: {err}")))?;
    load_config_from(&cwd)
}

/// Loads the application configuration with `config/` resolved under `root`.
pub fn load_config_from(root: &Path) -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());

    let default_path = root.join("config/default");
    let env_path = root.join(format!("config/{run_env}"));

    debug!(
        default_path = %default_path.display(),
        env_path = %env_path.display(),
        "loading configuration"
    );

    let builder = Config::builder()
        .add_source(File::from(default_path).required(false))
        .add_source(File::from(env_path).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let config: AppConfig = builder.build()?.try_deserialize()?;
    validate(config)
}

fn validate(config: AppConfig) -> Result<AppConfig, ConfigError> {
    if config.api.base_url.trim().is_empty() {
        return Err(ConfigError::Message("api.base_url must not be empty".to_string()));
    }
    Ok(config)
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The file named by `DOTENV_OVERRIDE` is used when set, `.env` otherwise.
/// Loading happens at most once per process; the chosen path is returned.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_layered_files() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join("config");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(
            config_dir.join("default.toml"),
            "[api]\nbase_url = \"https://api.example.com/v1\"\ntimeout_secs = 10\n",
        )
        .unwrap();

        let config = load_config_from(dir.path()).unwrap();
        assert_eq!(config.api.base_url, "https://api.example.com/v1");
        assert_eq!(config.api.timeout_secs, 10);
        assert!(config.api.follow_redirects);
        assert_eq!(config.storage.path, ".agrimarket/storage.json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn rejects_empty_base_url() {
        let config = AppConfig {
            api: ApiConfig::new("  "),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        };
        assert!(validate(config).is_err());
    }
}
