//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_CONFIG_FILES: [&str; 2] = ["toolgate.toml", ".toolgate.toml"];

/// Environment variables and the config keys they override
const ENV_OVERRIDES: [(&str, &str); 6] = [
    ("ARCADE_API_KEY", "arcade.api_key"),
    ("ARCADE_USER_ID", "arcade.user_id"),
    ("ARCADE_BASE_URL", "arcade.base_url"),
    ("OPENAI_API_KEY", "openai.api_key"),
    ("OPENAI_MODEL", "openai.model"),
    ("OPENAI_BASE_URL", "openai.base_url"),
];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (`ARCADE_*`, `OPENAI_*`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./toolgate.toml` or `./.toolgate.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/toolgate/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path, Self::project_config_path().as_deref())
            .merge(Self::env_provider())
            .extract()
            .map_err(Box::new)
    }

    /// Files only, no environment (for --no-config this is skipped entirely)
    fn figment(config_path: Option<&PathBuf>, project: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = project {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment
    }

    fn env_provider() -> Env {
        let vars: Vec<&str> = ENV_OVERRIDES.iter().map(|(var, _)| *var).collect();
        Env::raw().only(&vars).map(|key| {
            match ENV_OVERRIDES
                .iter()
                .find(|(var, _)| key.as_str().eq_ignore_ascii_case(var))
            {
                Some((_, path)) => (*path).into(),
                None => key.as_str().into(),
            }
        })
    }

    /// Defaults plus environment only (for --no-config)
    pub fn load_defaults() -> Result<FileConfig, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Self::env_provider())
            .extract()
            .map_err(Box::new)
    }

    /// `$XDG_CONFIG_HOME/toolgate/config.toml`, falling back to
    /// `~/.config/toolgate/config.toml`
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("toolgate").join("config.toml"))
    }

    /// The project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources() {
        println!("Configuration sources (in priority order):");
        println!("  [ENV  ] {}", ENV_OVERRIDES.map(|(var, _)| var).join(", "));

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./toolgate.toml or ./.toolgate.toml");
        }

        if let Some(path) = Self::global_config_path() {
            let marker = if path.exists() { "FOUND" } else { "     " };
            println!("  [{}] Global:  {}", marker, path.display());
        }

        println!("  [     ] Default: built-in defaults");
    }
}
