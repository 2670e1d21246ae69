//! Configuration system (layered: defaults < TOML file < env < code).

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::classifier::IntentMatching;
use crate::corpus::loader::DEFAULT_CORPUS;
use crate::error::{CounselError, Result};
use crate::types::GenerationSettings;

/// File name looked up in the working directory and the user config dir.
pub const CONFIG_FILE_NAME: &str = "counselor.toml";

pub const DEFAULT_MODEL: &str = "google:gemini-2.0-flash-001";

/// Tunables of the agent, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentSettings {
    /// Model selector, `provider:model_id`.
    pub model: String,
    /// Corpus location: local path, http(s) URL or `hf://datasets/...`.
    pub corpus: String,
    /// Directory receiving the daily access cache files.
    pub cache_dir: PathBuf,
    pub cache_enabled: bool,
    /// Maximum number of history turns sent to the model; 0 disables the limit.
    pub context_window: usize,
    pub intent_matching: IntentMatching,
    pub retry_attempts: u32,
    pub google_base_url: Option<String>,
    pub generation: GenerationSettings,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            corpus: DEFAULT_CORPUS.to_string(),
            cache_dir: PathBuf::from("cache"),
            cache_enabled: true,
            context_window: 10,
            intent_matching: IntentMatching::default(),
            retry_attempts: 3,
            google_base_url: None,
            generation: GenerationSettings::default(),
        }
    }
}

/// Agent configuration: settings plus provider credentials.
#[derive(Clone, Default)]
pub struct CounselConfig {
    api_keys: HashMap<String, String>,
    base_urls: HashMap<String, String>,
    settings: AgentSettings,
}

impl fmt::Debug for CounselConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let providers: Vec<&str> = self.api_keys.keys().map(String::as_str).collect();
        f.debug_struct("CounselConfig")
            .field("api_keys", &providers)
            .field("base_urls", &self.base_urls)
            .field("settings", &self.settings)
            .finish()
    }
}

impl CounselConfig {
    /// Defaults only, no credentials.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: AgentSettings) -> Self {
        let mut config = Self {
            settings,
            ..Self::default()
        };
        config.sync_base_url();
        config
    }

    /// Load `.env`, the config file and the process environment.
    ///
    /// An explicit `path` must exist; otherwise `counselor.toml` in the
    /// working directory, then in the user config directory, is used when
    /// present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        let settings = match path {
            Some(p) => read_settings_file(p)?,
            None => match default_config_path() {
                Some(p) => read_settings_file(&p)?,
                None => AgentSettings::default(),
            },
        };

        let mut config = Self::with_settings(settings);
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Overlay environment variables resolved through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        for env_var in ["GOOGLE_API_KEY", "GEMINI_API_KEY"] {
            if let Some(key) = lookup(env_var).filter(|k| !k.is_empty()) {
                self.set_api_key("google", key);
                break;
            }
        }
        if let Some(url) = lookup("GOOGLE_BASE_URL") {
            self.settings.google_base_url = Some(url);
        }
        if let Some(model) = lookup("COUNSELOR_MODEL") {
            self.settings.model = model;
        }
        if let Some(corpus) = lookup("COUNSELOR_CORPUS") {
            self.settings.corpus = corpus;
        }
        if let Some(dir) = lookup("COUNSELOR_CACHE_DIR") {
            self.settings.cache_dir = PathBuf::from(dir);
        }
        if let Some(window) = lookup("COUNSELOR_CONTEXT_WINDOW") {
            self.settings.context_window = window.trim().parse().map_err(|_| {
                CounselError::Configuration(format!(
                    "COUNSELOR_CONTEXT_WINDOW must be a non-negative integer, got '{window}'"
                ))
            })?;
        }
        if let Some(matching) = lookup("COUNSELOR_INTENT_MATCHING") {
            self.settings.intent_matching = matching.trim().parse().map_err(|_| {
                CounselError::Configuration(format!(
                    "COUNSELOR_INTENT_MATCHING must be 'strict' or 'substring', got '{matching}'"
                ))
            })?;
        }
        self.sync_base_url();
        Ok(())
    }

    fn sync_base_url(&mut self) {
        if let Some(url) = self.settings.google_base_url.clone() {
            self.set_base_url("google", url);
        }
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut AgentSettings {
        &mut self.settings
    }

    pub fn set_api_key(&mut self, provider: &str, key: String) {
        self.api_keys.insert(provider.to_string(), key);
    }

    pub fn get_api_key(&self, provider: &str) -> Option<String> {
        self.api_keys.get(provider).cloned()
    }

    pub fn set_base_url(&mut self, provider: &str, url: String) {
        self.base_urls.insert(provider.to_string(), url);
    }

    pub fn get_base_url(&self, provider: &str) -> Option<String> {
        self.base_urls.get(provider).cloned()
    }
}

fn read_settings_file(path: &Path) -> Result<AgentSettings> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        CounselError::Configuration(format!("cannot read {}: {e}", path.display()))
    })?;
    parse_settings(&raw)
        .map_err(|e| CounselError::Configuration(format!("{}: {e}", path.display())))
}

/// Parse settings from TOML text.
pub fn parse_settings(raw: &str) -> std::result::Result<AgentSettings, toml::de::Error> {
    toml::from_str(raw)
}

fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }
    directories::ProjectDirs::from("", "", "counselor")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
        .filter(|p| p.is_file())
}
