use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ClaudeConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaudeConfig {
    #[serde(default = "default_executable")]
    pub executable: String,
    #[serde(default = "default_model")]
    pub model: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_executable() -> String {
    "claude".to_string()
}

fn default_model() -> Option<String> {
    Some("haiku".to_string())
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for ClaudeConfig {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClaudeConfig {
    pub fn print_options(&self) -> claude_agent::PrintOptions {
        claude_agent::PrintOptions {
            model: self.model.clone(),
            path_to_executable: Some(self.executable.clone()),
            timeout: Some(Duration::from_secs(self.timeout_secs)),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// AvatarConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_base_url() -> String {
    crate::avatar::DEFAULT_BASE_URL.to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    15
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

// ---------------------------------------------------------------------------
// CacheConfig / RenderConfig / PluginsConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Metadata cache file; relative paths resolve against the project root.
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
}

fn default_cache_path() -> PathBuf {
    PathBuf::from(paths::METADATA_FILE)
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_output() -> PathBuf {
    PathBuf::from("crew.png")
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginsConfig {
    #[serde(default = "default_plugins_enabled")]
    pub enabled: bool,
}

fn default_plugins_enabled() -> bool {
    true
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            enabled: default_plugins_enabled(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub claude: ClaudeConfig,
    #[serde(default)]
    pub avatar: AvatarConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub plugins: PluginsConfig,
}

impl Config {
    /// Load `<root>/.claude/crew.yaml`, or defaults when the file is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn cache_path(&self, root: &Path) -> PathBuf {
        resolve(root, &self.cache.path)
    }

    pub fn output_path(&self, root: &Path) -> PathBuf {
        resolve(root, &self.render.output)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.claude.executable.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "claude.executable is empty".to_string(),
            });
        }

        if self.claude.timeout_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "claude.timeout_secs must be greater than zero".to_string(),
            });
        }

        if !(self.avatar.base_url.starts_with("http://")
            || self.avatar.base_url.starts_with("https://"))
        {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "avatar.base_url '{}' is not an http(s) URL",
                    self.avatar.base_url
                ),
            });
        }

        if self.avatar.fetch_timeout_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "avatar.fetch_timeout_secs is zero; every avatar fetch will time out"
                    .to_string(),
            });
        }

        if self.render.output.extension().and_then(|e| e.to_str()) != Some("png") {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "render.output '{}' does not end in .png",
                    self.render.output.display()
                ),
            });
        }

        warnings
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
