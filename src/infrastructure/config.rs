use crate::domain::error::FyError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    pub http_proxy: Option<String>,
    #[serde(default = "default_to_language")]
    pub to_language: String,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub youdao: YoudaoConfig,
    #[serde(default)]
    pub baidu: BaiduConfig,
    #[serde(default)]
    pub tencent: TencentConfig,
    #[serde(default)]
    pub caiyun: CaiyunConfig,
    #[serde(default)]
    pub google: WebProviderConfig,
    #[serde(default)]
    pub bing: WebProviderConfig,
    #[serde(default)]
    pub deepl: WebProviderConfig,
    #[serde(default)]
    pub linguee: WebProviderConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Logging {
    #[serde(default = "default_enable")]
    pub enable: bool,
    pub path: Option<String>,
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct YoudaoConfig {
    pub app_id: Option<String>,
    pub app_secret: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct BaiduConfig {
    pub app_id: Option<String>,
    pub app_secret: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TencentConfig {
    pub secret_id: Option<String>,
    pub secret_key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CaiyunConfig {
    pub token: Option<String>,
}

/// Keyless providers (web scrape or forged browser client) are on by
/// default and can only be switched off.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WebProviderConfig {
    #[serde(default = "default_enable")]
    pub enable: bool,
}

impl Default for WebProviderConfig {
    fn default() -> Self {
        Self { enable: true }
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            enable: true,
            path: None,
            level: "WARN".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            http_proxy: None,
            to_language: default_to_language(),
            logging: Logging::default(),
            youdao: YoudaoConfig::default(),
            baidu: BaiduConfig::default(),
            tencent: TencentConfig::default(),
            caiyun: CaiyunConfig::default(),
            google: WebProviderConfig::default(),
            bing: WebProviderConfig::default(),
            deepl: WebProviderConfig::default(),
            linguee: WebProviderConfig::default(),
        }
    }
}

// Defaults
fn default_theme() -> String {
    "temp".to_string()
}
fn default_to_language() -> String {
    "zh-CHS".to_string()
}
fn default_enable() -> bool {
    true
}
fn default_log_level() -> String {
    "WARN".to_string()
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("fy").join("config.toml"))
}

pub fn load_config() -> Result<Config, FyError> {
    let config_path = get_config_path();

    if let Some(path) = config_path {
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            match toml::from_str::<Config>(&content) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    eprintln!(
                        "Warning: Failed to parse config file: {}. Using defaults.",
                        e
                    );
                }
            }
        }
    }

    Ok(Config::default())
}

pub fn generate_config_sample() -> Result<(), FyError> {
    let config_path = get_config_path();

    if let Some(path) = config_path {
        if path.exists() {
            eprintln!("Config file already exists at: {}", path.display());
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let sample = Config::default();
        let toml_content = toml::to_string_pretty(&sample)
            .map_err(|e| FyError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, toml_content)
            .map_err(|e| FyError::Config(format!("Failed to write config file: {}", e)))?;
        println!("Generated config file at: {}", path.display());
    } else {
        return Err(FyError::Config(
            "Cannot determine config directory".to_string(),
        ));
    }

    Ok(())
}
