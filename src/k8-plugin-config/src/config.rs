use std::env;
use std::fs::File;
use std::path::Path;
use std::path::PathBuf;

use dirs::home_dir;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::ConfigError;

/// environment variable pointing at console configuration file
pub const CONFIG_ENV: &str = "K8_PLUGIN_CONFIG";

/// where plugin bundle text comes from
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum BundleSourceConfig {
    Path(PathBuf),
    Inline(String),
}

#[derive(Debug, Eq, PartialEq, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BundleLocation {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline: Option<String>,
}

impl BundleLocation {
    pub fn path<N: Into<String>, P: Into<PathBuf>>(name: N, path: P) -> Self {
        Self {
            name: name.into(),
            path: Some(path.into()),
            inline: None,
        }
    }

    pub fn inline<N: Into<String>, T: Into<String>>(name: N, text: T) -> Self {
        Self {
            name: name.into(),
            path: None,
            inline: Some(text.into()),
        }
    }

    pub fn source(&self) -> Result<BundleSourceConfig, ConfigError> {
        match (&self.path, &self.inline) {
            (Some(path), None) => Ok(BundleSourceConfig::Path(path.clone())),
            (None, Some(text)) => Ok(BundleSourceConfig::Inline(text.clone())),
            _ => Err(ConfigError::InvalidBundle(self.name.clone())),
        }
    }
}

#[derive(Debug, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    #[serde(skip)]
    pub path: PathBuf,
    #[serde(rename = "apiVersion", default)]
    pub api_version: String,
    #[serde(default)]
    pub bundles: Vec<BundleLocation>,
}

impl ConsoleConfig {
    /// read from `K8_PLUGIN_CONFIG` or else from home directory
    pub fn load() -> Result<Self, ConfigError> {
        match env::var(CONFIG_ENV) {
            Ok(path) => {
                debug!("loading console config from {}: {}", CONFIG_ENV, path);
                Self::from_file(path)
            }
            Err(_) => Self::from_home(),
        }
    }

    /// read from default home directory
    pub fn from_home() -> Result<Self, ConfigError> {
        let home_dir = home_dir().ok_or(ConfigError::NoHomeDir)?;
        Self::from_file(home_dir.join(".k8-console").join("plugins.yaml"))
    }

    pub fn from_file<T: AsRef<Path>>(path: T) -> Result<Self, ConfigError> {
        let file = File::open(path.as_ref())?;
        let mut config: Self = serde_yaml::from_reader(file)?;
        config.path = path.as_ref().to_path_buf();
        for bundle in &config.bundles {
            bundle.source()?;
        }
        Ok(config)
    }

    pub fn to_file<T: AsRef<Path>>(&self, path: T) -> Result<(), ConfigError> {
        let file = File::create(path)?;
        Ok(serde_yaml::to_writer(file, self)?)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.to_file(&self.path)
    }

    pub fn bundle(&self, name: &str) -> Option<&BundleLocation> {
        self.bundles.iter().find(|b| b.name == name)
    }

    pub fn put_bundle(&mut self, bundle: BundleLocation) -> Option<BundleLocation> {
        let prev = self.bundles.iter_mut().find(|b| b.name.eq(&bundle.name));
        match prev {
            Some(prev) => Some(std::mem::replace(prev, bundle)),
            None => {
                self.bundles.push(bundle);
                None
            }
        }
    }

    /// relative bundle paths are relative to the config file directory
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match self.path.parent() {
            Some(dir) => dir.join(path),
            None => path.to_path_buf(),
        }
    }
}
