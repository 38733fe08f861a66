use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use fluvio_future::fs::read_to_string;
use tracing::trace;

use k8_plugin_config::BundleSourceConfig;
use k8_plugin_config::ConfigError;
use k8_plugin_config::ConsoleConfig;

use crate::FetchError;

/// location yielding raw plugin bundle text
#[async_trait]
pub trait BundleSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self) -> Result<String, FetchError>;
}

#[derive(Debug, Clone)]
pub struct FileBundleSource {
    name: String,
    path: PathBuf,
}

impl FileBundleSource {
    pub fn new<N: Into<String>, P: Into<PathBuf>>(name: N, path: P) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

#[async_trait]
impl BundleSource for FileBundleSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<String, FetchError> {
        trace!("{}: reading {}", self.name, self.path.display());
        read_to_string(&self.path).await.map_err(|err| match err.kind() {
            ErrorKind::NotFound => FetchError::NotFound(self.path.display().to_string()),
            _ => FetchError::IoError(err),
        })
    }
}

/// bundle text held in memory
#[derive(Debug, Clone)]
pub struct StaticBundleSource {
    name: String,
    text: String,
}

impl StaticBundleSource {
    pub fn new<N: Into<String>, T: Into<String>>(name: N, text: T) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

#[async_trait]
impl BundleSource for StaticBundleSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<String, FetchError> {
        Ok(self.text.clone())
    }
}

/// bundle sources declared in console configuration, in declaration order
pub fn sources_from_config(
    config: &ConsoleConfig,
) -> Result<Vec<Arc<dyn BundleSource>>, ConfigError> {
    let mut sources: Vec<Arc<dyn BundleSource>> = vec![];
    for bundle in &config.bundles {
        let source: Arc<dyn BundleSource> = match bundle.source()? {
            BundleSourceConfig::Path(path) => Arc::new(FileBundleSource::new(
                bundle.name.clone(),
                config.resolve_path(&path),
            )),
            BundleSourceConfig::Inline(text) => {
                Arc::new(StaticBundleSource::new(bundle.name.clone(), text))
            }
        };
        sources.push(source);
    }
    Ok(sources)
}
