//! Outlet registry: which outlets exist and where their feeds live.
//!
//! The registry is read once from a YAML file and is read-only afterwards.
//!
//! ```yaml
//! outlets:
//!   - name: IGN
//!     rss_feed_url: https://feeds.feedburner.com/ign/games-all
//!   - name: PC Gamer
//!     rss_feed_url: https://www.pcgamer.com/rss/
//! ```

use crate::error::{Result, ScrapeError};
use crate::models::OutletConfig;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, instrument};
use url::Url;

/// Resolves an outlet name to its configuration.
pub trait OutletLookup {
    /// Exact, case-sensitive lookup.
    fn find_by_name(&self, name: &str) -> Option<&OutletConfig>;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutletRegistry {
    #[serde(default)]
    outlets: Vec<OutletConfig>,
}

impl OutletRegistry {
    /// Build a registry from already-parsed outlets, validating them.
    pub fn new(outlets: Vec<OutletConfig>) -> Result<Self> {
        let registry = Self { outlets };
        registry.validate()?;
        Ok(registry)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let registry: OutletRegistry = serde_yaml::from_str(yaml)?;
        registry.validate()?;
        Ok(registry)
    }

    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let yaml = tokio::fs::read_to_string(path.as_ref()).await?;
        let registry = Self::from_yaml_str(&yaml)?;
        info!(count = registry.outlets.len(), "Loaded outlet registry");
        Ok(registry)
    }

    pub fn outlets(&self) -> &[OutletConfig] {
        &self.outlets
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.outlets.iter().map(|o| o.name.as_str())
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for outlet in &self.outlets {
            if outlet.name.trim().is_empty() {
                return Err(ScrapeError::Config("outlet with empty name".to_string()));
            }
            if !seen.insert(outlet.name.as_str()) {
                return Err(ScrapeError::Config(format!(
                    "outlet {:?} is listed more than once",
                    outlet.name
                )));
            }
            let url = Url::parse(&outlet.rss_feed_url).map_err(|e| {
                ScrapeError::Config(format!(
                    "outlet {:?} has invalid feed URL {:?}: {}",
                    outlet.name, outlet.rss_feed_url, e
                ))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ScrapeError::Config(format!(
                    "outlet {:?} feed URL must be http(s), got {:?}",
                    outlet.name,
                    url.scheme()
                )));
            }
        }
        Ok(())
    }
}

impl OutletLookup for OutletRegistry {
    fn find_by_name(&self, name: &str) -> Option<&OutletConfig> {
        self.outlets.iter().find(|o| o.name == name)
    }
}
