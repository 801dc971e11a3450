use common_config::{ListenConfig, ServiceConfig};
use serde::Deserialize;

pub const DEFAULT_PORT: u16 = 8010;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DbCatalogConfig {
    pub listen: ListenConfig,
}

impl Default for DbCatalogConfig {
    fn default() -> Self {
        Self {
            listen: ListenConfig::new("0.0.0.0", DEFAULT_PORT),
        }
    }
}

impl ServiceConfig for DbCatalogConfig {
    const PREFIX: &'static str = "DB_CATALOG_";

    fn apply_environment_overrides(&mut self, prefix: &str) {
        self.listen.apply_environment_overrides(prefix);
    }
}
