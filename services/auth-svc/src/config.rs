use common_config::{ListenConfig, ServiceConfig};
use serde::Deserialize;

pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSvcConfig {
    pub listen: ListenConfig,
}

impl Default for AuthSvcConfig {
    fn default() -> Self {
        Self {
            listen: ListenConfig::new("0.0.0.0", DEFAULT_PORT),
        }
    }
}

impl ServiceConfig for AuthSvcConfig {
    const PREFIX: &'static str = "AUTH_SVC_";

    fn apply_environment_overrides(&mut self, prefix: &str) {
        self.listen.apply_environment_overrides(prefix);
    }
}
