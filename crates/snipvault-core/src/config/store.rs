//! Document store selection.

use serde::{Deserialize, Serialize};

/// Which document store backs the snippet and folder collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Provider name: `"memory"` or `"postgres"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// How many times an update re-reads and retries after losing a
    /// compare-and-swap race before reporting a conflict.
    #[serde(default = "default_max_cas_retries")]
    pub max_cas_retries: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            max_cas_retries: default_max_cas_retries(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_max_cas_retries() -> u32 {
    5
}
