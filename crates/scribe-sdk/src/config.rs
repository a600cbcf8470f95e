use serde::{Deserialize, Serialize};

/// Client-side settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Largest content chunk sent in one append, in bytes.
    pub chunk_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { chunk_size: 900 }
    }
}
