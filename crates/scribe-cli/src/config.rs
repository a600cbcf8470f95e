use std::path::Path;

use anyhow::Context;
use scribe_program::ProgramConfig;
use scribe_sdk::ClientConfig;
use scribe_store::RentSchedule;
use serde::{Deserialize, Serialize};

/// Settings read from `--config`.
///
/// ```toml
/// [program]
/// node_id = 1
/// max_instruction_bytes = 1232
///
/// [client]
/// chunk_size = 900
///
/// [rent]
/// lamports_per_byte_year = 3480
/// exemption_years = 2
/// account_overhead = 128
/// ```
///
/// `rent` only applies when a new ledger is created; an existing snapshot
/// keeps the schedule it was created with.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub program: ProgramConfig,
    pub client: ClientConfig,
    pub rent: RentSchedule,
}

impl CliConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_gives_defaults() {
        let config = CliConfig::load(None).unwrap();
        assert_eq!(config.client.chunk_size, 900);
        assert_eq!(config.program.max_instruction_bytes, 1232);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scribe.toml");
        std::fs::write(&path, "[client]\nchunk_size = 500\n\n[program]\nnode_id = 4\n").unwrap();

        let config = CliConfig::load(Some(&path)).unwrap();
        assert_eq!(config.client.chunk_size, 500);
        assert_eq!(config.program.node_id, 4);
        assert_eq!(config.program.max_instruction_bytes, 1232);
        assert_eq!(config.rent, RentSchedule::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[client\nchunk_size = ").unwrap();
        assert!(CliConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn unreadable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CliConfig::load(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
