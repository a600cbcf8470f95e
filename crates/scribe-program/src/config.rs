use serde::{Deserialize, Serialize};

/// Runtime settings for [`BlogProgram`](crate::BlogProgram).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramConfig {
    /// Node id stamped into every timestamp this program issues.
    pub node_id: u16,
    /// Largest encoded [`SignedInstruction`](crate::SignedInstruction) accepted.
    pub max_instruction_bytes: usize,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            node_id: 0,
            max_instruction_bytes: 1232,
        }
    }
}
