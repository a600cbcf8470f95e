use serde::{Deserialize, Serialize};
use scribe_crypto::{DomainHasher, Signature, SigningKey, VerifyingKey};
use scribe_types::Address;

use crate::error::{ProgramError, ProgramResult};
use crate::update::FieldUpdate;

/// A request to the blog program.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    InitializeBlog {
        title: String,
        description: String,
    },
    CreatePost {
        blog: Address,
        title: String,
        tags: Vec<String>,
    },
    EditPost {
        post: Address,
        title: FieldUpdate<String>,
        tags: FieldUpdate<Vec<String>>,
    },
    AppendContent {
        post: Address,
        chunk: String,
    },
    DeletePost {
        post: Address,
    },
}

impl Instruction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InitializeBlog { .. } => "initialize_blog",
            Self::CreatePost { .. } => "create_post",
            Self::EditPost { .. } => "edit_post",
            Self::AppendContent { .. } => "append_content",
            Self::DeletePost { .. } => "delete_post",
        }
    }

    /// Bytes covered by the envelope signature.
    pub fn signing_payload(&self) -> ProgramResult<Vec<u8>> {
        let bytes =
            bincode::serialize(self).map_err(|e| ProgramError::Serialization(e.to_string()))?;
        Ok(DomainHasher::INSTRUCTION.framed(&bytes))
    }
}

/// An [`Instruction`] signed by its sender.
///
/// The signer's public key doubles as its address, so verifying the
/// signature also authenticates the address every operation compares
/// against a record's author.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedInstruction {
    pub signer: Address,
    pub instruction: Instruction,
    pub signature: Signature,
}

impl SignedInstruction {
    pub fn sign(key: &SigningKey, instruction: Instruction) -> ProgramResult<Self> {
        let signature = key.sign(&instruction.signing_payload()?);
        Ok(Self {
            signer: key.address(),
            instruction,
            signature,
        })
    }

    pub fn verify(&self) -> ProgramResult<()> {
        let key =
            VerifyingKey::from_address(&self.signer).map_err(|_| ProgramError::InvalidSignature)?;
        key.verify(&self.instruction.signing_payload()?, &self.signature)
            .map_err(|_| ProgramError::InvalidSignature)
    }

    pub fn encode(&self) -> ProgramResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| ProgramError::Serialization(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> ProgramResult<Self> {
        bincode::deserialize(bytes).map_err(|e| ProgramError::Serialization(e.to_string()))
    }

    /// Size of the wire form.
    pub fn encoded_len(&self) -> ProgramResult<usize> {
        bincode::serialized_size(self)
            .map(|n| n as usize)
            .map_err(|e| ProgramError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn append(post: Address, chunk: &str) -> Instruction {
        Instruction::AppendContent {
            post,
            chunk: chunk.into(),
        }
    }

    #[test]
    fn signed_instruction_verifies() {
        let key = SigningKey::generate();
        let signed = SignedInstruction::sign(&key, append(Address::new([1; 32]), "hi")).unwrap();
        assert_eq!(signed.signer, key.address());
        signed.verify().unwrap();
    }

    #[test]
    fn tampered_instruction_fails() {
        let key = SigningKey::generate();
        let mut signed =
            SignedInstruction::sign(&key, append(Address::new([1; 32]), "hi")).unwrap();
        signed.instruction = append(Address::new([1; 32]), "bye");
        assert!(matches!(signed.verify(), Err(ProgramError::InvalidSignature)));
    }

    #[test]
    fn swapped_signer_fails() {
        let key = SigningKey::generate();
        let other = SigningKey::generate();
        let mut signed = SignedInstruction::sign(&key, Instruction::DeletePost {
            post: Address::new([2; 32]),
        })
        .unwrap();
        signed.signer = other.address();
        assert!(matches!(signed.verify(), Err(ProgramError::InvalidSignature)));
    }

    #[test]
    fn wire_roundtrip() {
        let key = SigningKey::generate();
        let signed = SignedInstruction::sign(
            &key,
            Instruction::EditPost {
                post: Address::new([3; 32]),
                title: FieldUpdate::SetTo("new".into()),
                tags: FieldUpdate::Unchanged,
            },
        )
        .unwrap();
        let bytes = signed.encode().unwrap();
        assert_eq!(bytes.len(), signed.encoded_len().unwrap());
        let decoded = SignedInstruction::decode(&bytes).unwrap();
        assert_eq!(decoded, signed);
        decoded.verify().unwrap();
    }

    #[test]
    fn full_chunk_fits_default_payload_limit() {
        let key = SigningKey::generate();
        let signed =
            SignedInstruction::sign(&key, append(Address::new([1; 32]), &"x".repeat(900)))
                .unwrap();
        assert!(signed.encoded_len().unwrap() <= crate::ProgramConfig::default().max_instruction_bytes);
    }

    #[test]
    fn payload_is_domain_separated() {
        let ix = Instruction::DeletePost {
            post: Address::zero(),
        };
        assert!(ix.signing_payload().unwrap().starts_with(b"scribe-instruction-v1:"));
        assert_eq!(ix.name(), "delete_post");
    }
}
