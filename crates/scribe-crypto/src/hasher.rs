/// Domain-separated BLAKE3 hasher.
///
/// Each hasher carries a domain tag that is prepended to every hash
/// computation, so identical bytes hashed for different purposes (an address
/// seed list, a record discriminator, a signed instruction) never collide.
pub struct DomainHasher {
    domain: &'static str,
}

impl DomainHasher {
    /// Hasher for program-derived addresses.
    pub const ADDRESS: Self = Self {
        domain: "scribe-address-v1",
    };
    /// Hasher for record discriminators (`account:<Kind>`).
    pub const ACCOUNT: Self = Self { domain: "account" };
    /// Hasher for instruction signing payloads.
    pub const INSTRUCTION: Self = Self {
        domain: "scribe-instruction-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> [u8; 32] {
        self.hash_parts(&[data])
    }

    /// Hash a sequence of byte strings with domain separation.
    ///
    /// Parts are fed in order without separators; callers that need
    /// unambiguous framing must use fixed-width parts.
    pub fn hash_parts(&self, parts: &[&[u8]]) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        for part in parts {
            hasher.update(part);
        }
        *hasher.finalize().as_bytes()
    }

    /// The signing payload for `data`: domain tag, separator, then the bytes.
    pub fn framed(&self, data: &[u8]) -> Vec<u8> {
        let mut framed = Vec::with_capacity(self.domain.len() + 1 + data.len());
        framed.extend_from_slice(self.domain.as_bytes());
        framed.push(b':');
        framed.extend_from_slice(data);
        framed
    }
}
