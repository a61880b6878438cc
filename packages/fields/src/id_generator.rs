use std::time::{SystemTime, UNIX_EPOCH};

use crc32fast::Hasher;

use crate::ElementId;

/// Derive an id seed from a form id and a per-session salt using CRC32
pub fn get_form_seed(form_id: &str, salt: u128) -> String {
    let mut hasher = Hasher::new();
    hasher.update(form_id.as_bytes());
    hasher.update(&salt.to_le_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential id generator for elements within one editing session.
///
/// Ids are `<seed>-<n>`. The seed mixes in the session start time so ids
/// minted in a later session never collide with ids already persisted.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u64,
}

impl IdGenerator {
    pub fn new(form_id: &str) -> Self {
        let salt = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        Self::from_seed(get_form_seed(form_id, salt))
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential id
    pub fn new_id(&mut self) -> ElementId {
        self.count += 1;
        ElementId::new(format!("{}-{}", self.seed, self.count))
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_generation() {
        let a = get_form_seed("form-1", 7);
        let b = get_form_seed("form-1", 7);
        assert_eq!(a, b);

        assert_ne!(a, get_form_seed("form-1", 8));
        assert_ne!(a, get_form_seed("form-2", 7));
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = IdGenerator::from_seed("abc");

        assert_eq!(gen.new_id().as_str(), "abc-1");
        assert_eq!(gen.new_id().as_str(), "abc-2");
        assert_eq!(gen.new_id().as_str(), "abc-3");
        assert_eq!(gen.seed(), "abc");
    }
}
