/// Deterministic per-application draw in `0..100` used by the Interview decision.
///
/// Swappable so tests (and future identifier schemes) can supply their own draws.
pub trait DecisionSeed: Send + Sync {
    fn seed(&self, application_id: &str) -> u32;
}

/// Code point of the id's last character, mod 100. An empty id draws 0.
pub struct TrailingCharSeed;

impl DecisionSeed for TrailingCharSeed {
    fn seed(&self, application_id: &str) -> u32 {
        application_id
            .chars()
            .next_back()
            .map(|c| c as u32 % 100)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_char_seed_values() {
        // 'a' = 97, '7' = 55, 'z' = 122
        assert_eq!(TrailingCharSeed.seed("64f1c2a"), 97);
        assert_eq!(TrailingCharSeed.seed("app-0007"), 55);
        assert_eq!(TrailingCharSeed.seed("xyz"), 22);
        assert_eq!(TrailingCharSeed.seed(""), 0);
    }

    #[test]
    fn test_seed_is_deterministic_and_bounded() {
        for id in ["a", "b", "ffff", "3d0f2a1e-9c4b-4f4e-8f1a-7d8e9f0a1b2c", "é"] {
            let first = TrailingCharSeed.seed(id);
            assert!(first < 100);
            assert_eq!(TrailingCharSeed.seed(id), first);
        }
    }
}
