use lingo_core::scene::{CannedReply, DEFAULT_SCENE_ID, GENERIC_REPLY, reply_pool};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Mutex;

/// Picks the simulated partner's reply after a learner turn.
///
/// Resolution order:
/// 1. the pool for `(scene, role)`
/// 2. the pool for `(default scene, role)`
/// 3. [`GENERIC_REPLY`]
///
/// The generator is seedable so a session can be replayed exactly.
#[derive(Debug)]
pub struct ReplyGenerator {
    rng: Mutex<StdRng>,
}

impl ReplyGenerator {
    /// Creates a generator. `None` seeds from system entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    pub fn pick(&self, scene_id: &str, role_id: &str) -> CannedReply {
        let Some(pool) = reply_pool(scene_id, role_id)
            .or_else(|| reply_pool(DEFAULT_SCENE_ID, role_id))
        else {
            return GENERIC_REPLY;
        };

        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        pool.choose(&mut *rng).copied().unwrap_or(GENERIC_REPLY)
    }
}

impl Default for ReplyGenerator {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_pool_is_used() {
        let generator = ReplyGenerator::new(Some(1));
        let pool = reply_pool("airport", "passenger").unwrap();

        for _ in 0..10 {
            let reply = generator.pick("airport", "passenger");
            assert!(pool.contains(&reply));
        }
    }

    #[test]
    fn test_falls_back_to_default_scene_pool() {
        // The store has no pool of its own, but the default scene has one for "customer".
        assert!(reply_pool("store", "customer").is_none());
        let fallback = reply_pool(DEFAULT_SCENE_ID, "customer").unwrap();

        let reply = ReplyGenerator::new(Some(2)).pick("store", "customer");
        assert!(fallback.contains(&reply));
    }

    #[test]
    fn test_falls_back_to_generic_reply() {
        let reply = ReplyGenerator::new(Some(3)).pick("hospital", "doctor");
        assert_eq!(reply, GENERIC_REPLY);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = ReplyGenerator::new(Some(42));
        let b = ReplyGenerator::new(Some(42));

        let first: Vec<_> = (0..8).map(|_| a.pick("restaurant", "waiter")).collect();
        let second: Vec<_> = (0..8).map(|_| b.pick("restaurant", "waiter")).collect();
        assert_eq!(first, second);
    }
}
