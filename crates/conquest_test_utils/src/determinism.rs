//! Determinism testing utilities.
//!
//! Provides a harness for verifying that a planning pass produces identical
//! results given identical snapshots.
//!
//! # Sources of non-determinism
//!
//! - **Floating-point math**: ratios use [`conquest_core::math::Fixed`].
//! - **HashMap iteration order**: the core iterates `BTreeMap`/`BTreeSet`
//!   only, and every tie is broken on the lower territory id.
//! - **Hidden state**: a pass reads only the snapshot and its own ledger.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use conquest_core::target::TargetCluster;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic pass).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that every run agreed, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Planning is non-deterministic!\n\
                 Runs: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run `pass` several times and compare the hashes of its output.
///
/// # Example
///
/// ```ignore
/// let result = verify_determinism(5, || plan(&board), |plan| hash_plan(plan));
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<T, Pass, HashFn>(runs: usize, pass: Pass, hash: HashFn) -> DeterminismResult
where
    Pass: Fn() -> T,
    HashFn: Fn(&T) -> u64,
{
    let hashes: Vec<u64> = (0..runs).map(|_| hash(&pass())).collect();
    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
    }
}

/// Hash every field of a plan that influences the agent's moves.
#[must_use]
pub fn hash_plan(clusters: &[TargetCluster]) -> u64 {
    let mut hasher = DefaultHasher::new();
    for cluster in clusters {
        cluster.id.hash(&mut hasher);
        cluster.members.hash(&mut hasher);
        cluster.original.hash(&mut hasher);
        cluster.attacker.hash(&mut hasher);
        cluster.difficulty.hash(&mut hasher);
        cluster.recommended_troops.hash(&mut hasher);
        cluster.kind.hash(&mut hasher);
        cluster.continent.hash(&mut hasher);
    }
    hasher.finish()
}
