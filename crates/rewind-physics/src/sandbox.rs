// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Lock-step determinism checks for pairs of worlds, typically an original
//! and its snapshot clone.

use crate::digest::StateHash;
use crate::world::World;

/// Determinism check failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeterminismError {
    /// State hashes diverged after the given step.
    #[error("determinism mismatch at step {step}: {hash_a:?} vs {hash_b:?}")]
    Mismatch {
        /// Step index where divergence was detected.
        step: usize,
        /// State hash of the first world.
        hash_a: StateHash,
        /// State hash of the second world.
        hash_b: StateHash,
    },
}

/// Drives two worlds with the same step function and compares state hashes
/// after every step.
///
/// `step_fn` receives the step index and the world to advance; it is
/// expected to apply input and call [`World::update`]. Runs on the calling
/// thread, `a` before `b` on every step.
pub fn run_pair_determinism<F>(
    a: &mut World,
    b: &mut World,
    steps: usize,
    mut step_fn: F,
) -> Result<(), DeterminismError>
where
    F: FnMut(usize, &mut World),
{
    for step in 0..steps {
        step_fn(step, a);
        step_fn(step, b);
        let (hash_a, hash_b) = (a.state_hash(), b.state_hash());
        if hash_a != hash_b {
            return Err(DeterminismError::Mismatch {
                step,
                hash_a,
                hash_b,
            });
        }
    }
    Ok(())
}
