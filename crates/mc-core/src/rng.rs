//! Deterministic per-cell RNG.
//!
//! # Determinism strategy
//!
//! Cells are created and destroyed during a run, and parallel passes visit
//! them in whatever order the thread pool chooses.  A per-cell generator that
//! carries state across ticks would therefore make results depend on
//! population history.  Instead every random draw is addressed by a counter:
//!
//!   stream = cell_id
//!   key    = global_seed XOR (step * MIXING_CONSTANT) XOR purpose
//!
//! and served from a ChaCha8 block cipher positioned at that stream.  Two runs
//! with the same seed produce bit-identical draws for the same
//! `(cell, step, purpose)` triple regardless of thread count or visiting order.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::CellId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Which pass a per-cell draw belongs to.  Keeps the mechanics and phenotype
/// streams of the same cell and step independent.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RngPurpose {
    Phenotype,
    Mechanics,
    Division,
    /// User rules run on the custom timer.
    Custom,
}

impl RngPurpose {
    #[inline]
    fn salt(self) -> u64 {
        match self {
            RngPurpose::Phenotype => 0x5bd1_e995_0000_0001,
            RngPurpose::Mechanics => 0x27d4_eb2f_1656_67c5,
            RngPurpose::Division  => 0x1656_67b1_9e37_79f9,
            RngPurpose::Custom    => 0x85eb_ca6b_c2b2_ae35,
        }
    }
}

// ── CellRng ───────────────────────────────────────────────────────────────────

/// Counter-addressed RNG for one cell during one step of one pass.
///
/// Create with [`CellRng::for_step`] at the point of use; never store it
/// across ticks.
pub struct CellRng(ChaCha8Rng);

impl CellRng {
    /// Position a generator at `(global_seed, step, purpose)` on the cell's
    /// own stream.
    pub fn for_step(global_seed: u64, cell: CellId, step: u64, purpose: RngPurpose) -> Self {
        let key = global_seed ^ step.wrapping_mul(MIXING_CONSTANT) ^ purpose.salt();
        let mut inner = ChaCha8Rng::seed_from_u64(key);
        inner.set_stream(cell.0);
        CellRng(inner)
    }

    #[inline]
    pub fn inner(&mut self) -> &mut ChaCha8Rng {
        &mut self.0
    }

    /// Uniform draw in `[0, 1)`.
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
