use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses which of `len` candidates is asked next.
///
/// Callers guarantee `len > 0`; the returned index must be `< len`.
pub trait Picker {
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform selection backed by any `rand` generator.
pub struct RngPicker<R> {
    rng: R,
}

impl<R: Rng> RngPicker<R> {
    pub fn new(rng: R) -> Self {
        RngPicker { rng }
    }
}

impl RngPicker<StdRng> {
    /// Reproducible draws: the same seed yields the same pick sequence.
    pub fn seeded(seed: u64) -> Self {
        RngPicker::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        RngPicker::new(StdRng::from_entropy())
    }

    /// Seeded when `seed` is given, entropy otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => RngPicker::seeded(seed),
            None       => RngPicker::from_entropy(),
        }
    }
}

impl<R: Rng> Picker for RngPicker<R> {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Walks the candidates in turn, wrapping with the current length.
///
/// Scripts and tests use it when the exact draw order matters.
#[derive(Debug, Default)]
pub struct RoundRobin {
    turn: usize,
}

impl RoundRobin {
    pub fn new() -> Self {
        RoundRobin::default()
    }
}

impl Picker for RoundRobin {
    fn pick(&mut self, len: usize) -> usize {
        let idx = self.turn % len;
        self.turn += 1;
        idx
    }
}
