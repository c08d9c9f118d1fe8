use std::collections::VecDeque;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;

use crate::core::PieceKind;

/// Piece generation plus the fixed look-ahead queue.
///
/// Each draw is an independent uniform pick over the 7 kinds — there is no
/// bag, so short-window droughts and repeats are possible by design. The
/// queue always holds exactly [`Self::LOOKAHEAD`] pieces after any public
/// operation: consuming the front is always paired with appending one fresh
/// draw.
#[derive(Debug, Clone)]
pub struct PieceSupply {
    rng: Pcg32,
    queue: VecDeque<PieceKind>,
}

impl Default for PieceSupply {
    fn default() -> Self {
        Self::new()
    }
}

/// Seed for deterministic piece generation.
///
/// A 128-bit seed for the supply's random number generator. Two supplies
/// built from the same seed produce the same piece sequence, which is what
/// the engine tests (and any replay tooling) rely on.
#[derive(Debug, Clone, Copy)]
pub struct SupplySeed([u8; 16]);

/// Allows generating random `SupplySeed` values with `rng.random()`.
impl Distribution<SupplySeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SupplySeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        SupplySeed(seed)
    }
}

impl PieceSupply {
    /// Length of the look-ahead queue.
    pub const LOOKAHEAD: usize = 4;

    /// Creates a supply with a random seed and a filled queue.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic piece
    /// generation.
    #[must_use]
    pub fn with_seed(seed: SupplySeed) -> Self {
        let mut supply = Self {
            rng: Pcg32::from_seed(seed.0),
            queue: VecDeque::with_capacity(Self::LOOKAHEAD + 1),
        };
        supply.fill_queue();
        supply
    }

    /// Draws the queue front and appends one fresh piece, keeping the queue
    /// at exactly [`Self::LOOKAHEAD`].
    ///
    /// # Panics
    ///
    /// Panics if the queue is empty, which the fill logic prevents.
    pub fn pop_next(&mut self) -> PieceKind {
        self.fill_queue();
        let next = self
            .queue
            .pop_front()
            .expect("piece queue should never be empty");
        self.queue.push_back(self.rng.random());
        next
    }

    /// Returns the queued pieces in order, front (next to spawn) first.
    pub fn queued(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.queue.iter().copied()
    }

    /// Replaces the queue contents. Used when a saved game is restored.
    pub fn set_queue(&mut self, kinds: [PieceKind; Self::LOOKAHEAD]) {
        self.queue.clear();
        self.queue.extend(kinds);
    }

    /// Discards the queue and refills it from the generator.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.fill_queue();
    }

    fn fill_queue(&mut self) {
        while self.queue.len() < Self::LOOKAHEAD {
            self.queue.push_back(self.rng.random());
        }
    }
}
