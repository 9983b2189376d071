//! RNG module - 7-bag piece generation
//!
//! Each bag holds one of each piece kind, shuffled with Fisher-Yates. The
//! queue deals from a running buffer of concatenated bags, so every 7 draws
//! aligned to a bag boundary are a permutation of all kinds.
//!
//! Randomness comes from a small seeded LCG: the same seed reproduces the same
//! piece sequence, which keeps replays and tests deterministic.

use std::collections::VecDeque;

use arrayvec::ArrayVec;

use crate::types::{PieceKind, BAG_SIZE, MAX_LOOKAHEAD, MIN_LOOKAHEAD};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Uniform value in [0, max)
    ///
    /// Uses the high bits and a widening multiply instead of `%`: the low
    /// bits of an LCG cycle with a short period.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// One freshly shuffled bag of all seven kinds
pub fn next_bag(rng: &mut SimpleRng) -> [PieceKind; BAG_SIZE] {
    let mut bag = PieceKind::ALL;
    rng.shuffle(&mut bag);
    bag
}

/// Upcoming pieces: a fixed-length preview backed by a bag buffer
///
/// The preview always holds `lookahead` kinds. Taking a piece pops the
/// preview head and moves the buffer head to the preview tail; before that,
/// whenever the buffer holds fewer than `lookahead` kinds a new bag is
/// appended.
#[derive(Debug, Clone)]
pub struct PieceQueue {
    preview: ArrayVec<PieceKind, MAX_LOOKAHEAD>,
    buffer: VecDeque<PieceKind>,
    lookahead: usize,
    rng: SimpleRng,
}

impl PieceQueue {
    /// Build a queue from two concatenated bags
    ///
    /// Returns the queue and the first piece to spawn; the next `lookahead`
    /// kinds fill the preview and the remainder stays buffered.
    pub fn new(seed: u32, lookahead: usize) -> (Self, PieceKind) {
        assert!(
            (MIN_LOOKAHEAD..=MAX_LOOKAHEAD).contains(&lookahead),
            "lookahead must be in {MIN_LOOKAHEAD}..={MAX_LOOKAHEAD}"
        );
        let mut rng = SimpleRng::new(seed);
        let mut buffer: VecDeque<PieceKind> = VecDeque::with_capacity(BAG_SIZE * 3);
        buffer.extend(next_bag(&mut rng));
        buffer.extend(next_bag(&mut rng));

        let Some(first) = buffer.pop_front() else {
            unreachable!("two fresh bags are never empty");
        };
        let preview = buffer.drain(..lookahead).collect();

        let queue = Self {
            preview,
            buffer,
            lookahead,
            rng,
        };
        (queue, first)
    }

    /// Take the next piece and shift a buffered kind into the preview
    pub fn take_next(&mut self) -> PieceKind {
        if self.buffer.len() < self.lookahead {
            let bag = next_bag(&mut self.rng);
            self.buffer.extend(bag);
            log::trace!("bag appended, buffer now {}", self.buffer.len());
        }
        let head = self.preview.remove(0);
        let Some(incoming) = self.buffer.pop_front() else {
            unreachable!("bag buffer ran dry");
        };
        self.preview.push(incoming);
        head
    }

    /// Upcoming kinds, soonest first
    pub fn preview(&self) -> &[PieceKind] {
        &self.preview
    }

    pub fn lookahead(&self) -> usize {
        self.lookahead
    }

    /// Kinds already dealt into the buffer but not yet previewed
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(54321);
        assert_ne!(rng1.next_u32(), rng2.next_u32());
    }

    #[test]
    fn test_next_range_in_bounds() {
        let mut rng = SimpleRng::new(7);
        for max in 1..=7 {
            for _ in 0..200 {
                assert!(rng.next_range(max) < max);
            }
        }
    }

    #[test]
    fn test_bag_is_permutation() {
        let mut rng = SimpleRng::new(99);
        for _ in 0..20 {
            let mut bag = next_bag(&mut rng).to_vec();
            bag.sort_by_key(|k| k.as_str());
            let mut all = PieceKind::ALL.to_vec();
            all.sort_by_key(|k| k.as_str());
            assert_eq!(bag, all);
        }
    }

    #[test]
    fn test_initial_fill() {
        let (queue, _first) = PieceQueue::new(1, 4);
        assert_eq!(queue.preview().len(), 4);
        // 14 dealt: 1 active, 4 previewed
        assert_eq!(queue.buffered(), 9);
    }

    #[test]
    fn test_every_aligned_bag_has_each_kind_once() {
        let (mut queue, first) = PieceQueue::new(2024, 4);
        let mut drawn = vec![first];
        for _ in 0..(7 * 30 - 1) {
            drawn.push(queue.take_next());
        }
        for bag in drawn.chunks(7) {
            let mut counts: HashMap<PieceKind, usize> = HashMap::new();
            for kind in bag {
                *counts.entry(*kind).or_default() += 1;
            }
            assert_eq!(counts.len(), 7);
            assert!(counts.values().all(|&n| n == 1));
        }
    }

    #[test]
    fn test_preview_head_is_next_piece() {
        let (mut queue, _) = PieceQueue::new(5, 4);
        for _ in 0..50 {
            let expected = queue.preview()[0];
            assert_eq!(queue.take_next(), expected);
            assert_eq!(queue.preview().len(), 4);
        }
    }

    #[test]
    fn test_refill_threshold() {
        let (mut queue, _) = PieceQueue::new(3, 4);
        // buffer: 9 → 8 → ... → 4, then the next draw sees 4 (not < 4) → 3
        for expected in [8, 7, 6, 5, 4, 3] {
            queue.take_next();
            assert_eq!(queue.buffered(), expected);
        }
        // 3 < 4: a bag is appended before dealing
        queue.take_next();
        assert_eq!(queue.buffered(), 3 + 7 - 1);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let (mut a, fa) = PieceQueue::new(77, 4);
        let (mut b, fb) = PieceQueue::new(77, 4);
        assert_eq!(fa, fb);
        for _ in 0..40 {
            assert_eq!(a.take_next(), b.take_next());
        }
    }

    #[test]
    fn test_shortest_lookahead() {
        let (mut queue, _) = PieceQueue::new(11, 3);
        for _ in 0..30 {
            queue.take_next();
            assert_eq!(queue.preview().len(), 3);
        }
    }

    #[test]
    #[should_panic(expected = "lookahead must be in 3..=7")]
    fn test_lookahead_below_minimum_panics() {
        PieceQueue::new(11, 2);
    }
}
