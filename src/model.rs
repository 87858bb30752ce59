//! Bit probability models.
//!
//! The coder itself knows nothing about statistics: every binary decision is
//! coded with a probability supplied through [`BitModel`]. Encoder and
//! decoder must drive identical models in identical order.

/// Probability of a scale-`2^16` one half.
pub const HALF: u16 = 1 << 15;

/// Counts are halved once either reaches this value.
pub const COUNT_LIMIT: u16 = 1 << 10;

/// A source of bit probabilities.
pub trait BitModel {
    /// Probability that the next bit is 1, scaled by `2^16`.
    fn p1(&self) -> u16;

    /// Learn the bit that was actually coded.
    fn update(&mut self, bit: u8);
}

/// A model that never adapts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StaticModel(pub u16);

impl Default for StaticModel {
    fn default() -> Self {
        Self(HALF)
    }
}

impl BitModel for StaticModel {
    fn p1(&self) -> u16 {
        self.0
    }

    fn update(&mut self, _bit: u8) {}
}

/// Zero and one counts for a single context.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BitCounter {
    counts: [u16; 2],
}

impl BitCounter {
    /// `(c1 + 1) / (c0 + c1 + 2)`, rounded to 16 bits.
    pub fn p1(&self) -> u16 {
        let c0 = u32::from(self.counts[0]);
        let c1 = u32::from(self.counts[1]);
        let p = (1 << 17) * (c1 + 1) / (c0 + c1 + 2);
        ((p >> 1) + (p & 1)).min(u32::from(u16::MAX)) as u16
    }

    /// Count `bit`, halving both counts when one saturates.
    pub fn update(&mut self, bit: u8) {
        let slot = usize::from(bit & 1);
        self.counts[slot] += 1;
        if self.counts[slot] >= COUNT_LIMIT {
            for c in &mut self.counts {
                *c = (*c >> 1) + (*c & 1);
            }
        }
    }
}

/// Adaptive order-0 byte model.
///
/// Bytes are coded MSB first; the bits seen so far in the current byte pick
/// one of 255 counters, a binary tree rooted at index 1.
#[derive(Clone, Debug)]
pub struct Order0 {
    counters: [BitCounter; 256],
    node: usize,
}

impl Order0 {
    /// Create a model with every context at one half.
    pub fn new() -> Self {
        Self {
            counters: [BitCounter::default(); 256],
            node: 1,
        }
    }
}

impl Default for Order0 {
    fn default() -> Self {
        Self::new()
    }
}

impl BitModel for Order0 {
    fn p1(&self) -> u16 {
        self.counters[self.node].p1()
    }

    fn update(&mut self, bit: u8) {
        self.counters[self.node].update(bit);
        self.node = (self.node << 1) | usize::from(bit & 1);
        if self.node >= self.counters.len() {
            self.node = 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_counter_is_half() {
        assert_eq!(BitCounter::default().p1(), HALF);
    }

    #[test]
    fn test_counter_leans_towards_seen_bits() {
        let mut c = BitCounter::default();
        for _ in 0..50 {
            c.update(1);
        }
        assert!(c.p1() > 60_000);
        for _ in 0..200 {
            c.update(0);
        }
        assert!(c.p1() < HALF);
    }

    #[test]
    fn test_counter_saturation_halves() {
        let mut c = BitCounter::default();
        for _ in 0..5_000 {
            c.update(1);
        }
        assert!(c.counts[1] < COUNT_LIMIT);
        assert!(c.p1() < u16::MAX);
    }

    #[test]
    fn test_order0_walks_tree_per_byte() {
        let mut m = Order0::new();
        for i in 0..8 {
            m.update((0xA5u8 >> (7 - i)) & 1);
        }
        assert_eq!(m.node, 1);
        // root context saw one 1 bit
        assert!(m.p1() > HALF);
    }
}
