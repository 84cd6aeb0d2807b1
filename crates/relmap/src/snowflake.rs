//! Distributed identifier generation.

use std::time::Instant;

use chrono::Utc;
use parking_lot::Mutex;
use rand::RngExt;

/// Generator epoch in Unix milliseconds (2010-11-04 01:42:54.657 UTC).
const EPOCH_MS: i64 = 1_288_834_974_657;

const NODE_MASK: i64 = 0x3FF;
const SEQUENCE_MASK: i64 = 0xFFF;
const TIME_SHIFT: u8 = 22;
const NODE_SHIFT: u8 = 12;

/// Millisecond clock source for the generator.
enum Clock {
    /// Wall-clock anchored at construction, advanced monotonically.
    Monotonic { anchor: Instant, base_ms: i64 },
    /// Caller-controlled clock, used in tests.
    Custom(Box<dyn Fn() -> i64 + Send + Sync>),
}

impl Clock {
    fn elapsed_ms(&self) -> i64 {
        match self {
            Self::Monotonic { anchor, base_ms } => {
                base_ms + i64::try_from(anchor.elapsed().as_millis()).unwrap_or(i64::MAX)
            }
            Self::Custom(clock) => clock(),
        }
    }
}

struct State {
    sequence: i64,
    last_time: i64,
}

/// Monotonic distributed id source.
///
/// Identifiers are `(elapsed_ms << 22) | ((node & 0x3FF) << 12) | sequence`.
/// Values are strictly increasing per node as long as the clock does not move
/// backward; they are collision-free across nodes only when node ids
/// (max 1024) are unique.
pub struct SnowflakeGenerator {
    node_id: i64,
    clock: Clock,
    state: Mutex<State>,
}

impl SnowflakeGenerator {
    /// Creates a generator for `node_id` (masked to 10 bits).
    ///
    /// The clock is anchored to a monotonic source at construction so later
    /// wall-clock adjustments cannot move generated time backward.
    #[must_use]
    pub fn new(node_id: i64) -> Self {
        let base_ms = Utc::now().timestamp_millis() - EPOCH_MS;
        Self {
            node_id: node_id & NODE_MASK,
            clock: Clock::Monotonic {
                anchor: Instant::now(),
                base_ms,
            },
            state: Mutex::new(State {
                sequence: 0,
                last_time: 0,
            }),
        }
    }

    /// Creates a generator with a random node id (0-1023).
    #[must_use]
    pub fn with_random_node() -> Self {
        Self::new(rand::rng().random_range(0..1024))
    }

    /// Creates a generator driven by a caller-supplied millisecond clock.
    #[must_use]
    pub fn with_clock(node_id: i64, clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        Self {
            node_id: node_id & NODE_MASK,
            clock: Clock::Custom(Box::new(clock)),
            state: Mutex::new(State {
                sequence: 0,
                last_time: 0,
            }),
        }
    }

    /// Generates the next identifier.
    ///
    /// The internal lock is held only for the arithmetic. Within one
    /// millisecond the 12-bit sequence increments; on wraparound the clock is
    /// busy-polled until the next millisecond (sleeping would stall on coarse
    /// timer resolution).
    pub fn generate(&self) -> i64 {
        let mut state = self.state.lock();
        let mut now = self.clock.elapsed_ms();

        if now == state.last_time {
            state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
            if state.sequence == 0 {
                while now <= state.last_time {
                    now = self.clock.elapsed_ms();
                }
            }
        } else {
            state.sequence = 0;
        }
        state.last_time = now;

        (now << TIME_SHIFT) | (self.node_id << NODE_SHIFT) | state.sequence
    }

    /// The node id embedded in generated identifiers.
    #[must_use]
    pub const fn node_id(&self) -> i64 {
        self.node_id
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI64, Ordering};

    use super::*;

    #[test]
    fn same_millisecond_ids_are_distinct_and_increasing() {
        let generator = SnowflakeGenerator::with_clock(7, || 1_000);

        let mut previous = generator.generate();
        for _ in 0..1_000 {
            let id = generator.generate();
            assert!(id > previous);
            previous = id;
        }
    }

    #[test]
    fn node_bits_match_configured_node() {
        let generator = SnowflakeGenerator::with_clock(0x7FF, || 42);
        let id = generator.generate();

        assert_eq!((id >> 12) & 0x3FF, 0x7FF & 0x3FF);
        assert_eq!(generator.node_id(), 0x3FF);
    }

    #[test]
    fn fresh_millisecond_resets_sequence() {
        let ticks = AtomicI64::new(100);
        let generator =
            SnowflakeGenerator::with_clock(1, move || ticks.fetch_add(1, Ordering::Relaxed));

        let first = generator.generate();
        let second = generator.generate();

        assert_eq!(first & 0xFFF, 0);
        assert_eq!(second & 0xFFF, 0);
        assert!(second > first);
    }

    #[test]
    fn timestamp_occupies_high_bits() {
        let generator = SnowflakeGenerator::with_clock(3, || 5);
        let id = generator.generate();
        assert_eq!(id >> 22, 5);
    }

    #[test]
    fn monotonic_clock_generates_nonzero() {
        let generator = SnowflakeGenerator::new(1);
        assert!(generator.generate() > 0);
    }

    #[test]
    fn random_node_stays_within_mask() {
        let generator = SnowflakeGenerator::with_random_node();
        assert!((0..1024).contains(&generator.node_id()));
        assert!(generator.generate() > 0);
    }
}
