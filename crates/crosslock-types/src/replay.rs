//! Replay guard for consumed bridge sequences.
//!
//! Cross-chain delivery is at-least-once; the rescue path must consume each
//! bridge sequence exactly once. The guard keeps a bounded set with FIFO
//! eviction so memory stays predictable in long-running processes.

use std::collections::{HashSet, VecDeque};

use crate::{CrosslockError, Result, Sequence};

/// Bounded set of already-consumed bridge sequences.
pub struct ConsumedSequences {
    consumed: HashSet<Sequence>,
    /// Insertion order for FIFO eviction (front = oldest).
    order: VecDeque<Sequence>,
    max_size: usize,
}

impl ConsumedSequences {
    /// # Panics
    /// Panics if `max_size` is zero.
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        assert!(max_size > 0, "ConsumedSequences max_size must be > 0");
        Self {
            consumed: HashSet::with_capacity(max_size),
            order: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Mark a sequence as consumed.
    ///
    /// # Errors
    /// Returns [`CrosslockError::SequenceConsumed`] on a repeat.
    pub fn consume(&mut self, sequence: Sequence) -> Result<()> {
        if self.consumed.contains(&sequence) {
            return Err(CrosslockError::SequenceConsumed(sequence.0));
        }
        if self.consumed.len() >= self.max_size {
            if let Some(oldest) = self.order.pop_front() {
                self.consumed.remove(&oldest);
            }
        }
        self.consumed.insert(sequence);
        self.order.push_back(sequence);
        Ok(())
    }

    #[must_use]
    pub fn is_consumed(&self, sequence: Sequence) -> bool {
        self.consumed.contains(&sequence)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.consumed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.consumed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_consume_ok() {
        let mut guard = ConsumedSequences::new(16);
        assert!(guard.consume(Sequence(1)).is_ok());
        assert!(guard.is_consumed(Sequence(1)));
    }

    #[test]
    fn replay_blocked() {
        let mut guard = ConsumedSequences::new(16);
        guard.consume(Sequence(7)).unwrap();
        let err = guard.consume(Sequence(7)).unwrap_err();
        assert!(matches!(err, CrosslockError::SequenceConsumed(7)));
    }

    #[test]
    fn evicts_oldest_at_capacity() {
        let mut guard = ConsumedSequences::new(2);
        guard.consume(Sequence(1)).unwrap();
        guard.consume(Sequence(2)).unwrap();
        guard.consume(Sequence(3)).unwrap();
        assert_eq!(guard.len(), 2);
        assert!(!guard.is_consumed(Sequence(1)));
        assert!(guard.is_consumed(Sequence(2)));
        assert!(guard.is_consumed(Sequence(3)));
    }

    #[test]
    #[should_panic(expected = "max_size must be > 0")]
    fn zero_capacity_panics() {
        let _ = ConsumedSequences::new(0);
    }
}
