//! Order lifecycle status — the per-chain finite state machine.
//!
//! Both ledgers keep an independent record under the same order hash.
//! Transitions are **monotonic**: once a record leaves CREATED it never
//! returns, and exactly one settlement-or-cancellation branch is reachable:
//!
//! ```text
//!                ┌────────────┐   settle_with_payload  ┌─────────┐
//!        ┌──────▶│ FULFILLED  ├───────────────────────▶│ SETTLED │
//!        │       └────────────┘                        └─────────┘
//!   ┌────┴────┐  direct fulfill                        ┌──────────┐
//!   │ CREATED ├───────────────────────────────────────▶│ SETTLED  │
//!   └─┬─┬─┬───┘  verified unlock message               ┌──────────┐
//!     │ │ └────────────────────────────────────────────▶ UNLOCKED │
//!     │ │        deadline cancel                       ┌──────────┐
//!     │ └──────────────────────────────────────────────▶ CANCELED │
//!     │          verified refund message               ┌──────────┐
//!     └────────────────────────────────────────────────▶ REFUNDED │
//! ```
//!
//! Only the admin rescue path may bypass this matrix.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an order record. Records are never deleted;
/// the status acts as a tombstone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Deposit stored (escrow side) or no local action yet (settlement side).
    Created,
    /// Payload-kind order paid for, awaiting explicit settlement by the
    /// destination address.
    Fulfilled,
    /// Destination payout complete. **Terminal.**
    Settled,
    /// Escrow released to the unlock recipient. **Terminal.**
    Unlocked,
    /// Deadline-expired cancellation. Terminal on the escrow side after the
    /// local deposit return; precedes REFUNDED on the settlement side.
    Canceled,
    /// Escrow returned via a verified refund message. **Terminal.**
    Refunded,
}

impl OrderStatus {
    /// Can this status transition to the given target under the normal
    /// (non-rescue) rules?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::Created,
                Self::Fulfilled | Self::Settled | Self::Unlocked | Self::Canceled | Self::Refunded
            ) | (Self::Fulfilled, Self::Settled)
        )
    }

    /// Whether this status is terminal under the normal rules.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Settled | Self::Unlocked | Self::Canceled | Self::Refunded
        )
    }

    /// Fixed wire tag for the rescue message codec.
    #[must_use]
    pub fn wire_tag(&self) -> u8 {
        match self {
            Self::Created => 1,
            Self::Fulfilled => 2,
            Self::Settled => 3,
            Self::Unlocked => 4,
            Self::Canceled => 5,
            Self::Refunded => 6,
        }
    }

    /// Decode a wire tag back into a status.
    #[must_use]
    pub fn from_wire_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::Created),
            2 => Some(Self::Fulfilled),
            3 => Some(Self::Settled),
            4 => Some(Self::Unlocked),
            5 => Some(Self::Canceled),
            6 => Some(Self::Refunded),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "CREATED"),
            Self::Fulfilled => write!(f, "FULFILLED"),
            Self::Settled => write!(f, "SETTLED"),
            Self::Unlocked => write!(f, "UNLOCKED"),
            Self::Canceled => write!(f, "CANCELED"),
            Self::Refunded => write!(f, "REFUNDED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [OrderStatus; 6] = [
        OrderStatus::Created,
        OrderStatus::Fulfilled,
        OrderStatus::Settled,
        OrderStatus::Unlocked,
        OrderStatus::Canceled,
        OrderStatus::Refunded,
    ];

    #[test]
    fn created_reaches_every_branch() {
        for target in [
            OrderStatus::Fulfilled,
            OrderStatus::Settled,
            OrderStatus::Unlocked,
            OrderStatus::Canceled,
            OrderStatus::Refunded,
        ] {
            assert!(OrderStatus::Created.can_transition_to(target));
        }
    }

    #[test]
    fn fulfilled_only_settles() {
        assert!(OrderStatus::Fulfilled.can_transition_to(OrderStatus::Settled));
        for target in ALL {
            if target != OrderStatus::Settled {
                assert!(!OrderStatus::Fulfilled.can_transition_to(target));
            }
        }
    }

    #[test]
    fn terminal_states_are_frozen() {
        for from in [
            OrderStatus::Settled,
            OrderStatus::Unlocked,
            OrderStatus::Canceled,
            OrderStatus::Refunded,
        ] {
            assert!(from.is_terminal());
            for target in ALL {
                assert!(
                    !from.can_transition_to(target),
                    "{from} must not transition to {target}"
                );
            }
        }
    }

    #[test]
    fn nothing_returns_to_created() {
        for from in ALL {
            assert!(!from.can_transition_to(OrderStatus::Created));
        }
    }

    #[test]
    fn wire_tag_roundtrip() {
        for status in ALL {
            assert_eq!(OrderStatus::from_wire_tag(status.wire_tag()), Some(status));
        }
        assert_eq!(OrderStatus::from_wire_tag(0), None);
        assert_eq!(OrderStatus::from_wire_tag(7), None);
    }

    #[test]
    fn display_is_uppercase() {
        assert_eq!(format!("{}", OrderStatus::Created), "CREATED");
        assert_eq!(format!("{}", OrderStatus::Unlocked), "UNLOCKED");
    }
}
