//! # crosslock-settlement
//!
//! The destination-chain side of Crosslock: a settlement ledger that pays
//! out fulfillments against escrowed source-chain orders and emits the
//! signed unlock/refund messages the escrow side consumes.
//!
//! A fulfillment is authorized by the auction emitter's signed message
//! naming the winning driver and promised amount (or, for bypass-mode
//! orders, by anyone willing to pay the order's minimum). The ledger
//! recomputes the order hash from the caller-supplied key and refuses any
//! message whose hash disagrees — the hash, not the message, is the
//! authority on the order's terms.

pub mod batcher;
pub mod ledger;
pub mod refund;
pub mod rescue;

pub use batcher::MessageBatcher;
pub use ledger::{PendingPayout, SettlementLedger};
