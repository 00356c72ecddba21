//! # crosslock-escrow
//!
//! The source-chain side of Crosslock: an escrow ledger that locks a
//! trader's deposit under a deterministic order hash and releases it only
//! on a verified signed message from the destination chain (unlock or
//! refund), on a local post-deadline cancellation, or through the admin
//! rescue path.
//!
//! The ledger never talks to the settlement side directly; the order hash
//! recomputed from call parameters is the sole correlator, and every
//! release path is gated on the record still being in its initial CREATED
//! status, which makes all message handlers idempotent under at-least-once
//! bridge delivery.

pub mod authorization;
pub mod ledger;
pub mod refund;
pub mod release;
pub mod rescue;

pub use authorization::authorization_digest;
pub use ledger::{EscrowLedger, EscrowRecord};
