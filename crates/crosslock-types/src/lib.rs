//! # crosslock-types
//!
//! Shared types, errors, and collaborator interfaces for the **Crosslock**
//! cross-chain intent settlement core.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`OrderHash`], [`Address32`], [`ChainId`], [`Sequence`]
//! - **Order model**: [`OrderKey`], [`OrderParams`], [`OrderStatus`],
//!   [`PayloadKind`], [`AuctionMode`], [`BondTerms`]
//! - **Wire values**: [`FulfillMsg`], [`UnlockMsg`], [`RefundMsg`], [`RescueMsg`]
//! - **Fee math**: [`FeeSplit`], [`fees::split`], [`fees::normalize`]
//! - **Collaborators**: [`MessageBridge`], [`FeeOracle`]
//! - **Governance**: [`GovernanceConfig`], [`EmitterRegistry`], [`LedgerConfig`]
//! - **Vault accounting**: [`VaultBook`]
//! - **Replay guard**: [`ConsumedSequences`]
//! - **Errors**: [`CrosslockError`] with `CL_ERR_` prefix codes
//! - **Constants**: normalized precision, fee caps, domain separators

pub mod bridge;
pub mod config;
pub mod constants;
pub mod error;
pub mod fees;
pub mod ids;
pub mod key;
pub mod message;
pub mod oracle;
pub mod replay;
pub mod status;
pub mod vault;

// Re-export all primary types at crate root for ergonomic imports:
//   use crosslock_types::{OrderKey, OrderStatus, UnlockMsg, ...};

pub use bridge::*;
pub use config::*;
pub use error::*;
pub use fees::FeeSplit;
pub use ids::*;
pub use key::*;
pub use message::*;
pub use oracle::*;
pub use replay::*;
pub use status::*;
pub use vault::VaultBook;

// Constants are accessed via `crosslock_types::constants::FOO`
// (not re-exported to avoid name collisions).
