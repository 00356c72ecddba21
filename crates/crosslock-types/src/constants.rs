//! System-wide constants for the Crosslock settlement core.

/// Decimal precision of the protocol's shared fixed-point unit.
/// All wire amounts and fee math use this precision, regardless of the
/// underlying asset's native decimal count.
pub const NORMALIZED_DECIMALS: u8 = 8;

/// Basis-point denominator (1 bps = 1/10000).
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Maximum fee rate, applied independently to the referrer rate and the
/// oracle-supplied protocol rate.
pub const MAX_FEE_BPS: u16 = 50;

/// Consistency level requested from the message bridge for published
/// messages (finalized).
pub const CONSISTENCY_FINALIZED: u8 = 15;

/// Maximum consumed rescue sequences to retain before pruning oldest.
pub const RESCUE_SEQUENCE_CACHE_SIZE: usize = 65_536;

/// Domain separator for the gasless create-order authorization digest.
pub const AUTH_DOMAIN: &[u8] = b"crosslock:create_order:v2:";

/// Domain separator for the order-hash derivation.
pub const ORDER_HASH_DOMAIN: &[u8] = b"crosslock:order_key:v2:";

/// Domain separator for compressed-batch payload commitments.
pub const BATCH_COMMITMENT_DOMAIN: &[u8] = b"crosslock:unlock_batch:v2:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Protocol name.
pub const PROTOCOL_NAME: &str = "Crosslock";
