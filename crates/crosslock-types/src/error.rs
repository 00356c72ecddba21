//! Error types for the Crosslock settlement core.
//!
//! All errors use the `CL_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Order / record errors
//! - 2xx: Economic errors
//! - 3xx: Authorization errors
//! - 4xx: Temporal errors
//! - 5xx: Structural / codec errors
//! - 6xx: Bridge / rescue errors
//! - 9xx: General / internal errors
//!
//! Every error aborts the triggering call with no partial state change.
//! Best-effort sub-operations (fee forwarding, oracle queries) swallow
//! their errors at the call site instead of propagating them.

use thiserror::Error;

use crate::{ChainId, OrderHash, OrderStatus};

/// Central error enum for all Crosslock operations.
#[derive(Debug, Error)]
pub enum CrosslockError {
    // =================================================================
    // Order / Record Errors (1xx)
    // =================================================================
    /// No record exists for this order hash.
    #[error("CL_ERR_100: Order not found: {0}")]
    OrderNotFound(OrderHash),

    /// The order parameters failed validation.
    #[error("CL_ERR_101: Invalid order: {reason}")]
    InvalidOrder { reason: String },

    /// A record with this order hash already exists and the bump rule
    /// does not apply.
    #[error("CL_ERR_102: Duplicate order: {0}")]
    DuplicateOrder(OrderHash),

    /// The record is not in the status the operation requires.
    #[error("CL_ERR_103: Wrong order status: expected {expected}, got {actual}")]
    WrongOrderStatus {
        expected: OrderStatus,
        actual: OrderStatus,
    },

    /// A bump deposit must strictly exceed the prior deposit.
    #[error("CL_ERR_104: Bump too small: prior {prior}, offered {offered}")]
    BumpTooSmall { prior: u64, offered: u64 },

    // =================================================================
    // Economic Errors (2xx)
    // =================================================================
    /// The normalized deposit amount is zero.
    #[error("CL_ERR_200: Deposit amount normalizes to zero")]
    DepositTooSmall,

    /// cancel_fee + refund_fee must be strictly less than the deposit.
    #[error("CL_ERR_201: Fees {fees} exceed deposit {deposit}")]
    FeesExceedDeposit { fees: u64, deposit: u64 },

    /// A fee rate is above the protocol cap.
    #[error("CL_ERR_202: Fee rate {bps} bps above cap")]
    FeeRateAboveCap { bps: u16 },

    /// The fulfillment amount is below the promised / minimum amount.
    #[error("CL_ERR_203: Fulfill amount too low: need {needed}, got {provided}")]
    FulfillAmountTooLow { needed: u64, provided: u64 },

    /// A vault account lacks the balance for the requested movement.
    #[error("CL_ERR_204: Insufficient vault balance: need {needed}, have {available}")]
    InsufficientVaultBalance { needed: u64, available: u64 },

    /// Gas drop is only meaningful when the output asset is non-native.
    #[error("CL_ERR_205: Gas drop requested with native output asset")]
    GasDropWithNativeOutput,

    /// A normalized amount does not fit the 64-bit wire representation.
    #[error("CL_ERR_206: Amount overflows normalized representation")]
    AmountOverflow,

    // =================================================================
    // Authorization Errors (3xx)
    // =================================================================
    /// The ledger is paused.
    #[error("CL_ERR_300: Ledger is paused")]
    Paused,

    /// Only the named driver may fulfill before the penalty window opens.
    #[error("CL_ERR_301: Caller is not the auction driver")]
    UnauthorizedDriver,

    /// The message emitter does not match the registered trusted emitter.
    #[error("CL_ERR_302: Untrusted emitter on chain {chain}")]
    UntrustedEmitter { chain: ChainId },

    /// No trusted emitter is registered for this chain.
    #[error("CL_ERR_303: No emitter registered for chain {0}")]
    UnknownEmitterChain(ChainId),

    /// Caller is not the governance owner.
    #[error("CL_ERR_304: Caller is not the owner")]
    NotOwner,

    /// Caller is not the proposed pending owner.
    #[error("CL_ERR_305: Caller is not the pending owner")]
    NotPendingOwner,

    /// The trader's create-order authorization signature did not verify.
    #[error("CL_ERR_306: Order authorization signature invalid")]
    AuthorizationInvalid,

    /// Only the order's destination address may settle a payload order.
    #[error("CL_ERR_307: Caller is not the payload recipient")]
    NotPayloadRecipient,

    // =================================================================
    // Temporal Errors (4xx)
    // =================================================================
    /// The order's deadline has already passed.
    #[error("CL_ERR_400: Deadline passed at {deadline}")]
    DeadlinePassed { deadline: u64 },

    /// The operation requires the deadline to have passed.
    #[error("CL_ERR_401: Deadline {deadline} not reached")]
    DeadlineNotReached { deadline: u64 },

    // =================================================================
    // Structural / Codec Errors (5xx)
    // =================================================================
    /// The message action tag does not match the expected message kind.
    #[error("CL_ERR_500: Wrong action tag: expected {expected}, got {actual}")]
    WrongActionTag { expected: u8, actual: u8 },

    /// The message length does not match the expected fixed size.
    #[error("CL_ERR_501: Wrong message length: expected {expected}, got {actual}")]
    WrongMessageLength { expected: usize, actual: usize },

    /// The recomputed order hash does not equal the message-carried hash.
    #[error("CL_ERR_502: Order hash mismatch")]
    OrderHashMismatch,

    /// A compressed batch's out-of-band payload does not match the signed
    /// hash commitment.
    #[error("CL_ERR_503: Batch payload commitment mismatch")]
    CommitmentMismatch,

    /// The message payload is structurally malformed.
    #[error("CL_ERR_504: Malformed message: {reason}")]
    MalformedMessage { reason: String },

    // =================================================================
    // Bridge / Rescue Errors (6xx)
    // =================================================================
    /// The message bridge rejected the raw message.
    #[error("CL_ERR_600: Bridge verification failed: {reason}")]
    BridgeVerification { reason: String },

    /// Rescue messages are accepted from one fixed chain only.
    #[error("CL_ERR_601: Rescue message from untrusted chain {0}")]
    RescueChainUntrusted(ChainId),

    /// This bridge sequence was already consumed (replay).
    #[error("CL_ERR_602: Sequence {0} already consumed")]
    SequenceConsumed(u64),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("CL_ERR_900: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, CrosslockError>;
