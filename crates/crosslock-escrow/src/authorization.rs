//! Gasless order creation via signed trader authorization.
//!
//! A relayer submits the order on the trader's behalf. The trader's
//! identity is their ed25519 verifying key (its 32 bytes are the trader
//! address), and the signature covers a domain-separated digest of the
//! order hash, so it authorizes exactly one order and nothing else. The
//! relayer's submission fee comes out of the deposit before escrow.

use chrono::{DateTime, Utc};
use ed25519_dalek::{Signature, VerifyingKey};
use sha2::{Digest, Sha256};
use tracing::info;

use crosslock_codec::order_hash;
use crosslock_types::constants::AUTH_DOMAIN;
use crosslock_types::oracle::guarded_protocol_bps;
use crosslock_types::{
    fees, Address32, CrosslockError, FeeOracle, OrderHash, OrderKey, OrderParams, Result,
};

use crate::ledger::{hash_custom_payload, EscrowLedger};

/// Digest the trader signs: Sha256 over the authorization domain prefix
/// and the order hash.
#[must_use]
pub fn authorization_digest(hash: &OrderHash) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(AUTH_DOMAIN);
    hasher.update(hash.as_bytes());
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

impl EscrowLedger {
    /// Create an order submitted by a relayer under the trader's signed
    /// authorization, deducting `submission_fee` from the deposit to the
    /// relayer before escrow.
    #[allow(clippy::too_many_arguments)]
    pub fn create_with_signed_authorization(
        &mut self,
        trader_key: &VerifyingKey,
        signature: &Signature,
        relayer: Address32,
        submission_fee: u64,
        token_in: Address32,
        amount: u128,
        decimals: u8,
        params: OrderParams,
        custom_payload: Option<&[u8]>,
        oracle: &dyn FeeOracle,
        now: DateTime<Utc>,
    ) -> Result<OrderHash> {
        let trader = Address32(trader_key.to_bytes());
        let normalized = fees::normalize(amount, decimals)?;
        let net = normalized
            .checked_sub(submission_fee)
            .filter(|net| *net > 0)
            .ok_or(CrosslockError::FeesExceedDeposit {
                fees: submission_fee,
                deposit: normalized,
            })?;

        let custom_hash = custom_payload.map(hash_custom_payload);
        let protocol_bps = guarded_protocol_bps(
            oracle,
            net,
            token_in,
            params.token_out,
            params.dest_chain,
            params.referrer_bps,
        );
        let key = OrderKey::assemble(
            trader,
            self.config.local_chain,
            token_in,
            params,
            protocol_bps,
            custom_hash,
        );
        let hash = order_hash(&key);

        let digest = authorization_digest(&hash);
        trader_key
            .verify_strict(&digest, signature)
            .map_err(|_| CrosslockError::AuthorizationInvalid)?;

        let created =
            self.create_normalized(trader, token_in, net, params, custom_hash, protocol_bps, now)?;
        if submission_fee > 0 {
            self.vault.credit(relayer, token_in, submission_fee)?;
            info!(
                order = %created.short(),
                relayer = %relayer,
                fee = submission_fee,
                "submission fee paid to relayer"
            );
        }
        Ok(created)
    }
}
