//! Packed winner-claim message.
//!
//! Layout (tightly packed, big-endian), identical to Solidity's
//! `abi.encodePacked(uint256 gameId, address winner, uint256 timestamp, bytes32 nonce)`:
//!
//! | offset | width | field     |
//! |--------|-------|-----------|
//! | 0      | 32    | gameId    |
//! | 32     | 20    | winner    |
//! | 52     | 32    | timestamp |
//! | 84     | 32    | nonce     |
//!
//! Signer and verifier both go through [`WinnerClaim::signing_hash`], so the
//! two sides cannot drift apart in field order or width.

use super::types::{u256_word, GameId};
use crate::crypto::{keccak256, personal_message_hash, Address, Nonce, NONCE_LEN};

/// Total length of the packed message
pub const PACKED_LEN: usize = 32 + 20 + 32 + NONCE_LEN;

/// The unsigned statement "game `game_id` was won by `winner`"
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WinnerClaim {
    pub game_id: GameId,
    pub winner: Address,
    pub timestamp: u64,
    pub nonce: Nonce,
}

impl WinnerClaim {
    /// Tightly packed message bytes
    pub fn pack(&self) -> [u8; PACKED_LEN] {
        let mut out = [0u8; PACKED_LEN];
        out[..32].copy_from_slice(&self.game_id.to_word());
        out[32..52].copy_from_slice(self.winner.as_bytes());
        out[52..84].copy_from_slice(&u256_word(self.timestamp));
        out[84..].copy_from_slice(self.nonce.as_bytes());
        out
    }

    /// keccak256 of the packed message
    pub fn message_hash(&self) -> [u8; 32] {
        keccak256(self.pack())
    }

    /// EIP-191 personal-message hash of `message_hash`; this is what gets signed
    pub fn signing_hash(&self) -> [u8; 32] {
        personal_message_hash(&self.message_hash())
    }
}
