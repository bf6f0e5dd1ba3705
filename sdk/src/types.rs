//! Result and info types returned by [`crate::client::MarketplaceClient`].
//!
//! Every orchestration method hands back the addresses it derived, the state
//! it fetched, and (for mutating calls) the confirmed transaction signature,
//! so callers can report without re-deriving anything.

use solana_sdk::pubkey::Pubkey;

use crate::state::{ListingState, MarketplaceState};

/// Outcome of `initialize`.
#[derive(Debug, Clone)]
pub struct InitializeResult {
    pub signature:   String,
    pub marketplace: Pubkey,
    pub authority:   Pubkey,
    pub treasury:    Pubkey,
    /// Fee rate in basis points.
    pub fee_rate:    u64,
}

/// Outcome of `create_listing`.
#[derive(Debug, Clone)]
pub struct ListingResult {
    pub signature: String,
    pub listing:   Pubkey,
    pub seller:    Pubkey,
    pub mint:      Pubkey,
    /// Asking price in lamports.
    pub price:     u64,
    /// Escrow token account now holding the NFT.
    pub escrow:    Pubkey,
}

/// Outcome of `buy`.
#[derive(Debug, Clone)]
pub struct BuyResult {
    pub signature: String,
    pub listing:   Pubkey,
    pub order:     Pubkey,
    pub seller:    Pubkey,
    pub mint:      Pubkey,
    /// Price paid in lamports (from the fetched listing).
    pub price:     u64,
    /// Fee destination (from the fetched marketplace record).
    pub treasury:  Pubkey,
}

/// Outcome of `cancel_listing`.
#[derive(Debug, Clone)]
pub struct CancelResult {
    pub signature: String,
    pub listing:   Pubkey,
    pub mint:      Pubkey,
}

/// Outcome of `update_price`.
#[derive(Debug, Clone)]
pub struct UpdatePriceResult {
    pub signature: String,
    pub listing:   Pubkey,
    pub mint:      Pubkey,
    /// New asking price in lamports.
    pub new_price: u64,
}

/// A listing record together with its derived address.
#[derive(Debug, Clone)]
pub struct ListingInfo {
    pub address: Pubkey,
    pub state:   ListingState,
}

/// The marketplace record together with its derived address.
#[derive(Debug, Clone)]
pub struct MarketplaceInfo {
    pub address: Pubkey,
    pub state:   MarketplaceState,
}

/// Raw metadata of an arbitrary account, for `account-info` display.
#[derive(Debug, Clone)]
pub struct AccountSummary {
    pub address:    Pubkey,
    pub lamports:   u64,
    pub owner:      Pubkey,
    pub data_len:   usize,
    pub executable: bool,
}

/// Node and wallet status, for `cluster-status` display.
#[derive(Debug, Clone)]
pub struct ClusterStatus {
    /// Node software version reported by the RPC endpoint.
    pub solana_core:      String,
    pub wallet:           Option<Pubkey>,
    pub balance_lamports: Option<u64>,
}
