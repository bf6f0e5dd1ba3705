//! On-chain account deserialization.
//!
//! Read-only mirrors of the `terminal_marketplace` program's accounts.  Byte
//! offsets and the 8-byte Anchor discriminators are compiled in — no IDL is
//! read at runtime — and every decode validates the discriminator, so an
//! account that is not what its address claims fails loudly.

use crate::error::{Error, Result};
use crate::instructions::account_disc;
use solana_sdk::pubkey::Pubkey;

// ─── Marketplace ──────────────────────────────────────────────────────────────

/// Total serialized size of a `TerminalMarketplace` account.
pub const MARKETPLACE_ACCOUNT_LEN: usize = 8 + 32 + 32 + 8 + 8 + 8;

/// Deserialized `TerminalMarketplace` account state (the singleton record).
///
/// Layout (after the 8-byte Anchor discriminator):
/// ```text
/// authority(32)  treasury(32)  fee_rate(8)  total_volume(8)  total_trades(8)
/// = 96 bytes
/// ```
#[derive(Debug, Clone)]
pub struct MarketplaceState {
    pub authority:    Pubkey,
    pub treasury:     Pubkey,
    /// Trade fee in basis points (1 bp = 0.01%).
    pub fee_rate:     u64,
    /// Cumulative traded volume in lamports.
    pub total_volume: u64,
    pub total_trades: u64,
}

/// Deserialize a `TerminalMarketplace` account from raw bytes.
pub fn parse_marketplace(data: &[u8]) -> Result<MarketplaceState> {
    check_account(data, MARKETPLACE_ACCOUNT_LEN, "TerminalMarketplace")?;
    Ok(MarketplaceState {
        authority:    read_pubkey(data, 8)?,
        treasury:     read_pubkey(data, 40)?,
        fee_rate:     read_u64(data, 72)?,
        total_volume: read_u64(data, 80)?,
        total_trades: read_u64(data, 88)?,
    })
}

// ─── Listing ──────────────────────────────────────────────────────────────────

/// Total serialized size of a `TerminalListing` account.
pub const LISTING_ACCOUNT_LEN: usize = 8 + 32 + 32 + 8 + 8 + 1;

/// Deserialized `TerminalListing` account state.
///
/// Layout (after the 8-byte Anchor discriminator):
/// ```text
/// seller(32)  mint(32)  price(8)  created_at(8)  is_active(1)  = 89 bytes
/// ```
#[derive(Debug, Clone)]
pub struct ListingState {
    pub seller:     Pubkey,
    pub mint:       Pubkey,
    /// Asking price in lamports.
    pub price:      u64,
    /// Unix timestamp of listing creation.
    pub created_at: i64,
    pub is_active:  bool,
}

/// Deserialize a `TerminalListing` account from raw bytes.
pub fn parse_listing(data: &[u8]) -> Result<ListingState> {
    check_account(data, LISTING_ACCOUNT_LEN, "TerminalListing")?;
    Ok(ListingState {
        seller:     read_pubkey(data, 8)?,
        mint:       read_pubkey(data, 40)?,
        price:      read_u64(data, 72)?,
        created_at: read_i64(data, 80)?,
        is_active:  data[88] != 0,
    })
}

// ─── Validation ───────────────────────────────────────────────────────────────

fn check_account(data: &[u8], expected_len: usize, type_name: &str) -> Result<()> {
    if data.len() < expected_len {
        return Err(Error::Parse {
            offset: 0,
            reason: format!(
                "{} account is {} bytes; expected {}",
                type_name,
                data.len(),
                expected_len
            ),
        });
    }
    if data[..8] != account_disc(type_name) {
        return Err(Error::Parse {
            offset: 0,
            reason: format!("discriminator does not match {type_name}"),
        });
    }
    Ok(())
}

// ─── Byte-slice primitives ────────────────────────────────────────────────────

pub(crate) fn read_pubkey(data: &[u8], offset: usize) -> Result<Pubkey> {
    let b: [u8; 32] = data[offset..offset + 32]
        .try_into()
        .map_err(|_| Error::Parse {
            offset,
            reason: "slice too short for Pubkey (32 bytes)".into(),
        })?;
    Ok(Pubkey::from(b))
}

pub(crate) fn read_u64(data: &[u8], offset: usize) -> Result<u64> {
    let b: [u8; 8] = data[offset..offset + 8]
        .try_into()
        .map_err(|_| Error::Parse { offset, reason: "slice too short for u64".into() })?;
    Ok(u64::from_le_bytes(b))
}

pub(crate) fn read_i64(data: &[u8], offset: usize) -> Result<i64> {
    let b: [u8; 8] = data[offset..offset + 8]
        .try_into()
        .map_err(|_| Error::Parse { offset, reason: "slice too short for i64".into() })?;
    Ok(i64::from_le_bytes(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marketplace_image(
        authority: &Pubkey,
        treasury: &Pubkey,
        fee_rate: u64,
        total_volume: u64,
        total_trades: u64,
    ) -> Vec<u8> {
        let mut data = account_disc("TerminalMarketplace").to_vec();
        data.extend_from_slice(authority.as_ref());
        data.extend_from_slice(treasury.as_ref());
        data.extend_from_slice(&fee_rate.to_le_bytes());
        data.extend_from_slice(&total_volume.to_le_bytes());
        data.extend_from_slice(&total_trades.to_le_bytes());
        data
    }

    fn listing_image(
        seller: &Pubkey,
        mint: &Pubkey,
        price: u64,
        created_at: i64,
        is_active: bool,
    ) -> Vec<u8> {
        let mut data = account_disc("TerminalListing").to_vec();
        data.extend_from_slice(seller.as_ref());
        data.extend_from_slice(mint.as_ref());
        data.extend_from_slice(&price.to_le_bytes());
        data.extend_from_slice(&created_at.to_le_bytes());
        data.push(is_active as u8);
        data
    }

    #[test]
    fn marketplace_round_trips() {
        let authority = Pubkey::new_unique();
        let treasury = Pubkey::new_unique();
        let data = marketplace_image(&authority, &treasury, 250, 12_500_000_000, 7);
        assert_eq!(data.len(), MARKETPLACE_ACCOUNT_LEN);

        let state = parse_marketplace(&data).unwrap();
        assert_eq!(state.authority, authority);
        assert_eq!(state.treasury, treasury);
        assert_eq!(state.fee_rate, 250);
        assert_eq!(state.total_volume, 12_500_000_000);
        assert_eq!(state.total_trades, 7);
    }

    #[test]
    fn listing_round_trips() {
        let seller = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let data = listing_image(&seller, &mint, 2_500_000_000, 1_700_000_000, true);
        assert_eq!(data.len(), LISTING_ACCOUNT_LEN);

        let state = parse_listing(&data).unwrap();
        assert_eq!(state.seller, seller);
        assert_eq!(state.mint, mint);
        assert_eq!(state.price, 2_500_000_000);
        assert_eq!(state.created_at, 1_700_000_000);
        assert!(state.is_active);
    }

    #[test]
    fn inactive_listing_flag() {
        let data = listing_image(&Pubkey::new_unique(), &Pubkey::new_unique(), 1, 0, false);
        assert!(!parse_listing(&data).unwrap().is_active);
    }

    #[test]
    fn short_buffer_is_a_parse_error() {
        let data = listing_image(&Pubkey::new_unique(), &Pubkey::new_unique(), 1, 0, true);
        let err = parse_listing(&data[..40]).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn wrong_discriminator_is_rejected() {
        // A marketplace image is the wrong account type for parse_listing even
        // if it were long enough.
        let mut data =
            marketplace_image(&Pubkey::new_unique(), &Pubkey::new_unique(), 250, 0, 0);
        data.truncate(LISTING_ACCOUNT_LEN);
        let err = parse_listing(&data).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert!(err.to_string().contains("discriminator"));
    }
}
