//! PDA derivation and low-level Anchor instruction builders.
//!
//! Each builder constructs a [`solana_sdk::instruction::Instruction`] ready
//! for signing and submission.  Account order mirrors the deployed
//! `terminal_marketplace` program's `#[derive(Accounts)]` structs exactly —
//! a transaction referencing a wrong address or a reordered account list is
//! rejected by the program.
//!
//! Anchor instruction discriminators: `sha256("global:{name}")[..8]`.
//! Anchor account discriminators:    `sha256("account:{TypeName}")[..8]`.

use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};
use std::str::FromStr;

// ─── Well-known program IDs ───────────────────────────────────────────────────

pub(crate) fn spl_token_id() -> Pubkey {
    Pubkey::from_str("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA").unwrap()
}

pub(crate) fn ata_program_id() -> Pubkey {
    Pubkey::from_str("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL").unwrap()
}

// ─── PDA seeds (mirror the deployed program's seed constants) ────────────────

pub const MARKETPLACE_SEED: &[u8] = b"marketplace";
pub const LISTING_SEED:     &[u8] = b"listing";
pub const ORDER_SEED:       &[u8] = b"order";

// ─── PDA derivation helpers ───────────────────────────────────────────────────

/// Derive the marketplace singleton PDA.
///
/// Seeded by the fixed label alone, so the address is constant for a given
/// program id regardless of any other input.
pub fn derive_marketplace(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[MARKETPLACE_SEED], program_id)
}

/// Derive the listing PDA for a seller.
///
/// The program seeds listings by seller ONLY, not by (seller, mint): a seller
/// has at most one derivable listing address no matter how many mints they
/// attempt to list.  This is the deployed program's seed design, consumed
/// as-is — not a constraint this client enforces or can work around.
pub fn derive_listing(seller: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[LISTING_SEED, seller.as_ref()], program_id)
}

/// Derive the order PDA created when `buyer` purchases `mint`.
pub fn derive_order(mint: &Pubkey, buyer: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[ORDER_SEED, mint.as_ref(), buyer.as_ref()],
        program_id,
    )
}

/// Derive the Associated Token Account for a wallet + mint.
///
/// `wallet` may be off-curve (a PDA); the escrow accounts rely on this.
pub fn derive_ata(wallet: &Pubkey, mint: &Pubkey) -> Pubkey {
    let token_prog = spl_token_id();
    Pubkey::find_program_address(
        &[wallet.as_ref(), token_prog.as_ref(), mint.as_ref()],
        &ata_program_id(),
    )
    .0
}

/// Derive the escrow token account holding the listed NFT: the ATA of the
/// listing PDA itself.
pub fn derive_escrow(listing: &Pubkey, mint: &Pubkey) -> Pubkey {
    derive_ata(listing, mint)
}

// ─── Discriminators ───────────────────────────────────────────────────────────

fn disc(name: &str) -> [u8; 8] {
    let preimage = format!("global:{name}");
    let h = solana_sdk::hash::hash(preimage.as_bytes());
    h.to_bytes()[..8].try_into().unwrap()
}

/// Anchor account discriminator: `sha256("account:{TypeName}")[..8]`.
pub(crate) fn account_disc(type_name: &str) -> [u8; 8] {
    let h = solana_sdk::hash::hash(format!("account:{type_name}").as_bytes());
    h.to_bytes()[..8].try_into().unwrap()
}

// ─── initialize ──────────────────────────────────────────────────────────────

/// Build the `initialize` instruction.
///
/// Creates the marketplace singleton with `fee_rate` in basis points and
/// `treasury` as the fee destination.
pub fn initialize_ix(
    program_id: &Pubkey,
    authority:  &Pubkey,
    treasury:   &Pubkey,
    fee_rate:   u64,
) -> Instruction {
    let (marketplace, _) = derive_marketplace(program_id);

    let mut data = disc("initialize").to_vec();
    data.extend_from_slice(&fee_rate.to_le_bytes());

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(marketplace,          false),  // mut PDA (init)
            AccountMeta::new(*authority,            true),  // mut + signer (payer)
            AccountMeta::new_readonly(*treasury,   false),
            AccountMeta::new_readonly(Pubkey::default(), false), // system program
        ],
        data,
    }
}

// ─── create_listing ──────────────────────────────────────────────────────────

/// Build the `create_listing` instruction.
///
/// `price` is in lamports.  The program moves the NFT from the seller's ATA
/// into an escrow ATA owned by the listing PDA.
pub fn create_listing_ix(
    program_id: &Pubkey,
    seller:     &Pubkey,
    mint:       &Pubkey,
    price:      u64,
) -> Instruction {
    let (listing, _)  = derive_listing(seller, program_id);
    let seller_token  = derive_ata(seller, mint);
    let escrow_token  = derive_escrow(&listing, mint);

    let mut data = disc("create_listing").to_vec();
    data.extend_from_slice(&price.to_le_bytes());

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(listing,              false),  // mut PDA (init)
            AccountMeta::new(*seller,               true),  // mut + signer (payer)
            AccountMeta::new_readonly(*mint,       false),
            AccountMeta::new(seller_token,         false),  // mut
            AccountMeta::new(escrow_token,         false),  // mut (init)
            AccountMeta::new_readonly(spl_token_id(),   false),
            AccountMeta::new_readonly(ata_program_id(), false),
            AccountMeta::new_readonly(Pubkey::default(), false), // system program
        ],
        data,
    }
}

// ─── buy_nft ─────────────────────────────────────────────────────────────────

/// Build the `buy_nft` instruction.
///
/// `seller` and `treasury` come from the fetched listing and marketplace
/// records; all other accounts derive from (mint, buyer, seller).
pub fn buy_nft_ix(
    program_id: &Pubkey,
    buyer:      &Pubkey,
    seller:     &Pubkey,
    mint:       &Pubkey,
    treasury:   &Pubkey,
) -> Instruction {
    let (marketplace, _) = derive_marketplace(program_id);
    let (listing, _)     = derive_listing(seller, program_id);
    let (order, _)       = derive_order(mint, buyer, program_id);
    let escrow_token     = derive_escrow(&listing, mint);
    let buyer_token      = derive_ata(buyer, mint);

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(marketplace,          false),  // mut (volume/trade counters)
            AccountMeta::new(listing,              false),  // mut (closed to seller)
            AccountMeta::new(order,                false),  // mut PDA (init)
            AccountMeta::new(*buyer,                true),  // mut + signer (payer)
            AccountMeta::new(*seller,              false),  // mut (receives price − fee)
            AccountMeta::new(*treasury,            false),  // mut (receives fee)
            AccountMeta::new_readonly(*mint,       false),
            AccountMeta::new(escrow_token,         false),  // mut
            AccountMeta::new(buyer_token,          false),  // mut (init_if_needed)
            AccountMeta::new_readonly(spl_token_id(),   false),
            AccountMeta::new_readonly(ata_program_id(), false),
            AccountMeta::new_readonly(Pubkey::default(), false), // system program
        ],
        data: disc("buy_nft").to_vec(),
    }
}

// ─── cancel_listing ──────────────────────────────────────────────────────────

/// Build the `cancel_listing` instruction.
///
/// Returns the escrowed NFT to the seller's ATA and closes the listing.
pub fn cancel_listing_ix(
    program_id: &Pubkey,
    seller:     &Pubkey,
    mint:       &Pubkey,
) -> Instruction {
    let (listing, _) = derive_listing(seller, program_id);
    let escrow_token = derive_escrow(&listing, mint);
    let seller_token = derive_ata(seller, mint);

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(listing,              false),  // mut (closed to seller)
            AccountMeta::new(*seller,               true),  // mut + signer
            AccountMeta::new_readonly(*mint,       false),
            AccountMeta::new(escrow_token,         false),  // mut
            AccountMeta::new(seller_token,         false),  // mut
            AccountMeta::new_readonly(spl_token_id(),   false),
            AccountMeta::new_readonly(ata_program_id(), false),
            AccountMeta::new_readonly(Pubkey::default(), false), // system program
        ],
        data: disc("cancel_listing").to_vec(),
    }
}

// ─── update_price ────────────────────────────────────────────────────────────

/// Build the `update_price` instruction.  `new_price` is in lamports.
pub fn update_price_ix(
    program_id: &Pubkey,
    seller:     &Pubkey,
    mint:       &Pubkey,
    new_price:  u64,
) -> Instruction {
    let (listing, _) = derive_listing(seller, program_id);

    let mut data = disc("update_price").to_vec();
    data.extend_from_slice(&new_price.to_le_bytes());

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(listing,              false),  // mut
            AccountMeta::new_readonly(*seller,      true),  // signer
            AccountMeta::new_readonly(*mint,       false),
        ],
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PROGRAM_ID;

    fn program_id() -> Pubkey {
        Pubkey::from_str(PROGRAM_ID).unwrap()
    }

    #[test]
    fn derivation_is_deterministic() {
        let pid = program_id();
        let seller = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        assert_eq!(derive_marketplace(&pid), derive_marketplace(&pid));
        assert_eq!(derive_listing(&seller, &pid), derive_listing(&seller, &pid));
        assert_eq!(
            derive_order(&mint, &seller, &pid),
            derive_order(&mint, &seller, &pid)
        );
    }

    #[test]
    fn marketplace_address_is_a_singleton() {
        // Depends on the program id alone — no other input can vary it.
        let pid = program_id();
        let (addr, bump) = derive_marketplace(&pid);
        let (again, bump_again) = derive_marketplace(&pid);
        assert_eq!(addr, again);
        assert_eq!(bump, bump_again);

        let other_program = Pubkey::new_unique();
        assert_ne!(addr, derive_marketplace(&other_program).0);
    }

    #[test]
    fn listing_address_is_keyed_by_seller_only() {
        // Two different mints from the same seller collapse to one address.
        let pid = program_id();
        let seller = Pubkey::new_unique();
        let (addr, _) = derive_listing(&seller, &pid);
        assert_eq!(addr, derive_listing(&seller, &pid).0);

        let other_seller = Pubkey::new_unique();
        assert_ne!(addr, derive_listing(&other_seller, &pid).0);
    }

    #[test]
    fn derived_addresses_are_off_curve() {
        let pid = program_id();
        let seller = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        assert!(!derive_marketplace(&pid).0.is_on_curve());
        assert!(!derive_listing(&seller, &pid).0.is_on_curve());
        assert!(!derive_order(&mint, &seller, &pid).0.is_on_curve());
    }

    #[test]
    fn bump_round_trips_through_create_program_address() {
        let pid = program_id();
        let (addr, bump) = derive_marketplace(&pid);
        let recreated =
            Pubkey::create_program_address(&[MARKETPLACE_SEED, &[bump]], &pid).unwrap();
        assert_eq!(addr, recreated);

        let seller = Pubkey::new_unique();
        let (listing, listing_bump) = derive_listing(&seller, &pid);
        let recreated = Pubkey::create_program_address(
            &[LISTING_SEED, seller.as_ref(), &[listing_bump]],
            &pid,
        )
        .unwrap();
        assert_eq!(listing, recreated);
    }

    #[test]
    fn initialize_ix_layout() {
        let pid = program_id();
        let authority = Pubkey::new_unique();
        let treasury = Pubkey::new_unique();
        let ix = initialize_ix(&pid, &authority, &treasury, 250);

        assert_eq!(ix.program_id, pid);
        assert_eq!(ix.accounts.len(), 4);
        assert_eq!(ix.accounts[0].pubkey, derive_marketplace(&pid).0);
        assert!(ix.accounts[1].is_signer && ix.accounts[1].is_writable);
        assert_eq!(ix.accounts[2].pubkey, treasury);
        assert_eq!(ix.accounts[3].pubkey, Pubkey::default());

        assert_eq!(&ix.data[..8], &disc("initialize"));
        assert_eq!(&ix.data[8..], &250u64.to_le_bytes());
    }

    #[test]
    fn create_listing_ix_layout() {
        let pid = program_id();
        let seller = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let ix = create_listing_ix(&pid, &seller, &mint, 1_000_000_000);

        let (listing, _) = derive_listing(&seller, &pid);
        assert_eq!(ix.accounts.len(), 8);
        assert_eq!(ix.accounts[0].pubkey, listing);
        assert_eq!(ix.accounts[1].pubkey, seller);
        assert!(ix.accounts[1].is_signer);
        assert_eq!(ix.accounts[3].pubkey, derive_ata(&seller, &mint));
        assert_eq!(ix.accounts[4].pubkey, derive_escrow(&listing, &mint));

        assert_eq!(&ix.data[..8], &disc("create_listing"));
        assert_eq!(&ix.data[8..], &1_000_000_000u64.to_le_bytes());
    }

    #[test]
    fn buy_nft_ix_account_order() {
        let pid = program_id();
        let buyer = Pubkey::new_unique();
        let seller = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let treasury = Pubkey::new_unique();
        let ix = buy_nft_ix(&pid, &buyer, &seller, &mint, &treasury);

        let (listing, _) = derive_listing(&seller, &pid);
        assert_eq!(ix.accounts.len(), 12);
        assert_eq!(ix.accounts[0].pubkey, derive_marketplace(&pid).0);
        assert_eq!(ix.accounts[1].pubkey, listing);
        assert_eq!(ix.accounts[2].pubkey, derive_order(&mint, &buyer, &pid).0);
        assert_eq!(ix.accounts[3].pubkey, buyer);
        assert!(ix.accounts[3].is_signer);
        assert_eq!(ix.accounts[4].pubkey, seller);
        assert!(ix.accounts[4].is_writable && !ix.accounts[4].is_signer);
        assert_eq!(ix.accounts[5].pubkey, treasury);
        assert_eq!(ix.accounts[6].pubkey, mint);
        assert!(!ix.accounts[6].is_writable);
        assert_eq!(ix.accounts[7].pubkey, derive_escrow(&listing, &mint));
        assert_eq!(ix.accounts[8].pubkey, derive_ata(&buyer, &mint));
        assert_eq!(ix.data, disc("buy_nft").to_vec());
    }

    #[test]
    fn update_price_ix_layout() {
        let pid = program_id();
        let seller = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let ix = update_price_ix(&pid, &seller, &mint, 2_500_000_000);

        assert_eq!(ix.accounts.len(), 3);
        assert!(!ix.accounts[1].is_writable && ix.accounts[1].is_signer);
        assert_eq!(&ix.data[..8], &disc("update_price"));
        assert_eq!(&ix.data[8..], &2_500_000_000u64.to_le_bytes());
    }

    #[test]
    fn escrow_owner_is_the_listing_pda() {
        // The escrow ATA must be derivable even though its owner is off-curve.
        let pid = program_id();
        let seller = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let (listing, _) = derive_listing(&seller, &pid);
        assert!(!listing.is_on_curve());
        let escrow = derive_escrow(&listing, &mint);
        assert_ne!(escrow, derive_ata(&seller, &mint));
    }
}
