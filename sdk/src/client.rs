//! [`MarketplaceClient`] — the main entry point for marketplace integrations.
//!
//! Every method runs one linear derive → (fetch) → submit chain; nothing is
//! retried, cached, or shared across calls.  Printing belongs to callers — the
//! client only returns values.

use solana_account_decoder_client_types::UiAccountEncoding;
use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    nonblocking::rpc_client::RpcClient,
    rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig},
    rpc_filter::{Memcmp, MemcmpEncodedBytes, RpcFilterType},
    rpc_request::{RpcError, RpcResponseErrorData},
};
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use std::str::FromStr;

use crate::{
    error::{Error, Result},
    instructions::{
        account_disc, buy_nft_ix, cancel_listing_ix, create_listing_ix, derive_escrow,
        derive_listing, derive_marketplace, derive_order, initialize_ix, update_price_ix,
    },
    state::{parse_listing, parse_marketplace, ListingState, LISTING_ACCOUNT_LEN},
    types::{
        AccountSummary, BuyResult, CancelResult, ClusterStatus, InitializeResult, ListingInfo,
        ListingResult, MarketplaceInfo, UpdatePriceResult,
    },
    PROGRAM_ID,
};

const LOCALNET_RPC: &str = "http://localhost:8899";
const DEVNET_RPC:   &str = "https://api.devnet.solana.com";
const MAINNET_RPC:  &str = "https://api.mainnet-beta.solana.com";

/// Async Terminal Market client.
///
/// ```rust,no_run
/// # use terminal_market_sdk::MarketplaceClient;
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = MarketplaceClient::localnet();
/// let stats = client.marketplace_stats().await?;
/// println!("fee rate: {} bps, trades: {}", stats.state.fee_rate, stats.state.total_trades);
/// # Ok(())
/// # }
/// ```
pub struct MarketplaceClient {
    rpc_url:    String,
    program_id: Pubkey,
    commitment: CommitmentConfig,
}

impl MarketplaceClient {
    /// Create a client pointing at any RPC endpoint, at `confirmed` commitment.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url:    rpc_url.into(),
            program_id: Pubkey::from_str(PROGRAM_ID).unwrap(),
            commitment: CommitmentConfig::confirmed(),
        }
    }

    /// Pre-configured client for a local test validator.
    pub fn localnet() -> Self {
        Self::new(LOCALNET_RPC)
    }

    /// Pre-configured client for Solana devnet.
    pub fn devnet() -> Self {
        Self::new(DEVNET_RPC)
    }

    /// Pre-configured client for Solana mainnet-beta.
    pub fn mainnet() -> Self {
        Self::new(MAINNET_RPC)
    }

    /// Override the program ID (useful for locally deployed programs in tests).
    pub fn with_program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    /// Override the commitment level used for queries and confirmation.
    pub fn with_commitment(mut self, commitment: CommitmentConfig) -> Self {
        self.commitment = commitment;
        self
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    // ── Write operations ──────────────────────────────────────────────────────

    /// Create the marketplace singleton.
    ///
    /// `fee_rate` is in basis points; `treasury` defaults to the payer.
    pub async fn initialize(
        &self,
        payer:    &Keypair,
        fee_rate: u64,
        treasury: Option<Pubkey>,
    ) -> Result<InitializeResult> {
        let rpc = self.rpc();
        let treasury = treasury.unwrap_or_else(|| payer.pubkey());
        let (marketplace, _) = derive_marketplace(&self.program_id);

        let ix = initialize_ix(&self.program_id, &payer.pubkey(), &treasury, fee_rate);
        let sig = self.sign_and_send(&rpc, &[ix], payer).await?;

        Ok(InitializeResult {
            signature: sig.to_string(),
            marketplace,
            authority: payer.pubkey(),
            treasury,
            fee_rate,
        })
    }

    /// List an NFT: escrow `mint` and ask `price` lamports for it.
    ///
    /// All accounts are derivable from (seller, mint) — no fetch needed.
    pub async fn create_listing(
        &self,
        payer: &Keypair,
        mint:  &Pubkey,
        price: u64,
    ) -> Result<ListingResult> {
        let rpc = self.rpc();
        let seller = payer.pubkey();
        let (listing, _) = derive_listing(&seller, &self.program_id);
        let escrow = derive_escrow(&listing, mint);

        let ix = create_listing_ix(&self.program_id, &seller, mint, price);
        let sig = self.sign_and_send(&rpc, &[ix], payer).await?;

        Ok(ListingResult {
            signature: sig.to_string(),
            listing,
            seller,
            mint: *mint,
            price,
            escrow,
        })
    }

    /// Buy the NFT `mint`.
    ///
    /// Fetches the marketplace record for the treasury and the listing record
    /// for the seller and price.  With `seller` given, the listing is derived
    /// from that seller directly; otherwise the active listing escrowing the
    /// mint is located by a program-accounts scan (listing addresses derive
    /// from the seller, so a mint alone cannot address one).
    pub async fn buy(
        &self,
        buyer:  &Keypair,
        mint:   &Pubkey,
        seller: Option<Pubkey>,
    ) -> Result<BuyResult> {
        let rpc = self.rpc();

        let (marketplace_addr, _) = derive_marketplace(&self.program_id);
        let market = match self.fetch(&rpc, &marketplace_addr).await? {
            Some(acct) => parse_marketplace(&acct.data)?,
            None => return Err(Error::NotInitialized(marketplace_addr)),
        };

        let (listing_addr, listing) = match seller {
            Some(seller) => {
                let (addr, _) = derive_listing(&seller, &self.program_id);
                let acct = self.fetch(&rpc, &addr).await?.ok_or(Error::NotFound {
                    what:    "listing",
                    address: addr,
                })?;
                (addr, parse_listing(&acct.data)?)
            }
            None => self
                .fetch_listings(&rpc)
                .await?
                .into_iter()
                .find(|(_, l)| l.mint == *mint && l.is_active)
                .ok_or(Error::NoListingForMint(*mint))?,
        };
        if listing.mint != *mint {
            return Err(Error::MintMismatch {
                listing:  listing_addr,
                expected: *mint,
                actual:   listing.mint,
            });
        }

        let (order, _) = derive_order(mint, &buyer.pubkey(), &self.program_id);
        let ix = buy_nft_ix(
            &self.program_id,
            &buyer.pubkey(),
            &listing.seller,
            mint,
            &market.treasury,
        );
        let sig = self.sign_and_send(&rpc, &[ix], buyer).await?;

        Ok(BuyResult {
            signature: sig.to_string(),
            listing:   listing_addr,
            order,
            seller:    listing.seller,
            mint:      *mint,
            price:     listing.price,
            treasury:  market.treasury,
        })
    }

    /// Cancel the caller's listing and reclaim the escrowed NFT.
    pub async fn cancel_listing(&self, payer: &Keypair, mint: &Pubkey) -> Result<CancelResult> {
        let rpc = self.rpc();
        let (listing, _) = derive_listing(&payer.pubkey(), &self.program_id);

        let ix = cancel_listing_ix(&self.program_id, &payer.pubkey(), mint);
        let sig = self.sign_and_send(&rpc, &[ix], payer).await?;

        Ok(CancelResult { signature: sig.to_string(), listing, mint: *mint })
    }

    /// Change the asking price of the caller's listing.
    pub async fn update_price(
        &self,
        payer:     &Keypair,
        mint:      &Pubkey,
        new_price: u64,
    ) -> Result<UpdatePriceResult> {
        let rpc = self.rpc();
        let (listing, _) = derive_listing(&payer.pubkey(), &self.program_id);

        let ix = update_price_ix(&self.program_id, &payer.pubkey(), mint, new_price);
        let sig = self.sign_and_send(&rpc, &[ix], payer).await?;

        Ok(UpdatePriceResult {
            signature: sig.to_string(),
            listing,
            mint: *mint,
            new_price,
        })
    }

    // ── Read operations ───────────────────────────────────────────────────────

    /// Fetch the listing record derived from `seller`.
    ///
    /// [`Error::NotFound`] means no listing exists at the derived address — a
    /// distinct outcome from a transport failure.
    pub async fn listing(&self, seller: &Pubkey) -> Result<ListingInfo> {
        let rpc = self.rpc();
        let (address, _) = derive_listing(seller, &self.program_id);
        let acct = self.fetch(&rpc, &address).await?.ok_or(Error::NotFound {
            what: "listing",
            address,
        })?;
        Ok(ListingInfo { address, state: parse_listing(&acct.data)? })
    }

    /// Fetch the marketplace singleton record.
    ///
    /// [`Error::NotInitialized`] carries the derived address so callers can
    /// report where the record is expected to live.
    pub async fn marketplace_stats(&self) -> Result<MarketplaceInfo> {
        let rpc = self.rpc();
        let (address, _) = derive_marketplace(&self.program_id);
        match self.fetch(&rpc, &address).await? {
            Some(acct) => Ok(MarketplaceInfo { address, state: parse_marketplace(&acct.data)? }),
            None => Err(Error::NotInitialized(address)),
        }
    }

    /// Fetch every listing account owned by the program.
    ///
    /// Accounts that fail to decode are skipped, not fatal.
    pub async fn all_listings(&self) -> Result<Vec<(Pubkey, ListingState)>> {
        let rpc = self.rpc();
        self.fetch_listings(&rpc).await
    }

    /// Raw metadata for an arbitrary account; `None` if it does not exist.
    pub async fn account_info(&self, address: &Pubkey) -> Result<Option<AccountSummary>> {
        let rpc = self.rpc();
        Ok(self.fetch(&rpc, address).await?.map(|acct| AccountSummary {
            address:    *address,
            lamports:   acct.lamports,
            owner:      acct.owner,
            data_len:   acct.data.len(),
            executable: acct.executable,
        }))
    }

    /// Node version and, when a wallet is given, its balance.
    pub async fn cluster_status(&self, wallet: Option<&Pubkey>) -> Result<ClusterStatus> {
        let rpc = self.rpc();
        let version = rpc.get_version().await?;
        let (wallet, balance) = match wallet {
            Some(w) => (Some(*w), Some(rpc.get_balance(w).await?)),
            None => (None, None),
        };
        Ok(ClusterStatus {
            solana_core:      version.solana_core,
            wallet,
            balance_lamports: balance,
        })
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn rpc(&self) -> RpcClient {
        RpcClient::new_with_commitment(self.rpc_url.clone(), self.commitment)
    }

    /// Fetch one account, mapping "does not exist" to `None` rather than an
    /// error so not-found stays distinguishable from a transport failure.
    async fn fetch(&self, rpc: &RpcClient, address: &Pubkey) -> Result<Option<Account>> {
        Ok(rpc
            .get_account_with_commitment(address, self.commitment)
            .await?
            .value)
    }

    async fn sign_and_send(
        &self,
        rpc:          &RpcClient,
        instructions: &[Instruction],
        payer:        &Keypair,
    ) -> Result<Signature> {
        let blockhash = rpc.get_latest_blockhash().await?;
        let tx = Transaction::new_signed_with_payer(
            instructions,
            Some(&payer.pubkey()),
            &[payer],
            blockhash,
        );
        rpc.send_and_confirm_transaction(&tx)
            .await
            .map_err(classify_send_error)
    }

    /// Scan program accounts for listing records (data size + discriminator).
    async fn fetch_listings(&self, rpc: &RpcClient) -> Result<Vec<(Pubkey, ListingState)>> {
        let disc = account_disc("TerminalListing");
        let config = RpcProgramAccountsConfig {
            filters: Some(vec![
                RpcFilterType::DataSize(LISTING_ACCOUNT_LEN as u64),
                RpcFilterType::Memcmp(Memcmp::new(0, MemcmpEncodedBytes::Bytes(disc.to_vec()))),
            ]),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                ..RpcAccountInfoConfig::default()
            },
            ..RpcProgramAccountsConfig::default()
        };
        let raw = rpc
            .get_program_accounts_with_config(&self.program_id, config)
            .await?;
        Ok(raw
            .into_iter()
            .filter_map(|(pk, acct)| parse_listing(&acct.data).ok().map(|l| (pk, l)))
            .collect())
    }
}

/// Classify a `send_and_confirm_transaction` failure.
///
/// A structured response from the node about the transaction (simulation
/// failure, on-chain error) is a program rejection; anything else is a
/// transport problem.
fn classify_send_error(err: ClientError) -> Error {
    let rejection = match &err.kind {
        ClientErrorKind::TransactionError(te) => Some(te.to_string()),
        ClientErrorKind::RpcError(RpcError::RpcResponseError { message, data, .. }) => {
            let mut msg = message.clone();
            if let RpcResponseErrorData::SendTransactionPreflightFailure(sim) = data {
                if let Some(logs) = &sim.logs {
                    for line in logs {
                        msg.push_str("\n    ");
                        msg.push_str(line);
                    }
                }
            }
            Some(msg)
        }
        _ => None,
    };
    match rejection {
        Some(msg) => Error::ProgramRejected(msg),
        None => Error::Rpc(err),
    }
}
