//! Terminal Market Rust SDK
//!
//! Client for the `terminal_marketplace` NFT marketplace program on Solana.
//! The program is pre-deployed and opaque — fee math, escrow custody, and
//! ownership checks all run on-chain.  This crate is the client-side contract
//! for reaching it: deterministic address derivation, statically compiled
//! instruction and account schemas, and one orchestration method per
//! marketplace action.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use terminal_market_sdk::{units, MarketplaceClient};
//! use solana_sdk::{pubkey::Pubkey, signature::Keypair};
//! use std::str::FromStr;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MarketplaceClient::localnet();
//!     let seller = Keypair::new(); // use your funded keypair
//!     let mint = Pubkey::from_str("So11111111111111111111111111111111111111112")?;
//!
//!     // List the NFT for 2.5 SOL
//!     let price = units::parse_sol("2.5")?;
//!     let result = client.create_listing(&seller, &mint, price).await?;
//!     println!("listed at {} — tx {}", result.listing, result.signature);
//!
//!     // Read it back
//!     let info = client.listing(&result.seller).await?;
//!     println!("price: {} lamports, active: {}", info.state.price, info.state.is_active);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Feature Overview
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`MarketplaceClient::initialize`] | Create the marketplace singleton |
//! | [`MarketplaceClient::create_listing`] | Escrow an NFT at an asking price |
//! | [`MarketplaceClient::buy`] | Purchase a listed NFT |
//! | [`MarketplaceClient::cancel_listing`] | Reclaim an escrowed NFT |
//! | [`MarketplaceClient::update_price`] | Change a listing's asking price |
//! | [`MarketplaceClient::listing`] | One seller's listing record |
//! | [`MarketplaceClient::all_listings`] | Every listing owned by the program |
//! | [`MarketplaceClient::marketplace_stats`] | Fee rate, volume, trade count |
//! | [`MarketplaceClient::account_info`] | Raw metadata of any account |
//! | [`MarketplaceClient::cluster_status`] | Node version and wallet balance |

pub mod client;
pub mod error;
pub mod instructions;
pub mod state;
pub mod types;
pub mod units;

/// The deployed `terminal_marketplace` program id all addresses derive under.
pub const PROGRAM_ID: &str = "brCRRQ6jBAScsJdwWRx5azEAuYqWxjJGKnaHr3q3gyj";

pub use client::MarketplaceClient;
pub use error::{Error, ErrorKind, Result};
pub use types::*;
