//! terminal-market-pda — offline program-derived-address tool.
//!
//! Computes the marketplace, listing, order, and escrow addresses from public
//! keys alone.  A pure function over its inputs: no RPC endpoint, no key
//! file, no network traffic.  Two processes given the same inputs print the
//! same addresses, byte for byte — the same derivation the deployed program
//! performs when it checks an instruction's account list.

use clap::{Parser, Subcommand};
use serde_json::json;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

use terminal_market_sdk::{
    instructions::{derive_escrow, derive_listing, derive_marketplace, derive_order},
    Error, PROGRAM_ID,
};

/// Derive marketplace program addresses offline.
///
/// Addresses derive from fixed seed labels plus public keys under the
/// marketplace program id; the bump is the byte that pushes the candidate
/// off the Ed25519 curve.
#[derive(Parser)]
#[command(
    name    = "terminal-market-pda",
    version = env!("CARGO_PKG_VERSION"),
    about   = "Offline PDA derivation for the terminal marketplace — no network, no keys.",
    after_help = "\
EXAMPLES:
  terminal-market-pda marketplace
  terminal-market-pda listing <SELLER>
  terminal-market-pda order <MINT> <BUYER>
  terminal-market-pda escrow <MINT> <SELLER>

SEEDS:
  marketplace            [\"marketplace\"]                    (singleton)
  listing                [\"listing\", seller]                (one per seller)
  order                  [\"order\", mint, buyer]
  escrow                 ATA of the listing PDA for the mint"
)]
struct Cli {
    /// Program id to derive under (defaults to the deployed marketplace)
    #[arg(long, global = true, value_name = "PUBKEY", default_value = PROGRAM_ID)]
    program_id: String,

    /// Output machine-readable JSON instead of human-readable text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive the marketplace singleton address
    ///
    /// Constant for a given program id regardless of any other input.
    Marketplace,

    /// Derive a seller's listing address
    ///
    /// Seeded by the seller key alone — a seller has exactly one derivable
    /// listing address no matter how many mints they list.
    Listing {
        /// Seller public key
        seller: String,
    },

    /// Derive the order address for a (mint, buyer) pair
    Order {
        /// NFT mint address
        mint: String,

        /// Buyer public key
        buyer: String,
    },

    /// Derive the escrow token account for a seller's listed mint
    Escrow {
        /// NFT mint address
        mint: String,

        /// Seller public key
        seller: String,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("Error: {err}");
        std::process::exit(err.kind().exit_code());
    }
}

fn parse_pubkey(input: &str, what: &str) -> Result<Pubkey, Error> {
    Pubkey::from_str(input).map_err(|e| Error::InvalidPublicKey {
        input:  input.to_string(),
        reason: format!("{what}: {e}"),
    })
}

fn run(cli: &Cli) -> Result<(), Error> {
    let program_id = parse_pubkey(&cli.program_id, "--program-id")?;

    match &cli.command {
        Commands::Marketplace => {
            let (address, bump) = derive_marketplace(&program_id);
            report(cli, "marketplace", address, Some(bump), &[]);
        }
        Commands::Listing { seller } => {
            let seller = parse_pubkey(seller, "seller")?;
            let (address, bump) = derive_listing(&seller, &program_id);
            report(cli, "listing", address, Some(bump), &[("seller", seller)]);
        }
        Commands::Order { mint, buyer } => {
            let mint = parse_pubkey(mint, "mint")?;
            let buyer = parse_pubkey(buyer, "buyer")?;
            let (address, bump) = derive_order(&mint, &buyer, &program_id);
            report(cli, "order", address, Some(bump), &[("mint", mint), ("buyer", buyer)]);
        }
        Commands::Escrow { mint, seller } => {
            let mint = parse_pubkey(mint, "mint")?;
            let seller = parse_pubkey(seller, "seller")?;
            let (listing, _) = derive_listing(&seller, &program_id);
            let address = derive_escrow(&listing, &mint);
            report(
                cli,
                "escrow",
                address,
                None,
                &[("mint", mint), ("seller", seller), ("listing", listing)],
            );
        }
    }
    Ok(())
}

/// Print one derived address, with its seed inputs for the record.
fn report(cli: &Cli, label: &str, address: Pubkey, bump: Option<u8>, inputs: &[(&str, Pubkey)]) {
    if cli.json {
        let mut obj = json!({
            "command": label,
            "program_id": cli.program_id,
            "address": address.to_string(),
        });
        if let Some(b) = bump {
            obj["bump"] = json!(b);
        }
        for (name, key) in inputs {
            obj[*name] = json!(key.to_string());
        }
        println!("{obj}");
        return;
    }

    println!("─── PDA: {label} ──────────────────────────────────────────────────");
    for (name, key) in inputs {
        println!("  {:<16} {key}", capitalize(name));
    }
    println!("  Address          {address}");
    if let Some(b) = bump {
        println!("  Bump             {b}");
    }
    println!("  Program          {}", cli.program_id);
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_program_id_is_the_deployed_marketplace() {
        let cli = Cli::try_parse_from(["terminal-market-pda", "marketplace"]).unwrap();
        assert_eq!(cli.program_id, PROGRAM_ID);
        assert!(parse_pubkey(&cli.program_id, "--program-id").is_ok());
    }

    #[test]
    fn listing_requires_a_seller() {
        assert!(Cli::try_parse_from(["terminal-market-pda", "listing"]).is_err());
    }

    #[test]
    fn order_takes_mint_then_buyer() {
        let cli = Cli::try_parse_from([
            "terminal-market-pda",
            "order",
            "So11111111111111111111111111111111111111112",
            "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA",
        ])
        .unwrap();
        match cli.command {
            Commands::Order { mint, buyer } => {
                assert!(parse_pubkey(&mint, "mint").is_ok());
                assert!(parse_pubkey(&buyer, "buyer").is_ok());
            }
            _ => panic!("expected order"),
        }
    }

    #[test]
    fn malformed_seller_is_rejected_without_io() {
        let cli =
            Cli::try_parse_from(["terminal-market-pda", "listing", "not-a-key"]).unwrap();
        let err = run(&cli).unwrap_err();
        assert!(matches!(err, Error::InvalidPublicKey { .. }));
        assert_eq!(err.kind().exit_code(), 2);
    }
}
