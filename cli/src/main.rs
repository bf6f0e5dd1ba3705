//! terminal-market — command-line client for the terminal_marketplace program.
//!
//! Every invocation is one linear chain: parse args → derive addresses →
//! (fetch state when an instruction needs it) → sign, submit, confirm →
//! report.  Nothing is retried and no state survives the process.  All
//! business logic (fees, escrow, ownership) runs on-chain; failures are
//! reported with an exit code per error kind (see `ErrorKind::exit_code`).

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use serde_json::json;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair, Signer},
};
use std::str::FromStr;

use terminal_market_sdk::{
    instructions::derive_listing,
    units::{format_sol, parse_sol},
    Error, ErrorKind, MarketplaceClient, PROGRAM_ID,
};

const DEFAULT_RPC_URL: &str = "http://localhost:8899";
const DEFAULT_KEYPAIR: &str = "./deploy-authority.json";

// ─── Key and argument helpers ─────────────────────────────────────────────────

/// Expand `~/` to `$HOME/` in keypair paths.
fn expand_home(path: &str) -> String {
    if path.starts_with("~/") {
        format!("{}{}", std::env::var("HOME").unwrap_or_default(), &path[1..])
    } else {
        path.to_string()
    }
}

/// Load the signing keypair (a JSON array of secret-key bytes).
///
/// Mutating commands call this before any client method, so a bad key file
/// fails with zero RPC traffic.
fn load_keypair(path: &str) -> Result<Keypair, Error> {
    let expanded = expand_home(path);
    read_keypair_file(&expanded).map_err(|e| Error::Keypair {
        path:   expanded,
        reason: format!("{e}\n  Set TMARKET_KEYPAIR or pass --keypair to use a different file."),
    })
}

fn parse_pubkey(input: &str, what: &str) -> Result<Pubkey, Error> {
    Pubkey::from_str(input).map_err(|e| Error::InvalidPublicKey {
        input:  input.to_string(),
        reason: format!("{what}: {e}"),
    })
}

fn client(cli: &Cli) -> MarketplaceClient {
    MarketplaceClient::new(cli.rpc.clone())
}

// ─── Version banner ───────────────────────────────────────────────────────────

/// Print the Terminal Market banner to stdout.
fn print_banner() {
    let ver = env!("CARGO_PKG_VERSION");
    println!();
    println!("  Terminal Market  v{ver}  ·  NFT marketplace on Solana");
    println!("  {}", "─".repeat(62));
    println!("  Program   {PROGRAM_ID}");
    println!("  Default   {DEFAULT_RPC_URL}  (local test validator)");
    println!("  Fees      set at `init` in basis points (default 250 = 2.50%)");
    println!();
}

// ─── CLI definition ───────────────────────────────────────────────────────────

/// Terminal Market — NFT marketplace client for Solana.
///
/// Every command supports --json for machine-readable output.
/// Global options can also be set via environment variables:
///   TMARKET_RPC_URL  — Solana JSON-RPC endpoint
///   TMARKET_KEYPAIR  — path to the signing keypair JSON file
#[derive(Parser)]
#[command(
    name    = "terminal-market",
    version = env!("CARGO_PKG_VERSION"),
    about   = "NFT marketplace client — list, buy, and inspect on-chain listings.",
    after_help = "\
ENVIRONMENT:
  TMARKET_RPC_URL    Solana JSON-RPC endpoint  [default: http://localhost:8899]
  TMARKET_KEYPAIR    Path to keypair JSON file  [default: ./deploy-authority.json]

EXIT CODES:
  0 success (including informational not-found from show/stats/account)
  2 configuration error   3 network error   4 not found   5 program rejection

QUICK START:
  terminal-market status
  terminal-market init --fee-rate 250
  terminal-market list <MINT> 2.5
  terminal-market buy <MINT>
  terminal-market stats

PROGRAM:
  brCRRQ6jBAScsJdwWRx5azEAuYqWxjJGKnaHr3q3gyj"
)]
struct Cli {
    /// Solana JSON-RPC endpoint
    #[arg(
        long = "rpc",
        global     = true,
        value_name = "URL",
        default_value = DEFAULT_RPC_URL,
        env = "TMARKET_RPC_URL"
    )]
    rpc: String,

    /// Path to the signing keypair JSON file (array of secret-key bytes)
    #[arg(
        long,
        global     = true,
        value_name = "PATH",
        default_value = DEFAULT_KEYPAIR,
        env = "TMARKET_KEYPAIR"
    )]
    keypair: String,

    /// Output machine-readable JSON instead of human-readable text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check cluster and wallet status
    ///
    /// Reports the node version, the signing wallet's balance, and the
    /// program id.  Read-only.
    #[command(visible_alias = "cluster")]
    Status,

    /// Initialize the marketplace singleton
    ///
    /// One-time setup.  The authority is the signing keypair; the fee rate
    /// and treasury are fixed until the program says otherwise.
    Init {
        /// Trade fee in basis points (1 bp = 0.01%)
        #[arg(long, value_name = "BPS", default_value_t = 250)]
        fee_rate: u64,

        /// Fee destination account; defaults to the signing keypair
        #[arg(long, value_name = "PUBKEY")]
        treasury: Option<String>,
    },

    /// List an NFT for sale
    ///
    /// Escrows the NFT and records the asking price.  The listing address
    /// derives from the seller key alone — one listing per seller at a time.
    List {
        /// NFT mint address
        mint: String,

        /// Asking price in SOL (decimal, e.g. 2.5)
        price: String,
    },

    /// Buy a listed NFT
    ///
    /// The seller and price come from the on-chain listing record; the fee
    /// treasury comes from the marketplace record.
    Buy {
        /// NFT mint address
        mint: String,

        /// Seller whose listing to buy; located by scan when omitted
        #[arg(long, value_name = "PUBKEY")]
        seller: Option<String>,
    },

    /// Cancel your listing and reclaim the escrowed NFT
    Cancel {
        /// NFT mint address
        mint: String,
    },

    /// Update your listing's asking price
    Update {
        /// NFT mint address
        mint: String,

        /// New asking price in SOL (decimal)
        price: String,
    },

    /// Show a listing record
    ///
    /// A missing record is an informational outcome, not an error.
    Show {
        /// NFT mint address (cross-checked against the record)
        mint: String,

        /// Seller whose listing to show; defaults to the signing keypair
        #[arg(long, value_name = "PUBKEY")]
        seller: Option<String>,
    },

    /// List every listing the program owns
    Listings,

    /// Show marketplace statistics
    ///
    /// An uninitialized marketplace is an informational outcome, not an error.
    Stats,

    /// Show raw account information for any address
    Account {
        /// Account public key
        address: String,
    },

    /// Show program and client configuration (no network)
    Info,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // When invoked with no arguments, show banner + full help and exit cleanly.
    if std::env::args().len() == 1 {
        print_banner();
        Cli::command().print_long_help().ok();
        println!();
        return;
    }

    let cli = Cli::parse();
    if let Err(err) = run(&cli).await {
        eprintln!("Error: {err:#}");
        std::process::exit(exit_code(&err));
    }
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<Error>()
        .map(|e| e.kind().exit_code())
        .unwrap_or(ErrorKind::Config.exit_code())
}

async fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Status => cmd_status(cli).await,
        Commands::Init { fee_rate, treasury } => {
            cmd_init(cli, *fee_rate, treasury.as_deref()).await
        }
        Commands::List { mint, price } => cmd_list(cli, mint, price).await,
        Commands::Buy { mint, seller } => cmd_buy(cli, mint, seller.as_deref()).await,
        Commands::Cancel { mint } => cmd_cancel(cli, mint).await,
        Commands::Update { mint, price } => cmd_update(cli, mint, price).await,
        Commands::Show { mint, seller } => cmd_show(cli, mint, seller.as_deref()).await,
        Commands::Listings => cmd_listings(cli).await,
        Commands::Stats => cmd_stats(cli).await,
        Commands::Account { address } => cmd_account(cli, address).await,
        Commands::Info => cmd_info(cli),
    }
}

// ─── status ──────────────────────────────────────────────────────────────────

async fn cmd_status(cli: &Cli) -> Result<()> {
    let payer = load_keypair(&cli.keypair)?;
    let status = client(cli).cluster_status(Some(&payer.pubkey())).await?;
    let balance = status.balance_lamports.unwrap_or(0);

    if cli.json {
        println!("{}", json!({
            "status":           "ok",
            "command":          "status",
            "solana_core":      status.solana_core,
            "rpc_url":          cli.rpc,
            "wallet":           payer.pubkey().to_string(),
            "balance_lamports": balance,
            "balance_sol":      format_sol(balance),
            "program_id":       PROGRAM_ID,
        }));
    } else {
        println!("─── Cluster Status ───────────────────────────────────────────────");
        println!("  Node version     {}", status.solana_core);
        println!("  RPC endpoint     {}", cli.rpc);
        println!("  Wallet           {}", payer.pubkey());
        println!("  Balance          {} SOL  ({} lamports)", format_sol(balance), balance);
        println!("  Program          {PROGRAM_ID}");
    }
    Ok(())
}

// ─── init ────────────────────────────────────────────────────────────────────

async fn cmd_init(cli: &Cli, fee_rate: u64, treasury: Option<&str>) -> Result<()> {
    let payer = load_keypair(&cli.keypair)?;
    let treasury = treasury
        .map(|s| parse_pubkey(s, "--treasury"))
        .transpose()?;

    let result = client(cli).initialize(&payer, fee_rate, treasury).await?;

    if cli.json {
        println!("{}", json!({
            "status":      "ok",
            "command":     "init",
            "marketplace": result.marketplace.to_string(),
            "authority":   result.authority.to_string(),
            "treasury":    result.treasury.to_string(),
            "fee_rate":    result.fee_rate,
            "tx":          result.signature,
        }));
    } else {
        println!("─── Marketplace Initialized ──────────────────────────────────────");
        println!("  Marketplace      {}", result.marketplace);
        println!("  Authority        {}", result.authority);
        println!("  Treasury         {}", result.treasury);
        println!("  Fee rate         {} bps  ({:.2}%)", result.fee_rate, result.fee_rate as f64 / 100.0);
        println!("  Transaction      {}", result.signature);
    }
    Ok(())
}

// ─── list ────────────────────────────────────────────────────────────────────

async fn cmd_list(cli: &Cli, mint: &str, price: &str) -> Result<()> {
    let mint = parse_pubkey(mint, "mint")?;
    let price = parse_sol(price)?;
    let payer = load_keypair(&cli.keypair)?;

    let result = client(cli).create_listing(&payer, &mint, price).await?;

    if cli.json {
        println!("{}", json!({
            "status":         "ok",
            "command":        "list",
            "listing":        result.listing.to_string(),
            "seller":         result.seller.to_string(),
            "mint":           result.mint.to_string(),
            "price_lamports": result.price,
            "price_sol":      format_sol(result.price),
            "escrow":         result.escrow.to_string(),
            "tx":             result.signature,
        }));
    } else {
        println!("─── Listing Created ──────────────────────────────────────────────");
        println!("  Listing          {}", result.listing);
        println!("  Seller           {}", result.seller);
        println!("  Mint             {}", result.mint);
        println!("  Price            {} SOL  ({} lamports)", format_sol(result.price), result.price);
        println!("  Escrow           {}", result.escrow);
        println!("  Transaction      {}", result.signature);
    }
    Ok(())
}

// ─── buy ─────────────────────────────────────────────────────────────────────

async fn cmd_buy(cli: &Cli, mint: &str, seller: Option<&str>) -> Result<()> {
    let mint = parse_pubkey(mint, "mint")?;
    let seller = seller.map(|s| parse_pubkey(s, "--seller")).transpose()?;
    let payer = load_keypair(&cli.keypair)?;

    let result = client(cli).buy(&payer, &mint, seller).await?;

    if cli.json {
        println!("{}", json!({
            "status":         "ok",
            "command":        "buy",
            "listing":        result.listing.to_string(),
            "order":          result.order.to_string(),
            "seller":         result.seller.to_string(),
            "mint":           result.mint.to_string(),
            "price_lamports": result.price,
            "price_sol":      format_sol(result.price),
            "treasury":       result.treasury.to_string(),
            "tx":             result.signature,
        }));
    } else {
        println!("─── Purchase Complete ────────────────────────────────────────────");
        println!("  Mint             {}", result.mint);
        println!("  Seller           {}", result.seller);
        println!("  Price            {} SOL  ({} lamports)", format_sol(result.price), result.price);
        println!("  Listing          {}", result.listing);
        println!("  Order            {}", result.order);
        println!("  Treasury         {}", result.treasury);
        println!("  Transaction      {}", result.signature);
    }
    Ok(())
}

// ─── cancel ──────────────────────────────────────────────────────────────────

async fn cmd_cancel(cli: &Cli, mint: &str) -> Result<()> {
    let mint = parse_pubkey(mint, "mint")?;
    let payer = load_keypair(&cli.keypair)?;

    let result = client(cli).cancel_listing(&payer, &mint).await?;

    if cli.json {
        println!("{}", json!({
            "status":  "ok",
            "command": "cancel",
            "listing": result.listing.to_string(),
            "mint":    result.mint.to_string(),
            "tx":      result.signature,
        }));
    } else {
        println!("─── Listing Cancelled ────────────────────────────────────────────");
        println!("  Listing          {}", result.listing);
        println!("  Mint             {}", result.mint);
        println!("  Transaction      {}", result.signature);
    }
    Ok(())
}

// ─── update ──────────────────────────────────────────────────────────────────

async fn cmd_update(cli: &Cli, mint: &str, price: &str) -> Result<()> {
    let mint = parse_pubkey(mint, "mint")?;
    let new_price = parse_sol(price)?;
    let payer = load_keypair(&cli.keypair)?;

    let result = client(cli).update_price(&payer, &mint, new_price).await?;

    if cli.json {
        println!("{}", json!({
            "status":         "ok",
            "command":        "update",
            "listing":        result.listing.to_string(),
            "mint":           result.mint.to_string(),
            "price_lamports": result.new_price,
            "price_sol":      format_sol(result.new_price),
            "tx":             result.signature,
        }));
    } else {
        println!("─── Price Updated ────────────────────────────────────────────────");
        println!("  Listing          {}", result.listing);
        println!("  Mint             {}", result.mint);
        println!("  New price        {} SOL  ({} lamports)", format_sol(result.new_price), result.new_price);
        println!("  Transaction      {}", result.signature);
    }
    Ok(())
}

// ─── show ────────────────────────────────────────────────────────────────────

async fn cmd_show(cli: &Cli, mint: &str, seller: Option<&str>) -> Result<()> {
    let mint = parse_pubkey(mint, "mint")?;
    let seller = match seller {
        Some(s) => parse_pubkey(s, "--seller")?,
        None => load_keypair(&cli.keypair)?.pubkey(),
    };

    match client(cli).listing(&seller).await {
        Ok(info) => {
            if cli.json {
                println!("{}", json!({
                    "status":         "ok",
                    "command":        "show",
                    "listing":        info.address.to_string(),
                    "seller":         info.state.seller.to_string(),
                    "mint":           info.state.mint.to_string(),
                    "price_lamports": info.state.price,
                    "price_sol":      format_sol(info.state.price),
                    "created_at":     info.state.created_at,
                    "is_active":      info.state.is_active,
                    "mint_matches":   info.state.mint == mint,
                }));
            } else {
                println!("─── Listing Details ──────────────────────────────────────────────");
                println!("  Listing          {}", info.address);
                println!("  Seller           {}", info.state.seller);
                println!("  Mint             {}", info.state.mint);
                println!("  Price            {} SOL  ({} lamports)", format_sol(info.state.price), info.state.price);
                println!("  Created at       {}  (unix seconds)", info.state.created_at);
                println!("  Active           {}", if info.state.is_active { "yes" } else { "no" });
                if info.state.mint != mint {
                    println!();
                    println!("  Note: this seller's listing escrows {}", info.state.mint);
                    println!("        not the requested mint {mint}");
                }
            }
            Ok(())
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            // Informational, not an error: the derived address simply has no
            // record behind it.
            let (derived, _) = derive_listing(&seller, &client(cli).program_id());
            if cli.json {
                println!("{}", json!({
                    "status":  "not_found",
                    "command": "show",
                    "seller":  seller.to_string(),
                    "listing": derived.to_string(),
                }));
            } else {
                println!("─── Listing Details ──────────────────────────────────────────────");
                println!("  Seller           {seller}");
                println!("  Derived address  {derived}");
                println!();
                println!("  No listing record exists for this seller.");
                println!("  Run `terminal-market list <MINT> <PRICE>` to create one.");
            }
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

// ─── listings ────────────────────────────────────────────────────────────────

async fn cmd_listings(cli: &Cli) -> Result<()> {
    let listings = client(cli).all_listings().await?;

    if cli.json {
        let items: Vec<_> = listings.iter().map(|(addr, l)| json!({
            "listing":        addr.to_string(),
            "seller":         l.seller.to_string(),
            "mint":           l.mint.to_string(),
            "price_lamports": l.price,
            "price_sol":      format_sol(l.price),
            "created_at":     l.created_at,
            "is_active":      l.is_active,
        })).collect();
        println!("{}", json!({
            "status":   "ok",
            "command":  "listings",
            "listings": items,
        }));
        return Ok(());
    }

    println!("─── Listings ─────────────────────────────────────────────────────");
    if listings.is_empty() {
        println!("  No listing accounts found.");
        println!("  Run `terminal-market list <MINT> <PRICE>` to create one.");
        return Ok(());
    }
    for (i, (addr, l)) in listings.iter().enumerate() {
        println!("  [{i:>2}]  Listing    {addr}");
        println!("        Seller     {}", l.seller);
        println!("        Mint       {}", l.mint);
        println!("        Price      {} SOL  ({} lamports)", format_sol(l.price), l.price);
        println!("        Active     {}", if l.is_active { "yes" } else { "no" });
        println!();
    }
    let active = listings.iter().filter(|(_, l)| l.is_active).count();
    println!("  Total: {} listing(s), {} active", listings.len(), active);
    Ok(())
}

// ─── stats ───────────────────────────────────────────────────────────────────

async fn cmd_stats(cli: &Cli) -> Result<()> {
    match client(cli).marketplace_stats().await {
        Ok(info) => {
            if cli.json {
                println!("{}", json!({
                    "status":          "ok",
                    "command":         "stats",
                    "marketplace":     info.address.to_string(),
                    "authority":       info.state.authority.to_string(),
                    "treasury":        info.state.treasury.to_string(),
                    "fee_rate":        info.state.fee_rate,
                    "total_volume":    info.state.total_volume,
                    "total_volume_sol": format_sol(info.state.total_volume),
                    "total_trades":    info.state.total_trades,
                }));
            } else {
                println!("─── Marketplace Statistics ───────────────────────────────────────");
                println!("  Marketplace      {}", info.address);
                println!("  Authority        {}", info.state.authority);
                println!("  Treasury         {}", info.state.treasury);
                println!("  Fee rate         {} bps  ({:.2}%)", info.state.fee_rate, info.state.fee_rate as f64 / 100.0);
                println!("  Total volume     {} SOL  ({} lamports)", format_sol(info.state.total_volume), info.state.total_volume);
                println!("  Total trades     {}", info.state.total_trades);
            }
            Ok(())
        }
        Err(Error::NotInitialized(address)) => {
            if cli.json {
                println!("{}", json!({
                    "status":      "not_initialized",
                    "command":     "stats",
                    "marketplace": address.to_string(),
                }));
            } else {
                println!("─── Marketplace Statistics ───────────────────────────────────────");
                println!("  Expected address {address}");
                println!();
                println!("  Marketplace not initialized yet.");
                println!("  Run `terminal-market init` to create it.");
            }
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

// ─── account ─────────────────────────────────────────────────────────────────

async fn cmd_account(cli: &Cli, address: &str) -> Result<()> {
    let address = parse_pubkey(address, "address")?;

    match client(cli).account_info(&address).await? {
        Some(summary) => {
            if cli.json {
                println!("{}", json!({
                    "status":     "ok",
                    "command":    "account",
                    "address":    summary.address.to_string(),
                    "lamports":   summary.lamports,
                    "sol":        format_sol(summary.lamports),
                    "owner":      summary.owner.to_string(),
                    "data_len":   summary.data_len,
                    "executable": summary.executable,
                }));
            } else {
                println!("─── Account Info ─────────────────────────────────────────────────");
                println!("  Address          {}", summary.address);
                println!("  Balance          {} SOL  ({} lamports)", format_sol(summary.lamports), summary.lamports);
                println!("  Owner            {}", summary.owner);
                println!("  Data length      {} bytes", summary.data_len);
                println!("  Executable       {}", if summary.executable { "yes" } else { "no" });
            }
        }
        None => {
            if cli.json {
                println!("{}", json!({
                    "status":  "not_found",
                    "command": "account",
                    "address": address.to_string(),
                }));
            } else {
                println!("─── Account Info ─────────────────────────────────────────────────");
                println!("  Address          {address}");
                println!();
                println!("  Account does not exist at this address.");
            }
        }
    }
    Ok(())
}

// ─── info ────────────────────────────────────────────────────────────────────

fn cmd_info(cli: &Cli) -> Result<()> {
    if cli.json {
        println!("{}", json!({
            "status":       "ok",
            "command":      "info",
            "program_id":   PROGRAM_ID,
            "rpc_url":      cli.rpc,
            "keypair_path": cli.keypair,
        }));
        return Ok(());
    }

    println!("─── Terminal Market ──────────────────────────────────────────────");
    println!("  Program          {PROGRAM_ID}");
    println!("  RPC endpoint     {}", cli.rpc);
    println!("  Keypair          {}", cli.keypair);
    println!();
    println!("  Commands:");
    println!("    status    Check cluster and wallet status");
    println!("    init      Initialize the marketplace singleton");
    println!("    list      List an NFT for sale");
    println!("    buy       Buy a listed NFT");
    println!("    cancel    Cancel your listing");
    println!("    update    Update your listing's asking price");
    println!("    show      Show a listing record");
    println!("    listings  List every listing the program owns");
    println!("    stats     Show marketplace statistics");
    println!("    account   Show raw account information");
    println!("    info      Show this information");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use terminal_market_sdk::instructions::{derive_escrow, derive_marketplace, derive_order};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_defaults_apply() {
        let cli = Cli::try_parse_from(["terminal-market", "stats"]).unwrap();
        assert_eq!(cli.rpc, DEFAULT_RPC_URL);
        assert_eq!(cli.keypair, DEFAULT_KEYPAIR);
        assert!(!cli.json);
    }

    #[test]
    fn missing_required_args_are_rejected() {
        // No network is reachable from argument parsing; these fail fast.
        assert!(Cli::try_parse_from(["terminal-market", "list"]).is_err());
        assert!(Cli::try_parse_from(["terminal-market", "list", "MintOnly"]).is_err());
        assert!(Cli::try_parse_from(["terminal-market", "buy"]).is_err());
        assert!(Cli::try_parse_from(["terminal-market", "no-such-command"]).is_err());
    }

    #[test]
    fn cluster_is_an_alias_for_status() {
        let cli = Cli::try_parse_from(["terminal-market", "cluster"]).unwrap();
        assert!(matches!(cli.command, Commands::Status));
    }

    #[test]
    fn buy_accepts_optional_seller() {
        let cli = Cli::try_parse_from([
            "terminal-market",
            "buy",
            "So11111111111111111111111111111111111111112",
            "--seller",
            "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA",
        ])
        .unwrap();
        match cli.command {
            Commands::Buy { seller, .. } => assert!(seller.is_some()),
            _ => panic!("expected buy"),
        }
    }

    #[test]
    fn exit_codes_follow_error_kind() {
        let err: anyhow::Error = Error::NotInitialized(Pubkey::new_unique()).into();
        assert_eq!(exit_code(&err), 4);
        let err: anyhow::Error = Error::ProgramRejected("0x1".into()).into();
        assert_eq!(exit_code(&err), 5);
        // Anything that is not an SDK error is a local configuration problem.
        let err = anyhow::anyhow!("plain");
        assert_eq!(exit_code(&err), 2);
    }

    #[test]
    fn bad_key_file_is_a_config_error() {
        let err = load_keypair("/nonexistent/keypair.json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert_eq!(err.kind().exit_code(), 2);
    }

    #[test]
    fn malformed_pubkey_is_a_config_error() {
        let err = parse_pubkey("not-base58!", "mint").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn expand_home_only_touches_tilde_paths() {
        assert_eq!(expand_home("./deploy-authority.json"), "./deploy-authority.json");
        let expanded = expand_home("~/keys/id.json");
        assert!(expanded.ends_with("/keys/id.json"));
        assert!(!expanded.starts_with('~'));
    }

    #[test]
    fn derivations_used_for_reporting_are_consistent() {
        // The addresses the CLI prints on not-found must match the SDK's.
        let pid = Pubkey::from_str(PROGRAM_ID).unwrap();
        let seller = Pubkey::new_unique();
        let buyer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let (listing, _) = derive_listing(&seller, &pid);
        assert_eq!(listing, derive_listing(&seller, &pid).0);
        assert_eq!(derive_marketplace(&pid).0, derive_marketplace(&pid).0);
        assert_ne!(derive_order(&mint, &buyer, &pid).0, listing);
        assert_ne!(derive_escrow(&listing, &mint), listing);
    }
}
