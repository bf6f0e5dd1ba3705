//! SDK error type and the closed error-kind taxonomy.

use solana_sdk::pubkey::Pubkey;

/// All errors returned by the Terminal Market SDK.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // ── Configuration ────────────────────────────────────────────────────────
    /// Invalid or missing local configuration (arguments, defaults).
    #[error("configuration error: {0}")]
    Config(String),

    /// Input that should have been a base-58 32-byte public key was not.
    #[error("invalid public key '{input}': {reason}")]
    InvalidPublicKey { input: String, reason: String },

    /// A decimal SOL amount that cannot be converted to lamports.
    #[error("invalid SOL amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: String },

    /// The signing key file could not be read or parsed.
    #[error("cannot load keypair from '{path}': {reason}")]
    Keypair { path: String, reason: String },

    // ── RPC / network ────────────────────────────────────────────────────────
    /// A Solana JSON-RPC call failed in transport.
    #[error("RPC error: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    // ── Not found ────────────────────────────────────────────────────────────
    /// A derived account does not exist on-chain.
    #[error("{what} account {address} does not exist")]
    NotFound { what: &'static str, address: Pubkey },

    /// The marketplace singleton has not been created yet.
    #[error("marketplace is not initialized (expected at {0})")]
    NotInitialized(Pubkey),

    /// No active listing escrows the requested mint.
    #[error("no active listing found for mint {0}")]
    NoListingForMint(Pubkey),

    /// A listing exists at the derived address but escrows a different mint.
    #[error("listing {listing} holds mint {actual}, not {expected}")]
    MintMismatch {
        listing:  Pubkey,
        expected: Pubkey,
        actual:   Pubkey,
    },

    // ── Program side ─────────────────────────────────────────────────────────
    /// Raw account bytes do not match the compiled account schema.
    #[error("account parse error at offset {offset}: {reason}")]
    Parse { offset: usize, reason: String },

    /// A submitted transaction was rejected by the marketplace program.
    #[error("transaction rejected: {0}")]
    ProgramRejected(String),
}

impl Error {
    /// The closed category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_)
            | Error::InvalidPublicKey { .. }
            | Error::InvalidAmount { .. }
            | Error::Keypair { .. } => ErrorKind::Config,
            Error::Rpc(_) => ErrorKind::Network,
            Error::NotFound { .. }
            | Error::NotInitialized(_)
            | Error::NoListingForMint(_)
            | Error::MintMismatch { .. } => ErrorKind::NotFound,
            // Parse means the account exists but violates the compiled schema —
            // a program-side contract break, not a transport failure.
            Error::Parse { .. } | Error::ProgramRejected(_) => ErrorKind::ProgramRejection,
        }
    }
}

/// The four failure categories a command can end in.
///
/// Every [`Error`] maps to exactly one kind, and every kind maps to a distinct
/// process exit code so callers and scripts can tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad local input: arguments, key file, malformed keys or amounts.
    Config,
    /// The RPC endpoint was unreachable or the transport failed.
    Network,
    /// A queried or derived account does not exist.
    NotFound,
    /// The on-chain program (or its account schema) rejected the operation.
    ProgramRejection,
}

impl ErrorKind {
    /// Process exit code for this kind. 2 matches clap's own usage-error exit.
    pub const fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Config => 2,
            ErrorKind::Network => 3,
            ErrorKind::NotFound => 4,
            ErrorKind::ProgramRejection => 5,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::Config => "config",
            ErrorKind::Network => "network",
            ErrorKind::NotFound => "not-found",
            ErrorKind::ProgramRejection => "program-rejection",
        };
        f.write_str(s)
    }
}

/// Convenience alias so every module can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_map_to_config_kind() {
        let err = Error::Keypair {
            path:   "./missing.json".into(),
            reason: "No such file or directory".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Config);
        assert_eq!(err.kind().exit_code(), 2);
    }

    #[test]
    fn not_found_is_not_a_network_error() {
        let err = Error::NotInitialized(Pubkey::new_unique());
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_ne!(err.kind(), ErrorKind::Network);
        assert_eq!(err.kind().exit_code(), 4);
    }

    #[test]
    fn rejection_and_parse_share_a_kind() {
        let rejected = Error::ProgramRejected("custom program error: 0x1".into());
        let parse = Error::Parse { offset: 0, reason: "bad discriminator".into() };
        assert_eq!(rejected.kind(), ErrorKind::ProgramRejection);
        assert_eq!(parse.kind(), ErrorKind::ProgramRejection);
        assert_eq!(rejected.kind().exit_code(), 5);
    }

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            ErrorKind::Config.exit_code(),
            ErrorKind::Network.exit_code(),
            ErrorKind::NotFound.exit_code(),
            ErrorKind::ProgramRejection.exit_code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn display_mint_mismatch() {
        let listing = Pubkey::new_unique();
        let expected = Pubkey::new_unique();
        let actual = Pubkey::new_unique();
        let err = Error::MintMismatch { listing, expected, actual };
        let msg = err.to_string();
        assert!(msg.contains(&listing.to_string()));
        assert!(msg.contains(&expected.to_string()));
        assert!(msg.contains(&actual.to_string()));
    }
}
