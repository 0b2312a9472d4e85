// crates/tessera-cli/src/accounts.rs
//
// Turning command-line account arguments into AccountIds.
//
// Accepted forms, tried in order:
//   "custody"          the staking ledger's custody account
//   64 hex characters  a raw account id (optionally 0x-prefixed)
//   wallet name        public key from <data_dir>/keys/<name>.pub
//   anything else      SHA-256 of the label

use std::fs;
use std::path::{Path, PathBuf};

use tessera_core::error::TesseraError;
use tessera_core::identity::AccountId;
use tessera_economics::custody_account;

/// Directory holding wallet key files.
pub fn keys_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("keys")
}

/// Resolve an account argument.
pub fn resolve(arg: &str, data_dir: &Path) -> Result<AccountId, TesseraError> {
    let arg = arg.trim();
    if arg.is_empty() {
        return Err(TesseraError::NotFound("empty account argument".to_string()));
    }
    if arg == "custody" {
        return Ok(custody_account());
    }

    let hex_part = arg.strip_prefix("0x").unwrap_or(arg);
    if hex_part.len() == 64 && hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return hex_part.parse();
    }

    let pub_path = keys_dir(data_dir).join(format!("{}.pub", arg));
    if pub_path.exists() {
        let contents = fs::read_to_string(&pub_path)?;
        return contents.trim().parse();
    }

    Ok(AccountId::from_label(arg))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_dir() -> PathBuf {
        std::env::temp_dir().join("tessera_test_accounts_nonexistent")
    }

    #[test]
    fn test_custody_keyword() {
        assert_eq!(resolve("custody", &empty_dir()).unwrap(), custody_account());
    }

    #[test]
    fn test_hex_account() {
        let id = AccountId::from_bytes([7u8; 32]);
        assert_eq!(resolve(&id.to_hex(), &empty_dir()).unwrap(), id);
        assert_eq!(resolve(&format!("0x{}", id.to_hex()), &empty_dir()).unwrap(), id);
    }

    #[test]
    fn test_label_fallback() {
        assert_eq!(
            resolve("alice", &empty_dir()).unwrap(),
            AccountId::from_label("alice")
        );
        assert!(resolve("  ", &empty_dir()).is_err());
    }
}
