// crates/tessera-core/src/lib.rs
//
// tessera-core: Core types, traits, and clock primitives for Tessera.
//
// This is the leaf crate that all other crates in the workspace depend on.
// It defines account identity, the error type, time sources, and the
// collaborator interfaces the staking ledger is written against.

pub mod clock;
pub mod crypto;
pub mod error;
pub mod identity;
pub mod traits;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use tessera_core::AccountId;`

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::TesseraError;
pub use identity::{AccountId, CredentialId};
pub use traits::{CredentialRegistry, FungibleLedger};
