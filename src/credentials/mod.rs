//! Key Material Loader
//!
//! Reads the API key file downloaded from the Coinbase developer platform,
//! checks the required fields and turns the embedded key text into a real
//! PEM block.
//!
//! ```text
//! cdp_api_key.json ──read──▶ CredentialFile ──validate──▶ CredentialRecord
//!                                                  │
//!                                   normalize_key_material ("\\n" → '\n')
//! ```

pub mod error;
pub mod loader;
pub mod normalize;

pub use error::CredentialLoadError;
pub use loader::{CredentialRecord, load_credentials, parse_credentials};
pub use normalize::normalize_key_material;
