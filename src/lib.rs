pub mod derivation;
pub mod error;
pub mod identifier;
pub mod keys;
pub mod receipt;
pub mod signer;
pub mod util;
