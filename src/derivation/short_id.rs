//! Short identifiers
//!
//! A 7 character handle derived from an investor id and the first half of a
//! merchant id. Meant for humans to read out or type, it is not a secret and
//! carries no authentication.

use super::keccak256;
use crate::identifier::{InvestorId, MerchantId};

pub const SHORT_ID_LEN: usize = 7;
pub const WINDOW_LEN: usize = 24;

pub fn short_id(investor_id: &InvestorId, merchant_id: &MerchantId) -> String {
    let mut window = [0u8; WINDOW_LEN];
    window[..16].copy_from_slice(investor_id.as_bytes());
    window[16..].copy_from_slice(merchant_id.as_bytes());
    short_id_from_window(&window)
}

/// base58 of `keccak256(window)`, cut to `SHORT_ID_LEN` characters.
pub fn short_id_from_window(window: &[u8; WINDOW_LEN]) -> String {
    bs58::encode(keccak256(window))
        .into_string()
        .chars()
        .take(SHORT_ID_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_short_id() -> Result<(), Error> {
        let investor_id = "117c52a9-a459-4a6f-9ed2-20b713a1ecd0".parse()?;
        let merchant_id = "af31ef6a-b3a8-4d6a".parse()?;
        assert_eq!(short_id(&investor_id, &merchant_id), "9xRuHU7");
        // stable across calls
        assert_eq!(
            short_id(&investor_id, &merchant_id),
            short_id(&investor_id, &merchant_id)
        );
        Ok(())
    }

    #[test]
    fn test_short_id_depends_on_merchant() -> Result<(), Error> {
        let investor_id = "117c52a9-a459-4a6f-9ed2-20b713a1ecd0".parse()?;
        let a = short_id(&investor_id, &"af31ef6a-b3a8-4d6a".parse()?);
        let b = short_id(&investor_id, &"af31ef6a-b3a8-4d6b".parse()?);
        assert_eq!(a.len(), SHORT_ID_LEN);
        assert_ne!(a, b);
        Ok(())
    }
}
