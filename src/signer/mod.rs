use crate::{
    derivation::{keccak256, short_id::short_id_from_window},
    error::Error,
    keys::PrivateKey,
    receipt::{layout::Chunk, ReceiptParams, ReceiptType},
};
use arrayref::array_ref;
use core::fmt;
use tracing::debug;

pub const HEAD_LEN: usize = 3;

/// An unsigned receipt: the arguments it was built from and its payload.
///
/// Signing does not touch the payload, so one `Signer` can be signed with
/// several keys or shared between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Signer {
    params: ReceiptParams,
    chunks: Vec<Chunk>,
}

impl Signer {
    pub(crate) fn new(params: ReceiptParams, chunks: Vec<Chunk>) -> Self {
        Signer { params, chunks }
    }

    pub fn receipt_type(&self) -> ReceiptType {
        self.params.receipt_type()
    }

    pub fn params(&self) -> &ReceiptParams {
        &self.params
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Short id over bytes 1..25 of the first chunk. Only meaningful for
    /// session receipts, which keep the investor and merchant ids there.
    pub fn short_id(&self) -> String {
        short_id_from_window(array_ref!(self.chunks[0], 1, 24))
    }

    pub fn sign_to_buf(&self, key: &PrivateKey) -> Result<SignedReceipt, Error> {
        let checksum = key.address()?.checksum();
        let head = [self.receipt_type().tag(), checksum[0], checksum[1]];

        let mut chunks = self.chunks.clone();
        chunks[0][0] = 0;
        let hash = keccak256(&chunks.concat());
        let signature = key.sign_prehash(&hash)?;
        chunks[0][0] = signature.v;

        debug!(
            receipt_type = %self.receipt_type(),
            chunks = chunks.len(),
            "signed receipt"
        );
        Ok(SignedReceipt {
            head,
            r: signature.r,
            s: signature.s,
            chunks,
        })
    }

    /// Signs and serializes to the wire token.
    pub fn sign(&self, key: &PrivateKey) -> Result<String, Error> {
        Ok(self.sign_to_buf(key)?.to_string())
    }
}

/// The parts of a signed receipt before they are base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedReceipt {
    /// Type tag followed by the last two bytes of the signer address.
    pub head: [u8; HEAD_LEN],
    pub r: [u8; 32],
    pub s: [u8; 32],
    /// Payload, with the recovery id in the first byte.
    pub chunks: Vec<Chunk>,
}

impl fmt::Display for SignedReceipt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&base64::encode(self.head))?;
        for part in [&self.r, &self.s].iter().copied().chain(self.chunks.iter()) {
            write!(f, ".{}", base64::encode(part))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        identifier::Address,
        receipt::{build, layout::CHUNK_LEN},
    };

    const PRIV: &str = "0x94890218f2b0d04296f30aeafd13655eba4c5bbf1770273276fee52cbe3f2cb4";

    #[test]
    fn test_sign_leaves_payload_untouched() -> Result<(), Error> {
        let key: PrivateKey = PRIV.parse()?;
        let target: Address = "0x00112233445566778899aabbccddeeff00112233".parse()?;
        let whitelist = build(target).whitelist(
            "0x2222222222222222222222222222222222222222".parse()?,
            Some(1492754385),
        )?;
        let before = whitelist.chunks().to_vec();

        let signed = whitelist.sign_to_buf(&key)?;
        assert_eq!(whitelist.chunks(), &before[..]);
        assert_eq!(signed.head, [1, 0x86, 0x0f]);
        assert!(signed.chunks[0][0] == 27 || signed.chunks[0][0] == 28);
        assert_eq!(signed.chunks[0][1..], before[0][1..]);

        // signing twice gives the same token
        assert_eq!(whitelist.sign(&key)?, whitelist.sign(&key)?);
        Ok(())
    }

    #[test]
    fn test_token_shape() -> Result<(), Error> {
        let signed = SignedReceipt {
            head: [41, 0, 0],
            r: [0; 32],
            s: [0; 32],
            chunks: vec![[0; CHUNK_LEN]; 2],
        };
        let token = signed.to_string();
        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 5);
        assert_eq!(parts[0], "KQAA");
        assert!(parts[1..].iter().all(|p| p.len() == 44 && p.ends_with('=')));
        Ok(())
    }
}
