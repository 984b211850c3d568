use crate::{
    derivation::{keccak256, Digest256},
    error::Error,
    identifier::Address,
};
use arrayref::array_ref;
use core::{fmt, str::FromStr};
use k256::{
    ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey},
    elliptic_curve::sec1::ToEncodedPoint,
};
use zeroize::{Zeroize, Zeroizing};

/// Offset added to the raw recovery id before it is written into a payload.
pub const RECOVERY_ID_OFFSET: u8 = 27;

/// secp256k1 private key. Only held for the duration of a signing call.
#[derive(Clone)]
pub struct PrivateKey {
    key: Vec<u8>,
}

impl PrivateKey {
    pub fn new(key: Vec<u8>) -> Self {
        Self { key }
    }

    fn signing_key(&self) -> Result<SigningKey, Error> {
        Ok(SigningKey::from_slice(&self.key)?)
    }

    pub fn address(&self) -> Result<Address, Error> {
        Ok(address_of(self.signing_key()?.verifying_key()))
    }

    /// Deterministic (RFC 6979) low-s signature over an already computed hash.
    pub fn sign_prehash(&self, hash: &Digest256) -> Result<RecoverableSignature, Error> {
        let (sig, recovery_id) = self.signing_key()?.sign_prehash_recoverable(hash)?;
        let bytes = sig.to_bytes();
        Ok(RecoverableSignature {
            r: *array_ref!(bytes, 0, 32),
            s: *array_ref!(bytes, 32, 32),
            v: recovery_id.to_byte() + RECOVERY_ID_OFFSET,
        })
    }
}

impl FromStr for PrivateKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = Zeroizing::new(hex::decode(s.strip_prefix("0x").unwrap_or(s))?);
        if bytes.len() != 32 {
            return Err(Error::InvalidArgument(format!(
                "private key must be 32 bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self::new(bytes.to_vec()))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.key.zeroize()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoverableSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub v: u8,
}

impl RecoverableSignature {
    /// Recovers the address of the key that produced this signature over `hash`.
    pub fn recover(&self, hash: &Digest256) -> Result<Address, Error> {
        let recovery_id = self
            .v
            .checked_sub(RECOVERY_ID_OFFSET)
            .and_then(RecoveryId::from_byte)
            .filter(|id| !id.is_x_reduced())
            .ok_or(Error::SignatureVerificationFailed)?;
        let mut rs = [0u8; 64];
        rs[..32].copy_from_slice(&self.r);
        rs[32..].copy_from_slice(&self.s);
        let sig = Signature::from_slice(&rs).map_err(|_| Error::SignatureVerificationFailed)?;
        let key = VerifyingKey::recover_from_prehash(hash, &sig, recovery_id)
            .map_err(|_| Error::SignatureVerificationFailed)?;
        Ok(address_of(&key))
    }
}

/// Last 20 bytes of the keccak hash of the uncompressed public key.
pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.as_affine().to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address(*array_ref!(hash, 12, 20))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIV: &str = "0x94890218f2b0d04296f30aeafd13655eba4c5bbf1770273276fee52cbe3f2cb4";
    const ADDR: &str = "0x82e8c6cf42c8d1ff9594b17a3f50e94a12cc860f";

    #[test]
    fn test_address_from_private_key() -> Result<(), Error> {
        let key: PrivateKey = PRIV.parse()?;
        assert_eq!(key.address()?.to_string(), ADDR);
        Ok(())
    }

    #[test]
    fn test_sign_and_recover() -> Result<(), Error> {
        let key: PrivateKey = PRIV.parse()?;
        let hash = keccak256(b"receipt");
        let sig = key.sign_prehash(&hash)?;
        assert!(sig.v == 27 || sig.v == 28);
        assert_eq!(sig.recover(&hash)?, key.address()?);

        // another hash recovers some other key
        let other = keccak256(b"receipts");
        assert_ne!(sig.recover(&other).ok(), Some(key.address()?));
        Ok(())
    }

    #[test]
    fn test_bad_recovery_id() -> Result<(), Error> {
        let key: PrivateKey = PRIV.parse()?;
        let hash = keccak256(b"receipt");
        let mut sig = key.sign_prehash(&hash)?;
        for v in &[0, 1, 26, 29, 30, 31, 255] {
            sig.v = *v;
            assert!(matches!(
                sig.recover(&hash),
                Err(Error::SignatureVerificationFailed)
            ));
        }
        Ok(())
    }

    #[test]
    fn test_private_key_length() {
        assert!(matches!(
            "0x9489".parse::<PrivateKey>(),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            "0xzz".parse::<PrivateKey>(),
            Err(Error::HexDecodingError { .. })
        ));
    }

    #[test]
    fn test_debug_is_redacted() -> Result<(), Error> {
        let key: PrivateKey = PRIV.parse()?;
        assert_eq!(format!("{:?}", key), "PrivateKey(..)");
        Ok(())
    }
}
