use sha3::{Digest, Keccak256};

pub mod short_id;

pub type Digest256 = [u8; 32];

/// Legacy keccak-256 (not the NIST SHA3-256 padding), as used for
/// receipt hashes and address derivation.
pub fn keccak256(input: &[u8]) -> Digest256 {
    let mut h = Keccak256::new();
    h.update(input);
    let mut out = [0u8; 32];
    out.copy_from_slice(&h.finalize());
    out
}

#[test]
fn test_keccak_empty() {
    assert_eq!(
        hex::encode(keccak256(&[])),
        "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
    );
}
