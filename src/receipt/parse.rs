use super::{
    layout::{self, Chunk, ReceiptFields, CHUNK_LEN},
    ReceiptType,
};
use crate::{
    derivation::keccak256,
    error::Error,
    identifier::Address,
    keys::RecoverableSignature,
    signer::HEAD_LEN,
};
use core::convert::TryFrom;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A verified token split back into its binary parts.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptParts {
    pub receipt_type: ReceiptType,
    pub head: [u8; HEAD_LEN],
    pub signature: RecoverableSignature,
    /// Payload as signed, recovery id included.
    pub chunks: Vec<Chunk>,
    pub signer: Address,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedReceipt {
    pub signer: Address,
    #[serde(rename = "type")]
    pub receipt_type: ReceiptType,
    pub fields: ReceiptFields,
}

/// Splits a token, recovers the signer and checks it against the head.
///
/// The head only carries the last two bytes of the signer address, so a
/// token re-signed by a different key passes with probability 1/65536. The
/// recovered `signer` is always the key that actually signed the payload;
/// callers that expect a particular signer must compare it themselves.
pub fn parse_to_buf(token: &str) -> Result<ReceiptParts, Error> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() < 4 {
        return Err(Error::MalformedReceipt(format!(
            "expected at least 4 parts, got {}",
            parts.len()
        )));
    }

    let head: [u8; HEAD_LEN] = decode_segment(parts[0])?;
    let receipt_type = ReceiptType::try_from(head[0])?;
    let r = decode_segment(parts[1])?;
    let s = decode_segment(parts[2])?;
    let mut chunks = parts[3..]
        .iter()
        .map(|part| decode_segment::<CHUNK_LEN>(part))
        .collect::<Result<Vec<_>, _>>()?;
    layout::check_chunk_count(receipt_type, &chunks)?;

    let v = chunks[0][0];
    chunks[0][0] = 0;
    let hash = keccak256(&chunks.concat());
    chunks[0][0] = v;

    let signature = RecoverableSignature { r, s, v };
    let signer = signature.recover(&hash)?;
    if signer.checksum() != [head[1], head[2]] {
        warn!(%receipt_type, %signer, "receipt checksum does not match signer");
        return Err(Error::SignatureVerificationFailed);
    }
    debug!(%receipt_type, %signer, "parsed receipt");

    Ok(ReceiptParts {
        receipt_type,
        head,
        signature,
        chunks,
        signer,
    })
}

pub fn parse(token: &str) -> Result<ParsedReceipt, Error> {
    let parts = parse_to_buf(token)?;
    let fields = layout::decode(parts.receipt_type, &parts.chunks)?;
    Ok(ParsedReceipt {
        signer: parts.signer,
        receipt_type: parts.receipt_type,
        fields,
    })
}

/// `0x` prefixed hex of r, s and every chunk, in token order.
pub fn parse_to_params(token: &str) -> Result<Vec<String>, Error> {
    let parts = parse_to_buf(token)?;
    Ok([&parts.signature.r, &parts.signature.s]
        .iter()
        .copied()
        .chain(parts.chunks.iter())
        .map(|bytes| format!("0x{}", hex::encode(bytes)))
        .collect())
}

fn decode_segment<const N: usize>(segment: &str) -> Result<[u8; N], Error> {
    let bytes = base64::decode(segment)?;
    if bytes.len() != N {
        return Err(Error::MalformedReceipt(format!(
            "segment decodes to {} bytes, expected {}",
            bytes.len(),
            N
        )));
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}
