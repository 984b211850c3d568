//! Byte layouts of receipt payloads
//!
//! A payload is a sequence of 32 byte chunks. Byte 0 of the first chunk is
//! reserved for the recovery id of the signature and is zero while the
//! payload is hashed. Integers are big endian.
//!
//! ```text
//! whitelist  | v | target[13..20] | created u32 | investor (20) |
//! invest     | v | target[13..20] | order (4)   | investor (20) |
//!            | created u32 | amount big u32 | amount low u32 | affiliate (20) |
//! session    | v | investor id (16) | merchant id (8) | created u32 | 0 0 0 |
//! message    | v | created ms (7) | target (20) | length u32 | text, zero padded ...
//! ```

use super::{
    InvestmentParams, MessageParams, ReceiptParams, ReceiptType, SessionParams, WhitelistParams,
};
use crate::{
    error::Error,
    identifier::{Address, AddressTail, InvestorId, MerchantId, OrderId},
};
use arrayref::array_ref;
use core::convert::TryFrom;
use serde::{Deserialize, Serialize};

pub const CHUNK_LEN: usize = 32;
pub type Chunk = [u8; CHUNK_LEN];

/// Longest message, in UTF-8 bytes.
pub const MAX_MESSAGE_LEN: usize = CHUNK_LEN * 7;

const MAX_UINT32: u64 = 0xFFFF_FFFF;

/// Decoded contents of a receipt payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReceiptFields {
    Whitelist(WhitelistFields),
    Investment(InvestmentFields),
    Session(SessionFields),
    Message(MessageFields),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhitelistFields {
    pub target: AddressTail,
    pub created: u32,
    pub investor: Address,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentFields {
    pub target: AddressTail,
    pub order_id: OrderId,
    pub investor: Address,
    pub created: u32,
    pub amount: u64,
    pub affiliate: Address,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionFields {
    pub investor_id: InvestorId,
    pub merchant_id: MerchantId,
    pub created: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageFields {
    /// Milliseconds since the epoch.
    pub created: u64,
    /// First 8 bytes of the target.
    pub merchant_id: MerchantId,
    /// All 20 target bytes, zero padded when the target was a merchant id.
    pub target: Address,
    pub message: String,
}

pub fn encode(params: &ReceiptParams) -> Result<Vec<Chunk>, Error> {
    match params {
        ReceiptParams::Whitelist(p) => encode_whitelist(p),
        ReceiptParams::Investment(p) => encode_investment(p),
        ReceiptParams::Session(p) => encode_session(p),
        ReceiptParams::Message(p) => encode_message(p),
    }
}

/// Reads the fields back out of a payload. The reserved byte is ignored.
pub fn decode(receipt_type: ReceiptType, chunks: &[Chunk]) -> Result<ReceiptFields, Error> {
    check_chunk_count(receipt_type, chunks)?;
    let first = &chunks[0];
    let fields = match receipt_type {
        ReceiptType::Whitelist => ReceiptFields::Whitelist(WhitelistFields {
            target: AddressTail(*array_ref!(first, 1, 7)),
            created: read_u32(first, 8),
            investor: Address(*array_ref!(first, 12, 20)),
        }),
        ReceiptType::Invest => {
            let second = &chunks[1];
            ReceiptFields::Investment(InvestmentFields {
                target: AddressTail(*array_ref!(first, 1, 7)),
                order_id: OrderId(*array_ref!(first, 8, 4)),
                investor: Address(*array_ref!(first, 12, 20)),
                created: read_u32(second, 0),
                amount: join_u64(read_u32(second, 4), read_u32(second, 8)),
                affiliate: Address(*array_ref!(second, 12, 20)),
            })
        }
        ReceiptType::Session => ReceiptFields::Session(SessionFields {
            investor_id: InvestorId(*array_ref!(first, 1, 16)),
            merchant_id: MerchantId(*array_ref!(first, 17, 8)),
            created: read_u32(first, 25),
        }),
        ReceiptType::Message => {
            // top byte of `big` shares its place with v
            let big = u32::from_be_bytes([0, first[1], first[2], first[3]]);
            let length = read_u32(first, 28) as usize;
            let text = chunks[1..].concat();
            let message = String::from_utf8(text[..length].to_vec()).map_err(|_| {
                Error::MalformedReceipt("message is not valid UTF-8".into())
            })?;
            ReceiptFields::Message(MessageFields {
                created: join_u64(big, read_u32(first, 4)),
                merchant_id: MerchantId(*array_ref!(first, 8, 8)),
                target: Address(*array_ref!(first, 8, 20)),
                message,
            })
        }
    };
    Ok(fields)
}

/// Checks that the number of chunks matches what `receipt_type` lays out.
pub fn check_chunk_count(receipt_type: ReceiptType, chunks: &[Chunk]) -> Result<(), Error> {
    let expected = match receipt_type.chunk_count() {
        Some(count) => count,
        None => {
            let first = chunks.first().ok_or_else(|| {
                Error::MalformedReceipt("empty payload".into())
            })?;
            let length = read_u32(first, 28) as usize;
            if length > MAX_MESSAGE_LEN {
                return Err(Error::MalformedReceipt(format!(
                    "message length out of range: {}",
                    length
                )));
            }
            message_chunk_count(length)
        }
    };
    if chunks.len() != expected {
        return Err(Error::MalformedReceipt(format!(
            "{} receipt expects {} chunks, got {}",
            receipt_type,
            expected,
            chunks.len()
        )));
    }
    Ok(())
}

fn encode_whitelist(p: &WhitelistParams) -> Result<Vec<Chunk>, Error> {
    let created = seconds(p.created)?;
    let mut chunk = [0u8; CHUNK_LEN];
    chunk[1..8].copy_from_slice(&p.target.tail().0);
    chunk[8..12].copy_from_slice(&created.to_be_bytes());
    chunk[12..32].copy_from_slice(p.investor.as_bytes());
    Ok(vec![chunk])
}

fn encode_investment(p: &InvestmentParams) -> Result<Vec<Chunk>, Error> {
    let created = seconds(p.created)?;
    let (big, low) = split_u64(p.amount)?;

    let mut first = [0u8; CHUNK_LEN];
    first[1..8].copy_from_slice(&p.target.tail().0);
    first[8..12].copy_from_slice(&p.order_id.0);
    first[12..32].copy_from_slice(p.investor.as_bytes());

    let mut second = [0u8; CHUNK_LEN];
    second[0..4].copy_from_slice(&created.to_be_bytes());
    second[4..8].copy_from_slice(&big.to_be_bytes());
    second[8..12].copy_from_slice(&low.to_be_bytes());
    second[12..32].copy_from_slice(p.affiliate.as_bytes());
    Ok(vec![first, second])
}

fn encode_session(p: &SessionParams) -> Result<Vec<Chunk>, Error> {
    let created = seconds(p.created)?;
    let mut chunk = [0u8; CHUNK_LEN];
    chunk[1..17].copy_from_slice(p.investor_id.as_bytes());
    chunk[17..25].copy_from_slice(p.merchant_id.as_bytes());
    chunk[25..29].copy_from_slice(&created.to_be_bytes());
    Ok(vec![chunk])
}

fn encode_message(p: &MessageParams) -> Result<Vec<Chunk>, Error> {
    let text = p.message.as_bytes();
    if text.len() > MAX_MESSAGE_LEN {
        return Err(Error::MessageTooLong {
            length: text.len(),
            max: MAX_MESSAGE_LEN,
        });
    }
    let (big, low) = split_u64(p.created)?;
    if big >> 24 != 0 {
        return Err(Error::InvalidArgument(format!(
            "created does not fit in 7 bytes: {}",
            p.created
        )));
    }

    let mut payload = vec![0u8; message_chunk_count(text.len()) * CHUNK_LEN];
    payload[0..4].copy_from_slice(&big.to_be_bytes());
    payload[4..8].copy_from_slice(&low.to_be_bytes());
    let target = p.target.as_bytes();
    payload[8..8 + target.len()].copy_from_slice(target);
    payload[28..32].copy_from_slice(&(text.len() as u32).to_be_bytes());
    payload[32..32 + text.len()].copy_from_slice(text);

    Ok(payload
        .chunks_exact(CHUNK_LEN)
        .map(|chunk| *array_ref!(chunk, 0, CHUNK_LEN))
        .collect())
}

/// Header chunk plus one chunk per started 32 bytes; a length that is a
/// multiple of 32 gets a trailing zero chunk.
fn message_chunk_count(length: usize) -> usize {
    length / CHUNK_LEN + 2
}

fn seconds(created: u64) -> Result<u32, Error> {
    u32::try_from(created).map_err(|_| {
        Error::InvalidArgument(format!("created has to be in seconds: {}", created))
    })
}

/// Splits `value` into `big = value / (2^32 - 1)` and
/// `low = value % (2^32 - 1) - big`, so that `value = big * 2^32 + low`.
fn split_u64(value: u64) -> Result<(u32, u32), Error> {
    let out_of_range =
        || Error::InvalidArgument(format!("value cannot be split into uint32 halves: {}", value));
    let big = value / MAX_UINT32;
    let low = (value % MAX_UINT32).checked_sub(big).ok_or_else(out_of_range)?;
    let big = u32::try_from(big).map_err(|_| out_of_range())?;
    Ok((big, low as u32))
}

fn join_u64(big: u32, low: u32) -> u64 {
    (u64::from(big) << 32) | u64::from(low)
}

fn read_u32(chunk: &Chunk, offset: usize) -> u32 {
    u32::from_be_bytes(*array_ref!(chunk, offset, 4))
}
