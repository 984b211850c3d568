use base64::DecodeError;
use hex::FromHexError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Message too long: {length} bytes, at most {max} allowed")]
    MessageTooLong { length: usize, max: usize },

    #[error("Malformed receipt: {0}")]
    MalformedReceipt(String),

    #[error("Unknown receipt type: {0}")]
    UnknownReceiptType(u8),

    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    #[error("Base64 Decoding error")]
    Base64DecodingError {
        #[from]
        source: DecodeError,
    },

    #[error("Hex Decoding error")]
    HexDecodingError {
        #[from]
        source: FromHexError,
    },

    #[error("Key error: {0}")]
    KeyError(#[from] k256::ecdsa::Error),
}
