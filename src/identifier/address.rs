use super::{decode_fixed, string_serde};
use crate::error::Error;
use arrayref::array_ref;
use core::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// 20 byte account address, written as `0x` prefixed hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const LEN: usize = 20;

    pub fn new(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Last two bytes of the address. Carried in a token head in place of
    /// the full signer address.
    pub fn checksum(&self) -> [u8; 2] {
        [self.0[18], self.0[19]]
    }

    /// Low 7 bytes of the address.
    pub fn tail(&self) -> AddressTail {
        AddressTail(*array_ref!(self.0, 13, 7))
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed(s).map(Address)
    }
}

string_serde!(Address);

/// The low 7 bytes of a target address, as embedded in whitelist and
/// investment receipts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AddressTail(pub [u8; 7]);

impl Display for AddressTail {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for AddressTail {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed(s).map(AddressTail)
    }
}

string_serde!(AddressTail);

/// 4 byte order reference of an investment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OrderId(pub [u8; 4]);

impl Display for OrderId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for OrderId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed(s).map(OrderId)
    }
}

string_serde!(OrderId);
