use crate::error::Error;
use serde::{Deserialize, Serialize};

pub mod address;
pub mod uuid;

pub use self::{
    address::{Address, AddressTail, OrderId},
    uuid::{InvestorId, MerchantId},
};

/// Decodes a hex identifier of exactly `N` bytes.
///
/// An optional `0x` prefix and any dashes are ignored, so both
/// `0x0011..` addresses and `117c52a9-a459-..` uuids are accepted.
pub(crate) fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], Error> {
    let stripped = s.strip_prefix("0x").unwrap_or(s).replace('-', "");
    let bytes = hex::decode(&stripped)?;
    if bytes.len() != N {
        return Err(Error::InvalidArgument(format!(
            "Incorrect identifier length, expected {} bytes: {}",
            N, s
        )));
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Serde compatible Serialize/Deserialize through `Display`/`FromStr`.
macro_rules! string_serde {
    ($t:ty) => {
        impl serde::Serialize for $t {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $t {
            fn deserialize<D>(deserializer: D) -> Result<$t, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                s.parse::<$t>().map_err(serde::de::Error::custom)
            }
        }
    };
}
pub(crate) use string_serde;

/// What a receipt is issued against.
///
/// Whitelist and investment receipts name a contract address; message
/// receipts may name either an address or a merchant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    Address(Address),
    Merchant(MerchantId),
}

impl Target {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Target::Address(address) => address.as_bytes(),
            Target::Merchant(merchant) => merchant.as_bytes(),
        }
    }
}

impl From<Address> for Target {
    fn from(address: Address) -> Self {
        Target::Address(address)
    }
}

impl From<MerchantId> for Target {
    fn from(merchant: MerchantId) -> Self {
        Target::Merchant(merchant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_fixed() -> Result<(), Error> {
        assert_eq!(decode_fixed::<2>("0xabcd")?, [0xab, 0xcd]);
        assert_eq!(decode_fixed::<4>("0a0b-0c0d")?, [10, 11, 12, 13]);
        assert!(matches!(
            decode_fixed::<3>("0xabcd"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            decode_fixed::<1>("zz"),
            Err(Error::HexDecodingError { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_target_bytes() -> Result<(), Error> {
        let merchant: MerchantId = "af31ef6a-b3a8-4d6a".parse()?;
        assert_eq!(Target::from(merchant).as_bytes().len(), 8);
        assert_eq!(Target::from(Address::default()).as_bytes().len(), 20);
        Ok(())
    }
}
