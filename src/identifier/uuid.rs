use super::{decode_fixed, string_serde};
use crate::error::Error;
use core::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

fn write_dashed(f: &mut Formatter, bytes: &[u8], groups: &[usize]) -> fmt::Result {
    let mut offset = 0;
    for (i, len) in groups.iter().enumerate() {
        if i > 0 {
            f.write_str("-")?;
        }
        f.write_str(&hex::encode(&bytes[offset..offset + len]))?;
        offset += len;
    }
    Ok(())
}

/// 16 byte investor uuid, e.g. `117c52a9-a459-4a6f-9ed2-20b713a1ecd0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InvestorId(pub [u8; 16]);

impl InvestorId {
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl Display for InvestorId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write_dashed(f, &self.0, &[4, 2, 2, 2, 6])
    }
}

impl FromStr for InvestorId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed(s).map(InvestorId)
    }
}

string_serde!(InvestorId);

/// First half of a merchant uuid, e.g. `af31ef6a-b3a8-4d6a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MerchantId(pub [u8; 8]);

impl MerchantId {
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }
}

impl Display for MerchantId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write_dashed(f, &self.0, &[4, 2, 2])
    }
}

impl FromStr for MerchantId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed(s).map(MerchantId)
    }
}

string_serde!(MerchantId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_round_trip() -> Result<(), Error> {
        let investor = "117c52a9-a459-4a6f-9ed2-20b713a1ecd0";
        let parsed: InvestorId = investor.parse()?;
        assert_eq!(parsed.as_bytes()[0], 0x11);
        assert_eq!(parsed.to_string(), investor);

        let merchant = "af31ef6a-b3a8-4d6a";
        let parsed: MerchantId = merchant.parse()?;
        assert_eq!(parsed.as_bytes(), &[0xaf, 0x31, 0xef, 0x6a, 0xb3, 0xa8, 0x4d, 0x6a]);
        assert_eq!(parsed.to_string(), merchant);
        Ok(())
    }

    #[test]
    fn test_undashed_input() -> Result<(), Error> {
        let dashed: InvestorId = "117c52a9-a459-4a6f-9ed2-20b713a1ecd0".parse()?;
        let plain: InvestorId = "117c52a9a4594a6f9ed220b713a1ecd0".parse()?;
        assert_eq!(dashed, plain);
        assert!("117c52a9-a459".parse::<InvestorId>().is_err());
        Ok(())
    }
}
