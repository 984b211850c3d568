use crate::{
    error::Error,
    identifier::{Address, InvestorId, MerchantId, OrderId, Target},
    signer::Signer,
};
use core::{convert::TryFrom, fmt};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub mod clock;
pub mod layout;
pub mod parse;

use self::clock::{Clock, SystemClock};

pub use self::{
    layout::ReceiptFields,
    parse::{parse, parse_to_buf, parse_to_params, ParsedReceipt, ReceiptParts},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReceiptType {
    /// Authorizes an investor address against a target contract.
    Whitelist,
    /// Records a payment referencing investor, affiliate and amount.
    Invest,
    /// Short lived session binding an investor and a merchant.
    Session,
    /// Authenticated UTF-8 text tied to a target.
    Message,
}

impl ReceiptType {
    pub fn tag(&self) -> u8 {
        match self {
            Self::Whitelist => 1,
            Self::Invest => 2,
            Self::Session => 8,
            Self::Message => 41,
        }
    }

    /// Number of 32 byte chunks in the payload, `None` when it depends on
    /// the content.
    pub fn chunk_count(&self) -> Option<usize> {
        match self {
            Self::Whitelist | Self::Session => Some(1),
            Self::Invest => Some(2),
            Self::Message => None,
        }
    }
}

impl TryFrom<u8> for ReceiptType {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            1 => Ok(Self::Whitelist),
            2 => Ok(Self::Invest),
            8 => Ok(Self::Session),
            41 => Ok(Self::Message),
            _ => Err(Error::UnknownReceiptType(tag)),
        }
    }
}

impl fmt::Display for ReceiptType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Whitelist => "whitelist",
            Self::Invest => "invest",
            Self::Session => "session",
            Self::Message => "message",
        };
        f.write_str(name)
    }
}

/// Serialized as the numeric tag
impl Serialize for ReceiptType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.tag())
    }
}

impl<'de> Deserialize<'de> for ReceiptType {
    fn deserialize<D>(deserializer: D) -> Result<ReceiptType, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = u8::deserialize(deserializer)?;
        ReceiptType::try_from(tag).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhitelistParams {
    pub target: Address,
    pub investor: Address,
    /// Seconds since the epoch.
    pub created: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentParams {
    pub target: Address,
    pub investor: Address,
    pub affiliate: Address,
    /// Out of band payment amount.
    pub amount: u64,
    pub order_id: OrderId,
    /// Seconds since the epoch.
    pub created: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionParams {
    pub investor_id: InvestorId,
    pub merchant_id: MerchantId,
    /// Seconds since the epoch.
    pub created: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageParams {
    pub target: Target,
    pub message: String,
    /// Milliseconds since the epoch.
    pub created: u64,
}

/// Arguments of a receipt, one variant per receipt type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReceiptParams {
    Whitelist(WhitelistParams),
    Investment(InvestmentParams),
    Session(SessionParams),
    Message(MessageParams),
}

impl ReceiptParams {
    pub fn receipt_type(&self) -> ReceiptType {
        match self {
            Self::Whitelist(_) => ReceiptType::Whitelist,
            Self::Investment(_) => ReceiptType::Invest,
            Self::Session(_) => ReceiptType::Session,
            Self::Message(_) => ReceiptType::Message,
        }
    }

    /// Lays out the payload and returns it ready for signing.
    pub fn build(self) -> Result<Signer, Error> {
        let chunks = layout::encode(&self)?;
        Ok(Signer::new(self, chunks))
    }
}

/// Starts a receipt issued against `target`.
pub fn build<T: Into<Target>>(target: T) -> ReceiptBuilder {
    ReceiptBuilder::new(Some(target.into()))
}

/// Fills in defaults (target, creation time) and builds receipts.
#[derive(Debug, Clone)]
pub struct ReceiptBuilder<C: Clock = SystemClock> {
    target: Option<Target>,
    clock: C,
}

impl ReceiptBuilder {
    pub fn new(target: Option<Target>) -> Self {
        ReceiptBuilder {
            target,
            clock: SystemClock,
        }
    }
}

impl Default for ReceiptBuilder {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<C: Clock> ReceiptBuilder<C> {
    pub fn with_clock<K: Clock>(self, clock: K) -> ReceiptBuilder<K> {
        ReceiptBuilder {
            target: self.target,
            clock,
        }
    }

    fn target_address(&self) -> Result<Address, Error> {
        match self.target {
            Some(Target::Address(address)) => Ok(address),
            _ => Err(Error::InvalidArgument(
                "receipt requires a target address".into(),
            )),
        }
    }

    /// `created` is in seconds.
    pub fn whitelist(&self, investor: Address, created: Option<u64>) -> Result<Signer, Error> {
        ReceiptParams::Whitelist(WhitelistParams {
            target: self.target_address()?,
            investor,
            created: created.unwrap_or_else(|| self.clock.now_secs()),
        })
        .build()
    }

    /// `created` is in seconds, `order_id` defaults to zero.
    pub fn investment(
        &self,
        investor: Address,
        affiliate: Address,
        amount: u64,
        order_id: Option<OrderId>,
        created: Option<u64>,
    ) -> Result<Signer, Error> {
        ReceiptParams::Investment(InvestmentParams {
            target: self.target_address()?,
            investor,
            affiliate,
            amount,
            order_id: order_id.unwrap_or_default(),
            created: created.unwrap_or_else(|| self.clock.now_secs()),
        })
        .build()
    }

    /// `created` is in seconds. The target, if any, is not part of a session.
    pub fn session(
        &self,
        investor_id: InvestorId,
        merchant_id: MerchantId,
        created: Option<u64>,
    ) -> Result<Signer, Error> {
        ReceiptParams::Session(SessionParams {
            investor_id,
            merchant_id,
            created: created.unwrap_or_else(|| self.clock.now_secs()),
        })
        .build()
    }

    /// `created` is in milliseconds.
    pub fn message(&self, message: &str, created: Option<u64>) -> Result<Signer, Error> {
        let target = self.target.ok_or_else(|| {
            Error::InvalidArgument("message receipt requires a target".into())
        })?;
        ReceiptParams::Message(MessageParams {
            target,
            message: message.to_owned(),
            created: created.unwrap_or_else(|| self.clock.now_millis()),
        })
        .build()
    }
}

#[cfg(test)]
mod tests {
    use super::{clock::FixedClock, *};

    #[test]
    fn test_type_tags() -> Result<(), Error> {
        for t in &[
            ReceiptType::Whitelist,
            ReceiptType::Invest,
            ReceiptType::Session,
            ReceiptType::Message,
        ] {
            assert_eq!(ReceiptType::try_from(t.tag())?, *t);
        }
        assert!(matches!(
            ReceiptType::try_from(3),
            Err(Error::UnknownReceiptType(3))
        ));
        Ok(())
    }

    #[test]
    fn test_defaults_from_clock() -> Result<(), Error> {
        let target: Address = "0x00112233445566778899aabbccddeeff00112233".parse()?;
        let builder = build(target).with_clock(FixedClock(1_492_754_385_000));

        let whitelist = builder.whitelist(Address::default(), None)?;
        match whitelist.params() {
            ReceiptParams::Whitelist(p) => assert_eq!(p.created, 1_492_754_385),
            other => panic!("unexpected params {:?}", other),
        }

        let invest = builder.investment(Address::default(), Address::default(), 1, None, None)?;
        match invest.params() {
            ReceiptParams::Investment(p) => {
                assert_eq!(p.order_id, OrderId::default());
                assert_eq!(p.created, 1_492_754_385);
            }
            other => panic!("unexpected params {:?}", other),
        }

        let message = builder.message("hi", None)?;
        match message.params() {
            ReceiptParams::Message(p) => assert_eq!(p.created, 1_492_754_385_000),
            other => panic!("unexpected params {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_target_required() -> Result<(), Error> {
        let untargeted = ReceiptBuilder::new(None);
        assert!(matches!(
            untargeted.whitelist(Address::default(), Some(1)),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            untargeted.message("hi", Some(1)),
            Err(Error::InvalidArgument(_))
        ));

        let merchant: MerchantId = "af31ef6a-b3a8-4d6a".parse()?;
        assert!(matches!(
            build(merchant).investment(Address::default(), Address::default(), 1, None, Some(1)),
            Err(Error::InvalidArgument(_))
        ));
        assert!(untargeted
            .session(InvestorId::default(), merchant, Some(1))
            .is_ok());
        Ok(())
    }
}
