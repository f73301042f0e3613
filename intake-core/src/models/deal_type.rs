use std::fmt;

use serde::{Deserialize, Serialize};

/// Tag attached to payloads whose deal type has no mapping.
pub const UNKNOWN_DEAL_TAG: &str = "Deal_Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealType {
    DoubleClose,
    Emd,
    FixFlip,
    BuyHold,
    GapFunding,
    Land,
}

impl DealType {
    pub const ALL: [DealType; 6] = [
        Self::DoubleClose,
        Self::Emd,
        Self::FixFlip,
        Self::BuyHold,
        Self::GapFunding,
        Self::Land,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DoubleClose => "double_close",
            Self::Emd => "emd",
            Self::FixFlip => "fix_flip",
            Self::BuyHold => "buy_hold",
            Self::GapFunding => "gap_funding",
            Self::Land => "land",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "double_close" => Some(Self::DoubleClose),
            "emd" => Some(Self::Emd),
            "fix_flip" => Some(Self::FixFlip),
            "buy_hold" => Some(Self::BuyHold),
            "gap_funding" => Some(Self::GapFunding),
            "land" => Some(Self::Land),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::DoubleClose => "Double Close",
            Self::Emd => "Earnest Money Deposit",
            Self::FixFlip => "Fix and Flip",
            Self::BuyHold => "Buy and Hold",
            Self::GapFunding => "Gap Funding",
            Self::Land => "Land Funding",
        }
    }

    /// CRM tag identifying the deal type on the webhook side.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::DoubleClose => "Deal_DoubleClose",
            Self::Emd => "Deal_EMD",
            Self::FixFlip => "Deal_FixFlip",
            Self::BuyHold => "Deal_BuyHold",
            Self::GapFunding => "Deal_GapFunding",
            Self::Land => "Deal_Land",
        }
    }

    /// Message shown once an application of this type has been accepted.
    pub fn confirmation_message(&self) -> &'static str {
        match self {
            Self::Land => {
                "Thank you for submitting your Land Funding application! Our technical team will \
                 specifically analyze the APN and land characteristics you provided. We will \
                 contact you within 48 business hours."
            }
            _ => {
                "Thank you for submitting your application! Our team will review the details and \
                 contact you within 24 business hours."
            }
        }
    }
}

impl fmt::Display for DealType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tags for a wire-level deal type name. Unmapped names get [`UNKNOWN_DEAL_TAG`].
pub fn tags_for(deal_type: &str) -> Vec<String> {
    let tag = DealType::parse(deal_type)
        .map(|dt| dt.tag())
        .unwrap_or(UNKNOWN_DEAL_TAG);
    vec![tag.to_string()]
}
