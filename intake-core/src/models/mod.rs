mod choices;
mod deal_type;
mod deals;
pub mod document;
mod shared;

pub use choices::{
    ArvJustification, CreditScoreRange, FinancingStructure, LandZoning, RentalStrategy, RoadAccess,
};
pub use deal_type::{DealType, UNKNOWN_DEAL_TAG, tags_for};
pub use deals::{
    BuyHoldDetails, Comparable, DealDetails, DoubleCloseDetails, EmdDetails, FixFlipDetails,
    GapFundingDetails, LandDetails, LandUtilities, REQUIRED_COMPARABLES,
};
pub use document::{FileRef, FileRefError};
pub use shared::{ExperienceInfo, TitleInfo};
