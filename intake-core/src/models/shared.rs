use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CreditScoreRange;

/// Title company handling the closing. Collected for every deal type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TitleInfo {
    pub company_name: String,
    pub contact_person: String,
    pub phone: String,
    pub email: String,
}

/// Borrower track record. Collected for every deal type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceInfo {
    pub years_of_experience: Decimal,
    pub deals_completed: i32,
    pub credit_score_range: CreditScoreRange,
    pub has_defaulted: bool,
    /// Only meaningful when `has_defaulted` is set.
    pub default_explanation: String,
}
