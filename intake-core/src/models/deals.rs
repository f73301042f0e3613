//! Deal-specific field sets, one struct per transaction type.
//!
//! [`DealDetails`] is the sum of the six. Field names on the wire (snapshot
//! `formData`, webhook payload, error keys) are the camelCase names used by
//! the intake form.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    ArvJustification, DealType, FileRef, FinancingStructure, LandZoning, RentalStrategy,
    RoadAccess,
};
use crate::calculations::{CashFlowInputs, CoverageResult, calculate_coverage};

/// Number of comparable sales required for a comparables-based ARV.
pub const REQUIRED_COMPARABLES: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Comparable {
    pub address: String,
    pub zillow_link: String,
    pub sold_price: Decimal,
    pub sold_date: String,
    pub square_footage: Decimal,
}

impl Comparable {
    /// True when every column is filled in with a plausible value.
    pub fn is_complete(&self) -> bool {
        !self.address.trim().is_empty()
            && url::Url::parse(self.zillow_link.trim()).is_ok()
            && self.sold_price > Decimal::ZERO
            && !self.sold_date.trim().is_empty()
            && self.square_footage > Decimal::ZERO
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DoubleCloseDetails {
    pub capital_requested: Decimal,
    pub escrow_company_name: String,
    pub escrow_company_contact: String,
    #[serde(rename = "contractAB")]
    pub contract_ab: Option<FileRef>,
    #[serde(rename = "contractBC")]
    pub contract_bc: Option<FileRef>,
    pub proof_of_funds: Option<FileRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmdDetails {
    pub emd_amount: Decimal,
    #[serde(rename = "proofOfEMD")]
    pub proof_of_emd: Option<FileRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FixFlipDetails {
    pub purchase_price: Decimal,
    pub down_payment: Decimal,
    pub loan_amount: Decimal,
    pub total_rehab_budget: Decimal,
    pub scope_of_work: Option<FileRef>,
    pub contractor_estimates: Option<FileRef>,
    pub arv_justification: Option<ArvJustification>,
    pub comparables: [Comparable; REQUIRED_COMPARABLES],
    /// Months.
    pub holding_period: u32,
    pub property_taxes: Decimal,
    pub insurance: Decimal,
    pub utilities: Decimal,
    pub other_costs: Decimal,
    pub financing_structure: Option<FinancingStructure>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuyHoldDetails {
    pub rental_strategy: Option<RentalStrategy>,
    pub is_subject_to: bool,
    pub current_lender_name: String,
    pub current_loan_balance: Decimal,
    pub current_monthly_payment: Decimal,
    pub current_interest_rate: Decimal,
    pub mortgage_statement: Option<FileRef>,
    pub estimated_monthly_rent: Decimal,
    /// Monthly.
    pub operating_expenses: Decimal,
    /// Annual.
    pub property_taxes: Decimal,
    /// Annual.
    pub insurance: Decimal,
    /// Monthly.
    pub hoa_fees: Decimal,
    pub financing_structure: Option<FinancingStructure>,
}

impl BuyHoldDetails {
    /// NOI and DSCR for the current inputs. Always computed fresh.
    pub fn coverage(&self) -> CoverageResult {
        calculate_coverage(&CashFlowInputs {
            monthly_rent: self.estimated_monthly_rent,
            monthly_operating_expenses: self.operating_expenses,
            annual_property_taxes: self.property_taxes,
            annual_insurance: self.insurance,
            monthly_hoa_fees: self.hoa_fees,
            monthly_debt_payment: self.current_monthly_payment,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GapFundingDetails {
    pub gap_amount: Decimal,
    pub has_primary_lender: bool,
    pub primary_lender_name: String,
    pub primary_lender_term_sheet: Option<FileRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandUtilities {
    pub water: bool,
    pub electric: bool,
    pub sewer: bool,
    pub septic: bool,
    pub none: bool,
    pub unknown: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LandDetails {
    pub apn: String,
    pub acreage: Decimal,
    pub zoning: Option<LandZoning>,
    pub zoning_other: String,
    pub road_access: Option<RoadAccess>,
    pub utilities: LandUtilities,
    pub number_of_parcels: u32,
    pub multi_parcel_spreadsheet: Option<FileRef>,
    pub financing_structure: Option<FinancingStructure>,
}

impl Default for LandDetails {
    fn default() -> Self {
        Self {
            apn: String::new(),
            acreage: Decimal::ZERO,
            zoning: None,
            zoning_other: String::new(),
            road_access: None,
            utilities: LandUtilities::default(),
            number_of_parcels: 1,
            multi_parcel_spreadsheet: None,
            financing_structure: None,
        }
    }
}

impl LandDetails {
    /// More than one parcel calls for the multi-parcel spreadsheet.
    pub fn is_multi_parcel(&self) -> bool {
        self.number_of_parcels > 1
    }
}

/// Deal-specific fields for whichever transaction type is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DealDetails {
    DoubleClose(DoubleCloseDetails),
    Emd(EmdDetails),
    FixFlip(FixFlipDetails),
    BuyHold(BuyHoldDetails),
    GapFunding(GapFundingDetails),
    Land(LandDetails),
}

impl DealDetails {
    /// Empty field set for a freshly selected deal type.
    pub fn new(deal_type: DealType) -> Self {
        match deal_type {
            DealType::DoubleClose => Self::DoubleClose(DoubleCloseDetails::default()),
            DealType::Emd => Self::Emd(EmdDetails::default()),
            DealType::FixFlip => Self::FixFlip(FixFlipDetails::default()),
            DealType::BuyHold => Self::BuyHold(BuyHoldDetails::default()),
            DealType::GapFunding => Self::GapFunding(GapFundingDetails::default()),
            DealType::Land => Self::Land(LandDetails::default()),
        }
    }

    pub fn deal_type(&self) -> DealType {
        match self {
            Self::DoubleClose(_) => DealType::DoubleClose,
            Self::Emd(_) => DealType::Emd,
            Self::FixFlip(_) => DealType::FixFlip,
            Self::BuyHold(_) => DealType::BuyHold,
            Self::GapFunding(_) => DealType::GapFunding,
            Self::Land(_) => DealType::Land,
        }
    }

    /// Names of the fields holding documents for this deal type.
    pub fn file_fields(&self) -> &'static [&'static str] {
        match self {
            Self::DoubleClose(_) => &["contractAB", "contractBC", "proofOfFunds"],
            Self::Emd(_) => &["proofOfEMD"],
            Self::FixFlip(_) => &["scopeOfWork", "contractorEstimates"],
            Self::BuyHold(_) => &["mortgageStatement"],
            Self::GapFunding(_) => &["primaryLenderTermSheet"],
            Self::Land(_) => &["multiParcelSpreadsheet"],
        }
    }

    /// Every attached document, keyed by field name.
    pub fn files(&self) -> Vec<(&'static str, &FileRef)> {
        let slots: Vec<(&'static str, Option<&FileRef>)> = match self {
            Self::DoubleClose(d) => vec![
                ("contractAB", d.contract_ab.as_ref()),
                ("contractBC", d.contract_bc.as_ref()),
                ("proofOfFunds", d.proof_of_funds.as_ref()),
            ],
            Self::Emd(d) => vec![("proofOfEMD", d.proof_of_emd.as_ref())],
            Self::FixFlip(d) => vec![
                ("scopeOfWork", d.scope_of_work.as_ref()),
                ("contractorEstimates", d.contractor_estimates.as_ref()),
            ],
            Self::BuyHold(d) => vec![("mortgageStatement", d.mortgage_statement.as_ref())],
            Self::GapFunding(d) => {
                vec![("primaryLenderTermSheet", d.primary_lender_term_sheet.as_ref())]
            }
            Self::Land(d) => vec![(
                "multiParcelSpreadsheet",
                d.multi_parcel_spreadsheet.as_ref(),
            )],
        };

        slots
            .into_iter()
            .filter_map(|(field, file)| file.map(|f| (field, f)))
            .collect()
    }

    /// Serializes the active variant into the `formData` object.
    pub fn to_form_data(&self) -> Result<Value, serde_json::Error> {
        match self {
            Self::DoubleClose(d) => serde_json::to_value(d),
            Self::Emd(d) => serde_json::to_value(d),
            Self::FixFlip(d) => serde_json::to_value(d),
            Self::BuyHold(d) => serde_json::to_value(d),
            Self::GapFunding(d) => serde_json::to_value(d),
            Self::Land(d) => serde_json::to_value(d),
        }
    }

    /// Rebuilds the variant for `deal_type` from a `formData` object.
    pub fn from_form_data(
        deal_type: DealType,
        form_data: Value,
    ) -> Result<Self, serde_json::Error> {
        Ok(match deal_type {
            DealType::DoubleClose => Self::DoubleClose(serde_json::from_value(form_data)?),
            DealType::Emd => Self::Emd(serde_json::from_value(form_data)?),
            DealType::FixFlip => Self::FixFlip(serde_json::from_value(form_data)?),
            DealType::BuyHold => Self::BuyHold(serde_json::from_value(form_data)?),
            DealType::GapFunding => Self::GapFunding(serde_json::from_value(form_data)?),
            DealType::Land => Self::Land(serde_json::from_value(form_data)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    fn complete_comparable() -> Comparable {
        Comparable {
            address: "12 Elm St".to_string(),
            zillow_link: "https://www.zillow.com/homedetails/12-elm".to_string(),
            sold_price: dec!(310000),
            sold_date: "2024-03-01".to_string(),
            square_footage: dec!(1450),
        }
    }

    #[test]
    fn comparable_requires_every_column() {
        assert!(complete_comparable().is_complete());

        let no_link = Comparable {
            zillow_link: "not a url".to_string(),
            ..complete_comparable()
        };
        assert!(!no_link.is_complete());

        let no_price = Comparable {
            sold_price: Decimal::ZERO,
            ..complete_comparable()
        };
        assert!(!no_price.is_complete());

        let no_date = Comparable {
            sold_date: "  ".to_string(),
            ..complete_comparable()
        };
        assert!(!no_date.is_complete());
    }

    #[test]
    fn new_matches_deal_type() {
        for deal_type in DealType::ALL {
            assert_eq!(DealDetails::new(deal_type).deal_type(), deal_type);
        }
    }

    #[test]
    fn land_defaults_to_single_parcel() {
        let land = LandDetails::default();
        assert_eq!(land.number_of_parcels, 1);
        assert!(!land.is_multi_parcel());
    }

    #[test]
    fn files_lists_only_attached_documents() {
        let details = DealDetails::DoubleClose(DoubleCloseDetails {
            contract_ab: Some(FileRef::new("ab.pdf", 10, "/tmp/ab.pdf")),
            proof_of_funds: Some(FileRef::new("pof.pdf", 20, "/tmp/pof.pdf")),
            ..Default::default()
        });

        let names: Vec<_> = details.files().into_iter().map(|(field, _)| field).collect();

        assert_eq!(names, vec!["contractAB", "proofOfFunds"]);
    }

    #[test]
    fn form_data_uses_original_field_names() {
        let details = DealDetails::Emd(EmdDetails {
            emd_amount: dec!(5000),
            proof_of_emd: None,
        });

        let value = details.to_form_data().unwrap();

        assert_eq!(value, json!({ "emdAmount": 5000.0, "proofOfEMD": null }));
    }

    #[test]
    fn form_data_restores_the_same_variant() {
        let original = DealDetails::GapFunding(GapFundingDetails {
            gap_amount: dec!(42000.50),
            has_primary_lender: true,
            primary_lender_name: "First Lending".to_string(),
            primary_lender_term_sheet: None,
        });

        let value = original.to_form_data().unwrap();
        let restored = DealDetails::from_form_data(DealType::GapFunding, value).unwrap();

        assert_eq!(restored, original);
    }

    #[test]
    fn form_data_tolerates_missing_fields() {
        let restored =
            DealDetails::from_form_data(DealType::Land, json!({ "apn": "123-45-678" })).unwrap();

        match restored {
            DealDetails::Land(land) => {
                assert_eq!(land.apn, "123-45-678");
                assert_eq!(land.number_of_parcels, 1);
            }
            other => panic!("expected land details, got {other:?}"),
        }
    }
}
