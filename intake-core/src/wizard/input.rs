//! Routing of raw field edits onto the typed form model.
//!
//! Field names are the wire names (`purchasePrice`, `companyName`, ...).
//! Nested fields use a path: `comparables[0].soldPrice`, `utilities.water`.
//! Comparable indices are zero-based.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::calculations::{parse_currency_input, parse_number};
use crate::models::{
    ArvJustification, BuyHoldDetails, Comparable, CreditScoreRange, DealDetails, DealType,
    DoubleCloseDetails, EmdDetails, ExperienceInfo, FileRef, FileRefError, FinancingStructure,
    FixFlipDetails, GapFundingDetails, LandDetails, LandZoning, REQUIRED_COMPARABLES,
    RentalStrategy, RoadAccess, TitleInfo,
};

/// Fields computed from other inputs. They appear in output but cannot be set.
pub const DERIVED_FIELDS: &[&str] = &["calculatedNOI", "calculatedDSCR"];

/// Fields of [`TitleInfo`] and [`ExperienceInfo`], settable regardless of deal type.
pub const SHARED_FIELDS: &[&str] = &[
    "companyName",
    "contactPerson",
    "phone",
    "email",
    "yearsOfExperience",
    "dealsCompleted",
    "creditScoreRange",
    "hasDefaulted",
    "defaultExplanation",
];

/// Money fields across all deal types. Comparable sale prices appear under
/// their column name.
pub const CURRENCY_FIELDS: &[&str] = &[
    "capitalRequested",
    "emdAmount",
    "purchasePrice",
    "downPayment",
    "loanAmount",
    "totalRehabBudget",
    "propertyTaxes",
    "insurance",
    "utilities",
    "otherCosts",
    "soldPrice",
    "currentLoanBalance",
    "currentMonthlyPayment",
    "estimatedMonthlyRent",
    "operatingExpenses",
    "hoaFees",
    "gapAmount",
];

/// Whether the last segment of `field` names a money field, so
/// `comparables[0].soldPrice` counts. Land's `utilities` flags are toggles
/// and do not.
pub fn is_currency_field(field: &str) -> bool {
    if field.starts_with("utilities.") {
        return false;
    }
    let leaf = field.rsplit('.').next().unwrap_or(field);
    CURRENCY_FIELDS.contains(&leaf)
}

/// A single edit as it arrives from the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    /// Raw keystrokes. Numeric fields are parsed from this.
    Text(String),
    Toggle(bool),
    /// `None` detaches the current document.
    File(Option<FileRef>),
}

impl FieldInput {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Toggle(_) => "toggle",
            Self::File(_) => "file",
        }
    }
}

#[derive(Debug, Error)]
pub enum FieldInputError {
    #[error("'{field}' is not a field of {deal_type} deals")]
    UnknownField { field: String, deal_type: DealType },

    #[error("select a transaction type before editing '{field}'")]
    NoDealType { field: String },

    #[error("'{value}' is not a valid number for '{field}'")]
    InvalidNumber { field: String, value: String },

    #[error("'{value}' is not a valid option for '{field}' (expected one of: {options})")]
    InvalidChoice {
        field: String,
        value: String,
        options: String,
    },

    #[error("'{field}' takes a {expected} value, got {actual}")]
    WrongKind {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("'{field}' is calculated and cannot be edited")]
    ReadOnly { field: String },

    #[error("comparable index {index} is out of range (0-{})", REQUIRED_COMPARABLES - 1)]
    ComparableIndex { index: usize },

    #[error("malformed field path '{field}'")]
    MalformedPath { field: String },

    #[error("the application has already been submitted")]
    Locked,

    #[error(transparent)]
    File(#[from] FileRefError),
}

/// Key under which errors for `field` are stored. Nested edits map to their
/// top-level field, so `comparables[1].address` clears `comparables`.
pub(crate) fn error_key(field: &str) -> &str {
    field.split(['[', '.']).next().unwrap_or(field)
}

pub(crate) fn is_shared_field(field: &str) -> bool {
    SHARED_FIELDS.contains(&field)
}

// =============================================================================
// value conversions
// =============================================================================

fn wrong_kind(
    field: &str,
    expected: &'static str,
    input: &FieldInput,
) -> FieldInputError {
    FieldInputError::WrongKind {
        field: field.to_string(),
        expected,
        actual: input.kind(),
    }
}

fn text(
    field: &str,
    input: FieldInput,
) -> Result<String, FieldInputError> {
    match input {
        FieldInput::Text(value) => Ok(value),
        other => Err(wrong_kind(field, "text", &other)),
    }
}

/// Currency keystroke rule. Text without digits stores zero.
fn currency(
    field: &str,
    input: FieldInput,
) -> Result<Decimal, FieldInputError> {
    let raw = text(field, input)?;
    if raw.chars().any(|c| c.is_ascii_digit()) {
        parse_currency_input(&raw).ok_or(FieldInputError::InvalidNumber {
            field: field.to_string(),
            value: raw,
        })
    } else {
        Ok(Decimal::ZERO)
    }
}

fn number(
    field: &str,
    input: FieldInput,
) -> Result<Decimal, FieldInputError> {
    let raw = text(field, input)?;
    parse_number(&raw).map_err(|_| FieldInputError::InvalidNumber {
        field: field.to_string(),
        value: raw,
    })
}

/// Whole numbers. Empty text yields `empty`.
fn integer<T: FromStr>(
    field: &str,
    input: FieldInput,
    empty: T,
) -> Result<T, FieldInputError> {
    let raw = text(field, input)?;
    let trimmed = raw.trim().replace(',', "");
    if trimmed.is_empty() {
        return Ok(empty);
    }
    trimmed.parse().map_err(|_| FieldInputError::InvalidNumber {
        field: field.to_string(),
        value: raw,
    })
}

fn toggle(
    field: &str,
    input: FieldInput,
) -> Result<bool, FieldInputError> {
    match input {
        FieldInput::Toggle(value) => Ok(value),
        FieldInput::Text(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" | "on" => Ok(true),
            "false" | "no" | "n" | "0" | "off" | "" => Ok(false),
            _ => Err(FieldInputError::InvalidChoice {
                field: field.to_string(),
                value: raw,
                options: "true, false".to_string(),
            }),
        },
        other => Err(wrong_kind(field, "toggle", &other)),
    }
}

/// Select inputs. Empty text clears the selection.
fn choice<T>(
    field: &str,
    input: FieldInput,
    parse: fn(&str) -> Option<T>,
    options: fn() -> String,
) -> Result<Option<T>, FieldInputError> {
    let raw = text(field, input)?;
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }
    parse(value)
        .map(Some)
        .ok_or_else(|| FieldInputError::InvalidChoice {
            field: field.to_string(),
            value: raw.clone(),
            options: options(),
        })
}

fn file(
    field: &str,
    input: FieldInput,
) -> Result<Option<FileRef>, FieldInputError> {
    match input {
        FieldInput::File(file) => Ok(file),
        other => Err(wrong_kind(field, "file", &other)),
    }
}

// =============================================================================
// shared fields
// =============================================================================

pub(crate) fn apply_shared(
    title: &mut TitleInfo,
    experience: &mut ExperienceInfo,
    field: &str,
    input: FieldInput,
) -> Result<(), FieldInputError> {
    match field {
        "companyName" => title.company_name = text(field, input)?,
        "contactPerson" => title.contact_person = text(field, input)?,
        "phone" => title.phone = text(field, input)?,
        "email" => title.email = text(field, input)?,
        "yearsOfExperience" => experience.years_of_experience = number(field, input)?,
        "dealsCompleted" => experience.deals_completed = integer(field, input, 0)?,
        "creditScoreRange" => {
            experience.credit_score_range = choice(
                field,
                input,
                CreditScoreRange::parse,
                CreditScoreRange::options,
            )?
            .unwrap_or_default()
        }
        "hasDefaulted" => experience.has_defaulted = toggle(field, input)?,
        "defaultExplanation" => experience.default_explanation = text(field, input)?,
        _ => {
            return Err(FieldInputError::MalformedPath {
                field: field.to_string(),
            });
        }
    }
    Ok(())
}

// =============================================================================
// deal fields
// =============================================================================

pub(crate) fn apply_deal(
    deal: &mut DealDetails,
    field: &str,
    input: FieldInput,
) -> Result<(), FieldInputError> {
    let deal_type = deal.deal_type();
    let handled = match deal {
        DealDetails::DoubleClose(d) => double_close(d, field, input)?,
        DealDetails::Emd(d) => emd(d, field, input)?,
        DealDetails::FixFlip(d) => fix_flip(d, field, input)?,
        DealDetails::BuyHold(d) => buy_hold(d, field, input)?,
        DealDetails::GapFunding(d) => gap_funding(d, field, input)?,
        DealDetails::Land(d) => land(d, field, input)?,
    };
    if handled {
        Ok(())
    } else {
        Err(FieldInputError::UnknownField {
            field: field.to_string(),
            deal_type,
        })
    }
}

fn double_close(
    d: &mut DoubleCloseDetails,
    field: &str,
    input: FieldInput,
) -> Result<bool, FieldInputError> {
    match field {
        "capitalRequested" => d.capital_requested = currency(field, input)?,
        "escrowCompanyName" => d.escrow_company_name = text(field, input)?,
        "escrowCompanyContact" => d.escrow_company_contact = text(field, input)?,
        "contractAB" => d.contract_ab = file(field, input)?,
        "contractBC" => d.contract_bc = file(field, input)?,
        "proofOfFunds" => d.proof_of_funds = file(field, input)?,
        _ => return Ok(false),
    }
    Ok(true)
}

fn emd(
    d: &mut EmdDetails,
    field: &str,
    input: FieldInput,
) -> Result<bool, FieldInputError> {
    match field {
        "emdAmount" => d.emd_amount = currency(field, input)?,
        "proofOfEMD" => d.proof_of_emd = file(field, input)?,
        _ => return Ok(false),
    }
    Ok(true)
}

fn fix_flip(
    d: &mut FixFlipDetails,
    field: &str,
    input: FieldInput,
) -> Result<bool, FieldInputError> {
    if field.starts_with("comparables[") {
        let (index, column) = parse_comparable_path(field)?;
        return comparable(&mut d.comparables[index], field, column, input);
    }

    match field {
        "purchasePrice" => d.purchase_price = currency(field, input)?,
        "downPayment" => d.down_payment = currency(field, input)?,
        "loanAmount" => d.loan_amount = currency(field, input)?,
        "totalRehabBudget" => d.total_rehab_budget = currency(field, input)?,
        "scopeOfWork" => d.scope_of_work = file(field, input)?,
        "contractorEstimates" => d.contractor_estimates = file(field, input)?,
        "arvJustification" => {
            d.arv_justification = choice(
                field,
                input,
                ArvJustification::parse,
                ArvJustification::options,
            )?
        }
        "holdingPeriod" => d.holding_period = integer(field, input, 0)?,
        "propertyTaxes" => d.property_taxes = currency(field, input)?,
        "insurance" => d.insurance = currency(field, input)?,
        "utilities" => d.utilities = currency(field, input)?,
        "otherCosts" => d.other_costs = currency(field, input)?,
        "financingStructure" => d.financing_structure = financing(field, input)?,
        _ => return Ok(false),
    }
    Ok(true)
}

/// Splits `comparables[N].column` into a checked index and the column name.
fn parse_comparable_path(field: &str) -> Result<(usize, &str), FieldInputError> {
    let malformed = || FieldInputError::MalformedPath {
        field: field.to_string(),
    };
    let rest = field.strip_prefix("comparables[").ok_or_else(malformed)?;
    let (index, column) = rest.split_once("].").ok_or_else(malformed)?;
    let index: usize = index.parse().map_err(|_| malformed())?;
    if index >= REQUIRED_COMPARABLES {
        return Err(FieldInputError::ComparableIndex { index });
    }
    Ok((index, column))
}

fn comparable(
    c: &mut Comparable,
    field: &str,
    column: &str,
    input: FieldInput,
) -> Result<bool, FieldInputError> {
    match column {
        "address" => c.address = text(field, input)?,
        "zillowLink" => c.zillow_link = text(field, input)?,
        "soldPrice" => c.sold_price = currency(field, input)?,
        "soldDate" => c.sold_date = text(field, input)?,
        "squareFootage" => c.square_footage = number(field, input)?,
        _ => return Ok(false),
    }
    Ok(true)
}

fn buy_hold(
    d: &mut BuyHoldDetails,
    field: &str,
    input: FieldInput,
) -> Result<bool, FieldInputError> {
    match field {
        "rentalStrategy" => {
            d.rental_strategy =
                choice(field, input, RentalStrategy::parse, RentalStrategy::options)?
        }
        "isSubjectTo" => d.is_subject_to = toggle(field, input)?,
        "currentLenderName" => d.current_lender_name = text(field, input)?,
        "currentLoanBalance" => d.current_loan_balance = currency(field, input)?,
        "currentMonthlyPayment" => d.current_monthly_payment = currency(field, input)?,
        "currentInterestRate" => d.current_interest_rate = number(field, input)?,
        "mortgageStatement" => d.mortgage_statement = file(field, input)?,
        "estimatedMonthlyRent" => d.estimated_monthly_rent = currency(field, input)?,
        "operatingExpenses" => d.operating_expenses = currency(field, input)?,
        "propertyTaxes" => d.property_taxes = currency(field, input)?,
        "insurance" => d.insurance = currency(field, input)?,
        "hoaFees" => d.hoa_fees = currency(field, input)?,
        "financingStructure" => d.financing_structure = financing(field, input)?,
        _ => return Ok(false),
    }
    Ok(true)
}

fn gap_funding(
    d: &mut GapFundingDetails,
    field: &str,
    input: FieldInput,
) -> Result<bool, FieldInputError> {
    match field {
        "gapAmount" => d.gap_amount = currency(field, input)?,
        "hasPrimaryLender" => d.has_primary_lender = toggle(field, input)?,
        "primaryLenderName" => d.primary_lender_name = text(field, input)?,
        "primaryLenderTermSheet" => d.primary_lender_term_sheet = file(field, input)?,
        _ => return Ok(false),
    }
    Ok(true)
}

fn land(
    d: &mut LandDetails,
    field: &str,
    input: FieldInput,
) -> Result<bool, FieldInputError> {
    if let Some(flag) = field.strip_prefix("utilities.") {
        let slot = match flag {
            "water" => &mut d.utilities.water,
            "electric" => &mut d.utilities.electric,
            "sewer" => &mut d.utilities.sewer,
            "septic" => &mut d.utilities.septic,
            "none" => &mut d.utilities.none,
            "unknown" => &mut d.utilities.unknown,
            _ => return Ok(false),
        };
        *slot = toggle(field, input)?;
        return Ok(true);
    }

    match field {
        "apn" => d.apn = text(field, input)?,
        "acreage" => d.acreage = number(field, input)?,
        "zoning" => d.zoning = choice(field, input, LandZoning::parse, LandZoning::options)?,
        "zoningOther" => d.zoning_other = text(field, input)?,
        "roadAccess" => {
            d.road_access = choice(field, input, RoadAccess::parse, RoadAccess::options)?
        }
        "numberOfParcels" => d.number_of_parcels = integer::<u32>(field, input, 1)?.max(1),
        "multiParcelSpreadsheet" => d.multi_parcel_spreadsheet = file(field, input)?,
        "financingStructure" => d.financing_structure = financing(field, input)?,
        _ => return Ok(false),
    }
    Ok(true)
}

fn financing(
    field: &str,
    input: FieldInput,
) -> Result<Option<FinancingStructure>, FieldInputError> {
    choice(
        field,
        input,
        FinancingStructure::parse,
        FinancingStructure::options,
    )
}
