//! Step 2 rules, one schema per deal type.
//!
//! | Deal type     | Required                                                         | Conditional                                  |
//! |---------------|------------------------------------------------------------------|----------------------------------------------|
//! | double close  | capitalRequested > 0, contractAB attached                        |                                              |
//! | EMD           | emdAmount > 0                                                    |                                              |
//! | fix and flip  | purchase, down payment, loan, rehab > 0; ARV basis; financing    | comparables basis needs 3 complete entries   |
//! | buy and hold  | rental strategy, estimatedMonthlyRent > 0, financing             | subject-to needs all four lender fields      |
//! | gap funding   | gapAmount > 0                                                    | primary lender needs a name                  |
//! | land          | apn, acreage > 0, zoning, financing                              |                                              |

use rust_decimal::Decimal;

use super::{COMPARABLES_REQUIRED, FILE_REQUIRED, FieldErrors, REQUIRED_FIELD, SUBJECT_TO_REQUIRED};
use crate::models::{
    ArvJustification, BuyHoldDetails, DealDetails, DoubleCloseDetails, EmdDetails, FixFlipDetails,
    GapFundingDetails, LandDetails,
};

/// Checks the active deal variant and returns every violation found.
pub fn validate_deal(details: &DealDetails) -> FieldErrors {
    let mut errors = FieldErrors::new();
    match details {
        DealDetails::DoubleClose(d) => double_close(d, &mut errors),
        DealDetails::Emd(d) => emd(d, &mut errors),
        DealDetails::FixFlip(d) => fix_flip(d, &mut errors),
        DealDetails::BuyHold(d) => buy_hold(d, &mut errors),
        DealDetails::GapFunding(d) => gap_funding(d, &mut errors),
        DealDetails::Land(d) => land(d, &mut errors),
    }
    errors
}

fn require_positive(
    errors: &mut FieldErrors,
    field: &str,
    value: Decimal,
) {
    if value <= Decimal::ZERO {
        errors.insert(field, REQUIRED_FIELD);
    }
}

fn require_set<T>(
    errors: &mut FieldErrors,
    field: &str,
    value: &Option<T>,
) {
    if value.is_none() {
        errors.insert(field, REQUIRED_FIELD);
    }
}

fn double_close(
    d: &DoubleCloseDetails,
    errors: &mut FieldErrors,
) {
    require_positive(errors, "capitalRequested", d.capital_requested);
    if d.contract_ab.is_none() {
        errors.insert("contractAB", FILE_REQUIRED);
    }
}

fn emd(
    d: &EmdDetails,
    errors: &mut FieldErrors,
) {
    require_positive(errors, "emdAmount", d.emd_amount);
}

fn fix_flip(
    d: &FixFlipDetails,
    errors: &mut FieldErrors,
) {
    require_positive(errors, "purchasePrice", d.purchase_price);
    require_positive(errors, "downPayment", d.down_payment);
    require_positive(errors, "loanAmount", d.loan_amount);
    require_positive(errors, "totalRehabBudget", d.total_rehab_budget);
    require_set(errors, "arvJustification", &d.arv_justification);
    require_set(errors, "financingStructure", &d.financing_structure);

    if d.arv_justification == Some(ArvJustification::Comparables)
        && !d.comparables.iter().all(|c| c.is_complete())
    {
        errors.insert("comparables", COMPARABLES_REQUIRED);
    }
}

fn buy_hold(
    d: &BuyHoldDetails,
    errors: &mut FieldErrors,
) {
    require_set(errors, "rentalStrategy", &d.rental_strategy);
    require_positive(errors, "estimatedMonthlyRent", d.estimated_monthly_rent);
    require_set(errors, "financingStructure", &d.financing_structure);

    if d.is_subject_to {
        if d.current_lender_name.trim().is_empty() {
            errors.insert("currentLenderName", SUBJECT_TO_REQUIRED);
        }
        for (field, value) in [
            ("currentLoanBalance", d.current_loan_balance),
            ("currentMonthlyPayment", d.current_monthly_payment),
            ("currentInterestRate", d.current_interest_rate),
        ] {
            if value <= Decimal::ZERO {
                errors.insert(field, SUBJECT_TO_REQUIRED);
            }
        }
    }
}

fn gap_funding(
    d: &GapFundingDetails,
    errors: &mut FieldErrors,
) {
    require_positive(errors, "gapAmount", d.gap_amount);
    if d.has_primary_lender && d.primary_lender_name.trim().is_empty() {
        errors.insert("primaryLenderName", REQUIRED_FIELD);
    }
}

fn land(
    d: &LandDetails,
    errors: &mut FieldErrors,
) {
    if d.apn.trim().is_empty() {
        errors.insert("apn", REQUIRED_FIELD);
    }
    require_positive(errors, "acreage", d.acreage);
    require_set(errors, "zoning", &d.zoning);
    require_set(errors, "financingStructure", &d.financing_structure);
}
