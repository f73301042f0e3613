//! Net operating income and debt-service coverage for buy-and-hold deals.
//!
//! | Figure | Formula |
//! |--------|---------|
//! | NOI    | rent × 12 − operating expenses × 12 − property taxes − insurance − HOA × 12 |
//! | DSCR   | NOI ÷ (monthly payment × 12), or 0 when there is no payment |
//!
//! Rent, operating expenses, HOA fees and the debt payment are monthly;
//! property taxes and insurance are annual.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use intake_core::calculations::{CashFlowInputs, calculate_coverage};
//!
//! let result = calculate_coverage(&CashFlowInputs {
//!     monthly_rent: dec!(2000),
//!     monthly_operating_expenses: dec!(300),
//!     annual_property_taxes: dec!(1200),
//!     annual_insurance: dec!(600),
//!     monthly_hoa_fees: dec!(100),
//!     monthly_debt_payment: dec!(900),
//! });
//!
//! assert_eq!(result.net_operating_income, dec!(17400));
//! assert_eq!(result.debt_service_coverage_ratio.round_dp(3), dec!(1.611));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

fn months_per_year() -> Decimal {
    Decimal::from(12)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowInputs {
    pub monthly_rent: Decimal,
    pub monthly_operating_expenses: Decimal,
    pub annual_property_taxes: Decimal,
    pub annual_insurance: Decimal,
    pub monthly_hoa_fees: Decimal,
    pub monthly_debt_payment: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageResult {
    pub net_operating_income: Decimal,
    pub debt_service_coverage_ratio: Decimal,
}

/// Computes NOI first, then DSCR from that same NOI.
pub fn calculate_coverage(inputs: &CashFlowInputs) -> CoverageResult {
    let net_operating_income = net_operating_income(inputs);
    let debt_service_coverage_ratio =
        debt_service_coverage_ratio(net_operating_income, inputs.monthly_debt_payment);
    CoverageResult {
        net_operating_income,
        debt_service_coverage_ratio,
    }
}

fn net_operating_income(inputs: &CashFlowInputs) -> Decimal {
    let months = months_per_year();
    inputs.monthly_rent * months
        - inputs.monthly_operating_expenses * months
        - inputs.annual_property_taxes
        - inputs.annual_insurance
        - inputs.monthly_hoa_fees * months
}

fn debt_service_coverage_ratio(
    net_operating_income: Decimal,
    monthly_debt_payment: Decimal,
) -> Decimal {
    if monthly_debt_payment > Decimal::ZERO {
        net_operating_income / (monthly_debt_payment * months_per_year())
    } else {
        Decimal::ZERO
    }
}
