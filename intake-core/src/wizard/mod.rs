//! The four-step form state machine.
//!
//! ```text
//! DealSelect(1) -> DealDetails(2) -> TitleInfo(3) -> Experience(4) -> Submitted
//! ```
//!
//! `next` validates the step being left; `back` never validates. Deal type is
//! chosen on step 1 and locked afterwards. `Submitted` is only reachable
//! through [`FormState::mark_submitted`], which the session calls once the
//! submission pipeline succeeds.

mod input;

use std::fmt;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

pub use input::{
    CURRENCY_FIELDS, DERIVED_FIELDS, FieldInput, FieldInputError, SHARED_FIELDS, is_currency_field,
};

use crate::calculations::CoverageResult;
use crate::models::document::accepted_extensions;
use crate::models::{DealDetails, DealType, ExperienceInfo, FileRef, TitleInfo};
use crate::validation::{FieldErrors, validate_deal, validate_experience, validate_title};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Step {
    #[default]
    DealSelect,
    DealDetails,
    TitleInfo,
    Experience,
    Submitted,
}

impl Step {
    /// 1-based position; `Submitted` is 5.
    pub fn number(&self) -> u8 {
        match self {
            Self::DealSelect => 1,
            Self::DealDetails => 2,
            Self::TitleInfo => 3,
            Self::Experience => 4,
            Self::Submitted => 5,
        }
    }

    /// Inverse of [`Step::number`] for the editable steps 1-4.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::DealSelect),
            2 => Some(Self::DealDetails),
            3 => Some(Self::TitleInfo),
            4 => Some(Self::Experience),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::DealSelect => "Transaction Type",
            Self::DealDetails => "Deal Details",
            Self::TitleInfo => "Title Company",
            Self::Experience => "Experience",
            Self::Submitted => "Submitted",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::DealSelect => Self::DealDetails,
            Self::DealDetails => Self::TitleInfo,
            Self::TitleInfo => Self::Experience,
            Self::Experience | Self::Submitted => Self::Submitted,
        }
    }

    fn previous(self) -> Self {
        match self {
            Self::DealSelect | Self::DealDetails => Self::DealSelect,
            Self::TitleInfo => Self::DealDetails,
            Self::Experience => Self::TitleInfo,
            Self::Submitted => Self::Submitted,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Submitted => f.write_str(self.label()),
            _ => write!(f, "Step {} of 4: {}", self.number(), self.label()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    #[error("Please select a transaction type")]
    NoDealType,

    #[error("please correct the following fields:\n{0}")]
    Invalid(FieldErrors),

    #[error("this is the last step; submit the application instead")]
    FinalStep,

    #[error("the application can only be submitted from step 4 (currently on step {0})")]
    NotAtFinalStep(u8),

    #[error("the application has already been submitted")]
    AlreadySubmitted,

    #[error("the transaction type can only be changed on step 1")]
    DealTypeLocked,
}

/// Aggregate root of one application in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    step: Step,
    deal: Option<DealDetails>,
    title: TitleInfo,
    experience: ExperienceInfo,
    errors: FieldErrors,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a state from persisted parts. Errors start empty.
    pub fn from_parts(
        step: Step,
        deal: DealDetails,
        title: TitleInfo,
        experience: ExperienceInfo,
    ) -> Self {
        Self {
            step,
            deal: Some(deal),
            title,
            experience,
            errors: FieldErrors::new(),
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn deal_type(&self) -> Option<DealType> {
        self.deal.as_ref().map(DealDetails::deal_type)
    }

    pub fn deal(&self) -> Option<&DealDetails> {
        self.deal.as_ref()
    }

    pub fn title(&self) -> &TitleInfo {
        &self.title
    }

    pub fn experience(&self) -> &ExperienceInfo {
        &self.experience
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_submitted(&self) -> bool {
        self.step == Step::Submitted
    }

    /// NOI and DSCR, present only for buy-and-hold deals.
    pub fn coverage(&self) -> Option<CoverageResult> {
        match &self.deal {
            Some(DealDetails::BuyHold(details)) => Some(details.coverage()),
            _ => None,
        }
    }

    /// Chooses the transaction type. Picking a different type starts its
    /// fields from scratch; picking the current one keeps them.
    pub fn select_deal_type(
        &mut self,
        deal_type: DealType,
    ) -> Result<(), StepError> {
        match self.step {
            Step::DealSelect => {}
            Step::Submitted => return Err(StepError::AlreadySubmitted),
            _ => return Err(StepError::DealTypeLocked),
        }
        if self.deal_type() != Some(deal_type) {
            debug!(%deal_type, "deal type selected");
            self.deal = Some(DealDetails::new(deal_type));
        }
        Ok(())
    }

    /// Applies one edit and clears that field's error.
    pub fn set_field(
        &mut self,
        field: &str,
        value: FieldInput,
    ) -> Result<(), FieldInputError> {
        if self.is_submitted() {
            return Err(FieldInputError::Locked);
        }
        if DERIVED_FIELDS.contains(&field) {
            return Err(FieldInputError::ReadOnly {
                field: field.to_string(),
            });
        }

        if input::is_shared_field(field) {
            input::apply_shared(&mut self.title, &mut self.experience, field, value)?;
        } else {
            let deal = self.deal.as_mut().ok_or_else(|| FieldInputError::NoDealType {
                field: field.to_string(),
            })?;
            input::apply_deal(deal, field, value)?;
        }

        self.errors.remove(input::error_key(field));
        debug!(field, "field updated");
        Ok(())
    }

    /// Attaches a document from disk, checking size and type for the field.
    pub fn attach_file(
        &mut self,
        field: &str,
        path: &Path,
    ) -> Result<(), FieldInputError> {
        let file = FileRef::from_path(path, accepted_extensions(field))?;
        self.set_field(field, FieldInput::File(Some(file)))
    }

    pub fn detach_file(
        &mut self,
        field: &str,
    ) -> Result<(), FieldInputError> {
        self.set_field(field, FieldInput::File(None))
    }

    /// Validates the current step and advances on success.
    ///
    /// A missing deal type on step 1 leaves `errors` untouched. Steps 2 and 3
    /// replace `errors` with the result of their schema.
    pub fn next(&mut self) -> Result<Step, StepError> {
        match self.step {
            Step::Submitted => return Err(StepError::AlreadySubmitted),
            Step::Experience => return Err(StepError::FinalStep),
            Step::DealSelect if self.deal.is_none() => return Err(StepError::NoDealType),
            _ => {}
        }

        let errors = self.validate_step(self.step);
        self.errors = errors.clone();
        if !errors.is_empty() {
            debug!(step = self.step.number(), count = errors.len(), "step blocked");
            return Err(StepError::Invalid(errors));
        }

        let from = self.step;
        self.step = from.next();
        debug!(from = from.number(), to = self.step.number(), "step advanced");
        Ok(self.step)
    }

    /// Moves back one step without validating. Stays put on step 1.
    pub fn back(&mut self) -> Result<Step, StepError> {
        if self.is_submitted() {
            return Err(StepError::AlreadySubmitted);
        }
        let from = self.step;
        self.step = from.previous();
        debug!(from = from.number(), to = self.step.number(), "step back");
        Ok(self.step)
    }

    /// Gate in front of the submission pipeline: step 4 must validate.
    pub fn validate_for_submit(&mut self) -> Result<(), StepError> {
        match self.step {
            Step::Experience => {}
            Step::Submitted => return Err(StepError::AlreadySubmitted),
            other => return Err(StepError::NotAtFinalStep(other.number())),
        }
        self.errors = self.validate_step(Step::Experience);
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(StepError::Invalid(self.errors.clone()))
        }
    }

    pub fn mark_submitted(&mut self) {
        self.step = Step::Submitted;
        self.errors = FieldErrors::new();
    }

    /// Back to an empty step 1.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn validate_step(
        &self,
        step: Step,
    ) -> FieldErrors {
        match step {
            Step::DealDetails => self.deal.as_ref().map(validate_deal).unwrap_or_default(),
            Step::TitleInfo => validate_title(&self.title),
            Step::Experience => validate_experience(&self.experience),
            Step::DealSelect | Step::Submitted => FieldErrors::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::validation::{INVALID_EMAIL, REQUIRED_FIELD};

    fn text(value: &str) -> FieldInput {
        FieldInput::text(value)
    }

    fn emd_state() -> FormState {
        let mut state = FormState::new();
        state.select_deal_type(DealType::Emd).unwrap();
        state
    }

    fn fill_title(state: &mut FormState) {
        state.set_field("companyName", text("Acme Title")).unwrap();
        state.set_field("contactPerson", text("Jordan Lee")).unwrap();
        state.set_field("phone", text("555-010-2030")).unwrap();
        state.set_field("email", text("closing@acme.com")).unwrap();
    }

    // =========================================================================
    // step numbering
    // =========================================================================

    #[test]
    fn step_numbers_round_trip_for_editable_steps() {
        for n in 1..=4 {
            assert_eq!(Step::from_number(n).unwrap().number(), n);
        }
        assert_eq!(Step::from_number(0), None);
        assert_eq!(Step::from_number(5), None);
    }

    #[test]
    fn step_display_shows_position() {
        assert_eq!(Step::TitleInfo.to_string(), "Step 3 of 4: Title Company");
        assert_eq!(Step::Submitted.to_string(), "Submitted");
    }

    // =========================================================================
    // step 1
    // =========================================================================

    #[test]
    fn next_without_deal_type_keeps_errors() {
        let mut state = FormState::new();
        state.errors.insert("leftover", REQUIRED_FIELD);

        let err = state.next().unwrap_err();

        assert_eq!(err, StepError::NoDealType);
        assert_eq!(err.to_string(), "Please select a transaction type");
        assert_eq!(state.step(), Step::DealSelect);
        assert!(state.errors().contains("leftover"));
    }

    #[test]
    fn next_with_deal_type_clears_errors() {
        let mut state = emd_state();
        state.errors.insert("leftover", REQUIRED_FIELD);

        assert_eq!(state.next().unwrap(), Step::DealDetails);
        assert!(state.errors().is_empty());
    }

    #[test]
    fn reselecting_same_type_keeps_fields() {
        let mut state = emd_state();
        state.set_field("emdAmount", text("500000")).unwrap();

        state.select_deal_type(DealType::Emd).unwrap();

        let Some(DealDetails::Emd(emd)) = state.deal() else {
            panic!("expected emd details");
        };
        assert_eq!(emd.emd_amount, dec!(5000));
    }

    #[test]
    fn selecting_other_type_resets_fields() {
        let mut state = emd_state();
        state.set_field("emdAmount", text("500000")).unwrap();

        state.select_deal_type(DealType::Land).unwrap();

        assert_eq!(state.deal(), Some(&DealDetails::new(DealType::Land)));
    }

    #[test]
    fn deal_type_is_locked_after_step_one() {
        let mut state = emd_state();
        state.next().unwrap();

        let err = state.select_deal_type(DealType::Land).unwrap_err();

        assert_eq!(err, StepError::DealTypeLocked);
        assert_eq!(state.deal_type(), Some(DealType::Emd));
    }

    #[test]
    fn deal_fields_need_a_deal_type() {
        let mut state = FormState::new();

        let err = state.set_field("emdAmount", text("100")).unwrap_err();

        assert!(matches!(err, FieldInputError::NoDealType { .. }));
    }

    // =========================================================================
    // steps 2-4
    // =========================================================================

    #[test]
    fn invalid_step_blocks_and_records_errors() {
        let mut state = emd_state();
        state.next().unwrap();

        let err = state.next().unwrap_err();

        let StepError::Invalid(errors) = err else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.get("emdAmount"), Some(REQUIRED_FIELD));
        assert_eq!(state.errors(), &errors);
        assert_eq!(state.step(), Step::DealDetails);
    }

    #[test]
    fn editing_a_field_clears_only_its_error() {
        let mut state = emd_state();
        state.next().unwrap();
        state.next().unwrap_err();
        state.errors.insert("other", REQUIRED_FIELD);

        state.set_field("emdAmount", text("100000")).unwrap();

        assert!(!state.errors().contains("emdAmount"));
        assert!(state.errors().contains("other"));
    }

    #[test]
    fn comparable_edits_clear_the_comparables_error() {
        let mut state = FormState::new();
        state.select_deal_type(DealType::FixFlip).unwrap();
        state.errors.insert("comparables", REQUIRED_FIELD);

        state.set_field("comparables[0].address", text("1 Main St")).unwrap();

        assert!(!state.errors().contains("comparables"));
    }

    #[test]
    fn back_then_forward_keeps_values_and_skips_validation() {
        let mut state = emd_state();
        state.next().unwrap();
        state.set_field("emdAmount", text("250000")).unwrap();
        state.next().unwrap();
        state.set_field("email", text("not-an-email")).unwrap();

        assert_eq!(state.back().unwrap(), Step::DealDetails);
        assert!(state.errors().is_empty());
        assert_eq!(state.next().unwrap(), Step::TitleInfo);
        assert_eq!(state.title().email, "not-an-email");

        let err = state.next().unwrap_err();
        let StepError::Invalid(errors) = err else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.get("email"), Some(INVALID_EMAIL));
    }

    #[test]
    fn back_does_not_clear_errors() {
        let mut state = emd_state();
        state.next().unwrap();
        state.next().unwrap_err();

        state.back().unwrap();

        assert!(state.errors().contains("emdAmount"));
    }

    #[test]
    fn back_on_first_step_stays_put() {
        let mut state = FormState::new();

        assert_eq!(state.back().unwrap(), Step::DealSelect);
    }

    #[test]
    fn next_on_last_step_is_rejected() {
        let mut state = emd_state();
        state.next().unwrap();
        state.set_field("emdAmount", text("100000")).unwrap();
        state.next().unwrap();
        fill_title(&mut state);
        assert_eq!(state.next().unwrap(), Step::Experience);

        assert_eq!(state.next().unwrap_err(), StepError::FinalStep);
        assert_eq!(state.step(), Step::Experience);
    }

    // =========================================================================
    // submission gate
    // =========================================================================

    #[test]
    fn submit_gate_requires_final_step() {
        let mut state = emd_state();

        assert_eq!(
            state.validate_for_submit().unwrap_err(),
            StepError::NotAtFinalStep(1)
        );
    }

    #[test]
    fn submit_gate_validates_experience() {
        let mut state = FormState::from_parts(
            Step::Experience,
            DealDetails::new(DealType::Emd),
            TitleInfo::default(),
            ExperienceInfo::default(),
        );
        state.set_field("hasDefaulted", text("yes")).unwrap();

        assert!(matches!(
            state.validate_for_submit(),
            Err(StepError::Invalid(_))
        ));
        assert!(state.errors().contains("defaultExplanation"));

        state
            .set_field("defaultExplanation", text("Medical emergency in 2019"))
            .unwrap();
        assert!(state.validate_for_submit().is_ok());
    }

    #[test]
    fn submitted_state_is_locked() {
        let mut state = emd_state();
        state.mark_submitted();

        assert!(matches!(
            state.set_field("emdAmount", text("1")),
            Err(FieldInputError::Locked)
        ));
        assert_eq!(state.next().unwrap_err(), StepError::AlreadySubmitted);
        assert_eq!(state.back().unwrap_err(), StepError::AlreadySubmitted);
    }

    #[test]
    fn derived_fields_are_read_only() {
        let mut state = FormState::new();
        state.select_deal_type(DealType::BuyHold).unwrap();

        let err = state.set_field("calculatedNOI", text("1")).unwrap_err();

        assert!(matches!(err, FieldInputError::ReadOnly { .. }));
    }

    #[test]
    fn coverage_tracks_buy_hold_inputs() {
        let mut state = FormState::new();
        state.select_deal_type(DealType::BuyHold).unwrap();
        state.set_field("estimatedMonthlyRent", text("200000")).unwrap();
        state.set_field("currentMonthlyPayment", text("90000")).unwrap();

        let first = state.coverage().unwrap();
        state.set_field("hoaFees", text("10000")).unwrap();
        let second = state.coverage().unwrap();

        assert_eq!(first.net_operating_income, dec!(24000));
        assert_eq!(second.net_operating_income, dec!(22800));
        assert!(second.debt_service_coverage_ratio < first.debt_service_coverage_ratio);
    }

    #[test]
    fn reset_returns_to_empty_step_one() {
        let mut state = emd_state();
        state.next().unwrap();

        state.reset();

        assert_eq!(state, FormState::new());
    }
}
