use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use super::{
    EXPLANATION_REQUIRED, FieldErrors, INVALID_DEALS, INVALID_EMAIL, INVALID_PHONE, INVALID_YEARS,
    REQUIRED_FIELD,
};
use crate::models::{ExperienceInfo, TitleInfo};

/// Minimum length (exclusive) of a default explanation.
const MIN_EXPLANATION_CHARS: usize = 10;

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\s\-\(\)\+]+$").expect("phone pattern compiles"));

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Step 3: every title field is required; phone and email must look right.
pub fn validate_title(title: &TitleInfo) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if title.company_name.trim().is_empty() {
        errors.insert("companyName", REQUIRED_FIELD);
    }
    if title.contact_person.trim().is_empty() {
        errors.insert("contactPerson", REQUIRED_FIELD);
    }

    if title.phone.trim().is_empty() {
        errors.insert("phone", REQUIRED_FIELD);
    } else if !PHONE_PATTERN.is_match(&title.phone) {
        errors.insert("phone", INVALID_PHONE);
    }

    if title.email.trim().is_empty() {
        errors.insert("email", REQUIRED_FIELD);
    } else if !EMAIL_PATTERN.is_match(&title.email) {
        errors.insert("email", INVALID_EMAIL);
    }

    errors
}

/// Step 4: counts must be non-negative, and a default needs an explanation.
///
/// The credit score range is an enum, so it can't hold an out-of-range value.
pub fn validate_experience(experience: &ExperienceInfo) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if experience.years_of_experience < Decimal::ZERO {
        errors.insert("yearsOfExperience", INVALID_YEARS);
    }
    if experience.deals_completed < 0 {
        errors.insert("dealsCompleted", INVALID_DEALS);
    }
    if experience.has_defaulted
        && experience.default_explanation.chars().count() <= MIN_EXPLANATION_CHARS
    {
        errors.insert("defaultExplanation", EXPLANATION_REQUIRED);
    }

    errors
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn valid_title() -> TitleInfo {
        TitleInfo {
            company_name: "Acme Title".to_string(),
            contact_person: "Jordan Lee".to_string(),
            phone: "+1 (555) 010-2030".to_string(),
            email: "closing@acmetitle.com".to_string(),
        }
    }

    // =========================================================================
    // title tests
    // =========================================================================

    #[test]
    fn title_accepts_complete_info() {
        assert!(validate_title(&valid_title()).is_empty());
    }

    #[test]
    fn title_requires_every_field() {
        let errors = validate_title(&TitleInfo::default());

        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["companyName", "contactPerson", "email", "phone"]
        );
        assert_eq!(errors.get("phone"), Some(REQUIRED_FIELD));
    }

    #[test]
    fn title_rejects_letters_in_phone() {
        let title = TitleInfo {
            phone: "call me".to_string(),
            ..valid_title()
        };

        let errors = validate_title(&title);

        assert_eq!(errors.get("phone"), Some(INVALID_PHONE));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn title_rejects_malformed_email() {
        for email in ["closing", "closing@acme", "closing @acme.com", "@acme.com"] {
            let title = TitleInfo {
                email: email.to_string(),
                ..valid_title()
            };

            assert_eq!(
                validate_title(&title).get("email"),
                Some(INVALID_EMAIL),
                "email {email:?}"
            );
        }
    }

    // =========================================================================
    // experience tests
    // =========================================================================

    #[test]
    fn experience_defaults_are_valid() {
        assert!(validate_experience(&ExperienceInfo::default()).is_empty());
    }

    #[test]
    fn experience_rejects_negative_counts() {
        let experience = ExperienceInfo {
            years_of_experience: dec!(-1),
            deals_completed: -3,
            ..Default::default()
        };

        let errors = validate_experience(&experience);

        assert_eq!(errors.get("yearsOfExperience"), Some(INVALID_YEARS));
        assert_eq!(errors.get("dealsCompleted"), Some(INVALID_DEALS));
    }

    #[test]
    fn experience_requires_explanation_after_default() {
        let experience = ExperienceInfo {
            has_defaulted: true,
            default_explanation: "Job loss".to_string(),
            ..Default::default()
        };

        let errors = validate_experience(&experience);

        assert_eq!(errors.get("defaultExplanation"), Some(EXPLANATION_REQUIRED));
    }

    #[test]
    fn experience_explanation_must_exceed_ten_characters() {
        let exactly_ten = ExperienceInfo {
            has_defaulted: true,
            default_explanation: "0123456789".to_string(),
            ..Default::default()
        };
        let eleven = ExperienceInfo {
            default_explanation: "0123456789a".to_string(),
            ..exactly_ten.clone()
        };

        assert!(validate_experience(&exactly_ten).contains("defaultExplanation"));
        assert!(validate_experience(&eleven).is_empty());
    }

    #[test]
    fn experience_ignores_explanation_without_default() {
        let experience = ExperienceInfo {
            has_defaulted: false,
            default_explanation: String::new(),
            ..Default::default()
        };

        assert!(validate_experience(&experience).is_empty());
    }
}
