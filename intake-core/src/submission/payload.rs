use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value, json};

use super::SubmissionError;
use crate::models::tags_for;
use crate::wizard::FormState;

/// Replaces every character outside `[A-Za-z0-9.-]` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Storage object path for an upload: `uploads/{timestamp_ms}_{sanitized}`.
pub fn object_path(
    timestamp_ms: i64,
    file_name: &str,
) -> String {
    format!("uploads/{timestamp_ms}_{}", sanitize_file_name(file_name))
}

/// Assembles the webhook body.
///
/// Top level: `dealType`, `titleInfo`, `experienceInfo`, `tags`,
/// `submittedAt`, then every deal field except documents, then `files`
/// mapping each uploaded field to its public URL. Buy-and-hold payloads also
/// carry `calculatedNOI` and `calculatedDSCR`.
pub fn build_payload(
    state: &FormState,
    files: &BTreeMap<String, String>,
    submitted_at: DateTime<Utc>,
) -> Result<Value, SubmissionError> {
    let deal = state.deal().ok_or(SubmissionError::NoDealType)?;
    let deal_type = deal.deal_type();

    let mut deal_fields = match deal.to_form_data()? {
        Value::Object(fields) => fields,
        _ => Map::new(),
    };
    for field in deal.file_fields() {
        deal_fields.remove(*field);
    }
    if let Some(coverage) = state.coverage() {
        deal_fields.insert(
            "calculatedNOI".to_string(),
            serde_json::to_value(coverage.net_operating_income)?,
        );
        deal_fields.insert(
            "calculatedDSCR".to_string(),
            serde_json::to_value(coverage.debt_service_coverage_ratio)?,
        );
    }

    let mut payload = Map::new();
    payload.insert("dealType".to_string(), json!(deal_type));
    payload.insert("titleInfo".to_string(), serde_json::to_value(state.title())?);
    payload.insert(
        "experienceInfo".to_string(),
        serde_json::to_value(state.experience())?,
    );
    payload.insert("tags".to_string(), json!(tags_for(deal_type.as_str())));
    payload.insert(
        "submittedAt".to_string(),
        json!(submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    payload.extend(deal_fields);
    payload.insert("files".to_string(), json!(files));

    Ok(Value::Object(payload))
}
