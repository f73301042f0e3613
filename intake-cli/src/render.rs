//! Plain-text views of the form for the terminal.

use intake_core::calculations::{display_amount, format_amount, format_file_size};
use intake_core::template::PARCEL_TEMPLATE_FILE_NAME;
use intake_core::wizard::is_currency_field;
use intake_core::{DealDetails, FieldErrors, FormState};
use rust_decimal::Decimal;
use serde_json::Value;

const INDENT: &str = "  ";

/// Everything the borrower has entered so far, plus derived values and
/// outstanding errors.
pub fn render_status(state: &FormState) -> Result<String, serde_json::Error> {
    let mut lines = vec![state.step().to_string()];

    let Some(deal) = state.deal() else {
        lines.push("No transaction type selected.".to_string());
        return Ok(finish(lines));
    };
    lines.push(format!("Transaction: {}", deal.deal_type().label()));

    lines.push(String::new());
    lines.push("Deal details".to_string());
    push_fields(&mut lines, "", &deal.to_form_data()?);
    if let DealDetails::Land(land) = deal {
        if land.is_multi_parcel() && land.multi_parcel_spreadsheet.is_none() {
            lines.push(format!(
                "Multiple parcels: run `intake template` and attach the completed \
                 {PARCEL_TEMPLATE_FILE_NAME} to multiParcelSpreadsheet."
            ));
        }
    }

    if let Some(coverage) = state.coverage() {
        lines.push(String::new());
        lines.push("Cash flow".to_string());
        lines.push(format!(
            "{INDENT}calculatedNOI: {}",
            format_amount(coverage.net_operating_income)
        ));
        lines.push(format!(
            "{INDENT}calculatedDSCR: {}",
            coverage.debt_service_coverage_ratio.round_dp(2)
        ));
    }

    lines.push(String::new());
    lines.push("Title company".to_string());
    push_fields(&mut lines, "", &serde_json::to_value(state.title())?);

    lines.push(String::new());
    lines.push("Experience".to_string());
    push_fields(&mut lines, "", &serde_json::to_value(state.experience())?);

    if !state.errors().is_empty() {
        lines.push(String::new());
        lines.extend(render_errors(state.errors()).lines().map(str::to_string));
    }

    Ok(finish(lines))
}

pub fn render_errors(errors: &FieldErrors) -> String {
    format!("Errors\n{errors}")
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn push_fields(
    lines: &mut Vec<String>,
    prefix: &str,
    value: &Value,
) {
    match value {
        Value::Object(map) if is_file(value) => {
            lines.push(format!("{INDENT}{prefix}: {}", file_summary(map)));
        }
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                push_fields(lines, &path, child);
            }
        }
        Value::Array(items) if items.is_empty() => {
            lines.push(format!("{INDENT}{prefix}: (none)"));
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                push_fields(lines, &format!("{prefix}[{i}]"), item);
            }
        }
        Value::Null => push_value(lines, prefix, ""),
        Value::String(s) => push_value(lines, prefix, s),
        Value::Number(n) if is_currency_field(prefix) => match n.to_string().parse::<Decimal>() {
            Ok(amount) => push_value(lines, prefix, &display_amount(amount)),
            Err(_) => push_value(lines, prefix, &n.to_string()),
        },
        other => push_value(lines, prefix, &other.to_string()),
    }
}

/// Blank values leave no trailing space.
fn push_value(
    lines: &mut Vec<String>,
    prefix: &str,
    text: &str,
) {
    if text.is_empty() {
        lines.push(format!("{INDENT}{prefix}:"));
    } else {
        lines.push(format!("{INDENT}{prefix}: {text}"));
    }
}

fn is_file(value: &Value) -> bool {
    value.get("name").is_some_and(Value::is_string) && value.get("size").is_some_and(Value::is_u64)
}

fn file_summary(map: &serde_json::Map<String, Value>) -> String {
    let name = map.get("name").and_then(Value::as_str).unwrap_or_default();
    let size = map.get("size").and_then(Value::as_u64).unwrap_or_default();
    format!("{name} ({})", format_file_size(size))
}
