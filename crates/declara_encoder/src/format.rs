//! Per-field value formatting and slot alignment.

use chrono::NaiveDate;
use declara_core::{Alignment, DataKind, EngineError, FieldDef, Value};

/// Date layouts accepted on input; output is always `%Y%m%d`.
const DATE_INPUT_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Renders a value into its textual form for the field's data kind.
///
/// Null values render empty (the pad character fills the slot). Non-null
/// values that cannot be rendered in the declared kind are an
/// [`EngineError::Encoding`]: the engine never silently coerces a bad
/// amount to zero.
pub fn format_value(field: &FieldDef, value: &Value, row: usize) -> Result<String, EngineError> {
    if value.is_null() {
        return Ok(String::new());
    }

    match field.kind {
        DataKind::Text => Ok(value.as_text().unwrap_or_default()),
        DataKind::Integer => {
            let n = value.as_number().ok_or_else(|| {
                EngineError::encoding(
                    &field.code,
                    row,
                    format!("{} value is not numeric", value.kind_name()),
                )
            })?;
            if n.fract() != 0.0 {
                return Err(EngineError::encoding(
                    &field.code,
                    row,
                    format!("fractional value '{n}' in integer field"),
                ));
            }
            Ok(format!("{}", n as i64))
        }
        DataKind::Decimal => {
            let n = value.as_number().ok_or_else(|| {
                EngineError::encoding(
                    &field.code,
                    row,
                    format!("{} value is not numeric", value.kind_name()),
                )
            })?;
            // Fixed-point with the separator removed: 123.4 at two
            // decimals becomes "12340".
            let fixed = format!("{:.*}", field.decimals as usize, n);
            Ok(fixed.replace('.', ""))
        }
        DataKind::Date => {
            let date = parse_date(value).ok_or_else(|| {
                EngineError::encoding(
                    &field.code,
                    row,
                    format!("'{}' is not a recognized date", value.as_text().unwrap_or_default()),
                )
            })?;
            Ok(date.format("%Y%m%d").to_string())
        }
    }
}

fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Date(d) => Some(*d),
        _ => {
            let text = value.as_text()?;
            let text = text.trim();
            DATE_INPUT_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(text, f).ok())
        }
    }
}

/// Pads a formatted value into its fixed-width slot.
///
/// Fails with [`EngineError::FieldOverflow`] when the value is wider than
/// the slot; trimming would silently corrupt the declaration.
pub fn align(field: &FieldDef, formatted: String, row: usize) -> Result<String, EngineError> {
    let len = formatted.chars().count();
    if len > field.width {
        return Err(EngineError::FieldOverflow {
            field: field.code.clone(),
            row,
            width: field.width,
            value: formatted,
        });
    }

    let fill = field.width - len;
    let pad = |n: usize| field.pad.to_string().repeat(n);
    Ok(match field.alignment {
        Alignment::Left => format!("{formatted}{}", pad(fill)),
        Alignment::Right => format!("{}{formatted}", pad(fill)),
        Alignment::Center => {
            // Odd remainder lands on the right.
            let left = fill / 2;
            format!("{}{formatted}{}", pad(left), pad(fill - left))
        }
    })
}
