//! Array builders for converting fetched rows to Arrow arrays.
//!
//! Fetched values carry no engine type information beyond their JSON shape,
//! so each column's Arrow type is inferred from its non-null values.

use crate::error::ConversionError;
use arrow::array::{ArrayRef, BooleanBuilder, Float64Builder, Int64Builder, StringBuilder};
use arrow_schema::DataType;
use serde_json::Value;
use std::sync::Arc;

/// Infer the Arrow type of a column.
///
/// All-null columns become `Utf8`. Integers widen to `Float64` when the column
/// also holds floats; any other mix of types becomes `Utf8`.
pub fn infer_data_type(values: &[Value]) -> DataType {
    let mut inferred: Option<DataType> = None;

    for value in values {
        let this = match value {
            Value::Null => continue,
            Value::Bool(_) => DataType::Boolean,
            Value::Number(n) if n.is_i64() => DataType::Int64,
            Value::Number(_) => DataType::Float64,
            _ => DataType::Utf8,
        };

        inferred = Some(match (inferred, this) {
            (None, t) => t,
            (Some(DataType::Int64), DataType::Float64) | (Some(DataType::Float64), DataType::Int64) => {
                DataType::Float64
            }
            (Some(prev), t) if prev == t => prev,
            // Mixed columns fall back to text
            (Some(_), _) => DataType::Utf8,
        });
    }

    inferred.unwrap_or(DataType::Utf8)
}

/// Build an Arrow array from JSON values for the given type.
pub fn build_array(
    data_type: &DataType,
    values: &[Value],
    column: usize,
) -> Result<ArrayRef, ConversionError> {
    match data_type {
        DataType::Boolean => build_boolean_array(values, column),
        DataType::Int64 => build_int64_array(values, column),
        DataType::Float64 => build_float64_array(values, column),
        DataType::Utf8 => Ok(build_string_array(values)),
        other => Err(ConversionError::ValueConversionFailed {
            row: 0,
            column,
            message: format!("Unsupported Arrow type: {:?}", other),
        }),
    }
}

fn build_boolean_array(values: &[Value], column: usize) -> Result<ArrayRef, ConversionError> {
    let mut builder = BooleanBuilder::with_capacity(values.len());

    for (row, value) in values.iter().enumerate() {
        match value {
            Value::Null => builder.append_null(),
            Value::Bool(b) => builder.append_value(*b),
            other => return Err(mismatch(row, column, "boolean", other)),
        }
    }

    Ok(Arc::new(builder.finish()))
}

fn build_int64_array(values: &[Value], column: usize) -> Result<ArrayRef, ConversionError> {
    let mut builder = Int64Builder::with_capacity(values.len());

    for (row, value) in values.iter().enumerate() {
        if value.is_null() {
            builder.append_null();
        } else if let Some(n) = value.as_i64() {
            builder.append_value(n);
        } else {
            return Err(mismatch(row, column, "integer", value));
        }
    }

    Ok(Arc::new(builder.finish()))
}

fn build_float64_array(values: &[Value], column: usize) -> Result<ArrayRef, ConversionError> {
    let mut builder = Float64Builder::with_capacity(values.len());

    for (row, value) in values.iter().enumerate() {
        if value.is_null() {
            builder.append_null();
        } else if let Some(n) = value.as_f64() {
            builder.append_value(n);
        } else {
            return Err(mismatch(row, column, "number", value));
        }
    }

    Ok(Arc::new(builder.finish()))
}

/// Strings are taken as-is; any other non-null value is stored as its JSON text.
fn build_string_array(values: &[Value]) -> ArrayRef {
    let mut builder = StringBuilder::with_capacity(values.len(), values.len() * 16);

    for value in values {
        match value {
            Value::Null => builder.append_null(),
            Value::String(s) => builder.append_value(s),
            other => builder.append_value(other.to_string()),
        }
    }

    Arc::new(builder.finish())
}

fn mismatch(row: usize, column: usize, expected: &str, got: &Value) -> ConversionError {
    ConversionError::ValueConversionFailed {
        row,
        column,
        message: format!("Expected {}, got: {:?}", expected, got),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, BooleanArray, Float64Array, Int64Array, StringArray};
    use serde_json::json;

    #[test]
    fn test_infer_types() {
        assert_eq!(infer_data_type(&[json!(null), json!(true)]), DataType::Boolean);
        assert_eq!(infer_data_type(&[json!(1), json!(2)]), DataType::Int64);
        assert_eq!(infer_data_type(&[json!(1), json!(2.5)]), DataType::Float64);
        assert_eq!(infer_data_type(&[json!("a")]), DataType::Utf8);
        assert_eq!(infer_data_type(&[json!(null)]), DataType::Utf8);
        assert_eq!(infer_data_type(&[]), DataType::Utf8);
    }

    #[test]
    fn test_build_int64_with_nulls() {
        let array = build_array(&DataType::Int64, &[json!(1), json!(null), json!(3)], 0).unwrap();
        let array = array.as_any().downcast_ref::<Int64Array>().unwrap();
        assert_eq!(array.value(0), 1);
        assert!(array.is_null(1));
        assert_eq!(array.value(2), 3);
    }

    #[test]
    fn test_build_float64_accepts_integers() {
        let array = build_array(&DataType::Float64, &[json!(1), json!(2.5)], 0).unwrap();
        let array = array.as_any().downcast_ref::<Float64Array>().unwrap();
        assert_eq!(array.value(0), 1.0);
        assert_eq!(array.value(1), 2.5);
    }

    #[test]
    fn test_build_boolean_mismatch() {
        let err = build_array(&DataType::Boolean, &[json!(true), json!("x")], 3).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::ValueConversionFailed { row: 1, column: 3, .. }
        ));

        let ok = build_array(&DataType::Boolean, &[json!(false)], 0).unwrap();
        let ok = ok.as_any().downcast_ref::<BooleanArray>().unwrap();
        assert!(!ok.value(0));
    }

    #[test]
    fn test_build_string_serializes_other_values() {
        let array = build_array(&DataType::Utf8, &[json!("a"), json!({"k": 1})], 0).unwrap();
        let array = array.as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(array.value(0), "a");
        assert_eq!(array.value(1), r#"{"k":1}"#);
    }
}
