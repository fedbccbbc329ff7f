//! Typed values carried by label and point data.
//!
//! The wire format is a record with one optional field per payload type. It
//! is only read through [`TypedValueRecord::typed`], which picks the single
//! payload matching the declared [`ValueType`] and yields a [`TypedValue`].

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Declared type of a label or point field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ValueType {
    /// `VALUE_TYPE_UNSPECIFIED` or an empty string.
    #[default]
    Unspecified,
    Bool,
    Int64,
    Double,
    String,
    Distribution,
    Money,
    /// A type this client does not know about.
    Other(String),
}

impl ValueType {
    /// Returns the wire name of the type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unspecified => "VALUE_TYPE_UNSPECIFIED",
            Self::Bool => "BOOL",
            Self::Int64 => "INT64",
            Self::Double => "DOUBLE",
            Self::String => "STRING",
            Self::Distribution => "DISTRIBUTION",
            Self::Money => "MONEY",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for ValueType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "" | "VALUE_TYPE_UNSPECIFIED" => Self::Unspecified,
            "BOOL" => Self::Bool,
            "INT64" => Self::Int64,
            "DOUBLE" => Self::Double,
            "STRING" => Self::String,
            "DISTRIBUTION" => Self::Distribution,
            "MONEY" => Self::Money,
            _ => Self::Other(s),
        }
    }
}

impl From<ValueType> for String {
    fn from(v: ValueType) -> Self {
        v.as_str().to_string()
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single typed value with exactly one payload.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Bool(bool),
    Int64(i64),
    Double(f64),
    String(String),
    Distribution(Distribution),
    Money(Money),
}

impl TypedValue {
    /// Renders the value in its canonical string form.
    ///
    /// Doubles use the shortest representation that round-trips, and a
    /// distribution collapses to its mean.
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int64(i) => i.to_string(),
            Self::Double(d) => format_double(*d),
            Self::String(s) => s.clone(),
            Self::Distribution(d) => format_double(d.mean),
            Self::Money(m) => m.to_display_string(),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

/// Exponents in this range print in plain decimal notation.
const PLAIN_EXPONENTS: std::ops::Range<i32> = -4..21;

/// Formats a double in the shortest form that parses back to the same value.
///
/// Very large and very small magnitudes use an exponent, e.g. `1e+300` and
/// `1.5e-07`.
pub fn format_double(d: f64) -> String {
    if !d.is_finite() || d == 0.0 {
        return d.to_string();
    }

    // `{:e}` yields the shortest round-trip digits, e.g. `1.5e-7`.
    let scientific = format!("{d:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return d.to_string();
    };
    match exponent.parse::<i32>() {
        Ok(exp) if !PLAIN_EXPONENTS.contains(&exp) => {
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
        }
        _ => d.to_string(),
    }
}

/// Distribution payload. Only the mean is decoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    #[serde(default, deserialize_with = "lenient_double_or_zero")]
    pub mean: f64,
}

/// Monetary amount in the `google.type.Money` shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    #[serde(default)]
    pub currency_code: String,

    #[serde(default, deserialize_with = "lenient_int64")]
    pub units: Option<i64>,

    #[serde(default)]
    pub nanos: i32,
}

const NANOS_PER_UNIT: i128 = 1_000_000_000;

impl Money {
    /// Renders the amount exactly, without trailing fractional zeros.
    pub fn amount_string(&self) -> String {
        let total = i128::from(self.units.unwrap_or(0)) * NANOS_PER_UNIT + i128::from(self.nanos);
        let sign = if total < 0 { "-" } else { "" };
        let abs = total.unsigned_abs();
        let whole = abs / NANOS_PER_UNIT as u128;
        let frac = abs % NANOS_PER_UNIT as u128;

        if frac == 0 {
            format!("{sign}{whole}")
        } else {
            let digits = format!("{frac:09}");
            format!("{sign}{whole}.{}", digits.trim_end_matches('0'))
        }
    }

    /// Renders as `"<currency> <amount>"`, or just the amount without a currency.
    pub fn to_display_string(&self) -> String {
        if self.currency_code.is_empty() {
            self.amount_string()
        } else {
            format!("{} {}", self.currency_code, self.amount_string())
        }
    }
}

/// Wire record for a point value: one optional field per payload type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedValueRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bool_value: Option<bool>,

    #[serde(
        default,
        deserialize_with = "lenient_int64",
        skip_serializing_if = "Option::is_none"
    )]
    pub int64_value: Option<i64>,

    #[serde(
        default,
        deserialize_with = "lenient_double",
        skip_serializing_if = "Option::is_none"
    )]
    pub double_value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution_value: Option<Distribution>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub money_value: Option<Money>,
}

impl TypedValueRecord {
    /// Selects the payload matching the declared type.
    ///
    /// Returns `None` when that payload is absent, when the type is
    /// unspecified, or when the type is unknown.
    pub fn typed(&self, value_type: &ValueType) -> Option<TypedValue> {
        match value_type {
            ValueType::Bool => self.bool_value.map(TypedValue::Bool),
            ValueType::Int64 => self.int64_value.map(TypedValue::Int64),
            ValueType::Double => self.double_value.map(TypedValue::Double),
            ValueType::String => self.string_value.clone().map(TypedValue::String),
            ValueType::Distribution => self
                .distribution_value
                .clone()
                .map(TypedValue::Distribution),
            ValueType::Money => self.money_value.clone().map(TypedValue::Money),
            ValueType::Unspecified | ValueType::Other(_) => None,
        }
    }
}

/// Wire record for a label value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bool_value: Option<bool>,

    #[serde(
        default,
        deserialize_with = "lenient_int64",
        skip_serializing_if = "Option::is_none"
    )]
    pub int64_value: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
}

impl LabelValue {
    /// Creates a string label value.
    pub fn string(s: impl Into<String>) -> Self {
        Self {
            string_value: Some(s.into()),
            ..Default::default()
        }
    }

    /// Selects the payload matching the declared label type.
    ///
    /// Labels default to STRING when their type is unspecified.
    pub fn typed(&self, value_type: &ValueType) -> Option<TypedValue> {
        match value_type {
            ValueType::String | ValueType::Unspecified => {
                self.string_value.clone().map(TypedValue::String)
            }
            ValueType::Bool => self.bool_value.map(TypedValue::Bool),
            ValueType::Int64 => self.int64_value.map(TypedValue::Int64),
            _ => None,
        }
    }
}

// int64 arrives as a JSON string. Unparsable payloads decode as absent.
fn lenient_int64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

fn lenient_double<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => match s.as_str() {
            "NaN" => Some(f64::NAN),
            "Infinity" => Some(f64::INFINITY),
            "-Infinity" => Some(f64::NEG_INFINITY),
            other => other.trim().parse().ok(),
        },
        _ => None,
    }))
}

fn lenient_double_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_double(deserializer)?.unwrap_or(0.0))
}
