//! Conversion between raw storage text and semantic setting values
//!
//! A [`Cast`] is parsed from a descriptor string such as `"integer"`,
//! `"decimal:2"` or `"datetime:%d/%m/%Y"`, or built directly for enumerated
//! and value-object types. Descriptors nobody recognizes pass values through
//! untouched.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use std::fmt;

use crate::prelude::*;
use crate::value::{DATE_FORMAT, DATETIME_FORMAT, EnumType, ValueType};

/// Largest scale accepted in a `decimal:N` descriptor
pub const MAX_DECIMAL_SCALE: u32 = 30;

/// Cast rule of a setting definition
#[derive(Debug, Clone, PartialEq)]
pub enum Cast {
	Integer,
	Float,
	/// Fixed number of fractional digits
	Decimal(u32),
	String,
	Boolean,
	/// `array` and `json`
	Array,
	Object,
	Collection,
	Date,
	DateTime,
	ImmutableDate,
	ImmutableDateTime,
	/// `datetime:<fmt>` / `date:<fmt>` with a chrono format string
	CustomDateTime(Box<str>),
	ImmutableCustomDateTime(Box<str>),
	/// Unix timestamp in seconds
	Timestamp,
	Enum(EnumType),
	Value(ValueType),
	/// Unrecognized descriptor, values pass through unchanged
	Unknown(Box<str>),
}

impl Cast {
	/// Parse a cast descriptor
	pub fn parse(descriptor: &str) -> Cast {
		let descriptor = descriptor.trim();

		if let Some((kind, arg)) = descriptor.split_once(':') {
			return match kind.trim().to_lowercase().as_str() {
				"date" | "datetime" => Cast::CustomDateTime(arg.into()),
				"immutable_date" | "immutable_datetime" => Cast::ImmutableCustomDateTime(arg.into()),
				"decimal" => match arg.trim().parse() {
					Ok(scale) if scale <= MAX_DECIMAL_SCALE => Cast::Decimal(scale),
					Ok(scale) => {
						warn!(
							"Decimal scale {} exceeds {}, treating '{}' as unknown",
							scale, MAX_DECIMAL_SCALE, descriptor
						);
						Cast::Unknown(descriptor.into())
					}
					Err(_) => Cast::Unknown(descriptor.into()),
				},
				_ => Cast::Unknown(descriptor.into()),
			};
		}

		match descriptor.to_lowercase().as_str() {
			"int" | "integer" => Cast::Integer,
			"real" | "float" | "double" => Cast::Float,
			"string" => Cast::String,
			"bool" | "boolean" => Cast::Boolean,
			"array" | "json" => Cast::Array,
			"object" => Cast::Object,
			"collection" => Cast::Collection,
			"date" => Cast::Date,
			"datetime" | "custom_datetime" => Cast::DateTime,
			"immutable_date" => Cast::ImmutableDate,
			"immutable_datetime" | "immutable_custom_datetime" => Cast::ImmutableDateTime,
			"timestamp" => Cast::Timestamp,
			_ => Cast::Unknown(descriptor.into()),
		}
	}

	fn is_json(&self) -> bool {
		matches!(self, Cast::Array | Cast::Object | Cast::Collection)
	}
}

impl From<&str> for Cast {
	fn from(descriptor: &str) -> Self {
		Cast::parse(descriptor)
	}
}

impl From<EnumType> for Cast {
	fn from(typ: EnumType) -> Self {
		Cast::Enum(typ)
	}
}

impl From<ValueType> for Cast {
	fn from(typ: ValueType) -> Self {
		Cast::Value(typ)
	}
}

impl fmt::Display for Cast {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Cast::Integer => write!(f, "integer"),
			Cast::Float => write!(f, "float"),
			Cast::Decimal(scale) => write!(f, "decimal:{}", scale),
			Cast::String => write!(f, "string"),
			Cast::Boolean => write!(f, "boolean"),
			Cast::Array => write!(f, "array"),
			Cast::Object => write!(f, "object"),
			Cast::Collection => write!(f, "collection"),
			Cast::Date => write!(f, "date"),
			Cast::DateTime => write!(f, "datetime"),
			Cast::ImmutableDate => write!(f, "immutable_date"),
			Cast::ImmutableDateTime => write!(f, "immutable_datetime"),
			Cast::CustomDateTime(fmt) => write!(f, "datetime:{}", fmt),
			Cast::ImmutableCustomDateTime(fmt) => write!(f, "immutable_datetime:{}", fmt),
			Cast::Timestamp => write!(f, "timestamp"),
			Cast::Enum(typ) => write!(f, "{}", typ.name()),
			Cast::Value(typ) => write!(f, "{}", typ.name()),
			Cast::Unknown(descriptor) => write!(f, "{}", descriptor),
		}
	}
}

/// Decode a raw stored value
pub fn decode(cast: &Cast, raw: Option<&str>) -> StResult<SettingValue> {
	let Some(raw) = raw else {
		return Ok(match cast {
			// A missing value object decodes from an empty record
			Cast::Value(typ) => SettingValue::Json(Value::Object(typ.normalize(&Map::new()))),
			_ => SettingValue::Null,
		});
	};

	Ok(match cast {
		Cast::Integer => SettingValue::Int(parse_int(raw)),
		Cast::Float => SettingValue::Float(parse_float(raw)),
		Cast::Decimal(scale) => SettingValue::Decimal(
			round_decimal(raw, *scale)
				.ok_or_else(|| Error::CastError(format!("'{}' is not a decimal number", raw)))?,
		),
		Cast::String => SettingValue::String(raw.to_string()),
		Cast::Boolean => SettingValue::Bool(!(raw.is_empty() || raw == "0")),
		Cast::Array | Cast::Object | Cast::Collection => {
			// Undecodable JSON reads as null
			SettingValue::from(serde_json::from_str::<Value>(raw).unwrap_or(Value::Null))
		}
		Cast::Date | Cast::ImmutableDate => SettingValue::Date(parse_datetime(raw)?.date_naive()),
		Cast::DateTime | Cast::ImmutableDateTime => SettingValue::DateTime(parse_datetime(raw)?),
		Cast::CustomDateTime(fmt) | Cast::ImmutableCustomDateTime(fmt) => {
			SettingValue::DateTime(parse_custom_datetime(raw, fmt)?)
		}
		Cast::Timestamp => SettingValue::Int(parse_datetime(raw)?.timestamp()),
		Cast::Enum(typ) => SettingValue::Enum(
			typ.case_from(raw)
				.ok_or_else(|| {
					Error::CastError(format!("'{}' is not a valid case of {}", raw, typ.name()))
				})?
				.clone(),
		),
		Cast::Value(typ) => {
			let record = serde_json::from_str::<Map<String, Value>>(raw).unwrap_or_default();
			SettingValue::Json(Value::Object(typ.normalize(&record)))
		}
		Cast::Unknown(descriptor) => {
			warn!("Unknown cast '{}', passing raw value through", descriptor);
			SettingValue::String(raw.to_string())
		}
	})
}

/// Encode a semantic value into its raw stored form
pub fn encode(cast: &Cast, value: &SettingValue) -> StResult<Option<String>> {
	if value.is_null() {
		return Ok(None);
	}

	match cast {
		Cast::Enum(typ) => {
			let case = match value {
				SettingValue::Enum(case) if &*case.enum_name == typ.name() => Some(case),
				SettingValue::Enum(_) => None,
				other => other.to_raw().and_then(|raw| typ.case_from(&raw)),
			};
			case.map(|case| Some(case.stored().to_string())).ok_or_else(|| {
				Error::CastError(format!("'{}' is not a valid case of {}", value, typ.name()))
			})
		}
		Cast::Value(typ) => match value {
			SettingValue::Json(Value::Object(record)) => {
				Ok(Some(Value::Object(typ.normalize(record)).to_string()))
			}
			other => Err(Error::CastError(format!(
				"The given {} value is not a {} instance",
				other.type_name(),
				typ.name()
			))),
		},
		cast if cast.is_json() => Ok(Some(serde_json::to_string(&value.to_json())?)),
		Cast::Decimal(scale) => {
			let raw = value.to_raw().unwrap_or_default();
			round_decimal(&raw, *scale)
				.map(Some)
				.ok_or_else(|| Error::CastError(format!("'{}' is not a decimal number", raw)))
		}
		Cast::CustomDateTime(fmt) | Cast::ImmutableCustomDateTime(fmt) => match value {
			SettingValue::DateTime(dt) => Ok(Some(dt.format(fmt).to_string())),
			SettingValue::Date(d) => Ok(Some(d.format(fmt).to_string())),
			other => Ok(other.to_raw()),
		},
		_ => Ok(value.to_raw()),
	}
}

/// Lenient integer conversion: `"12"` → 12, `"12.9"` → 12, `"12abc"` → 12, `"abc"` → 0
#[allow(clippy::cast_possible_truncation)]
fn parse_int(raw: &str) -> i64 {
	let raw = raw.trim();
	if let Ok(i) = raw.parse::<i64>() {
		return i;
	}
	if let Ok(f) = raw.parse::<f64>()
		&& f.is_finite()
	{
		return f as i64;
	}

	let end = raw
		.char_indices()
		.find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+'))))
		.map_or(raw.len(), |(i, _)| i);
	raw[..end].parse().unwrap_or(0)
}

fn parse_float(raw: &str) -> f64 {
	match raw.trim() {
		"Infinity" => f64::INFINITY,
		"-Infinity" => f64::NEG_INFINITY,
		"NaN" => f64::NAN,
		other => other.parse().unwrap_or(0.0),
	}
}

/// Round a decimal string half-up to `scale` fractional digits.
/// Returns `None` if `raw` is not a plain decimal number.
pub(crate) fn round_decimal(raw: &str, scale: u32) -> Option<String> {
	let raw = raw.trim();
	let (negative, digits) = match raw.strip_prefix('-') {
		Some(rest) => (true, rest),
		None => (false, raw.strip_prefix('+').unwrap_or(raw)),
	};
	let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
	if int_part.is_empty() && frac_part.is_empty() {
		return None;
	}
	if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
		return None;
	}

	let scale = scale.min(MAX_DECIMAL_SCALE) as usize;
	let mut kept: Vec<u8> = int_part
		.bytes()
		.chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(scale))
		.map(|b| b - b'0')
		.collect();

	if frac_part.as_bytes().get(scale).is_some_and(|b| *b >= b'5') {
		let mut i = kept.len();
		loop {
			if i == 0 {
				kept.insert(0, 1);
				break;
			}
			i -= 1;
			if kept[i] == 9 {
				kept[i] = 0;
			} else {
				kept[i] += 1;
				break;
			}
		}
	}

	let split = kept.len() - scale;
	let to_str = |digits: &[u8]| digits.iter().map(|d| char::from(b'0' + d)).collect::<String>();
	let int_digits = to_str(&kept[..split]);
	let int_digits = match int_digits.trim_start_matches('0') {
		"" => "0",
		trimmed => trimmed,
	};
	let sign = if negative && kept.iter().any(|d| *d != 0) { "-" } else { "" };

	if scale == 0 {
		Some(format!("{}{}", sign, int_digits))
	} else {
		Some(format!("{}{}.{}", sign, int_digits, to_str(&kept[split..])))
	}
}

/// Parse the date formats accepted for temporal casts:
/// unix seconds, `Y-m-d`, `Y-m-d H:M:S`, RFC 3339 and `Y-m-dTH:M:S`
pub(crate) fn parse_datetime(raw: &str) -> StResult<DateTime<Utc>> {
	let raw = raw.trim();

	if let Ok(secs) = raw.parse::<i64>() {
		return Utc
			.timestamp_opt(secs, 0)
			.single()
			.ok_or_else(|| Error::CastError(format!("'{}' is out of range", raw)));
	}
	if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
		return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
	}
	if let Ok(dt) = NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT) {
		return Ok(dt.and_utc());
	}
	if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
		return Ok(dt.with_timezone(&Utc));
	}
	if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
		return Ok(dt.and_utc());
	}

	Err(Error::CastError(format!("Could not parse '{}' as a date", raw)))
}

fn parse_custom_datetime(raw: &str, fmt: &str) -> StResult<DateTime<Utc>> {
	if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
		return Ok(dt.and_utc());
	}
	if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
		return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
	}
	parse_datetime(raw)
}


// vim: ts=4
