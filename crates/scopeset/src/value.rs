//! Semantic setting values, enumerated types and user-defined value objects

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};
use std::fmt;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Decoded setting value
///
/// The variant is decided by the cast of the setting definition, not by the
/// stored text. Settings without a cast always decode to `String` (or `Null`).
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	/// Fixed-scale decimal, kept as its formatted string
	Decimal(String),
	String(String),
	Json(Value),
	Date(NaiveDate),
	DateTime(DateTime<Utc>),
	Enum(EnumCase),
}

impl SettingValue {
	pub fn is_null(&self) -> bool {
		matches!(self, SettingValue::Null)
	}

	/// Get the type name for error messages
	pub fn type_name(&self) -> &'static str {
		match self {
			SettingValue::Null => "null",
			SettingValue::Bool(_) => "bool",
			SettingValue::Int(_) => "int",
			SettingValue::Float(_) => "float",
			SettingValue::Decimal(_) => "decimal",
			SettingValue::String(_) => "string",
			SettingValue::Json(_) => "json",
			SettingValue::Date(_) => "date",
			SettingValue::DateTime(_) => "datetime",
			SettingValue::Enum(_) => "enum",
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			SettingValue::Bool(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			SettingValue::Int(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_float(&self) -> Option<f64> {
		match self {
			SettingValue::Float(f) => Some(*f),
			#[allow(clippy::cast_precision_loss)]
			SettingValue::Int(i) => Some(*i as f64),
			_ => None,
		}
	}

	/// String view of `String` and `Decimal` values
	pub fn as_str(&self) -> Option<&str> {
		match self {
			SettingValue::String(s) | SettingValue::Decimal(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_json(&self) -> Option<&Value> {
		match self {
			SettingValue::Json(j) => Some(j),
			_ => None,
		}
	}

	pub fn as_date(&self) -> Option<NaiveDate> {
		match self {
			SettingValue::Date(d) => Some(*d),
			SettingValue::DateTime(dt) => Some(dt.date_naive()),
			_ => None,
		}
	}

	pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
		match self {
			SettingValue::DateTime(dt) => Some(*dt),
			_ => None,
		}
	}

	pub fn as_enum(&self) -> Option<&EnumCase> {
		match self {
			SettingValue::Enum(case) => Some(case),
			_ => None,
		}
	}

	/// Convert an enum value back into the Rust enum it was declared from
	pub fn to_enum<E: SettingEnum>(&self) -> Option<E> {
		let case = self.as_enum()?;
		if &*case.enum_name != E::NAME {
			return None;
		}
		E::cases().iter().find(|e| e.case_name() == &*case.name).cloned()
	}

	/// Rebuild a value object from a decoded JSON object
	pub fn to_object<T: ValueObject>(&self) -> Option<T> {
		match self {
			SettingValue::Json(Value::Object(record)) => Some(T::from_record(record)),
			_ => None,
		}
	}

	/// Plain storage text of this value, used when no cast applies
	pub(crate) fn to_raw(&self) -> Option<String> {
		match self {
			SettingValue::Null => None,
			SettingValue::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
			SettingValue::Int(i) => Some(i.to_string()),
			SettingValue::Float(f) => Some(f.to_string()),
			SettingValue::Decimal(s) | SettingValue::String(s) => Some(s.clone()),
			SettingValue::Json(j) => Some(j.to_string()),
			SettingValue::Date(d) => Some(d.format(DATE_FORMAT).to_string()),
			SettingValue::DateTime(dt) => Some(dt.format(DATETIME_FORMAT).to_string()),
			SettingValue::Enum(case) => Some(case.stored().to_string()),
		}
	}

	/// JSON representation used by structured casts
	pub(crate) fn to_json(&self) -> Value {
		match self {
			SettingValue::Null => Value::Null,
			SettingValue::Bool(b) => Value::Bool(*b),
			SettingValue::Int(i) => Value::from(*i),
			SettingValue::Float(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
			SettingValue::Json(j) => j.clone(),
			other => other.to_raw().map_or(Value::Null, Value::String),
		}
	}

	/// Comparison key for option matching.
	///
	/// Enum cases compare by their stored value, everything else by its storage text,
	/// so `Int(25)` matches the option `"25"`.
	pub(crate) fn normalized(&self) -> Option<String> {
		self.to_raw()
	}
}

impl fmt::Display for SettingValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.to_raw() {
			Some(raw) => write!(f, "{}", raw),
			None => write!(f, "null"),
		}
	}
}

impl From<bool> for SettingValue {
	fn from(value: bool) -> Self {
		SettingValue::Bool(value)
	}
}

impl From<i64> for SettingValue {
	fn from(value: i64) -> Self {
		SettingValue::Int(value)
	}
}

impl From<i32> for SettingValue {
	fn from(value: i32) -> Self {
		SettingValue::Int(i64::from(value))
	}
}

impl From<u32> for SettingValue {
	fn from(value: u32) -> Self {
		SettingValue::Int(i64::from(value))
	}
}

impl From<f64> for SettingValue {
	fn from(value: f64) -> Self {
		SettingValue::Float(value)
	}
}

impl From<&str> for SettingValue {
	fn from(value: &str) -> Self {
		SettingValue::String(value.to_string())
	}
}

impl From<String> for SettingValue {
	fn from(value: String) -> Self {
		SettingValue::String(value)
	}
}

impl From<Value> for SettingValue {
	fn from(value: Value) -> Self {
		match value {
			Value::Null => SettingValue::Null,
			other => SettingValue::Json(other),
		}
	}
}

impl From<NaiveDate> for SettingValue {
	fn from(value: NaiveDate) -> Self {
		SettingValue::Date(value)
	}
}

impl From<DateTime<Utc>> for SettingValue {
	fn from(value: DateTime<Utc>) -> Self {
		SettingValue::DateTime(value)
	}
}

impl From<EnumCase> for SettingValue {
	fn from(value: EnumCase) -> Self {
		SettingValue::Enum(value)
	}
}

impl<T: Into<SettingValue>> From<Option<T>> for SettingValue {
	fn from(value: Option<T>) -> Self {
		value.map_or(SettingValue::Null, Into::into)
	}
}

// Enumerated types //
//******************//
/// One case of an enumerated setting type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumCase {
	pub enum_name: Box<str>,
	pub name: Box<str>,
	/// Backing value; `None` for unit enums, which are stored by case name
	pub value: Option<Box<str>>,
}

impl EnumCase {
	/// Text written to storage for this case
	pub fn stored(&self) -> &str {
		self.value.as_deref().unwrap_or(&self.name)
	}
}

/// Runtime description of an enumerated setting type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
	name: Box<str>,
	backed: bool,
	cases: Vec<EnumCase>,
}

impl EnumType {
	/// Enum whose cases are stored by their backing value
	pub fn backed<'a>(
		name: &str,
		cases: impl IntoIterator<Item = (&'a str, &'a str)>,
	) -> Self {
		let cases = cases
			.into_iter()
			.map(|(case, value)| EnumCase {
				enum_name: name.into(),
				name: case.into(),
				value: Some(value.into()),
			})
			.collect();
		Self { name: name.into(), backed: true, cases }
	}

	/// Enum whose cases are stored by name
	pub fn unit<'a>(name: &str, cases: impl IntoIterator<Item = &'a str>) -> Self {
		let cases = cases
			.into_iter()
			.map(|case| EnumCase { enum_name: name.into(), name: case.into(), value: None })
			.collect();
		Self { name: name.into(), backed: false, cases }
	}

	/// Describe a Rust enum implementing [`SettingEnum`]
	pub fn of<E: SettingEnum>() -> Self {
		let cases = E::cases()
			.iter()
			.map(|e| EnumCase {
				enum_name: E::NAME.into(),
				name: e.case_name().into(),
				value: e.case_value().map(Into::into),
			})
			.collect::<Vec<_>>();
		let backed = cases.iter().all(|c| c.value.is_some());
		Self { name: E::NAME.into(), backed, cases }
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn is_backed(&self) -> bool {
		self.backed
	}

	pub fn cases(&self) -> &[EnumCase] {
		&self.cases
	}

	/// Find a case by backing value, falling back to the case name
	pub fn case_from(&self, raw: &str) -> Option<&EnumCase> {
		self.cases
			.iter()
			.find(|c| c.value.as_deref() == Some(raw))
			.or_else(|| self.cases.iter().find(|c| &*c.name == raw))
	}

	/// Allowed option values: backing values for backed enums, names otherwise
	pub fn option_values(&self) -> Vec<SettingValue> {
		self.cases.iter().map(|c| SettingValue::String(c.stored().to_string())).collect()
	}
}

/// Rust enum usable as an enumerated setting type or as a setting name
pub trait SettingEnum: Clone + Sized + 'static {
	const NAME: &'static str;

	fn cases() -> &'static [Self];

	fn case_name(&self) -> &'static str;

	/// Backing value; unit enums keep the default `None`
	fn case_value(&self) -> Option<&'static str> {
		None
	}

	fn to_setting_value(&self) -> SettingValue {
		SettingValue::Enum(EnumCase {
			enum_name: Self::NAME.into(),
			name: self.case_name().into(),
			value: self.case_value().map(Into::into),
		})
	}
}

// Value objects //
//***************//
/// User-defined value type stored as a JSON object
pub trait ValueObject: Sized + Send + Sync + 'static {
	const NAME: &'static str;

	fn from_record(record: &Map<String, Value>) -> Self;

	fn to_record(&self) -> Map<String, Value>;

	fn to_setting_value(&self) -> SettingValue {
		SettingValue::Json(Value::Object(self.to_record()))
	}
}

fn normalize_record<T: ValueObject>(record: &Map<String, Value>) -> Map<String, Value> {
	T::from_record(record).to_record()
}

/// Type-erased handle on a [`ValueObject`] implementation
#[derive(Clone, Copy)]
pub struct ValueType {
	name: &'static str,
	normalize: fn(&Map<String, Value>) -> Map<String, Value>,
}

impl ValueType {
	pub fn of<T: ValueObject>() -> Self {
		Self { name: T::NAME, normalize: normalize_record::<T> }
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Pass a record through `from_record` and back
	pub fn normalize(&self, record: &Map<String, Value>) -> Map<String, Value> {
		(self.normalize)(record)
	}
}

impl fmt::Debug for ValueType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ValueType").field("name", &self.name).finish()
	}
}

impl PartialEq for ValueType {
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Clone, Debug, PartialEq)]
	enum Theme {
		Light,
		Dark,
	}

	impl SettingEnum for Theme {
		const NAME: &'static str = "Theme";

		fn cases() -> &'static [Self] {
			&[Theme::Light, Theme::Dark]
		}

		fn case_name(&self) -> &'static str {
			match self {
				Theme::Light => "Light",
				Theme::Dark => "Dark",
			}
		}

		fn case_value(&self) -> Option<&'static str> {
			Some(match self {
				Theme::Light => "light",
				Theme::Dark => "dark",
			})
		}
	}

	#[test]
	fn test_enum_type_from_rust_enum() {
		let typ = EnumType::of::<Theme>();
		assert!(typ.is_backed());
		assert_eq!(typ.cases().len(), 2);
		assert_eq!(typ.case_from("dark").map(EnumCase::stored), Some("dark"));
		assert_eq!(typ.case_from("Dark").map(EnumCase::stored), Some("dark"));
		assert!(typ.case_from("blue").is_none());
	}

	#[test]
	fn test_enum_round_trip_through_value() {
		let value = Theme::Dark.to_setting_value();
		assert_eq!(value.to_enum::<Theme>(), Some(Theme::Dark));
		assert_eq!(value.normalized().as_deref(), Some("dark"));
	}

	#[test]
	fn test_unit_enum_stores_names() {
		let typ = EnumType::unit("Size", ["Small", "Large"]);
		assert!(!typ.is_backed());
		assert_eq!(
			typ.option_values(),
			vec![SettingValue::from("Small"), SettingValue::from("Large")]
		);
	}

	#[test]
	fn test_normalized_matches_across_types() {
		assert_eq!(SettingValue::Int(25).normalized(), SettingValue::from("25").normalized());
		assert_eq!(SettingValue::Bool(true).normalized().as_deref(), Some("1"));
		assert_eq!(SettingValue::Null.normalized(), None);
	}

	#[test]
	fn test_option_conversion() {
		assert_eq!(SettingValue::from(None::<i64>), SettingValue::Null);
		assert_eq!(SettingValue::from(Some(3)), SettingValue::Int(3));
		assert_eq!(SettingValue::from(Value::Null), SettingValue::Null);
	}
}

// vim: ts=4
