//! Setting record: one stored `(scope, name) → raw value` row

use scopeset_types::settings_adapter::SettingRow;

use crate::caster;
use crate::prelude::*;
use crate::registry::{DefinitionScope, FrozenSettingsRegistry, SettingDefinition};

/// A persisted setting, or a synthetic one standing in for a definition default.
///
/// The decoded value is never stored; [`Setting::value`] derives it from the
/// raw text through the cast of the matching definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Setting {
	id: Option<i64>,
	settingable_id: Option<i64>,
	settingable_type: Option<Box<str>>,
	name: Box<str>,
	value: Option<String>,
	created_at: Option<Timestamp>,
	updated_at: Option<Timestamp>,
}

impl From<SettingRow> for Setting {
	fn from(row: SettingRow) -> Self {
		Self {
			id: Some(row.id),
			settingable_id: row.settingable_id,
			settingable_type: row.settingable_type,
			name: row.name,
			value: row.value,
			created_at: Some(row.created_at),
			updated_at: Some(row.updated_at),
		}
	}
}

impl Setting {
	/// Unsaved record for a scope
	pub(crate) fn new(scope: &Scope, name: &str) -> Self {
		Self {
			id: None,
			settingable_id: scope.settingable_id(),
			settingable_type: scope.settingable_type().map(Into::into),
			name: name.into(),
			value: None,
			created_at: None,
			updated_at: None,
		}
	}

	/// Never-persisted record carrying the encoded default of `def`
	pub(crate) fn synthetic(
		scope: &Scope,
		def: &SettingDefinition,
		registry: &FrozenSettingsRegistry,
	) -> StResult<Self> {
		let mut setting = Setting::new(scope, def.name());
		if let Some(default) = def.default_value() {
			setting.set_value(registry, default)?;
		}
		Ok(setting)
	}

	pub fn id(&self) -> Option<i64> {
		self.id
	}

	pub fn settingable_id(&self) -> Option<i64> {
		self.settingable_id
	}

	pub fn settingable_type(&self) -> Option<&str> {
		self.settingable_type.as_deref()
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Raw stored text
	pub fn raw_value(&self) -> Option<&str> {
		self.value.as_deref()
	}

	pub fn created_at(&self) -> Option<Timestamp> {
		self.created_at
	}

	pub fn updated_at(&self) -> Option<Timestamp> {
		self.updated_at
	}

	/// Whether this record came from storage
	pub fn is_persisted(&self) -> bool {
		self.id.is_some()
	}

	/// Matching definition, preferring the record's own scope type over the global table
	pub fn definition<'r>(&self, registry: &'r FrozenSettingsRegistry) -> Option<&'r SettingDefinition> {
		match self.settingable_type.as_deref() {
			Some(typ) => registry
				.definition(DefinitionScope::ScopedTo(typ), &self.name)
				.or_else(|| registry.definition(DefinitionScope::Global, &self.name)),
			None => registry.definition(DefinitionScope::Global, &self.name),
		}
	}

	/// Decoded value. Without a definition or a cast the raw text is returned as is.
	pub fn value(&self, registry: &FrozenSettingsRegistry) -> StResult<SettingValue> {
		match self.definition(registry).and_then(SettingDefinition::effective_cast) {
			Some(cast) => caster::decode(&cast, self.value.as_deref()),
			None => Ok(SettingValue::from(self.value.clone())),
		}
	}

	/// Encode `value` into the raw text and return what will be stored
	pub fn set_value(
		&mut self,
		registry: &FrozenSettingsRegistry,
		value: &SettingValue,
	) -> StResult<Option<&str>> {
		self.value = match self.definition(registry).and_then(SettingDefinition::effective_cast) {
			Some(cast) => caster::encode(&cast, value)?,
			None => value.to_raw(),
		};
		Ok(self.value.as_deref())
	}

	/// Allowed values of this record's definition
	pub fn options(&self, registry: &FrozenSettingsRegistry) -> Vec<SettingValue> {
		self.definition(registry).map(SettingDefinition::options_list).unwrap_or_default()
	}

	/// Replace the stored state with a freshly written row
	pub(crate) fn apply_row(&mut self, row: SettingRow) {
		*self = Setting::from(row);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::registry::SettingsRegistry;

	fn registry() -> FrozenSettingsRegistry {
		let mut registry = SettingsRegistry::new();
		registry
			.register(SettingDefinition::builder("max_items").cast("integer").default(10).build().unwrap())
			.unwrap();
		registry
			.register(SettingDefinition::builder("motto").build().unwrap())
			.unwrap();
		registry
			.register_scope(
				"user",
				[SettingDefinition::builder("max_items").cast("boolean").build().unwrap()],
			)
			.unwrap();
		registry.freeze()
	}

	#[test]
	fn test_value_uses_record_scope_definition() {
		let registry = registry();

		let mut global = Setting::new(&Scope::Global, "max_items");
		global.set_value(&registry, &SettingValue::from("25")).unwrap();
		assert_eq!(global.value(&registry).unwrap(), SettingValue::Int(25));

		let mut scoped = Setting::new(&Scope::owner(1, "user"), "max_items");
		assert_eq!(scoped.set_value(&registry, &SettingValue::Bool(true)).unwrap(), Some("1"));
		assert_eq!(scoped.value(&registry).unwrap(), SettingValue::Bool(true));
	}

	#[test]
	fn test_uncast_value_is_raw() {
		let registry = registry();
		let mut setting = Setting::new(&Scope::Global, "motto");
		assert_eq!(setting.value(&registry).unwrap(), SettingValue::Null);
		setting.set_value(&registry, &SettingValue::Int(7)).unwrap();
		assert_eq!(setting.value(&registry).unwrap(), SettingValue::from("7"));
	}

	#[test]
	fn test_synthetic_record_is_not_persisted() {
		let registry = registry();
		let def = registry.definition(DefinitionScope::Global, "max_items").unwrap();
		let setting = Setting::synthetic(&Scope::Global, def, &registry).unwrap();
		assert!(!setting.is_persisted());
		assert_eq!(setting.raw_value(), Some("10"));
		assert_eq!(setting.value(&registry).unwrap(), SettingValue::Int(10));
	}
}

// vim: ts=4
