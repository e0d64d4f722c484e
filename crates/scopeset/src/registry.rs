//! Setting definitions and the registry that resolves them per scope type

use std::borrow::Cow;
use std::collections::HashMap;

use crate::caster::Cast;
use crate::prelude::*;
use crate::value::{EnumType, ValueType};

/// Static declaration of one setting
#[derive(Debug, Clone)]
pub struct SettingDefinition {
	name: Box<str>,
	default: Option<SettingValue>,
	cast: Option<Cast>,
	enum_type: Option<EnumType>,
	options: Option<Vec<SettingValue>>,
	nullable: bool,
}

impl SettingDefinition {
	/// Create a builder for constructing a SettingDefinition
	pub fn builder(name: impl AsRef<str>) -> SettingDefinitionBuilder {
		SettingDefinitionBuilder::new(name)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn default_value(&self) -> Option<&SettingValue> {
		self.default.as_ref()
	}

	pub fn is_nullable(&self) -> bool {
		self.nullable
	}

	pub fn enum_type(&self) -> Option<&EnumType> {
		self.enum_type.as_ref().or(match &self.cast {
			Some(Cast::Enum(typ)) => Some(typ),
			_ => None,
		})
	}

	/// Cast applied to stored values. An enumerated type takes precedence over a plain cast.
	pub fn effective_cast(&self) -> Option<Cow<'_, Cast>> {
		match &self.enum_type {
			Some(typ) => Some(Cow::Owned(Cast::Enum(typ.clone()))),
			None => self.cast.as_ref().map(Cow::Borrowed),
		}
	}

	/// Allowed values: enum cases first, then the explicit list, else nothing
	pub fn options_list(&self) -> Vec<SettingValue> {
		if let Some(typ) = self.enum_type() {
			return typ.option_values();
		}
		self.options.clone().unwrap_or_default()
	}

	/// Whether `value` matches one of the declared options after normalization.
	/// A definition without options accepts anything.
	pub fn accepts(&self, value: &SettingValue) -> bool {
		let options = self.options_list();
		if options.is_empty() {
			return true;
		}
		let normalized = value.normalized();
		options.iter().any(|option| option.normalized() == normalized)
	}
}

/// Builder for SettingDefinition with fluent API
pub struct SettingDefinitionBuilder {
	name: String,
	default: Option<SettingValue>,
	cast: Option<Cast>,
	enum_type: Option<EnumType>,
	options: Option<Vec<SettingValue>>,
	nullable: bool,
}

impl SettingDefinitionBuilder {
	pub fn new(name: impl AsRef<str>) -> Self {
		Self {
			name: name.as_ref().to_string(),
			default: None,
			cast: None,
			enum_type: None,
			options: None,
			nullable: false,
		}
	}

	/// Value returned by `get` when no record is stored
	pub fn default(mut self, value: impl Into<SettingValue>) -> Self {
		self.default = Some(value.into());
		self
	}

	/// Cast rule, either a descriptor string or a [`Cast`]
	pub fn cast(mut self, cast: impl Into<Cast>) -> Self {
		self.cast = Some(cast.into());
		self
	}

	/// Restrict values to the cases of an enumerated type and cast through it
	pub fn enumeration(mut self, typ: EnumType) -> Self {
		self.enum_type = Some(typ);
		self
	}

	/// Cast through a user-defined value object
	pub fn value_type(mut self, typ: ValueType) -> Self {
		self.cast = Some(Cast::Value(typ));
		self
	}

	/// Explicit list of allowed values
	pub fn options<V: Into<SettingValue>>(mut self, options: impl IntoIterator<Item = V>) -> Self {
		self.options = Some(options.into_iter().map(Into::into).collect());
		self
	}

	/// Allow storing null (defaults to false)
	pub fn nullable(mut self, nullable: bool) -> Self {
		self.nullable = nullable;
		self
	}

	pub fn build(self) -> StResult<SettingDefinition> {
		if self.name.trim().is_empty() {
			return Err(Error::ConfigError("Setting name must not be empty".into()));
		}

		let def = SettingDefinition {
			name: self.name.into(),
			default: self.default,
			cast: self.cast,
			enum_type: self.enum_type,
			options: self.options,
			nullable: self.nullable,
		};

		if let Some(default) = &def.default
			&& !default.is_null()
			&& !def.accepts(default)
		{
			warn!("Default of setting '{}' is not one of its options", def.name);
		}

		Ok(def)
	}
}

// Scope-capable types //
//*********************//
/// An entity that can own settings
pub trait Settingable: Send + Sync {
	/// Stable type discriminator, stored in `settingable_type`
	fn settingable_type(&self) -> &str;

	fn settingable_id(&self) -> i64;

	fn settings_scope(&self) -> Scope {
		Scope::owner(self.settingable_id(), self.settingable_type())
	}
}

/// Provides the definitions list of a scope-capable type
pub trait HasSettings {
	const SETTINGABLE_TYPE: &'static str;

	fn settings_definitions() -> StResult<Vec<SettingDefinition>>;
}

/// Which definitions table a lookup dispatches to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionScope<'a> {
	Global,
	ScopedTo(&'a str),
}

impl<'a> DefinitionScope<'a> {
	pub fn of(scope: &'a Scope) -> Self {
		match scope.settingable_type() {
			Some(typ) => DefinitionScope::ScopedTo(typ),
			None => DefinitionScope::Global,
		}
	}
}

fn insert_unique(defs: &mut Vec<SettingDefinition>, def: SettingDefinition) -> StResult<()> {
	if defs.iter().any(|d| d.name == def.name) {
		return Err(Error::ConfigError(format!("Setting '{}' is already registered", def.name)));
	}
	defs.push(def);
	Ok(())
}

/// Mutable registry used during initialization
#[derive(Debug, Default)]
pub struct SettingsRegistry {
	global: Vec<SettingDefinition>,
	scoped: HashMap<Box<str>, Vec<SettingDefinition>>,
}

impl SettingsRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a global setting definition
	pub fn register(&mut self, def: SettingDefinition) -> StResult<()> {
		debug!("Registering global setting: {}", def.name);
		insert_unique(&mut self.global, def)
	}

	/// Register one definition for a scope type
	pub fn register_scoped(&mut self, typ: &str, def: SettingDefinition) -> StResult<()> {
		debug!("Registering {} setting: {}", typ, def.name);
		insert_unique(self.scoped.entry(typ.into()).or_default(), def)
	}

	/// Declare a scope type with its definitions list. An empty list still
	/// makes the type a valid scope.
	pub fn register_scope(
		&mut self,
		typ: &str,
		defs: impl IntoIterator<Item = SettingDefinition>,
	) -> StResult<()> {
		self.scoped.entry(typ.into()).or_default();
		for def in defs {
			self.register_scoped(typ, def)?;
		}
		Ok(())
	}

	/// Declare a scope type from its [`HasSettings`] implementation
	pub fn register_type<T: HasSettings>(&mut self) -> StResult<()> {
		self.register_scope(T::SETTINGABLE_TYPE, T::settings_definitions()?)
	}

	/// Freeze the registry (make it immutable)
	pub fn freeze(self) -> FrozenSettingsRegistry {
		info!(
			"Freezing settings registry with {} global definitions and {} scope types",
			self.global.len(),
			self.scoped.len()
		);
		FrozenSettingsRegistry { global: self.global, scoped: self.scoped }
	}

	/// Number of definitions across all tables
	pub fn len(&self) -> usize {
		self.global.len() + self.scoped.values().map(Vec::len).sum::<usize>()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// Immutable registry shared by containers
#[derive(Debug)]
pub struct FrozenSettingsRegistry {
	global: Vec<SettingDefinition>,
	scoped: HashMap<Box<str>, Vec<SettingDefinition>>,
}

impl FrozenSettingsRegistry {
	/// Ordered definitions of a scope.
	/// Fails with `ConfigError` for a scope type that never declared its definitions.
	pub fn definitions(&self, scope: DefinitionScope<'_>) -> StResult<&[SettingDefinition]> {
		match scope {
			DefinitionScope::Global => Ok(&self.global),
			DefinitionScope::ScopedTo(typ) => self.scoped.get(typ).map(Vec::as_slice).ok_or_else(|| {
				Error::ConfigError(format!("{} must define its settings definitions", typ))
			}),
		}
	}

	/// Definition by exact name, absent for unknown names or undeclared scope types
	pub fn definition(&self, scope: DefinitionScope<'_>, name: &str) -> Option<&SettingDefinition> {
		self.definitions(scope).ok()?.iter().find(|def| &*def.name == name)
	}

}

#[cfg(test)]
mod tests {
	use super::*;

	fn def(name: &str) -> SettingDefinition {
		SettingDefinition::builder(name).build().unwrap()
	}

	#[test]
	fn test_duplicate_name_is_rejected() {
		let mut registry = SettingsRegistry::new();
		registry.register(def("max_items")).unwrap();
		assert!(matches!(registry.register(def("max_items")), Err(Error::ConfigError(_))));

		// The same name is fine in another table
		registry.register_scoped("user", def("max_items")).unwrap();
		assert_eq!(registry.len(), 2);
	}

	#[test]
	fn test_empty_name_is_rejected() {
		assert!(matches!(SettingDefinition::builder(" ").build(), Err(Error::ConfigError(_))));
	}

	#[test]
	fn test_lookup_dispatches_by_scope() {
		let mut registry = SettingsRegistry::new();
		registry.register(def("site_name")).unwrap();
		registry.register_scope("user", [def("theme"), def("locale")]).unwrap();
		registry.register_scope("team", Vec::new()).unwrap();
		let registry = registry.freeze();

		assert!(registry.definition(DefinitionScope::Global, "site_name").is_some());
		assert!(registry.definition(DefinitionScope::Global, "theme").is_none());
		assert!(registry.definition(DefinitionScope::ScopedTo("user"), "theme").is_some());

		let names: Vec<_> = registry
			.definitions(DefinitionScope::ScopedTo("user"))
			.unwrap()
			.iter()
			.map(SettingDefinition::name)
			.collect();
		assert_eq!(names, ["theme", "locale"]);

		assert!(registry.definitions(DefinitionScope::ScopedTo("team")).unwrap().is_empty());
		assert!(matches!(
			registry.definitions(DefinitionScope::ScopedTo("invoice")),
			Err(Error::ConfigError(_))
		));
		assert!(registry.definition(DefinitionScope::ScopedTo("invoice"), "theme").is_none());
	}

	#[test]
	fn test_options_prefer_enum_cases() {
		let def = SettingDefinition::builder("size")
			.enumeration(EnumType::unit("Size", ["Small", "Large"]))
			.options(["tiny"])
			.build()
			.unwrap();
		assert_eq!(def.options_list(), vec![SettingValue::from("Small"), SettingValue::from("Large")]);
		assert!(matches!(def.effective_cast().as_deref(), Some(Cast::Enum(_))));
		assert!(def.accepts(&SettingValue::from("Large")));
		assert!(!def.accepts(&SettingValue::from("tiny")));
	}

	#[test]
	fn test_explicit_options_compare_normalized() {
		let def = SettingDefinition::builder("page_size")
			.cast("integer")
			.options(["10", "25", "50"])
			.build()
			.unwrap();
		assert!(def.accepts(&SettingValue::Int(25)));
		assert!(!def.accepts(&SettingValue::Int(30)));

		let open = SettingDefinition::builder("motto").build().unwrap();
		assert!(open.accepts(&SettingValue::from("anything")));
		assert!(open.options_list().is_empty());
	}
}

// vim: ts=4
