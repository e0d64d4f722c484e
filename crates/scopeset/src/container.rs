//! Settings container: validated, cached access to the settings of one scope

use std::fmt::Debug;
use std::sync::Arc;

use scopeset_types::settings_adapter::{CreateSettingData, SettingsAdapter};

use crate::caster::Cast;
use crate::prelude::*;
use crate::registry::{DefinitionScope, FrozenSettingsRegistry, SettingDefinition, Settingable};
use crate::setting::Setting;

/// Read/write facade over the setting records of one scope.
///
/// A container is either unscoped (global settings) or bound to one owner.
/// Caching is on by default: the first read loads every record of the scope
/// and later reads are served from memory until [`clear_cache`](Self::clear_cache).
pub struct SettingsContainer {
	registry: Arc<FrozenSettingsRegistry>,
	adapter: Arc<dyn SettingsAdapter>,
	owner: Option<Arc<dyn Settingable>>,
	scope: Scope,
	global_scoped: bool,
	cached: Option<Vec<Setting>>,
	cached_with_defaults: Option<Vec<Setting>>,
	cache_settings: bool,
}

impl Debug for SettingsContainer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SettingsContainer")
			.field("scope", &self.scope)
			.field("global_scoped", &self.global_scoped)
			.field("cached", &self.cached.as_ref().map(Vec::len))
			.field("cached_with_defaults", &self.cached_with_defaults.as_ref().map(Vec::len))
			.field("cache_settings", &self.cache_settings)
			.finish_non_exhaustive()
	}
}

impl SettingsContainer {
	/// Unscoped container for global settings
	pub fn new(registry: Arc<FrozenSettingsRegistry>, adapter: Arc<dyn SettingsAdapter>) -> Self {
		Self {
			registry,
			adapter,
			owner: None,
			scope: Scope::Global,
			global_scoped: false,
			cached: None,
			cached_with_defaults: None,
			cache_settings: true,
		}
	}

	/// Container bound to `owner`.
	///
	/// `global_scoped` marks a type-wide container registered on an accessor.
	/// Fails with `ConfigError` if the owner's type never declared its definitions.
	pub fn scoped(
		registry: Arc<FrozenSettingsRegistry>,
		adapter: Arc<dyn SettingsAdapter>,
		owner: Arc<dyn Settingable>,
		global_scoped: bool,
	) -> StResult<Self> {
		registry.definitions(DefinitionScope::ScopedTo(owner.settingable_type()))?;
		let scope = owner.settings_scope();

		Ok(Self {
			registry,
			adapter,
			owner: Some(owner),
			scope,
			global_scoped,
			cached: None,
			cached_with_defaults: None,
			cache_settings: true,
		})
	}

	pub fn scope(&self) -> &Scope {
		&self.scope
	}

	pub fn owner(&self) -> Option<&Arc<dyn Settingable>> {
		self.owner.as_ref()
	}

	pub fn is_scoped(&self) -> bool {
		self.owner.is_some()
	}

	pub fn is_global_scoped(&self) -> bool {
		self.global_scoped
	}

	pub fn is_caching(&self) -> bool {
		self.cache_settings
	}

	pub fn registry(&self) -> &Arc<FrozenSettingsRegistry> {
		&self.registry
	}

	fn definition_scope(&self) -> DefinitionScope<'_> {
		DefinitionScope::of(&self.scope)
	}

	/// Definitions of this container's scope
	pub fn definitions(&self) -> StResult<&[SettingDefinition]> {
		self.registry.definitions(self.definition_scope())
	}

	pub fn definition(&self, name: impl AsRef<str>) -> Option<&SettingDefinition> {
		self.registry.definition(self.definition_scope(), name.as_ref())
	}

	fn require_definition(&self, name: &str) -> StResult<()> {
		if self.definition(name).is_some() {
			return Ok(());
		}
		Err(Error::NameError(match self.scope.settingable_type() {
			Some(typ) => format!("{} setting definition does not exist for \"{}\"", typ, name),
			None => format!("Global setting definition does not exist for \"{}\"", name),
		}))
	}

	pub fn is_valid_setting_name(&self, name: impl AsRef<str>) -> bool {
		self.definition(name).is_some()
	}

	/// Null is valid only for nullable definitions. Other values must match one of
	/// the declared options, if there are any; an undefined name declares none.
	pub fn is_valid_setting_value(&self, name: impl AsRef<str>, value: &SettingValue) -> bool {
		match self.definition(name) {
			None => !value.is_null(),
			Some(def) if value.is_null() => def.is_nullable(),
			Some(def) => def.accepts(value),
		}
	}

	pub fn setting_options(&self, name: impl AsRef<str>) -> Vec<SettingValue> {
		self.definition(name).map(SettingDefinition::options_list).unwrap_or_default()
	}

	/// Load every record of the scope into the cache, unless already loaded
	async fn load(&mut self) -> StResult<&mut Vec<Setting>> {
		let settings = match self.cached.take() {
			Some(settings) => {
				debug!("Settings cache hit: {}", self.scope);
				settings
			}
			None => {
				let settings: Vec<Setting> =
					self.adapter.list_settings(&self.scope).await?.into_iter().map(Setting::from).collect();
				debug!("Loaded {} settings for {}", settings.len(), self.scope);
				settings
			}
		};
		Ok(self.cached.insert(settings))
	}

	/// The stored record for `name`, if any
	pub async fn setting(&mut self, name: impl AsRef<str>) -> StResult<Option<Setting>> {
		let name = name.as_ref();
		self.require_definition(name)?;

		if self.cache_settings {
			return Ok(self.load().await?.iter().find(|s| s.name() == name).cloned());
		}

		debug!("Reading setting {} for {}", name, self.scope);
		Ok(self.adapter.read_setting(&self.scope, name).await?.map(Setting::from))
	}

	/// Decoded value of `name`, falling back to the definition default
	pub async fn get(&mut self, name: impl AsRef<str>) -> StResult<SettingValue> {
		self.resolve(name.as_ref(), None, true).await
	}

	/// Like [`get`](Self::get), but without a record the definition default is
	/// returned as declared instead of being built into a value object
	pub async fn get_raw_default(&mut self, name: impl AsRef<str>) -> StResult<SettingValue> {
		self.resolve(name.as_ref(), None, false).await
	}

	/// Decoded value of `name`, falling back to `default` when nothing is stored
	pub async fn get_or(
		&mut self,
		name: impl AsRef<str>,
		default: impl Into<SettingValue>,
	) -> StResult<SettingValue> {
		self.resolve(name.as_ref(), Some(default.into()), true).await
	}

	async fn resolve(
		&mut self,
		name: &str,
		default: Option<SettingValue>,
		build_default: bool,
	) -> StResult<SettingValue> {
		let registry = Arc::clone(&self.registry);

		if let Some(setting) = self.setting(name).await? {
			return setting.value(&registry);
		}
		if let Some(default) = default {
			return Ok(default);
		}

		let Some(def) = registry.definition(self.definition_scope(), name) else {
			return Ok(SettingValue::Null);
		};
		if build_default && matches!(def.effective_cast().as_deref(), Some(Cast::Value(_))) {
			// Value objects are always built, even from a missing default
			return Setting::synthetic(&self.scope, def, &registry)?.value(&registry);
		}
		Ok(def.default_value().cloned().unwrap_or(SettingValue::Null))
	}

	/// Validate, encode and persist a value
	pub async fn set(
		&mut self,
		name: impl AsRef<str>,
		value: impl Into<SettingValue>,
	) -> StResult<Setting> {
		let name = name.as_ref();
		let value = value.into();
		self.require_definition(name)?;
		if !self.is_valid_setting_value(name, &value) {
			return Err(Error::ValidationError(format!("Invalid setting value for \"{}\"", name)));
		}

		let registry = Arc::clone(&self.registry);
		let existing = self.setting(name).await?;

		let setting = match existing.and_then(|s| s.id().map(|id| (id, s))) {
			Some((id, mut setting)) => {
				let raw = setting.set_value(&registry, &value)?.map(str::to_string);
				let row = self.adapter.update_setting(id, raw.as_deref()).await?;
				setting.apply_row(row);

				if let Some(cached) = self.cached.as_mut()
					&& let Some(entry) = cached.iter_mut().find(|s| s.id() == Some(id))
				{
					*entry = setting.clone();
				}
				setting
			}
			None => {
				let mut setting = Setting::new(&self.scope, name);
				let raw = setting.set_value(&registry, &value)?.map(str::to_string);
				let row = self
					.adapter
					.create_setting(&CreateSettingData { scope: &self.scope, name, value: raw.as_deref() })
					.await?;
				let setting = Setting::from(row);

				if self.cache_settings
					&& let Some(cached) = self.cached.as_mut()
				{
					cached.push(setting.clone());
				}
				setting
			}
		};

		self.cached_with_defaults = None;
		info!("Setting {} updated for {}", name, self.scope);
		Ok(setting)
	}

	/// Every stored record of the scope
	pub async fn all(&mut self) -> StResult<Vec<Setting>> {
		if self.cache_settings {
			return Ok(self.load().await?.clone());
		}

		debug!("Listing settings for {}", self.scope);
		Ok(self.adapter.list_settings(&self.scope).await?.into_iter().map(Setting::from).collect())
	}

	/// Stored records plus one unsaved record per definition that has none
	pub async fn all_with_defaults(&mut self) -> StResult<Vec<Setting>> {
		if self.cache_settings
			&& let Some(cached) = &self.cached_with_defaults
		{
			return Ok(cached.clone());
		}

		let registry = Arc::clone(&self.registry);
		let mut settings = self.all().await?;
		for def in registry.definitions(self.definition_scope())? {
			if settings.iter().any(|s| s.name() == def.name()) {
				continue;
			}
			settings.push(Setting::synthetic(&self.scope, def, &registry)?);
		}

		if self.cache_settings {
			self.cached_with_defaults = Some(settings.clone());
		}
		Ok(settings)
	}

	/// Drop both caches
	pub fn clear_cache(&mut self) {
		self.cached = None;
		self.cached_with_defaults = None;
	}

	/// Enable caching (the default)
	pub fn cache(&mut self) -> &mut Self {
		self.cache_settings = true;
		self
	}

	/// Disable caching; every read goes to storage
	pub fn no_cache(&mut self) -> &mut Self {
		self.cache_settings = false;
		self
	}

	/// Whether this container is bound to this exact owner instance
	pub fn is_scoped_to(&self, owner: &Arc<dyn Settingable>) -> bool {
		self.owner.as_ref().is_some_and(|own| std::ptr::addr_eq(Arc::as_ptr(own), Arc::as_ptr(owner)))
	}
}

// vim: ts=4
