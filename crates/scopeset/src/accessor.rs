//! Settings accessor: entry point owning the ambient container and the
//! type-wide containers registered per scope type

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use scopeset_types::settings_adapter::SettingsAdapter;

use crate::container::SettingsContainer;
use crate::prelude::*;
use crate::registry::{FrozenSettingsRegistry, Settingable};

/// Container handed out by [`SettingsAccessor::scope`]
#[derive(Debug)]
pub enum ScopedSettings<'a> {
	/// A type-wide container held by the accessor, registered or ambient
	Registered(&'a mut SettingsContainer),
	/// A container created for this call only
	Fresh(SettingsContainer),
}

impl ScopedSettings<'_> {
	pub fn is_registered(&self) -> bool {
		matches!(self, ScopedSettings::Registered(_))
	}
}

impl Deref for ScopedSettings<'_> {
	type Target = SettingsContainer;

	fn deref(&self) -> &SettingsContainer {
		match self {
			ScopedSettings::Registered(container) => container,
			ScopedSettings::Fresh(container) => container,
		}
	}
}

impl DerefMut for ScopedSettings<'_> {
	fn deref_mut(&mut self) -> &mut SettingsContainer {
		match self {
			ScopedSettings::Registered(container) => container,
			ScopedSettings::Fresh(container) => container,
		}
	}
}

/// Per-request entry point.
///
/// Derefs to the ambient container: bound type-wide to the current owner when
/// one is supplied at construction, unscoped otherwise.
#[derive(Debug)]
pub struct SettingsAccessor {
	registry: Arc<FrozenSettingsRegistry>,
	adapter: Arc<dyn SettingsAdapter>,
	settings: SettingsContainer,
	global: Option<SettingsContainer>,
	scoped_settings: HashMap<Box<str>, SettingsContainer>,
}

/// Last segment of a type discriminator, e.g. `App\Models\User` → `User`
fn short_type_name(typ: &str) -> &str {
	typ.rsplit([':', '\\', '.', '/']).find(|s| !s.is_empty()).unwrap_or(typ)
}

impl SettingsAccessor {
	pub fn new(
		registry: Arc<FrozenSettingsRegistry>,
		adapter: Arc<dyn SettingsAdapter>,
		current: Option<Arc<dyn Settingable>>,
	) -> StResult<Self> {
		let settings = match current {
			Some(owner) => {
				debug!("Settings accessor bound to {}", owner.settings_scope());
				SettingsContainer::scoped(Arc::clone(&registry), Arc::clone(&adapter), owner, true)?
			}
			None => SettingsContainer::new(Arc::clone(&registry), Arc::clone(&adapter)),
		};

		Ok(Self { registry, adapter, settings, global: None, scoped_settings: HashMap::new() })
	}

	/// The ambient container
	pub fn settings(&mut self) -> &mut SettingsContainer {
		&mut self.settings
	}

	/// Unscoped container for global settings.
	/// This is the ambient container itself when there is no current owner.
	pub fn global(&mut self) -> &mut SettingsContainer {
		if !self.settings.is_scoped() {
			return &mut self.settings;
		}
		self.global
			.get_or_insert_with(|| SettingsContainer::new(Arc::clone(&self.registry), Arc::clone(&self.adapter)))
	}

	/// Settings of `owner`: the registered type-wide container (or the ambient
	/// one) when it is bound to this exact owner, otherwise a fresh
	/// instance-scoped container
	pub fn scope(&mut self, owner: &Arc<dyn Settingable>) -> StResult<ScopedSettings<'_>> {
		let typ = owner.settingable_type();
		let registered =
			self.scoped_settings.get(typ).is_some_and(|container| container.is_scoped_to(owner));
		if registered && let Some(container) = self.scoped_settings.get_mut(typ) {
			return Ok(ScopedSettings::Registered(container));
		}
		if self.settings.is_global_scoped() && self.settings.is_scoped_to(owner) {
			return Ok(ScopedSettings::Registered(&mut self.settings));
		}

		Ok(ScopedSettings::Fresh(SettingsContainer::scoped(
			Arc::clone(&self.registry),
			Arc::clone(&self.adapter),
			Arc::clone(owner),
			false,
		)?))
	}

	/// Create and register the type-wide container for `owner`'s type,
	/// replacing any container registered for that type before
	pub fn scope_global(&mut self, owner: Arc<dyn Settingable>) -> StResult<&mut SettingsContainer> {
		let typ: Box<str> = owner.settingable_type().into();
		let container = SettingsContainer::scoped(
			Arc::clone(&self.registry),
			Arc::clone(&self.adapter),
			owner,
			true,
		)?;
		debug!("Registering {} settings for {}", typ, container.scope());

		Ok(self.scoped_settings.entry(typ).insert_entry(container).into_mut())
	}

	/// Resolve a scope by its short type name (case-insensitive) among the
	/// registered containers and then the ambient one, falling back to
	/// [`scope`](Self::scope) when an owner is given
	pub fn scoped(
		&mut self,
		name: &str,
		owner: Option<&Arc<dyn Settingable>>,
	) -> StResult<ScopedSettings<'_>> {
		let typ = self
			.scoped_settings
			.keys()
			.find(|typ| short_type_name(typ).eq_ignore_ascii_case(name))
			.cloned();
		if let Some(typ) = typ {
			return self
				.scoped_settings
				.get_mut(&typ)
				.map(ScopedSettings::Registered)
				.ok_or_else(|| not_initialized(name));
		}

		let ambient = self.settings.is_global_scoped()
			&& self
				.settings
				.scope()
				.settingable_type()
				.is_some_and(|typ| short_type_name(typ).eq_ignore_ascii_case(name));
		if ambient {
			return Ok(ScopedSettings::Registered(&mut self.settings));
		}

		match owner {
			Some(owner) => self.scope(owner),
			None => Err(not_initialized(name)),
		}
	}
}

fn not_initialized(name: &str) -> Error {
	Error::ScopeNotInitialized(format!("Tried to access scope '{}' which isn't initialized", name))
}

impl Deref for SettingsAccessor {
	type Target = SettingsContainer;

	fn deref(&self) -> &SettingsContainer {
		&self.settings
	}
}

impl DerefMut for SettingsAccessor {
	fn deref_mut(&mut self) -> &mut SettingsContainer {
		&mut self.settings
	}
}


// vim: ts=4
