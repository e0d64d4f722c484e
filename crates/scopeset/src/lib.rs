//! Scoped settings store.
//!
//! Settings are declared up front as [`SettingDefinition`]s, either globally or
//! per scope type, and frozen into a [`FrozenSettingsRegistry`]. A
//! [`SettingsContainer`] reads and writes the records of one scope through a
//! [`SettingsAdapter`](scopeset_types::settings_adapter::SettingsAdapter),
//! casting raw storage text to typed [`SettingValue`]s on the way. A
//! [`SettingsAccessor`] owns the container of the current owner and hands out
//! containers for other scopes.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod accessor;
pub mod caster;
pub mod container;
pub mod prelude;
pub mod registry;
pub mod setting;
pub mod value;

pub use crate::accessor::{ScopedSettings, SettingsAccessor};
pub use crate::caster::Cast;
pub use crate::container::SettingsContainer;
pub use crate::registry::{
	DefinitionScope, FrozenSettingsRegistry, HasSettings, SettingDefinition, SettingsRegistry,
	Settingable,
};
pub use crate::setting::Setting;
pub use crate::value::{EnumCase, EnumType, SettingEnum, SettingValue, ValueObject, ValueType};
pub use scopeset_types::{error::Error, types::Scope};

// vim: ts=4
