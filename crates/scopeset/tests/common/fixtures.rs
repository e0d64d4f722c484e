//! Reusable test fixtures
//!
//! Owner types, an enumerated setting type, a value object and the registry
//! every container test runs against.

use serde_json::{Map, Value};
use std::sync::Arc;

use scopeset::{
	EnumType, FrozenSettingsRegistry, HasSettings, SettingDefinition, SettingEnum, Settingable,
	SettingsRegistry, ValueObject, ValueType,
};
use scopeset_types::error::StResult;

// Owners //
//********//
#[derive(Debug)]
pub struct User {
	pub id: i64,
}

impl Settingable for User {
	fn settingable_type(&self) -> &str {
		Self::SETTINGABLE_TYPE
	}

	fn settingable_id(&self) -> i64 {
		self.id
	}
}

impl HasSettings for User {
	const SETTINGABLE_TYPE: &'static str = "app::models::User";

	fn settings_definitions() -> StResult<Vec<SettingDefinition>> {
		Ok(vec![
			SettingDefinition::builder("theme")
				.enumeration(EnumType::of::<Theme>())
				.default(Theme::Light.to_setting_value())
				.build()?,
			SettingDefinition::builder("locale").cast("string").default("en").build()?,
			SettingDefinition::builder("notifications")
				.value_type(ValueType::of::<Notifications>())
				.build()?,
			SettingDefinition::builder("nickname").nullable(true).build()?,
		])
	}
}

#[derive(Debug)]
pub struct Team {
	pub id: i64,
}

impl Settingable for Team {
	fn settingable_type(&self) -> &str {
		Self::SETTINGABLE_TYPE
	}

	fn settingable_id(&self) -> i64 {
		self.id
	}
}

impl HasSettings for Team {
	const SETTINGABLE_TYPE: &'static str = "app::models::Team";

	fn settings_definitions() -> StResult<Vec<SettingDefinition>> {
		Ok(vec![SettingDefinition::builder("color").default("blue").build()?])
	}
}

/// Owner type that never declared its settings
#[derive(Debug)]
pub struct Invoice {
	pub id: i64,
}

impl Settingable for Invoice {
	fn settingable_type(&self) -> &str {
		"app::models::Invoice"
	}

	fn settingable_id(&self) -> i64 {
		self.id
	}
}

pub fn user(id: i64) -> Arc<dyn Settingable> {
	Arc::new(User { id })
}

pub fn team(id: i64) -> Arc<dyn Settingable> {
	Arc::new(Team { id })
}

// Setting types //
//***************//
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Theme {
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

#[derive(Debug, PartialEq)]
pub struct Notifications {
	pub email: bool,
	pub digest: String,
}

impl ValueObject for Notifications {
	const NAME: &'static str = "Notifications";

	fn from_record(record: &Map<String, Value>) -> Self {
		Self {
			email: record.get("email").and_then(Value::as_bool).unwrap_or(true),
			digest: record.get("digest").and_then(Value::as_str).unwrap_or("weekly").to_string(),
		}
	}

	fn to_record(&self) -> Map<String, Value> {
		let mut record = Map::new();
		record.insert("email".into(), Value::Bool(self.email));
		record.insert("digest".into(), Value::String(self.digest.clone()));
		record
	}
}

/// Global setting names
#[derive(Clone, Copy, Debug)]
pub enum GlobalSetting {
	MaxItems,
	SiteName,
}

impl AsRef<str> for GlobalSetting {
	fn as_ref(&self) -> &str {
		match self {
			GlobalSetting::MaxItems => "max_items",
			GlobalSetting::SiteName => "site_name",
		}
	}
}

pub fn test_registry() -> Arc<FrozenSettingsRegistry> {
	let mut registry = SettingsRegistry::new();
	let global = [
		SettingDefinition::builder(GlobalSetting::MaxItems).cast("integer").default(10),
		SettingDefinition::builder(GlobalSetting::SiteName).cast("string").default("Scopeset"),
		SettingDefinition::builder("price").cast("decimal:2"),
		SettingDefinition::builder("maintenance").cast("boolean").default(false),
		SettingDefinition::builder("tags").cast("array").default(Value::Array(vec![])),
		SettingDefinition::builder("launch_date").cast("date").nullable(true),
		SettingDefinition::builder("page_size").cast("integer").options(["10", "25", "50"]).default(25),
		SettingDefinition::builder("motto").nullable(true),
	];
	for def in global {
		registry.register(def.build().expect("valid definition")).expect("unique name");
	}
	registry.register_type::<User>().expect("user settings");
	registry.register_type::<Team>().expect("team settings");

	Arc::new(registry.freeze())
}

// vim: ts=4
