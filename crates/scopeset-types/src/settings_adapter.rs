//! Adapter that persists setting records.
//!
//! Records live in one table keyed by `(settingable_id, settingable_type, name)`.
//! Implementations must enforce uniqueness of that triple.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::prelude::*;

/// Persisted setting row, exactly as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingRow {
	pub id: i64,
	pub created_at: Timestamp,
	pub updated_at: Timestamp,
	pub settingable_id: Option<i64>,
	pub settingable_type: Option<Box<str>>,
	pub name: Box<str>,
	pub value: Option<String>,
}

/// Data for inserting a new setting row
#[derive(Debug)]
pub struct CreateSettingData<'a> {
	pub scope: &'a Scope,
	pub name: &'a str,
	pub value: Option<&'a str>,
}

#[async_trait]
pub trait SettingsAdapter: Debug + Send + Sync {
	/// Point lookup on the exact `(scope, name)` triple.
	/// A `Scope::Global` lookup only matches rows with NULL scope columns.
	async fn read_setting(&self, scope: &Scope, name: &str) -> StResult<Option<SettingRow>>;

	/// All rows stored for the exact scope, in insertion order
	async fn list_settings(&self, scope: &Scope) -> StResult<Vec<SettingRow>>;

	/// Insert a row and return it with its generated id and timestamps
	async fn create_setting(&self, data: &CreateSettingData<'_>) -> StResult<SettingRow>;

	/// Replace the raw value of an existing row.
	/// Returns `Error::NotFound` if no row has the given id.
	async fn update_setting(&self, id: i64, value: Option<&str>) -> StResult<SettingRow>;
}

// vim: ts=4
