//! Setting record storage
//!
//! Scope columns are matched with `IS`, so a global lookup binds NULL for both
//! and only ever sees global rows.

use sqlx::SqlitePool;

use scopeset_types::prelude::*;
use scopeset_types::settings_adapter::{CreateSettingData, SettingRow};

use crate::utils::{collect_res, inspect, map_res, setting_from_row};

const COLUMNS: &str = "id, created_at, updated_at, settingable_id, settingable_type, name, value";

/// Read a single setting by scope and name
pub(crate) async fn read(
	db: &SqlitePool,
	scope: &Scope,
	name: &str,
) -> StResult<Option<SettingRow>> {
	let row = sqlx::query(&format!(
		"SELECT {} FROM settings
		WHERE settingable_id IS ? AND settingable_type IS ? AND name = ?",
		COLUMNS
	))
	.bind(scope.settingable_id())
	.bind(scope.settingable_type())
	.bind(name)
	.fetch_optional(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	row.map(|row| map_res(Ok(row), |row| setting_from_row(&row))).transpose()
}

/// List every setting of a scope in insertion order
pub(crate) async fn list(db: &SqlitePool, scope: &Scope) -> StResult<Vec<SettingRow>> {
	let rows = sqlx::query(&format!(
		"SELECT {} FROM settings
		WHERE settingable_id IS ? AND settingable_type IS ?
		ORDER BY id",
		COLUMNS
	))
	.bind(scope.settingable_id())
	.bind(scope.settingable_type())
	.fetch_all(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	collect_res(rows.iter().map(setting_from_row))
}

/// Insert a new setting
pub(crate) async fn create(db: &SqlitePool, data: &CreateSettingData<'_>) -> StResult<SettingRow> {
	let res = sqlx::query(&format!(
		"INSERT INTO settings (settingable_id, settingable_type, name, value)
		VALUES (?, ?, ?, ?)
		RETURNING {}",
		COLUMNS
	))
	.bind(data.scope.settingable_id())
	.bind(data.scope.settingable_type())
	.bind(data.name)
	.bind(data.value)
	.fetch_one(db)
	.await;

	let row = map_res(res, |row| setting_from_row(&row))?;
	debug!("Created setting {} for {} (id {})", row.name, data.scope, row.id);
	Ok(row)
}

/// Replace the value of an existing setting
pub(crate) async fn update(db: &SqlitePool, id: i64, value: Option<&str>) -> StResult<SettingRow> {
	let res = sqlx::query(&format!(
		"UPDATE settings SET value = ?, updated_at = unixepoch()
		WHERE id = ?
		RETURNING {}",
		COLUMNS
	))
	.bind(value)
	.bind(id)
	.fetch_one(db)
	.await;

	map_res(res, |row| setting_from_row(&row))
}

// vim: ts=4
