//! Row mapping and error translation helpers

use sqlx::{Row, sqlite::SqliteRow};

use scopeset_types::prelude::*;
use scopeset_types::settings_adapter::SettingRow;

pub(crate) fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

/// Map a single-row query result, translating SQL errors to StResult
pub(crate) fn map_res<T, F>(row: Result<SqliteRow, sqlx::Error>, f: F) -> StResult<T>
where
	F: FnOnce(SqliteRow) -> Result<T, sqlx::Error>,
{
	match row {
		Ok(row) => f(row).inspect_err(inspect).map_err(|_| Error::DbError),
		Err(sqlx::Error::RowNotFound) => Err(Error::NotFound),
		Err(err) => {
			inspect(&err);
			Err(Error::DbError)
		}
	}
}

/// Collect mapped rows, failing on the first bad one
pub(crate) fn collect_res<T>(
	iter: impl Iterator<Item = Result<T, sqlx::Error>>,
) -> StResult<Vec<T>> {
	iter.map(|item| item.inspect_err(inspect).map_err(|_| Error::DbError)).collect()
}

pub(crate) fn setting_from_row(row: &SqliteRow) -> Result<SettingRow, sqlx::Error> {
	let settingable_type: Option<String> = row.try_get("settingable_type")?;
	let name: String = row.try_get("name")?;
	Ok(SettingRow {
		id: row.try_get("id")?,
		created_at: Timestamp(row.try_get("created_at")?),
		updated_at: Timestamp(row.try_get("updated_at")?),
		settingable_id: row.try_get("settingable_id")?,
		settingable_type: settingable_type.map(Into::into),
		name: name.into(),
		value: row.try_get("value")?,
	})
}

// vim: ts=4
