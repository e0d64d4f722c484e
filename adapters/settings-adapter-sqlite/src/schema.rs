//! Database schema initialization

use sqlx::SqlitePool;

/// Create the settings table and its indexes
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	// Settings
	//**********
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS settings (
		id integer PRIMARY KEY AUTOINCREMENT,
		created_at integer NOT NULL DEFAULT (unixepoch()),
		updated_at integer NOT NULL DEFAULT (unixepoch()),
		settingable_id integer,
		settingable_type text,
		name text NOT NULL,
		value text
	)",
	)
	.execute(&mut *tx)
	.await?;

	// NULL never equals NULL in a plain unique index, so global rows are keyed on
	// the coalesced columns
	sqlx::query(
		"CREATE UNIQUE INDEX IF NOT EXISTS idx_settings_scope_name
		ON settings(ifnull(settingable_id, 0), ifnull(settingable_type, ''), name)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_settings_scope
		ON settings(settingable_type, settingable_id)",
	)
	.execute(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok(())
}

// vim: ts=4
