//! SQLite storage adapter for scopeset settings.
//!
//! Stores every setting record in a single `settings` table keyed by
//! `(settingable_id, settingable_type, name)`. Global settings keep both scope
//! columns NULL.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

mod schema;
mod setting;
mod utils;

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;

use scopeset_types::prelude::*;
use scopeset_types::settings_adapter::{CreateSettingData, SettingRow, SettingsAdapter};

use crate::schema::init_db;

/// Connection pool options
#[derive(Debug, Clone)]
pub struct SqliteAdapterOpts {
	pub max_connections: u32,
	/// Use write-ahead logging
	pub wal: bool,
}

impl Default for SqliteAdapterOpts {
	fn default() -> Self {
		Self { max_connections: 5, wal: true }
	}
}

#[derive(Debug)]
pub struct SettingsAdapterSqlite {
	db: SqlitePool,
}

impl SettingsAdapterSqlite {
	/// Open (or create) the database file at `path` and make sure the schema exists
	pub async fn new(path: impl AsRef<Path>, opts: SqliteAdapterOpts) -> StResult<Self> {
		let journal_mode = if opts.wal {
			sqlite::SqliteJournalMode::Wal
		} else {
			sqlite::SqliteJournalMode::Delete
		};
		let conn_opts = sqlite::SqliteConnectOptions::new()
			.filename(path.as_ref())
			.create_if_missing(true)
			.journal_mode(journal_mode);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(opts.max_connections)
			.connect_with(conn_opts)
			.await
			.inspect_err(|err| error!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		init_db(&db)
			.await
			.inspect_err(|err| error!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		info!("Settings database opened at {}", path.as_ref().display());
		Ok(Self { db })
	}
}

#[async_trait]
impl SettingsAdapter for SettingsAdapterSqlite {
	async fn read_setting(&self, scope: &Scope, name: &str) -> StResult<Option<SettingRow>> {
		setting::read(&self.db, scope, name).await
	}

	async fn list_settings(&self, scope: &Scope) -> StResult<Vec<SettingRow>> {
		setting::list(&self.db, scope).await
	}

	async fn create_setting(&self, data: &CreateSettingData<'_>) -> StResult<SettingRow> {
		setting::create(&self.db, data).await
	}

	async fn update_setting(&self, id: i64, value: Option<&str>) -> StResult<SettingRow> {
		setting::update(&self.db, id, value).await
	}
}

// vim: ts=4
