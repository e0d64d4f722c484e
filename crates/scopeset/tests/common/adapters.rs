//! Test adapter builders
//!
//! Every builder returns the TempDir next to the adapter so the database is
//! removed when the test ends.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

use scopeset_settings_adapter_sqlite::{SettingsAdapterSqlite, SqliteAdapterOpts};
use scopeset_types::error::StResult;
use scopeset_types::settings_adapter::{CreateSettingData, SettingRow, SettingsAdapter};
use scopeset_types::types::Scope;

/// Common test setup helper
pub fn setup_test_logging() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_max_level(tracing::Level::DEBUG)
		.try_init();
}

pub async fn create_test_adapter() -> (Arc<SettingsAdapterSqlite>, TempDir) {
	setup_test_logging();
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let adapter =
		SettingsAdapterSqlite::new(temp_dir.path().join("settings.db"), SqliteAdapterOpts::default())
			.await
			.expect("Failed to create adapter");

	(Arc::new(adapter), temp_dir)
}

/// SQLite adapter that counts storage round-trips
#[derive(Debug)]
pub struct CountingAdapter {
	inner: Arc<SettingsAdapterSqlite>,
	pub reads: AtomicUsize,
	pub lists: AtomicUsize,
	pub writes: AtomicUsize,
}

impl CountingAdapter {
	pub fn new(inner: Arc<SettingsAdapterSqlite>) -> Self {
		Self {
			inner,
			reads: AtomicUsize::new(0),
			lists: AtomicUsize::new(0),
			writes: AtomicUsize::new(0),
		}
	}

	pub fn inner(&self) -> &SettingsAdapterSqlite {
		&self.inner
	}

	pub fn reads(&self) -> usize {
		self.reads.load(Ordering::SeqCst)
	}

	pub fn lists(&self) -> usize {
		self.lists.load(Ordering::SeqCst)
	}

	pub fn writes(&self) -> usize {
		self.writes.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl SettingsAdapter for CountingAdapter {
	async fn read_setting(&self, scope: &Scope, name: &str) -> StResult<Option<SettingRow>> {
		self.reads.fetch_add(1, Ordering::SeqCst);
		self.inner.read_setting(scope, name).await
	}

	async fn list_settings(&self, scope: &Scope) -> StResult<Vec<SettingRow>> {
		self.lists.fetch_add(1, Ordering::SeqCst);
		self.inner.list_settings(scope).await
	}

	async fn create_setting(&self, data: &CreateSettingData<'_>) -> StResult<SettingRow> {
		self.writes.fetch_add(1, Ordering::SeqCst);
		self.inner.create_setting(data).await
	}

	async fn update_setting(&self, id: i64, value: Option<&str>) -> StResult<SettingRow> {
		self.writes.fetch_add(1, Ordering::SeqCst);
		self.inner.update_setting(id, value).await
	}
}

pub async fn create_counting_adapter() -> (Arc<CountingAdapter>, TempDir) {
	let (adapter, temp_dir) = create_test_adapter().await;
	(Arc::new(CountingAdapter::new(adapter)), temp_dir)
}

// vim: ts=4
