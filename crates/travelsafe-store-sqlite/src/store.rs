//! [`SqliteStore`]: the SQLite implementation of [`IncidentStore`].

use std::{path::Path, time::Duration};

use chrono::Utc;
use travelsafe_core::{
  incident::{IncidentId, IncidentRecord, NewIncident, ScannedIncident},
  location::BoundingBox,
  store::IncidentStore,
};

use crate::{
  Error, Result,
  encode::{INCIDENT_COLUMNS, RawIncident, encode_dt},
  schema::SCHEMA,
};

/// Upper bound on any single store call unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Store ───────────────────────────────────────────────────────────────────

/// An incident log backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
  timeout:         Duration,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, timeout: DEFAULT_TIMEOUT };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, timeout: DEFAULT_TIMEOUT };
    store.init_schema().await?;
    Ok(store)
  }

  /// Replace the per-call timeout.
  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
  }

  /// Run `f` on the connection thread, giving up after the configured
  /// timeout.
  ///
  /// A timed-out write may still commit once the connection thread gets to
  /// it; it is never partially applied.
  async fn call<F, R>(&self, f: F) -> Result<R>
  where
    F: FnOnce(&mut rusqlite::Connection) -> tokio_rusqlite::Result<R>
      + Send
      + 'static,
    R: Send + 'static,
  {
    match tokio::time::timeout(self.timeout, self.conn.call(f)).await {
      Ok(result) => Ok(result?),
      Err(_) => Err(Error::Timeout(self.timeout)),
    }
  }

  async fn select(
    &self,
    where_clause: &'static str,
    bbox: Option<BoundingBox>,
  ) -> Result<Vec<ScannedIncident>> {
    let raws: Vec<RawIncident> = self
      .call(move |conn| {
        let sql = format!(
          "SELECT {INCIDENT_COLUMNS} FROM incidents {where_clause} ORDER BY id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = match bbox {
          Some(b) => stmt
            .query_map(
              rusqlite::params![
                b.min_latitude,
                b.max_latitude,
                b.min_longitude,
                b.max_longitude,
              ],
              RawIncident::from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], RawIncident::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawIncident::into_scanned).collect())
  }
}

// ─── IncidentStore impl ──────────────────────────────────────────────────────

impl IncidentStore for SqliteStore {
  type Error = Error;

  async fn append(&self, input: NewIncident) -> Result<IncidentRecord> {
    let reported_at = Utc::now();

    let latitude        = input.location.latitude;
    let longitude       = input.location.longitude;
    let incident_type   = input.incident_type.clone();
    let description     = input.description.clone();
    let reported_at_str = encode_dt(reported_at);

    let id = self
      .call(move |conn| {
        conn.execute(
          "INSERT INTO incidents (
             latitude, longitude, incident_type, description, reported_at, verified
           ) VALUES (?1, ?2, ?3, ?4, ?5, 0)",
          rusqlite::params![
            latitude,
            longitude,
            incident_type,
            description,
            reported_at_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(IncidentRecord {
      id: IncidentId(id),
      latitude,
      longitude,
      incident_type: input.incident_type,
      description: input.description,
      reported_at,
      verified: false,
    })
  }

  async fn query_all(&self) -> Result<Vec<ScannedIncident>> {
    self.select("", None).await
  }

  async fn query_region(&self, bbox: BoundingBox) -> Result<Vec<ScannedIncident>> {
    // Rows that can't be placed are returned too, so the caller counts them
    // as malformed on this path exactly as on a full scan.
    self
      .select(
        "WHERE (latitude BETWEEN ?1 AND ?2 AND longitude BETWEEN ?3 AND ?4)
            OR latitude IS NULL
            OR longitude IS NULL
            OR latitude NOT BETWEEN -90 AND 90
            OR longitude NOT BETWEEN -180 AND 180",
        Some(bbox),
      )
      .await
  }

  async fn count(&self) -> Result<u64> {
    let n: i64 = self
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM incidents", [], |row| row.get(0))?)
      })
      .await?;
    Ok(n as u64)
  }
}
