//! [`SqliteGazetteer`]: the SQLite implementation of [`PointResolver`].

use std::path::Path;

use haul_core::{
  geo::{Place, Point},
  resolve::PointResolver,
};
use rusqlite::OptionalExtension as _;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, schema::SCHEMA};

/// One row of the gazetteer; also the shape of an import CSV record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZipCode {
  pub name:        String,
  pub description: String,
  pub latitude:    f64,
  pub longitude:   f64,
}

impl ZipCode {
  fn validate(&self) -> Result<()> {
    let in_range = (-90.0..=90.0).contains(&self.latitude)
      && (-180.0..=180.0).contains(&self.longitude);
    if in_range {
      Ok(())
    } else {
      Err(Error::InvalidCoordinates {
        name:      self.name.clone(),
        latitude:  self.latitude,
        longitude: self.longitude,
      })
    }
  }

  fn into_place(self) -> Place {
    Place {
      point:    Point::new(self.latitude, self.longitude),
      locality: self.description,
    }
  }
}

// ─── Gazetteer ───────────────────────────────────────────────────────────────

/// Zip-code lookups backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteGazetteer {
  conn: tokio_rusqlite::Connection,
}

impl SqliteGazetteer {
  /// Open (or create) a gazetteer at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let gazetteer = Self { conn };
    gazetteer.init_schema().await?;
    Ok(gazetteer)
  }

  /// Open an in-memory gazetteer — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let gazetteer = Self { conn };
    gazetteer.init_schema().await?;
    Ok(gazetteer)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert or replace a single zip code.
  pub async fn upsert(&self, zip: ZipCode) -> Result<()> {
    self.upsert_many(vec![zip]).await.map(|_| ())
  }

  /// Insert or replace `zips` in one transaction. Nothing is written if any
  /// record carries out-of-range coordinates. Returns the number written.
  pub async fn upsert_many(&self, zips: Vec<ZipCode>) -> Result<usize> {
    zips.iter().try_for_each(ZipCode::validate)?;

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO zip_codes (name, description, latitude, longitude)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(name) DO UPDATE SET
               description = excluded.description,
               latitude    = excluded.latitude,
               longitude   = excluded.longitude",
          )?;
          for zip in &zips {
            stmt.execute(rusqlite::params![
              zip.name,
              zip.description,
              zip.latitude,
              zip.longitude
            ])?;
          }
        }
        tx.commit()?;
        Ok(zips.len())
      })
      .await?;

    tracing::info!(written, "imported zip codes");
    Ok(written)
  }

  /// Look up a zip code by name.
  pub async fn get(&self, name: &str) -> Result<Option<ZipCode>> {
    let name = name.trim().to_owned();
    let zip = self
      .conn
      .call(move |conn| {
        let zip = conn
          .query_row(
            "SELECT name, description, latitude, longitude
             FROM zip_codes WHERE name = ?1",
            rusqlite::params![name],
            |r| {
              Ok(ZipCode {
                name:        r.get(0)?,
                description: r.get(1)?,
                latitude:    r.get(2)?,
                longitude:   r.get(3)?,
              })
            },
          )
          .optional()?;
        Ok(zip)
      })
      .await?;
    Ok(zip)
  }

  /// Number of zip codes on file.
  pub async fn count(&self) -> Result<usize> {
    let count: i64 = self
      .conn
      .call(|conn| {
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM zip_codes", [], |r| r.get(0))?;
        Ok(n)
      })
      .await?;
    Ok(count as usize)
  }
}

impl PointResolver for SqliteGazetteer {
  type Error = Error;

  async fn resolve<'a>(&'a self, code: &'a str) -> Result<Option<Place>> {
    Ok(self.get(code).await?.map(ZipCode::into_place))
  }
}
