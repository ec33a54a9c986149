//! A [`TrackingSource`] backed by a directory of saved Track replies.
//!
//! Each reply lives at `{dir}/{package_identifier}.json`. This is how the
//! server runs without carrier credentials, and how replies captured from
//! the live service are replayed.

use std::path::{Path, PathBuf};

use haul_core::tracking::{Shipment, TrackingSource};

use crate::{
  decode::decode_str,
  error::{Error, Result},
};

#[derive(Debug, Clone)]
pub struct ReplyArchive {
  dir: PathBuf,
}

impl ReplyArchive {
  pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

  pub fn dir(&self) -> &Path { &self.dir }

  /// Path of the reply for `package_identifier`. Identifiers are
  /// alphanumeric, which also keeps lookups inside `dir`.
  fn reply_path(&self, package_identifier: &str) -> Result<PathBuf> {
    if package_identifier.is_empty()
      || !package_identifier.chars().all(|c| c.is_ascii_alphanumeric())
    {
      return Err(Error::InvalidIdentifier(package_identifier.to_owned()));
    }
    Ok(self.dir.join(format!("{package_identifier}.json")))
  }

  async fn lookup(&self, package_identifier: &str) -> Result<Shipment> {
    let path = self.reply_path(package_identifier)?;
    let reply = match tokio::fs::read_to_string(&path).await {
      Ok(reply) => reply,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        return Err(Error::Failure {
          package_identifier: package_identifier.to_owned(),
          message:            "no reply on file".to_owned(),
        });
      }
      Err(source) => return Err(Error::Io { path, source }),
    };

    tracing::debug!(package_identifier, path = %path.display(), "loaded reply");
    Ok(decode_str(package_identifier, &reply)?.into_shipment())
  }
}

impl TrackingSource for ReplyArchive {
  type Error = Error;

  async fn track<'a>(&'a self, package_identifier: &'a str) -> Result<Shipment> {
    self.lookup(package_identifier).await
  }
}
