//! Zip-code import from CSV.
//!
//! Expects a header row of `name,description,latitude,longitude`.

use std::{io::Read, path::Path};

use anyhow::Context as _;
use haul_store_sqlite::{SqliteGazetteer, ZipCode};

/// Parse every record in `reader`. Fails on the first malformed row.
pub fn read_zip_codes(reader: impl Read) -> csv::Result<Vec<ZipCode>> {
  csv::ReaderBuilder::new()
    .trim(csv::Trim::All)
    .from_reader(reader)
    .deserialize()
    .collect()
}

/// Load the CSV at `path` into `gazetteer`; returns the number of rows.
pub async fn import_zip_codes(
  gazetteer: &SqliteGazetteer,
  path: &Path,
) -> anyhow::Result<usize> {
  let file = std::fs::File::open(path)
    .with_context(|| format!("failed to open {path:?}"))?;
  let zips =
    read_zip_codes(file).with_context(|| format!("failed to parse {path:?}"))?;
  gazetteer
    .upsert_many(zips)
    .await
    .context("failed to write zip codes")
}

#[cfg(test)]
mod tests {
  use haul_core::resolve::PointResolver;

  use super::*;

  const CSV: &str = "\
name,description,latitude,longitude
66619,\"Topeka, KS\",39.0473,-95.6752
80528,\"Fort Collins, CO\",40.4995,-105.0036
";

  #[test]
  fn parses_records() {
    let zips = read_zip_codes(CSV.as_bytes()).unwrap();
    assert_eq!(zips.len(), 2);
    assert_eq!(zips[0].name, "66619");
    assert_eq!(zips[0].description, "Topeka, KS");
    assert_eq!(zips[1].longitude, -105.0036);
  }

  #[test]
  fn bad_coordinate_is_an_error() {
    let csv = "name,description,latitude,longitude\n66619,Topeka,north,-95.6\n";
    assert!(read_zip_codes(csv.as_bytes()).is_err());
  }

  #[tokio::test]
  async fn imports_into_the_gazetteer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("zips.csv");
    std::fs::write(&path, CSV).unwrap();

    let gazetteer = SqliteGazetteer::open_in_memory().await.unwrap();
    assert_eq!(import_zip_codes(&gazetteer, &path).await.unwrap(), 2);
    let place = gazetteer.resolve("80528").await.unwrap().unwrap();
    assert_eq!(place.locality, "Fort Collins, CO");
  }
}
