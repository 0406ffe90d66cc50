//! CSV work-list loading.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use cidhaul_core::{Cid, find_cids};
use cidhaul_engine::WorkItem;

/// Placeholder values meaning "no identifier available for this row".
const SENTINELS: [&str; 4] = ["See CSV", "On-Chain", "Arweave", "--"];

/// Load work items from a CSV export.
///
/// Each row yields at most one item. The identifier comes from a
/// `cid`/`CID` column, or failing that is extracted from a
/// `metadata_url`/`metadataUrl` field; the display name falls back
/// through `title`, `name`, `filename`. Rows with no usable
/// identifier — empty, sentinel placeholders, unrecognizable values —
/// are dropped here so the engine only ever sees valid work.
pub fn read_work_list(path: &Path) -> Result<Vec<WorkItem>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let headers = reader.headers().context("reading CSV header")?.clone();

    let mut items = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("reading CSV row {}", line + 2))?;
        let field = |names: &[&str]| -> Option<&str> {
            names
                .iter()
                .find_map(|name| {
                    headers
                        .iter()
                        .position(|header| header == *name)
                        .and_then(|i| record.get(i))
                })
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };

        let mut cid = field(&["cid", "CID"])
            .filter(|value| !SENTINELS.contains(value))
            .and_then(|value| Cid::parse(value).ok().or_else(|| find_cids(value).next()));
        if cid.is_none() {
            if let Some(url) = field(&["metadata_url", "metadataUrl"]) {
                cid = find_cids(url).next();
            }
        }
        let Some(cid) = cid else {
            debug!(row = line + 2, "no usable identifier, skipping");
            continue;
        };

        let name = field(&["title", "name", "filename"]).unwrap_or("").to_string();
        items.push(WorkItem { name, cid });
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn v0(fill: &str) -> String {
        format!("Qm{}", fill.repeat(44))
    }

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_direct_cid_column() {
        let a = v0("A");
        let file = write_csv(&format!("title,cid\nGenesis,{a}\n"));
        let items = read_work_list(file.path()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Genesis");
        assert_eq!(items[0].cid.as_str(), a);
    }

    #[test]
    fn falls_back_to_metadata_url() {
        let a = v0("B");
        let file = write_csv(&format!(
            "name,metadata_url\npiece,https://ipfs.io/ipfs/{a}\n"
        ));
        let items = read_work_list(file.path()).unwrap();
        assert_eq!(items[0].cid.as_str(), a);
        assert_eq!(items[0].name, "piece");
    }

    #[test]
    fn sentinel_rows_are_dropped() {
        let a = v0("C");
        let file = write_csv(&format!(
            "cid\nSee CSV\nOn-Chain\nArweave\n--\n\n{a}\n"
        ));
        let items = read_work_list(file.path()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].cid.as_str(), a);
    }

    #[test]
    fn cid_column_tolerates_uri_wrapping() {
        let a = v0("D");
        let file = write_csv(&format!("cid\nipfs://{a}\n"));
        let items = read_work_list(file.path()).unwrap();
        assert_eq!(items[0].cid.as_str(), a);
    }

    #[test]
    fn unrecognizable_rows_are_dropped() {
        let file = write_csv("cid,title\nnot-a-cid,whatever\n");
        assert!(read_work_list(file.path()).unwrap().is_empty());
    }

    #[test]
    fn name_falls_back_through_columns() {
        let a = v0("E");
        let file = write_csv(&format!("filename,cid\nbackup.png,{a}\n"));
        let items = read_work_list(file.path()).unwrap();
        assert_eq!(items[0].name, "backup.png");
    }
}
