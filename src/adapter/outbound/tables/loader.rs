use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::application::intelligence::{ArchetypeProfile, BidderProfile, DomainProfile, Tables};
use crate::error::ConfigError;

/// Paths to the three table files, relative to a configured tables directory.
#[derive(Debug, Clone)]
pub struct TableFiles {
    pub bidders: PathBuf,
    pub domains: PathBuf,
    pub archetypes: PathBuf,
}

impl TableFiles {
    /// `bidders.json`, `domains.json`, `archetypes.json` under `dir`.
    #[must_use]
    pub fn under(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            bidders: dir.join("bidders.json"),
            domains: dir.join("domains.json"),
            archetypes: dir.join("archetypes.json"),
        }
    }
}

/// Load all three tables from disk into a [`Tables`] value.
///
/// # Errors
/// Returns [`ConfigError::Read`] if a file is missing/unreadable, or
/// [`ConfigError::InvalidValue`] if its contents don't parse.
pub fn load_tables(files: &TableFiles) -> Result<Tables, ConfigError> {
    let bidders: Vec<BidderProfile> = read_json(&files.bidders)?;
    let domains: Vec<DomainProfile> = read_json(&files.domains)?;
    let archetype_rows: Vec<ArchetypeProfile> = read_json(&files.archetypes)?;

    let mut archetypes = HashMap::with_capacity(archetype_rows.len());
    for row in archetype_rows {
        archetypes.insert(row.platform, row);
    }

    Ok(Tables {
        bidders,
        domains,
        archetypes,
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|e| ConfigError::InvalidValue {
        field: "tables",
        reason: format!("{}: {e}", path.display()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("closeout-tables-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_all_three_tables_from_disk() {
        let dir = std::env::temp_dir().join(format!("closeout-tables-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        write_tmp(
            "bidders.json",
            r#"[{"bidder_id":"b1","total_auctions":10,"avg_bid_increase":12.0,"avg_reaction_time_s":9.0,"win_rate":0.6,"late_bid_ratio":0.3,"aggression_score":4.0,"behavioral_cluster":"aggressive"}]"#,
        );
        write_tmp(
            "domains.json",
            r#"[{"domain":"example.com","avg_final_price":500.0,"volatility":0.2,"p25":400.0,"p50":480.0,"p75":560.0,"p90":650.0,"sample_size":30}]"#,
        );
        write_tmp(
            "archetypes.json",
            r#"[{"platform":"go_daddy","avg_late_bid_ratio":0.5,"avg_bid_jump":80.0,"avg_duration_s":3600.0}]"#,
        );

        let files = TableFiles::under(&dir);
        let tables = load_tables(&files).unwrap();
        assert_eq!(tables.bidders.len(), 1);
        assert_eq!(tables.domains.len(), 1);
        assert_eq!(tables.archetypes.len(), 1);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let files = TableFiles::under("/nonexistent/closeout-tables-dir");
        let err = load_tables(&files).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
