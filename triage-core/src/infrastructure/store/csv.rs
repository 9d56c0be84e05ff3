// triage-core/src/infrastructure/store/csv.rs
//
// Reader/writer for the on-disk findings format: one CSV file per report
// table, all files of one analysis run in a single directory.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;
use walkdir::WalkDir;

use crate::domain::report::Finding;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;

/// Issue codes come out of the analysis pipeline as goal codes
/// (`g2-013`); anything else is accepted but flagged, it usually means a
/// hand-edited row.
#[allow(clippy::unwrap_used)] // literal pattern
static GOAL_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^g\d-\d{3}$").unwrap());

/// One report file: its file name (the key used when writing back) and
/// its findings in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFile {
    pub name: String,
    pub findings: Vec<Finding>,
}

/// The `*.csv` files directly inside a report directory, sorted by name.
pub fn report_paths(dir: &Path) -> Result<Vec<PathBuf>, InfrastructureError> {
    let mut paths = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            InfrastructureError::Io(e.into_io_error().unwrap_or_else(|| {
                std::io::Error::other(format!("unreadable entry in {}", dir.display()))
            }))
        })?;
        let path = entry.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if entry.file_type().is_file() && is_csv {
            paths.push(path.to_path_buf());
        }
    }

    Ok(paths)
}

/// Parse one report file. Any malformed row (including a non-numeric
/// tracker id) fails the whole file, carrying the path for the operator.
pub fn read_report(path: &Path) -> Result<ReportFile, InfrastructureError> {
    let wrap = |source: csv::Error| InfrastructureError::Report {
        path: path.display().to_string(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(wrap)?;
    let mut findings = Vec::new();

    for row in reader.deserialize::<Finding>() {
        let finding = row.map_err(wrap)?;
        if !finding.issue_code.is_empty() && !GOAL_CODE.is_match(&finding.issue_code) {
            warn!(
                path = %path.display(),
                issue_code = %finding.issue_code,
                "issue code does not look like a goal code"
            );
        }
        findings.push(finding);
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(ReportFile { name, findings })
}

/// Read every report in a directory into a deterministically ordered,
/// name-keyed collection. Any unreadable file is fatal; the per-file
/// tolerant variant is the rank pass, which iterates `report_paths`
/// itself.
pub fn read_from_dir(dir: &Path) -> Result<BTreeMap<String, ReportFile>, InfrastructureError> {
    let mut files = BTreeMap::new();

    for path in report_paths(dir)? {
        let report = read_report(&path)?;
        files.insert(report.name.clone(), report);
    }

    Ok(files)
}

/// Serialize findings to any sink, header first. Used directly for the
/// stdout fallback when a report file cannot be rewritten.
pub fn write_findings<W: Write>(sink: W, findings: &[Finding]) -> Result<(), InfrastructureError> {
    let mut writer = csv::Writer::from_writer(sink);
    for finding in findings {
        writer.serialize(finding)?;
    }
    writer.flush()?;
    Ok(())
}

/// Rewrite a report file atomically, preserving column order.
pub fn write_report(path: &Path, findings: &[Finding]) -> Result<(), InfrastructureError> {
    let mut buf = Vec::new();
    write_findings(&mut buf, findings)?;
    atomic_write(path, buf)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::report::{Prevalence, Rank};
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    fn sample(table: &str, field: &str) -> Finding {
        Finding {
            subject: "colorado".to_string(),
            pipeline_version: "8".to_string(),
            table: table.to_string(),
            field: field.to_string(),
            issue_code: "g2-013".to_string(),
            issue_description: "Unexpected nulls".to_string(),
            finding: "2% null".to_string(),
            prevalence: Prevalence::Low,
            rank: Rank::Medium,
            cause: String::new(),
            status: "new".to_string(),
            tracker_id: Some(42),
        }
    }

    #[test]
    fn test_report_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("person.csv");
        let findings = vec![sample("person", "provider_id"), sample("person", "person_id")];

        write_report(&path, &findings)?;
        let report = read_report(&path)?;

        assert_eq!(report.name, "person.csv");
        assert_eq!(report.findings, findings);
        Ok(())
    }

    #[test]
    fn test_written_header_is_stable() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("person.csv");
        write_report(&path, &[sample("person", "person_id")])?;

        let content = fs::read_to_string(&path)?;
        let header = content.lines().next().unwrap();
        assert_eq!(
            header,
            "subject,pipeline_version,table,field,issue_code,issue_description,\
             finding,prevalence,rank,cause,status,tracker_id"
        );
        Ok(())
    }

    #[test]
    fn test_empty_tracker_id_reads_as_none() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("person.csv");
        let mut finding = sample("person", "person_id");
        finding.tracker_id = None;
        finding.rank = Rank::None;

        write_report(&path, &[finding.clone()])?;
        let report = read_report(&path)?;

        assert_eq!(report.findings[0].tracker_id, None);
        assert_eq!(report.findings[0].rank, Rank::None);
        Ok(())
    }

    #[test]
    fn test_read_from_dir_only_picks_csv_files() -> Result<()> {
        let dir = tempdir()?;
        write_report(&dir.path().join("person.csv"), &[sample("person", "person_id")])?;
        fs::write(dir.path().join("notes.md"), "# scratch")?;

        let files = read_from_dir(dir.path())?;
        assert_eq!(files.len(), 1);
        assert!(files.contains_key("person.csv"));
        Ok(())
    }

    #[test]
    fn test_malformed_tracker_id_is_fatal_with_path() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("person.csv");
        fs::write(
            &path,
            "subject,pipeline_version,table,field,issue_code,issue_description,\
             finding,prevalence,rank,cause,status,tracker_id\n\
             colorado,8,person,person_id,g4-001,desc,text,high,,,new,abc\n",
        )?;

        let err = read_report(&path).unwrap_err();
        assert!(err.to_string().contains("person.csv"));
        Ok(())
    }
}
