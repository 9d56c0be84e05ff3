// triage-core/src/infrastructure/store/mod.rs

pub mod csv;

pub use self::csv::{
    ReportFile, read_from_dir, read_report, report_paths, write_findings, write_report,
};
