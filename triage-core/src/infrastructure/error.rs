// triage-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(triage::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- REPORT FILES (CSV) ---
    #[error("CSV Error: {0}")]
    #[diagnostic(code(triage::infra::csv))]
    Csv(#[from] csv::Error),

    #[error("Malformed report '{path}': {source}")]
    #[diagnostic(
        code(triage::infra::report),
        help("Check the report header and the offending row.")
    )]
    Report {
        path: String,
        #[source]
        source: csv::Error,
    },

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(triage::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    // --- TRACKER TRANSPORT ---
    #[error("Tracker transport error: {0}")]
    #[diagnostic(
        code(triage::infra::transport),
        help("Check network connectivity and the API URL.")
    )]
    Http(#[from] reqwest::Error),

    #[error("Tracker API error ({status}): {message}")]
    #[diagnostic(
        code(triage::infra::tracker),
        help("Check the token scope and that the repository exists.")
    )]
    TrackerApi { status: u16, message: String },

    // --- TEMPLATING ---
    #[error("Template Rendering Error: {0}")]
    #[diagnostic(code(triage::infra::template))]
    Template(#[from] minijinja::Error),
}
