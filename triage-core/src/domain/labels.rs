// triage-core/src/domain/labels.rs
//
// Label codec: the wire format shared with the tracker. A classification
// fact rides on an issue as a `"<Kind>: <value>"` label; two marker labels
// tag issues as belonging to this tool at all.

use std::fmt;

/// Marker label carried by every issue this tool creates.
pub const DATA_QUALITY: &str = "Data Quality";

/// Marker label carried only by the per-cycle summary issue.
pub const DATA_QUALITY_SUMMARY: &str = "Data Quality Summary";

/// The kinds of valued facts a label can encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactKind {
    DataCycle,
    Table,
    Rank,
    Cause,
    Status,
}

impl FactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactKind::DataCycle => "Data Cycle",
            FactKind::Table => "Table",
            FactKind::Rank => "Rank",
            FactKind::Cause => "Cause",
            FactKind::Status => "Status",
        }
    }

    /// Kind comparison is case-insensitive.
    pub fn parse(raw: &str) -> Option<Self> {
        const KINDS: [FactKind; 5] = [
            FactKind::DataCycle,
            FactKind::Table,
            FactKind::Rank,
            FactKind::Cause,
            FactKind::Status,
        ];
        KINDS
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for FactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed (kind, value) fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    pub kind: FactKind,
    pub value: String,
}

impl Fact {
    pub fn new(kind: FactKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn encode(&self) -> String {
        format!("{}: {}", self.kind.as_str(), self.value)
    }

    /// Decode a label into a fact. A label with no `": "` separator, or
    /// with an unrecognized kind, is not a fact and yields `None`; the
    /// value is taken verbatim (it may itself contain `": "`).
    pub fn decode(label: &str) -> Option<Self> {
        let (kind, value) = split_label(label)?;
        FactKind::parse(kind).map(|kind| Fact::new(kind, value))
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.value)
    }
}

/// Split a label on the first `": "` occurrence.
pub fn split_label(label: &str) -> Option<(&str, &str)> {
    label.split_once(": ")
}
