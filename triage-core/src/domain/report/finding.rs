// triage-core/src/domain/report/finding.rs

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::error::DomainError;

/// Ordinal severity of a finding: none < low < medium < high.
///
/// `None` is the zero value carried by findings that have not been ranked
/// (or that no rule matched). It serializes to the empty string so the CSV
/// column stays blank until a rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Rank {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl Rank {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::None => "",
            Rank::Low => "Low",
            Rank::Medium => "Medium",
            Rank::High => "High",
        }
    }

    /// Case-insensitive parse. The empty string is `None`.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw.trim().to_lowercase().as_str() {
            "" => Ok(Rank::None),
            "low" => Ok(Rank::Low),
            "medium" => Ok(Rank::Medium),
            "high" => Ok(Rank::High),
            _ => Err(DomainError::InvalidRank(raw.to_string())),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Rank {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Rank {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RankVisitor;

        impl Visitor<'_> for RankVisitor {
            type Value = Rank;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("one of '', 'Low', 'Medium', 'High'")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Rank, E> {
                Rank::parse(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(RankVisitor)
    }
}

/// How widespread an issue is within the analyzed table.
///
/// Unrecognized or missing values fold to `Unknown`: the rule tables key on
/// the literal prevalence string, and `unknown` is itself a valid key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Prevalence {
    Full,
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl Prevalence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Prevalence::Full => "full",
            Prevalence::High => "high",
            Prevalence::Medium => "medium",
            Prevalence::Low => "low",
            Prevalence::Unknown => "unknown",
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "full" => Prevalence::Full,
            "high" => Prevalence::High,
            "medium" => Prevalence::Medium,
            "low" => Prevalence::Low,
            _ => Prevalence::Unknown,
        }
    }
}

impl fmt::Display for Prevalence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Prevalence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Prevalence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PrevalenceVisitor;

        impl Visitor<'_> for PrevalenceVisitor {
            type Value = Prevalence;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a prevalence string")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Prevalence, E> {
                Ok(Prevalence::parse(value))
            }
        }

        deserializer.deserialize_str(PrevalenceVisitor)
    }
}

/// One data-quality observation row.
///
/// Field order matters: the CSV store derives its header from this struct,
/// and report files are rewritten in the same column order they were read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub subject: String,
    pub pipeline_version: String,
    pub table: String,
    pub field: String,
    pub issue_code: String,
    pub issue_description: String,
    pub finding: String,
    pub prevalence: Prevalence,
    pub rank: Rank,
    pub cause: String,
    pub status: String,
    pub tracker_id: Option<u64>,
}

impl Finding {
    /// A finding is actionable (worth a tracker issue) when the analysis
    /// attached an issue code to it.
    pub fn is_actionable(&self) -> bool {
        !self.issue_code.is_empty()
    }

    /// Persistent findings were triaged in a previous cycle and must never
    /// be re-ranked.
    pub fn is_persistent(&self) -> bool {
        self.status.eq_ignore_ascii_case("persistent")
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({})", self.table, self.field, self.issue_code)
    }
}
