// triage-core/src/domain/ranking/predicate.rs

use crate::domain::report::Finding;

/// A guard condition over a finding's structural fields.
///
/// The role guards partition "what kind of column is this" so that at most
/// one of them ordinarily holds for a given field name; `FieldIn` covers
/// the hand-picked field lists some scopes need on top of the role
/// partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// `field` is the table's primary key (`<table>_id`).
    PrimaryKey,
    /// `field` ends with `_source_value`.
    SourceValue,
    /// `field` ends with `_concept_id`.
    ConceptId,
    /// `field` ends with `_id` but is neither the primary key nor a
    /// concept id.
    ForeignKey,
    /// `field` mentions a date or a year.
    DateOrYear,
    /// None of the role guards above hold.
    Other,
    /// `field` is one of the listed names.
    FieldIn(&'static [&'static str]),
}

impl Guard {
    pub fn holds(&self, finding: &Finding) -> bool {
        match self {
            Guard::PrimaryKey => is_primary_key(finding),
            Guard::SourceValue => is_source_value(finding),
            Guard::ConceptId => is_concept_id(finding),
            Guard::ForeignKey => is_foreign_key(finding),
            Guard::DateOrYear => is_date_or_year(finding),
            Guard::Other => is_other(finding),
            Guard::FieldIn(fields) => fields.contains(&finding.field.as_str()),
        }
    }
}

fn is_primary_key(f: &Finding) -> bool {
    f.field == format!("{}_id", f.table)
}

fn is_source_value(f: &Finding) -> bool {
    f.field.ends_with("_source_value")
}

fn is_concept_id(f: &Finding) -> bool {
    f.field.ends_with("_concept_id")
}

fn is_foreign_key(f: &Finding) -> bool {
    !is_primary_key(f) && f.field.ends_with("_id") && !is_concept_id(f)
}

fn is_date_or_year(f: &Finding) -> bool {
    f.field.contains("date") || f.field.contains("year")
}

fn is_other(f: &Finding) -> bool {
    !is_primary_key(f)
        && !is_foreign_key(f)
        && !is_source_value(f)
        && !is_concept_id(f)
        && !is_date_or_year(f)
}
