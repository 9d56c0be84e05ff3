// triage-core/src/domain/ranking/catalog.rs
//
// The standard triage rule tables. Built once at startup and handed to the
// engine as an immutable configuration object; nothing in here is consulted
// at module-global scope.

use crate::domain::ranking::predicate::Guard;
use crate::domain::ranking::rule::{RankRule, RuleScope};
use crate::domain::report::Prevalence::{Full, High, Low, Medium, Unknown};
use crate::domain::report::{Prevalence, Rank};

/// The ordered list of rule scopes consulted by the engine. Order is the
/// global precedence: administrative, then demographic, then fact.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    pub scopes: Vec<RuleScope>,
}

impl RuleCatalog {
    /// The built-in triage rules for the standard subject-area tables.
    pub fn standard() -> Self {
        Self {
            scopes: vec![administrative(), demographic(), fact()],
        }
    }
}

fn rule(guards: Vec<Guard>, entries: &[(&str, Prevalence, Rank)]) -> RankRule {
    RankRule::new(guards, entries)
}

fn administrative() -> RuleScope {
    RuleScope {
        name: "Administrative",
        tables: vec!["care_site", "location", "provider"],
        rules: vec![
            rule(
                vec![Guard::PrimaryKey],
                &[
                    ("g2-013", High, Rank::Medium),
                    ("g2-013", Medium, Rank::Low),
                    ("g2-013", Low, Rank::Low),
                ],
            ),
            rule(
                vec![Guard::SourceValue],
                &[
                    ("g2-011", Full, Rank::Medium),
                    ("g2-011", Medium, Rank::Low),
                    ("g4-002", Full, Rank::Medium),
                    ("g4-002", High, Rank::Medium),
                    ("g4-002", Medium, Rank::Medium),
                    ("g4-002", Low, Rank::Low),
                ],
            ),
            rule(
                vec![Guard::ConceptId],
                &[("g1-002", High, Rank::High), ("g1-002", Medium, Rank::High)],
            ),
            rule(
                vec![Guard::ForeignKey],
                &[
                    ("g2-013", High, Rank::Medium),
                    ("g2-013", Medium, Rank::Low),
                    ("g2-013", Low, Rank::Low),
                    ("g4-002", Full, Rank::Medium),
                ],
            ),
            rule(
                vec![Guard::Other],
                &[
                    ("g2-011", Low, Rank::Low),
                    ("g4-002", Full, Rank::Medium),
                    ("g4-002", High, Rank::Medium),
                    ("g4-002", Medium, Rank::Medium),
                    ("g4-002", Low, Rank::Low),
                ],
            ),
        ],
    }
}

fn demographic() -> RuleScope {
    RuleScope {
        name: "Demographic",
        tables: vec!["person", "death", "observation_period"],
        rules: vec![
            rule(
                vec![Guard::PrimaryKey],
                &[
                    ("g4-001", High, Rank::High),
                    ("g1-003", Low, Rank::Medium),
                    ("g2-013", Medium, Rank::High),
                ],
            ),
            rule(
                vec![Guard::SourceValue],
                &[("g4-002", Full, Rank::Medium), ("g4-002", High, Rank::Medium)],
            ),
            rule(
                vec![Guard::ForeignKey],
                &[
                    ("g1-003", Low, Rank::Medium),
                    ("g2-013", Medium, Rank::High),
                    ("g2-013", Low, Rank::Medium),
                    ("g2-005", High, Rank::Low),
                    ("g3-002", Unknown, Rank::Medium),
                ],
            ),
            rule(
                vec![Guard::Other],
                &[("g2-011", Low, Rank::Medium), ("g4-002", Full, Rank::High)],
            ),
            rule(
                vec![Guard::ConceptId],
                &[("g4-002", Full, Rank::High), ("g2-006", Unknown, Rank::High)],
            ),
            rule(
                vec![Guard::DateOrYear],
                &[("g2-009", Low, Rank::Medium), ("g2-010", Low, Rank::Medium)],
            ),
            // Trailing tables with repeated role guards: first declaration
            // above wins on overlapping keys, these only add new keys.
            rule(vec![Guard::PrimaryKey], &[("g4-001", Full, Rank::High)]),
            rule(
                vec![Guard::SourceValue],
                &[("g2-011", Full, Rank::High), ("g4-002", Full, Rank::High)],
            ),
        ],
    }
}

fn fact() -> RuleScope {
    RuleScope {
        name: "Fact",
        tables: vec![
            "condition_occurrence",
            "drug_exposure",
            "fact_relationship",
            "measurement",
            "observation",
            "procedure",
            "visit_occurrence",
            "visit_payer",
        ],
        rules: vec![
            rule(
                vec![Guard::FieldIn(&["provider_id", "care_site"])],
                &[
                    ("g2-013", Low, Rank::Medium),
                    ("g4-002", Low, Rank::Low),
                    ("g2-005", High, Rank::Low),
                ],
            ),
            rule(
                vec![Guard::FieldIn(&["person_id", "visit_occurrence_id"])],
                &[
                    ("g2-013", High, Rank::High),
                    ("g2-005", High, Rank::Medium),
                    ("g2-005", Medium, Rank::Medium),
                ],
            ),
            rule(
                vec![Guard::Other],
                &[
                    ("g2-013", High, Rank::Low),
                    ("g2-011", High, Rank::High),
                    ("g4-002", High, Rank::High),
                    ("g2-001", Unknown, Rank::Low),
                    ("g2-007", High, Rank::Low),
                    ("g2-007", Medium, Rank::Low),
                ],
            ),
            rule(
                vec![Guard::ConceptId],
                &[
                    ("g4-001", Unknown, Rank::High),
                    ("g2-012", High, Rank::Medium),
                    ("g2-013", High, Rank::High),
                    ("g1-001", Full, Rank::High),
                    ("g4-002", Full, Rank::High),
                    ("g1-002", High, Rank::High),
                    ("g2-006", Low, Rank::Medium),
                ],
            ),
            rule(
                vec![Guard::DateOrYear],
                &[
                    ("g2-009", Low, Rank::Medium),
                    ("g2-008", Unknown, Rank::Medium),
                    ("g2-010", Low, Rank::Low),
                ],
            ),
        ],
    }
}
