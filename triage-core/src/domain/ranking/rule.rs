// triage-core/src/domain/ranking/rule.rs

use std::collections::HashMap;

use crate::domain::ranking::predicate::Guard;
use crate::domain::report::{Finding, Prevalence, Rank};

/// Lookup key inside one rank table: lowercased issue code + prevalence.
pub type RankKey = (String, Prevalence);

/// One guarded rank table.
///
/// The guards are AND-combined and short-circuit on the first failure. A
/// rule that applies but has no entry for the finding's (issue code,
/// prevalence) pair yields nothing; the scope then falls through to the
/// next declared rule.
#[derive(Debug, Clone)]
pub struct RankRule {
    pub guards: Vec<Guard>,
    pub ranks: HashMap<RankKey, Rank>,
}

impl RankRule {
    pub fn new(guards: Vec<Guard>, entries: &[(&str, Prevalence, Rank)]) -> Self {
        let ranks = entries
            .iter()
            .map(|(code, prevalence, rank)| ((code.to_lowercase(), *prevalence), *rank))
            .collect();
        Self { guards, ranks }
    }

    pub fn applies(&self, finding: &Finding) -> bool {
        self.guards.iter().all(|guard| guard.holds(finding))
    }

    pub fn lookup(&self, finding: &Finding) -> Option<Rank> {
        if !self.applies(finding) {
            return None;
        }
        self.ranks
            .get(&(finding.issue_code.to_lowercase(), finding.prevalence))
            .copied()
    }
}

/// An ordered list of rank tables scoped to a set of subject-area tables.
#[derive(Debug, Clone)]
pub struct RuleScope {
    pub name: &'static str,
    pub tables: Vec<&'static str>,
    pub rules: Vec<RankRule>,
}

impl RuleScope {
    /// Whether this scope is responsible for the given table. Scope
    /// selection is exclusive: once a scope covers the table, no later
    /// scope is consulted, even if nothing inside this one matches.
    pub fn covers(&self, table: &str) -> bool {
        self.tables.contains(&table)
    }

    /// First declared rule with an entry for the finding wins.
    pub fn match_rank(&self, finding: &Finding) -> Option<Rank> {
        self.rules.iter().find_map(|rule| rule.lookup(finding))
    }
}
