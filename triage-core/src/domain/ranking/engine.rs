// triage-core/src/domain/ranking/engine.rs

use crate::domain::ranking::catalog::RuleCatalog;
use crate::domain::report::{Finding, Rank};

/// Outcome of a successful classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch {
    pub scope: &'static str,
    pub rank: Rank,
}

/// The rank classification engine: a pure decision function over the rule
/// catalog it was constructed with.
///
/// Classification never fails; a finding no rule covers simply yields
/// `None` and its stored rank is left for the caller to keep.
#[derive(Debug, Clone)]
pub struct RankEngine {
    catalog: RuleCatalog,
}

impl RankEngine {
    pub fn new(catalog: RuleCatalog) -> Self {
        Self { catalog }
    }

    /// Select the first scope covering the finding's table and look the
    /// finding up in that scope's rule tables.
    ///
    /// Two hard rules frame the lookup: persistent findings are never
    /// re-ranked, and scope selection does not fall through. If the
    /// selected scope has no matching rule the classification is a
    /// no-match even when a later scope would have matched.
    pub fn classify(&self, finding: &Finding) -> Option<RuleMatch> {
        if finding.is_persistent() {
            return None;
        }

        let scope = self
            .catalog
            .scopes
            .iter()
            .find(|scope| scope.covers(&finding.table))?;

        scope.match_rank(finding).map(|rank| RuleMatch {
            scope: scope.name,
            rank,
        })
    }
}
