//! Correlation & recommendation synthesis
//!
//! Consumes the settled per-agent results of one run and produces the final
//! prioritized recommendation list:
//! 1. collect every agent-sourced recommendation verbatim
//! 2. evaluate the fixed correlation rule table, each rule a pure predicate
//!    over two or more named agents' payload fields
//! 3. stable-sort by priority, then source kind (correlations first at
//!    equal priority), then declaration order
//! 4. deduplicate by `(type, title)`, unioning source sets
//!
//! The rule table is compiled in; adding a rule means adding one entry.

use crate::types::AnalysisResult;
use indexmap::IndexMap;
use scrutiny_agent::{Recommendation, RecommendationPriority};
use std::collections::BTreeMap;

/// One cross-agent correlation check
pub struct CorrelationRule {
    /// Rule identifier, used for tracing only
    pub name: &'static str,
    /// Agents whose payloads this rule reads
    pub agents: &'static [&'static str],
    /// Pure predicate; `Some` emits one correlation recommendation
    pub evaluate: fn(&BTreeMap<String, AnalysisResult>) -> Option<Recommendation>,
}

/// Read a numeric payload field from a *successful* agent result
fn payload_number(
    results: &BTreeMap<String, AnalysisResult>,
    agent: &str,
    field: &str,
) -> Option<f64> {
    let result = results.get(agent)?;
    if !result.is_success() {
        return None;
    }
    result.payload.get(field)?.as_f64()
}

fn complex_under_documented(
    results: &BTreeMap<String, AnalysisResult>,
) -> Option<Recommendation> {
    let complexity = payload_number(results, "code-quality", "complexity")?;
    let coverage = payload_number(results, "documentation", "coverage")?;
    if complexity >= 20.0 && coverage < 0.5 {
        Some(
            Recommendation::new(
                "documentation",
                RecommendationPriority::High,
                "Document the most complex modules",
                "High structural complexity coincides with low documentation \
                 coverage; undocumented complex code is where onboarding and \
                 review costs concentrate.",
            )
            .with_source("code-quality")
            .with_source("documentation")
            .correlated(),
        )
    } else {
        None
    }
}

fn vulnerable_and_outdated(
    results: &BTreeMap<String, AnalysisResult>,
) -> Option<Recommendation> {
    let vulnerabilities = payload_number(results, "security", "vulnerabilities")?;
    let outdated = payload_number(results, "dependency-audit", "outdated")?;
    if vulnerabilities > 0.0 && outdated > 0.0 {
        Some(
            Recommendation::new(
                "security",
                RecommendationPriority::Critical,
                "Upgrade vulnerable outdated dependencies",
                "Known vulnerabilities overlap with outdated dependencies; \
                 upgrading the stale packages removes both findings at once.",
            )
            .with_source("security")
            .with_source("dependency-audit")
            .correlated(),
        )
    } else {
        None
    }
}

fn complex_and_untested(results: &BTreeMap<String, AnalysisResult>) -> Option<Recommendation> {
    let complexity = payload_number(results, "code-quality", "complexity")?;
    let coverage = payload_number(results, "test-coverage", "line_coverage")?;
    if complexity >= 20.0 && coverage < 0.6 {
        Some(
            Recommendation::new(
                "testing",
                RecommendationPriority::High,
                "Add tests around the most complex modules",
                "The least-tested code is also the most complex; regressions \
                 are most likely exactly where coverage is thinnest.",
            )
            .with_source("code-quality")
            .with_source("test-coverage")
            .correlated(),
        )
    } else {
        None
    }
}

/// The fixed correlation rule table
pub const RULES: &[CorrelationRule] = &[
    CorrelationRule {
        name: "complex-under-documented",
        agents: &["code-quality", "documentation"],
        evaluate: complex_under_documented,
    },
    CorrelationRule {
        name: "vulnerable-and-outdated",
        agents: &["security", "dependency-audit"],
        evaluate: vulnerable_and_outdated,
    },
    CorrelationRule {
        name: "complex-and-untested",
        agents: &["code-quality", "test-coverage"],
        evaluate: complex_and_untested,
    },
];

/// Synthesizes the final recommendation list for a run
#[derive(Debug, Default)]
pub struct CorrelationEngine;

impl CorrelationEngine {
    /// Evaluate every correlation rule against the settled results
    #[must_use]
    pub fn correlate(results: &BTreeMap<String, AnalysisResult>) -> Vec<Recommendation> {
        RULES
            .iter()
            .filter_map(|rule| {
                let finding = (rule.evaluate)(results);
                if finding.is_some() {
                    tracing::debug!(rule = rule.name, "correlation rule fired");
                }
                finding
            })
            .collect()
    }

    /// Full pipeline: collect, correlate, rank, deduplicate
    #[must_use]
    pub fn synthesize(results: &BTreeMap<String, AnalysisResult>) -> Vec<Recommendation> {
        let mut combined: Vec<Recommendation> = results
            .values()
            .flat_map(|result| result.recommendations.iter().cloned())
            .collect();
        combined.extend(Self::correlate(results));

        // Stable sort: declaration order is the final tie-break.
        combined.sort_by_key(|rec| (rec.priority.rank(), rec.source_kind.rank()));
        Self::dedupe(combined)
    }

    /// Deduplicate by `(type, title)`, unioning source sets
    ///
    /// The first occurrence wins position, priority, and description; since
    /// the input is already ranked, that is the highest-ranked colliding
    /// entry. Idempotent: merging a deduplicated list with itself changes
    /// nothing but the union bookkeeping, which is a no-op.
    #[must_use]
    pub fn dedupe(recommendations: Vec<Recommendation>) -> Vec<Recommendation> {
        let mut merged: IndexMap<(String, String), Recommendation> = IndexMap::new();
        for rec in recommendations {
            match merged.entry(rec.dedup_key()) {
                indexmap::map::Entry::Occupied(mut entry) => {
                    entry.get_mut().sources.extend(rec.sources);
                }
                indexmap::map::Entry::Vacant(entry) => {
                    entry.insert(rec);
                }
            }
        }
        merged.into_values().collect()
    }
}
