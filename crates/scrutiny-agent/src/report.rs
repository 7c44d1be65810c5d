//! Agent output types
//!
//! A successful analysis produces an [`AgentReport`]: an agent-defined
//! structured payload plus zero or more [`Recommendation`]s. Recommendations
//! are the unit the downstream correlation engine merges, deduplicates, and
//! ranks, so their identity key `(rec_type, title)` and source bookkeeping
//! live here with the contract.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Output of one successful `analyze` call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentReport {
    /// Agent-defined structured data
    pub payload: Value,
    /// Recommendations derived from this agent's findings alone
    pub recommendations: Vec<Recommendation>,
}

impl AgentReport {
    /// Create a report with a payload and no recommendations
    #[inline]
    #[must_use]
    pub fn new(payload: Value) -> Self {
        Self {
            payload,
            recommendations: Vec::new(),
        }
    }

    /// Attach a recommendation
    #[inline]
    #[must_use]
    pub fn with_recommendation(mut self, rec: Recommendation) -> Self {
        self.recommendations.push(rec);
        self
    }
}

/// Urgency of a recommendation, highest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationPriority {
    /// Must be acted on immediately
    Critical,
    /// Should be scheduled soon
    High,
    /// Worth doing
    Medium,
    /// Nice to have
    Low,
}

impl RecommendationPriority {
    /// Rank for sorting; lower sorts first
    #[inline]
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

/// Where a recommendation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Produced directly by a single agent
    Agent,
    /// Derived by the correlation engine from two or more agents' results
    Correlation,
}

impl SourceKind {
    /// Rank for sorting at equal priority; correlations outrank agent
    /// findings because they carry independently-corroborated evidence
    #[inline]
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::Correlation => 0,
            Self::Agent => 1,
        }
    }
}

/// A single actionable finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Category key, half of the deduplication identity
    pub rec_type: String,
    /// Urgency
    pub priority: RecommendationPriority,
    /// Short summary, the other half of the deduplication identity
    pub title: String,
    /// Full description
    pub description: String,
    /// Names of the agents whose findings contributed
    pub sources: IndexSet<String>,
    /// Agent-sourced or correlation-derived
    pub source_kind: SourceKind,
}

impl Recommendation {
    /// Create an agent-sourced recommendation with empty sources
    ///
    /// The executor stamps the producing agent's name into `sources` when
    /// it collects the report, so agents do not need to self-identify.
    #[must_use]
    pub fn new(
        rec_type: impl Into<String>,
        priority: RecommendationPriority,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            rec_type: rec_type.into(),
            priority,
            title: title.into(),
            description: description.into(),
            sources: IndexSet::new(),
            source_kind: SourceKind::Agent,
        }
    }

    /// Add a contributing source agent
    #[inline]
    #[must_use]
    pub fn with_source(mut self, agent: impl Into<String>) -> Self {
        self.sources.insert(agent.into());
        self
    }

    /// Mark as correlation-derived
    #[inline]
    #[must_use]
    pub fn correlated(mut self) -> Self {
        self.source_kind = SourceKind::Correlation;
        self
    }

    /// Deduplication identity
    #[inline]
    #[must_use]
    pub fn dedup_key(&self) -> (String, String) {
        (self.rec_type.clone(), self.title.clone())
    }
}
