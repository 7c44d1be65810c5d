//! Engine data model
//!
//! Defines the per-run types:
//! - Run identifiers and options
//! - Per-agent analysis results
//! - The final run result with summary

use chrono::{DateTime, Utc};
use scrutiny_agent::{AgentReport, Recommendation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use ulid::Ulid;

/// Unique run identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunId(pub Ulid);

impl RunId {
    /// Generate a new run ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller options for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Explicit agent selection; `None` runs every registered agent
    pub agents: Option<Vec<String>>,
    /// Whether to consult the result cache before executing
    pub use_cache: bool,
    /// Analysis parameters forwarded to every agent's context
    pub params: BTreeMap<String, Value>,
}

impl RunOptions {
    /// Default options: all agents, cache enabled, no parameters
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the run to named agents
    #[must_use]
    pub fn with_agents<I, S>(mut self, agents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.agents = Some(agents.into_iter().map(Into::into).collect());
        self
    }

    /// Enable or disable the cache probe
    #[inline]
    #[must_use]
    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    /// Attach an analysis parameter
    #[inline]
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            agents: None,
            use_cache: true,
            params: BTreeMap::new(),
        }
    }
}

/// Outcome of one agent's analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    /// The agent returned a report
    Success,
    /// The agent errored, panicked, timed out, or was never launched
    Failed,
}

/// Settled result for one agent in one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Producing agent
    pub agent: String,
    /// Success or failure
    pub status: AnalysisStatus,
    /// Agent-defined structured data; `Null` on failure
    pub payload: Value,
    /// Recommendations from this agent, sources stamped
    pub recommendations: Vec<Recommendation>,
    /// Failure description; present iff `status == Failed`
    pub error: Option<String>,
    /// Wall-clock duration of the `analyze` call
    pub duration_ms: u64,
}

impl AnalysisResult {
    /// Fold a successful report into a result, stamping the producing
    /// agent into every recommendation's source set
    #[must_use]
    pub fn success(agent: impl Into<String>, report: AgentReport, duration_ms: u64) -> Self {
        let agent = agent.into();
        let recommendations = report
            .recommendations
            .into_iter()
            .map(|rec| rec.with_source(agent.clone()))
            .collect();
        Self {
            agent,
            status: AnalysisStatus::Success,
            payload: report.payload,
            recommendations,
            error: None,
            duration_ms,
        }
    }

    /// Fold a failure into a result
    #[must_use]
    pub fn failure(
        agent: impl Into<String>,
        error: impl std::fmt::Display,
        duration_ms: u64,
    ) -> Self {
        Self {
            agent: agent.into(),
            status: AnalysisStatus::Failed,
            payload: Value::Null,
            recommendations: Vec::new(),
            error: Some(error.to_string()),
            duration_ms,
        }
    }

    /// Check for success
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == AnalysisStatus::Success
    }
}

/// Aggregate counters for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Analyzed target
    pub target: String,
    /// Agents scheduled by the plan
    pub agents_run: usize,
    /// Agents that settled successfully
    pub succeeded: usize,
    /// Agents that settled as failures
    pub failed: usize,
    /// Wall-clock duration of the whole run
    pub duration_ms: u64,
}

/// Final output of one `run` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Run identifier
    pub run_id: RunId,
    /// Per-agent settled results
    pub results: BTreeMap<String, AnalysisResult>,
    /// Merged, deduplicated, priority-ranked recommendations
    pub recommendations: Vec<Recommendation>,
    /// Aggregate counters
    pub summary: RunSummary,
}

/// One line of the append-only run history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Run identifier
    pub run_id: RunId,
    /// Analyzed target
    pub target: String,
    /// When the run settled
    pub completed_at: DateTime<Utc>,
    /// Successful agents
    pub succeeded: usize,
    /// Failed agents
    pub failed: usize,
}
