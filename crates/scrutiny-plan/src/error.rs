//! Planning errors
//!
//! Structural errors: any of these aborts a run before a single agent
//! executes, because no valid ordering exists.

/// Errors from graph construction or plan computation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// A requested name has no registered agent
    #[error("unknown agent requested: {0}")]
    UnknownAgent(String),

    /// A requested agent declares a dependency that is not registered at all
    #[error("agent '{agent}' depends on unregistered agent '{dependency}'")]
    MissingDependency {
        /// The requested agent declaring the dependency
        agent: String,
        /// The unregistered dependency name
        dependency: String,
    },

    /// The requested subgraph contains a dependency cycle
    #[error("cyclic dependency detected at agent '{0}'")]
    CyclicDependency(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_error_display() {
        let err = PlanError::MissingDependency {
            agent: "security".to_string(),
            dependency: "deps".to_string(),
        };
        assert!(err.to_string().contains("security"));
        assert!(err.to_string().contains("deps"));

        let err = PlanError::CyclicDependency("x".to_string());
        assert!(err.to_string().contains("cyclic"));
    }
}
