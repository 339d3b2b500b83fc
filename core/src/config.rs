use {
    crate::{
        search::{CostGuardPolicy, CostMode, RejectMatchAllPolicy, SearchPolicy, DEFAULT_FACET_HITS_THRESHOLD},
        GuardResult,
    },
    log::debug,
    serde::{Deserialize, Serialize},
};

/// Which [SearchPolicy] to install.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// [CostGuardPolicy].
    #[default]
    CostGuard,

    /// [RejectMatchAllPolicy].
    RejectMatchAll,
}

/// Search policy configuration, read once at startup.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PolicyConfig {
    /// The policy to install (default: cost_guard)
    #[serde(default)]
    pub policy: PolicyKind,

    /// Terms matching more documents than this are expensive (default: 50000). Must be positive.
    #[serde(default = "default_max_matching_docs")]
    pub max_matching_docs: i64,

    /// What the cost guard does with expensive queries (default: warn_only)
    #[serde(default)]
    pub mode: CostMode,

    /// Facets are computed for searches with fewer hits than this (default: 50000)
    #[serde(default = "default_facet_hits_threshold")]
    pub facet_hits_threshold: u64,
}

fn default_max_matching_docs() -> i64 {
    50_000
}

fn default_facet_hits_threshold() -> u64 {
    DEFAULT_FACET_HITS_THRESHOLD
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::default(),
            max_matching_docs: default_max_matching_docs(),
            mode: CostMode::default(),
            facet_hits_threshold: default_facet_hits_threshold(),
        }
    }
}

impl PolicyConfig {
    /// Builds the configured policy.
    ///
    /// # Errors
    /// Returns [GuardError::InvalidConfiguration](crate::GuardError::InvalidConfiguration) if the cost guard is
    /// selected and `max_matching_docs` is not positive.
    pub fn build(&self) -> GuardResult<Box<dyn SearchPolicy>> {
        debug!("Building search policy from {self:?}");
        match self.policy {
            PolicyKind::CostGuard => Ok(Box::new(
                CostGuardPolicy::new(self.max_matching_docs)?
                    .with_mode(self.mode)
                    .with_facet_hits_threshold(self.facet_hits_threshold),
            )),
            PolicyKind::RejectMatchAll => {
                Ok(Box::new(RejectMatchAllPolicy::new().with_facet_hits_threshold(self.facet_hits_threshold)))
            }
        }
    }
}
