use {
    crate::{
        index::IndexReader,
        search::{CostMode, CostPolicy, Query},
        GuardError, GuardResult,
    },
    async_trait::async_trait,
    std::fmt::Debug,
};

/// Facets are computed only for result sets smaller than this.
pub const DEFAULT_FACET_HITS_THRESHOLD: u64 = 50_000;

/// The hooks a search engine calls around executing a full-text query.
///
/// A host calls [SearchPolicy::inspect_fulltext_query] and then [SearchPolicy::rewrite_fulltext_query] on the parsed
/// query, executes the result, and finally asks [SearchPolicy::should_compute_facets] whether to run the faceting
/// pass. Implementations hold no per-query state and may be shared between concurrent searches.
#[async_trait]
pub trait SearchPolicy: Debug + Send + Sync {
    /// Rejects queries the policy refuses to run.
    fn inspect_fulltext_query(&self, _query: &Query) -> GuardResult<()> {
        Ok(())
    }

    /// Returns the query to execute in place of `query`, evaluated against the `reader` snapshot.
    async fn rewrite_fulltext_query(&self, reader: &IndexReader, query: Query) -> GuardResult<Query>;

    /// Returns the query to execute for a "more like this" search.
    fn rewrite_similarity_query(&self, query: Query) -> Query {
        query
    }

    /// Whether facets should be computed for a search that matched `total_hits` documents.
    fn should_compute_facets(&self, total_hits: u64) -> bool;
}

/// Guards boolean queries made of several common terms. See [CostPolicy].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CostGuardPolicy {
    cost_policy: CostPolicy,
    facet_hits_threshold: u64,
}

impl CostGuardPolicy {
    /// Creates a policy in [CostMode::WarnOnly] mode.
    ///
    /// # Errors
    /// Returns [GuardError::InvalidConfiguration] unless `max_matching_docs` is positive.
    pub fn new(max_matching_docs: i64) -> GuardResult<Self> {
        Ok(Self {
            cost_policy: CostPolicy::new(max_matching_docs, CostMode::default())?,
            facet_hits_threshold: DEFAULT_FACET_HITS_THRESHOLD,
        })
    }

    /// Returns this policy with a different [CostMode].
    pub fn with_mode(self, mode: CostMode) -> Self {
        Self {
            cost_policy: self.cost_policy.with_mode(mode),
            ..self
        }
    }

    /// Returns this policy computing facets only below `facet_hits_threshold` hits.
    pub fn with_facet_hits_threshold(self, facet_hits_threshold: u64) -> Self {
        Self {
            facet_hits_threshold,
            ..self
        }
    }

    /// The underlying cost policy.
    #[inline]
    pub fn cost_policy(&self) -> &CostPolicy {
        &self.cost_policy
    }
}

#[async_trait]
impl SearchPolicy for CostGuardPolicy {
    /// Match-none queries (what an empty search parses to) become the default match-all query. Boolean queries go
    /// through the [CostPolicy]. Anything else is returned unchanged.
    async fn rewrite_fulltext_query(&self, reader: &IndexReader, query: Query) -> GuardResult<Query> {
        match query {
            Query::MatchNone => Ok(Query::default()),
            Query::Boolean(boolean) => self.cost_policy.rewrite(reader, boolean).await,
            other => Ok(other),
        }
    }

    fn should_compute_facets(&self, total_hits: u64) -> bool {
        total_hits < self.facet_hits_threshold
    }
}

/// Refuses to run a bare match-all query; rewrites nothing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RejectMatchAllPolicy {
    facet_hits_threshold: u64,
}

impl Default for RejectMatchAllPolicy {
    fn default() -> Self {
        Self {
            facet_hits_threshold: DEFAULT_FACET_HITS_THRESHOLD,
        }
    }
}

impl RejectMatchAllPolicy {
    /// Creates the policy with the default facet threshold.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns this policy computing facets only below `facet_hits_threshold` hits.
    pub fn with_facet_hits_threshold(self, facet_hits_threshold: u64) -> Self {
        Self {
            facet_hits_threshold,
        }
    }
}

#[async_trait]
impl SearchPolicy for RejectMatchAllPolicy {
    fn inspect_fulltext_query(&self, query: &Query) -> GuardResult<()> {
        match query {
            Query::MatchAll => Err(GuardError::ForbiddenQuery(query.to_string())),
            _ => Ok(()),
        }
    }

    async fn rewrite_fulltext_query(&self, _reader: &IndexReader, query: Query) -> GuardResult<Query> {
        Ok(query)
    }

    fn should_compute_facets(&self, total_hits: u64) -> bool {
        total_hits < self.facet_hits_threshold
    }
}
