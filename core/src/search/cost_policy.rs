use {
    crate::{
        index::{IndexReader, TermStatistics},
        search::{classify, collect_term_statistics, BooleanQuery, ClauseClassification, Occur, Query},
        GuardError, GuardResult,
    },
    log::{debug, warn},
    serde::{Deserialize, Serialize},
    std::{
        fmt::{Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

/// What the cost policy does when several term clauses are expensive.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CostMode {
    /// Execute the query unchanged, logging a warning when every term clause is expensive.
    #[default]
    WarnOnly,

    /// Replace the query with a match-all or match-none query, refusing mixed requirements.
    Rewrite,
}

impl Display for CostMode {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::WarnOnly => f.write_str("warn_only"),
            Self::Rewrite => f.write_str("rewrite"),
        }
    }
}

impl FromStr for CostMode {
    type Err = GuardError;

    fn from_str(s: &str) -> GuardResult<Self> {
        match s {
            "warn_only" => Ok(Self::WarnOnly),
            "rewrite" => Ok(Self::Rewrite),
            _ => Err(GuardError::InvalidConfiguration(format!("Unknown cost mode: {s:?}"))),
        }
    }
}

/// The outcome of evaluating one query.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verdict {
    /// Execute the query unchanged.
    Passthrough,

    /// Execute a match-all query instead.
    RewriteToMatchAll,

    /// Execute a match-none query instead.
    RewriteToMatchNone,

    /// Refuse the query: its expensive clauses mix requirements.
    RejectAmbiguous,

    /// Execute the query unchanged after logging a warning.
    WarnOnly,
}

/// Decides what to do with a boolean query made of several term clauses, based on how many documents each term
/// matches.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CostPolicy {
    max_matching_docs: u64,
    mode: CostMode,
}

impl CostPolicy {
    /// Creates a cost policy. A term is expensive when it matches more than `max_matching_docs` documents.
    ///
    /// # Errors
    /// Returns [GuardError::InvalidConfiguration] unless `max_matching_docs` is positive.
    pub fn new(max_matching_docs: i64, mode: CostMode) -> GuardResult<Self> {
        if max_matching_docs <= 0 {
            return Err(GuardError::InvalidConfiguration(format!(
                "max_matching_docs must be positive: {max_matching_docs}"
            )));
        }

        Ok(Self {
            max_matching_docs: max_matching_docs as u64,
            mode,
        })
    }

    /// Returns this policy with its threshold and a different mode.
    pub fn with_mode(self, mode: CostMode) -> Self {
        Self {
            mode,
            ..self
        }
    }

    /// The largest document frequency a term may have without being expensive.
    #[inline]
    pub fn max_matching_docs(&self) -> u64 {
        self.max_matching_docs
    }

    /// The active mode.
    #[inline]
    pub fn mode(&self) -> CostMode {
        self.mode
    }

    /// Whether term statistics can change the verdict for this classification. When false, the verdict is
    /// [Verdict::Passthrough].
    pub fn needs_statistics(&self, classification: &ClauseClassification<'_>) -> bool {
        classification.non_term_count == 0 && classification.term_clauses.len() >= 2
    }

    /// Decides the verdict for a classification given the statistics of its term clauses (parallel to
    /// `classification.term_clauses`).
    pub fn decide(&self, classification: &ClauseClassification<'_>, statistics: &[TermStatistics]) -> Verdict {
        if !self.needs_statistics(classification) {
            return Verdict::Passthrough;
        }

        let expensive: Vec<Occur> = classification
            .term_clauses
            .iter()
            .zip(statistics)
            .filter(|(_, statistics)| statistics.doc_freq > self.max_matching_docs)
            .map(|(clause, _)| clause.occur)
            .collect();

        if expensive.len() <= 1 {
            return Verdict::Passthrough;
        }

        match self.mode {
            CostMode::WarnOnly if expensive.len() == classification.term_clauses.len() => Verdict::WarnOnly,
            CostMode::WarnOnly => Verdict::Passthrough,
            CostMode::Rewrite => match expensive.as_slice() {
                [first, rest @ ..] if rest.iter().any(|occur| occur != first) => Verdict::RejectAmbiguous,
                [Occur::MustNot, ..] => Verdict::RewriteToMatchNone,
                _ => Verdict::RewriteToMatchAll,
            },
        }
    }

    /// Classifies `query`, collects statistics from `reader` if they are needed, and decides.
    ///
    /// # Errors
    /// Returns [GuardError::IndexReadFailure] if reading a term dictionary fails.
    pub async fn evaluate(&self, reader: &IndexReader, query: &BooleanQuery) -> GuardResult<Verdict> {
        let classification = classify(query);
        if !self.needs_statistics(&classification) {
            return Ok(Verdict::Passthrough);
        }

        let statistics = collect_term_statistics(reader, &classification.term_clauses).await?;
        let verdict = self.decide(&classification, &statistics);
        debug!("Verdict for {query}: {verdict:?}");
        Ok(verdict)
    }

    /// Evaluates `query` and returns the query to execute in its place.
    ///
    /// # Errors
    /// Returns [GuardError::AmbiguousExpensiveQuery] when the verdict is [Verdict::RejectAmbiguous], and
    /// [GuardError::IndexReadFailure] if reading a term dictionary fails.
    pub async fn rewrite(&self, reader: &IndexReader, query: BooleanQuery) -> GuardResult<Query> {
        match self.evaluate(reader, &query).await? {
            Verdict::Passthrough => Ok(Query::Boolean(query)),
            Verdict::WarnOnly => {
                warn!("Executing expensive query: {query}");
                Ok(Query::Boolean(query))
            }
            Verdict::RewriteToMatchAll => Ok(Query::MatchAll),
            Verdict::RewriteToMatchNone => Ok(Query::MatchNone),
            Verdict::RejectAmbiguous => Err(GuardError::AmbiguousExpensiveQuery(query.to_string())),
        }
    }
}
