use {
    crate::index::Term,
    std::fmt::{Display, Formatter, Result as FmtResult},
};

/// Specifies how a clause takes part in a [BooleanQuery].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Occur {
    /// The clause must match.
    Must,

    /// The clause should match. Matching clauses contribute to scoring.
    Should,

    /// The clause must not match.
    MustNot,
}

impl Occur {
    /// The prefix used for this occur in the textual form of a query.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Must => "+",
            Self::Should => "",
            Self::MustNot => "-",
        }
    }

    /// Returns the opposite requirement: `MustNot` becomes `Must`, anything else becomes `MustNot`.
    pub fn negate(self) -> Self {
        match self {
            Self::MustNot => Self::Must,
            Self::Must | Self::Should => Self::MustNot,
        }
    }
}

/// A clause in a [BooleanQuery].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BooleanClause {
    /// How the clause takes part in the enclosing query.
    pub occur: Occur,

    /// The clause's query.
    pub query: Query,
}

/// A query that matches documents matching boolean combinations of other queries. Clause order is preserved.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BooleanQuery {
    clauses: Vec<BooleanClause>,
}

impl BooleanQuery {
    /// Starts a query with no clauses.
    pub fn builder() -> BooleanQueryBuilder {
        BooleanQueryBuilder::default()
    }

    /// The clauses, in the order they were added.
    #[inline]
    pub fn clauses(&self) -> &[BooleanClause] {
        &self.clauses
    }
}

/// Builder for [BooleanQuery].
#[derive(Debug, Default)]
pub struct BooleanQueryBuilder {
    clauses: Vec<BooleanClause>,
}

impl BooleanQueryBuilder {
    /// Adds a clause.
    pub fn add<Q: Into<Query>>(mut self, query: Q, occur: Occur) -> Self {
        self.clauses.push(BooleanClause {
            occur,
            query: query.into(),
        });
        self
    }

    /// Finishes the query.
    pub fn build(self) -> BooleanQuery {
        BooleanQuery {
            clauses: self.clauses,
        }
    }
}

/// A query matching documents containing a sequence of terms in one field.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PhraseQuery {
    field: String,
    terms: Vec<Vec<u8>>,
}

impl PhraseQuery {
    /// Creates a phrase of `terms`, in order, within `field`.
    pub fn new<B: Into<Vec<u8>>>(field: &str, terms: impl IntoIterator<Item = B>) -> Self {
        Self {
            field: field.to_string(),
            terms: terms.into_iter().map(Into::into).collect(),
        }
    }

    /// The field the phrase is searched in.
    #[inline]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The terms of the phrase, in order.
    pub fn terms(&self) -> impl Iterator<Item = Term> + '_ {
        self.terms.iter().map(|bytes| Term::new(&self.field, bytes.clone()))
    }
}

/// A parsed full-text query tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Query {
    /// Matches documents containing the term.
    Term(Term),

    /// A boolean combination of clauses.
    Boolean(BooleanQuery),

    /// Matches documents containing the phrase.
    Phrase(PhraseQuery),

    /// Matches every document.
    MatchAll,

    /// Matches no document.
    MatchNone,

    /// Any other query (ranges, wildcards, ...). Only its textual form is kept.
    Opaque(String),
}

impl Query {
    /// Shorthand for a [Query::Term] on UTF-8 text.
    pub fn term(field: &str, text: &str) -> Self {
        Self::Term(Term::new(field, text))
    }
}

impl Default for Query {
    /// The query used when there is nothing to search for: browse every document.
    fn default() -> Self {
        Self::MatchAll
    }
}

impl From<Term> for Query {
    fn from(term: Term) -> Self {
        Self::Term(term)
    }
}

impl From<BooleanQuery> for Query {
    fn from(query: BooleanQuery) -> Self {
        Self::Boolean(query)
    }
}

impl From<PhraseQuery> for Query {
    fn from(query: PhraseQuery) -> Self {
        Self::Phrase(query)
    }
}

impl Display for BooleanQuery {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }

            f.write_str(clause.occur.prefix())?;
            match &clause.query {
                Query::Boolean(nested) => write!(f, "({nested})")?,
                other => write!(f, "{other}")?,
            }
        }

        Ok(())
    }
}

impl Display for PhraseQuery {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        let words: Vec<String> = self.terms().map(|term| term.text()).collect();
        write!(f, "{}:\"{}\"", self.field, words.join(" "))
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Term(term) => write!(f, "{term}"),
            Self::Boolean(query) => write!(f, "{query}"),
            Self::Phrase(query) => write!(f, "{query}"),
            Self::MatchAll => f.write_str("*:*"),
            Self::MatchNone => f.write_str("MatchNoDocsQuery"),
            Self::Opaque(description) => f.write_str(description),
        }
    }
}
