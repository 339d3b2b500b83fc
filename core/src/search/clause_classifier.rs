use crate::{
    index::Term,
    search::{BooleanClause, BooleanQuery, Occur, Query},
};

/// A top-level clause that is equivalent to a single term match.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TermClause<'q> {
    /// The occur the term effectively has in the outer query.
    pub occur: Occur,

    /// The term to look up.
    pub term: &'q Term,
}

/// The top-level clauses of a [BooleanQuery], split into term-equivalent clauses and the rest.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ClauseClassification<'q> {
    /// Term-equivalent clauses, in query order.
    pub term_clauses: Vec<TermClause<'q>>,

    /// The number of clauses that are not term-equivalent.
    pub non_term_count: usize,
}

/// Classifies the top-level clauses of `query`.
///
/// A clause is term-equivalent when it is a bare term, or a two-clause boolean whose first clause is a bare term.
/// The latter is how a parser expands a negated term (`-cup` becomes `(-cup *:*)`); the term's effective occur is the
/// outer occur, negated when the inner clause is `MustNot`.
///
/// Everything else counts as non-term. Classification only borrows the query.
pub fn classify(query: &BooleanQuery) -> ClauseClassification<'_> {
    let mut classification = ClauseClassification::default();

    for clause in query.clauses() {
        match &clause.query {
            Query::Term(term) => classification.term_clauses.push(TermClause {
                occur: clause.occur,
                term,
            }),
            Query::Boolean(nested) => match nested.clauses() {
                [BooleanClause {
                    occur: inner,
                    query: Query::Term(term),
                }, _] => classification.term_clauses.push(TermClause {
                    occur: effective_occur(clause.occur, *inner),
                    term,
                }),
                _ => classification.non_term_count += 1,
            },
            _ => classification.non_term_count += 1,
        }
    }

    classification
}

fn effective_occur(outer: Occur, inner: Occur) -> Occur {
    match inner {
        Occur::MustNot => outer.negate(),
        Occur::Must | Occur::Should => outer,
    }
}
