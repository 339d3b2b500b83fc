use {
    crate::{
        index::{get_terms, IndexReader, TermStatistics},
        search::TermClause,
    },
    log::debug,
    std::io::Result as IoResult,
};

/// Aggregates the statistics of each clause's term over every segment of `reader`.
///
/// The result is parallel to `clauses`. A segment without the field or the term contributes nothing, so a term found
/// nowhere reports zero. Segments are visited once each, in order; any I/O error aborts the collection.
pub async fn collect_term_statistics(reader: &IndexReader, clauses: &[TermClause<'_>]) -> IoResult<Vec<TermStatistics>> {
    let mut statistics = vec![TermStatistics::default(); clauses.len()];

    for leaf in reader.leaves() {
        let segment = leaf.reader();
        for (clause, total) in clauses.iter().zip(statistics.iter_mut()) {
            let terms = get_terms(segment, clause.term.field())?;
            let mut terms_enum = terms.iter()?;
            if terms_enum.seek_exact(clause.term.bytes()).await? {
                *total += TermStatistics::new(terms_enum.doc_freq()?, terms_enum.total_term_freq()?);
            }
        }
    }

    for (clause, total) in clauses.iter().zip(statistics.iter()) {
        debug!(
            "Term {} has doc_freq={} total_term_freq={} across {} segments",
            clause.term,
            total.doc_freq,
            total.total_term_freq,
            reader.leaves().len()
        );
    }

    Ok(statistics)
}
