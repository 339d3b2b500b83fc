use {
    crate::index::{LeafReader, SortedTerms, TermMap, TermStatistics, Terms},
    std::{
        collections::{BTreeMap, HashMap},
        io::Result as IoResult,
    },
};

/// A segment held entirely in memory.
///
/// Documents are fed already tokenized: each document is a list of `(field, tokens)` pairs. Only term statistics
/// are kept; there are no postings or stored fields.
#[derive(Clone, Debug, Default)]
pub struct MemorySegment {
    name: String,
    max_doc: u64,
    fields: BTreeMap<String, TermMap>,
}

impl MemorySegment {
    /// Creates an empty segment named `name`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Adds one document. A token repeated within a field counts once toward the document frequency and once per
    /// occurrence toward the total term frequency.
    pub fn add_document(&mut self, fields: &[(&str, &[&str])]) {
        for (field, tokens) in fields {
            let mut occurrences: HashMap<&str, u64> = HashMap::new();
            for token in tokens.iter() {
                *occurrences.entry(*token).or_default() += 1;
            }

            let field_terms = self.fields.entry(field.to_string()).or_default();
            for (token, count) in occurrences {
                *field_terms.entry(token.as_bytes().to_vec()).or_default() += TermStatistics::new(1, count);
            }
        }

        self.max_doc += 1;
    }

    /// Overrides the statistics recorded for a term. Useful to model large segments without feeding every document.
    pub fn set_term_statistics(&mut self, field: &str, term: &[u8], statistics: TermStatistics) {
        self.max_doc = self.max_doc.max(statistics.doc_freq);
        self.fields.entry(field.to_string()).or_default().insert(term.to_vec(), statistics);
    }

    /// Iterates over fields (in name order) and their sorted terms.
    pub(crate) fn fields(&self) -> impl Iterator<Item = (&str, &TermMap)> {
        self.fields.iter().map(|(field, terms)| (field.as_str(), terms))
    }
}

impl LeafReader for MemorySegment {
    fn name(&self) -> &str {
        &self.name
    }

    fn max_doc(&self) -> u64 {
        self.max_doc
    }

    fn terms(&self, field: &str) -> IoResult<Option<Box<dyn Terms + '_>>> {
        Ok(self.fields.get(field).map(|terms| {
            let terms: Box<dyn Terms + '_> = Box::new(SortedTerms::new(terms));
            terms
        }))
    }
}
