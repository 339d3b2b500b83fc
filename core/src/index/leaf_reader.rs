use {
    crate::index::{EmptyTerms, Terms},
    std::{fmt::Debug, io::Result as IoResult},
};

/// Read access to a single immutable segment of an index.
///
/// Implementations are thread safe: any number of concurrent searches may read the same segment.
pub trait LeafReader: Debug + Send + Sync {
    /// The segment name.
    fn name(&self) -> &str;

    /// The number of documents in this segment.
    fn max_doc(&self) -> u64;

    /// Get the [Terms] for this field. This returns `None` if the field does not exist in this segment.
    fn terms(&self, field: &str) -> IoResult<Option<Box<dyn Terms + '_>>>;
}

/// Returns the [Terms] for `field`, or [EmptyTerms] if the segment doesn't have the field.
pub fn get_terms<'a>(reader: &'a dyn LeafReader, field: &str) -> IoResult<Box<dyn Terms + 'a>> {
    match reader.terms(field)? {
        None => Ok(Box::new(EmptyTerms)),
        Some(terms) => Ok(terms),
    }
}
