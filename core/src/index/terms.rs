use {
    async_trait::async_trait,
    std::{
        collections::BTreeMap,
        fmt::Debug,
        io::{Error as IoError, ErrorKind as IoErrorKind, Result as IoResult},
        ops::{Add, AddAssign},
    },
};

/// Document frequency and total term frequency of a term. Both are additive across segments; sums saturate at
/// `u64::MAX` instead of overflowing.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct TermStatistics {
    /// The number of documents containing the term.
    pub doc_freq: u64,

    /// The total number of occurrences of the term across all documents.
    pub total_term_freq: u64,
}

impl TermStatistics {
    /// Creates statistics from a document frequency and a total term frequency.
    pub const fn new(doc_freq: u64, total_term_freq: u64) -> Self {
        Self {
            doc_freq,
            total_term_freq,
        }
    }
}

impl Add for TermStatistics {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            doc_freq: self.doc_freq.saturating_add(other.doc_freq),
            total_term_freq: self.total_term_freq.saturating_add(other.total_term_freq),
        }
    }
}

impl AddAssign for TermStatistics {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

/// Access to the term dictionary of a specific field within one segment.
pub trait Terms: Debug + Send + Sync {
    /// Returns an unpositioned enumerator over the terms of this field.
    fn iter(&self) -> IoResult<Box<dyn TermsEnum + '_>>;

    /// Returns the number of terms for this field, or `None` if this measure isn't stored.
    fn size(&self) -> Option<u64>;
}

/// Seeks within a field's term dictionary and exposes the statistics of the term it is positioned on.
///
/// The enumerator is unpositioned when you first obtain it; statistics are only available after a successful
/// [TermsEnum::seek_exact].
#[async_trait]
pub trait TermsEnum: Debug + Send {
    /// Attempts to seek to the exact term, returning true if the term is found. If this returns false, the enum is
    /// unpositioned.
    async fn seek_exact(&mut self, text: &[u8]) -> IoResult<bool>;

    /// Returns the current term, or `None` when unpositioned.
    fn term(&self) -> Option<&[u8]>;

    /// Returns the number of documents containing the current term.
    fn doc_freq(&self) -> IoResult<u64>;

    /// Returns the total number of occurrences of the current term across all documents in the segment.
    fn total_term_freq(&self) -> IoResult<u64>;
}

fn unpositioned() -> IoError {
    IoError::new(IoErrorKind::InvalidInput, "TermsEnum is not positioned on a term")
}

/// The terms of one field, sorted by bytes.
pub(crate) type TermMap = BTreeMap<Vec<u8>, TermStatistics>;

/// [Terms] over a [TermMap] held in memory.
#[derive(Debug)]
pub(crate) struct SortedTerms<'a> {
    terms: &'a TermMap,
}

impl<'a> SortedTerms<'a> {
    pub(crate) fn new(terms: &'a TermMap) -> Self {
        Self {
            terms,
        }
    }
}

impl<'a> Terms for SortedTerms<'a> {
    fn iter(&self) -> IoResult<Box<dyn TermsEnum + '_>> {
        Ok(Box::new(SortedTermsEnum {
            terms: self.terms,
            current: None,
        }))
    }

    fn size(&self) -> Option<u64> {
        Some(self.terms.len() as u64)
    }
}

#[derive(Debug)]
struct SortedTermsEnum<'a> {
    terms: &'a TermMap,
    current: Option<(&'a [u8], TermStatistics)>,
}

#[async_trait]
impl<'a> TermsEnum for SortedTermsEnum<'a> {
    async fn seek_exact(&mut self, text: &[u8]) -> IoResult<bool> {
        self.current = self.terms.get_key_value(text).map(|(term, statistics)| (term.as_slice(), *statistics));
        Ok(self.current.is_some())
    }

    fn term(&self) -> Option<&[u8]> {
        self.current.map(|(term, _)| term)
    }

    fn doc_freq(&self) -> IoResult<u64> {
        self.current.map(|(_, statistics)| statistics.doc_freq).ok_or_else(unpositioned)
    }

    fn total_term_freq(&self) -> IoResult<u64> {
        self.current.map(|(_, statistics)| statistics.total_term_freq).ok_or_else(unpositioned)
    }
}

/// An empty [Terms] which returns no terms.
#[derive(Clone, Debug, Default)]
pub struct EmptyTerms;

impl Terms for EmptyTerms {
    fn iter(&self) -> IoResult<Box<dyn TermsEnum + '_>> {
        Ok(Box::new(EmptyTermsEnum))
    }

    fn size(&self) -> Option<u64> {
        Some(0)
    }
}

/// A [TermsEnum] over no terms; every seek fails.
#[derive(Clone, Debug, Default)]
pub struct EmptyTermsEnum;

#[async_trait]
impl TermsEnum for EmptyTermsEnum {
    async fn seek_exact(&mut self, _text: &[u8]) -> IoResult<bool> {
        Ok(false)
    }

    fn term(&self) -> Option<&[u8]> {
        None
    }

    fn doc_freq(&self) -> IoResult<u64> {
        Err(unpositioned())
    }

    fn total_term_freq(&self) -> IoResult<u64> {
        Err(unpositioned())
    }
}
