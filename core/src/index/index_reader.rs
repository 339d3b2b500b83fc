use {
    crate::{
        index::{LeafReader, TermDictionarySegment, TERM_DICTIONARY_EXTENSION},
        io::Directory,
        GuardResult,
    },
    log::debug,
    std::sync::Arc,
};

/// A segment of an [IndexReader] along with its position in the index.
#[derive(Clone, Debug)]
pub struct LeafReaderContext {
    ord: usize,
    doc_base: u64,
    reader: Arc<dyn LeafReader>,
}

impl LeafReaderContext {
    /// The reader's ord in the top-level's leaves array.
    #[inline]
    pub fn ord(&self) -> usize {
        self.ord
    }

    /// The reader's absolute doc base.
    #[inline]
    pub fn doc_base(&self) -> u64 {
        self.doc_base
    }

    /// The segment itself.
    #[inline]
    pub fn reader(&self) -> &dyn LeafReader {
        self.reader.as_ref()
    }
}

/// A read-only snapshot of an index: the ordered union of its segments.
///
/// The snapshot never changes once built. Share it between searches with an `Arc` (or by cloning, which only clones
/// segment handles); to observe new segments, build a new reader.
#[derive(Clone, Debug, Default)]
pub struct IndexReader {
    leaves: Vec<LeafReaderContext>,
}

impl IndexReader {
    /// Creates a snapshot over the given segments, in order.
    pub fn new(segments: Vec<Arc<dyn LeafReader>>) -> Self {
        let mut doc_base = 0;
        let leaves = segments
            .into_iter()
            .enumerate()
            .map(|(ord, reader)| {
                let leaf = LeafReaderContext {
                    ord,
                    doc_base,
                    reader,
                };
                doc_base = doc_base.saturating_add(leaf.reader.max_doc());
                leaf
            })
            .collect();

        Self {
            leaves,
        }
    }

    /// Opens every term dictionary file in the directory, ordered by file name.
    pub async fn open(directory: &dyn Directory) -> GuardResult<Self> {
        let mut file_names: Vec<String> = directory
            .read_dir()
            .await?
            .into_iter()
            .filter(|name| {
                name.rsplit_once('.').map(|(_, extension)| extension == TERM_DICTIONARY_EXTENSION).unwrap_or(false)
            })
            .collect();
        file_names.sort();
        debug!("Opening {} segments from {directory:?}: {file_names:?}", file_names.len());

        let mut segments: Vec<Arc<dyn LeafReader>> = Vec::with_capacity(file_names.len());
        for file_name in file_names {
            let segment = TermDictionarySegment::open(directory, &file_name).await?;
            segments.push(Arc::new(segment));
        }

        Ok(Self::new(segments))
    }

    /// Returns the segments of this snapshot.
    #[inline]
    pub fn leaves(&self) -> &[LeafReaderContext] {
        &self.leaves
    }

    /// Returns the total number of documents across all segments, saturating at `u64::MAX`.
    pub fn max_doc(&self) -> u64 {
        self.leaves.iter().fold(0u64, |total, leaf| total.saturating_add(leaf.reader.max_doc()))
    }
}
