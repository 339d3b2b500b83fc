use {
    crate::{
        index::{LeafReader, MemorySegment, SortedTerms, TermMap, TermStatistics, Terms},
        io::{append_footer, check_footer, CodecHeader, Crc32Reader, Directory, EncodingReadExt, EncodingWriteExt},
        GuardError, GuardResult,
    },
    log::debug,
    std::{
        collections::BTreeMap,
        fmt::{Debug, Formatter, Result as FmtResult},
        io::{Error as IoError, ErrorKind as IoErrorKind, Result as IoResult},
    },
    tokio::io::{AsyncWriteExt, BufReader},
};

/// The codec name written in term dictionary headers.
pub const TERM_DICTIONARY_CODEC: &str = "TermDictionary";

/// File extension of term dictionary files.
pub const TERM_DICTIONARY_EXTENSION: &str = "tdict";

const VERSION_START: u32 = 0;
const VERSION_CURRENT: u32 = VERSION_START;

/// A read-only segment loaded from a term dictionary file.
///
/// File layout:
///
/// ```text
/// TermDictionary --> Header, SegmentName, MaxDoc, NumFields, <Field>^NumFields, Footer
/// Field          --> FieldName, NumTerms, <TermEntry>^NumTerms
/// TermEntry      --> TermBytes, DocFreq, TotalTermFreq
/// ```
///
/// Term entries within a field are strictly increasing in byte order. Opening the segment reads and validates the
/// whole file (including the footer checksum) and keeps every field's sorted entries in memory, so exact lookups
/// never touch the directory again.
pub struct TermDictionarySegment {
    file_name: String,
    name: String,
    max_doc: u64,
    fields: BTreeMap<String, TermMap>,
}

impl Debug for TermDictionarySegment {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.debug_struct("TermDictionarySegment")
            .field("file_name", &self.file_name)
            .field("name", &self.name)
            .field("max_doc", &self.max_doc)
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl TermDictionarySegment {
    /// Reads and validates the term dictionary file `file_name`.
    ///
    /// # Errors
    /// Returns [GuardError::IndexReadFailure] if the file cannot be read (including a truncated file), and
    /// [GuardError::CorruptIndex] or a codec error if its contents are invalid.
    pub async fn open(directory: &dyn Directory, file_name: &str) -> GuardResult<Self> {
        let file = directory.open(file_name).await?;
        let mut r = Crc32Reader::new(BufReader::new(file));

        CodecHeader::read(&mut r, TERM_DICTIONARY_CODEC, VERSION_START, VERSION_CURRENT).await?;
        let name = r.read_string().await?;
        let max_doc = r.read_count().await?;
        let num_fields = r.read_vi32().await?;
        if num_fields < 0 {
            return Err(GuardError::CorruptIndex(format!(
                "Term dictionary {file_name} has negative number of fields: {num_fields}"
            )));
        }

        let mut fields = BTreeMap::new();
        for _ in 0..num_fields {
            let field = r.read_string().await?;
            let num_terms = r.read_count().await?;

            let mut terms = TermMap::new();
            for _ in 0..num_terms {
                let term = r.read_bytes().await?;
                let doc_freq = r.read_count().await?;
                let total_term_freq = r.read_count().await?;

                if doc_freq == 0 || doc_freq > max_doc || total_term_freq < doc_freq {
                    return Err(GuardError::CorruptIndex(format!(
                        "Term dictionary {file_name} has invalid statistics for {field}: doc_freq={doc_freq}, total_term_freq={total_term_freq}, max_doc={max_doc}"
                    )));
                }

                // Entries arrive sorted, so a new term must sort after the current last one.
                if terms.last_key_value().map(|(last, _)| last >= &term).unwrap_or(false) {
                    return Err(GuardError::CorruptIndex(format!(
                        "Term dictionary {file_name} has out of order terms in field {field}"
                    )));
                }
                terms.insert(term, TermStatistics::new(doc_freq, total_term_freq));
            }

            debug!("Segment {name} field {field} has {num_terms} terms");
            if fields.contains_key(&field) {
                return Err(GuardError::CorruptIndex(format!("Term dictionary {file_name} repeats field {field}")));
            }
            fields.insert(field, terms);
        }

        check_footer(&mut r).await?;
        debug!("Opened segment {name} from {file_name}: max_doc={max_doc}, {} fields", fields.len());

        Ok(Self {
            file_name: file_name.to_string(),
            name,
            max_doc,
            fields,
        })
    }

    /// The file this segment was read from.
    #[inline]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

impl LeafReader for TermDictionarySegment {
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

/// Writes a [MemorySegment] as a term dictionary file named after the segment. Returns the file name.
pub async fn write_term_dictionary(directory: &dyn Directory, segment: &MemorySegment) -> GuardResult<String> {
    let mut body = Vec::new();
    CodecHeader::new(TERM_DICTIONARY_CODEC, VERSION_CURRENT)?.write(&mut body).await?;
    body.write_string(segment.name()).await?;
    body.write_count(segment.max_doc()).await?;

    let fields: Vec<_> = segment.fields().collect();
    let num_fields: i32 = fields
        .len()
        .try_into()
        .map_err(|_| IoError::new(IoErrorKind::InvalidInput, format!("Too many fields: {}", fields.len())))?;
    body.write_vi32(num_fields).await?;

    for (field, terms) in fields {
        body.write_string(field).await?;
        body.write_count(terms.len() as u64).await?;
        for (term, statistics) in terms {
            body.write_bytes(term).await?;
            body.write_count(statistics.doc_freq).await?;
            body.write_count(statistics.total_term_freq).await?;
        }
    }

    append_footer(&mut body);

    let file_name = format!("{}.{TERM_DICTIONARY_EXTENSION}", segment.name());
    let mut w = directory.create(&file_name).await?;
    w.write_all(&body).await?;
    w.shutdown().await?;
    debug!("Wrote segment {} to {file_name} ({} bytes)", segment.name(), body.len());

    Ok(file_name)
}
