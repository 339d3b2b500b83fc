use {
    crate::io::{CODEC_MAGIC, FOOTER_MAGIC},
    std::{
        error::Error,
        fmt::{Display, Formatter, Result as FmtResult},
        io::Error as IoError,
    },
};

/// Errors that can occur while guarding a query.
#[derive(Debug)]
pub enum GuardError {
    /// The policy configuration is invalid. This is fatal at startup.
    InvalidConfiguration(String),

    /// Several expensive term clauses mix occur kinds that the rewriting policy refuses to interpret. This is a
    /// client input error and carries the textual form of the query.
    AmbiguousExpensiveQuery(String),

    /// The query shape is not allowed by the active policy. Carries the textual form of the query.
    ForbiddenQuery(String),

    /// An I/O error occurred while reading index structures.
    IndexReadFailure(IoError),

    /// A term dictionary file is corrupt.
    CorruptIndex(String),

    /// A codec header did not start with [CODEC_MAGIC].
    InvalidCodecHeaderMagic([u8; 4]),

    /// A codec footer did not start with [FOOTER_MAGIC].
    InvalidCodecFooterMagic([u8; 4]),

    /// The codec name in a file is incorrect and was expected to be something else.
    IncorrectCodecName(String /* actual */, String /* expected */),

    /// A given codec version is unsupported.
    UnsupportedCodecVersion(String, u32, u32, u32),
}

impl Display for GuardError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::InvalidConfiguration(message) => write!(f, "Invalid configuration: {message}"),
            Self::AmbiguousExpensiveQuery(query) => {
                write!(f, "Refusing to execute ambiguous expensive query: {query}")
            }
            Self::ForbiddenQuery(query) => write!(f, "Query not allowed: {query}"),
            Self::IndexReadFailure(e) => write!(f, "Failed to read index: {e}"),
            Self::CorruptIndex(message) => write!(f, "Corrupt index: {message}"),
            Self::InvalidCodecHeaderMagic(actual) => {
                write!(f, "Invalid codec header: got {actual:#x?}, expected {CODEC_MAGIC:#x?}")
            }
            Self::InvalidCodecFooterMagic(actual) => {
                write!(f, "Invalid codec footer: got {actual:#x?}, expected {FOOTER_MAGIC:#x?}")
            }
            Self::IncorrectCodecName(actual, expected) => {
                write!(f, "Incorrect codec name: got {actual:?}, expected {expected:?}")
            }
            Self::UnsupportedCodecVersion(name, actual, min, max) => write!(
                f,
                "Codec version mismatch: {name} version {actual} is not supported (must be between {min} and {max})"
            ),
        }
    }
}

impl Error for GuardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::IndexReadFailure(e) => Some(e),
            _ => None,
        }
    }
}

impl From<IoError> for GuardError {
    fn from(e: IoError) -> Self {
        Self::IndexReadFailure(e)
    }
}

/// A type alias for a `Result` with a [GuardError].
pub type GuardResult<T> = Result<T, GuardError>;
