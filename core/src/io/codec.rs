use {
    crate::{
        io::{Crc32Reader, EncodingReadExt, EncodingWriteExt},
        GuardError, GuardResult,
    },
    std::io::{Error as IoError, ErrorKind as IoErrorKind, Result as IoResult},
    tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt},
};

/// Constant to identify the start of a codec header.
pub const CODEC_MAGIC: [u8; 4] = [0x3f, 0xd7, 0x6c, 0x17];

/// Constant to identify the start of a codec footer -- bit inversion of [CODEC_MAGIC].
pub const FOOTER_MAGIC: [u8; 4] = [0xc0, 0x28, 0x93, 0xe8];

/// The only checksum algorithm written in footers (CRC32).
pub const FOOTER_CHECKSUM_ALGORITHM: u32 = 0;

/// A codec header: magic bytes, codec name and version.
#[derive(Debug)]
pub struct CodecHeader {
    codec: String,
    version: u32,
}

impl CodecHeader {
    /// Create a new codec header from the given codec name and version.
    ///
    /// # Errors
    /// Returns an [IoErrorKind::InvalidInput] error if the codec name is too long or contains non-ASCII characters.
    pub fn new(codec: &str, version: u32) -> IoResult<Self> {
        if codec.len() > 127 || !codec.is_ascii() {
            return Err(IoError::new(
                IoErrorKind::InvalidInput,
                format!("Invalid codec name: {codec:?} is not a valid ASCII string under 128 bytes"),
            ));
        }

        Ok(Self {
            codec: codec.to_string(),
            version,
        })
    }

    /// Reads and verifies that the codec header has the correct magic bytes, the specified codec name, and that the
    /// version falls within the specified range.
    pub async fn read<R: AsyncRead + Unpin + Send>(
        r: &mut R,
        codec: &str,
        min_version: u32,
        max_version: u32,
    ) -> GuardResult<Self> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic).await?;

        if magic != CODEC_MAGIC {
            return Err(GuardError::InvalidCodecHeaderMagic(magic));
        }

        let actual_codec = r.read_string().await?;
        if actual_codec != codec {
            return Err(GuardError::IncorrectCodecName(actual_codec, codec.to_string()));
        }

        let version = r.read_u32().await?;
        if version < min_version || version > max_version {
            return Err(GuardError::UnsupportedCodecVersion(codec.to_string(), version, min_version, max_version));
        }

        Ok(Self {
            codec: codec.to_string(),
            version,
        })
    }

    /// Writes a codec header.
    ///
    /// CodecHeader --> Magic + CodecName + Version
    ///
    /// * Magic (4 bytes): This identifies the start of the header and is always [CODEC_MAGIC].
    /// * CodecName ([EncodingWriteExt::write_string]): This is a string to identify this file.
    /// * Version (BE u32): Records the version of the file.
    pub async fn write<W: AsyncWriteExt + Unpin + Send>(&self, w: &mut W) -> IoResult<()> {
        w.write_all(&CODEC_MAGIC).await?;
        w.write_string(&self.codec).await?;
        w.write_u32(self.version).await?;
        Ok(())
    }
}

/// Appends a codec footer to a fully-encoded file body.
///
/// Footer --> Magic + AlgorithmId + Checksum
///
/// The checksum is the CRC32 of every byte before it, including the footer magic and algorithm id, stored as a BE u64.
pub fn append_footer(body: &mut Vec<u8>) {
    body.extend_from_slice(&FOOTER_MAGIC);
    body.extend_from_slice(&FOOTER_CHECKSUM_ALGORITHM.to_be_bytes());
    let checksum = crc32fast::hash(body) as u64;
    body.extend_from_slice(&checksum.to_be_bytes());
}

/// Reads the codec footer from a [Crc32Reader] positioned at the end of the body and verifies the checksum.
pub async fn check_footer<R: AsyncRead + Unpin + Send>(r: &mut Crc32Reader<R>) -> GuardResult<()> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic).await?;
    if magic != FOOTER_MAGIC {
        return Err(GuardError::InvalidCodecFooterMagic(magic));
    }

    let algorithm = r.read_u32().await?;
    if algorithm != FOOTER_CHECKSUM_ALGORITHM {
        return Err(GuardError::CorruptIndex(format!("Unknown checksum algorithm id {algorithm} in footer")));
    }

    let actual = r.digest() as u64;
    let expected = r.read_u64().await?;
    if actual != expected {
        return Err(GuardError::CorruptIndex(format!(
            "Checksum mismatch: footer records {expected:#010x}, data has {actual:#010x}"
        )));
    }

    // Nothing may follow the footer.
    let mut trailing = [0u8; 1];
    if r.read(&mut trailing).await? != 0 {
        return Err(GuardError::CorruptIndex("Unexpected data after codec footer".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        super::{append_footer, check_footer, CodecHeader},
        crate::{io::Crc32Reader, GuardError},
        pretty_assertions::assert_eq,
        std::io::ErrorKind as IoErrorKind,
    };

    #[test_log::test(tokio::test)]
    async fn test_write_header() {
        let header = CodecHeader::new("test", 1).unwrap();
        let mut buf = Vec::new();
        header.write(&mut buf).await.unwrap();
        assert_eq!(buf, vec![0x3f, 0xd7, 0x6c, 0x17, 0x4, 0x74, 0x65, 0x73, 0x74, 0x0, 0x0, 0x0, 0x1]);
    }

    #[test]
    fn test_invalid_codec_name() {
        for name in ["caf\u{e9}", &"x".repeat(128)] {
            let e = CodecHeader::new(name, 0).unwrap_err();
            assert_eq!(e.kind(), IoErrorKind::InvalidInput);
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_header_version_out_of_range() {
        let mut buf = Vec::new();
        CodecHeader::new("test", 7).unwrap().write(&mut buf).await.unwrap();
        let mut r = buf.as_slice();
        let e = CodecHeader::read(&mut r, "test", 0, 1).await.unwrap_err();
        assert!(matches!(e, GuardError::UnsupportedCodecVersion(_, 7, 0, 1)));
    }

    #[test_log::test(tokio::test)]
    async fn test_header_wrong_codec() {
        let mut buf = Vec::new();
        CodecHeader::new("other", 0).unwrap().write(&mut buf).await.unwrap();
        let mut r = buf.as_slice();
        let e = CodecHeader::read(&mut r, "test", 0, 1).await.unwrap_err();
        assert!(matches!(e, GuardError::IncorrectCodecName(actual, _) if actual == "other"));
    }

    #[test_log::test(tokio::test)]
    async fn test_footer_detects_corruption() {
        let mut body = b"segment body".to_vec();
        append_footer(&mut body);

        let mut r = Crc32Reader::new(&body[12..]);
        // Skipping the body changes the digest, so the checksum cannot match.
        assert!(matches!(check_footer(&mut r).await, Err(GuardError::CorruptIndex(_))));

        let mut r = Crc32Reader::new(body.as_slice());
        let mut skipped = [0u8; 12];
        tokio::io::AsyncReadExt::read_exact(&mut r, &mut skipped).await.unwrap();
        check_footer(&mut r).await.unwrap();
    }
}
