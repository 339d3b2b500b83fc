use {
    async_trait::async_trait,
    std::io::{Error as IoError, ErrorKind as IoErrorKind, Result as IoResult},
    tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
};

/// Reads a VByte integer of at most `max_len` bytes: seven payload bits per byte, least significant group first, high
/// bit set on every byte but the last.
async fn read_vbyte<R: AsyncRead + Unpin + Send + ?Sized>(r: &mut R, max_len: u32, kind: &str) -> IoResult<u64> {
    let mut value = 0u64;
    for i in 0..max_len {
        let b = r.read_u8().await?;
        value |= u64::from(b & 0x7f) << (7 * i);
        if b & 0x80 == 0 {
            return Ok(value);
        }
    }

    Err(IoError::new(IoErrorKind::InvalidData, format!("Cannot read a {kind} longer than {max_len} bytes")))
}

async fn write_vbyte<W: AsyncWrite + Unpin + Send + ?Sized>(w: &mut W, mut value: u64) -> IoResult<()> {
    while value >= 0x80 {
        w.write_u8(value as u8 | 0x80).await?;
        value >>= 7;
    }
    w.write_u8(value as u8).await
}

/// Decoding of index file primitives on top of `AsyncRead`.
///
/// Integers use VByte: 0 to 127 take one byte, 128 to 16,383 take two, and so on. Negative values always take the
/// maximum length (five bytes for a vi32).
///
/// ```text
///        value   bytes
///            0   00000000
///          127   01111111
///          128   10000000 00000001
///       16_384   10000000 10000000 00000001
/// ```
///
/// The returned futures are `Send` so that index reads can be driven from any worker thread.
#[async_trait]
pub trait EncodingReadExt: AsyncReadExt + Unpin + Send {
    /// Reads a [EncodingReadExt::read_bytes] value as UTF-8.
    ///
    /// # Errors
    /// Returns an [IoErrorKind::InvalidData] error if the length is negative or the string is not valid UTF-8.
    async fn read_string(&mut self) -> IoResult<String> {
        let bytes = self.read_bytes().await?;
        String::from_utf8(bytes).map_err(|e| IoError::new(IoErrorKind::InvalidData, e))
    }

    /// Reads a length-prefixed byte string. The length is a [EncodingReadExt::read_vi32] value.
    ///
    /// The buffer grows with the data actually present, so a corrupt length cannot force a large allocation.
    async fn read_bytes(&mut self) -> IoResult<Vec<u8>> {
        let len = self.read_vi32().await?;
        let len: u64 = len
            .try_into()
            .map_err(|_| IoError::new(IoErrorKind::InvalidData, format!("Negative byte string length: {len}")))?;

        let mut bytes = Vec::new();
        let read = (&mut *self).take(len).read_to_end(&mut bytes).await?;
        if read as u64 != len {
            return Err(IoError::new(
                IoErrorKind::UnexpectedEof,
                format!("Byte string ended after {read} of {len} bytes"),
            ));
        }
        Ok(bytes)
    }

    /// Reads a vi32 (one to five bytes).
    async fn read_vi32(&mut self) -> IoResult<i32> {
        Ok(read_vbyte(self, 5, "vi32").await? as i32)
    }

    /// Reads a vi64 (one to nine bytes).
    async fn read_vi64(&mut self) -> IoResult<i64> {
        Ok(read_vbyte(self, 9, "vi64").await? as i64)
    }

    /// Reads a non-negative count stored as a [EncodingReadExt::read_vi64] value.
    async fn read_count(&mut self) -> IoResult<u64> {
        let value = self.read_vi64().await?;
        value.try_into().map_err(|_| IoError::new(IoErrorKind::InvalidData, format!("Negative count: {value}")))
    }
}

impl<R: AsyncRead + Unpin + Send + ?Sized> EncodingReadExt for R {}

/// Encoding counterpart of [EncodingReadExt].
#[async_trait]
pub trait EncodingWriteExt: AsyncWriteExt + Unpin + Send {
    /// Writes a string as its UTF-8 bytes (see [EncodingWriteExt::write_bytes]).
    async fn write_string(&mut self, s: &str) -> IoResult<()> {
        self.write_bytes(s.as_bytes()).await
    }

    /// Writes a vi32 length followed by the bytes.
    async fn write_bytes(&mut self, bytes: &[u8]) -> IoResult<()> {
        let len: i32 = bytes
            .len()
            .try_into()
            .map_err(|_| IoError::new(IoErrorKind::InvalidInput, "Byte string too long"))?;
        self.write_vi32(len).await?;
        self.write_all(bytes).await
    }

    /// Writes a vi32.
    async fn write_vi32(&mut self, i: i32) -> IoResult<()> {
        write_vbyte(self, u64::from(i as u32)).await
    }

    /// Writes a vi64. Negative values are written but cannot be read back as counts.
    async fn write_vi64(&mut self, i: i64) -> IoResult<()> {
        write_vbyte(self, i as u64).await
    }

    /// Writes a count. Counts above `i64::MAX` are rejected.
    async fn write_count(&mut self, count: u64) -> IoResult<()> {
        let count: i64 = count
            .try_into()
            .map_err(|_| IoError::new(IoErrorKind::InvalidInput, format!("Count too large: {count}")))?;
        self.write_vi64(count).await
    }
}

impl<W: AsyncWrite + Unpin + Send + ?Sized> EncodingWriteExt for W {}

#[cfg(test)]
mod tests {
    use {
        super::{EncodingReadExt, EncodingWriteExt},
        pretty_assertions::assert_eq,
        std::io::ErrorKind as IoErrorKind,
    };

    #[test_log::test(tokio::test)]
    async fn test_write_vi32() {
        let mut buf = Vec::new();

        for i in 0..127 {
            buf.write_vi32(i).await.unwrap();
            assert_eq!(buf, vec![i as u8]);
            buf.clear();
        }

        buf.write_vi32(128).await.unwrap();
        assert_eq!(buf, vec![0b1000_0000, 0b0000_0001]);
        buf.clear();

        buf.write_vi32(16383).await.unwrap();
        assert_eq!(buf, vec![0b1111_1111, 0b0111_1111]);
        buf.clear();

        buf.write_vi32(16384).await.unwrap();
        assert_eq!(buf, vec![0b1000_0000, 0b1000_0000, 0b0000_0001]);
        buf.clear();

        buf.write_vi32(-1).await.unwrap();
        assert_eq!(buf, vec![0b1111_1111, 0b1111_1111, 0b1111_1111, 0b1111_1111, 0b0000_1111]);
    }

    #[test_log::test(tokio::test)]
    async fn test_read_vi64_large() {
        let mut buf = Vec::new();
        buf.write_vi64(5_000_000_000).await.unwrap();
        let mut r = buf.as_slice();
        assert_eq!(r.read_vi64().await.unwrap(), 5_000_000_000);
    }

    #[test_log::test(tokio::test)]
    async fn test_read_vi32_too_long() {
        let buf = [0xffu8; 6];
        let mut r = &buf[..];
        let e = r.read_vi32().await.unwrap_err();
        assert_eq!(e.kind(), IoErrorKind::InvalidData);
    }

    #[test_log::test(tokio::test)]
    async fn test_write_string() {
        let mut buf = Vec::new();
        buf.write_string("hello").await.unwrap();
        assert_eq!(buf, vec![5, 104, 101, 108, 108, 111]);
    }

    #[test_log::test(tokio::test)]
    async fn test_read_invalid_utf8() {
        let buf = [2u8, 0xc3, 0x28];
        let mut r = &buf[..];
        let e = r.read_string().await.unwrap_err();
        assert_eq!(e.kind(), IoErrorKind::InvalidData);
    }

    #[test_log::test(tokio::test)]
    async fn test_read_bytes_length_beyond_data() {
        let mut buf = Vec::new();
        buf.write_vi32(1 << 30).await.unwrap();
        buf.extend_from_slice(b"cup");
        let mut r = buf.as_slice();
        let e = r.read_bytes().await.unwrap_err();
        assert_eq!(e.kind(), IoErrorKind::UnexpectedEof);

        let buf = [3u8, b'c', b'u', b'p', b'!'];
        let mut r = &buf[..];
        assert_eq!(r.read_bytes().await.unwrap(), b"cup".to_vec());
        assert_eq!(r, &b"!"[..]);
    }

    #[test_log::test(tokio::test)]
    async fn test_negative_count_rejected() {
        let mut buf = Vec::new();
        buf.write_vi64(-3).await.unwrap();
        let mut r = buf.as_slice();
        let e = r.read_count().await.unwrap_err();
        assert_eq!(e.kind(), IoErrorKind::InvalidData);
    }
}
