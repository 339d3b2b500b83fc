use {
    crc32fast::Hasher,
    pin_project::pin_project,
    std::{
        fmt::{Debug, Formatter, Result as FmtResult},
        io::Result as IoResult,
        pin::Pin,
        task::{ready, Context, Poll},
    },
    tokio::io::{AsyncRead, ReadBuf},
};

/// Hashes everything read through it, so a footer checksum can be verified after a single sequential pass.
#[pin_project]
pub struct Crc32Reader<T> {
    #[pin]
    wrapped: T,
    digest: Hasher,
}

impl<T> Crc32Reader<T> {
    /// Creates a new `Crc32Reader` that wraps the given [AsyncRead].
    pub fn new(wrapped: T) -> Self {
        Self {
            wrapped,
            digest: Hasher::new(),
        }
    }

    /// Returns the CRC32 of the data read so far.
    pub fn digest(&self) -> u32 {
        self.digest.clone().finalize()
    }
}

impl<T> Debug for Crc32Reader<T> {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "Crc32Reader(digest={:#010x})", self.digest())
    }
}

impl<T: AsyncRead> AsyncRead for Crc32Reader<T> {
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<IoResult<()>> {
        let this = self.project();
        let start = buf.filled().len();
        ready!(this.wrapped.poll_read(cx, buf))?;

        // The buffer may arrive partially filled; only hash what this read added.
        this.digest.update(&buf.filled()[start..]);
        Poll::Ready(Ok(()))
    }
}
