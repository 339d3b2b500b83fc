use {
    async_trait::async_trait,
    std::{fmt::Debug, io::Result as IoResult, pin::Pin},
    tokio::io::{AsyncRead, AsyncWrite},
};

/// A boxed reader handed out by a [Directory].
pub type DirectoryReader = Pin<Box<dyn AsyncRead + Send>>;

/// A boxed writer handed out by a [Directory].
pub type DirectoryWriter = Pin<Box<dyn AsyncWrite + Send>>;

/// A `Directory` is an abstraction for providing a file-like view of an index. A `Directory` contains only files and
/// no subdirectories.
///
/// This is not necessarily a filesystem directory. The underlying storage can be elsewhere, such as a database or
/// other networked resource, or in memory.
///
/// Readers only need shared access; an opened index keeps its directory behind an `Arc` and reopens files on demand.
#[async_trait]
pub trait Directory: Debug + Send + Sync {
    /// Returns a listing of the files in this directory.
    async fn read_dir(&self) -> IoResult<Vec<String>>;

    /// Creates a new file for writing.
    ///
    /// If the file already exists, it will be overwritten.
    async fn create(&self, file_name: &str) -> IoResult<DirectoryWriter>;

    /// Opens an existing file for reading.
    async fn open(&self, file_name: &str) -> IoResult<DirectoryReader>;
}
