use {
    crate::io::{Directory, DirectoryReader, DirectoryWriter},
    async_trait::async_trait,
    log::error,
    std::{
        convert::AsRef,
        io::{Error as IoError, ErrorKind as IoErrorKind, Result as IoResult},
        path::{Path, PathBuf},
    },
    tokio::fs::{metadata, read_dir, OpenOptions},
};

/// A [Directory] that stores index files on the local file system.
#[derive(Debug)]
pub struct FilesystemDirectory {
    path: PathBuf,
}

impl FilesystemDirectory {
    /// Returns the path of this directory.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a directory at the given path.
    ///
    /// This will return an error if the directory does not exist.
    pub async fn open<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let path = path.as_ref();
        let md = metadata(path).await?;
        if !md.is_dir() {
            return Err(IoError::new(IoErrorKind::Other, format!("{} is not a directory", path.display())));
        }

        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

const DEFAULT_CAPACITY: usize = 64;

#[async_trait]
impl Directory for FilesystemDirectory {
    async fn read_dir(&self) -> IoResult<Vec<String>> {
        let mut result = Vec::with_capacity(DEFAULT_CAPACITY);

        let mut rd = read_dir(&self.path).await?;
        while let Some(entry) = rd.next_entry().await? {
            let md = entry.metadata().await?;

            // Only include files that we can decode as UTF-8.
            if md.is_file() {
                match entry.file_name().into_string() {
                    Ok(s) => result.push(s),
                    Err(e) => error!("Failed to decode file name as UTF-8: {e:?}"),
                }
            }
        }

        Ok(result)
    }

    async fn create(&self, file_name: &str) -> IoResult<DirectoryWriter> {
        let f = OpenOptions::new().write(true).truncate(true).create(true).open(self.path.join(file_name)).await?;
        Ok(Box::pin(f))
    }

    async fn open(&self, file_name: &str) -> IoResult<DirectoryReader> {
        let f = OpenOptions::new().read(true).open(self.path.join(file_name)).await?;
        Ok(Box::pin(f))
    }
}
