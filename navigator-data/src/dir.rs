//! Dataset source backed by a local directory.

use std::{io, sync::Arc};

use async_trait::async_trait;
use camino::Utf8Path;
use log::debug;
use navigator_fs::DataDir;

use crate::{DatasetSource, TransportError};

/// Reads datasets from files beneath a root directory.
///
/// Reads run on Tokio's blocking pool so the calling task keeps polling the
/// other fetches of a batch.
#[derive(Debug, Clone)]
pub struct DirDatasetSource {
    dir: Arc<DataDir>,
}

impl DirDatasetSource {
    /// Open `root` as the dataset directory.
    ///
    /// # Errors
    ///
    /// Returns the I/O error when the directory cannot be opened.
    pub fn open(root: &Utf8Path) -> io::Result<Self> {
        Ok(Self {
            dir: Arc::new(DataDir::open(root)?),
        })
    }

    /// Directory locations are resolved against.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        self.dir.root()
    }
}

#[async_trait(?Send)]
impl DatasetSource for DirDatasetSource {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, TransportError> {
        debug!("Reading {location} from {}", self.dir.root());
        let dir = Arc::clone(&self.dir);
        let owned = location.to_owned();
        let joined = tokio::task::spawn_blocking(move || dir.read(&owned)).await;
        let read = joined.map_err(|err| TransportError::Io {
            location: location.to_owned(),
            source: io::Error::other(err),
        })?;
        read.map_err(|source| TransportError::Io {
            location: location.to_owned(),
            source,
        })
    }
}
