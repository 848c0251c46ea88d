//! Capability-scoped access to the navigator's data directory.
//!
//! Dataset locations are relative paths such as `data/sector-data.json`.
//! [`DataDir`] resolves them beneath a single root opened with ambient
//! authority, so a location cannot climb out of the root with `..` or an
//! absolute path.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io::{self, Read};

/// A directory that dataset locations are resolved against.
#[derive(Debug)]
pub struct DataDir {
    root: Utf8PathBuf,
    dir: fs_utf8::Dir,
}

impl DataDir {
    /// Open `root` using ambient authority.
    ///
    /// # Errors
    ///
    /// Returns the I/O error when the directory cannot be opened.
    pub fn open(root: &Utf8Path) -> io::Result<Self> {
        let dir = fs_utf8::Dir::open_ambient_dir(root, ambient_authority())?;
        Ok(Self {
            root: root.to_path_buf(),
            dir,
        })
    }

    /// Path the directory was opened from.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Read the whole of `location`, relative to the root.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::NotFound`] for missing files and
    /// [`io::ErrorKind::PermissionDenied`] for locations that escape the
    /// root.
    pub fn read(&self, location: &str) -> io::Result<Vec<u8>> {
        let relative = relative_location(location)?;
        let mut file = self.dir.open(relative)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

/// Normalise a dataset location into a path relative to the data root.
///
/// Leading `./` is dropped. Absolute paths and `..` components are rejected.
///
/// # Errors
///
/// Returns [`io::ErrorKind::PermissionDenied`] for locations that would leave
/// the root and [`io::ErrorKind::InvalidInput`] for empty locations.
pub fn relative_location(location: &str) -> io::Result<&Utf8Path> {
    let path = Utf8Path::new(location.trim_start_matches("./"));
    if path.as_str().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "dataset location is empty",
        ));
    }
    let escapes = path.components().any(|component| {
        !matches!(
            component,
            camino::Utf8Component::Normal(_) | camino::Utf8Component::CurDir
        )
    });
    if escapes {
        return Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            format!("dataset location {location} leaves the data directory"),
        ));
    }
    Ok(path)
}
