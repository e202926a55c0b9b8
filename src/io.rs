use std::path::{Path, PathBuf};

use tempfile::{NamedTempFile, PersistError};

use crate::result::{Error, Result};

/// Create the directory and all its missing parents
pub fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(Error::io(dir))
}

/// Create a hidden temporary file in `dir` to stream a download into.
///
/// The file destructor will be called at the handle drop,
/// so an unfinished download never leaves anything behind.
pub fn partial_file(dir: &Path) -> Result<NamedTempFile> {
    tempfile::Builder::new()
        .prefix(".sedot-")
        .suffix(".part")
        .tempfile_in(dir)
        .map_err(Error::io(dir))
}

/// Move a completed temporary file to its final destination.
///
/// Unless `overwrite` is set, an existing destination is left untouched.
pub fn persist(file: NamedTempFile, destination: &Path, overwrite: bool) -> Result<PathBuf> {
    let res = if overwrite {
        file.persist(destination)
    } else {
        file.persist_noclobber(destination)
    };

    match res {
        Ok(_) => Ok(destination.to_path_buf()),
        Err(PersistError { error, .. }) if error.kind() == std::io::ErrorKind::AlreadyExists => {
            Err(Error::AlreadyExists {
                path: destination.to_path_buf(),
            })
        }
        Err(PersistError { error, .. }) => Err(Error::io(destination)(error)),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn persist_noclobber_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("clip.mp4");
        std::fs::write(&destination, b"old").unwrap();

        let mut file = partial_file(dir.path()).unwrap();
        file.write_all(b"new").unwrap();
        let err = persist(file, &destination, false).unwrap_err();

        assert!(matches!(err, Error::AlreadyExists { .. }));
        assert_eq!(std::fs::read(&destination).unwrap(), b"old");
        // The temporary file is gone with the error
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn persist_overwrite_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("clip.mp4");
        std::fs::write(&destination, b"old").unwrap();

        let mut file = partial_file(dir.path()).unwrap();
        file.write_all(b"new").unwrap();
        let path = persist(file, &destination, true).unwrap();

        assert_eq!(path, destination);
        assert_eq!(std::fs::read(&destination).unwrap(), b"new");
    }
}
