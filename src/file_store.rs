use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Minimal file access used by the session log.
pub trait FileStore {
    fn exists(&self, path: &Path) -> bool;

    /// Returns `Ok(None)` when the file does not exist.
    fn read(&self, path: &Path) -> io::Result<Option<String>>;

    /// Replaces the whole file. Readers never observe a partial write.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// Local file system, replacing files via a synced sibling temp file and rename.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileStore;

impl FileStore for FsFileStore {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read(&self, path: &Path) -> io::Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = temp_path(path)?;
        let result = (|| {
            let mut tmp = File::create(&tmp_path)?;
            tmp.write_all(contents.as_bytes())?;
            tmp.sync_all()?;
            drop(tmp);
            fs::rename(&tmp_path, path)
        })();

        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        result
    }
}

fn temp_path(path: &Path) -> io::Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "path has no file name")
    })?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}
