//! Filesystem primitives used by the page generator.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use crate::domain::errors::WriteStage;

/// Create `dir` and any missing ancestors. An existing directory is not an error.
pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

/// Write `contents` to `path` with truncate-or-create semantics.
///
/// The data is synced to disk before the handle is released, so deferred I/O
/// errors surface here instead of being lost on drop. The handle is scoped to
/// this call and closed on every exit path. On failure the stage that failed is
/// returned alongside the cause.
pub fn write_truncate(path: &Path, contents: &str) -> Result<(), (WriteStage, io::Error)> {
    let mut file = File::create(path).map_err(|err| (WriteStage::Open, err))?;
    file.write_all(contents.as_bytes())
        .map_err(|err| (WriteStage::Write, err))?;
    file.sync_all().map_err(|err| (WriteStage::Sync, err))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_directory_accepts_existing_directory() -> io::Result<()> {
        let temp = tempfile::tempdir()?;
        let nested = temp.path().join("a/b/c");
        ensure_directory(&nested)?;
        ensure_directory(&nested)?;
        assert!(nested.is_dir());
        Ok(())
    }

    #[test]
    fn write_truncate_replaces_longer_contents() -> io::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("page.html");
        fs::write(&path, "a much longer previous body")?;
        write_truncate(&path, "short").map_err(|(_, err)| err)?;
        assert_eq!(fs::read_to_string(&path)?, "short");
        Ok(())
    }

    #[test]
    fn write_truncate_creates_missing_file() -> io::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("fresh.html");
        write_truncate(&path, "© body").map_err(|(_, err)| err)?;
        assert_eq!(fs::read(&path)?, "© body".as_bytes());
        Ok(())
    }

    #[test]
    fn write_truncate_reports_open_stage() -> io::Result<()> {
        let temp = tempfile::tempdir()?;
        let (stage, _) = write_truncate(temp.path(), "body").unwrap_err();
        assert_eq!(stage, WriteStage::Open);
        Ok(())
    }
}
