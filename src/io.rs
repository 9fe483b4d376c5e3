//! File-level I/O for archive pairs.
//!
//! Inputs are opened read-only and memory-mapped; all parsing and copying
//! happens over the mapped byte slices. Outputs are staged in a temporary
//! file in the destination directory and renamed into place on success, so
//! a failure mid-write never leaves a partial `.gma`/`.tpl` behind.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use tempfile::NamedTempFile;
use tracing::info;

use crate::ArchivePair;
use crate::error::{Error, Result};

/// The `.gma`/`.tpl` paths derived from an extension-less base name.
pub fn pair_paths(base: &Path) -> (PathBuf, PathBuf) {
    let mut gma = base.as_os_str().to_owned();
    gma.push(".gma");
    let mut tpl = base.as_os_str().to_owned();
    tpl.push(".tpl");
    (PathBuf::from(gma), PathBuf::from(tpl))
}

/// Memory-map the `.gma` and `.tpl` files for a base name.
///
/// A missing or unopenable file reports [`Error::InputNotFound`] for that
/// path; nothing is written in that case.
pub fn map_pair(base: &Path) -> Result<(Mmap, Mmap)> {
    let (gma_path, tpl_path) = pair_paths(base);
    Ok((map_input(&gma_path)?, map_input(&tpl_path)?))
}

fn map_input(path: &Path) -> Result<Mmap> {
    let file = File::open(path).map_err(|_| Error::InputNotFound(path.to_owned()))?;
    // Inputs are opened read-only and never mutated while mapped
    let mmap = unsafe { Mmap::map(&file)? };
    Ok(mmap)
}

/// Write an archive pair to `<base>.gma` and `<base>.tpl`.
pub fn write_pair(base: &Path, pair: &ArchivePair) -> Result<()> {
    let (gma_path, tpl_path) = pair_paths(base);
    write_atomic(&gma_path, &pair.gma)?;
    write_atomic(&tpl_path, &pair.tpl)?;
    info!(base = %base.display(), "saved archive pair");
    Ok(())
}

/// Stream `bytes` to a temp file next to `path`, then rename it into place.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pair_paths_append_extensions() {
        let (gma, tpl) = pair_paths(Path::new("stage/ST01+ST02"));
        assert_eq!(gma, Path::new("stage/ST01+ST02.gma"));
        assert_eq!(tpl, Path::new("stage/ST01+ST02.tpl"));

        // A dotted base name keeps its dot
        let (gma, _) = pair_paths(Path::new("st1.old"));
        assert_eq!(gma, Path::new("st1.old.gma"));
    }

    #[test]
    fn write_pair_replaces_existing_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("out");
        let (gma_path, tpl_path) = pair_paths(&base);
        std::fs::write(&gma_path, b"stale").unwrap();

        let pair = ArchivePair {
            gma: vec![1, 2, 3],
            tpl: vec![4, 5],
        };
        write_pair(&base, &pair).unwrap();
        assert_eq!(std::fs::read(&gma_path).unwrap(), [1, 2, 3]);
        assert_eq!(std::fs::read(&tpl_path).unwrap(), [4, 5]);
    }

    #[test]
    fn missing_input_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("nonexistent");
        match map_pair(&base) {
            Err(Error::InputNotFound(path)) => {
                assert!(path.to_string_lossy().ends_with("nonexistent.gma"));
            }
            other => panic!("expected InputNotFound, got {other:?}"),
        }
    }
}
