use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::CatalogError;

/// How an artifact became available on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assembly {
    /// The combined file was already present; no chunk was read
    Existing,
    /// The combined file was rebuilt from numbered chunks
    Rebuilt { chunks: usize, bytes: u64 },
}

/// Path of the `index`-th chunk of `target` (`<target>.part<index>`)
pub fn chunk_path(target: &Path, index: usize) -> PathBuf {
    let mut name = target.as_os_str().to_os_string();
    name.push(format!(".part{}", index));
    PathBuf::from(name)
}

/// Makes sure `target` exists, rebuilding it from chunks when needed
///
/// Chunks are concatenated in ascending numeric order starting at `part1`
/// and stopping at the first missing number. The result is written to a
/// temporary sibling and renamed into place, so an interrupted rebuild never
/// leaves a truncated combined file behind.
pub fn ensure_assembled(target: &Path) -> Result<Assembly, CatalogError> {
    if target.exists() {
        tracing::debug!(path = %target.display(), "Using existing combined artifact");
        return Ok(Assembly::Existing);
    }

    if !chunk_path(target, 1).exists() {
        return Err(CatalogError::MissingArtifact {
            path: target.display().to_string(),
        });
    }

    let mut staging = target.as_os_str().to_os_string();
    staging.push(".assembling");
    let staging = PathBuf::from(staging);

    let (chunks, bytes) = match concat_chunks(target, &staging) {
        Ok(totals) => totals,
        Err(e) => {
            let _ = fs::remove_file(&staging);
            return Err(CatalogError::io(target, e));
        }
    };

    fs::rename(&staging, target).map_err(|e| CatalogError::io(target, e))?;

    tracing::info!(
        path = %target.display(),
        chunks = chunks,
        bytes = bytes,
        "Rebuilt artifact from chunks"
    );

    Ok(Assembly::Rebuilt { chunks, bytes })
}

fn concat_chunks(target: &Path, staging: &Path) -> io::Result<(usize, u64)> {
    let mut writer = BufWriter::new(File::create(staging)?);
    let mut chunks = 0;
    let mut bytes = 0;

    loop {
        let part = chunk_path(target, chunks + 1);
        if !part.exists() {
            break;
        }
        let mut reader = File::open(&part)?;
        bytes += io::copy(&mut reader, &mut writer)?;
        chunks += 1;
    }

    writer.flush()?;
    Ok((chunks, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_path_appends_suffix() {
        let path = chunk_path(Path::new("/data/similarity.json"), 3);
        assert_eq!(path, PathBuf::from("/data/similarity.json.part3"));
    }

    #[test]
    fn test_rebuilds_from_chunks_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("similarity.json");
        fs::write(chunk_path(&target, 2), "CD").unwrap();
        fs::write(chunk_path(&target, 1), "AB").unwrap();

        let outcome = ensure_assembled(&target).unwrap();

        assert_eq!(outcome, Assembly::Rebuilt { chunks: 2, bytes: 4 });
        assert_eq!(fs::read_to_string(&target).unwrap(), "ABCD");
    }

    #[test]
    fn test_numeric_order_past_nine() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("matrix.bin");
        for i in 1..=11 {
            fs::write(chunk_path(&target, i), format!("{},", i)).unwrap();
        }

        ensure_assembled(&target).unwrap();

        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "1,2,3,4,5,6,7,8,9,10,11,"
        );
    }

    #[test]
    fn test_existing_combined_file_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("similarity.json");
        fs::write(&target, "COMBINED").unwrap();
        // A directory where a chunk file should be would fail any read attempt
        fs::create_dir(chunk_path(&target, 1)).unwrap();

        let outcome = ensure_assembled(&target).unwrap();

        assert_eq!(outcome, Assembly::Existing);
        assert_eq!(fs::read_to_string(&target).unwrap(), "COMBINED");
    }

    #[test]
    fn test_second_call_reuses_rebuilt_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("similarity.json");
        fs::write(chunk_path(&target, 1), "AB").unwrap();

        ensure_assembled(&target).unwrap();
        fs::write(chunk_path(&target, 1), "ZZ").unwrap();
        let outcome = ensure_assembled(&target).unwrap();

        assert_eq!(outcome, Assembly::Existing);
        assert_eq!(fs::read_to_string(&target).unwrap(), "AB");
    }

    #[test]
    fn test_stops_at_first_gap() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("similarity.json");
        fs::write(chunk_path(&target, 1), "AB").unwrap();
        fs::write(chunk_path(&target, 3), "EF").unwrap();

        let outcome = ensure_assembled(&target).unwrap();

        assert_eq!(outcome, Assembly::Rebuilt { chunks: 1, bytes: 2 });
        assert_eq!(fs::read_to_string(&target).unwrap(), "AB");
    }

    #[test]
    fn test_missing_artifact_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("similarity.json");

        let result = ensure_assembled(&target);

        assert!(matches!(result, Err(CatalogError::MissingArtifact { .. })));
        assert!(!target.exists());
    }
}
