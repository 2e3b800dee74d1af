use crate::model::ArchiveError;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Unpacks Probgate export packages into `<root>/<problem_id>/`.
pub struct ArchiveExtractor {
    root: PathBuf,
}

impl ArchiveExtractor {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn problem_dir(&self, problem_id: &str) -> PathBuf {
        self.root.join(problem_id)
    }

    pub fn is_extracted(&self, problem_id: &str) -> bool {
        self.problem_dir(problem_id).exists()
    }

    /// Extracts into `<id>.tmp` and renames it into place, so the final
    /// directory only ever holds a complete package. On failure the temp
    /// directory is removed, including when the final rename fails.
    pub fn extract(&self, problem_id: &str, bytes: &[u8]) -> Result<PathBuf, ArchiveError> {
        fs::create_dir_all(&self.root)?;
        let tmp_dir = self.root.join(format!("{}.tmp", problem_id));
        let final_dir = self.problem_dir(problem_id);

        remove_dir_if_exists(&tmp_dir)?;
        fs::create_dir(&tmp_dir)?;

        let placed = unpack(bytes, &tmp_dir).and_then(|()| {
            remove_dir_if_exists(&final_dir)?;
            fs::rename(&tmp_dir, &final_dir)?;
            Ok(())
        });
        if let Err(e) = placed {
            let _ = fs::remove_dir_all(&tmp_dir);
            return Err(e);
        }
        Ok(final_dir)
    }
}

fn unpack(bytes: &[u8], dest: &Path) -> Result<(), ArchiveError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    archive.extract(dest)?;
    Ok(())
}

fn remove_dir_if_exists(dir: &Path) -> std::io::Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    Ok(())
}
