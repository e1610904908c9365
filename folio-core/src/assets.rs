use std::path::Path;

use walkdir::WalkDir;

/// Copy every file under `src` into `dest`, keeping relative paths.
///
/// Returns the number of files copied. A missing `src` copies nothing.
pub fn copy_assets<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dest: Q) -> std::io::Result<usize> {
    let src = src.as_ref();
    let dest = dest.as_ref();
    if !src.is_dir() {
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(src) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dest.join(relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(entry.path(), &target)?;
        copied += 1;
    }

    tracing::debug!(from = %src.display(), to = %dest.display(), copied, "copied assets");
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copies_nested_files() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(src.path().join("img")).unwrap();
        std::fs::write(src.path().join("logo.svg"), "<svg/>").unwrap();
        std::fs::write(src.path().join("img/me.png"), [0u8, 1, 2]).unwrap();

        let copied = copy_assets(src.path(), dest.path().join("assets")).unwrap();
        assert_eq!(copied, 2);
        assert!(dest.path().join("assets/logo.svg").is_file());
        assert!(dest.path().join("assets/img/me.png").is_file());
    }

    #[test]
    fn test_missing_source_is_empty() {
        let dest = tempfile::tempdir().unwrap();
        assert_eq!(copy_assets("/no/such/assets", dest.path()).unwrap(), 0);
    }
}
