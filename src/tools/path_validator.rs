use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

pub fn validate_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("路徑不存在: {}", path.display());
    }
    if !path.is_dir() {
        bail!("路徑不是資料夾: {}", path.display());
    }
    Ok(())
}

pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("無法建立資料夾: {}", path.display()))?;
    }
    validate_directory_exists(path)
}

/// 在資料夾中找一個不會覆蓋既有檔案的路徑，重複時加上 `_1`、`_2`...
#[must_use]
pub fn unique_output_path(directory: &Path, file_name: &str) -> PathBuf {
    let candidate = directory.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = file_name
        .rsplit_once('.')
        .map_or((file_name, None), |(s, e)| (s, Some(e)));

    (1..)
        .map(|i| {
            let name = ext.map_or_else(|| format!("{stem}_{i}"), |e| format!("{stem}_{i}.{e}"));
            directory.join(name)
        })
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_directory() {
        let dir = TempDir::new().unwrap();
        assert!(validate_directory_exists(dir.path()).is_ok());

        let file = dir.path().join("a.txt");
        fs::write(&file, "x").unwrap();
        assert!(validate_directory_exists(&file).is_err());
        assert!(validate_directory_exists(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_ensure_directory_creates_nested() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("exports").join("gif");
        ensure_directory_exists(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_unique_output_path() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            unique_output_path(dir.path(), "clip.gif"),
            dir.path().join("clip.gif")
        );

        fs::write(dir.path().join("clip.gif"), "x").unwrap();
        fs::write(dir.path().join("clip_1.gif"), "x").unwrap();
        assert_eq!(
            unique_output_path(dir.path(), "clip.gif"),
            dir.path().join("clip_2.gif")
        );
    }
}
