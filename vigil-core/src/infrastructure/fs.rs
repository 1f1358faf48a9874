use crate::infrastructure::error::InfrastructureError;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Writes a rendered verdict (or any report artifact) atomically.
///
/// Missing parent directories are created. The content lands in a temporary
/// file next to the target and is renamed into place, so a reader polling the
/// output never observes a half-written verdict.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_ref())?;
    temp_file.flush()?;

    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_creates_parents() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("target/verdicts/monthly_sales.json");

        atomic_write(&file_path, r#"{"status":"READY"}"#)?;

        assert_eq!(fs::read_to_string(&file_path)?, r#"{"status":"READY"}"#);
        Ok(())
    }

    #[test]
    fn test_atomic_write_replaces_previous_verdict() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("verdict.txt");

        atomic_write(&file_path, "BLOCKED")?;
        atomic_write(&file_path, "READY")?;

        assert_eq!(fs::read_to_string(&file_path)?, "READY");
        // No temp files left behind
        assert_eq!(fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }
}
