use crate::infrastructure::error::InfrastructureError;
use std::io::Write;
use std::path::Path;

/// Replace a report file atomically via a temporary file in the same
/// directory.
///
/// The reconciliation passes rewrite report files in place after ranks or
/// tracker ids change; a crash mid-write must never leave a truncated
/// report behind, so the content goes to a temp file first and is renamed
/// over the target.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = path.parent().unwrap_or_else(|| Path::new("."));

    // Same directory as the target so the rename stays on one filesystem
    let mut temp_file = tempfile::NamedTempFile::new_in(parent).map_err(InfrastructureError::Io)?;

    temp_file
        .write_all(content.as_ref())
        .map_err(InfrastructureError::Io)?;

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
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_creates_file() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("person.csv");

        atomic_write(&file_path, "subject,table\ncolorado,person\n")?;

        assert!(file_path.exists());
        assert_eq!(
            fs::read_to_string(file_path)?,
            "subject,table\ncolorado,person\n"
        );
        Ok(())
    }

    #[test]
    fn test_atomic_write_replaces_existing_content() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("person.csv");

        atomic_write(&file_path, "old")?;
        atomic_write(&file_path, "new")?;

        assert_eq!(fs::read_to_string(file_path)?, "new");
        Ok(())
    }

    #[test]
    fn test_atomic_write_fails_on_missing_directory() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("missing").join("person.csv");

        assert!(atomic_write(&file_path, "content").is_err());
    }
}
