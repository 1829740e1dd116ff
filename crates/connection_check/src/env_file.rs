use anyhow::{Context, Result};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Values read from a local `.env` file.
///
/// The file is never written into the process environment; lookups
/// consult the process environment first and fall back to these values.
#[derive(Debug, Clone, Default)]
pub struct EnvFile {
    pub path: PathBuf,
    vars: HashMap<String, String>,
    /// Lines that could not be parsed, as reported by dotenvy
    pub skipped: Vec<String>,
}

impl EnvFile {
    /// Find `.env` in the working directory or one of its parents.
    pub fn discover() -> Result<Option<Self>> {
        let cwd = std::env::current_dir().context("failed to read current directory")?;
        match cwd.ancestors().map(|dir| dir.join(".env")).find(|p| p.is_file()) {
            Some(path) => Self::load(&path),
            None => Ok(None),
        }
    }

    /// Parse `path` line by line. A malformed line is recorded in `skipped`
    /// and parsing continues with the next one. A missing file is `Ok(None)`.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let iter = match dotenvy::from_path_iter(path) {
            Ok(iter) => iter,
            Err(dotenvy::Error::Io(e)) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("failed to open {}", path.display())),
        };

        let mut env_file = EnvFile {
            path: path.to_path_buf(),
            ..Default::default()
        };

        for item in iter {
            match item {
                // first definition wins, as with dotenvy::dotenv
                Ok((key, value)) => {
                    env_file.vars.entry(key).or_insert(value);
                }
                Err(dotenvy::Error::Io(e)) => {
                    return Err(e).with_context(|| format!("failed to read {}", path.display()));
                }
                Err(e) => env_file.skipped.push(e.to_string()),
            }
        }

        Ok(Some(env_file))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_env(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = EnvFile::load(&dir.path().join(".env")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_well_formed_file() {
        let (_dir, path) = write_env("DB_NAME=futbol\n# comment\n\nDB_PORT=5432\n");
        let env_file = EnvFile::load(&path).unwrap().unwrap();

        assert_eq!(env_file.path, path);
        assert_eq!(env_file.get("DB_NAME"), Some("futbol"));
        assert_eq!(env_file.get("DB_PORT"), Some("5432"));
        assert_eq!(env_file.len(), 2);
        assert!(env_file.skipped.is_empty());
    }

    #[test]
    fn test_malformed_line_is_skipped_not_fatal() {
        let (_dir, path) = write_env("DB_NAME=futbol\nDB_USER manager\nDB_HOST=db.internal\n");
        let env_file = EnvFile::load(&path).unwrap().unwrap();

        assert_eq!(env_file.get("DB_NAME"), Some("futbol"));
        assert_eq!(env_file.get("DB_USER"), None);
        // lines after the bad one are still read
        assert_eq!(env_file.get("DB_HOST"), Some("db.internal"));
        assert_eq!(env_file.skipped.len(), 1);
    }

    #[test]
    fn test_first_definition_wins() {
        let (_dir, path) = write_env("DB_HOST=first\nDB_HOST=second\n");
        let env_file = EnvFile::load(&path).unwrap().unwrap();
        assert_eq!(env_file.get("DB_HOST"), Some("first"));
    }
}
