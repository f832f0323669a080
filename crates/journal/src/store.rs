use crate::account::AccountBook;
use crate::error::JournalError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Persists an [`AccountBook`] as a single pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the book. A missing file is a fresh, empty book.
    pub fn load(&self) -> Result<AccountBook, JournalError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "No account store yet, starting empty");
                return Ok(AccountBook::new());
            }
            Err(e) => return Err(e.into()),
        };

        let book: AccountBook = serde_json::from_str(&contents)?;
        tracing::debug!(
            path = %self.path.display(),
            accounts = book.accounts().len(),
            "Account store loaded"
        );
        Ok(book)
    }

    /// Writes to a sibling temp file and renames it over the store.
    pub fn save(&self, book: &AccountBook) -> Result<(), JournalError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(book)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path).inspect_err(|_| {
            let _ = fs::remove_file(&tmp);
        })?;

        tracing::debug!(
            path = %self.path.display(),
            accounts = book.accounts().len(),
            "Account store saved"
        );
        Ok(())
    }
}
