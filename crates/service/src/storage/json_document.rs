use std::{io::ErrorKind, marker::PhantomData, path::{Path, PathBuf}};

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tracing::{debug, error};

use crate::errors::ServiceError;

/// JSON file holding an ordered collection of `T`.
///
/// The whole array is read on [`load`](Self::load) and rewritten on
/// [`save`](Self::save). Output is pretty-printed with 2-space indentation.
#[derive(Clone, Debug)]
pub struct JsonDocument<T> {
    file_path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonDocument<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into(), _marker: PhantomData }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Create the parent directory if it does not exist yet.
    pub async fn ensure_parent(&self) -> Result<(), ServiceError> {
        match self.file_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
                .await
                .map_err(|e| ServiceError::Persistence(format!("cannot create {}: {e}", parent.display()))),
            _ => Ok(()),
        }
    }

    /// Read the collection. A missing or blank file is an empty collection.
    pub async fn load(&self) -> Result<Vec<T>, ServiceError> {
        let content = match fs::read_to_string(&self.file_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.file_path.display(), "document missing, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                error!(path = %self.file_path.display(), error = %e, "document read failed");
                return Err(ServiceError::Persistence(format!("cannot read {}: {e}", self.file_path.display())));
            }
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            error!(path = %self.file_path.display(), error = %e, "document parse failed");
            ServiceError::Persistence(format!("cannot parse {}: {e}", self.file_path.display()))
        })
    }

    /// Overwrite the file with the given collection.
    pub async fn save(&self, items: &[T]) -> Result<(), ServiceError> {
        let data = serde_json::to_string_pretty(items)
            .map_err(|e| ServiceError::Persistence(format!("cannot encode collection: {e}")))?;
        fs::write(&self.file_path, data).await.map_err(|e| {
            error!(path = %self.file_path.display(), error = %e, "document write failed");
            ServiceError::Persistence(format!("cannot write {}: {e}", self.file_path.display()))
        })?;
        debug!(path = %self.file_path.display(), count = items.len(), "document saved");
        Ok(())
    }
}
