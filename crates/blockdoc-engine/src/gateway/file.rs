use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use relative_path::RelativePathBuf;
use tokio::fs;

use super::{GatewayError, GatewayResult, PersistenceGateway, check_version, envelope_version};
use crate::models::DocumentId;

/// Stores each document as `<id>.json` under a root directory
#[derive(Debug, Clone)]
pub struct FileGateway {
    root: PathBuf,
}

impl FileGateway {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of a document's file. Document ids cannot contain path
    /// separators, so this never leaves `root`.
    pub fn path_for(&self, id: &DocumentId) -> PathBuf {
        RelativePathBuf::from(format!("{id}.json")).to_path(&self.root)
    }

    async fn read(&self, id: &DocumentId) -> GatewayResult<Option<String>> {
        match fs::read_to_string(self.path_for(id)).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(GatewayError::Io(e)),
        }
    }
}

#[async_trait]
impl PersistenceGateway for FileGateway {
    async fn save(&self, id: &DocumentId, payload: &str) -> GatewayResult<()> {
        let attempted = envelope_version(payload)?;
        let stored = match self.read(id).await? {
            Some(existing) => Some(envelope_version(&existing)?),
            None => None,
        };
        check_version(stored, attempted)?;

        let path = self.path_for(id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write then rename so a crash never leaves a half-written document
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, payload).await?;
        fs::rename(&tmp, &path).await?;

        log::debug!("wrote {} (version {attempted})", path.display());
        Ok(())
    }

    async fn load(&self, id: &DocumentId) -> GatewayResult<String> {
        self.read(id)
            .await?
            .ok_or_else(|| GatewayError::NotFound(id.clone()))
    }
}
