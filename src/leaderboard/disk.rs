use super::*;
use anyhow::Context;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

/// Standings persisted as one pretty-printed JSON object.
/// Writes go to a sibling temp file and are renamed into place.
#[derive(Debug, Clone)]
pub struct Disk {
    path: PathBuf,
}

impl Disk {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
    fn staging(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait::async_trait]
impl Store for Disk {
    /// A missing or unreadable file reads as empty standings.
    async fn load(&self) -> anyhow::Result<Standings> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(Standings::decode(&raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Standings::default()),
            Err(e) => {
                log::error!("[disk] failed to read {}: {}", self.path.display(), e);
                Ok(Standings::default())
            }
        }
    }
    async fn save(&self, standings: &Standings) -> anyhow::Result<()> {
        let json = standings.encode().context("encode standings")?;
        let staging = self.staging();
        tokio::fs::write(&staging, json)
            .await
            .with_context(|| format!("write {}", staging.display()))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .with_context(|| format!("replace {}", self.path.display()))
    }
}
