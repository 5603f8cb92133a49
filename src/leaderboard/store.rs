use super::*;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Durable home of the standings.
/// Only the [`Ledger`] worker calls these, one job at a time.
#[async_trait::async_trait]
pub trait Store: Send + Sync + 'static {
    async fn load(&self) -> anyhow::Result<Standings>;
    async fn save(&self, standings: &Standings) -> anyhow::Result<()>;
}

/// Process-local store. Clones share the same standings.
/// Each access yields once so callers see the same suspension points as real I/O.
#[derive(Debug, Default, Clone)]
pub struct Memory(Arc<Mutex<Standings>>);

impl Memory {
    pub async fn peek(&self) -> Standings {
        self.0.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl Store for Memory {
    async fn load(&self) -> anyhow::Result<Standings> {
        tokio::task::yield_now().await;
        Ok(self.0.lock().await.clone())
    }
    async fn save(&self, standings: &Standings) -> anyhow::Result<()> {
        tokio::task::yield_now().await;
        *self.0.lock().await = standings.clone();
        Ok(())
    }
}
