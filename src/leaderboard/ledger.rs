use super::*;
use crate::gameroom::Snapshot;
use anyhow::Context;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;
use tokio::sync::oneshot;

type Mutator = Box<dyn FnOnce(&mut Standings) + Send>;

enum Job {
    Update(Mutator, oneshot::Sender<anyhow::Result<()>>),
    Read(oneshot::Sender<anyhow::Result<Standings>>),
}

/// Serialized access to a [`Store`].
///
/// One worker task drains a FIFO of jobs. Each update is a complete
/// load → mutate → save cycle that finishes before the next job starts,
/// so concurrent match completions never overwrite one another.
/// A job that fails (or whose mutator panics) reports to its caller and
/// the worker moves on.
#[derive(Clone)]
pub struct Ledger {
    jobs: UnboundedSender<Job>,
}

impl Ledger {
    pub fn spawn<S: Store>(store: S) -> Self {
        let (jobs, rx) = unbounded_channel();
        tokio::spawn(Self::work(store, rx));
        Self { jobs }
    }

    async fn work<S: Store>(store: S, mut rx: UnboundedReceiver<Job>) {
        while let Some(job) = rx.recv().await {
            match job {
                Job::Update(mutator, reply) => {
                    let result = Self::cycle(&store, mutator)
                        .await
                        .inspect_err(|e| log::error!("[ledger] update failed: {:#}", e));
                    let _ = reply.send(result);
                }
                Job::Read(reply) => {
                    let result = store
                        .load()
                        .await
                        .inspect_err(|e| log::error!("[ledger] read failed: {:#}", e));
                    let _ = reply.send(result);
                }
            }
        }
        log::debug!("[ledger] closed");
    }

    async fn cycle<S: Store>(store: &S, mutator: Mutator) -> anyhow::Result<()> {
        let mut standings = store.load().await.context("load standings")?;
        std::panic::catch_unwind(AssertUnwindSafe(|| mutator(&mut standings)))
            .map_err(|_| anyhow::anyhow!("mutator panicked"))?;
        store.save(&standings).await.context("save standings")
    }

    /// Queues a read-modify-write and waits for it to complete.
    pub async fn update<F>(&self, mutator: F) -> anyhow::Result<()>
    where
        F: FnOnce(&mut Standings) + Send + 'static,
    {
        let (reply, rx) = oneshot::channel();
        self.jobs
            .send(Job::Update(Box::new(mutator), reply))
            .map_err(|_| anyhow::anyhow!("ledger worker stopped"))?;
        rx.await
            .map_err(|_| anyhow::anyhow!("ledger worker dropped update"))?
    }

    /// Current standings, read in queue order.
    pub async fn standings(&self) -> anyhow::Result<Standings> {
        let (reply, rx) = oneshot::channel();
        self.jobs
            .send(Job::Read(reply))
            .map_err(|_| anyhow::anyhow!("ledger worker stopped"))?;
        rx.await
            .map_err(|_| anyhow::anyhow!("ledger worker dropped read"))?
    }

    /// Records one finished match.
    pub async fn settle(&self, snapshot: Snapshot) -> anyhow::Result<()> {
        self.update(move |standings| standings.settle(&snapshot))
            .await
    }

    /// Creates or renames a participant's entry without touching counters.
    pub async fn rename(&self, id: String, nickname: String) -> anyhow::Result<()> {
        self.update(move |standings| {
            standings.ensure(&id, Some(&nickname));
        })
        .await
    }

    /// Round-trips the store once. Used at startup to report accessibility.
    pub async fn verify(&self) -> bool {
        self.update(|_| {})
            .await
            .inspect(|_| log::info!("[ledger] store is accessible"))
            .inspect_err(|e| log::warn!("[ledger] store is not accessible: {:#}", e))
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameroom::Outcome;
    use crate::leaderboard::standings::tests::finished;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    /// Fails every save whose sequence number is listed.
    #[derive(Clone, Default)]
    struct Flaky {
        inner: Memory,
        saves: Arc<AtomicUsize>,
        failing: Vec<usize>,
    }

    #[async_trait::async_trait]
    impl Store for Flaky {
        async fn load(&self) -> anyhow::Result<Standings> {
            self.inner.load().await
        }
        async fn save(&self, standings: &Standings) -> anyhow::Result<()> {
            let n = self.saves.fetch_add(1, Ordering::SeqCst);
            if self.failing.contains(&n) {
                anyhow::bail!("disk full");
            }
            self.inner.save(standings).await
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_completions_never_lose_updates() {
        let memory = Memory::default();
        let ledger = Ledger::spawn(memory.clone());
        let ids = ["p0", "p1", "p2", "p3", "p4"];
        let results = [Outcome::XWins, Outcome::OWins, Outcome::Draw];
        let mut expected = HashMap::<&str, (u64, u64, u64)>::new();
        let mut tasks = Vec::new();
        for i in 0..50 {
            let x = ids[i % ids.len()];
            let o = ids[(i + 1) % ids.len()];
            let result = results[i % results.len()];
            match result {
                Outcome::XWins => {
                    expected.entry(x).or_default().0 += 1;
                    expected.entry(o).or_default().1 += 1;
                }
                Outcome::OWins => {
                    expected.entry(o).or_default().0 += 1;
                    expected.entry(x).or_default().1 += 1;
                }
                Outcome::Draw => {
                    expected.entry(x).or_default().2 += 1;
                    expected.entry(o).or_default().2 += 1;
                }
            }
            let ledger = ledger.clone();
            let snapshot = finished(x, o, Some(result));
            tasks.push(tokio::spawn(async move { ledger.settle(snapshot).await }));
        }
        for task in futures::future::join_all(tasks).await {
            task.unwrap().unwrap();
        }
        let standings = memory.peek().await;
        for (id, (wins, losses, ties)) in expected {
            let entry = standings.get(id).unwrap();
            assert_eq!((entry.wins, entry.losses, entry.ties), (wins, losses, ties), "{}", id);
        }
        let total = standings.iter().map(|(_, e)| e.played()).sum::<u64>();
        assert_eq!(total, 100);
    }

    #[tokio::test]
    async fn failed_save_does_not_wedge_queue() {
        let store = Flaky {
            failing: vec![0],
            ..Flaky::default()
        };
        let ledger = Ledger::spawn(store.clone());
        let first = ledger.settle(finished("a", "b", Some(Outcome::XWins)));
        let second = ledger.settle(finished("a", "b", Some(Outcome::Draw)));
        let (first, second) = tokio::join!(first, second);
        assert!(first.is_err());
        assert!(second.is_ok());
        let standings = ledger.standings().await.unwrap();
        assert_eq!(standings.get("a").unwrap().wins, 0);
        assert_eq!(standings.get("a").unwrap().ties, 1);
    }

    #[tokio::test]
    async fn panicking_mutator_is_reported() {
        let ledger = Ledger::spawn(Memory::default());
        assert!(ledger.update(|_| panic!("boom")).await.is_err());
        ledger.rename("u1".into(), "alice".into()).await.unwrap();
        let standings = ledger.standings().await.unwrap();
        assert_eq!(standings.get("u1").unwrap().nickname, "alice");
    }

    #[tokio::test]
    async fn rename_keeps_counters() {
        let ledger = Ledger::spawn(Memory::default());
        ledger.settle(finished("a", "b", Some(Outcome::XWins))).await.unwrap();
        ledger.rename("a".into(), "Ace".into()).await.unwrap();
        let entry = ledger.standings().await.unwrap().get("a").cloned().unwrap();
        assert_eq!(entry.nickname, "Ace");
        assert_eq!(entry.wins, 1);
    }

    #[tokio::test]
    async fn verify_reports_store_health() {
        let dir = tempfile::tempdir().unwrap();
        let good = Ledger::spawn(Disk::new(dir.path().join("leaderboard.json")));
        let bad = Ledger::spawn(Disk::new(dir.path().join("absent").join("leaderboard.json")));
        assert!(good.verify().await);
        assert!(!bad.verify().await);
        assert!(bad.standings().await.unwrap().is_empty());
    }
}
