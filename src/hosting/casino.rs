use super::*;
use crate::ID;
use crate::gameroom::*;
use crate::leaderboard::Ledger;
use crate::leaderboard::Standings;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::sync::RwLock;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;

/// Session coordinator.
///
/// The only component that knows connection ids. It owns the lobby and the
/// connection registry, routes inbound events to the lobby or to the room a
/// connection is bound to, and settles statistics when a match ends.
///
/// Locks are always taken lobby first, then sessions.
pub struct Casino {
    ledger: Ledger,
    timer: TimerConfig,
    lobby: Mutex<Lobby>,
    sessions: RwLock<HashMap<ID<Connection>, Session>>,
}

impl Casino {
    pub fn new(ledger: Ledger, timer: TimerConfig) -> Self {
        Self {
            ledger,
            timer,
            lobby: Mutex::new(Lobby::default()),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a new connection whose outbound frames go to `outbox`.
    pub async fn connect(&self, outbox: UnboundedSender<String>) -> ID<Connection> {
        let conn = ID::default();
        self.sessions
            .write()
            .await
            .insert(conn, Session::new(conn, outbox));
        log::debug!("[casino] connection {} opened", conn);
        conn
    }

    /// Decodes and routes one inbound text frame.
    pub async fn dispatch(self: &Arc<Self>, conn: ID<Connection>, text: &str) {
        match Protocol::decode(text) {
            Ok(ClientMessage::Register { user_id, nickname }) => {
                self.register(conn, user_id.as_deref(), nickname.as_deref())
                    .await
            }
            Ok(ClientMessage::JoinLobby) => self.join(conn).await,
            Ok(ClientMessage::MakeMove { position }) => self.play(conn, position).await,
            Ok(ClientMessage::LeaveGame) => self.leave(conn).await,
            Err(e) => log::warn!("[casino] connection {} sent {}", conn, e),
        }
    }

    pub async fn register(&self, conn: ID<Connection>, user_id: Option<&str>, nickname: Option<&str>) {
        match self.sessions.write().await.get_mut(&conn) {
            Some(session) => {
                let participant = Participant::new(user_id, nickname, conn);
                log::debug!("[casino] connection {} is {}", conn, participant);
                session.register(participant);
            }
            None => log::debug!("[casino] register from unknown connection {}", conn),
        }
    }

    /// Puts the connection in the lobby and opens a match if two live
    /// connections are waiting. Stale candidates are dropped and the live
    /// one goes back to the head of the queue.
    pub async fn join(self: &Arc<Self>, conn: ID<Connection>) {
        let mut lobby = self.lobby.lock().await;
        let mut sessions = self.sessions.write().await;
        match sessions.get(&conn) {
            Some(session) if !session.is_playing() => {}
            Some(_) => {
                log::debug!("[casino] connection {} is already playing", conn);
                return;
            }
            None => {
                log::debug!("[casino] join from unknown connection {}", conn);
                return;
            }
        }
        let mut candidate = lobby.join(conn);
        while let Some((x, o)) = candidate {
            let live = |c: ID<Connection>| sessions.get(&c).is_some_and(Session::is_live);
            match (live(x), live(o)) {
                (true, true) => self.open(&mut sessions, x, o),
                (lx, lo) => {
                    log::debug!("[casino] pairing {} vs {} failed, requeueing live candidates", x, o);
                    if lo {
                        lobby.requeue(o);
                    }
                    if lx {
                        lobby.requeue(x);
                    }
                }
            }
            candidate = lobby.pair();
        }
    }

    pub async fn play(&self, conn: ID<Connection>, position: Value) {
        self.route(conn, Command::Play { caller: conn, position })
            .await
    }

    pub async fn leave(&self, conn: ID<Connection>) {
        self.route(conn, Command::Resign { caller: conn })
            .await
    }

    /// Transport closed: leave the lobby, resign any live match, forget the session.
    pub async fn disconnect(&self, conn: ID<Connection>) {
        let mut lobby = self.lobby.lock().await;
        let mut sessions = self.sessions.write().await;
        if lobby.leave(conn) {
            log::debug!("[casino] connection {} left the lobby", conn);
        }
        if let Some(room) = sessions.remove(&conn).and_then(|s| s.room().cloned()) {
            room.send(Command::Resign { caller: conn });
        }
        log::debug!("[casino] connection {} closed", conn);
    }

    /// Sets a participant's leaderboard nickname, creating the entry if needed.
    /// A missing nickname stores the `Player-` fallback.
    pub async fn nickname(&self, user_id: &str, nickname: Option<&str>) -> anyhow::Result<()> {
        let nickname = Participant::sanitize(nickname, &Participant::fallback(user_id));
        self.ledger.rename(user_id.to_string(), nickname).await
    }

    pub async fn leaderboard(&self) -> anyhow::Result<Standings> {
        self.ledger.standings().await
    }

    pub async fn waiting(&self) -> usize {
        self.lobby.lock().await.len()
    }

    pub async fn is_playing(&self, conn: ID<Connection>) -> bool {
        self.sessions
            .read()
            .await
            .get(&conn)
            .is_some_and(Session::is_playing)
    }
}

impl Casino {
    async fn route(&self, conn: ID<Connection>, cmd: Command) {
        let sessions = self.sessions.read().await;
        let Some(room) = sessions.get(&conn).and_then(Session::room) else {
            log::debug!("[casino] connection {} is not in a match", conn);
            return;
        };
        if !room.send(cmd) {
            log::debug!("[casino] match {} already closed for {}", room.id(), conn);
        }
    }

    /// Seats `x` and `o`, spawns their room, and schedules completion.
    fn open(self: &Arc<Self>, sessions: &mut HashMap<ID<Connection>, Session>, x: ID<Connection>, o: ID<Connection>) {
        let (Some(sx), Some(so)) = (sessions.get(&x), sessions.get(&o)) else {
            return;
        };
        let id = ID::default();
        let (done, finished) = oneshot::channel();
        let fanout = Fanout::new([sx.outbox().clone(), so.outbox().clone()], done);
        let engine = Engine::new(
            id,
            Binding::new(x, sx.participant().clone()),
            Binding::new(o, so.participant().clone()),
            self.timer,
            Box::new(fanout),
        );
        let handle = RoomHandle::new(id, Room::spawn(engine));
        for conn in [x, o] {
            if let Some(session) = sessions.get_mut(&conn) {
                session.bind(handle.clone());
            }
        }
        log::info!("[casino] opened match {}", id);
        let casino = self.clone();
        tokio::spawn(async move { casino.complete(id, finished).await });
    }

    /// Applies statistics for a finished match, then releases its bindings.
    async fn complete(&self, id: ID<Engine>, finished: oneshot::Receiver<Snapshot>) {
        match finished.await {
            Ok(snapshot) => match self.ledger.settle(snapshot).await {
                Ok(()) => log::info!("[casino] settled match {}", id),
                Err(e) => log::error!("[casino] failed to update leaderboard for match {}: {:#}", id, e),
            },
            Err(_) => log::warn!("[casino] match {} closed without a result", id),
        }
        for session in self.sessions.write().await.values_mut() {
            session.release(id);
        }
    }
}

#[cfg(feature = "server")]
impl Casino {
    /// Spawns WebSocket bridge between the client and its session.
    pub async fn bridge(
        self: &Arc<Self>,
        mut session: actix_ws::Session,
        mut stream: actix_ws::MessageStream,
    ) -> anyhow::Result<()> {
        use futures::StreamExt;
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();
        let conn = self.connect(tx).await;
        let casino = self.clone();
        actix_web::rt::spawn(async move {
            'sesh: loop {
                tokio::select! {
                    biased;
                    msg = rx.recv() => match msg {
                        Some(json) => if session.text(json).await.is_err() { break 'sesh },
                        None => break 'sesh,
                    },
                    msg = stream.next() => match msg {
                        Some(Ok(actix_ws::Message::Text(text))) => casino.dispatch(conn, &text).await,
                        Some(Ok(actix_ws::Message::Ping(bytes))) => if session.pong(&bytes).await.is_err() { break 'sesh },
                        Some(Ok(actix_ws::Message::Close(_))) => break 'sesh,
                        Some(Err(_)) => break 'sesh,
                        None => break 'sesh,
                        _ => continue 'sesh,
                    },
                }
            }
            drop(rx);
            casino.disconnect(conn).await;
            let _ = session.close(None).await;
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::Memory;
    use crate::leaderboard::Store;
    use std::time::Duration;
    use serde_json::json;
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::sync::mpsc::unbounded_channel;

    fn casino() -> (Arc<Casino>, Memory) {
        let memory = Memory::default();
        let ledger = Ledger::spawn(memory.clone());
        (Arc::new(Casino::new(ledger, TimerConfig::default())), memory)
    }

    async fn client(casino: &Casino) -> (ID<Connection>, UnboundedReceiver<String>) {
        let (tx, rx) = unbounded_channel();
        (casino.connect(tx).await, rx)
    }

    fn frame(rx: &mut UnboundedReceiver<String>) -> Value {
        serde_json::from_str(&rx.try_recv().unwrap()).unwrap()
    }

    /// Reads back fine but refuses every write.
    struct Unwritable;

    #[async_trait::async_trait]
    impl Store for Unwritable {
        async fn load(&self) -> anyhow::Result<Standings> {
            Ok(Standings::default())
        }
        async fn save(&self, _: &Standings) -> anyhow::Result<()> {
            anyhow::bail!("read-only store")
        }
    }

    async fn terminal(rx: &mut UnboundedReceiver<String>) -> Value {
        loop {
            let next = serde_json::from_str::<Value>(&rx.recv().await.unwrap()).unwrap();
            if next["snapshot"]["isGameOver"] == json!(true) {
                return next;
            }
        }
    }

    async fn bound(casino: &Casino, conn: ID<Connection>) -> bool {
        casino
            .sessions
            .read()
            .await
            .get(&conn)
            .and_then(Session::room)
            .is_some()
    }

    #[tokio::test]
    async fn pairing_sends_game_start_to_both() {
        let (casino, _) = casino();
        let (a, mut ra) = client(&casino).await;
        let (b, mut rb) = client(&casino).await;
        casino.join(a).await;
        assert_eq!(casino.waiting().await, 1);
        assert!(ra.try_recv().is_err());
        casino.join(b).await;
        assert_eq!(casino.waiting().await, 0);
        let (fa, fb) = (frame(&mut ra), frame(&mut rb));
        assert_eq!(fa["type"], "game_start");
        assert_eq!(fa, fb);
        assert_eq!(fa["snapshot"]["players"]["X"]["id"], a.to_string());
        assert_eq!(fa["snapshot"]["players"]["O"]["id"], b.to_string());
        assert!(casino.is_playing(a).await);
        assert!(casino.is_playing(b).await);
    }

    #[tokio::test]
    async fn stale_candidate_is_discarded() {
        let (casino, _) = casino();
        let (a, ra) = client(&casino).await;
        let (b, mut rb) = client(&casino).await;
        let (c, mut rc) = client(&casino).await;
        casino.join(a).await;
        drop(ra);
        casino.join(b).await;
        assert_eq!(casino.waiting().await, 1);
        assert!(rb.try_recv().is_err());
        casino.join(c).await;
        assert_eq!(frame(&mut rb)["snapshot"]["players"]["X"]["id"], b.to_string());
        assert_eq!(frame(&mut rc)["snapshot"]["players"]["O"]["id"], c.to_string());
    }

    #[tokio::test]
    async fn playing_connection_cannot_rejoin() {
        let (casino, _) = casino();
        let (a, _ra) = client(&casino).await;
        let (b, _rb) = client(&casino).await;
        casino.join(a).await;
        casino.join(b).await;
        casino.join(a).await;
        assert_eq!(casino.waiting().await, 0);
    }

    #[tokio::test]
    async fn unroutable_events_are_ignored() {
        let (casino, _) = casino();
        let (a, mut ra) = client(&casino).await;
        casino.play(a, json!(4)).await;
        casino.leave(a).await;
        casino.dispatch(a, "not json").await;
        casino.disconnect(a).await;
        casino.play(a, json!(4)).await;
        casino.join(a).await;
        assert_eq!(casino.waiting().await, 0);
        assert!(ra.try_recv().is_err());
    }

    #[tokio::test]
    async fn disconnect_while_waiting_leaves_lobby() {
        let (casino, _) = casino();
        let (a, _ra) = client(&casino).await;
        casino.join(a).await;
        casino.disconnect(a).await;
        assert_eq!(casino.waiting().await, 0);
    }

    #[tokio::test]
    async fn disconnect_resigns_and_settles() {
        let (casino, memory) = casino();
        let (a, _ra) = client(&casino).await;
        let (b, mut rb) = client(&casino).await;
        casino.register(a, Some("alice"), Some("Alice")).await;
        casino.register(b, Some("bob"), None).await;
        casino.join(a).await;
        casino.join(b).await;
        casino.disconnect(a).await;
        let last = loop {
            let next = serde_json::from_str::<Value>(&rb.recv().await.unwrap()).unwrap();
            if next["snapshot"]["isGameOver"] == json!(true) {
                break next;
            }
        };
        assert_eq!(last["type"], "game_update");
        assert_eq!(last["snapshot"]["reason"], "PLAYER_LEFT");
        assert_eq!(last["snapshot"]["winner"], "O");
        while memory.peek().await.get("bob").is_none() {
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
        }
        let standings = memory.peek().await;
        assert_eq!(standings.get("alice").unwrap().losses, 1);
        assert_eq!(standings.get("bob").unwrap().wins, 1);
        assert_eq!(standings.get("bob").unwrap().nickname, "Player-bob");
    }

    #[tokio::test]
    async fn register_with_non_text_nickname_keeps_identity() {
        let (casino, _) = casino();
        let (a, mut ra) = client(&casino).await;
        let (b, _rb) = client(&casino).await;
        casino
            .dispatch(a, r#"{"type":"register","userId":"alice","nickname":42}"#)
            .await;
        casino.join(a).await;
        casino.join(b).await;
        let start = frame(&mut ra);
        assert_eq!(start["snapshot"]["players"]["X"]["id"], "alice");
        assert_eq!(start["snapshot"]["players"]["X"]["nickname"], "Player-lice");
    }

    #[tokio::test]
    async fn failed_settlement_still_releases_bindings() {
        let casino = Arc::new(Casino::new(Ledger::spawn(Unwritable), TimerConfig::default()));
        let (a, mut ra) = client(&casino).await;
        let (b, mut rb) = client(&casino).await;
        casino.join(a).await;
        casino.join(b).await;
        let first = frame(&mut ra)["snapshot"]["matchId"].clone();
        casino.leave(b).await;
        for rx in [&mut ra, &mut rb] {
            let end = terminal(rx).await;
            assert_eq!(end["type"], "game_update");
            assert_eq!(end["snapshot"]["reason"], "PLAYER_LEFT");
            assert_eq!(end["snapshot"]["winner"], "X");
        }
        while bound(&casino, a).await || bound(&casino, b).await {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        assert!(!casino.is_playing(a).await);
        assert!(!casino.is_playing(b).await);
        assert!(casino.leaderboard().await.unwrap().is_empty());
        casino.join(a).await;
        casino.join(b).await;
        assert_eq!(casino.waiting().await, 0);
        let (fa, fb) = (frame(&mut ra), frame(&mut rb));
        assert_eq!(fa["type"], "game_start");
        assert_eq!(fa, fb);
        assert_ne!(fa["snapshot"]["matchId"], first);
        assert!(casino.is_playing(a).await);
        assert!(casino.is_playing(b).await);
    }

    #[tokio::test]
    async fn nickname_is_sanitized() {
        let (casino, _) = casino();
        casino.nickname("user-1234", Some("   ")).await.unwrap();
        casino.nickname("u2", Some("  an extremely long nickname indeed  ")).await.unwrap();
        casino.nickname("u3", None).await.unwrap();
        let standings = casino.leaderboard().await.unwrap();
        assert_eq!(standings.get("user-1234").unwrap().nickname, "Player-1234");
        assert_eq!(standings.get("u2").unwrap().nickname, "an extremely long ni");
        assert_eq!(standings.get("u3").unwrap().nickname, "Player-u3");
    }
}
