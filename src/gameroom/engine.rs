use super::*;
use crate::ID;
use crate::Ply;
use crate::Position;
use crate::Unique;
use serde_json::Value;

/// Functional core of a single match.
/// Owns the board, turn order, move counter and turn deadline, and decides
/// the outcome. Every mutation goes through `&mut self`, so whoever owns the
/// engine (see [`Room`]) serializes moves, resignations and timeouts.
///
/// States are `Active(turn)` and `Terminal(outcome)`; terminal is absorbing.
pub struct Engine {
    id: ID<Self>,
    seats: [Binding; 2],
    board: Board,
    turn: Mark,
    ply: Ply,
    timer: Timer,
    ending: Option<(Outcome, Reason)>,
    error: String,
    observer: Box<dyn Observer>,
}

impl Engine {
    /// Starts a match with X to move, arms the first turn timer and
    /// emits the opening snapshot.
    pub fn new(
        id: ID<Self>,
        x: Binding,
        o: Binding,
        config: TimerConfig,
        observer: Box<dyn Observer>,
    ) -> Self {
        let mut engine = Self {
            id,
            seats: [x, o],
            board: Board::default(),
            turn: Mark::X,
            ply: 0,
            timer: Timer::new(config),
            ending: None,
            error: String::new(),
            observer,
        };
        log::debug!(
            "[match {}] {} vs {}",
            engine.id,
            engine.seats[0].participant(),
            engine.seats[1].participant()
        );
        engine.arm();
        engine
    }
}

/// Inputs. Each is a no-op once the match is terminal.
impl Engine {
    /// Places the caller's mark at `raw`, if the move is valid.
    /// Invalid moves record an error and re-emit without touching the board.
    pub fn play(&mut self, caller: ID<Connection>, raw: &Value) {
        if self.is_over() {
            return;
        }
        match self.validate(caller, raw) {
            Err(e) => {
                log::debug!("[match {}] rejected move {}: {}", self.id, raw, e);
                self.error = e.to_string();
                self.emit();
            }
            Ok((mark, pos)) => {
                self.board.place(pos, mark);
                self.ply += 1;
                self.error.clear();
                log::trace!("[match {}] {} -> {}", self.id, mark, pos);
                match self.verdict() {
                    Some((outcome, reason)) => self.end(outcome, reason),
                    None => {
                        self.turn = self.turn.opponent();
                        self.arm();
                    }
                }
            }
        }
    }
    /// Forfeits the match for the caller's mark.
    pub fn resign(&mut self, caller: ID<Connection>) {
        if self.is_over() {
            return;
        }
        if let Some(mark) = self.mark(caller) {
            self.end(Outcome::victory(mark.opponent()), Reason::PlayerLeft);
        }
    }
    /// Timer callback for the turn that began at move `expected`.
    /// Stale alarms (the match moved on, or already ended) do nothing.
    pub fn expire(&mut self, expected: Ply) {
        if self.is_over() || self.ply != expected {
            log::trace!("[match {}] stale alarm for move {}", self.id, expected);
            return;
        }
        log::debug!("[match {}] {} timed out", self.id, self.turn);
        self.end(Outcome::victory(self.turn.opponent()), Reason::Timeout);
    }
}

/// Queries.
impl Engine {
    pub fn is_over(&self) -> bool {
        self.ending.is_some()
    }
    pub fn outcome(&self) -> Option<Outcome> {
        self.ending.map(|(o, _)| o)
    }
    pub fn reason(&self) -> Option<Reason> {
        self.ending.map(|(_, r)| r)
    }
    pub fn turn(&self) -> Mark {
        self.turn
    }
    pub fn ply(&self) -> Ply {
        self.ply
    }
    pub fn board(&self) -> &Board {
        &self.board
    }
    pub fn error(&self) -> &str {
        &self.error
    }
    pub fn alarm(&self) -> Option<Alarm> {
        self.timer.alarm()
    }
    pub fn binding(&self, mark: Mark) -> &Binding {
        &self.seats[mark.seat()]
    }
    /// Mark bound to a connection, if any.
    pub fn mark(&self, caller: ID<Connection>) -> Option<Mark> {
        Mark::all()
            .into_iter()
            .find(|m| self.binding(*m).conn() == caller)
    }
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            match_id: self.id,
            board: self.board,
            current_turn: self.turn,
            is_game_over: self.is_over(),
            result: self.outcome(),
            reason: self.reason(),
            winner: self.outcome().and_then(|o| o.winner()),
            ply: self.ply,
            deadline: self.timer.deadline(),
            error: self.error.clone(),
            players: Players {
                x: self.binding(Mark::X).participant().clone(),
                o: self.binding(Mark::O).participant().clone(),
            },
        }
    }
}

impl Engine {
    fn validate(&self, caller: ID<Connection>, raw: &Value) -> Result<(Mark, Position), MoveError> {
        let pos = Board::index(raw).ok_or(MoveError::OutOfRange)?;
        let mark = self.mark(caller).ok_or(MoveError::Unbound)?;
        if mark != self.turn {
            return Err(MoveError::OutOfTurn(self.turn));
        }
        if !self.board.is_empty(pos) {
            return Err(MoveError::Occupied);
        }
        Ok((mark, pos))
    }
    fn verdict(&self) -> Option<(Outcome, Reason)> {
        match self.board.winner() {
            Some(mark) => Some((Outcome::victory(mark), Reason::Win)),
            None if self.board.is_full() => Some((Outcome::Draw, Reason::BoardFull)),
            None => None,
        }
    }
    fn end(&mut self, outcome: Outcome, reason: Reason) {
        if self.is_over() {
            return;
        }
        self.ending = Some((outcome, reason));
        self.timer.clear();
        log::info!("[match {}] {} ({})", self.id, outcome, reason);
        let snapshot = self.snapshot();
        self.observer.update(&snapshot);
        if let Err(e) = self.observer.end(&snapshot) {
            log::error!("[match {}] end handler failed: {:#}", self.id, e);
        }
    }
    fn arm(&mut self) {
        self.timer.arm(self.ply);
        self.emit();
    }
    fn emit(&mut self) {
        let snapshot = self.snapshot();
        self.observer.update(&snapshot);
    }
}

impl Unique for Engine {
    fn id(&self) -> ID<Self> {
        self.id
    }
}
