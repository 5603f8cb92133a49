use crate::GRACE_MILLIS;
use crate::Millis;
use crate::Ply;
use crate::TURN_MILLIS;
use std::time::Duration;
use tokio::time::Instant;

/// Configuration for turn timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    /// Advertised time a participant has to move.
    pub turn: Duration,
    /// Slack added before the timeout actually fires.
    pub grace: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            turn: Duration::from_millis(TURN_MILLIS),
            grace: Duration::from_millis(GRACE_MILLIS),
        }
    }
}

/// A pending timeout, valid only while the match is still on move `expected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alarm {
    expected: Ply,
    fires: Instant,
}

impl Alarm {
    pub fn expected(&self) -> Ply {
        self.expected
    }
    pub fn fires(&self) -> Instant {
        self.fires
    }
}

/// Tracks the single outstanding turn deadline of a match.
/// Arming replaces whatever alarm was pending.
#[derive(Debug)]
pub struct Timer {
    config: TimerConfig,
    alarm: Option<Alarm>,
    deadline: Millis,
}

impl Timer {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            alarm: None,
            deadline: 0,
        }
    }
    #[cfg(test)]
    fn with_defaults() -> Self {
        Self::new(TimerConfig::default())
    }
    pub fn arm(&mut self, expected: Ply) {
        self.deadline = crate::now() + self.config.turn.as_millis() as Millis;
        self.alarm = Some(Alarm {
            expected,
            fires: Instant::now() + self.config.turn + self.config.grace,
        });
    }
    pub fn clear(&mut self) {
        self.alarm = None;
    }
    pub fn alarm(&self) -> Option<Alarm> {
        self.alarm
    }
    /// Epoch-millisecond deadline shown to participants.
    pub fn deadline(&self) -> Millis {
        self.deadline
    }
    #[cfg(test)]
    fn expired(&self) -> bool {
        self.alarm.map(|a| Instant::now() >= a.fires).unwrap_or(false)
    }
    #[cfg(test)]
    fn remaining(&self) -> Option<Duration> {
        self.alarm
            .map(|a| a.fires.saturating_duration_since(Instant::now()))
    }
}
