use super::*;
use crate::gameroom::Mark;
use crate::gameroom::Snapshot;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Participant id → cumulative record. Persisted as a single JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Standings(BTreeMap<String, Entry>);

impl Standings {
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.0.get(id)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Entry)> {
        self.0.iter()
    }
    /// Creates a zeroed entry if absent, otherwise refreshes the nickname
    /// when a non-empty, different one is supplied. Counters are untouched.
    /// Returns None for a blank id.
    pub fn ensure(&mut self, id: &str, nickname: Option<&str>) -> Option<&mut Entry> {
        if id.is_empty() {
            log::warn!("[standings] ignoring entry with empty id");
            return None;
        }
        let nickname = nickname.filter(|n| !n.is_empty());
        let entry = self
            .0
            .entry(id.to_string())
            .or_insert_with(|| Entry::new(nickname.unwrap_or(id).to_string()));
        if let Some(n) = nickname.filter(|n| *n != entry.nickname) {
            entry.nickname = n.to_string();
        }
        Some(entry)
    }
    /// Applies one finished match: a win and a loss, or two ties.
    pub fn settle(&mut self, snapshot: &Snapshot) {
        for mark in Mark::all() {
            let player = snapshot.players.get(mark);
            let entry = self.ensure(player.id(), Some(player.nickname()));
            match (entry, snapshot.result) {
                (Some(entry), Some(result)) => match result.winner() {
                    Some(w) if w == mark => entry.wins += 1,
                    Some(_) => entry.losses += 1,
                    None => entry.ties += 1,
                },
                _ => {}
            }
        }
    }
    /// Parses persisted standings. Malformed entries are dropped one by one;
    /// a malformed document yields empty standings.
    pub fn decode(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        let map = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                log::warn!("[standings] invalid leaderboard structure, resetting");
                return Self::default();
            }
            Err(e) => {
                log::error!("[standings] unparseable leaderboard, resetting: {}", e);
                return Self::default();
            }
        };
        Self(
            map.into_iter()
                .filter_map(|(id, value)| {
                    serde_json::from_value::<Entry>(value)
                        .inspect_err(|e| log::warn!("[standings] invalid entry for {}, skipping: {}", id, e))
                        .ok()
                        .map(|entry| (id, entry))
                })
                .collect(),
        )
    }
    pub fn encode(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
