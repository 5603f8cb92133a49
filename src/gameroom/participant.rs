use crate::ID;
use crate::MAX_NICKNAME_LENGTH;
use serde::Serialize;

/// Marker for transport-level connection identifiers.
/// A connection is ephemeral; the participant behind it is not.
#[derive(Debug)]
pub struct Connection;

/// Public identity of a participant: a stable id that survives reconnects
/// (used for statistics) and a display nickname.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    id: String,
    nickname: String,
}

impl Participant {
    /// Builds a participant from caller-supplied fields.
    /// A blank id falls back to the connection id; the nickname is sanitized.
    pub fn new(id: Option<&str>, nickname: Option<&str>, conn: ID<Connection>) -> Self {
        let id = id
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .unwrap_or_else(|| conn.to_string());
        let nickname = Self::sanitize(nickname, &Self::fallback(&id));
        Self { id, nickname }
    }
    /// Participant for a connection that never registered.
    pub fn anonymous(conn: ID<Connection>) -> Self {
        Self::new(None, None, conn)
    }
    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn nickname(&self) -> &str {
        &self.nickname
    }
    /// `Player-` followed by the last four characters of the id.
    pub fn fallback(id: &str) -> String {
        let tail = id.chars().rev().take(4).collect::<Vec<_>>();
        format!("Player-{}", tail.into_iter().rev().collect::<String>())
    }
    /// Trims and truncates a nickname, substituting `fallback` when nothing is left.
    pub fn sanitize(nickname: Option<&str>, fallback: &str) -> String {
        nickname
            .map(str::trim)
            .map(|s| s.chars().take(MAX_NICKNAME_LENGTH).collect::<String>())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

impl std::fmt::Display for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.nickname, self.id)
    }
}

/// A participant seated in a match, addressed by the connection that joined.
#[derive(Debug, Clone)]
pub struct Binding {
    conn: ID<Connection>,
    participant: Participant,
}

impl Binding {
    pub fn new(conn: ID<Connection>, participant: Participant) -> Self {
        Self { conn, participant }
    }
    pub fn conn(&self) -> ID<Connection> {
        self.conn
    }
    pub fn participant(&self) -> &Participant {
        &self.participant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn sanitize_trims_and_truncates() {
        assert_eq!(Participant::sanitize(Some("  alice  "), "x"), "alice");
        let long = "abcdefghijklmnopqrstuvwxyz";
        assert_eq!(Participant::sanitize(Some(long), "x"), &long[..20]);
    }
    #[test]
    fn sanitize_falls_back_on_blank() {
        assert_eq!(Participant::sanitize(None, "Player-abcd"), "Player-abcd");
        assert_eq!(Participant::sanitize(Some("   "), "Player-abcd"), "Player-abcd");
    }
    #[test]
    fn sanitize_counts_characters_not_bytes() {
        let name = "é".repeat(30);
        assert_eq!(Participant::sanitize(Some(&name), "x").chars().count(), 20);
    }
    #[test]
    fn fallback_uses_id_tail() {
        assert_eq!(Participant::fallback("user_12345678"), "Player-5678");
        assert_eq!(Participant::fallback("ab"), "Player-ab");
    }
    #[test]
    fn anonymous_uses_connection_id() {
        let conn = ID::<Connection>::default();
        let p = Participant::anonymous(conn);
        assert_eq!(p.id(), conn.to_string());
        assert_eq!(p.nickname(), format!("Player-{}", conn.suffix()));
    }
    #[test]
    fn registered_identity_is_independent_of_connection() {
        let p = Participant::new(Some("user_1"), Some("bob"), ID::default());
        let q = Participant::new(Some("user_1"), Some("bob"), ID::default());
        assert_eq!(p, q);
    }
}
