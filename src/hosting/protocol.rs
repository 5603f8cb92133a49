use crate::gameroom::Snapshot;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Value;

/// Errors that can occur while decoding inbound frames.
#[derive(Debug, Clone)]
pub enum ProtocolError {
    Malformed(String),
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(s) => write!(f, "malformed message: {}", s),
        }
    }
}

impl std::error::Error for ProtocolError {}

/// Messages sent from client to server over WebSocket.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Declares the stable participant identity behind this connection.
    Register {
        #[serde(default, rename = "userId", deserialize_with = "identity")]
        user_id: Option<String>,
        /// Non-string nicknames read as absent and fall back to the default.
        #[serde(default, deserialize_with = "text")]
        nickname: Option<String>,
    },
    JoinLobby,
    /// Position is left raw; the engine decides what counts as a cell.
    MakeMove {
        #[serde(default)]
        position: Value,
    },
    LeaveGame,
}

/// Messages sent from server to client over WebSocket.
/// Both carry the full match snapshot; `game_start` is only ever the first.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    GameStart { snapshot: Snapshot },
    GameUpdate { snapshot: Snapshot },
}

impl ServerMessage {
    pub fn game_start(snapshot: &Snapshot) -> Self {
        Self::GameStart {
            snapshot: snapshot.clone(),
        }
    }
    pub fn game_update(snapshot: &Snapshot) -> Self {
        Self::GameUpdate {
            snapshot: snapshot.clone(),
        }
    }
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .inspect_err(|e| log::error!("failed to encode server message: {}", e))
            .unwrap_or_default()
    }
}

/// Wire codec between text frames and typed messages.
pub struct Protocol;

impl Protocol {
    pub fn decode(s: &str) -> Result<ClientMessage, ProtocolError> {
        serde_json::from_str(s).map_err(|e| ProtocolError::Malformed(e.to_string()))
    }
    pub fn encode(msg: &ServerMessage) -> String {
        msg.to_json()
    }
    /// Participant id from a loosely typed field: strings as-is, numbers in
    /// their JSON form, anything else absent.
    pub fn identity(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
    /// Nickname from a loosely typed field: only strings count.
    pub fn text(value: &Value) -> Option<String> {
        value.as_str().map(String::from)
    }
}

fn identity<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(Protocol::identity))
}

fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(Protocol::text))
}
