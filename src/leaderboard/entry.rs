use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

/// Cumulative record for one participant.
/// Persisted counters may be written as integral floats (`2.0`); negative or
/// fractional counts fail to decode and the entry is discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub nickname: String,
    #[serde(deserialize_with = "counter")]
    pub wins: u64,
    #[serde(deserialize_with = "counter")]
    pub losses: u64,
    #[serde(deserialize_with = "counter")]
    pub ties: u64,
}

impl Entry {
    pub fn new(nickname: String) -> Self {
        Self {
            nickname,
            wins: 0,
            losses: 0,
            ties: 0,
        }
    }
    pub fn played(&self) -> u64 {
        self.wins + self.losses + self.ties
    }
}

fn counter<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let n = serde_json::Number::deserialize(deserializer)?;
    n.as_u64()
        .or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        })
        .ok_or_else(|| D::Error::custom(format!("invalid counter {}", n)))
}
