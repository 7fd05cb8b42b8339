use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A row of the `messages` table, relayed exactly as the store returned it.
///
/// Nothing is required of the columns: a row with a null or missing `from`
/// still reaches the client untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Message(pub Map<String, Value>);

impl Message {
    pub fn from(&self) -> Option<&str> {
        self.0.get("from").and_then(Value::as_str)
    }

    pub fn text(&self) -> Option<&str> {
        self.0.get("text").and_then(Value::as_str)
    }

    /// `timestamptz` values as well as bare `timestamp` ones, which are taken
    /// to be UTC.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.0.get("created_at").and_then(Value::as_str)?;
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
            return Some(timestamp.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .map(|timestamp| timestamp.and_utc())
            .ok()
    }
}

#[derive(Serialize)]
pub struct NewMessage<'a> {
    pub from: &'a str,
    pub text: &'a str,
}
