//! Core types for the message relay.

use crate::error::{RelayError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Separator joining the segments of a composite key.
const KEY_SEPARATOR: char = ':';

/// Fields every pushed payload must carry, in reporting order.
const REQUIRED_FIELDS: [&str; 6] = ["account", "id", "date", "costs", "shows", "clicks"];

/// Composite identity of a mergeable unit: `account:id:date`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageKey(String);

impl MessageKey {
    /// Build a key from its segments.
    pub fn new(account: &str, id: &str, date: &str) -> Self {
        MessageKey(format!(
            "{}{sep}{}{sep}{}",
            account,
            id,
            date,
            sep = KEY_SEPARATOR
        ))
    }

    /// The delivery channel: key text before the first separator.
    pub fn channel(&self) -> &str {
        match self.0.find(KEY_SEPARATOR) {
            Some(end) => &self.0[..end],
            None => &self.0,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageKey({})", self.0)
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The summable portion of a message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub costs: f64,
    pub shows: f64,
    pub clicks: f64,
}

impl Metrics {
    /// Field-wise sum, applied when a pushed key collides with a
    /// stored one.
    pub fn merge(&mut self, other: Metrics) {
        self.costs += other.costs;
        self.shows += other.shows;
        self.clicks += other.clicks;
    }
}

/// A validated metric event.
///
/// Construct from loose JSON with [`Message::from_value`]; the relay
/// only ever stores messages that passed the required-field schema.
/// `account`, `id`, and `date` accept JSON strings or numbers and are
/// canonicalized to strings.
#[derive(Clone, Debug, Serialize)]
pub struct Message {
    pub account: String,
    pub id: String,
    pub date: String,

    #[serde(flatten)]
    pub metrics: Metrics,

    /// Fields beyond the required schema. Kept from the first insert
    /// for a key; later merges never touch them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    /// Validate a loose JSON payload into a message.
    ///
    /// Every missing or invalid required field is reported, not just
    /// the first one found.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut fields = match value {
            Value::Object(fields) => fields,
            _ => {
                return Err(RelayError::MalformedMessage {
                    missing_fields: REQUIRED_FIELDS.iter().map(|f| f.to_string()).collect(),
                })
            }
        };

        let mut missing = Vec::new();

        let account = take_scalar(&mut fields, "account", &mut missing);
        let id = take_scalar(&mut fields, "id", &mut missing);
        let date = take_scalar(&mut fields, "date", &mut missing);

        let costs = take_number(&mut fields, "costs", &mut missing);
        let shows = take_number(&mut fields, "shows", &mut missing);
        let clicks = take_number(&mut fields, "clicks", &mut missing);

        match (account, id, date, costs, shows, clicks) {
            (Some(account), Some(id), Some(date), Some(costs), Some(shows), Some(clicks)) => {
                Ok(Message {
                    account,
                    id,
                    date,
                    metrics: Metrics {
                        costs,
                        shows,
                        clicks,
                    },
                    extra: fields,
                })
            }
            _ => Err(RelayError::MalformedMessage {
                missing_fields: missing,
            }),
        }
    }

    /// The composite key identifying this message's mergeable unit.
    pub fn key(&self) -> MessageKey {
        MessageKey::new(&self.account, &self.id, &self.date)
    }

    /// The delivery channel this message belongs to.
    ///
    /// Matches [`MessageKey::channel`]: the key text before the first
    /// separator, which is the whole account unless the account
    /// itself contains one.
    pub fn channel(&self) -> &str {
        match self.account.find(KEY_SEPARATOR) {
            Some(end) => &self.account[..end],
            None => &self.account,
        }
    }
}

/// Whether `channel` matches the transport's `[A-Za-z0-9_]+` route
/// pattern.
///
/// The relay itself accepts any channel string; boundaries reject
/// unrecognized patterns before calling in.
pub fn is_valid_channel(channel: &str) -> bool {
    !channel.is_empty()
        && channel
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Remove a key segment field, canonicalizing strings and numbers.
fn take_scalar(
    fields: &mut Map<String, Value>,
    name: &'static str,
    missing: &mut Vec<String>,
) -> Option<String> {
    let parsed = match fields.remove(name) {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    };
    if parsed.is_none() {
        missing.push(name.to_string());
    }
    parsed
}

/// Remove a metric field, requiring a JSON number.
fn take_number(
    fields: &mut Map<String, Value>,
    name: &'static str,
    missing: &mut Vec<String>,
) -> Option<f64> {
    let parsed = fields.remove(name).and_then(|value| value.as_f64());
    if parsed.is_none() {
        missing.push(name.to_string());
    }
    parsed
}
