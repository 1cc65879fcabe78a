use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Body of `POST /subscriptions`.
///
/// Unknown fields are ignored. Whatever sits under `email` becomes a string
/// candidate so that it is reported by the same validation path as a
/// malformed address: a missing or `null` email is empty, any other
/// non-string value is its JSON text.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct SubscribeRequest {
    #[serde(default, deserialize_with = "email_candidate")]
    pub email: String,
}

fn email_candidate<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let candidate = match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    };
    Ok(candidate)
}
