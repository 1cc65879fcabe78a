use std::fmt;

use validator::ValidateEmail;

/// Name of the request field carrying the candidate address.
pub const EMAIL_FIELD: &str = "email";

/// Returns `true` when `candidate` is a syntactically valid email address.
///
/// This is the one validation rule for subscriber emails. The HTTP handler
/// and [`crate::subscription_client::SubscriptionClient`] both go through
/// [`SubscriberEmail::parse`], which calls this, so the two sides of the
/// network boundary can never drift apart.
pub fn is_valid_email(candidate: &str) -> bool {
    candidate.validate_email()
}

// Subscriber email newtype.
//
// The domain part is lowercased on parse, the local part is kept verbatim.
// Two addresses are the same subscriber iff their parsed forms are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(s: String) -> Result<Self, String> {
        let candidate = s.trim();
        if candidate.is_empty() {
            return Err("An email address is required.".to_string());
        }
        if !is_valid_email(candidate) {
            return Err(format!("'{}' is not a valid subscriber email.", candidate));
        }
        // The domain follows the last '@'.
        let normalized = match candidate.rsplit_once('@') {
            Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
            None => candidate.to_string(),
        };
        Ok(Self(normalized))
    }
}

impl TryFrom<String> for SubscriberEmail {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<SubscriberEmail> for String {
    fn from(email: SubscriberEmail) -> Self {
        email.0
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
