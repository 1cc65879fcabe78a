mod subscribe_request;
mod subscriber;
mod subscriber_email;

pub use subscribe_request::SubscribeRequest;
pub use subscriber::Subscriber;
pub use subscriber_email::{EMAIL_FIELD, SubscriberEmail, is_valid_email};
