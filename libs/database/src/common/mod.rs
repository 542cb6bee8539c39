//! Common utilities shared by the database connectors

pub mod poll;
pub mod retry;

pub use poll::{PollConfig, PollTimeout, poll_until};
pub use retry::{RetryConfig, retry, retry_with_backoff};
