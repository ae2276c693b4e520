pub mod animation;
pub mod loader;
pub mod retry;

pub use loader::{LoadState, LoaderSettings, ResilientLoader};
pub use retry::{with_retry, RetryPolicy};
