// Adapters layer: concrete content sources behind the domain ports.

pub mod fallback;
pub mod http;

pub use fallback::{FallbackCatalog, StaticSource};
pub use http::RemoteSource;
