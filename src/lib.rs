pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{RemoteSource, StaticSource};
pub use config::SiteConfig;
pub use self::core::{LoadState, LoaderSettings, ResilientLoader};
pub use domain::model::{Article, Content, ContentItem, FetchResult, Industry, Page, Project, Service};
pub use domain::ports::{ContentSource, PageLoad};
pub use domain::related::{related, related_by, RelatedSet};
pub use domain::slug::{resolve_by_slug, slugify, Slug};
pub use utils::error::{ContentError, Result};
