#[cfg(feature = "cli")]
pub mod cli;
pub mod site_config;

#[cfg(feature = "cli")]
pub use cli::{CliArgs, Command};
pub use site_config::SiteConfig;
