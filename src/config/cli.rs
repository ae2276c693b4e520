use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "agency-content")]
#[command(about = "Load agency site pages from the content API with offline fallback")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override api.base_url
    #[arg(long)]
    pub api_base_url: Option<String>,

    /// Serve everything from the embedded offline catalog
    #[arg(long)]
    pub offline: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Services overview
    Services,
    /// One service with its projects and articles
    Service { slug: String },
    /// Paginated article listing
    Articles {
        #[arg(long)]
        page: Option<u32>,
    },
    /// One article with related articles
    Article { slug: String },
    /// Paginated project listing
    Projects {
        #[arg(long)]
        page: Option<u32>,
    },
    /// One project with related work and industry articles
    Project { slug: String },
    /// One industry with its articles and projects
    Industry { id: u64 },
    /// Every slug route plus slug collisions
    Routes,
    /// Print the effective configuration
    Config,
}
