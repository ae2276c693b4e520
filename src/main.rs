use agency_content::adapters::{RemoteSource, StaticSource};
use agency_content::app::pages::{
    ArticleDetailPage, ArticleListPage, IndustryPage, ProjectDetailPage, ProjectListPage,
    RoutesPage, ServiceDetailPage, ServicesPage,
};
use agency_content::config::{CliArgs, Command};
use agency_content::core::animation::{init_entrance_animation, Entrance, EntranceAnimation};
use agency_content::utils::{logger, validation::Validate};
use agency_content::{
    ContentSource, LoadState, LoaderSettings, PageLoad, ResilientLoader, SiteConfig, Slug,
};
use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::sync::Arc;

struct Sources {
    remote: Arc<dyn ContentSource>,
    fallback: Arc<dyn ContentSource>,
    settings: LoaderSettings,
    animation: &'static dyn EntranceAnimation,
}

/// What the front end receives for one page.
#[derive(Serialize)]
struct RenderedPage<'a, V: Serialize> {
    page: &'a str,
    #[serde(flatten)]
    state: &'a LoadState<V>,
    entrance: Entrance,
}

impl Sources {
    /// Loads one page and prints its final state; returns the process exit code.
    async fn render<P: PageLoad>(&self, page: P) -> anyhow::Result<i32> {
        let loader = ResilientLoader::new(
            page,
            self.remote.clone(),
            self.fallback.clone(),
            self.settings.clone(),
        );

        let state = tokio::select! {
            state = loader.load() => state?,
            _ = tokio::signal::ctrl_c() => {
                loader.navigate_away();
                anyhow::bail!("interrupted");
            }
        };

        let rendered = RenderedPage {
            page: loader.page().name(),
            state: &state,
            entrance: self.animation.entrance(0),
        };
        println!("{}", serde_json::to_string_pretty(&rendered)?);

        let exit_code = match &state {
            LoadState::Ready { view } => match view.reason() {
                None => 0,
                Some(reason) => {
                    eprintln!("⚠️ {}", reason);
                    2
                }
            },
            LoadState::NotFound { message } => {
                eprintln!("❌ {}", message);
                4
            }
            LoadState::Idle | LoadState::Loading => 1,
        };
        Ok(exit_code)
    }
}

fn load_config(args: &CliArgs) -> anyhow::Result<SiteConfig> {
    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            SiteConfig::from_file(path)
                .with_context(|| format!("failed to load config file '{}'", path))?
        }
        None => SiteConfig::default(),
    };

    config.apply_env_overrides();
    if let Some(base_url) = &args.api_base_url {
        tracing::info!("🔧 api.base_url overridden to: {}", base_url);
        config.api.base_url = base_url.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting agency-content");

    let config = load_config(&args)?;

    if let Err(e) = config.validate() {
        tracing::error!(
            "❌ Configuration validation failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let animation = init_entrance_animation(config.animation_config());

    let fallback: Arc<dyn ContentSource> = Arc::new(StaticSource::embedded()?);
    let remote: Arc<dyn ContentSource> = if args.offline {
        tracing::info!("📴 Offline mode: serving the embedded catalog");
        fallback.clone()
    } else {
        Arc::new(RemoteSource::from_config(&config)?)
    };

    let sources = Sources {
        remote,
        fallback,
        settings: LoaderSettings::from_config(&config),
        animation,
    };

    let exit_code = match args.command {
        Command::Services => sources.render(ServicesPage).await?,
        Command::Service { slug } => sources.render(ServiceDetailPage::new(Slug::new(slug))).await?,
        Command::Articles { page } => sources.render(ArticleListPage::new(page)).await?,
        Command::Article { slug } => sources.render(ArticleDetailPage::new(Slug::new(slug))).await?,
        Command::Projects { page } => sources.render(ProjectListPage::new(page)).await?,
        Command::Project { slug } => sources.render(ProjectDetailPage::new(Slug::new(slug))).await?,
        Command::Industry { id } => sources.render(IndustryPage::new(id)).await?,
        Command::Routes => sources.render(RoutesPage).await?,
        Command::Config => {
            let mut shown = config.clone();
            if shown.api.editor_key.is_some() {
                shown.api.editor_key = Some("********".to_string());
            }
            println!("{}", serde_json::to_string_pretty(&shown)?);
            0
        }
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
