//! Process-wide entrance animation settings.
//!
//! The site animates cards and sections into view as they scroll in. The
//! settings are fixed at start-up and shared by every page; initializing a
//! second time keeps the first configuration.

use serde::Serialize;
use std::sync::OnceLock;
use std::time::Duration;

/// Delay added per list position so grid items reveal one after another.
pub const STAGGER: Duration = Duration::from_millis(100);
const MAX_STAGGERED_ITEMS: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationConfig {
    pub duration: Duration,
    pub easing: String,
    pub run_once: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(800),
            easing: "ease-in-out".to_string(),
            run_once: true,
        }
    }
}

/// Parameters for one element's entrance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entrance {
    pub duration_ms: u64,
    pub delay_ms: u64,
    pub easing: String,
    pub run_once: bool,
}

pub trait EntranceAnimation: Send + Sync {
    fn config(&self) -> &AnimationConfig;

    /// Entrance for the element at `index` within a list.
    fn entrance(&self, index: usize) -> Entrance;
}

#[derive(Debug)]
struct ScrollReveal {
    config: AnimationConfig,
}

impl EntranceAnimation for ScrollReveal {
    fn config(&self) -> &AnimationConfig {
        &self.config
    }

    fn entrance(&self, index: usize) -> Entrance {
        let step = index.min(MAX_STAGGERED_ITEMS) as u32;
        Entrance {
            duration_ms: self.config.duration.as_millis() as u64,
            delay_ms: (STAGGER * step).as_millis() as u64,
            easing: self.config.easing.clone(),
            run_once: self.config.run_once,
        }
    }
}

static ANIMATION: OnceLock<ScrollReveal> = OnceLock::new();

/// Installs the shared animation service. Only the first call's config is used.
pub fn init_entrance_animation(config: AnimationConfig) -> &'static dyn EntranceAnimation {
    let mut installed = false;
    let service = ANIMATION.get_or_init(|| {
        installed = true;
        ScrollReveal { config }
    });

    if installed {
        tracing::debug!(
            "🎬 Entrance animation ready: {:?}, easing '{}', run once: {}",
            service.config.duration,
            service.config.easing,
            service.config.run_once
        );
    } else {
        tracing::debug!("🎬 Entrance animation already initialized; keeping existing config");
    }
    service
}
