use crate::app::pages::{find_in_pages, follow_up_for};
use crate::domain::model::{Article, Content, FetchResult, Page, Project, Relation};
use crate::domain::ports::{ContentSource, PageLoad};
use crate::domain::related::{related, RelatedSet};
use crate::domain::slug::{warn_on_collisions, Slug};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::Serialize;

pub struct ProjectListPage {
    page: Option<u32>,
}

impl ProjectListPage {
    pub fn new(page: Option<u32>) -> Self {
        Self { page }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectListView {
    pub projects: Page<Project>,
}

#[async_trait]
impl PageLoad for ProjectListPage {
    type View = ProjectListView;

    fn name(&self) -> &str {
        "projects"
    }

    async fn load(&self, source: &dyn ContentSource) -> Result<ProjectListView> {
        let projects = source.projects(self.page).await?;
        warn_on_collisions("projects", &projects.items);
        Ok(ProjectListView { projects })
    }
}

/// `/work/projects/{slug}`: the case study, more work for the same client,
/// and articles from the project's industry.
pub struct ProjectDetailPage {
    slug: Slug,
}

impl ProjectDetailPage {
    pub fn new(slug: Slug) -> Self {
        Self { slug }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectDetailView {
    pub project: Project,
    pub related: RelatedSet<Project>,
    pub industry_articles: FetchResult<Vec<Article>>,
}

#[async_trait]
impl PageLoad for ProjectDetailPage {
    type View = ProjectDetailView;

    fn name(&self) -> &str {
        "project-detail"
    }

    async fn load(&self, source: &dyn ContentSource) -> Result<ProjectDetailView> {
        let (project, seen) =
            find_in_pages("projects", &self.slug, |page| source.projects(page)).await?;
        let related = related(&seen, &project, Relation::Client);

        let industry_articles = follow_up_for(
            "industry articles",
            source.request_timeout(),
            project.relation_id(Relation::Industry),
            |industry_id| source.industry_articles(industry_id),
        )
        .await;

        Ok(ProjectDetailView {
            project,
            related,
            industry_articles,
        })
    }
}
