use crate::app::pages::{collect_pages, follow_up};
use crate::domain::model::{Article, Content, FetchResult, Industry, Project, Relation};
use crate::domain::ports::{ContentSource, PageLoad};
use crate::domain::related::MAX_RELATED;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::Serialize;

pub struct IndustryPage {
    id: u64,
}

impl IndustryPage {
    pub fn new(id: u64) -> Self {
        Self { id }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndustryView {
    pub industry: Industry,
    pub articles: FetchResult<Vec<Article>>,
    pub projects: FetchResult<Vec<Project>>,
}

async fn industry_projects(source: &dyn ContentSource, industry_id: u64) -> Result<Vec<Project>> {
    let projects = collect_pages(|page| source.projects(page)).await?;
    Ok(projects
        .into_iter()
        .filter(|project| project.relation_id(Relation::Industry) == Some(industry_id))
        .take(MAX_RELATED)
        .collect())
}

#[async_trait]
impl PageLoad for IndustryPage {
    type View = IndustryView;

    fn name(&self) -> &str {
        "industry"
    }

    async fn load(&self, source: &dyn ContentSource) -> Result<IndustryView> {
        let industry = source.industry(self.id).await?;

        let limit = source.request_timeout();
        let (articles, projects) = tokio::join!(
            follow_up("industry articles", limit, source.industry_articles(industry.id)),
            follow_up("industry projects", limit, industry_projects(source, industry.id)),
        );

        Ok(IndustryView {
            industry,
            articles,
            projects,
        })
    }
}
