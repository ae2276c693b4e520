use crate::domain::slug::{slugify, Slug};
use chrono::{DateTime, NaiveDate};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Relation dimensions an item can share with another item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    Service,
    Industry,
    Client,
}

/// Nested `{id, name}` reference as the backend embeds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationRef {
    pub id: u64,
    #[serde(default, alias = "title")]
    pub name: String,
}

/// Shared view over every titled entity the site links to.
pub trait Content {
    fn id(&self) -> u64;
    fn title(&self) -> &str;

    fn relation_id(&self, _relation: Relation) -> Option<u64> {
        None
    }

    /// Always recomputed; no entity stores its slug.
    fn slug(&self) -> Slug {
        slugify(self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: u64,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: u64,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<RelationRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<RelationRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<RelationRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<RelationRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<RelationRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<RelationRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Industry {
    pub id: u64,
    #[serde(alias = "title")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Discriminated union of the linkable content types.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentItem {
    Service(Service),
    Article(Article),
    Project(Project),
}

fn relation_of(nested: &Option<RelationRef>, flat: Option<u64>) -> Option<u64> {
    nested.as_ref().map(|r| r.id).or(flat)
}

/// Parses `2024-03-01` as well as full RFC 3339 timestamps.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            raw.get(..10)
                .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
        })
}

impl Content for Service {
    fn id(&self) -> u64 {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }
}

impl Content for Article {
    fn id(&self) -> u64 {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn relation_id(&self, relation: Relation) -> Option<u64> {
        match relation {
            Relation::Service => relation_of(&self.service, self.service_id),
            Relation::Industry => relation_of(&self.industry, self.industry_id),
            Relation::Client => relation_of(&self.client, self.client_id),
        }
    }
}

impl Article {
    pub fn date(&self) -> Option<NaiveDate> {
        self.published_at
            .as_deref()
            .or(self.created_at.as_deref())
            .and_then(parse_date)
    }
}

impl Content for Project {
    fn id(&self) -> u64 {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn relation_id(&self, relation: Relation) -> Option<u64> {
        match relation {
            Relation::Service => relation_of(&self.service, self.service_id),
            Relation::Industry => relation_of(&self.industry, self.industry_id),
            Relation::Client => relation_of(&self.client, self.client_id),
        }
    }
}

impl Project {
    pub fn date(&self) -> Option<NaiveDate> {
        self.event_date
            .as_deref()
            .or(self.created_at.as_deref())
            .and_then(parse_date)
    }
}

impl Content for ContentItem {
    fn id(&self) -> u64 {
        match self {
            ContentItem::Service(s) => s.id(),
            ContentItem::Article(a) => a.id(),
            ContentItem::Project(p) => p.id(),
        }
    }

    fn title(&self) -> &str {
        match self {
            ContentItem::Service(s) => s.title(),
            ContentItem::Article(a) => a.title(),
            ContentItem::Project(p) => p.title(),
        }
    }

    fn relation_id(&self, relation: Relation) -> Option<u64> {
        match self {
            ContentItem::Service(s) => s.relation_id(relation),
            ContentItem::Article(a) => a.relation_id(relation),
            ContentItem::Project(p) => p.relation_id(relation),
        }
    }
}

impl ContentItem {
    pub fn kind(&self) -> &'static str {
        match self {
            ContentItem::Service(_) => "service",
            ContentItem::Article(_) => "article",
            ContentItem::Project(_) => "project",
        }
    }

    /// Route prefix the site mounts this kind of item under.
    pub fn route_prefix(&self) -> &'static str {
        match self {
            ContentItem::Service(_) => "/services",
            ContentItem::Article(_) => "/article",
            ContentItem::Project(_) => "/work/projects",
        }
    }

    pub fn route(&self) -> String {
        format!("{}/{}", self.route_prefix(), self.slug())
    }

    /// Publication date for articles, event date for projects, creation date otherwise.
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            ContentItem::Service(s) => s.created_at.as_deref().and_then(parse_date),
            ContentItem::Article(a) => a.date(),
            ContentItem::Project(p) => p.date(),
        }
    }
}

/// Normalized collection page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub last_page: u32,
    pub total: u64,
    pub per_page: u32,
}

impl<T> Page<T> {
    /// Wraps an unpaginated collection.
    pub fn single(items: Vec<T>) -> Self {
        let len = items.len();
        Self {
            items,
            current_page: 1,
            last_page: 1,
            total: len as u64,
            per_page: len as u32,
        }
    }

    pub fn has_more(&self) -> bool {
        self.current_page < self.last_page
    }
}

/// Outcome of one fetch: live data, or a substitute with the reason it was needed.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult<T> {
    Ok { data: T },
    Fallback { fallback: T, reason: String },
}

impl<T> FetchResult<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, FetchResult::Ok { .. })
    }

    pub fn is_fallback(&self) -> bool {
        !self.is_ok()
    }

    pub fn value(&self) -> &T {
        match self {
            FetchResult::Ok { data } => data,
            FetchResult::Fallback { fallback, .. } => fallback,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            FetchResult::Ok { data } => data,
            FetchResult::Fallback { fallback, .. } => fallback,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            FetchResult::Ok { .. } => None,
            FetchResult::Fallback { reason, .. } => Some(reason),
        }
    }
}

impl<T: Serialize> Serialize for FetchResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FetchResult::Ok { data } => {
                let mut state = serializer.serialize_struct("FetchResult", 2)?;
                state.serialize_field("ok", &true)?;
                state.serialize_field("data", data)?;
                state.end()
            }
            FetchResult::Fallback { fallback, reason } => {
                let mut state = serializer.serialize_struct("FetchResult", 3)?;
                state.serialize_field("ok", &false)?;
                state.serialize_field("fallback", fallback)?;
                state.serialize_field("reason", reason)?;
                state.end()
            }
        }
    }
}
