//! Response envelopes the content API wraps collections and entities in.

use crate::domain::model::Page;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Pagination fields that travel next to a `data` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageMeta {
    pub current_page: Option<u32>,
    pub last_page: Option<u32>,
    pub total: Option<u64>,
    pub per_page: Option<u32>,
}

impl PageMeta {
    fn from_map(map: &Map<String, Value>) -> Self {
        let number = |key: &str| map.get(key).and_then(Value::as_u64);
        Self {
            current_page: number("current_page").map(|n| n as u32),
            last_page: number("last_page").map(|n| n as u32),
            total: number("total"),
            per_page: number("per_page").map(|n| n as u32),
        }
    }
}

/// Every collection shape the API is known to answer with.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionEnvelope {
    /// `[...]`
    Bare(Vec<Value>),
    /// `{data: [...], current_page, last_page, total, per_page}`
    Data { data: Vec<Value>, meta: PageMeta },
    /// `{message: {items: [...]}}` or `{message: {<key>: [...]}}`
    Message(Vec<Value>),
    /// `{<key>: [...]}` or `{<key>: {data: [...]}}`
    Keyed(Vec<Value>),
    Unrecognized,
}

fn take_array(map: &mut Map<String, Value>, key: &str) -> Option<Vec<Value>> {
    match map.get_mut(key) {
        Some(Value::Array(items)) => Some(std::mem::take(items)),
        _ => None,
    }
}

impl CollectionEnvelope {
    /// Classifies a decoded body; `key` names the resource-specific field
    /// (`projects`, `articles`, ...).
    pub fn classify(value: Value, key: &str) -> Self {
        let mut map = match value {
            Value::Array(items) => return CollectionEnvelope::Bare(items),
            Value::Object(map) => map,
            _ => return CollectionEnvelope::Unrecognized,
        };

        if let Some(data) = take_array(&mut map, "data") {
            let meta = PageMeta::from_map(&map);
            return CollectionEnvelope::Data { data, meta };
        }

        if let Some(Value::Object(message)) = map.get_mut("message") {
            if let Some(items) = take_array(message, key).or_else(|| take_array(message, "items")) {
                return CollectionEnvelope::Message(items);
            }
        }

        if let Some(items) = take_array(&mut map, key) {
            return CollectionEnvelope::Keyed(items);
        }

        if let Some(Value::Object(nested)) = map.get_mut(key) {
            if let Some(items) = take_array(nested, "data") {
                return CollectionEnvelope::Keyed(items);
            }
        }

        CollectionEnvelope::Unrecognized
    }

    /// Decodes the items; an unrecognized shape is an empty page, a
    /// recognized shape with undecodable items is an error.
    pub fn into_page<T: DeserializeOwned>(self) -> Result<Page<T>, serde_json::Error> {
        match self {
            CollectionEnvelope::Bare(items) => Ok(Page::single(decode_items(items)?)),
            CollectionEnvelope::Data { data, meta } => {
                let items: Vec<T> = decode_items(data)?;
                let len = items.len();
                Ok(Page {
                    current_page: meta.current_page.unwrap_or(1),
                    last_page: meta.last_page.unwrap_or(1),
                    total: meta.total.unwrap_or(len as u64),
                    per_page: meta.per_page.unwrap_or(len as u32),
                    items,
                })
            }
            CollectionEnvelope::Message(items) => Ok(Page::single(decode_items(items)?)),
            CollectionEnvelope::Keyed(items) => Ok(Page::single(decode_items(items)?)),
            CollectionEnvelope::Unrecognized => Ok(Page::single(Vec::new())),
        }
    }

    pub fn shape(&self) -> &'static str {
        match self {
            CollectionEnvelope::Bare(_) => "bare",
            CollectionEnvelope::Data { .. } => "data",
            CollectionEnvelope::Message(_) => "message",
            CollectionEnvelope::Keyed(_) => "keyed",
            CollectionEnvelope::Unrecognized => "unrecognized",
        }
    }
}

fn decode_items<T: DeserializeOwned>(items: Vec<Value>) -> Result<Vec<T>, serde_json::Error> {
    items.into_iter().map(serde_json::from_value).collect()
}

/// Detail endpoints answer with the entity itself or `{data: {...}}`.
pub fn unwrap_entity(value: Value) -> Value {
    match value {
        Value::Object(mut map) if matches!(map.get("data"), Some(Value::Object(_))) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Project;
    use serde_json::json;

    fn projects(value: Value, key: &str) -> Page<Project> {
        CollectionEnvelope::classify(value, key).into_page().unwrap()
    }

    #[test]
    fn test_bare_array() {
        let page = projects(json!([{"id": 1, "title": "A"}, {"id": 2, "title": "B"}]), "projects");
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 2);
        assert!(!page.has_more());
    }

    #[test]
    fn test_data_envelope_with_pagination() {
        let body = json!({
            "data": [{"id": 1, "title": "A"}],
            "current_page": 1,
            "last_page": 3,
            "total": 13,
            "per_page": 6
        });
        let envelope = CollectionEnvelope::classify(body, "projects");
        assert_eq!(envelope.shape(), "data");

        let page: Page<Project> = envelope.into_page().unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.last_page, 3);
        assert_eq!(page.total, 13);
        assert_eq!(page.per_page, 6);
        assert!(page.has_more());
    }

    #[test]
    fn test_message_envelopes() {
        let by_key = projects(json!({"message": {"projects": [{"id": 5, "title": "X"}]}}), "projects");
        assert_eq!(by_key.items[0].id, 5);

        let by_items = projects(json!({"message": {"items": [{"id": 6, "title": "Y"}]}}), "projects");
        assert_eq!(by_items.items[0].id, 6);
    }

    #[test]
    fn test_keyed_envelopes() {
        let flat = projects(json!({"projects": [{"id": 1, "title": "A"}]}), "projects");
        assert_eq!(flat.items.len(), 1);

        let nested = projects(
            json!({"projects": {"data": [{"id": 1, "title": "A"}, {"id": 2, "title": "B"}]}}),
            "projects",
        );
        assert_eq!(nested.items.len(), 2);
    }

    #[test]
    fn test_unrecognized_shape_is_empty() {
        let page = projects(json!({"unexpectedShape": true}), "projects");
        assert!(page.items.is_empty());

        let scalar = projects(json!("hello"), "projects");
        assert!(scalar.items.is_empty());
    }

    #[test]
    fn test_undecodable_items_are_an_error() {
        let envelope = CollectionEnvelope::classify(json!([{"id": "not-a-number"}]), "projects");
        let result: Result<Page<Project>, _> = envelope.into_page();
        assert!(result.is_err());
    }

    #[test]
    fn test_unwrap_entity() {
        assert_eq!(unwrap_entity(json!({"data": {"id": 1}})), json!({"id": 1}));
        assert_eq!(unwrap_entity(json!({"id": 1, "data": [1]})), json!({"id": 1, "data": [1]}));
    }
}
