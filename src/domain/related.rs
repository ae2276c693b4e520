use crate::domain::model::{Content, Relation};
use serde::Serialize;

pub const MAX_RELATED: usize = 4;

/// Up to [`MAX_RELATED`] items sharing a relation with a focal item, in
/// source order, never containing the focal item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RelatedSet<T> {
    items: Vec<T>,
}

impl<T> RelatedSet<T> {
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

pub fn related_by<T, F>(collection: &[T], focal: &T, key: F) -> RelatedSet<T>
where
    T: Content + Clone,
    F: Fn(&T) -> Option<u64>,
{
    let Some(target) = key(focal) else {
        return RelatedSet::empty();
    };

    let items = collection
        .iter()
        .filter(|item| item.id() != focal.id() && key(item) == Some(target))
        .take(MAX_RELATED)
        .cloned()
        .collect();

    RelatedSet { items }
}

pub fn related<T: Content + Clone>(collection: &[T], focal: &T, relation: Relation) -> RelatedSet<T> {
    related_by(collection, focal, |item| item.relation_id(relation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Project;

    fn project(id: u64, service_id: Option<u64>) -> Project {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": format!("Project {}", id),
            "service_id": service_id,
        }))
        .unwrap()
    }

    #[test]
    fn test_related_caps_at_four_and_excludes_focal() {
        let collection: Vec<Project> = (1..=10)
            .map(|id| project(id, Some(if id % 2 == 0 { 3 } else { 8 })))
            .collect();
        // ids 2, 4, 6, 8, 10 share service 3
        let focal = collection[3].clone();
        assert_eq!(focal.id, 4);

        let related = related(&collection, &focal, Relation::Service);
        assert_eq!(related.len(), 4);
        assert!(related.items().iter().all(|p| p.id != focal.id));
        let ids: Vec<u64> = related.items().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 6, 8, 10]);
    }

    #[test]
    fn test_related_empty_without_key() {
        let collection = vec![project(1, Some(3)), project(2, None), project(3, None)];
        let related = related(&collection, &collection[1], Relation::Service);
        assert!(related.is_empty());
    }

    #[test]
    fn test_related_by_custom_selector() {
        let collection = vec![project(1, Some(3)), project(2, Some(3)), project(3, Some(4))];
        let related = related_by(&collection, &collection[0], |p| p.service_id);
        assert_eq!(related.into_vec().iter().map(|p| p.id).collect::<Vec<_>>(), vec![2]);
    }
}
