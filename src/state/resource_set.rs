use crate::state::{ResourceCategory, ResourceRef};
use std::collections::HashSet;
use url::Url;

/// Ordered, deduplicated collection of resource references
///
/// A URL is stored at most once. The first insertion wins, so a URL seen as
/// an image and later as a script stays an image.
#[derive(Debug, Clone, Default)]
pub struct ResourceSet {
    seen: HashSet<Url>,
    resources: Vec<ResourceRef>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `resource` unless its URL is already present
    ///
    /// Returns true if the resource was added.
    pub fn insert(&mut self, resource: ResourceRef) -> bool {
        if !self.seen.insert(resource.url.clone()) {
            tracing::trace!("Duplicate resource skipped: {}", resource.url);
            return false;
        }
        self.resources.push(resource);
        true
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.seen.contains(url)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Iterates in discovery order
    pub fn iter(&self) -> impl Iterator<Item = &ResourceRef> {
        self.resources.iter()
    }

    /// Resources whose primary category is `category`
    pub fn by_category(&self, category: ResourceCategory) -> Vec<ResourceRef> {
        self.resources
            .iter()
            .filter(|r| r.category == category)
            .cloned()
            .collect()
    }

    /// Resources tagged external
    pub fn external(&self) -> Vec<ResourceRef> {
        self.resources
            .iter()
            .filter(|r| r.external)
            .cloned()
            .collect()
    }

    /// Splits into (stylesheets, everything else), both in discovery order
    pub fn partition_css(&self) -> (Vec<ResourceRef>, Vec<ResourceRef>) {
        self.resources
            .iter()
            .cloned()
            .partition(|r| r.category == ResourceCategory::Css)
    }
}
