use crate::core::point::{SourcePoint, TargetPoint};
use std::fmt;

/// One edge from a readable source point to a writable target point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route {
    source: SourcePoint,
    target: TargetPoint,
}

impl Route {
    pub fn new(source: SourcePoint, target: TargetPoint) -> Self {
        Self { source, target }
    }

    pub fn source_point(&self) -> &SourcePoint {
        &self.source
    }

    pub fn target_point(&self) -> &TargetPoint {
        &self.target
    }

    pub fn connects(&self, source_class: &str, target_class: &str) -> bool {
        self.source.class_id() == source_class && self.target.class_id() == target_class
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// Ordered set of unique routes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteCollection {
    routes: Vec<Route>,
}

impl RouteCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `route` unless an equal route is already present.
    pub fn insert(&mut self, route: Route) -> bool {
        if self.routes.contains(&route) {
            return false;
        }
        self.routes.push(route);
        true
    }

    pub fn contains(&self, route: &Route) -> bool {
        self.routes.contains(route)
    }

    /// Whether some route already writes to `point`.
    pub fn targets(&self, point: &TargetPoint) -> bool {
        self.routes.iter().any(|r| r.target_point() == point)
    }

    /// Adds the discovered routes whose target point is not covered yet.
    ///
    /// Returns how many were added.
    pub fn merge_discovered(&mut self, discovered: RouteCollection) -> usize {
        let mut added = 0;
        for route in discovered {
            if self.targets(route.target_point()) {
                tracing::trace!("Skipping discovered route {}: target already routed", route);
                continue;
            }
            self.routes.push(route);
            added += 1;
        }
        added
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes sorted by their canonical text, for order-insensitive comparison.
    pub fn sorted(&self) -> Vec<&Route> {
        let mut routes: Vec<&Route> = self.routes.iter().collect();
        routes.sort_by_key(|r| r.to_string());
        routes
    }
}

impl FromIterator<Route> for RouteCollection {
    fn from_iter<I: IntoIterator<Item = Route>>(iter: I) -> Self {
        let mut collection = Self::new();
        collection.extend(iter);
        collection
    }
}

impl Extend<Route> for RouteCollection {
    fn extend<I: IntoIterator<Item = Route>>(&mut self, iter: I) {
        for route in iter {
            self.insert(route);
        }
    }
}

impl IntoIterator for RouteCollection {
    type Item = Route;
    type IntoIter = std::vec::IntoIter<Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.into_iter()
    }
}

impl<'a> IntoIterator for &'a RouteCollection {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}
