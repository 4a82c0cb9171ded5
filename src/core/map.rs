use crate::core::path_finder::{ChainPathFinder, PathFinder};
use crate::core::route::{Route, RouteCollection};
use crate::core::route_builder::RouteBuilder;
use crate::core::point_factory::PointFactory;
use crate::core::source::Source;
use crate::core::target::Target;
use crate::utils::error::Result;
use std::sync::Arc;

/// Explicit routes plus an optional strategy for finding the rest.
#[derive(Debug, Clone, Default)]
pub struct Map {
    routes: RouteCollection,
    path_finder: Option<Arc<dyn PathFinder>>,
}

impl Map {
    pub fn new(routes: RouteCollection, path_finder: Option<Arc<dyn PathFinder>>) -> Self {
        Self {
            routes,
            path_finder,
        }
    }

    /// Every explicit route, whatever classes it connects.
    pub fn routes(&self) -> &RouteCollection {
        &self.routes
    }

    pub fn is_path_finding_enabled(&self) -> bool {
        self.path_finder.is_some()
    }

    /// Routes to apply for this source/target pair.
    ///
    /// Explicit routes connecting the two classes come first. Discovered routes
    /// are appended only for target points no explicit route writes.
    pub fn get_routes(&self, source: &Source<'_>, target: &Target) -> Result<RouteCollection> {
        let mut routes: RouteCollection = self
            .routes
            .iter()
            .filter(|r| r.connects(source.class_id(), target.class_id()))
            .cloned()
            .collect();
        let explicit = routes.len();

        if let Some(finder) = &self.path_finder {
            let discovered = finder.get_routes(source, target)?;
            let added = routes.merge_discovered(discovered);
            tracing::debug!(
                "{} explicit and {} discovered routes from {} to {}",
                explicit,
                added,
                source.class_id(),
                target.class_id()
            );
        } else {
            tracing::debug!(
                "{} explicit routes from {} to {}",
                explicit,
                source.class_id(),
                target.class_id()
            );
        }

        Ok(routes)
    }
}

/// Accumulates routes and path finders into a [`Map`].
#[derive(Debug, Clone)]
pub struct MapBuilder {
    factory: Arc<PointFactory>,
    routes: RouteCollection,
    path_finders: Vec<Arc<dyn PathFinder>>,
}

impl MapBuilder {
    pub fn new(factory: Arc<PointFactory>) -> Self {
        Self {
            factory,
            routes: RouteCollection::new(),
            path_finders: Vec::new(),
        }
    }

    pub fn point_factory(&self) -> &Arc<PointFactory> {
        &self.factory
    }

    /// Hands this builder to a [`RouteBuilder`]; get it back with
    /// [`RouteBuilder::map_builder`].
    pub fn route_builder(self) -> RouteBuilder {
        RouteBuilder::with_parent(self)
    }

    pub fn add_route(mut self, route: Route) -> Self {
        self.routes.insert(route);
        self
    }

    pub fn add_routes(mut self, routes: impl IntoIterator<Item = Route>) -> Self {
        self.routes.extend(routes);
        self
    }

    /// Replaces the default strategies. Finders run in the order added.
    pub fn add_path_finder(mut self, finder: Arc<dyn PathFinder>) -> Self {
        self.path_finders.push(finder);
        self
    }

    pub fn get_map(self, path_finding: bool) -> Map {
        let path_finder: Option<Arc<dyn PathFinder>> = match (path_finding, self.path_finders.len()) {
            (false, _) => None,
            (true, 0) => Some(Arc::new(ChainPathFinder::default())),
            (true, 1) => self.path_finders.into_iter().next(),
            (true, _) => Some(Arc::new(ChainPathFinder::new(self.path_finders))),
        };
        Map::new(self.routes, path_finder)
    }
}
