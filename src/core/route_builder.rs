use crate::core::map::MapBuilder;
use crate::core::point::{SourcePoint, TargetPoint};
use crate::core::point_factory::PointFactory;
use crate::core::route::{Route, RouteCollection};
use crate::utils::error::{MapperError, Result};
use std::sync::Arc;

/// Fluent construction of routes from point specifiers.
///
/// A builder obtained from [`MapBuilder::route_builder`] owns its parent and
/// hands the accumulated routes back through [`RouteBuilder::map_builder`].
#[derive(Debug)]
pub struct RouteBuilder {
    factory: Arc<PointFactory>,
    source: Option<SourcePoint>,
    target: Option<TargetPoint>,
    routes: RouteCollection,
    parent: Option<MapBuilder>,
}

impl RouteBuilder {
    pub fn new(factory: Arc<PointFactory>) -> Self {
        Self {
            factory,
            source: None,
            target: None,
            routes: RouteCollection::new(),
            parent: None,
        }
    }

    pub(crate) fn with_parent(parent: MapBuilder) -> Self {
        let mut builder = Self::new(Arc::clone(parent.point_factory()));
        builder.parent = Some(parent);
        builder
    }

    pub fn set_source_point(mut self, specifier: &str) -> Result<Self> {
        self.source = Some(self.factory.create_source_point(specifier)?);
        Ok(self)
    }

    pub fn set_target_point(mut self, specifier: &str) -> Result<Self> {
        self.target = Some(self.factory.create_target_point(specifier)?);
        Ok(self)
    }

    /// Finalizes the staged pair into this builder's routes.
    pub fn add_route(mut self) -> Result<Self> {
        let route = self.take_route("RouteBuilder::add_route")?;
        self.routes.insert(route);
        Ok(self)
    }

    /// Finalizes the staged pair and returns it without recording it.
    pub fn get_route(&mut self) -> Result<Route> {
        self.take_route("RouteBuilder::get_route")
    }

    pub fn get_routes(&self) -> &RouteCollection {
        &self.routes
    }

    /// Returns to the owning map builder, carrying every added route.
    pub fn map_builder(self) -> Result<MapBuilder> {
        let Self { routes, parent, .. } = self;
        let parent = parent.ok_or_else(|| {
            MapperError::invalid_operation(
                "RouteBuilder::map_builder",
                "this route builder was not created by a map builder",
            )
        })?;
        Ok(parent.add_routes(routes))
    }

    fn take_route(&mut self, operation: &str) -> Result<Route> {
        match (self.source.take(), self.target.take()) {
            (Some(source), Some(target)) => Ok(Route::new(source, target)),
            (source, target) => {
                let missing = match (&source, &target) {
                    (None, None) => "source and target points",
                    (None, Some(_)) => "source point",
                    _ => "target point",
                };
                self.source = source;
                self.target = target;
                Err(MapperError::invalid_operation(
                    operation,
                    format!("the {} must be set first", missing),
                ))
            }
        }
    }
}
