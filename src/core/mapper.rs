use crate::core::map::{Map, MapBuilder};
use crate::core::point_factory::PointFactory;
use crate::core::source::Source;
use crate::core::target::{Target, TargetInput};
use crate::domain::class::ClassRegistry;
use crate::domain::ports::Object;
use crate::utils::error::Result;
use std::sync::Arc;

pub struct ObjectMapper {
    factory: Arc<PointFactory>,
}

impl ObjectMapper {
    pub fn new(registry: Arc<ClassRegistry>) -> Self {
        Self {
            factory: Arc::new(PointFactory::new(registry)),
        }
    }

    pub fn registry(&self) -> &Arc<ClassRegistry> {
        self.factory.registry()
    }

    pub fn point_factory(&self) -> &Arc<PointFactory> {
        &self.factory
    }

    /// A fresh builder sharing this mapper's registry.
    pub fn map_builder(&self) -> MapBuilder {
        MapBuilder::new(Arc::clone(&self.factory))
    }

    /// Copies values from `source` into `target` along the routes of `map`.
    ///
    /// Without a map, routes are found from the two classes alone. Returns the
    /// target instance, created if `target` named a class and some route
    /// applied.
    pub fn map(
        &self,
        source: &dyn Object,
        target: impl Into<TargetInput>,
        map: Option<&Map>,
    ) -> Result<Option<Box<dyn Object>>> {
        let registry = self.factory.registry();
        let source = Source::new(registry, source)?;
        let mut target = Target::new(Arc::clone(registry), target)?;

        let default_map;
        let map = match map {
            Some(map) => map,
            None => {
                default_map = self.map_builder().get_map(true);
                &default_map
            }
        };

        let routes = map.get_routes(&source, &target)?;
        tracing::debug!(
            "Mapping {} to {} along {} routes",
            source.class_id(),
            target.class_id(),
            routes.len()
        );

        for route in &routes {
            tracing::trace!("Applying {}", route);
            let value = source.get_value(route.source_point())?;
            target.set_point_value(route.target_point(), value)?;
        }

        target.into_instance()
    }
}

impl std::fmt::Debug for ObjectMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectMapper")
            .field("registry", self.factory.registry())
            .finish()
    }
}
