use crate::core::point::SourcePoint;
use crate::domain::class::{ClassDescriptor, ClassRegistry};
use crate::domain::ports::Object;
use crate::utils::error::{MapperError, Result};
use serde_json::Value;
use std::sync::Arc;

/// Read-only view of the object being mapped from.
#[derive(Debug)]
pub struct Source<'a> {
    object: &'a dyn Object,
    class: Arc<ClassDescriptor>,
}

impl<'a> Source<'a> {
    pub fn new(registry: &ClassRegistry, object: &'a dyn Object) -> Result<Self> {
        let class = registry.get(object.class_id()).ok_or_else(|| {
            MapperError::invalid_argument(format!(
                "{} is not a source: the class is not registered",
                object.class_id()
            ))
        })?;
        Ok(Self { object, class })
    }

    pub fn class(&self) -> &ClassDescriptor {
        &self.class
    }

    pub fn class_id(&self) -> &str {
        &self.class.id
    }

    pub fn object(&self) -> &dyn Object {
        self.object
    }

    /// Whether a static point names a member of this source's class.
    pub fn has_point(&self, point: &SourcePoint) -> bool {
        point.class_id() == self.class.id
    }

    pub fn get_value(&self, point: &SourcePoint) -> Result<Value> {
        if point.is_static() && !self.has_point(point) {
            return Err(MapperError::invalid_argument(format!(
                "{} is not a point of {}",
                point, self.class.id
            )));
        }

        let value = match point {
            SourcePoint::StaticProperty(p) => self.object.property(p.name()),
            SourcePoint::StaticMethod(m) => self.object.read(m.name()),
            SourcePoint::DynamicProperty(p) => self.object.overloaded_property(p.name()),
            SourcePoint::DynamicMethod(m) => self.object.read_overloaded(m.name()),
        };

        value.map_err(|e| {
            MapperError::invalid_operation(
                "Source::get_value",
                format!("cannot read {}: {}", point, e),
            )
        })
    }
}
