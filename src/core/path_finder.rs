//! Route discovery over the declared structure of the source and target classes.

use crate::core::point::{MethodPoint, ParameterPoint, PropertyPoint, SourcePoint, TargetPoint};
use crate::core::route::{Route, RouteCollection};
use crate::core::source::Source;
use crate::core::target::Target;
use crate::domain::class::{accessor_method, accessor_property, ClassDescriptor, CONSTRUCTOR};
use crate::utils::error::Result;
use std::fmt;
use std::sync::Arc;

pub trait PathFinder: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Routes inferred for this pair. Finding nothing is not an error.
    fn get_routes(&self, source: &Source<'_>, target: &Target) -> Result<RouteCollection>;
}

/// Public readable members of `class` with the name a target member must match.
///
/// Accessor methods (`getX()` taking no required argument) come first, then
/// public properties, each in declaration order.
fn readable_members(class: &ClassDescriptor) -> Vec<(SourcePoint, String)> {
    let methods = class
        .methods
        .iter()
        .filter(|m| m.is_public() && m.required_parameters() == 0)
        .filter_map(|m| {
            accessor_property("get", &m.name).map(|name| {
                (
                    SourcePoint::StaticMethod(MethodPoint::new(&class.id, &m.name)),
                    name,
                )
            })
        });

    let properties = class.properties.iter().filter(|p| p.is_public()).map(|p| {
        (
            SourcePoint::StaticProperty(PropertyPoint::new(&class.id, &p.name)),
            p.name.clone(),
        )
    });

    methods.chain(properties).collect()
}

/// Matches readable source members to declared writable target members.
///
/// For a member named `n` the candidates are, in order: constructor parameter
/// `$n` (only while the target has no instance), the first parameter of a
/// public `setN()` method, then public property `$n`.
#[derive(Debug, Default, Clone)]
pub struct StaticPathFinder;

impl StaticPathFinder {
    pub fn new() -> Self {
        Self
    }

    fn writable_member(&self, target: &Target, name: &str) -> Option<TargetPoint> {
        let class = target.class();

        if !target.is_instantiated() {
            let constructor = class.constructor().filter(|c| c.is_public());
            if let Some(parameter) = constructor.and_then(|c| c.find_parameter(name)) {
                return Some(TargetPoint::StaticParameter(ParameterPoint::new(
                    &class.id,
                    CONSTRUCTOR,
                    &parameter.name,
                )));
            }
        }

        let setter = accessor_method("set", name);
        let method = class.methods.iter().find(|m| {
            m.is_public()
                && m.name.eq_ignore_ascii_case(&setter)
                && !m.parameters.is_empty()
                && m.required_parameters() <= 1
        });
        if let Some(method) = method {
            return Some(TargetPoint::StaticParameter(ParameterPoint::new(
                &class.id,
                &method.name,
                &method.parameters[0].name,
            )));
        }

        class
            .find_property(name)
            .filter(|p| p.is_public())
            .map(|p| TargetPoint::StaticProperty(PropertyPoint::new(&class.id, &p.name)))
    }
}

impl PathFinder for StaticPathFinder {
    fn name(&self) -> &str {
        "static"
    }

    fn get_routes(&self, source: &Source<'_>, target: &Target) -> Result<RouteCollection> {
        let mut routes = RouteCollection::new();

        for (source_point, name) in readable_members(source.class()) {
            match self.writable_member(target, &name) {
                Some(target_point) => {
                    routes.insert(Route::new(source_point, target_point));
                }
                None => {
                    tracing::trace!("No static target for {} on {}", source_point, target.class_id());
                }
            }
        }

        Ok(routes)
    }
}

/// Routes readable source members to members the target only has through
/// interception.
///
/// Names the target declares as properties are left to [`StaticPathFinder`].
/// A class intercepting properties gets `~B::$n`; one intercepting only
/// methods gets `B.setN().$n`, unless it declares `setN()` itself.
#[derive(Debug, Default, Clone)]
pub struct DynamicPathFinder;

impl DynamicPathFinder {
    pub fn new() -> Self {
        Self
    }

    fn overloaded_member(&self, class: &ClassDescriptor, name: &str) -> Option<TargetPoint> {
        if class.find_property(name).is_some() {
            return None;
        }

        if class.overload.properties {
            return Some(TargetPoint::DynamicProperty(PropertyPoint::new(&class.id, name)));
        }

        if class.overload.methods {
            let setter = accessor_method("set", name);
            let declared = class
                .methods
                .iter()
                .any(|m| m.name.eq_ignore_ascii_case(&setter));
            if !declared {
                return Some(TargetPoint::DynamicParameter(ParameterPoint::new(
                    &class.id, setter, name,
                )));
            }
        }

        None
    }
}

impl PathFinder for DynamicPathFinder {
    fn name(&self) -> &str {
        "dynamic"
    }

    fn get_routes(&self, source: &Source<'_>, target: &Target) -> Result<RouteCollection> {
        let mut routes = RouteCollection::new();

        let overload = target.class().overload;
        if !overload.properties && !overload.methods {
            return Ok(routes);
        }

        for (source_point, name) in readable_members(source.class()) {
            if let Some(target_point) = self.overloaded_member(target.class(), &name) {
                routes.insert(Route::new(source_point, target_point));
            }
        }

        Ok(routes)
    }
}

/// Runs several strategies in order and unions their routes.
#[derive(Debug, Clone)]
pub struct ChainPathFinder {
    finders: Vec<Arc<dyn PathFinder>>,
}

impl ChainPathFinder {
    pub fn new(finders: Vec<Arc<dyn PathFinder>>) -> Self {
        Self { finders }
    }

    pub fn finders(&self) -> &[Arc<dyn PathFinder>] {
        &self.finders
    }
}

impl Default for ChainPathFinder {
    fn default() -> Self {
        Self::new(vec![
            Arc::new(StaticPathFinder::new()),
            Arc::new(DynamicPathFinder::new()),
        ])
    }
}

impl PathFinder for ChainPathFinder {
    fn name(&self) -> &str {
        "chain"
    }

    fn get_routes(&self, source: &Source<'_>, target: &Target) -> Result<RouteCollection> {
        let mut routes = RouteCollection::new();
        for finder in &self.finders {
            let found = finder.get_routes(source, target)?;
            tracing::debug!(
                "Path finder '{}' found {} routes from {} to {}",
                finder.name(),
                found.len(),
                source.class_id(),
                target.class_id()
            );
            routes.extend(found);
        }
        Ok(routes)
    }
}
