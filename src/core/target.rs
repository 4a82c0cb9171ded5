use crate::core::point::TargetPoint;
use crate::domain::class::{ClassDescriptor, ClassRegistry, CONSTRUCTOR};
use crate::domain::model::Record;
use crate::domain::ports::Object;
use crate::utils::error::{MapperError, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// What a mapping writes to: an existing instance or a class to instantiate.
#[derive(Debug)]
pub enum TargetInput {
    Instance(Box<dyn Object>),
    Class(String),
}

impl From<Box<dyn Object>> for TargetInput {
    fn from(instance: Box<dyn Object>) -> Self {
        Self::Instance(instance)
    }
}

impl From<Record> for TargetInput {
    fn from(record: Record) -> Self {
        Self::Instance(Box::new(record))
    }
}

impl From<&str> for TargetInput {
    fn from(class_id: &str) -> Self {
        Self::Class(class_id.to_string())
    }
}

impl From<String> for TargetInput {
    fn from(class_id: String) -> Self {
        Self::Class(class_id)
    }
}

/// Insertion-ordered slots keyed by member name.
#[derive(Debug)]
struct Slots<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for Slots<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V: Default> Slots<V> {
    fn slot(&mut self, key: &str) -> &mut V {
        let index = match self.entries.iter().position(|(k, _)| k == key) {
            Some(index) => index,
            None => {
                self.entries.push((key.to_string(), V::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }
}

impl<V> Slots<V> {
    fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Values waiting to be written, one bucket per kind of target point.
#[derive(Debug, Default)]
struct Staging {
    properties: Slots<Value>,
    parameters: Slots<BTreeMap<usize, Value>>,
    overloaded_properties: Slots<Value>,
    overloaded_parameters: Slots<Vec<Value>>,
}

impl Staging {
    fn is_empty(&self) -> bool {
        self.properties.is_empty()
            && self.parameters.is_empty()
            && self.overloaded_properties.is_empty()
            && self.overloaded_parameters.is_empty()
    }
}

/// The object being mapped to.
///
/// Values are staged per target point and written by [`Target::get_instance`]
/// in a fixed order: constructor, declared methods, overloaded methods,
/// declared properties, overloaded properties. Staged values are kept, so a
/// later call re-applies them to the (by then existing) instance.
#[derive(Debug)]
pub struct Target {
    registry: Arc<ClassRegistry>,
    class: Arc<ClassDescriptor>,
    instance: Option<Box<dyn Object>>,
    staged: Staging,
}

impl Target {
    pub fn new(registry: Arc<ClassRegistry>, target: impl Into<TargetInput>) -> Result<Self> {
        let (class_id, instance) = match target.into() {
            TargetInput::Instance(instance) => (instance.class_id().to_string(), Some(instance)),
            TargetInput::Class(class_id) => (class_id, None),
        };

        let class = registry.get(&class_id).ok_or_else(|| {
            MapperError::invalid_argument(format!(
                "{} is not a target: the class is not registered",
                class_id
            ))
        })?;

        Ok(Self {
            registry,
            class,
            instance,
            staged: Staging::default(),
        })
    }

    pub fn class(&self) -> &ClassDescriptor {
        &self.class
    }

    pub fn class_id(&self) -> &str {
        &self.class.id
    }

    pub fn is_instantiated(&self) -> bool {
        self.instance.is_some()
    }

    pub fn has_staged_values(&self) -> bool {
        !self.staged.is_empty()
    }

    /// Whether a static point names a member of this target's class.
    pub fn has_point(&self, point: &TargetPoint) -> bool {
        point.class_id() == self.class.id
    }

    pub fn set_point_value(&mut self, point: &TargetPoint, value: Value) -> Result<()> {
        if point.is_static() && !self.has_point(point) {
            return Err(MapperError::invalid_argument(format!(
                "{} is not a point of {}",
                point, self.class.id
            )));
        }

        match point {
            TargetPoint::StaticProperty(p) => {
                *self.staged.properties.slot(p.name()) = value;
            }
            TargetPoint::StaticParameter(p) => {
                let position = self
                    .class
                    .find_method(p.method_name())
                    .and_then(|m| m.position_of(p.name()))
                    .ok_or_else(|| {
                        MapperError::invalid_argument(format!(
                            "{} is not a parameter of {}",
                            point, self.class.id
                        ))
                    })?;
                self.staged
                    .parameters
                    .slot(p.method_name())
                    .insert(position, value);
            }
            TargetPoint::DynamicProperty(p) => {
                *self.staged.overloaded_properties.slot(p.name()) = value;
            }
            TargetPoint::DynamicParameter(p) => {
                self.staged
                    .overloaded_parameters
                    .slot(p.method_name())
                    .push(value);
            }
        }

        tracing::trace!("Staged value for {}", point);
        Ok(())
    }

    /// Applies the staged values and returns the resulting instance.
    ///
    /// With nothing staged the existing instance, if any, is returned untouched.
    pub fn get_instance(&mut self) -> Result<Option<&dyn Object>> {
        if self.has_staged_values() {
            self.realize()?;
        }
        Ok(self.instance.as_deref())
    }

    /// Like [`Target::get_instance`], handing over ownership of the instance.
    pub fn into_instance(mut self) -> Result<Option<Box<dyn Object>>> {
        if self.has_staged_values() {
            self.realize()?;
        }
        Ok(self.instance)
    }

    fn realize(&mut self) -> Result<()> {
        let Self {
            registry,
            class,
            instance,
            staged,
        } = self;

        if instance.is_none() {
            let empty = BTreeMap::new();
            let staged_arguments = staged.parameters.get(CONSTRUCTOR).unwrap_or(&empty);
            let arguments = arguments(class, CONSTRUCTOR, staged_arguments)?;

            tracing::debug!(
                "Instantiating {} with {} constructor arguments",
                class.id,
                arguments.len()
            );
            let created = registry.instantiate(&class.id, arguments).map_err(|e| {
                MapperError::invalid_operation("Target::get_instance", e.to_string())
            })?;
            *instance = Some(created);
        }
        let Some(instance) = instance.as_mut() else {
            return Ok(());
        };

        for (method, staged_arguments) in staged.parameters.iter() {
            if method == CONSTRUCTOR {
                continue;
            }
            let arguments = arguments(class, method, staged_arguments)?;
            instance
                .call(method, arguments)
                .map_err(|e| MapperError::invalid_operation("Target::get_instance", e.to_string()))?;
        }

        for (method, arguments) in staged.overloaded_parameters.iter() {
            if method == CONSTRUCTOR {
                continue;
            }
            instance
                .call_overloaded(method, arguments.clone())
                .map_err(|e| MapperError::invalid_operation("Target::get_instance", e.to_string()))?;
        }

        for (name, value) in staged.properties.iter() {
            instance
                .set_property(name, value.clone())
                .map_err(|e| MapperError::invalid_operation("Target::get_instance", e.to_string()))?;
        }

        for (name, value) in staged.overloaded_properties.iter() {
            instance
                .set_overloaded_property(name, value.clone())
                .map_err(|e| MapperError::invalid_operation("Target::get_instance", e.to_string()))?;
        }

        Ok(())
    }
}

/// Positional arguments for `method`, unstaged positions taken from defaults.
fn arguments(
    class: &ClassDescriptor,
    method: &str,
    staged: &BTreeMap<usize, Value>,
) -> Result<Vec<Value>> {
    let descriptor = match class.find_method(method) {
        Some(descriptor) => descriptor,
        None if method == CONSTRUCTOR && staged.is_empty() => return Ok(Vec::new()),
        None => {
            return Err(MapperError::invalid_operation(
                "Target::get_instance",
                format!("{}::{}() is not declared", class.id, method),
            ))
        }
    };

    descriptor
        .parameters
        .iter()
        .enumerate()
        .map(|(position, parameter)| {
            staged
                .get(&position)
                .or(parameter.default.as_ref())
                .cloned()
                .ok_or_else(|| {
                    MapperError::invalid_operation(
                        "Target::get_instance",
                        format!(
                            "{}::{}() requires ${} which was neither routed nor defaulted",
                            class.id, method, parameter.name
                        ),
                    )
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::point_factory::PointFactory;
    use crate::domain::class::{MethodDescriptor, ParameterDescriptor};
    use crate::utils::error::ErrorKind;
    use serde_json::json;

    fn factory() -> PointFactory {
        let mut registry = ClassRegistry::new();
        registry
            .register(
                ClassDescriptor::builder("C")
                    .property("a")
                    .property("b")
                    .property("log")
                    .constructor(&["a"])
                    .method(
                        MethodDescriptor::new("configure")
                            .parameter(ParameterDescriptor::new("b").binding("b"))
                            .parameter(ParameterDescriptor::new("log").binding("log")),
                    )
                    .method(
                        MethodDescriptor::new("tune").parameter(
                            ParameterDescriptor::new("b")
                                .binding("b")
                                .with_default(json!("tuned")),
                        ),
                    )
                    .overloaded_properties()
                    .overloaded_methods()
                    .build(),
            )
            .unwrap();
        registry
            .register(ClassDescriptor::builder("Plain").property("x").build())
            .unwrap();
        PointFactory::new(Arc::new(registry))
    }

    fn target(factory: &PointFactory, class_id: &str) -> Target {
        Target::new(Arc::clone(factory.registry()), class_id).unwrap()
    }

    fn record(target: &Target) -> &Record {
        target
            .instance
            .as_deref()
            .and_then(|o| o.downcast_ref::<Record>())
            .unwrap()
    }

    #[test]
    fn test_nothing_staged_returns_existing_or_none() {
        let factory = factory();
        let mut unbound = target(&factory, "C");
        assert!(unbound.get_instance().unwrap().is_none());
        assert!(!unbound.is_instantiated());

        let existing = Record::new(factory.registry().get("Plain").unwrap());
        let mut bound = Target::new(Arc::clone(factory.registry()), existing).unwrap();
        assert!(bound.is_instantiated());
        assert_eq!(bound.get_instance().unwrap().unwrap().class_id(), "Plain");
    }

    #[test]
    fn test_constructor_runs_before_property_writes() {
        let factory = factory();
        let mut target = target(&factory, "C");

        let a = factory.create_target_point("#C::__construct()::$a").unwrap();
        let prop_a = factory.create_target_point("#C::$a").unwrap();
        // Staged in reverse order on purpose: the property write must still win.
        target.set_point_value(&prop_a, json!("written")).unwrap();
        target.set_point_value(&a, json!("constructed")).unwrap();

        target.get_instance().unwrap();
        assert_eq!(record(&target).get("a"), Some(&json!("written")));
    }

    #[test]
    fn test_missing_constructor_argument_fails() {
        let factory = factory();
        let mut target = target(&factory, "C");
        let b = factory.create_target_point("#C::$b").unwrap();
        target.set_point_value(&b, json!(1)).unwrap();

        let error = target.get_instance().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidOperation);
    }

    #[test]
    fn test_method_receives_all_staged_positions() {
        let factory = factory();
        let mut target = target(&factory, "C");

        let a = factory.create_target_point("#C::__construct()::$a").unwrap();
        let log = factory.create_target_point("#C::configure()::$log").unwrap();
        let b = factory.create_target_point("#C::configure()::$b").unwrap();
        target.set_point_value(&a, json!(1)).unwrap();
        target.set_point_value(&log, json!("on")).unwrap();
        target.set_point_value(&b, json!(2)).unwrap();

        target.get_instance().unwrap();
        let record = record(&target);
        assert_eq!(record.get("b"), Some(&json!(2)));
        assert_eq!(record.get("log"), Some(&json!("on")));
    }

    #[test]
    fn test_incomplete_method_call_fails() {
        let factory = factory();
        let mut target = target(&factory, "C");

        let a = factory.create_target_point("#C::__construct()::$a").unwrap();
        let b = factory.create_target_point("#C::configure()::$b").unwrap();
        target.set_point_value(&a, json!(1)).unwrap();
        target.set_point_value(&b, json!(2)).unwrap();

        let error = target.get_instance().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidOperation);
        assert!(error.to_string().contains("$log"));
    }

    #[test]
    fn test_overloaded_parameters_follow_insertion_order() {
        let factory = factory();
        let mut target = target(&factory, "C");

        let a = factory.create_target_point("#C::__construct()::$a").unwrap();
        let second = factory.create_target_point("C.notify().$second").unwrap();
        let first = factory.create_target_point("C.notify().$first").unwrap();
        target.set_point_value(&a, json!(0)).unwrap();
        target.set_point_value(&second, json!("x")).unwrap();
        target.set_point_value(&first, json!("y")).unwrap();

        target.get_instance().unwrap();
        let calls = record(&target).calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "notify");
        assert_eq!(calls[0].arguments, vec![json!("x"), json!("y")]);
    }

    #[test]
    fn test_dynamic_points_skip_owner_check() {
        let factory = factory();
        let mut target = target(&factory, "C");

        let foreign_static = factory.create_target_point("#Plain::$x").unwrap();
        let error = target
            .set_point_value(&foreign_static, json!(1))
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidArgument);

        let foreign_dynamic = factory.create_target_point("~Plain::$x").unwrap();
        assert!(target.set_point_value(&foreign_dynamic, json!(1)).is_ok());
    }

    #[test]
    fn test_overloaded_property_write_needs_interception() {
        let factory = factory();
        let mut target = target(&factory, "Plain");
        let dynamic = factory.create_target_point("~Plain::$y").unwrap();
        target.set_point_value(&dynamic, json!(1)).unwrap();

        let error = target.get_instance().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidOperation);
    }

    #[test]
    fn test_dynamic_property_reaches_declared_property() {
        let factory = factory();
        let mut target = target(&factory, "Plain");
        let dynamic = factory.create_target_point("~Plain::$x").unwrap();
        target.set_point_value(&dynamic, json!(5)).unwrap();

        target.get_instance().unwrap();
        let record = record(&target);
        assert_eq!(record.get("x"), Some(&json!(5)));
        assert_eq!(record.overloaded("x"), None);
    }

    #[test]
    fn test_second_realization_reapplies_against_same_instance() {
        let factory = factory();
        let mut target = target(&factory, "C");

        let a = factory.create_target_point("#C::__construct()::$a").unwrap();
        let tune = factory.create_target_point("#C::tune()::$b").unwrap();
        target.set_point_value(&a, json!("first")).unwrap();
        target.get_instance().unwrap();

        // Constructor staging no longer applies once the instance exists.
        target.set_point_value(&a, json!("second")).unwrap();
        target.set_point_value(&tune, json!("retuned")).unwrap();
        target.get_instance().unwrap();

        let record = record(&target);
        assert_eq!(record.get("a"), Some(&json!("first")));
        assert_eq!(record.get("b"), Some(&json!("retuned")));
    }
}
