use crate::domain::model::Record;
use crate::domain::ports::Object;
use crate::utils::error::{MapperError, MemberError, Result};
use crate::utils::validation::{
    validate_class_id, validate_member_name, validate_unique_names, Validate,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Method name under which a class declares its constructor.
pub const CONSTRUCTOR: &str = "__construct";

/// `getFooBar` with prefix `get` yields `fooBar`.
pub fn accessor_property(prefix: &str, method: &str) -> Option<String> {
    let rest = method.strip_prefix(prefix)?;
    let mut chars = rest.chars();
    let first = chars.next()?;
    Some(first.to_lowercase().chain(chars).collect())
}

/// `fooBar` with prefix `set` yields `setFooBar`.
pub fn accessor_method(prefix: &str, property: &str) -> String {
    let mut chars = property.chars();
    match chars.next() {
        Some(first) => format!("{}{}{}", prefix, first.to_uppercase(), chars.as_str()),
        None => prefix.to_string(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub default: Option<Value>,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            default: None,
        }
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    #[serde(default)]
    pub default: Option<Value>,
    /// Property a [`Record`] assigns from this argument.
    #[serde(default)]
    pub binds: Option<String>,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            binds: None,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn binding(mut self, property: impl Into<String>) -> Self {
        self.binds = Some(property.into());
        self
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
    /// Property a [`Record`] returns from this method.
    #[serde(default)]
    pub returns: Option<String>,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            parameters: Vec::new(),
            returns: None,
        }
    }

    pub fn parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn returning(mut self, property: impl Into<String>) -> Self {
        self.returns = Some(property.into());
        self
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR
    }

    pub fn find_parameter(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p.name == name)
    }

    pub fn required_parameters(&self) -> usize {
        self.parameters.iter().filter(|p| p.is_required()).count()
    }
}

/// Catch-all member capabilities of a class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overload {
    #[serde(default)]
    pub properties: bool,
    #[serde(default)]
    pub methods: bool,
}

/// Declared structure of a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    pub id: String,
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
    #[serde(default)]
    pub overload: Overload,
}

impl ClassDescriptor {
    pub fn builder(id: impl Into<String>) -> ClassBuilder {
        ClassBuilder {
            class: ClassDescriptor {
                id: id.into(),
                properties: Vec::new(),
                methods: Vec::new(),
                overload: Overload::default(),
            },
        }
    }

    pub fn find_property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn find_method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn constructor(&self) -> Option<&MethodDescriptor> {
        self.find_method(CONSTRUCTOR)
    }
}

impl Validate for ClassDescriptor {
    fn validate(&self) -> Result<()> {
        validate_class_id("class.id", &self.id)?;
        validate_unique_names(
            "class.properties",
            self.properties.iter().map(|p| p.name.as_str()),
        )?;
        validate_unique_names("class.methods", self.methods.iter().map(|m| m.name.as_str()))?;

        for property in &self.properties {
            validate_member_name("class.properties.name", &property.name)?;
        }

        for method in &self.methods {
            validate_member_name("class.methods.name", &method.name)?;
            validate_unique_names(
                "class.methods.parameters",
                method.parameters.iter().map(|p| p.name.as_str()),
            )?;
            for parameter in &method.parameters {
                validate_member_name("class.methods.parameters.name", &parameter.name)?;
            }

            let referenced = method
                .parameters
                .iter()
                .filter_map(|p| p.binds.as_deref())
                .chain(method.returns.as_deref());
            for property in referenced {
                if self.find_property(property).is_none() {
                    return Err(MapperError::ConfigError {
                        message: format!(
                            "{}::{}() references undeclared property ${}",
                            self.id, method.name, property
                        ),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Fluent construction of a [`ClassDescriptor`].
#[derive(Debug, Clone)]
pub struct ClassBuilder {
    class: ClassDescriptor,
}

impl ClassBuilder {
    pub fn property(mut self, name: &str) -> Self {
        self.class.properties.push(PropertyDescriptor::new(name));
        self
    }

    pub fn private_property(mut self, name: &str) -> Self {
        let mut property = PropertyDescriptor::new(name);
        property.visibility = Visibility::Private;
        self.class.properties.push(property);
        self
    }

    pub fn property_with_default(mut self, name: &str, default: Value) -> Self {
        let mut property = PropertyDescriptor::new(name);
        property.default = Some(default);
        self.class.properties.push(property);
        self
    }

    /// Public no-argument method returning `property`.
    pub fn getter(self, method: &str, property: &str) -> Self {
        self.method(MethodDescriptor::new(method).returning(property))
    }

    /// Public method whose single parameter, named after `property`, assigns it.
    pub fn setter(self, method: &str, property: &str) -> Self {
        self.method(
            MethodDescriptor::new(method)
                .parameter(ParameterDescriptor::new(property).binding(property)),
        )
    }

    /// Constructor whose parameters assign the same-named properties.
    pub fn constructor(self, parameters: &[&str]) -> Self {
        let constructor = parameters
            .iter()
            .fold(MethodDescriptor::new(CONSTRUCTOR), |method, name| {
                method.parameter(ParameterDescriptor::new(*name).binding(*name))
            });
        self.method(constructor)
    }

    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.class.methods.push(method);
        self
    }

    pub fn overloaded_properties(mut self) -> Self {
        self.class.overload.properties = true;
        self
    }

    pub fn overloaded_methods(mut self) -> Self {
        self.class.overload.methods = true;
        self
    }

    pub fn build(self) -> ClassDescriptor {
        self.class
    }
}

/// Builds an instance of a registered class from positional constructor arguments.
pub type ObjectFactory = Arc<
    dyn Fn(Arc<ClassDescriptor>, Vec<Value>) -> std::result::Result<Box<dyn Object>, MemberError>
        + Send
        + Sync,
>;

#[derive(Clone)]
struct ClassEntry {
    descriptor: Arc<ClassDescriptor>,
    factory: Option<ObjectFactory>,
}

/// Every class the mapper can introspect, keyed by class id.
#[derive(Clone, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, ClassEntry>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a class whose instances are [`Record`]s.
    pub fn register(&mut self, class: ClassDescriptor) -> Result<()> {
        self.insert(class, None)
    }

    /// Registers a class whose instances are built by `factory`.
    pub fn register_with_factory<F>(&mut self, class: ClassDescriptor, factory: F) -> Result<()>
    where
        F: Fn(Arc<ClassDescriptor>, Vec<Value>) -> std::result::Result<Box<dyn Object>, MemberError>
            + Send
            + Sync
            + 'static,
    {
        self.insert(class, Some(Arc::new(factory)))
    }

    fn insert(&mut self, class: ClassDescriptor, factory: Option<ObjectFactory>) -> Result<()> {
        class.validate()?;

        if self.classes.contains_key(&class.id) {
            return Err(MapperError::invalid_argument(format!(
                "class {} is already registered",
                class.id
            )));
        }

        tracing::debug!(
            "Registered class {} ({} properties, {} methods)",
            class.id,
            class.properties.len(),
            class.methods.len()
        );

        self.classes.insert(
            class.id.clone(),
            ClassEntry {
                descriptor: Arc::new(class),
                factory,
            },
        );
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<ClassDescriptor>> {
        self.classes.get(id).map(|entry| Arc::clone(&entry.descriptor))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.classes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn instantiate(
        &self,
        id: &str,
        arguments: Vec<Value>,
    ) -> std::result::Result<Box<dyn Object>, MemberError> {
        let entry = self.classes.get(id).ok_or_else(|| MemberError::Undefined {
            class: id.to_string(),
            member: "class".to_string(),
        })?;

        match &entry.factory {
            Some(factory) => factory(Arc::clone(&entry.descriptor), arguments),
            None => Ok(Box::new(Record::construct(
                Arc::clone(&entry.descriptor),
                arguments,
            )?)),
        }
    }
}

impl fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&String> = self.classes.keys().collect();
        ids.sort();
        f.debug_struct("ClassRegistry").field("classes", &ids).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_class() -> ClassDescriptor {
        ClassDescriptor::builder("Order")
            .property("total")
            .private_property("secret")
            .constructor(&["total"])
            .getter("getTotal", "total")
            .build()
    }

    #[test]
    fn test_accessor_naming() {
        assert_eq!(accessor_property("get", "getFooBar").as_deref(), Some("fooBar"));
        assert_eq!(accessor_property("get", "getJ").as_deref(), Some("j"));
        assert_eq!(accessor_property("get", "get"), None);
        assert_eq!(accessor_property("get", "fetchJ"), None);
        assert_eq!(accessor_method("set", "fooBar"), "setFooBar");
    }

    #[test]
    fn test_builder_declares_members() {
        let class = sample_class();

        assert_eq!(class.id, "Order");
        assert!(class.find_property("total").unwrap().is_public());
        assert!(!class.find_property("secret").unwrap().is_public());

        let constructor = class.constructor().unwrap();
        assert!(constructor.is_constructor());
        assert_eq!(constructor.position_of("total"), Some(0));
        assert_eq!(constructor.required_parameters(), 1);

        let getter = class.find_method("getTotal").unwrap();
        assert_eq!(getter.returns.as_deref(), Some("total"));
        assert!(getter.parameters.is_empty());
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = ClassRegistry::new();
        registry.register(sample_class()).unwrap();

        let error = registry.register(sample_class()).unwrap_err();
        assert!(matches!(error, MapperError::InvalidArgument { .. }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_rejects_dangling_binding() {
        let class = ClassDescriptor::builder("Broken")
            .setter("setName", "name")
            .build();

        let mut registry = ClassRegistry::new();
        assert!(registry.register(class).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_instantiate_record() {
        let mut registry = ClassRegistry::new();
        registry.register(sample_class()).unwrap();

        let object = registry.instantiate("Order", vec![json!(42)]).unwrap();
        assert_eq!(object.class_id(), "Order");
        assert_eq!(object.property("total").unwrap(), json!(42));

        let missing = registry.instantiate("Nope", vec![]).unwrap_err();
        assert!(matches!(missing, MemberError::Undefined { .. }));
    }

    #[test]
    fn test_descriptor_from_toml() {
        let class: ClassDescriptor = toml::from_str(
            r##"
id = "User"

[overload]
properties = true

[[properties]]
name = "email"
visibility = "private"

[[methods]]
name = "setEmail"
parameters = [{ name = "email", binds = "email" }]
"##,
        )
        .unwrap();

        assert!(class.overload.properties);
        assert!(!class.overload.methods);
        assert_eq!(class.properties[0].visibility, Visibility::Private);
        assert_eq!(
            class.find_method("setEmail").unwrap().parameters[0].binds.as_deref(),
            Some("email")
        );
    }
}
