use crate::domain::class::{accessor_property, ClassDescriptor, ClassRegistry, MethodDescriptor};
use crate::domain::ports::{MemberResult, Object};
use crate::utils::error::{MapperError, MemberError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One intercepted call to a method the class does not declare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverloadedCall {
    pub method: String,
    pub arguments: Vec<Value>,
}

/// Descriptor-driven object.
///
/// Declared properties live in `data`. The overload hooks reach public
/// declared members first; other members reached through interception are
/// kept in a side-table so the class structure itself never changes.
/// Intercepted `setX(..)` calls also store their first argument as the
/// overloaded property `x`, and intercepted `getX()` reads it back.
#[derive(Debug, Clone)]
pub struct Record {
    class: Arc<ClassDescriptor>,
    data: BTreeMap<String, Value>,
    overloaded: BTreeMap<String, Value>,
    calls: Vec<OverloadedCall>,
}

/// Serialized form of a [`Record`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDocument {
    pub class: String,
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
    #[serde(default)]
    pub overloaded: BTreeMap<String, Value>,
}

impl Record {
    /// An instance with every declared property at its default (or null).
    pub fn new(class: Arc<ClassDescriptor>) -> Self {
        let data = class
            .properties
            .iter()
            .map(|p| (p.name.clone(), p.default.clone().unwrap_or(Value::Null)))
            .collect();

        Self {
            class,
            data,
            overloaded: BTreeMap::new(),
            calls: Vec::new(),
        }
    }

    /// Runs the declared constructor, if any, with positional arguments.
    pub fn construct(class: Arc<ClassDescriptor>, arguments: Vec<Value>) -> MemberResult<Self> {
        let mut record = Self::new(Arc::clone(&class));

        match class.constructor() {
            Some(constructor) => {
                record.apply(constructor, arguments)?;
            }
            None if !arguments.is_empty() => {
                return Err(record.rejected(
                    "__construct",
                    format!("takes no arguments, {} given", arguments.len()),
                ));
            }
            None => {}
        }

        Ok(record)
    }

    pub fn from_document(registry: &ClassRegistry, document: RecordDocument) -> Result<Self> {
        let class = registry.get(&document.class).ok_or_else(|| {
            MapperError::invalid_argument(format!("class {} is not registered", document.class))
        })?;

        let mut record = Self::new(class);
        for (name, value) in document.properties {
            record
                .set_property(&name, value)
                .map_err(|e| MapperError::invalid_argument(e.to_string()))?;
        }
        for (name, value) in document.overloaded {
            record
                .set_overloaded_property(&name, value)
                .map_err(|e| MapperError::invalid_argument(e.to_string()))?;
        }

        Ok(record)
    }

    pub fn from_json(registry: &ClassRegistry, value: Value) -> Result<Self> {
        let document: RecordDocument = serde_json::from_value(value)?;
        Self::from_document(registry, document)
    }

    pub fn to_document(&self) -> RecordDocument {
        RecordDocument {
            class: self.class.id.clone(),
            properties: self.data.clone(),
            overloaded: self.overloaded.clone(),
        }
    }

    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self.to_document())?)
    }

    pub fn class(&self) -> &ClassDescriptor {
        &self.class
    }

    /// Declared property value, falling back to the overload side-table.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.data.get(name).or_else(|| self.overloaded.get(name))
    }

    pub fn overloaded(&self, name: &str) -> Option<&Value> {
        self.overloaded.get(name)
    }

    pub fn calls(&self) -> &[OverloadedCall] {
        &self.calls
    }

    fn apply(&mut self, method: &MethodDescriptor, arguments: Vec<Value>) -> MemberResult<Value> {
        if arguments.len() > method.parameters.len() {
            return Err(self.rejected(
                &method.name,
                format!(
                    "takes {} arguments, {} given",
                    method.parameters.len(),
                    arguments.len()
                ),
            ));
        }

        let mut arguments = arguments.into_iter();
        for parameter in &method.parameters {
            let value = match arguments.next().or_else(|| parameter.default.clone()) {
                Some(value) => value,
                None => {
                    return Err(self.rejected(
                        &method.name,
                        format!("missing argument ${}", parameter.name),
                    ))
                }
            };
            if let Some(property) = &parameter.binds {
                self.data.insert(property.clone(), value);
            }
        }

        Ok(self.returned(method))
    }

    fn returned(&self, method: &MethodDescriptor) -> Value {
        method
            .returns
            .as_ref()
            .and_then(|property| self.data.get(property).cloned())
            .unwrap_or(Value::Null)
    }

    /// Public declared members are reached directly, even through dynamic points.
    fn is_accessible_property(&self, name: &str) -> bool {
        self.class.find_property(name).is_some_and(|p| p.is_public())
    }

    fn is_accessible_method(&self, name: &str) -> bool {
        self.class.find_method(name).is_some_and(|m| m.is_public())
    }

    fn undefined(&self, member: &str) -> MemberError {
        MemberError::Undefined {
            class: self.class.id.clone(),
            member: member.to_string(),
        }
    }

    fn rejected(&self, member: &str, reason: String) -> MemberError {
        MemberError::Rejected {
            class: self.class.id.clone(),
            member: member.to_string(),
            reason,
        }
    }

    fn unsupported(&self, capability: &str) -> MemberError {
        MemberError::Unsupported {
            class: self.class.id.clone(),
            capability: capability.to_string(),
        }
    }
}

impl Object for Record {
    fn class_id(&self) -> &str {
        &self.class.id
    }

    fn property(&self, name: &str) -> MemberResult<Value> {
        if self.class.find_property(name).is_none() {
            return Err(self.undefined(&format!("${}", name)));
        }
        Ok(self.data.get(name).cloned().unwrap_or(Value::Null))
    }

    fn set_property(&mut self, name: &str, value: Value) -> MemberResult<()> {
        if self.class.find_property(name).is_none() {
            return Err(self.undefined(&format!("${}", name)));
        }
        self.data.insert(name.to_string(), value);
        Ok(())
    }

    fn read(&self, method: &str) -> MemberResult<Value> {
        let descriptor = self
            .class
            .find_method(method)
            .ok_or_else(|| self.undefined(&format!("{}()", method)))?;

        if descriptor.required_parameters() > 0 {
            return Err(self.rejected(method, "requires arguments".to_string()));
        }
        Ok(self.returned(descriptor))
    }

    fn call(&mut self, method: &str, arguments: Vec<Value>) -> MemberResult<Value> {
        let class = Arc::clone(&self.class);
        let descriptor = class
            .find_method(method)
            .ok_or_else(|| self.undefined(&format!("{}()", method)))?;
        self.apply(descriptor, arguments)
    }

    fn overloaded_property(&self, name: &str) -> MemberResult<Value> {
        if self.is_accessible_property(name) {
            return self.property(name);
        }
        if !self.class.overload.properties {
            return Err(self.unsupported("properties"));
        }
        self.overloaded
            .get(name)
            .cloned()
            .ok_or_else(|| self.undefined(&format!("${}", name)))
    }

    fn set_overloaded_property(&mut self, name: &str, value: Value) -> MemberResult<()> {
        if self.is_accessible_property(name) {
            return self.set_property(name, value);
        }
        if !self.class.overload.properties {
            return Err(self.unsupported("properties"));
        }
        self.overloaded.insert(name.to_string(), value);
        Ok(())
    }

    fn read_overloaded(&self, method: &str) -> MemberResult<Value> {
        if self.is_accessible_method(method) {
            return self.read(method);
        }
        if !self.class.overload.methods {
            return Err(self.unsupported("methods"));
        }
        accessor_property("get", method)
            .and_then(|name| self.overloaded.get(&name).cloned())
            .ok_or_else(|| self.undefined(&format!("{}()", method)))
    }

    fn call_overloaded(&mut self, method: &str, arguments: Vec<Value>) -> MemberResult<Value> {
        if self.is_accessible_method(method) {
            return self.call(method, arguments);
        }
        if !self.class.overload.methods {
            return Err(self.unsupported("methods"));
        }

        if let (Some(name), Some(first)) = (accessor_property("set", method), arguments.first()) {
            self.overloaded.insert(name, first.clone());
        }
        self.calls.push(OverloadedCall {
            method: method.to_string(),
            arguments,
        });
        Ok(Value::Null)
    }
}
