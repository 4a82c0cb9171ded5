use crate::utils::error::MemberError;
use serde_json::Value;
use std::any::Any;
use std::fmt;

pub type MemberResult<T> = std::result::Result<T, MemberError>;

/// Type-erasure helper implemented for every `'static` type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A live instance the mapper can read from and write to.
///
/// Declared members are reached through `property`, `set_property`, `read` and
/// `call`. Dynamic points go through the four overload hooks, which should
/// reach accessible declared members directly and intercept only the rest.
/// The defaults report [`MemberError::Unsupported`].
pub trait Object: AsAny + fmt::Debug {
    fn class_id(&self) -> &str;

    fn property(&self, name: &str) -> MemberResult<Value>;

    fn set_property(&mut self, name: &str, value: Value) -> MemberResult<()>;

    /// Invokes a method that takes no arguments and does not mutate the instance.
    fn read(&self, method: &str) -> MemberResult<Value>;

    fn call(&mut self, method: &str, arguments: Vec<Value>) -> MemberResult<Value>;

    fn overloaded_property(&self, _name: &str) -> MemberResult<Value> {
        Err(unsupported(self.class_id(), "properties"))
    }

    fn set_overloaded_property(&mut self, _name: &str, _value: Value) -> MemberResult<()> {
        Err(unsupported(self.class_id(), "properties"))
    }

    fn read_overloaded(&self, _method: &str) -> MemberResult<Value> {
        Err(unsupported(self.class_id(), "methods"))
    }

    fn call_overloaded(&mut self, _method: &str, _arguments: Vec<Value>) -> MemberResult<Value> {
        Err(unsupported(self.class_id(), "methods"))
    }
}

impl dyn Object {
    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Object>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

fn unsupported(class: &str, capability: &str) -> MemberError {
    MemberError::Unsupported {
        class: class.to_string(),
        capability: capability.to_string(),
    }
}
