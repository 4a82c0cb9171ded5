//! Typed descriptors of the members routes read from and write to.
//!
//! Every point renders to its canonical specifier through `Display`, and that
//! text parses back to an equal point through the
//! [`PointFactory`](crate::core::point_factory::PointFactory).

use std::fmt;

/// Whether a point was verified against the declared class structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    Static,
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointKind {
    Property,
    Method,
    Parameter,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyPoint {
    class_id: String,
    name: String,
}

impl PropertyPoint {
    pub(crate) fn new(class_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            class_id: class_id.into(),
            name: name.into(),
        }
    }

    pub fn class_id(&self) -> &str {
        &self.class_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodPoint {
    class_id: String,
    name: String,
}

impl MethodPoint {
    pub(crate) fn new(class_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            class_id: class_id.into(),
            name: name.into(),
        }
    }

    pub fn class_id(&self) -> &str {
        &self.class_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParameterPoint {
    class_id: String,
    method_name: String,
    name: String,
}

impl ParameterPoint {
    pub(crate) fn new(
        class_id: impl Into<String>,
        method_name: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            class_id: class_id.into(),
            method_name: method_name.into(),
            name: name.into(),
        }
    }

    pub fn class_id(&self) -> &str {
        &self.class_id
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A readable member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourcePoint {
    /// `#Class::$property`
    StaticProperty(PropertyPoint),
    /// `#Class::method()`
    StaticMethod(MethodPoint),
    /// `~Class::$property`
    DynamicProperty(PropertyPoint),
    /// `~Class::method()`
    DynamicMethod(MethodPoint),
}

impl SourcePoint {
    pub fn class_id(&self) -> &str {
        match self {
            Self::StaticProperty(p) | Self::DynamicProperty(p) => p.class_id(),
            Self::StaticMethod(m) | Self::DynamicMethod(m) => m.class_id(),
        }
    }

    /// Member name: the property name, or the method name for method points.
    pub fn name(&self) -> &str {
        match self {
            Self::StaticProperty(p) | Self::DynamicProperty(p) => p.name(),
            Self::StaticMethod(m) | Self::DynamicMethod(m) => m.name(),
        }
    }

    pub fn method_name(&self) -> Option<&str> {
        match self {
            Self::StaticMethod(m) | Self::DynamicMethod(m) => Some(m.name()),
            _ => None,
        }
    }

    pub fn binding(&self) -> Binding {
        match self {
            Self::StaticProperty(_) | Self::StaticMethod(_) => Binding::Static,
            Self::DynamicProperty(_) | Self::DynamicMethod(_) => Binding::Dynamic,
        }
    }

    pub fn kind(&self) -> PointKind {
        match self {
            Self::StaticProperty(_) | Self::DynamicProperty(_) => PointKind::Property,
            Self::StaticMethod(_) | Self::DynamicMethod(_) => PointKind::Method,
        }
    }

    pub fn is_static(&self) -> bool {
        self.binding() == Binding::Static
    }

    pub fn qualified_id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SourcePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaticProperty(p) => write!(f, "#{}::${}", p.class_id, p.name),
            Self::StaticMethod(m) => write!(f, "#{}::{}()", m.class_id, m.name),
            Self::DynamicProperty(p) => write!(f, "~{}::${}", p.class_id, p.name),
            Self::DynamicMethod(m) => write!(f, "~{}::{}()", m.class_id, m.name),
        }
    }
}

/// A writable member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetPoint {
    /// `#Class::$property`
    StaticProperty(PropertyPoint),
    /// `#Class::method()::$parameter`
    StaticParameter(ParameterPoint),
    /// `~Class::$property`
    DynamicProperty(PropertyPoint),
    /// `Class.method().$parameter`
    DynamicParameter(ParameterPoint),
}

impl TargetPoint {
    pub fn class_id(&self) -> &str {
        match self {
            Self::StaticProperty(p) | Self::DynamicProperty(p) => p.class_id(),
            Self::StaticParameter(p) | Self::DynamicParameter(p) => p.class_id(),
        }
    }

    /// Member name: the property name, or the parameter name for parameter points.
    pub fn name(&self) -> &str {
        match self {
            Self::StaticProperty(p) | Self::DynamicProperty(p) => p.name(),
            Self::StaticParameter(p) | Self::DynamicParameter(p) => p.name(),
        }
    }

    pub fn method_name(&self) -> Option<&str> {
        match self {
            Self::StaticParameter(p) | Self::DynamicParameter(p) => Some(p.method_name()),
            _ => None,
        }
    }

    pub fn binding(&self) -> Binding {
        match self {
            Self::StaticProperty(_) | Self::StaticParameter(_) => Binding::Static,
            Self::DynamicProperty(_) | Self::DynamicParameter(_) => Binding::Dynamic,
        }
    }

    pub fn kind(&self) -> PointKind {
        match self {
            Self::StaticProperty(_) | Self::DynamicProperty(_) => PointKind::Property,
            Self::StaticParameter(_) | Self::DynamicParameter(_) => PointKind::Parameter,
        }
    }

    pub fn is_static(&self) -> bool {
        self.binding() == Binding::Static
    }

    pub fn qualified_id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TargetPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaticProperty(p) => write!(f, "#{}::${}", p.class_id, p.name),
            Self::StaticParameter(p) => {
                write!(f, "#{}::{}()::${}", p.class_id, p.method_name, p.name)
            }
            Self::DynamicProperty(p) => write!(f, "~{}::${}", p.class_id, p.name),
            Self::DynamicParameter(p) => {
                write!(f, "{}.{}().${}", p.class_id, p.method_name, p.name)
            }
        }
    }
}

/// Either role, as returned by role-agnostic parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Point {
    Source(SourcePoint),
    Target(TargetPoint),
}

impl Point {
    pub fn class_id(&self) -> &str {
        match self {
            Self::Source(p) => p.class_id(),
            Self::Target(p) => p.class_id(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Source(p) => p.name(),
            Self::Target(p) => p.name(),
        }
    }

    pub fn binding(&self) -> Binding {
        match self {
            Self::Source(p) => p.binding(),
            Self::Target(p) => p.binding(),
        }
    }

    pub fn qualified_id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(p) => fmt::Display::fmt(p, f),
            Self::Target(p) => fmt::Display::fmt(p, f),
        }
    }
}

impl From<SourcePoint> for Point {
    fn from(point: SourcePoint) -> Self {
        Self::Source(point)
    }
}

impl From<TargetPoint> for Point {
    fn from(point: TargetPoint) -> Self {
        Self::Target(point)
    }
}
