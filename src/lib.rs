pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{ClassSchema, MapperConfig};

pub use crate::core::{
    ChainPathFinder, DynamicPathFinder, Map, MapBuilder, ObjectMapper, PathFinder, Point,
    PointFactory, Route, RouteBuilder, RouteCollection, Source, SourcePoint, StaticPathFinder,
    Target, TargetInput, TargetPoint,
};
pub use domain::class::{
    ClassBuilder, ClassDescriptor, ClassRegistry, MethodDescriptor, ParameterDescriptor,
    PropertyDescriptor, Visibility,
};
pub use domain::model::Record;
pub use domain::ports::Object;
pub use serde_json::Value;
pub use utils::error::{MapperError, MemberError, Result};
