pub mod map;
pub mod mapper;
pub mod path_finder;
pub mod point;
pub mod point_factory;
pub mod route;
pub mod route_builder;
pub mod source;
pub mod target;

pub use map::{Map, MapBuilder};
pub use mapper::ObjectMapper;
pub use path_finder::{ChainPathFinder, DynamicPathFinder, PathFinder, StaticPathFinder};
pub use point::{Binding, Point, PointKind, SourcePoint, TargetPoint};
pub use point_factory::PointFactory;
pub use route::{Route, RouteCollection};
pub use route_builder::RouteBuilder;
pub use source::Source;
pub use target::{Target, TargetInput};
pub use crate::utils::error::Result;
