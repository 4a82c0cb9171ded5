// Domain layer: declared class structure and the object model the engine operates on.

pub mod class;
pub mod model;
pub mod ports;
