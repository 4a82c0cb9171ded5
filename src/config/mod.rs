#[cfg(feature = "cli")]
pub mod cli;
pub mod schema;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use schema::ClassSchema;
pub use toml_config::{MapperConfig, MapperSection, RouteConfig};
