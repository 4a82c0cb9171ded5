use crate::core::map::{Map, MapBuilder};
use crate::core::path_finder::{DynamicPathFinder, PathFinder, StaticPathFinder};
use crate::utils::error::{MapperError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_one_of, Validate};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, LazyLock};

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern"));

const STRATEGIES: [&str; 2] = ["static", "dynamic"];

/// Replaces `${VAR}` with the variable's value; unknown variables stay as written.
pub(crate) fn substitute_env_vars(content: &str) -> String {
    ENV_VAR
        .replace_all(content, |caps: &Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
}

/// Map definition loaded from TOML.
///
/// ```toml
/// [mapper]
/// path_finding = true
/// strategies = ["static", "dynamic"]
///
/// [[routes]]
/// source = "#A::$j"
/// target = "~B::$j"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapperConfig {
    #[serde(default)]
    pub mapper: MapperSection,
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapperSection {
    #[serde(default = "default_path_finding")]
    pub path_finding: bool,
    /// Empty means the default static-then-dynamic chain.
    #[serde(default)]
    pub strategies: Vec<String>,
}

impl Default for MapperSection {
    fn default() -> Self {
        Self {
            path_finding: default_path_finding(),
            strategies: Vec::new(),
        }
    }
}

fn default_path_finding() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub source: String,
    pub target: String,
}

impl MapperConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MapperError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| MapperError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Adds the configured routes and strategies to `builder` and builds the map.
    ///
    /// Specifiers are parsed against the builder's registry, so a route naming
    /// an unknown class or member fails here.
    pub fn apply(&self, builder: MapBuilder) -> Result<Map> {
        self.validate()?;

        let mut routes = builder.route_builder();
        for route in &self.routes {
            routes = routes
                .set_source_point(&route.source)?
                .set_target_point(&route.target)?
                .add_route()?;
        }
        let mut builder = routes.map_builder()?;

        for name in &self.mapper.strategies {
            let finder: Arc<dyn PathFinder> = match name.as_str() {
                "static" => Arc::new(StaticPathFinder::new()),
                _ => Arc::new(DynamicPathFinder::new()),
            };
            builder = builder.add_path_finder(finder);
        }

        tracing::debug!(
            "Loaded map with {} routes, path finding {}",
            self.routes.len(),
            if self.mapper.path_finding { "enabled" } else { "disabled" }
        );

        Ok(builder.get_map(self.mapper.path_finding))
    }
}

impl Validate for MapperConfig {
    fn validate(&self) -> Result<()> {
        for strategy in &self.mapper.strategies {
            validate_one_of("mapper.strategies", strategy, &STRATEGIES)?;
        }
        for route in &self.routes {
            validate_non_empty_string("routes.source", &route.source)?;
            validate_non_empty_string("routes.target", &route.target)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::point_factory::PointFactory;
    use crate::domain::class::{ClassDescriptor, ClassRegistry};
    use crate::utils::error::ErrorKind;
    use std::io::Write;

    fn builder() -> MapBuilder {
        let mut registry = ClassRegistry::new();
        registry
            .register(ClassDescriptor::builder("A").property("j").build())
            .unwrap();
        registry
            .register(ClassDescriptor::builder("B").overloaded_properties().build())
            .unwrap();
        MapBuilder::new(Arc::new(PointFactory::new(Arc::new(registry))))
    }

    #[test]
    fn test_defaults() {
        let config = MapperConfig::from_toml_str("").unwrap();
        assert!(config.mapper.path_finding);
        assert!(config.mapper.strategies.is_empty());
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_apply_builds_map() {
        let config = MapperConfig::from_toml_str(
            r##"
[mapper]
path_finding = false

[[routes]]
source = "#A::$j"
target = "~B::$j"
"##,
        )
        .unwrap();

        let map = config.apply(builder()).unwrap();

        assert!(!map.is_path_finding_enabled());
        let routes: Vec<String> = map.routes().iter().map(|r| r.to_string()).collect();
        assert_eq!(routes, vec!["#A::$j -> ~B::$j"]);
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        let config = MapperConfig::from_toml_str(
            r##"
[mapper]
strategies = ["static", "fuzzy"]
"##,
        )
        .unwrap();

        let error = config.apply(builder()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_bad_specifier_surfaces_point_error() {
        let config = MapperConfig::from_toml_str(
            r##"
[[routes]]
source = "#A::$missing"
target = "~B::$j"
"##,
        )
        .unwrap();

        let error = config.apply(builder()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidPoint);
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("OBJECT_MAPPER_TEST_CLASS", "A");
        let config = MapperConfig::from_toml_str(
            r##"
[[routes]]
source = "#${OBJECT_MAPPER_TEST_CLASS}::$j"
target = "~B::${OBJECT_MAPPER_TEST_UNSET}"
"##,
        )
        .unwrap();

        assert_eq!(config.routes[0].source, "#A::$j");
        assert_eq!(config.routes[0].target, "~B::${OBJECT_MAPPER_TEST_UNSET}");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[mapper]\nstrategies = [\"dynamic\"]").unwrap();

        let config = MapperConfig::from_file(file.path()).unwrap();
        assert_eq!(config.mapper.strategies, vec!["dynamic"]);

        let missing = MapperConfig::from_file("/nonexistent/map.toml").unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::Io);
    }
}
