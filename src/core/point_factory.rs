use crate::core::point::{MethodPoint, ParameterPoint, Point, PropertyPoint, SourcePoint, TargetPoint};
use crate::domain::class::{ClassDescriptor, ClassRegistry};
use crate::utils::error::{MapperError, Result};
use regex::{Captures, Regex};
use std::sync::{Arc, LazyLock};

static STATIC_PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#?([A-Za-z0-9\\_]+)::\$([A-Za-z0-9_]+)$").expect("static property pattern")
});
static STATIC_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#?([A-Za-z0-9\\_]+)::([A-Za-z0-9_]+)\(\)$").expect("static method pattern")
});
static STATIC_PARAMETER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#?([A-Za-z0-9\\_]+)::([A-Za-z0-9_]+)\(\)::\$([A-Za-z0-9_]+)$")
        .expect("static parameter pattern")
});
static DYNAMIC_PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^~([A-Za-z0-9\\_]+)::\$([A-Za-z0-9_]+)$").expect("dynamic property pattern")
});
static DYNAMIC_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^~([A-Za-z0-9\\_]+)::([A-Za-z0-9_]+)\(\)$").expect("dynamic method pattern")
});
static DYNAMIC_PARAMETER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9\\_]+)\.([A-Za-z0-9_]+)\(\)\.\$([A-Za-z0-9_]+)$")
        .expect("dynamic parameter pattern")
});

const SOURCE_SYNTAXES: &str = "#Class::$property, #Class::method(), ~Class::$property or ~Class::method()";
const TARGET_SYNTAXES: &str =
    "#Class::$property, #Class::method()::$parameter, ~Class::$property or Class.method().$parameter";

/// Parses point specifiers, checking static points against the registry.
#[derive(Debug, Clone)]
pub struct PointFactory {
    registry: Arc<ClassRegistry>,
}

impl PointFactory {
    pub fn new(registry: Arc<ClassRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ClassRegistry> {
        &self.registry
    }

    /// Parses a specifier of either role.
    ///
    /// Source syntaxes are tried before target syntaxes, so `#C::$p` and
    /// `~C::$p` come back as source points.
    pub fn create_point(&self, specifier: &str) -> Result<Point> {
        if let Some(point) = self.match_source(specifier)? {
            return Ok(Point::Source(point));
        }
        if let Some(point) = self.match_target(specifier)? {
            return Ok(Point::Target(point));
        }
        Err(MapperError::InvalidPointSyntax {
            specifier: specifier.to_string(),
            reason: format!("expected one of {} or {}", SOURCE_SYNTAXES, TARGET_SYNTAXES),
        })
    }

    pub fn create_source_point(&self, specifier: &str) -> Result<SourcePoint> {
        self.match_source(specifier)?
            .ok_or_else(|| MapperError::InvalidPointSyntax {
                specifier: specifier.to_string(),
                reason: format!("expected a source point: {}", SOURCE_SYNTAXES),
            })
    }

    pub fn create_target_point(&self, specifier: &str) -> Result<TargetPoint> {
        self.match_target(specifier)?
            .ok_or_else(|| MapperError::InvalidPointSyntax {
                specifier: specifier.to_string(),
                reason: format!("expected a target point: {}", TARGET_SYNTAXES),
            })
    }

    fn match_source(&self, specifier: &str) -> Result<Option<SourcePoint>> {
        if let Some(caps) = STATIC_PROPERTY.captures(specifier) {
            let point = PropertyPoint::new(&caps[1], &caps[2]);
            self.check_property(specifier, &caps)?;
            return Ok(Some(SourcePoint::StaticProperty(point)));
        }

        if let Some(caps) = STATIC_METHOD.captures(specifier) {
            let class = self.class(specifier, &caps[1])?;
            let method = class.find_method(&caps[2]).ok_or_else(|| {
                invalid_point(specifier, format!("method {}() does not exist on {}", &caps[2], class.id))
            })?;
            if method.required_parameters() > 0 {
                return Err(invalid_point(
                    specifier,
                    format!("{}::{}() requires arguments", class.id, method.name),
                ));
            }
            return Ok(Some(SourcePoint::StaticMethod(MethodPoint::new(
                &caps[1], &caps[2],
            ))));
        }

        if let Some(caps) = DYNAMIC_PROPERTY.captures(specifier) {
            return Ok(Some(SourcePoint::DynamicProperty(PropertyPoint::new(
                &caps[1], &caps[2],
            ))));
        }

        if let Some(caps) = DYNAMIC_METHOD.captures(specifier) {
            return Ok(Some(SourcePoint::DynamicMethod(MethodPoint::new(
                &caps[1], &caps[2],
            ))));
        }

        Ok(None)
    }

    fn match_target(&self, specifier: &str) -> Result<Option<TargetPoint>> {
        if let Some(caps) = STATIC_PROPERTY.captures(specifier) {
            let point = PropertyPoint::new(&caps[1], &caps[2]);
            self.check_property(specifier, &caps)?;
            return Ok(Some(TargetPoint::StaticProperty(point)));
        }

        if let Some(caps) = STATIC_PARAMETER.captures(specifier) {
            let class = self.class(specifier, &caps[1])?;
            let method = class.find_method(&caps[2]).ok_or_else(|| {
                invalid_point(specifier, format!("method {}() does not exist on {}", &caps[2], class.id))
            })?;
            if method.find_parameter(&caps[3]).is_none() {
                return Err(invalid_point(
                    specifier,
                    format!("{}::{}() has no parameter ${}", class.id, method.name, &caps[3]),
                ));
            }
            return Ok(Some(TargetPoint::StaticParameter(ParameterPoint::new(
                &caps[1], &caps[2], &caps[3],
            ))));
        }

        if let Some(caps) = DYNAMIC_PROPERTY.captures(specifier) {
            return Ok(Some(TargetPoint::DynamicProperty(PropertyPoint::new(
                &caps[1], &caps[2],
            ))));
        }

        if let Some(caps) = DYNAMIC_PARAMETER.captures(specifier) {
            return Ok(Some(TargetPoint::DynamicParameter(ParameterPoint::new(
                &caps[1], &caps[2], &caps[3],
            ))));
        }

        Ok(None)
    }

    fn class(&self, specifier: &str, class_id: &str) -> Result<Arc<ClassDescriptor>> {
        self.registry
            .get(class_id)
            .ok_or_else(|| invalid_point(specifier, format!("class {} is not registered", class_id)))
    }

    fn check_property(&self, specifier: &str, caps: &Captures<'_>) -> Result<()> {
        let class = self.class(specifier, &caps[1])?;
        if class.find_property(&caps[2]).is_none() {
            return Err(invalid_point(
                specifier,
                format!("property ${} does not exist on {}", &caps[2], class.id),
            ));
        }
        Ok(())
    }
}

fn invalid_point(specifier: &str, message: String) -> MapperError {
    MapperError::InvalidPoint {
        specifier: specifier.to_string(),
        message,
    }
}
