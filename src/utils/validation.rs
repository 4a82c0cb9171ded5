use crate::utils::error::{MapperError, Result};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static CLASS_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9\\_]+$").expect("class id pattern"));
static MEMBER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("member name pattern"));

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: &str, reason: impl Into<String>) -> MapperError {
    MapperError::ConfigError {
        message: format!("{} = '{}': {}", field_name, value, reason.into()),
    }
}

/// Class ids share the character set accepted by point specifiers.
pub fn validate_class_id(field_name: &str, value: &str) -> Result<()> {
    if !CLASS_ID.is_match(value) {
        return Err(invalid(
            field_name,
            value,
            "class ids may only contain letters, digits, '_' and '\\'",
        ));
    }
    Ok(())
}

pub fn validate_member_name(field_name: &str, value: &str) -> Result<()> {
    if !MEMBER_NAME.is_match(value) {
        return Err(invalid(
            field_name,
            value,
            "member names may only contain letters, digits and '_'",
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(invalid(
            field_name,
            value,
            format!("Unsupported value. Allowed values: {}", allowed.join(", ")),
        ));
    }
    Ok(())
}

pub fn validate_unique_names<'a, I>(field_name: &str, names: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(invalid(field_name, name, "declared more than once"));
        }
    }
    Ok(())
}
