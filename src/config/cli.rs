use crate::utils::error::Result;
use crate::utils::validation::{validate_class_id, validate_non_empty_string, Validate};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "object-mapper")]
#[command(about = "Copies a JSON-described object into another class along routes")]
pub struct CliConfig {
    #[arg(long, help = "TOML file declaring the classes")]
    pub schema: PathBuf,

    #[arg(long, help = "TOML map file; routes are discovered when omitted")]
    pub map: Option<PathBuf>,

    #[arg(long, help = "JSON file holding the source object")]
    pub source: PathBuf,

    #[arg(long, help = "Class id of the object to build")]
    pub target: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("schema", &self.schema.to_string_lossy())?;
        validate_non_empty_string("source", &self.source.to_string_lossy())?;
        validate_class_id("target", &self.target)?;
        Ok(())
    }
}
