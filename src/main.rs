use clap::Parser;
use object_mapper::utils::error::{ErrorKind, MapperError};
use object_mapper::utils::{logger, validation::Validate};
use object_mapper::{ClassSchema, CliConfig, MapperConfig, ObjectMapper, Record};
use std::sync::Arc;

fn run(config: &CliConfig) -> object_mapper::Result<serde_json::Value> {
    let registry = Arc::new(ClassSchema::from_file(&config.schema)?.into_registry()?);
    let mapper = ObjectMapper::new(Arc::clone(&registry));

    let content = std::fs::read_to_string(&config.source)?;
    let source = Record::from_json(&registry, serde_json::from_str(&content)?)?;

    let map = match &config.map {
        Some(path) => {
            tracing::info!("Using map file {}", path.display());
            MapperConfig::from_file(path)?.apply(mapper.map_builder())?
        }
        None => {
            tracing::info!("No map file given, discovering routes");
            mapper.map_builder().get_map(true)
        }
    };

    let mapped = mapper.map(&source, config.target.as_str(), Some(&map))?;

    let Some(mapped) = mapped else {
        tracing::warn!("No route applied, nothing was built");
        return Ok(serde_json::Value::Null);
    };

    match mapped.downcast_ref::<Record>() {
        Some(record) => record.to_json(),
        None => Err(MapperError::invalid_operation(
            "main",
            format!("{} instances cannot be printed as JSON", mapped.class_id()),
        )),
    }
}

fn main() {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting object-mapper CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("{}", e.user_friendly_message());
        std::process::exit(1);
    }

    match run(&config).and_then(|value| Ok(serde_json::to_string_pretty(&value)?)) {
        Ok(output) => {
            tracing::info!("Mapped to {}", config.target);
            println!("{}", output);
        }
        Err(e) => {
            tracing::error!("Mapping failed: {} ({:?})", e, e.kind());
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("{}", e.user_friendly_message());
            eprintln!("Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.kind() {
                ErrorKind::Config | ErrorKind::InvalidPointSyntax | ErrorKind::InvalidPoint => 1,
                ErrorKind::InvalidArgument | ErrorKind::InvalidOperation => 2,
                ErrorKind::Io => 3,
            };
            std::process::exit(exit_code);
        }
    }
}
