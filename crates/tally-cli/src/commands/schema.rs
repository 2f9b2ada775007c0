use anyhow::Context;
use serde::Serialize;
use tally_schema::SchemaRegistry;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::commands::shared::read_text;
use crate::output::output;

#[derive(Debug, Serialize)]
struct CheckResult<'a> {
    schema: &'a str,
    file: String,
    valid: bool,
}

/// Handle `tally schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let registry = SchemaRegistry::new();

    let Some(name) = args.name.as_deref() else {
        return output(&registry.list(), flags.format);
    };

    match &args.check {
        Some(path) => {
            let content = read_text(path)?;
            let instance: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("{} is not valid JSON", path.display()))?;
            registry
                .validate(name, &instance)
                .with_context(|| format!("{} does not match {name}", path.display()))?;
            output(
                &CheckResult {
                    schema: name,
                    file: path.display().to_string(),
                    valid: true,
                },
                flags.format,
            )
        }
        None => {
            let schema = registry
                .get(name)
                .with_context(|| format!("unknown schema '{name}'; run `tally schema` to list"))?;
            output(schema, flags.format)
        }
    }
}
