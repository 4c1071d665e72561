use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use serde_json::{json, Value};
use tracing::debug;

use rcs_diff::dirty_data;
use rcs_mapping::{Mapping, MappingDocument, MappingIssue};
use rcs_types::{into_model, Model};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Check(args) => cmd_check(args, cli.format),
        Command::Diff(args) => cmd_diff(args, cli.format),
    }
}

fn cmd_check(args: CheckArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mapping = load_mapping(&args.mapping)?;
    let issues = mapping.issues();

    match format {
        OutputFormat::Json => {
            let report = json!({
                "classes": mapping.mapping_keys().collect::<Vec<_>>(),
                "valid": issues.is_empty(),
                "issues": issues.iter().map(ToString::to_string).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => print_issues(&mapping, &issues),
    }

    if !issues.is_empty() {
        bail!("{} has {} mapping issue(s)", args.mapping.display(), issues.len());
    }
    Ok(())
}

fn print_issues(mapping: &Mapping, issues: &[MappingIssue]) {
    for issue in issues {
        println!("  {} {}", "✗".red(), issue);
    }
    if issues.is_empty() {
        println!(
            "{} {} class(es), no issues",
            "✓".green().bold(),
            mapping.class_metadata_list().count()
        );
    }
}

fn cmd_diff(args: DiffArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mapping = load_mapping(&args.mapping)?;
    let new = load_model(&args.new)?;
    let old = args.old.as_deref().map(load_model).transpose()?;
    let diff = diff_models(&mapping, &args.key, &new, old.as_ref())?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&Value::Object(diff))?),
        OutputFormat::Text if diff.is_empty() => println!("No changes."),
        OutputFormat::Text => {
            for (key, value) in &diff {
                println!("  {} {}", key.yellow(), value);
            }
        }
    }
    Ok(())
}

/// Dirty data of `new` against `old`, or against the class's default shape.
pub fn diff_models(
    mapping: &Mapping,
    key: &str,
    new: &Model,
    old: Option<&Model>,
) -> anyhow::Result<Model> {
    let meta = mapping
        .class_metadata_by_key(key)
        .with_context(|| format!("no class metadata for key {key:?}"))?;
    let diff = match old {
        Some(old) => dirty_data(mapping, new, old, meta)?,
        None => dirty_data(mapping, new, &meta.default_serialized_model(), meta)?,
    };
    Ok(diff)
}

/// Read a mapping document, TOML or JSON by extension.
pub fn load_mapping(path: &Path) -> anyhow::Result<Mapping> {
    let input =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let document = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => MappingDocument::from_toml_str(&input),
        _ => MappingDocument::from_json_str(&input),
    }
    .with_context(|| format!("parsing {}", path.display()))?;
    debug!(classes = document.classes.len(), path = %path.display(), "loaded mapping document");
    Ok(document.into_mapping()?)
}

pub fn load_model(path: &Path) -> anyhow::Result<Model> {
    let input =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value: Value =
        serde_json::from_str(&input).with_context(|| format!("parsing {}", path.display()))?;
    Ok(into_model(value)?)
}
