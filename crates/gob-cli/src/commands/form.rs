use anyhow::{Context, bail};
use gob_core::run_config::RunConfig;
use gob_store::AppContext;
use gob_store::config_form::ConfigForm;
use serde_json::{Map, Value};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::FormCommands;
use crate::output::output;

/// Handle `gob form`.
pub fn handle(
    action: &FormCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        FormCommands::Show => {}
        FormCommands::Set { path, value } => {
            let next = with_field(ctx.config_form.value(), path, parse_value(value))?;
            ctx.config_form.set(next);
        }
        FormCommands::Restore { from: Some(path) } => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read run config from {path}"))?;
            let config: RunConfig = serde_json::from_str(&raw)
                .with_context(|| format!("{path} is not a valid run config"))?;
            ctx.config_form.restore_from(Some(&config));
        }
        FormCommands::Restore { from: None } => ctx.config_form.restore_from(None),
        FormCommands::Reset => ctx.config_form.reset(),
    }

    // Report settled validation, not a result still waiting on its debounce.
    ctx.config_form.flush();
    output(ctx.config_form.state(), flags.format)
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Return a copy of `form` with the dotted `path` set to `value`. Fails if
/// the path is not a form field or the value does not fit it.
fn with_field(form: &ConfigForm, path: &str, value: Value) -> anyhow::Result<ConfigForm> {
    let mut tree = serde_json::to_value(form)?;
    set_path(&mut tree, path, value.clone())?;
    let next: ConfigForm = serde_json::from_value(tree)
        .with_context(|| format!("'{value}' does not fit form field '{path}'"))?;

    // Unknown keys are dropped on decode; catch them by reading the field back.
    let pointer = path
        .split('.')
        .map(|segment| format!("/{}", segment.replace('~', "~0").replace('/', "~1")))
        .collect::<String>();
    if serde_json::to_value(&next)?.pointer(&pointer) != Some(&value) {
        bail!("'{path}' is not a form field");
    }
    Ok(next)
}

fn set_path(tree: &mut Value, path: &str, value: Value) -> anyhow::Result<()> {
    let mut segments = path.split('.').peekable();
    let mut node = tree;
    while let Some(segment) = segments.next() {
        if segment.is_empty() {
            bail!("empty segment in field path '{path}'");
        }
        let last = segments.peek().is_none();
        node = match node {
            Value::Object(map) => {
                if last {
                    map.insert(segment.to_string(), value);
                    return Ok(());
                }
                map.entry(segment)
                    .or_insert_with(|| Value::Object(Map::new()))
            }
            Value::Array(items) => {
                let index: usize = segment
                    .parse()
                    .with_context(|| format!("'{segment}' in '{path}' is not an array index"))?;
                if index > items.len() {
                    bail!("index {index} in '{path}' is past the end of the array");
                }
                if index == items.len() {
                    items.push(Value::Object(Map::new()));
                }
                if last {
                    items[index] = value;
                    return Ok(());
                }
                &mut items[index]
            }
            _ => bail!("'{path}' descends into a value that is not an object or array"),
        };
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gob_core::enums::AuthKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_words_become_strings() {
        assert_eq!(parse_value("bearer"), Value::String("bearer".into()));
        assert_eq!(parse_value("5"), Value::from(5));
        assert_eq!(parse_value("null"), Value::Null);
    }

    #[test]
    fn sets_nested_fields() {
        let form = with_field(&ConfigForm::default(), "auth.kind", parse_value("bearer")).unwrap();
        assert_eq!(form.auth.kind, Some(AuthKind::Bearer));

        let form = with_field(&form, "concurrency", parse_value("4")).unwrap();
        assert_eq!(form.concurrency, Some(4));
    }

    #[test]
    fn appends_to_arrays_and_maps() {
        let form = with_field(&ConfigForm::default(), "ok_status_codes.0", Value::from(200)).unwrap();
        assert_eq!(form.ok_status_codes, [200]);

        let form = with_field(&form, "secrets.API_KEY", parse_value("abc")).unwrap();
        assert_eq!(form.secrets["API_KEY"], "abc");
    }

    #[test]
    fn rejects_unknown_fields_and_bad_types() {
        assert!(with_field(&ConfigForm::default(), "nope", Value::from(1)).is_err());
        assert!(with_field(&ConfigForm::default(), "concurrency", parse_value("many")).is_err());
        assert!(with_field(&ConfigForm::default(), "ok_status_codes.3", Value::from(1)).is_err());
        assert!(with_field(&ConfigForm::default(), "concurrency.x", Value::from(1)).is_err());
    }
}
