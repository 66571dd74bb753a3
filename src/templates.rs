use anyhow::{Context as _, Result};
use minijinja::{
    context,
    value::{Value, ValueKind},
    Environment, ErrorKind,
};
use std::{fs, path::Path};

use crate::{builder::DerivedConfig, config::PackageMeta};

/// Render the MiniJinja template at `path` with the derived config.
///
/// Template context:
/// - `env`: defined env entries (undefined ones are absent)
/// - `headers`: the header rules as `{source, headers: [{key, value}]}`
/// - `package`: `{name, version}`
pub fn render_template(path: &Path, cfg: &DerivedConfig, package: &PackageMeta) -> Result<String> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read template file: {}", path.display()))?;

    render_str(&source, cfg, package)
        .with_context(|| format!("template render failed ({})", path.display()))
}

pub fn render_str(source: &str, cfg: &DerivedConfig, package: &PackageMeta) -> Result<String> {
    let mut env = Environment::new();
    env.add_filter("tojson", env_value_to_json);
    env.add_template("tpl", source)?;

    let ctx = context! {
        env => Value::from_serialize(cfg.env()),
        headers => Value::from_serialize(cfg.headers()),
        package => context! {
            name => &package.name,
            version => &package.version,
        },
    };
    Ok(env.get_template("tpl")?.render(ctx)?)
}

/// JSON literal for a scalar env value, so typed entries such as
/// `NEXT_PUBLIC_APP_BUILD_TIMESTAMP` or `GIT_COMMIT_SHA_SHORT` keep their type.
fn env_value_to_json(v: Value) -> Result<String, minijinja::Error> {
    match v.kind() {
        ValueKind::String | ValueKind::Number | ValueKind::Bool => serde_json::to_string(&v)
            .map_err(|e| minijinja::Error::new(ErrorKind::InvalidOperation, e.to_string())),
        kind => Err(minijinja::Error::new(
            ErrorKind::InvalidOperation,
            format!("tojson expects a string, number or boolean env value, got {kind}"),
        )),
    }
}
