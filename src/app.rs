use anyhow::{bail, Context as _, Result};
use std::{fs, path::Path};

use crate::{
    builder::{ConfigBuilder, DerivedConfig},
    cli::Args,
    clock::BuildTimestamp,
    config::{self, OutputFormat, PackageMeta, Shell},
    context::EnvSnapshot,
    emit,
    headers::resolve_headers,
    report, templates,
};

/// What a run produced: the emitted text for stdout and diagnostics for stderr.
#[derive(Debug, Default)]
pub struct Outcome {
    pub stdout: String,
    pub stderr: String,
}

/// Resolve inputs from flags, config file and snapshot, derive the config
/// and render it.
pub fn run(args: &Args, snapshot: &EnvSnapshot, cwd: &Path) -> Result<Outcome> {
    let cfg_path = config::locate_config(
        args.config.as_deref(),
        snapshot.get(config::CONFIG_ENV_VAR),
        cwd,
    )?;
    let cfg = config::load(cfg_path.as_deref())?;

    let package_path = args
        .package
        .clone()
        .or_else(|| cfg.app.package_json.clone())
        .unwrap_or_else(|| cwd.join("package.json"));
    let package = PackageMeta::load(&package_path)?;

    let build_time = match args.build_time_ms {
        Some(ms) => BuildTimestamp::from_millis(ms)
            .with_context(|| format!("--build-time-ms out of range: {ms}"))?,
        None => BuildTimestamp::now(),
    };

    let mut builder = ConfigBuilder::new(snapshot, &package).build_time(build_time);
    if let Some(tag) = args.release_tag.as_deref().or(cfg.app.release_tag.as_deref()) {
        builder = builder.release_tag(tag);
    }
    let derived = builder.build();

    let mut outcome = Outcome::default();
    let redact = args.effective_redact();

    if args.dump_context {
        outcome.stderr.push_str(&snapshot.debug_dump(redact));
    }
    let rep = report::build_report(&derived, args.report, redact);
    if !rep.is_empty() {
        if !outcome.stderr.is_empty() {
            outcome.stderr.push('\n');
        }
        outcome.stderr.push_str(&rep);
    }

    // A header lookup is a query, never written over the configured output.
    if let Some(path) = args.headers_for.as_deref() {
        outcome.stdout = headers_for(&derived, path);
        return Ok(outcome);
    }

    let text = render_output(args, &cfg, &derived, &package)?;

    match args.out.as_ref().or(cfg.output.out.as_ref()) {
        Some(out) => {
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory {}", parent.display()))?;
            }
            fs::write(out, &text)
                .with_context(|| format!("failed to write {}", out.display()))?;
            log::info!("wrote build config to {}", out.display());
        }
        None => outcome.stdout = text,
    }

    Ok(outcome)
}

fn render_output(
    args: &Args,
    cfg: &config::Config,
    derived: &DerivedConfig,
    package: &PackageMeta,
) -> Result<String> {
    let format = args
        .format
        .or(cfg.output.format)
        .unwrap_or(OutputFormat::Json);

    if format != OutputFormat::Template {
        let shell = args.shell.or(cfg.output.shell).unwrap_or(Shell::Bash);
        return emit::render(derived, format, shell);
    }

    let Some(tpl) = args.template.as_ref().or(cfg.output.template.as_ref()) else {
        bail!("--format template requires --template or [output].template");
    };
    templates::render_template(tpl, derived, package)
}

/// `Key: Value` lines for the headers the rules apply to `path`.
fn headers_for(derived: &DerivedConfig, path: &str) -> String {
    let mut out = String::new();
    for h in resolve_headers(derived.headers(), path) {
        out.push_str(&format!("{}: {}\n", h.key, h.value));
    }
    out
}
