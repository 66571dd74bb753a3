use anyhow::{Context as _, Result};

use crate::{
    builder::DerivedConfig,
    config::{OutputFormat, Shell},
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct Emitter {
    shell: Shell,
}

impl Emitter {
    pub(crate) fn new(shell: Shell) -> Self {
        Self { shell }
    }

    pub(crate) fn header(&self, out: &mut String, title: &str) {
        out.push_str("# ");
        out.push_str(title);
        out.push('\n');
        out.push('\n');
    }

    pub(crate) fn comment(&self, out: &mut String, text: &str) {
        out.push_str("# ");
        out.push_str(text);
        out.push('\n');
    }

    pub(crate) fn set_env(&self, out: &mut String, key: &str, value: &str) {
        match self.shell {
            Shell::Zsh | Shell::Bash => {
                out.push_str("export ");
                out.push_str(key);
                out.push('=');
                out.push_str(&quote_posix(value));
                out.push('\n');
            }
            Shell::Fish => {
                out.push_str("set -gx ");
                out.push_str(key);
                out.push(' ');
                out.push_str(&quote_fish(value));
                out.push('\n');
            }
            Shell::Pwsh => {
                out.push_str("$env:");
                out.push_str(key);
                out.push_str(" = ");
                out.push_str(&quote_pwsh(value));
                out.push('\n');
            }
        }
    }
}

/// Render `cfg` in one of the non-template formats.
pub fn render(cfg: &DerivedConfig, format: OutputFormat, shell: Shell) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut s = cfg
                .to_json_pretty()
                .context("failed to serialize config as JSON")?;
            s.push('\n');
            Ok(s)
        }
        OutputFormat::Dotenv => Ok(emit_dotenv(cfg)),
        OutputFormat::Shell => Ok(emit_shell(cfg, shell)),
        OutputFormat::Template => {
            anyhow::bail!("template output is rendered by templates::render_template")
        }
    }
}

/// `KEY="value"` lines for defined entries, readable by `.env` loaders.
/// Undefined entries are skipped.
pub fn emit_dotenv(cfg: &DerivedConfig) -> String {
    let mut out = String::new();
    for (k, v) in cfg.env().defined() {
        out.push_str(k);
        out.push('=');
        out.push_str(&quote_dotenv(&v.to_string()));
        out.push('\n');
    }
    out
}

/// A script that exports every defined entry when evaluated by `shell`.
pub fn emit_shell(cfg: &DerivedConfig, shell: Shell) -> String {
    let em = Emitter::new(shell);
    let mut out = String::new();
    em.header(&mut out, "deploycfg (env)");

    for (k, v) in cfg.env().iter() {
        match v {
            Some(v) => em.set_env(&mut out, k, &v.to_string()),
            None => em.comment(&mut out, &format!("{k} is not set")),
        }
    }

    out
}

// -------------------- quoting helpers --------------------

fn quote_posix(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' | '"' | '$' | '`' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Double-quoted dotenv value; `$` is escaped so loaders do not expand it.
fn quote_dotenv(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' | '"' | '$' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

fn quote_fish(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' | '"' | '$' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

fn quote_pwsh(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '`' => out.push_str("``"),
            '"' => out.push_str("`\""),
            '$' => out.push_str("`$"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}
