// src/config/mod.rs

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

pub mod package;

pub use package::PackageMeta;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "deploycfg.toml";
/// Env var pointing at a config file.
pub const CONFIG_ENV_VAR: &str = "DEPLOYCFG_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
	Json,
	Dotenv,
	Shell,
	Template,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Shell {
	Zsh,
	Bash,
	Fish,
	Pwsh,
}

impl std::fmt::Display for Shell {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			Shell::Zsh => "zsh",
			Shell::Bash => "bash",
			Shell::Fish => "fish",
			Shell::Pwsh => "pwsh",
		};
		f.write_str(s)
	}
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
	#[serde(default)]
	pub app: AppConfig,

	#[serde(default)]
	pub output: OutputConfig,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
	/// Path to package.json, relative to the config file.
	#[serde(default)]
	pub package_json: Option<PathBuf>,

	/// Release identifier used in `NEXT_PUBLIC_APP_NAME_VERSION`.
	#[serde(default)]
	pub release_tag: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
	#[serde(default)]
	pub format: Option<OutputFormat>,

	#[serde(default)]
	pub shell: Option<Shell>,

	/// MiniJinja template, relative to the config file.
	#[serde(default)]
	pub template: Option<PathBuf>,

	/// Output file, relative to the config file. Stdout when unset.
	#[serde(default)]
	pub out: Option<PathBuf>,
}

impl Config {
	pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path)
			.with_context(|| format!("failed to read config at {}", path.display()))?;
		Self::from_toml(&text)
			.with_context(|| format!("failed to parse config at {}", path.display()))
	}

	pub fn from_toml(text: &str) -> Result<Self> {
		let mut cfg: Config = toml::from_str(text)?;
		cfg.app.release_tag = cfg
			.app
			.release_tag
			.take()
			.map(|s| s.trim().to_string())
			.filter(|s| !s.is_empty());
		Ok(cfg)
	}

	/// Re-anchor relative paths on `base` (the config file's directory).
	pub fn anchor_paths(&mut self, base: &Path) {
		for p in [
			&mut self.app.package_json,
			&mut self.output.template,
			&mut self.output.out,
		]
		.into_iter()
		.flatten()
		{
			if p.is_relative() {
				*p = base.join(&*p);
			}
		}
	}
}

/// Config path precedence:
/// 1) CLI --config (must exist)
/// 2) DEPLOYCFG_CONFIG (must exist)
/// 3) ./deploycfg.toml if present
pub fn locate_config(
	cli_config: Option<&Path>,
	env_config: Option<&str>,
	cwd: &Path,
) -> Result<Option<PathBuf>> {
	if let Some(p) = cli_config {
		anyhow::ensure!(
			p.exists(),
			"--config was provided but file does not exist: {}",
			p.display()
		);
		return Ok(Some(p.to_path_buf()));
	}

	if let Some(raw) = env_config.map(str::trim).filter(|s| !s.is_empty()) {
		let p = PathBuf::from(raw);
		anyhow::ensure!(
			p.exists(),
			"{} is set but file does not exist: {}",
			CONFIG_ENV_VAR,
			p.display()
		);
		return Ok(Some(p));
	}

	let p = cwd.join(DEFAULT_CONFIG_FILE);
	Ok(p.exists().then_some(p))
}

/// Load the config found by [`locate_config`], or defaults when there is none.
pub fn load(path: Option<&Path>) -> Result<Config> {
	let Some(path) = path else {
		return Ok(Config::default());
	};

	let mut cfg = Config::load_from_path(path)?;
	if let Some(base) = path.parent() {
		cfg.anchor_paths(base);
	}
	log::debug!("loaded config from {}", path.display());
	Ok(cfg)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_full_config() {
		let cfg = Config::from_toml(
			r#"
[app]
package_json = "web/package.json"
release_tag = " v3.1.0 "

[output]
format = "shell"
shell = "fish"
out = "build/env.fish"
"#,
		)
		.unwrap();

		assert_eq!(cfg.app.package_json.as_deref(), Some(Path::new("web/package.json")));
		assert_eq!(cfg.app.release_tag.as_deref(), Some("v3.1.0"));
		assert_eq!(cfg.output.format, Some(OutputFormat::Shell));
		assert_eq!(cfg.output.shell, Some(Shell::Fish));
	}

	#[test]
	fn empty_config_is_default() {
		let cfg = Config::from_toml("").unwrap();
		assert!(cfg.app.package_json.is_none());
		assert!(cfg.output.format.is_none());
	}

	#[test]
	fn blank_release_tag_is_dropped() {
		let cfg = Config::from_toml("[app]\nrelease_tag = \"  \"\n").unwrap();
		assert!(cfg.app.release_tag.is_none());
	}

	#[test]
	fn unknown_keys_are_rejected() {
		assert!(Config::from_toml("[app]\nnmae = \"x\"\n").is_err());
	}

	#[test]
	fn relative_paths_are_anchored() {
		let mut cfg = Config::from_toml("[app]\npackage_json = \"package.json\"\n").unwrap();
		cfg.anchor_paths(Path::new("/srv/site"));
		assert_eq!(
			cfg.app.package_json.as_deref(),
			Some(Path::new("/srv/site/package.json"))
		);
	}

	#[test]
	fn locate_prefers_cli_then_env_then_cwd() {
		let dir = tempfile::tempdir().unwrap();
		let cli = dir.path().join("cli.toml");
		let env = dir.path().join("env.toml");
		let local = dir.path().join(DEFAULT_CONFIG_FILE);
		for p in [&cli, &env, &local] {
			std::fs::write(p, "").unwrap();
		}

		let found = locate_config(Some(&cli), env.to_str(), dir.path()).unwrap();
		assert_eq!(found.as_deref(), Some(cli.as_path()));

		let found = locate_config(None, env.to_str(), dir.path()).unwrap();
		assert_eq!(found.as_deref(), Some(env.as_path()));

		let found = locate_config(None, None, dir.path()).unwrap();
		assert_eq!(found.as_deref(), Some(local.as_path()));
	}

	#[test]
	fn locate_fails_on_missing_explicit_path_and_tolerates_missing_default() {
		let dir = tempfile::tempdir().unwrap();
		let missing = dir.path().join("nope.toml");

		assert!(locate_config(Some(&missing), None, dir.path()).is_err());
		assert!(locate_config(None, missing.to_str(), dir.path()).is_err());
		assert!(locate_config(None, None, dir.path()).unwrap().is_none());
	}
}
