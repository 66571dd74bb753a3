// src/config/package.rs
use anyhow::{Context as _, Result};
use std::path::Path;

/// The slice of `package.json` the build config needs.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct PackageMeta {
	pub name: String,

	#[serde(default)]
	pub version: Option<String>,
}

impl PackageMeta {
	pub fn new(name: &str, version: Option<&str>) -> Self {
		Self {
			name: name.to_string(),
			version: version.map(str::to_string),
		}
	}

	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path)
			.with_context(|| format!("failed to read package metadata at {}", path.display()))?;
		Self::from_json(&text)
			.with_context(|| format!("invalid package metadata in {}", path.display()))
	}

	pub fn from_json(text: &str) -> Result<Self> {
		let meta: PackageMeta = serde_json::from_str(text)?;
		anyhow::ensure!(!meta.name.trim().is_empty(), "package name is empty");
		Ok(meta)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reads_name_and_version_ignoring_other_fields() {
		let meta = PackageMeta::from_json(
			r#"{ "name": "demo", "version": "1.2.3", "private": true, "scripts": {} }"#,
		)
		.unwrap();
		assert_eq!(meta, PackageMeta::new("demo", Some("1.2.3")));
	}

	#[test]
	fn version_is_optional() {
		let meta = PackageMeta::from_json(r#"{ "name": "demo" }"#).unwrap();
		assert!(meta.version.is_none());
	}

	#[test]
	fn missing_or_empty_name_is_an_error() {
		assert!(PackageMeta::from_json(r#"{ "version": "1.0.0" }"#).is_err());
		assert!(PackageMeta::from_json(r#"{ "name": " " }"#).is_err());
	}

	#[test]
	fn load_reports_the_path() {
		let err = PackageMeta::load("/definitely/not/here/package.json").unwrap_err();
		assert!(format!("{err:#}").contains("/definitely/not/here/package.json"));
	}
}
