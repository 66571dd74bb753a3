//! Derivation of the build configuration from an environment snapshot.
//!
//! [`ConfigBuilder`] is a pure function of its inputs: the snapshot, the
//! package metadata, the release tag and the build timestamp. Nothing here
//! reads the process environment or the clock.

use serde::Serialize;

use crate::{
    clock::BuildTimestamp,
    config::PackageMeta,
    context::{show, EnvSnapshot},
    env::{EnvValue, ExportedEnv},
    headers::{header_rules, HeaderRule},
    release::{normalize_commit_tags, resolve_release_tag},
};

/// Base URL used when no deployment host is known.
pub const LOCAL_BASE_URL: &str = "http://localhost:8888";

/// Length of the abbreviated commit SHA.
pub const SHORT_SHA_LEN: usize = 8;

/// Env var passed through to the build unchanged.
const PASSTHROUGH_VARS: &[&str] = &[
    "GITHUB_DISPATCH_TOKEN",
    "SENTRY_DSN",
    "VERCEL",
    "VERCEL_ENV",
    "VERCEL_URL",
    "CI",
    "GIT_COMMIT_SHA",
    "GIT_COMMIT_REF",
];

/// The configuration handed to the hosting build framework.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedConfig {
    env: ExportedEnv,
    headers: Vec<HeaderRule>,
}

impl DerivedConfig {
    pub fn env(&self) -> &ExportedEnv {
        &self.env
    }

    pub fn headers(&self) -> &[HeaderRule] {
        &self.headers
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub struct ConfigBuilder<'a> {
    snapshot: &'a EnvSnapshot,
    package: &'a PackageMeta,
    release_tag: Option<String>,
    build_time: Option<BuildTimestamp>,
}

impl<'a> ConfigBuilder<'a> {
    pub fn new(snapshot: &'a EnvSnapshot, package: &'a PackageMeta) -> Self {
        Self {
            snapshot,
            package,
            release_tag: None,
            build_time: None,
        }
    }

    /// Explicit release identifier. When unset it is derived from the
    /// commit tags or the package version.
    pub fn release_tag(mut self, tag: impl Into<String>) -> Self {
        self.release_tag = Some(tag.into());
        self
    }

    /// Build instant. Defaults to the Unix epoch so that output stays
    /// reproducible unless a caller opts into a real clock.
    pub fn build_time(mut self, ts: BuildTimestamp) -> Self {
        self.build_time = Some(ts);
        self
    }

    pub fn build(self) -> DerivedConfig {
        let snap = self.snapshot;

        log::debug!(
            "Building with NODE_ENV=\"{}\" NEXT_PUBLIC_APP_STAGE=\"{}\" for NEXT_PUBLIC_CUSTOMER_REF=\"{}\" using GIT_COMMIT_SHA={} and GIT_COMMIT_REF={}",
            show(snap.get("NODE_ENV")),
            show(snap.get("NEXT_PUBLIC_APP_STAGE")),
            show(snap.get("NEXT_PUBLIC_CUSTOMER_REF")),
            show(snap.get("GIT_COMMIT_SHA")),
            show(snap.get("GIT_COMMIT_REF")),
        );

        let commit_tags = normalize_commit_tags(snap.get("GIT_COMMIT_TAGS"));
        log::debug!(
            "Deployment will be tagged automatically, using GIT_COMMIT_TAGS: \"{}\"",
            commit_tags
        );

        let release_tag = resolve_release_tag(
            self.release_tag.as_deref(),
            &commit_tags,
            self.package.version.as_deref(),
        );

        let build_time = self.build_time.unwrap_or_default();

        let mut env = ExportedEnv::new();

        for key in PASSTHROUGH_VARS {
            env.set_opt(key, snap.get(key));
        }
        // Public alias so browser-side error reporting can use the DSN.
        env.set_opt("NEXT_PUBLIC_SENTRY_DSN", snap.get("SENTRY_DSN"));

        env.set_opt("NEXT_PUBLIC_APP_DOMAIN", snap.get("VERCEL_URL"));
        env.set("NEXT_PUBLIC_APP_BASE_URL", base_url(snap));
        env.set("NEXT_PUBLIC_APP_BUILD_TIME", build_time.display_string());
        env.set("NEXT_PUBLIC_APP_BUILD_TIMESTAMP", build_time.millis());
        env.set("NEXT_PUBLIC_APP_NAME", self.package.name.as_str());
        env.set(
            "NEXT_PUBLIC_APP_NAME_VERSION",
            format!("{}-{}", self.package.name, release_tag),
        );
        env.set("GIT_COMMIT_SHA_SHORT", short_sha(snap.get("GIT_COMMIT_SHA")));
        env.set("GIT_COMMIT_TAGS", commit_tags);

        let headers = header_rules();
        match serde_json::to_string_pretty(&headers) {
            Ok(json) => log::info!("Using headers: {json}"),
            Err(e) => log::warn!("could not render header rules for logging: {e}"),
        }

        DerivedConfig { env, headers }
    }
}

/// `https://{VERCEL_URL}` for a known host, the local dev URL otherwise.
pub fn base_url(snap: &EnvSnapshot) -> String {
    let Some(host) = snap.get_non_empty("VERCEL_URL") else {
        return LOCAL_BASE_URL.to_string();
    };

    let url = format!("https://{host}");
    if let Err(e) = url::Url::parse(&url) {
        log::warn!("VERCEL_URL does not form a valid URL ({url}): {e}");
    }
    url
}

/// First eight characters of the commit SHA, or `false` when it is missing
/// or too short to abbreviate.
pub fn short_sha(sha: Option<&str>) -> EnvValue {
    match sha {
        Some(s) if s.chars().count() >= SHORT_SHA_LEN => {
            EnvValue::Str(s.chars().take(SHORT_SHA_LEN).collect())
        }
        _ => EnvValue::Bool(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA: &str = "0123456789abcdef0123456789abcdef01234567";

    fn demo() -> PackageMeta {
        PackageMeta::new("demo", Some("1.2.3"))
    }

    fn ts() -> BuildTimestamp {
        BuildTimestamp::from_millis(1_577_836_800_000).unwrap()
    }

    fn build(pairs: &[(&str, &str)]) -> DerivedConfig {
        let snap = EnvSnapshot::from_pairs(pairs.iter().copied());
        ConfigBuilder::new(&snap, &demo()).build_time(ts()).build()
    }

    #[test]
    fn short_sha_takes_first_eight_chars() {
        let cfg = build(&[("GIT_COMMIT_SHA", SHA)]);
        assert_eq!(cfg.env().get_str("GIT_COMMIT_SHA_SHORT"), Some("01234567"));
        assert_eq!(cfg.env().get_str("GIT_COMMIT_SHA"), Some(SHA));
    }

    #[test]
    fn short_sha_is_false_when_missing_or_short() {
        let cfg = build(&[]);
        assert_eq!(cfg.env().get("GIT_COMMIT_SHA_SHORT"), Some(&EnvValue::Bool(false)));

        assert_eq!(short_sha(Some("")), EnvValue::Bool(false));
        assert_eq!(short_sha(Some("abc")), EnvValue::Bool(false));
        assert_eq!(short_sha(Some("abcdefgh")), EnvValue::from("abcdefgh"));
    }

    #[test]
    fn base_url_uses_vercel_host_or_local_fallback() {
        let cfg = build(&[("VERCEL_URL", "my-app.vercel.app")]);
        assert_eq!(
            cfg.env().get_str("NEXT_PUBLIC_APP_BASE_URL"),
            Some("https://my-app.vercel.app")
        );
        assert_eq!(cfg.env().get_str("NEXT_PUBLIC_APP_DOMAIN"), Some("my-app.vercel.app"));

        let cfg = build(&[]);
        assert_eq!(cfg.env().get_str("NEXT_PUBLIC_APP_BASE_URL"), Some(LOCAL_BASE_URL));

        let cfg = build(&[("VERCEL_URL", "")]);
        assert_eq!(cfg.env().get_str("NEXT_PUBLIC_APP_BASE_URL"), Some(LOCAL_BASE_URL));
    }

    #[test]
    fn app_domain_passes_absence_through() {
        let cfg = build(&[]);
        assert!(cfg.env().is_declared("NEXT_PUBLIC_APP_DOMAIN"));
        assert_eq!(cfg.env().get("NEXT_PUBLIC_APP_DOMAIN"), None);
    }

    #[test]
    fn commit_tags_are_cleaned_and_default_to_empty() {
        let cfg = build(&[("GIT_COMMIT_TAGS", " refs/tags/v1.0.0 ")]);
        assert_eq!(cfg.env().get_str("GIT_COMMIT_TAGS"), Some("v1.0.0"));

        let cfg = build(&[]);
        assert_eq!(cfg.env().get_str("GIT_COMMIT_TAGS"), Some(""));
    }

    #[test]
    fn name_version_uses_release_tag() {
        let snap = EnvSnapshot::default();
        let cfg = ConfigBuilder::new(&snap, &demo())
            .release_tag("v1.2.3")
            .build_time(ts())
            .build();
        assert_eq!(cfg.env().get_str("NEXT_PUBLIC_APP_NAME"), Some("demo"));
        assert_eq!(cfg.env().get_str("NEXT_PUBLIC_APP_NAME_VERSION"), Some("demo-v1.2.3"));
    }

    #[test]
    fn name_version_derives_release_tag_from_commit_tags() {
        let cfg = build(&[("GIT_COMMIT_TAGS", "refs/tags/v2.0.0")]);
        assert_eq!(cfg.env().get_str("NEXT_PUBLIC_APP_NAME_VERSION"), Some("demo-v2.0.0"));
    }

    #[test]
    fn build_time_fields_share_one_instant() {
        let cfg = build(&[]);
        assert_eq!(
            cfg.env().get("NEXT_PUBLIC_APP_BUILD_TIMESTAMP"),
            Some(&EnvValue::Number(1_577_836_800_000))
        );
        assert_eq!(
            cfg.env().get_str("NEXT_PUBLIC_APP_BUILD_TIME"),
            Some("Wed Jan 01 2020 00:00:00 GMT+0000 (Coordinated Universal Time)")
        );
    }

    #[test]
    fn passthroughs_and_sentry_alias() {
        let cfg = build(&[
            ("SENTRY_DSN", "https://key@sentry.io/1"),
            ("VERCEL", "1"),
            ("VERCEL_ENV", "preview"),
            ("CI", "true"),
            ("GIT_COMMIT_REF", "main"),
            ("GITHUB_DISPATCH_TOKEN", "ghp_x"),
        ]);
        let env = cfg.env();
        assert_eq!(env.get_str("SENTRY_DSN"), Some("https://key@sentry.io/1"));
        assert_eq!(env.get_str("NEXT_PUBLIC_SENTRY_DSN"), Some("https://key@sentry.io/1"));
        assert_eq!(env.get_str("VERCEL"), Some("1"));
        assert_eq!(env.get_str("VERCEL_ENV"), Some("preview"));
        assert_eq!(env.get_str("CI"), Some("true"));
        assert_eq!(env.get_str("GIT_COMMIT_REF"), Some("main"));
        assert_eq!(env.get_str("GITHUB_DISPATCH_TOKEN"), Some("ghp_x"));
    }

    #[test]
    fn exports_the_full_key_set() {
        let cfg = build(&[]);
        assert_eq!(cfg.env().len(), 17);
        assert!(!cfg.env().is_declared("NODE_ENV"));
    }

    #[test]
    fn headers_are_the_fixed_table() {
        let cfg = build(&[]);
        assert_eq!(cfg.headers(), header_rules().as_slice());
    }

    #[test]
    fn same_inputs_give_same_output() {
        let pairs = [("GIT_COMMIT_SHA", SHA), ("VERCEL_URL", "x.vercel.app")];
        let a = build(&pairs).to_json_pretty().unwrap();
        let b = build(&pairs).to_json_pretty().unwrap();
        assert_eq!(a, b);
    }
}
