use crate::{builder::DerivedConfig, cli, context::looks_sensitive_key};

pub fn build_report(cfg: &DerivedConfig, mode: cli::ReportMode, redact: bool) -> String {
    match mode {
        cli::ReportMode::Off => String::new(),
        cli::ReportMode::Summary => summary(cfg, redact),
        cli::ReportMode::Full => full(cfg, redact),
    }
}

fn summary(cfg: &DerivedConfig, redact: bool) -> String {
    let mut out = String::new();

    out.push_str("deploycfg report (summary)\n");
    out.push_str("==========================\n");

    let env = cfg.env();
    out.push_str(&format!(
        "env: declared={} defined={}\n",
        env.len(),
        env.defined().count()
    ));
    for key in [
        "NEXT_PUBLIC_APP_NAME_VERSION",
        "NEXT_PUBLIC_APP_BASE_URL",
        "GIT_COMMIT_SHA_SHORT",
        "GIT_COMMIT_TAGS",
        "VERCEL_ENV",
    ] {
        out.push_str(&format!("  {} = {}\n", key, shown(cfg, key, redact)));
    }

    out.push_str(&format!("\nheaders: rules={}\n", cfg.headers().len()));
    for rule in cfg.headers() {
        let keys: Vec<&str> = rule.headers.iter().map(|h| h.key.as_str()).collect();
        out.push_str(&format!("  - {} ({})\n", rule.source, keys.join(", ")));
    }

    out
}

fn full(cfg: &DerivedConfig, redact: bool) -> String {
    let mut out = String::new();

    out.push_str("deploycfg report (full)\n");
    out.push_str("=======================\n");

    out.push_str("\nenv:\n");
    for (k, _) in cfg.env().iter() {
        out.push_str(&format!("  {} = {}\n", k, shown(cfg, k, redact)));
    }

    out.push_str("\nheaders:\n");
    for (idx, rule) in cfg.headers().iter().enumerate() {
        out.push_str(&format!("  [{}] {}\n", idx, rule.source));
        for h in &rule.headers {
            out.push_str(&format!("      {}: {}\n", h.key, h.value));
        }
    }

    out
}

fn shown(cfg: &DerivedConfig, key: &str, redact: bool) -> String {
    match cfg.env().get(key) {
        None => "<unset>".to_string(),
        Some(_) if redact && looks_sensitive_key(key) => "<redacted>".to_string(),
        Some(v) => v.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cli::ReportMode, ConfigBuilder, EnvSnapshot, PackageMeta};

    fn cfg() -> DerivedConfig {
        let snap = EnvSnapshot::from_pairs([
            ("SENTRY_DSN", "https://key@sentry.io/1"),
            ("GIT_COMMIT_SHA", "abcdef0123456789"),
        ]);
        let pkg = PackageMeta::new("demo", None);
        ConfigBuilder::new(&snap, &pkg).release_tag("v1").build()
    }

    #[test]
    fn off_is_empty() {
        assert!(build_report(&cfg(), ReportMode::Off, true).is_empty());
    }

    #[test]
    fn summary_lists_key_values_and_rules() {
        let out = build_report(&cfg(), ReportMode::Summary, true);
        assert!(out.contains("env: declared=17"));
        assert!(out.contains("NEXT_PUBLIC_APP_NAME_VERSION = demo-v1"));
        assert!(out.contains("GIT_COMMIT_SHA_SHORT = abcdef01"));
        assert!(out.contains("VERCEL_ENV = <unset>"));
        assert!(out.contains("headers: rules=4"));
        assert!(out.contains("  - /static/fonts/* (Cache-Control)"));
    }

    #[test]
    fn full_redacts_secrets_unless_disabled() {
        let out = build_report(&cfg(), ReportMode::Full, true);
        assert!(out.contains("SENTRY_DSN = <redacted>"));
        assert!(out.contains("NEXT_PUBLIC_SENTRY_DSN = <redacted>"));
        assert!(!out.contains("key@sentry.io"));
        assert!(out.contains("      Referrer-Policy: no-referrer-when-downgrade"));

        let raw = build_report(&cfg(), ReportMode::Full, false);
        assert!(raw.contains("SENTRY_DSN = https://key@sentry.io/1"));
    }
}
