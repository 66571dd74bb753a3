use regex::Regex;
use std::{collections::BTreeMap, sync::OnceLock};

/// Variables the builder reads from the environment.
pub const INPUT_VARS: &[&str] = &[
    "GIT_COMMIT_SHA",
    "GIT_COMMIT_REF",
    "GIT_COMMIT_TAGS",
    "NODE_ENV",
    "NEXT_PUBLIC_APP_STAGE",
    "NEXT_PUBLIC_CUSTOMER_REF",
    "VERCEL",
    "VERCEL_ENV",
    "VERCEL_URL",
    "CI",
    "GITHUB_DISPATCH_TOKEN",
    "SENTRY_DSN",
];

/// Read-only view of the environment visible to a build.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Snapshot the current process environment. Non UTF-8 entries are skipped.
    pub fn from_process() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self { vars }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Like [`get`](Self::get) but treats an empty value as absent.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|s| !s.is_empty())
    }

    /// Dump of the variables the builder reads. Secret-looking values are
    /// masked when `redact` is set.
    pub fn debug_dump(&self, redact: bool) -> String {
        let mut out = String::new();

        out.push_str("deploycfg environment snapshot (debug)\n");
        out.push_str("======================================\n");
        out.push_str(&format!("total vars: {}\n", self.vars.len()));

        out.push_str("\ninputs:\n");
        for k in INPUT_VARS {
            match self.get(k) {
                None => out.push_str(&format!("  {} = <unset>\n", k)),
                Some(_) if redact && looks_sensitive_key(k) => {
                    out.push_str(&format!("  {} = <redacted>\n", k))
                }
                Some(v) => out.push_str(&format!("  {} = {}\n", k, v)),
            }
        }

        out
    }
}

/// Render an optional value the way diagnostics show it.
pub(crate) fn show(v: Option<&str>) -> &str {
    v.unwrap_or("<unset>")
}

pub fn looks_sensitive_key(k: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?i)(TOKEN|SECRET|PASSWORD|PRIVATE|DSN|API_KEY)")
            .expect("static regex is valid")
    });
    re.is_match(k)
}
