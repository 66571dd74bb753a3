use chrono::{DateTime, TimeZone, Utc};

/// The instant a build was started. Captured once and passed down so the
/// derived config does not read the wall clock on its own. The default is
/// the Unix epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildTimestamp(DateTime<Utc>);

impl BuildTimestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Returns `None` when `ms` is outside chrono's representable range.
    pub fn from_millis(ms: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(ms).single().map(Self)
    }

    pub fn millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Long human-readable form, e.g.
    /// `Sun Oct 18 2026 09:30:00 GMT+0000 (Coordinated Universal Time)`.
    pub fn display_string(&self) -> String {
        self.0
            .format("%a %b %d %Y %H:%M:%S GMT+0000 (Coordinated Universal Time)")
            .to_string()
    }
}

impl From<DateTime<Utc>> for BuildTimestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}
