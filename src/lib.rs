pub mod app;
pub mod builder;
pub mod cli;
pub mod clock;
pub mod config;
pub mod context;
pub mod emit;
pub mod env;
pub mod headers;
pub mod logger;
pub mod release;
pub mod report;
pub mod templates;

pub use builder::{ConfigBuilder, DerivedConfig};
pub use clock::BuildTimestamp;
pub use config::{Config, OutputFormat, PackageMeta, Shell};
pub use context::EnvSnapshot;
pub use env::{EnvValue, ExportedEnv};
pub use headers::{header_rules, resolve_headers, HeaderEntry, HeaderRule};
