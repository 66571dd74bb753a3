//! Logger setup honours `RUST_LOG` when no level flag is given. Kept in its
//! own test binary because a logger can only be installed once per process.

use deploycfg::logger::init_logger;
use log::Level;

#[test]
fn rust_log_enables_debug_without_level_flag() {
    std::env::set_var("RUST_LOG", "debug");
    init_logger(None).unwrap();

    assert!(log::log_enabled!(target: "deploycfg::builder", Level::Debug));
}
