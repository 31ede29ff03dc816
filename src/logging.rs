//! Logger setup.
//!
//! In the browser, `log` records go to the devtools console and panics are
//! reported with a readable message. Native builds (tests) install nothing.

/// Install the console logger and panic hook. Safe to call more than once.
pub fn init(level: log::Level) {
    #[cfg(feature = "hydrate")]
    {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(level).is_err() {
            log::debug!("console logger already installed");
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = level;
    }
}
