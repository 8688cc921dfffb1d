pub mod build_info;

use dirs::home_dir;
use std::{env, path::PathBuf, sync::Once};

const DEFAULT_DIR_NAME: &str = ".formhub_display";
const CONFIG_FILE: &str = "config.json";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
///
/// `RUST_LOG` directives are honoured; without them the crate logs at `info`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "formhub_display=info".parse() {
            filter = filter.add_directive(directive);
        }

        // A subscriber may already be installed by an embedding application.
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// Returns the application data directory, defaulting to `~/.formhub_display`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("FORMHUB_DISPLAY_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Path of the configuration file inside `base`.
pub fn config_file_in(base: &std::path::Path) -> PathBuf {
    base.join(CONFIG_FILE)
}
