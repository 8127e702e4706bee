//! Configuration command handler.
//!
//! Prints the resolved configuration as pretty JSON, each key carrying its value and
//! where it came from:
//!
//! ```json
//! {
//!   "starting_balance": { "value": 1000.0, "source": "default" },
//!   "iterations": { "value": 50000, "source": "env" },
//!   ...
//! }
//! ```

use std::io::Write;

use crate::config;
use crate::error::CliError;
use crate::ui;

/// Sources that were overridden are also noted on `err`, one line per key.
pub fn handle_cfg_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = config::load_with_sources()?;

    let config::ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "starting_balance": {
            "value": config.starting_balance,
            "source": sources.starting_balance,
        },
        "iterations": {
            "value": config.iterations,
            "source": sources.iterations,
        },
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "tie_share": {
            "value": config.tie_share,
            "source": sources.tie_share,
        },
        "threads": {
            "value": config.threads,
            "source": sources.threads,
        }
    });
    let json_str = serde_json::to_string_pretty(&display)?;
    writeln!(out, "{}", json_str)?;

    let overridden = [
        ("starting_balance", sources.starting_balance),
        ("iterations", sources.iterations),
        ("seed", sources.seed),
        ("tie_share", sources.tie_share),
        ("threads", sources.threads),
    ];
    for (key, source) in overridden {
        if source != config::ValueSource::Default {
            ui::display_warning(err, &format!("{} overridden by {:?}", key, source))?;
        }
    }
    Ok(())
}
