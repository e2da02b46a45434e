//! Booter selection from a subcommand's own flags.
//!
//! `--cmdline`, `--bootmsg` and `--api-request-timeout` belong to one
//! subcommand each, so they sit outside the server flag registry. They still
//! follow the same rules: the command line wins, then `PIXIECORE_<NAME>` from
//! the injected environment, then the default.

use std::collections::HashMap;
use std::time::Duration;

use crate::env;
use crate::error::{PixiecoreError, ValueSource};
use crate::types::Booter;

/// API request timeout when neither the flag nor the environment sets one.
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(5);

/// What the operator asked to boot, as written. Nothing is decoded yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BooterArgs {
    Static {
        kernel: String,
        initrd: Vec<String>,
        cmdline: Option<String>,
        bootmsg: Option<String>,
    },
    Api {
        server: String,
        api_request_timeout: Option<String>,
    },
}

/// Fill unset booter flags from the environment and decode them.
pub fn resolve_booter(
    args: BooterArgs,
    env_vars: &[(String, String)],
    env_prefix: Option<&str>,
) -> Result<Booter, PixiecoreError> {
    let vars: HashMap<String, String> = env_vars.iter().cloned().collect();
    let pick = |flag: &str, explicit: Option<String>| -> Option<(String, ValueSource)> {
        if let Some(value) = explicit {
            return Some((value, ValueSource::CommandLine));
        }
        let (var, value) = env::lookup(env_prefix?, flag, &vars)?;
        Some((value.to_string(), ValueSource::Env(var)))
    };

    match args {
        BooterArgs::Static {
            kernel,
            initrd,
            cmdline,
            bootmsg,
        } => Ok(Booter::Static {
            kernel,
            initrd,
            cmdline: pick("cmdline", cmdline).map(|(value, _)| value),
            message: pick("bootmsg", bootmsg).map(|(value, _)| value),
        }),
        BooterArgs::Api {
            server,
            api_request_timeout,
        } => {
            let timeout = match pick("api-request-timeout", api_request_timeout) {
                Some((raw, origin)) => {
                    let secs = raw
                        .parse::<u64>()
                        .map_err(|e| PixiecoreError::FlagParse {
                            flag: "api-request-timeout".into(),
                            origin,
                            value: raw.clone(),
                            reason: e.to_string(),
                        })?;
                    Duration::from_secs(secs)
                }
                None => DEFAULT_API_TIMEOUT,
            };
            Ok(Booter::Api {
                url: server,
                timeout,
            })
        }
    }
}
