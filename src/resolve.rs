//! Flag resolution pipeline: merge the flag layers and produce [`ServerFlags`].
//!
//! Operates on pre-loaded data (`ResolveInput`) with no I/O, making the full
//! pipeline testable with synthetic inputs. Steps:
//!
//! 1. Decode explicit command-line flags
//! 2. Decode environment variables for flags the command line left unset
//! 3. Overlay the command line on the environment (explicit wins)
//! 4. Deserialize the merged table into the confique layer
//! 5. Let confique fill in defaults

use std::collections::BTreeSet;

use confique::Config;
use toml::{Table, Value};

use crate::env;
use crate::error::PixiecoreError;
use crate::flags::{SERVER_FLAGS, ServerFlags};
use crate::overrides;

/// All pre-loaded data needed to resolve the server flags. No I/O happens here.
pub struct ResolveInput {
    /// Flags written on the command line as `(long_name, raw_value)`, in order.
    pub explicit: Vec<(String, String)>,
    /// Raw environment variable pairs (pass `std::env::vars().collect()` or synthetic data).
    pub env_vars: Vec<(String, String)>,
    /// Env var prefix (e.g. `"PIXIECORE"`). `None` means env disabled.
    pub env_prefix: Option<String>,
}

/// Resolve flag values with precedence explicit flag > environment > default.
pub fn resolve(input: ResolveInput) -> Result<ServerFlags, PixiecoreError> {
    let explicit = overrides::overrides_to_table(&input.explicit)?;
    // Flags given an empty value are absent from `explicit` but still count as given.
    let given: BTreeSet<&str> = input.explicit.iter().map(|(long, _)| long.as_str()).collect();

    let mut merged = match &input.env_prefix {
        Some(prefix) => env::env_to_table(prefix, SERVER_FLAGS, &given, input.env_vars)?,
        None => Table::new(),
    };
    for (key, value) in explicit {
        merged.insert(key, value);
    }

    let layer: <ServerFlags as Config>::Layer = Value::Table(merged)
        .try_into()
        .map_err(|e: toml::de::Error| PixiecoreError::InvalidValue {
            key: "<merged>".into(),
            reason: e.to_string(),
        })?;

    ServerFlags::builder()
        .preloaded(layer)
        .load()
        .map_err(PixiecoreError::from)
}
