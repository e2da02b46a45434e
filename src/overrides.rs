//! Decode flags written on the command line into a `toml::Table` layer.
//!
//! The router hands over raw `(long_name, text)` pairs; each is decoded with
//! its registry entry so the command line and the environment share one set of
//! decoding rules.

use toml::Table;

use crate::error::{PixiecoreError, ValueSource};
use crate::flags;

/// Convert explicit `(long_name, raw_value)` flags into a table keyed by field name.
///
/// If a flag appears more than once, the last one wins.
pub fn overrides_to_table(entries: &[(String, String)]) -> Result<Table, PixiecoreError> {
    let mut table = Table::new();
    for (long, raw) in entries {
        let spec = flags::lookup(long).ok_or_else(|| PixiecoreError::InvalidValue {
            key: long.clone(),
            reason: "not a server flag".into(),
        })?;
        let decoded = spec
            .decode(raw)
            .map_err(|reason| PixiecoreError::FlagParse {
                flag: long.clone(),
                origin: ValueSource::CommandLine,
                value: raw.clone(),
                reason,
            })?;
        match decoded {
            Some(value) => {
                table.insert(spec.key(), value);
            }
            None => {
                table.remove(&spec.key());
            }
        }
    }
    Ok(table)
}
