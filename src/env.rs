use std::collections::{BTreeSet, HashMap};

use toml::Table;

use crate::error::{PixiecoreError, ValueSource};
use crate::flags::FlagSpec;

/// Prefix shared by every environment variable the overlay reads.
pub const ENV_PREFIX: &str = "PIXIECORE";

/// Environment variable consulted for a flag: `{PREFIX}_{NAME}`, upper-cased,
/// with every non-alphanumeric character replaced by `_`.
///
/// `("PIXIECORE", "listen-addr")` → `PIXIECORE_LISTEN_ADDR`
pub fn env_var_name(prefix: &str, flag: &str) -> String {
    let name: String = flag
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{prefix}_{name}")
}

/// Non-empty value of the variable for `flag`, with the variable's name.
pub(crate) fn lookup<'a>(
    prefix: &str,
    flag: &str,
    vars: &'a HashMap<String, String>,
) -> Option<(String, &'a str)> {
    let var = env_var_name(prefix, flag);
    let value = vars.get(&var).filter(|v| !v.is_empty())?;
    Some((var, value.as_str()))
}

/// Build a table of flag values from the environment, for flags whose long
/// name is not in `explicit`.
///
/// `explicit` holds every flag the command line mentioned, including ones
/// given an empty value, so a cleared flag is never refilled from the
/// environment. Only declared flags are looked up; unrelated `{PREFIX}_*`
/// variables are ignored. Empty values count as unset. Values go through the
/// same decoder as the command line.
///
/// Takes an iterator so tests can pass synthetic data instead of `std::env::vars()`.
pub fn env_to_table(
    prefix: &str,
    specs: &[FlagSpec],
    explicit: &BTreeSet<&str>,
    vars: impl IntoIterator<Item = (String, String)>,
) -> Result<Table, PixiecoreError> {
    let vars: HashMap<String, String> = vars.into_iter().collect();
    let mut table = Table::new();

    for spec in specs {
        if explicit.contains(spec.long) {
            continue;
        }
        let Some((var, raw)) = lookup(prefix, spec.long, &vars) else {
            continue;
        };
        let decoded = spec
            .decode(raw)
            .map_err(|reason| PixiecoreError::FlagParse {
                flag: spec.long.to_string(),
                origin: ValueSource::Env(var.clone()),
                value: raw.to_string(),
                reason,
            })?;
        if let Some(value) = decoded {
            table.insert(spec.key(), value);
        }
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::SERVER_FLAGS;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn overlay(pairs: &[(&str, &str)]) -> Result<Table, PixiecoreError> {
        env_to_table(ENV_PREFIX, SERVER_FLAGS, &BTreeSet::new(), vars(pairs))
    }

    #[test]
    fn var_names() {
        assert_eq!(env_var_name("PIXIECORE", "listen-addr"), "PIXIECORE_LISTEN_ADDR");
        assert_eq!(env_var_name("PIXIECORE", "ipxe-efi64"), "PIXIECORE_IPXE_EFI64");
        assert_eq!(env_var_name("PIXIECORE", "port"), "PIXIECORE_PORT");
        assert_eq!(env_var_name("X", "a.b c"), "X_A_B_C");
    }

    #[test]
    fn port_from_env() {
        let table = overlay(&[("PIXIECORE_PORT", "8080")]).unwrap();
        assert_eq!(table["port"].as_integer().unwrap(), 8080);
    }

    #[test]
    fn dashed_flag_from_env() {
        let table = overlay(&[
            ("PIXIECORE_LOG_TIMESTAMPS", "1"),
            ("PIXIECORE_LISTEN_ADDR", "10.0.0.1"),
        ])
        .unwrap();
        assert!(table["log_timestamps"].as_bool().unwrap());
        assert_eq!(table["listen_addr"].as_str().unwrap(), "10.0.0.1");
    }

    #[test]
    fn explicit_flags_are_not_looked_up() {
        let explicit = BTreeSet::from(["port"]);
        let table = env_to_table(
            ENV_PREFIX,
            SERVER_FLAGS,
            &explicit,
            vars(&[("PIXIECORE_PORT", "not-a-number")]),
        )
        .unwrap();
        assert!(!table.contains_key("port"));
    }

    #[test]
    fn cleared_flag_is_not_refilled() {
        let explicit = BTreeSet::from(["ipxe-bios"]);
        let table = env_to_table(
            ENV_PREFIX,
            SERVER_FLAGS,
            &explicit,
            vars(&[("PIXIECORE_IPXE_BIOS", "/from/env")]),
        )
        .unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn lookup_skips_empty_values() {
        let vars: HashMap<String, String> =
            vars(&[("PIXIECORE_CMDLINE", "console=ttyS0"), ("PIXIECORE_BOOTMSG", "")])
                .into_iter()
                .collect();
        assert_eq!(
            lookup(ENV_PREFIX, "cmdline", &vars),
            Some(("PIXIECORE_CMDLINE".to_string(), "console=ttyS0"))
        );
        assert_eq!(lookup(ENV_PREFIX, "bootmsg", &vars), None);
    }

    #[test]
    fn undeclared_vars_ignored() {
        let table = overlay(&[
            ("PIXIECORE_KERNEL", "/boot/vmlinuz"),
            ("PIXIECORE", "x"),
            ("OTHER_PORT", "1"),
        ])
        .unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn lowercase_var_not_matched() {
        let table = overlay(&[("pixiecore_port", "8080")]).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn empty_value_is_unset() {
        let table = overlay(&[("PIXIECORE_PORT", ""), ("PIXIECORE_IPXE_BIOS", "")]).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn bad_value_reports_variable() {
        let err = overlay(&[("PIXIECORE_DEBUG", "loud")]).unwrap_err();
        match err {
            PixiecoreError::FlagParse {
                flag, origin, value, ..
            } => {
                assert_eq!(flag, "debug");
                assert_eq!(origin, ValueSource::Env("PIXIECORE_DEBUG".into()));
                assert_eq!(value, "loud");
            }
            other => panic!("Expected FlagParse, got {other:?}"),
        }
    }
}
