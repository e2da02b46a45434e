//! The flag registry: every server option, how its values decode, and its default.
//!
//! [`SERVER_FLAGS`] is the list the environment overlay and the resolver walk;
//! the router declares one argument per entry. Defaults live on [`ServerFlags`] as
//! confique `#[config(default)]` attributes, so a flag missing from every
//! layer falls back to them during resolution.

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use confique::Config;
use toml::Value;

use crate::types::Firmware;

/// How the raw text of a flag is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    Bool,
    Ip,
    Int,
    Path,
}

/// A declared server flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSpec {
    /// Long name without the leading `--`.
    pub long: &'static str,
    pub kind: FlagKind,
}

pub const SERVER_FLAGS: &[FlagSpec] = &[
    FlagSpec {
        long: "debug",
        kind: FlagKind::Bool,
    },
    FlagSpec {
        long: "log-timestamps",
        kind: FlagKind::Bool,
    },
    FlagSpec {
        long: "listen-addr",
        kind: FlagKind::Ip,
    },
    FlagSpec {
        long: "port",
        kind: FlagKind::Int,
    },
    FlagSpec {
        long: "ipxe-bios",
        kind: FlagKind::Path,
    },
    FlagSpec {
        long: "ipxe-efi32",
        kind: FlagKind::Path,
    },
    FlagSpec {
        long: "ipxe-efi64",
        kind: FlagKind::Path,
    },
];

impl FlagSpec {
    /// Field name of this flag on [`ServerFlags`] (`log-timestamps` → `log_timestamps`).
    pub fn key(&self) -> String {
        self.long.replace('-', "_")
    }

    /// Decode raw flag text into a typed value.
    ///
    /// `Ok(None)` means the value is present but counts as unset (an empty path).
    pub fn decode(&self, raw: &str) -> Result<Option<Value>, String> {
        match self.kind {
            FlagKind::Bool => parse_bool(raw).map(|b| Some(Value::Boolean(b))),
            FlagKind::Ip => raw
                .parse::<IpAddr>()
                .map(|ip| Some(Value::String(ip.to_string())))
                .map_err(|e| e.to_string()),
            FlagKind::Int => raw
                .parse::<i64>()
                .map(|i| Some(Value::Integer(i)))
                .map_err(|e| e.to_string()),
            FlagKind::Path if raw.is_empty() => Ok(None),
            FlagKind::Path => Ok(Some(Value::String(raw.to_string()))),
        }
    }
}

/// Look up a registry entry by long name.
pub fn lookup(long: &str) -> Option<&'static FlagSpec> {
    SERVER_FLAGS.iter().find(|spec| spec.long == long)
}

/// Accepts the spellings `strconv.ParseBool`-style tools accept.
pub fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err("expected a boolean (true/false/1/0)".to_string()),
    }
}

/// Resolved values of the server flags, before validation.
#[derive(Config, Debug, Clone, PartialEq)]
pub struct ServerFlags {
    /// Log more things that aren't directly related to booting a recognized client.
    #[config(default = false)]
    pub debug: bool,

    /// Add a timestamp to each log line.
    #[config(default = false)]
    pub log_timestamps: bool,

    /// Address to listen on. Unset means every IPv4 interface.
    pub listen_addr: Option<IpAddr>,

    /// HTTP port.
    #[config(default = 80)]
    pub port: i64,

    /// iPXE binary for BIOS/UNDI clients.
    pub ipxe_bios: Option<PathBuf>,

    /// iPXE binary for 32-bit UEFI clients.
    pub ipxe_efi32: Option<PathBuf>,

    /// iPXE binary for 64-bit UEFI clients.
    pub ipxe_efi64: Option<PathBuf>,
}

impl ServerFlags {
    /// Path flag supplying a binary for `firmware`, if set.
    pub fn ipxe_path(&self, firmware: Firmware) -> Option<&Path> {
        match firmware {
            Firmware::X86Pc => self.ipxe_bios.as_deref(),
            Firmware::Efi32 => self.ipxe_efi32.as_deref(),
            Firmware::Efi64 => self.ipxe_efi64.as_deref(),
            Firmware::EfiBc => None,
        }
    }
}
