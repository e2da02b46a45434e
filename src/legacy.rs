//! Detection and handling of the deprecated v1 command line.
//!
//! Pixiecore v1 took Go-style single-dash flags and no subcommands:
//!
//! ```text
//! pixiecore -kernel=vmlinuz -initrd=initrd.img -cmdline='console=ttyS0'
//! pixiecore -api http://bootapi:8080 -port 8000
//! ```
//!
//! Detection is a pure check on the arguments. When it matches, the legacy
//! path owns the whole invocation and the modern router is never built.

use std::net::IpAddr;
use std::time::Duration;

use crate::booter::DEFAULT_API_TIMEOUT;
use crate::config::ServerConfig;
use crate::dispatch;
use crate::error::{PixiecoreError, ValueSource};
use crate::firmware::FirmwareBinaries;
use crate::flags::{self, ServerFlags};
use crate::types::{BootService, Booter};

/// Result of offering an invocation to the legacy handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The legacy handler ran the invocation; exit with this status.
    Handled(u8),
    /// Not legacy syntax; the modern router takes over.
    NotHandled,
}

const V1_FLAGS: &[&str] = &[
    "kernel",
    "initrd",
    "cmdline",
    "bootmsg",
    "api",
    "api-timeout",
    "listen-addr",
    "port",
    "debug",
];

/// Single-dash v1 flag name of `arg`, if it is one.
fn v1_flag_name(arg: &str) -> Option<&'static str> {
    let name = arg.strip_prefix('-')?;
    if name.starts_with('-') {
        return None;
    }
    let name = name.split_once('=').map_or(name, |(name, _)| name);
    V1_FLAGS.iter().copied().find(|flag| *flag == name)
}

/// Whether `args` (without the program name) use the v1 syntax.
///
/// The first argument must be a v1 flag and either `-kernel` or `-api` must
/// appear somewhere.
pub fn is_legacy(args: &[String]) -> bool {
    let Some(first) = args.first() else {
        return false;
    };
    if v1_flag_name(first).is_none() {
        return false;
    }
    args.iter()
        .filter_map(|arg| v1_flag_name(arg))
        .any(|name| name == "kernel" || name == "api")
}

/// Offer an invocation to the legacy handler. Runs it to completion if it matches.
pub fn try_legacy<S: BootService>(
    args: &[String],
    ipxe: &FirmwareBinaries,
    service: &mut S,
) -> Dispatch {
    if !is_legacy(args) {
        return Dispatch::NotHandled;
    }

    let (config, booter) = match build(args, ipxe) {
        Ok(parts) => parts,
        Err(e) => return Dispatch::Handled(dispatch::fatal(&e)),
    };
    crate::logging::init(&config);
    log::warn!(
        "the single-dash v1 command line is deprecated, see `pixiecore --help` for the current syntax"
    );
    Dispatch::Handled(dispatch::hand_off(service, config, booter))
}

#[derive(Debug, PartialEq)]
struct LegacyArgs {
    kernel: Option<String>,
    initrd: Vec<String>,
    cmdline: Option<String>,
    bootmsg: Option<String>,
    api: Option<String>,
    api_timeout: u64,
    listen_addr: Option<String>,
    port: i64,
    debug: bool,
}

impl Default for LegacyArgs {
    fn default() -> Self {
        Self {
            kernel: None,
            initrd: Vec::new(),
            cmdline: None,
            bootmsg: None,
            api: None,
            api_timeout: DEFAULT_API_TIMEOUT.as_secs(),
            listen_addr: None,
            port: 80,
            debug: false,
        }
    }
}

fn invalid(flag: &str, value: &str, reason: impl ToString) -> PixiecoreError {
    PixiecoreError::FlagParse {
        flag: flag.to_string(),
        origin: ValueSource::CommandLine,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse(args: &[String]) -> Result<LegacyArgs, PixiecoreError> {
    let mut parsed = LegacyArgs::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let name = v1_flag_name(arg)
            .ok_or_else(|| PixiecoreError::Legacy(format!("unexpected argument {arg:?}")))?;
        let inline = arg.split_once('=').map(|(_, value)| value.to_string());

        if name == "debug" {
            parsed.debug = match inline {
                Some(raw) => flags::parse_bool(&raw).map_err(|e| invalid(name, &raw, e))?,
                None => true,
            };
            continue;
        }

        let value = match inline {
            Some(value) => value,
            None => iter
                .next()
                .cloned()
                .ok_or_else(|| PixiecoreError::Legacy(format!("flag -{name} needs a value")))?,
        };

        match name {
            "kernel" => parsed.kernel = Some(value),
            "initrd" => {
                parsed.initrd = value
                    .split(',')
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            }
            "cmdline" => parsed.cmdline = Some(value),
            "bootmsg" => parsed.bootmsg = Some(value),
            "api" => parsed.api = Some(value),
            "api-timeout" => {
                parsed.api_timeout = value.parse::<u64>().map_err(|e| invalid(name, &value, e))?
            }
            "listen-addr" => parsed.listen_addr = Some(value),
            "port" => parsed.port = value.parse::<i64>().map_err(|e| invalid(name, &value, e))?,
            other => return Err(PixiecoreError::Legacy(format!("unsupported flag -{other}"))),
        }
    }

    Ok(parsed)
}

fn build(
    args: &[String],
    ipxe: &FirmwareBinaries,
) -> Result<(ServerConfig, Booter), PixiecoreError> {
    let parsed = parse(args)?;

    let booter = match (parsed.kernel, parsed.api) {
        (Some(_), Some(_)) => {
            return Err(PixiecoreError::Legacy(
                "-kernel and -api are mutually exclusive".into(),
            ));
        }
        (Some(kernel), None) => Booter::Static {
            kernel,
            initrd: parsed.initrd,
            cmdline: parsed.cmdline,
            message: parsed.bootmsg,
        },
        (None, Some(url)) => Booter::Api {
            url,
            timeout: Duration::from_secs(parsed.api_timeout),
        },
        (None, None) => {
            return Err(PixiecoreError::Legacy("one of -kernel or -api is required".into()));
        }
    };

    let listen_addr = parsed
        .listen_addr
        .map(|raw| raw.parse::<IpAddr>().map_err(|e| invalid("listen-addr", &raw, e)))
        .transpose()?;

    let flags = ServerFlags {
        debug: parsed.debug,
        log_timestamps: false,
        listen_addr,
        port: parsed.port,
        ipxe_bios: None,
        ipxe_efi32: None,
        ipxe_efi64: None,
    };
    let config = ServerConfig::from_flags(&flags, ipxe)?;

    Ok((config, booter))
}
