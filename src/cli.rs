//! Clap command router for the modern pixiecore syntax.
//!
//! The router only collects what the operator typed, as raw text. Server flags
//! and booter flags are decoded later, against the environment, so the command
//! line and `PIXIECORE_*` variables share the same rules and error reporting.

use clap::{Args, Parser, Subcommand};

use crate::booter::BooterArgs;

/// All-in-one network booting.
#[derive(Debug, Parser)]
#[command(
    name = "pixiecore",
    version,
    long_about = "Pixiecore is a tool to make network booting easy."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Boot a kernel and optional init ramdisks.
    #[command(args_override_self = true)]
    Boot(BootArgs),
    /// Boot machines using instructions from an API server.
    #[command(args_override_self = true)]
    Api(ApiArgs),
}

#[derive(Debug, Args)]
pub struct BootArgs {
    /// Kernel to boot (path or URL).
    pub kernel: String,

    /// Init ramdisks to pass to the kernel (paths or URLs).
    pub initrd: Vec<String>,

    /// Kernel commandline arguments.
    #[arg(long)]
    pub cmdline: Option<String>,

    /// Message to print on machines before booting.
    #[arg(long)]
    pub bootmsg: Option<String>,

    #[command(flatten)]
    pub flags: ServerArgs,
}

#[derive(Debug, Args)]
pub struct ApiArgs {
    /// URL of the API server.
    pub server: String,

    /// Timeout for API server requests, in seconds [default: 5].
    #[arg(long, value_name = "SECS")]
    pub api_request_timeout: Option<String>,

    #[command(flatten)]
    pub flags: ServerArgs,
}

impl Commands {
    /// Split into the booter this command asks for and its server flags.
    pub fn into_parts(self) -> (BooterArgs, ServerArgs) {
        match self {
            Commands::Boot(args) => (
                BooterArgs::Static {
                    kernel: args.kernel,
                    initrd: args.initrd,
                    cmdline: args.cmdline,
                    bootmsg: args.bootmsg,
                },
                args.flags,
            ),
            Commands::Api(args) => (
                BooterArgs::Api {
                    server: args.server,
                    api_request_timeout: args.api_request_timeout,
                },
                args.flags,
            ),
        }
    }
}

/// Server flags the operator wrote on the command line, undecoded.
///
/// Boolean flags alone mean true; an explicit value must be attached with `=`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct ServerArgs {
    /// Log more things that aren't directly related to booting a recognized client.
    #[arg(
        short,
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    debug: Option<String>,

    /// Add a timestamp to each log line.
    #[arg(
        short = 't',
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    log_timestamps: Option<String>,

    /// IPv4 address to listen on.
    #[arg(short, long, value_name = "ADDR")]
    listen_addr: Option<String>,

    /// Port to listen on for HTTP.
    #[arg(short, long, value_name = "NUM")]
    port: Option<String>,

    /// Path to an iPXE binary for BIOS/UNDI.
    #[arg(long, value_name = "PATH")]
    ipxe_bios: Option<String>,

    /// Path to an iPXE binary for 32-bit UEFI.
    #[arg(long, value_name = "PATH")]
    ipxe_efi32: Option<String>,

    /// Path to an iPXE binary for 64-bit UEFI.
    #[arg(long, value_name = "PATH")]
    ipxe_efi64: Option<String>,
}

impl ServerArgs {
    /// `(long_name, raw_value)` pairs for every flag given, in registry order.
    pub fn into_explicit(self) -> Vec<(String, String)> {
        let Self {
            debug,
            log_timestamps,
            listen_addr,
            port,
            ipxe_bios,
            ipxe_efi32,
            ipxe_efi64,
        } = self;
        [
            ("debug", debug),
            ("log-timestamps", log_timestamps),
            ("listen-addr", listen_addr),
            ("port", port),
            ("ipxe-bios", ipxe_bios),
            ("ipxe-efi32", ipxe_efi32),
            ("ipxe-efi64", ipxe_efi64),
        ]
        .into_iter()
        .filter_map(|(long, raw)| Some((long.to_string(), raw?)))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    use crate::flags::SERVER_FLAGS;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    fn explicit(args: &[&str]) -> Vec<(String, String)> {
        let (_, flags) = parse(args).command.into_parts();
        flags.into_explicit()
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn verify_command() {
        Cli::command().debug_assert();
    }

    #[test]
    fn boot_positionals() {
        let (booter, _) = parse(&["pixiecore", "boot", "vmlinuz", "initrd1", "initrd2"])
            .command
            .into_parts();
        assert_eq!(
            booter,
            BooterArgs::Static {
                kernel: "vmlinuz".into(),
                initrd: vec!["initrd1".into(), "initrd2".into()],
                cmdline: None,
                bootmsg: None,
            }
        );
    }

    #[test]
    fn boot_options() {
        let (booter, _) = parse(&[
            "pixiecore",
            "boot",
            "vmlinuz",
            "--cmdline",
            "console=ttyS0",
            "--bootmsg",
            "hello",
        ])
        .command
        .into_parts();
        match booter {
            BooterArgs::Static {
                cmdline, bootmsg, ..
            } => {
                assert_eq!(cmdline.as_deref(), Some("console=ttyS0"));
                assert_eq!(bootmsg.as_deref(), Some("hello"));
            }
            other => panic!("Expected Static, got {other:?}"),
        }
    }

    #[test]
    fn api_command() {
        let (booter, _) = parse(&[
            "pixiecore",
            "api",
            "http://boot.example:8080",
            "--api-request-timeout",
            "30",
        ])
        .command
        .into_parts();
        assert_eq!(
            booter,
            BooterArgs::Api {
                server: "http://boot.example:8080".into(),
                api_request_timeout: Some("30".into()),
            }
        );
    }

    #[test]
    fn api_timeout_left_raw() {
        let (booter, _) = parse(&["pixiecore", "api", "http://x", "--api-request-timeout", "abc"])
            .command
            .into_parts();
        assert!(matches!(
            booter,
            BooterArgs::Api { api_request_timeout: Some(raw), .. } if raw == "abc"
        ));
    }

    #[test]
    fn every_registry_flag_is_an_argument() {
        let cmd = Cli::command();
        for name in ["boot", "api"] {
            let sub = cmd.find_subcommand(name).unwrap();
            for spec in SERVER_FLAGS {
                assert!(
                    sub.get_arguments().any(|arg| arg.get_long() == Some(spec.long)),
                    "{name} lacks --{}",
                    spec.long
                );
            }
        }
    }

    #[test]
    fn every_flag_reaches_explicit() {
        let got = explicit(&[
            "pixiecore",
            "boot",
            "vmlinuz",
            "-d",
            "-t",
            "-l",
            "10.0.0.1",
            "-p",
            "8080",
            "--ipxe-bios",
            "a",
            "--ipxe-efi32",
            "b",
            "--ipxe-efi64",
            "c",
        ]);
        let names: Vec<&str> = got.iter().map(|(long, _)| long.as_str()).collect();
        let registry: Vec<&str> = SERVER_FLAGS.iter().map(|spec| spec.long).collect();
        assert_eq!(names, registry);
    }

    #[test]
    fn no_server_flags_means_nothing_explicit() {
        assert!(explicit(&["pixiecore", "boot", "vmlinuz"]).is_empty());
    }

    #[test]
    fn long_and_short_flags_collected_raw() {
        let got = explicit(&[
            "pixiecore",
            "api",
            "http://x",
            "-p",
            "9000",
            "--listen-addr",
            "10.0.0.1",
            "--ipxe-bios",
            "/srv/undionly.kpxe",
        ]);
        assert_eq!(
            got,
            pairs(&[
                ("listen-addr", "10.0.0.1"),
                ("port", "9000"),
                ("ipxe-bios", "/srv/undionly.kpxe"),
            ])
        );
    }

    #[test]
    fn bare_bool_flag_is_true() {
        let got = explicit(&["pixiecore", "boot", "-d", "vmlinuz"]);
        assert_eq!(got, pairs(&[("debug", "true")]));
    }

    #[test]
    fn bool_flag_with_value() {
        let got = explicit(&["pixiecore", "boot", "vmlinuz", "--log-timestamps=false"]);
        assert_eq!(got, pairs(&[("log-timestamps", "false")]));
    }

    #[test]
    fn undecodable_values_pass_through_router() {
        let got = explicit(&["pixiecore", "boot", "vmlinuz", "--port", "eighty"]);
        assert_eq!(got, pairs(&[("port", "eighty")]));
    }

    #[test]
    fn repeated_flag_last_wins() {
        let got = explicit(&["pixiecore", "boot", "vmlinuz", "-p", "1", "-p", "2"]);
        assert_eq!(got, pairs(&[("port", "2")]));
    }

    #[test]
    fn missing_subcommand_errors() {
        assert!(Cli::try_parse_from(["pixiecore"]).is_err());
    }

    #[test]
    fn unknown_flag_errors() {
        assert!(Cli::try_parse_from(["pixiecore", "boot", "vmlinuz", "--tftp-port", "69"]).is_err());
    }

    #[test]
    fn boot_requires_kernel() {
        assert!(Cli::try_parse_from(["pixiecore", "boot"]).is_err());
    }
}
