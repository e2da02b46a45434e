//! Top-level control flow for one invocation.
//!
//! ```text
//! Start ─┬─ legacy syntax ──▶ LegacyHandled (exit)
//!        └─ modern router ──▶ resolve ──▶ validate ─┬─▶ ConfigReady (hand off)
//!                                                   └─▶ Fatal (exit 1)
//! ```

use crate::config::ServerConfig;
use crate::error::PixiecoreError;
use crate::types::{BootService, Booter};

/// Exit status when the boot service itself fails.
pub const EXIT_SERVE_FAILURE: u8 = 2;

/// Usage error status, for a clap status that doesn't fit in a process exit code.
#[cfg(feature = "clap")]
const EXIT_USAGE: u8 = 2;

/// Report a fatal configuration error and return its exit status.
pub(crate) fn fatal(err: &PixiecoreError) -> u8 {
    eprintln!("Error: {err}");
    err.exit_code()
}

/// Hand a validated configuration to the boot service and return the exit status.
pub(crate) fn hand_off<S: BootService>(service: &mut S, config: ServerConfig, booter: Booter) -> u8 {
    log::debug!(
        "resolved configuration: {}",
        config.to_string().replace('\n', ", ")
    );
    log::debug!("booter: {booter:?}");
    match service.serve(config, booter) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{e}");
            EXIT_SERVE_FAILURE
        }
    }
}

#[cfg(feature = "clap")]
pub use self::modern::{cli, run};

#[cfg(feature = "clap")]
mod modern {
    use std::ffi::OsString;
    use std::process::ExitCode;

    use clap::Parser;

    use super::{EXIT_USAGE, fatal, hand_off};
    use crate::booter::{self, BooterArgs};
    use crate::cli::{Cli, ServerArgs};
    use crate::config::ServerConfig;
    use crate::env::ENV_PREFIX;
    use crate::error::PixiecoreError;
    use crate::firmware::FirmwareBinaries;
    use crate::legacy::{self, Dispatch};
    use crate::resolve::{self, ResolveInput};
    use crate::types::{BootService, Booter};

    /// Run the pixiecore command line against the process arguments and environment.
    pub fn cli<S: BootService>(ipxe: &FirmwareBinaries, service: &mut S) -> ExitCode {
        let env_vars = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));
        run(std::env::args_os(), env_vars, ipxe, service)
    }

    /// Run one invocation with explicit inputs. `args` includes the program name.
    pub fn run<A, E, S>(args: A, env_vars: E, ipxe: &FirmwareBinaries, service: &mut S) -> ExitCode
    where
        A: IntoIterator,
        A::Item: Into<OsString>,
        E: IntoIterator<Item = (String, String)>,
        S: BootService,
    {
        ExitCode::from(run_status(args, env_vars, ipxe, service))
    }

    pub(crate) fn run_status<A, E, S>(
        args: A,
        env_vars: E,
        ipxe: &FirmwareBinaries,
        service: &mut S,
    ) -> u8
    where
        A: IntoIterator,
        A::Item: Into<OsString>,
        E: IntoIterator<Item = (String, String)>,
        S: BootService,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

        // Non UTF-8 arguments can't be v1 flags.
        let utf8: Option<Vec<String>> = args
            .iter()
            .skip(1)
            .map(|arg| arg.to_str().map(str::to_string))
            .collect();
        if let Some(legacy_args) = utf8
            && let Dispatch::Handled(status) = legacy::try_legacy(&legacy_args, ipxe, service)
        {
            return status;
        }

        let cli = match Cli::try_parse_from(&args) {
            Ok(cli) => cli,
            Err(e) => {
                let _ = e.print();
                return u8::try_from(e.exit_code()).unwrap_or(EXIT_USAGE);
            }
        };

        let (requested, flags) = cli.command.into_parts();
        let (config, booter) = match configure(requested, flags, env_vars.into_iter().collect(), ipxe)
        {
            Ok(resolved) => resolved,
            Err(e) => return fatal(&e),
        };

        crate::logging::init(&config);
        hand_off(service, config, booter)
    }

    /// Decode every layer, then validate. Parse errors come before validation errors.
    fn configure(
        requested: BooterArgs,
        flags: ServerArgs,
        env_vars: Vec<(String, String)>,
        ipxe: &FirmwareBinaries,
    ) -> Result<(ServerConfig, Booter), PixiecoreError> {
        let booter = booter::resolve_booter(requested, &env_vars, Some(ENV_PREFIX))?;
        let flags = resolve::resolve(ResolveInput {
            explicit: flags.into_explicit(),
            env_vars,
            env_prefix: Some(ENV_PREFIX.to_string()),
        })?;
        let config = ServerConfig::from_flags(&flags, ipxe)?;
        Ok((config, booter))
    }

}
