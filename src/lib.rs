//! Command-line front-end for the pixiecore network boot server.
//!
//! This crate turns an invocation (subcommand, flags, `PIXIECORE_*`
//! environment variables) plus a set of boot-loader binaries supplied by the
//! embedding program into one validated, immutable [`ServerConfig`]. The
//! config is then moved into a [`BootService`], which runs the actual
//! DHCP/TFTP/HTTP machinery. This crate opens no sockets itself.
//!
//! ```ignore
//! fn main() -> ExitCode {
//!     let ipxe = FirmwareBinaries::new()
//!         .with(Firmware::X86Pc, include_bytes!("undionly.kpxe").to_vec());
//!     pixiecore::cli(&ipxe, &mut MyEngine::default())
//! }
//! ```
//!
//! # Dispatch
//!
//! Every invocation is first offered to the legacy handler, which recognizes
//! the v1 single-dash syntax (`pixiecore -kernel=vmlinuz ...`). If it matches,
//! the legacy handler runs the invocation to completion and the modern
//! command router is never built. Otherwise clap parses the modern
//! subcommands (`boot`, `api`).
//!
//! # Layer precedence
//!
//! ```text
//! Compiled defaults     #[config(default = ...)] on ServerFlags
//!        ↑ overridden by
//! Environment vars      PIXIECORE_LISTEN_ADDR, PIXIECORE_PORT, ...
//!        ↑ overridden by
//! Command-line flags    --listen-addr, --port, ...
//! ```
//!
//! Layers are sparse: a flag missing from one layer falls through to the one
//! below. A flag written on the command line, even with an empty value, is
//! never looked up in the environment. Environment variables are only
//! consulted for declared flags and the booter flags (`PIXIECORE_CMDLINE`,
//! `PIXIECORE_BOOTMSG`, `PIXIECORE_API_REQUEST_TIMEOUT`), and their values are
//! decoded exactly like the command line. `run` reads only the environment it
//! is given.
//!
//! # Firmware binaries
//!
//! The embedding program passes a [`FirmwareBinaries`] by reference. The
//! `--ipxe-bios`, `--ipxe-efi32` and `--ipxe-efi64` flags read a file and
//! replace the image for their firmware; other images pass through unchanged.
//!
//! # Error handling
//!
//! Every failure is fatal and reported once: the first problem found is
//! printed and the process exits with status 1 ([`PixiecoreError`] lists the
//! cases). Clap usage errors keep clap's status (2), and a failing boot
//! service exits with [`EXIT_SERVE_FAILURE`].

pub mod error;
pub mod types;

mod booter;
#[cfg(feature = "clap")]
mod cli;
mod config;
mod dispatch;
mod env;
mod firmware;
mod flags;
mod legacy;
mod logging;
mod overrides;
mod resolve;

pub use booter::{BooterArgs, DEFAULT_API_TIMEOUT, resolve_booter};
#[cfg(feature = "clap")]
pub use cli::{ApiArgs, BootArgs, Cli, Commands, ServerArgs};
pub use config::ServerConfig;
pub use dispatch::EXIT_SERVE_FAILURE;
#[cfg(feature = "clap")]
pub use dispatch::{cli, run};
pub use env::{ENV_PREFIX, env_var_name};
pub use error::{PixiecoreError, ValueSource};
pub use firmware::{FirmwareBinaries, merge_flag_binaries};
pub use flags::{FlagKind, FlagSpec, SERVER_FLAGS, ServerFlags};
pub use legacy::{Dispatch, is_legacy, try_legacy};
pub use resolve::{ResolveInput, resolve};
pub use types::{BootService, Booter, Firmware};
