//! The validated server configuration handed to the boot service.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

use crate::error::PixiecoreError;
use crate::firmware::{self, FirmwareBinaries};
use crate::flags::ServerFlags;

/// Resolved and validated configuration. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    address: Option<Ipv4Addr>,
    http_port: u16,
    debug: bool,
    log_timestamps: bool,
    ipxe: FirmwareBinaries,
}

impl ServerConfig {
    /// Validate resolved flags and merge firmware binaries.
    ///
    /// Checks run in order and the first failure is returned: port range, then
    /// listen address family, then firmware file reads.
    pub fn from_flags(
        flags: &ServerFlags,
        registered: &FirmwareBinaries,
    ) -> Result<Self, PixiecoreError> {
        let http_port = validate_port(flags.port)?;
        let address = validate_listen_addr(flags.listen_addr)?;
        let ipxe = firmware::merge_flag_binaries(registered, flags)?;

        Ok(Self {
            address,
            http_port,
            debug: flags.debug,
            log_timestamps: flags.log_timestamps,
            ipxe,
        })
    }

    /// Listen address, if the operator chose one.
    pub fn address(&self) -> Option<Ipv4Addr> {
        self.address
    }

    /// Address to bind: the chosen one, or every IPv4 interface.
    pub fn bind_address(&self) -> Ipv4Addr {
        self.address.unwrap_or(Ipv4Addr::UNSPECIFIED)
    }

    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn log_timestamps(&self) -> bool {
        self.log_timestamps
    }

    pub fn ipxe(&self) -> &FirmwareBinaries {
        &self.ipxe
    }
}

impl fmt::Display for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "listen-addr = {}", self.bind_address())?;
        writeln!(f, "port = {}", self.http_port)?;
        writeln!(f, "debug = {}", self.debug)?;
        write!(f, "log-timestamps = {}", self.log_timestamps)?;
        for (firmware, image) in self.ipxe.iter() {
            write!(
                f,
                "\nipxe[{firmware}, arch {}] = {} bytes",
                firmware.client_arch(),
                image.len()
            )?;
        }
        Ok(())
    }
}

pub(crate) fn validate_port(port: i64) -> Result<u16, PixiecoreError> {
    match u16::try_from(port) {
        Ok(p) if p > 0 => Ok(p),
        _ => Err(PixiecoreError::InvalidPort(port)),
    }
}

pub(crate) fn validate_listen_addr(
    addr: Option<IpAddr>,
) -> Result<Option<Ipv4Addr>, PixiecoreError> {
    match addr {
        None => Ok(None),
        Some(IpAddr::V4(v4)) => Ok(Some(v4)),
        // `::ffff:a.b.c.d` is an IPv4 address written in IPv6 form.
        Some(IpAddr::V6(v6)) => v6
            .to_ipv4_mapped()
            .map(Some)
            .ok_or(PixiecoreError::NonIpv4ListenAddr(IpAddr::V6(v6))),
    }
}
