use std::error::Error;
use std::fmt;
use std::time::Duration;

use crate::config::ServerConfig;

/// Boot client classes, as reported by the client architecture DHCP option (93).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Firmware {
    /// Legacy BIOS with a PXE/UNDI stack.
    X86Pc,
    /// 32-bit UEFI.
    Efi32,
    /// 64-bit UEFI.
    Efi64,
    /// EFI byte code. Only available through pre-registered binaries.
    EfiBc,
}

impl Firmware {
    pub const ALL: [Firmware; 4] = [
        Firmware::X86Pc,
        Firmware::Efi32,
        Firmware::Efi64,
        Firmware::EfiBc,
    ];

    /// Client architecture code carried in DHCP option 93.
    pub fn client_arch(self) -> u16 {
        match self {
            Firmware::X86Pc => 0,
            Firmware::Efi32 => 6,
            Firmware::Efi64 => 7,
            Firmware::EfiBc => 9,
        }
    }

    /// Long name of the flag that supplies an iPXE binary for this firmware.
    pub fn ipxe_flag(self) -> Option<&'static str> {
        match self {
            Firmware::X86Pc => Some("ipxe-bios"),
            Firmware::Efi32 => Some("ipxe-efi32"),
            Firmware::Efi64 => Some("ipxe-efi64"),
            Firmware::EfiBc => None,
        }
    }
}

impl fmt::Display for Firmware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Firmware::X86Pc => "x86 BIOS",
            Firmware::Efi32 => "EFI32",
            Firmware::Efi64 => "EFI64",
            Firmware::EfiBc => "EFI bytecode",
        };
        f.write_str(name)
    }
}

/// What the selected subcommand asks the boot service to hand out.
#[derive(Debug, Clone, PartialEq)]
pub enum Booter {
    /// Boot every client into the same kernel and initrds.
    Static {
        kernel: String,
        initrd: Vec<String>,
        cmdline: Option<String>,
        message: Option<String>,
    },
    /// Ask an HTTP API server what each client should boot.
    Api { url: String, timeout: Duration },
}

/// The boot-service engine that consumes a resolved configuration.
///
/// Implementations own the sockets. This crate only builds the inputs.
pub trait BootService {
    fn serve(
        &mut self,
        config: ServerConfig,
        booter: Booter,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn only_three_firmwares_have_flags() {
        let flagged: Vec<_> = Firmware::ALL
            .iter()
            .filter_map(|fw| fw.ipxe_flag())
            .collect();
        assert_eq!(flagged, vec!["ipxe-bios", "ipxe-efi32", "ipxe-efi64"]);
    }

    #[test]
    fn client_arch_codes_are_distinct() {
        let codes: BTreeSet<u16> = Firmware::ALL.iter().map(|fw| fw.client_arch()).collect();
        assert_eq!(codes.len(), Firmware::ALL.len());
        assert_eq!(Firmware::Efi64.client_arch(), 7);
    }
}
