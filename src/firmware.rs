//! Boot-loader binaries keyed by firmware type.
//!
//! The embedding program builds a [`FirmwareBinaries`] (usually from binaries
//! compiled into it) and passes it to the CLI. [`merge_flag_binaries`] then
//! overlays any `--ipxe-*` files the operator named.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::PixiecoreError;
use crate::flags::ServerFlags;
use crate::types::Firmware;

/// Immutable boot-loader images, one per firmware type.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct FirmwareBinaries {
    images: BTreeMap<Firmware, Arc<[u8]>>,
}

impl FirmwareBinaries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image, replacing any previous one for the same firmware.
    pub fn with(mut self, firmware: Firmware, image: impl Into<Arc<[u8]>>) -> Self {
        self.images.insert(firmware, image.into());
        self
    }

    pub fn get(&self, firmware: Firmware) -> Option<&[u8]> {
        self.images.get(&firmware).map(|image| &image[..])
    }

    pub fn contains(&self, firmware: Firmware) -> bool {
        self.images.contains_key(&firmware)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Images in firmware order.
    pub fn iter(&self) -> impl Iterator<Item = (Firmware, &[u8])> {
        self.images.iter().map(|(fw, image)| (*fw, &image[..]))
    }
}

impl fmt::Debug for FirmwareBinaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(fw, image)| (fw, image.len())))
            .finish()
    }
}

/// Read a whole file, or fail with the path in the error.
pub fn read_binary(path: &Path) -> Result<Vec<u8>, PixiecoreError> {
    std::fs::read(path).map_err(|e| PixiecoreError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Overlay flag-supplied files on the pre-registered binaries.
///
/// A file named by a flag replaces the pre-registered image for its firmware.
/// Firmwares without a flag keep their pre-registered image. The first
/// unreadable file aborts the merge.
pub fn merge_flag_binaries(
    registered: &FirmwareBinaries,
    flags: &ServerFlags,
) -> Result<FirmwareBinaries, PixiecoreError> {
    let mut merged = registered.clone();
    for firmware in Firmware::ALL {
        if let Some(path) = flags.ipxe_path(firmware) {
            let image = read_binary(path)?;
            merged = merged.with(firmware, image);
        }
    }
    Ok(merged)
}
