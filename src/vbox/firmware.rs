use std::fmt::Display;
use std::str::FromStr;

use super::{VboxError, VmInfoSource};

/// Firmware emulated by a virtual machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirmwareType {
    Bios,
    Uefi,
}

impl FirmwareType {
    /// Device name of the firmware in the VirtualBox configuration tree
    pub fn segment(&self) -> &'static str {
        match self {
            FirmwareType::Bios => "pcbios",
            FirmwareType::Uefi => "efi",
        }
    }

    /// Find the `firmware` entry of a machine-readable VM description
    pub fn from_machine_info(info: &str) -> Result<Self, VboxError> {
        let value = info
            .lines()
            .find_map(|line| line.trim().strip_prefix("firmware="))
            .map(|value| value.trim().trim_matches('"'))
            .unwrap_or_default();
        value.parse()
    }
}

impl FromStr for FirmwareType {
    type Err = VboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BIOS" => Ok(FirmwareType::Bios),
            "EFI" => Ok(FirmwareType::Uefi),
            _ => Err(VboxError::UnsupportedFirmware(s.to_string())),
        }
    }
}

impl Display for FirmwareType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            FirmwareType::Bios => "bios",
            FirmwareType::Uefi => "uefi",
        };
        write!(f, "{}", value)
    }
}

/// Returns the firmware type configured for the given VM
pub async fn detect<V: VmInfoSource>(source: &V, vm: &str) -> Result<FirmwareType, VboxError> {
    let info = source.machine_info(vm).await?;
    let firmware = FirmwareType::from_machine_info(&info)?;
    log::debug!("Detected {firmware} firmware for VM '{vm}'");
    Ok(firmware)
}
