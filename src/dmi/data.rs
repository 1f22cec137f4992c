use std::fmt::Display;

use crate::constants::{EMPTY_MARKER, STRING_PREFIX};

use super::tables::EnumTable;

/// SMBIOS record types dumped with `dmidecode -t`
pub const RECORD_BIOS: u8 = 0;
pub const RECORD_SYSTEM: u8 = 1;
pub const RECORD_BASEBOARD: u8 = 2;

/// A single question asked of the hardware info source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DmiQuery {
    /// Named string keyword (`dmidecode -s <keyword>`)
    String(&'static str),
    /// Full dump of an SMBIOS record type (`dmidecode -t <type>`)
    Record(u8),
}

impl DmiQuery {
    /// Command line arguments for dmidecode
    pub fn args(&self) -> Vec<String> {
        match self {
            DmiQuery::String(keyword) => vec!["-s".to_string(), keyword.to_string()],
            DmiQuery::Record(record) => vec!["-t".to_string(), record.to_string()],
        }
    }
}

impl Display for DmiQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DmiQuery::String(keyword) => write!(f, "string '{keyword}'"),
            DmiQuery::Record(record) => write!(f, "record type {record}"),
        }
    }
}

/// Where the text of a field comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extract {
    /// The first line of a string keyword query
    Keyword(&'static str),
    /// The value of a `Label: value` line in a record dump
    Line { record: u8, label: &'static str },
}

/// Half of a `major.minor` revision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionPart {
    Major,
    Minor,
}

/// How the value of a field is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    Text(Extract),
    Revision {
        record: u8,
        label: &'static str,
        part: RevisionPart,
    },
    Enumerated(Extract, EnumTable),
    Literal(&'static str),
}

impl FieldSource {
    /// Returns true if VirtualBox expects a number for this field
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            FieldSource::Revision { .. } | FieldSource::Enumerated(..)
        )
    }
}

/// A DMI value written to the VM configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(u32),
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Integer(value) => write!(f, "{value}"),
            FieldValue::Text(value) if value.is_empty() => write!(f, "{EMPTY_MARKER}"),
            // Digit-only strings would otherwise be stored as integers
            FieldValue::Text(value) if value.bytes().all(|b| b.is_ascii_digit()) => {
                write!(f, "{STRING_PREFIX}{value}")
            }
            FieldValue::Text(value) => write!(f, "{value}"),
        }
    }
}

/// A VirtualBox DMI configuration key and the host data feeding it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmiField {
    pub key: &'static str,
    pub source: FieldSource,
}

const fn keyword(key: &'static str, keyword: &'static str) -> DmiField {
    DmiField {
        key,
        source: FieldSource::Text(Extract::Keyword(keyword)),
    }
}

const fn line(key: &'static str, record: u8, label: &'static str) -> DmiField {
    DmiField {
        key,
        source: FieldSource::Text(Extract::Line { record, label }),
    }
}

const fn revision(key: &'static str, label: &'static str, part: RevisionPart) -> DmiField {
    DmiField {
        key,
        source: FieldSource::Revision {
            record: RECORD_BIOS,
            label,
            part,
        },
    }
}

/// Every field copied from the host, in write order
pub static DMI_FIELDS: [DmiField; 30] = [
    keyword("DmiBIOSVendor", "bios-vendor"),
    keyword("DmiBIOSVersion", "bios-version"),
    keyword("DmiBIOSReleaseDate", "bios-release-date"),
    revision("DmiBIOSReleaseMajor", "BIOS Revision", RevisionPart::Major),
    revision("DmiBIOSReleaseMinor", "BIOS Revision", RevisionPart::Minor),
    revision("DmiBIOSFirmwareMajor", "Firmware Revision", RevisionPart::Major),
    revision("DmiBIOSFirmwareMinor", "Firmware Revision", RevisionPart::Minor),
    keyword("DmiSystemVendor", "system-manufacturer"),
    keyword("DmiSystemProduct", "system-product-name"),
    keyword("DmiSystemVersion", "system-version"),
    keyword("DmiSystemSerial", "system-serial-number"),
    line("DmiSystemSKU", RECORD_SYSTEM, "SKU Number"),
    line("DmiSystemFamily", RECORD_SYSTEM, "Family"),
    keyword("DmiSystemUuid", "system-uuid"),
    keyword("DmiBoardVendor", "baseboard-manufacturer"),
    keyword("DmiBoardProduct", "baseboard-product-name"),
    keyword("DmiBoardVersion", "baseboard-version"),
    keyword("DmiBoardSerial", "baseboard-serial-number"),
    keyword("DmiBoardAssetTag", "baseboard-asset-tag"),
    line("DmiBoardLocInChass", RECORD_BASEBOARD, "Location In Chassis"),
    DmiField {
        key: "DmiBoardBoardType",
        source: FieldSource::Enumerated(
            Extract::Line {
                record: RECORD_BASEBOARD,
                label: "Type",
            },
            EnumTable::BoardType,
        ),
    },
    keyword("DmiChassisVendor", "chassis-manufacturer"),
    DmiField {
        key: "DmiChassisType",
        source: FieldSource::Enumerated(Extract::Keyword("chassis-type"), EnumTable::ChassisType),
    },
    keyword("DmiChassisVersion", "chassis-version"),
    keyword("DmiChassisSerial", "chassis-serial-number"),
    keyword("DmiChassisAssetTag", "chassis-asset-tag"),
    keyword("DmiProcManufacturer", "processor-manufacturer"),
    keyword("DmiProcVersion", "processor-version"),
    // The OEM strings of the host cannot be emulated
    DmiField {
        key: "DmiOEMVBoxVer",
        source: FieldSource::Literal(EMPTY_MARKER),
    },
    DmiField {
        key: "DmiOEMVBoxRev",
        source: FieldSource::Literal(EMPTY_MARKER),
    },
];

/// Look up a field by its configuration key
pub fn find_field(key: &str) -> Option<&'static DmiField> {
    DMI_FIELDS.iter().find(|field| field.key == key)
}
