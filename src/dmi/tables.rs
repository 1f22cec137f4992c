use std::fmt::Display;

/// SMBIOS baseboard types, ordered by their code starting at 1
pub static BOARD_TYPES: [&str; 13] = [
    "Unknown",
    "Other",
    "Server Blade",
    "Connectivity Switch",
    "System Management Module",
    "Processor Module",
    "I/O Module",
    "Memory Module",
    "Daughter Board",
    "Motherboard",
    "Processor+Memory Module",
    "Processor+I/O Module",
    "Interconnect Board",
];

/// SMBIOS chassis types, ordered by their code starting at 1
pub static CHASSIS_TYPES: [&str; 36] = [
    "Other",
    "Unknown",
    "Desktop",
    "Low Profile Desktop",
    "Pizza Box",
    "Mini Tower",
    "Tower",
    "Portable",
    "Laptop",
    "Notebook",
    "Hand Held",
    "Docking Station",
    "All In One",
    "Sub Notebook",
    "Space-saving",
    "Lunch Box",
    "Main Server Chassis",
    "Expansion Chassis",
    "Sub Chassis",
    "Bus Expansion Chassis",
    "Peripheral Chassis",
    "RAID Chassis",
    "Rack Mount Chassis",
    "Sealed-case PC",
    "Multi-system",
    "CompactPCI",
    "AdvancedTCA",
    "Blade",
    "Blade Enclosing",
    "Tablet",
    "Convertible",
    "Detachable",
    "IoT Gateway",
    "Embedded PC",
    "Mini PC",
    "Stick PC",
];

/// Enumerated DMI fields that VirtualBox expects as a numeric code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumTable {
    ChassisType,
    BoardType,
}

impl EnumTable {
    /// Labels of the table in code order
    pub fn entries(&self) -> &'static [&'static str] {
        match self {
            EnumTable::ChassisType => &CHASSIS_TYPES,
            EnumTable::BoardType => &BOARD_TYPES,
        }
    }

    /// Returns the 1-based code of the given label, if the label is known
    pub fn code(&self, label: &str) -> Option<u32> {
        let label = label.trim();
        self.entries()
            .iter()
            .position(|entry| *entry == label)
            .map(|index| index as u32 + 1)
    }

    /// Code used when the host reports a label missing from the table
    pub fn unknown_code(&self) -> u32 {
        // Both tables carry an "Unknown" entry
        self.code("Unknown").unwrap_or(1)
    }
}

impl Display for EnumTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            EnumTable::ChassisType => "chassis type",
            EnumTable::BoardType => "board type",
        };
        write!(f, "{}", value)
    }
}
