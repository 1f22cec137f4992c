/// Prefix of every VirtualBox device configuration key
pub const DEVICES_NAMESPACE: &str = "VBoxInternal/Devices";
/// Value VirtualBox interprets as an empty DMI string
pub const EMPTY_MARKER: &str = "<EMPTY>";
/// Prefix forcing VirtualBox to store a value as a string
pub const STRING_PREFIX: &str = "string:";
/// Command used to run hardware queries with elevated privileges
pub const ELEVATE_COMMAND: &str = "sudo";
/// Locale forced on every hardware query so its output can be parsed
pub const HARDENED_LOCALE: [(&str, &str); 3] = [("LC_ALL", "C"), ("LANG", "C"), ("LANGUAGE", "C")];
