use std::error::Error;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const BIN: &str = env!("CARGO_BIN_EXE_hostdmi");

/// Run hostdmi with tools that must never be reached
fn hostdmi(args: &[&str]) -> Result<Output, Box<dyn Error>> {
    let output = Command::new(BIN)
        .args(args)
        .env("HOSTDMI_VBOXMANAGE", "/nonexistent/VBoxManage")
        .env("HOSTDMI_DMIDECODE", "/nonexistent/dmidecode")
        .output()?;
    Ok(output)
}

#[test]
fn test_no_arguments_prints_usage() -> Result<(), Box<dyn Error>> {
    let output = hostdmi(&[])?;
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8(output.stdout)?.contains("Usage:"));
    Ok(())
}

#[test]
fn test_help_prints_usage() -> Result<(), Box<dyn Error>> {
    for flag in ["-h", "--help"] {
        let output = hostdmi(&[flag])?;
        assert_eq!(output.status.code(), Some(0));
        assert!(String::from_utf8(output.stdout)?.contains("Usage:"));
    }
    Ok(())
}

#[test]
fn test_two_vm_names_fail() -> Result<(), Box<dyn Error>> {
    let output = hostdmi(&["win10", "win11"])?;
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8(output.stderr)?.contains("Usage:"));
    Ok(())
}

#[test]
fn test_debug_without_vm_fails() -> Result<(), Box<dyn Error>> {
    let output = hostdmi(&["--debug"])?;
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8(output.stderr)?.contains("virtual machine name is required"));
    Ok(())
}

#[test]
fn test_missing_tools_are_listed() -> Result<(), Box<dyn Error>> {
    let output = hostdmi(&["win10"])?;
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("/nonexistent/VBoxManage"));
    assert!(stderr.contains("/nonexistent/dmidecode"));
    Ok(())
}

const FAKE_VBOXMANAGE: &str = r#"#!/bin/sh
case "$1" in
showvminfo)
    echo 'name="vm1"'
    echo 'firmware="EFI"'
    ;;
*)
    echo "$@" >> "$(dirname "$0")/vboxmanage.log"
    exit 1
    ;;
esac
"#;

const FAKE_DMIDECODE: &str = r#"#!/bin/sh
case "$1 $2" in
"-s chassis-type") echo "Laptop" ;;
"-s system-serial-number") echo "0042" ;;
"-s "*) echo "Host $2" ;;
"-t 0") printf 'BIOS Information\n\tBIOS Revision: 5.17\n\tFirmware Revision: 1.2\n' ;;
"-t 1") printf 'System Information\n\tSKU Number: SKU1\n\tFamily: Family1\n' ;;
"-t 2") printf 'Base Board Information\n\tLocation In Chassis: Slot 1\n\tType: Motherboard\n' ;;
*) exit 1 ;;
esac
"#;

const FAKE_SUDO: &str = "#!/bin/sh\nexec \"$@\"\n";

/// Create a directory holding stand-in VBoxManage, dmidecode and sudo
fn fake_tools(name: &str) -> Result<PathBuf, Box<dyn Error>> {
    let dir = std::env::temp_dir().join(format!("hostdmi-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir)?;
    for (program, script) in [
        ("VBoxManage", FAKE_VBOXMANAGE),
        ("dmidecode", FAKE_DMIDECODE),
        ("sudo", FAKE_SUDO),
    ] {
        let path = dir.join(program);
        fs::write(&path, script)?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    }
    Ok(dir)
}

fn hostdmi_with_tools(tools: &Path, args: &[&str]) -> Result<Output, Box<dyn Error>> {
    let output = Command::new(BIN)
        .args(args)
        .env("PATH", format!("{}:/usr/bin:/bin", tools.display()))
        .env_remove("HOSTDMI_VBOXMANAGE")
        .env_remove("HOSTDMI_DMIDECODE")
        .env_remove("LOG_LEVEL")
        .env_remove("RUST_LOG")
        .output()?;
    Ok(output)
}

#[test]
fn test_dry_run_prints_keys_without_writing() -> Result<(), Box<dyn Error>> {
    let tools = fake_tools("dry-run")?;
    let output = hostdmi_with_tools(&tools, &["--dry-run", "vm1"]);
    let wrote = tools.join("vboxmanage.log").exists();
    fs::remove_dir_all(&tools)?;
    let output = output?;

    let stdout = String::from_utf8(output.stdout)?;
    let stderr = String::from_utf8(output.stderr)?;
    assert_eq!(output.status.code(), Some(0), "stderr: {stderr}");
    assert!(!wrote, "setextradata was called");

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 30);
    assert!(lines.contains(&"VBoxInternal/Devices/efi/0/Config/DmiChassisType = 9"));
    assert!(lines.contains(&"VBoxInternal/Devices/efi/0/Config/DmiBoardBoardType = 10"));
    assert!(lines.contains(&"VBoxInternal/Devices/efi/0/Config/DmiBIOSReleaseMinor = 17"));
    assert!(lines.contains(&"VBoxInternal/Devices/efi/0/Config/DmiSystemSerial = string:0042"));
    assert!(lines.contains(&"VBoxInternal/Devices/efi/0/Config/DmiBoardLocInChass = Slot 1"));

    assert!(stderr.contains("Would write 30 DMI fields to VM 'vm1'"));
    assert!(!stderr.contains("Wrote"));
    Ok(())
}
