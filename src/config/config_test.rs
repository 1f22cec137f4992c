use std::error::Error;
use std::io::Write;

use crate::config::{Config, LoadError};
use crate::dmi::data::FieldValue;

#[test]
fn test_load_overrides() -> Result<(), Box<dyn Error>> {
    let config = Config::from_yaml(
        r#"
overrides:
  DmiOEMVBoxVer: "vboxVer_6.1.50"
  DmiSystemSerial: "0042"
  DmiChassisType: "10"
"#
        .to_string(),
    )?;

    let overrides = config.overrides()?;
    assert_eq!(overrides.len(), 3);
    assert_eq!(
        overrides.get("DmiOEMVBoxVer"),
        Some(&FieldValue::Text("vboxVer_6.1.50".to_string()))
    );
    assert_eq!(
        overrides.get("DmiSystemSerial"),
        Some(&FieldValue::Text("0042".to_string()))
    );
    assert_eq!(overrides.get("DmiChassisType"), Some(&FieldValue::Integer(10)));

    Ok(())
}

#[test]
fn test_empty_config() -> Result<(), Box<dyn Error>> {
    let config = Config::from_yaml("{}".to_string())?;
    assert!(config.overrides()?.is_empty());
    Ok(())
}

#[test]
fn test_unknown_field_is_rejected() {
    let config = Config::from_yaml("overrides:\n  DmiBogus: x\n".to_string()).unwrap();
    let result = config.overrides();
    assert!(matches!(result, Err(LoadError::UnknownField(ref key)) if key == "DmiBogus"));
}

#[test]
fn test_invalid_number_is_rejected() {
    let config =
        Config::from_yaml("overrides:\n  DmiBoardBoardType: Motherboard\n".to_string()).unwrap();
    let result = config.overrides();
    assert!(matches!(result, Err(LoadError::InvalidNumber { .. })));
}

#[test]
fn test_load_from_path() -> Result<(), Box<dyn Error>> {
    let path = std::env::temp_dir().join(format!("hostdmi-config-{}.yaml", std::process::id()));
    let mut file = std::fs::File::create(&path)?;
    writeln!(file, "overrides:\n  DmiBIOSVendor: American Megatrends Inc.")?;
    drop(file);

    let config = Config::from_yaml_path(&path);
    std::fs::remove_file(&path)?;
    let overrides = config?.overrides()?;
    assert_eq!(
        overrides.get("DmiBIOSVendor"),
        Some(&FieldValue::Text("American Megatrends Inc.".to_string()))
    );

    Ok(())
}

#[test]
fn test_missing_file_is_an_io_error() {
    let path = std::env::temp_dir().join("hostdmi-config-does-not-exist.yaml");
    let result = Config::from_yaml_path(&path);
    assert!(matches!(result, Err(LoadError::IoError(_))));
}
