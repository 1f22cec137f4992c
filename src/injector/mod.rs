
use std::collections::HashMap;

use thiserror::Error;

use crate::constants::DEVICES_NAMESPACE;
use crate::dmi::data::{DmiField, DmiQuery, Extract, FieldSource, FieldValue, RevisionPart, DMI_FIELDS};
use crate::dmi::{first_line, parse_revision, record_value, DmiError, HardwareInfoSource};
use crate::vbox::firmware::{self, FirmwareType};
use crate::vbox::{VboxError, VmConfigSink, VmInfoSource};

/// Errors copying DMI data into a virtual machine
#[derive(Debug, Error)]
pub enum InjectError {
    #[error(transparent)]
    Dmi(#[from] DmiError),
    #[error(transparent)]
    Vbox(#[from] VboxError),
}

/// Returns the extra-data key of a DMI field for the given firmware
pub fn config_key(firmware: FirmwareType, field: &str) -> String {
    format!("{DEVICES_NAMESPACE}/{}/0/Config/{field}", firmware.segment())
}

/// Reads host DMI fields, reusing each record dump across fields
struct Collector<'a, H: HardwareInfoSource> {
    hardware: &'a H,
    records: HashMap<u8, String>,
}

impl<'a, H: HardwareInfoSource> Collector<'a, H> {
    fn new(hardware: &'a H) -> Self {
        Self {
            hardware,
            records: HashMap::new(),
        }
    }

    async fn record(&mut self, record: u8) -> Result<&str, DmiError> {
        if !self.records.contains_key(&record) {
            let dump = self.hardware.query(&DmiQuery::Record(record)).await?;
            self.records.insert(record, dump);
        }
        Ok(self.records.get(&record).map(String::as_str).unwrap_or_default())
    }

    async fn extract(&mut self, extract: &Extract) -> Result<Option<String>, DmiError> {
        match extract {
            Extract::Keyword(keyword) => {
                let output = self.hardware.query(&DmiQuery::String(*keyword)).await?;
                Ok(Some(first_line(&output)))
            }
            Extract::Line { record, label } => {
                let dump = self.record(*record).await?;
                Ok(record_value(dump, label))
            }
        }
    }

    /// Returns the value of the field, or None if the host does not report it
    async fn value(&mut self, field: &DmiField) -> Result<Option<FieldValue>, DmiError> {
        let value = match &field.source {
            FieldSource::Literal(value) => Some(FieldValue::Text(value.to_string())),
            FieldSource::Text(extract) => self.extract(extract).await?.map(FieldValue::Text),
            FieldSource::Revision {
                record,
                label,
                part,
            } => {
                let dump = self.record(*record).await?;
                record_value(dump, label)
                    .as_deref()
                    .and_then(parse_revision)
                    .map(|(major, minor)| match part {
                        RevisionPart::Major => FieldValue::Integer(major),
                        RevisionPart::Minor => FieldValue::Integer(minor),
                    })
            }
            FieldSource::Enumerated(extract, table) => {
                self.extract(extract).await?.map(|label| match table.code(&label) {
                    Some(code) => FieldValue::Integer(code),
                    None => {
                        log::warn!(
                            "Unknown {table} '{label}' for {}, using 'Unknown'",
                            field.key
                        );
                        FieldValue::Integer(table.unknown_code())
                    }
                })
            }
        };
        Ok(value)
    }
}

/// Query every DMI field from the host. Overrides replace the host value of
/// their field without querying it.
pub async fn collect<H: HardwareInfoSource>(
    hardware: &H,
    overrides: &HashMap<&'static str, FieldValue>,
) -> Result<Vec<(&'static str, FieldValue)>, DmiError> {
    let mut collector = Collector::new(hardware);
    let mut fields = Vec::with_capacity(DMI_FIELDS.len());

    for field in DMI_FIELDS.iter() {
        if let Some(value) = overrides.get(field.key) {
            log::debug!("Using configured value for {}", field.key);
            fields.push((field.key, value.clone()));
            continue;
        }
        match collector.value(field).await? {
            Some(value) => {
                log::trace!("{} = {value}", field.key);
                fields.push((field.key, value));
            }
            None => log::warn!("Host does not report {}, leaving it unset", field.key),
        }
    }

    Ok(fields)
}

/// Write the collected fields into the VM configuration
pub async fn write<S: VmConfigSink>(
    sink: &S,
    vm: &str,
    firmware: FirmwareType,
    fields: &[(&'static str, FieldValue)],
) -> Result<(), VboxError> {
    for (field, value) in fields {
        let key = config_key(firmware, field);
        sink.set_extra_data(vm, &key, &value.to_string()).await?;
    }
    if sink.persists() {
        log::info!("Wrote {} DMI fields to VM '{vm}'", fields.len());
    } else {
        log::info!("Would write {} DMI fields to VM '{vm}'", fields.len());
    }
    Ok(())
}

/// Copy host DMI data into the named VM. Every field is read before the first
/// write so a failing query leaves the VM untouched.
pub async fn inject<V, H, S>(
    vm_info: &V,
    hardware: &H,
    sink: &S,
    vm: &str,
    overrides: &HashMap<&'static str, FieldValue>,
) -> Result<(), InjectError>
where
    V: VmInfoSource,
    H: HardwareInfoSource,
    S: VmConfigSink,
{
    let firmware = firmware::detect(vm_info, vm).await?;
    log::info!("Copying host DMI data into {firmware} firmware of VM '{vm}'");
    let fields = collect(hardware, overrides).await?;
    write(sink, vm, firmware, &fields).await?;
    Ok(())
}
