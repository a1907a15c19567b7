use crate::domain::model::{FlatRecord, RawResponse};
use crate::utils::error::{ProbeError, Result};
use std::collections::HashMap;

pub struct FieldExtractor;

impl FieldExtractor {
    /// Pure projection: copy `response[sourceField]` into the record under
    /// `outputName` for every mapping pair. Validation already guaranteed
    /// presence of required properties; a missing source field here means the
    /// extraction map and the validation rules disagree.
    pub fn project(response: &RawResponse, mapping: &HashMap<String, String>) -> Result<FlatRecord> {
        let mut record = FlatRecord::default();

        for (output_name, source_field) in mapping {
            let value = response
                .get(source_field)
                .ok_or_else(|| ProbeError::ExtractionError {
                    field: source_field.clone(),
                })?;
            record.data.insert(output_name.clone(), value.clone());
        }

        Ok(record)
    }
}
