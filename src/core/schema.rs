use crate::config::ValidationRule;
use crate::domain::model::RawResponse;
use crate::utils::error::{ProbeError, Result};

pub struct SchemaValidator;

impl SchemaValidator {
    /// Check `response` against every rule and collect all violations into
    /// one report. Any violation skips the whole response; partial records
    /// would corrupt downstream aggregation.
    pub fn validate(url: &str, response: &RawResponse, rules: &[ValidationRule]) -> Result<()> {
        let mut violations = Vec::new();

        for rule in rules {
            match response.get(&rule.name) {
                None => violations.push(format!("property '{}' is not available", rule.name)),
                Some(value) if is_falsy(value) => {
                    violations.push(format!("property '{}' is empty", rule.name))
                }
                Some(value) if !rule.expected.matches(value) => violations.push(format!(
                    "property '{}' is not of type {}",
                    rule.name, rule.expected
                )),
                Some(_) => {}
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ProbeError::ValidationError {
                url: url.to_string(),
                violations,
            })
        }
    }
}

// Required properties must carry a usable value: null, false, 0 and "" all
// fail validation.
fn is_falsy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Bool(b) => !b,
        serde_json::Value::Number(n) => n.as_f64() == Some(0.0),
        serde_json::Value::String(s) => s.is_empty(),
        _ => false,
    }
}
