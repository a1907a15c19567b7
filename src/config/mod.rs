pub mod cli;

use crate::output::template;
use crate::utils::error::{ProbeError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub config: GeneralConfig,
    pub check: CheckConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Per-fetch timeout in seconds.
    pub timeout: u64,
    /// Size of the concurrent fetch pool.
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,
}

fn default_concurrent_requests() -> usize {
    16
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Request path appended to every endpoint line.
    pub path: String,
    pub validate_properties: Vec<ValidationRule>,
    /// outputName -> sourceField projection applied to each response.
    pub extractions: HashMap<String, String>,
    #[serde(default)]
    pub calculations: Vec<CalculationRule>,
    #[serde(default)]
    pub aggregations: Vec<AggregationRule>,
    #[serde(default)]
    pub outputs: Vec<OutputSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRule {
    pub name: String,
    #[serde(rename = "type")]
    pub expected: FieldType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[serde(alias = "str")]
    String,
    #[serde(alias = "int", alias = "float")]
    Number,
    #[serde(alias = "bool")]
    Boolean,
}

impl FieldType {
    pub fn matches(self, value: &serde_json::Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRule {
    pub operation: Operation,
    #[serde(alias = "val1")]
    pub operand1: String,
    #[serde(alias = "val2")]
    pub operand2: String,
    #[serde(alias = "new_var")]
    pub result_field: String,
}

/// Closed set of calculation kinds. An operation name outside this set fails
/// at configuration load, never silently at runtime. Long-form names
/// (`addition`, `division`, ...) are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    #[serde(alias = "addition")]
    Add,
    #[serde(alias = "subtraction")]
    Subtract,
    #[serde(alias = "multiplication")]
    Multiply,
    #[serde(alias = "division")]
    Divide,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationRule {
    /// Group-by field tuple; empty means one global group.
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(rename = "type")]
    pub kind: AggregationType,
    pub value_field: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationType {
    SumBy,
    AverageBy,
}

impl AggregationType {
    /// Key under which the computed value lands in the aggregate row.
    pub fn result_key(self) -> &'static str {
        match self {
            AggregationType::SumBy => "sum",
            AggregationType::AverageBy => "average",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutputSpec {
    Console {
        template: String,
    },
    File {
        format: FileFormat,
        #[serde(alias = "name")]
        path: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Json,
    #[serde(alias = "yml")]
    Yaml,
}

impl MonitorConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ProbeError::IoError)?;
        Self::from_yaml_str(&content)
    }

    /// Parse from a YAML (or JSON — YAML is a superset) string.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        serde_yaml::from_str(&processed_content).map_err(|e| ProbeError::ConfigError {
            message: format!("config parsing error: {}", e),
        })
    }

    /// Substitute environment variables (e.g. ${API_HOST}) before parsing.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([A-Z][A-Z0-9_]*)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_positive_number("config.timeout", self.config.timeout as usize, 1)?;
        validate_positive_number(
            "config.concurrent_requests",
            self.config.concurrent_requests,
            1,
        )?;
        validate_non_empty_string("check.path", &self.check.path)?;

        if !self.check.path.starts_with('/') {
            return Err(ProbeError::InvalidConfigValueError {
                field: "check.path".to_string(),
                value: self.check.path.clone(),
                reason: "Request path must start with '/'".to_string(),
            });
        }

        if self.check.extractions.is_empty() {
            return Err(ProbeError::MissingConfigError {
                field: "check.extractions".to_string(),
            });
        }

        // Fields available to later pipeline stages, in declaration order.
        let mut produced: HashSet<&str> = self
            .check
            .extractions
            .keys()
            .map(String::as_str)
            .collect();

        for calc in &self.check.calculations {
            for operand in [&calc.operand1, &calc.operand2] {
                if !produced.contains(operand.as_str()) {
                    return Err(ProbeError::InvalidConfigValueError {
                        field: "check.calculations".to_string(),
                        value: operand.clone(),
                        reason: "Operand is not produced by extractions or an earlier calculation"
                            .to_string(),
                    });
                }
            }
            if !produced.insert(calc.result_field.as_str()) {
                return Err(ProbeError::InvalidConfigValueError {
                    field: "check.calculations".to_string(),
                    value: calc.result_field.clone(),
                    reason: "Result field would overwrite an existing field".to_string(),
                });
            }
        }

        // Keys an aggregate row can carry, across all aggregation rules.
        let mut renderable: HashSet<String> = HashSet::from(["metric".to_string()]);

        for agg in &self.check.aggregations {
            if !produced.contains(agg.value_field.as_str()) {
                return Err(ProbeError::InvalidConfigValueError {
                    field: "check.aggregations.value_field".to_string(),
                    value: agg.value_field.clone(),
                    reason: "Value field is not produced by the pipeline".to_string(),
                });
            }
            for field in &agg.fields {
                if !produced.contains(field.as_str()) {
                    return Err(ProbeError::InvalidConfigValueError {
                        field: "check.aggregations.fields".to_string(),
                        value: field.clone(),
                        reason: "Group-by field is not produced by the pipeline".to_string(),
                    });
                }
                renderable.insert(field.clone());
            }
            renderable.insert(agg.kind.result_key().to_string());
        }

        for output in &self.check.outputs {
            match output {
                OutputSpec::Console { template } => {
                    for placeholder in template::placeholders(template) {
                        if !renderable.contains(&placeholder) {
                            return Err(ProbeError::TemplateError { placeholder });
                        }
                    }
                }
                OutputSpec::File { path, .. } => {
                    validate_non_empty_string("check.outputs.path", path)?;
                }
            }
        }

        Ok(())
    }
}

impl Validate for MonitorConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
