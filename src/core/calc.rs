use crate::config::{CalculationRule, Operation};
use crate::domain::model::FlatRecord;
use crate::utils::error::{ProbeError, Result};

impl Operation {
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operation::Add => lhs + rhs,
            Operation::Subtract => lhs - rhs,
            Operation::Multiply => lhs * rhs,
            Operation::Divide => lhs / rhs,
        }
    }
}

pub struct CalculationEngine;

impl CalculationEngine {
    /// Run every rule in declared order, appending one new field per rule.
    /// Later rules may reference fields produced by earlier ones. Results
    /// keep native f64 precision; rounding happens at aggregation.
    pub fn apply(record: &mut FlatRecord, rules: &[CalculationRule]) -> Result<()> {
        for rule in rules {
            let lhs = Self::operand(record, rule, &rule.operand1)?;
            let rhs = Self::operand(record, rule, &rule.operand2)?;

            if rule.operation == Operation::Divide && rhs == 0.0 {
                return Err(ProbeError::DivisionByZero {
                    result_field: rule.result_field.clone(),
                });
            }

            let result = rule.operation.apply(lhs, rhs);
            let value = serde_json::Number::from_f64(result).ok_or_else(|| {
                ProbeError::NonFiniteResult {
                    result_field: rule.result_field.clone(),
                }
            })?;

            record
                .data
                .insert(rule.result_field.clone(), serde_json::Value::Number(value));
        }

        Ok(())
    }

    fn operand(record: &FlatRecord, rule: &CalculationRule, name: &str) -> Result<f64> {
        record
            .numeric(name)
            .ok_or_else(|| ProbeError::MissingOperand {
                result_field: rule.result_field.clone(),
                operand: name.to_string(),
            })
    }
}
