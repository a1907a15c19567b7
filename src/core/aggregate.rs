use crate::config::{AggregationRule, AggregationType};
use crate::domain::model::{value_to_string, AggregateRecord, FlatRecord};
use std::collections::BTreeMap;

struct Group {
    key_values: Vec<serde_json::Value>,
    values: Vec<f64>,
}

pub struct Aggregator;

impl Aggregator {
    /// Group `records` by the value tuple at `rule.fields` and reduce
    /// `rule.value_field` per group. Keying a BTreeMap by the rendered tuple
    /// is equivalent to sorting by the grouping key and collapsing contiguous
    /// runs, so groups come out in sorted-key order.
    pub fn aggregate(records: &[FlatRecord], rule: &AggregationRule) -> Vec<AggregateRecord> {
        let mut groups: BTreeMap<Vec<String>, Group> = BTreeMap::new();

        for record in records {
            // Config validation guarantees the value field for every
            // surviving record; anything else was dropped upstream.
            let Some(value) = record.numeric(&rule.value_field) else {
                continue;
            };

            let mut sort_key = Vec::with_capacity(rule.fields.len());
            let mut key_values = Vec::with_capacity(rule.fields.len());
            for field in &rule.fields {
                let field_value = record
                    .data
                    .get(field)
                    .cloned()
                    .unwrap_or(serde_json::Value::Null);
                sort_key.push(value_to_string(&field_value));
                key_values.push(field_value);
            }

            groups
                .entry(sort_key)
                .or_insert_with(|| Group {
                    key_values,
                    values: Vec::new(),
                })
                .values
                .push(value);
        }

        groups
            .into_values()
            .map(|group| {
                let total: f64 = group.values.iter().sum();
                let result = match rule.kind {
                    AggregationType::SumBy => total,
                    AggregationType::AverageBy => total / group.values.len() as f64,
                };

                let mut fields = serde_json::Map::new();
                for (name, field_value) in rule.fields.iter().zip(group.key_values) {
                    fields.insert(name.clone(), field_value);
                }
                fields.insert(
                    rule.kind.result_key().to_string(),
                    serde_json::Value::from(round3(result)),
                );
                fields.insert(
                    "metric".to_string(),
                    serde_json::Value::String(rule.value_field.clone()),
                );

                AggregateRecord { fields }
            })
            .collect()
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn record(pairs: &[(&str, serde_json::Value)]) -> FlatRecord {
        FlatRecord {
            data: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<HashMap<_, _>>(),
        }
    }

    fn rule(fields: &[&str], kind: AggregationType, value_field: &str) -> AggregationRule {
        AggregationRule {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            kind,
            value_field: value_field.to_string(),
        }
    }

    #[test]
    fn test_average_over_single_global_group() {
        let records = vec![
            record(&[("x", json!(50))]),
            record(&[("x", json!(30))]),
        ];

        let rows = Aggregator::aggregate(&records, &rule(&[], AggregationType::AverageBy, "x"));

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("average").unwrap(), &json!(40.0));
        assert_eq!(rows[0].get("metric").unwrap(), &json!("x"));
    }

    #[test]
    fn test_sum_by_groups_in_sorted_key_order() {
        let records = vec![
            record(&[("svc", json!("db")), ("x", json!(10.0))]),
            record(&[("svc", json!("api")), ("x", json!(1.5))]),
            record(&[("svc", json!("db")), ("x", json!(2.25))]),
        ];

        let rows = Aggregator::aggregate(&records, &rule(&["svc"], AggregationType::SumBy, "x"));

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("svc").unwrap(), &json!("api"));
        assert_eq!(rows[0].get("sum").unwrap(), &json!(1.5));
        assert_eq!(rows[1].get("svc").unwrap(), &json!("db"));
        assert_eq!(rows[1].get("sum").unwrap(), &json!(12.25));
    }

    #[test]
    fn test_results_are_rounded_to_three_decimals() {
        let records = vec![
            record(&[("x", json!(1.0))]),
            record(&[("x", json!(1.0))]),
            record(&[("x", json!(0.0))]),
        ];

        let rows = Aggregator::aggregate(&records, &rule(&[], AggregationType::AverageBy, "x"));

        // 2/3 rounds to 0.667, not 0.6666...
        assert_eq!(rows[0].get("average").unwrap(), &json!(0.667));
    }

    #[test]
    fn test_sum_equals_average_times_count() {
        let records = vec![
            record(&[("x", json!(3.1))]),
            record(&[("x", json!(4.7))]),
            record(&[("x", json!(9.2))]),
        ];

        let sums = Aggregator::aggregate(&records, &rule(&[], AggregationType::SumBy, "x"));
        let avgs = Aggregator::aggregate(&records, &rule(&[], AggregationType::AverageBy, "x"));

        let sum = sums[0].get("sum").unwrap().as_f64().unwrap();
        let average = avgs[0].get("average").unwrap().as_f64().unwrap();
        assert!((sum - average * 3.0).abs() < 0.005);
    }

    #[test]
    fn test_multi_field_grouping_key() {
        let records = vec![
            record(&[("dc", json!("eu")), ("svc", json!("api")), ("x", json!(1))]),
            record(&[("dc", json!("eu")), ("svc", json!("db")), ("x", json!(2))]),
            record(&[("dc", json!("eu")), ("svc", json!("api")), ("x", json!(3))]),
        ];

        let rows = Aggregator::aggregate(
            &records,
            &rule(&["dc", "svc"], AggregationType::SumBy, "x"),
        );

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("dc").unwrap(), &json!("eu"));
        assert_eq!(rows[0].get("svc").unwrap(), &json!("api"));
        assert_eq!(rows[0].get("sum").unwrap(), &json!(4.0));
        assert_eq!(rows[1].get("svc").unwrap(), &json!("db"));
        assert_eq!(rows[1].get("sum").unwrap(), &json!(2.0));
    }

    #[test]
    fn test_no_records_produces_no_groups() {
        let rows = Aggregator::aggregate(&[], &rule(&[], AggregationType::SumBy, "x"));
        assert!(rows.is_empty());
    }
}
