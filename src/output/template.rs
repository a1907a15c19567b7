use crate::domain::model::value_to_string;
use crate::utils::error::{ProbeError, Result};
use regex::Regex;

// Matches $name and ${name} placeholders.
fn placeholder_regex() -> Regex {
    Regex::new(r"\$(?:\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))").unwrap()
}

/// Substitute every placeholder in `template` from `fields`. A placeholder
/// with no matching field is a hard error, never left unresolved in the
/// output.
pub fn substitute(
    template: &str,
    fields: &serde_json::Map<String, serde_json::Value>,
) -> Result<String> {
    let re = placeholder_regex();
    let mut rendered = String::with_capacity(template.len());
    let mut last = 0;

    for caps in re.captures_iter(template) {
        let matched = caps.get(0).unwrap();
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();

        let value = fields.get(name).ok_or_else(|| ProbeError::TemplateError {
            placeholder: name.to_string(),
        })?;

        rendered.push_str(&template[last..matched.start()]);
        rendered.push_str(&value_to_string(value));
        last = matched.end();
    }

    rendered.push_str(&template[last..]);
    Ok(rendered)
}

/// Placeholder names referenced by `template`, in order of appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    placeholder_regex()
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields() -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        map.insert("service".to_string(), json!("billing"));
        map.insert("average".to_string(), json!(40.5));
        map.insert("metric".to_string(), json!("cpu"));
        map
    }

    #[test]
    fn test_substitute_named_placeholders() {
        let line = substitute("$service $metric avg is $average", &fields()).unwrap();
        assert_eq!(line, "billing cpu avg is 40.5");
    }

    #[test]
    fn test_substitute_braced_placeholders() {
        let line = substitute("${service}: ${average}", &fields()).unwrap();
        assert_eq!(line, "billing: 40.5");
    }

    #[test]
    fn test_unresolved_placeholder_is_an_error() {
        let err = substitute("$service $total", &fields()).unwrap_err();
        assert!(matches!(
            err,
            ProbeError::TemplateError { placeholder } if placeholder == "total"
        ));
    }

    #[test]
    fn test_template_without_placeholders_passes_through() {
        let line = substitute("no placeholders here", &fields()).unwrap();
        assert_eq!(line, "no placeholders here");
    }

    #[test]
    fn test_placeholders_are_listed_in_order() {
        assert_eq!(
            placeholders("$metric for ${service} is $average"),
            vec!["metric", "service", "average"]
        );
    }
}
