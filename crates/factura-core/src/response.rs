use regex::Regex;
use std::sync::OnceLock;

use crate::error::FacturaError;
use crate::model::ExtractionResult;

/// Locate the first brace-delimited substring in free-form model output.
///
/// Greedy: spans from the first `{` to the last `}`, so surrounding prose
/// and markdown fences are tolerated. The model's output format is not under
/// our control, so this stays a best-effort match; a structured-output mode
/// can replace it without touching the callers of [`parse_extraction`].
pub fn extract_json_object(raw: &str) -> Option<&str> {
    json_regex().find(raw).map(|m| m.as_str())
}

fn json_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("valid json-object regex"))
}

/// Parse the model's free-form reply into an [`ExtractionResult`].
///
/// No JSON substring, or a substring serde cannot parse, is a hard failure
/// carrying the full raw output for diagnosis.
pub fn parse_extraction(raw: &str) -> Result<ExtractionResult, FacturaError> {
    let candidate = extract_json_object(raw).ok_or_else(|| FacturaError::ModelResponse {
        raw: raw.to_string(),
    })?;

    serde_json::from_str(candidate).map_err(|_| FacturaError::ModelResponse {
        raw: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldValue;

    #[test]
    fn bare_json_parses() {
        let raw = r#"{"totals": {"total_billed": "1.234,56"}}"#;
        let result = parse_extraction(raw).unwrap();
        assert_eq!(
            result.totals.total_billed,
            Some(FieldValue::Text("1.234,56".into()))
        );
    }

    #[test]
    fn json_inside_prose_is_found() {
        let raw = "Aquí está el resultado:\n```json\n{\"billing_info\": {\"due_date\": \"15/03/2024\"}}\n```\nSaludos.";
        let result = parse_extraction(raw).unwrap();
        assert_eq!(
            result.billing_info.due_date,
            Some(FieldValue::Text("15/03/2024".into()))
        );
    }

    #[test]
    fn match_is_greedy_first_brace_to_last() {
        let raw = r#"x {"a": 1} y {"totals": {"total_billed": "9"}} z"#;
        let found = extract_json_object(raw).unwrap();
        assert!(found.starts_with(r#"{"a""#));
        assert!(found.ends_with(r#""9"}}"#));
    }

    #[test]
    fn prose_without_braces_fails_with_raw() {
        let raw = "No encontré ningún dato en la factura.";
        match parse_extraction(raw) {
            Err(FacturaError::ModelResponse { raw: carried }) => assert_eq!(carried, raw),
            other => panic!("expected ModelResponse error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_fails_with_raw() {
        let raw = "{this is not json}";
        assert!(matches!(
            parse_extraction(raw),
            Err(FacturaError::ModelResponse { .. })
        ));
    }

    #[test]
    fn multiline_json_spans_newlines() {
        let raw = "{\n  \"customer_info\": {\n    \"customer_name\": \"Ana\"\n  }\n}";
        assert!(parse_extraction(raw).is_ok());
    }
}
