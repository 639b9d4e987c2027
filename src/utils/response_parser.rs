use colored::*;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::models::{flatten_test_cases, TestCase, TestCaseRow, TestStep};

const NOT_AVAILABLE: &str = "N/A";
const DEFAULT_STATUS: &str = "Draft";

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A\s*```[ \t]*(?i:json)?[ \t]*\r?\n(.*?)\s*```\s*\z")
        .expect("code fence pattern is valid")
});

/// Quita el bloque de código Markdown que envuelve la respuesta, si existe
pub fn strip_code_fence(text: &str) -> &str {
    match CODE_FENCE.captures(text).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str().trim(),
        None => text.trim(),
    }
}

/// Interpreta la respuesta del modelo y extrae los casos de prueba.
///
/// Acepta un único caso o una lista de casos. Cualquier problema de formato se
/// informa por consola y produce una lista vacía.
pub fn parse_test_cases(response_text: Option<&str>, user_story_id: &str) -> Vec<TestCase> {
    let Some(response_text) = response_text.filter(|text| !text.trim().is_empty()) else {
        println!("{}", "❌ No se recibió respuesta de Gemini.".red());
        return Vec::new();
    };

    let payload = strip_code_fence(response_text);

    let response_json: Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "response is not valid JSON");
            println!(
                "{}",
                format!("❌ No se pudo interpretar la respuesta JSON. Respuesta original:\n{}", payload)
                    .red()
            );
            return Vec::new();
        }
    };

    let Some(records) = normalize_records(response_json) else {
        println!(
            "{}",
            format!("⚠️ Formato de respuesta inesperado. Respuesta original:\n{}", payload).yellow()
        );
        return Vec::new();
    };

    records
        .iter()
        .map(|record| project_test_case(record, user_story_id))
        .collect()
}

/// Interpreta la respuesta y la convierte directamente en filas
pub fn parse_test_case_rows(
    response_text: Option<&str>,
    user_story_id: &str,
    first_group: usize,
) -> Vec<TestCaseRow> {
    flatten_test_cases(&parse_test_cases(response_text, user_story_id), first_group)
}

/// Un objeto suelto se trata como lista de un elemento; cualquier otra cosa que
/// no sea una lista de objetos se rechaza
fn normalize_records(value: Value) -> Option<Vec<Map<String, Value>>> {
    let items = match value {
        Value::Object(record) => return Some(vec![record]),
        Value::Array(items) => items,
        _ => return None,
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(record) => Some(record),
            _ => None,
        })
        .collect()
}

fn project_test_case(record: &Map<String, Value>, user_story_id: &str) -> TestCase {
    TestCase {
        title: text_field(record, "Title", NOT_AVAILABLE),
        objective: text_field(record, "Objective", NOT_AVAILABLE),
        precondition: text_field(record, "Precondition", NOT_AVAILABLE),
        coverage: user_story_id.to_string(),
        status: text_field(record, "Status", DEFAULT_STATUS),
        steps: project_steps(record.get("Test steps")),
    }
}

fn project_steps(value: Option<&Value>) -> Vec<TestStep> {
    let steps = match value {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(steps)) => steps,
        Some(other) => {
            println!(
                "{}",
                format!("⚠️ 'Test steps' no es una lista, se ignora: {}", other).yellow()
            );
            return Vec::new();
        }
    };

    steps
        .iter()
        .filter_map(|step| match step {
            Value::Object(step) => Some(TestStep {
                step: text_field(step, "Step", NOT_AVAILABLE),
                test_data: text_field(step, "Test Data", NOT_AVAILABLE),
                expected_result: text_field(step, "Expected Result", NOT_AVAILABLE),
            }),
            other => {
                println!("{}", format!("⚠️ Paso con formato inválido, se ignora: {}", other).yellow());
                None
            }
        })
        .collect()
}

/// Lee un campo como texto; `null` o ausente usa el valor por defecto
fn text_field(record: &Map<String, Value>, key: &str, default: &str) -> String {
    match record.get(key) {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
