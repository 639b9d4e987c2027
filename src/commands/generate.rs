use std::path::{Path, PathBuf};

use chrono::Local;
use colored::*;

use crate::error::{Error, Result};
use crate::models::{flatten_test_cases, group_count, TestCaseRow, UserStory};
use crate::utils::{
    build_prompt, load_user_stories, parse_test_cases, read_system_info, save_to_xlsx,
    ModelClient, SaveOutcome,
};

/// Parámetros de una ejecución de generación
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub system_info_file: Option<PathBuf>,
}

/// Filas generadas y estadísticas de la ejecución
#[derive(Debug, Default)]
pub struct Generation {
    pub rows: Vec<TestCaseRow>,
    pub stories: usize,
    pub stories_without_cases: usize,
    pub test_cases: usize,
    /// Grupos de filas asignados; también es el siguiente identificador libre
    pub groups: usize,
}

/// Resultado final de la ejecución
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Written {
        path: PathBuf,
        rows: usize,
        test_cases: usize,
    },
    NothingWritten,
    InputMissing,
    NoStories,
}

/// Nombre por defecto del archivo de salida: Test_Cases_DDMMYYYYHHmmss.xlsx
pub fn default_output_file() -> String {
    format!("Test_Cases_{}.xlsx", Local::now().format("%d%m%Y%H%M%S"))
}

/// Comprueba que el archivo de salida tenga extensión .xlsx
pub fn validate_output_file(output_file: &str) -> Result<PathBuf> {
    if output_file.to_lowercase().ends_with(".xlsx") {
        Ok(PathBuf::from(output_file))
    } else {
        Err(Error::InvalidOutputExtension(output_file.to_string()))
    }
}

/// Genera los casos de prueba de todas las historias, en orden, con una sola
/// llamada al modelo por historia
pub fn generate_test_cases(
    stories: &[UserStory],
    system_info: &str,
    client: &dyn ModelClient,
) -> Generation {
    let mut generation = Generation {
        stories: stories.len(),
        ..Default::default()
    };

    for story in stories {
        println!(
            "{}",
            format!("\n🔹 Generando casos de prueba para: {}\n", story.id).blue()
        );

        let prompt = build_prompt(story, system_info);
        let response = match client.generate(&prompt) {
            Ok(text) => text,
            Err(e) => {
                println!("{}", format!("❌ {}", e).red());
                println!("{}", "⚠️ No se recibió respuesta de Gemini.".yellow());
                generation.stories_without_cases += 1;
                continue;
            }
        };

        let test_cases = parse_test_cases(Some(response.as_str()), &story.id);
        let rows = flatten_test_cases(&test_cases, generation.groups);
        tracing::debug!(
            story = %story.id,
            test_cases = test_cases.len(),
            rows = rows.len(),
            "parsed model response"
        );

        if rows.is_empty() {
            generation.stories_without_cases += 1;
        }
        generation.test_cases += test_cases.len();
        generation.groups += group_count(&test_cases);
        generation.rows.extend(rows);
    }

    generation
}

/// Ejecuta la generación completa: leer historias, consultar el modelo y
/// guardar el informe
pub fn run(options: &GenerateOptions, client: &dyn ModelClient) -> Result<RunOutcome> {
    if !options.input_file.exists() {
        println!(
            "{}",
            format!(
                "⚠️ El archivo de entrada '{}' no existe.",
                options.input_file.display()
            )
            .yellow()
        );
        return Ok(RunOutcome::InputMissing);
    }

    let stories = load_user_stories(&options.input_file);
    if stories.is_empty() {
        println!("{}", "⚠️ No hay historias de usuario para procesar.".yellow());
        return Ok(RunOutcome::NoStories);
    }

    let system_info = read_system_info(options.system_info_file.as_deref());
    let generation = generate_test_cases(&stories, &system_info, client);

    print_summary(&generation);
    save_report(&options.output_file, &generation)
}

fn save_report(output_file: &Path, generation: &Generation) -> Result<RunOutcome> {
    match save_to_xlsx(output_file, &generation.rows)? {
        SaveOutcome::NothingWritten => {
            println!(
                "{}",
                "⚠️ No se generaron casos de prueba. No se creó el archivo Excel.".yellow()
            );
            Ok(RunOutcome::NothingWritten)
        }
        SaveOutcome::Written { rows, .. } => {
            println!(
                "{}",
                format!("✅ Casos de prueba guardados en {}", output_file.display()).green()
            );
            Ok(RunOutcome::Written {
                path: output_file.to_path_buf(),
                rows,
                test_cases: generation.test_cases,
            })
        }
    }
}

fn print_summary(generation: &Generation) {
    println!("{}", "\nResumen:".blue());
    println!("- Historias procesadas: {}", generation.stories);
    println!(
        "- Historias sin casos de prueba: {}",
        generation.stories_without_cases
    );
    println!("- Casos de prueba generados: {}", generation.test_cases);
    println!("- Filas: {}", generation.rows.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use rust_xlsxwriter::Workbook;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Modelo falso que devuelve respuestas predefinidas en orden
    struct ScriptedModel {
        responses: RefCell<Vec<std::result::Result<String, ModelError>>>,
        prompts: RefCell<Vec<String>>,
    }

    impl ScriptedModel {
        fn new(responses: Vec<std::result::Result<String, ModelError>>) -> Self {
            ScriptedModel {
                responses: RefCell::new(responses.into_iter().rev().collect()),
                prompts: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.prompts.borrow().len()
        }
    }

    impl ModelClient for ScriptedModel {
        fn generate(&self, prompt: &str) -> std::result::Result<String, ModelError> {
            self.prompts.borrow_mut().push(prompt.to_string());
            self.responses
                .borrow_mut()
                .pop()
                .unwrap_or(Err(ModelError::EmptyResponse))
        }
    }

    fn response(title: &str, steps: usize) -> String {
        let steps: Vec<String> = (1..=steps)
            .map(|i| format!(r#"{{"Step": "{i}. step", "Test Data": "d{i}", "Expected Result": "r{i}"}}"#))
            .collect();
        format!(r#"{{"Title": "{}", "Test steps": [{}]}}"#, title, steps.join(","))
    }

    fn write_stories(dir: &TempDir, headers: [&str; 2], stories: &[(&str, &str)]) -> PathBuf {
        let path = dir.path().join("stories.xlsx");
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, headers[0]).unwrap();
        worksheet.write_string(0, 1, headers[1]).unwrap();
        for (i, (id, text)) in stories.iter().enumerate() {
            worksheet.write_string(i as u32 + 1, 0, *id).unwrap();
            worksheet.write_string(i as u32 + 1, 1, *text).unwrap();
        }
        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn login_story_yields_two_grouped_rows() {
        let stories = vec![UserStory::new("US-1", "As a user, I want to log in")];
        let model = ScriptedModel::new(vec![Ok(format!(
            "```json\n{}\n```",
            response("Verify Login", 2)
        ))]);

        let generation = generate_test_cases(&stories, "ctx", &model);

        assert_eq!(generation.rows.len(), 2);
        let header = generation.rows[0].header.as_ref().unwrap();
        assert_eq!(header.name, "Verify Login");
        assert_eq!(header.coverage, "US-1");
        assert!(generation.rows[1].header.is_none());
        assert!(model.prompts.borrow()[0].contains("As a user, I want to log in"));
        assert!(model.prompts.borrow()[0].ends_with("ctx"));
    }

    #[test]
    fn failed_story_does_not_stop_the_run() {
        let stories = vec![
            UserStory::new("US-1", "first"),
            UserStory::new("US-2", "second"),
            UserStory::new("US-3", "third"),
        ];
        let model = ScriptedModel::new(vec![
            Err(ModelError::EmptyResponse),
            Ok("not json at all".to_string()),
            Ok(response("Third", 1)),
        ]);

        let generation = generate_test_cases(&stories, "ctx", &model);

        assert_eq!(model.calls(), 3);
        assert_eq!(generation.stories_without_cases, 2);
        assert_eq!(generation.rows.len(), 1);
        assert_eq!(generation.rows[0].header.as_ref().unwrap().coverage, "US-3");
    }

    #[test]
    fn groups_are_unique_across_stories_and_order_is_kept() {
        let stories = vec![UserStory::new("US-1", "a"), UserStory::new("US-2", "b")];
        let model = ScriptedModel::new(vec![
            Ok(format!("[{}, {}]", response("A1", 1), response("A2", 2))),
            Ok(response("B1", 2)),
        ]);

        let generation = generate_test_cases(&stories, "ctx", &model);

        let groups: Vec<usize> = generation.rows.iter().map(|row| row.group).collect();
        assert_eq!(groups, vec![0, 1, 1, 2, 2]);
        let names: Vec<&str> = generation
            .rows
            .iter()
            .filter_map(|row| row.header.as_ref().map(|h| h.name.as_str()))
            .collect();
        assert_eq!(names, vec!["A1", "A2", "B1"]);
        assert_eq!(generation.test_cases, 3);
    }

    #[test]
    fn cases_without_steps_leave_no_gaps_in_groups() {
        let stories = vec![UserStory::new("US-1", "a"), UserStory::new("US-2", "b")];
        let model = ScriptedModel::new(vec![
            Ok(format!("[{}, {}]", response("Empty", 0), response("A", 2))),
            Ok(response("B", 1)),
        ]);

        let generation = generate_test_cases(&stories, "ctx", &model);

        let groups: Vec<usize> = generation.rows.iter().map(|row| row.group).collect();
        assert_eq!(groups, vec![0, 0, 1]);
        assert_eq!(generation.groups, 2);
        assert_eq!(generation.test_cases, 3);
    }

    #[test]
    fn missing_columns_make_no_api_calls() {
        let dir = TempDir::new().unwrap();
        let input_file = write_stories(&dir, ["User Story ID", "Story"], &[("US-1", "login")]);
        let options = GenerateOptions {
            input_file,
            output_file: dir.path().join("out.xlsx"),
            system_info_file: None,
        };
        let model = ScriptedModel::new(vec![]);

        assert_eq!(run(&options, &model).unwrap(), RunOutcome::NoStories);
        assert_eq!(model.calls(), 0);
        assert!(!options.output_file.exists());
    }

    #[test]
    fn missing_input_returns_early() {
        let dir = TempDir::new().unwrap();
        let options = GenerateOptions {
            input_file: dir.path().join("missing.xlsx"),
            output_file: dir.path().join("out.xlsx"),
            system_info_file: None,
        };
        let model = ScriptedModel::new(vec![]);

        assert_eq!(run(&options, &model).unwrap(), RunOutcome::InputMissing);
        assert_eq!(model.calls(), 0);
    }

    #[test]
    fn run_writes_report_once() {
        let dir = TempDir::new().unwrap();
        let input_file = write_stories(
            &dir,
            ["User Story ID", "User Story"],
            &[("US-1", "log in"), ("US-2", "log out")],
        );
        let output_file = dir.path().join("out.xlsx");
        let options = GenerateOptions {
            input_file,
            output_file: output_file.clone(),
            system_info_file: None,
        };
        let model = ScriptedModel::new(vec![Ok(response("Login", 2)), Ok(String::new())]);

        let outcome = run(&options, &model).unwrap();

        assert_eq!(
            outcome,
            RunOutcome::Written {
                path: output_file.clone(),
                rows: 2,
                test_cases: 1,
            }
        );
        assert!(output_file.exists());
        assert!(model.prompts.borrow()[0].ends_with("No additional system context provided."));
    }

    #[test]
    fn run_without_rows_creates_no_file() {
        let dir = TempDir::new().unwrap();
        let input_file = write_stories(&dir, ["User Story ID", "User Story"], &[("US-1", "x")]);
        let options = GenerateOptions {
            input_file,
            output_file: dir.path().join("out.xlsx"),
            system_info_file: None,
        };
        let model = ScriptedModel::new(vec![Err(ModelError::EmptyResponse)]);

        assert_eq!(run(&options, &model).unwrap(), RunOutcome::NothingWritten);
        assert!(!options.output_file.exists());
    }

    #[test]
    fn output_extension_is_checked_case_insensitively() {
        assert!(validate_output_file("report.XLSX").is_ok());
        assert!(validate_output_file("dir/report.xlsx").is_ok());
        assert!(matches!(
            validate_output_file("report.txt"),
            Err(Error::InvalidOutputExtension(_))
        ));
        assert!(validate_output_file(&default_output_file()).is_ok());
    }

    #[test]
    fn default_output_name_embeds_timestamp() {
        let name = default_output_file();
        let stamp = name
            .strip_prefix("Test_Cases_")
            .and_then(|rest| rest.strip_suffix(".xlsx"))
            .unwrap();
        assert_eq!(stamp.len(), 14);
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
    }
}
