use std::fs;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use colored::*;
use csv::{ReaderBuilder, Trim};

use crate::error::{Error, Result};
use crate::models::{UserStory, REQUIRED_COLUMNS};

/// Contexto usado cuando no se proporciona archivo de información del sistema
pub const DEFAULT_SYSTEM_INFO: &str = "No additional system context provided.";

/// Lee las historias de usuario de un archivo Excel/ODS o CSV.
///
/// Solo se usa la primera hoja del libro. La primera fila debe contener las
/// columnas "User Story ID" y "User Story"; las filas completamente vacías se
/// descartan.
pub fn read_user_stories(file_path: &Path) -> Result<Vec<UserStory>> {
    // Verificar si el archivo existe
    if !file_path.exists() {
        return Err(Error::InputNotFound(file_path.to_path_buf()));
    }

    let is_csv = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));

    let stories = if is_csv {
        read_csv_stories(file_path)?
    } else {
        read_workbook_stories(file_path)?
    };

    Ok(stories.into_iter().filter(|story| !story.is_blank()).collect())
}

/// Igual que `read_user_stories`, pero informa el error por consola y
/// devuelve una lista vacía
pub fn load_user_stories(file_path: &Path) -> Vec<UserStory> {
    match read_user_stories(file_path) {
        Ok(stories) => stories,
        Err(e @ Error::InputNotFound(_)) => {
            println!("{}", format!("⚠️ {}", e).yellow());
            Vec::new()
        }
        Err(e) => {
            println!("{}", format!("❌ {}", e).red());
            Vec::new()
        }
    }
}

/// Lee el contexto adicional del sistema desde un archivo de texto
pub fn read_system_info(file_path: Option<&Path>) -> String {
    let Some(path) = file_path else {
        return DEFAULT_SYSTEM_INFO.to_string();
    };

    if !path.exists() {
        tracing::debug!(path = %path.display(), "system info file not found");
        return DEFAULT_SYSTEM_INFO.to_string();
    }

    match fs::read_to_string(path) {
        Ok(content) if !content.trim().is_empty() => content.trim().to_string(),
        Ok(_) => DEFAULT_SYSTEM_INFO.to_string(),
        Err(e) => {
            println!(
                "{}",
                format!("❌ Error al leer el archivo de información del sistema: {}", e).red()
            );
            DEFAULT_SYSTEM_INFO.to_string()
        }
    }
}

fn missing_columns(headers: &[String]) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|header| header == *required))
        .map(|required| required.to_string())
        .collect()
}

fn read_csv_stories(file_path: &Path) -> Result<Vec<UserStory>> {
    let mut reader = ReaderBuilder::new().trim(Trim::Headers).from_path(file_path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let missing = missing_columns(&headers);
    if !missing.is_empty() {
        return Err(Error::MissingColumns { missing });
    }

    let mut stories = Vec::new();
    for result in reader.deserialize() {
        match result {
            Ok(story) => stories.push(story),
            Err(e) => println!("{}", format!("Error al leer historia de usuario: {}", e).red()),
        }
    }

    Ok(stories)
}

fn read_workbook_stories(file_path: &Path) -> Result<Vec<UserStory>> {
    let mut workbook = open_workbook_auto(file_path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(Error::EmptyWorkbook)??;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(|cell| cell_to_string(cell).trim().to_string()).collect())
        .unwrap_or_default();

    let missing = missing_columns(&headers);
    if !missing.is_empty() {
        return Err(Error::MissingColumns { missing });
    }

    let column = |name: &str| headers.iter().position(|header| header == name);
    let (Some(id_col), Some(text_col)) = (column(REQUIRED_COLUMNS[0]), column(REQUIRED_COLUMNS[1]))
    else {
        return Err(Error::MissingColumns {
            missing: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
        });
    };

    let text_at = |row: &[Data], col: usize| row.get(col).map(cell_to_string).unwrap_or_default();

    Ok(rows
        .map(|row| UserStory::new(text_at(row, id_col), text_at(row, text_col)))
        .collect())
}

/// Convierte una celda a texto; los números enteros se escriben sin decimales
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(n) => n.to_string(),
        Data::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
