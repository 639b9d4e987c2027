use std::ops::Range;
use std::path::Path;

use rust_xlsxwriter::{ColNum, Format, FormatAlign, RowNum, Workbook, Worksheet};

use crate::error::Result;
use crate::models::{CaseHeader, TestCaseRow};

pub const SHEET_NAME: &str = "Test Cases";

pub const HEADERS: [&str; 8] = [
    "Name",
    "Objective",
    "Precondition",
    "Test Script (Step-by-Step) - Step",
    "Test Script (Step-by-Step) - Test Data",
    "Test Script (Step-by-Step) - Expected Result",
    "Coverage (Issues)",
    "Status",
];

const MIN_COLUMN_WIDTH: usize = 15;

const NAME_COL: ColNum = 0;
const OBJECTIVE_COL: ColNum = 1;
const PRECONDITION_COL: ColNum = 2;
const STEP_COL: ColNum = 3;
const TEST_DATA_COL: ColNum = 4;
const EXPECTED_RESULT_COL: ColNum = 5;
const COVERAGE_COL: ColNum = 6;
const STATUS_COL: ColNum = 7;

/// Resultado de guardar el informe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Written { rows: usize, groups: usize },
    NothingWritten,
}

/// Rangos de filas consecutivas que pertenecen al mismo caso de prueba
pub fn group_ranges(rows: &[TestCaseRow]) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;

    while start < rows.len() {
        let group = rows[start].group;
        let end = rows[start..]
            .iter()
            .position(|row| row.group != group)
            .map_or(rows.len(), |offset| start + offset);
        ranges.push(start..end);
        start = end;
    }

    ranges
}

/// Ancho de cada columna: el mayor entre el mínimo y el encabezado más 5
pub fn column_width(header: &str) -> usize {
    MIN_COLUMN_WIDTH.max(header.chars().count() + 5)
}

/// Guarda los casos de prueba en un archivo Excel con celdas combinadas por caso
pub fn save_to_xlsx(file_path: &Path, rows: &[TestCaseRow]) -> Result<SaveOutcome> {
    if rows.is_empty() {
        return Ok(SaveOutcome::NothingWritten);
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet().set_name(SHEET_NAME)?;

    let header_format = Format::new().set_bold();
    for (col, header) in HEADERS.iter().enumerate() {
        let col = col as ColNum;
        worksheet.write_string_with_format(0, col, *header, &header_format)?;
        worksheet.set_column_width(col, column_width(header) as f64)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let excel_row = i as RowNum + 1;
        worksheet.write_string(excel_row, STEP_COL, &row.step)?;
        worksheet.write_string(excel_row, TEST_DATA_COL, &row.test_data)?;
        worksheet.write_string(excel_row, EXPECTED_RESULT_COL, &row.expected_result)?;
    }

    let merge_format = Format::new()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap();

    let ranges = group_ranges(rows);
    for range in &ranges {
        // Grupo sin encabezado en su primera fila: no hay valores que combinar
        let Some(header) = rows[range.start].header.as_ref() else {
            tracing::warn!(row = range.start, "group without header row");
            continue;
        };
        write_group(worksheet, range, header, &merge_format)?;
    }

    workbook.save(file_path)?;

    Ok(SaveOutcome::Written {
        rows: rows.len(),
        groups: ranges.len(),
    })
}

/// Escribe las columnas del caso usando solo el encabezado de la primera fila;
/// un encabezado en filas posteriores del grupo se ignora
fn write_group(
    worksheet: &mut Worksheet,
    range: &Range<usize>,
    header: &CaseHeader,
    merge_format: &Format,
) -> Result<()> {
    let first_row = range.start as RowNum + 1;
    let last_row = range.end as RowNum;

    let cells = [
        (NAME_COL, &header.name),
        (OBJECTIVE_COL, &header.objective),
        (PRECONDITION_COL, &header.precondition),
        (COVERAGE_COL, &header.coverage),
        (STATUS_COL, &header.status),
    ];

    for (col, value) in cells {
        if last_row > first_row {
            worksheet.merge_range(first_row, col, last_row, col, value, merge_format)?;
        } else {
            worksheet.write_string(first_row, col, value)?;
        }
    }

    Ok(())
}
