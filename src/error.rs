use std::path::PathBuf;

use thiserror::Error;

use crate::models::REQUIRED_COLUMNS;

/// Errores que detienen la ejecución completa
#[derive(Debug, Error)]
pub enum Error {
    #[error("No se encontró la clave API. Configura {0} como variable de entorno.")]
    MissingApiKey(&'static str),

    #[error("El archivo de salida debe tener extensión .xlsx: '{0}'")]
    InvalidOutputExtension(String),

    #[error("El archivo de entrada '{}' no existe", .0.display())]
    InputNotFound(PathBuf),

    #[error(
        "El archivo de entrada debe tener las columnas: {{\"{}\", \"{}\"}} (faltan: {})",
        REQUIRED_COLUMNS[0],
        REQUIRED_COLUMNS[1],
        .missing.join(", ")
    )]
    MissingColumns { missing: Vec<String> },

    #[error("El archivo de entrada no contiene hojas")]
    EmptyWorkbook,

    #[error("Error al leer el archivo Excel: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Error al leer el archivo CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Error al escribir el archivo Excel: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Fallos de una llamada al modelo; solo afectan a la historia en curso
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Error al conectar con la API de Gemini: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Error de la API de Gemini ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("La API de Gemini no devolvió texto")]
    EmptyResponse,

    #[error("Respuesta inesperada de la API de Gemini: {0}")]
    UnexpectedShape(String),
}

pub type Result<T> = std::result::Result<T, Error>;
