//! Genera casos de prueba a partir de historias de usuario usando Gemini y
//! los guarda en un archivo Excel.

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod utils;
