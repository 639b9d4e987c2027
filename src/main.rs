use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::*;

use test_case_generator::commands::{
    default_output_file, run, validate_output_file, GenerateOptions, RunOutcome,
};
use test_case_generator::config::Config;
use test_case_generator::logging;
use test_case_generator::utils::GeminiClient;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Genera casos de prueba a partir de un archivo de historias de usuario",
    long_about = None
)]
struct Cli {
    /// Archivo de historias de usuario (.xlsx, .xls, .ods o .csv)
    input_file: PathBuf,

    /// Archivo Excel de salida (por defecto: Test_Cases_DDMMYYYYHHmmss.xlsx)
    output_file: Option<String>,

    /// Archivo de texto opcional con información del sistema
    system_info_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    logging::init();

    // Validar la extensión antes de tocar ningún archivo
    let output_file = cli.output_file.unwrap_or_else(default_output_file);
    let output_file = match validate_output_file(&output_file) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("{}", format!("❌ Error: {}", e).red());
            return ExitCode::FAILURE;
        }
    };

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format!("❌ {}", e).red());
            return ExitCode::FAILURE;
        }
    };

    let client = match GeminiClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{}", format!("❌ {}", e).red());
            return ExitCode::FAILURE;
        }
    };

    let options = GenerateOptions {
        input_file: cli.input_file,
        output_file,
        system_info_file: cli.system_info_file,
    };

    match run(&options, &client) {
        Ok(RunOutcome::Written { rows, test_cases, .. }) => {
            tracing::debug!(rows, test_cases, "report written");
            ExitCode::SUCCESS
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("❌ {}", e).red());
            ExitCode::FAILURE
        }
    }
}
