use tracing_subscriber::EnvFilter;

/// Nivel usado cuando RUST_LOG no está definida o no es válida
pub const DEFAULT_DIRECTIVE: &str = "warn";

/// Filtro de trazas a partir de RUST_LOG
pub fn env_filter() -> EnvFilter {
    filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())
}

/// Filtro a partir de unas directivas; sin directivas válidas se usa `warn`
pub fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Inicializa el suscriptor de trazas; escribe en stderr para no mezclarse con
/// los mensajes de la consola
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
