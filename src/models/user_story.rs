use serde::Deserialize;

/// Columnas obligatorias del archivo de historias de usuario
pub const REQUIRED_COLUMNS: [&str; 2] = ["User Story ID", "User Story"];

/// Historia de usuario leída del archivo de entrada
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct UserStory {
    #[serde(rename = "User Story ID", default)]
    pub id: String,
    #[serde(rename = "User Story", default)]
    pub text: String,
}

impl UserStory {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        UserStory {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Una fila sin identificador ni texto no es una historia
    pub fn is_blank(&self) -> bool {
        self.id.trim().is_empty() && self.text.trim().is_empty()
    }
}
