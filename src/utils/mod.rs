pub mod file_operations;
pub mod gemini;
pub mod prompt;
pub mod report;
pub mod response_parser;

pub use file_operations::*;
pub use gemini::*;
pub use prompt::*;
pub use report::*;
pub use response_parser::*;
