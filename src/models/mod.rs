pub mod test_case;
pub mod user_story;

pub use test_case::*;
pub use user_story::*;
