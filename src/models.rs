mod ids;
mod prompt;

pub use ids::PromptId;
pub use prompt::{Prompt, PromptBuilder};
