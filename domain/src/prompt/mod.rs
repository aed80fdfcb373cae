//! Prompt domain
//!
//! Templates for generating oracle prompts at each stage of the pipeline.

mod template;

pub use template::PromptTemplate;
