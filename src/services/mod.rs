pub mod content_generator;
pub mod prompts;
pub mod worksheet_renderer;

pub use content_generator::{parse_content, ContentGenerator};
pub use worksheet_renderer::{render_worksheet, render_worksheet_at};
