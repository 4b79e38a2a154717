pub mod toml_loader;

pub use toml_loader::{load_worksheet_request, parse_worksheet_request, WorksheetRequest};
