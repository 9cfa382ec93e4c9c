//! HTML rendering for the single-page UI.

pub mod escape;
pub mod page;

pub use escape::escape_html;
pub use page::{render_error, render_index};
