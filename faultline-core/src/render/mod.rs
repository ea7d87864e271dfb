// Report renderers over a finished `AnalysisReport`.

pub mod json;
pub mod markdown;
pub mod traits;

use crate::config::RenderersSection;
use crate::error::{ConfigError, Result};

pub use json::JsonRenderer;
pub use markdown::MarkdownRenderer;
pub use traits::Renderer;

pub const RENDERER_NAMES: [&str; 2] = ["markdown", "json"];

pub fn renderer_for(name: &str) -> Option<Box<dyn Renderer>> {
    match name {
        "markdown" | "md" => Some(Box::new(MarkdownRenderer)),
        "json" => Some(Box::new(JsonRenderer)),
        _ => None,
    }
}

/// Renderers listed in `[renderers] enabled`, in order.
pub fn enabled_renderers(section: &RenderersSection) -> Result<Vec<Box<dyn Renderer>>> {
    section
        .enabled
        .iter()
        .map(|name| {
            renderer_for(name).ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "unknown renderer '{name}' in [renderers] enabled (expected one of: {})",
                    RENDERER_NAMES.join(", ")
                ))
                .into()
            })
        })
        .collect()
}
