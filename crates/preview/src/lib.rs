pub mod document;
pub mod markdown;
pub mod sanitize;

pub use document::{playground, render, PreviewKind};
pub use markdown::to_html;

#[cfg(test)]
mod tests;
