//! Core functionality: document model, format adapters, modification engine

pub mod config;
pub mod document;
pub(crate) mod docx;
pub mod error;
pub mod modify;
pub(crate) mod rtf;
