//! Stamp a footer annotation, labelled with the bookmark title, on every page
//! a PDF's top-level bookmarks point to.

pub mod annotation;
pub mod batch;
pub mod config;
pub mod error;
pub mod host;
pub mod orchestrator;
pub mod pdf;
pub mod prompt;

#[cfg(test)]
mod testing;

pub use annotation::create_footer_annotation;
pub use batch::{BatchProcessor, BatchState, FailureRecord, ProcessingResult};
pub use config::{Color, FooterConfig, Rect};
pub use error::{FooterError, Result};
pub use host::{Alert, AnnotationHandle, Bookmark, Buttons, Choice, Document, Icon, Prompter};
pub use orchestrator::{Orchestrator, PendingRun, RunOutcome};
pub use pdf::PdfDocument;
pub use prompt::TerminalPrompter;
