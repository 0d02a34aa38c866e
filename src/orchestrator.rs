//! Top-level workflow: preconditions, preview, confirmation, batch.
//!
//! The run is split in two phases so the caller decides what happens while
//! the operator looks at the preview:
//!
//! ```ignore
//! let mut orchestrator = Orchestrator::new(prompter);
//! let pending = orchestrator.prepare_preview(Some(doc))?;
//! // ... show or save the preview ...
//! let outcome = orchestrator.confirm_and_run(pending);
//! ```
//!
//! [`Orchestrator::run`] wraps both phases with the delay and the single
//! error boundary.

use std::thread;
use std::time::Duration;

use log::{debug, error, info};

use crate::annotation::create_footer_annotation;
use crate::batch::{BatchProcessor, ProcessingResult};
use crate::config::FooterConfig;
use crate::error::{FooterError, Result};
use crate::host::{Alert, AnnotationHandle, Bookmark, Document, Icon, Prompter};

pub const PREVIEW_TITLE: &str = "Footer preview";
pub const ERROR_TITLE: &str = "Error";
pub const DEFAULT_CONFIRM_DELAY: Duration = Duration::from_millis(5000);

/// State of one run between the preview and the confirmation.
pub struct PendingRun<D: Document> {
    doc: D,
    bookmarks: Vec<D::Bookmark>,
    original_page: u32,
    preview: AnnotationHandle,
}

impl<D: Document> PendingRun<D> {
    /// The document with the preview annotation in place.
    pub fn document(&self) -> &D {
        &self.doc
    }

    pub fn preview(&self) -> AnnotationHandle {
        self.preview
    }

    pub fn original_page(&self) -> u32 {
        self.original_page
    }

    pub fn bookmark_count(&self) -> usize {
        self.bookmarks.len()
    }
}

pub enum RunOutcome<D> {
    /// The batch pass ran; some items may have failed.
    Completed { document: D, result: ProcessingResult },
    /// The operator declined at the confirmation prompt.
    Cancelled { document: D },
    /// A fatal error stopped the run before the batch pass.
    Failed(FooterError),
}

pub struct Orchestrator<P: Prompter> {
    prompter: P,
    config: FooterConfig,
    delay: Duration,
}

impl<P: Prompter> Orchestrator<P> {
    pub fn new(prompter: P) -> Self {
        Self {
            prompter,
            config: FooterConfig::DEFAULT,
            delay: DEFAULT_CONFIRM_DELAY,
        }
    }

    pub fn with_config(mut self, config: FooterConfig) -> Self {
        self.config = config;
        self
    }

    /// Pause between the preview and the confirmation prompt in [`run`](Self::run).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    /// Phase one: checks preconditions and places the preview annotation on
    /// the first bookmark's page.
    pub fn prepare_preview<D: Document>(&mut self, document: Option<D>) -> Result<PendingRun<D>> {
        info!("=== starting footer run ===");
        self.config.validate()?;

        let mut doc = document.ok_or(FooterError::NoActiveDocument)?;
        info!("document: {} ({} pages)", doc.document_name(), doc.page_count());

        let bookmarks = doc.bookmarks()?;
        if bookmarks.is_empty() {
            return Err(FooterError::NoBookmarks);
        }
        info!("bookmarks found: {}", bookmarks.len());

        let original_page = doc.current_page();
        let first = &bookmarks[0];
        doc.navigate(first)?;
        debug!(
            "preview bookmark '{}' is on page {}",
            first.name(),
            doc.current_page() + 1
        );

        let notice = self.preview_notice(first.name());
        self.prompter.alert(&notice);

        let page = doc.current_page();
        let preview = create_footer_annotation(&mut doc, page, first.name(), &self.config)?;

        Ok(PendingRun {
            doc,
            bookmarks,
            original_page,
            preview,
        })
    }

    /// Phase two: asks for confirmation, then stamps every bookmark.
    pub fn confirm_and_run<D: Document>(&mut self, pending: PendingRun<D>) -> RunOutcome<D> {
        let PendingRun {
            mut doc,
            bookmarks,
            original_page,
            preview,
        } = pending;

        let mut batch = BatchProcessor::new(&mut doc, &self.config);
        let confirmed = match batch.confirm(&mut self.prompter, Some(preview)) {
            Ok(confirmed) => confirmed,
            Err(e) => return self.fail(e),
        };
        if !confirmed {
            doc.set_current_page(original_page);
            return RunOutcome::Cancelled { document: doc };
        }

        let result = batch.run(&bookmarks);
        batch.complete(&result, original_page, &mut self.prompter);
        RunOutcome::Completed {
            document: doc,
            result,
        }
    }

    /// Runs both phases. `inspect` sees the document while the preview is in
    /// place; an error from it is treated like any other fatal error.
    pub fn run<D, F>(&mut self, document: Option<D>, inspect: F) -> RunOutcome<D>
    where
        D: Document,
        F: FnOnce(&D) -> Result<()>,
    {
        let pending = match self
            .prepare_preview(document)
            .and_then(|pending| inspect(pending.document()).map(|()| pending))
        {
            Ok(pending) => pending,
            Err(e) => return self.fail(e),
        };

        if !self.delay.is_zero() {
            debug!("waiting {:?} before asking for confirmation", self.delay);
            thread::sleep(self.delay);
        }
        self.confirm_and_run(pending)
    }

    fn fail<D>(&mut self, e: FooterError) -> RunOutcome<D> {
        error!("=== error ===");
        error!("details: {}", e);
        self.prompter.alert(
            &Alert::new(ERROR_TITLE, format!("An error occurred: {}", e)).icon(Icon::Error),
        );
        RunOutcome::Failed(e)
    }

    fn preview_notice(&self, sample: &str) -> Alert {
        let rect = self.config.rect;
        Alert::new(
            PREVIEW_TITLE,
            format!(
                "A preview footer will be added on the first bookmark's page\n\n\
                 Position: {}-{} pt from the bottom\n\
                 Font: {}, {} pt\n\
                 Alignment: centered\n\
                 Sample text: {}",
                rect.bottom, rect.top, self.config.font, self.config.text_size, sample
            ),
        )
        .icon(Icon::Status)
    }
}
