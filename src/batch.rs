//! The batch pass: one footer per bookmark, failures isolated per item.

use log::{info, warn};

use crate::annotation::create_footer_annotation;
use crate::config::FooterConfig;
use crate::error::Result;
use crate::host::{Alert, AnnotationHandle, Bookmark, Buttons, Choice, Document, Icon, Prompter};

pub const REPORT_TITLE: &str = "Add footer annotations";
pub const REPORT_TITLE_WITH_FAILURES: &str = "Add footer annotations - with failures";
pub const CONFIRM_TITLE: &str = "Continue?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Confirming,
    Running,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    /// 1-based position in the bookmark list.
    pub index: usize,
    pub name: String,
    pub error: String,
}

pub type ItemOutcome = std::result::Result<(), FailureRecord>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingResult {
    pub success: usize,
    pub failed: usize,
    pub failures: Vec<FailureRecord>,
}

impl ProcessingResult {
    pub fn processed(&self) -> usize {
        self.success + self.failed
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    fn record(mut self, outcome: ItemOutcome) -> Self {
        match outcome {
            Ok(()) => self.success += 1,
            Err(failure) => {
                self.failed += 1;
                self.failures.push(failure);
            }
        }
        self
    }

    /// The single dialog shown once the batch has finished.
    pub fn report(&self) -> Alert {
        if !self.has_failures() {
            return Alert::new(
                REPORT_TITLE,
                format!(
                    "Processing complete!\nAll {} bookmarks were processed successfully!",
                    self.success
                ),
            )
            .icon(Icon::Status);
        }

        let mut message = format!(
            "Processing complete!\nSucceeded: {}\nFailed: {}\n\nFailed bookmarks:\n\n",
            self.success, self.failed
        );
        for failure in &self.failures {
            message.push_str(&format!(
                "#{}:\nName: {}\nError: {}\n\n",
                failure.index, failure.name, failure.error
            ));
        }
        Alert::new(REPORT_TITLE_WITH_FAILURES, message).icon(Icon::Warning)
    }

    fn log_summary(&self) {
        info!("=== processing complete ===");
        info!("succeeded: {}", self.success);
        info!("failed: {}", self.failed);
        if self.has_failures() {
            warn!("=== failure details ===");
            for failure in &self.failures {
                warn!(
                    "bookmark #{} '{}' failed: {}",
                    failure.index, failure.name, failure.error
                );
            }
        } else {
            info!("all bookmarks processed successfully");
        }
    }
}

impl FromIterator<ItemOutcome> for ProcessingResult {
    fn from_iter<I: IntoIterator<Item = ItemOutcome>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ProcessingResult::default(), ProcessingResult::record)
    }
}

/// Drives one batch run through `Idle -> Confirming -> Running -> Completed`.
pub struct BatchProcessor<'a, D: Document> {
    doc: &'a mut D,
    config: &'a FooterConfig,
    state: BatchState,
}

impl<'a, D: Document> BatchProcessor<'a, D> {
    pub fn new(doc: &'a mut D, config: &'a FooterConfig) -> Self {
        Self {
            doc,
            config,
            state: BatchState::Idle,
        }
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Asks the operator whether to continue and disposes of the preview
    /// whatever the answer. Returns `false` when the operator declined.
    ///
    /// A preview that cannot be removed stops the run: stamping the batch on
    /// top of it would leave two footers on the first page.
    pub fn confirm<P: Prompter>(
        &mut self,
        prompter: &mut P,
        preview: Option<AnnotationHandle>,
    ) -> Result<bool> {
        self.state = BatchState::Confirming;
        let alert = Alert::new(
            CONFIRM_TITLE,
            "Check the preview on the current page.\nContinue with all bookmarks?",
        )
        .icon(Icon::Question)
        .buttons(Buttons::YesNo);
        let choice = prompter.alert(&alert);

        if let Some(preview) = preview {
            if let Err(e) = self.doc.destroy_annotation(preview) {
                self.state = BatchState::Completed;
                return Err(e);
            }
        }

        if choice != Choice::Yes {
            info!("operation cancelled by user");
            self.state = BatchState::Completed;
            return Ok(false);
        }
        Ok(true)
    }

    /// Stamps every bookmark in order. Never stops on a failed item.
    pub fn run(&mut self, bookmarks: &[D::Bookmark]) -> ProcessingResult {
        self.state = BatchState::Running;
        info!("processing all bookmarks...");
        info!("bookmark count: {}", bookmarks.len());

        let total = bookmarks.len();
        bookmarks
            .iter()
            .enumerate()
            .map(|(i, bookmark)| self.process_item(i + 1, total, bookmark))
            .collect()
    }

    fn process_item(&mut self, index: usize, total: usize, bookmark: &D::Bookmark) -> ItemOutcome {
        let name = bookmark.name();
        info!("processing bookmark [{}/{}]: {}", index, total, name);

        match self.stamp(bookmark) {
            Ok(_) => {
                info!("✓ footer annotation added");
                Ok(())
            }
            Err(e) => {
                warn!("✗ failed: {}", e);
                Err(FailureRecord {
                    index,
                    name: name.to_string(),
                    error: e.to_string(),
                })
            }
        }
    }

    fn stamp(&mut self, bookmark: &D::Bookmark) -> Result<AnnotationHandle> {
        self.doc.navigate(bookmark)?;
        let page = self.doc.current_page();
        create_footer_annotation(&mut *self.doc, page, bookmark.name(), self.config)
    }

    /// Restores the page shown before the run, logs the summary and shows
    /// the final report.
    pub fn complete<P: Prompter>(
        &mut self,
        result: &ProcessingResult,
        original_page: u32,
        prompter: &mut P,
    ) {
        self.doc.set_current_page(original_page);
        result.log_summary();
        prompter.alert(&result.report());
        self.state = BatchState::Completed;
    }
}
