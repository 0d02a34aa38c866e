//! In-memory host used by the unit tests.

use std::collections::{HashMap, VecDeque};

use crate::error::{FooterError, Result};
use crate::host::{
    Alert, AnnotationHandle, Bookmark, BorderStyle, Buttons, Choice, Document, FooterAnnotation,
    Prompter,
};

#[derive(Debug, Clone)]
pub struct FakeBookmark {
    pub name: String,
    pub target: u32,
}

impl Bookmark for FakeBookmark {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Default)]
pub struct FakeDocument {
    pub pages: usize,
    pub bookmarks: Vec<FakeBookmark>,
    pub current: u32,
    pub nav_failures: HashMap<String, String>,
    pub refuse_creation: bool,
    pub fail_creation_with: Option<String>,
    pub fail_destroy: bool,
    pub annotations: Vec<(AnnotationHandle, FooterAnnotation)>,
    pub styled: Vec<AnnotationHandle>,
    pub destroyed: Vec<AnnotationHandle>,
    pub created: usize,
    pub navigations: Vec<String>,
}

impl FakeDocument {
    pub fn with_bookmarks(bookmarks: &[(&str, u32)]) -> Self {
        Self {
            pages: 10,
            bookmarks: bookmarks
                .iter()
                .map(|&(name, target)| FakeBookmark {
                    name: name.to_string(),
                    target,
                })
                .collect(),
            ..Default::default()
        }
    }

    pub fn fail_navigation(mut self, name: &str, reason: &str) -> Self {
        self.nav_failures.insert(name.to_string(), reason.to_string());
        self
    }

    pub fn annotation(&self, handle: &AnnotationHandle) -> Option<&FooterAnnotation> {
        self.annotations
            .iter()
            .find(|(h, _)| h == handle)
            .map(|(_, a)| a)
    }

    pub fn pages_with_annotations(&self) -> Vec<u32> {
        self.annotations.iter().map(|(h, _)| h.page).collect()
    }
}

impl Document for FakeDocument {
    type Bookmark = FakeBookmark;

    fn document_name(&self) -> String {
        "fake.pdf".to_string()
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn bookmarks(&self) -> Result<Vec<FakeBookmark>> {
        Ok(self.bookmarks.clone())
    }

    fn current_page(&self) -> u32 {
        self.current
    }

    fn set_current_page(&mut self, page: u32) {
        self.current = page;
    }

    fn navigate(&mut self, bookmark: &FakeBookmark) -> Result<()> {
        self.navigations.push(bookmark.name.clone());
        if let Some(reason) = self.nav_failures.get(&bookmark.name) {
            return Err(FooterError::Navigation {
                name: bookmark.name.clone(),
                reason: reason.clone(),
            });
        }
        self.current = bookmark.target;
        Ok(())
    }

    fn create_annotation(&mut self, request: &FooterAnnotation) -> Result<Option<AnnotationHandle>> {
        if let Some(reason) = &self.fail_creation_with {
            return Err(FooterError::Host(reason.clone()));
        }
        if self.refuse_creation {
            return Ok(None);
        }
        self.created += 1;
        let handle = AnnotationHandle {
            id: (self.created as u32, 0),
            page: request.page,
        };
        self.annotations.push((handle, request.clone()));
        Ok(Some(handle))
    }

    fn set_style(&mut self, annotation: &AnnotationHandle, _border: &BorderStyle) -> Result<()> {
        self.styled.push(*annotation);
        Ok(())
    }

    fn destroy_annotation(&mut self, annotation: AnnotationHandle) -> Result<()> {
        if self.fail_destroy {
            return Err(FooterError::Host("annotation is locked".to_string()));
        }
        let before = self.annotations.len();
        self.annotations.retain(|(h, _)| *h != annotation);
        if self.annotations.len() == before {
            return Err(FooterError::UnknownAnnotation(annotation.id));
        }
        self.destroyed.push(annotation);
        Ok(())
    }
}

/// Answers prompts from a script and records every alert shown.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    pub answers: VecDeque<Choice>,
    pub shown: Vec<Alert>,
}

impl ScriptedPrompter {
    pub fn answering(answers: &[Choice]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            shown: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn alert(&mut self, alert: &Alert) -> Choice {
        self.shown.push(alert.clone());
        match alert.buttons {
            Buttons::Ok => Choice::Ok,
            _ => self.answers.pop_front().unwrap_or(Choice::Yes),
        }
    }
}
