//! Capabilities the footer workflow needs from the environment holding the
//! document: outline access, page navigation, annotation storage and modal
//! dialogs.

use lopdf::ObjectId;

use crate::config::{Color, FooterConfig, Rect};
use crate::error::Result;

/// Annotation flag bits (PDF 32000-1, table 165).
pub mod flags {
    pub const PRINT: u32 = 1 << 2;
    pub const READ_ONLY: u32 = 1 << 6;
    pub const LOCKED: u32 = 1 << 7;
}

/// A named entry of the document outline.
pub trait Bookmark {
    fn name(&self) -> &str;
}

/// An open document that footers are stamped into.
pub trait Document {
    type Bookmark: Bookmark;

    fn document_name(&self) -> String;

    fn page_count(&self) -> usize;

    /// Top-level outline entries in tree order.
    fn bookmarks(&self) -> Result<Vec<Self::Bookmark>>;

    /// 0-based index of the page currently shown.
    fn current_page(&self) -> u32;

    fn set_current_page(&mut self, page: u32);

    /// Moves the current page to the bookmark's target.
    fn navigate(&mut self, bookmark: &Self::Bookmark) -> Result<()>;

    /// Adds an annotation. `Ok(None)` means the host refused without raising.
    fn create_annotation(&mut self, request: &FooterAnnotation) -> Result<Option<AnnotationHandle>>;

    fn set_style(&mut self, annotation: &AnnotationHandle, border: &BorderStyle) -> Result<()>;

    fn destroy_annotation(&mut self, annotation: AnnotationHandle) -> Result<()>;
}

/// Handle to an annotation created through [`Document::create_annotation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotationHandle {
    pub id: ObjectId,
    pub page: u32,
}

/// Value written to `/Q`. Footers are always centered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Center = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderKind {
    Solid,
    Dashed,
    Beveled,
    Inset,
    Underline,
}

impl BorderKind {
    pub fn pdf_name(&self) -> &'static [u8] {
        match self {
            BorderKind::Solid => b"S",
            BorderKind::Dashed => b"D",
            BorderKind::Beveled => b"B",
            BorderKind::Inset => b"I",
            BorderKind::Underline => b"U",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderStyle {
    pub width: f32,
    pub kind: BorderKind,
    /// `None` leaves the line ending undecorated.
    pub line_ending: Option<&'static str>,
}

impl BorderStyle {
    pub const NONE: BorderStyle = BorderStyle {
        width: 0.0,
        kind: BorderKind::Solid,
        line_ending: None,
    };
}

/// Everything the host needs to create one free-text annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct FooterAnnotation {
    pub page: u32,
    pub rect: Rect,
    pub contents: String,
    pub alignment: Alignment,
    pub font: String,
    pub text_size: f32,
    pub text_color: Color,
    pub stroke_color: Color,
    pub fill_color: Color,
    pub border: BorderStyle,
    pub opacity: f32,
    pub rotation: i32,
    pub flags: u32,
}

impl FooterAnnotation {
    pub fn from_config(config: &FooterConfig, page: u32, text: &str) -> Self {
        Self {
            page,
            rect: config.rect,
            contents: text.to_string(),
            alignment: Alignment::Center,
            font: config.font.to_string(),
            text_size: config.text_size,
            text_color: config.text_color,
            stroke_color: config.stroke_color,
            fill_color: config.fill_color,
            border: BorderStyle::NONE,
            opacity: 1.0,
            rotation: 0,
            flags: flags::PRINT | flags::READ_ONLY | flags::LOCKED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Error,
    Warning,
    Question,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Buttons {
    Ok,
    YesNo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Ok,
    No,
    Yes,
}

/// A modal message shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub icon: Icon,
    pub buttons: Buttons,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            icon: Icon::Status,
            buttons: Buttons::Ok,
        }
    }

    pub fn icon(mut self, icon: Icon) -> Self {
        self.icon = icon;
        self
    }

    pub fn buttons(mut self, buttons: Buttons) -> Self {
        self.buttons = buttons;
        self
    }
}

pub trait Prompter {
    fn alert(&mut self, alert: &Alert) -> Choice;
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn alert(&mut self, alert: &Alert) -> Choice {
        (**self).alert(alert)
    }
}
