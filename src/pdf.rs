//! [`Document`] backed by a `lopdf` document loaded from disk.

use std::collections::HashSet;
use std::path::Path;

use log::debug;
use lopdf::{Dictionary, Object, ObjectId, StringFormat, decode_text_string, text_string};

use crate::error::{FooterError, Result};
use crate::host::{AnnotationHandle, Bookmark, BorderStyle, Document, FooterAnnotation};

const MAX_SIBLINGS: usize = 10_000;
const MAX_DEST_DEPTH: usize = 8;
const MAX_NAME_TREE_DEPTH: usize = 32;

/// A top-level entry of the document outline.
#[derive(Debug, Clone)]
pub struct OutlineItem {
    pub id: ObjectId,
    pub title: String,
    dest: Option<Object>,
    action: Option<Object>,
}

impl Bookmark for OutlineItem {
    fn name(&self) -> &str {
        &self.title
    }
}

pub struct PdfDocument {
    doc: lopdf::Document,
    name: String,
    pages: Vec<ObjectId>,
    current_page: u32,
}

impl PdfDocument {
    pub fn load(path: &Path) -> Result<Self> {
        let doc = lopdf::Document::load(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "untitled.pdf".to_string());
        Ok(Self::from_document(doc, name))
    }

    /// Wraps an in-memory document. The current page starts at the
    /// document's open action when it points to a page, otherwise at 0.
    pub fn from_document(doc: lopdf::Document, name: impl Into<String>) -> Self {
        let pages = doc.get_pages().into_values().collect();
        let mut this = Self {
            doc,
            name: name.into(),
            pages,
            current_page: 0,
        };
        if let Some(page) = this.open_action_page() {
            this.current_page = page;
        }
        this
    }

    pub fn inner(&self) -> &lopdf::Document {
        &self.doc
    }

    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.doc.save(path)?;
        Ok(())
    }

    /// Saves the current state without touching this document.
    pub fn save_copy(&self, path: &Path) -> Result<()> {
        let mut copy = self.doc.clone();
        copy.save(path)?;
        Ok(())
    }

    /// Object ids listed in the page's `/Annots` array.
    pub fn annotation_ids(&self, page: u32) -> Result<Vec<ObjectId>> {
        let page_id = self.page_id(page)?;
        let page_dict = self.doc.get_object(page_id)?.as_dict()?;
        let annots = match page_dict.get(b"Annots") {
            Ok(obj) => self.resolve(obj)?,
            Err(_) => return Ok(Vec::new()),
        };
        Ok(annots
            .as_array()?
            .iter()
            .filter_map(|o| o.as_reference().ok())
            .collect())
    }

    fn page_id(&self, page: u32) -> Result<ObjectId> {
        self.pages
            .get(page as usize)
            .copied()
            .ok_or(FooterError::PageOutOfRange {
                index: page,
                count: self.pages.len(),
            })
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> Result<&'a Object> {
        match obj {
            Object::Reference(id) => Ok(self.doc.get_object(*id)?),
            other => Ok(other),
        }
    }

    fn catalog(&self) -> Result<&Dictionary> {
        let root = self.doc.trailer.get(b"Root")?;
        Ok(self.resolve(root)?.as_dict()?)
    }

    fn open_action_page(&self) -> Option<u32> {
        let action = self.catalog().ok()?.get(b"OpenAction").ok()?;
        self.resolve_destination(action, 0).ok()
    }

    /// Resolves an explicit or named destination to a 0-based page index.
    fn resolve_destination(&self, dest: &Object, depth: usize) -> std::result::Result<u32, String> {
        if depth > MAX_DEST_DEPTH {
            return Err("destination chain too deep".to_string());
        }
        let dest = self.resolve(dest).map_err(|e| e.to_string())?;
        match dest {
            Object::Array(items) => match items.first() {
                Some(Object::Reference(page_ref)) => self
                    .pages
                    .iter()
                    .position(|id| id == page_ref)
                    .map(|i| i as u32)
                    .ok_or_else(|| format!("destination page {:?} is not in the page tree", page_ref)),
                Some(Object::Integer(n)) if *n >= 0 && (*n as usize) < self.pages.len() => {
                    Ok(*n as u32)
                }
                Some(other) => Err(format!("unsupported destination target {:?}", other)),
                None => Err("empty destination".to_string()),
            },
            Object::Dictionary(dict) => match dict.get(b"D") {
                Ok(inner) => self.resolve_destination(inner, depth + 1),
                Err(_) => Err("destination dictionary has no /D entry".to_string()),
            },
            Object::Name(name) => {
                let target = self.named_destination(name, true)?;
                self.resolve_destination(&target, depth + 1)
            }
            Object::String(name, _) => {
                let target = self.named_destination(name, false)?;
                self.resolve_destination(&target, depth + 1)
            }
            other => Err(format!("unsupported destination {:?}", other)),
        }
    }

    /// Looks a named destination up in the catalog `/Dests` dictionary and
    /// in the `/Names /Dests` name tree.
    fn named_destination(&self, name: &[u8], is_name: bool) -> std::result::Result<Object, String> {
        let display = String::from_utf8_lossy(name).to_string();
        let catalog = self.catalog().map_err(|e| e.to_string())?;

        if is_name {
            if let Ok(dests) = catalog.get(b"Dests") {
                if let Ok(Ok(dests)) = self.resolve(dests).map(Object::as_dict) {
                    if let Ok(target) = dests.get(name) {
                        return Ok(target.clone());
                    }
                }
            }
        }

        let tree = catalog
            .get(b"Names")
            .ok()
            .and_then(|names| self.resolve(names).ok())
            .and_then(|names| names.as_dict().ok())
            .and_then(|names| names.get(b"Dests").ok());
        if let Some(tree) = tree {
            if let Some(target) = self.name_tree_lookup(tree, name, 0) {
                return Ok(target.clone());
            }
        }

        Err(format!("named destination '{}' not found", display))
    }

    fn name_tree_lookup<'a>(&'a self, node: &'a Object, key: &[u8], depth: usize) -> Option<&'a Object> {
        if depth > MAX_NAME_TREE_DEPTH {
            return None;
        }
        let node = self.resolve(node).ok()?.as_dict().ok()?;

        if let Ok(names) = node.get(b"Names").and_then(Object::as_array) {
            for pair in names.chunks(2) {
                if let [Object::String(k, _), value] = pair {
                    if k.as_slice() == key {
                        return Some(value);
                    }
                }
            }
        }

        if let Ok(kids) = node.get(b"Kids").and_then(Object::as_array) {
            for kid in kids {
                if let Some(found) = self.name_tree_lookup(kid, key, depth + 1) {
                    return Some(found);
                }
            }
        }
        None
    }

    fn action_destination<'a>(&'a self, action: &'a Object) -> std::result::Result<&'a Object, String> {
        let action = self
            .resolve(action)
            .and_then(|a| Ok(a.as_dict()?))
            .map_err(|e| e.to_string())?;
        let kind = action
            .get(b"S")
            .and_then(Object::as_name)
            .map(|n| String::from_utf8_lossy(n).to_string())
            .unwrap_or_default();
        if kind != "GoTo" {
            return Err(format!("unsupported bookmark action /{}", kind));
        }
        action
            .get(b"D")
            .map_err(|_| "GoTo action has no destination".to_string())
    }

    fn add_to_page(&mut self, page_id: ObjectId, annot_id: ObjectId) -> Result<()> {
        let annots_ref = match self.doc.get_object(page_id)?.as_dict()?.get(b"Annots") {
            Ok(Object::Reference(id)) => Some(*id),
            _ => None,
        };

        if let Some(arr_id) = annots_ref {
            if let Object::Array(arr) = self.doc.get_object_mut(arr_id)? {
                arr.push(Object::Reference(annot_id));
                return Ok(());
            }
        }

        let page_dict = self.doc.get_object_mut(page_id)?.as_dict_mut()?;
        if let Ok(Object::Array(arr)) = page_dict.get_mut(b"Annots") {
            arr.push(Object::Reference(annot_id));
        } else {
            page_dict.set("Annots", Object::Array(vec![Object::Reference(annot_id)]));
        }
        Ok(())
    }

    /// Removes `annot_id` from the page's `/Annots`. Returns whether it was listed.
    fn remove_from_page(&mut self, page_id: ObjectId, annot_id: ObjectId) -> Result<bool> {
        let target = Object::Reference(annot_id);
        let annots_ref = match self.doc.get_object(page_id)?.as_dict()?.get(b"Annots") {
            Ok(Object::Reference(id)) => Some(*id),
            _ => None,
        };

        let arr = match annots_ref {
            Some(arr_id) => self.doc.get_object_mut(arr_id)?.as_array_mut()?,
            None => match self.doc.get_object_mut(page_id)?.as_dict_mut()?.get_mut(b"Annots") {
                Ok(Object::Array(arr)) => arr,
                _ => return Ok(false),
            },
        };
        let before = arr.len();
        arr.retain(|o| *o != target);
        Ok(arr.len() != before)
    }
}

impl Document for PdfDocument {
    type Bookmark = OutlineItem;

    fn document_name(&self) -> String {
        self.name.clone()
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn bookmarks(&self) -> Result<Vec<OutlineItem>> {
        let outlines = match self.catalog()?.get(b"Outlines") {
            Ok(obj) => self.resolve(obj)?,
            Err(_) => return Ok(Vec::new()),
        };
        let mut current = match outlines.as_dict()?.get(b"First") {
            Ok(Object::Reference(id)) => Some(*id),
            _ => None,
        };

        let mut items = Vec::new();
        let mut visited = HashSet::new();
        while let Some(node_id) = current {
            if !visited.insert(node_id) || items.len() >= MAX_SIBLINGS {
                break;
            }
            let node = self.doc.get_object(node_id)?.as_dict()?;
            let title = node
                .get(b"Title")
                .ok()
                .and_then(|t| self.resolve(t).ok())
                .and_then(|t| decode_text_string(t).ok())
                .unwrap_or_default();

            items.push(OutlineItem {
                id: node_id,
                title,
                dest: node.get(b"Dest").ok().cloned(),
                action: node.get(b"A").ok().cloned(),
            });

            current = match node.get(b"Next") {
                Ok(Object::Reference(id)) => Some(*id),
                _ => None,
            };
        }
        Ok(items)
    }

    fn current_page(&self) -> u32 {
        self.current_page
    }

    fn set_current_page(&mut self, page: u32) {
        self.current_page = page;
    }

    fn navigate(&mut self, bookmark: &OutlineItem) -> Result<()> {
        let resolved = match (&bookmark.dest, &bookmark.action) {
            (Some(dest), _) => self.resolve_destination(dest, 0),
            (None, Some(action)) => self
                .action_destination(action)
                .and_then(|dest| self.resolve_destination(dest, 0)),
            (None, None) => Err("bookmark has no destination".to_string()),
        };

        let page = resolved.map_err(|reason| FooterError::Navigation {
            name: bookmark.title.clone(),
            reason,
        })?;
        debug!("'{}' -> page {}", bookmark.title, page + 1);
        self.current_page = page;
        Ok(())
    }

    fn create_annotation(&mut self, request: &FooterAnnotation) -> Result<Option<AnnotationHandle>> {
        let page_id = self.page_id(request.page)?;
        let annot = free_text_dictionary(request, page_id);
        let annot_id = self.doc.add_object(Object::Dictionary(annot));
        self.add_to_page(page_id, annot_id)?;
        Ok(Some(AnnotationHandle {
            id: annot_id,
            page: request.page,
        }))
    }

    fn set_style(&mut self, annotation: &AnnotationHandle, border: &BorderStyle) -> Result<()> {
        let dict = self
            .doc
            .get_object_mut(annotation.id)
            .map_err(|_| FooterError::UnknownAnnotation(annotation.id))?
            .as_dict_mut()?;
        dict.set("BS", Object::Dictionary(border_dictionary(border)));
        dict.set(
            "LE",
            Object::Name(border.line_ending.unwrap_or("None").as_bytes().to_vec()),
        );
        Ok(())
    }

    fn destroy_annotation(&mut self, annotation: AnnotationHandle) -> Result<()> {
        let page_id = self.page_id(annotation.page)?;
        let listed = self.remove_from_page(page_id, annotation.id)?;
        let stored = self.doc.objects.remove(&annotation.id).is_some();
        if !listed && !stored {
            return Err(FooterError::UnknownAnnotation(annotation.id));
        }
        Ok(())
    }
}

fn free_text_dictionary(request: &FooterAnnotation, page_id: ObjectId) -> Dictionary {
    let mut annot = Dictionary::new();
    annot.set("Type", Object::Name(b"Annot".to_vec()));
    annot.set("Subtype", Object::Name(b"FreeText".to_vec()));
    annot.set("IT", Object::Name(b"FreeTextTypewriter".to_vec()));
    annot.set("P", Object::Reference(page_id));
    annot.set(
        "Rect",
        Object::Array(request.rect.to_array().into_iter().map(Object::Real).collect()),
    );
    annot.set("Contents", text_string(&request.contents));
    annot.set("Q", Object::Integer(request.alignment as i64));

    let da = format!(
        "/{} {} Tf {} {} {} {}",
        pdf_font_name(&request.font),
        format_number(request.text_size),
        color_operands(&request.text_color.components()),
        request.text_color.fill_operator(),
        color_operands(&request.stroke_color.components()),
        request.stroke_color.stroke_operator(),
    );
    annot.set("DA", Object::String(da.into_bytes(), StringFormat::Literal));

    let ds = format!(
        "font: {} {}pt; text-align:center; color:{}",
        request.font,
        format_number(request.text_size),
        request.text_color.to_hex()
    );
    annot.set("DS", text_string(&ds));

    annot.set(
        "C",
        Object::Array(
            request.fill_color
                .components()
                .into_iter()
                .map(Object::Real)
                .collect(),
        ),
    );
    annot.set("BS", Object::Dictionary(border_dictionary(&request.border)));
    annot.set("CA", Object::Real(request.opacity));
    annot.set("Rotate", Object::Integer(request.rotation as i64));
    annot.set("F", Object::Integer(request.flags as i64));
    annot
}

fn border_dictionary(border: &BorderStyle) -> Dictionary {
    let mut bs = Dictionary::new();
    bs.set("Type", Object::Name(b"Border".to_vec()));
    bs.set("W", Object::Real(border.width));
    bs.set("S", Object::Name(border.kind.pdf_name().to_vec()));
    bs
}

fn pdf_font_name(font: &str) -> String {
    font.chars().filter(|c| c.is_ascii_graphic()).collect()
}

fn color_operands(components: &[f32]) -> String {
    components
        .iter()
        .map(|c| format_number(*c))
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_number(v: f32) -> String {
    let s = format!("{:.3}", v);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
