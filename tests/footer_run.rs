use std::time::Duration;

use lopdf::{Document as LoDocument, Object, ObjectId, decode_text_string, dictionary};
use pdfooter::{
    Alert, Buttons, Choice, Document, FooterError, Orchestrator, PdfDocument, Prompter,
    RunOutcome, TerminalPrompter,
};
use tempfile::tempdir;

struct Answer {
    choice: Choice,
    titles: Vec<String>,
}

impl Prompter for Answer {
    fn alert(&mut self, alert: &Alert) -> Choice {
        self.titles.push(alert.title.clone());
        match alert.buttons {
            Buttons::Ok => Choice::Ok,
            _ => self.choice,
        }
    }
}

/// Builds a PDF with `pages` pages and one bookmark per `(title, page)` pair.
/// A `None` page gives the bookmark a destination outside the page tree.
fn build_pdf(pages: usize, bookmarks: &[(&str, Option<usize>)]) -> LoDocument {
    let mut doc = LoDocument::with_version("1.7");
    let pages_id = doc.new_object_id();
    let page_ids: Vec<ObjectId> = (0..pages)
        .map(|_| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            })
        })
        .collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
            "Count" => pages as i64,
        }),
    );

    let outlines_id = doc.new_object_id();
    let item_ids: Vec<ObjectId> = bookmarks.iter().map(|_| doc.new_object_id()).collect();
    for (i, (title, page)) in bookmarks.iter().enumerate() {
        let target = match page {
            Some(p) => Object::Reference(page_ids[*p]),
            None => Object::Reference((9999, 0)),
        };
        let mut item = dictionary! {
            "Title" => Object::string_literal(*title),
            "Parent" => Object::Reference(outlines_id),
            "Dest" => vec![target, "Fit".into()],
        };
        if i + 1 < item_ids.len() {
            item.set("Next", Object::Reference(item_ids[i + 1]));
        }
        if i > 0 {
            item.set("Prev", Object::Reference(item_ids[i - 1]));
        }
        doc.objects.insert(item_ids[i], Object::Dictionary(item));
    }

    let mut outlines = dictionary! { "Type" => "Outlines", "Count" => item_ids.len() as i64 };
    if let (Some(first), Some(last)) = (item_ids.first(), item_ids.last()) {
        outlines.set("First", Object::Reference(*first));
        outlines.set("Last", Object::Reference(*last));
    }
    doc.objects.insert(outlines_id, Object::Dictionary(outlines));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
        "Outlines" => Object::Reference(outlines_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc
}

fn footer_texts(doc: &LoDocument) -> Vec<(u32, String)> {
    let mut texts = Vec::new();
    for (page_no, page_id) in doc.get_pages() {
        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        let Ok(annots) = page.get(b"Annots").and_then(Object::as_array) else {
            continue;
        };
        for annot in annots {
            let annot = doc.get_object(annot.as_reference().unwrap()).unwrap();
            let contents = annot.as_dict().unwrap().get(b"Contents").unwrap();
            texts.push((page_no, decode_text_string(contents).unwrap_or_default()));
        }
    }
    texts
}

#[test]
fn stamps_every_bookmarked_page_and_saves() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("stamped.pdf");
    let preview = dir.path().join("preview.pdf");

    let doc = PdfDocument::from_document(
        build_pdf(4, &[("Cover", Some(0)), ("Chapter 1", Some(1)), ("Chapter 2", Some(3))]),
        "book.pdf",
    );
    let mut orchestrator =
        Orchestrator::new(TerminalPrompter::new().assume_yes(true)).with_delay(Duration::ZERO);
    let outcome = orchestrator.run(Some(doc), |d: &PdfDocument| d.save_copy(&preview));

    let RunOutcome::Completed { mut document, result } = outcome else {
        panic!("run did not complete");
    };
    assert_eq!((result.success, result.failed), (3, 0));
    assert_eq!(document.current_page(), 0);
    document.save(&output).unwrap();

    let saved = LoDocument::load(&output).unwrap();
    assert_eq!(
        footer_texts(&saved),
        vec![
            (1, "Cover".to_string()),
            (2, "Chapter 1".to_string()),
            (4, "Chapter 2".to_string()),
        ]
    );

    // the preview copy holds only the first footer
    let preview_doc = LoDocument::load(&preview).unwrap();
    assert_eq!(footer_texts(&preview_doc), vec![(1, "Cover".to_string())]);
}

#[test]
fn broken_bookmark_is_reported_and_others_stamped() {
    let doc = PdfDocument::from_document(
        build_pdf(3, &[("A", Some(0)), ("B", None), ("C", Some(2))]),
        "broken.pdf",
    );
    let mut orchestrator = Orchestrator::new(Answer {
        choice: Choice::Yes,
        titles: Vec::new(),
    })
    .with_delay(Duration::ZERO);

    let RunOutcome::Completed { document, result } = orchestrator.run(Some(doc), |_| Ok(())) else {
        panic!("run did not complete");
    };
    assert_eq!((result.success, result.failed), (2, 1));
    assert_eq!(result.failures[0].index, 2);
    assert_eq!(result.failures[0].name, "B");
    assert_eq!(
        footer_texts(document.inner()),
        vec![(1, "A".to_string()), (3, "C".to_string())]
    );
    assert_eq!(
        orchestrator.prompter().titles.last().map(String::as_str),
        Some("Add footer annotations - with failures")
    );
}

#[test]
fn declining_leaves_document_untouched() {
    let doc = PdfDocument::from_document(build_pdf(2, &[("A", Some(1))]), "a.pdf");
    let mut orchestrator = Orchestrator::new(Answer {
        choice: Choice::No,
        titles: Vec::new(),
    })
    .with_delay(Duration::ZERO);

    let RunOutcome::Cancelled { document } = orchestrator.run(Some(doc), |_| Ok(())) else {
        panic!("run was not cancelled");
    };
    assert!(footer_texts(document.inner()).is_empty());
    assert_eq!(orchestrator.prompter().titles.len(), 2);
}

#[test]
fn document_without_outline_is_fatal() {
    let doc = PdfDocument::from_document(build_pdf(2, &[]), "plain.pdf");
    let mut orchestrator = Orchestrator::new(Answer {
        choice: Choice::Yes,
        titles: Vec::new(),
    })
    .with_delay(Duration::ZERO);

    let outcome = orchestrator.run(Some(doc), |_| Ok(()));
    assert!(matches!(outcome, RunOutcome::Failed(FooterError::NoBookmarks)));
    assert_eq!(orchestrator.prompter().titles, vec!["Error".to_string()]);
}
