use log::{info, warn};

use crate::config::FooterConfig;
use crate::error::{FooterError, Result};
use crate::host::{AnnotationHandle, Document, FooterAnnotation};

/// Creates one footer annotation on `page` showing `text`.
///
/// A host that declines without raising is reported as
/// [`FooterError::AnnotationCreation`]; host errors are returned unchanged.
pub fn create_footer_annotation<D: Document>(
    doc: &mut D,
    page: u32,
    text: &str,
    config: &FooterConfig,
) -> Result<AnnotationHandle> {
    info!("  creating footer annotation");
    info!("  - page: {}", page + 1);
    info!("  - text: {}", text);

    match try_create(doc, page, text, config) {
        Ok(handle) => {
            info!("  ✓ footer annotation created");
            Ok(handle)
        }
        Err(e) => {
            warn!("  ! error while creating annotation: {}", e);
            Err(e)
        }
    }
}

fn try_create<D: Document>(
    doc: &mut D,
    page: u32,
    text: &str,
    config: &FooterConfig,
) -> Result<AnnotationHandle> {
    let request = FooterAnnotation::from_config(config, page, text);
    let handle = doc
        .create_annotation(&request)?
        .ok_or(FooterError::AnnotationCreation)?;
    doc.set_style(&handle, &request.border)?;
    Ok(handle)
}
