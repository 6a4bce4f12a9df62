use std::path::Path;

use scraper::{ElementRef, Html};
use tracing::{info, warn};

use crate::browser::frames::FrameSource;
use crate::error::{FormscoutError, Result};
use crate::selector::SelectorResolver;
use crate::selector::query::query_all;

// ============================================================================
// A page: top document plus readable same-origin iframe documents
// ============================================================================

/// A same-origin iframe whose content could be read.
pub struct FrameDocument {
    /// Zero-based position among all `<iframe>` elements of the top document.
    pub index: usize,
    /// Selector of the `<iframe>` element in the top document.
    pub iframe_selector: String,
    pub document: Html,
}

/// Parsed documents of one page snapshot.
pub struct PageDocuments {
    pub url: Option<String>,
    pub top: Html,
    pub frames: Vec<FrameDocument>,
}

impl PageDocuments {
    /// Parse `html` and resolve every iframe through `frames`. Frames that
    /// cannot be read are logged and skipped.
    pub fn parse(html: &str, url: Option<&str>, frames: &dyn FrameSource, resolver: &SelectorResolver) -> Self {
        let top = Html::parse_document(html);
        let frames = load_frames(&top, frames, resolver);

        Self {
            url: url.map(str::to_string),
            top,
            frames,
        }
    }

    /// The document an iframe index refers to (`None` = top document).
    pub fn document(&self, iframe_index: Option<usize>) -> Option<&Html> {
        match iframe_index {
            None => Some(&self.top),
            Some(index) => self.frames.iter().find(|f| f.index == index).map(|f| &f.document),
        }
    }

    pub fn frame(&self, index: usize) -> Option<&FrameDocument> {
        self.frames.iter().find(|f| f.index == index)
    }
}

fn load_frames(top: &Html, source: &dyn FrameSource, resolver: &SelectorResolver) -> Vec<FrameDocument> {
    let root = top.root_element();
    let iframes: Vec<ElementRef<'_>> = query_all(root, "iframe");

    let mut frames = Vec::new();
    for (index, iframe) in iframes.into_iter().enumerate() {
        match source.content_document(index, iframe) {
            Ok(Some(document)) => {
                let iframe_selector = resolver.resolve(iframe, None).as_str().to_string();
                frames.push(FrameDocument {
                    index,
                    iframe_selector,
                    document,
                });
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "iframe content unavailable; skipping"),
        }
    }
    frames
}

/// Read an HTML file from disk.
pub fn read_html_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| FormscoutError::io(format!("reading {}", path.display()), e))
}

/// Fetch a page's HTML over HTTP (blocking).
pub fn fetch_html(url: &str) -> Result<String> {
    info!(url, "fetching page");
    let fetch_err = |source: reqwest::Error| FormscoutError::Fetch {
        url: url.to_string(),
        source,
    };

    reqwest::blocking::get(url)
        .and_then(|resp| resp.error_for_status())
        .and_then(|resp| resp.text())
        .map_err(fetch_err)
}
