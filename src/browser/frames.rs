use std::collections::HashMap;
use std::path::PathBuf;

use scraper::{ElementRef, Html};
use thiserror::Error;

// ============================================================================
// Iframe content access
// ============================================================================

/// Why an iframe's document could not be read. Always recoverable: the
/// iframe is skipped and the rest of the page is still parsed.
#[derive(Debug, Error)]
pub enum FrameAccessError {
    /// Content lives on another origin and cannot be read
    #[error("iframe {index} is cross-origin ({src})")]
    CrossOrigin { index: usize, src: String },

    /// Content was expected locally but could not be read
    #[error("iframe {index} content unreadable ({path}): {source}")]
    Unreadable {
        index: usize,
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Resolves an `<iframe>` element to its content document.
///
/// `Ok(None)` means the frame has no content (e.g. `about:blank`); `Err`
/// means content exists but is off limits.
pub trait FrameSource {
    fn content_document(&self, index: usize, iframe: ElementRef<'_>) -> Result<Option<Html>, FrameAccessError>;
}

/// Treats `srcdoc` frames as same-origin and every `src` frame as
/// cross-origin, which is all a static HTML snapshot can know.
#[derive(Debug, Clone, Copy, Default)]
pub struct SrcdocFrames;

impl FrameSource for SrcdocFrames {
    fn content_document(&self, index: usize, iframe: ElementRef<'_>) -> Result<Option<Html>, FrameAccessError> {
        let el = iframe.value();

        if let Some(srcdoc) = el.attr("srcdoc") {
            return Ok(Some(Html::parse_document(srcdoc)));
        }

        match el.attr("src").map(str::trim) {
            None | Some("") | Some("about:blank") => Ok(None),
            Some(src) => Err(FrameAccessError::CrossOrigin {
                index,
                src: src.to_string(),
            }),
        }
    }
}

/// Frame contents supplied as local files keyed by iframe index, falling
/// back to `srcdoc` handling for unlisted frames.
#[derive(Debug, Clone, Default)]
pub struct FileFrames {
    files: HashMap<usize, PathBuf>,
}

impl FileFrames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frame(mut self, index: usize, path: impl Into<PathBuf>) -> Self {
        self.files.insert(index, path.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FrameSource for FileFrames {
    fn content_document(&self, index: usize, iframe: ElementRef<'_>) -> Result<Option<Html>, FrameAccessError> {
        let Some(path) = self.files.get(&index) else {
            return SrcdocFrames.content_document(index, iframe);
        };

        std::fs::read_to_string(path)
            .map(|html| Some(Html::parse_document(&html)))
            .map_err(|source| FrameAccessError::Unreadable {
                index,
                path: path.display().to_string(),
                source,
            })
    }
}

/// Parse a `--frame INDEX=PATH` argument.
pub fn parse_frame_arg(arg: &str) -> Option<(usize, PathBuf)> {
    let (index, path) = arg.split_once('=')?;
    let index = index.trim().parse().ok()?;
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    Some((index, PathBuf::from(path)))
}
