pub mod bridge;
pub mod browser;
pub mod cli;
pub mod error;
pub mod form;
pub mod record;
pub mod selector;
pub mod task;
pub mod trace;
pub mod watch;

use crate::browser::frames::SrcdocFrames;
use crate::browser::layout::NoLayout;
use crate::browser::page::PageDocuments;
use crate::form::form_model::FormGroups;
use crate::form::graph::FormScanner;

/// One parse pass over an HTML string with default settings: `srcdoc`
/// iframes are read, `src` iframes are skipped, and no layout is known.
pub fn scan_html(html: &str) -> FormGroups {
    let scanner = FormScanner::default();
    let page = PageDocuments::parse(html, None, &SrcdocFrames, scanner.resolver());
    scanner.scan(&page, &NoLayout)
}
