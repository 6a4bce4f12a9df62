#![allow(dead_code)]

use scraper::{ElementRef, Html};

use formscout::browser::frames::SrcdocFrames;
use formscout::browser::page::PageDocuments;
use formscout::selector::SelectorResolver;
use formscout::selector::query::query_first;

/// Login form with a generated email id, plus one link outside the form.
pub const LOGIN_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Sign in</title></head>
<body>
  <form id="login-form" action="/session" method="POST">
    <label for="user_email_8f3x9q">Email</label>
    <input id="user_email_8f3x9q" type="email" name="email">
    <label for="pw">Password</label>
    <input id="pw" type="password" name="password">
    <button type="submit" class="btn-primary">Sign in</button>
  </form>
  <a href="/forgot">Forgot password?</a>
</body>
</html>"#;

/// One readable `srcdoc` iframe holding a payment form, one cross-origin iframe.
pub const IFRAME_PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
  <iframe id="checkout" srcdoc="<form id='pay'><input name='card' type='text'><button>Pay</button></form>"></iframe>
  <iframe src="https://widgets.example.net/chat"></iframe>
</body>
</html>"#;

pub fn doc(html: &str) -> Html {
    Html::parse_document(html)
}

/// First element matching `css`; panics when absent.
pub fn find<'a>(doc: &'a Html, css: &str) -> ElementRef<'a> {
    query_first(doc.root_element(), css).unwrap_or_else(|| panic!("fixture has no element for '{css}'"))
}

pub fn page(html: &str) -> PageDocuments {
    PageDocuments::parse(html, None, &SrcdocFrames, &SelectorResolver::default())
}

pub fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write fixture");
    path.display().to_string()
}
