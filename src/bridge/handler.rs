use scraper::ElementRef;
use tracing::{info, warn};

use crate::bridge::message::{Message, Reply};
use crate::bridge::store::SnapshotStore;
use crate::browser::locator::locate;
use crate::browser::page::PageDocuments;
use crate::selector::{SelectorResolver, query_selector_expression};

/// Answers [`Message`]s against a store and, when loaded, a page.
pub struct MessageHandler<'p> {
    store: &'p mut SnapshotStore,
    page: Option<&'p PageDocuments>,
    resolver: SelectorResolver,
    context_element: Option<ElementRef<'p>>,
}

impl<'p> MessageHandler<'p> {
    pub fn new(store: &'p mut SnapshotStore, resolver: SelectorResolver) -> Self {
        Self {
            store,
            page: None,
            resolver,
            context_element: None,
        }
    }

    pub fn with_page(mut self, page: &'p PageDocuments) -> Self {
        self.page = Some(page);
        self
    }

    /// Element a `getSelector` request refers to.
    pub fn with_context_element(mut self, el: ElementRef<'p>) -> Self {
        self.context_element = Some(el);
        self
    }

    pub fn handle(&mut self, message: Message) -> Reply {
        let action = message.action();
        let reply = match message {
            Message::FormElementsUpdated { form_elements, .. } => {
                self.store.set_snapshot(form_elements);
                info!(total = self.store.total_elements(), "snapshot updated");
                self.persist()
            }

            Message::GetFormElements => Reply::FormElements {
                form_elements: self.store.snapshot().clone(),
                total_elements: self.store.total_elements(),
            },

            Message::TestSelector {
                selector,
                parent_selector,
                iframe_index,
            } => match self.page {
                Some(page) => match locate(page, &selector, parent_selector.as_deref(), iframe_index) {
                    Some(_) => Reply::ok(),
                    None => Reply::failed(format!("no element matches '{selector}'")),
                },
                None => Reply::failed("no page loaded"),
            },

            Message::GetSelector => match self.context_element {
                Some(el) => match self.resolver.resolve(el, None).into_option() {
                    Some(selector) => Reply::Selector {
                        success: true,
                        selector: query_selector_expression(&selector),
                    },
                    None => Reply::failed("cannot build a unique selector"),
                },
                None => Reply::failed("no element selected"),
            },

            Message::ExecuteScript { script } => {
                self.store.set_custom_script(script);
                self.persist()
            }

            Message::ClearSiteData { origin } => {
                self.store.clear_origin(&origin);
                self.persist()
            }
        };

        if !reply.is_success() {
            warn!(action, ?reply, "message not handled");
        }
        reply
    }

    fn persist(&self) -> Reply {
        match self.store.save() {
            Ok(()) => Reply::ok(),
            Err(e) => Reply::failed(e),
        }
    }
}
