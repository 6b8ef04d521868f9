// src/analyzer/walk.rs
// =============================================================================
// Walks the parsed HTML tree and fills in the report.
//
// The tree comes from `scraper`, which stores every node in an arena and
// hands out borrowed references, so we can look at parents and children
// freely without owning anything.
//
// Every node is visited once, parent before children, siblings left to
// right (document order). We use an explicit stack instead of recursion so
// absurdly deep markup can't overflow the call stack.
//
// What each node contributes:
// - DOCTYPE       -> html_version
// - <title>       -> page_title (only inside <head>)
// - <h1>..<h6>    -> heading_counts
// - <a href>      -> internal/external counters + a link to verify
// - <form>        -> has_login_form if it holds a password input
//
// Rust concepts:
// - Borrowing: NodeRef/ElementRef are cheap Copy handles into the tree,
//   valid only while the `Html` document is alive
// - Pattern matching: `match` on the node kind and on the tag name
// - let-else: early return when an attribute or URL is missing
// =============================================================================

use scraper::node::Doctype;
use scraper::{ElementRef, Html, Node};

use super::resolve::resolve_href;
use crate::report::{AnalysisReport, HtmlVersion};

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

// State carried through the walk
struct PageWalk<'a> {
    report: &'a mut AnalysisReport,
    base_host: &'a str,
    // Links to verify, in document order
    pending: Vec<String>,
    // Set by the first <title> in <head> that has a text child
    title_seen: bool,
}

// Walks the whole document
//
// Parameters:
//   document: the parsed page
//   report: the report being filled in
//   base_host: host[:port] of the page, for classifying links
//
// Returns: the absolute URLs of every counted link, in document order, for
// the verifier to check afterwards
pub fn walk_document(document: &Html, report: &mut AnalysisReport, base_host: &str) -> Vec<String> {
    let mut walk = PageWalk {
        report,
        base_host,
        pending: Vec::new(),
        title_seen: false,
    };

    // Start at the document root; the stack holds nodes still to visit
    let mut stack = vec![document.tree.root()];
    while let Some(node) = stack.pop() {
        // node.value() gives the Node enum: Document, Doctype, Element, Text...
        match node.value() {
            Node::Doctype(doctype) => walk.visit_doctype(doctype),
            Node::Element(_) => {
                // ElementRef adds element helpers (attr, name) on top of NodeRef
                if let Some(element) = ElementRef::wrap(node) {
                    walk.visit_element(element);
                }
            }
            _ => {}
        }

        // Reversed so the leftmost child is popped first
        stack.extend(node.children().rev());
    }

    walk.pending
}

impl PageWalk<'_> {
    fn visit_doctype(&mut self, doctype: &Doctype) {
        // html5ever splits the DOCTYPE into name, public id and system id;
        // glue the non-empty parts back together before matching
        let text = [doctype.name(), doctype.public_id(), doctype.system_id()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        self.report.html_version = HtmlVersion::from_doctype(&text);
    }

    fn visit_element(&mut self, element: ElementRef<'_>) {
        let name = element.value().name();
        match name {
            "title" => self.visit_title(element),
            "a" => self.visit_anchor(element),
            "form" => {
                if has_password_input(element) {
                    self.report.has_login_form = true;
                }
            }
            _ if HEADING_TAGS.contains(&name) => {
                self.report.count_heading(name.to_ascii_uppercase());
            }
            _ => {}
        }
    }

    // The first <title> inside <head> whose first child is text wins,
    // even if that text trims down to nothing
    fn visit_title(&mut self, title: ElementRef<'_>) {
        if self.title_seen || !is_in_head(title) {
            return;
        }

        // first_child() is an Option; as_text() is None for element children
        if let Some(text) = title.first_child().and_then(|child| child.value().as_text()) {
            self.report.page_title = text.trim().to_string();
            self.title_seen = true;
        }
    }

    // Only the first href attribute counts; html5ever already drops duplicates
    fn visit_anchor(&mut self, anchor: ElementRef<'_>) {
        let Some(href) = anchor.value().attr("href") else {
            return;
        };
        let Some(link) = resolve_href(href, self.base_host) else {
            return;
        };

        // Counted now, checked later by the verifier
        if link.is_internal {
            self.report.internal_links += 1;
        } else {
            self.report.external_links += 1;
        }
        self.pending.push(link.url);
    }
}

// Walks up the parent chain looking for a <head> element
fn is_in_head(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| ancestor.value().name() == "head")
}

// Searches the whole form subtree, however deeply nested
fn has_password_input(form: ElementRef<'_>) -> bool {
    form.descendants()
        .filter_map(ElementRef::wrap)
        .any(|element| {
            element.value().name() == "input"
                && element
                    .value()
                    .attr("type")
                    .map_or(false, |kind| kind.eq_ignore_ascii_case("password"))
        })
}
