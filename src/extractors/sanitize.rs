//! Content sanitization.
//!
//! The first `<article>` is serialized and re-parsed into its own tree, then
//! a fixed list of [`Rule`]s detaches Medium UI chrome from that copy. Each
//! rule only *selects* node ids; detaching happens afterwards so the tree is
//! never mutated while being walked. Rules run in order on the progressively
//! reduced tree, and none of them ever detaches the `<article>` root itself.

use ego_tree::{NodeId, NodeRef};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;

static ARTICLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("article").expect("valid article selector"));
static CHROME_DIV: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div[class*='toolbar'], div[class*='actions']").expect("valid toolbar selector")
});
static SPEECHIFY: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[class*='speechify']").expect("valid speechify selector"));
static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("valid h1 selector"));
static BUTTON: Lazy<Selector> =
    Lazy::new(|| Selector::parse("button").expect("valid button selector"));

static MEMBER_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)member-only story").expect("valid member-only pattern"));
static PAYWALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)unable to read this article due to a paywall").expect("valid paywall pattern")
});

const PAYWALL_CONTAINERS: &[&str] = &["p", "div", "a"];

/// One structural removal, applied in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// `<div>` whose class mentions `toolbar` or `actions`.
    ToolbarDivs,
    /// Any element whose class mentions `speechify`.
    Speechify,
    /// Every `<h1>`; the page layout renders the title itself.
    Headings,
    /// The parent of any `By <author>` text.
    Byline,
    /// `<button>` containing "press enter".
    PressEnterButtons,
    /// The nearest `<div>` around "Member-only story".
    MemberOnlyBadge,
    /// The nearest `<p>`, `<div>` or `<a>` around the paywall notice.
    PaywallNotice,
}

impl Rule {
    pub const ALL: [Rule; 7] = [
        Rule::ToolbarDivs,
        Rule::Speechify,
        Rule::Headings,
        Rule::Byline,
        Rule::PressEnterButtons,
        Rule::MemberOnlyBadge,
        Rule::PaywallNotice,
    ];
}

/// Which ancestors of a matched text node qualify for removal.
#[derive(Debug, Clone, Copy)]
enum Container {
    AnyElement,
    Tags(&'static [&'static str]),
}

impl Container {
    fn accepts(self, node: &NodeRef<'_, Node>) -> bool {
        match (self, node.value()) {
            (Container::AnyElement, Node::Element(_)) => true,
            (Container::Tags(tags), Node::Element(el)) => tags.contains(&el.name()),
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Sanitizer {
    byline: Regex,
}

impl Sanitizer {
    pub fn new(author_name: &str) -> Result<Self, regex::Error> {
        Ok(Sanitizer {
            byline: Regex::new(&format!(r"(?i)by\s+{}", regex::escape(author_name)))?,
        })
    }

    /// Sanitized markup of the document's first `<article>`, or `None` when
    /// the document has no article element.
    pub fn sanitize(&self, document: &Html) -> Option<String> {
        let article = document.select(&ARTICLE).next()?;
        let mut isolated = Html::parse_document(&article.html());
        let root_id = isolated.select(&ARTICLE).next()?.id();

        for rule in Rule::ALL {
            let targets = match isolated.tree.get(root_id).and_then(ElementRef::wrap) {
                Some(root) => self.targets(rule, root),
                None => break,
            };
            if !targets.is_empty() {
                debug!(?rule, removed = targets.len(), "Applied sanitizer rule");
            }
            for id in targets {
                if let Some(mut node) = isolated.tree.get_mut(id) {
                    node.detach();
                }
            }
        }

        let root = isolated.tree.get(root_id).and_then(ElementRef::wrap)?;
        Some(root.html())
    }

    fn targets(&self, rule: Rule, root: ElementRef<'_>) -> Vec<NodeId> {
        match rule {
            Rule::ToolbarDivs => select_ids(root, &CHROME_DIV),
            Rule::Speechify => select_ids(root, &SPEECHIFY),
            Rule::Headings => select_ids(root, &H1),
            Rule::Byline => containers_of_text(root, &self.byline, Container::AnyElement),
            Rule::PressEnterButtons => root
                .select(&BUTTON)
                .filter(|button| {
                    button
                        .text()
                        .collect::<String>()
                        .to_lowercase()
                        .contains("press enter")
                })
                .map(|button| button.id())
                .collect(),
            Rule::MemberOnlyBadge => {
                containers_of_text(root, &MEMBER_ONLY, Container::Tags(&["div"]))
            }
            Rule::PaywallNotice => {
                containers_of_text(root, &PAYWALL, Container::Tags(PAYWALL_CONTAINERS))
            }
        }
    }
}

fn select_ids(root: ElementRef<'_>, selector: &Selector) -> Vec<NodeId> {
    root.select(selector)
        .map(|el| el.id())
        .filter(|id| *id != root.id())
        .collect()
}

/// For every text node under `root` matching `pattern`, the nearest ancestor
/// accepted by `container`, stopping short of `root`.
fn containers_of_text(root: ElementRef<'_>, pattern: &Regex, container: Container) -> Vec<NodeId> {
    let mut ids: Vec<NodeId> = root
        .descendants()
        .filter(|node| matches!(node.value(), Node::Text(text) if pattern.is_match(text)))
        .filter_map(|text| nearest_container(text, root.id(), container))
        .collect();
    ids.dedup();
    ids
}

fn nearest_container(node: NodeRef<'_, Node>, root: NodeId, container: Container) -> Option<NodeId> {
    node.ancestors()
        .take_while(|ancestor| ancestor.id() != root)
        .find(|ancestor| container.accepts(ancestor))
        .map(|ancestor| ancestor.id())
}
