//! Site-link badge augmentation.
//!
//! The source page's own fragment may carry badge annotations. They apply to
//! the item's link to the source site, as a set union with whatever badges
//! the link already holds.

use crate::vocab;
use folio_core::util::wiki_urlencode;
use folio_core::{EntityGraph, EntityUriParser, Item, ItemId};
use tracing::debug;

pub(crate) fn augment_badges(
    item: &mut Item,
    graph: &EntityGraph,
    site: &str,
    uri_parser: &EntityUriParser,
) {
    let Some(link) = item.sitelink(site) else {
        debug!(site, "document has no link to the source site");
        return;
    };
    let page_uri = site_page_uri(site, &link.title);
    let Some(fragment) = graph.get(&page_uri) else {
        return;
    };

    let mut badges: Vec<ItemId> = Vec::new();
    for value in fragment.values(vocab::BADGE) {
        let Some(node) = value.as_node() else { continue };
        let Some(id) = &node.id else { continue };
        match uri_parser.parse_item_uri(id) {
            Ok(badge) => badges.push(badge),
            Err(error) => debug!(%error, "skipping badge with unusable id"),
        }
    }

    if let Some(link) = item.sitelink_mut(site) {
        for badge in badges {
            link.add_badge(badge);
        }
    }
}

/// URL of a page on a client wiki, derived from the site id's `wiki` infix.
/// An empty suffix means the flagship project.
fn site_page_uri(site: &str, title: &str) -> String {
    let (prefix, suffix) = site.split_once("wiki").unwrap_or((site, ""));
    let suffix = if suffix.is_empty() { "pedia" } else { suffix };
    format!(
        "https://{prefix}.wiki{suffix}.org/wiki/{}",
        wiki_urlencode(title)
    )
}
