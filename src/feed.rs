//! Splitting raw feed markup into its `<item>` elements.
//!
//! The reader walks the document with `quick-xml` and keeps, for each item,
//! the item's direct child elements in document order. Each child is stored
//! with the concatenated text of everything below it (text nodes, CDATA and
//! resolved entity references), which is all the normalizer needs.
//!
//! ```text
//! <item>
//!   <title>Big Game Review</title>          -> ("title", "Big Game Review")
//!   <link>http://example.com/a</link>       -> ("link", "http://example.com/a")
//!   <description><![CDATA[<p>..</p>]]></description>
//! </item>
//! ```

use crate::error::{Result, ScrapeError};
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use tracing::{debug, instrument};

/// Name of the repeated element that carries one article announcement.
const ITEM_TAG: &str = "item";

/// A direct child element of a feed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemField {
    /// Qualified element name, e.g. `title` or `dc:creator`.
    pub name: String,
    /// Concatenated descendant text.
    pub text: String,
}

/// One `<item>` of a feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedItem {
    fields: Vec<ItemField>,
}

impl FeedItem {
    pub fn new(fields: Vec<ItemField>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[ItemField] {
        &self.fields
    }

    /// Text of the first child named `name`, if there is one.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.text.as_str())
    }

    /// Text of the first child named `name`, or `""` when absent.
    pub fn text(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }

    /// Text of the element that directly follows the first child named `name`.
    pub fn next_sibling_text(&self, name: &str) -> Option<&str> {
        let idx = self.fields.iter().position(|f| f.name == name)?;
        self.fields.get(idx + 1).map(|f| f.text.as_str())
    }
}

/// Extract every `<item>` from `markup`, in document order.
///
/// A document without items is not an error and yields an empty vector.
///
/// # Errors
///
/// Returns [`ScrapeError::Parse`] when the markup is not well-formed:
/// mismatched or unclosed elements, bad CDATA, and similar.
#[instrument(level = "debug", skip_all, fields(bytes = markup.len()))]
pub fn extract_items(markup: &str) -> Result<Vec<FeedItem>> {
    let mut reader = Reader::from_str(markup);

    let mut items = Vec::new();
    let mut open: Vec<String> = Vec::new();
    // Depth of the open <item> (its index in `open` plus one).
    let mut item_depth: Option<usize> = None;
    let mut item_fields: Vec<ItemField> = Vec::new();
    let mut field: Option<ItemField> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            ScrapeError::Parse(format!(
                "{} at byte {}",
                e,
                reader.error_position()
            ))
        })?;

        match event {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                open.push(name.clone());
                match item_depth {
                    None if name == ITEM_TAG => {
                        item_depth = Some(open.len());
                        item_fields.clear();
                    }
                    Some(depth) if open.len() == depth + 1 => {
                        field = Some(ItemField {
                            name,
                            text: String::new(),
                        });
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match item_depth {
                    None if name == ITEM_TAG => items.push(FeedItem::default()),
                    Some(depth) if open.len() == depth => {
                        item_fields.push(ItemField {
                            name,
                            text: String::new(),
                        });
                    }
                    _ => {}
                }
            }
            Event::Text(e) => {
                if let Some(f) = field.as_mut() {
                    f.text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::CData(e) => {
                if let Some(f) = field.as_mut() {
                    f.text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::GeneralRef(e) => {
                if let Some(f) = field.as_mut() {
                    push_entity(&mut f.text, &String::from_utf8_lossy(&e));
                }
            }
            Event::End(e) => {
                let depth_before = open.len();
                if open.pop().is_none() {
                    return Err(ScrapeError::Parse(format!(
                        "unexpected closing tag </{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    )));
                }
                match item_depth {
                    Some(depth) if depth_before == depth + 1 => {
                        if let Some(f) = field.take() {
                            item_fields.push(f);
                        }
                    }
                    Some(depth) if depth_before == depth => {
                        items.push(FeedItem::new(std::mem::take(&mut item_fields)));
                        item_depth = None;
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(name) = open.last() {
        return Err(ScrapeError::Parse(format!("unclosed element <{}>", name)));
    }

    debug!(count = items.len(), "Extracted feed items");
    Ok(items)
}

/// Append the expansion of `&name;` to `out`.
///
/// Predefined XML entities and numeric character references are resolved;
/// anything else (HTML entities such as `&nbsp;`) is kept verbatim so the
/// HTML re-parse downstream can deal with it.
fn push_entity(out: &mut String, name: &str) {
    if let Some(resolved) = resolve_predefined_entity(name) {
        out.push_str(resolved);
        return;
    }
    let numeric = name.strip_prefix('#').and_then(|num| {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => num.parse::<u32>().ok(),
        };
        code.and_then(char::from_u32)
    });
    match numeric {
        Some(c) => out.push(c),
        None => {
            out.push('&');
            out.push_str(name);
            out.push(';');
        }
    }
}
