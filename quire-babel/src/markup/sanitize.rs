//! HTML sanitization over an html5ever DOM
//!
//! The input is parsed as a fragment in a `<body>` context, so every input has
//! a root no matter which raw HTML blocks it opens with. The root's subtree is
//! cleaned in place and its children are serialized back. Rules:
//!
//! - elements in [`DROPPED_ELEMENTS`] disappear together with their content;
//! - elements outside [`ALLOWED_ELEMENTS`] are unwrapped (children kept);
//! - attributes outside the allow-list are removed, `on*` handlers always;
//! - URL attributes must be relative or use a safe scheme;
//! - comments, doctypes and processing instructions are removed.

use crate::error::FormatError;
use html5ever::tendril::TendrilSink;
use html5ever::{
    local_name, ns, parse_fragment, serialize, serialize::SerializeOpts,
    serialize::TraversalScope, Attribute, ParseOpts, QualName,
};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};
use std::rc::Rc;

const DROPPED_ELEMENTS: &[&str] = &[
    "applet", "base", "embed", "form", "frame", "frameset", "iframe", "link", "math", "meta",
    "noscript", "object", "script", "style", "svg", "template", "title",
];

const ALLOWED_ELEMENTS: &[&str] = &[
    "a", "abbr", "b", "blockquote", "br", "caption", "cite", "code", "col", "colgroup", "dd",
    "del", "details", "dfn", "div", "dl", "dt", "em", "figcaption", "figure", "h1", "h2", "h3",
    "h4", "h5", "h6", "hr", "i", "img", "input", "ins", "kbd", "li", "mark", "ol", "p", "pre", "q",
    "s", "samp", "section", "small", "span", "strike", "strong", "sub", "summary", "sup", "table",
    "tbody", "td", "tfoot", "th", "thead", "tr", "tt", "u", "ul", "var",
];

const GLOBAL_ATTRIBUTES: &[&str] = &["class", "id", "title", "lang", "dir"];

const URL_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

/// Sanitize an HTML fragment and return the cleaned fragment.
pub fn sanitize_html(html: &str) -> Result<String, FormatError> {
    let context = QualName::new(None, ns!(html), local_name!("body"));
    let dom = parse_fragment(RcDom::default(), ParseOpts::default(), context, Vec::new(), false)
        .one(html);

    // The fragment parser puts everything under a single <html> root.
    let root = dom
        .document
        .children
        .borrow()
        .first()
        .cloned()
        .ok_or_else(|| FormatError::ParseError("HTML fragment has no root".to_string()))?;

    clean_children(&root);

    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::ChildrenOnly(None),
        ..Default::default()
    };
    serialize(&mut output, &SerializableHandle::from(root), opts)
        .map_err(|e| FormatError::ParseError(format!("HTML serialization failed: {e}")))?;

    String::from_utf8(output)
        .map_err(|e| FormatError::ParseError(format!("UTF-8 conversion failed: {e}")))
}

enum Disposition {
    Keep,
    Unwrap,
    Drop,
}

fn clean_children(parent: &Handle) {
    let children = parent.children.take();
    let mut kept = Vec::with_capacity(children.len());

    for child in children {
        match disposition(&child) {
            Disposition::Keep => kept.push(child),
            Disposition::Unwrap => kept.extend(child.children.take()),
            Disposition::Drop => {}
        }
    }

    for child in &kept {
        child.parent.set(Some(Rc::downgrade(parent)));
    }
    *parent.children.borrow_mut() = kept;
}

fn disposition(node: &Handle) -> Disposition {
    match &node.data {
        NodeData::Text { .. } => Disposition::Keep,
        NodeData::Element { name, attrs, .. } => {
            let tag = str::to_ascii_lowercase(&name.local);
            if DROPPED_ELEMENTS.contains(&tag.as_str()) {
                return Disposition::Drop;
            }

            clean_children(node);

            if !ALLOWED_ELEMENTS.contains(&tag.as_str()) {
                return Disposition::Unwrap;
            }

            let mut attrs = attrs.borrow_mut();
            attrs.retain(|attr| keep_attribute(&tag, attr));
            if tag == "input" && !is_checkbox(&attrs) {
                return Disposition::Drop;
            }
            Disposition::Keep
        }
        // Comments, doctypes, processing instructions
        _ => Disposition::Drop,
    }
}

fn is_checkbox(attrs: &[Attribute]) -> bool {
    attrs
        .iter()
        .any(|a| &*a.name.local == "type" && a.value.eq_ignore_ascii_case("checkbox"))
}

fn keep_attribute(tag: &str, attr: &Attribute) -> bool {
    let name = str::to_ascii_lowercase(&attr.name.local);
    let value: &str = &attr.value;

    if name.starts_with("on") {
        return false;
    }
    if GLOBAL_ATTRIBUTES.contains(&name.as_str()) {
        return true;
    }

    match (tag, name.as_str()) {
        ("a", "href") => is_safe_url(value, false),
        ("a", "name") => true,
        ("img", "src") => is_safe_url(value, true),
        ("img", "alt" | "width" | "height") => true,
        ("blockquote" | "q" | "del" | "ins", "cite") => is_safe_url(value, false),
        ("ol", "start" | "type") => true,
        ("li", "value") => true,
        ("td" | "th", "colspan" | "rowspan" | "align") => true,
        ("td" | "th", "style") => is_alignment_style(value),
        ("input", "type" | "checked" | "disabled") => true,
        ("col" | "colgroup", "span") => true,
        _ => false,
    }
}

fn is_safe_url(value: &str, allow_image_data: bool) -> bool {
    // Browsers ignore embedded whitespace and control characters in schemes.
    let normalized: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();

    let scheme_end = normalized.find(':');
    let path_start = normalized.find(['/', '?', '#']);
    let scheme = match (scheme_end, path_start) {
        (Some(colon), Some(path)) if path < colon => None,
        (Some(colon), _) => Some(&normalized[..colon]),
        (None, _) => None,
    };

    match scheme {
        None => true,
        Some(scheme) if URL_SCHEMES.contains(&scheme) => true,
        Some("data") => {
            allow_image_data
                && normalized.starts_with("data:image/")
                && !normalized.starts_with("data:image/svg")
        }
        Some(_) => false,
    }
}

fn is_alignment_style(value: &str) -> bool {
    let value = value.trim().trim_end_matches(';');
    let Some((property, align)) = value.split_once(':') else {
        return false;
    };
    property.trim().eq_ignore_ascii_case("text-align")
        && matches!(align.trim(), "left" | "right" | "center")
}
