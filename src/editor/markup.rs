//! Markup interchange for block documents.
//!
//! Documents travel to and from the host as an HTML-like string. Parsing is
//! lenient: unknown elements are kept verbatim as [`Block::Raw`] and stray
//! text becomes paragraphs, so malformed input never fails to load.
//!
//! Text elements only become editable blocks when they hold plain text.
//! Inline markup, attributes, whitespace runs and `h4`-`h6` stay raw so a
//! load followed by a save writes the same content back.

use ego_tree::NodeRef;
use scraper::{node::Element, ElementRef, Html, Node};

use super::document::Block;

/// Markup emitted for the AI content placeholder.
pub const AI_PLACEHOLDER_MARKUP: &str = concat!(
    r#"<div class="ai-placeholder">"#,
    "<span>AI Content Generation</span>",
    r#"<p>Click "Generate" to create content for this section using AI.</p>"#,
    "<button>Generate Content</button>",
    "</div>"
);

/// Errors from parsing fixed template markup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    #[error("Template produced no blocks")]
    EmptyTemplate,
}

/// Serialize blocks to markup, one top-level block per line.
pub fn to_markup(blocks: &[Block]) -> String {
    blocks.iter().map(block_markup).collect::<Vec<_>>().join("\n")
}

fn block_markup(block: &Block) -> String {
    match block {
        Block::Paragraph(text) => format!("<p>{}</p>", escape(text)),
        Block::Heading { level, text } => {
            let level = (*level).clamp(1, 3);
            format!("<h{level}>{}</h{level}>", escape(text))
        }
        Block::List { ordered, items } => {
            let tag = if *ordered { "ol" } else { "ul" };
            let mut out = format!("<{tag}>\n");
            for item in items {
                out.push_str(&format!("  <li>{item}</li>\n"));
            }
            out.push_str(&format!("</{tag}>"));
            out
        }
        Block::Todo { checked, text } => format!(
            r#"<div class="todo-item"><input type="checkbox"{}><span>{}</span></div>"#,
            if *checked { " checked" } else { "" },
            escape(text)
        ),
        Block::Quote(text) => format!("<blockquote>{}</blockquote>", escape(text)),
        Block::Code(text) => format!("<pre><code>{}</code></pre>", escape(text)),
        Block::Divider => "<hr>".to_string(),
        Block::Section(children) => format!("<div>\n{}\n</div>", to_markup(children)),
        Block::AiPlaceholder => AI_PLACEHOLDER_MARKUP.to_string(),
        Block::Raw(markup) => markup.clone(),
    }
}

/// Parse markup into blocks. Never fails.
pub fn parse(markup: &str) -> Vec<Block> {
    if markup.trim().is_empty() {
        return Vec::new();
    }
    let fragment = Html::parse_fragment(markup);
    convert_children(fragment.tree.root())
}

/// Parse a fixed template into a single section block.
///
/// The whole subtree is returned as one unit, or an error if the template
/// yields nothing.
pub fn parse_template(markup: &str) -> Result<Block, MarkupError> {
    let blocks = parse(markup);
    if blocks.is_empty() {
        return Err(MarkupError::EmptyTemplate);
    }
    Ok(Block::Section(blocks))
}

fn convert_children(node: NodeRef<'_, Node>) -> Vec<Block> {
    let mut blocks = Vec::new();
    for child in node.children() {
        match child.value() {
            Node::Element(element) => convert_element(child, element, &mut blocks),
            Node::Text(text) => {
                let content: &str = &text.text;
                let content = collapse_whitespace(content);
                if !content.is_empty() {
                    blocks.push(Block::Paragraph(content));
                }
            }
            _ => {}
        }
    }
    blocks
}

fn convert_element(node: NodeRef<'_, Node>, element: &Element, blocks: &mut Vec<Block>) {
    let block = match element.name() {
        "html" | "body" => {
            blocks.extend(convert_children(node));
            return;
        }
        "p" => match plain_text(node, element) {
            Some(text) => Block::Paragraph(text),
            None => raw(node),
        },
        "h1" | "h2" | "h3" => match plain_text(node, element) {
            Some(text) => Block::Heading { level: heading_level(element.name()), text },
            None => raw(node),
        },
        "ul" | "ol" => Block::List {
            ordered: element.name() == "ol",
            items: node
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|li| li.value().name() == "li")
                .map(|li| li.inner_html().trim().to_string())
                .collect(),
        },
        "blockquote" => match plain_text(node, element) {
            Some(text) => Block::Quote(text),
            None => raw(node),
        },
        "pre" => {
            let code: String = ElementRef::wrap(node).map(|e| e.text().collect()).unwrap_or_default();
            Block::Code(code.trim_matches('\n').to_string())
        }
        "hr" => Block::Divider,
        "div" if has_class(element, "todo-item") => match todo_parts(node) {
            Some((checked, text)) => Block::Todo { checked, text },
            None => raw(node),
        },
        "div" if has_class(element, "ai-placeholder") => Block::AiPlaceholder,
        "div" => Block::Section(convert_children(node)),
        _ => raw(node),
    };
    blocks.push(block);
}

fn raw(node: NodeRef<'_, Node>) -> Block {
    Block::Raw(ElementRef::wrap(node).map(|e| e.html()).unwrap_or_default())
}

fn heading_level(name: &str) -> u8 {
    match name {
        "h1" => 1,
        "h2" => 2,
        _ => 3,
    }
}

/// Text of an attribute-free element whose only children are text nodes
/// that serialize back unchanged.
fn plain_text(node: NodeRef<'_, Node>, element: &Element) -> Option<String> {
    if element.attrs().next().is_some() {
        return None;
    }
    let mut text = String::new();
    for child in node.children() {
        match child.value() {
            Node::Text(t) => text.push_str(&t.text),
            _ => return None,
        }
    }
    (collapse_whitespace(&text) == text).then_some(text)
}

/// Checkbox state and label of a todo item shaped as `input` plus `span`.
fn todo_parts(node: NodeRef<'_, Node>) -> Option<(bool, String)> {
    let mut checked = false;
    let mut text = None;
    for child in node.children() {
        match child.value() {
            Node::Element(e) if e.name() == "input" => checked = e.attr("checked").is_some(),
            Node::Element(e) if e.name() == "span" && text.is_none() => text = Some(plain_text(child, e)?),
            Node::Text(t) if t.trim().is_empty() => {}
            _ => return None,
        }
    }
    text.map(|text| (checked, text))
}

fn has_class(element: &Element, class: &str) -> bool {
    element.attr("class").is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
