//! Block command catalog.
//!
//! The catalog is static and order-significant. Filtering never re-ranks:
//! matches come back in catalog order.

use serde::Serialize;

use super::document::Block;
use super::markup::{parse_template, MarkupError};

/// Glyph shown next to a command in the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Type,
    Hash,
    List,
    CheckSquare,
    Quote,
    Code,
    Minus,
    Chart,
    Lightbulb,
    Sparkles,
}

impl Icon {
    /// Terminal glyph for this icon.
    pub const fn glyph(&self) -> &'static str {
        match self {
            Self::Type => "T",
            Self::Hash => "#",
            Self::List => "•",
            Self::CheckSquare => "☑",
            Self::Quote => "❝",
            Self::Code => "</>",
            Self::Minus => "—",
            Self::Chart => "📊",
            Self::Lightbulb => "💡",
            Self::Sparkles => "✨",
        }
    }
}

/// What a command inserts.
#[derive(Debug, Clone, Copy)]
pub enum Insertion {
    /// A single block built on demand
    Block(fn() -> Block),
    /// A fixed markup template inserted as one section
    Template(&'static str),
}

/// A block-insertion command.
#[derive(Debug, Clone, Serialize)]
pub struct EditorCommand {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub icon: Icon,
    pub keywords: &'static [&'static str],
    #[serde(skip)]
    pub insertion: Insertion,
}

impl EditorCommand {
    /// Case-insensitive substring match over label, description, and keywords.
    ///
    /// An empty query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.label.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self.keywords.iter().any(|k| k.to_lowercase().contains(&query))
    }

    /// Build the blocks this command inserts.
    ///
    /// Templates are parsed in full before anything touches the document.
    pub fn build(&self) -> Result<Vec<Block>, MarkupError> {
        match self.insertion {
            Insertion::Block(make) => Ok(vec![make()]),
            Insertion::Template(markup) => parse_template(markup).map(|section| vec![section]),
        }
    }
}

// Ids are unique across the catalog.
impl PartialEq for EditorCommand {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EditorCommand {}

/// The full command catalog, in display order.
pub fn catalog() -> &'static [EditorCommand] {
    &CATALOG
}

/// Look up a command by id.
pub fn find(id: &str) -> Option<&'static EditorCommand> {
    CATALOG.iter().find(|c| c.id == id)
}

/// Commands matching `query`, in catalog order.
pub fn filter_commands(query: &str) -> Vec<&'static EditorCommand> {
    CATALOG.iter().filter(|c| c.matches(query)).collect()
}

static CATALOG: [EditorCommand; 13] = [
    EditorCommand {
        id: "heading1",
        label: "Heading 1",
        description: "Big section heading",
        icon: Icon::Type,
        keywords: &["h1", "heading1", "title", "big"],
        insertion: Insertion::Block(|| Block::Heading { level: 1, text: "Heading 1".into() }),
    },
    EditorCommand {
        id: "heading2",
        label: "Heading 2",
        description: "Medium section heading",
        icon: Icon::Hash,
        keywords: &["h2", "heading2", "subtitle"],
        insertion: Insertion::Block(|| Block::Heading { level: 2, text: "Heading 2".into() }),
    },
    EditorCommand {
        id: "heading3",
        label: "Heading 3",
        description: "Small section heading",
        icon: Icon::Hash,
        keywords: &["h3", "heading3", "subheading"],
        insertion: Insertion::Block(|| Block::Heading { level: 3, text: "Heading 3".into() }),
    },
    EditorCommand {
        id: "bullet-list",
        label: "Bulleted List",
        description: "Create a simple bulleted list",
        icon: Icon::List,
        keywords: &["bullet", "list", "ul", "unordered"],
        insertion: Insertion::Block(|| Block::List { ordered: false, items: vec!["List item".into()] }),
    },
    EditorCommand {
        id: "numbered-list",
        label: "Numbered List",
        description: "Create a numbered list",
        icon: Icon::List,
        keywords: &["number", "numbered", "ol", "ordered"],
        insertion: Insertion::Block(|| Block::List { ordered: true, items: vec!["List item".into()] }),
    },
    EditorCommand {
        id: "todo-list",
        label: "To-do List",
        description: "Track tasks with a to-do list",
        icon: Icon::CheckSquare,
        keywords: &["todo", "task", "checkbox", "check"],
        insertion: Insertion::Block(|| Block::Todo { checked: false, text: "Todo item".into() }),
    },
    EditorCommand {
        id: "quote",
        label: "Quote",
        description: "Capture a quote or highlight text",
        icon: Icon::Quote,
        keywords: &["quote", "blockquote", "citation"],
        insertion: Insertion::Block(|| Block::Quote("Quote text here...".into())),
    },
    EditorCommand {
        id: "code",
        label: "Code",
        description: "Capture a code snippet",
        icon: Icon::Code,
        keywords: &["code", "snippet", "programming"],
        insertion: Insertion::Block(|| Block::Code("// Your code here".into())),
    },
    EditorCommand {
        id: "divider",
        label: "Divider",
        description: "Visually divide blocks",
        icon: Icon::Minus,
        keywords: &["divider", "separator", "hr", "line"],
        insertion: Insertion::Block(|| Block::Divider),
    },
    EditorCommand {
        id: "swot-template",
        label: "SWOT Analysis",
        description: "Generate SWOT analysis template",
        icon: Icon::Chart,
        keywords: &["swot", "analysis", "strengths", "weaknesses", "opportunities", "threats"],
        insertion: Insertion::Template(SWOT_TEMPLATE),
    },
    EditorCommand {
        id: "market-template",
        label: "Market Analysis",
        description: "Generate market analysis template",
        icon: Icon::Chart,
        keywords: &["market", "analysis", "tam", "sam", "som", "size"],
        insertion: Insertion::Template(MARKET_TEMPLATE),
    },
    EditorCommand {
        id: "persona-template",
        label: "User Persona",
        description: "Generate user persona template",
        icon: Icon::Lightbulb,
        keywords: &["persona", "user", "customer", "target", "audience"],
        insertion: Insertion::Template(PERSONA_TEMPLATE),
    },
    EditorCommand {
        id: "ai-generate",
        label: "AI Generate",
        description: "Generate content with AI",
        icon: Icon::Sparkles,
        keywords: &["ai", "generate", "artificial", "intelligence", "auto"],
        insertion: Insertion::Block(|| Block::AiPlaceholder),
    },
];

const SWOT_TEMPLATE: &str = r#"
<h2>SWOT Analysis</h2>

<h3>Strengths</h3>
<ul>
  <li>Internal advantage 1</li>
  <li>Internal advantage 2</li>
  <li>Internal advantage 3</li>
</ul>

<h3>Weaknesses</h3>
<ul>
  <li>Internal limitation 1</li>
  <li>Internal limitation 2</li>
  <li>Internal limitation 3</li>
</ul>

<h3>Opportunities</h3>
<ul>
  <li>External opportunity 1</li>
  <li>External opportunity 2</li>
  <li>External opportunity 3</li>
</ul>

<h3>Threats</h3>
<ul>
  <li>External threat 1</li>
  <li>External threat 2</li>
  <li>External threat 3</li>
</ul>
"#;

const MARKET_TEMPLATE: &str = r#"
<h2>Market Analysis</h2>

<h3>Market Size</h3>
<ul>
  <li><strong>TAM (Total Addressable Market):</strong> $X billion - [Description]</li>
  <li><strong>SAM (Serviceable Addressable Market):</strong> $X million - [Description]</li>
  <li><strong>SOM (Serviceable Obtainable Market):</strong> $X million - [Description]</li>
</ul>

<h3>Market Trends</h3>
<ul>
  <li>Trend 1: [Impact and relevance]</li>
  <li>Trend 2: [Impact and relevance]</li>
  <li>Trend 3: [Impact and relevance]</li>
</ul>

<h3>Growth Drivers</h3>
<ul>
  <li>Driver 1: [Explanation]</li>
  <li>Driver 2: [Explanation]</li>
  <li>Driver 3: [Explanation]</li>
</ul>
"#;

const PERSONA_TEMPLATE: &str = r#"
<h2>User Persona: [Persona Name]</h2>

<h3>Demographics</h3>
<ul>
  <li><strong>Age:</strong> [Age range]</li>
  <li><strong>Location:</strong> [Geographic location]</li>
  <li><strong>Role:</strong> [Job title/position]</li>
  <li><strong>Industry:</strong> [Industry/sector]</li>
</ul>

<h3>Goals &amp; Motivations</h3>
<ul>
  <li>Primary goal: [Main objective]</li>
  <li>Secondary goal: [Supporting objective]</li>
  <li>Motivation: [What drives them]</li>
</ul>

<h3>Pain Points</h3>
<ul>
  <li>Challenge 1: [Description of problem]</li>
  <li>Challenge 2: [Description of problem]</li>
  <li>Challenge 3: [Description of problem]</li>
</ul>

<h3>Preferred Solutions</h3>
<ul>
  <li>Feature preference: [What they value]</li>
  <li>Communication style: [How they prefer to be contacted]</li>
  <li>Decision factors: [What influences their choices]</li>
</ul>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(commands: &[&EditorCommand]) -> Vec<&'static str> {
        commands.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_catalog_order() {
        let all: Vec<_> = catalog().iter().map(|c| c.id).collect();
        assert_eq!(all.len(), 13);
        assert_eq!(all.first(), Some(&"heading1"));
        assert_eq!(all.last(), Some(&"ai-generate"));
    }

    #[test]
    fn test_empty_query_matches_all() {
        assert_eq!(filter_commands("").len(), catalog().len());
    }

    #[test]
    fn test_head_matches_headings_in_order() {
        assert_eq!(ids(&filter_commands("head")), vec!["heading1", "heading2", "heading3"]);
        assert_eq!(ids(&filter_commands("HEAD")), vec!["heading1", "heading2", "heading3"]);
    }

    #[test]
    fn test_keyword_match() {
        assert_eq!(ids(&filter_commands("tam")), vec!["market-template"]);
        assert_eq!(ids(&filter_commands("analysis")), vec!["swot-template", "market-template"]);
    }

    #[test]
    fn test_no_match() {
        assert!(filter_commands("zzzz").is_empty());
    }

    #[test]
    fn test_templates_build() {
        for id in ["swot-template", "market-template", "persona-template"] {
            let blocks = find(id).unwrap().build().unwrap();
            assert_eq!(blocks.len(), 1);
            assert!(matches!(&blocks[0], Block::Section(children) if children.len() > 4));
        }
    }

    #[test]
    fn test_persona_heading_decodes_entity() {
        let blocks = find("persona-template").unwrap().build().unwrap();
        let Block::Section(children) = &blocks[0] else { panic!("expected section") };
        assert!(children.contains(&Block::Heading { level: 3, text: "Goals & Motivations".into() }));
    }

    #[test]
    fn test_block_commands_build_defaults() {
        assert_eq!(find("quote").unwrap().build().unwrap(), vec![Block::Quote("Quote text here...".into())]);
        assert_eq!(find("divider").unwrap().build().unwrap(), vec![Block::Divider]);
    }
}
