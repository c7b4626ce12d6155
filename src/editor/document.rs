//! Block document model.
//!
//! A document is an ordered list of typed blocks. Text positions are
//! addressed by a [`Cursor`] (top-level block index plus a character offset
//! into that block's text); structural edits go through [`Document::insert_at`]
//! and [`Document::delete_range`].

use serde::Serialize;

/// A structural unit of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Block {
    /// Plain paragraph text
    Paragraph(String),
    /// Section heading, level 1-3
    Heading { level: u8, text: String },
    /// Bulleted or numbered list; items hold inline markup
    List { ordered: bool, items: Vec<String> },
    /// Checkbox-style to-do item
    Todo { checked: bool, text: String },
    /// Block quote
    Quote(String),
    /// Code block
    Code(String),
    /// Horizontal divider
    Divider,
    /// Subtree inserted as a unit (templates)
    Section(Vec<Block>),
    /// Call-to-action for AI-generated content
    AiPlaceholder,
    /// Markup passed through untouched
    Raw(String),
}

impl Block {
    /// Editable text of this block, if it has any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Paragraph(text)
            | Self::Heading { text, .. }
            | Self::Todo { text, .. }
            | Self::Quote(text)
            | Self::Code(text) => Some(text),
            _ => None,
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self {
            Self::Paragraph(text)
            | Self::Heading { text, .. }
            | Self::Todo { text, .. }
            | Self::Quote(text)
            | Self::Code(text) => Some(text),
            _ => None,
        }
    }

    /// Whether the cursor can be placed inside this block.
    pub fn is_editable(&self) -> bool {
        self.text().is_some()
    }

    /// Length of the editable text in characters.
    pub fn char_len(&self) -> usize {
        self.text().map_or(0, |t| t.chars().count())
    }

    /// Short name of the block type.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Paragraph(_) => "paragraph",
            Self::Heading { .. } => "heading",
            Self::List { .. } => "list",
            Self::Todo { .. } => "todo",
            Self::Quote(_) => "quote",
            Self::Code(_) => "code",
            Self::Divider => "divider",
            Self::Section(_) => "section",
            Self::AiPlaceholder => "ai-placeholder",
            Self::Raw(_) => "raw",
        }
    }
}

/// A text position: top-level block index and character offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Cursor {
    pub block: usize,
    pub offset: usize,
}

impl Cursor {
    pub fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}

/// A selection between two cursors. Collapsed when both ends are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Selection {
    pub anchor: Cursor,
    pub head: Cursor,
}

impl Selection {
    /// A collapsed selection (plain cursor).
    pub fn caret(cursor: Cursor) -> Self {
        Self { anchor: cursor, head: cursor }
    }

    /// A selection spanning `anchor` to `head`.
    pub fn span(anchor: Cursor, head: Cursor) -> Self {
        Self { anchor, head }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    /// Ends ordered as (start, end).
    pub fn ordered(&self) -> (Cursor, Cursor) {
        if self.anchor <= self.head {
            (self.anchor, self.head)
        } else {
            (self.head, self.anchor)
        }
    }
}

/// Errors from structural edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("Block {0} does not exist")]
    InvalidBlock(usize),

    #[error("Block {0} has no editable text")]
    NotEditable(usize),

    #[error("Offset {offset} is past the end of block {block} ({len} chars)")]
    OffsetOutOfRange { block: usize, offset: usize, len: usize },

    #[error("Nothing to insert")]
    EmptyInsertion,
}

/// Result of an editing operation.
pub type EditResult<T> = Result<T, EditError>;

/// An ordered tree of blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from blocks.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Parse a document from markup. Never fails; see [`super::markup::parse`].
    pub fn from_markup(markup: &str) -> Self {
        Self::from_blocks(super::markup::parse(markup))
    }

    /// Serialize the document to markup.
    pub fn to_markup(&self) -> String {
        super::markup::to_markup(&self.blocks)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Append a block at the end.
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Check that a cursor addresses editable text.
    pub fn validate(&self, cursor: Cursor) -> EditResult<()> {
        let block = self.blocks.get(cursor.block).ok_or(EditError::InvalidBlock(cursor.block))?;
        if !block.is_editable() {
            return Err(EditError::NotEditable(cursor.block));
        }
        let len = block.char_len();
        if cursor.offset > len {
            return Err(EditError::OffsetOutOfRange { block: cursor.block, offset: cursor.offset, len });
        }
        Ok(())
    }

    /// Text of the cursor's block before the cursor.
    pub fn text_before(&self, cursor: Cursor) -> Option<&str> {
        let text = self.blocks.get(cursor.block)?.text()?;
        let end = byte_index(text, cursor.offset)?;
        Some(&text[..end])
    }

    /// First position inside the first editable block.
    pub fn first_cursor(&self) -> Option<Cursor> {
        self.blocks.iter().position(Block::is_editable).map(|block| Cursor::new(block, 0))
    }

    /// End of the last editable block.
    pub fn last_cursor(&self) -> Option<Cursor> {
        self.blocks
            .iter()
            .rposition(Block::is_editable)
            .map(|block| Cursor::new(block, self.blocks[block].char_len()))
    }

    /// Make sure there is somewhere to type; appends an empty paragraph if needed.
    pub fn ensure_editable(&mut self) -> Cursor {
        match self.last_cursor() {
            Some(cursor) => cursor,
            None => {
                self.blocks.push(Block::Paragraph(String::new()));
                Cursor::new(self.blocks.len() - 1, 0)
            }
        }
    }

    /// Insert text at the cursor; returns the cursor after the inserted text.
    pub fn insert_text(&mut self, cursor: Cursor, text: &str) -> EditResult<Cursor> {
        self.validate(cursor)?;
        let target = self.text_mut(cursor.block)?;
        let at = byte_index(target, cursor.offset).unwrap_or(target.len());
        target.insert_str(at, text);
        Ok(Cursor::new(cursor.block, cursor.offset + text.chars().count()))
    }

    /// Delete the content between two cursors; returns the collapsed cursor.
    ///
    /// Within one block this removes characters. Across blocks, the start
    /// block keeps its head, intermediate blocks are removed, and the tail of
    /// the end block is merged into the start block.
    pub fn delete_range(&mut self, from: Cursor, to: Cursor) -> EditResult<Cursor> {
        let (start, end) = if from <= to { (from, to) } else { (to, from) };
        self.validate(start)?;
        self.validate(end)?;

        if start.block == end.block {
            let text = self.text_mut(start.block)?;
            let a = byte_index(text, start.offset).unwrap_or(text.len());
            let b = byte_index(text, end.offset).unwrap_or(text.len());
            text.replace_range(a..b, "");
            return Ok(start);
        }

        let tail = {
            let text = self.blocks[end.block].text().unwrap_or_default();
            let b = byte_index(text, end.offset).unwrap_or(text.len());
            text[b..].to_string()
        };
        let head = self.text_mut(start.block)?;
        let a = byte_index(head, start.offset).unwrap_or(head.len());
        head.truncate(a);
        head.push_str(&tail);

        self.blocks.drain(start.block + 1..=end.block);
        Ok(start)
    }

    /// Insert blocks at the cursor as one unit; returns the cursor placed
    /// immediately after the inserted blocks.
    ///
    /// A paragraph is split around the cursor. For other text blocks the new
    /// blocks go before the block when the cursor is at its start, after it
    /// otherwise. An empty paragraph is added after the insertion when there
    /// is no text block to land on.
    pub fn insert_at(&mut self, cursor: Cursor, nodes: Vec<Block>) -> EditResult<Cursor> {
        if nodes.is_empty() {
            return Err(EditError::EmptyInsertion);
        }
        self.validate(cursor)?;

        let count = nodes.len();
        let index = cursor.block;

        if let Block::Paragraph(text) = &self.blocks[index] {
            let at = byte_index(text, cursor.offset).unwrap_or(text.len());
            let before = text[..at].to_string();
            let after = text[at..].to_string();

            let mut replacement = Vec::with_capacity(count + 2);
            let keep_before = !before.is_empty();
            if keep_before {
                replacement.push(Block::Paragraph(before));
            }
            replacement.extend(nodes);
            replacement.push(Block::Paragraph(after));

            let landing = index + usize::from(keep_before) + count;
            self.blocks.splice(index..=index, replacement);
            return Ok(Cursor::new(landing, 0));
        }

        if cursor.offset == 0 && self.blocks[index].char_len() > 0 {
            self.blocks.splice(index..index, nodes);
            return Ok(Cursor::new(index + count, 0));
        }

        let insert_pos = index + 1;
        self.blocks.splice(insert_pos..insert_pos, nodes);
        let landing = insert_pos + count;
        if !self.blocks.get(landing).is_some_and(Block::is_editable) {
            self.blocks.insert(landing, Block::Paragraph(String::new()));
        }
        Ok(Cursor::new(landing, 0))
    }

    /// Split the cursor's block at the cursor (Enter). The tail becomes a new
    /// paragraph; returns the cursor at its start.
    pub fn split_block(&mut self, cursor: Cursor) -> EditResult<Cursor> {
        self.validate(cursor)?;
        let is_code = matches!(self.blocks[cursor.block], Block::Code(_));
        let is_todo = matches!(self.blocks[cursor.block], Block::Todo { .. });

        let text = self.text_mut(cursor.block)?;
        let at = byte_index(text, cursor.offset).unwrap_or(text.len());

        // Code keeps newlines inside the block
        if is_code {
            text.insert(at, '\n');
            return Ok(Cursor::new(cursor.block, cursor.offset + 1));
        }

        let tail = text.split_off(at);
        let next = cursor.block + 1;
        let new_block = if is_todo && (!tail.is_empty() || cursor.offset > 0) {
            Block::Todo { checked: false, text: tail }
        } else {
            Block::Paragraph(tail)
        };
        self.blocks.insert(next, new_block);
        Ok(Cursor::new(next, 0))
    }

    /// Delete the character before the cursor (Backspace); returns the new cursor.
    ///
    /// At the start of a block, merges into the previous text block, or
    /// removes a previous non-text block.
    pub fn delete_backward(&mut self, cursor: Cursor) -> EditResult<Cursor> {
        self.validate(cursor)?;

        if cursor.offset > 0 {
            let start = Cursor::new(cursor.block, cursor.offset - 1);
            return self.delete_range(start, cursor);
        }
        if cursor.block == 0 {
            return Ok(cursor);
        }

        let prev = cursor.block - 1;
        if self.blocks[prev].is_editable() {
            let joined = Cursor::new(prev, self.blocks[prev].char_len());
            return self.delete_range(joined, cursor);
        }

        self.blocks.remove(prev);
        Ok(Cursor::new(prev, 0))
    }

    fn text_mut(&mut self, block: usize) -> EditResult<&mut String> {
        self.blocks
            .get_mut(block)
            .ok_or(EditError::InvalidBlock(block))?
            .text_mut()
            .ok_or(EditError::NotEditable(block))
    }
}

/// Byte index of the `offset`-th character, or `None` if past the end.
pub(crate) fn byte_index(text: &str, offset: usize) -> Option<usize> {
    if offset == 0 {
        return Some(0);
    }
    text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len())).nth(offset)
}
