//! Core types for completion requests and replies

use std::fmt;

use ricecoder_vdoc::{EditorId, EditorPosition, Span, VirtualDocument, VirtualPosition};
use serde::{Deserialize, Serialize};

/// Completion item kind, numbered as in the Language Server Protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum CompletionItemKind {
    Text = 1,
    Method = 2,
    Function = 3,
    Constructor = 4,
    Field = 5,
    Variable = 6,
    Class = 7,
    Interface = 8,
    Module = 9,
    Property = 10,
    Unit = 11,
    Value = 12,
    Enum = 13,
    Keyword = 14,
    Snippet = 15,
    Color = 16,
    File = 17,
    Reference = 18,
    Folder = 19,
    EnumMember = 20,
    Constant = 21,
    Struct = 22,
    Event = 23,
    Operator = 24,
    TypeParameter = 25,
}

impl CompletionItemKind {
    const ALL: [CompletionItemKind; 25] = [
        Self::Text,
        Self::Method,
        Self::Function,
        Self::Constructor,
        Self::Field,
        Self::Variable,
        Self::Class,
        Self::Interface,
        Self::Module,
        Self::Property,
        Self::Unit,
        Self::Value,
        Self::Enum,
        Self::Keyword,
        Self::Snippet,
        Self::Color,
        Self::File,
        Self::Reference,
        Self::Folder,
        Self::EnumMember,
        Self::Constant,
        Self::Struct,
        Self::Event,
        Self::Operator,
        Self::TypeParameter,
    ];

    /// Kind for a protocol code, if the code is known
    pub fn from_lsp(code: u32) -> Option<Self> {
        code.checked_sub(1)
            .and_then(|index| Self::ALL.get(index as usize))
            .copied()
    }

    /// Protocol code of the kind
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Human-readable name, used as the type tag of analysis candidates
    pub fn name(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Method => "Method",
            Self::Function => "Function",
            Self::Constructor => "Constructor",
            Self::Field => "Field",
            Self::Variable => "Variable",
            Self::Class => "Class",
            Self::Interface => "Interface",
            Self::Module => "Module",
            Self::Property => "Property",
            Self::Unit => "Unit",
            Self::Value => "Value",
            Self::Enum => "Enum",
            Self::Keyword => "Keyword",
            Self::Snippet => "Snippet",
            Self::Color => "Color",
            Self::File => "File",
            Self::Reference => "Reference",
            Self::Folder => "Folder",
            Self::EnumMember => "EnumMember",
            Self::Constant => "Constant",
            Self::Struct => "Struct",
            Self::Event => "Event",
            Self::Operator => "Operator",
            Self::TypeParameter => "TypeParameter",
        }
    }
}

impl TryFrom<u32> for CompletionItemKind {
    type Error = String;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Self::from_lsp(code).ok_or_else(|| format!("unknown completion item kind: {}", code))
    }
}

impl From<CompletionItemKind> for u32 {
    fn from(kind: CompletionItemKind) -> Self {
        kind.code()
    }
}

impl fmt::Display for CompletionItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A raw candidate as returned by an analysis backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionItem {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<CompletionItemKind>,
}

impl CompletionItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            insert_text: None,
            kind: None,
        }
    }

    pub fn with_insert_text(mut self, insert_text: impl Into<String>) -> Self {
        self.insert_text = Some(insert_text.into());
        self
    }

    pub fn with_kind(mut self, kind: CompletionItemKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Text shown and inserted for this item: the insert text, else the label
    pub fn display_text(&self) -> &str {
        self.insert_text.as_deref().unwrap_or(&self.label)
    }
}

/// Side-channel classification of one candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTypeTag {
    pub text: String,
    #[serde(rename = "type")]
    pub item_type: String,
}

impl ItemTypeTag {
    pub fn new(text: impl Into<String>, item_type: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            item_type: item_type.into(),
        }
    }
}

/// Metadata carried alongside the matches of a reply
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyMetadata {
    #[serde(default)]
    pub item_types: Vec<ItemTypeTag>,
}

/// A completion reply in root/editor character offsets
///
/// Applying a reply means deleting `[range_start, range_end)` and inserting the
/// chosen match. `matches` is in presentation order and never holds the same
/// text twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionReply {
    pub range_start: usize,
    pub range_end: usize,
    #[serde(default)]
    pub matches: Vec<String>,
    #[serde(default)]
    pub metadata: ReplyMetadata,
}

impl CompletionReply {
    /// Create a reply with no matches over the given range
    pub fn new(range_start: usize, range_end: usize) -> Self {
        Self {
            range_start,
            range_end,
            ..Default::default()
        }
    }

    /// Whether the reply carries no matches
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Append a match unless it is already present; returns whether it was added
    pub fn push_match(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if self.matches.contains(&text) {
            return false;
        }
        self.matches.push(text);
        true
    }

    /// Record the type of a match unless one is already recorded
    pub fn tag_type(&mut self, text: impl Into<String>, item_type: impl Into<String>) {
        let text = text.into();
        if self.type_of(&text).is_none() {
            self.metadata
                .item_types
                .push(ItemTypeTag::new(text, item_type));
        }
    }

    /// Builder form of [`push_match`](Self::push_match) plus a type tag
    pub fn with_match(mut self, text: impl Into<String>, item_type: impl Into<String>) -> Self {
        let text = text.into();
        self.tag_type(text.clone(), item_type);
        self.push_match(text);
        self
    }

    /// Recorded type of a match
    pub fn type_of(&self, text: &str) -> Option<&str> {
        self.metadata
            .item_types
            .iter()
            .find(|tag| tag.text == text)
            .map(|tag| tag.item_type.as_str())
    }
}

/// What caused a completion request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TriggerKind {
    /// Explicit user invocation
    #[default]
    Invoked,
    /// A trigger character was typed
    TriggerCharacter,
    /// Continuation of an incomplete completion list
    TriggerForIncompleteCompletions,
}

impl TriggerKind {
    /// Protocol code of the trigger kind
    pub fn code(self) -> u32 {
        match self {
            Self::Invoked => 1,
            Self::TriggerCharacter => 2,
            Self::TriggerForIncompleteCompletions => 3,
        }
    }
}

/// The token under the cursor as reported by the external tokenizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorToken {
    /// Token text
    pub text: String,
    /// Lexical category (e.g. `"variable"`, `"string"`, `"comment"`)
    #[serde(rename = "type", default)]
    pub token_type: String,
    /// Character offset of the token in the editor text
    pub offset: usize,
}

impl EditorToken {
    pub fn new(text: impl Into<String>, token_type: impl Into<String>, offset: usize) -> Self {
        Self {
            text: text.into(),
            token_type: token_type.into(),
            offset,
        }
    }
}

/// Editor-level completion request
///
/// This is what the presentation layer hands over, and what runtime and
/// fallback connectors receive unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorRequest {
    /// Editor the request originates from
    pub editor_id: EditorId,
    /// Full text of that editor
    pub text: String,
    /// Cursor position in the editor
    pub cursor: EditorPosition,
    /// Token under the cursor
    pub token: EditorToken,
}

impl EditorRequest {
    pub fn new(
        editor_id: impl Into<EditorId>,
        text: impl Into<String>,
        cursor: EditorPosition,
        token: EditorToken,
    ) -> Self {
        Self {
            editor_id: editor_id.into(),
            text: text.into(),
            cursor,
            token,
        }
    }

    /// Editor position of a character offset, clamped to the end of the text
    pub fn position_at(&self, offset: usize) -> EditorPosition {
        let mut line = 0;
        let mut column = 0;
        for ch in self.text.chars().take(offset) {
            if ch == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }
        EditorPosition::new(line, column)
    }

    /// Editor position where the token starts
    pub fn token_start(&self) -> EditorPosition {
        self.position_at(self.token.offset)
    }

    /// Editor position just past the token
    pub fn token_end(&self) -> EditorPosition {
        self.position_at(self.token.offset + self.token.text.chars().count())
    }

    /// Text of the cursor's line
    pub fn line_text(&self) -> &str {
        self.text
            .split('\n')
            .nth(self.cursor.line as usize)
            .unwrap_or_default()
    }
}

/// Token expressed in the owning virtual document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualToken {
    pub text: String,
    pub span: Span<VirtualPosition>,
}

/// Normalized request for the analysis backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Token text and its span in the owning document
    pub token: VirtualToken,
    /// Cursor in the owning document
    pub cursor: VirtualPosition,
    /// Character immediately behind the cursor within the token
    pub typed_character: Option<char>,
    /// Document owning the token's start
    pub document: VirtualDocument,
    /// Character offset of the token in the editor text
    pub offset: usize,
}

/// Result of a completion attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The token's lexical context suppresses completion; no backend was asked
    Suppressed,
    /// Backends answered (possibly with no matches)
    Reply(CompletionReply),
}

impl CompletionOutcome {
    pub fn is_suppressed(&self) -> bool {
        matches!(self, CompletionOutcome::Suppressed)
    }

    /// The reply, if completion was not suppressed
    pub fn reply(&self) -> Option<&CompletionReply> {
        match self {
            CompletionOutcome::Reply(reply) => Some(reply),
            CompletionOutcome::Suppressed => None,
        }
    }

    pub fn into_reply(self) -> Option<CompletionReply> {
        match self {
            CompletionOutcome::Reply(reply) => Some(reply),
            CompletionOutcome::Suppressed => None,
        }
    }
}
