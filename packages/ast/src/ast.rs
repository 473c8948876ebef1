use serde::{Deserialize, Serialize};

/// Stable identity of a node within one region tree.
///
/// Ids are handed out by the parent-link builder (`assign_parents`) and
/// survive cloning, so a snapshot and the live tree agree on which node is
/// which. `NodeId::DETACHED` marks a node that has not been linked yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const DETACHED: NodeId = NodeId(0);

    pub fn is_detached(self) -> bool {
        self == Self::DETACHED
    }
}

/// Byte range into the region text this node was parsed from, plus the
/// node's id.
///
/// Ranges are only meaningful against the snapshot taken before plugins ran;
/// nodes built by a plugin carry the detached sentinel until they are
/// serialized fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub id: NodeId,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            id: NodeId::DETACHED,
        }
    }

    /// Sentinel span for nodes constructed in memory rather than parsed.
    pub fn detached() -> Self {
        Self {
            start: usize::MAX,
            end: usize::MAX,
            id: NodeId::DETACHED,
        }
    }

    pub fn is_detached(&self) -> bool {
        self.start == usize::MAX
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// https://www.w3.org/TR/2011/WD-html-markup-20110113/syntax.html#syntax-elements
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Root of a markup region. Spans the full region text, including leading
/// and trailing non-element content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Root {
    pub children: Vec<ElementChild>,
    pub span: Span,
}

/// Element node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Canonical (lowercased) tag name.
    pub name: String,
    /// Tag name as written in source; this is what gets printed.
    pub raw_name: String,
    pub start_tag: StartTag,
    pub children: Vec<ElementChild>,
    pub end_tag: Option<EndTag>,
    pub span: Span,
    pub parent: Option<NodeId>,
}

/// Nodes that may appear in an element's (or the root's) child list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ElementChild {
    Element(Element),
    Text(Text),
    ExpressionContainer(ExpressionContainer),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartTag {
    pub attributes: Vec<Attribute>,
    pub self_closing: bool,
    pub leading_comment: Option<Comment>,
    pub span: Span,
    pub parent: Option<NodeId>,
}

/// End tags print as empty text; their only visible role is carrying a
/// leading comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndTag {
    pub leading_comment: Option<Comment>,
    pub span: Span,
    pub parent: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub value: String,
    pub leading_comment: Option<Comment>,
    pub span: Span,
    pub parent: Option<NodeId>,
}

/// A markup comment, attached as a leading reference on the node that
/// follows it in source order. Consecutive comments chain through
/// `leading_comment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub value: String,
    pub leading_comment: Option<Box<Comment>>,
    pub span: Span,
    pub parent: Option<NodeId>,
}

/// Static attribute or directive attribute, distinguished by `directive`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub directive: bool,
    pub key: AttributeKey,
    pub value: Option<AttributeValue>,
    pub span: Span,
    pub parent: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AttributeKey {
    #[serde(rename = "Identifier")]
    Static(Identifier),
    #[serde(rename = "DirectiveKey")]
    Directive(DirectiveKey),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AttributeValue {
    Literal(Literal),
    #[serde(rename = "ExpressionContainer")]
    Container(ExpressionContainer),
}

/// Name node for attributes, directives, modifiers and filter callees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    /// Canonical name (`bind` for the `:` shorthand).
    pub name: String,
    /// Spelling as written; shorthand symbols are preserved here.
    pub raw_name: String,
    pub span: Span,
    pub parent: Option<NodeId>,
}

/// Key of a directive attribute: `v-name:argument.modifier1.modifier2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectiveKey {
    pub name: Identifier,
    pub argument: Option<DirectiveArgument>,
    pub modifiers: Vec<Identifier>,
    pub span: Span,
    pub parent: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DirectiveArgument {
    /// `:name` style static argument.
    #[serde(rename = "Identifier")]
    Static(Identifier),
    /// `:[expr]` style computed argument.
    #[serde(rename = "ExpressionContainer")]
    Dynamic(ExpressionContainer),
}

/// Static attribute value, stored raw (no entity decoding).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    pub value: String,
    pub span: Span,
    pub parent: Option<NodeId>,
}

/// Holds a script-dialect expression, either as a mustache child
/// (`{{ expr }}`) or as a directive value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionContainer {
    pub expression: Option<Expression>,
    pub leading_comment: Option<Comment>,
    pub span: Span,
    pub parent: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expression {
    /// Plain script expression, opaque to the markup dialect.
    #[serde(rename = "ScriptExpr")]
    Script(ScriptExpr),
    #[serde(rename = "ForExpression")]
    For(ForExpression),
    #[serde(rename = "OnExpression")]
    On(OnExpression),
    #[serde(rename = "SlotScopeExpression")]
    SlotScope(SlotScopeExpression),
    FilterSequence(FilterSequence),
}

/// Opaque script-dialect snippet. The markup grammar only knows where it
/// starts and ends; printing it is the script printer's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptExpr {
    pub code: String,
    pub span: Span,
    pub parent: Option<NodeId>,
}

/// Iteration expression: `(item, index) in list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForExpression {
    pub left: Vec<ScriptExpr>,
    pub right: ScriptExpr,
    pub span: Span,
    pub parent: Option<NodeId>,
}

/// Event-handler expression: one or more statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnExpression {
    pub body: Vec<ScriptExpr>,
    pub span: Span,
    pub parent: Option<NodeId>,
}

/// Slot-scope binding parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotScopeExpression {
    pub params: Vec<ScriptExpr>,
    pub span: Span,
    pub parent: Option<NodeId>,
}

/// Filter pipeline: `base | filter1(args) | filter2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSequence {
    pub expression: ScriptExpr,
    pub filters: Vec<Filter>,
    pub span: Span,
    pub parent: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub callee: Identifier,
    pub arguments: Vec<ScriptExpr>,
    pub span: Span,
    pub parent: Option<NodeId>,
}

/// Discriminant for every node kind in the markup tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Element,
    StartTag,
    EndTag,
    Text,
    Comment,
    Attribute,
    DirectiveKey,
    Identifier,
    Literal,
    ExpressionContainer,
    ScriptExpr,
    ForExpression,
    OnExpression,
    SlotScopeExpression,
    FilterSequence,
    Filter,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Root => "Root",
            NodeKind::Element => "Element",
            NodeKind::StartTag => "StartTag",
            NodeKind::EndTag => "EndTag",
            NodeKind::Text => "Text",
            NodeKind::Comment => "Comment",
            NodeKind::Attribute => "Attribute",
            NodeKind::DirectiveKey => "DirectiveKey",
            NodeKind::Identifier => "Identifier",
            NodeKind::Literal => "Literal",
            NodeKind::ExpressionContainer => "ExpressionContainer",
            NodeKind::ScriptExpr => "ScriptExpr",
            NodeKind::ForExpression => "ForExpression",
            NodeKind::OnExpression => "OnExpression",
            NodeKind::SlotScopeExpression => "SlotScopeExpression",
            NodeKind::FilterSequence => "FilterSequence",
            NodeKind::Filter => "Filter",
        }
    }
}

/// Borrowed view over any node kind. Cheap to copy; this is what the
/// differ, matcher and stringifier traffic in.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Root(&'a Root),
    Element(&'a Element),
    StartTag(&'a StartTag),
    EndTag(&'a EndTag),
    Text(&'a Text),
    Comment(&'a Comment),
    Attribute(&'a Attribute),
    DirectiveKey(&'a DirectiveKey),
    Identifier(&'a Identifier),
    Literal(&'a Literal),
    ExpressionContainer(&'a ExpressionContainer),
    ScriptExpr(&'a ScriptExpr),
    ForExpression(&'a ForExpression),
    OnExpression(&'a OnExpression),
    SlotScopeExpression(&'a SlotScopeExpression),
    FilterSequence(&'a FilterSequence),
    Filter(&'a Filter),
}

impl<'a> NodeRef<'a> {
    pub fn kind(self) -> NodeKind {
        match self {
            NodeRef::Root(_) => NodeKind::Root,
            NodeRef::Element(_) => NodeKind::Element,
            NodeRef::StartTag(_) => NodeKind::StartTag,
            NodeRef::EndTag(_) => NodeKind::EndTag,
            NodeRef::Text(_) => NodeKind::Text,
            NodeRef::Comment(_) => NodeKind::Comment,
            NodeRef::Attribute(_) => NodeKind::Attribute,
            NodeRef::DirectiveKey(_) => NodeKind::DirectiveKey,
            NodeRef::Identifier(_) => NodeKind::Identifier,
            NodeRef::Literal(_) => NodeKind::Literal,
            NodeRef::ExpressionContainer(_) => NodeKind::ExpressionContainer,
            NodeRef::ScriptExpr(_) => NodeKind::ScriptExpr,
            NodeRef::ForExpression(_) => NodeKind::ForExpression,
            NodeRef::OnExpression(_) => NodeKind::OnExpression,
            NodeRef::SlotScopeExpression(_) => NodeKind::SlotScopeExpression,
            NodeRef::FilterSequence(_) => NodeKind::FilterSequence,
            NodeRef::Filter(_) => NodeKind::Filter,
        }
    }

    pub fn span(self) -> Span {
        match self {
            NodeRef::Root(n) => n.span,
            NodeRef::Element(n) => n.span,
            NodeRef::StartTag(n) => n.span,
            NodeRef::EndTag(n) => n.span,
            NodeRef::Text(n) => n.span,
            NodeRef::Comment(n) => n.span,
            NodeRef::Attribute(n) => n.span,
            NodeRef::DirectiveKey(n) => n.span,
            NodeRef::Identifier(n) => n.span,
            NodeRef::Literal(n) => n.span,
            NodeRef::ExpressionContainer(n) => n.span,
            NodeRef::ScriptExpr(n) => n.span,
            NodeRef::ForExpression(n) => n.span,
            NodeRef::OnExpression(n) => n.span,
            NodeRef::SlotScopeExpression(n) => n.span,
            NodeRef::FilterSequence(n) => n.span,
            NodeRef::Filter(n) => n.span,
        }
    }

    pub fn id(self) -> NodeId {
        self.span().id
    }

    pub fn parent(self) -> Option<NodeId> {
        match self {
            NodeRef::Root(_) => None,
            NodeRef::Element(n) => n.parent,
            NodeRef::StartTag(n) => n.parent,
            NodeRef::EndTag(n) => n.parent,
            NodeRef::Text(n) => n.parent,
            NodeRef::Comment(n) => n.parent,
            NodeRef::Attribute(n) => n.parent,
            NodeRef::DirectiveKey(n) => n.parent,
            NodeRef::Identifier(n) => n.parent,
            NodeRef::Literal(n) => n.parent,
            NodeRef::ExpressionContainer(n) => n.parent,
            NodeRef::ScriptExpr(n) => n.parent,
            NodeRef::ForExpression(n) => n.parent,
            NodeRef::OnExpression(n) => n.parent,
            NodeRef::SlotScopeExpression(n) => n.parent,
            NodeRef::FilterSequence(n) => n.parent,
            NodeRef::Filter(n) => n.parent,
        }
    }
}

impl<'a> From<&'a ElementChild> for NodeRef<'a> {
    fn from(child: &'a ElementChild) -> Self {
        match child {
            ElementChild::Element(n) => NodeRef::Element(n),
            ElementChild::Text(n) => NodeRef::Text(n),
            ElementChild::ExpressionContainer(n) => NodeRef::ExpressionContainer(n),
        }
    }
}

impl<'a> From<&'a AttributeKey> for NodeRef<'a> {
    fn from(key: &'a AttributeKey) -> Self {
        match key {
            AttributeKey::Static(n) => NodeRef::Identifier(n),
            AttributeKey::Directive(n) => NodeRef::DirectiveKey(n),
        }
    }
}

impl<'a> From<&'a AttributeValue> for NodeRef<'a> {
    fn from(value: &'a AttributeValue) -> Self {
        match value {
            AttributeValue::Literal(n) => NodeRef::Literal(n),
            AttributeValue::Container(n) => NodeRef::ExpressionContainer(n),
        }
    }
}

impl<'a> From<&'a DirectiveArgument> for NodeRef<'a> {
    fn from(argument: &'a DirectiveArgument) -> Self {
        match argument {
            DirectiveArgument::Static(n) => NodeRef::Identifier(n),
            DirectiveArgument::Dynamic(n) => NodeRef::ExpressionContainer(n),
        }
    }
}

impl<'a> From<&'a Expression> for NodeRef<'a> {
    fn from(expression: &'a Expression) -> Self {
        match expression {
            Expression::Script(n) => NodeRef::ScriptExpr(n),
            Expression::For(n) => NodeRef::ForExpression(n),
            Expression::On(n) => NodeRef::OnExpression(n),
            Expression::SlotScope(n) => NodeRef::SlotScopeExpression(n),
            Expression::FilterSequence(n) => NodeRef::FilterSequence(n),
        }
    }
}
