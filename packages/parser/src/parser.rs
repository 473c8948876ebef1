//! Recursive descent parser for composite markup documents.
//!
//! Every node records the byte range it was read from, so later passes can
//! splice replacement text back into the original source. Expressions inside
//! directive values and mustaches are not parsed as full scripts; they are
//! split at the top level into the shapes the printer needs (iteration
//! clauses, handler statements, scope params, filter pipelines) and the
//! pieces kept as raw code.

use revamp_ast::*;

use crate::error::{ParseError, ParseResult};

/// Parses a whole source string into a markup tree. Spans are byte offsets
/// into `source`; ids and parent links are left unassigned.
pub fn parse(source: &str) -> ParseResult<Root> {
    Parser::new(source).parse_root()
}

pub(crate) struct Parser<'src> {
    src: &'src str,
    pos: usize,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(src: &'src str) -> Self {
        Self { src, pos: 0 }
    }

    pub(crate) fn parse_root(mut self) -> ParseResult<Root> {
        let (children, _) = self.parse_nodes(None)?;
        Ok(Root {
            children,
            span: Span::new(0, self.src.len()),
        })
    }

    /// Parses children until EOF (`enclosing == None`) or until the closing
    /// tag of the enclosing element comes into view. A comment that is not
    /// immediately followed by a node it can attach to is carried in
    /// `pending`; at a closing tag it is handed back for the end tag.
    fn parse_nodes(
        &mut self,
        enclosing: Option<&str>,
    ) -> ParseResult<(Vec<ElementChild>, Option<Comment>)> {
        let mut children = Vec::new();
        let mut pending: Option<Comment> = None;

        loop {
            if self.at_end() {
                if enclosing.is_some() {
                    return Err(ParseError::unexpected_eof(self.pos));
                }
                break;
            }
            if self.rest().starts_with("</") {
                if enclosing.is_some() {
                    break;
                }
                let pos = self.pos;
                self.pos += 2;
                let name = self.read_tag_name()?;
                return Err(ParseError::StrayClosingTag { pos, name });
            }
            if self.rest().starts_with("<!--") {
                let comment = self.parse_comment(pending.take())?;
                pending = Some(comment);
                continue;
            }
            if self.rest().starts_with("{{") {
                if let Some(comment) = pending.take() {
                    children.push(ElementChild::Text(comment_only_text(comment)));
                }
                let container = self.parse_mustache()?;
                children.push(ElementChild::ExpressionContainer(container));
                continue;
            }
            if self.at_element_start() {
                let element = self.parse_element(pending.take())?;
                children.push(ElementChild::Element(element));
                continue;
            }
            let text = self.parse_text(pending.take());
            children.push(ElementChild::Text(text));
        }

        if enclosing.is_none() {
            if let Some(comment) = pending.take() {
                children.push(ElementChild::Text(comment_only_text(comment)));
            }
        }

        Ok((children, pending))
    }

    fn parse_element(&mut self, comment: Option<Comment>) -> ParseResult<Element> {
        let tag_start = self.pos;
        self.pos += 1; // '<'
        let raw_name = self.read_tag_name()?;
        let name = raw_name.to_lowercase();
        let attributes = self.parse_attributes()?;
        self.skip_whitespace();

        let self_closing = if self.rest().starts_with("/>") {
            self.pos += 2;
            true
        } else if self.rest().starts_with('>') {
            self.pos += 1;
            false
        } else {
            return Err(match self.peek_char() {
                Some(found) => ParseError::unexpected_char(self.pos, "`>` or `/>`", found),
                None => ParseError::unexpected_eof(self.pos),
            });
        };

        let mut start_tag = StartTag {
            attributes,
            self_closing,
            leading_comment: comment,
            span: Span::new(tag_start, self.pos),
            parent: None,
        };
        if let Some(c) = &start_tag.leading_comment {
            start_tag.span.start = comment_chain_start(c);
        }

        let mut children = Vec::new();
        let mut end_tag = None;
        if !self_closing && !is_void_element(&name) {
            let trailing = if name == "script" || name == "style" {
                children = self.parse_raw_text(&name)?;
                None
            } else {
                let (kids, trailing) = self.parse_nodes(Some(name.as_str()))?;
                children = kids;
                trailing
            };
            end_tag = Some(self.parse_end_tag(&name, trailing)?);
        }

        Ok(Element {
            span: Span::new(start_tag.span.start, self.pos),
            name,
            raw_name,
            start_tag,
            children,
            end_tag,
            parent: None,
        })
    }

    fn parse_end_tag(&mut self, expected: &str, comment: Option<Comment>) -> ParseResult<EndTag> {
        let start = self.pos;
        if !self.rest().starts_with("</") {
            return Err(ParseError::unexpected_eof(self.pos));
        }
        self.pos += 2;
        let found = self.read_tag_name()?;
        if !found.eq_ignore_ascii_case(expected) {
            return Err(ParseError::MismatchedClosingTag {
                pos: start,
                expected: expected.to_string(),
                found,
            });
        }
        self.skip_whitespace();
        match self.peek_char() {
            Some('>') => self.pos += 1,
            Some(found) => return Err(ParseError::unexpected_char(self.pos, "`>`", found)),
            None => return Err(ParseError::unexpected_eof(self.pos)),
        }

        let mut tag = EndTag {
            leading_comment: comment,
            span: Span::new(start, self.pos),
            parent: None,
        };
        if let Some(c) = &tag.leading_comment {
            tag.span.start = comment_chain_start(c);
        }
        Ok(tag)
    }

    /// Script and style bodies are opaque: everything up to the matching
    /// closing tag becomes a single text child.
    fn parse_raw_text(&mut self, name: &str) -> ParseResult<Vec<ElementChild>> {
        let start = self.pos;
        let bytes = self.src.as_bytes();
        let mut i = self.pos;
        let end = loop {
            if i + 1 >= bytes.len() {
                return Err(ParseError::unexpected_eof(self.src.len()));
            }
            if bytes[i] == b'<' && bytes[i + 1] == b'/' {
                let after = &bytes[i + 2..];
                let boundary = after
                    .get(name.len())
                    .map_or(true, |b| matches!(*b, b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r'));
                if after.len() >= name.len()
                    && after[..name.len()].eq_ignore_ascii_case(name.as_bytes())
                    && boundary
                {
                    break i;
                }
            }
            i += 1;
        };
        self.pos = end;

        if end == start {
            return Ok(Vec::new());
        }
        Ok(vec![ElementChild::Text(Text {
            value: self.src[start..end].to_string(),
            leading_comment: None,
            span: Span::new(start, end),
            parent: None,
        })])
    }

    fn parse_comment(&mut self, earlier: Option<Comment>) -> ParseResult<Comment> {
        let start = self.pos;
        self.pos += 4; // "<!--"
        let Some(rel) = self.rest().find("-->") else {
            return Err(ParseError::UnterminatedComment { pos: start });
        };
        let value = self.src[self.pos..self.pos + rel].to_string();
        self.pos += rel + 3;

        Ok(Comment {
            value,
            leading_comment: earlier.map(Box::new),
            span: Span::new(start, self.pos),
            parent: None,
        })
    }

    /// A mustache child. The container's span covers the trimmed expression
    /// text only, never the `{{` `}}` delimiters, so a patched container
    /// leaves the delimiters in place.
    fn parse_mustache(&mut self) -> ParseResult<ExpressionContainer> {
        let start = self.pos;
        self.pos += 2;
        let Some(rel) = self.rest().find("}}") else {
            return Err(ParseError::UnterminatedExpression { pos: start });
        };
        let inner_start = self.pos;
        let inner_end = self.pos + rel;
        self.pos = inner_end + 2;

        let (expr_start, expr_end) = trim_range(self.src, inner_start, inner_end);
        Ok(ExpressionContainer {
            expression: self.parse_value_expression(expr_start, expr_end, None),
            leading_comment: None,
            span: Span::new(expr_start, expr_end),
            parent: None,
        })
    }

    fn parse_text(&mut self, comment: Option<Comment>) -> Text {
        let start = self.pos;
        let bytes = self.src.as_bytes();
        let mut i = self.pos;
        if i < bytes.len() && bytes[i] == b'<' {
            // stray '<' (doctype, bare bracket) reads as text
            i += 1;
        }
        while i < bytes.len() {
            if bytes[i] == b'<' {
                break;
            }
            if bytes[i] == b'{' && bytes.get(i + 1) == Some(&b'{') {
                break;
            }
            i += 1;
        }
        self.pos = i;

        let mut span = Span::new(start, i);
        if let Some(c) = &comment {
            span.start = comment_chain_start(c);
        }
        Text {
            value: self.src[start..i].to_string(),
            leading_comment: comment,
            span,
            parent: None,
        }
    }

    fn parse_attributes(&mut self) -> ParseResult<Vec<Attribute>> {
        let mut attributes = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek_char() {
                None => return Err(ParseError::unexpected_eof(self.pos)),
                Some('>') => break,
                Some('/') if self.rest().starts_with("/>") => break,
                Some(_) => attributes.push(self.parse_attribute()?),
            }
        }
        Ok(attributes)
    }

    fn parse_attribute(&mut self) -> ParseResult<Attribute> {
        let start = self.pos;
        let raw_key = self.read_attribute_name()?;
        let key_end = self.pos;

        let value_range = if self.peek_char() == Some('=') {
            self.pos += 1;
            Some(self.read_attribute_value()?)
        } else {
            None
        };

        let (directive, key) = self.classify_key(&raw_key, start, key_end);
        let directive_name = match &key {
            AttributeKey::Directive(k) => Some(k.name.name.clone()),
            AttributeKey::Static(_) => None,
        };
        let value =
            value_range.map(|(s, e)| self.attribute_value(directive_name.as_deref(), s, e));

        Ok(Attribute {
            directive,
            key,
            value,
            span: Span::new(start, self.pos),
            parent: None,
        })
    }

    fn read_attribute_name(&mut self) -> ParseResult<String> {
        let start = self.pos;
        let bytes = self.src.as_bytes();
        let mut i = self.pos;
        let mut depth = 0usize;
        while i < bytes.len() {
            match bytes[i] {
                b'[' => depth += 1,
                b']' => depth = depth.saturating_sub(1),
                b'=' | b'>' => break,
                b'/' if depth == 0 && bytes.get(i + 1) == Some(&b'>') => break,
                b if depth == 0 && b.is_ascii_whitespace() => break,
                _ => {}
            }
            i += 1;
        }
        if i == start {
            return Err(match self.peek_char() {
                Some(found) => ParseError::unexpected_char(self.pos, "attribute name", found),
                None => ParseError::unexpected_eof(self.pos),
            });
        }
        self.pos = i;
        Ok(self.src[start..i].to_string())
    }

    /// Returns the byte range of the value text, quotes excluded.
    fn read_attribute_value(&mut self) -> ParseResult<(usize, usize)> {
        let quote_start = self.pos;
        match self.peek_char() {
            Some(q @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.pos;
                let Some(rel) = self.rest().find(q) else {
                    return Err(ParseError::UnterminatedAttributeValue { pos: quote_start });
                };
                let end = start + rel;
                self.pos = end + 1;
                Ok((start, end))
            }
            Some(_) => {
                let start = self.pos;
                let bytes = self.src.as_bytes();
                let mut i = self.pos;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                    if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'>') {
                        break;
                    }
                    i += 1;
                }
                self.pos = i;
                Ok((start, i))
            }
            None => Err(ParseError::unexpected_eof(self.pos)),
        }
    }

    fn classify_key(&self, raw: &str, start: usize, end: usize) -> (bool, AttributeKey) {
        let shorthand = match raw.as_bytes().first() {
            Some(b':') => Some("bind"),
            Some(b'@') => Some("on"),
            Some(b'#') => Some("slot"),
            _ => None,
        };

        if let Some(canonical) = shorthand {
            let name = Identifier {
                name: canonical.to_string(),
                raw_name: raw[..1].to_string(),
                span: Span::new(start, start + 1),
                parent: None,
            };
            return (
                true,
                AttributeKey::Directive(self.directive_tail(name, raw, 1, start, end)),
            );
        }

        if let Some(tail) = raw.strip_prefix("v-") {
            let name_len = tail.find([':', '.', '[']).unwrap_or(tail.len());
            let name = Identifier {
                name: tail[..name_len].to_string(),
                raw_name: tail[..name_len].to_string(),
                span: Span::new(start + 2, start + 2 + name_len),
                parent: None,
            };
            return (
                true,
                AttributeKey::Directive(self.directive_tail(name, raw, 2 + name_len, start, end)),
            );
        }

        // vue 2 scoped slots use a plain attribute spelling for a directive
        if raw == "slot-scope" {
            let name = Identifier {
                name: raw.to_string(),
                raw_name: raw.to_string(),
                span: Span::new(start, end),
                parent: None,
            };
            return (
                true,
                AttributeKey::Directive(DirectiveKey {
                    name,
                    argument: None,
                    modifiers: Vec::new(),
                    span: Span::new(start, end),
                    parent: None,
                }),
            );
        }

        (
            false,
            AttributeKey::Static(Identifier {
                name: raw.to_lowercase(),
                raw_name: raw.to_string(),
                span: Span::new(start, end),
                parent: None,
            }),
        )
    }

    /// Argument and modifiers of a directive key, read from `raw[offset..]`.
    fn directive_tail(
        &self,
        name: Identifier,
        raw: &str,
        offset: usize,
        start: usize,
        end: usize,
    ) -> DirectiveKey {
        let mut offset = offset.min(raw.len());
        let mut tail = &raw[offset..];
        // longhand separator, e.g. v-bind:href
        if let Some(stripped) = tail.strip_prefix(':') {
            offset += 1;
            tail = stripped;
        }

        let mut argument = None;
        let modifier_text;
        let modifier_base;

        if let Some(inner) = tail.strip_prefix('[') {
            let close = inner.find(']').unwrap_or(inner.len());
            let expr_start = start + offset + 1;
            let expr_end = expr_start + close;
            argument = Some(DirectiveArgument::Dynamic(ExpressionContainer {
                expression: self.parse_value_expression(expr_start, expr_end, None),
                leading_comment: None,
                span: Span::new(expr_start, expr_end),
                parent: None,
            }));
            let consumed = 1 + close + usize::from(close < inner.len());
            modifier_text = &tail[consumed..];
            modifier_base = start + offset + consumed;
        } else {
            let arg_len = tail.find('.').unwrap_or(tail.len());
            if arg_len > 0 {
                argument = Some(DirectiveArgument::Static(Identifier {
                    name: tail[..arg_len].to_lowercase(),
                    raw_name: tail[..arg_len].to_string(),
                    span: Span::new(start + offset, start + offset + arg_len),
                    parent: None,
                }));
            }
            modifier_text = &tail[arg_len..];
            modifier_base = start + offset + arg_len;
        }

        let mut modifiers = Vec::new();
        let mut cursor = 0;
        while cursor < modifier_text.len() {
            cursor += 1; // '.'
            let len = modifier_text[cursor..]
                .find('.')
                .unwrap_or(modifier_text.len() - cursor);
            let text = &modifier_text[cursor..cursor + len];
            modifiers.push(Identifier {
                name: text.to_string(),
                raw_name: text.to_string(),
                span: Span::new(modifier_base + cursor, modifier_base + cursor + len),
                parent: None,
            });
            cursor += len;
        }

        DirectiveKey {
            name,
            argument,
            modifiers,
            span: Span::new(start, end),
            parent: None,
        }
    }

    fn attribute_value(
        &self,
        directive_name: Option<&str>,
        start: usize,
        end: usize,
    ) -> AttributeValue {
        match directive_name {
            Some(name) => {
                let (expr_start, expr_end) = trim_range(self.src, start, end);
                AttributeValue::Container(ExpressionContainer {
                    expression: self.parse_value_expression(expr_start, expr_end, Some(name)),
                    leading_comment: None,
                    span: Span::new(start, end),
                    parent: None,
                })
            }
            None => AttributeValue::Literal(Literal {
                value: self.src[start..end].to_string(),
                span: Span::new(start, end),
                parent: None,
            }),
        }
    }

    fn parse_value_expression(
        &self,
        start: usize,
        end: usize,
        directive: Option<&str>,
    ) -> Option<Expression> {
        if start >= end {
            return None;
        }
        Some(match directive {
            Some("for") => self.parse_for_expression(start, end),
            Some("on") => Expression::On(OnExpression {
                body: self.split_script_exprs(start, end, ';'),
                span: Span::new(start, end),
                parent: None,
            }),
            Some("slot") | Some("slot-scope") => Expression::SlotScope(SlotScopeExpression {
                params: self.split_script_exprs(start, end, ','),
                span: Span::new(start, end),
                parent: None,
            }),
            _ => self.parse_filters_or_script(start, end),
        })
    }

    fn parse_for_expression(&self, start: usize, end: usize) -> Expression {
        let Some((sep_start, sep_end)) = find_iteration_keyword(self.src, start, end) else {
            return self.parse_filters_or_script(start, end);
        };

        let (left_start, left_end) = trim_range(self.src, start, sep_start);
        let left_text = &self.src[left_start..left_end];
        let left = if left_text.starts_with('(') && left_text.ends_with(')') {
            self.split_script_exprs(left_start + 1, left_end - 1, ',')
        } else {
            vec![self.script_expr(left_start, left_end)]
        };

        let (right_start, right_end) = trim_range(self.src, sep_end, end);
        Expression::For(ForExpression {
            left,
            right: self.script_expr(right_start, right_end),
            span: Span::new(start, end),
            parent: None,
        })
    }

    fn parse_filters_or_script(&self, start: usize, end: usize) -> Expression {
        let pieces = split_top_level(self.src, start, end, '|');
        if pieces.len() <= 1 {
            return Expression::Script(self.script_expr(start, end));
        }

        let (base_start, base_end) = trim_range(self.src, pieces[0].0, pieces[0].1);
        let filters = pieces[1..]
            .iter()
            .map(|&(s, e)| self.parse_filter(s, e))
            .collect();
        Expression::FilterSequence(FilterSequence {
            expression: self.script_expr(base_start, base_end),
            filters,
            span: Span::new(start, end),
            parent: None,
        })
    }

    fn parse_filter(&self, start: usize, end: usize) -> Filter {
        let (start, end) = trim_range(self.src, start, end);
        let text = &self.src[start..end];

        let (callee_len, arguments) = match text.find('(') {
            Some(open) if text.ends_with(')') => {
                (open, self.split_script_exprs(start + open + 1, end - 1, ','))
            }
            _ => (text.len(), Vec::new()),
        };

        let (callee_start, callee_end) = trim_range(self.src, start, start + callee_len);
        let callee_text = &self.src[callee_start..callee_end];
        Filter {
            callee: Identifier {
                name: callee_text.to_string(),
                raw_name: callee_text.to_string(),
                span: Span::new(callee_start, callee_end),
                parent: None,
            },
            arguments,
            span: Span::new(start, end),
            parent: None,
        }
    }

    fn split_script_exprs(&self, start: usize, end: usize, sep: char) -> Vec<ScriptExpr> {
        split_top_level(self.src, start, end, sep)
            .into_iter()
            .map(|(s, e)| trim_range(self.src, s, e))
            .filter(|&(s, e)| s < e)
            .map(|(s, e)| self.script_expr(s, e))
            .collect()
    }

    fn script_expr(&self, start: usize, end: usize) -> ScriptExpr {
        ScriptExpr {
            code: self.src[start..end].to_string(),
            span: Span::new(start, end),
            parent: None,
        }
    }

    fn read_tag_name(&mut self) -> ParseResult<String> {
        let bytes = self.src.as_bytes();
        if !bytes
            .get(self.pos)
            .is_some_and(|b| b.is_ascii_alphabetic())
        {
            return Err(match self.peek_char() {
                Some(found) => ParseError::unexpected_char(self.pos, "tag name", found),
                None => ParseError::unexpected_eof(self.pos),
            });
        }
        let start = self.pos;
        let mut i = self.pos + 1;
        while i < bytes.len()
            && (bytes[i].is_ascii_alphanumeric() || matches!(bytes[i], b'-' | b'_' | b'.' | b':'))
        {
            i += 1;
        }
        self.pos = i;
        Ok(self.src[start..i].to_string())
    }

    fn at_element_start(&self) -> bool {
        let bytes = self.src.as_bytes();
        bytes.get(self.pos) == Some(&b'<')
            && bytes
                .get(self.pos + 1)
                .is_some_and(|b| b.is_ascii_alphabetic())
    }

    fn rest(&self) -> &'src str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_whitespace(&mut self) {
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }
}

/// Start of the earliest comment in a chain.
fn comment_chain_start(comment: &Comment) -> usize {
    match &comment.leading_comment {
        Some(inner) => comment_chain_start(inner),
        None => comment.span.start,
    }
}

/// A comment with nothing to attach to rides on an empty text node.
fn comment_only_text(comment: Comment) -> Text {
    let span = Span::new(comment_chain_start(&comment), comment.span.end);
    Text {
        value: String::new(),
        leading_comment: Some(comment),
        span,
        parent: None,
    }
}

fn trim_range(src: &str, start: usize, end: usize) -> (usize, usize) {
    let bytes = src.as_bytes();
    let mut s = start;
    let mut e = end;
    while s < e && bytes[s].is_ascii_whitespace() {
        s += 1;
    }
    while e > s && bytes[e - 1].is_ascii_whitespace() {
        e -= 1;
    }
    (s, e)
}

/// Splits `src[start..end]` at top-level occurrences of `sep`, ignoring
/// separators inside quotes or brackets. For `|` a doubled `||` is the
/// logical-or operator, never a separator. Returns untrimmed piece ranges.
fn split_top_level(src: &str, start: usize, end: usize, sep: char) -> Vec<(usize, usize)> {
    let bytes = src.as_bytes();
    let mut pieces = Vec::new();
    let mut piece_start = start;
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = start;

    while i < end {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q {
                quote = None;
            }
        } else {
            match b {
                b'\'' | b'"' | b'`' => quote = Some(b),
                b'(' | b'[' | b'{' => depth += 1,
                b')' | b']' | b'}' => depth = depth.saturating_sub(1),
                b'|' if sep == '|' && depth == 0 => {
                    if bytes.get(i + 1) == Some(&b'|') {
                        i += 2;
                        continue;
                    }
                    pieces.push((piece_start, i));
                    piece_start = i + 1;
                }
                b if depth == 0 && sep != '|' && b == sep as u8 => {
                    pieces.push((piece_start, i));
                    piece_start = i + 1;
                }
                _ => {}
            }
        }
        i += 1;
    }

    pieces.push((piece_start, end));
    pieces
}

/// Top-level ` in ` or ` of ` separator of an iteration clause.
fn find_iteration_keyword(src: &str, start: usize, end: usize) -> Option<(usize, usize)> {
    let bytes = src.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = start;

    while i + 4 <= end {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q {
                quote = None;
            }
        } else {
            match b {
                b'\'' | b'"' | b'`' => quote = Some(b),
                b'(' | b'[' | b'{' => depth += 1,
                b')' | b']' | b'}' => depth = depth.saturating_sub(1),
                _ if depth == 0 => {
                    let window = &bytes[i..i + 4];
                    if window == b" in " || window == b" of " {
                        return Some((i, i + 4));
                    }
                }
                _ => {}
            }
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_element(root: &Root) -> &Element {
        root.children
            .iter()
            .find_map(|child| match child {
                ElementChild::Element(el) => Some(el),
                _ => None,
            })
            .expect("expected an element child")
    }

    #[test]
    fn parses_nested_elements_with_spans() {
        let src = "<div id=\"app\"><span>hi</span></div>";
        let root = parse(src).unwrap();
        let div = first_element(&root);

        assert_eq!(div.name, "div");
        assert_eq!(&src[div.span.start..div.span.end], src);
        assert_eq!(&src[div.start_tag.span.start..div.start_tag.span.end], "<div id=\"app\">");

        let ElementChild::Element(span_el) = &div.children[0] else {
            panic!("expected span element");
        };
        assert_eq!(span_el.name, "span");
        let ElementChild::Text(text) = &span_el.children[0] else {
            panic!("expected text");
        };
        assert_eq!(text.value, "hi");
        let end = span_el.end_tag.as_ref().unwrap();
        assert_eq!(&src[end.span.start..end.span.end], "</span>");
    }

    #[test]
    fn keeps_raw_tag_casing() {
        let root = parse("<MyWidget></MyWidget>").unwrap();
        let el = first_element(&root);
        assert_eq!(el.name, "mywidget");
        assert_eq!(el.raw_name, "MyWidget");
    }

    #[test]
    fn self_closing_and_void_elements_take_no_children() {
        let root = parse("<img src=\"x.png\"><custom />").unwrap();
        let ElementChild::Element(img) = &root.children[0] else {
            panic!();
        };
        assert!(!img.start_tag.self_closing);
        assert!(img.end_tag.is_none());
        assert!(img.children.is_empty());

        let ElementChild::Element(custom) = &root.children[1] else {
            panic!();
        };
        assert!(custom.start_tag.self_closing);
        assert!(custom.end_tag.is_none());
    }

    #[test]
    fn parses_static_attributes() {
        let src = "<input type=\"text\" disabled>";
        let root = parse(src).unwrap();
        let el = first_element(&root);
        let attrs = &el.start_tag.attributes;
        assert_eq!(attrs.len(), 2);

        assert!(!attrs[0].directive);
        let AttributeKey::Static(name) = &attrs[0].key else {
            panic!();
        };
        assert_eq!(name.name, "type");
        let Some(AttributeValue::Literal(value)) = &attrs[0].value else {
            panic!();
        };
        assert_eq!(value.value, "text");
        assert_eq!(&src[value.span.start..value.span.end], "text");

        assert!(attrs[1].value.is_none());
    }

    #[test]
    fn parses_shorthand_directives() {
        let root = parse("<a :href=\"url\" @click.stop=\"go\" #header></a>").unwrap();
        let el = first_element(&root);
        let attrs = &el.start_tag.attributes;

        let AttributeKey::Directive(bind) = &attrs[0].key else {
            panic!();
        };
        assert_eq!(bind.name.name, "bind");
        assert_eq!(bind.name.raw_name, ":");
        let Some(DirectiveArgument::Static(arg)) = &bind.argument else {
            panic!();
        };
        assert_eq!(arg.name, "href");

        let AttributeKey::Directive(on) = &attrs[1].key else {
            panic!();
        };
        assert_eq!(on.name.name, "on");
        assert_eq!(on.name.raw_name, "@");
        assert_eq!(on.modifiers.len(), 1);
        assert_eq!(on.modifiers[0].name, "stop");
        let Some(AttributeValue::Container(container)) = &attrs[1].value else {
            panic!();
        };
        assert!(matches!(container.expression, Some(Expression::On(_))));

        let AttributeKey::Directive(slot) = &attrs[2].key else {
            panic!();
        };
        assert_eq!(slot.name.name, "slot");
        assert_eq!(slot.name.raw_name, "#");
    }

    #[test]
    fn parses_longhand_directive_with_dynamic_argument() {
        let root = parse("<a v-bind:[key].sync=\"value\"></a>").unwrap();
        let el = first_element(&root);
        let AttributeKey::Directive(key) = &el.start_tag.attributes[0].key else {
            panic!();
        };
        assert_eq!(key.name.name, "bind");
        assert_eq!(key.name.raw_name, "bind");
        let Some(DirectiveArgument::Dynamic(container)) = &key.argument else {
            panic!();
        };
        let Some(Expression::Script(expr)) = &container.expression else {
            panic!();
        };
        assert_eq!(expr.code, "key");
        assert_eq!(key.modifiers[0].name, "sync");
    }

    #[test]
    fn parses_iteration_clauses() {
        let root = parse("<li v-for=\"(item, index) in list\"></li>").unwrap();
        let el = first_element(&root);
        let Some(AttributeValue::Container(container)) = &el.start_tag.attributes[0].value else {
            panic!();
        };
        let Some(Expression::For(for_expr)) = &container.expression else {
            panic!();
        };
        assert_eq!(for_expr.left.len(), 2);
        assert_eq!(for_expr.left[0].code, "item");
        assert_eq!(for_expr.left[1].code, "index");
        assert_eq!(for_expr.right.code, "list");
    }

    #[test]
    fn single_binding_iteration_has_no_parens() {
        let root = parse("<li v-for=\"item of items\"></li>").unwrap();
        let el = first_element(&root);
        let Some(AttributeValue::Container(container)) = &el.start_tag.attributes[0].value else {
            panic!();
        };
        let Some(Expression::For(for_expr)) = &container.expression else {
            panic!();
        };
        assert_eq!(for_expr.left.len(), 1);
        assert_eq!(for_expr.left[0].code, "item");
        assert_eq!(for_expr.right.code, "items");
    }

    #[test]
    fn parses_mustache_with_filters() {
        let src = "<p>{{ name | truncate(10, '...') | capitalize }}</p>";
        let root = parse(src).unwrap();
        let el = first_element(&root);
        let ElementChild::ExpressionContainer(container) = &el.children[0] else {
            panic!();
        };
        assert_eq!(
            &src[container.span.start..container.span.end],
            "name | truncate(10, '...') | capitalize"
        );

        let Some(Expression::FilterSequence(seq)) = &container.expression else {
            panic!();
        };
        assert_eq!(seq.expression.code, "name");
        assert_eq!(seq.filters.len(), 2);
        assert_eq!(seq.filters[0].callee.name, "truncate");
        assert_eq!(seq.filters[0].arguments.len(), 2);
        assert_eq!(seq.filters[0].arguments[0].code, "10");
        assert_eq!(seq.filters[0].arguments[1].code, "'...'");
        assert_eq!(seq.filters[1].callee.name, "capitalize");
        assert!(seq.filters[1].arguments.is_empty());
    }

    #[test]
    fn logical_or_is_not_a_filter() {
        let root = parse("<p>{{ a || b }}</p>").unwrap();
        let el = first_element(&root);
        let ElementChild::ExpressionContainer(container) = &el.children[0] else {
            panic!();
        };
        let Some(Expression::Script(expr)) = &container.expression else {
            panic!("expected a plain script expression");
        };
        assert_eq!(expr.code, "a || b");
    }

    #[test]
    fn handler_statements_split_on_semicolons() {
        let root = parse("<a v-on:click=\"count += 1; emit('tick')\"></a>").unwrap();
        let el = first_element(&root);
        let Some(AttributeValue::Container(container)) = &el.start_tag.attributes[0].value else {
            panic!();
        };
        let Some(Expression::On(on)) = &container.expression else {
            panic!();
        };
        assert_eq!(on.body.len(), 2);
        assert_eq!(on.body[0].code, "count += 1");
        assert_eq!(on.body[1].code, "emit('tick')");
    }

    #[test]
    fn comment_attaches_to_the_next_element() {
        let src = "<div><!-- note --><span></span></div>";
        let root = parse(src).unwrap();
        let div = first_element(&root);
        let ElementChild::Element(span_el) = &div.children[0] else {
            panic!();
        };
        let comment = span_el.start_tag.leading_comment.as_ref().unwrap();
        assert_eq!(comment.value, " note ");
        assert_eq!(&src[comment.span.start..comment.span.end], "<!-- note -->");
        // the owner's span covers the comment so a reprint keeps it
        assert_eq!(span_el.span.start, comment.span.start);
    }

    #[test]
    fn trailing_comment_attaches_to_the_end_tag() {
        let root = parse("<div>text<!-- last --></div>").unwrap();
        let div = first_element(&root);
        let end = div.end_tag.as_ref().unwrap();
        assert_eq!(end.leading_comment.as_ref().unwrap().value, " last ");
    }

    #[test]
    fn dangling_comment_becomes_an_empty_text_node() {
        let root = parse("<br><!-- eof -->").unwrap();
        let ElementChild::Text(text) = &root.children[1] else {
            panic!("expected a comment-bearing text node");
        };
        assert!(text.value.is_empty());
        assert_eq!(text.leading_comment.as_ref().unwrap().value, " eof ");
    }

    #[test]
    fn adjacent_comments_chain() {
        let root = parse("<div><!--a--><!--b--><span></span></div>").unwrap();
        let div = first_element(&root);
        let ElementChild::Element(span_el) = &div.children[0] else {
            panic!();
        };
        let outer = span_el.start_tag.leading_comment.as_ref().unwrap();
        assert_eq!(outer.value, "b");
        assert_eq!(outer.leading_comment.as_ref().unwrap().value, "a");
    }

    #[test]
    fn script_bodies_are_opaque() {
        let src = "<script>if (a < b) { run(); }</script>";
        let root = parse(src).unwrap();
        let el = first_element(&root);
        let ElementChild::Text(text) = &el.children[0] else {
            panic!();
        };
        assert_eq!(text.value, "if (a < b) { run(); }");
    }

    #[test]
    fn mismatched_close_tag_is_an_error() {
        let err = parse("<div><span></div>").unwrap_err();
        assert!(matches!(err, ParseError::MismatchedClosingTag { .. }));
    }

    #[test]
    fn stray_close_tag_is_an_error() {
        let err = parse("</div>").unwrap_err();
        assert!(matches!(err, ParseError::StrayClosingTag { .. }));
    }

    #[test]
    fn unterminated_structures_are_errors() {
        assert!(matches!(
            parse("<div>").unwrap_err(),
            ParseError::UnexpectedEof { .. }
        ));
        assert!(matches!(
            parse("<!-- open").unwrap_err(),
            ParseError::UnterminatedComment { .. }
        ));
        assert!(matches!(
            parse("{{ a + b").unwrap_err(),
            ParseError::UnterminatedExpression { .. }
        ));
    }
}
