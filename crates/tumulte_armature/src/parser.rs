//! Component parser.
//!
//! A single forward pass over the bytes of the component. Every delimiter the
//! parser looks at is ASCII, so byte offsets always land on character
//! boundaries when slicing.

use tumulte_carton::CompactString;
use tumulte_relief::{
    Attribute, CodeBlock, ComponentTree, ElementNode, ErrorCode, Expression, ParseError,
    TemplateNode, TextNode, TextRange,
};

use crate::tags::{is_custom_tag, is_raw_text_tag, is_void_tag};

/// Parse a component file.
///
/// Any error is fatal: the caller treats the document as having no embedded
/// analysis until the next successful parse.
pub fn parse(source: &str) -> Result<ComponentTree, ParseError> {
    Parser::new(source).parse_component()
}

struct Parser<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    script: Option<CodeBlock>,
    style: Option<CodeBlock>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            script: None,
            style: None,
        }
    }

    fn parse_component(mut self) -> Result<ComponentTree, ParseError> {
        self.skip_prolog()?;
        if !self.at_tag_open() {
            return Err(self.error(ErrorCode::MissingRoot, self.pos));
        }

        let root = self.parse_element(0)?;
        Ok(ComponentTree {
            root,
            script: self.script,
            style: self.style,
        })
    }

    /// Skip whitespace, comments and `<!doctype>`-like declarations before
    /// the root element.
    fn skip_prolog(&mut self) -> Result<(), ParseError> {
        loop {
            self.skip_whitespace();
            if self.starts_with("<!--") {
                self.skip_comment()?;
            } else if self.starts_with("<!") || self.starts_with("<?") {
                let start = self.pos;
                match self.find_byte(b'>') {
                    Some(end) => self.pos = end + 1,
                    None => return Err(self.error(ErrorCode::UnterminatedTag, start)),
                }
            } else {
                return Ok(());
            }
        }
    }

    fn parse_element(&mut self, depth: usize) -> Result<ElementNode, ParseError> {
        let start = self.pos;
        self.pos += 1;
        let tag = self.read_tag_name();
        if tag.is_empty() {
            return Err(self.error(ErrorCode::InvalidTagName, start));
        }

        let (attributes, is_self_closing) = self.parse_attributes(start)?;
        let mut element = ElementNode {
            tag: CompactString::from(tag),
            range: TextRange::new(start as u32, self.pos as u32),
            attributes,
            children: Vec::new(),
            is_custom: is_custom_tag(tag),
            is_self_closing,
        };
        if is_self_closing || is_void_tag(tag) {
            return Ok(element);
        }

        element.children = self.parse_children(tag, start, depth + 1)?;
        element.range.end = self.pos as u32;
        Ok(element)
    }

    /// Parse children up to and including the closing tag of `parent_tag`.
    fn parse_children(
        &mut self,
        parent_tag: &str,
        parent_start: usize,
        depth: usize,
    ) -> Result<Vec<TemplateNode>, ParseError> {
        let mut children = Vec::new();

        loop {
            if self.at_end() {
                return Err(self.error(ErrorCode::UnclosedElement, parent_start));
            }

            if self.starts_with("</") {
                let close_start = self.pos;
                self.pos += 2;
                let name = self.read_tag_name();
                self.skip_whitespace();
                if self.peek() != Some(b'>') {
                    return Err(self.error(ErrorCode::UnterminatedTag, close_start));
                }
                self.pos += 1;
                if !name.eq_ignore_ascii_case(parent_tag) {
                    return Err(self.error(ErrorCode::MismatchedClosingTag, close_start));
                }
                return Ok(children);
            }

            if self.starts_with("<!--") {
                self.skip_comment()?;
                continue;
            }

            if self.at_tag_open() {
                if is_raw_text_tag(self.peek_tag_name()) {
                    let (element, block) = self.parse_raw_text_element()?;
                    let slot = if depth != 1 {
                        None
                    } else if element.tag.eq_ignore_ascii_case("script") {
                        Some(&mut self.script)
                    } else {
                        Some(&mut self.style)
                    };
                    match slot {
                        Some(slot) if slot.is_none() => *slot = Some(block),
                        _ => children.push(TemplateNode::Element(element)),
                    }
                } else {
                    children.push(TemplateNode::Element(self.parse_element(depth)?));
                }
                continue;
            }

            if let Some(text) = self.parse_text()? {
                children.push(TemplateNode::Text(text));
            }
        }
    }

    /// Parse a `<script>`/`<style>` element whose content is not markup.
    fn parse_raw_text_element(&mut self) -> Result<(ElementNode, CodeBlock), ParseError> {
        let start = self.pos;
        self.pos += 1;
        let tag = self.read_tag_name();
        let (attributes, is_self_closing) = self.parse_attributes(start)?;

        let content_start = self.pos;
        let content_end = if is_self_closing {
            content_start
        } else {
            let closing = format!("</{tag}");
            let close_start = self
                .find_ignore_case(&closing)
                .ok_or_else(|| self.error(ErrorCode::UnclosedElement, start))?;
            self.pos = close_start + closing.len();
            let end = self
                .find_byte(b'>')
                .ok_or_else(|| self.error(ErrorCode::UnterminatedTag, close_start))?;
            self.pos = end + 1;
            close_start
        };

        let range = TextRange::new(start as u32, self.pos as u32);
        let text_range = TextRange::new(content_start as u32, content_end as u32);
        let text = text_range.slice(self.source).to_string();

        let mut children = Vec::new();
        if !text.is_empty() {
            children.push(TemplateNode::Text(TextNode {
                range: text_range,
                content: text.clone(),
                expressions: Vec::new(),
            }));
        }

        let element = ElementNode {
            tag: CompactString::from(tag),
            range,
            attributes: attributes.clone(),
            children,
            is_custom: false,
            is_self_closing,
        };
        let block = CodeBlock {
            range,
            text_range,
            text,
            attributes,
        };
        Ok((element, block))
    }

    fn parse_attributes(
        &mut self,
        tag_start: usize,
    ) -> Result<(Vec<Attribute>, bool), ParseError> {
        let mut attributes = Vec::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(self.error(ErrorCode::UnterminatedTag, tag_start)),
                Some(b'>') => {
                    self.pos += 1;
                    return Ok((attributes, false));
                }
                Some(b'/') if self.peek_at(1) == Some(b'>') => {
                    self.pos += 2;
                    return Ok((attributes, true));
                }
                Some(b'{') => {
                    let expression = self.read_expression()?;
                    attributes.push(Attribute {
                        name: CompactString::default(),
                        range: expression.range,
                        value: None,
                        value_range: None,
                        expressions: vec![expression],
                    });
                }
                Some(_) => {
                    let name_start = self.pos;
                    while let Some(b) = self.peek() {
                        if b.is_ascii_whitespace() || matches!(b, b'=' | b'>' | b'/' | b'{' | b'"' | b'\'')
                        {
                            break;
                        }
                        self.pos += 1;
                    }
                    if self.pos == name_start {
                        // stray `/` or quote
                        self.pos += 1;
                        continue;
                    }
                    let name = &self.source[name_start..self.pos];

                    let after_name = self.pos;
                    self.skip_whitespace();
                    let (value, value_range, expressions) = if self.peek() == Some(b'=') {
                        self.pos += 1;
                        self.skip_whitespace();
                        let (value, range, expressions) = self.parse_attribute_value()?;
                        (Some(value), Some(range), expressions)
                    } else {
                        self.pos = after_name;
                        (None, None, Vec::new())
                    };

                    attributes.push(Attribute {
                        name: CompactString::from(name),
                        range: TextRange::new(name_start as u32, self.pos as u32),
                        value,
                        value_range,
                        expressions,
                    });
                }
            }
        }
    }

    fn parse_attribute_value(
        &mut self,
    ) -> Result<(String, TextRange, Vec<Expression>), ParseError> {
        let mut expressions = Vec::new();

        if let Some(quote @ (b'"' | b'\'')) = self.peek() {
            let quote_start = self.pos;
            self.pos += 1;
            let value_start = self.pos;
            loop {
                match self.peek() {
                    None => {
                        return Err(self.error(ErrorCode::UnterminatedAttributeValue, quote_start))
                    }
                    Some(b) if b == quote => break,
                    Some(b'{') => expressions.push(self.read_expression()?),
                    Some(b'\\') if self.peek_at(1) == Some(b'{') => self.pos += 2,
                    Some(_) => self.pos += 1,
                }
            }
            let range = TextRange::new(value_start as u32, self.pos as u32);
            self.pos += 1;
            return Ok((range.slice(self.source).to_string(), range, expressions));
        }

        let value_start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || b == b'>' || (b == b'/' && self.peek_at(1) == Some(b'>'))
            {
                break;
            }
            if b == b'{' {
                expressions.push(self.read_expression()?);
            } else {
                self.pos += 1;
            }
        }
        let range = TextRange::new(value_start as u32, self.pos as u32);
        Ok((range.slice(self.source).to_string(), range, expressions))
    }

    /// Parse a run of text up to the next tag, closing tag or comment.
    /// Whitespace-only runs are dropped.
    fn parse_text(&mut self) -> Result<Option<TextNode>, ParseError> {
        let start = self.pos;
        let mut expressions = Vec::new();

        while let Some(b) = self.peek() {
            match b {
                b'<' if self.pos > start
                    && (self.at_tag_open()
                        || self.starts_with("</")
                        || self.starts_with("<!--")) =>
                {
                    break
                }
                b'\\' if self.peek_at(1) == Some(b'{') => self.pos += 2,
                b'{' => expressions.push(self.read_expression()?),
                _ => self.pos += 1,
            }
        }

        let range = TextRange::new(start as u32, self.pos as u32);
        let content = range.slice(self.source);
        if expressions.is_empty() && content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(TextNode {
            range,
            content: content.to_string(),
            expressions,
        }))
    }

    /// Read a `{ ... }` expression starting at the opening brace. Braces
    /// inside string literals do not count.
    fn read_expression(&mut self) -> Result<Expression, ParseError> {
        let open = self.pos;
        let mut depth = 0usize;

        while let Some(b) = self.peek() {
            match b {
                b'\'' | b'"' | b'`' => {
                    if !self.skip_string(b) {
                        break;
                    }
                    continue;
                }
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += 1;
                        let range = TextRange::new(open as u32, self.pos as u32);
                        let text_range = TextRange::new(range.start + 1, range.end - 1);
                        return Ok(Expression {
                            range,
                            text_range,
                            text: text_range.slice(self.source).to_string(),
                        });
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }

        Err(self.error(ErrorCode::UnterminatedExpression, open))
    }

    /// Skip a string literal starting at its opening quote. Returns `false`
    /// when the input ends first.
    fn skip_string(&mut self, quote: u8) -> bool {
        self.pos += 1;
        while let Some(b) = self.peek() {
            if b == b'\\' {
                self.pos += 2;
            } else if b == quote {
                self.pos += 1;
                return true;
            } else {
                self.pos += 1;
            }
        }
        false
    }

    fn skip_comment(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        match self.source[self.pos + 4..].find("-->") {
            Some(idx) => {
                self.pos += 4 + idx + 3;
                Ok(())
            }
            None => Err(self.error(ErrorCode::UnterminatedComment, start)),
        }
    }

    fn read_tag_name(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.') {
                self.pos += 1;
            } else {
                break;
            }
        }
        &self.source[start..self.pos]
    }

    /// Tag name of the tag opening at the current position, not consumed.
    fn peek_tag_name(&self) -> &'a str {
        let start = self.pos + 1;
        let end = self.bytes[start..]
            .iter()
            .position(|b| !(b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.')))
            .map_or(self.bytes.len(), |len| start + len);
        &self.source[start..end]
    }

    fn at_tag_open(&self) -> bool {
        self.peek() == Some(b'<') && self.peek_at(1).is_some_and(|b| b.is_ascii_alphabetic())
    }

    #[inline]
    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    #[inline]
    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    #[inline]
    fn starts_with(&self, needle: &str) -> bool {
        self.bytes
            .get(self.pos..)
            .is_some_and(|rest| rest.starts_with(needle.as_bytes()))
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn find_byte(&self, needle: u8) -> Option<usize> {
        self.bytes
            .get(self.pos..)?
            .iter()
            .position(|&b| b == needle)
            .map(|idx| self.pos + idx)
    }

    fn find_ignore_case(&self, needle: &str) -> Option<usize> {
        let needle = needle.as_bytes();
        self.bytes
            .get(self.pos..)?
            .windows(needle.len())
            .position(|window| window.eq_ignore_ascii_case(needle))
            .map(|idx| self.pos + idx)
    }

    #[inline]
    fn error(&self, code: ErrorCode, offset: usize) -> ParseError {
        ParseError::new(code, offset as u32)
    }
}
