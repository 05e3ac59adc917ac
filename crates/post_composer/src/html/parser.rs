// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Conversion from an HTML post body (or Markdown) to a [`Document`].
//!
//! The parser is deliberately forgiving: it reads a flat stream of
//! html5ever tokens and maps the handful of tags the serializer emits
//! (plus their common synonyms) onto lines and styles. Anything it does
//! not know is treated as a transparent inline wrapper.

use crate::{Document, HtmlParseError};

/// Parse an HTML post body into a document.
pub fn parse(html: &str) -> Result<Document, HtmlParseError> {
    cfg_if::cfg_if! {
        if #[cfg(feature = "sys")] {
            sys::HtmlParser::default().parse(html)
        } else {
            let _ = html;
            Err(HtmlParseError::new(vec![
                "HTML parsing requires the `sys` feature".to_owned(),
            ]))
        }
    }
}

/// Parse Markdown into a document by rendering it to HTML first.
pub fn parse_markdown(markdown: &str) -> Result<Document, HtmlParseError> {
    let parser = pulldown_cmark::Parser::new(markdown);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    parse(&html)
}

#[cfg(feature = "sys")]
mod sys {
    use std::cell::RefCell;

    use html5ever::tendril::StrTendril;
    use html5ever::tokenizer::{
        BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer,
        TokenizerOpts,
    };
    use once_cell::sync::Lazy;
    use regex::Regex;

    use crate::{
        BlockKind, Document, HeadingLevel, HtmlParseError, MediaReference,
        Run, Style,
    };

    // Pasted content from office suites carries these and html5ever
    // reports them as errors.
    static META_TAG: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)<meta[^>]*>").expect("meta tag pattern is valid")
    });
    static BOLD_STYLE: Lazy<Regex> =
        Lazy::new(|| style_pattern("font-weight", "bold"));
    static ITALIC_STYLE: Lazy<Regex> =
        Lazy::new(|| style_pattern("font-style", "italic"));
    static UNDERLINE_STYLE: Lazy<Regex> =
        Lazy::new(|| style_pattern("text-decoration", "underline"));

    fn style_pattern(name: &str, value: &str) -> Regex {
        Regex::new(&format!(
            r"(?i){}:\s*{}",
            regex::escape(name),
            regex::escape(value)
        ))
        .expect("style pattern is valid")
    }

    #[derive(Debug)]
    enum HtmlEvent {
        Start {
            name: String,
            attrs: Vec<(String, String)>,
        },
        End(String),
        Text(String),
    }

    #[derive(Default)]
    struct EventSink {
        events: RefCell<Vec<HtmlEvent>>,
        errors: RefCell<Vec<String>>,
    }

    impl TokenSink for EventSink {
        type Handle = ();

        fn process_token(
            &self,
            token: Token,
            _line_number: u64,
        ) -> TokenSinkResult<()> {
            match token {
                Token::TagToken(tag) => {
                    let name = tag.name.to_string();
                    let event = match tag.kind {
                        TagKind::StartTag => HtmlEvent::Start {
                            name,
                            attrs: tag
                                .attrs
                                .iter()
                                .map(|a| {
                                    let name = a.name.local.to_string();
                                    (name, a.value.to_string())
                                })
                                .collect(),
                        },
                        TagKind::EndTag => HtmlEvent::End(name),
                    };
                    self.events.borrow_mut().push(event);
                }
                Token::CharacterTokens(text) => {
                    self.events
                        .borrow_mut()
                        .push(HtmlEvent::Text(text.to_string()));
                }
                Token::ParseError(message) => {
                    self.errors.borrow_mut().push(message.into_owned());
                }
                _ => {}
            }
            TokenSinkResult::Continue
        }
    }

    fn get_attr<'a>(
        attrs: &'a [(String, String)],
        name: &str,
    ) -> Option<&'a str> {
        attrs
            .iter()
            .find(|(n, _v)| n == name)
            .map(|(_n, v)| v.as_str())
    }

    fn contains_style(attrs: &[(String, String)], pattern: &Regex) -> bool {
        get_attr(attrs, "style").is_some_and(|v| pattern.is_match(v))
    }

    /// An open inline element and the attributes it switches on.
    #[derive(Debug)]
    struct InlineFrame {
        tag: String,
        bold: bool,
        italic: bool,
        underline: bool,
        heading: Option<HeadingLevel>,
        // Set for a heading that started its own line.
        opens_line: bool,
    }

    impl InlineFrame {
        fn new(tag: &str, attrs: &[(String, String)]) -> Self {
            let mut frame = Self {
                tag: tag.to_owned(),
                bold: contains_style(attrs, &BOLD_STYLE),
                italic: contains_style(attrs, &ITALIC_STYLE),
                underline: contains_style(attrs, &UNDERLINE_STYLE),
                heading: HeadingLevel::from_tag(tag),
                opens_line: false,
            };
            match tag {
                "strong" | "b" => frame.bold = true,
                "em" | "i" => frame.italic = true,
                "u" | "ins" => frame.underline = true,
                _ => {}
            }
            frame
        }
    }

    #[derive(Debug)]
    enum ParsedLine {
        Text {
            block: BlockKind,
            runs: Vec<(String, Style)>,
        },
        Image(MediaReference),
    }

    #[derive(Debug)]
    struct OpenLine {
        block: BlockKind,
        runs: Vec<(String, Style)>,
    }

    #[derive(Default)]
    pub(super) struct HtmlParser {
        lines: Vec<ParsedLine>,
        current: Option<OpenLine>,
        containers: Vec<BlockKind>,
        frames: Vec<InlineFrame>,
    }

    impl HtmlParser {
        pub(super) fn parse(
            mut self,
            html: &str,
        ) -> Result<Document, HtmlParseError> {
            let cleaned = META_TAG.replace_all(html, "");
            let (events, errors) = tokenize(&cleaned);
            for error in &errors {
                tracing::debug!(
                    target: "post_composer::html",
                    error = %error,
                    "tolerated HTML parse error"
                );
            }

            for event in events {
                match event {
                    HtmlEvent::Start { name, attrs } => {
                        self.start_tag(&name, &attrs)
                    }
                    HtmlEvent::End(name) => self.end_tag(&name),
                    HtmlEvent::Text(text) => self.text(&text),
                }
            }
            self.finish_line(false);

            if self.lines.is_empty() && !errors.is_empty() {
                return Err(HtmlParseError::new(errors));
            }
            Ok(self.build())
        }

        fn start_tag(&mut self, name: &str, attrs: &[(String, String)]) {
            match name {
                "p" | "div" | "section" | "article" | "header"
                | "footer" | "pre" => {
                    self.finish_line(false);
                    self.open_line();
                }
                "blockquote" => {
                    self.finish_line(false);
                    self.containers.push(BlockKind::Quote);
                    self.open_line();
                }
                "li" => {
                    self.finish_line(false);
                    self.containers.push(BlockKind::BulletItem);
                    self.open_line();
                }
                "ul" | "ol" => self.finish_line(false),
                "br" => {
                    self.open_line();
                    self.finish_line(true);
                    self.open_line();
                }
                "img" => self.image(attrs),
                "meta" | "hr" | "input" | "wbr" => {}
                _ => {
                    let mut frame = InlineFrame::new(name, attrs);
                    // Outside a paragraph a heading is a line of its own.
                    if frame.heading.is_some() && self.current.is_none() {
                        self.open_line();
                        frame.opens_line = true;
                    }
                    self.frames.push(frame);
                }
            }
        }

        fn end_tag(&mut self, name: &str) {
            match name {
                "p" | "div" | "section" | "article" | "header"
                | "footer" | "pre" => self.finish_line(true),
                "blockquote" => {
                    self.finish_line(true);
                    self.pop_container(BlockKind::Quote);
                }
                "li" => {
                    self.finish_line(true);
                    self.pop_container(BlockKind::BulletItem);
                }
                "ul" | "ol" => self.finish_line(false),
                "br" | "img" | "meta" | "hr" | "input" | "wbr" => {}
                _ => {
                    if let Some(i) =
                        self.frames.iter().rposition(|f| f.tag == name)
                    {
                        if self.frames.remove(i).opens_line {
                            self.finish_line(true);
                        }
                    }
                }
            }
        }

        fn text(&mut self, text: &str) {
            let blank = text.trim().is_empty();
            if blank && (text.contains('\n') || self.current.is_none()) {
                return;
            }
            let text: String = text
                .chars()
                .filter(|&c| c != '\r')
                .map(|c| if c == '\n' { ' ' } else { c })
                .collect();
            let style = self.style();
            self.open_line();
            if let Some(line) = self.current.as_mut() {
                match line.runs.last_mut() {
                    Some((last, last_style)) if *last_style == style => {
                        last.push_str(&text)
                    }
                    _ => line.runs.push((text, style)),
                }
            }
        }

        fn image(&mut self, attrs: &[(String, String)]) {
            let Some(src) = get_attr(attrs, "src") else {
                return;
            };
            match MediaReference::parse_image(src) {
                Ok(reference) => {
                    self.finish_line(false);
                    self.lines.push(ParsedLine::Image(reference));
                }
                Err(err) => tracing::debug!(
                    target: "post_composer::html",
                    src,
                    error = %err,
                    "skipping image with an invalid source"
                ),
            }
        }

        fn block(&self) -> BlockKind {
            self.containers.last().copied().unwrap_or_default()
        }

        fn style(&self) -> Style {
            let mut style = Style::default();
            for frame in &self.frames {
                style.bold |= frame.bold;
                style.italic |= frame.italic;
                style.underline |= frame.underline;
                if frame.heading.is_some() {
                    style.heading = frame.heading;
                }
            }
            let block = self.block();
            if block == BlockKind::Quote {
                // Emphasis inside a quote is the quote's own.
                style.italic = false;
            }
            style.with_block(block)
        }

        fn open_line(&mut self) {
            if self.current.is_none() {
                self.current = Some(OpenLine {
                    block: self.block(),
                    runs: Vec::new(),
                });
            }
        }

        /// Close the open line. Empty lines are only kept when they were
        /// explicitly delimited.
        fn finish_line(&mut self, keep_empty: bool) {
            if let Some(line) = self.current.take() {
                if keep_empty || !line.runs.is_empty() {
                    self.lines.push(ParsedLine::Text {
                        block: line.block,
                        runs: line.runs,
                    });
                }
            }
        }

        fn pop_container(&mut self, block: BlockKind) {
            if let Some(i) = self.containers.iter().rposition(|&b| b == block)
            {
                self.containers.remove(i);
            }
        }

        fn build(self) -> Document {
            let mut runs = Vec::new();
            let count = self.lines.len();
            let mut last_is_image = false;
            for (i, line) in self.lines.into_iter().enumerate() {
                let newline_style = match line {
                    ParsedLine::Text { block, runs: text } => {
                        for (content, style) in text {
                            let style = style.with_block(block);
                            runs.push(Run::text(content, style));
                        }
                        last_is_image = false;
                        Style::default().with_block(block)
                    }
                    ParsedLine::Image(reference) => {
                        runs.push(Run::image(reference));
                        last_is_image = true;
                        Style::default()
                    }
                };
                if i + 1 < count || last_is_image {
                    runs.push(Run::text("\n", newline_style));
                }
            }
            Document::from_runs(runs)
        }
    }

    fn tokenize(html: &str) -> (Vec<HtmlEvent>, Vec<String>) {
        let tokenizer =
            Tokenizer::new(EventSink::default(), TokenizerOpts::default());
        let mut queue = BufferQueue::default();
        queue.push_back(StrTendril::from(html));
        let _ = tokenizer.feed(&mut queue);
        tokenizer.end();
        let sink = tokenizer.sink;
        (sink.events.into_inner(), sink.errors.into_inner())
    }

}
