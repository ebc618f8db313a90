//! Comment and anchor-name recovery.
//!
//! The yaml-rust2 event stream reports neither comments nor the names of
//! anchors (only numeric ids). This module makes one forward pass over the
//! source text and collects both, with their zero-based line numbers. It only
//! tracks enough of the YAML grammar to know where a `#` or `&` starts a token:
//! quoted scalars, block scalar bodies, plain scalars and flow nesting.
//!
//! Scanning stops at the end of the first document.

/// A comment found in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Comment {
    /// Zero-based source line
    pub line: usize,
    /// Comment text including the leading `#`
    pub text: String,
    /// True when content precedes the comment on its line
    pub inline: bool,
}

/// Everything collected from one pass over the source.
#[derive(Debug, Default)]
pub(crate) struct SourceScan {
    pub comments: Vec<Comment>,
    /// Anchor names in source order
    pub anchors: Vec<String>,
}

const FLOW_INDICATORS: [char; 5] = [',', '[', ']', '{', '}'];

/// Scans `text` for comments and anchor names.
pub(crate) fn scan(text: &str) -> SourceScan {
    Scanner::new(text).run()
}

fn is_blank(ch: Option<char>) -> bool {
    matches!(ch, None | Some(' ' | '\t' | '\r' | '\n'))
}

fn is_flow_indicator(ch: Option<char>) -> bool {
    ch.is_some_and(|c| FLOW_INDICATORS.contains(&c))
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    line_start: usize,
    content_on_line: bool,
    seen_content: bool,
    flow_depth: usize,
    out: SourceScan,
}

impl Scanner {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            line: 0,
            line_start: 0,
            content_on_line: false,
            seen_content: false,
            flow_depth: 0,
            out: SourceScan::default(),
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn newline(&mut self) {
        self.pos += 1;
        self.line += 1;
        self.line_start = self.pos;
        self.content_on_line = false;
    }

    fn content(&mut self) {
        self.content_on_line = true;
        self.seen_content = true;
    }

    fn run(mut self) -> SourceScan {
        while let Some(ch) = self.peek(0) {
            let at_line_start = self.pos == self.line_start;
            match ch {
                '\n' => self.newline(),
                ' ' | '\t' | '\r' => self.pos += 1,
                '#' => self.comment(),
                '%' if at_line_start && self.flow_depth == 0 => self.skip_line(),
                '-' | '.' if at_line_start && self.document_marker() => {
                    if ch == '.' || self.seen_content {
                        break;
                    }
                    self.pos += 3;
                    self.content_on_line = true;
                }
                '&' => {
                    let name = self.word();
                    self.out.anchors.push(name);
                    self.content();
                }
                '*' | '!' => {
                    self.word();
                    self.content();
                }
                '\'' => self.single_quoted(),
                '"' => self.double_quoted(),
                '|' | '>' if self.flow_depth == 0 => self.block_scalar(),
                '[' | '{' => {
                    self.flow_depth += 1;
                    self.pos += 1;
                    self.content();
                }
                ']' | '}' => {
                    self.flow_depth = self.flow_depth.saturating_sub(1);
                    self.pos += 1;
                    self.content();
                }
                ',' => {
                    self.pos += 1;
                    self.content();
                }
                '-' | '?' | ':' if self.is_indicator() => {
                    self.pos += 1;
                    self.content();
                }
                _ => self.plain(),
            }
        }
        self.out
    }

    /// `---` or `...` followed by a blank.
    fn document_marker(&self) -> bool {
        let marker = self.peek(0);
        (0..3).all(|offset| self.peek(offset) == marker) && is_blank(self.peek(3))
    }

    fn is_indicator(&self) -> bool {
        let next = self.peek(1);
        is_blank(next) || (self.flow_depth > 0 && self.peek(0) == Some(':') && is_flow_indicator(next))
    }

    fn skip_line(&mut self) {
        while !matches!(self.peek(0), None | Some('\n')) {
            self.pos += 1;
        }
    }

    fn comment(&mut self) {
        let start = self.pos;
        self.skip_line();
        let text: String = self.chars[start..self.pos].iter().collect();
        self.out.comments.push(Comment {
            line: self.line,
            text: text.trim_end().to_string(),
            inline: self.content_on_line,
        });
    }

    /// Anchor, alias or tag text after its indicator character.
    fn word(&mut self) -> String {
        self.pos += 1;
        let start = self.pos;
        while !is_blank(self.peek(0)) && !(self.flow_depth > 0 && is_flow_indicator(self.peek(0))) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn single_quoted(&mut self) {
        self.content();
        self.pos += 1;
        while let Some(ch) = self.peek(0) {
            match ch {
                '\'' if self.peek(1) == Some('\'') => self.pos += 2,
                '\'' => {
                    self.pos += 1;
                    break;
                }
                '\n' => {
                    self.newline();
                    self.content_on_line = true;
                }
                _ => self.pos += 1,
            }
        }
    }

    fn double_quoted(&mut self) {
        self.content();
        self.pos += 1;
        while let Some(ch) = self.peek(0) {
            match ch {
                '\\' if self.peek(1) == Some('\n') => {
                    self.pos += 1;
                    self.newline();
                    self.content_on_line = true;
                }
                '\\' => self.pos += 2,
                '"' => {
                    self.pos += 1;
                    break;
                }
                '\n' => {
                    self.newline();
                    self.content_on_line = true;
                }
                _ => self.pos += 1,
            }
        }
    }

    fn plain(&mut self) {
        self.content();
        self.pos += 1;
        while let Some(ch) = self.peek(0) {
            let next = self.peek(1);
            let ends = match ch {
                '\n' => true,
                ':' => is_blank(next) || (self.flow_depth > 0 && is_flow_indicator(next)),
                ' ' | '\t' => next == Some('#'),
                _ => self.flow_depth > 0 && is_flow_indicator(Some(ch)),
            };
            if ends {
                break;
            }
            self.pos += 1;
        }
    }

    /// Skips a `|` or `>` header and the indented lines that form its body.
    fn block_scalar(&mut self) {
        let threshold = self.body_threshold();
        self.content();
        self.pos += 1;
        while matches!(self.peek(0), Some('0'..='9' | '+' | '-')) {
            self.pos += 1;
        }
        while matches!(self.peek(0), Some(' ' | '\t' | '\r')) {
            self.pos += 1;
        }
        if self.peek(0) == Some('#') {
            self.comment();
        }
        self.skip_line();
        if self.peek(0).is_none() {
            return;
        }
        self.newline();

        loop {
            let mut indent = 0;
            while self.peek(indent) == Some(' ') {
                indent += 1;
            }
            let first = self.peek(indent);
            if first.is_none() {
                self.pos += indent;
                return;
            }
            let blank = matches!(first, Some('\n' | '\r'));
            if !blank && threshold.is_some_and(|column| indent <= column) {
                return;
            }
            self.skip_line();
            if self.peek(0).is_none() {
                return;
            }
            self.newline();
        }
    }

    /// Column the body of a block scalar starting here must be indented past.
    ///
    /// That is the column of the key the scalar belongs to, or of the
    /// sequence dash when it is an entry. `None` for a scalar on a `---` line.
    fn body_threshold(&self) -> Option<usize> {
        let mut at = self.line_start;
        let skip_spaces = |mut at: usize| {
            while self.chars.get(at) == Some(&' ') {
                at += 1;
            }
            at
        };

        at = skip_spaces(at);
        if self.chars.get(at..at + 3).is_some_and(|marker| marker == ['-', '-', '-']) {
            return None;
        }

        let mut dash = None;
        while self.chars.get(at) == Some(&'-') && is_blank(self.chars.get(at + 1).copied()) {
            dash = Some(at);
            at = skip_spaces(at + 1);
        }

        let column = match dash {
            Some(dash) if at == self.pos => dash,
            _ => at,
        };
        Some(column - self.line_start)
    }
}
