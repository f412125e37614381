//! Tolerant re-writer for near-JSON model output.
//!
//! Only runs after a strict parse has failed. It never rejects input: every
//! construct it does not understand is turned into a string, a `null`, or
//! skipped, and every open container is closed at end of input. Whether the
//! result is usable is decided by the strict parser that runs afterwards.

use serde_json::Value;

/// Containers nested deeper than this are cut off and closed.
const MAX_DEPTH: usize = 64;

/// Rewrites `input` into text that is valid JSON in the common failure cases:
/// trailing or missing commas, single and typographic quotes, unquoted keys and
/// values, Python literals, comments, raw control characters and bad escapes in
/// strings, unescaped inner quotes, and output truncated mid-structure.
pub fn repair_json(input: &str) -> String {
    let mut repairer = Repairer {
        chars: input.chars().collect(),
        pos: 0,
        depth: 0,
    };
    repairer.skip_insignificant();
    repairer.value()
}

struct Repairer {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Repairer {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    /// Skips whitespace and `//` / `/* */` comments.
    fn skip_insignificant(&mut self) {
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(c), _) if c.is_whitespace() => self.pos += 1,
                (Some('/'), Some('/')) => {
                    while let Some(c) = self.advance() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                (Some('/'), Some('*')) => {
                    self.pos += 2;
                    while self.peek().is_some() {
                        if self.peek() == Some('*') && self.peek_at(1) == Some('/') {
                            self.pos += 2;
                            break;
                        }
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn value(&mut self) -> String {
        self.skip_insignificant();
        match self.peek() {
            None => "null".to_string(),
            Some('{') => self.object(),
            Some('[') => self.array(),
            Some(c) if is_open_quote(c) => self.string(),
            Some(_) => self.bare_value(),
        }
    }

    fn object(&mut self) -> String {
        self.advance();
        if self.enter() {
            return "{}".to_string();
        }

        let mut members = Vec::new();
        loop {
            self.skip_insignificant();
            match self.peek() {
                None => break,
                Some('}') => {
                    self.advance();
                    break;
                }
                Some(',') | Some(']') | Some(':') => {
                    self.advance();
                    continue;
                }
                _ => {}
            }

            let key = match self.peek() {
                Some(c) if is_open_quote(c) => self.string(),
                _ => match self.bare_key() {
                    Some(key) => key,
                    None => {
                        self.advance();
                        continue;
                    }
                },
            };

            self.skip_insignificant();
            if self.peek() == Some(':') {
                self.advance();
            }
            self.skip_insignificant();

            let value = match self.peek() {
                None | Some(',') | Some('}') | Some(']') => "null".to_string(),
                _ => self.value(),
            };
            members.push(format!("{key}:{value}"));
        }

        self.depth -= 1;
        format!("{{{}}}", members.join(","))
    }

    fn array(&mut self) -> String {
        self.advance();
        if self.enter() {
            return "[]".to_string();
        }

        let mut items = Vec::new();
        loop {
            self.skip_insignificant();
            match self.peek() {
                None => break,
                Some(']') => {
                    self.advance();
                    break;
                }
                Some(',') | Some('}') | Some(':') => {
                    self.advance();
                }
                _ => items.push(self.value()),
            }
        }

        self.depth -= 1;
        format!("[{}]", items.join(","))
    }

    /// Returns true when the depth limit is hit; the rest of the input is dropped.
    fn enter(&mut self) -> bool {
        if self.depth >= MAX_DEPTH {
            self.pos = self.chars.len();
            return true;
        }
        self.depth += 1;
        false
    }

    fn string(&mut self) -> String {
        let open = self.advance().unwrap_or('"');
        let close = closing_quote(open);
        let mut content = String::new();

        while let Some(c) = self.peek() {
            if c == '\\' {
                self.pos += 1;
                self.escape(&mut content);
                continue;
            }
            if c == close && self.is_closing_quote(close) {
                self.pos += 1;
                break;
            }
            content.push(c);
            self.pos += 1;
        }

        Value::String(content).to_string()
    }

    /// Decodes the escape after a backslash. Invalid escapes keep the backslash.
    fn escape(&mut self, content: &mut String) {
        let Some(c) = self.advance() else {
            content.push('\\');
            return;
        };
        match c {
            '"' | '\\' | '/' | '\'' => content.push(c),
            'b' => content.push('\u{8}'),
            'f' => content.push('\u{c}'),
            'n' => content.push('\n'),
            'r' => content.push('\r'),
            't' => content.push('\t'),
            'u' => match self.unicode_escape() {
                Some(decoded) => content.push(decoded),
                None => content.push_str("\\u"),
            },
            other => {
                content.push('\\');
                content.push(other);
            }
        }
    }

    fn hex4(&mut self) -> Option<u32> {
        let digits: String = self.chars.get(self.pos..self.pos + 4)?.iter().collect();
        let code = u32::from_str_radix(&digits, 16).ok()?;
        self.pos += 4;
        Some(code)
    }

    fn unicode_escape(&mut self) -> Option<char> {
        let start = self.pos;
        let high = self.hex4()?;
        if (0xD800..0xDC00).contains(&high) {
            if self.peek() == Some('\\') && self.peek_at(1) == Some('u') {
                self.pos += 2;
                if let Some(low) = self.hex4() {
                    if (0xDC00..0xE000).contains(&low) {
                        return char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00));
                    }
                }
            }
            self.pos = start;
            return None;
        }
        match char::from_u32(high) {
            Some(c) => Some(c),
            None => {
                self.pos = start;
                None
            }
        }
    }

    /// A quote ends the string only when what follows looks like structure:
    /// a delimiter, another quoted token, a line break, or end of input.
    /// Otherwise it is an unescaped quote inside the text. An inner quote
    /// followed by a comma is indistinguishable from a real close, so such a
    /// string is cut short there and the remainder becomes a stray key.
    fn is_closing_quote(&self, close: char) -> bool {
        if close != '"' && close != '\'' {
            return true;
        }
        let mut i = self.pos + 1;
        let mut saw_newline = false;
        while let Some(&c) = self.chars.get(i) {
            if !c.is_whitespace() {
                return saw_newline || matches!(c, ',' | '}' | ']' | ':' | '"');
            }
            saw_newline |= c == '\n' || c == '\r';
            i += 1;
        }
        true
    }

    fn bare_key(&mut self) -> Option<String> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, ':' | ',' | '}' | ']' | '{' | '[' | '\n' | '\r') {
                break;
            }
            self.pos += 1;
        }
        let token: String = self.chars[start..self.pos].iter().collect();
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        Some(Value::String(token.to_string()).to_string())
    }

    fn bare_value(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, ',' | '}' | ']' | '\n' | '\r') {
                break;
            }
            self.pos += 1;
        }
        let token: String = self.chars[start..self.pos].iter().collect();
        literal(token.trim())
    }
}

fn is_open_quote(c: char) -> bool {
    matches!(c, '"' | '\'' | '\u{201C}' | '\u{2018}')
}

fn closing_quote(open: char) -> char {
    match open {
        '\u{201C}' => '\u{201D}',
        '\u{2018}' => '\u{2019}',
        other => other,
    }
}

/// Maps an unquoted token to a JSON literal, number, or string.
fn literal(token: &str) -> String {
    match token {
        "" => return "null".to_string(),
        "true" | "True" | "TRUE" => return "true".to_string(),
        "false" | "False" | "FALSE" => return "false".to_string(),
        "null" | "None" | "NULL" | "undefined" => return "null".to_string(),
        _ => {}
    }
    if serde_json::from_str::<serde_json::Number>(token).is_ok() {
        return token.to_string();
    }
    if let Some(truncated) = token.strip_suffix('.') {
        if serde_json::from_str::<serde_json::Number>(truncated).is_ok() {
            return truncated.to_string();
        }
    }
    Value::String(token.to_string()).to_string()
}
