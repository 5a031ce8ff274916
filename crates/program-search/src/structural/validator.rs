//! Static validity checks for candidate source

/// Contract for rejecting corrupt transitions before they are scored
pub trait ValidityCheck: Send + Sync {
    /// Returns `(true, None)` for acceptable source, otherwise `false` and
    /// a reason
    fn is_valid(&self, source: &str) -> (bool, Option<String>);
}

const BLOCK_KEYWORDS: [&str; 12] = [
    "def", "async", "class", "if", "elif", "else", "for", "while", "try", "except", "finally",
    "with",
];

/// Interpreter-free syntax check for generated Python-like source.
///
/// Tracks string literals (including triple-quoted ones) and bracket depth
/// across the whole text, then checks block structure on every logical
/// line: headers end in `:`, a header is followed by a deeper-indented
/// body, and indentation only grows after a header.
#[derive(Debug, Clone, Default)]
pub struct SyntaxValidator;

impl SyntaxValidator {
    /// Create new validator
    pub fn new() -> Self {
        Self
    }

    fn check(&self, source: &str) -> Result<(), String> {
        let mut scanner = Scanner::default();
        let mut expect_body: Option<(usize, usize)> = None;
        let mut previous_indent = 0;
        let mut previous_was_header = false;
        let mut saw_code = false;

        for (index, line) in source.lines().enumerate() {
            let number = index + 1;
            let logical = scanner.at_line_start();
            let code_end = scanner.scan_line(line, number)?;

            if !logical {
                continue;
            }

            let code = line[..code_end].trim_end();
            let trimmed = code.trim_start();
            if trimmed.is_empty() {
                continue;
            }
            saw_code = true;

            let indent = code.len() - trimmed.len();
            if let Some((header_indent, header_line)) = expect_body.take() {
                if indent <= header_indent {
                    return Err(format!(
                        "expected an indented block after line {}",
                        header_line
                    ));
                }
            } else if indent > previous_indent && !previous_was_header {
                return Err(format!("unexpected indent on line {}", number));
            }

            previous_was_header = false;
            if is_block_header(trimmed) {
                if trimmed.ends_with(':') {
                    expect_body = Some((indent, number));
                    previous_was_header = true;
                } else if !trimmed.contains(':') {
                    return Err(format!("missing ':' after block header on line {}", number));
                }
            }
            previous_indent = indent;
        }

        scanner.finish()?;
        if let Some((_, header_line)) = expect_body {
            return Err(format!(
                "expected an indented block after line {}",
                header_line
            ));
        }
        if !saw_code {
            return Err("source contains no statements".to_string());
        }
        Ok(())
    }
}

impl ValidityCheck for SyntaxValidator {
    fn is_valid(&self, source: &str) -> (bool, Option<String>) {
        match self.check(source) {
            Ok(()) => (true, None),
            Err(reason) => (false, Some(reason)),
        }
    }
}

fn is_block_header(code: &str) -> bool {
    BLOCK_KEYWORDS.iter().any(|keyword| {
        code.strip_prefix(keyword)
            .map(|rest| rest.is_empty() || rest.starts_with([' ', ':', '(']))
            .unwrap_or(false)
    })
}

#[derive(Debug, Clone, Copy)]
struct OpenString {
    quote: char,
    triple: bool,
}

#[derive(Debug, Default)]
struct Scanner {
    string: Option<OpenString>,
    depth: usize,
    opened_on: usize,
}

impl Scanner {
    /// A line starts a logical line when no string or bracket spans into it
    fn at_line_start(&self) -> bool {
        self.string.is_none() && self.depth == 0
    }

    /// Scan one physical line; returns the byte offset where code ends
    /// (start of a trailing comment, or the line length)
    fn scan_line(&mut self, line: &str, number: usize) -> Result<usize, String> {
        let bytes = line.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            let ch = bytes[i] as char;
            if let Some(open) = self.string {
                if ch == '\\' {
                    i += 2;
                    continue;
                }
                if ch == open.quote {
                    if !open.triple {
                        self.string = None;
                    } else if line[i..].starts_with(&open.quote.to_string().repeat(3)) {
                        self.string = None;
                        i += 3;
                        continue;
                    }
                }
                i += 1;
                continue;
            }

            match ch {
                '#' => return Ok(i),
                '"' | '\'' => {
                    let triple = line[i..].starts_with(&ch.to_string().repeat(3));
                    self.string = Some(OpenString { quote: ch, triple });
                    self.opened_on = number;
                    i += if triple { 3 } else { 1 };
                    continue;
                }
                '(' | '[' | '{' => {
                    if self.depth == 0 {
                        self.opened_on = number;
                    }
                    self.depth += 1;
                }
                ')' | ']' | '}' => {
                    if self.depth == 0 {
                        return Err(format!("unmatched '{}' on line {}", ch, number));
                    }
                    self.depth -= 1;
                }
                _ => {}
            }
            i += 1;
        }

        if let Some(open) = self.string {
            if !open.triple {
                return Err(format!("unterminated string literal on line {}", number));
            }
        }
        Ok(line.len())
    }

    fn finish(&self) -> Result<(), String> {
        if self.string.is_some() {
            return Err(format!(
                "unterminated triple-quoted string starting on line {}",
                self.opened_on
            ));
        }
        if self.depth > 0 {
            return Err(format!("unclosed bracket opened on line {}", self.opened_on));
        }
        Ok(())
    }
}
