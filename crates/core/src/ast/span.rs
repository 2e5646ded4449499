use serde::Serialize;

/// Byte range of a node in its source file, parsed from solc's `start:length:fileIndex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceSpan {
    pub start: usize,
    pub length: usize,
    /// `None` when solc reports `-1` (compiler-generated source).
    pub file_index: Option<u32>,
}

impl SourceSpan {
    pub fn new(start: usize, length: usize) -> Self {
        Self {
            start,
            length,
            file_index: Some(0),
        }
    }

    /// Parse a `src` attribute. Returns `None` for missing or malformed values.
    pub fn parse(src: &str) -> Option<Self> {
        let mut parts = src.split(':');
        let start = parts.next()?.trim().parse::<usize>().ok()?;
        let length = parts.next()?.trim().parse::<usize>().ok()?;
        let file_index = match parts.next() {
            Some(raw) => raw.trim().parse::<i64>().ok()?.try_into().ok(),
            None => None,
        };
        Some(Self {
            start,
            length,
            file_index,
        })
    }

    pub fn from_src(src: Option<&str>) -> Option<Self> {
        src.and_then(Self::parse)
    }

    pub fn end(&self) -> usize {
        self.start.saturating_add(self.length)
    }

    /// Slice the spanned text out of `source`. `None` when the span does not land
    /// on character boundaries inside the text.
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.end())
    }
}

/// 1-based line and column of a byte offset. Columns count characters.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
    let column = before[line_start..].trim_end_matches('\r').chars().count() + 1;
    (line, column)
}

/// Trimmed text of a 1-based line.
pub fn line_text(source: &str, line: usize) -> &str {
    source
        .lines()
        .nth(line.saturating_sub(1))
        .map_or("", str::trim)
}
