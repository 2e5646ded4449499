use serde::Serialize;

use super::patterns::{ARITHMETIC_OP, UNCHECKED_OPENER};

/// `unchecked { ... }` region: offset of the keyword and of its closing brace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UncheckedRegion {
    pub start: usize,
    pub end: usize,
}

/// One arithmetic-mutation token in a function body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArithmeticOp {
    pub text: String,
    /// Byte offset relative to the start of the body slice.
    pub offset: usize,
    pub inside_unchecked: bool,
}

/// Locate every unchecked block. The closing brace is found by a brace-balance
/// counter from the opener; an unterminated block runs to the end of the text.
pub fn find_unchecked_regions(body: &str) -> Vec<UncheckedRegion> {
    UNCHECKED_OPENER
        .find_iter(body)
        .map(|m| {
            let mut depth = 0usize;
            let mut end = body.len();
            for (idx, b) in body.bytes().enumerate().skip(m.end() - 1) {
                match b {
                    b'{' => depth += 1,
                    b'}' => {
                        depth = depth.saturating_sub(1);
                        if depth == 0 {
                            end = idx;
                            break;
                        }
                    }
                    _ => {}
                }
            }
            UncheckedRegion {
                start: m.start(),
                end,
            }
        })
        .collect()
}

/// A token is inside an unchecked block when more unchecked openers than
/// unchecked closers precede it.
pub fn is_inside(regions: &[UncheckedRegion], offset: usize) -> bool {
    let openers = regions.iter().filter(|r| r.start < offset).count();
    let closers = regions.iter().filter(|r| r.end < offset).count();
    openers > closers
}

pub fn arithmetic_ops(body: &str, regions: &[UncheckedRegion]) -> Vec<ArithmeticOp> {
    ARITHMETIC_OP
        .find_iter(body)
        .map(|m| ArithmeticOp {
            text: m.as_str().trim().to_string(),
            offset: m.start(),
            inside_unchecked: is_inside(regions, m.start()),
        })
        .collect()
}
