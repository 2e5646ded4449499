/// Replace comment bytes with spaces, keeping newlines and byte offsets intact.
/// String literals are skipped so `"http://..."` is not mistaken for a comment.
pub fn mask_comments(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = bytes.to_vec();
    let mut i = 0;
    let mut quote: Option<u8> = None;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q || b == b'\n' {
                quote = None;
            }
            i += 1;
            continue;
        }
        match (b, bytes.get(i + 1)) {
            (b'"' | b'\'', _) => {
                quote = Some(b);
                i += 1;
            }
            (b'/', Some(b'/')) => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    out[i] = b' ';
                    i += 1;
                }
            }
            (b'/', Some(b'*')) => {
                let mut closed = false;
                while i < bytes.len() {
                    if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
                        out[i] = b' ';
                        out[i + 1] = b' ';
                        i += 2;
                        closed = true;
                        break;
                    }
                    if bytes[i] != b'\n' {
                        out[i] = b' ';
                    }
                    i += 1;
                }
                if !closed {
                    break;
                }
            }
            _ => i += 1,
        }
    }

    String::from_utf8(out).unwrap_or_else(|_| text.to_string())
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Byte offsets of every whole-word occurrence of `word`.
pub fn word_offsets(text: &str, word: &str) -> Vec<usize> {
    if word.is_empty() {
        return Vec::new();
    }
    let bytes = text.as_bytes();
    text.match_indices(word)
        .map(|(idx, _)| idx)
        .filter(|&idx| {
            let before_ok = idx == 0 || !is_ident_byte(bytes[idx - 1]);
            let end = idx + word.len();
            let after_ok = end >= bytes.len() || !is_ident_byte(bytes[end]);
            before_ok && after_ok
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_line_and_block_comments() {
        let src = "a = 1; // owner = x\n/* b++ */ c--;";
        let masked = mask_comments(src);
        assert_eq!(masked.len(), src.len());
        assert!(!masked.contains("owner"));
        assert!(!masked.contains("b++"));
        assert!(masked.contains("c--"));
        assert_eq!(masked.find("c--"), src.find("c--"));
    }

    #[test]
    fn test_mask_keeps_string_literals() {
        let src = r#"string u = "http://x"; // gone"#;
        let masked = mask_comments(src);
        assert!(masked.contains("\"http://x\""));
        assert!(!masked.contains("gone"));
    }

    #[test]
    fn test_mask_multibyte_comment() {
        let src = "x = 1; // привет\ny = 2;";
        let masked = mask_comments(src);
        assert_eq!(masked.len(), src.len());
        assert!(masked.contains("y = 2;"));
    }

    #[test]
    fn test_word_offsets() {
        let text = "amount + amountOut - _amount + amount";
        assert_eq!(word_offsets(text, "amount"), vec![0, 31]);
        assert_eq!(word_offsets(text, "_amount"), vec![21]);
        assert!(word_offsets(text, "Out").is_empty());
        assert!(word_offsets(text, "").is_empty());
    }
}
