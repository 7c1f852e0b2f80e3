//! Line tokenization for evaluation text

/// Splits one line of raw text into character-unit tokens
pub trait TextReader: Send + Sync {
    fn read_characters(&self, line: &str) -> Vec<String>;
}

/// One token per character. Combining marks stay with their base character and
/// a backslash escapes the character that follows it.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicTextReader;

impl TextReader for BasicTextReader {
    fn read_characters(&self, line: &str) -> Vec<String> {
        let mut tokens: Vec<String> = Vec::new();
        let mut chars = line.chars();

        while let Some(c) = chars.next() {
            if c == '\\' {
                let mut token = String::from(c);
                if let Some(escaped) = chars.next() {
                    token.push(escaped);
                }
                tokens.push(token);
            } else if is_combining_mark(c) {
                match tokens.last_mut() {
                    Some(last) => last.push(c),
                    None => tokens.push(c.to_string()),
                }
            } else {
                tokens.push(c.to_string());
            }
        }

        tokens
    }
}

fn is_combining_mark(c: char) -> bool {
    matches!(
        c,
        '\u{0300}'..='\u{036F}'
            | '\u{1AB0}'..='\u{1AFF}'
            | '\u{1DC0}'..='\u{1DFF}'
            | '\u{20D0}'..='\u{20FF}'
            | '\u{FE20}'..='\u{FE2F}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(line: &str) -> Vec<String> {
        BasicTextReader.read_characters(line)
    }

    #[test]
    fn test_plain_characters() {
        assert_eq!(read("ab c"), vec!["a", "b", " ", "c"]);
    }

    #[test]
    fn test_combining_mark_joins_base() {
        assert_eq!(read("e\u{0301}t"), vec!["e\u{0301}", "t"]);
    }

    #[test]
    fn test_backslash_escape() {
        assert_eq!(read("a\\'b"), vec!["a", "\\'", "b"]);
        assert_eq!(read("x\\"), vec!["x", "\\"]);
    }

    #[test]
    fn test_empty_line() {
        assert!(read("").is_empty());
    }
}
