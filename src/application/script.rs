//! Script splitting: raw text to ordered statements

/// One statement cut out of a script, with the 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub line: usize,
    pub text: String,
}

fn is_comment(text: &str) -> bool {
    text.starts_with('#') || text.starts_with("//")
}

/// Split `script` on newlines and on `;`, keeping script order.
///
/// Empty pieces and pieces starting with `#` or `//` are dropped. A `;` inside
/// a double-quoted string does not split.
pub fn split_statements(script: &str) -> Vec<Statement> {
    let mut statements = Vec::new();
    for (idx, line) in script.lines().enumerate() {
        for piece in split_line(line) {
            let text = piece.trim();
            if text.is_empty() || is_comment(text) {
                continue;
            }
            statements.push(Statement {
                line: idx + 1,
                text: text.to_string(),
            });
        }
    }
    statements
}

fn split_line(line: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;
    for (pos, c) in line.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                pieces.push(&line[start..pos]);
                start = pos + 1;
            }
            _ => {}
        }
    }
    pieces.push(&line[start..]);
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(script: &str) -> Vec<String> {
        split_statements(script).into_iter().map(|s| s.text).collect()
    }

    #[test]
    fn given_mixed_separators_when_splitting_then_order_preserved() {
        let script = "create stack\npush 1 to stack; push 2 to stack\n\npeek stack";
        assert_eq!(
            texts(script),
            vec![
                "create stack",
                "push 1 to stack",
                "push 2 to stack",
                "peek stack"
            ]
        );
    }

    #[test]
    fn given_comments_when_splitting_then_dropped() {
        let script = "# setup\n  // also a comment\ncreate stack; # trailing\n;;";
        assert_eq!(texts(script), vec!["create stack"]);
    }

    #[test]
    fn given_semicolon_inside_quotes_when_splitting_then_kept() {
        let script = r#"encode "a;b" using huffman; decode 01 using huffman"#;
        assert_eq!(
            texts(script),
            vec![r#"encode "a;b" using huffman"#, "decode 01 using huffman"]
        );
    }

    #[test]
    fn given_multiline_script_when_splitting_then_line_numbers_reported() {
        let statements = split_statements("\n\ncreate stack\n# x\npop from stack");
        assert_eq!(statements[0].line, 3);
        assert_eq!(statements[1].line, 5);
    }
}
