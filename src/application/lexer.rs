//! Statement tokenizer shared by every command dialect

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

// Alternatives are tried left to right; quoted text wins over a frequency pair
// and a frequency pair wins over a plain word or number. A `"` pair inside a
// frequency list is matched separately by QUOTE_PAIR.
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?xs)^(?:
            (?P<space>\s+)
          | "(?P<text>(?:[^"\\]|\\.)*)"
          | (?P<pair>[^\s,]):(?P<freq>\d+)
          | (?P<quote>")
          | (?P<number>[+-]?\d+)
          | (?P<word>[A-Za-z_][A-Za-z0-9_]*)
          | (?P<sym>.)
        )"#,
    )
    .expect("token pattern is valid")
});

// `"` as the symbol of a frequency pair, ending at a list delimiter
static QUOTE_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^":(?P<freq>\d+)(?:[\s,]|$)"#).expect("quote pair pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(String),
    /// Raw digits (with optional sign) so bit strings keep leading zeros
    Number(String),
    Pair(char, u64),
    Text(String),
    Sym(char),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(w) => write!(f, "'{w}'"),
            Token::Number(n) => write!(f, "'{n}'"),
            Token::Pair(c, n) => write!(f, "'{c}:{n}'"),
            Token::Text(t) => write!(f, "\"{t}\""),
            Token::Sym(c) => write!(f, "'{c}'"),
        }
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next @ ('"' | '\\')) => out.push(next),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn parse_frequency(raw: &str) -> Result<u64, String> {
    raw.parse::<u64>()
        .map_err(|_| format!("frequency '{raw}' out of range"))
}

/// A list item starts after `with` or `,`.
fn at_list_item(tokens: &[Token]) -> bool {
    match tokens.last() {
        Some(Token::Sym(',')) => true,
        Some(Token::Word(w)) => w == "with",
        _ => false,
    }
}

/// Break one statement into tokens; the error is a human-readable reason.
pub fn tokenize(statement: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut rest = statement;
    while !rest.is_empty() {
        if at_list_item(&tokens) {
            if let Some(freq) = QUOTE_PAIR.captures(rest).and_then(|c| c.name("freq")) {
                tokens.push(Token::Pair('"', parse_frequency(freq.as_str())?));
                rest = &rest[freq.end()..];
                continue;
            }
        }
        let caps = TOKEN
            .captures(rest)
            .ok_or_else(|| format!("cannot read input at '{rest}'"))?;
        let consumed = caps.get(0).map_or(rest.len(), |m| m.end());

        if caps.name("space").is_some() {
            // skip
        } else if let Some(text) = caps.name("text") {
            tokens.push(Token::Text(unescape(text.as_str())));
        } else if let (Some(pair), Some(freq)) = (caps.name("pair"), caps.name("freq")) {
            let symbol = pair.as_str().chars().next().unwrap_or_default();
            tokens.push(Token::Pair(symbol, parse_frequency(freq.as_str())?));
        } else if caps.name("quote").is_some() {
            return Err("unbalanced quotes".to_string());
        } else if let Some(number) = caps.name("number") {
            tokens.push(Token::Number(number.as_str().to_string()));
        } else if let Some(word) = caps.name("word") {
            tokens.push(Token::Word(word.as_str().to_string()));
        } else if let Some(sym) = caps.name("sym") {
            tokens.push(Token::Sym(sym.as_str().chars().next().unwrap_or_default()));
        }
        rest = &rest[consumed..];
    }
    Ok(tokens)
}
