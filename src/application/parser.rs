//! Command parser
//!
//! One tokenizer feeds a small dispatch table. Three surface forms are
//! accepted and all reduce to the same [`Command`]:
//!
//! - bare keywords: `insert 6 at 0,1 in binarytree`
//! - dot-prefixed tree commands: `tree.bst.insert 35`
//! - the unprefixed build form: `build huffman with a:5,b:9`
//!
//! The parser only checks spelling and shape. Whether a structure exists or
//! accepts a verb is decided later, against the registry.

use std::str::FromStr;

use tracing::trace;

use crate::application::command::{BuildInput, ClearScope, Command, Locator, Lookup, Verb};
use crate::application::error::ParseError;
use crate::application::lexer::{tokenize, Token};
use crate::domain::{Direction, Domain, StructureKind, TraverseKind, TreePath};

type Reason = String;

const BARE_VERBS: &[(&str, Verb)] = &[
    ("create", Verb::Create),
    ("insert", Verb::Insert),
    ("delete", Verb::Delete),
    ("get", Verb::Get),
    ("push", Verb::Push),
    ("pop", Verb::Pop),
    ("peek", Verb::Peek),
    ("search", Verb::Search),
    ("traverse", Verb::Traverse),
    ("build", Verb::Build),
    ("encode", Verb::Encode),
    ("decode", Verb::Decode),
    ("clear", Verb::Clear),
    ("use", Verb::Use),
];

const DOTTED_VERBS: &[(&str, Verb)] = &[
    ("create", Verb::Create),
    ("insert", Verb::Insert),
    ("delete", Verb::Delete),
    ("remove", Verb::Delete),
    ("search", Verb::Search),
    ("traverse", Verb::Traverse),
    ("clear", Verb::Clear),
];

fn lookup_verb(table: &[(&str, Verb)], word: &str) -> Option<Verb> {
    table.iter().find(|(w, _)| *w == word).map(|(_, v)| *v)
}

/// Parse one statement into a [`Command`].
pub fn parse_statement(statement: &str) -> Result<Command, ParseError> {
    let statement = statement.trim();
    let command = parse_tokens(statement).map_err(|reason| ParseError::new(statement, reason))?;
    trace!(%command, "parsed");
    Ok(command)
}

fn parse_tokens(statement: &str) -> Result<Command, Reason> {
    let mut cur = Cursor::new(tokenize(statement)?);
    let command = match cur.next() {
        None => return Err("empty statement".to_string()),
        Some(Token::Word(w)) if w == "tree" && cur.peek_sym('.') => parse_dotted(&mut cur)?,
        Some(Token::Word(w)) => {
            let verb = lookup_verb(BARE_VERBS, &w).ok_or_else(|| format!("unknown command '{w}'"))?;
            parse_bare(verb, &mut cur)?
        }
        Some(other) => return Err(format!("expected a command keyword, found {other}")),
    };
    cur.finish()?;
    Ok(command)
}

struct Cursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl Cursor {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek_sym(&self, c: char) -> bool {
        matches!(self.peek(), Some(Token::Sym(s)) if *s == c)
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Word(w)) if w == keyword)
    }

    fn peek_number(&self) -> bool {
        matches!(self.peek(), Some(Token::Number(_)))
    }

    fn eat_sym(&mut self, c: char) -> bool {
        let hit = self.peek_sym(c);
        if hit {
            self.pos += 1;
        }
        hit
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let hit = self.peek_keyword(keyword);
        if hit {
            self.pos += 1;
        }
        hit
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), Reason> {
        match self.next() {
            Some(Token::Word(w)) if w == keyword => Ok(()),
            Some(other) => Err(format!("expected '{keyword}', found {other}")),
            None => Err(format!("missing '{keyword}'")),
        }
    }

    fn expect_sym(&mut self, c: char) -> Result<(), Reason> {
        match self.next() {
            Some(Token::Sym(s)) if s == c => Ok(()),
            Some(other) => Err(format!("expected '{c}', found {other}")),
            None => Err(format!("missing '{c}'")),
        }
    }

    fn word(&mut self, what: &str) -> Result<String, Reason> {
        match self.next() {
            Some(Token::Word(w)) => Ok(w),
            Some(other) => Err(format!("expected {what}, found {other}")),
            None => Err(format!("missing {what}")),
        }
    }

    fn int(&mut self) -> Result<i64, Reason> {
        match self.next() {
            Some(Token::Number(n)) => n
                .parse::<i64>()
                .map_err(|_| format!("integer '{n}' out of range")),
            Some(other) => Err(format!("expected an integer, found {other}")),
            None => Err("missing integer".to_string()),
        }
    }

    fn position(&mut self) -> Result<usize, Reason> {
        let value = self.int()?;
        usize::try_from(value).map_err(|_| format!("position {value} must not be negative"))
    }

    /// `INT(,INT)*`
    fn int_list(&mut self) -> Result<Vec<i64>, Reason> {
        let mut values = vec![self.int()?];
        while self.eat_sym(',') {
            values.push(self.int()?);
        }
        Ok(values)
    }

    /// Bare-form structure keyword.
    fn structure(&mut self) -> Result<StructureKind, Reason> {
        let name = self.word("a structure name")?;
        StructureKind::from_name(&name).ok_or_else(|| format!("unknown structure '{name}'"))
    }

    fn finish(&self) -> Result<(), Reason> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(format!("unexpected {token}")),
        }
    }
}

/// Interpret the integers after `at` for the structure they address.
fn locator(kind: StructureKind, raw: Vec<i64>) -> Result<Locator, Reason> {
    match kind.domain() {
        Domain::Linear => match raw.as_slice() {
            [p] => usize::try_from(*p)
                .map(Locator::Position)
                .map_err(|_| format!("position {p} must not be negative")),
            _ => Err(format!("{kind} takes a single position, not a path")),
        },
        Domain::Tree => raw
            .iter()
            .map(|&bit| {
                u8::try_from(bit)
                    .ok()
                    .and_then(Direction::from_bit)
                    .ok_or_else(|| format!("path step {bit} is not 0 or 1"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|steps| Locator::Path(TreePath::new(steps))),
    }
}

fn parse_bare(verb: Verb, cur: &mut Cursor) -> Result<Command, Reason> {
    match verb {
        Verb::Create => {
            let kind = cur.structure()?;
            create_args(kind, cur)
        }
        Verb::Insert => {
            let value = cur.int()?;
            let raw = if cur.eat_keyword("at") {
                Some(cur.int_list()?)
            } else {
                None
            };
            cur.expect_keyword("in")?;
            let kind = cur.structure()?;
            let at = raw.map(|r| locator(kind, r)).transpose()?;
            Ok(Command::Insert { kind, value, at })
        }
        Verb::Delete => {
            // position form first when `at` follows the verb directly
            if cur.eat_keyword("at") {
                let raw = cur.int_list()?;
                cur.expect_keyword("from")?;
                let kind = cur.structure()?;
                return Ok(Command::Delete {
                    kind,
                    value: None,
                    at: Some(locator(kind, raw)?),
                });
            }
            let value = cur.int()?;
            let raw = if cur.eat_keyword("at") {
                Some(cur.int_list()?)
            } else {
                None
            };
            cur.expect_keyword("from")?;
            let kind = cur.structure()?;
            let at = raw.map(|r| locator(kind, r)).transpose()?;
            Ok(Command::Delete {
                kind,
                value: Some(value),
                at,
            })
        }
        Verb::Get => {
            let lookup = if cur.eat_keyword("at") {
                Lookup::Position(cur.position()?)
            } else {
                Lookup::Value(cur.int()?)
            };
            cur.expect_keyword("from")?;
            let kind = cur.structure()?;
            Ok(Command::Get { kind, lookup })
        }
        Verb::Push => {
            let value = cur.int()?;
            cur.expect_keyword("to")?;
            let kind = cur.structure()?;
            Ok(Command::Push { kind, value })
        }
        Verb::Pop => {
            cur.eat_keyword("from");
            let kind = cur.structure()?;
            Ok(Command::Pop { kind })
        }
        Verb::Peek => {
            let kind = cur.structure()?;
            Ok(Command::Peek { kind })
        }
        Verb::Search => {
            let value = cur.int()?;
            cur.expect_keyword("in")?;
            let kind = cur.structure()?;
            Ok(Command::Search { kind, value })
        }
        Verb::Traverse => {
            let order = traverse_order(cur)?;
            let kind = if cur.eat_keyword("in") {
                cur.structure()?
            } else {
                StructureKind::BinaryTree
            };
            Ok(Command::Traverse { kind, order })
        }
        Verb::Build => {
            let kind = cur.structure()?;
            cur.expect_keyword("with")?;
            let input = build_input(kind, cur)?;
            Ok(Command::Build { kind, input })
        }
        Verb::Encode => {
            let text = match cur.next() {
                Some(Token::Text(t)) => t,
                Some(other) => return Err(format!("expected quoted text, found {other}")),
                None => return Err("missing quoted text".to_string()),
            };
            cur.expect_keyword("using")?;
            let kind = cur.structure()?;
            Ok(Command::Encode { kind, text })
        }
        Verb::Decode => {
            let bits = match cur.next() {
                Some(Token::Number(n)) if n.chars().all(|c| c.is_ascii_digit()) => n,
                Some(other) => return Err(format!("expected a bit string, found {other}")),
                None => return Err("missing bit string".to_string()),
            };
            cur.expect_keyword("using")?;
            let kind = cur.structure()?;
            Ok(Command::Decode { kind, bits })
        }
        Verb::Clear => {
            let scope = if cur.peek().is_some() {
                ClearScope::Structure(cur.structure()?)
            } else {
                ClearScope::Global
            };
            Ok(Command::Clear { scope })
        }
        Verb::Use => {
            let name = cur.word("'linear' or 'tree'")?;
            let domain = Domain::from_str(&name)?;
            Ok(Command::Use { domain })
        }
    }
}

/// `tree.STRUCT.VERB ARGS`; the leading `tree` is already consumed.
fn parse_dotted(cur: &mut Cursor) -> Result<Command, Reason> {
    cur.expect_sym('.')?;
    let name = cur.word("a tree structure name")?;
    let kind = StructureKind::from_dotted_name(&name)
        .ok_or_else(|| format!("unknown tree structure '{name}'"))?;
    cur.expect_sym('.')?;
    let verb_word = cur.word("a verb")?;
    let verb = lookup_verb(DOTTED_VERBS, &verb_word)
        .ok_or_else(|| format!("'{verb_word}' is not available in tree.{name} form"))?;

    match verb {
        Verb::Create => create_args(kind, cur),
        Verb::Insert => {
            let value = cur.int()?;
            let at = if cur.eat_keyword("at") {
                Some(locator(kind, cur.int_list()?)?)
            } else {
                None
            };
            Ok(Command::Insert { kind, value, at })
        }
        Verb::Delete => {
            let value = if cur.peek_keyword("at") {
                None
            } else {
                Some(cur.int()?)
            };
            let at = if cur.eat_keyword("at") {
                Some(locator(kind, cur.int_list()?)?)
            } else {
                None
            };
            Ok(Command::Delete { kind, value, at })
        }
        Verb::Search => Ok(Command::Search {
            kind,
            value: cur.int()?,
        }),
        Verb::Traverse => {
            if kind != StructureKind::BinaryTree {
                return Err(format!("traverse is only available as tree.binary_tree, not tree.{name}"));
            }
            Ok(Command::Traverse {
                kind,
                order: traverse_order(cur)?,
            })
        }
        Verb::Clear => Ok(Command::Clear {
            scope: ClearScope::Structure(kind),
        }),
        other => Err(format!("'{other}' is not available in tree.{name} form")),
    }
}

/// `[with] INT(,INT)* [size INT]`, all parts optional
fn create_args(kind: StructureKind, cur: &mut Cursor) -> Result<Command, Reason> {
    let values = if cur.eat_keyword("with") || cur.peek_number() {
        cur.int_list()?
    } else {
        Vec::new()
    };
    let capacity = if cur.eat_keyword("size") {
        Some(cur.position()?)
    } else {
        None
    };
    if kind == StructureKind::Huffman && !values.is_empty() {
        return Err("huffman trees are built from frequencies: use 'build huffman with c:n,...'".to_string());
    }
    if capacity.is_some() && kind.domain() == Domain::Tree {
        return Err(format!("size applies to linear structures, not {kind}"));
    }
    Ok(Command::Create {
        kind,
        values,
        capacity,
    })
}

fn traverse_order(cur: &mut Cursor) -> Result<TraverseKind, Reason> {
    let word = cur.word("a traversal order")?;
    TraverseKind::from_str(&word)
}

/// `INT(,INT)*` for search trees, `CHAR:INT(,CHAR:INT)*` for huffman.
fn build_input(kind: StructureKind, cur: &mut Cursor) -> Result<BuildInput, Reason> {
    if kind == StructureKind::Huffman {
        let mut pairs = Vec::new();
        loop {
            match cur.next() {
                Some(Token::Pair(c, n)) => pairs.push((c, n)),
                Some(other) => return Err(format!("expected char:frequency, found {other}")),
                None => return Err("missing char:frequency".to_string()),
            }
            if !cur.eat_sym(',') {
                break;
            }
        }
        return Ok(BuildInput::Frequencies(pairs));
    }
    if matches!(cur.peek(), Some(Token::Pair(..))) {
        return Err(format!("{kind} is built from integers, not char:frequency pairs"));
    }
    Ok(BuildInput::Values(cur.int_list()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn path(bits: &[u8]) -> Option<Locator> {
        Some(Locator::Path(TreePath::from_bits(bits).unwrap()))
    }

    #[rstest]
    #[case(
        "create arraylist with 1,2,3 size 10",
        Command::Create { kind: StructureKind::ArrayList, values: vec![1, 2, 3], capacity: Some(10) }
    )]
    #[case(
        "insert 100 at 0 in arraylist",
        Command::Insert { kind: StructureKind::ArrayList, value: 100, at: Some(Locator::Position(0)) }
    )]
    #[case(
        "insert 7 in linkedlist",
        Command::Insert { kind: StructureKind::LinkedList, value: 7, at: None }
    )]
    #[case(
        "insert 6 at 0,1 in binarytree",
        Command::Insert { kind: StructureKind::BinaryTree, value: 6, at: path(&[0, 1]) }
    )]
    #[case(
        "delete at 1 from linkedlist",
        Command::Delete { kind: StructureKind::LinkedList, value: None, at: Some(Locator::Position(1)) }
    )]
    #[case(
        "delete 6 at 0,1 from binarytree",
        Command::Delete { kind: StructureKind::BinaryTree, value: Some(6), at: path(&[0, 1]) }
    )]
    #[case(
        "delete -3 from arraylist",
        Command::Delete { kind: StructureKind::ArrayList, value: Some(-3), at: None }
    )]
    #[case("get at 0 from arraylist", Command::Get { kind: StructureKind::ArrayList, lookup: Lookup::Position(0) })]
    #[case("get 3 from arraylist", Command::Get { kind: StructureKind::ArrayList, lookup: Lookup::Value(3) })]
    #[case("push 10 to stack", Command::Push { kind: StructureKind::Stack, value: 10 })]
    #[case("pop from stack", Command::Pop { kind: StructureKind::Stack })]
    #[case("peek stack", Command::Peek { kind: StructureKind::Stack })]
    #[case("search 7 in bst", Command::Search { kind: StructureKind::Bst, value: 7 })]
    #[case(
        "traverse inorder",
        Command::Traverse { kind: StructureKind::BinaryTree, order: TraverseKind::Inorder }
    )]
    #[case(
        "build avl with 30,20,40",
        Command::Build { kind: StructureKind::Avl, input: BuildInput::Values(vec![30, 20, 40]) }
    )]
    #[case(
        "build huffman with a:5,b:2,c:1",
        Command::Build { kind: StructureKind::Huffman, input: BuildInput::Frequencies(vec![('a', 5), ('b', 2), ('c', 1)]) }
    )]
    #[case(
        r#"encode "abac" using huffman"#,
        Command::Encode { kind: StructureKind::Huffman, text: "abac".into() }
    )]
    #[case(
        "decode 0101 using huffman",
        Command::Decode { kind: StructureKind::Huffman, bits: "0101".into() }
    )]
    #[case("clear", Command::Clear { scope: ClearScope::Global })]
    #[case("clear stack", Command::Clear { scope: ClearScope::Structure(StructureKind::Stack) })]
    #[case("use tree", Command::Use { domain: Domain::Tree })]
    fn given_bare_statement_when_parsing_then_canonical_command(
        #[case] input: &str,
        #[case] expected: Command,
    ) {
        assert_eq!(parse_statement(input), Ok(expected));
    }

    #[rstest]
    #[case(
        "tree.binary_tree.create 10,5,15",
        Command::Create { kind: StructureKind::BinaryTree, values: vec![10, 5, 15], capacity: None }
    )]
    #[case(
        "tree.binary_tree.insert 6 at 0,1",
        Command::Insert { kind: StructureKind::BinaryTree, value: 6, at: path(&[0, 1]) }
    )]
    #[case(
        "tree.binary_tree.traverse levelorder",
        Command::Traverse { kind: StructureKind::BinaryTree, order: TraverseKind::Levelorder }
    )]
    #[case("tree.bst.insert 35", Command::Insert { kind: StructureKind::Bst, value: 35, at: None })]
    #[case("tree.bst.remove 30", Command::Delete { kind: StructureKind::Bst, value: Some(30), at: None })]
    #[case("tree.avl.search 40", Command::Search { kind: StructureKind::Avl, value: 40 })]
    #[case(
        "tree.huffman.clear",
        Command::Clear { scope: ClearScope::Structure(StructureKind::Huffman) }
    )]
    fn given_dotted_statement_when_parsing_then_same_command_as_bare_form(
        #[case] input: &str,
        #[case] expected: Command,
    ) {
        assert_eq!(parse_statement(input), Ok(expected));
    }

    #[rstest]
    #[case("", "empty statement")]
    #[case("frobnicate 3", "unknown command")]
    #[case("create array_list", "unknown structure")]
    #[case("insert 1 at 0,1 in arraylist", "single position")]
    #[case("insert 1 at 0,2 in binarytree", "not 0 or 1")]
    #[case("get at -1 from arraylist", "must not be negative")]
    #[case("insert x in stack", "expected an integer")]
    #[case("push 1 stack", "expected 'to'")]
    #[case("tree.bst.traverse inorder", "only available")]
    #[case("tree.arraylist.create", "unknown tree structure")]
    #[case("tree.bst.build 1,2", "not available")]
    #[case("build huffman with 1,2", "char:frequency")]
    #[case("build bst with a:1", "built from integers")]
    #[case("create huffman with 1,2", "frequencies")]
    #[case("create bst size 4", "size applies")]
    #[case(r#"encode "abc using huffman"#, "unbalanced quotes")]
    #[case("decode 01x using huffman", "expected 'using'")]
    #[case("peek stack now", "unexpected")]
    #[case("traverse sideways", "unknown traversal")]
    fn given_malformed_statement_when_parsing_then_parse_error_with_reason(
        #[case] input: &str,
        #[case] fragment: &str,
    ) {
        let err = parse_statement(input).unwrap_err();
        assert_eq!(err.statement, input.trim());
        assert!(
            err.reason.contains(fragment),
            "reason '{}' should mention '{}'",
            err.reason,
            fragment
        );
    }

    #[test]
    fn given_canonical_text_when_reparsing_then_same_command() {
        for input in [
            "tree.binary_tree.insert 6 at 0,1",
            "create arraylist with 1,2,3 size 10",
            r#"encode "a \"q\"" using huffman"#,
            "build huffman with a:5,b:9",
            "tree.bst.remove 3",
        ] {
            let command = parse_statement(input).unwrap();
            assert_eq!(parse_statement(&command.to_string()), Ok(command));
        }
    }
}
