//! Penn Treebank bracketed notation.
//!
//! `(ROOT (S (NP (DT The) (NN dog)) (VP (VBZ runs))))`
//!
//! Atoms are runs of non-space characters other than parentheses, or double
//! quoted strings with backslash escapes (`(DT "The")`). A node without a
//! label is allowed (`( (S ...))`) and gets the empty label.

use crate::errors::ParseError;
use crate::tree::arena::{NodeId, ParseTree, TreeBuilder};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Lexeme {
    Open,
    Close,
    Atom(String),
}

fn malformed(offset: usize, message: impl Into<String>) -> ParseError {
    ParseError::Malformed {
        offset,
        message: message.into(),
    }
}

fn lex(input: &str) -> Result<Vec<(usize, Lexeme)>, ParseError> {
    let mut out = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        match c {
            '(' => {
                chars.next();
                out.push((offset, Lexeme::Open));
            }
            ')' => {
                chars.next();
                out.push((offset, Lexeme::Close));
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            '"' => {
                chars.next();
                let mut atom = String::new();
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    match c {
                        '\\' => match chars.next() {
                            Some((_, escaped)) => atom.push(escaped),
                            None => break,
                        },
                        '"' => {
                            closed = true;
                            break;
                        }
                        other => atom.push(other),
                    }
                }
                if !closed {
                    return Err(malformed(offset, "unterminated quoted atom"));
                }
                out.push((offset, Lexeme::Atom(atom)));
            }
            _ => {
                let mut atom = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c == '(' || c == ')' || c.is_whitespace() {
                        break;
                    }
                    atom.push(c);
                    chars.next();
                }
                out.push((offset, Lexeme::Atom(atom)));
            }
        }
    }

    Ok(out)
}

/// Parse every tree in `input`, in order.
///
/// A bare atom outside any brackets is read as a single-leaf tree.
pub fn parse_many(input: &str) -> Result<Vec<ParseTree>, ParseError> {
    let lexemes = lex(input)?;
    let mut trees = Vec::new();
    let mut builder: Option<TreeBuilder> = None;
    let mut open: Vec<NodeId> = Vec::new();
    let mut i = 0;

    while i < lexemes.len() {
        let (offset, ref lexeme) = lexemes[i];
        i += 1;

        match lexeme {
            Lexeme::Open => {
                let label = match lexemes.get(i) {
                    Some((_, Lexeme::Atom(atom))) => {
                        i += 1;
                        atom.clone()
                    }
                    _ => String::new(),
                };
                let parent = open.last().copied();
                if let (Some(b), Some(parent)) = (builder.as_mut(), parent) {
                    let child = b.push(parent, label);
                    open.push(child);
                } else {
                    let b = TreeBuilder::new(label);
                    open.push(b.root());
                    builder = Some(b);
                }
            }
            Lexeme::Close => {
                if open.pop().is_none() {
                    return Err(malformed(offset, "unbalanced ')'"));
                }
                if open.is_empty() {
                    if let Some(b) = builder.take() {
                        trees.push(b.build());
                    }
                }
            }
            Lexeme::Atom(atom) => match (builder.as_mut(), open.last().copied()) {
                (Some(b), Some(parent)) => {
                    b.push(parent, atom.clone());
                }
                _ => trees.push(ParseTree::leaf(atom.clone())),
            },
        }
    }

    if let Some(&(offset, _)) = lexemes.last().filter(|_| !open.is_empty()) {
        return Err(malformed(
            offset,
            format!("{} unclosed '('", open.len()),
        ));
    }

    Ok(trees)
}

/// Parse exactly one tree.
pub fn parse_one(input: &str) -> Result<ParseTree, ParseError> {
    let mut trees = parse_many(input)?;
    match trees.len() {
        1 => Ok(trees.remove(0)),
        0 => Err(malformed(0, "no tree found")),
        n => Err(malformed(0, format!("expected one tree, found {n}"))),
    }
}

fn needs_quotes(atom: &str) -> bool {
    atom.is_empty()
        || atom
            .chars()
            .any(|c| c == '(' || c == ')' || c == '"' || c == '\\' || c.is_whitespace())
}

fn write_atom(out: &mut String, atom: &str) {
    if !needs_quotes(atom) {
        out.push_str(atom);
        return;
    }
    out.push('"');
    for c in atom.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
}

enum Step {
    Enter(NodeId),
    Exit,
}

/// Render a tree in single-line bracketed notation.
pub fn to_bracketed(tree: &ParseTree) -> String {
    let mut out = String::new();

    if tree.is_leaf(tree.root()) {
        write_atom(&mut out, tree.label(tree.root()));
        return out;
    }

    let mut steps = vec![Step::Enter(tree.root())];
    while let Some(step) = steps.pop() {
        match step {
            Step::Enter(node) => {
                if !out.is_empty() && !out.ends_with('(') {
                    out.push(' ');
                }
                if tree.is_leaf(node) {
                    write_atom(&mut out, tree.label(node));
                    continue;
                }
                out.push('(');
                if !tree.label(node).is_empty() {
                    write_atom(&mut out, tree.label(node));
                }
                steps.push(Step::Exit);
                for &child in tree.children(node).iter().rev() {
                    steps.push(Step::Enter(child));
                }
            }
            Step::Exit => out.push(')'),
        }
    }

    out
}

impl ParseTree {
    /// Parse a single tree from bracketed notation.
    pub fn from_bracketed(input: &str) -> Result<Self, ParseError> {
        parse_one(input)
    }

    /// Single-line bracketed notation.
    pub fn to_bracketed(&self) -> String {
        to_bracketed(self)
    }
}
