//! Rewrites shorthand user notation into an unambiguous expression string.
//!
//! People type `2x`, `x(x+1)`, `1,5x` or `x^2`; the parser only understands explicit operators.
//! [`normalize`] inserts the missing multiplications, converts decimal commas, maps the Cyrillic
//! look-alike `х` to the variable `x`, and spells exponentiation as `**`.
//!
//! Normalization works on tokens rather than raw characters, so digits that are part of an
//! identifier (`log10`) never look like numeric literals, and a function name followed by `(` is
//! never mistaken for an implicit multiplication.

use crate::tokenizer::{tokenize_complete, TokenKind};
use crate::VARIABLE;

/// Answers which identifiers mean something, so the normalizer can tell `xpi` (`x*pi`) apart from
/// an unknown name.
pub trait Vocabulary {
    /// Returns true if the name is a callable function, such as `sin`.
    fn is_function(&self, name: &str) -> bool;

    /// Returns true if the name is a constant, such as `pi`.
    fn is_value(&self, name: &str) -> bool;
}

/// A piece of the output, before pieces are joined back into a string.
#[derive(Debug, Clone, PartialEq)]
struct Piece {
    kind: TokenKind,
    text: String,
}

impl Piece {
    fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into() }
    }
}

/// Returns true if the name is the variable or a constant.
fn is_value(vocab: &impl Vocabulary, name: &str) -> bool {
    name == VARIABLE || vocab.is_value(name)
}

/// Returns true if the name has any meaning at all.
fn is_known(vocab: &impl Vocabulary, name: &str) -> bool {
    is_value(vocab, name) || vocab.is_function(name)
}

/// Splits an unknown identifier into known values, optionally ending with a function if the
/// identifier is called. Returns [`None`] if there is no such split.
///
/// Longer names are tried first, so `pie` becomes `pi`, `e` rather than failing on `p`.
fn split_name<'a>(name: &'a str, vocab: &impl Vocabulary, called: bool) -> Option<Vec<&'a str>> {
    if name.is_empty() {
        return Some(Vec::new());
    }

    let ends = name.char_indices()
        .map(|(idx, c)| idx + c.len_utf8())
        .collect::<Vec<_>>();

    for &end in ends.iter().rev() {
        let (head, rest) = name.split_at(end);
        let fits = is_value(vocab, head)
            || (rest.is_empty() && called && vocab.is_function(head));
        if !fits {
            continue;
        }

        if let Some(mut parts) = split_name(rest, vocab, called) {
            parts.insert(0, head);
            return Some(parts);
        }
    }

    None
}

/// Converts the input into pieces, splitting run-together identifiers and spelling `^` as `**`.
fn pieces(input: &str, vocab: &impl Vocabulary) -> Vec<Piece> {
    let tokens = tokenize_complete(input);
    let mut pieces = Vec::with_capacity(tokens.len());

    for (idx, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Caret => pieces.push(Piece::new(TokenKind::Exp, "**")),
            TokenKind::Name if !is_known(vocab, token.lexeme) => {
                let called = tokens.get(idx + 1)
                    .is_some_and(|next| next.kind == TokenKind::OpenParen);
                match split_name(token.lexeme, vocab, called) {
                    Some(parts) => {
                        for (i, part) in parts.into_iter().enumerate() {
                            if i > 0 {
                                pieces.push(Piece::new(TokenKind::Mul, "*"));
                            }
                            pieces.push(Piece::new(TokenKind::Name, part));
                        }
                    },
                    None => pieces.push(Piece::new(token.kind, token.lexeme)),
                }
            },
            kind => pieces.push(Piece::new(kind, token.lexeme)),
        }
    }

    pieces
}

/// How two neighboring significant pieces are joined in the output.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Join {
    /// Keep whatever whitespace was between them.
    Keep,

    /// Drop the whitespace between them.
    Tight,

    /// Drop the whitespace and insert an explicit `*`.
    Mul,
}

/// Decides how to join `prev` and `next`, given the significant piece after `next` (if any) and
/// whether whitespace separated the two.
fn join(
    vocab: &impl Vocabulary,
    before: Option<&Piece>,
    prev: &Piece,
    next: &Piece,
    after: Option<&Piece>,
    spaced: bool,
) -> Join {
    use TokenKind::*;

    match (prev.kind, next.kind) {
        (Int | Float, Name | OpenParen) => Join::Mul,
        (Name, OpenParen) if !spaced && is_value(vocab, &prev.text) => Join::Mul,
        (CloseParen, OpenParen | Int | Float | Name) if !spaced => Join::Mul,
        (Name, Mul | Div) if after.is_some_and(|piece| piece.kind == Name) => Join::Tight,
        (Mul | Div, Name) if before.is_some_and(|piece| piece.kind == Name) => Join::Tight,
        _ => Join::Keep,
    }
}

/// Normalizes a raw user expression.
///
/// The input is trimmed, decimal commas become points, the Cyrillic `х` / `Х` become `x`, implicit
/// multiplications are made explicit with `*`, and `^` becomes `**`. Nothing is rejected here:
/// malformed input passes through for the parser and sandbox to judge.
///
/// Normalization is idempotent: normalizing an already normalized string returns it unchanged.
pub fn normalize(raw: &str, vocab: &impl Vocabulary) -> String {
    let input = raw.trim()
        .chars()
        .map(|c| match c {
            ',' => '.',
            'х' | 'Х' => 'x',
            c => c,
        })
        .collect::<String>();

    let pieces = pieces(&input, vocab);
    let significant = pieces.iter()
        .enumerate()
        .filter(|(_, piece)| piece.kind != TokenKind::Whitespace)
        .map(|(idx, _)| idx)
        .collect::<Vec<_>>();

    let mut out = String::with_capacity(input.len() + 8);
    for (pos, &idx) in significant.iter().enumerate() {
        let prev = &pieces[idx];
        out.push_str(&prev.text);

        let Some(&next_idx) = significant.get(pos + 1) else {
            break;
        };
        let before = pos.checked_sub(1).map(|p| &pieces[significant[p]]);
        let after = significant.get(pos + 2).map(|&i| &pieces[i]);
        let gap = &pieces[idx + 1..next_idx];

        match join(vocab, before, prev, &pieces[next_idx], after, !gap.is_empty()) {
            Join::Keep => gap.iter().for_each(|piece| out.push_str(&piece.text)),
            Join::Tight => (),
            Join::Mul => out.push('*'),
        }
    }

    out
}
