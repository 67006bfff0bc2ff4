//! Helpers over runs of tokens.
//!
//! These operate on captured token slices (call arguments, attribute values, object
//! literals) and classify them as statically resolvable or not.

use crate::core::tokenizer::{Scope, Token};
use crate::error::{ExtractError, Result};

// ============================================================
// Strings
// ============================================================

/// Static value of a token run that is exactly one string literal.
///
/// Wrapping parentheses and type casts (`'a' as Key`, `<Key>'a'`) are ignored.
/// Returns `None` for anything else: identifiers, interpolated templates,
/// concatenations, calls.
pub fn extract_string(tokens: &[Token]) -> Option<String> {
    let tokens = strip_wrappers(tokens);
    let (first, rest) = tokens.split_first()?;
    let (last, body) = rest.split_last()?;

    let closes = match first.scope {
        Scope::StringBegin => Scope::StringEnd,
        Scope::TemplateBegin => Scope::TemplateEnd,
        _ => return None,
    };
    if last.scope != closes {
        return None;
    }

    let mut value = String::new();
    for token in body {
        match token.scope {
            Scope::StringContent | Scope::TemplateContent => value.push_str(&token.text),
            Scope::StringEscape => push_unescaped(&mut value, &token.text),
            _ => return None,
        }
    }
    Some(value)
}

/// Whether the run starts like a string literal (possibly interpolated).
pub fn is_string_like(tokens: &[Token]) -> bool {
    strip_wrappers(tokens)
        .first()
        .is_some_and(|token| matches!(token.scope, Scope::StringBegin | Scope::TemplateBegin))
}

/// Whether the run is exactly one object literal.
pub fn is_object(tokens: &[Token]) -> bool {
    let tokens = strip_wrappers(tokens);
    tokens.first().is_some_and(|token| token.is(Scope::BraceOpen))
        && capture_block(tokens).is_ok_and(|block| block.len() == tokens.len())
}

/// Whether the run is exactly one array literal.
pub fn is_array(tokens: &[Token]) -> bool {
    let tokens = strip_wrappers(tokens);
    tokens.first().is_some_and(|token| token.is(Scope::BracketOpen))
        && capture_block(tokens).is_ok_and(|block| block.len() == tokens.len())
}

/// Remove outer parentheses and type casts until none are left.
fn strip_wrappers(mut tokens: &[Token]) -> &[Token] {
    loop {
        let before = tokens.len();

        // `expr as Type` / `expr satisfies Type`
        if let Some(index) = top_level_position(tokens, |token| {
            token.is(Scope::Keyword) && matches!(token.text.as_str(), "as" | "satisfies")
        }) && index > 0
        {
            tokens = &tokens[..index];
        }

        // `<Type>expr`
        if tokens
            .first()
            .is_some_and(|token| token.is(Scope::Operator) && token.text == "<")
            && let Some(close) = tokens
                .iter()
                .position(|token| token.is(Scope::Operator) && token.text == ">")
        {
            tokens = &tokens[close + 1..];
        }

        // `(expr)`
        if tokens.first().is_some_and(|token| token.is(Scope::ParenOpen))
            && capture_block(tokens).is_ok_and(|block| block.len() == tokens.len())
        {
            tokens = &tokens[1..tokens.len() - 1];
        }

        if tokens.len() == before {
            return tokens;
        }
    }
}

fn push_unescaped(out: &mut String, escape: &str) {
    let Some(body) = escape.strip_prefix('\\') else {
        out.push_str(escape);
        return;
    };

    let decoded = match body {
        "" => None,
        "n" => Some('\n'),
        "r" => Some('\r'),
        "t" => Some('\t'),
        "b" => Some('\u{8}'),
        "f" => Some('\u{c}'),
        "v" => Some('\u{b}'),
        "0" => Some('\0'),
        _ => {
            let hex = body
                .strip_prefix("u{")
                .and_then(|rest| rest.strip_suffix('}'))
                .or_else(|| body.strip_prefix('u').filter(|hex| hex.len() == 4))
                .or_else(|| body.strip_prefix('x').filter(|hex| hex.len() == 2));
            match hex.and_then(|hex| u32::from_str_radix(hex, 16).ok()) {
                Some(code) => char::from_u32(code),
                None => body.chars().next(),
            }
        }
    };

    if let Some(c) = decoded {
        out.push(c);
    }
}

// ============================================================
// Brackets
// ============================================================

/// The run from an opening bracket up to and including its matching closer.
///
/// Fails with `UnterminatedConstruct` when the run ends before the bracket closes.
pub fn capture_block(tokens: &[Token]) -> Result<&[Token]> {
    let Some(first) = tokens.first() else {
        return Err(ExtractError::UnterminatedConstruct { line: 0 });
    };

    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate() {
        if token.scope.is_opener() {
            depth += 1;
        } else if token.scope.is_closer() {
            depth = depth.saturating_sub(1);
        }
        if depth == 0 {
            return Ok(&tokens[..=index]);
        }
    }

    Err(ExtractError::UnterminatedConstruct { line: first.line })
}

/// Split a run on `separator` tokens at bracket depth 0. A trailing empty piece is
/// dropped (`f(a, b,)`).
pub fn split_top_level(tokens: &[Token], separator: Scope) -> Vec<&[Token]> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (index, token) in tokens.iter().enumerate() {
        if token.scope.is_opener() {
            depth += 1;
        } else if token.scope.is_closer() {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && token.scope == separator {
            parts.push(&tokens[start..index]);
            start = index + 1;
        }
    }
    if start < tokens.len() {
        parts.push(&tokens[start..]);
    }
    parts
}

fn top_level_position(tokens: &[Token], predicate: impl Fn(&Token) -> bool) -> Option<usize> {
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate() {
        if token.scope.is_opener() {
            depth += 1;
        } else if token.scope.is_closer() {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && predicate(token) {
            return Some(index);
        }
    }
    None
}

// ============================================================
// Objects
// ============================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKey {
    /// Plain, quoted or statically computed key.
    Static(String),
    /// Computed key that is not a static string (`[name]`).
    Dynamic,
    /// `...rest`
    Spread,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry<'t> {
    pub key: PropertyKey,
    /// Value tokens. For shorthand properties (`{ ns }`) this is the key itself.
    pub value: &'t [Token],
}

impl ObjectEntry<'_> {
    /// Value as written in the source (token texts joined by their original gaps).
    pub fn raw_value(&self) -> String {
        raw_text(self.value)
    }
}

/// Top-level entries of a run that is exactly one object literal, seen through
/// parentheses and type casts.
///
/// Returns `None` when the run is anything else. Nested objects and arrays are kept as
/// raw value runs.
pub fn extract_object(tokens: &[Token]) -> Option<Vec<ObjectEntry<'_>>> {
    let tokens = strip_wrappers(tokens);
    let [open, inner @ .., close] = tokens else {
        return None;
    };
    if !open.is(Scope::BraceOpen)
        || !close.is(Scope::BraceClose)
        || !capture_block(tokens).is_ok_and(|block| block.len() == tokens.len())
    {
        return None;
    }

    let entries = split_top_level(inner, Scope::Comma)
        .into_iter()
        .filter(|part| !part.is_empty())
        .map(object_entry)
        .collect();
    Some(entries)
}

fn object_entry(part: &[Token]) -> ObjectEntry<'_> {
    if part[0].is(Scope::Operator) && part[0].text == "..." {
        return ObjectEntry {
            key: PropertyKey::Spread,
            value: &part[1..],
        };
    }

    let Some(colon) = top_level_position(part, |token| token.is(Scope::Colon)) else {
        // Shorthand `{ ns }` or method `{ ns() { .. } }`
        let key = match part[0].scope {
            Scope::Identifier | Scope::FunctionName | Scope::Keyword | Scope::Constant => {
                PropertyKey::Static(part[0].text.clone())
            }
            _ => PropertyKey::Dynamic,
        };
        return ObjectEntry { key, value: part };
    };

    let key_tokens = &part[..colon];
    let key = match key_tokens {
        [token]
            if matches!(
                token.scope,
                Scope::Identifier
                    | Scope::Keyword
                    | Scope::Constant
                    | Scope::ThisKeyword
                    | Scope::Number
            ) =>
        {
            PropertyKey::Static(token.text.clone())
        }
        [open, inner @ .., close] if open.is(Scope::BracketOpen) && close.is(Scope::BracketClose) => {
            extract_string(inner).map_or(PropertyKey::Dynamic, PropertyKey::Static)
        }
        _ => extract_string(key_tokens).map_or(PropertyKey::Dynamic, PropertyKey::Static),
    };

    ObjectEntry {
        key,
        value: &part[colon + 1..],
    }
}

/// Rebuild source text from tokens, restoring the gaps between them.
pub fn raw_text(tokens: &[Token]) -> String {
    let mut text = String::new();
    let mut previous: Option<&Token> = None;
    for token in tokens {
        if let Some(previous) = previous
            && token.start > previous.end
        {
            if token.line == previous.line {
                text.push_str(&" ".repeat(token.start - previous.end));
            } else {
                text.push(' ');
            }
        }
        text.push_str(&token.text);
        previous = Some(token);
    }
    text
}
