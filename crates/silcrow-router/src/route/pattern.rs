/// Pattern tokenization
///
/// Pure functional scanning of a route pattern into an ordered list of
/// [`Term`]s. The scanner is permissive: anything the grammar does not
/// recognize becomes literal text, so tokenization never fails.
///
/// # Grammar
///
/// ```text
/// pattern   := (literal | variable)*
/// variable  := "/"? kind name? suffix?
/// kind      := ":" | "*" | "+" | "..."
/// name      := [A-Za-z0-9_]*
/// suffix    := "?" | "&"
/// ```
///
/// At each position the scanner tries, in order:
///
/// 1. **Escape**: `/:` followed by one of `: * + &` (literal `/` plus that character)
/// 2. **Variable**: optional `/`, kind, optional name, optional suffix
/// 3. **Special literal**: `/` followed by a matcher metacharacter or whitespace
/// 4. **Plain literal**: longest run free of `/ : * + . &`
/// 5. **Fallback**: a single character taken literally
use std::fmt;

/// What a variable matches and how its capture is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    /// `:` matches any run of characters except `/`
    StringNoSlash,
    /// `*` matches any run of characters, `/` included
    StringAnySlash,
    /// `+` matches a digit run, coerced to an integer
    Integer,
    /// `...` takes the rest of the path, stored as the remaining path
    Remainder,
}

impl VariableKind {
    /// The DSL prefix that introduces this kind
    pub fn sigil(self) -> &'static str {
        match self {
            VariableKind::StringNoSlash => ":",
            VariableKind::StringAnySlash => "*",
            VariableKind::Integer => "+",
            VariableKind::Remainder => "...",
        }
    }
}

/// How many values a variable takes, set by its trailing marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cardinality {
    /// No marker: exactly one value
    #[default]
    One,
    /// `?`: zero or one value
    Optional,
    /// `&`: zero or more `&`-joined values
    Plural,
}

/// A typed variable inside a pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    pub kind: VariableKind,
    /// Parameter key: the declared name, or the positional key when unnamed
    pub key: String,
    /// Whether `key` came from the pattern rather than the ordinal
    pub named: bool,
    /// Whether the variable token started with `/`
    pub leading_slash: bool,
    pub cardinality: Cardinality,
}

impl Variable {
    pub fn is_plural(&self) -> bool {
        self.cardinality == Cardinality::Plural
    }

    pub fn is_optional(&self) -> bool {
        self.cardinality == Cardinality::Optional
    }

    /// The preceding slash may be absent: only when the value itself may be absent.
    pub fn optional_slash(&self) -> bool {
        self.leading_slash && self.cardinality != Cardinality::One
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.leading_slash {
            f.write_str("/")?;
        }
        f.write_str(self.kind.sigil())?;
        if self.named {
            f.write_str(&self.key)?;
        }
        match self.cardinality {
            Cardinality::One => Ok(()),
            Cardinality::Optional => f.write_str("?"),
            Cardinality::Plural => f.write_str("&"),
        }
    }
}

/// One compiled unit of a pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// Text matched and emitted verbatim
    Literal(String),
    Variable(Variable),
}

impl Term {
    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Term::Variable(variable) => Some(variable),
            Term::Literal(_) => None,
        }
    }
}

/// DSL operators that `/:` can escape
const ESCAPABLE: [char; 4] = [':', '*', '+', '&'];

/// Characters ending a plain literal run
const LITERAL_STOPS: [char; 6] = ['/', ':', '*', '+', '.', '&'];

/// Characters meaningful to the generated matcher
const MATCHER_SPECIAL: [char; 15] = [
    '-', '[', ']', '{', '}', '(', ')', '*', '+', '.', '^', '$', '|', ',', '#',
];

/// Splits a pattern into terms (pure function)
///
/// Unnamed variables receive the zero-based ordinal of the variable among
/// all variables of this one pattern as their key.
///
/// # Examples
///
/// ```
/// use silcrow_router::route::pattern::{tokenize, Term, VariableKind};
///
/// let terms = tokenize("/photos/+photoIds&");
/// assert_eq!(terms.len(), 3);
/// assert_eq!(terms[1], Term::Literal("photos".to_string()));
///
/// let variable = terms[2].as_variable().unwrap();
/// assert_eq!(variable.kind, VariableKind::Integer);
/// assert_eq!(variable.key, "photoIds");
/// assert!(variable.is_plural());
/// assert!(variable.optional_slash());
/// ```
pub fn tokenize(pattern: &str) -> Vec<Term> {
    let mut terms = Vec::new();
    let mut ordinal = 0usize;
    let mut rest = pattern;

    while !rest.is_empty() {
        let (term, consumed) = scan_escape(rest)
            .or_else(|| scan_variable(rest, ordinal))
            .or_else(|| scan_special(rest))
            .or_else(|| scan_plain(rest))
            .unwrap_or_else(|| scan_char(rest));

        if matches!(term, Term::Variable(_)) {
            ordinal += 1;
        }
        terms.push(term);
        rest = &rest[consumed..];
    }

    terms
}

fn scan_escape(input: &str) -> Option<(Term, usize)> {
    let escaped = input.strip_prefix("/:")?.chars().next()?;
    ESCAPABLE
        .contains(&escaped)
        .then(|| (Term::Literal(format!("/{}", escaped)), 3))
}

fn scan_variable(input: &str, ordinal: usize) -> Option<(Term, usize)> {
    let (leading_slash, after_slash) = match input.strip_prefix('/') {
        Some(after) => (true, after),
        None => (false, input),
    };

    let (kind, after_kind) = if let Some(after) = after_slash.strip_prefix("...") {
        (VariableKind::Remainder, after)
    } else if let Some(after) = after_slash.strip_prefix(':') {
        (VariableKind::StringNoSlash, after)
    } else if let Some(after) = after_slash.strip_prefix('*') {
        (VariableKind::StringAnySlash, after)
    } else if let Some(after) = after_slash.strip_prefix('+') {
        (VariableKind::Integer, after)
    } else {
        return None;
    };

    let name_len = after_kind
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(after_kind.len());
    let name = &after_kind[..name_len];
    let after_name = &after_kind[name_len..];

    let (marker, suffix_len) = match after_name.chars().next() {
        Some('?') => (Cardinality::Optional, 1),
        Some('&') => (Cardinality::Plural, 1),
        _ => (Cardinality::One, 0),
    };
    // A remainder always takes the whole tail; a marker on it is consumed and ignored.
    let cardinality = match kind {
        VariableKind::Remainder => Cardinality::One,
        _ => marker,
    };

    let (key, named) = if name.is_empty() {
        (ordinal.to_string(), false)
    } else {
        (name.to_string(), true)
    };

    let consumed = input.len() - after_name.len() + suffix_len;
    let variable = Variable {
        kind,
        key,
        named,
        leading_slash,
        cardinality,
    };
    Some((Term::Variable(variable), consumed))
}

fn scan_special(input: &str) -> Option<(Term, usize)> {
    let special = input.strip_prefix('/')?.chars().next()?;
    (MATCHER_SPECIAL.contains(&special) || special.is_whitespace()).then(|| {
        let consumed = 1 + special.len_utf8();
        (Term::Literal(input[..consumed].to_string()), consumed)
    })
}

fn scan_plain(input: &str) -> Option<(Term, usize)> {
    let len = input.find(LITERAL_STOPS).unwrap_or(input.len());
    (len > 0).then(|| (Term::Literal(input[..len].to_string()), len))
}

fn scan_char(input: &str) -> (Term, usize) {
    let len = input.chars().next().map_or(0, char::len_utf8);
    (Term::Literal(input[..len].to_string()), len)
}
