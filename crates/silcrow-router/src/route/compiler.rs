/// Matcher generation and capture extraction
///
/// Every term contributes one regex fragment; every variable contributes
/// exactly one capture group, so capture `i + 1` belongs to variable `i`.
use regex::{Regex, RegexBuilder};
use tracing::debug;

use super::pattern::{tokenize, Cardinality, Term, Variable, VariableKind};
use crate::codec::decode_element;
use crate::error::RouterError;
use crate::value::{Navigation, ParamValue, Parameters, Scalar};

/// A pattern compiled for one destination
///
/// Immutable after construction and owned by the [`RouteTable`](crate::RouteTable).
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    destination: String,
    pattern: String,
    terms: Vec<Term>,
    variables: Vec<Variable>,
    matcher: Regex,
}

impl CompiledRoute {
    /// Compiles a full pattern (prefix already applied)
    pub fn compile(
        pattern: &str,
        destination: &str,
        case_insensitive: bool,
    ) -> Result<Self, RouterError> {
        let terms = tokenize(pattern);
        let variables: Vec<Variable> = terms.iter().filter_map(Term::as_variable).cloned().collect();
        let source = matcher_source(&terms);

        let matcher = RegexBuilder::new(&source)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|source| RouterError::Pattern {
                pattern: pattern.to_string(),
                source,
            })?;

        debug!(pattern, destination, matcher = %matcher, "compiled route");

        Ok(Self {
            destination: destination.to_string(),
            pattern: pattern.to_string(),
            terms,
            variables,
            matcher,
        })
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Variables in declaration order
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// The generated, anchored matcher
    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }

    /// Matches a path against this route
    ///
    /// Returns `None` when the path does not match; that is a normal outcome.
    ///
    /// # Examples
    ///
    /// ```
    /// use silcrow_router::route::CompiledRoute;
    /// use silcrow_router::{ParamValue, Scalar};
    ///
    /// let route = CompiledRoute::compile("/photos/+photoIds&", "photos", false).unwrap();
    /// let nav = route.matches("/photos/10&20").unwrap();
    /// assert_eq!(
    ///     nav.param("photoIds"),
    ///     Some(&ParamValue::List(vec![Scalar::Int(10), Scalar::Int(20)]))
    /// );
    /// assert!(route.matches("/videos").is_none());
    /// ```
    pub fn matches(&self, path: &str) -> Option<Navigation> {
        let captures = self.matcher.captures(path)?;
        let mut parameters = Parameters::new();
        let mut remaining_path = None;

        for (index, variable) in self.variables.iter().enumerate() {
            let group = captures.get(index + 1);
            let raw = group.map_or("", |m| m.as_str());

            let value = match variable.kind {
                VariableKind::Remainder => {
                    remaining_path = Some(raw.to_string());
                    continue;
                }
                _ if variable.is_plural() => ParamValue::List(plural_elements(variable, raw)?),
                // An optional value that did not participate stays absent.
                _ if group.is_none() => continue,
                _ => ParamValue::Single(scalar(variable, raw.to_string())?),
            };
            parameters.insert(variable.key.clone(), value);
        }

        Some(Navigation {
            destination: self.destination.clone(),
            parameters,
            remaining_path,
        })
    }
}

/// Plural elements are percent-decoded; an empty capture is an empty list.
fn plural_elements(variable: &Variable, raw: &str) -> Option<Vec<Scalar>> {
    if raw.is_empty() {
        return Some(Vec::new());
    }
    raw.split('&')
        .map(|element| scalar(variable, decode_element(element)))
        .collect()
}

/// Singular values pass through raw; integer kinds are coerced.
fn scalar(variable: &Variable, raw: String) -> Option<Scalar> {
    match variable.kind {
        VariableKind::Integer => match raw.parse::<i64>() {
            Ok(n) => Some(Scalar::Int(n)),
            Err(err) => {
                debug!(key = %variable.key, value = %raw, error = %err, "integer capture out of range");
                None
            }
        },
        _ => Some(Scalar::Str(raw)),
    }
}

/// Builds the anchored matcher source for a term list (pure function)
///
/// # Examples
///
/// ```
/// use silcrow_router::route::{matcher_source, tokenize};
///
/// assert_eq!(
///     matcher_source(&tokenize("/notes/:noteId?")),
///     "^/notes(?:/([^/]*))?$"
/// );
/// ```
pub fn matcher_source(terms: &[Term]) -> String {
    let body: String = terms.iter().map(fragment).collect();
    format!("^{}$", body)
}

fn fragment(term: &Term) -> String {
    match term {
        Term::Literal(text) => regex::escape(text),
        Term::Variable(variable) => variable_fragment(variable),
    }
}

fn variable_fragment(variable: &Variable) -> String {
    let slash = if variable.leading_slash { "/" } else { "" };

    if variable.kind == VariableKind::Remainder {
        return if variable.leading_slash {
            "((?:/.*)?)".to_string()
        } else {
            "(.*)".to_string()
        };
    }

    match variable.cardinality {
        Cardinality::Plural => {
            let element = plural_element(variable.kind);
            format!("(?:{}((?:{e}(?:&{e})*)?))?", slash, e = element)
        }
        Cardinality::Optional => {
            format!("(?:{}({}))?", slash, single_element(variable.kind))
        }
        Cardinality::One if variable.leading_slash => {
            format!("(?:/)({})", single_element(variable.kind))
        }
        Cardinality::One => format!("({})", single_element(variable.kind)),
    }
}

/// String values may be empty, since an empty string is emitted as-is.
fn single_element(kind: VariableKind) -> &'static str {
    match kind {
        VariableKind::Integer => "[0-9]+",
        VariableKind::StringNoSlash => "[^/]*",
        VariableKind::StringAnySlash | VariableKind::Remainder => ".*",
    }
}

fn plural_element(kind: VariableKind) -> &'static str {
    match kind {
        VariableKind::Integer => "[0-9]+",
        VariableKind::StringNoSlash => "[^/&]+",
        VariableKind::StringAnySlash | VariableKind::Remainder => "[^&]+",
    }
}
