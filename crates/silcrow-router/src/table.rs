/// Route table: parse priority and generation lookup
///
/// Two immutable indices are built once at construction:
/// - `routes`: every compiled route in declaration order (parse priority)
/// - `by_destination`: destination → route indices in registration order
///
/// The table is never mutated afterwards, so one `Arc<RouteTable>` can back
/// any number of live links.
use std::collections::HashMap;
use tracing::{debug, trace};

use crate::error::RouterError;
use crate::route::{CompiledRoute, Term, Variable, VariableKind};
use crate::value::Navigation;

#[derive(Debug, Clone)]
pub struct RouteTable {
    prefix: String,
    case_insensitive: bool,
    routes: Vec<CompiledRoute>,
    by_destination: HashMap<String, Vec<usize>>,
    /// Destinations in first-registration order
    destinations: Vec<String>,
    /// Union of parameter variables per destination, first occurrence of a key wins
    watched: HashMap<String, Vec<Variable>>,
}

/// Compiles a `{pattern → destination}` mapping into a route table
///
/// Iteration order of `routes` is the registration order. Each pattern is
/// compiled with `prefix` prepended.
///
/// # Examples
///
/// ```
/// use silcrow_router::compile;
///
/// let table = compile("/", [("notes/:noteId?", "notes")], false).unwrap();
/// let nav = table.parse("/notes/12").unwrap();
/// assert_eq!(nav.destination, "notes");
/// ```
pub fn compile<I, P, D>(prefix: &str, routes: I, case_insensitive: bool) -> Result<RouteTable, RouterError>
where
    I: IntoIterator<Item = (P, D)>,
    P: AsRef<str>,
    D: AsRef<str>,
{
    routes
        .into_iter()
        .fold(
            RouteTable::builder(prefix).case_insensitive(case_insensitive),
            |builder, (pattern, destination)| builder.route(pattern.as_ref(), destination.as_ref()),
        )
        .build()
}

/// Immutable builder for [`RouteTable`]
///
/// # Examples
///
/// ```
/// use silcrow_router::RouteTable;
///
/// let table = RouteTable::builder("/")
///     .route("photos/+photoIds&", "photos")
///     .route("::", "colon")
///     .build()
///     .unwrap();
///
/// assert_eq!(table.routes().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteTableBuilder {
    prefix: String,
    case_insensitive: bool,
    entries: Vec<(String, String)>,
}

impl RouteTableBuilder {
    pub fn case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    /// Registers a pattern; later registrations have lower parse priority
    pub fn route(mut self, pattern: impl Into<String>, destination: impl Into<String>) -> Self {
        self.entries.push((pattern.into(), destination.into()));
        self
    }

    pub fn build(self) -> Result<RouteTable, RouterError> {
        let mut routes = Vec::with_capacity(self.entries.len());
        let mut by_destination: HashMap<String, Vec<usize>> = HashMap::new();
        let mut destinations = Vec::new();
        let mut watched: HashMap<String, Vec<Variable>> = HashMap::new();

        for (index, (pattern, destination)) in self.entries.iter().enumerate() {
            let full = format!("{}{}", self.prefix, pattern);
            let route = CompiledRoute::compile(&full, destination, self.case_insensitive)?;

            let known = watched.entry(destination.clone()).or_default();
            for variable in route.variables() {
                if variable.kind != VariableKind::Remainder
                    && !known.iter().any(|existing| existing.key == variable.key)
                {
                    known.push(variable.clone());
                }
            }

            let indices = by_destination.entry(destination.clone()).or_default();
            if indices.is_empty() {
                destinations.push(destination.clone());
            }
            indices.push(index);
            routes.push(route);
        }

        debug!(
            prefix = %self.prefix,
            routes = routes.len(),
            destinations = destinations.len(),
            "route table compiled"
        );

        Ok(RouteTable {
            prefix: self.prefix,
            case_insensitive: self.case_insensitive,
            routes,
            by_destination,
            destinations,
            watched,
        })
    }
}

impl RouteTable {
    pub fn builder(prefix: impl Into<String>) -> RouteTableBuilder {
        RouteTableBuilder {
            prefix: prefix.into(),
            ..RouteTableBuilder::default()
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Compiled routes in parse priority order
    pub fn routes(&self) -> &[CompiledRoute] {
        &self.routes
    }

    /// Destinations in first-registration order
    pub fn destinations(&self) -> &[String] {
        &self.destinations
    }

    pub fn contains(&self, destination: &str) -> bool {
        self.by_destination.contains_key(destination)
    }

    /// Parameter variables any route of `destination` declares
    ///
    /// Empty for an unknown destination.
    pub fn variables_for(&self, destination: &str) -> &[Variable] {
        self.watched
            .get(destination)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Resolves a path to the first matching route, in declaration order
    ///
    /// `None` means the path is unroutable; it is not an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use silcrow_router::compile;
    ///
    /// let table = compile("/", [("photos/+photoIds&", "photos")], false).unwrap();
    /// assert!(table.parse("/photos/").is_some());
    /// assert!(table.parse("/nowhere").is_none());
    /// ```
    pub fn parse(&self, path: &str) -> Option<Navigation> {
        let found = self.routes.iter().find_map(|route| route.matches(path));
        trace!(path, destination = ?found.as_ref().map(|nav| nav.destination.as_str()), "parse");
        found
    }

    /// The route used to generate paths for a destination
    ///
    /// The most recently registered route wins; earlier routes for the same
    /// destination only act as alternate parse matches.
    pub fn generator_for(&self, destination: &str) -> Option<&CompiledRoute> {
        self.by_destination
            .get(destination)
            .and_then(|indices| indices.last())
            .map(|&index| &self.routes[index])
    }

    /// Generates the path for a navigation
    ///
    /// # Errors
    ///
    /// [`RouterError::UnknownDestination`] when no route is registered for
    /// `navigation.destination`.
    ///
    /// # Examples
    ///
    /// ```
    /// use silcrow_router::{compile, Navigation};
    ///
    /// let table = compile("/", [("notes/:noteId?", "notes")], false).unwrap();
    /// assert_eq!(table.stringify(&Navigation::new("notes")).unwrap(), "/notes");
    /// assert_eq!(
    ///     table.stringify(&Navigation::new("notes").with_param("noteId", 0)).unwrap(),
    ///     "/notes/0"
    /// );
    /// assert!(table.stringify(&Navigation::new("nowhere")).is_err());
    /// ```
    pub fn stringify(&self, navigation: &Navigation) -> Result<String, RouterError> {
        let route = self
            .generator_for(&navigation.destination)
            .ok_or_else(|| RouterError::UnknownDestination(navigation.destination.clone()))?;

        let mut path = String::new();
        for term in route.terms() {
            match term {
                Term::Literal(text) => path.push_str(text),
                Term::Variable(variable) => emit_variable(&mut path, variable, navigation),
            }
        }
        if let Some(rest) = &navigation.remaining_path {
            path.push_str(rest);
        }

        trace!(destination = %navigation.destination, path = %path, "stringify");
        Ok(path)
    }
}

fn emit_variable(path: &mut String, variable: &Variable, navigation: &Navigation) {
    // The remainder is carried by `remaining_path`, appended at the end.
    if variable.kind == VariableKind::Remainder {
        return;
    }

    match navigation.parameters.get(&variable.key) {
        Some(value) => {
            if variable.leading_slash {
                path.push('/');
            }
            if variable.is_plural() {
                let joined = value
                    .elements()
                    .iter()
                    .map(crate::codec::encode_element)
                    .collect::<Vec<_>>()
                    .join("&");
                path.push_str(&joined);
            } else {
                path.push_str(&value.to_segment());
            }
        }
        None if variable.is_plural() && variable.optional_slash() => path.push('/'),
        None => {}
    }
}
