/// Parameter values and navigation snapshots
///
/// These are plain value objects: a [`Navigation`] is produced fresh by every
/// successful parse and is owned by the caller.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Parameter mapping keyed by variable name, or by positional key (`"0"`,
/// `"1"`, ...) for variables declared without a name.
pub type Parameters = BTreeMap<String, ParamValue>;

/// A single parameter element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Captured by an integer (`+`) variable
    Int(i64),
    /// Captured by a string (`:` or `*`) variable
    Str(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Int(n)
    }
}

impl From<i32> for Scalar {
    fn from(n: i32) -> Self {
        Scalar::Int(i64::from(n))
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

/// Value bound to one parameter key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Zero or more elements of a plural (`&`) variable
    List(Vec<Scalar>),
    /// Value of a singular variable
    Single(Scalar),
}

impl ParamValue {
    /// Elements as seen by a plural term; a single value is a one-element list.
    pub fn elements(&self) -> &[Scalar] {
        match self {
            ParamValue::List(items) => items,
            ParamValue::Single(value) => std::slice::from_ref(value),
        }
    }

    /// String form as emitted by a singular term
    pub fn to_segment(&self) -> String {
        match self {
            ParamValue::Single(value) => value.to_string(),
            ParamValue::List(items) => items
                .iter()
                .map(Scalar::to_string)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl From<Scalar> for ParamValue {
    fn from(value: Scalar) -> Self {
        ParamValue::Single(value)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Single(Scalar::Int(n))
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        ParamValue::Single(Scalar::from(n))
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Single(Scalar::from(s))
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Single(Scalar::Str(s))
    }
}

impl<T: Into<Scalar>> FromIterator<T> for ParamValue {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        ParamValue::List(iter.into_iter().map(Into::into).collect())
    }
}

/// Structured navigation: where to go, with which parameters
///
/// Returned by [`RouteTable::parse`](crate::RouteTable::parse) and accepted by
/// [`RouteTable::stringify`](crate::RouteTable::stringify).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Navigation {
    pub destination: String,
    #[serde(default)]
    pub parameters: Parameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_path: Option<String>,
}

impl Navigation {
    /// Creates a navigation with no parameters and no remaining path
    ///
    /// # Examples
    ///
    /// ```
    /// use silcrow_router::Navigation;
    ///
    /// let nav = Navigation::new("notes").with_param("noteId", 7);
    /// assert_eq!(nav.destination, "notes");
    /// assert_eq!(nav.parameters.len(), 1);
    /// ```
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            parameters: Parameters::new(),
            remaining_path: None,
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn with_list<I, T>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Scalar>,
    {
        self.parameters
            .insert(name.into(), values.into_iter().collect::<ParamValue>());
        self
    }

    pub fn with_remaining_path(mut self, rest: impl Into<String>) -> Self {
        self.remaining_path = Some(rest.into());
        self
    }

    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.parameters.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_value_is_one_element_list() {
        let value = ParamValue::from(5);
        assert_eq!(value.elements(), &[Scalar::Int(5)]);
    }

    #[test]
    fn test_list_segment_joins_with_commas() {
        let value: ParamValue = ["a", "b"].into_iter().collect();
        assert_eq!(value.to_segment(), "a,b");
    }

    #[test]
    fn test_navigation_json_shape() {
        let nav = Navigation::new("photos")
            .with_list("photoIds", [10, 20])
            .with_param("title", "x");
        let json = serde_json::to_value(&nav).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "destination": "photos",
                "parameters": { "photoIds": [10, 20], "title": "x" }
            })
        );
    }
}
