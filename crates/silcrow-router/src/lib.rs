//! # Silcrow Router
//!
//! Two-way mapping between slash-delimited paths and structured navigation
//! state (`destination` + named `parameters` + optional remaining path),
//! driven by a compact route pattern DSL:
//!
//! - Literal text (`/about`)
//! - Segment variables (`/users/:id`), optional with `?` (`/notes/:noteId?`)
//! - Slash-spanning variables (`/files/*path`)
//! - Integer variables (`/page/+n`), coerced on parse
//! - Plural variables joined with `&` (`/photos/+photoIds&`)
//! - Remainder capture (`/docs/...`)
//! - Escapes for literal operators (`/::` is a literal `/:` segment)
//!
//! ## Parse and stringify
//!
//! Parsing tries routes in declaration order and returns the first match.
//! Stringifying uses the most recently registered route of a destination.
//! Plural elements are percent-encoded; singular values pass through raw.
//!
//! ## Example
//!
//! ```
//! use silcrow_router::{compile, Navigation, ParamValue, Scalar};
//!
//! let table = compile(
//!     "/",
//!     [("photos/+photoIds&", "photos"), ("notes/:noteId?", "notes")],
//!     false,
//! )
//! .unwrap();
//!
//! let nav = table.parse("/photos/10&20&30").unwrap();
//! assert_eq!(nav.destination, "photos");
//! assert_eq!(
//!     nav.param("photoIds"),
//!     Some(&ParamValue::List(vec![Scalar::Int(10), Scalar::Int(20), Scalar::Int(30)]))
//! );
//!
//! let path = table.stringify(&Navigation::new("notes").with_param("noteId", 0)).unwrap();
//! assert_eq!(path, "/notes/0");
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod codec;
mod config;
mod error;
pub mod route;
mod table;
mod value;

// Re-export public types
pub use config::{RouteConfig, RouteEntry};
pub use error::{ConfigError, RouterError};
pub use route::{CompiledRoute, Term, Variable, VariableKind};
pub use table::{compile, RouteTable, RouteTableBuilder};
pub use value::{Navigation, ParamValue, Parameters, Scalar};
