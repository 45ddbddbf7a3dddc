//! Path-addressed reading and templated writing of nested documents.
//!
//! - [`access`] reads a value at a path such as `"auditors[1].limit"` from
//!   anything that implements [`Node`]: dynamic [`Value`]s, std containers
//!   and typed records declared with [`record!`].
//! - [`assign`] applies an ordered batch of [`Assignments`] to a
//!   [`Document`], resolving `{{path}}` references against a prioritized
//!   list of [`Sources`].
//! - [`flatten`] turns a record or sequence into a flat row of text fields.

pub mod access;
pub mod assign;
pub mod chain;
pub mod error;
pub mod flatten;
pub mod node;
pub mod path;
pub mod record;
pub mod template;
pub mod value;

pub use access::{get, get_into, get_or, json_into, lookup, Validate};
pub use assign::{assign, Assignment, Assignments, Setter};
pub use chain::{Event, Getter, Sources};
pub use error::{Error, ErrorKind};
pub use flatten::{flatten, flatten_into};
pub use node::{to_value, Node};
pub use record::{Field, Record};
pub use template::resolve_string;
pub use value::{Document, Value};
