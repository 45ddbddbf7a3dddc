//! Getter sources and the priority chain that queries them.

use crate::access;
use crate::error::Error;
use crate::node::{to_value, Node};
use crate::value::{Document, Value};
use std::fmt;

/// Something that resolves a path to a value.
///
/// `Ok(None)` means the path is not present here and the next source may be
/// tried. Errors are reserved for structural failures.
pub trait Getter {
    fn get_path(&self, path: &str) -> Result<Option<Value>, Error>;

    /// The value at `path` as text, or `""` when absent or on failure.
    fn get_string(&self, path: &str) -> String {
        match self.get_path(path) {
            Ok(Some(value)) => value.to_string(),
            _ => String::new(),
        }
    }
}

/// Every navigable node is a getter. Lookup misses, names used against a
/// sequence and `null` values are absent; non-string keys are errors.
impl<N: Node> Getter for N {
    fn get_path(&self, path: &str) -> Result<Option<Value>, Error> {
        match access::lookup(self, path) {
            Ok(node) => Ok(Some(to_value(node)).filter(|v| !v.is_null())),
            Err(err) if err.kind.is_miss() => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Try `items` in order and commit to the first one that yields something.
///
/// Returns the index of the item that answered along with its answer.
/// An error from any item stops the search.
pub fn first_found<I, T, E>(
    items: I,
    mut probe: impl FnMut(usize, I::Item) -> Result<Option<T>, E>,
) -> Result<Option<(usize, T)>, E>
where
    I: IntoIterator,
{
    for (index, item) in items.into_iter().enumerate() {
        if let Some(found) = probe(index, item)? {
            return Ok(Some((index, found)));
        }
    }
    Ok(None)
}

/// Diagnostic events reported to a per-call hook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event<'a> {
    /// A reference was looked up in one source.
    Lookup {
        reference: &'a str,
        source: usize,
        found: bool,
    },
    /// An intermediate mapping was created for an assignment target.
    Created { segment: &'a str },
    /// An assignment target was written.
    Stored { target: &'a str },
}

enum Link<'a> {
    /// The document being assigned to.
    Target,
    Getter(&'a dyn Getter),
}

/// Ordered list of getter sources used to resolve references.
///
/// The document being mutated by a batch can take part through
/// [`Sources::target`]; it is read at its current state for every
/// assignment, so later assignments see earlier ones.
#[derive(Default)]
pub struct Sources<'a> {
    links: Vec<Link<'a>>,
    hook: Option<&'a dyn Fn(&Event<'_>)>,
}

impl<'a> Sources<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the document being assigned to.
    pub fn target(mut self) -> Self {
        self.links.push(Link::Target);
        self
    }

    /// Append an external source.
    pub fn with(mut self, getter: &'a dyn Getter) -> Self {
        self.links.push(Link::Getter(getter));
        self
    }

    /// Attach a hook that receives diagnostic events for this call.
    pub fn hook(mut self, hook: &'a dyn Fn(&Event<'_>)) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Resolve the chain into concrete getters, with `target` standing in
    /// for the document being assigned to.
    ///
    /// Chains that name the target can only be bound when one is given;
    /// without it the target link is skipped.
    pub fn bind<'b>(&'b self, target: Option<&'b Document>) -> Vec<&'b dyn Getter>
    where
        'a: 'b,
    {
        self.links
            .iter()
            .filter_map(|link| -> Option<&'b dyn Getter> {
                match link {
                    Link::Target => target.map(|doc| doc as &dyn Getter),
                    Link::Getter(getter) => Some(*getter),
                }
            })
            .collect()
    }

    pub(crate) fn emit(&self, event: Event<'_>) {
        if let Some(hook) = self.hook {
            hook(&event);
        }
    }
}

impl fmt::Debug for Sources<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sources")
            .field("len", &self.links.len())
            .field("hook", &self.hook.is_some())
            .finish()
    }
}
