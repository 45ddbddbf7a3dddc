use crate::chain::{Event, Getter, Sources};
use crate::error::{Error, ErrorKind};
use crate::path;
use crate::template;
use crate::value::{Document, Value};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// One instruction: set `name` (e.g. `"a"` or `"a.b"`) to `value`.
///
/// String values may contain `{{...}}` references, and mapping values are
/// applied key by key with the same rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub name: String,
    pub value: Value,
}

/// An ordered batch of assignments.
///
/// Order matters: an assignment may refer to values written by the ones
/// before it when the target document is one of the sources.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignments(Vec<Assignment>);

impl Assignments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.push(Assignment {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Append another batch. Where both set the same name, the appended
    /// one is applied last and wins.
    pub fn merge(mut self, other: Assignments) -> Self {
        self.0.extend(other.0);
        self
    }

    /// Check that every assignment has a target.
    pub fn validate(&self) -> Result<(), Error> {
        for (index, assignment) in self.0.iter().enumerate() {
            if assignment.name.is_empty() {
                return Err(Error::new(ErrorKind::EmptyTargetPath)
                    .context(format!("assignment[{}]", index)));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Assignment> {
        self.0.iter()
    }
}

impl FromIterator<Assignment> for Assignments {
    fn from_iter<I: IntoIterator<Item = Assignment>>(iter: I) -> Self {
        Assignments(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Assignments {
    type Item = &'a Assignment;
    type IntoIter = std::slice::Iter<'a, Assignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Something that can be written by path.
pub trait Setter {
    /// Overwrite the value at a dotted path, replacing whatever is in the
    /// way. Never fails; an empty path is ignored.
    fn set_path(&mut self, path: &str, value: Value);

    /// Apply a batch of assignments, see [`assign`].
    fn assign(&mut self, assignments: &Assignments, sources: &Sources<'_>) -> Result<(), Error>;
}

impl Setter for Document {
    fn set_path(&mut self, path: &str, value: Value) {
        let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
        let Some((leaf, parents)) = segments.split_last() else {
            debug!("set(\"{}\") ignored: no target", path);
            return;
        };
        let mut current = self;
        for segment in parents {
            current = current
                .entry(segment.to_string())
                .or_insert_with(Value::map)
                .ensure_map();
        }
        current.insert(leaf.to_string(), value);
    }

    fn assign(&mut self, assignments: &Assignments, sources: &Sources<'_>) -> Result<(), Error> {
        assign(self, assignments, sources)
    }
}

/// Apply `assignments` to `document`, strictly in order.
///
/// Intermediate mappings are created as needed; an intermediate that exists
/// but is not a mapping fails with `TypeConflict`. References are resolved
/// against `sources` in order, first found wins.
///
/// The first failing assignment stops the batch. Writes made before it are
/// kept, so apply to a copy and swap when all-or-nothing is needed.
pub fn assign(
    document: &mut Document,
    assignments: &Assignments,
    sources: &Sources<'_>,
) -> Result<(), Error> {
    if assignments.is_empty() {
        return Ok(());
    }
    if sources.is_empty() {
        return Err(ErrorKind::NoSourcesProvided.into());
    }
    debug!(
        "assigning {} value(s) from {} source(s)",
        assignments.len(),
        sources.len()
    );

    for (index, assignment) in assignments.iter().enumerate() {
        apply(document, assignment, sources).map_err(|err| {
            err.context(format!("assignment[{}] \"{}\"", index, assignment.name))
        })?;
    }
    Ok(())
}

fn apply(
    document: &mut Document,
    assignment: &Assignment,
    sources: &Sources<'_>,
) -> Result<(), Error> {
    let segments = path::target_segments(&assignment.name);
    if segments.iter().any(|s| s.is_empty()) {
        return Err(ErrorKind::EmptyTargetPath.into());
    }
    let Some((leaf, parents)) = segments.split_last() else {
        return Err(ErrorKind::EmptyTargetPath.into());
    };

    descend(document, parents, sources)?;

    let resolved = {
        let getters = sources.bind(Some(&*document));
        resolve_spec(&assignment.value, &getters, &|event: &Event<'_>| {
            sources.emit(*event)
        })
    };

    let container = descend(document, parents, sources)?;
    match resolved {
        Ok(value) => {
            trace!("set {} = ({}) {}", assignment.name, value.kind(), value);
            container.insert(leaf.to_string(), value);
            sources.emit(Event::Stored {
                target: &assignment.name,
            });
            Ok(())
        }
        Err(Unfinished { partial, error }) => {
            if let Some(partial) = partial {
                container.insert(leaf.to_string(), partial);
            }
            Err(error)
        }
    }
}

/// Walk `parents` from `document`, creating missing mappings.
fn descend<'d>(
    document: &'d mut Document,
    parents: &[&str],
    sources: &Sources<'_>,
) -> Result<&'d mut Document, Error> {
    let mut current = document;
    for (depth, segment) in parents.iter().enumerate() {
        if !current.contains_key(*segment) {
            trace!("creating {}", parents[..=depth].join("."));
            sources.emit(Event::Created { segment: *segment });
        }
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(Value::map);
        current = match slot {
            Value::Map(m) => m,
            other => {
                return Err(Error::new(ErrorKind::TypeConflict {
                    segment: segment.to_string(),
                    found: other.kind(),
                })
                .context(parents[..=depth].join(".")));
            }
        };
    }
    Ok(current)
}

/// A value specification that failed part way. `partial` holds what was
/// built before the failure, if anything.
struct Unfinished {
    partial: Option<Value>,
    error: Error,
}

/// Turn a value specification into the value to store.
///
/// Nested mappings are built key by key against the same sources; keys of
/// the mapping being built are not visible to references inside it.
fn resolve_spec(
    spec: &Value,
    getters: &[&dyn Getter],
    hook: &dyn Fn(&Event<'_>),
) -> Result<Value, Unfinished> {
    match spec {
        Value::String(raw) => {
            template::resolve_traced(raw, getters, hook).map_err(|error| Unfinished {
                partial: None,
                error,
            })
        }
        Value::Map(entries) => {
            let mut built = Document::new();
            for (key, child) in entries {
                match resolve_spec(child, getters, hook) {
                    Ok(value) => {
                        built.insert(key.clone(), value);
                    }
                    Err(Unfinished { partial, error }) => {
                        if let Some(partial) = partial {
                            built.insert(key.clone(), partial);
                        }
                        return Err(Unfinished {
                            partial: Some(Value::Map(built)),
                            error: error.context(key.as_str()),
                        });
                    }
                }
            }
            Ok(Value::Map(built))
        }
        other => Ok(other.clone()),
    }
}
