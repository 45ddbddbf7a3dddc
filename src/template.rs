//! `{{path}}` references inside string values.

use crate::chain::{first_found, Event, Getter};
use crate::error::{Error, ErrorKind};
use crate::value::Value;
use log::debug;
use regex::Regex;
use std::sync::OnceLock;

fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)\{\{(.+?)\}\}").expect("reference pattern is valid"))
}

/// The reference paths in `raw`, left to right, as written.
pub fn references(raw: &str) -> Vec<&str> {
    reference_pattern()
        .captures_iter(raw)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Resolve every `{{path}}` in `raw` against `sources`.
///
/// A string that is exactly one reference resolves to the referenced value
/// with its type intact. Otherwise each reference is replaced by the text of
/// its value. Strings without references come back unchanged; any other
/// string fails `NoSourcesProvided` when `sources` is empty.
pub fn resolve_string(raw: &str, sources: &[&dyn Getter]) -> Result<Value, Error> {
    resolve_traced(raw, sources, &|_: &Event<'_>| {})
}

pub(crate) fn resolve_traced(
    raw: &str,
    sources: &[&dyn Getter],
    hook: &dyn Fn(&Event<'_>),
) -> Result<Value, Error> {
    let pattern = reference_pattern();
    let mut matches = pattern.captures_iter(raw).peekable();
    if matches.peek().is_none() {
        return Ok(Value::String(raw.to_string()));
    }
    if sources.is_empty() {
        return Err(ErrorKind::NoSourcesProvided.into());
    }

    let mut out = String::with_capacity(raw.len());
    let mut last = 0;
    for caps in matches {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = resolve_reference(name.as_str(), sources, hook)?;
        if whole.start() == 0 && whole.end() == raw.len() {
            debug!("{} is a whole-value reference ({})", raw, value.kind());
            return Ok(value);
        }
        out.push_str(&raw[last..whole.start()]);
        out.push_str(&value.to_string());
        last = whole.end();
    }
    out.push_str(&raw[last..]);
    debug!("substituted \"{}\" -> \"{}\"", raw, out);
    Ok(Value::String(out))
}

fn resolve_reference(
    reference: &str,
    sources: &[&dyn Getter],
    hook: &dyn Fn(&Event<'_>),
) -> Result<Value, Error> {
    let found = first_found(sources.iter(), |index, source| {
        let result = source.get_path(reference).map_err(|err| {
            err.context(format!(
                "source[{}] of {} failed to get({})",
                index,
                sources.len(),
                reference
            ))
        })?;
        hook(&Event::Lookup {
            reference,
            source: index,
            found: result.is_some(),
        });
        Ok::<_, Error>(result)
    })?;

    match found {
        Some((_, value)) => Ok(value),
        None => Err(ErrorKind::ReferenceNotFound {
            reference: reference.to_string(),
            sources: sources.len(),
        }
        .into()),
    }
}
