use crate::error::{Error, ErrorKind};
use crate::node::{to_value, KeyKind, Node, Shape};
use crate::path;
use log::{debug, trace};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Walk `value` along `tokens` and return the node they lead to.
///
/// An empty token list returns `value` itself. Typed records match a token
/// against field names before aliases, mappings need string keys, and
/// sequences need a decimal index inside their length.
pub fn get<'a>(value: &'a dyn Node, tokens: &[&str]) -> Result<&'a dyn Node, Error> {
    let Some((&token, rest)) = tokens.split_first() else {
        return Ok(value);
    };
    trace!("get({}) ...", tokens.join("|"));

    let child = match value.shape() {
        Shape::Scalar(_) => {
            return Err(ErrorKind::NotIndexable {
                token: token.to_string(),
            }
            .into());
        }
        Shape::Record(record) => record.field(token).ok_or_else(|| ErrorKind::FieldNotFound {
            record: record.type_name(),
            field: token.to_string(),
        })?,
        Shape::Map(map) => {
            if let KeyKind::Other(key_type) = map.key_kind() {
                return Err(ErrorKind::UnsupportedKeyType { key_type }.into());
            }
            map.entry(token).ok_or_else(|| ErrorKind::KeyNotFound {
                key: token.to_string(),
            })?
        }
        Shape::Seq(seq) => {
            let index: i64 = token.parse().map_err(|_| ErrorKind::NotAnIndex {
                token: token.to_string(),
            })?;
            usize::try_from(index)
                .ok()
                .and_then(|i| seq.element(i))
                .ok_or(ErrorKind::IndexOutOfRange {
                    index,
                    len: seq.len(),
                })?
        }
    };

    get(child, rest).map_err(|err| err.context(token))
}

/// Parse `path` and [`get`] it.
pub fn lookup<'a>(value: &'a dyn Node, path: &str) -> Result<&'a dyn Node, Error> {
    let result = get(value, &path::parse(path));
    if let Err(err) = &result {
        debug!("get({}) failed: {}", path, err);
    }
    result
}

/// Types that can check themselves after being decoded.
///
/// The default accepts everything; implement `validate` to reject values.
pub trait Validate {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

macro_rules! always_valid {
    ($($t:ty),*) => {$(
        impl Validate for $t {}
    )*};
}

always_valid!(
    bool, i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64, String, char,
    crate::value::Value
);

impl<T: Validate> Validate for Option<T> {
    fn validate(&self) -> Result<(), String> {
        self.as_ref().map_or(Ok(()), Validate::validate)
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), String> {
        self.iter().try_for_each(Validate::validate)
    }
}

impl<K, V: Validate> Validate for std::collections::BTreeMap<K, V> {
    fn validate(&self) -> Result<(), String> {
        self.values().try_for_each(Validate::validate)
    }
}

impl<K, V: Validate, S> Validate for std::collections::HashMap<K, V, S> {
    fn validate(&self) -> Result<(), String> {
        self.values().try_for_each(Validate::validate)
    }
}

/// Look up `path` and decode what is found onto a copy of `template`.
///
/// The found value goes through the JSON interchange encoding and is merged
/// over the encoded template (see [`json_into`]), then validated.
pub fn get_into<T>(value: &dyn Node, path: &str, template: &T) -> Result<T, Error>
where
    T: Serialize + DeserializeOwned + Validate,
{
    let found = lookup(value, path).map_err(|err| err.context("cannot get"))?;
    let encoded = serde_json::to_value(to_value(found))
        .map_err(|err| Error::from(err).context("cannot encode"))?;
    json_into(encoded, template)
}

/// Merge an encoded value over the encoding of `template`, decode it and
/// validate the result.
///
/// Objects merge key by key, `null` keeps the template's value, and
/// everything else overwrites.
pub fn json_into<T>(encoded: serde_json::Value, template: &T) -> Result<T, Error>
where
    T: Serialize + DeserializeOwned + Validate,
{
    let mut merged = serde_json::to_value(template)
        .map_err(|err| Error::from(err).context("cannot encode template"))?;
    merge_json(&mut merged, encoded);
    let out: T = serde_json::from_value(merged)
        .map_err(|err| Error::from(err).context("cannot decode"))?;
    out.validate().map_err(ErrorKind::Invalid)?;
    Ok(out)
}

fn merge_json(base: &mut serde_json::Value, patch: serde_json::Value) {
    match (base, patch) {
        (_, serde_json::Value::Null) => {}
        (serde_json::Value::Object(base), serde_json::Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, patch) => *base = patch,
    }
}

/// [`get_into`], falling back to `default` on any failure.
///
/// Lookup, decoding and validation errors are all swallowed, so only use
/// this where a silent default is acceptable.
pub fn get_or<T>(value: &dyn Node, path: &str, default: T) -> T
where
    T: Serialize + DeserializeOwned + Validate,
{
    match get_into(value, path, &default) {
        Ok(v) => v,
        Err(err) => {
            debug!("get_or({}) using default: {}", path, err);
            default
        }
    }
}
