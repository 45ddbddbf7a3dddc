//! Linearize nested data into a row of text fields.

use crate::error::{Error, ErrorKind};
use crate::node::{Node, Scalar, Shape};
use crate::value::write_float;
use std::fmt::Write;

/// Flatten `node` into one text field per scalar leaf.
///
/// Record fields are visited in declaration order, sequence elements in
/// index order and mapping entries in key order. A missing value becomes an
/// empty field.
pub fn flatten(node: &dyn Node) -> Result<Vec<String>, Error> {
    let mut out = Vec::new();
    flatten_into(node, &mut out)?;
    Ok(out)
}

/// Like [`flatten`], appending to `out`. On error, `out` keeps the fields
/// produced before the failure.
pub fn flatten_into(node: &dyn Node, out: &mut Vec<String>) -> Result<(), Error> {
    match node.shape() {
        Shape::Scalar(scalar) => out.push(scalar_field(scalar)?),
        Shape::Record(record) => {
            for field in record.fields() {
                flatten_into(field.value, out)
                    .map_err(|err| err.context(format!("field({})", field.name)))?;
            }
        }
        Shape::Seq(seq) => {
            for index in 0..seq.len() {
                if let Some(element) = seq.element(index) {
                    flatten_into(element, out)
                        .map_err(|err| err.context(format!("[{}]", index)))?;
                }
            }
        }
        Shape::Map(map) => {
            for (key, child) in map.entries() {
                flatten_into(child, out).map_err(|err| err.context(format!("[{}]", key)))?;
            }
        }
    }
    Ok(())
}

fn scalar_field(scalar: Scalar<'_>) -> Result<String, Error> {
    let mut field = String::new();
    match scalar {
        Scalar::Null => {}
        Scalar::Bool(b) => field.push_str(if b { "true" } else { "false" }),
        Scalar::Int(i) => field.push_str(&i.to_string()),
        Scalar::Float(n) => write_float(&mut field, n).map_err(|_| ErrorKind::RenderFailed)?,
        Scalar::Str(s) => field.push_str(s),
        Scalar::Display(d) => write!(field, "{}", d).map_err(|_| ErrorKind::RenderFailed)?,
    }
    Ok(field)
}
