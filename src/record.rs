use crate::node::Node;

/// One declared field of a typed record.
pub struct Field<'a> {
    pub name: &'static str,
    /// Serialization name, when it differs from `name`.
    pub alias: Option<&'static str>,
    pub value: &'a dyn Node,
}

/// A fixed-shape value with named fields, in declaration order.
///
/// This is what typed records expose instead of runtime reflection. Most
/// implementations come from the [`record!`](crate::record!) macro.
pub trait Record {
    fn type_name(&self) -> &'static str;

    fn fields(&self) -> Vec<Field<'_>>;

    /// Find a field by declared name first, then by alias.
    fn field(&self, token: &str) -> Option<&dyn Node> {
        let fields = self.fields();
        fields
            .iter()
            .find(|f| f.name == token)
            .or_else(|| fields.iter().find(|f| f.alias == Some(token)))
            .map(|f| f.value)
    }
}

/// Implement [`Record`] and [`Node`] for a struct from its field list.
///
/// ```
/// use docpath::record;
///
/// struct Writer {
///     format: String,
///     limit_bytes: u32,
/// }
///
/// record!(Writer { format, limit_bytes as "limitBytes" });
/// ```
#[macro_export]
macro_rules! record {
    ($ty:ident { $($field:ident $(as $alias:literal)?),* $(,)? }) => {
        impl $crate::record::Record for $ty {
            fn type_name(&self) -> &'static str {
                stringify!($ty)
            }

            fn fields(&self) -> Vec<$crate::record::Field<'_>> {
                vec![$(
                    $crate::record::Field {
                        name: stringify!($field),
                        alias: None $(.or(Some($alias)))?,
                        value: &self.$field,
                    }
                ),*]
            }
        }

        impl $crate::node::Node for $ty {
            fn shape(&self) -> $crate::node::Shape<'_> {
                $crate::node::Shape::Record(self)
            }
        }
    };
}
