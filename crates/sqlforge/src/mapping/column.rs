//! Column definitions: field accessors paired with a converter.

use crate::convert::{Converter, FieldType};
use crate::error::{OrmError, OrmResult};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

type Getter<T, F> = Arc<dyn for<'a> Fn(&'a T) -> Option<&'a F> + Send + Sync>;
type GetterMut<T, F> = Arc<dyn for<'a> Fn(&'a mut T) -> Option<&'a mut F> + Send + Sync>;

type ReadFn<T> = Arc<dyn Fn(&T) -> OrmResult<Value> + Send + Sync>;
type WriteFn<T> = Arc<dyn Fn(&mut T, &Value, &str) -> OrmResult<()> + Send + Sync>;

fn getter<T, F, G>(g: G) -> Getter<T, F>
where
    G: for<'a> Fn(&'a T) -> Option<&'a F> + Send + Sync + 'static,
{
    Arc::new(g)
}

fn getter_mut<T, F, G>(g: G) -> GetterMut<T, F>
where
    G: for<'a> Fn(&'a mut T) -> Option<&'a mut F> + Send + Sync + 'static,
{
    Arc::new(g)
}

/// Last segment of a dotted field path.
fn default_column_name(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

/// Everything before the last segment of a dotted field path.
fn parent_path(path: &str) -> &str {
    path.rsplit_once('.').map(|(parent, _)| parent).unwrap_or(path)
}

/// A column under construction, still typed by its field.
///
/// Convert into a [`Column`] (the mapping methods accept either) once the
/// column name, converter and read-only expression are set.
pub struct ColumnDef<T, F> {
    path: String,
    column_name: String,
    read_only_expr: Option<String>,
    converter: Arc<dyn Converter<F>>,
    get: Getter<T, F>,
    get_mut: GetterMut<T, F>,
}

impl<T: 'static, F: FieldType> ColumnDef<T, F> {
    fn new(path: impl Into<String>, get: Getter<T, F>, get_mut: GetterMut<T, F>) -> Self {
        let path = path.into();
        Self {
            column_name: default_column_name(&path).to_string(),
            path,
            read_only_expr: None,
            converter: F::default_converter(),
            get,
            get_mut,
        }
    }

    /// Override the column name (defaults to the last field path segment).
    pub fn column_name(mut self, name: impl Into<String>) -> Self {
        self.column_name = name.into();
        self
    }

    /// Use an explicit converter instead of the field type's default.
    pub fn converter(mut self, converter: impl Converter<F> + 'static) -> Self {
        self.converter = Arc::new(converter);
        self
    }

    /// Project the column from a SQL expression. Read-only columns are
    /// selected as `expr as column_name` and never inserted or updated.
    pub fn read_only(mut self, expr: impl Into<String>) -> Self {
        self.read_only_expr = Some(expr.into());
        self
    }
}

impl<T: 'static, F: FieldType> From<ColumnDef<T, F>> for Column<T> {
    fn from(def: ColumnDef<T, F>) -> Self {
        let ColumnDef {
            path,
            column_name,
            read_only_expr,
            converter,
            get,
            get_mut,
        } = def;

        let read_converter = converter.clone();
        let read_get = get.clone();
        let read: ReadFn<T> = Arc::new(move |entity: &T| match read_get(entity) {
            Some(field) => read_converter.to_storage(field),
            None => Ok(Value::Null),
        });

        let write_path = path.clone();
        let write: WriteFn<T> = Arc::new(move |entity: &mut T, value: &Value, column: &str| {
            // Null under an absent parent leaves the parent absent.
            if value.is_null() && get(entity).is_none() {
                return Ok(());
            }
            let field_value = converter.from_value(value, column)?;
            match get_mut(entity) {
                Some(slot) => {
                    *slot = field_value;
                    Ok(())
                }
                None => Err(OrmError::BrokenFieldPath {
                    path: write_path.clone(),
                    segment: parent_path(&write_path).to_string(),
                }),
            }
        });

        Column {
            path,
            column_name,
            read_only_expr,
            read,
            write,
        }
    }
}

/// A mapped column of entity type `T`.
///
/// ```ignore
/// Column::field("name", |e: &Employee| &e.name, |e| &mut e.name)
/// Column::field("created", |e: &Employee| &e.created, |e| &mut e.created)
///     .column_name("created_at")
/// Column::nested(
///     "address.street",
///     |p: &Person| p.address.as_ref().map(|a| &a.street),
///     |p| p.address.as_mut().map(|a| &mut a.street),
/// )
/// ```
pub struct Column<T> {
    path: String,
    column_name: String,
    read_only_expr: Option<String>,
    read: ReadFn<T>,
    write: WriteFn<T>,
}

impl<T: 'static> Column<T> {
    /// A column over a field reachable without passing through an `Option`.
    pub fn field<F, G, M>(path: impl Into<String>, get: G, get_mut: M) -> ColumnDef<T, F>
    where
        F: FieldType,
        G: for<'a> Fn(&'a T) -> &'a F + Send + Sync + 'static,
        M: for<'a> Fn(&'a mut T) -> &'a mut F + Send + Sync + 'static,
    {
        ColumnDef::new(
            path,
            getter(move |entity: &T| Some(get(entity))),
            getter_mut(move |entity: &mut T| Some(get_mut(entity))),
        )
    }

    /// A column over a dotted path whose intermediate objects may be absent.
    ///
    /// Reading through an absent intermediate gives null; writing through one
    /// fails with [`OrmError::BrokenFieldPath`].
    pub fn nested<F, G, M>(path: impl Into<String>, get: G, get_mut: M) -> ColumnDef<T, F>
    where
        F: FieldType,
        G: for<'a> Fn(&'a T) -> Option<&'a F> + Send + Sync + 'static,
        M: for<'a> Fn(&'a mut T) -> Option<&'a mut F> + Send + Sync + 'static,
    {
        ColumnDef::new(path, getter(get), getter_mut(get_mut))
    }
}

impl<T> Column<T> {
    pub fn field_path(&self) -> &str {
        &self.path
    }

    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    pub fn read_only_expr(&self) -> Option<&str> {
        self.read_only_expr.as_deref()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only_expr.is_some()
    }

    /// The field's current value in storage form.
    pub fn read(&self, entity: &T) -> OrmResult<Value> {
        (self.read)(entity)
    }

    /// Convert a column value and store it in the entity's field.
    pub fn write(&self, entity: &mut T, value: &Value) -> OrmResult<()> {
        (self.write)(entity, value, &self.column_name)
    }

    /// Select-list entry for this column under table alias `alias`.
    pub(crate) fn projection(&self, alias: &str) -> String {
        match &self.read_only_expr {
            Some(expr) => format!("{expr} as {}", self.column_name),
            None => format!("{alias}.{}", self.column_name),
        }
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            column_name: self.column_name.clone(),
            read_only_expr: self.read_only_expr.clone(),
            read: self.read.clone(),
            write: self.write.clone(),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("path", &self.path)
            .field("column_name", &self.column_name)
            .field("read_only_expr", &self.read_only_expr)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::StringListConverter;

    #[derive(Debug, Default, PartialEq)]
    struct Address {
        street: String,
    }

    #[derive(Debug, Default)]
    struct Person {
        name: String,
        address: Option<Address>,
        tags: Vec<String>,
    }

    fn street() -> Column<Person> {
        Column::nested(
            "address.street",
            |p: &Person| p.address.as_ref().map(|a| &a.street),
            |p: &mut Person| p.address.as_mut().map(|a| &mut a.street),
        )
        .into()
    }

    #[test]
    fn column_name_defaults_to_last_segment() {
        assert_eq!(street().column_name(), "street");
        assert_eq!(street().field_path(), "address.street");

        let name: Column<Person> = Column::field("name", |p: &Person| &p.name, |p: &mut Person| &mut p.name)
            .column_name("full_name")
            .into();
        assert_eq!(name.column_name(), "full_name");
        assert!(!name.is_read_only());
    }

    #[test]
    fn read_through_path() {
        let col = street();
        let mut person = Person {
            name: "Joe".to_string(),
            ..Person::default()
        };
        assert_eq!(col.read(&person).unwrap(), Value::Null);

        person.address = Some(Address::default());
        assert_eq!(col.read(&person).unwrap(), Value::from(""));

        person.address = Some(Address {
            street: "123 Main".to_string(),
        });
        assert_eq!(col.read(&person).unwrap(), Value::from("123 Main"));
    }

    #[test]
    fn write_through_path() {
        let col = street();
        let mut person = Person::default();

        let err = col.write(&mut person, &Value::from("123 Main")).unwrap_err();
        match err {
            OrmError::BrokenFieldPath { path, segment } => {
                assert_eq!(path, "address.street");
                assert_eq!(segment, "address");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        col.write(&mut person, &Value::Null).unwrap();
        assert_eq!(person.address, None);

        person.address = Some(Address::default());
        col.write(&mut person, &Value::from("123 Main")).unwrap();
        assert_eq!(person.address.unwrap().street, "123 Main");
    }

    #[test]
    fn explicit_converter_and_read_only() {
        let col: Column<Person> = Column::field("tags", |p: &Person| &p.tags, |p: &mut Person| &mut p.tags)
            .converter(StringListConverter::new())
            .read_only("upper(tags)")
            .into();
        assert!(col.is_read_only());
        assert_eq!(col.projection("_t0"), "upper(tags) as tags");

        let mut person = Person::default();
        col.write(&mut person, &Value::from("a,b")).unwrap();
        assert_eq!(person.tags, vec!["a", "b"]);
        assert_eq!(col.read(&person).unwrap(), Value::from("a,b"));
    }
}
