use super::Converter;
use super::string::text_or_null;
use crate::error::{OrmError, OrmResult};
use crate::value::Value;
use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};

/// A reference to a Rust type, stored in the database by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeRef {
    name: &'static str,
    id: TypeId,
}

impl TypeRef {
    /// Reference `T` under its `std::any::type_name`.
    pub fn of<T: 'static>() -> Self {
        Self::named::<T>(type_name::<T>())
    }

    /// Reference `T` under a caller-chosen, stable name.
    pub fn named<T: 'static>(name: &'static str) -> Self {
        Self {
            name,
            id: TypeId::of::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Name → [`TypeRef`] lookup used when reading type references back.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: RwLock<HashMap<&'static str, TypeRef>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by the default [`TypeRef`] converter.
    pub fn global() -> Arc<TypeRegistry> {
        static GLOBAL: OnceLock<Arc<TypeRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(TypeRegistry::new())).clone()
    }

    /// Register a type reference; a later registration under the same name wins.
    pub fn register(&self, type_ref: TypeRef) -> TypeRef {
        let mut types = self.types.write().unwrap_or_else(|e| e.into_inner());
        types.insert(type_ref.name, type_ref);
        type_ref
    }

    pub fn resolve(&self, name: &str) -> Option<TypeRef> {
        let types = self.types.read().unwrap_or_else(|e| e.into_inner());
        types.get(name).copied()
    }
}

/// [`TypeRef`] fields stored as their name and resolved through a registry.
#[derive(Debug, Clone)]
pub struct TypeRefConverter {
    registry: Arc<TypeRegistry>,
}

impl TypeRefConverter {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }
}

impl Converter<TypeRef> for TypeRefConverter {
    fn to_storage(&self, value: &TypeRef) -> OrmResult<Value> {
        Ok(Value::Text(value.name.to_string()))
    }

    fn from_value(&self, value: &Value, column: &str) -> OrmResult<TypeRef> {
        let name = text_or_null(value, column)?
            .ok_or_else(|| OrmError::decode(column, "unexpected null"))?;
        self.registry
            .resolve(name)
            .ok_or_else(|| OrmError::conversion(format!("unknown type '{name}' in column {column}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::FieldType;

    struct Invoice;
    struct CreditNote;

    #[test]
    fn resolves_registered_names() {
        let registry = Arc::new(TypeRegistry::new());
        registry.register(TypeRef::named::<Invoice>("billing.Invoice"));
        let conv = TypeRefConverter::new(registry.clone());

        let stored = conv.to_storage(&TypeRef::named::<Invoice>("billing.Invoice")).unwrap();
        assert_eq!(stored, Value::from("billing.Invoice"));
        assert!(conv.from_value(&stored, "kind").unwrap().is::<Invoice>());

        let err = conv.from_value(&Value::from("billing.CreditNote"), "kind").unwrap_err();
        assert!(matches!(err, OrmError::Conversion(_)));
    }

    #[test]
    fn default_converter_uses_global_registry() {
        let type_ref = TypeRegistry::global().register(TypeRef::of::<CreditNote>());
        let conv = TypeRef::default_converter();
        let stored = conv.to_storage(&type_ref).unwrap();
        assert_eq!(conv.from_value(&stored, "kind").unwrap(), type_ref);
    }
}
