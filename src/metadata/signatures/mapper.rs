use crate::{
    metadata::{nameresolver::NameResolver, proto::Type, signatures::classmapper::map_class},
    Error::{UnmappableType, UnresolvedIndex},
    Result,
};

/// Maps a metadata type to a JVM descriptor fragment
///
/// Implementations report types they can not map with
/// [`crate::Error::UnmappableType`]; signature synthesis turns that into an absent
/// signature. Any other error aborts the synthesis.
pub trait TypeMapper {
    /// Map `ty`, resolving names through `names`
    ///
    /// # Errors
    /// Returns [`crate::Error::UnmappableType`] if the type has no descriptor
    fn map_type(&self, ty: &Type, names: &dyn NameResolver) -> Result<String>;
}

/// Fallback refusing every type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoFallback;

impl TypeMapper for NoFallback {
    fn map_type(&self, ty: &Type, _names: &dyn NameResolver) -> Result<String> {
        let what = if let Some(id) = ty.type_parameter {
            format!("type parameter {id}")
        } else if let Some(name) = ty.type_parameter_name {
            format!("type parameter name {name}")
        } else if let Some(name) = ty.type_alias_name {
            format!("type alias {name}")
        } else {
            "type without classifier".to_string()
        };
        Err(UnmappableType(what))
    }
}

/// Maps class types through the class identifier table, other types through `F`
///
/// # Examples
///
/// ```rust
/// use kmsig::metadata::{
///     proto::{StringTableTypes, Type},
///     signatures::{DefaultTypeMapper, TypeMapper},
///     JvmNameResolver,
/// };
///
/// let strings = ["kotlin/Boolean"];
/// let names = JvmNameResolver::new(StringTableTypes::default(), &strings);
/// let ty = Type { class_name: Some(0), ..Type::default() };
///
/// assert_eq!(DefaultTypeMapper::new().map_type(&ty, &names)?, "Z");
/// # Ok::<(), kmsig::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultTypeMapper<F = NoFallback> {
    fallback: F,
}

impl DefaultTypeMapper {
    /// Mapper without fallback for non-class types
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: TypeMapper> DefaultTypeMapper<F> {
    /// Mapper delegating non-class types to `fallback`
    #[must_use]
    pub fn with_fallback(fallback: F) -> Self {
        DefaultTypeMapper { fallback }
    }
}

impl<F: TypeMapper> TypeMapper for DefaultTypeMapper<F> {
    fn map_type(&self, ty: &Type, names: &dyn NameResolver) -> Result<String> {
        let Some(class_name) = ty.class_name else {
            return self.fallback.map_type(ty, names);
        };

        let class_id = names.get_class_id(class_name).map_err(|error| match error {
            UnresolvedIndex(index) => UnmappableType(format!("unresolved class name {index}")),
            other => other,
        })?;

        map_class(&class_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::{nameresolver::JvmNameResolver, proto::StringTableTypes},
        Error,
    };

    struct Erased;

    impl TypeMapper for Erased {
        fn map_type(&self, _ty: &Type, _names: &dyn NameResolver) -> Result<String> {
            Ok("Ljava/lang/Object;".to_string())
        }
    }

    fn class_type(name: i32) -> Type {
        Type {
            class_name: Some(name),
            ..Type::default()
        }
    }

    #[test]
    fn class_types() {
        let strings = [
            "kotlin/Int",
            "com/example/Foo.Bar",
            "kotlin/collections/MutableMap.MutableEntry",
        ];
        let names = JvmNameResolver::new(StringTableTypes::default(), &strings);
        let mapper = DefaultTypeMapper::new();

        assert_eq!(mapper.map_type(&class_type(0), &names).unwrap(), "I");
        assert_eq!(
            mapper.map_type(&class_type(1), &names).unwrap(),
            "Lcom/example/Foo$Bar;"
        );
        assert_eq!(
            mapper.map_type(&class_type(2), &names).unwrap(),
            "Ljava/util/Map$Entry;"
        );
    }

    #[test]
    fn unresolved_class_is_unmappable() {
        let strings: [&str; 0] = [];
        let names = JvmNameResolver::new(StringTableTypes::default(), &strings);

        assert!(matches!(
            DefaultTypeMapper::new().map_type(&class_type(3), &names),
            Err(Error::UnmappableType(_))
        ));
    }

    #[test]
    fn fallback() {
        let strings: [&str; 0] = [];
        let names = JvmNameResolver::new(StringTableTypes::default(), &strings);
        let parameter = Type {
            type_parameter: Some(0),
            ..Type::default()
        };

        assert!(matches!(
            DefaultTypeMapper::new().map_type(&parameter, &names),
            Err(Error::UnmappableType(_))
        ));
        assert_eq!(
            DefaultTypeMapper::with_fallback(Erased)
                .map_type(&parameter, &names)
                .unwrap(),
            "Ljava/lang/Object;"
        );
    }
}
