//! Types referenced by id.
//!
//! Instead of repeating a type inline, messages may reference it by position in the
//! type table of the enclosing class, package or function. A [`TypeTable`] resolves
//! those ids and applies the `first_nullable` convention: every type at or beyond
//! that position is nullable.

use crate::{
    metadata::proto::{Function, Property, Type, TypeTableRaw, ValueParameter},
    Result,
};

/// Resolved view of a serialized type table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeTable {
    types: Vec<Type>,
}

impl TypeTable {
    /// Build a table from its serialized form
    #[must_use]
    pub fn new(raw: &TypeTableRaw) -> Self {
        let first_nullable = raw
            .first_nullable
            .and_then(|index| usize::try_from(index).ok())
            .unwrap_or(usize::MAX);

        let types = raw
            .types
            .iter()
            .enumerate()
            .map(|(index, ty)| {
                let mut ty = ty.clone();
                if index >= first_nullable {
                    ty.nullable = true;
                }
                ty
            })
            .collect();

        TypeTable { types }
    }

    /// Build a table from an optional serialized form, empty when absent
    #[must_use]
    pub fn from_optional(raw: Option<&TypeTableRaw>) -> Self {
        raw.map(Self::new).unwrap_or_default()
    }

    /// Look up the type with the given id
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the id is outside the table
    pub fn get(&self, id: i32) -> Result<&Type> {
        usize::try_from(id)
            .ok()
            .and_then(|index| self.types.get(index))
            .ok_or_else(|| {
                malformed_error!(
                    "Type id {} outside of type table ({} types)",
                    id,
                    self.types.len()
                )
            })
    }

    /// Number of types in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if the table holds no types
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Pick the inline type, else the referenced one
fn resolve<'a>(
    inline: Option<&'a Type>,
    id: Option<i32>,
    table: &'a TypeTable,
) -> Result<Option<&'a Type>> {
    match (inline, id) {
        (Some(ty), _) => Ok(Some(ty)),
        (None, Some(id)) => table.get(id).map(Some),
        (None, None) => Ok(None),
    }
}

impl Function {
    /// The return type, inline or through `table`
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the function has no return type or its
    /// id is outside the table
    pub fn return_type<'a>(&'a self, table: &'a TypeTable) -> Result<&'a Type> {
        resolve(self.return_type.as_ref(), self.return_type_id, table)?
            .ok_or_else(|| malformed_error!("Function {} has no return type", self.name))
    }

    /// The extension receiver type, if any
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the receiver id is outside the table
    pub fn receiver_type<'a>(&'a self, table: &'a TypeTable) -> Result<Option<&'a Type>> {
        resolve(self.receiver_type.as_ref(), self.receiver_type_id, table)
    }
}

impl Property {
    /// The property type, inline or through `table`
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the property has no type or its id is
    /// outside the table
    pub fn return_type<'a>(&'a self, table: &'a TypeTable) -> Result<&'a Type> {
        resolve(self.return_type.as_ref(), self.return_type_id, table)?
            .ok_or_else(|| malformed_error!("Property {} has no return type", self.name))
    }

    /// The extension receiver type, if any
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the receiver id is outside the table
    pub fn receiver_type<'a>(&'a self, table: &'a TypeTable) -> Result<Option<&'a Type>> {
        resolve(self.receiver_type.as_ref(), self.receiver_type_id, table)
    }
}

impl ValueParameter {
    /// The parameter type, inline or through `table`
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the parameter has no type or its id is
    /// outside the table
    pub fn parameter_type<'a>(&'a self, table: &'a TypeTable) -> Result<&'a Type> {
        resolve(self.ty.as_ref(), self.type_id, table)?
            .ok_or_else(|| malformed_error!("Value parameter {} has no type", self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn class_type(name: i32) -> Type {
        Type {
            class_name: Some(name),
            ..Type::default()
        }
    }

    #[test]
    fn first_nullable() {
        let raw = TypeTableRaw {
            types: vec![class_type(0), class_type(1), class_type(2)],
            first_nullable: Some(1),
        };
        let table = TypeTable::new(&raw);

        assert_eq!(table.len(), 3);
        assert!(!table.get(0).unwrap().nullable);
        assert!(table.get(1).unwrap().nullable);
        assert!(table.get(2).unwrap().nullable);
        assert!(matches!(table.get(3), Err(Error::Malformed { .. })));
        assert!(matches!(table.get(-1), Err(Error::Malformed { .. })));
    }

    #[test]
    fn no_first_nullable() {
        let raw = TypeTableRaw {
            types: vec![class_type(0)],
            first_nullable: None,
        };
        assert!(!TypeTable::new(&raw).get(0).unwrap().nullable);
        assert!(TypeTable::from_optional(None).is_empty());
    }

    #[test]
    fn inline_wins_over_id() {
        let table = TypeTable::new(&TypeTableRaw {
            types: vec![class_type(7)],
            first_nullable: None,
        });

        let function = Function {
            return_type: Some(class_type(3)),
            return_type_id: Some(0),
            receiver_type_id: Some(0),
            ..Function::default()
        };
        assert_eq!(function.return_type(&table).unwrap().class_name, Some(3));
        assert_eq!(
            function.receiver_type(&table).unwrap().unwrap().class_name,
            Some(7)
        );

        let parameter = ValueParameter {
            type_id: Some(0),
            ..ValueParameter::default()
        };
        assert_eq!(
            parameter.parameter_type(&table).unwrap().class_name,
            Some(7)
        );
    }

    #[test]
    fn missing_types() {
        let table = TypeTable::default();

        assert!(matches!(
            Function::default().return_type(&table),
            Err(Error::Malformed { .. })
        ));
        assert!(Function::default().receiver_type(&table).unwrap().is_none());
        assert!(matches!(
            Property::default().return_type(&table),
            Err(Error::Malformed { .. })
        ));
        assert!(matches!(
            ValueParameter {
                type_id: Some(4),
                ..ValueParameter::default()
            }
            .parameter_type(&table),
            Err(Error::Malformed { .. })
        ));
    }
}
