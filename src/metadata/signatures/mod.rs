//! JVM signature synthesis for metadata members.
//!
//! Every function, constructor and property described by the metadata corresponds to
//! one or more JVM members. This module computes their binary signatures:
//!
//! - **Methods** - `name(params)ret`, e.g. `equals(Ljava/lang/Object;)Z`
//! - **Constructors** - `<init>(params)V`
//! - **Fields** - a [`PropertySignature`] pair of name and descriptor, e.g. `("myValue", "I")`
//!
//! # Overrides first
//!
//! The compiler records an explicit JVM name and/or descriptor whenever the default
//! derivation would be wrong (mangled names, erased generics, `@JvmName`, ...). Those
//! overrides always win. Without one the descriptor is derived from the declared
//! types: the extension receiver first, then the value parameters in order, then the
//! return type, each mapped by a [`TypeMapper`].
//!
//! Override granularity differs per member kind:
//!
//! - Functions honour the override name and descriptor independently.
//! - Constructors are always named `<init>` and only honour the override descriptor.
//! - Fields require the property signature extension; without it no signature exists.
//!
//! # Absent vs. failed
//!
//! All operations return `Result<Option<_>>`. `Ok(None)` means no signature is
//! derivable because a type can not be mapped. `Err` reports metadata that is
//! inconsistent: unresolvable name indices, or type references the type table does
//! not hold.
//!
//! # Examples
//!
//! ```rust
//! use kmsig::metadata::{
//!     proto::{Function, StringTableTypes, Type, ValueParameter},
//!     signatures::jvm_method_signature,
//!     JvmNameResolver, TypeTable,
//! };
//!
//! let strings = ["equals", "kotlin/Any", "kotlin/Boolean", "other"];
//! let names = JvmNameResolver::new(StringTableTypes::default(), &strings);
//! let class = |name| Type { class_name: Some(name), ..Type::default() };
//!
//! let function = Function {
//!     name: 0,
//!     value_parameter: vec![ValueParameter {
//!         name: 3,
//!         ty: Some(class(1)),
//!         ..ValueParameter::default()
//!     }],
//!     return_type: Some(class(2)),
//!     ..Function::default()
//! };
//!
//! let signature = jvm_method_signature(&function, &names, &TypeTable::default())?;
//! assert_eq!(signature.as_deref(), Some("equals(Ljava/lang/Object;)Z"));
//! # Ok::<(), kmsig::Error>(())
//! ```

mod classmapper;
mod mapper;

pub use classmapper::map_class;
pub use mapper::{DefaultTypeMapper, NoFallback, TypeMapper};

use std::{fmt, slice};

use crate::{
    metadata::{
        nameresolver::NameResolver,
        proto::{Constructor, Function, JvmMethodSignature, Property, Type},
        reader::{ClassData, FunctionData, PackageData},
        typetable::TypeTable,
    },
    Error::UnmappableType,
    Result,
};

/// JVM name and descriptor of a property's backing field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertySignature {
    /// The field name
    pub name: String,
    /// The field descriptor
    pub desc: String,
}

impl fmt::Display for PropertySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.desc)
    }
}

/// Signature of a single JVM member
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemberSignature {
    /// `<init>(params)V`
    Constructor(String),
    /// `name(params)ret`
    Method(String),
    /// A backing field
    Field(PropertySignature),
}

impl fmt::Display for MemberSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberSignature::Constructor(signature) | MemberSignature::Method(signature) => {
                write!(f, "{signature}")
            }
            MemberSignature::Field(signature) => write!(f, "{signature}"),
        }
    }
}

/// A decoded record whose members can be enumerated
pub trait Members {
    /// The name table of the record
    fn names(&self) -> &dyn NameResolver;
    /// The type table of the record
    fn type_table(&self) -> TypeTable;
    /// Declared constructors
    fn constructors(&self) -> &[Constructor];
    /// Declared functions
    fn functions(&self) -> &[Function];
    /// Declared properties
    fn properties(&self) -> &[Property];
}

impl<S: AsRef<str>> Members for ClassData<'_, S> {
    fn names(&self) -> &dyn NameResolver {
        &self.names
    }

    fn type_table(&self) -> TypeTable {
        ClassData::type_table(self)
    }

    fn constructors(&self) -> &[Constructor] {
        &self.class.constructor
    }

    fn functions(&self) -> &[Function] {
        &self.class.function
    }

    fn properties(&self) -> &[Property] {
        &self.class.property
    }
}

impl<S: AsRef<str>> Members for PackageData<'_, S> {
    fn names(&self) -> &dyn NameResolver {
        &self.names
    }

    fn type_table(&self) -> TypeTable {
        PackageData::type_table(self)
    }

    fn constructors(&self) -> &[Constructor] {
        &[]
    }

    fn functions(&self) -> &[Function] {
        &self.package.function
    }

    fn properties(&self) -> &[Property] {
        &self.package.property
    }
}

impl<S: AsRef<str>> Members for FunctionData<'_, S> {
    fn names(&self) -> &dyn NameResolver {
        &self.names
    }

    fn type_table(&self) -> TypeTable {
        FunctionData::type_table(self)
    }

    fn constructors(&self) -> &[Constructor] {
        &[]
    }

    fn functions(&self) -> &[Function] {
        slice::from_ref(&self.function)
    }

    fn properties(&self) -> &[Property] {
        &[]
    }
}

/// All derivable member signatures of a record, in declaration order
///
/// Constructors come first, then functions, then properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberSignatures {
    signatures: Vec<MemberSignature>,
}

impl MemberSignatures {
    /// Compute the signatures of every member of `data`
    ///
    /// Members without a derivable signature are skipped.
    ///
    /// # Errors
    /// Returns an error if any member references unresolvable names or types
    pub fn collect<M: TypeMapper>(
        synthesizer: &SignatureSynthesizer<M>,
        data: &impl Members,
    ) -> Result<Self> {
        let names = data.names();
        let table = data.type_table();
        let mut signatures = Vec::new();

        for constructor in data.constructors() {
            if let Some(signature) =
                synthesizer.constructor_signature(constructor, names, &table)?
            {
                signatures.push(MemberSignature::Constructor(signature));
            }
        }

        for function in data.functions() {
            if let Some(signature) = synthesizer.method_signature(function, names, &table)? {
                signatures.push(MemberSignature::Method(signature));
            }
        }

        for property in data.properties() {
            if let Some(signature) = synthesizer.field_signature(property, names, &table)? {
                signatures.push(MemberSignature::Field(signature));
            }
        }

        Ok(MemberSignatures { signatures })
    }

    /// Iterate over the signatures
    pub fn iter(&self) -> impl Iterator<Item = &MemberSignature> {
        self.signatures.iter()
    }

    /// Number of signatures
    #[must_use]
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    /// Returns `true` if no member had a derivable signature
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

impl IntoIterator for MemberSignatures {
    type Item = MemberSignature;
    type IntoIter = std::vec::IntoIter<MemberSignature>;

    fn into_iter(self) -> Self::IntoIter {
        self.signatures.into_iter()
    }
}

/// Turn an unmappable type into an absent result
fn soft<T>(member: fmt::Arguments<'_>, result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(UnmappableType(ty)) => {
            log::debug!("no JVM signature for {member}: {ty} can not be mapped");
            Ok(None)
        }
        Err(error) => Err(error),
    }
}

/// Override-first JVM signature computation
///
/// `M` maps types to descriptor fragments when no override is present.
#[derive(Debug, Clone, Default)]
pub struct SignatureSynthesizer<M = DefaultTypeMapper> {
    mapper: M,
}

impl SignatureSynthesizer {
    /// Synthesizer using the [`DefaultTypeMapper`]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: TypeMapper> SignatureSynthesizer<M> {
    /// Synthesizer using `mapper` for type derived descriptors
    #[must_use]
    pub fn with_mapper(mapper: M) -> Self {
        SignatureSynthesizer { mapper }
    }

    /// The type mapper
    #[must_use]
    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    /// `(` + mapped parameters + `)`
    fn parameters(&self, parameters: &[&Type], names: &dyn NameResolver) -> Result<String> {
        let mut desc = String::from("(");
        for parameter in parameters {
            desc.push_str(&self.mapper.map_type(parameter, names)?);
        }
        desc.push(')');
        Ok(desc)
    }

    /// Compute the JVM method signature of a function
    ///
    /// ## Arguments
    /// * 'function' - The function
    /// * 'names'    - The name table of the stream the function was decoded from
    /// * 'table'    - The type table of the enclosing record
    ///
    /// # Errors
    /// Returns [`crate::Error::UnresolvedIndex`] for unresolvable name indices and
    /// [`crate::Error::Malformed`] for missing or dangling type references
    pub fn method_signature(
        &self,
        function: &Function,
        names: &dyn NameResolver,
        table: &TypeTable,
    ) -> Result<Option<String>> {
        let signature = function.method_signature.unwrap_or_default();

        let desc = if let Some(desc) = signature.desc {
            names.get_string(desc)?
        } else {
            let mut parameters = Vec::with_capacity(function.value_parameter.len() + 1);
            if let Some(receiver) = function.receiver_type(table)? {
                parameters.push(receiver);
            }
            for parameter in &function.value_parameter {
                parameters.push(parameter.parameter_type(table)?);
            }

            let derived = || -> Result<String> {
                let mut desc = self.parameters(&parameters, names)?;
                desc.push_str(&self.mapper.map_type(function.return_type(table)?, names)?);
                Ok(desc)
            };

            match soft(format_args!("function {}", function.name), derived())? {
                Some(desc) => desc,
                None => return Ok(None),
            }
        };

        let name = names.get_string(signature.name.unwrap_or(function.name))?;
        Ok(Some(name + &desc))
    }

    /// Compute the JVM signature of a constructor
    ///
    /// # Errors
    /// Returns [`crate::Error::UnresolvedIndex`] for unresolvable name indices and
    /// [`crate::Error::Malformed`] for missing or dangling type references
    pub fn constructor_signature(
        &self,
        constructor: &Constructor,
        names: &dyn NameResolver,
        table: &TypeTable,
    ) -> Result<Option<String>> {
        let desc = if let Some(desc) = constructor.constructor_signature.and_then(|s| s.desc) {
            names.get_string(desc)?
        } else {
            let parameters = constructor
                .value_parameter
                .iter()
                .map(|parameter| parameter.parameter_type(table))
                .collect::<Result<Vec<_>>>()?;

            match soft(
                format_args!("constructor"),
                self.parameters(&parameters, names),
            )? {
                Some(desc) => desc + "V",
                None => return Ok(None),
            }
        };

        Ok(Some(format!("<init>{desc}")))
    }

    /// Compute the JVM signature of a property's backing field
    ///
    /// # Errors
    /// Returns [`crate::Error::UnresolvedIndex`] for unresolvable name indices and
    /// [`crate::Error::Malformed`] for missing or dangling type references
    pub fn field_signature(
        &self,
        property: &Property,
        names: &dyn NameResolver,
        table: &TypeTable,
    ) -> Result<Option<PropertySignature>> {
        let Some(signature) = property.property_signature else {
            log::debug!(
                "no JVM signature for property {}: no signature extension",
                property.name
            );
            return Ok(None);
        };
        let field = signature.field.unwrap_or_default();

        let desc = if let Some(desc) = field.desc {
            names.get_string(desc)?
        } else {
            let mapped = property
                .return_type(table)
                .and_then(|ty| self.mapper.map_type(ty, names));
            match soft(format_args!("property {}", property.name), mapped)? {
                Some(desc) => desc,
                None => return Ok(None),
            }
        };

        let name = names.get_string(field.name.unwrap_or(property.name))?;
        Ok(Some(PropertySignature { name, desc }))
    }

    /// Compute the JVM signature of a property's getter
    ///
    /// Only an explicit getter signature carrying both name and descriptor yields a result.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnresolvedIndex`] for unresolvable name indices
    pub fn getter_signature(
        &self,
        property: &Property,
        names: &dyn NameResolver,
    ) -> Result<Option<String>> {
        accessor(property.property_signature.and_then(|s| s.getter), names)
    }

    /// Compute the JVM signature of a property's setter
    ///
    /// Only an explicit setter signature carrying both name and descriptor yields a result.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnresolvedIndex`] for unresolvable name indices
    pub fn setter_signature(
        &self,
        property: &Property,
        names: &dyn NameResolver,
    ) -> Result<Option<String>> {
        accessor(property.property_signature.and_then(|s| s.setter), names)
    }

    /// Compute the JVM signature of the synthetic method holding a property's annotations
    ///
    /// # Errors
    /// Returns [`crate::Error::UnresolvedIndex`] for unresolvable name indices
    pub fn synthetic_method_signature(
        &self,
        property: &Property,
        names: &dyn NameResolver,
    ) -> Result<Option<String>> {
        accessor(
            property.property_signature.and_then(|s| s.synthetic_method),
            names,
        )
    }
}

fn accessor(
    signature: Option<JvmMethodSignature>,
    names: &dyn NameResolver,
) -> Result<Option<String>> {
    match signature {
        Some(JvmMethodSignature {
            name: Some(name),
            desc: Some(desc),
        }) => Ok(Some(names.get_string(name)? + &names.get_string(desc)?)),
        _ => Ok(None),
    }
}

/// Compute a method signature with the default synthesizer
///
/// # Errors
/// See [`SignatureSynthesizer::method_signature`]
pub fn jvm_method_signature(
    function: &Function,
    names: &dyn NameResolver,
    table: &TypeTable,
) -> Result<Option<String>> {
    SignatureSynthesizer::new().method_signature(function, names, table)
}

/// Compute a constructor signature with the default synthesizer
///
/// # Errors
/// See [`SignatureSynthesizer::constructor_signature`]
pub fn jvm_constructor_signature(
    constructor: &Constructor,
    names: &dyn NameResolver,
    table: &TypeTable,
) -> Result<Option<String>> {
    SignatureSynthesizer::new().constructor_signature(constructor, names, table)
}

/// Compute a field signature with the default synthesizer
///
/// # Errors
/// See [`SignatureSynthesizer::field_signature`]
pub fn jvm_field_signature(
    property: &Property,
    names: &dyn NameResolver,
    table: &TypeTable,
) -> Result<Option<PropertySignature>> {
    SignatureSynthesizer::new().field_signature(property, names, table)
}

/// Compute a getter signature from its explicit override
///
/// # Errors
/// See [`SignatureSynthesizer::getter_signature`]
pub fn jvm_getter_signature(
    property: &Property,
    names: &dyn NameResolver,
) -> Result<Option<String>> {
    SignatureSynthesizer::new().getter_signature(property, names)
}

/// Compute a setter signature from its explicit override
///
/// # Errors
/// See [`SignatureSynthesizer::setter_signature`]
pub fn jvm_setter_signature(
    property: &Property,
    names: &dyn NameResolver,
) -> Result<Option<String>> {
    SignatureSynthesizer::new().setter_signature(property, names)
}

/// Compute the signature of a property's synthetic annotation holder
///
/// # Errors
/// See [`SignatureSynthesizer::synthetic_method_signature`]
pub fn jvm_synthetic_method_signature(
    property: &Property,
    names: &dyn NameResolver,
) -> Result<Option<String>> {
    SignatureSynthesizer::new().synthetic_method_signature(property, names)
}
