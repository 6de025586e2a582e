//! Decoding of complete metadata streams.
//!
//! A metadata stream starts with a varint length-delimited `StringTableTypes`
//! header describing the name table, followed by exactly one record message
//! (class, package part or function) occupying the whole remainder. The
//! [`MetadataReader`] decodes both and pairs the record with the
//! [`JvmNameResolver`] built from the same stream.
//!
//! # Examples
//!
//! ```rust
//! use kmsig::metadata::{read_function_data, NameResolver};
//!
//! #[rustfmt::skip]
//! let data = [
//!     0x00,                   // empty string table header
//!     0x10, 0x00,             // Function { name = 0 }
//! ];
//! let strings = ["run"];
//!
//! let data = read_function_data(&data, &strings)?;
//! assert_eq!(data.names.get_string(data.function.name)?, "run");
//! # Ok::<(), kmsig::Error>(())
//! ```

use strum::{Display, EnumCount, EnumIter, FromRepr};

use crate::{
    encoding::decode_bytes,
    metadata::{
        extensions::ExtensionRegistry,
        nameresolver::JvmNameResolver,
        proto::{Class, Function, Package, ProtoParser, MAX_RECURSION_DEPTH},
        typetable::TypeTable,
    },
    wire::Parser,
    Error, Result,
};

/// The record kinds a metadata stream can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, FromRepr, Display)]
#[repr(u8)]
pub enum RecordKind {
    /// A class, interface, object or enum
    Class = 1,
    /// Top-level declarations of a file or multi-file part
    Package = 2,
    /// A single function, as stored for lambdas
    Function = 3,
}

impl RecordKind {
    /// Map the artifact level kind number to the record kind stored in its stream
    ///
    /// Kind 1 is a class, kinds 2 (file facade) and 5 (multi-file class part) carry a
    /// package record, kind 3 (synthetic class) carries a function record. Multi-file
    /// facades (kind 4) carry no metadata stream.
    #[must_use]
    pub fn from_header_kind(kind: i32) -> Option<Self> {
        match kind {
            1 => Some(RecordKind::Class),
            2 | 5 => Some(RecordKind::Package),
            3 => Some(RecordKind::Function),
            _ => None,
        }
    }
}

/// A decoded class record with its name table
pub struct ClassData<'s, S: AsRef<str>> {
    /// The name table of the stream
    pub names: JvmNameResolver<'s, S>,
    /// The class
    pub class: Class,
}

impl<S: AsRef<str>> ClassData<'_, S> {
    /// The type table of the class
    #[must_use]
    pub fn type_table(&self) -> TypeTable {
        TypeTable::from_optional(self.class.type_table.as_ref())
    }
}

/// A decoded package record with its name table
pub struct PackageData<'s, S: AsRef<str>> {
    /// The name table of the stream
    pub names: JvmNameResolver<'s, S>,
    /// The package part
    pub package: Package,
}

impl<S: AsRef<str>> PackageData<'_, S> {
    /// The type table of the package part
    #[must_use]
    pub fn type_table(&self) -> TypeTable {
        TypeTable::from_optional(self.package.type_table.as_ref())
    }
}

/// A decoded function record with its name table
pub struct FunctionData<'s, S: AsRef<str>> {
    /// The name table of the stream
    pub names: JvmNameResolver<'s, S>,
    /// The function
    pub function: Function,
}

impl<S: AsRef<str>> FunctionData<'_, S> {
    /// The type table the function carries for itself
    #[must_use]
    pub fn type_table(&self) -> TypeTable {
        TypeTable::from_optional(self.function.type_table.as_ref())
    }
}

/// Any decoded record
pub enum MetadataRecord<'s, S: AsRef<str>> {
    /// See [`ClassData`]
    Class(ClassData<'s, S>),
    /// See [`PackageData`]
    Package(PackageData<'s, S>),
    /// See [`FunctionData`]
    Function(FunctionData<'s, S>),
}

impl<'s, S: AsRef<str>> MetadataRecord<'s, S> {
    /// The kind of this record
    #[must_use]
    pub fn kind(&self) -> RecordKind {
        match self {
            MetadataRecord::Class(_) => RecordKind::Class,
            MetadataRecord::Package(_) => RecordKind::Package,
            MetadataRecord::Function(_) => RecordKind::Function,
        }
    }

    /// The name table of the stream
    #[must_use]
    pub fn names(&self) -> &JvmNameResolver<'s, S> {
        match self {
            MetadataRecord::Class(data) => &data.names,
            MetadataRecord::Package(data) => &data.names,
            MetadataRecord::Function(data) => &data.names,
        }
    }
}

/// Configurable decoder for metadata streams
///
/// # Examples
///
/// ```rust
/// use kmsig::metadata::{ExtensionRegistry, MetadataReader, RecordKind};
///
/// let reader = MetadataReader::new()
///     .with_registry(ExtensionRegistry::empty())
///     .with_recursion_limit(16);
///
/// let strings = ["Foo"];
/// // empty header, Class { fq_name = 0 }
/// let record = reader.read(RecordKind::Class, &[0x00, 0x18, 0x00], &strings)?;
/// assert_eq!(record.kind(), RecordKind::Class);
/// # Ok::<(), kmsig::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataReader {
    registry: ExtensionRegistry,
    recursion_limit: usize,
}

impl Default for MetadataReader {
    fn default() -> Self {
        Self {
            registry: ExtensionRegistry::jvm(),
            recursion_limit: MAX_RECURSION_DEPTH,
        }
    }
}

impl MetadataReader {
    /// Reader interpreting all JVM extensions with the default nesting limit
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `registry` to select the interpreted extensions
    #[must_use]
    pub fn with_registry(mut self, registry: ExtensionRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Fail decoding once embedded messages nest deeper than `limit`
    #[must_use]
    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// The interpreted extensions
    #[must_use]
    pub fn registry(&self) -> ExtensionRegistry {
        self.registry
    }

    /// The nesting limit
    #[must_use]
    pub fn recursion_limit(&self) -> usize {
        self.recursion_limit
    }

    fn proto<'d>(&self, data: &'d [u8]) -> ProtoParser<'d> {
        ProtoParser::new(data, self.registry).with_recursion_limit(self.recursion_limit)
    }

    /// Decode the string table header and return the name table plus the record bytes
    fn header<'d, 's, S: AsRef<str>>(
        &self,
        data: &'d [u8],
        strings: &'s [S],
    ) -> Result<(JvmNameResolver<'s, S>, &'d [u8])> {
        if data.is_empty() {
            return Err(malformed_error!("Metadata stream has no string table header"));
        }

        let mut parser = Parser::new(data);
        let header = parser.read_length_delimited()?;
        let types = self.proto(header).parse_string_table_types()?;

        Ok((JvmNameResolver::new(types, strings), parser.rest()))
    }

    /// Decode a stream holding a class record
    ///
    /// ## Arguments
    /// * 'data'    - The metadata bytes
    /// * 'strings' - The raw string array stored next to the metadata
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the stream is empty, truncated or its
    /// remainder is no valid class, and [`crate::Error::RecursionLimit`] if it nests
    /// too deeply
    pub fn read_class_data<'s, S: AsRef<str>>(
        &self,
        data: &[u8],
        strings: &'s [S],
    ) -> Result<ClassData<'s, S>> {
        let decode = || -> Result<ClassData<'s, S>> {
            let (names, rest) = self.header(data, strings)?;
            let class = self.proto(rest).parse_class()?;
            Ok(ClassData { names, class })
        };

        let data = decode().map_err(truncation)?;
        log::debug!(
            "decoded class record: {} constructors, {} functions, {} properties",
            data.class.constructor.len(),
            data.class.function.len(),
            data.class.property.len()
        );
        Ok(data)
    }

    /// Decode a stream holding a package record
    ///
    /// ## Arguments
    /// * 'data'    - The metadata bytes
    /// * 'strings' - The raw string array stored next to the metadata
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the stream is empty, truncated or its
    /// remainder is no valid package, and [`crate::Error::RecursionLimit`] if it nests
    /// too deeply
    pub fn read_package_data<'s, S: AsRef<str>>(
        &self,
        data: &[u8],
        strings: &'s [S],
    ) -> Result<PackageData<'s, S>> {
        let decode = || -> Result<PackageData<'s, S>> {
            let (names, rest) = self.header(data, strings)?;
            let package = self.proto(rest).parse_package()?;
            Ok(PackageData { names, package })
        };

        let data = decode().map_err(truncation)?;
        log::debug!(
            "decoded package record: {} functions, {} properties",
            data.package.function.len(),
            data.package.property.len()
        );
        Ok(data)
    }

    /// Decode a stream holding a function record
    ///
    /// ## Arguments
    /// * 'data'    - The metadata bytes
    /// * 'strings' - The raw string array stored next to the metadata
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the stream is empty, truncated or its
    /// remainder is no valid function, and [`crate::Error::RecursionLimit`] if it nests
    /// too deeply
    pub fn read_function_data<'s, S: AsRef<str>>(
        &self,
        data: &[u8],
        strings: &'s [S],
    ) -> Result<FunctionData<'s, S>> {
        let decode = || -> Result<FunctionData<'s, S>> {
            let (names, rest) = self.header(data, strings)?;
            let function = self.proto(rest).parse_function()?;
            Ok(FunctionData { names, function })
        };

        let data = decode().map_err(truncation)?;
        log::debug!(
            "decoded function record: {} value parameters",
            data.function.value_parameter.len()
        );
        Ok(data)
    }

    /// Decode a stream holding a record of the given kind
    ///
    /// # Errors
    /// See [`MetadataReader::read_class_data`]
    pub fn read<'s, S: AsRef<str>>(
        &self,
        kind: RecordKind,
        data: &[u8],
        strings: &'s [S],
    ) -> Result<MetadataRecord<'s, S>> {
        Ok(match kind {
            RecordKind::Class => MetadataRecord::Class(self.read_class_data(data, strings)?),
            RecordKind::Package => MetadataRecord::Package(self.read_package_data(data, strings)?),
            RecordKind::Function => {
                MetadataRecord::Function(self.read_function_data(data, strings)?)
            }
        })
    }

    /// Decode the string pool encoded `data`, then a class record
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `data` is no valid string pool encoding,
    /// else see [`MetadataReader::read_class_data`]
    pub fn read_class_data_from_strings<'s, E: AsRef<str>, S: AsRef<str>>(
        &self,
        data: &[E],
        strings: &'s [S],
    ) -> Result<ClassData<'s, S>> {
        self.read_class_data(&decode_bytes(data)?, strings)
    }

    /// Decode the string pool encoded `data`, then a package record
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `data` is no valid string pool encoding,
    /// else see [`MetadataReader::read_package_data`]
    pub fn read_package_data_from_strings<'s, E: AsRef<str>, S: AsRef<str>>(
        &self,
        data: &[E],
        strings: &'s [S],
    ) -> Result<PackageData<'s, S>> {
        self.read_package_data(&decode_bytes(data)?, strings)
    }

    /// Decode the string pool encoded `data`, then a function record
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `data` is no valid string pool encoding,
    /// else see [`MetadataReader::read_function_data`]
    pub fn read_function_data_from_strings<'s, E: AsRef<str>, S: AsRef<str>>(
        &self,
        data: &[E],
        strings: &'s [S],
    ) -> Result<FunctionData<'s, S>> {
        self.read_function_data(&decode_bytes(data)?, strings)
    }
}

/// Report reads past the end of the stream as malformed metadata
fn truncation(error: Error) -> Error {
    match error {
        Error::OutOfBounds => malformed_error!("Metadata stream is truncated"),
        other => other,
    }
}

/// Decode a class record with a default [`MetadataReader`]
///
/// # Errors
/// See [`MetadataReader::read_class_data`]
pub fn read_class_data<'s, S: AsRef<str>>(
    data: &[u8],
    strings: &'s [S],
) -> Result<ClassData<'s, S>> {
    MetadataReader::default().read_class_data(data, strings)
}

/// Decode a package record with a default [`MetadataReader`]
///
/// # Errors
/// See [`MetadataReader::read_package_data`]
pub fn read_package_data<'s, S: AsRef<str>>(
    data: &[u8],
    strings: &'s [S],
) -> Result<PackageData<'s, S>> {
    MetadataReader::default().read_package_data(data, strings)
}

/// Decode a function record with a default [`MetadataReader`]
///
/// # Errors
/// See [`MetadataReader::read_function_data`]
pub fn read_function_data<'s, S: AsRef<str>>(
    data: &[u8],
    strings: &'s [S],
) -> Result<FunctionData<'s, S>> {
    MetadataReader::default().read_function_data(data, strings)
}

/// Decode the string pool encoded `data`, then a class record, with a default [`MetadataReader`]
///
/// # Errors
/// See [`MetadataReader::read_class_data_from_strings`]
pub fn read_class_data_from_strings<'s, E: AsRef<str>, S: AsRef<str>>(
    data: &[E],
    strings: &'s [S],
) -> Result<ClassData<'s, S>> {
    MetadataReader::default().read_class_data_from_strings(data, strings)
}

/// Decode the string pool encoded `data`, then a package record, with a default [`MetadataReader`]
///
/// # Errors
/// See [`MetadataReader::read_package_data_from_strings`]
pub fn read_package_data_from_strings<'s, E: AsRef<str>, S: AsRef<str>>(
    data: &[E],
    strings: &'s [S],
) -> Result<PackageData<'s, S>> {
    MetadataReader::default().read_package_data_from_strings(data, strings)
}

/// Decode the string pool encoded `data`, then a function record, with a default [`MetadataReader`]
///
/// # Errors
/// See [`MetadataReader::read_function_data_from_strings`]
pub fn read_function_data_from_strings<'s, E: AsRef<str>, S: AsRef<str>>(
    data: &[E],
    strings: &'s [S],
) -> Result<FunctionData<'s, S>> {
    MetadataReader::default().read_function_data_from_strings(data, strings)
}
