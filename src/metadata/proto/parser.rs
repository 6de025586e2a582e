use crate::{
    metadata::{
        extensions::{ExtensionRegistry, JvmExtensions},
        proto::{
            Class, Constructor, EnumEntry, Function, JvmFieldSignature, JvmMethodSignature,
            JvmPropertySignature, Operation, Package, Projection, Property, Record,
            StringTableTypes, Type, TypeAlias, TypeArgument, TypeParameter, TypeTableRaw,
            ValueParameter, Variance,
        },
    },
    wire::{
        read_repeated_int32, skip_field, FieldKey, Parser,
        WireType::{LengthDelimited, Varint},
    },
    Error::RecursionLimit,
    Result,
};

/// Default maximum nesting depth of embedded messages
pub const MAX_RECURSION_DEPTH: usize = 100;

/// Message parser for the metadata protobuf schema
///
/// Every `parse_*` method consumes the parser's whole input as one message of the
/// respective kind. Embedded messages are decoded by child parsers over their
/// length-delimited payload, one nesting level deeper.
///
/// # Example
///
/// ```rust
/// use kmsig::metadata::{proto::ProtoParser, ExtensionRegistry};
///
/// // Function { name = 3 }
/// let data = &[0x10, 0x03];
/// let mut parser = ProtoParser::new(data, ExtensionRegistry::jvm());
/// let function = parser.parse_function().unwrap();
/// assert_eq!(function.name, 3);
/// ```
///
/// ## Notes:
/// - Fields unknown to the schema, extensions not enabled in the [`ExtensionRegistry`] and
///   known fields arriving with an unexpected wire type are skipped.
/// - A singular field present more than once keeps its last value.
/// - Do not re-use a parser instance for multiple messages.
pub struct ProtoParser<'a> {
    parser: Parser<'a>,
    registry: ExtensionRegistry,
    depth: usize,
    limit: usize,
}

impl<'a> ProtoParser<'a> {
    /// Create a new `ProtoParser` from a byte slice
    ///
    /// ## Arguments
    /// * 'data'     - The byte slice holding one encoded message
    /// * 'registry' - The extensions to interpret
    #[must_use]
    pub fn new(data: &'a [u8], registry: ExtensionRegistry) -> Self {
        ProtoParser {
            parser: Parser::new(data),
            registry,
            depth: 0,
            limit: MAX_RECURSION_DEPTH,
        }
    }

    /// Override the maximum nesting depth of embedded messages
    #[must_use]
    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    fn next_key(&mut self) -> Result<Option<FieldKey>> {
        if !self.parser.has_more_data() {
            return Ok(None);
        }
        FieldKey::read(&mut self.parser).map(Some)
    }

    fn skip(&mut self, key: FieldKey) -> Result<()> {
        log::trace!(
            "skipping field {} ({}) at offset {}",
            key.number,
            key.wire_type,
            self.parser.pos()
        );
        skip_field(&mut self.parser, key, self.depth, self.limit)
    }

    fn enabled(&self, extension: JvmExtensions) -> bool {
        self.registry.contains(extension)
    }

    /// Decode the length-delimited payload at the cursor as an embedded message
    fn nested<T>(&mut self, parse: impl FnOnce(&mut ProtoParser<'a>) -> Result<T>) -> Result<T> {
        let payload = self.parser.read_length_delimited()?;
        if self.depth + 1 >= self.limit {
            return Err(RecursionLimit(self.limit));
        }

        let mut inner = ProtoParser {
            parser: Parser::new(payload),
            registry: self.registry,
            depth: self.depth + 1,
            limit: self.limit,
        };
        parse(&mut inner)
    }

    fn int32(&mut self) -> Result<i32> {
        self.parser.read_int32()
    }

    /// Parse a `Type` message
    ///
    /// # Errors
    /// Returns an error if the message is truncated or nested too deeply
    pub fn parse_type(&mut self) -> Result<Type> {
        let mut ty = Type::default();

        while let Some(key) = self.next_key()? {
            match (key.number, key.wire_type) {
                (1, Varint) => ty.flags = self.int32()?,
                (2, LengthDelimited) => ty.argument.push(self.nested(Self::parse_type_argument)?),
                (3, Varint) => ty.nullable = self.parser.read_bool()?,
                (4, Varint) => ty.flexible_type_capabilities_id = Some(self.int32()?),
                (5, LengthDelimited) => {
                    ty.flexible_upper_bound = Some(Box::new(self.nested(Self::parse_type)?));
                }
                (6, Varint) => ty.class_name = Some(self.int32()?),
                (7, Varint) => ty.type_parameter = Some(self.int32()?),
                (8, Varint) => ty.flexible_upper_bound_id = Some(self.int32()?),
                (9, Varint) => ty.type_parameter_name = Some(self.int32()?),
                (10, LengthDelimited) => {
                    ty.outer_type = Some(Box::new(self.nested(Self::parse_type)?));
                }
                (11, Varint) => ty.outer_type_id = Some(self.int32()?),
                (12, Varint) => ty.type_alias_name = Some(self.int32()?),
                (13, LengthDelimited) => {
                    ty.abbreviated_type = Some(Box::new(self.nested(Self::parse_type)?));
                }
                (14, Varint) => ty.abbreviated_type_id = Some(self.int32()?),
                (101, Varint) if self.enabled(JvmExtensions::TYPE_IS_RAW) => {
                    ty.is_raw = Some(self.parser.read_bool()?);
                }
                _ => self.skip(key)?,
            }
        }

        Ok(ty)
    }

    fn parse_type_argument(&mut self) -> Result<TypeArgument> {
        let mut argument = TypeArgument::default();

        while let Some(key) = self.next_key()? {
            match (key.number, key.wire_type) {
                (1, Varint) => {
                    if let Some(projection) = Projection::from_repr(self.int32()?) {
                        argument.projection = projection;
                    }
                }
                (2, LengthDelimited) => {
                    argument.ty = Some(Box::new(self.nested(Self::parse_type)?));
                }
                (3, Varint) => argument.type_id = Some(self.int32()?),
                _ => self.skip(key)?,
            }
        }

        Ok(argument)
    }

    /// Parse a `TypeParameter` message
    ///
    /// # Errors
    /// Returns an error if the message is truncated or misses its `id` or `name`
    pub fn parse_type_parameter(&mut self) -> Result<TypeParameter> {
        let mut parameter = TypeParameter::default();
        let mut id = None;
        let mut name = None;

        while let Some(key) = self.next_key()? {
            match (key.number, key.wire_type) {
                (1, Varint) => id = Some(self.int32()?),
                (2, Varint) => name = Some(self.int32()?),
                (3, Varint) => parameter.reified = self.parser.read_bool()?,
                (4, Varint) => {
                    if let Some(variance) = Variance::from_repr(self.int32()?) {
                        parameter.variance = variance;
                    }
                }
                (5, LengthDelimited) => parameter.upper_bound.push(self.nested(Self::parse_type)?),
                (6, Varint | LengthDelimited) => {
                    read_repeated_int32(&mut self.parser, key, &mut parameter.upper_bound_id)?;
                }
                _ => self.skip(key)?,
            }
        }

        parameter.id = required(id, "TypeParameter", "id")?;
        parameter.name = required(name, "TypeParameter", "name")?;
        Ok(parameter)
    }

    /// Parse a `TypeTable` message
    ///
    /// # Errors
    /// Returns an error if the message is truncated or nested too deeply
    pub fn parse_type_table(&mut self) -> Result<TypeTableRaw> {
        let mut table = TypeTableRaw::default();

        while let Some(key) = self.next_key()? {
            match (key.number, key.wire_type) {
                (1, LengthDelimited) => table.types.push(self.nested(Self::parse_type)?),
                (2, Varint) => table.first_nullable = Some(self.int32()?),
                _ => self.skip(key)?,
            }
        }

        Ok(table)
    }

    /// Parse a `ValueParameter` message
    ///
    /// # Errors
    /// Returns an error if the message is truncated or misses its `name`
    pub fn parse_value_parameter(&mut self) -> Result<ValueParameter> {
        let mut parameter = ValueParameter::default();
        let mut name = None;

        while let Some(key) = self.next_key()? {
            match (key.number, key.wire_type) {
                (1, Varint) => parameter.flags = self.int32()?,
                (2, Varint) => name = Some(self.int32()?),
                (3, LengthDelimited) => parameter.ty = Some(self.nested(Self::parse_type)?),
                (4, LengthDelimited) => {
                    parameter.vararg_element_type = Some(self.nested(Self::parse_type)?);
                }
                (5, Varint) => parameter.type_id = Some(self.int32()?),
                (6, Varint) => parameter.vararg_element_type_id = Some(self.int32()?),
                _ => self.skip(key)?,
            }
        }

        parameter.name = required(name, "ValueParameter", "name")?;
        Ok(parameter)
    }

    /// Parse a `Constructor` message
    ///
    /// # Errors
    /// Returns an error if the message or one of its parameters is malformed
    pub fn parse_constructor(&mut self) -> Result<Constructor> {
        let mut constructor = Constructor::default();

        while let Some(key) = self.next_key()? {
            match (key.number, key.wire_type) {
                (1, Varint) => constructor.flags = self.int32()?,
                (2, LengthDelimited) => constructor
                    .value_parameter
                    .push(self.nested(Self::parse_value_parameter)?),
                (100, LengthDelimited) if self.enabled(JvmExtensions::CONSTRUCTOR_SIGNATURE) => {
                    constructor.constructor_signature =
                        Some(self.nested(Self::parse_jvm_method_signature)?);
                }
                _ => self.skip(key)?,
            }
        }

        Ok(constructor)
    }

    /// Parse a `Function` message
    ///
    /// # Errors
    /// Returns an error if the message is malformed or misses its `name`
    pub fn parse_function(&mut self) -> Result<Function> {
        let mut function = Function::default();
        let mut name = None;

        while let Some(key) = self.next_key()? {
            match (key.number, key.wire_type) {
                (1, Varint) => function.old_flags = self.int32()?,
                (2, Varint) => name = Some(self.int32()?),
                (3, LengthDelimited) => function.return_type = Some(self.nested(Self::parse_type)?),
                (4, LengthDelimited) => function
                    .type_parameter
                    .push(self.nested(Self::parse_type_parameter)?),
                (5, LengthDelimited) => {
                    function.receiver_type = Some(self.nested(Self::parse_type)?);
                }
                (6, LengthDelimited) => function
                    .value_parameter
                    .push(self.nested(Self::parse_value_parameter)?),
                (7, Varint) => function.return_type_id = Some(self.int32()?),
                (8, Varint) => function.receiver_type_id = Some(self.int32()?),
                (9, Varint) => function.flags = self.int32()?,
                (30, LengthDelimited) => {
                    function.type_table = Some(self.nested(Self::parse_type_table)?);
                }
                (100, LengthDelimited) if self.enabled(JvmExtensions::METHOD_SIGNATURE) => {
                    function.method_signature =
                        Some(self.nested(Self::parse_jvm_method_signature)?);
                }
                (101, Varint) if self.enabled(JvmExtensions::LAMBDA_CLASS_ORIGIN_NAME) => {
                    function.lambda_class_origin_name = Some(self.int32()?);
                }
                _ => self.skip(key)?,
            }
        }

        function.name = required(name, "Function", "name")?;
        Ok(function)
    }

    /// Parse a `Property` message
    ///
    /// # Errors
    /// Returns an error if the message is malformed or misses its `name`
    pub fn parse_property(&mut self) -> Result<Property> {
        let mut property = Property::default();
        let mut name = None;

        while let Some(key) = self.next_key()? {
            match (key.number, key.wire_type) {
                (1, Varint) => property.old_flags = self.int32()?,
                (2, Varint) => name = Some(self.int32()?),
                (3, LengthDelimited) => property.return_type = Some(self.nested(Self::parse_type)?),
                (4, LengthDelimited) => property
                    .type_parameter
                    .push(self.nested(Self::parse_type_parameter)?),
                (5, LengthDelimited) => {
                    property.receiver_type = Some(self.nested(Self::parse_type)?);
                }
                (6, LengthDelimited) => {
                    property.setter_value_parameter =
                        Some(self.nested(Self::parse_value_parameter)?);
                }
                (7, Varint) => property.getter_flags = Some(self.int32()?),
                (8, Varint) => property.setter_flags = Some(self.int32()?),
                (9, Varint) => property.return_type_id = Some(self.int32()?),
                (10, Varint) => property.receiver_type_id = Some(self.int32()?),
                (11, Varint) => property.flags = self.int32()?,
                (100, LengthDelimited) if self.enabled(JvmExtensions::PROPERTY_SIGNATURE) => {
                    property.property_signature =
                        Some(self.nested(Self::parse_jvm_property_signature)?);
                }
                _ => self.skip(key)?,
            }
        }

        property.name = required(name, "Property", "name")?;
        Ok(property)
    }

    /// Parse a `TypeAlias` message
    ///
    /// # Errors
    /// Returns an error if the message is malformed or misses its `name`
    pub fn parse_type_alias(&mut self) -> Result<TypeAlias> {
        let mut alias = TypeAlias::default();
        let mut name = None;

        while let Some(key) = self.next_key()? {
            match (key.number, key.wire_type) {
                (1, Varint) => alias.flags = self.int32()?,
                (2, Varint) => name = Some(self.int32()?),
                (3, LengthDelimited) => alias
                    .type_parameter
                    .push(self.nested(Self::parse_type_parameter)?),
                (4, LengthDelimited) => {
                    alias.underlying_type = Some(self.nested(Self::parse_type)?);
                }
                (5, Varint) => alias.underlying_type_id = Some(self.int32()?),
                (6, LengthDelimited) => alias.expanded_type = Some(self.nested(Self::parse_type)?),
                (7, Varint) => alias.expanded_type_id = Some(self.int32()?),
                _ => self.skip(key)?,
            }
        }

        alias.name = required(name, "TypeAlias", "name")?;
        Ok(alias)
    }

    fn parse_enum_entry(&mut self) -> Result<EnumEntry> {
        let mut entry = EnumEntry::default();

        while let Some(key) = self.next_key()? {
            match (key.number, key.wire_type) {
                (1, Varint) => entry.name = Some(self.int32()?),
                _ => self.skip(key)?,
            }
        }

        Ok(entry)
    }

    /// Parse a `Class` message
    ///
    /// # Errors
    /// Returns an error if the message or one of its members is malformed, or if it
    /// misses its `fq_name`
    pub fn parse_class(&mut self) -> Result<Class> {
        let mut class = Class::default();
        let mut fq_name = None;

        while let Some(key) = self.next_key()? {
            match (key.number, key.wire_type) {
                (1, Varint) => class.flags = self.int32()?,
                (2, Varint | LengthDelimited) => {
                    read_repeated_int32(&mut self.parser, key, &mut class.supertype_id)?;
                }
                (3, Varint) => fq_name = Some(self.int32()?),
                (4, Varint) => class.companion_object_name = Some(self.int32()?),
                (5, LengthDelimited) => class
                    .type_parameter
                    .push(self.nested(Self::parse_type_parameter)?),
                (6, LengthDelimited) => class.supertype.push(self.nested(Self::parse_type)?),
                (7, Varint | LengthDelimited) => {
                    read_repeated_int32(&mut self.parser, key, &mut class.nested_class_name)?;
                }
                (8, LengthDelimited) => class
                    .constructor
                    .push(self.nested(Self::parse_constructor)?),
                (9, LengthDelimited) => class.function.push(self.nested(Self::parse_function)?),
                (10, LengthDelimited) => class.property.push(self.nested(Self::parse_property)?),
                (11, LengthDelimited) => class
                    .type_alias
                    .push(self.nested(Self::parse_type_alias)?),
                (13, LengthDelimited) => class
                    .enum_entry
                    .push(self.nested(Self::parse_enum_entry)?),
                (16, Varint | LengthDelimited) => {
                    read_repeated_int32(
                        &mut self.parser,
                        key,
                        &mut class.sealed_subclass_fq_name,
                    )?;
                }
                (30, LengthDelimited) => {
                    class.type_table = Some(self.nested(Self::parse_type_table)?);
                }
                (101, Varint) if self.enabled(JvmExtensions::CLASS_MODULE_NAME) => {
                    class.class_module_name = Some(self.int32()?);
                }
                (102, LengthDelimited) if self.enabled(JvmExtensions::CLASS_LOCAL_VARIABLE) => {
                    class
                        .class_local_variable
                        .push(self.nested(Self::parse_property)?);
                }
                _ => self.skip(key)?,
            }
        }

        class.fq_name = required(fq_name, "Class", "fq_name")?;
        Ok(class)
    }

    /// Parse a `Package` message
    ///
    /// # Errors
    /// Returns an error if the message or one of its members is malformed
    pub fn parse_package(&mut self) -> Result<Package> {
        let mut package = Package::default();

        while let Some(key) = self.next_key()? {
            match (key.number, key.wire_type) {
                (3, LengthDelimited) => package.function.push(self.nested(Self::parse_function)?),
                (4, LengthDelimited) => package.property.push(self.nested(Self::parse_property)?),
                (5, LengthDelimited) => package
                    .type_alias
                    .push(self.nested(Self::parse_type_alias)?),
                (30, LengthDelimited) => {
                    package.type_table = Some(self.nested(Self::parse_type_table)?);
                }
                (101, Varint) if self.enabled(JvmExtensions::PACKAGE_MODULE_NAME) => {
                    package.package_module_name = Some(self.int32()?);
                }
                (102, LengthDelimited) if self.enabled(JvmExtensions::PACKAGE_LOCAL_VARIABLE) => {
                    package
                        .package_local_variable
                        .push(self.nested(Self::parse_property)?);
                }
                _ => self.skip(key)?,
            }
        }

        Ok(package)
    }

    /// Parse a `JvmMethodSignature` message
    ///
    /// # Errors
    /// Returns an error if the message is truncated
    pub fn parse_jvm_method_signature(&mut self) -> Result<JvmMethodSignature> {
        let mut signature = JvmMethodSignature::default();

        while let Some(key) = self.next_key()? {
            match (key.number, key.wire_type) {
                (1, Varint) => signature.name = Some(self.int32()?),
                (2, Varint) => signature.desc = Some(self.int32()?),
                _ => self.skip(key)?,
            }
        }

        Ok(signature)
    }

    fn parse_jvm_field_signature(&mut self) -> Result<JvmFieldSignature> {
        let method = self.parse_jvm_method_signature()?;
        Ok(JvmFieldSignature {
            name: method.name,
            desc: method.desc,
        })
    }

    /// Parse a `JvmPropertySignature` message
    ///
    /// # Errors
    /// Returns an error if the message is truncated
    pub fn parse_jvm_property_signature(&mut self) -> Result<JvmPropertySignature> {
        let mut signature = JvmPropertySignature::default();

        while let Some(key) = self.next_key()? {
            match (key.number, key.wire_type) {
                (1, LengthDelimited) => {
                    signature.field = Some(self.nested(Self::parse_jvm_field_signature)?);
                }
                (2, LengthDelimited) => {
                    signature.synthetic_method =
                        Some(self.nested(Self::parse_jvm_method_signature)?);
                }
                (3, LengthDelimited) => {
                    signature.getter = Some(self.nested(Self::parse_jvm_method_signature)?);
                }
                (4, LengthDelimited) => {
                    signature.setter = Some(self.nested(Self::parse_jvm_method_signature)?);
                }
                _ => self.skip(key)?,
            }
        }

        Ok(signature)
    }

    /// Parse a `StringTableTypes` message
    ///
    /// # Errors
    /// Returns an error if the message or one of its records is malformed
    pub fn parse_string_table_types(&mut self) -> Result<StringTableTypes> {
        let mut types = StringTableTypes::default();

        while let Some(key) = self.next_key()? {
            match (key.number, key.wire_type) {
                (1, LengthDelimited) => types.record.push(self.nested(Self::parse_record)?),
                (5, Varint | LengthDelimited) => {
                    read_repeated_int32(&mut self.parser, key, &mut types.local_name)?;
                }
                _ => self.skip(key)?,
            }
        }

        Ok(types)
    }

    fn parse_record(&mut self) -> Result<Record> {
        let mut record = Record::default();

        while let Some(key) = self.next_key()? {
            match (key.number, key.wire_type) {
                (1, Varint) => record.range = self.int32()?,
                (2, Varint) => record.predefined_index = Some(self.int32()?),
                (3, Varint) => {
                    if let Some(operation) = Operation::from_repr(self.int32()?) {
                        record.operation = operation;
                    }
                }
                (4, Varint | LengthDelimited) => {
                    read_repeated_int32(&mut self.parser, key, &mut record.substring_index)?;
                }
                (5, Varint | LengthDelimited) => {
                    read_repeated_int32(&mut self.parser, key, &mut record.replace_char)?;
                }
                (6, LengthDelimited) => record.string = Some(self.parser.read_string()?),
                _ => self.skip(key)?,
            }
        }

        Ok(record)
    }
}

fn required(value: Option<i32>, message: &str, field: &str) -> Result<i32> {
    value.ok_or_else(|| malformed_error!("{} is missing required field '{}'", message, field))
}
