use strum::{Display, EnumCount, EnumIter, FromRepr};

/// Variance of a type argument at its use site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, EnumCount, FromRepr, Display)]
#[repr(i32)]
pub enum Projection {
    /// `in T`
    In = 0,
    /// `out T`
    Out = 1,
    /// `T`
    #[default]
    Inv = 2,
    /// `*`
    Star = 3,
}

/// Declaration-site variance of a type parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, EnumCount, FromRepr, Display)]
#[repr(i32)]
pub enum Variance {
    /// `in T`
    In = 0,
    /// `out T`
    Out = 1,
    /// `T`
    #[default]
    Inv = 2,
}

/// A type usage
///
/// Exactly one of `class_name`, `type_parameter`, `type_parameter_name` or
/// `type_alias_name` is normally set; only class types take part in default
/// descriptor mapping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Type {
    /// Type flags (nullability of flexible bounds, suspend function types, ...)
    pub flags: i32,
    /// Type arguments, in declaration order
    pub argument: Vec<TypeArgument>,
    /// `T?`
    pub nullable: bool,
    /// Index into the name table naming the flexible type capabilities
    pub flexible_type_capabilities_id: Option<i32>,
    /// Upper bound of a flexible (platform) type, inline
    pub flexible_upper_bound: Option<Box<Type>>,
    /// Upper bound of a flexible (platform) type, as a type table id
    pub flexible_upper_bound_id: Option<i32>,
    /// Index into the name table resolving to a class identifier
    pub class_name: Option<i32>,
    /// Id of a type parameter in scope
    pub type_parameter: Option<i32>,
    /// Index into the name table naming a type parameter in scope
    pub type_parameter_name: Option<i32>,
    /// Index into the name table resolving to a type alias identifier
    pub type_alias_name: Option<i32>,
    /// Outer type of an inner class type, inline
    pub outer_type: Option<Box<Type>>,
    /// Outer type of an inner class type, as a type table id
    pub outer_type_id: Option<i32>,
    /// Unexpanded type alias this type was written as, inline
    pub abbreviated_type: Option<Box<Type>>,
    /// Unexpanded type alias this type was written as, as a type table id
    pub abbreviated_type_id: Option<i32>,
    /// JVM extension: the type is a raw Java type
    pub is_raw: Option<bool>,
}

impl Type {
    /// Returns `true` if this type refers to a class by name
    #[must_use]
    pub fn is_class(&self) -> bool {
        self.class_name.is_some()
    }
}

/// A single type argument
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeArgument {
    /// Use-site variance; [`Projection::Star`] carries no type
    pub projection: Projection,
    /// The argument type, inline
    pub ty: Option<Box<Type>>,
    /// The argument type, as a type table id
    pub type_id: Option<i32>,
}

/// A declared type parameter
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeParameter {
    /// Id unique within the declaring container
    pub id: i32,
    /// Index into the name table
    pub name: i32,
    /// `reified T`
    pub reified: bool,
    /// Declaration-site variance
    pub variance: Variance,
    /// Upper bounds, inline
    pub upper_bound: Vec<Type>,
    /// Upper bounds, as type table ids
    pub upper_bound_id: Vec<i32>,
}

/// Serialized table of types referenced by id
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeTableRaw {
    /// The types, addressed by their position
    pub types: Vec<Type>,
    /// Types at this index and beyond are nullable
    pub first_nullable: Option<i32>,
}

/// A value parameter of a function, constructor or property setter
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueParameter {
    /// Parameter flags (annotations, default value, crossinline, noinline)
    pub flags: i32,
    /// Index into the name table
    pub name: i32,
    /// The parameter type, inline
    pub ty: Option<Type>,
    /// The parameter type, as a type table id
    pub type_id: Option<i32>,
    /// Element type of a `vararg` parameter, inline
    pub vararg_element_type: Option<Type>,
    /// Element type of a `vararg` parameter, as a type table id
    pub vararg_element_type_id: Option<i32>,
}

/// JVM name and descriptor recorded by the compiler for a method or constructor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JvmMethodSignature {
    /// Index into the name table holding the JVM method name
    pub name: Option<i32>,
    /// Index into the name table holding the JVM method descriptor
    pub desc: Option<i32>,
}

/// JVM name and descriptor recorded by the compiler for a backing field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JvmFieldSignature {
    /// Index into the name table holding the JVM field name
    pub name: Option<i32>,
    /// Index into the name table holding the JVM field descriptor
    pub desc: Option<i32>,
}

/// JVM members generated for a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JvmPropertySignature {
    /// The backing field
    pub field: Option<JvmFieldSignature>,
    /// Synthetic method holding the property annotations
    pub synthetic_method: Option<JvmMethodSignature>,
    /// The getter
    pub getter: Option<JvmMethodSignature>,
    /// The setter
    pub setter: Option<JvmMethodSignature>,
}

/// A constructor
#[derive(Debug, Clone, PartialEq)]
pub struct Constructor {
    /// Constructor flags (visibility, primary/secondary)
    pub flags: i32,
    /// Value parameters, in declaration order
    pub value_parameter: Vec<ValueParameter>,
    /// JVM extension: explicit signature override
    pub constructor_signature: Option<JvmMethodSignature>,
}

impl Default for Constructor {
    fn default() -> Self {
        Constructor {
            flags: 6,
            value_parameter: Vec::new(),
            constructor_signature: None,
        }
    }
}

/// A function
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Function flags (visibility, modality, kind, operator, infix, ...)
    pub flags: i32,
    /// Flags as written by older compilers
    pub old_flags: i32,
    /// Index into the name table
    pub name: i32,
    /// Return type, inline
    pub return_type: Option<Type>,
    /// Return type, as a type table id
    pub return_type_id: Option<i32>,
    /// Declared type parameters
    pub type_parameter: Vec<TypeParameter>,
    /// Extension receiver type, inline
    pub receiver_type: Option<Type>,
    /// Extension receiver type, as a type table id
    pub receiver_type_id: Option<i32>,
    /// Value parameters, in declaration order
    pub value_parameter: Vec<ValueParameter>,
    /// Type table of a function serialized on its own (lambdas)
    pub type_table: Option<TypeTableRaw>,
    /// JVM extension: explicit signature override
    pub method_signature: Option<JvmMethodSignature>,
    /// JVM extension: name of the class a lambda was generated into
    pub lambda_class_origin_name: Option<i32>,
}

impl Default for Function {
    fn default() -> Self {
        Function {
            flags: 6,
            old_flags: 6,
            name: 0,
            return_type: None,
            return_type_id: None,
            type_parameter: Vec::new(),
            receiver_type: None,
            receiver_type_id: None,
            value_parameter: Vec::new(),
            type_table: None,
            method_signature: None,
            lambda_class_origin_name: None,
        }
    }
}

/// A property
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Property flags (visibility, modality, var/val, const, lateinit, ...)
    pub flags: i32,
    /// Flags as written by older compilers
    pub old_flags: i32,
    /// Index into the name table
    pub name: i32,
    /// Property type, inline
    pub return_type: Option<Type>,
    /// Property type, as a type table id
    pub return_type_id: Option<i32>,
    /// Declared type parameters
    pub type_parameter: Vec<TypeParameter>,
    /// Extension receiver type, inline
    pub receiver_type: Option<Type>,
    /// Extension receiver type, as a type table id
    pub receiver_type_id: Option<i32>,
    /// The setter parameter, when it is not the default one
    pub setter_value_parameter: Option<ValueParameter>,
    /// Getter flags
    pub getter_flags: Option<i32>,
    /// Setter flags
    pub setter_flags: Option<i32>,
    /// JVM extension: backing field and accessor signatures
    pub property_signature: Option<JvmPropertySignature>,
}

impl Default for Property {
    fn default() -> Self {
        Property {
            flags: 518,
            old_flags: 2054,
            name: 0,
            return_type: None,
            return_type_id: None,
            type_parameter: Vec::new(),
            receiver_type: None,
            receiver_type_id: None,
            setter_value_parameter: None,
            getter_flags: None,
            setter_flags: None,
            property_signature: None,
        }
    }
}

/// A type alias
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAlias {
    /// Type alias flags (visibility, annotations)
    pub flags: i32,
    /// Index into the name table
    pub name: i32,
    /// Declared type parameters
    pub type_parameter: Vec<TypeParameter>,
    /// The aliased type as written, inline
    pub underlying_type: Option<Type>,
    /// The aliased type as written, as a type table id
    pub underlying_type_id: Option<i32>,
    /// The fully expanded type, inline
    pub expanded_type: Option<Type>,
    /// The fully expanded type, as a type table id
    pub expanded_type_id: Option<i32>,
}

impl Default for TypeAlias {
    fn default() -> Self {
        TypeAlias {
            flags: 6,
            name: 0,
            type_parameter: Vec::new(),
            underlying_type: None,
            underlying_type_id: None,
            expanded_type: None,
            expanded_type_id: None,
        }
    }
}

/// An enum entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnumEntry {
    /// Index into the name table
    pub name: Option<i32>,
}

/// A class, interface, object or enum
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    /// Class flags (visibility, modality, kind, inner, data, ...)
    pub flags: i32,
    /// Index into the name table resolving to this class' identifier
    pub fq_name: i32,
    /// Index into the name table naming the companion object
    pub companion_object_name: Option<i32>,
    /// Declared type parameters
    pub type_parameter: Vec<TypeParameter>,
    /// Supertypes, inline
    pub supertype: Vec<Type>,
    /// Supertypes, as type table ids
    pub supertype_id: Vec<i32>,
    /// Indices into the name table naming nested classes
    pub nested_class_name: Vec<i32>,
    /// Constructors
    pub constructor: Vec<Constructor>,
    /// Member functions
    pub function: Vec<Function>,
    /// Member properties
    pub property: Vec<Property>,
    /// Member type aliases
    pub type_alias: Vec<TypeAlias>,
    /// Enum entries
    pub enum_entry: Vec<EnumEntry>,
    /// Indices into the name table resolving to sealed subclass identifiers
    pub sealed_subclass_fq_name: Vec<i32>,
    /// Types referenced by id from this class
    pub type_table: Option<TypeTableRaw>,
    /// JVM extension: index into the name table naming the declaring module
    pub class_module_name: Option<i32>,
    /// JVM extension: local delegated properties
    pub class_local_variable: Vec<Property>,
}

impl Default for Class {
    fn default() -> Self {
        Class {
            flags: 6,
            fq_name: 0,
            companion_object_name: None,
            type_parameter: Vec::new(),
            supertype: Vec::new(),
            supertype_id: Vec::new(),
            nested_class_name: Vec::new(),
            constructor: Vec::new(),
            function: Vec::new(),
            property: Vec::new(),
            type_alias: Vec::new(),
            enum_entry: Vec::new(),
            sealed_subclass_fq_name: Vec::new(),
            type_table: None,
            class_module_name: None,
            class_local_variable: Vec::new(),
        }
    }
}

/// Top-level declarations of a package part
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Package {
    /// Top-level functions
    pub function: Vec<Function>,
    /// Top-level properties
    pub property: Vec<Property>,
    /// Top-level type aliases
    pub type_alias: Vec<TypeAlias>,
    /// Types referenced by id from this package
    pub type_table: Option<TypeTableRaw>,
    /// JVM extension: index into the name table naming the declaring module
    pub package_module_name: Option<i32>,
    /// JVM extension: local delegated properties
    pub package_local_variable: Vec<Property>,
}

/// How a name table record transforms its base string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, EnumCount, FromRepr, Display)]
#[repr(i32)]
pub enum Operation {
    /// Leave the string unchanged
    #[default]
    None = 0,
    /// `a/b/C$D` => `a/b/C.D`
    InternalToClassId = 1,
    /// `La/b/C$D;` => `a/b/C.D`
    DescToClassId = 2,
}

/// A name table record covering `range` consecutive indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Number of consecutive indices this record describes
    pub range: i32,
    /// Index into the predefined name list
    pub predefined_index: Option<i32>,
    /// Literal string replacing the raw string array entry
    pub string: Option<String>,
    /// Transformation applied after substring and character replacement
    pub operation: Operation,
    /// `[begin, end)` character range to keep
    pub substring_index: Vec<i32>,
    /// `[from, to]` character replacement
    pub replace_char: Vec<i32>,
}

impl Default for Record {
    fn default() -> Self {
        Record {
            range: 1,
            predefined_index: None,
            string: None,
            operation: Operation::None,
            substring_index: Vec::new(),
            replace_char: Vec::new(),
        }
    }
}

/// Header describing how the indices of a metadata stream map to strings
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StringTableTypes {
    /// Records, each covering `range` indices starting after the previous one
    pub record: Vec<Record>,
    /// Indices whose class identifiers denote local classes
    pub local_name: Vec<i32>,
}
