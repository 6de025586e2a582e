//! # kmsig Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and
//! functions of the kmsig library. Import it to get quick access to everything needed
//! to go from encoded metadata to JVM signatures.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all kmsig operations
pub use crate::Error;

/// The result type used throughout kmsig
pub use crate::Result;

/// Low-level wire format cursor
pub use crate::Parser;

// ================================================================================================
// Decoding
// ================================================================================================

/// String pool bridge
pub use crate::encoding::decode_bytes;

/// Stream decoding entry points and their results
pub use crate::metadata::{
    read_class_data, read_class_data_from_strings, read_function_data,
    read_function_data_from_strings, read_package_data, read_package_data_from_strings,
    ClassData, FunctionData, MetadataReader, MetadataRecord, PackageData, RecordKind,
};

/// Decoder configuration
pub use crate::metadata::{ExtensionRegistry, JvmExtensions};

// ================================================================================================
// Metadata Model
// ================================================================================================

/// Messages most commonly inspected by callers
pub use crate::metadata::proto::{
    Class, Constructor, Function, Package, Property, StringTableTypes, Type, ValueParameter,
};

/// Name and type resolution
pub use crate::metadata::{ClassId, JvmNameResolver, NameResolver, TypeTable};

// ================================================================================================
// Signature Synthesis
// ================================================================================================

/// Synthesizer, type mapping and results
pub use crate::metadata::signatures::{
    DefaultTypeMapper, MemberSignature, MemberSignatures, Members, PropertySignature,
    SignatureSynthesizer, TypeMapper,
};

/// Signature functions using the default synthesizer
pub use crate::metadata::signatures::{
    jvm_constructor_signature, jvm_field_signature, jvm_getter_signature, jvm_method_signature,
    jvm_setter_signature, jvm_synthetic_method_signature,
};
