//! Metadata message schema and decoder.
//!
//! The metadata stream is a sequence of protobuf messages describing declarations
//! (classes, package parts, functions, properties, ...). This module holds the typed
//! message structures and the [`ProtoParser`] decoding them. Only the subset of the
//! schema needed to describe declarations and their JVM extensions is modelled;
//! every other field is skipped.
//!
//! Names are never stored inline: all `i32` name fields are indices into the
//! [`crate::metadata::NameResolver`] of the surrounding stream, and types may be
//! referenced by id into a [`crate::metadata::TypeTable`].
//!
//! # Examples
//!
//! ```rust
//! use kmsig::metadata::proto::parse_property;
//!
//! // Property { name = 2, return_type { class_name = 1 } }
//! let property = parse_property(&[0x10, 0x02, 0x1A, 0x02, 0x30, 0x01])?;
//! assert_eq!(property.name, 2);
//! assert_eq!(property.return_type.and_then(|t| t.class_name), Some(1));
//! # Ok::<(), kmsig::Error>(())
//! ```

mod parser;
mod types;

pub use parser::{ProtoParser, MAX_RECURSION_DEPTH};
pub use types::*;

use crate::{metadata::extensions::ExtensionRegistry, Result};

/// Parse a single `Class` message, interpreting all JVM extensions
///
/// ## Arguments
/// * 'data' - The encoded message
///
/// # Errors
/// Returns an error if the message is malformed
pub fn parse_class(data: &[u8]) -> Result<Class> {
    ProtoParser::new(data, ExtensionRegistry::jvm()).parse_class()
}

/// Parse a single `Package` message, interpreting all JVM extensions
///
/// ## Arguments
/// * 'data' - The encoded message
///
/// # Errors
/// Returns an error if the message is malformed
pub fn parse_package(data: &[u8]) -> Result<Package> {
    ProtoParser::new(data, ExtensionRegistry::jvm()).parse_package()
}

/// Parse a single `Function` message, interpreting all JVM extensions
///
/// ## Arguments
/// * 'data' - The encoded message
///
/// # Errors
/// Returns an error if the message is malformed
pub fn parse_function(data: &[u8]) -> Result<Function> {
    ProtoParser::new(data, ExtensionRegistry::jvm()).parse_function()
}

/// Parse a single `Property` message, interpreting all JVM extensions
///
/// ## Arguments
/// * 'data' - The encoded message
///
/// # Errors
/// Returns an error if the message is malformed
pub fn parse_property(data: &[u8]) -> Result<Property> {
    ProtoParser::new(data, ExtensionRegistry::jvm()).parse_property()
}
