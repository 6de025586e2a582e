//! Metadata decoding and JVM signature synthesis.
//!
//! This module contains everything between a decoded metadata byte stream and the
//! binary signatures of the members it describes.
//!
//! # Key Components
//!
//! - [`reader`] - Stream level decoding into [`ClassData`], [`PackageData`] and [`FunctionData`]
//! - [`proto`] - Typed metadata messages and their decoder
//! - [`extensions`] - Selection of the interpreted JVM extension fields
//! - [`nameresolver`] - Name table resolving indices to strings and class identifiers
//! - [`typetable`] - Resolution of types referenced by id
//! - [`signatures`] - Override-first JVM signature synthesis
//!
//! # Examples
//!
//! ```rust
//! use kmsig::metadata::{read_class_data, signatures::{MemberSignatures, SignatureSynthesizer}};
//!
//! #[rustfmt::skip]
//! let data = [
//!     0x00,                               // empty string table header
//!     0x18, 0x00,                         // fq_name = 0
//!     0x42, 0x08,                         // constructor {
//!         0x12, 0x06,                     //   value_parameter {
//!             0x10, 0x01,                 //     name = 1
//!             0x1A, 0x02, 0x30, 0x02,     //     type { class_name = 2 }
//!                                         //   }
//!                                         // }
//! ];
//! let strings = ["com/example/Point", "x", "kotlin/Int"];
//!
//! let class = read_class_data(&data, &strings)?;
//! let signatures = MemberSignatures::collect(&SignatureSynthesizer::new(), &class)?;
//! assert_eq!(signatures.iter().next().map(ToString::to_string).as_deref(), Some("<init>(I)V"));
//! # Ok::<(), kmsig::Error>(())
//! ```

/// Selection of interpreted JVM extension fields
pub mod extensions;
/// Name table of a metadata stream
pub mod nameresolver;
/// Typed metadata messages and their decoder
pub mod proto;
/// Stream level decoding
pub mod reader;
/// JVM signature synthesis
pub mod signatures;
/// Types referenced by id
pub mod typetable;

pub use extensions::{ExtensionRegistry, JvmExtensions};
pub use nameresolver::{ClassId, JvmNameResolver, NameResolver, PREDEFINED_STRINGS};
pub use reader::{
    read_class_data, read_class_data_from_strings, read_function_data,
    read_function_data_from_strings, read_package_data, read_package_data_from_strings,
    ClassData, FunctionData, MetadataReader, MetadataRecord, PackageData, RecordKind,
};
pub use typetable::TypeTable;
