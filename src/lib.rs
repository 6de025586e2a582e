// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # kmsig
//!
//! Reconstruction of JVM member signatures from the compact binary metadata that
//! Kotlin compilers attach to class files.
//!
//! Compiled classes carry a serialized description of their declarations (functions,
//! constructors, properties, their types and names) next to the bytecode. `kmsig`
//! decodes that description and computes the exact JVM signature of every member,
//! e.g. `equals(Ljava/lang/Object;)Z`, honouring the explicit signatures the compiler
//! records whenever the default derivation would be wrong.
//!
//! ## Features
//!
//! - **String pool bridge** - decode the string-array encoding used in class file annotations
//! - **Bounds checked wire reader** - protobuf varints, keys and length-delimited payloads
//! - **Typed metadata messages** - classes, package parts, functions and JVM extensions
//! - **Name table** - predefined names, ranges, substring/replace operations and class identifiers
//! - **Signature synthesis** - override-first methods, constructors, fields and accessors
//!
//! ## Quick Start
//!
//! ```rust
//! use kmsig::prelude::*;
//!
//! #[rustfmt::skip]
//! let data = [
//!     0x00,                               // empty string table header
//!     0x10, 0x00,                         // Function { name = 0,
//!     0x1A, 0x02, 0x30, 0x01,             //   return_type { class_name = 1 } }
//! ];
//! let strings = ["hashCode", "kotlin/Int"];
//!
//! let function = read_function_data(&data, &strings)?;
//! let table = function.type_table();
//! let signature = jvm_method_signature(&function.function, &function.names, &table)?;
//! assert_eq!(signature.as_deref(), Some("hashCode()I"));
//! # Ok::<(), kmsig::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`encoding`] - string array to byte stream
//! - [`wire`] - protobuf wire format primitives
//! - [`metadata`] - stream decoding, name and type tables, signature synthesis
//! - [`Error`] and [`Result`] - error handling
//!
//! ## Error Handling
//!
//! Decoding fails as a whole with [`Error::Malformed`]; there are no partial results.
//! Signature synthesis distinguishes members without a derivable signature
//! (`Ok(None)`) from inconsistent metadata (`Err`).
//!
//! ```rust
//! use kmsig::{Error, metadata::read_package_data};
//!
//! let strings: [&str; 0] = [];
//! match read_package_data(&[0x04, 0x0A], &strings) {
//!     Ok(_) => unreachable!(),
//!     Err(Error::Malformed { message, .. }) => println!("Malformed metadata: {}", message),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```
//!
//! ## Development and Testing
//!
//! ```bash
//! cargo test
//! cargo bench --bench signatures
//! cargo +nightly fuzz run metadata --release
//! ```

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and functions.
///
/// # Example
///
/// ```rust
/// use kmsig::prelude::*;
///
/// let strings = ["kotlin/Int"];
/// let names = JvmNameResolver::new(StringTableTypes::default(), &strings);
/// assert_eq!(names.get_string(0)?, "kotlin/Int");
/// # Ok::<(), kmsig::Error>(())
/// ```
pub mod prelude;

pub mod encoding;
pub mod metadata;
pub mod wire;

/// `kmsig` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `kmsig` Error type
///
/// Every fallible operation of this crate reports one of its variants.
pub use error::Error;

/// Bounds checked cursor over a byte slice.
///
/// See [`wire::Parser`] for the available reads.
///
/// # Example
///
/// ```rust
/// use kmsig::Parser;
///
/// let mut parser = Parser::new(&[0xAC, 0x02]);
/// assert_eq!(parser.read_varint()?, 300);
/// # Ok::<(), kmsig::Error>(())
/// ```
pub use wire::Parser;
