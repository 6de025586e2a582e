//! JVM extension selection for the metadata decoder.
//!
//! The core metadata schema is platform neutral; the JVM backend stores its
//! signature overrides and module information in extension fields numbered 100 and
//! above. An [`ExtensionRegistry`] decides which of those fields the decoder
//! interprets; disabled extensions are skipped like unknown fields.

use bitflags::bitflags;

bitflags! {
    /// The JVM extension fields known to the decoder
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct JvmExtensions: u32 {
        /// `Constructor.constructor_signature`
        const CONSTRUCTOR_SIGNATURE = 0x0001;
        /// `Function.method_signature`
        const METHOD_SIGNATURE = 0x0002;
        /// `Function.lambda_class_origin_name`
        const LAMBDA_CLASS_ORIGIN_NAME = 0x0004;
        /// `Property.property_signature`
        const PROPERTY_SIGNATURE = 0x0008;
        /// `Type.is_raw`
        const TYPE_IS_RAW = 0x0010;
        /// `Class.class_module_name`
        const CLASS_MODULE_NAME = 0x0020;
        /// `Class.class_local_variable`
        const CLASS_LOCAL_VARIABLE = 0x0040;
        /// `Package.package_module_name`
        const PACKAGE_MODULE_NAME = 0x0080;
        /// `Package.package_local_variable`
        const PACKAGE_LOCAL_VARIABLE = 0x0100;
    }
}

/// Set of extensions interpreted while decoding
///
/// # Examples
///
/// ```rust
/// use kmsig::metadata::{ExtensionRegistry, JvmExtensions};
///
/// let registry = ExtensionRegistry::empty().with(JvmExtensions::METHOD_SIGNATURE);
/// assert!(registry.contains(JvmExtensions::METHOD_SIGNATURE));
/// assert!(!registry.contains(JvmExtensions::PROPERTY_SIGNATURE));
/// assert_eq!(ExtensionRegistry::default(), ExtensionRegistry::jvm());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExtensionRegistry {
    extensions: JvmExtensions,
}

impl Default for ExtensionRegistry {
    fn default() -> Self {
        Self::jvm()
    }
}

impl ExtensionRegistry {
    /// Registry interpreting every JVM extension
    #[must_use]
    pub fn jvm() -> Self {
        Self {
            extensions: JvmExtensions::all(),
        }
    }

    /// Registry interpreting no extension at all
    ///
    /// Decoding with this registry yields the platform neutral view of a record;
    /// no signature override is ever present.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            extensions: JvmExtensions::empty(),
        }
    }

    /// Returns a copy with `extensions` additionally enabled
    #[must_use]
    pub fn with(mut self, extensions: JvmExtensions) -> Self {
        self.extensions |= extensions;
        self
    }

    /// Returns a copy with `extensions` disabled
    #[must_use]
    pub fn without(mut self, extensions: JvmExtensions) -> Self {
        self.extensions &= !extensions;
        self
    }

    /// Returns `true` if every extension in `extensions` is enabled
    #[must_use]
    pub fn contains(&self, extensions: JvmExtensions) -> bool {
        self.extensions.contains(extensions)
    }

    /// The enabled extensions
    #[must_use]
    pub fn extensions(&self) -> JvmExtensions {
        self.extensions
    }
}
