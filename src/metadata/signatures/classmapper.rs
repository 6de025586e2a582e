//! Class identifier to JVM descriptor mapping.
//!
//! Built-in classes have JVM representations that differ from their metadata names:
//! primitives and their arrays, `kotlin/Unit` as `V`, and the read-only and mutable
//! collection interfaces which share one Java type. Every other class maps to
//! `L<internal name>;`, where nested classes are joined with `$`.

use std::{collections::HashMap, sync::OnceLock};

use crate::{metadata::nameresolver::ClassId, Error::UnmappableType, Result};

const PRIMITIVES: [(&str, &str); 8] = [
    ("Boolean", "Z"),
    ("Char", "C"),
    ("Byte", "B"),
    ("Short", "S"),
    ("Int", "I"),
    ("Float", "F"),
    ("Long", "J"),
    ("Double", "D"),
];

const JAVA_LANG: [&str; 7] = [
    "String",
    "CharSequence",
    "Throwable",
    "Cloneable",
    "Number",
    "Comparable",
    "Enum",
];

const JAVA_UTIL_COLLECTIONS: [&str; 6] =
    ["Iterator", "Collection", "List", "Set", "Map", "ListIterator"];

const COMPANION_OBJECTS: [&str; 9] = [
    "Char", "Byte", "Short", "Int", "Float", "Long", "Double", "String", "Enum",
];

/// Highest arity of the generated function interfaces
const MAX_FUNCTION_ARITY: usize = 22;

fn descriptors() -> &'static HashMap<String, String> {
    static DESCRIPTORS: OnceLock<HashMap<String, String>> = OnceLock::new();

    DESCRIPTORS.get_or_init(|| {
        let mut map = HashMap::new();

        for (name, descriptor) in PRIMITIVES {
            map.insert(format!("kotlin/{name}"), descriptor.to_string());
            map.insert(format!("kotlin/{name}Array"), format!("[{descriptor}"));
        }

        map.insert("kotlin/Unit".to_string(), "V".to_string());
        map.insert("kotlin/Any".to_string(), "Ljava/lang/Object;".to_string());
        map.insert("kotlin/Nothing".to_string(), "Ljava/lang/Void;".to_string());
        map.insert(
            "kotlin/Annotation".to_string(),
            "Ljava/lang/annotation/Annotation;".to_string(),
        );

        for name in JAVA_LANG {
            map.insert(format!("kotlin/{name}"), format!("Ljava/lang/{name};"));
        }

        for name in JAVA_UTIL_COLLECTIONS {
            let descriptor = format!("Ljava/util/{name};");
            map.insert(format!("kotlin/collections/{name}"), descriptor.clone());
            map.insert(format!("kotlin/collections/Mutable{name}"), descriptor);
        }

        map.insert(
            "kotlin/collections/Iterable".to_string(),
            "Ljava/lang/Iterable;".to_string(),
        );
        map.insert(
            "kotlin/collections/MutableIterable".to_string(),
            "Ljava/lang/Iterable;".to_string(),
        );
        map.insert(
            "kotlin/collections/Map$Entry".to_string(),
            "Ljava/util/Map$Entry;".to_string(),
        );
        map.insert(
            "kotlin/collections/MutableMap$MutableEntry".to_string(),
            "Ljava/util/Map$Entry;".to_string(),
        );

        for arity in 0..=MAX_FUNCTION_ARITY {
            map.insert(
                format!("kotlin/Function{arity}"),
                format!("Lkotlin/jvm/functions/Function{arity};"),
            );
            map.insert(
                format!("kotlin/reflect/KFunction{arity}"),
                "Lkotlin/reflect/KFunction;".to_string(),
            );
        }

        for name in COMPANION_OBJECTS {
            map.insert(
                format!("kotlin/{name}$Companion"),
                format!("Lkotlin/jvm/internal/{name}CompanionObject;"),
            );
        }

        map
    })
}

/// Returns `true` if `internal` can appear in a JVM descriptor as a class name
fn is_binary_name(internal: &str) -> bool {
    !internal.is_empty()
        && !internal.contains([';', '['])
        && internal.split('/').all(|segment| !segment.is_empty())
}

/// Map a class identifier to its JVM descriptor fragment
///
/// ## Arguments
/// * 'class_id' - The class to map
///
/// # Errors
/// Returns [`crate::Error::UnmappableType`] if the identifier is no valid JVM binary name
///
/// # Examples
///
/// ```rust
/// use kmsig::metadata::{signatures::map_class, ClassId};
///
/// assert_eq!(map_class(&ClassId::new("kotlin", "Int", false))?, "I");
/// assert_eq!(
///     map_class(&ClassId::new("com/example", "Outer.Inner", false))?,
///     "Lcom/example/Outer$Inner;"
/// );
/// # Ok::<(), kmsig::Error>(())
/// ```
pub fn map_class(class_id: &ClassId) -> Result<String> {
    let internal = class_id.as_string().replace('.', "$");

    if let Some(descriptor) = descriptors().get(&internal) {
        return Ok(descriptor.clone());
    }

    if !is_binary_name(&internal) {
        return Err(UnmappableType(internal));
    }

    Ok(format!("L{internal};"))
}
