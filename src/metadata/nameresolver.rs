//! Name table of a metadata stream.
//!
//! Metadata messages never store names inline; every name is an `i32` index. The
//! [`JvmNameResolver`] turns those indices into strings and class identifiers, using
//! the `StringTableTypes` header of the stream together with the raw string array
//! stored next to the metadata.
//!
//! # Resolution
//!
//! Records of the header are expanded by their `range`: a record with range *n*
//! describes *n* consecutive indices. For an index covered by a record the base string
//! is the record's literal string, else the predefined name at `predefined_index`,
//! else the raw string at the index. The record's substring, character replacement
//! and operation are then applied in that order. Indices beyond all records resolve
//! directly to the raw string array.
//!
//! # Examples
//!
//! ```rust
//! use kmsig::metadata::{
//!     proto::{Operation, Record, StringTableTypes},
//!     JvmNameResolver, NameResolver,
//! };
//!
//! let types = StringTableTypes {
//!     record: vec![Record {
//!         operation: Operation::DescToClassId,
//!         ..Record::default()
//!     }],
//!     local_name: vec![],
//! };
//! let strings = ["Lcom/example/Outer$Inner;", "plain"];
//! let names = JvmNameResolver::new(types, &strings);
//!
//! assert_eq!(names.get_string(0)?, "com/example/Outer.Inner");
//! assert_eq!(names.get_string(1)?, "plain");
//! assert_eq!(names.get_class_id(0)?.relative_class_name(), "Outer.Inner");
//! # Ok::<(), kmsig::Error>(())
//! ```

use std::{collections::HashSet, fmt};

use crate::{
    metadata::proto::{Operation, Record, StringTableTypes},
    Error::UnresolvedIndex,
    Result,
};

/// Internal names addressable through `Record::predefined_index`, in index order
pub const PREDEFINED_STRINGS: [&str; 44] = [
    "kotlin/Any",
    "kotlin/Nothing",
    "kotlin/Unit",
    "kotlin/Throwable",
    "kotlin/Number",
    "kotlin/Byte",
    "kotlin/Double",
    "kotlin/Float",
    "kotlin/Int",
    "kotlin/Long",
    "kotlin/Short",
    "kotlin/Boolean",
    "kotlin/Char",
    "kotlin/CharSequence",
    "kotlin/String",
    "kotlin/Comparable",
    "kotlin/Enum",
    "kotlin/Array",
    "kotlin/ByteArray",
    "kotlin/DoubleArray",
    "kotlin/FloatArray",
    "kotlin/IntArray",
    "kotlin/LongArray",
    "kotlin/ShortArray",
    "kotlin/BooleanArray",
    "kotlin/CharArray",
    "kotlin/Cloneable",
    "kotlin/Annotation",
    "kotlin/collections/Iterable",
    "kotlin/collections/MutableIterable",
    "kotlin/collections/Collection",
    "kotlin/collections/MutableCollection",
    "kotlin/collections/List",
    "kotlin/collections/MutableList",
    "kotlin/collections/Set",
    "kotlin/collections/MutableSet",
    "kotlin/collections/Map",
    "kotlin/collections/MutableMap",
    "kotlin/collections/Map.Entry",
    "kotlin/collections/MutableMap.MutableEntry",
    "kotlin/collections/Iterator",
    "kotlin/collections/MutableIterator",
    "kotlin/collections/ListIterator",
    "kotlin/collections/MutableListIterator",
];

/// Resolves name indices of a metadata stream
pub trait NameResolver {
    /// Resolve `index` to a string
    ///
    /// # Errors
    /// Returns [`crate::Error::UnresolvedIndex`] if the index has no resolution
    fn get_string(&self, index: i32) -> Result<String>;

    /// Resolve `index` to a class identifier
    ///
    /// # Errors
    /// Returns [`crate::Error::UnresolvedIndex`] if the index has no resolution
    fn get_class_id(&self, index: i32) -> Result<ClassId>;

    /// Returns `true` if the class identifier at `index` denotes a local class
    fn is_local_class_name(&self, index: i32) -> bool;
}

/// Identifier of a class: package path plus the dotted relative name
///
/// `kotlin/collections/Map.Entry` has the package `kotlin/collections` and the
/// relative name `Map.Entry`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassId {
    package: String,
    relative: String,
    local: bool,
}

impl ClassId {
    /// Create a class identifier
    ///
    /// ## Arguments
    /// * 'package'  - `/` separated package path, empty for the root package
    /// * 'relative' - `.` separated class name relative to the package
    /// * 'local'    - whether the class is local to a function body
    #[must_use]
    pub fn new(package: impl Into<String>, relative: impl Into<String>, local: bool) -> Self {
        ClassId {
            package: package.into(),
            relative: relative.into(),
            local,
        }
    }

    /// Split a resolved `a/b/C.D` string at its last `/`
    #[must_use]
    pub fn parse(value: &str, local: bool) -> Self {
        match value.rfind('/') {
            Some(split) => ClassId::new(&value[..split], &value[split + 1..], local),
            None => ClassId::new("", value, local),
        }
    }

    /// The `/` separated package path
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    /// The `.` separated class name relative to the package
    #[must_use]
    pub fn relative_class_name(&self) -> &str {
        &self.relative
    }

    /// Returns `true` for classes local to a function body
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.local
    }

    /// Render as `a/b/C.D`, or `C.D` in the root package
    #[must_use]
    pub fn as_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.package.is_empty() {
            write!(f, "{}", self.relative)
        } else {
            write!(f, "{}/{}", self.package, self.relative)
        }
    }
}

/// [`NameResolver`] over a `StringTableTypes` header and the raw string array
///
/// Owns the decoded header and borrows the raw strings for the lifetime `'s`.
pub struct JvmNameResolver<'s, S: AsRef<str>> {
    types: StringTableTypes,
    strings: &'s [S],
    /// Exclusive end index of every record, in record order
    ends: Vec<u64>,
    local_names: HashSet<i32>,
}

impl<'s, S: AsRef<str>> JvmNameResolver<'s, S> {
    /// Create a resolver from a decoded header and the raw string array
    #[must_use]
    pub fn new(types: StringTableTypes, strings: &'s [S]) -> Self {
        let mut end = 0u64;
        let ends = types
            .record
            .iter()
            .map(|record| {
                end += u64::try_from(record.range).unwrap_or(0);
                end
            })
            .collect();
        let local_names = types.local_name.iter().copied().collect();

        JvmNameResolver {
            types,
            strings,
            ends,
            local_names,
        }
    }

    /// The decoded header
    #[must_use]
    pub fn types(&self) -> &StringTableTypes {
        &self.types
    }

    /// The raw string array
    #[must_use]
    pub fn strings(&self) -> &'s [S] {
        self.strings
    }

    fn record(&self, index: u64) -> Option<&Record> {
        let position = self.ends.partition_point(|&end| end <= index);
        self.types.record.get(position)
    }

    fn raw(&self, index: i32) -> Result<&'s str> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.strings.get(i))
            .map(AsRef::as_ref)
            .ok_or(UnresolvedIndex(index))
    }
}

impl<S: AsRef<str>> NameResolver for JvmNameResolver<'_, S> {
    fn get_string(&self, index: i32) -> Result<String> {
        let Ok(position) = u64::try_from(index) else {
            return Err(UnresolvedIndex(index));
        };

        let Some(record) = self.record(position) else {
            return self.raw(index).map(str::to_string);
        };

        let mut value = if let Some(string) = &record.string {
            string.clone()
        } else if let Some(predefined) = record
            .predefined_index
            .and_then(|i| usize::try_from(i).ok())
            .and_then(|i| PREDEFINED_STRINGS.get(i))
        {
            (*predefined).to_string()
        } else {
            self.raw(index)?.to_string()
        };

        if let [begin, end, ..] = record.substring_index[..] {
            let length = value.chars().count();
            if let (Ok(begin), Ok(end)) = (usize::try_from(begin), usize::try_from(end)) {
                if begin <= end && end <= length {
                    value = value.chars().skip(begin).take(end - begin).collect();
                }
            }
        }

        if let [from, to, ..] = record.replace_char[..] {
            let from = u32::try_from(from).ok().and_then(char::from_u32);
            let to = u32::try_from(to).ok().and_then(char::from_u32);
            if let (Some(from), Some(to)) = (from, to) {
                value = value.replace(from, to.encode_utf8(&mut [0; 4]));
            }
        }

        match record.operation {
            Operation::None => {}
            Operation::InternalToClassId => value = value.replace('$', "."),
            Operation::DescToClassId => {
                let mut chars = value.chars();
                if value.chars().count() >= 2 {
                    chars.next();
                    chars.next_back();
                }
                value = chars.as_str().replace('$', ".");
            }
        }

        Ok(value)
    }

    fn get_class_id(&self, index: i32) -> Result<ClassId> {
        let value = self.get_string(index)?;
        Ok(ClassId::parse(&value, self.is_local_class_name(index)))
    }

    fn is_local_class_name(&self, index: i32) -> bool {
        self.local_names.contains(&index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(f: impl FnOnce(&mut Record)) -> Record {
        let mut record = Record::default();
        f(&mut record);
        record
    }

    #[test]
    fn direct_strings() {
        let strings = ["foo", "bar"];
        let names = JvmNameResolver::new(StringTableTypes::default(), &strings);

        assert_eq!(names.get_string(0).unwrap(), "foo");
        assert_eq!(names.get_string(1).unwrap(), "bar");
        assert!(matches!(
            names.get_string(2),
            Err(crate::Error::UnresolvedIndex(2))
        ));
        assert!(matches!(
            names.get_string(-1),
            Err(crate::Error::UnresolvedIndex(-1))
        ));
    }

    #[test]
    fn ranges_and_predefined() {
        let types = StringTableTypes {
            record: vec![
                record(|r| r.range = 2),
                record(|r| r.predefined_index = Some(8)),
                record(|r| r.predefined_index = Some(1000)),
                record(|r| r.string = Some("literal".to_string())),
            ],
            local_name: vec![],
        };
        let strings = ["a", "b", "", "d", "", "f"];
        let names = JvmNameResolver::new(types, &strings);

        assert_eq!(names.get_string(0).unwrap(), "a");
        assert_eq!(names.get_string(1).unwrap(), "b");
        assert_eq!(names.get_string(2).unwrap(), "kotlin/Int");
        // predefined index out of range falls back to the raw string
        assert_eq!(names.get_string(3).unwrap(), "d");
        assert_eq!(names.get_string(4).unwrap(), "literal");
        // past all records
        assert_eq!(names.get_string(5).unwrap(), "f");
    }

    #[test]
    fn substring_and_replace() {
        let types = StringTableTypes {
            record: vec![
                record(|r| r.substring_index = vec![1, 4]),
                record(|r| r.substring_index = vec![3, 99]),
                record(|r| r.replace_char = vec![i32::from(b'$'), i32::from(b'.')]),
                record(|r| {
                    r.substring_index = vec![0, 3];
                    r.replace_char = vec![i32::from(b'a'), i32::from(b'z')];
                }),
            ],
            local_name: vec![],
        };
        let strings = ["xabcx", "keep", "A$B$C", "aaaa"];
        let names = JvmNameResolver::new(types, &strings);

        assert_eq!(names.get_string(0).unwrap(), "abc");
        assert_eq!(names.get_string(1).unwrap(), "keep");
        assert_eq!(names.get_string(2).unwrap(), "A.B.C");
        assert_eq!(names.get_string(3).unwrap(), "zzz");
    }

    #[test]
    fn operations() {
        let types = StringTableTypes {
            record: vec![
                record(|r| r.operation = Operation::InternalToClassId),
                record(|r| r.operation = Operation::DescToClassId),
                record(|r| r.operation = Operation::DescToClassId),
            ],
            local_name: vec![],
        };
        let strings = ["a/b/C$D", "La/b/C$D;", "X"];
        let names = JvmNameResolver::new(types, &strings);

        assert_eq!(names.get_string(0).unwrap(), "a/b/C.D");
        assert_eq!(names.get_string(1).unwrap(), "a/b/C.D");
        assert_eq!(names.get_string(2).unwrap(), "X");
    }

    #[test]
    fn class_ids() {
        let types = StringTableTypes {
            record: vec![],
            local_name: vec![1],
        };
        let strings = ["kotlin/collections/Map.Entry", "Local", "pkg/Outer.Inner"];
        let names = JvmNameResolver::new(types, &strings);

        let entry = names.get_class_id(0).unwrap();
        assert_eq!(entry.package(), "kotlin/collections");
        assert_eq!(entry.relative_class_name(), "Map.Entry");
        assert!(!entry.is_local());
        assert_eq!(entry.as_string(), "kotlin/collections/Map.Entry");

        let local = names.get_class_id(1).unwrap();
        assert_eq!(local.package(), "");
        assert!(local.is_local());
        assert!(names.is_local_class_name(1));
        assert_eq!(local.to_string(), "Local");
        assert_eq!(local.as_string(), local.to_string());

        assert_eq!(
            names.get_class_id(2).unwrap(),
            ClassId::new("pkg", "Outer.Inner", false)
        );
    }

    #[test]
    fn predefined_table() {
        assert_eq!(PREDEFINED_STRINGS[0], "kotlin/Any");
        assert_eq!(PREDEFINED_STRINGS[14], "kotlin/String");
        assert_eq!(
            PREDEFINED_STRINGS[43],
            "kotlin/collections/MutableListIterator"
        );
    }
}
