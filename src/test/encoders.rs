//! Encoders turning metadata messages back into their wire form.
//!
//! Only used to craft decoder input; every field the decoder understands is written,
//! extensions included.

use crate::{
    metadata::proto::{
        Class, Constructor, EnumEntry, Function, JvmFieldSignature, JvmMethodSignature,
        JvmPropertySignature, Operation, Package, Projection, Property, Record,
        StringTableTypes, Type, TypeAlias, TypeArgument, TypeParameter, TypeTableRaw,
        ValueParameter, Variance,
    },
    test::Writer,
};

/// A message that can be written to a [`Writer`]
pub trait Encode {
    fn encode(&self, writer: &mut Writer);

    fn to_bytes(&self) -> Vec<u8> {
        let mut writer = Writer::new();
        self.encode(&mut writer);
        writer.finish()
    }
}

impl Writer {
    /// Embedded message field holding `message`
    pub fn encoded(&mut self, number: u32, message: &impl Encode) -> &mut Self {
        self.bytes(number, &message.to_bytes())
    }

    pub fn opt_encoded(&mut self, number: u32, message: Option<&impl Encode>) -> &mut Self {
        if let Some(message) = message {
            self.encoded(number, message);
        }
        self
    }

    pub fn all_encoded<'a, M: Encode + 'a>(
        &mut self,
        number: u32,
        messages: impl IntoIterator<Item = &'a M>,
    ) -> &mut Self {
        for message in messages {
            self.encoded(number, message);
        }
        self
    }
}

impl<T: Encode> Encode for Box<T> {
    fn encode(&self, writer: &mut Writer) {
        (**self).encode(writer);
    }
}

impl Encode for Type {
    fn encode(&self, writer: &mut Writer) {
        if self.flags != 0 {
            writer.int32(1, self.flags);
        }
        writer.all_encoded(2, &self.argument);
        if self.nullable {
            writer.bool(3, true);
        }
        writer
            .opt_int32(4, self.flexible_type_capabilities_id)
            .opt_encoded(5, self.flexible_upper_bound.as_ref())
            .opt_int32(6, self.class_name)
            .opt_int32(7, self.type_parameter)
            .opt_int32(8, self.flexible_upper_bound_id)
            .opt_int32(9, self.type_parameter_name)
            .opt_encoded(10, self.outer_type.as_ref())
            .opt_int32(11, self.outer_type_id)
            .opt_int32(12, self.type_alias_name)
            .opt_encoded(13, self.abbreviated_type.as_ref())
            .opt_int32(14, self.abbreviated_type_id);
        if let Some(is_raw) = self.is_raw {
            writer.bool(101, is_raw);
        }
    }
}

impl Encode for TypeArgument {
    fn encode(&self, writer: &mut Writer) {
        if self.projection != Projection::Inv {
            writer.int32(1, self.projection as i32);
        }
        writer
            .opt_encoded(2, self.ty.as_ref())
            .opt_int32(3, self.type_id);
    }
}

impl Encode for TypeParameter {
    fn encode(&self, writer: &mut Writer) {
        writer.int32(1, self.id).int32(2, self.name);
        if self.reified {
            writer.bool(3, true);
        }
        if self.variance != Variance::Inv {
            writer.int32(4, self.variance as i32);
        }
        writer
            .all_encoded(5, &self.upper_bound)
            .packed_int32(6, &self.upper_bound_id);
    }
}

impl Encode for TypeTableRaw {
    fn encode(&self, writer: &mut Writer) {
        writer
            .all_encoded(1, &self.types)
            .opt_int32(2, self.first_nullable);
    }
}

impl Encode for ValueParameter {
    fn encode(&self, writer: &mut Writer) {
        if self.flags != 0 {
            writer.int32(1, self.flags);
        }
        writer
            .int32(2, self.name)
            .opt_encoded(3, self.ty.as_ref())
            .opt_encoded(4, self.vararg_element_type.as_ref())
            .opt_int32(5, self.type_id)
            .opt_int32(6, self.vararg_element_type_id);
    }
}

impl Encode for JvmMethodSignature {
    fn encode(&self, writer: &mut Writer) {
        writer.opt_int32(1, self.name).opt_int32(2, self.desc);
    }
}

impl Encode for JvmFieldSignature {
    fn encode(&self, writer: &mut Writer) {
        writer.opt_int32(1, self.name).opt_int32(2, self.desc);
    }
}

impl Encode for JvmPropertySignature {
    fn encode(&self, writer: &mut Writer) {
        writer
            .opt_encoded(1, self.field.as_ref())
            .opt_encoded(2, self.synthetic_method.as_ref())
            .opt_encoded(3, self.getter.as_ref())
            .opt_encoded(4, self.setter.as_ref());
    }
}

impl Encode for Constructor {
    fn encode(&self, writer: &mut Writer) {
        writer
            .int32(1, self.flags)
            .all_encoded(2, &self.value_parameter)
            .opt_encoded(100, self.constructor_signature.as_ref());
    }
}

impl Encode for Function {
    fn encode(&self, writer: &mut Writer) {
        writer
            .int32(1, self.old_flags)
            .int32(2, self.name)
            .opt_encoded(3, self.return_type.as_ref())
            .all_encoded(4, &self.type_parameter)
            .opt_encoded(5, self.receiver_type.as_ref())
            .all_encoded(6, &self.value_parameter)
            .opt_int32(7, self.return_type_id)
            .opt_int32(8, self.receiver_type_id)
            .int32(9, self.flags)
            .opt_encoded(30, self.type_table.as_ref())
            .opt_encoded(100, self.method_signature.as_ref())
            .opt_int32(101, self.lambda_class_origin_name);
    }
}

impl Encode for Property {
    fn encode(&self, writer: &mut Writer) {
        writer
            .int32(1, self.old_flags)
            .int32(2, self.name)
            .opt_encoded(3, self.return_type.as_ref())
            .all_encoded(4, &self.type_parameter)
            .opt_encoded(5, self.receiver_type.as_ref())
            .opt_encoded(6, self.setter_value_parameter.as_ref())
            .opt_int32(7, self.getter_flags)
            .opt_int32(8, self.setter_flags)
            .opt_int32(9, self.return_type_id)
            .opt_int32(10, self.receiver_type_id)
            .int32(11, self.flags)
            .opt_encoded(100, self.property_signature.as_ref());
    }
}

impl Encode for TypeAlias {
    fn encode(&self, writer: &mut Writer) {
        writer
            .int32(1, self.flags)
            .int32(2, self.name)
            .all_encoded(3, &self.type_parameter)
            .opt_encoded(4, self.underlying_type.as_ref())
            .opt_int32(5, self.underlying_type_id)
            .opt_encoded(6, self.expanded_type.as_ref())
            .opt_int32(7, self.expanded_type_id);
    }
}

impl Encode for EnumEntry {
    fn encode(&self, writer: &mut Writer) {
        writer.opt_int32(1, self.name);
    }
}

impl Encode for Class {
    fn encode(&self, writer: &mut Writer) {
        writer
            .int32(1, self.flags)
            .packed_int32(2, &self.supertype_id)
            .int32(3, self.fq_name)
            .opt_int32(4, self.companion_object_name)
            .all_encoded(5, &self.type_parameter)
            .all_encoded(6, &self.supertype)
            .packed_int32(7, &self.nested_class_name)
            .all_encoded(8, &self.constructor)
            .all_encoded(9, &self.function)
            .all_encoded(10, &self.property)
            .all_encoded(11, &self.type_alias)
            .all_encoded(13, &self.enum_entry)
            .packed_int32(16, &self.sealed_subclass_fq_name)
            .opt_encoded(30, self.type_table.as_ref())
            .opt_int32(101, self.class_module_name)
            .all_encoded(102, &self.class_local_variable);
    }
}

impl Encode for Package {
    fn encode(&self, writer: &mut Writer) {
        writer
            .all_encoded(3, &self.function)
            .all_encoded(4, &self.property)
            .all_encoded(5, &self.type_alias)
            .opt_encoded(30, self.type_table.as_ref())
            .opt_int32(101, self.package_module_name)
            .all_encoded(102, &self.package_local_variable);
    }
}

impl Encode for Record {
    fn encode(&self, writer: &mut Writer) {
        if self.range != 1 {
            writer.int32(1, self.range);
        }
        writer.opt_int32(2, self.predefined_index);
        if self.operation != Operation::None {
            writer.int32(3, self.operation as i32);
        }
        writer
            .packed_int32(4, &self.substring_index)
            .packed_int32(5, &self.replace_char);
        if let Some(string) = &self.string {
            writer.string(6, string);
        }
    }
}

impl Encode for StringTableTypes {
    fn encode(&self, writer: &mut Writer) {
        writer
            .all_encoded(1, &self.record)
            .packed_int32(5, &self.local_name);
    }
}

/// A complete metadata stream: delimited string table header, then `record`
pub fn stream(types: &StringTableTypes, record: &impl Encode) -> Vec<u8> {
    let mut writer = Writer::new();
    writer.delimited(&types.to_bytes());
    record.encode(&mut writer);
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{proto::ProtoParser, ExtensionRegistry};

    #[test]
    fn function_survives_decoding() {
        let function = Function {
            name: 4,
            flags: 38,
            return_type: Some(Type {
                class_name: Some(1),
                nullable: true,
                argument: vec![TypeArgument {
                    projection: Projection::Out,
                    ty: Some(Box::new(Type {
                        type_parameter: Some(0),
                        ..Type::default()
                    })),
                    type_id: None,
                }],
                ..Type::default()
            }),
            type_parameter: vec![TypeParameter {
                id: 0,
                name: 5,
                reified: true,
                variance: Variance::Out,
                upper_bound: vec![],
                upper_bound_id: vec![2, 3],
            }],
            method_signature: Some(JvmMethodSignature {
                name: Some(6),
                desc: Some(7),
            }),
            ..Function::default()
        };

        let bytes = function.to_bytes();
        let decoded = ProtoParser::new(&bytes, ExtensionRegistry::jvm())
            .parse_function()
            .unwrap();
        assert_eq!(decoded, function);
    }
}
