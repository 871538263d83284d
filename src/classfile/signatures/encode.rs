use crate::classfile::signatures::{
    ClassRefType, ClassSignature, MethodSignature, TypeArgument, TypeParameter, TypeSignature,
    Wildcard,
};

/// Render a signature AST back to canonical JVM signature text.
///
/// Parsing the output with [`crate::classfile::signatures::SignatureParser`] yields a value
/// equal to the one encoded.
pub trait SignatureEncode {
    /// Append the JVM form of `self` to `out`.
    fn encode_into(&self, out: &mut String);

    /// The JVM form of `self`.
    fn to_jvm_signature(&self) -> String {
        let mut out = String::new();
        self.encode_into(&mut out);
        out
    }
}

fn encode_arguments(arguments: &[TypeArgument], out: &mut String) {
    if arguments.is_empty() {
        return;
    }
    out.push('<');
    for argument in arguments {
        argument.encode_into(out);
    }
    out.push('>');
}

fn encode_parameters(parameters: &[TypeParameter], out: &mut String) {
    if parameters.is_empty() {
        return;
    }
    out.push('<');
    for parameter in parameters {
        parameter.encode_into(out);
    }
    out.push('>');
}

impl SignatureEncode for TypeSignature {
    fn encode_into(&self, out: &mut String) {
        match self {
            TypeSignature::Base(base) => out.push(base.code()),
            TypeSignature::ClassRef(class) => class.encode_into(out),
            TypeSignature::Array(array) => {
                for _ in 0..array.dimensions {
                    out.push('[');
                }
                array.element.encode_into(out);
            }
            TypeSignature::Variable(variable) => {
                out.push('T');
                out.push_str(&variable.name);
                out.push(';');
            }
        }
    }
}

impl SignatureEncode for ClassRefType {
    fn encode_into(&self, out: &mut String) {
        out.push('L');
        out.extend(self.base_name.chars().map(|c| if c == '.' { '/' } else { c }));
        encode_arguments(&self.type_arguments, out);
        for suffix in &self.suffixes {
            out.push('.');
            out.push_str(&suffix.name);
            encode_arguments(&suffix.type_arguments, out);
        }
        out.push(';');
    }
}

impl SignatureEncode for TypeArgument {
    fn encode_into(&self, out: &mut String) {
        match self.wildcard {
            Wildcard::Any => {
                out.push('*');
                return;
            }
            Wildcard::Extends => out.push('+'),
            Wildcard::Super => out.push('-'),
            Wildcard::None => {}
        }
        if let Some(bound) = &self.bound {
            bound.encode_into(out);
        }
    }
}

impl SignatureEncode for TypeParameter {
    fn encode_into(&self, out: &mut String) {
        out.push_str(&self.name);
        out.push(':');
        if let Some(bound) = &self.class_bound {
            bound.encode_into(out);
        }
        for bound in &self.interface_bounds {
            out.push(':');
            bound.encode_into(out);
        }
    }
}

impl SignatureEncode for MethodSignature {
    fn encode_into(&self, out: &mut String) {
        encode_parameters(&self.type_parameters, out);
        out.push('(');
        for parameter in &self.parameter_types {
            parameter.encode_into(out);
        }
        out.push(')');
        self.return_type.encode_into(out);
        for thrown in &self.throws {
            out.push('^');
            thrown.encode_into(out);
        }
    }
}

impl SignatureEncode for ClassSignature {
    fn encode_into(&self, out: &mut String) {
        encode_parameters(&self.type_parameters, out);
        self.superclass.encode_into(out);
        for interface in &self.superinterfaces {
            interface.encode_into(out);
        }
    }
}
