use super::{
    element::{encode_annotation, ElementValue},
    pool::PoolBuilder,
};

/// Annotation occurrence described by descriptor and element names
#[derive(Debug, Clone)]
pub struct AnnotationSpec {
    descriptor: String,
    elements: Vec<(String, ElementValue)>,
}

impl AnnotationSpec {
    /// Annotation without elements, e.g. `marker("Lcom/example/Marker;")`.
    pub fn marker(descriptor: &str) -> Self {
        AnnotationSpec {
            descriptor: descriptor.to_string(),
            elements: Vec::new(),
        }
    }

    /// Add one element. Indices inside `value` must come from the pool the class file is
    /// built with.
    pub fn element(mut self, name: &str, value: ElementValue) -> Self {
        self.elements.push((name.to_string(), value));
        self
    }

    fn encode(&self, pool: &mut PoolBuilder, out: &mut Vec<u8>) {
        let type_index = pool.utf8(&self.descriptor);
        let elements: Vec<_> = self
            .elements
            .iter()
            .map(|(name, value)| (pool.utf8(name), value.clone()))
            .collect();
        encode_annotation(type_index, &elements, out);
    }
}

fn annotations_body(pool: &mut PoolBuilder, annotations: &[AnnotationSpec]) -> Vec<u8> {
    let mut body = (annotations.len() as u16).to_be_bytes().to_vec();
    for annotation in annotations {
        annotation.encode(pool, &mut body);
    }
    body
}

fn parameter_annotations_body(pool: &mut PoolBuilder, parameters: &[Vec<AnnotationSpec>]) -> Vec<u8> {
    let mut body = vec![parameters.len() as u8];
    for annotations in parameters {
        body.extend(annotations_body(pool, annotations));
    }
    body
}

fn write_attribute(pool: &mut PoolBuilder, out: &mut Vec<u8>, name: &str, body: &[u8]) {
    out.extend_from_slice(&pool.utf8(name).to_be_bytes());
    out.extend_from_slice(&(body.len() as u32).to_be_bytes());
    out.extend_from_slice(body);
}

fn write_attributes(pool: &mut PoolBuilder, out: &mut Vec<u8>, attributes: &[(String, Vec<u8>)]) {
    out.extend_from_slice(&(attributes.len() as u16).to_be_bytes());
    for (name, body) in attributes {
        write_attribute(pool, out, name, body);
    }
}

/// Collects the visible and invisible annotation attributes shared by every record kind.
fn push_annotation_attributes(
    pool: &mut PoolBuilder,
    attributes: &mut Vec<(String, Vec<u8>)>,
    visible: &[AnnotationSpec],
    invisible: &[AnnotationSpec],
) {
    if !visible.is_empty() {
        let body = annotations_body(pool, visible);
        attributes.push(("RuntimeVisibleAnnotations".to_string(), body));
    }
    if !invisible.is_empty() {
        let body = annotations_body(pool, invisible);
        attributes.push(("RuntimeInvisibleAnnotations".to_string(), body));
    }
}

#[derive(Debug, Clone)]
enum ConstantSpec {
    Int(i32),
    Long(i64),
    String(String),
}

/// One field record
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    descriptor: String,
    access: u16,
    signature: Option<String>,
    constant: Option<ConstantSpec>,
    annotations: Vec<AnnotationSpec>,
    invisible_annotations: Vec<AnnotationSpec>,
    extra: Vec<(String, Vec<u8>)>,
}

impl FieldSpec {
    /// Public field with the given name and descriptor.
    pub fn new(name: &str, descriptor: &str) -> Self {
        FieldSpec {
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            access: 0x0001,
            signature: None,
            constant: None,
            annotations: Vec::new(),
            invisible_annotations: Vec::new(),
            extra: Vec::new(),
        }
    }

    pub fn access(mut self, access: u16) -> Self {
        self.access = access;
        self
    }

    pub fn signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }

    pub fn constant_int(mut self, value: i32) -> Self {
        self.constant = Some(ConstantSpec::Int(value));
        self
    }

    pub fn constant_long(mut self, value: i64) -> Self {
        self.constant = Some(ConstantSpec::Long(value));
        self
    }

    pub fn constant_string(mut self, value: &str) -> Self {
        self.constant = Some(ConstantSpec::String(value.to_string()));
        self
    }

    pub fn annotation(mut self, annotation: AnnotationSpec) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn invisible_annotation(mut self, annotation: AnnotationSpec) -> Self {
        self.invisible_annotations.push(annotation);
        self
    }

    pub fn unknown_attribute(mut self, name: &str, body: &[u8]) -> Self {
        self.extra.push((name.to_string(), body.to_vec()));
        self
    }

    fn encode(&self, pool: &mut PoolBuilder, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.access.to_be_bytes());
        out.extend_from_slice(&pool.utf8(&self.name).to_be_bytes());
        out.extend_from_slice(&pool.utf8(&self.descriptor).to_be_bytes());

        let mut attributes = Vec::new();
        if let Some(constant) = &self.constant {
            let index = match constant {
                ConstantSpec::Int(value) => pool.integer(*value),
                ConstantSpec::Long(value) => pool.long(*value),
                ConstantSpec::String(value) => pool.string(value),
            };
            attributes.push(("ConstantValue".to_string(), index.to_be_bytes().to_vec()));
        }
        if let Some(signature) = &self.signature {
            let index = pool.utf8(signature);
            attributes.push(("Signature".to_string(), index.to_be_bytes().to_vec()));
        }
        push_annotation_attributes(pool, &mut attributes, &self.annotations, &self.invisible_annotations);
        attributes.extend(self.extra.iter().cloned());

        write_attributes(pool, out, &attributes);
    }
}

/// One method record
#[derive(Debug, Clone)]
pub struct MethodSpec {
    name: String,
    descriptor: String,
    access: u16,
    signature: Option<String>,
    code: bool,
    exceptions: Vec<String>,
    parameters: Vec<(Option<String>, u16)>,
    annotations: Vec<AnnotationSpec>,
    invisible_annotations: Vec<AnnotationSpec>,
    visible_parameter_annotations: Option<Vec<Vec<AnnotationSpec>>>,
    invisible_parameter_annotations: Option<Vec<Vec<AnnotationSpec>>>,
    annotation_default: Option<ElementValue>,
    extra: Vec<(String, Vec<u8>)>,
}

impl MethodSpec {
    /// Public method with the given name and descriptor.
    pub fn new(name: &str, descriptor: &str) -> Self {
        MethodSpec {
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            access: 0x0001,
            signature: None,
            code: false,
            exceptions: Vec::new(),
            parameters: Vec::new(),
            annotations: Vec::new(),
            invisible_annotations: Vec::new(),
            visible_parameter_annotations: None,
            invisible_parameter_annotations: None,
            annotation_default: None,
            extra: Vec::new(),
        }
    }

    pub fn access(mut self, access: u16) -> Self {
        self.access = access;
        self
    }

    pub fn signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }

    /// Add a minimal `Code` attribute (a single `return`).
    pub fn with_code(mut self) -> Self {
        self.code = true;
        self
    }

    /// Internal names of declared exceptions.
    pub fn exceptions(mut self, exceptions: &[&str]) -> Self {
        self.exceptions = exceptions.iter().map(ToString::to_string).collect();
        self
    }

    /// `MethodParameters` entries; an empty name encodes name index 0.
    pub fn parameters(mut self, parameters: &[(&str, u16)]) -> Self {
        self.parameters = parameters
            .iter()
            .map(|(name, flags)| ((!name.is_empty()).then(|| name.to_string()), *flags))
            .collect();
        self
    }

    pub fn annotation(mut self, annotation: AnnotationSpec) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn invisible_annotation(mut self, annotation: AnnotationSpec) -> Self {
        self.invisible_annotations.push(annotation);
        self
    }

    pub fn visible_parameter_annotations(mut self, parameters: Vec<Vec<AnnotationSpec>>) -> Self {
        self.visible_parameter_annotations = Some(parameters);
        self
    }

    pub fn invisible_parameter_annotations(mut self, parameters: Vec<Vec<AnnotationSpec>>) -> Self {
        self.invisible_parameter_annotations = Some(parameters);
        self
    }

    pub fn annotation_default(mut self, value: ElementValue) -> Self {
        self.annotation_default = Some(value);
        self
    }

    pub fn unknown_attribute(mut self, name: &str, body: &[u8]) -> Self {
        self.extra.push((name.to_string(), body.to_vec()));
        self
    }

    fn encode(&self, pool: &mut PoolBuilder, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.access.to_be_bytes());
        out.extend_from_slice(&pool.utf8(&self.name).to_be_bytes());
        out.extend_from_slice(&pool.utf8(&self.descriptor).to_be_bytes());

        let mut attributes = Vec::new();
        if self.code {
            // max_stack, max_locals, code_length, `return`, no handlers, no attributes
            let mut body = vec![0, 1, 0, 1];
            body.extend_from_slice(&1u32.to_be_bytes());
            body.push(0xB1);
            body.extend_from_slice(&[0, 0, 0, 0]);
            attributes.push(("Code".to_string(), body));
        }
        if let Some(signature) = &self.signature {
            let index = pool.utf8(signature);
            attributes.push(("Signature".to_string(), index.to_be_bytes().to_vec()));
        }
        if !self.exceptions.is_empty() {
            let mut body = (self.exceptions.len() as u16).to_be_bytes().to_vec();
            for exception in &self.exceptions {
                body.extend_from_slice(&pool.class(exception).to_be_bytes());
            }
            attributes.push(("Exceptions".to_string(), body));
        }
        if !self.parameters.is_empty() {
            let mut body = vec![self.parameters.len() as u8];
            for (name, flags) in &self.parameters {
                let index = name.as_deref().map_or(0, |name| pool.utf8(name));
                body.extend_from_slice(&index.to_be_bytes());
                body.extend_from_slice(&flags.to_be_bytes());
            }
            attributes.push(("MethodParameters".to_string(), body));
        }
        push_annotation_attributes(pool, &mut attributes, &self.annotations, &self.invisible_annotations);
        if let Some(parameters) = &self.visible_parameter_annotations {
            let body = parameter_annotations_body(pool, parameters);
            attributes.push(("RuntimeVisibleParameterAnnotations".to_string(), body));
        }
        if let Some(parameters) = &self.invisible_parameter_annotations {
            let body = parameter_annotations_body(pool, parameters);
            attributes.push(("RuntimeInvisibleParameterAnnotations".to_string(), body));
        }
        if let Some(value) = &self.annotation_default {
            attributes.push(("AnnotationDefault".to_string(), value.encode()));
        }
        attributes.extend(self.extra.iter().cloned());

        write_attributes(pool, out, &attributes);
    }
}

/// Builder for a complete class file
///
/// Names are given in internal form (`com/example/Foo`). Defaults: public, super class
/// `java/lang/Object`, version 52.0.
#[derive(Debug, Clone)]
pub struct ClassFileBuilder {
    pool: PoolBuilder,
    name: String,
    access: u16,
    version: (u16, u16),
    superclass: Option<String>,
    interfaces: Vec<String>,
    fields: Vec<FieldSpec>,
    methods: Vec<MethodSpec>,
    signature: Option<String>,
    annotations: Vec<AnnotationSpec>,
    invisible_annotations: Vec<AnnotationSpec>,
    inner_classes: Vec<(String, Option<String>, u16)>,
    enclosing_method: Option<(String, Option<(String, String)>)>,
    source_file: Option<String>,
    module: Option<String>,
    extra: Vec<(String, Vec<u8>)>,
}

impl ClassFileBuilder {
    pub fn new(name: &str) -> Self {
        Self::with_pool(name, PoolBuilder::new())
    }

    /// Start from a pool that already holds the entries referenced by element values.
    pub fn with_pool(name: &str, pool: PoolBuilder) -> Self {
        ClassFileBuilder {
            pool,
            name: name.to_string(),
            access: 0x0021,
            version: (52, 0),
            superclass: Some("java/lang/Object".to_string()),
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            signature: None,
            annotations: Vec::new(),
            invisible_annotations: Vec::new(),
            inner_classes: Vec::new(),
            enclosing_method: None,
            source_file: None,
            module: None,
            extra: Vec::new(),
        }
    }

    pub fn access(mut self, access: u16) -> Self {
        self.access = access;
        self
    }

    pub fn version(mut self, major: u16, minor: u16) -> Self {
        self.version = (major, minor);
        self
    }

    pub fn superclass(mut self, name: &str) -> Self {
        self.superclass = Some(name.to_string());
        self
    }

    pub fn no_superclass(mut self) -> Self {
        self.superclass = None;
        self
    }

    pub fn interface(mut self, name: &str) -> Self {
        self.interfaces.push(name.to_string());
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn method(mut self, method: MethodSpec) -> Self {
        self.methods.push(method);
        self
    }

    pub fn class_signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }

    pub fn annotation(mut self, annotation: AnnotationSpec) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn invisible_annotation(mut self, annotation: AnnotationSpec) -> Self {
        self.invisible_annotations.push(annotation);
        self
    }

    pub fn inner_class(mut self, inner: &str, outer: Option<&str>, flags: u16) -> Self {
        self.inner_classes
            .push((inner.to_string(), outer.map(ToString::to_string), flags));
        self
    }

    /// `EnclosingMethod` with the enclosing class and optional `(name, descriptor)`.
    pub fn enclosing_method(mut self, class: &str, method: Option<(&str, &str)>) -> Self {
        self.enclosing_method = Some((
            class.to_string(),
            method.map(|(name, descriptor)| (name.to_string(), descriptor.to_string())),
        ));
        self
    }

    pub fn source_file(mut self, name: &str) -> Self {
        self.source_file = Some(name.to_string());
        self
    }

    /// `Module` attribute with the given module name and empty directive tables.
    pub fn module(mut self, name: &str) -> Self {
        self.module = Some(name.to_string());
        self
    }

    pub fn attribute(mut self, name: &str, body: &[u8]) -> Self {
        self.extra.push((name.to_string(), body.to_vec()));
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        let pool = &mut self.pool;
        let mut body = Vec::new();

        body.extend_from_slice(&self.access.to_be_bytes());
        body.extend_from_slice(&pool.class(&self.name).to_be_bytes());
        let super_index = self.superclass.as_deref().map_or(0, |name| pool.class(name));
        body.extend_from_slice(&super_index.to_be_bytes());

        body.extend_from_slice(&(self.interfaces.len() as u16).to_be_bytes());
        for interface in &self.interfaces {
            body.extend_from_slice(&pool.class(interface).to_be_bytes());
        }

        body.extend_from_slice(&(self.fields.len() as u16).to_be_bytes());
        for field in &self.fields {
            field.encode(pool, &mut body);
        }

        body.extend_from_slice(&(self.methods.len() as u16).to_be_bytes());
        for method in &self.methods {
            method.encode(pool, &mut body);
        }

        let mut attributes = Vec::new();
        if let Some(signature) = &self.signature {
            let index = pool.utf8(signature);
            attributes.push(("Signature".to_string(), index.to_be_bytes().to_vec()));
        }
        push_annotation_attributes(pool, &mut attributes, &self.annotations, &self.invisible_annotations);
        if !self.inner_classes.is_empty() {
            let mut entry = (self.inner_classes.len() as u16).to_be_bytes().to_vec();
            for (inner, outer, flags) in &self.inner_classes {
                let inner_index = pool.class(inner);
                let outer_index = outer.as_deref().map_or(0, |outer| pool.class(outer));
                let simple = inner.rsplit(['$', '/']).next().unwrap_or(inner);
                let name_index = pool.utf8(simple);
                entry.extend_from_slice(&inner_index.to_be_bytes());
                entry.extend_from_slice(&outer_index.to_be_bytes());
                entry.extend_from_slice(&name_index.to_be_bytes());
                entry.extend_from_slice(&flags.to_be_bytes());
            }
            attributes.push(("InnerClasses".to_string(), entry));
        }
        if let Some((class, method)) = &self.enclosing_method {
            let mut entry = pool.class(class).to_be_bytes().to_vec();
            let method_index = method
                .as_ref()
                .map_or(0, |(name, descriptor)| pool.name_and_type(name, descriptor));
            entry.extend_from_slice(&method_index.to_be_bytes());
            attributes.push(("EnclosingMethod".to_string(), entry));
        }
        if let Some(source_file) = &self.source_file {
            let index = pool.utf8(source_file);
            attributes.push(("SourceFile".to_string(), index.to_be_bytes().to_vec()));
        }
        if let Some(module) = &self.module {
            let mut entry = pool.module(module).to_be_bytes().to_vec();
            // flags, version, requires/exports/opens/uses/provides counts
            entry.extend_from_slice(&[0; 14]);
            attributes.push(("Module".to_string(), entry));
        }
        attributes.extend(self.extra.iter().cloned());
        write_attributes(pool, &mut body, &attributes);

        let mut data = Vec::with_capacity(body.len() + 64);
        data.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
        data.extend_from_slice(&self.version.1.to_be_bytes());
        data.extend_from_slice(&self.version.0.to_be_bytes());
        data.extend(pool.build());
        data.extend(body);
        data
    }
}
