use std::sync::Arc;

use crate::{
    classfile::{
        annotations::{AnnotationInfo, AnnotationParser, AnnotationValue},
        constpool::{ConstantPool, PoolBuffers, StringInterner},
        decoder::{
            attributes::{self, read_attribute, skip_attributes, GrammarScope, RawAttribute},
            policy::ScanPolicy,
            unit::{
                unit_kind, ClassFileVersion, Containment, DecodedUnit, EnclosingMethod, FieldInfo,
                MethodInfo, MethodParameter, UnitKind,
            },
        },
        diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity},
        modifiers::{ClassModifiers, FieldModifiers, MethodModifiers, ParameterModifiers},
        signatures::{BaseType, SignatureParser},
    },
    scan::ScanContext,
    ByteSource, Error, Parser, Result, SkipReason,
};

/// Magic number of every class file
pub const CLASS_MAGIC: u32 = 0xCAFE_BABE;

/// The root of the type hierarchy, never decoded into a unit
pub const ROOT_OBJECT_TYPE: &str = "java.lang.Object";

/// Everything a single decode needs besides the cursor
struct DecodeScope<'s, 'a> {
    pool: &'s ConstantPool<'a>,
    policy: &'s ScanPolicy,
    context: &'s ScanContext,
    unit: Arc<str>,
}

impl<'s, 'a> DecodeScope<'s, 'a> {
    fn interner(&self) -> &'s StringInterner {
        &self.context.interner
    }

    fn string(&self, index: u16) -> Result<Arc<str>> {
        self.pool.string(index.into(), 0, self.interner())
    }

    fn class_name(&self, index: u16) -> Result<Arc<str>> {
        self.pool.class_name(index.into(), self.interner())
    }

    fn signature_parser<'i>(&self, input: &'i str) -> SignatureParser<'i> {
        SignatureParser::new(input).with_max_depth(self.policy.max_grammar_depth)
    }

    fn descriptor_parser<'i>(&self, input: &'i str) -> SignatureParser<'i> {
        SignatureParser::descriptor(input).with_max_depth(self.policy.max_grammar_depth)
    }

    fn annotations(&self, attribute: RawAttribute<'a>) -> Result<Vec<AnnotationInfo>> {
        AnnotationParser::new(attribute.body, self.pool, self.interner())
            .with_max_depth(self.policy.max_grammar_depth)
            .parse_annotations()
    }

    fn wants_annotations(&self, name: &[u8]) -> bool {
        self.policy.enable_annotation_info
            && (name == attributes::RUNTIME_VISIBLE_ANNOTATIONS
                || (name == attributes::RUNTIME_INVISIBLE_ANNOTATIONS
                    && self.policy.include_invisible_annotations))
    }

    fn wants_parameter_annotations(&self, name: &[u8]) -> bool {
        self.policy.enable_annotation_info
            && (name == attributes::RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS
                || (name == attributes::RUNTIME_INVISIBLE_PARAMETER_ANNOTATIONS
                    && self.policy.include_invisible_annotations))
    }

    fn report_dropped(&self, category: DiagnosticCategory, what: &str, error: &Error) {
        tracing::debug!("Dropped {} in {}: {}", what, self.unit, error);
        self.context.diagnostics.push(
            Diagnostic::new(
                DiagnosticSeverity::Warning,
                category,
                format!("Dropped {what}: {error}"),
            )
            .with_unit(self.unit.to_string()),
        );
    }
}

/// Decoder for single class files
///
/// Drives positional decoding of one class file: magic, version, constant pool, class
/// header, interfaces, fields, methods and class attributes. A decoder is reusable; it
/// recycles its constant pool buffers between units and is meant to be owned by one worker
/// thread.
///
/// Structural failures abandon the unit with a [`crate::FailureKind::MalformedFormat`]
/// error. Grammar failures in a signature or annotation drop only the field or method they
/// occur in (for the class signature, only the signature) and are reported to the context's
/// diagnostics.
///
/// # Examples
///
/// ```rust,no_run
/// use classscope::{classfile::decoder::UnitDecoder, scan::ScanContext, Physical, ScanPolicy};
///
/// let source = Physical::new("target/classes/com/example/Foo.class")?;
/// let context = ScanContext::new();
/// let mut decoder = UnitDecoder::new();
///
/// let unit = decoder.decode(&source, &ScanPolicy::default(), &context)?;
/// println!("{} extends {:?}", unit.name, unit.superclass);
/// # Ok::<(), classscope::Error>(())
/// ```
#[derive(Default)]
pub struct UnitDecoder {
    buffers: Option<PoolBuffers>,
    scheduled: Vec<Box<dyn ByteSource>>,
}

impl UnitDecoder {
    /// New decoder with empty buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Byte sources handed out by the external scheduler since the last drain.
    pub fn drain_scheduled(&mut self) -> Vec<Box<dyn ByteSource>> {
        std::mem::take(&mut self.scheduled)
    }

    /// Decode one class file.
    ///
    /// # Errors
    /// - [`crate::Error::Skipped`] for `java.lang.Object` and for non-public classes the
    ///   policy excludes
    /// - [`crate::Error::Malformed`], [`crate::Error::OutOfBounds`] or [`crate::Error::Empty`]
    ///   for structurally invalid input
    /// - any error raised by the byte source
    pub fn decode(
        &mut self,
        source: &dyn ByteSource,
        policy: &ScanPolicy,
        context: &ScanContext,
    ) -> Result<DecodedUnit> {
        let data = source.data();
        if data.is_empty() {
            return Err(Error::Empty);
        }

        let mut parser = Parser::new(data);
        let magic = parser.read_be::<u32>()?;
        if magic != CLASS_MAGIC {
            return Err(malformed_error!("Invalid class file magic 0x{:08X}", magic));
        }

        let minor = parser.read_be::<u16>()?;
        let major = parser.read_be::<u16>()?;

        let pool = ConstantPool::parse_with(&mut parser, self.buffers.take().unwrap_or_default())?;
        let result = Self::decode_unit(&mut parser, &pool, source, policy, context)
            .map(|mut unit| {
                unit.version = ClassFileVersion { major, minor };
                unit
            });
        self.buffers = Some(pool.into_buffers());

        let unit = result?;
        if policy.extend_scanning {
            self.schedule_external(&unit, context);
        }

        tracing::trace!(
            "Decoded {} ({} fields, {} methods)",
            unit.name,
            unit.fields.len(),
            unit.methods.len()
        );
        Ok(unit)
    }

    fn schedule_external(&mut self, unit: &DecodedUnit, context: &ScanContext) {
        let Some(scheduler) = &context.scheduler else {
            return;
        };

        for name in unit.external_references() {
            if let Some(source) = scheduler.schedule_if_unseen(&name) {
                self.scheduled.push(source);
            }
        }
    }

    fn decode_unit<'a>(
        parser: &mut Parser<'a>,
        pool: &ConstantPool<'a>,
        source: &dyn ByteSource,
        policy: &ScanPolicy,
        context: &ScanContext,
    ) -> Result<DecodedUnit> {
        let mut modifiers = ClassModifiers::from_bits_truncate(parser.read_be::<u16>()?);
        let this_class = parser.read_be::<u16>()?;
        let name = pool.class_name(this_class.into(), &context.interner)?;

        if &*name == ROOT_OBJECT_TYPE {
            return Err(Error::Skipped(SkipReason::RootObjectType));
        }
        if !modifiers.contains(ClassModifiers::PUBLIC)
            && !policy.ignore_class_visibility
            && unit_kind(&name) == UnitKind::Type
        {
            return Err(Error::Skipped(SkipReason::Invisible));
        }

        let scope = DecodeScope {
            pool,
            policy,
            context,
            unit: Arc::clone(&name),
        };

        let super_class = parser.read_be::<u16>()?;
        let superclass = pool.optional_class_name(super_class.into(), &context.interner)?;

        let interface_count = parser.read_be::<u16>()?;
        let mut interfaces = Vec::with_capacity(usize::from(interface_count));
        for _ in 0..interface_count {
            interfaces.push(scope.class_name(parser.read_be::<u16>()?)?);
        }

        let field_count = parser.read_be::<u16>()?;
        let mut fields = Vec::new();
        for _ in 0..field_count {
            if let Some(field) = Self::decode_field(parser, &scope)? {
                fields.push(field);
            }
        }

        let method_count = parser.read_be::<u16>()?;
        let mut methods = Vec::new();
        for _ in 0..method_count {
            if let Some(method) = Self::decode_method(parser, &scope)? {
                methods.push(method);
            }
        }

        let mut unit = DecodedUnit {
            name,
            modifiers,
            version: ClassFileVersion::default(),
            superclass,
            interfaces,
            fields,
            methods,
            annotations: Vec::new(),
            signature: None,
            containment: Vec::new(),
            enclosing_method: None,
            source_file: None,
            module_name: None,
            classpath_element: source.classpath_element().map(|e| context.interner.intern(e)),
            module: source.module().map(|m| context.interner.intern(m)),
        };

        let attribute_count = parser.read_be::<u16>()?;
        for _ in 0..attribute_count {
            let attribute = read_attribute(parser, pool)?;
            Self::decode_class_attribute(attribute, &scope, &mut unit, &mut modifiers)?;
        }
        unit.modifiers = modifiers;

        Ok(unit)
    }

    fn decode_class_attribute<'a>(
        mut attribute: RawAttribute<'a>,
        scope: &DecodeScope<'_, 'a>,
        unit: &mut DecodedUnit,
        modifiers: &mut ClassModifiers,
    ) -> Result<()> {
        let body = &mut attribute.body;

        match attribute.name {
            attributes::SIGNATURE => {
                let text = scope.string(body.read_be::<u16>()?)?;
                match scope.signature_parser(&text).parse_class_signature() {
                    Ok(signature) => unit.signature = Some(signature),
                    Err(error) if error.is_grammar() => {
                        scope.report_dropped(DiagnosticCategory::Signature, "class signature", &error);
                    }
                    Err(error) => return Err(error),
                }
            }
            name if scope.wants_annotations(name) => match scope.annotations(attribute) {
                Ok(annotations) => unit.annotations.extend(annotations),
                Err(error) if error.is_grammar() => {
                    scope.report_dropped(DiagnosticCategory::Annotation, "class annotations", &error);
                }
                Err(error) => return Err(error),
            },
            attributes::INNER_CLASSES => {
                let count = body.read_be::<u16>()?;
                for _ in 0..count {
                    let inner_index = body.read_be::<u16>()?;
                    let outer_index = body.read_be::<u16>()?;
                    let _inner_name_index = body.read_be::<u16>()?;
                    let flags = body.read_be::<u16>()?;

                    if inner_index == 0 {
                        continue;
                    }
                    let inner = scope.class_name(inner_index)?;
                    if inner == unit.name {
                        *modifiers |= ClassModifiers::from_bits_truncate(flags);
                    }
                    if let Some(outer) = scope
                        .pool
                        .optional_class_name(outer_index.into(), scope.interner())?
                    {
                        push_containment(unit, inner, outer);
                    }
                }
            }
            attributes::ENCLOSING_METHOD => {
                let class_name = scope.class_name(body.read_be::<u16>()?)?;
                let method_index = body.read_be::<u16>()?;
                let method_name = if method_index == 0 {
                    None
                } else {
                    Some(
                        scope
                            .interner()
                            .intern_utf8(scope.pool.resolve(method_index.into(), 0)?)?,
                    )
                };
                let inner = Arc::clone(&unit.name);
                push_containment(unit, inner, Arc::clone(&class_name));
                unit.enclosing_method = Some(EnclosingMethod {
                    class_name,
                    method_name,
                });
            }
            attributes::SOURCE_FILE => {
                unit.source_file = Some(scope.string(body.read_be::<u16>()?)?);
            }
            attributes::MODULE => {
                let module_index = body.read_be::<u16>()?;
                unit.module_name =
                    Some(scope.pool.qualified_name(module_index.into(), scope.interner())?);
            }
            _ => {}
        }

        Ok(())
    }

    fn decode_field<'a>(
        parser: &mut Parser<'a>,
        scope: &DecodeScope<'_, 'a>,
    ) -> Result<Option<FieldInfo>> {
        let modifiers = FieldModifiers::from_bits_truncate(parser.read_be::<u16>()?);
        let name_index = parser.read_be::<u16>()?;
        let descriptor_index = parser.read_be::<u16>()?;
        let attribute_count = parser.read_be::<u16>()?;

        let policy = scope.policy;
        if !policy.enable_field_info
            || !(modifiers.contains(FieldModifiers::PUBLIC) || policy.ignore_field_visibility)
        {
            skip_attributes(parser, attribute_count)?;
            return Ok(None);
        }

        let name = scope.string(name_index)?;
        let descriptor = scope.string(descriptor_index)?;

        let mut grammar = GrammarScope::default();
        let type_descriptor = grammar.absorb(scope.descriptor_parser(&descriptor).parse_field_type())?;
        let mut type_signature = None;
        let mut constant_value = None;
        let mut annotations = Vec::new();

        for _ in 0..attribute_count {
            let mut attribute = read_attribute(parser, scope.pool)?;
            let body = &mut attribute.body;

            match attribute.name {
                attributes::CONSTANT_VALUE
                    if policy.enable_constant_initializer_values
                        && modifiers.contains(FieldModifiers::STATIC | FieldModifiers::FINAL) =>
                {
                    let index = body.read_be::<u16>()?;
                    constant_value = constant_value_for(scope.pool, index, &descriptor, scope.interner())?;
                }
                attributes::SIGNATURE => {
                    let text = scope.string(body.read_be::<u16>()?)?;
                    type_signature = grammar.absorb(scope.signature_parser(&text).parse_field_type())?;
                }
                other if scope.wants_annotations(other) => {
                    if let Some(found) = grammar.absorb(scope.annotations(attribute))? {
                        annotations.extend(found);
                    }
                }
                _ => {}
            }
        }

        if let Some(error) = grammar.into_failure() {
            scope.report_dropped(DiagnosticCategory::Field, &format!("field '{name}'"), &error);
            return Ok(None);
        }
        let Some(type_descriptor) = type_descriptor else {
            return Ok(None);
        };

        Ok(Some(FieldInfo {
            name,
            descriptor,
            modifiers,
            type_descriptor,
            type_signature,
            constant_value,
            annotations,
        }))
    }

    fn decode_method<'a>(
        parser: &mut Parser<'a>,
        scope: &DecodeScope<'_, 'a>,
    ) -> Result<Option<MethodInfo>> {
        let modifiers = MethodModifiers::from_bits_truncate(parser.read_be::<u16>()?);
        let name_index = parser.read_be::<u16>()?;
        let descriptor_index = parser.read_be::<u16>()?;
        let attribute_count = parser.read_be::<u16>()?;

        let policy = scope.policy;
        if !policy.enable_method_info
            || !(modifiers.contains(MethodModifiers::PUBLIC) || policy.ignore_method_visibility)
        {
            skip_attributes(parser, attribute_count)?;
            return Ok(None);
        }

        let name = scope.string(name_index)?;
        let descriptor = scope.string(descriptor_index)?;

        let mut grammar = GrammarScope::default();
        let type_descriptor =
            grammar.absorb(scope.descriptor_parser(&descriptor).parse_method_signature())?;
        let mut method = MethodInfo {
            name: Arc::clone(&name),
            descriptor: Arc::clone(&descriptor),
            modifiers,
            type_descriptor: crate::classfile::signatures::MethodSignature::no_args_void(),
            type_signature: None,
            parameters: Vec::new(),
            parameter_annotations: Vec::new(),
            annotations: Vec::new(),
            annotation_default: None,
            thrown: Vec::new(),
            has_body: false,
        };
        let mut parameter_annotations = None;

        for _ in 0..attribute_count {
            let mut attribute = read_attribute(parser, scope.pool)?;
            let body = &mut attribute.body;

            match attribute.name {
                attributes::SIGNATURE => {
                    let text = scope.string(body.read_be::<u16>()?)?;
                    method.type_signature =
                        grammar.absorb(scope.signature_parser(&text).parse_method_signature())?;
                }
                attributes::CODE => method.has_body = true,
                attributes::EXCEPTIONS => {
                    let count = body.read_be::<u16>()?;
                    for _ in 0..count {
                        method.thrown.push(scope.class_name(body.read_be::<u16>()?)?);
                    }
                }
                attributes::METHOD_PARAMETERS => {
                    let count = body.read_be::<u8>()?;
                    for _ in 0..count {
                        let name_index = body.read_be::<u16>()?;
                        let flags = body.read_be::<u16>()?;
                        method.parameters.push(MethodParameter {
                            name: if name_index == 0 {
                                None
                            } else {
                                Some(scope.string(name_index)?)
                            },
                            modifiers: ParameterModifiers::from_bits_truncate(flags),
                        });
                    }
                }
                attributes::ANNOTATION_DEFAULT if policy.enable_annotation_info => {
                    let parsed = AnnotationParser::new(attribute.body, scope.pool, scope.interner())
                        .with_max_depth(policy.max_grammar_depth)
                        .parse_default_value();
                    method.annotation_default = grammar.absorb(parsed)?;
                }
                other if scope.wants_annotations(other) => {
                    if let Some(found) = grammar.absorb(scope.annotations(attribute))? {
                        method.annotations.extend(found);
                    }
                }
                other if scope.wants_parameter_annotations(other) => {
                    let parsed = AnnotationParser::new(attribute.body, scope.pool, scope.interner())
                        .with_max_depth(policy.max_grammar_depth)
                        .parse_parameter_annotations();
                    if let Some(found) = grammar.absorb(parsed)? {
                        merge_parameter_annotations(&mut parameter_annotations, found, &name)?;
                    }
                }
                _ => {}
            }
        }

        if let Some(error) = grammar.into_failure() {
            scope.report_dropped(DiagnosticCategory::Method, &format!("method '{name}'"), &error);
            return Ok(None);
        }
        let Some(type_descriptor) = type_descriptor else {
            return Ok(None);
        };
        method.type_descriptor = type_descriptor;
        method.parameter_annotations = parameter_annotations.unwrap_or_default();

        Ok(Some(method))
    }
}

fn push_containment(unit: &mut DecodedUnit, inner: Arc<str>, outer: Arc<str>) {
    if inner == outer {
        return;
    }
    let pair = Containment { inner, outer };
    if !unit.containment.contains(&pair) {
        unit.containment.push(pair);
    }
}

/// Merge a parameter annotation attribute into the lists collected so far.
///
/// Visible and invisible attributes extend each other per parameter; neither replaces the
/// other. Disagreeing parameter counts are structural corruption, including an attribute
/// declaring no parameters next to one that declares some.
fn merge_parameter_annotations(
    merged: &mut Option<Vec<Vec<AnnotationInfo>>>,
    incoming: Vec<Vec<AnnotationInfo>>,
    method: &str,
) -> Result<()> {
    let Some(existing) = merged.as_mut() else {
        *merged = Some(incoming);
        return Ok(());
    };

    if existing.len() != incoming.len() {
        return Err(malformed_error!(
            "Parameter annotation counts disagree for method '{}': {} vs {}",
            method,
            existing.len(),
            incoming.len()
        ));
    }

    for (slot, annotations) in existing.iter_mut().zip(incoming) {
        slot.extend(annotations);
    }
    Ok(())
}

/// Read a `ConstantValue` entry with the representation of the field's declared type.
fn constant_value_for(
    pool: &ConstantPool<'_>,
    index: u16,
    descriptor: &str,
    interner: &StringInterner,
) -> Result<Option<AnnotationValue>> {
    let index = usize::from(index);
    let value = match descriptor.as_bytes() {
        [b'J'] => AnnotationValue::Long(pool.long(index)?),
        [b'F'] => AnnotationValue::Float(pool.float(index)?),
        [b'D'] => AnnotationValue::Double(pool.double(index)?),
        [code] => {
            let Some(base) = BaseType::from_code(*code) else {
                return Ok(None);
            };
            let Some(value) = AnnotationValue::from_integer(base, pool.integer(index)?) else {
                return Ok(None);
            };
            value
        }
        b"Ljava/lang/String;" => AnnotationValue::String(pool.string(index, 0, interner)?),
        _ => return Ok(None),
    };
    Ok(Some(value))
}
