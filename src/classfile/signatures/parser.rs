use crate::{
    classfile::signatures::{
        ArrayType, BaseType, ClassRefType, ClassSignature, ClassSuffix, MethodSignature,
        TypeArgument, TypeParameter, TypeSignature, TypeVariable, Wildcard,
    },
    Error::RecursionLimit,
    Result,
};

/// Default nesting bound for descriptors and generic signatures
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Maximum array dimensions permitted by the class file format
const MAX_ARRAY_DIMENSIONS: usize = 255;

/// Marker method name whose descriptor stands for `()V`
const INSTANCE_INITIALIZER: &str = "<init>";

/// Recursive-descent parser for type descriptors and generic signatures
///
/// One instance parses exactly one string. The same productions serve both grammars; a
/// parser created with [`SignatureParser::descriptor`] rejects the generic-only constructs
/// (type arguments, type parameters, type variables and throws clauses).
///
/// # Example
///
/// ```rust
/// use classscope::classfile::signatures::SignatureParser;
///
/// let mut parser = SignatureParser::new("<T:Ljava/lang/Object;>(TT;I)Ljava/util/List<TT;>;");
/// let sig = parser.parse_method_signature()?;
/// assert_eq!(sig.type_parameters.len(), 1);
/// assert_eq!(sig.parameter_types.len(), 2);
/// # Ok::<(), classscope::Error>(())
/// ```
pub struct SignatureParser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    position: usize,
    depth: usize,
    max_depth: usize,
    generic: bool,
}

impl<'a> SignatureParser<'a> {
    /// Parser for the generic signature grammar
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        SignatureParser {
            input,
            bytes: input.as_bytes(),
            position: 0,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            generic: true,
        }
    }

    /// Parser for the plain descriptor grammar
    #[must_use]
    pub fn descriptor(input: &'a str) -> Self {
        SignatureParser {
            generic: false,
            ..Self::new(input)
        }
    }

    /// Override the nesting bound
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse a field type: base type or reference type, never `void`.
    ///
    /// # Errors
    /// Returns [`crate::Error::GrammarParse`] on any grammar violation, including trailing
    /// input, and [`crate::Error::RecursionLimit`] if nesting is too deep.
    pub fn parse_field_type(&mut self) -> Result<TypeSignature> {
        let ty = self.java_type()?;
        self.end()?;
        Ok(ty)
    }

    /// Parse a return type: like [`SignatureParser::parse_field_type`] but accepts `V`.
    ///
    /// # Errors
    /// See [`SignatureParser::parse_field_type`].
    pub fn parse_return_type(&mut self) -> Result<TypeSignature> {
        let ty = self.result_type()?;
        self.end()?;
        Ok(ty)
    }

    /// Parse a method descriptor or method signature.
    ///
    /// The instance initializer marker `<init>` yields `()V`.
    ///
    /// # Errors
    /// See [`SignatureParser::parse_field_type`].
    pub fn parse_method_signature(&mut self) -> Result<MethodSignature> {
        if self.input == INSTANCE_INITIALIZER {
            self.position = self.bytes.len();
            return Ok(MethodSignature::no_args_void());
        }

        let type_parameters = self.optional_type_parameters()?;

        self.expect(b'(')?;
        let mut parameter_types = Vec::new();
        while self.peek() != Some(b')') {
            parameter_types.push(self.java_type()?);
        }
        self.expect(b')')?;

        let return_type = self.result_type()?;

        let mut throws = Vec::new();
        while self.peek() == Some(b'^') {
            if !self.generic {
                return Err(self.error("throws clause in plain descriptor"));
            }
            self.position += 1;
            throws.push(match self.peek() {
                Some(b'L') => TypeSignature::ClassRef(self.nested(Self::class_type)?),
                Some(b'T') => TypeSignature::Variable(self.type_variable()?),
                _ => return Err(self.error("expected class type or type variable after '^'")),
            });
        }

        self.end()?;
        Ok(MethodSignature {
            type_parameters,
            parameter_types,
            return_type,
            throws,
        })
    }

    /// Parse a class signature.
    ///
    /// # Errors
    /// See [`SignatureParser::parse_field_type`].
    pub fn parse_class_signature(&mut self) -> Result<ClassSignature> {
        let type_parameters = self.optional_type_parameters()?;
        let superclass = self.nested(Self::class_type)?;

        let mut superinterfaces = Vec::new();
        while self.peek().is_some() {
            superinterfaces.push(self.nested(Self::class_type)?);
        }

        Ok(ClassSignature {
            type_parameters,
            superclass,
            superinterfaces,
        })
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.position).copied()
    }

    fn expect(&mut self, expected: u8) -> Result<()> {
        match self.peek() {
            Some(found) if found == expected => {
                self.position += 1;
                Ok(())
            }
            Some(found) => Err(grammar_error!(
                self.input,
                self.position,
                "expected '{}', found '{}'",
                expected as char,
                found as char
            )),
            None => Err(grammar_error!(
                self.input,
                self.position,
                "expected '{}', found end of input",
                expected as char
            )),
        }
    }

    fn error(&self, message: &str) -> crate::Error {
        grammar_error!(self.input, self.position, message)
    }

    fn end(&self) -> Result<()> {
        if self.position != self.bytes.len() {
            return Err(self.error("trailing characters"));
        }
        Ok(())
    }

    fn nested<T>(&mut self, production: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(RecursionLimit(self.max_depth));
        }
        let result = production(self);
        self.depth -= 1;
        result
    }

    fn result_type(&mut self) -> Result<TypeSignature> {
        if self.peek() == Some(b'V') {
            self.position += 1;
            return Ok(TypeSignature::Base(BaseType::Void));
        }
        self.java_type()
    }

    fn java_type(&mut self) -> Result<TypeSignature> {
        match self.peek() {
            Some(b'L' | b'[' | b'T') => self.nested(Self::reference_type),
            Some(code) => match BaseType::from_code(code) {
                Some(base) if base != BaseType::Void => {
                    self.position += 1;
                    Ok(TypeSignature::Base(base))
                }
                _ => Err(grammar_error!(
                    self.input,
                    self.position,
                    "unexpected '{}', expected a type",
                    code as char
                )),
            },
            None => Err(self.error("unexpected end of input, expected a type")),
        }
    }

    fn reference_type(&mut self) -> Result<TypeSignature> {
        match self.peek() {
            Some(b'L') => Ok(TypeSignature::ClassRef(self.class_type()?)),
            Some(b'T') => Ok(TypeSignature::Variable(self.type_variable()?)),
            Some(b'[') => {
                let mut dimensions = 0;
                while self.peek() == Some(b'[') {
                    self.position += 1;
                    dimensions += 1;
                }
                if dimensions > MAX_ARRAY_DIMENSIONS {
                    return Err(self.error("too many array dimensions"));
                }

                let element = self.java_type()?;
                Ok(TypeSignature::Array(ArrayType {
                    dimensions,
                    element: Box::new(element),
                }))
            }
            _ => Err(self.error("expected a reference type")),
        }
    }

    fn identifier(&mut self, allow_slash: bool) -> Result<&'a str> {
        let start = self.position;
        while let Some(c) = self.peek() {
            match c {
                b'.' | b';' | b'[' | b'<' | b'>' | b':' => break,
                b'/' if !allow_slash => break,
                _ => self.position += 1,
            }
        }

        if start == self.position {
            return Err(self.error("expected an identifier"));
        }
        Ok(&self.input[start..self.position])
    }

    fn class_type(&mut self) -> Result<ClassRefType> {
        self.expect(b'L')?;

        let start = self.position;
        let path = self.identifier(true)?;
        if path.split('/').any(str::is_empty) {
            return Err(grammar_error!(
                self.input,
                start,
                "empty package segment in '{}'",
                path
            ));
        }

        let base_name = path.replace('/', ".");
        let type_arguments = self.optional_type_arguments()?;

        let mut suffixes = Vec::new();
        while self.peek() == Some(b'.') {
            self.position += 1;
            let name = self.identifier(false)?.to_string();
            let type_arguments = self.optional_type_arguments()?;
            suffixes.push(ClassSuffix {
                name,
                type_arguments,
            });
        }

        self.expect(b';')?;
        Ok(ClassRefType {
            base_name,
            type_arguments,
            suffixes,
        })
    }

    fn type_variable(&mut self) -> Result<TypeVariable> {
        if !self.generic {
            return Err(self.error("type variable in plain descriptor"));
        }
        self.expect(b'T')?;
        let name = self.identifier(false)?;
        self.expect(b';')?;
        Ok(TypeVariable::new(name))
    }

    fn optional_type_arguments(&mut self) -> Result<Vec<TypeArgument>> {
        if self.peek() != Some(b'<') {
            return Ok(Vec::new());
        }
        if !self.generic {
            return Err(self.error("type arguments in plain descriptor"));
        }

        self.position += 1;
        let mut arguments = Vec::new();
        while self.peek() != Some(b'>') {
            arguments.push(self.type_argument()?);
        }
        if arguments.is_empty() {
            return Err(self.error("empty type argument list"));
        }
        self.position += 1;
        Ok(arguments)
    }

    fn type_argument(&mut self) -> Result<TypeArgument> {
        let wildcard = match self.peek() {
            Some(b'*') => {
                self.position += 1;
                return Ok(TypeArgument {
                    wildcard: Wildcard::Any,
                    bound: None,
                });
            }
            Some(b'+') => Wildcard::Extends,
            Some(b'-') => Wildcard::Super,
            Some(_) => Wildcard::None,
            None => return Err(self.error("unterminated type argument list")),
        };
        if wildcard != Wildcard::None {
            self.position += 1;
        }

        let bound = self.nested(Self::reference_type)?;
        Ok(TypeArgument {
            wildcard,
            bound: Some(bound),
        })
    }

    fn optional_type_parameters(&mut self) -> Result<Vec<TypeParameter>> {
        if self.peek() != Some(b'<') {
            return Ok(Vec::new());
        }
        if !self.generic {
            return Err(self.error("type parameters in plain descriptor"));
        }

        self.position += 1;
        let mut parameters = Vec::new();
        while self.peek() != Some(b'>') {
            if self.peek().is_none() {
                return Err(self.error("unterminated type parameter list"));
            }
            parameters.push(self.type_parameter()?);
        }
        if parameters.is_empty() {
            return Err(self.error("empty type parameter list"));
        }
        self.position += 1;
        Ok(parameters)
    }

    fn type_parameter(&mut self) -> Result<TypeParameter> {
        let name = self.identifier(false)?.to_string();
        self.expect(b':')?;

        let class_bound = match self.peek() {
            Some(b'L' | b'[' | b'T') => Some(self.nested(Self::reference_type)?),
            _ => None,
        };

        let mut interface_bounds = Vec::new();
        while self.peek() == Some(b':') {
            self.position += 1;
            interface_bounds.push(self.nested(Self::reference_type)?);
        }

        Ok(TypeParameter {
            name,
            class_bound,
            interface_bounds,
        })
    }
}
