//! Signature and annotation grammars as seen through the public API.

mod common;

use classscope::{
    classfile::signatures::{
        parse_class_signature, parse_field_descriptor, parse_method_descriptor,
        parse_method_signature, SignatureEncode, SignatureParser,
    },
    prelude::*,
};
use common::{AnnotationSpec, ClassFileBuilder, MethodSpec};

const CLASS_SIGNATURES: &[&str] = &[
    "Ljava/lang/Object;",
    "<E:Ljava/lang/Object;>Ljava/util/AbstractList<TE;>;Ljava/util/RandomAccess;",
    "<K::Ljava/lang/Comparable<-TK;>;V:Ljava/lang/Number;:Ljava/io/Serializable;>Ljava/lang/Object;",
    "<T:Ljava/lang/Object;>La/Outer<TT;>.Inner<[I>.Leaf;Ljava/lang/Iterable<*>;",
];

#[test]
fn class_signatures_survive_encoding() -> Result<()> {
    for input in CLASS_SIGNATURES {
        let parsed = parse_class_signature(input)?;
        let encoded = parsed.to_jvm_signature();
        assert_eq!(&encoded, input);
        assert_eq!(parse_class_signature(&encoded)?, parsed);
    }
    Ok(())
}

#[test]
fn rendering_uses_source_syntax() -> Result<()> {
    let sig = parse_class_signature(CLASS_SIGNATURES[3])?;
    assert_eq!(sig.superclass.full_name(), "a.Outer$Inner$Leaf");
    assert_eq!(
        sig.to_string(),
        "<T> extends a.Outer<T>.Inner<int[]>.Leaf implements java.lang.Iterable<?>"
    );

    let method = parse_method_signature("<T:Ljava/lang/Exception;>()V^TT;")?;
    assert_eq!(method.to_string(), "<T extends java.lang.Exception> void () throws T");
    Ok(())
}

#[test]
fn descriptors_reject_generic_syntax() {
    assert!(parse_field_descriptor("[[Ljava/lang/String;").is_ok());
    assert!(parse_method_descriptor("(JD[Z)Ljava/lang/Object;").is_ok());

    for input in ["Ljava/util/List<TE;>;", "TT;", "[TT;"] {
        let err = parse_field_descriptor(input).unwrap_err();
        assert!(err.is_grammar(), "{input}: {err}");
    }
    for input in ["(TT;)V", "<T:Ljava/lang/Object;>()V", "()Ljava/util/List<*>;"] {
        let err = parse_method_descriptor(input).unwrap_err();
        assert!(err.is_grammar(), "{input}: {err}");
    }
}

#[test]
fn malformed_signatures_report_position() {
    let cases = [
        ("Ljava/lang/String", "unterminated class type"),
        ("(I", "unterminated parameter list"),
        ("<T>Ljava/lang/Object;", "missing class bound separator"),
        ("Ljava/util/List<>;", "empty type arguments"),
        ("ILjava/lang/Object;", "trailing input"),
    ];
    for (input, what) in cases {
        let err = parse_class_signature(input)
            .map(|_| ())
            .or_else(|_| parse_method_signature(input).map(|_| ()))
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::GrammarParse, "{what}");
        match err {
            Error::GrammarParse { input: reported, .. } => assert_eq!(reported, input),
            other => panic!("{what}: unexpected {other:?}"),
        }
    }
}

#[test]
fn nesting_is_bounded() {
    let mut input = String::new();
    for _ in 0..200 {
        input.push_str("Ljava/util/List<");
    }
    input.push_str("Ljava/lang/String;");
    for _ in 0..200 {
        input.push_str(">;");
    }

    let err = SignatureParser::new(&input).parse_field_type().unwrap_err();
    assert!(err.is_grammar());

    let parsed = SignatureParser::new(&input)
        .with_max_depth(512)
        .parse_field_type();
    assert!(parsed.is_ok());
}

#[test]
fn parameter_annotations_merge_per_parameter() -> Result<()> {
    let policy = ScanPolicy {
        include_invisible_annotations: true,
        ..ScanPolicy::default()
    };
    let builder = ClassFileBuilder::new("app/Handler").method(
        MethodSpec::new("handle", "(Ljava/lang/String;I)V")
            .visible_parameter_annotations(vec![
                vec![AnnotationSpec::marker("Lapp/NotNull;")],
                vec![],
            ])
            .invisible_parameter_annotations(vec![
                vec![],
                vec![AnnotationSpec::marker("Lapp/Positive;")],
            ]),
    );

    let unit = common::decode(builder, &policy)?;
    let parameters = &unit.methods[0].parameter_annotations;
    assert_eq!(parameters.len(), 2);
    assert_eq!(parameters[0].len(), 1);
    assert_eq!(parameters[1].len(), 1);
    assert_eq!(&*parameters[0][0].type_name, "app.NotNull");
    assert_eq!(&*parameters[1][0].type_name, "app.Positive");
    Ok(())
}

#[test]
fn constructor_without_signature() -> Result<()> {
    let unit = common::decode(
        ClassFileBuilder::new("app/Bean").method(MethodSpec::new("<init>", "()V").with_code()),
        &ScanPolicy::default(),
    )?;

    let init = &unit.methods[0];
    assert!(init.is_constructor());
    assert!(init.has_body);
    assert!(init.type_signature.is_none());
    assert_eq!(*init.signature_or_descriptor(), MethodSignature::no_args_void());
    Ok(())
}

#[test]
fn decoding_is_idempotent() -> Result<()> {
    let builder = ClassFileBuilder::new("app/Same")
        .class_signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
        .annotation(AnnotationSpec::marker("Lapp/Marker;"))
        .method(MethodSpec::new("get", "()Ljava/lang/Object;").signature("()TT;"));

    let first = common::decode(builder.clone(), &ScanPolicy::comprehensive())?;
    let second = common::decode(builder, &ScanPolicy::comprehensive())?;
    assert_eq!(first, second);
    Ok(())
}
