//! End-to-end scans: decode, link and query generated class files.

mod common;

use std::sync::Arc;

use classscope::{classfile::signatures::TypeParameterOwner, prelude::*};
use common::{scan, source, AnnotationSpec, ClassFileBuilder, ElementValue, FieldSpec, MethodSpec, PoolBuilder};

#[test]
fn supertype_and_interface_edges() -> Result<()> {
    let report = scan(
        ScanPolicy::default(),
        vec![
            ClassFileBuilder::new("app/Foo").superclass("app/Bar").interface("app/Baz"),
            ClassFileBuilder::new("app/Bar"),
            ClassFileBuilder::new("app/Baz").access(0x0601),
        ],
    )?;
    assert!(report.is_clean());

    let engine = QueryEngine::new(&report.graph);
    let foo = report.graph.type_id("app.Foo").unwrap();

    let subclasses = engine.related_by_name("app.Bar", RelationshipKind::Subclasses)?;
    assert!(subclasses.contains_direct(foo));

    let implementors = engine.related_by_name("app.Baz", RelationshipKind::Implementors)?;
    assert!(implementors.contains_direct(foo));
    assert!(report.graph.type_by_name("app.Baz").unwrap().is_interface());
    Ok(())
}

#[test]
fn annotated_types_and_meta_annotations() -> Result<()> {
    let report = scan(
        ScanPolicy::default(),
        vec![
            ClassFileBuilder::new("app/Component")
                .access(0x2601)
                .annotation(AnnotationSpec::marker("Ljava/lang/annotation/Documented;")),
            ClassFileBuilder::new("app/Service")
                .access(0x2601)
                .annotation(AnnotationSpec::marker("Lapp/Component;")),
            ClassFileBuilder::new("app/UserService").annotation(AnnotationSpec::marker("Lapp/Service;")),
            ClassFileBuilder::new("app/Plain"),
        ],
    )?;

    let engine = QueryEngine::new(&report.graph);
    let direct = engine.related_by_name("app.Component", RelationshipKind::AnnotatedWith)?;
    assert_eq!(direct.direct_names(), vec!["app.Service"]);
    assert_eq!(direct.names(), vec!["app.Service", "app.UserService"]);

    let annotations = engine.related_by_name("app.UserService", RelationshipKind::Annotations)?;
    assert_eq!(
        annotations.names(),
        vec!["app.Component", "app.Service", "java.lang.annotation.Documented"]
    );
    Ok(())
}

#[test]
fn annotation_default_enum_array() -> Result<()> {
    let mut pool = PoolBuilder::new();
    let default = ElementValue::Array(vec![
        ElementValue::enum_constant(&mut pool, "Lapp/Level;", "LOW"),
        ElementValue::enum_constant(&mut pool, "Lapp/Level;", "MEDIUM"),
        ElementValue::enum_constant(&mut pool, "Lapp/Level;", "HIGH"),
    ]);
    let builder = ClassFileBuilder::with_pool("app/Levels", pool)
        .access(0x2601)
        .method(
            MethodSpec::new("value", "()[Lapp/Level;")
                .access(0x0401)
                .annotation_default(default),
        );

    let unit = common::decode(builder, &ScanPolicy::default())?;
    let Some(AnnotationValue::Array(values)) = &unit.methods[0].annotation_default else {
        panic!("expected an array default");
    };
    let constants: Vec<(&str, &str)> = values
        .iter()
        .map(|value| match value {
            AnnotationValue::Enum {
                type_name,
                constant_name,
            } => (&**type_name, &**constant_name),
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(
        constants,
        vec![("app.Level", "LOW"), ("app.Level", "MEDIUM"), ("app.Level", "HIGH")]
    );
    Ok(())
}

#[test]
fn annotation_element_values() -> Result<()> {
    let mut pool = PoolBuilder::new();
    let path = ElementValue::string(&mut pool, "/users");
    let timeout = ElementValue::int(&mut pool, 30);
    let target = ElementValue::class(&mut pool, "Lapp/User;");
    let builder = ClassFileBuilder::with_pool("app/UserResource", pool).annotation(
        AnnotationSpec::marker("Lapp/Resource;")
            .element("path", path)
            .element("timeout", timeout)
            .element("target", target),
    );

    let report = scan(ScanPolicy::default(), vec![builder])?;
    let details = report.graph.type_by_name("app.UserResource").unwrap().details().unwrap();
    let resource = &details.annotations[0];
    assert_eq!(&*resource.type_name, "app.Resource");
    assert_eq!(resource.element("path"), Some(&AnnotationValue::String(Arc::from("/users"))));
    assert_eq!(resource.element("timeout"), Some(&AnnotationValue::Int(30)));
    assert_eq!(
        resource.element("target").map(ToString::to_string).as_deref(),
        Some("app.User.class")
    );

    // Class literals count as dependencies
    let engine = QueryEngine::new(&report.graph);
    let dependencies = engine.related_by_name("app.UserResource", RelationshipKind::Dependencies)?;
    assert!(dependencies.direct_names().contains(&"app.User"));
    Ok(())
}

#[test]
fn member_annotations() -> Result<()> {
    let report = scan(
        ScanPolicy::default(),
        vec![
            ClassFileBuilder::new("app/Controller")
                .method(MethodSpec::new("list", "()V").annotation(AnnotationSpec::marker("Lweb/Get;")))
                .field(FieldSpec::new("repo", "Lapp/Repo;").annotation(AnnotationSpec::marker("Lapp/Inject;"))),
            ClassFileBuilder::new("app/Other")
                .method(MethodSpec::new("run", "()V").access(0x0002).annotation(AnnotationSpec::marker("Lweb/Get;"))),
        ],
    )?;

    let engine = QueryEngine::new(&report.graph);
    let with_get = engine.related_by_name("web.Get", RelationshipKind::ClassesWithMethodAnnotation)?;
    // private methods are dropped under the default policy
    assert_eq!(with_get.names(), vec!["app.Controller"]);

    let with_inject = engine.related_by_name("app.Inject", RelationshipKind::ClassesWithFieldAnnotation)?;
    assert_eq!(with_inject.names(), vec!["app.Controller"]);

    let field_annotations =
        engine.related_by_name("app.Controller", RelationshipKind::FieldAnnotations)?;
    assert_eq!(field_annotations.names(), vec!["app.Inject"]);
    Ok(())
}

#[test]
fn inner_classes_and_enclosing_methods() -> Result<()> {
    let report = scan(
        ScanPolicy::comprehensive(),
        vec![
            ClassFileBuilder::new("app/Outer").inner_class("app/Outer$Inner", Some("app/Outer"), 0x0001),
            ClassFileBuilder::new("app/Outer$Inner")
                .inner_class("app/Outer$Inner", Some("app/Outer"), 0x0009)
                .inner_class("app/Outer$Inner$Leaf", Some("app/Outer$Inner"), 0x0001),
            ClassFileBuilder::new("app/Outer$1")
                .access(0x0020)
                .enclosing_method("app/Outer", Some(("start", "()V"))),
        ],
    )?;

    let graph = &report.graph;
    let engine = QueryEngine::new(graph);

    let inner = engine.related_by_name("app.Outer", RelationshipKind::InnerClasses)?;
    assert_eq!(inner.direct_names(), vec!["app.Outer$1", "app.Outer$Inner"]);
    assert_eq!(
        inner.names(),
        vec!["app.Outer$1", "app.Outer$Inner", "app.Outer$Inner$Leaf"]
    );

    let outer = engine.related_by_name("app.Outer$Inner$Leaf", RelationshipKind::OuterClasses)?;
    assert_eq!(outer.names(), vec!["app.Outer", "app.Outer$Inner"]);

    let nested = graph.type_by_name("app.Outer$Inner").unwrap();
    assert!(nested.modifiers().contains(ClassModifiers::STATIC));

    let anonymous = graph.type_by_name("app.Outer$1").unwrap().details().unwrap();
    let enclosing = anonymous.enclosing_method.as_ref().unwrap();
    assert_eq!(&*enclosing.class_name, "app.Outer");
    assert_eq!(enclosing.method_name.as_deref(), Some("start"));
    Ok(())
}

#[test]
fn generic_signatures_bind_type_variables() -> Result<()> {
    let report = scan(
        ScanPolicy::default(),
        vec![
            ClassFileBuilder::new("app/Box")
                .class_signature("<T:Ljava/lang/Number;>Ljava/lang/Object;")
                .field(FieldSpec::new("value", "Ljava/lang/Number;").signature("TT;"))
                .method(
                    MethodSpec::new("map", "(Ljava/util/function/Function;)Lapp/Box;")
                        .signature("<R:Ljava/lang/Object;>(Ljava/util/function/Function<-TT;+TR;>;)Lapp/Box<TR;>;"),
                )
                .inner_class("app/Box$Entry", Some("app/Box"), 0x0001),
            ClassFileBuilder::new("app/Box$Entry")
                .inner_class("app/Box$Entry", Some("app/Box"), 0x0001)
                .field(FieldSpec::new("owner", "Ljava/lang/Number;").signature("TT;")),
        ],
    )?;

    let graph = &report.graph;
    let boxed = graph.type_by_name("app.Box").unwrap().details().unwrap();
    assert_eq!(
        boxed.signature.as_ref().unwrap().to_string(),
        "<T extends java.lang.Number> extends java.lang.Object"
    );

    let TypeSignature::Variable(variable) = boxed.fields[0].type_signature_or_descriptor() else {
        panic!("expected a type variable");
    };
    let binding = variable.binding().unwrap();
    assert_eq!(binding.parameter.name, "T");

    let map = boxed.methods[0].type_signature.as_ref().unwrap();
    assert_eq!(
        map.to_string(),
        "<R> app.Box<R> (java.util.function.Function<? super T, ? extends R>)"
    );

    let entry = graph.type_by_name("app.Box$Entry").unwrap().details().unwrap();
    let TypeSignature::Variable(owner) = entry.fields[0].type_signature_or_descriptor() else {
        panic!("expected a type variable");
    };
    assert_eq!(owner.binding().unwrap().parameter, binding.parameter);
    Ok(())
}

#[test]
fn self_referential_bounds_bind() -> Result<()> {
    let report = scan(
        ScanPolicy::default(),
        vec![ClassFileBuilder::new("app/Range")
            .class_signature("<T::Ljava/lang/Comparable<TT;>;>Ljava/lang/Object;")
            .field(FieldSpec::new("low", "Ljava/lang/Comparable;").signature("TT;"))],
    )?;

    let range = report.graph.type_by_name("app.Range").unwrap().details().unwrap();
    let signature = range.signature.as_ref().unwrap();
    assert_eq!(
        signature.to_string(),
        "<T extends java.lang.Comparable<T>> extends java.lang.Object"
    );

    let TypeSignature::Variable(low) = range.fields[0].type_signature_or_descriptor() else {
        panic!("expected a type variable");
    };
    let binding = low.binding().unwrap();
    assert_eq!(binding.declared_by, TypeParameterOwner::Class("app.Range".into()));
    assert!(binding.parameter.class_bound.is_none());

    let TypeSignature::ClassRef(comparable) = &binding.parameter.interface_bounds[0] else {
        panic!("expected a class bound");
    };
    let Some(TypeSignature::Variable(inner)) = &comparable.type_arguments[0].bound else {
        panic!("expected a type variable argument");
    };
    assert_eq!(inner.name, "T");
    assert_eq!(inner.binding().unwrap().parameter.name, "T");
    Ok(())
}

#[test]
fn package_and_module_descriptors() -> Result<()> {
    let session = ScanSession::new(ScanPolicy::default());
    session.scan(vec![
        Box::new(
            Memory::new(ClassFileBuilder::new("com/acme/api/Client").build())
                .with_classpath_element("acme.jar")
                .with_module("com.acme"),
        ),
        source(
            ClassFileBuilder::new("com/acme/api/package-info")
                .access(0x1600)
                .annotation(AnnotationSpec::marker("Lcom/acme/Stable;")),
            "acme.jar",
        ),
        Box::new(
            Memory::new(
                ClassFileBuilder::new("module-info")
                    .access(0x8000)
                    .no_superclass()
                    .module("com.acme")
                    .annotation(AnnotationSpec::marker("Lcom/acme/Stable;"))
                    .build(),
            )
            .with_classpath_element("acme.jar")
            .with_module("com.acme"),
        ),
    ])?;
    let report = session.finish()?;
    assert!(report.is_clean(), "{:?}", report.failures);

    let graph = &report.graph;
    let namespace = graph.namespace(graph.namespace_id("com.acme.api").unwrap());
    assert_eq!(namespace.annotations()[0].type_name.as_ref(), "com.acme.Stable");
    assert_eq!(namespace.members().len(), 1);

    let module = graph.module(graph.module_id("com.acme").unwrap());
    assert_eq!(module.annotations().len(), 1);
    assert_eq!(module.location(), Some("acme.jar"));

    let engine = QueryEngine::new(graph);
    assert_eq!(engine.module_members(module.id())?.names(), vec!["com.acme.api.Client"]);
    assert_eq!(
        engine.namespace_members_by_name("com.acme")?.names(),
        vec!["com.acme.api.Client"]
    );
    Ok(())
}

#[test]
fn failures_are_isolated_per_unit() -> Result<()> {
    let mut truncated = ClassFileBuilder::new("app/Broken").build();
    truncated.truncate(truncated.len() / 2);

    let session = ScanSession::new(ScanPolicy::default());
    session.scan(vec![
        source(ClassFileBuilder::new("app/Good"), "classes"),
        Box::new(Memory::new(truncated).with_classpath_element("classes")),
        source(ClassFileBuilder::new("app/Hidden").access(0x0020), "classes"),
        source(
            ClassFileBuilder::new("app/Odd")
                .method(MethodSpec::new("bad", "()V").signature("<T>"))
                .method(MethodSpec::new("fine", "()V")),
            "classes",
        ),
    ])?;
    let report = session.finish()?;

    assert_eq!(report.linked, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].0, "classes #1");
    assert_eq!(report.skips, vec![("classes #2".to_string(), SkipReason::Invisible)]);

    let odd = report.graph.type_by_name("app.Odd").unwrap().details().unwrap();
    let names: Vec<&str> = odd.methods.iter().map(|m| &*m.name).collect();
    assert_eq!(names, vec!["fine"]);
    assert!(report.diagnostics().count_severity(DiagnosticSeverity::Warning) >= 1);
    Ok(())
}

#[test]
fn hostile_names_do_not_stop_the_scan() -> Result<()> {
    // Both names fit the 65535 byte limit of a pool entry
    let deep = format!("{}Deep", "a/".repeat(32_000));
    let long = format!("app/{}", "L".repeat(65_000));

    let session = ScanSession::new(ScanPolicy::default());
    session.scan(vec![
        source(ClassFileBuilder::new(&deep).superclass("app/Base"), "classes"),
        source(ClassFileBuilder::new(&long).interface("app/Marker"), "classes"),
        source(ClassFileBuilder::new("app/Base").interface("app/Marker"), "classes"),
    ])?;
    let report = session.finish()?;

    assert_eq!(report.linked, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].1.kind(), FailureKind::MalformedFormat);

    let engine = QueryEngine::new(&report.graph);
    let implementors = engine.related_by_name("app.Marker", RelationshipKind::Implementors)?;
    assert_eq!(implementors.direct().len(), 2);
    assert!(report.graph.type_by_name("app.Base").is_some_and(|base| !base.is_placeholder()));
    assert!(report.graph.type_by_name(&long.replace('/', ".")).is_some());
    assert_eq!(report.graph.namespaces().count(), 2);
    Ok(())
}

#[test]
fn first_classpath_element_masks_later_ones() -> Result<()> {
    let session = ScanSession::new(ScanPolicy::default());
    session.scan(vec![
        source(ClassFileBuilder::new("app/Config").interface("app/Old"), "override.jar"),
        source(ClassFileBuilder::new("app/Config").interface("app/New"), "app.jar"),
    ])?;
    let report = session.finish()?;

    assert_eq!(report.conflicts.len(), 1);
    assert_eq!(report.conflicts[0].kind(), FailureKind::LinkConflict);

    let engine = QueryEngine::new(&report.graph);
    let interfaces = engine.related_by_name("app.Config", RelationshipKind::Interfaces)?;
    assert_eq!(interfaces.names(), vec!["app.Old"]);
    assert!(engine.related_by_name("app.New", RelationshipKind::Implementors)?.is_empty());
    Ok(())
}

#[test]
fn physical_class_files() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("Disk.class");
    std::fs::write(&path, ClassFileBuilder::new("app/Disk").superclass("app/Base").build())?;

    let session = ScanSession::new(ScanPolicy::default());
    session.scan(vec![Box::new(
        Physical::new(&path)?.with_classpath_element(dir.path().display().to_string()),
    )])?;
    let report = session.finish()?;

    let disk = report.graph.type_by_name("app.Disk").unwrap();
    assert_eq!(
        disk.details().unwrap().superclass.as_deref(),
        Some("app.Base")
    );
    assert!(report.graph.type_by_name("app.Base").unwrap().is_placeholder());
    Ok(())
}
