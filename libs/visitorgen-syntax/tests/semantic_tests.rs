#![allow(clippy::unwrap_used, clippy::expect_used)]

use visitorgen_syntax::{
    Compilation, DeclarationTable, Namespace, SemanticModel, SymbolId, SyntaxTree, TypeDecl, TypeKind,
};

const MARKER: &str = r"
using System;
namespace VisitorGenerator
{
    sealed class VisitorNodeAttribute : Attribute { }
}
";

fn compile(sources: &[(&str, &str)]) -> Compilation {
    let mut builder = Compilation::builder();
    for (path, src) in sources {
        builder = builder.source(*path, *src).unwrap();
    }
    builder.build()
}

fn find<'a>(compilation: &'a Compilation, name: &str) -> (&'a SyntaxTree, &'a TypeDecl) {
    compilation
        .trees()
        .iter()
        .find_map(|tree| {
            tree.root()
                .type_declarations()
                .into_iter()
                .find(|decl| decl.name == name)
                .map(|decl| (tree, decl))
        })
        .unwrap_or_else(|| panic!("type {name} not declared"))
}

fn attribute_of(compilation: &Compilation, name: &str) -> Option<SymbolId> {
    let (tree, decl) = find(compilation, name);
    let attr = decl.all_attributes().next().unwrap();
    compilation
        .semantic_model()
        .resolve_attribute(tree.id(), decl, attr)
}

fn base_of(compilation: &Compilation, name: &str, idx: usize) -> Option<SymbolId> {
    let (tree, decl) = find(compilation, name);
    compilation
        .semantic_model()
        .resolve_base_type(tree.id(), decl, &decl.base_list[idx])
}

#[test]
fn test_declared_symbols_use_enclosing_namespaces() {
    let c = compile(&[(
        "a.cs",
        "namespace A { namespace B.C { class Box<T> {} } } class Top {}",
    )]);
    let (tree, decl) = find(&c, "Box");
    let symbol = c.semantic_model().declared_symbol(tree.id(), decl).unwrap();
    assert_eq!(symbol.id.as_str(), "A.B.C.Box`1");
    assert_eq!(symbol.namespace, Namespace::Named("A.B.C".to_owned()));
    assert_eq!(symbol.arity, 1);

    let (tree, decl) = find(&c, "Top");
    let symbol = c.semantic_model().declared_symbol(tree.id(), decl).unwrap();
    assert!(symbol.namespace.is_global());
}

#[test]
fn test_marker_resolves_through_using_and_suffix() {
    let c = compile(&[
        ("marker.cs", MARKER),
        (
            "shapes.cs",
            "using VisitorGenerator;\nnamespace Shapes { [VisitorNode] interface IShape {} }",
        ),
    ]);
    assert_eq!(
        attribute_of(&c, "IShape").unwrap().as_str(),
        "VisitorGenerator.VisitorNodeAttribute"
    );
}

#[test]
fn test_marker_resolves_qualified_global_and_alias_forms() {
    let c = compile(&[
        ("marker.cs", MARKER),
        (
            "a.cs",
            "namespace A { [VisitorGenerator.VisitorNode] interface IA {} }\nnamespace B { [global::VisitorGenerator.VisitorNodeAttribute] interface IB {} }\nnamespace C { using VN = VisitorGenerator.VisitorNodeAttribute; [VN] interface IC {} }",
        ),
    ]);
    for name in ["IA", "IB", "IC"] {
        assert_eq!(
            attribute_of(&c, name).map(|id| id.to_string()).as_deref(),
            Some("VisitorGenerator.VisitorNodeAttribute"),
            "{name}"
        );
    }
}

#[test]
fn test_same_named_attribute_in_other_namespace_stays_distinct() {
    let c = compile(&[
        ("marker.cs", MARKER),
        (
            "other.cs",
            "namespace Other { class VisitorNodeAttribute : System.Attribute {} [VisitorNode] interface IFake {} }",
        ),
    ]);
    assert_eq!(
        attribute_of(&c, "IFake").unwrap().as_str(),
        "Other.VisitorNodeAttribute"
    );
}

#[test]
fn test_unknown_attribute_is_unresolved() {
    let c = compile(&[("a.cs", "[VisitorNode] interface I {}")]);
    assert!(attribute_of(&c, "I").is_none());
}

#[test]
fn test_ambiguous_imports_bind_nothing() {
    let c = compile(&[(
        "a.cs",
        "namespace X { interface INode {} }\nnamespace Y { interface INode {} }\nnamespace Z { using X; using Y; class N : INode {} }",
    )]);
    assert!(base_of(&c, "N", 0).is_none());
}

#[test]
fn test_namespace_members_shadow_imports() {
    let c = compile(&[(
        "a.cs",
        "namespace X { interface INode {} }\nnamespace Z { using X; interface INode {} class N : INode {} }",
    )]);
    assert_eq!(base_of(&c, "N", 0).unwrap().as_str(), "Z.INode");
}

#[test]
fn test_outer_namespace_and_global_usings_are_searched() {
    let c = compile(&[
        ("globals.cs", "global using Shapes.Core;"),
        ("core.cs", "namespace Shapes.Core { public interface IShape {} }"),
        (
            "a.cs",
            "namespace Shapes { interface IRoot {} namespace Inner { class A : IRoot {} class B : IShape {} } }",
        ),
    ]);
    assert_eq!(base_of(&c, "A", 0).unwrap().as_str(), "Shapes.IRoot");
    assert_eq!(base_of(&c, "B", 0).unwrap().as_str(), "Shapes.Core.IShape");
}

#[test]
fn test_generic_bases_match_arity() {
    let c = compile(&[(
        "a.cs",
        "interface IVisitor {} interface IVisitor<T> {} class A : IVisitor<int>, IVisitor {}",
    )]);
    assert_eq!(base_of(&c, "A", 0).unwrap().as_str(), "IVisitor`1");
    assert_eq!(base_of(&c, "A", 1).unwrap().as_str(), "IVisitor");
}

#[test]
fn test_partial_declarations_share_one_symbol() {
    let c = compile(&[
        ("a.cs", "namespace N { partial class P {} }"),
        ("b.cs", "namespace N { partial class P {} }"),
    ]);
    let ids: Vec<_> = c
        .trees()
        .iter()
        .map(|tree| {
            let decl = tree.root().type_declarations()[0];
            c.semantic_model().declared_symbol(tree.id(), decl).unwrap().id
        })
        .collect();
    assert_eq!(ids[0], ids[1]);
}

#[test]
fn test_declaration_table_lists_each_symbol_once() {
    let c = compile(&[
        ("a.cs", "namespace N { partial class P {} interface I {} }"),
        ("b.cs", "namespace N { partial class P {} } struct S {}"),
    ]);
    let table = DeclarationTable::build(c.trees());
    assert!(!table.is_empty());
    assert_eq!(table.len(), 3);

    let p = table.symbol(&SymbolId::new("N.P")).unwrap();
    assert_eq!(p.name, "P");
    assert_eq!(p.kind, TypeKind::Class);
    assert_eq!(p.namespace, Namespace::from_name("N"));
    assert_eq!(table.symbol(&SymbolId::new("S")).unwrap().kind, TypeKind::Struct);
    assert!(table.symbol(&SymbolId::new("N.S")).is_none());

    assert!(DeclarationTable::build(&[]).is_empty());
}
