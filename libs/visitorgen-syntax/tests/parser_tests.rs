#![allow(clippy::unwrap_used, clippy::expect_used)]

use visitorgen_syntax::{Member, SyntaxTree, TypeKind, UsingKind};

fn parse(src: &str) -> SyntaxTree {
    SyntaxTree::parse("test.cs", src).expect("source should parse")
}

#[test]
fn test_parse_marked_interface_and_implementors() {
    let tree = parse(
        r"
using System;
using VisitorGenerator;

namespace Shapes
{
    [VisitorNode]
    public partial interface IShape { double Area(); }

    public partial class Circle : IShape
    {
        public double Area() => 3.14;
    }

    internal sealed partial class Square : Base, IShape, IDisposable
    {
        public void Dispose() { }
        public double Area() { return 1.0; }
    }
}
",
    );

    let root = tree.root();
    assert_eq!(root.usings.len(), 2);
    assert_eq!(root.usings[1].target, "VisitorGenerator");

    let types = root.type_declarations();
    let names: Vec<_> = types.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["IShape", "Circle", "Square"]);

    let shape = types[0];
    assert_eq!(shape.kind, TypeKind::Interface);
    assert_eq!(shape.all_attributes().next().unwrap().name, "VisitorNode");
    assert_eq!(shape.accessibility().as_deref(), Some("public"));

    let square = types[2];
    let bases: Vec<_> = square.base_list.iter().map(|b| b.text.as_str()).collect();
    assert_eq!(bases, vec!["Base", "IShape", "IDisposable"]);
    assert_eq!(square.accessibility().as_deref(), Some("internal"));
    assert!(square.has_modifier("sealed"));

    let ordinals: Vec<_> = types.iter().map(|t| t.ordinal).collect();
    assert_eq!(ordinals, vec![0, 1, 2]);
}

#[test]
fn test_parse_file_scoped_namespace() {
    let tree = parse("namespace A.B;\nusing X;\npublic class C : I {}\npublic record R(int V) : Base(V), I;\n");
    let Member::Namespace(ns) = &tree.root().members[0] else {
        panic!("expected namespace");
    };
    assert!(ns.file_scoped);
    assert_eq!(ns.name, "A.B");
    assert_eq!(ns.usings[0].target, "X");
    assert_eq!(ns.members.len(), 2);

    let types = tree.root().type_declarations();
    assert_eq!(types[1].kind, TypeKind::Record);
    let bases: Vec<_> = types[1].base_list.iter().map(|b| b.text.as_str()).collect();
    assert_eq!(bases, vec!["Base", "I"]);
}

#[test]
fn test_parse_using_forms() {
    let tree = parse(
        "global using System.Linq;\nusing static System.Math;\nusing Map = System.Collections.Generic.Dictionary<string, int>;\nusing global::Shapes;\n",
    );
    let usings = &tree.root().usings;
    assert_eq!(usings.len(), 4);
    assert!(usings[0].global);
    assert_eq!(usings[1].kind, UsingKind::Static);
    assert_eq!(usings[2].kind, UsingKind::Alias("Map".to_owned()));
    assert_eq!(
        usings[2].target,
        "System.Collections.Generic.Dictionary<string, int>"
    );
    assert_eq!(usings[3].target, "Shapes");
}

#[test]
fn test_parse_generic_headers_and_constraints() {
    let tree = parse(
        "public partial struct Box<[Tag] in T, U> : INode, IEquatable<Box<T, U>> where T : class, new() where U : struct { }",
    );
    let decl = tree.root().type_declarations()[0];
    assert_eq!(decl.kind, TypeKind::Struct);
    assert_eq!(decl.type_parameters, vec!["T", "U"]);
    let bases: Vec<_> = decl.base_list.iter().map(|b| b.text.as_str()).collect();
    assert_eq!(bases, vec!["INode", "IEquatable<Box<T, U>>"]);
}

#[test]
fn test_parse_record_struct_and_attribute_targets() {
    let tree = parse(
        "[assembly: System.Reflection.AssemblyVersion(\"1.0\")]\n[Serializable, Obsolete(\"x\")]\n[type: Marker]\npublic readonly record struct Point(int X, int Y) : INode;",
    );
    let decl = tree.root().type_declarations()[0];
    assert_eq!(decl.kind, TypeKind::RecordStruct);
    assert_eq!(decl.name, "Point");
    assert_eq!(decl.attributes.len(), 2);
    assert_eq!(decl.attributes[1].target.as_deref(), Some("type"));
    let names: Vec<_> = decl.all_attributes().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Serializable", "Obsolete", "Marker"]);
}

#[test]
fn test_parse_skips_statements_delegates_and_bodies() {
    let tree = parse(
        r#"
using System;
Console.WriteLine($"{new Node()} }} {{");
static int Helper() { return "}".Length; }
public delegate void Handler(object sender);
public enum Color : byte { Red, Green }
public class Node : INode
{
    class Nested : INode { }
    string s = @"{";
}
"#,
    );
    let names: Vec<_> = tree
        .root()
        .type_declarations()
        .iter()
        .map(|t| t.name.clone())
        .collect();
    assert_eq!(names, vec!["Color", "Node"]);
}

#[test]
fn test_parse_reports_unbalanced_body() {
    let err = SyntaxTree::parse("x.cs", "namespace A {\n class B {\n").unwrap_err();
    assert_eq!(err.location.line, 2);
    assert!(err.message.contains("unclosed"), "{err}");
}

#[test]
fn test_parse_reports_missing_namespace_brace() {
    let err = SyntaxTree::parse("x.cs", "namespace A { class B {} ").unwrap_err();
    assert!(err.message.contains("expected `}`"), "{err}");
}

#[test]
fn test_parse_reports_stray_closing_brace() {
    assert!(SyntaxTree::parse("x.cs", "class A {} }").is_err());
}
