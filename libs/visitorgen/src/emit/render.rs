//! Text rendering of the declaration IR.
//!
//! Four-space indentation, `\n` line endings, no blank lines between items,
//! and a trailing newline at the end of every file.

use super::ir::{Item, MethodBody, MethodNode, SourceFile, TypeNode};

const INDENT: &str = "    ";

#[must_use]
pub fn render(file: &SourceFile) -> String {
    let mut renderer = Renderer::default();
    for using in &file.usings {
        renderer.line(&format!("using {using};"));
    }
    renderer.items(&file.items);
    renderer.out
}

#[derive(Default)]
struct Renderer {
    out: String,
    /// Current indentation depth
    depth: usize,
}

impl Renderer {
    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn push_indent(&mut self) {
        self.depth += 1;
    }

    fn pop_indent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn block(&mut self, header: &str, body: impl FnOnce(&mut Self)) {
        self.line(header);
        self.line("{");
        self.push_indent();
        body(self);
        self.pop_indent();
        self.line("}");
    }

    fn items(&mut self, items: &[Item]) {
        for item in items {
            match item {
                Item::Namespace(ns) => {
                    self.block(&format!("namespace {}", ns.name), |r| r.items(&ns.items));
                }
                Item::Type(ty) => self.type_node(ty),
            }
        }
    }

    fn type_node(&mut self, ty: &TypeNode) {
        let mut header = join_words(&ty.modifiers);
        if !header.is_empty() {
            header.push(' ');
        }
        header.push_str(&ty.keyword);
        header.push(' ');
        header.push_str(&ty.name);
        header.push_str(&type_parameter_list(&ty.type_parameters));
        self.block(&header, |r| {
            for method in &ty.methods {
                r.line(&method_text(method));
            }
        });
    }
}

fn join_words(words: &[String]) -> String {
    words.join(" ")
}

fn type_parameter_list(params: &[impl AsRef<str>]) -> String {
    if params.is_empty() {
        String::new()
    } else {
        let names: Vec<&str> = params.iter().map(AsRef::as_ref).collect();
        format!("<{}>", names.join(", "))
    }
}

fn method_text(method: &MethodNode) -> String {
    let mut text = join_words(&method.modifiers);
    if !text.is_empty() {
        text.push(' ');
    }
    let params: Vec<String> = method
        .parameters
        .iter()
        .map(|p| format!("{} {}", p.ty, p.name))
        .collect();
    text.push_str(&format!(
        "{} {}{}({})",
        method.return_type,
        method.name,
        type_parameter_list(&method.type_parameters),
        params.join(", ")
    ));
    match &method.body {
        MethodBody::Signature => text.push(';'),
        MethodBody::Expression(expr) => {
            text.push_str(" => ");
            text.push_str(expr);
            text.push(';');
        }
    }
    text
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::emit::ir::{NamespaceNode, Parameter};

    fn method(body: MethodBody) -> MethodNode {
        MethodNode {
            modifiers: vec!["public".to_owned()],
            return_type: "T".to_owned(),
            name: "Accept".to_owned(),
            type_parameters: vec!["T".to_owned()],
            parameters: vec![Parameter::new("IVisitor<T>", "visitor")],
            body,
        }
    }

    #[test]
    fn renders_nested_blocks_with_four_space_indent() {
        let file = SourceFile {
            usings: vec!["B".to_owned()],
            items: vec![Item::Namespace(NamespaceNode {
                name: "A".to_owned(),
                items: vec![Item::Type(TypeNode {
                    modifiers: vec!["public".to_owned(), "partial".to_owned()],
                    keyword: "class".to_owned(),
                    name: "Box".to_owned(),
                    type_parameters: vec!["K".to_owned(), "V".to_owned()],
                    methods: vec![
                        method(MethodBody::Expression("visitor.Visit(this)".to_owned())),
                        method(MethodBody::Signature),
                    ],
                })],
            })],
        };
        let expected = "using B;\n\
namespace A\n\
{\n    public partial class Box<K, V>\n    {\n        public T Accept<T>(IVisitor<T> visitor) => visitor.Visit(this);\n        public T Accept<T>(IVisitor<T> visitor);\n    }\n\
}\n";
        assert_eq!(render(&file), expected);
    }

    #[test]
    fn empty_modifiers_leave_no_leading_space() {
        let file = SourceFile {
            usings: vec![],
            items: vec![Item::Type(TypeNode {
                modifiers: vec![],
                keyword: "interface".to_owned(),
                name: "I".to_owned(),
                type_parameters: vec![],
                methods: vec![],
            })],
        };
        assert_eq!(render(&file), "interface I\n{\n}\n");
    }
}
