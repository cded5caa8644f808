//! Per-pass entities. Built fresh for every pass and dropped after emission.

use visitorgen_syntax::{Location, Namespace, SymbolId, TypeKind};

/// A `[VisitorNode]` interface naming a hierarchy. Partial fragments
/// collapse to the first one seen; accessibility comes from the first
/// fragment that declares one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedRoot {
    pub name: String,
    pub namespace: Namespace,
    pub id: SymbolId,
    pub accessibility: Option<String>,
    pub type_parameters: Vec<String>,
    pub location: Location,
}

impl MarkedRoot {
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.accessibility.as_deref() == Some("public")
    }

    /// Name of both dispatcher contracts, e.g. `INodeVisitor`.
    #[must_use]
    pub fn visitor_name(&self) -> String {
        format!("{}Visitor", self.name)
    }
}

/// A class, struct or record listing a root in its base list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplementingType {
    pub name: String,
    pub namespace: Namespace,
    pub id: SymbolId,
    pub kind: TypeKind,
    pub accessibility: Option<String>,
    pub type_parameters: Vec<String>,
    pub location: Location,
}

impl ImplementingType {
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.accessibility.as_deref() == Some("public")
    }
}

/// The two dispatcher contracts generated per root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherKind {
    /// `<Root>Visitor<T>` with `T Visit(...)`.
    Value,
    /// `<Root>Visitor` with `void Visit(...)`.
    Void,
}

impl DispatcherKind {
    pub const ALL: [Self; 2] = [Self::Value, Self::Void];

    #[must_use]
    pub fn contract_name(self, root: &MarkedRoot) -> String {
        match self {
            Self::Value => format!("{}<T>", root.visitor_name()),
            Self::Void => root.visitor_name(),
        }
    }

    #[must_use]
    pub const fn return_type(self) -> &'static str {
        match self {
            Self::Value => "T",
            Self::Void => "void",
        }
    }

    #[must_use]
    pub const fn method_type_parameters(self) -> &'static [&'static str] {
        match self {
            Self::Value => &["T"],
            Self::Void => &[],
        }
    }
}

/// A root with its resolved, de-duplicated implementing types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hierarchy {
    pub root: MarkedRoot,
    pub types: Vec<ImplementingType>,
    /// Namespaces the combined artifact imports, in discovery order.
    pub usings: Vec<String>,
}

impl Hierarchy {
    /// Whether the dispatcher contracts must be `public`.
    ///
    /// The root's `Accept` signatures and the `public` `Accept` methods on
    /// each type mention the contracts, so a public root or any public
    /// implementing type forces them public.
    #[must_use]
    pub fn contracts_public(&self) -> bool {
        self.root.is_public() || self.types.iter().any(ImplementingType::is_public)
    }

    /// Non-public types a public contract has to mention. Such a hierarchy
    /// cannot be made consistent by the generator alone.
    pub fn less_accessible_types(&self) -> impl Iterator<Item = &ImplementingType> {
        let public = self.contracts_public();
        self.types.iter().filter(move |ty| public && !ty.is_public())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn contract_names_follow_root_name() {
        let root = MarkedRoot {
            name: "INode".to_owned(),
            namespace: Namespace::Global,
            id: SymbolId::new("INode"),
            accessibility: Some("public".to_owned()),
            type_parameters: vec![],
            location: Location::from_offset(Path::new("a.cs"), "", 0),
        };
        assert_eq!(DispatcherKind::Value.contract_name(&root), "INodeVisitor<T>");
        assert_eq!(DispatcherKind::Void.contract_name(&root), "INodeVisitor");
    }

    fn hierarchy(root_access: Option<&str>, type_access: &[Option<&str>]) -> Hierarchy {
        let location = Location::from_offset(Path::new("a.cs"), "", 0);
        let access = |a: Option<&str>| a.map(str::to_owned);
        Hierarchy {
            root: MarkedRoot {
                name: "INode".to_owned(),
                namespace: Namespace::Global,
                id: SymbolId::new("INode"),
                accessibility: access(root_access),
                type_parameters: vec![],
                location: location.clone(),
            },
            types: type_access
                .iter()
                .enumerate()
                .map(|(idx, a)| ImplementingType {
                    name: format!("T{idx}"),
                    namespace: Namespace::Global,
                    id: SymbolId::new(format!("T{idx}")),
                    kind: TypeKind::Class,
                    accessibility: access(*a),
                    type_parameters: vec![],
                    location: location.clone(),
                })
                .collect(),
            usings: vec![],
        }
    }

    #[test]
    fn contracts_follow_the_most_accessible_participant() {
        assert!(!hierarchy(None, &[None, Some("internal")]).contracts_public());
        assert!(hierarchy(Some("internal"), &[Some("public")]).contracts_public());
        assert!(hierarchy(Some("public"), &[None]).contracts_public());

        let mixed = hierarchy(Some("internal"), &[Some("public"), None]);
        let names: Vec<_> = mixed.less_accessible_types().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["T1"]);
        assert_eq!(hierarchy(None, &[None]).less_accessible_types().count(), 0);
    }
}
