//! Builds the generated declarations for one hierarchy.
//!
//! Every implementing type gets an augmentation adding one `Accept` method
//! per dispatcher kind. The root gets a combined artifact holding its own
//! augmentation with the `Accept` signatures followed by both dispatcher
//! contracts. Text is produced only by [`render::render`].

pub mod ir;
pub mod render;

use crate::model::{DispatcherKind, Hierarchy, ImplementingType, MarkedRoot};

use ir::{Item, MethodBody, MethodNode, Parameter, SourceFile, TypeNode, in_namespace};

/// Rendered text still waiting for its artifact name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingArtifact {
    /// Base names from most to least preferred.
    pub candidates: Vec<String>,
    pub text: String,
}

/// Type augmentations in discovery order, then the combined root artifact.
pub(crate) fn emit_hierarchy(hierarchy: &Hierarchy) -> Vec<PendingArtifact> {
    let root = &hierarchy.root;
    let mut pending: Vec<PendingArtifact> = hierarchy
        .types
        .iter()
        .map(|ty| PendingArtifact {
            candidates: type_candidates(root, ty),
            text: render::render(&type_augmentation(root, ty)),
        })
        .collect();

    let visitor = root.visitor_name();
    let mut candidates = vec![visitor.clone()];
    if let Some(ns) = root.namespace.name() {
        candidates.push(format!("{ns}.{visitor}"));
    }
    pending.push(PendingArtifact {
        candidates,
        text: render::render(&root_artifact(hierarchy)),
    });
    pending
}

fn type_candidates(root: &MarkedRoot, ty: &ImplementingType) -> Vec<String> {
    match ty.namespace.name() {
        Some(ns) => vec![
            ty.name.clone(),
            format!("{ns}.{}", ty.name),
            format!("{ns}.{}.{}", ty.name, root.name),
        ],
        None => vec![ty.name.clone(), format!("{}.{}", ty.name, root.name)],
    }
}

/// `partial` re-opening of `ty` with both `Accept` implementations.
#[must_use]
pub fn type_augmentation(root: &MarkedRoot, ty: &ImplementingType) -> SourceFile {
    let methods = DispatcherKind::ALL
        .iter()
        .map(|&kind| MethodNode {
            modifiers: vec!["public".to_owned()],
            ..accept_method(root, kind, MethodBody::Expression("visitor.Visit(this)".to_owned()))
        })
        .collect();

    let node = TypeNode {
        modifiers: partial_modifiers(ty.accessibility.as_deref()),
        keyword: ty.kind.keyword().to_owned(),
        name: ty.name.clone(),
        type_parameters: ty.type_parameters.clone(),
        methods,
    };
    SourceFile {
        usings: Vec::new(),
        items: in_namespace(ty.namespace.name(), vec![Item::Type(node)]),
    }
}

/// Root augmentation plus the value and void dispatcher contracts.
#[must_use]
pub fn root_artifact(hierarchy: &Hierarchy) -> SourceFile {
    let root = &hierarchy.root;
    let augmentation = TypeNode {
        modifiers: partial_modifiers(root.accessibility.as_deref()),
        keyword: "interface".to_owned(),
        name: root.name.clone(),
        type_parameters: root.type_parameters.clone(),
        methods: DispatcherKind::ALL
            .iter()
            .map(|&kind| accept_method(root, kind, MethodBody::Signature))
            .collect(),
    };

    let mut items = vec![Item::Type(augmentation)];
    items.extend(
        DispatcherKind::ALL
            .iter()
            .map(|&kind| Item::Type(contract(hierarchy, kind))),
    );

    SourceFile {
        usings: hierarchy.usings.clone(),
        items: in_namespace(root.namespace.name(), items),
    }
}

fn contract(hierarchy: &Hierarchy, kind: DispatcherKind) -> TypeNode {
    let root = &hierarchy.root;
    let modifiers = if hierarchy.contracts_public() {
        vec!["public".to_owned()]
    } else {
        accessibility_words(root.accessibility.as_deref())
    };
    TypeNode {
        modifiers,
        keyword: "interface".to_owned(),
        name: root.visitor_name(),
        type_parameters: kind
            .method_type_parameters()
            .iter()
            .map(|&p| p.to_owned())
            .collect(),
        methods: hierarchy
            .types
            .iter()
            .map(|ty| MethodNode {
                modifiers: Vec::new(),
                return_type: kind.return_type().to_owned(),
                name: "Visit".to_owned(),
                type_parameters: Vec::new(),
                parameters: vec![Parameter::new(ty.name.clone(), "node")],
                body: MethodBody::Signature,
            })
            .collect(),
    }
}

fn accept_method(root: &MarkedRoot, kind: DispatcherKind, body: MethodBody) -> MethodNode {
    MethodNode {
        modifiers: Vec::new(),
        return_type: kind.return_type().to_owned(),
        name: "Accept".to_owned(),
        type_parameters: kind
            .method_type_parameters()
            .iter()
            .map(|&p| p.to_owned())
            .collect(),
        parameters: vec![Parameter::new(kind.contract_name(root), "visitor")],
        body,
    }
}

fn accessibility_words(accessibility: Option<&str>) -> Vec<String> {
    accessibility
        .map(|a| a.split_whitespace().map(str::to_owned).collect())
        .unwrap_or_default()
}

fn partial_modifiers(accessibility: Option<&str>) -> Vec<String> {
    let mut modifiers = accessibility_words(accessibility);
    modifiers.push("partial".to_owned());
    modifiers
}
