//! Documentation entities and their reference slots.

use std::{fmt, path::PathBuf};

use serde::Serialize;

use crate::{
    content::LinkTarget,
    identifier::Id,
    model::{Documentation, EntityIndex, EntityKind, Modifier, Visibility},
    span::Span,
};

/// Documentation resource identifier: the stable identity of an entity.
///
/// `path` is the qualified name (`p.C.foo`); `signature` disambiguates
/// overloads and is present for functions and constructors (`(Int,String)`,
/// or `[String](Int)` for extensions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Dri {
    path: Id,
    signature: Option<Id>,
}

impl Dri {
    pub fn new(path: Id, signature: Option<Id>) -> Self {
        Self { path, signature }
    }

    pub fn path(&self) -> Id {
        self.path
    }

    pub fn signature(&self) -> Option<Id> {
        self.signature
    }
}

impl fmt::Display for Dri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        if let Some(signature) = self.signature {
            write!(f, "{signature}")?;
        }
        Ok(())
    }
}

/// A type written in a signature, e.g. `List<D>?`.
///
/// Each level carries its own [`LinkTarget`] so `List` and `D` resolve
/// independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeRef {
    name: String,
    arguments: Vec<TypeRef>,
    nullable: bool,
    target: LinkTarget,
}

impl TypeRef {
    pub fn new(name: impl Into<String>, arguments: Vec<TypeRef>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            arguments,
            nullable,
            target: LinkTarget::Pending,
        }
    }

    /// Shorthand for a non-generic, non-nullable type.
    pub fn simple(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new(), false)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[TypeRef] {
        &self.arguments
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn target(&self) -> &LinkTarget {
        &self.target
    }

    fn for_each_reference_mut(&mut self, f: &mut dyn FnMut(ReferenceMut<'_>)) {
        let TypeRef {
            name,
            arguments,
            target,
            ..
        } = self;
        f(ReferenceMut {
            text: name,
            kind: ReferenceKind::Type,
            span: None,
            target,
        });
        arguments
            .iter_mut()
            .for_each(|argument| argument.for_each_reference_mut(f));
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.arguments.is_empty() {
            write!(f, "<")?;
            for (i, argument) in self.arguments.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{argument}")?;
            }
            write!(f, ">")?;
        }
        if self.nullable {
            write!(f, "?")?;
        }
        Ok(())
    }
}

/// A value parameter of a function or constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    name: String,
    type_ref: TypeRef,
    default_value: Option<String>,
    vararg: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            default_value: None,
            vararg: false,
        }
    }

    pub fn with_default_value(mut self, default_value: Option<String>) -> Self {
        self.default_value = default_value;
        self
    }

    pub fn with_vararg(mut self, vararg: bool) -> Self {
        self.vararg = vararg;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn is_vararg(&self) -> bool {
        self.vararg
    }
}

/// Where an entity was declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    path: PathBuf,
    line: Option<u32>,
}

impl SourceLocation {
    pub fn new(path: impl Into<PathBuf>, line: Option<u32>) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }
}

/// What a reference is used for, which constrains what it may resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// A type slot of a signature: resolves to classifiers and type parameters.
    Type,
    /// A link in documentation: resolves to any entity but constructors.
    Doc,
}

/// A mutable view of one reference slot, handed out by
/// [`Entity::for_each_reference_mut`].
pub struct ReferenceMut<'a> {
    pub text: &'a str,
    pub kind: ReferenceKind,
    /// Byte span within the raw comment; `None` for signature slots.
    pub span: Option<Span>,
    pub target: &'a mut LinkTarget,
}

/// One documented program element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    dri: Dri,
    name: String,
    kind: EntityKind,
    visibility: Visibility,
    modifiers: Vec<Modifier>,
    annotations: Vec<String>,
    mutable: bool,
    documentation: Documentation,
    receiver: Option<TypeRef>,
    parameters: Vec<Parameter>,
    return_type: Option<TypeRef>,
    supertypes: Vec<TypeRef>,
    source: Option<SourceLocation>,
    parent: Option<EntityIndex>,
    children: Vec<EntityIndex>,
}

impl Entity {
    /// Create an entity with no documentation, modifiers or slots.
    pub fn new(dri: Dri, name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            dri,
            name: name.into(),
            kind,
            visibility: Visibility::default(),
            modifiers: Vec::new(),
            annotations: Vec::new(),
            mutable: false,
            documentation: Documentation::default(),
            receiver: None,
            parameters: Vec::new(),
            return_type: None,
            supertypes: Vec::new(),
            source: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Set modifiers; they are stored deduplicated in canonical order.
    pub fn with_modifiers(mut self, mut modifiers: Vec<Modifier>) -> Self {
        modifiers.sort();
        modifiers.dedup();
        self.modifiers = modifiers;
        self
    }

    pub fn with_annotations(mut self, annotations: Vec<String>) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn with_mutable(mut self, mutable: bool) -> Self {
        self.mutable = mutable;
        self
    }

    pub fn with_documentation(mut self, documentation: Documentation) -> Self {
        self.documentation = documentation;
        self
    }

    pub fn with_receiver(mut self, receiver: Option<TypeRef>) -> Self {
        self.receiver = receiver;
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_return_type(mut self, return_type: Option<TypeRef>) -> Self {
        self.return_type = return_type;
        self
    }

    pub fn with_supertypes(mut self, supertypes: Vec<TypeRef>) -> Self {
        self.supertypes = supertypes;
        self
    }

    pub fn with_source(mut self, source: Option<SourceLocation>) -> Self {
        self.source = source;
        self
    }

    pub fn dri(&self) -> Dri {
        self.dri
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn annotations(&self) -> &[String] {
        &self.annotations
    }

    pub fn is_mutable(&self) -> bool {
        self.mutable
    }

    pub fn documentation(&self) -> &Documentation {
        &self.documentation
    }

    pub fn documentation_mut(&mut self) -> &mut Documentation {
        &mut self.documentation
    }

    pub fn receiver(&self) -> Option<&TypeRef> {
        self.receiver.as_ref()
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn return_type(&self) -> Option<&TypeRef> {
        self.return_type.as_ref()
    }

    /// Supertypes of a classifier, or upper bounds of a type parameter.
    pub fn supertypes(&self) -> &[TypeRef] {
        &self.supertypes
    }

    pub fn source(&self) -> Option<&SourceLocation> {
        self.source.as_ref()
    }

    pub fn parent(&self) -> Option<EntityIndex> {
        self.parent
    }

    pub fn children(&self) -> &[EntityIndex] {
        &self.children
    }

    pub(crate) fn set_parent(&mut self, parent: EntityIndex) {
        self.parent = Some(parent);
    }

    pub(crate) fn push_child(&mut self, child: EntityIndex) {
        self.children.push(child);
    }

    /// Parameter types as written, used to match signature references.
    pub fn parameter_types(&self) -> Vec<String> {
        self.parameters
            .iter()
            .map(|parameter| parameter.type_ref.to_string())
            .collect()
    }

    /// Visit every reference slot of this entity: signature types first,
    /// then documentation links.
    pub fn for_each_reference_mut(&mut self, f: &mut dyn FnMut(ReferenceMut<'_>)) {
        if let Some(receiver) = &mut self.receiver {
            receiver.for_each_reference_mut(f);
        }
        for parameter in &mut self.parameters {
            parameter.type_ref.for_each_reference_mut(f);
        }
        if let Some(return_type) = &mut self.return_type {
            return_type.for_each_reference_mut(f);
        }
        for supertype in &mut self.supertypes {
            supertype.for_each_reference_mut(f);
        }
        self.documentation.for_each_link_mut(&mut |link| {
            let span = link.span();
            let text = link.reference().to_string();
            f(ReferenceMut {
                text: &text,
                kind: ReferenceKind::Doc,
                span: Some(span),
                target: link.target_mut(),
            });
        });
    }

    /// Count slots still awaiting resolution.
    pub fn pending_references(&self) -> usize {
        fn count_type(type_ref: &TypeRef) -> usize {
            usize::from(type_ref.target.is_pending())
                + type_ref.arguments.iter().map(count_type).sum::<usize>()
        }

        let mut pending = self.receiver.iter().map(count_type).sum::<usize>()
            + self
                .parameters
                .iter()
                .map(|parameter| count_type(&parameter.type_ref))
                .sum::<usize>()
            + self.return_type.iter().map(count_type).sum::<usize>()
            + self.supertypes.iter().map(count_type).sum::<usize>();
        self.documentation.for_each_link(&mut |link| {
            if link.target().is_pending() {
                pending += 1;
            }
        });
        pending
    }
}
