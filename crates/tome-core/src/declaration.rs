//! Declaration fragments supplied by a source-language frontend.
//!
//! The frontend is modelled as the [`SemanticSession`] capability: it
//! enumerates per-file [`SourceFragment`]s and may classify names the
//! documentation model does not contain. Any frontend (a compiler plugin,
//! a manifest reader, a test fixture) can implement it.

use std::path::PathBuf;

use crate::model::{EntityKind, Modifier, Visibility};

/// A type as written by the frontend, before it becomes a model slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    pub name: String,
    pub arguments: Vec<TypeName>,
    pub nullable: bool,
}

impl TypeName {
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            nullable: false,
        }
    }

    /// Render back to source form, e.g. `Map<K, V?>`.
    pub fn render(&self) -> String {
        let mut out = self.name.clone();
        if !self.arguments.is_empty() {
            let arguments: Vec<String> = self.arguments.iter().map(TypeName::render).collect();
            out.push('<');
            out.push_str(&arguments.join(", "));
            out.push('>');
        }
        if self.nullable {
            out.push('?');
        }
        out
    }
}

/// A value parameter declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDeclaration {
    pub name: String,
    pub type_name: TypeName,
    pub default_value: Option<String>,
    pub vararg: bool,
}

impl ParameterDeclaration {
    pub fn new(name: impl Into<String>, type_name: TypeName) -> Self {
        Self {
            name: name.into(),
            type_name,
            default_value: None,
            vararg: false,
        }
    }
}

/// One declaration and its nested declarations.
///
/// Type parameters are nested declarations of kind
/// [`EntityKind::TypeParameter`] whose `supertypes` are their bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub kind: EntityKind,
    pub visibility: Visibility,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<String>,
    pub mutable: bool,
    /// Raw doc comment text with comment delimiters already stripped.
    pub doc: Option<String>,
    pub receiver: Option<TypeName>,
    pub parameters: Vec<ParameterDeclaration>,
    /// Return type of a function, type of a property, aliased type of a
    /// typealias.
    pub returns: Option<TypeName>,
    pub supertypes: Vec<TypeName>,
    pub line: Option<u32>,
    pub children: Vec<Declaration>,
}

impl Declaration {
    /// Create a public declaration without documentation or children.
    pub fn new(name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            name: name.into(),
            kind,
            visibility: Visibility::Public,
            modifiers: Vec::new(),
            annotations: Vec::new(),
            mutable: false,
            doc: None,
            receiver: None,
            parameters: Vec::new(),
            returns: None,
            supertypes: Vec::new(),
            line: None,
            children: Vec::new(),
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterDeclaration) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_returns(mut self, returns: TypeName) -> Self {
        self.returns = Some(returns);
        self
    }

    pub fn with_supertype(mut self, supertype: TypeName) -> Self {
        self.supertypes.push(supertype);
        self
    }

    pub fn with_child(mut self, child: Declaration) -> Self {
        self.children.push(child);
        self
    }
}

/// The top-level declarations of one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFragment {
    pub path: PathBuf,
    /// Package name; empty for the root package.
    pub package: String,
    pub declarations: Vec<Declaration>,
}

impl SourceFragment {
    pub fn new(path: impl Into<PathBuf>, package: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            package: package.into(),
            declarations: Vec::new(),
        }
    }

    pub fn with_declaration(mut self, declaration: Declaration) -> Self {
        self.declarations.push(declaration);
        self
    }
}

/// A symbol the frontend knows about outside the documented sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalSymbol {
    pub qualified_name: String,
}

/// Capability interface of the source-language frontend.
pub trait SemanticSession {
    /// Enumerate the source fragments of this run in a stable order.
    fn fragments(&self) -> Vec<SourceFragment>;

    /// Classify a name the documentation model could not resolve.
    fn resolve_external(&self, _name: &str) -> Option<ExternalSymbol> {
        None
    }
}

/// A session over an in-memory list of fragments.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    fragments: Vec<SourceFragment>,
}

impl StaticSession {
    pub fn new(fragments: Vec<SourceFragment>) -> Self {
        Self { fragments }
    }
}

impl SemanticSession for StaticSession {
    fn fragments(&self) -> Vec<SourceFragment> {
        self.fragments.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name_render() {
        let type_name = TypeName {
            name: "Map".to_string(),
            arguments: vec![
                TypeName::simple("K"),
                TypeName {
                    name: "V".to_string(),
                    arguments: vec![],
                    nullable: true,
                },
            ],
            nullable: false,
        };
        assert_eq!(type_name.render(), "Map<K, V?>");
    }

    #[test]
    fn test_static_session_returns_fragments_in_order() {
        let session = StaticSession::new(vec![
            SourceFragment::new("a.kt", "p"),
            SourceFragment::new("b.kt", "q"),
        ]);
        let packages: Vec<_> = session
            .fragments()
            .into_iter()
            .map(|fragment| fragment.package)
            .collect();
        assert_eq!(packages, vec!["p", "q"]);
        assert!(session.resolve_external("kotlin.String").is_none());
    }
}
