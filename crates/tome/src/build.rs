//! Documentation model builder.
//!
//! Turns the declaration fragments of a run into a [`DocumentationModule`]:
//! one entity per declaration, fragments of the same package merged into
//! one package entity, doc comments parsed, include file sections attached
//! to the module and its packages. Every link starts out pending.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, info};

use tome_core::{
    declaration::{Declaration, SourceFragment, TypeName},
    identifier::Id,
    model::{
        Documentation, DocumentationModule, Dri, Entity, EntityIndex, EntityKind, Parameter,
        SourceLocation, Tag, TypeRef,
    },
};
use tome_parser::{
    IncludeDocument, Span,
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    parse_doc_comment,
};

use crate::config::AppConfig;

/// Builds the documentation model from declaration fragments.
pub struct Builder<'a> {
    config: &'a AppConfig,
}

impl<'a> Builder<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self { config }
    }

    /// Build the model.
    ///
    /// Never fails: problems with the input are returned as warnings.
    pub fn build(
        &self,
        fragments: &[SourceFragment],
        includes: &[IncludeDocument],
    ) -> (DocumentationModule, Vec<Diagnostic>) {
        info!(
            fragments = fragments.len(),
            includes = includes.len();
            "Building documentation model"
        );

        let mut state = BuildState {
            module: DocumentationModule::new(self.config.module().name()),
            diagnostics: DiagnosticCollector::new(),
            packages: IndexMap::new(),
        };

        let mut module_description = Documentation::default();
        for include in includes {
            module_description
                .description_mut()
                .extend(include.module().clone());
        }
        let root = state.module.root();
        *state.module.entity_mut(root).documentation_mut() = module_description;

        for fragment in fragments {
            let package = state.package(&fragment.package);
            for declaration in &fragment.declarations {
                state.insert(package, declaration, fragment);
            }
        }

        for include in includes {
            for section in include.packages() {
                match state.packages.get(section.name()) {
                    Some(&package) => state
                        .module
                        .entity_mut(package)
                        .documentation_mut()
                        .description_mut()
                        .extend(section.content().clone()),
                    None => state.diagnostics.emit(
                        Diagnostic::warning(format!(
                            "include file documents unknown package `{}`",
                            section.name()
                        ))
                        .with_code(ErrorCode::E103)
                        .with_entity(section.name())
                        .with_help("no source fragment declares this package"),
                    ),
                }
            }
        }

        if self.config.documentation().report_undocumented() {
            state.report_undocumented();
        }

        info!(
            entities = state.module.len(),
            packages = state.packages.len();
            "Documentation model built"
        );

        (state.module, state.diagnostics.finish())
    }
}

struct BuildState {
    module: DocumentationModule,
    diagnostics: DiagnosticCollector,
    packages: IndexMap<String, EntityIndex>,
}

impl BuildState {
    /// Get or create the package entity for `name`.
    fn package(&mut self, name: &str) -> EntityIndex {
        if let Some(&index) = self.packages.get(name) {
            return index;
        }
        let entity = Entity::new(Dri::new(Id::new(name), None), name, EntityKind::Package);
        let index = self.module.insert_child(self.module.root(), entity);
        debug!(package = name; "Created package");
        self.packages.insert(name.to_string(), index);
        index
    }

    fn insert(&mut self, parent: EntityIndex, declaration: &Declaration, fragment: &SourceFragment) {
        let documentation = declaration
            .doc
            .as_deref()
            .map(parse_doc_comment)
            .unwrap_or_default();
        if documentation.is_suppressed() {
            debug!(name = declaration.name.as_str(); "Skipping suppressed declaration");
            return;
        }

        let parent_path = self.module.entity(parent).dri().path();
        let dri = Dri::new(
            parent_path.create_nested(Id::new(&declaration.name)),
            signature(declaration),
        );

        if let Some(&existing) = self
            .module
            .entity(parent)
            .children()
            .iter()
            .find(|&&child| self.module.entity(child).dri() == dri)
        {
            let first = match self.module.entity(existing).source() {
                Some(source) => format!("first declared in `{}`", source.path().display()),
                None => "first declared earlier".to_string(),
            };
            self.diagnostics.emit(
                Diagnostic::warning(format!("`{dri}` is declared more than once"))
                    .with_code(ErrorCode::E102)
                    .with_entity(dri.to_string())
                    .with_help(format!(
                        "{first}; both declarations are documented on separate pages"
                    )),
            );
        }

        let entity = Entity::new(dri, declaration.name.as_str(), declaration.kind)
            .with_visibility(declaration.visibility)
            .with_modifiers(declaration.modifiers.clone())
            .with_annotations(declaration.annotations.clone())
            .with_mutable(declaration.mutable)
            .with_receiver(declaration.receiver.as_ref().map(type_ref))
            .with_parameters(
                declaration
                    .parameters
                    .iter()
                    .map(|parameter| {
                        Parameter::new(parameter.name.as_str(), type_ref(&parameter.type_name))
                            .with_default_value(parameter.default_value.clone())
                            .with_vararg(parameter.vararg)
                    })
                    .collect(),
            )
            .with_return_type(declaration.returns.as_ref().map(type_ref))
            .with_supertypes(declaration.supertypes.iter().map(type_ref).collect())
            .with_source(Some(SourceLocation::new(
                fragment.path.clone(),
                declaration.line,
            )))
            .with_documentation(documentation);

        let index = self.module.insert_child(parent, entity);
        for child in &declaration.children {
            self.insert(index, child, fragment);
        }
        self.check_tag_subjects(index, declaration);
    }

    /// Warn about `@param` and `@property` tags naming nothing the entity has.
    fn check_tag_subjects(&mut self, index: EntityIndex, declaration: &Declaration) {
        let entity = self.module.entity(index);
        let mut known: HashSet<&str> = declaration
            .parameters
            .iter()
            .map(|parameter| parameter.name.as_str())
            .collect();
        let mut properties: HashSet<&str> = HashSet::new();
        for child in &declaration.children {
            match child.kind {
                EntityKind::TypeParameter => {
                    known.insert(child.name.as_str());
                }
                EntityKind::Property => {
                    properties.insert(child.name.as_str());
                }
                EntityKind::Constructor => {
                    // Primary constructor parameters double as properties.
                    properties.extend(child.parameters.iter().map(|p| p.name.as_str()));
                    known.extend(child.parameters.iter().map(|p| p.name.as_str()));
                }
                _ => {}
            }
        }

        let raw = entity.documentation().raw();
        let mut found = Vec::new();
        for section in entity.documentation().tags() {
            let (tag_name, subject, valid) = match section.tag() {
                Tag::Param(name) => ("param", name, known.contains(name.as_str())),
                Tag::Property(name) => ("property", name, properties.contains(name.as_str())),
                _ => continue,
            };
            if valid {
                continue;
            }
            let mut diagnostic = Diagnostic::warning(format!(
                "`@{tag_name} {subject}` names no {tag_name} of `{}`",
                entity.name()
            ))
            .with_code(ErrorCode::E104)
            .with_entity(entity.dri().to_string())
            .with_help(format!("check the {tag_name} name"));
            if let Some(raw) = raw {
                let needle = format!("@{tag_name} {subject}");
                if let Some(start) = raw.find(&needle) {
                    diagnostic = diagnostic
                        .with_source(raw)
                        .with_label(Span::new(start..start + needle.len()), "unknown name");
                }
            }
            found.push(diagnostic);
        }
        self.diagnostics.extend(found);
    }

    fn report_undocumented(&mut self) {
        let mut found = Vec::new();
        for (_, entity) in self.module.iter() {
            if matches!(entity.kind(), EntityKind::Module | EntityKind::Package)
                || !entity.documentation().is_empty()
            {
                continue;
            }
            found.push(
                Diagnostic::warning(format!("`{}` is not documented", entity.dri()))
                    .with_code(ErrorCode::E101)
                    .with_entity(entity.dri().to_string())
                    .with_help("add a doc comment"),
            );
        }
        self.diagnostics.extend(found);
    }
}

/// Overload signature: parameter types, prefixed by the receiver type.
fn signature(declaration: &Declaration) -> Option<Id> {
    if !matches!(
        declaration.kind,
        EntityKind::Function | EntityKind::Constructor
    ) {
        return None;
    }
    let parameters: Vec<String> = declaration
        .parameters
        .iter()
        .map(|parameter| parameter.type_name.render())
        .collect();
    let mut signature = String::new();
    if let Some(receiver) = &declaration.receiver {
        signature.push('[');
        signature.push_str(&receiver.render());
        signature.push(']');
    }
    signature.push('(');
    signature.push_str(&parameters.join(","));
    signature.push(')');
    Some(Id::new(&signature))
}

fn type_ref(type_name: &TypeName) -> TypeRef {
    TypeRef::new(
        type_name.name.as_str(),
        type_name.arguments.iter().map(type_ref).collect(),
        type_name.nullable,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tome_core::{content::ContentNode, declaration::ParameterDeclaration};
    use tome_parser::parse_include;

    fn codes(diagnostics: &[Diagnostic]) -> Vec<ErrorCode> {
        diagnostics.iter().filter_map(Diagnostic::code).collect()
    }

    fn fragment(package: &str, declarations: Vec<Declaration>) -> SourceFragment {
        SourceFragment {
            path: format!("src/{package}/File.kt").into(),
            package: package.to_string(),
            declarations,
        }
    }

    #[test]
    fn test_packages_merge_in_first_seen_order() {
        let config = AppConfig::default();
        let fragments = vec![
            fragment("q", vec![Declaration::new("A", EntityKind::Class)]),
            fragment("p", vec![Declaration::new("B", EntityKind::Class)]),
            fragment("q", vec![Declaration::new("C", EntityKind::Class)]),
        ];

        let (module, diagnostics) = Builder::new(&config).build(&fragments, &[]);

        assert!(diagnostics.is_empty());
        let packages: Vec<_> = module
            .entity(module.root())
            .children()
            .iter()
            .map(|&index| module.entity(index).name().to_string())
            .collect();
        assert_eq!(packages, vec!["q", "p"]);
        let q = module.find("q").unwrap();
        assert_eq!(module.entity(q).children().len(), 2);
        assert!(module.find("q.C").is_some());
    }

    #[test]
    fn test_nested_declarations_and_signatures() {
        let config = AppConfig::default();
        let class = Declaration::new("C", EntityKind::Class)
            .with_child(
                Declaration::new("foo", EntityKind::Function)
                    .with_parameter(ParameterDeclaration::new("x", TypeName::simple("Int")))
                    .with_returns(TypeName::simple("String")),
            )
            .with_child(Declaration::new("foo", EntityKind::Function));
        let (module, diagnostics) = Builder::new(&config).build(&[fragment("p", vec![class])], &[]);

        assert!(diagnostics.is_empty());
        let foo = module.find("p.C.foo(Int)").unwrap();
        assert_eq!(module.entity(foo).return_type().unwrap().name(), "String");
        assert!(module.find("p.C.foo()").is_some());
        assert_eq!(module.pending_references(), 2);
    }

    #[test]
    fn test_suppressed_declarations_are_skipped() {
        let config = AppConfig::default();
        let fragments = vec![fragment(
            "p",
            vec![
                Declaration::new("Hidden", EntityKind::Class).with_doc("Internal.\n@suppress"),
                Declaration::new("Shown", EntityKind::Class),
            ],
        )];

        let (module, _) = Builder::new(&config).build(&fragments, &[]);

        assert!(module.find("p.Hidden").is_none());
        assert!(module.find("p.Shown").is_some());
    }

    #[test]
    fn test_duplicate_dri_warns_and_keeps_both() {
        let config = AppConfig::default();
        let fragments = vec![fragment(
            "p",
            vec![
                Declaration::new("C", EntityKind::Class),
                Declaration::new("C", EntityKind::Class),
            ],
        )];

        let (module, diagnostics) = Builder::new(&config).build(&fragments, &[]);

        assert_eq!(codes(&diagnostics), vec![ErrorCode::E102]);
        let p = module.find("p").unwrap();
        assert_eq!(module.entity(p).children().len(), 2);
    }

    #[test]
    fn test_unknown_param_tag() {
        let config = AppConfig::default();
        let function = Declaration::new("foo", EntityKind::Function)
            .with_parameter(ParameterDeclaration::new("x", TypeName::simple("Int")))
            .with_doc("Does things.\n@param x fine\n@param y unknown");
        let (_, diagnostics) = Builder::new(&config).build(&[fragment("p", vec![function])], &[]);

        assert_eq!(codes(&diagnostics), vec![ErrorCode::E104]);
        let label = &diagnostics[0].labels()[0];
        let raw = diagnostics[0].source().unwrap();
        assert_eq!(&raw[label.span().start()..label.span().end()], "@param y");
    }

    #[test]
    fn test_include_sections() {
        let config = AppConfig::default();
        let include = parse_include("Module text.\n# Package p\nAbout p.\n# Package missing\nLost.");
        let fragments = vec![fragment("p", vec![Declaration::new("C", EntityKind::Class)])];

        let (module, diagnostics) = Builder::new(&config).build(&fragments, &[include]);

        assert_eq!(codes(&diagnostics), vec![ErrorCode::E103]);
        let root = module.entity(module.root());
        assert_eq!(
            root.documentation().description().blocks(),
            &[ContentNode::Paragraph(vec![ContentNode::Text(
                "Module text.".to_string()
            )])]
        );
        let p = module.entity(module.find("p").unwrap());
        assert!(!p.documentation().is_empty());
    }

    #[test]
    fn test_report_undocumented() {
        let config = AppConfig::new(
            Default::default(),
            Default::default(),
            crate::config::DocumentationConfig::new(true, false, true),
            Vec::new(),
        );
        let fragments = vec![fragment(
            "p",
            vec![
                Declaration::new("Documented", EntityKind::Class).with_doc("Has docs."),
                Declaration::new("Bare", EntityKind::Class),
            ],
        )];

        let (_, diagnostics) = Builder::new(&config).build(&fragments, &[]);

        assert_eq!(codes(&diagnostics), vec![ErrorCode::E101]);
        assert_eq!(diagnostics[0].entity(), Some("p.Bare"));
    }

    #[test]
    fn test_extension_signature_includes_receiver() {
        let config = AppConfig::default();
        let mut function = Declaration::new("shout", EntityKind::Function);
        function.receiver = Some(TypeName::simple("String"));
        let (module, _) = Builder::new(&config).build(&[fragment("p", vec![function])], &[]);

        assert!(module.find("p.shout[String]()").is_some());
    }
}
