//! The one signature policy every dialect renders.
//!
//! A signature is a flat list of [`Token`]s so that each dialect only
//! decides how to mark up keywords, names and type references:
//!
//! ```text
//! @Deprecated protected open suspend fun <T : Any> String.foo(a: Int = 1, vararg b: T): List<T>?
//! ```
//!
//! Order: annotations, visibility (omitted when public), modifiers in
//! canonical order, kind keyword, type parameters with bounds, receiver,
//! name, parameters with types and defaults, return type. Classifiers list
//! their supertypes after the name.

use tome_core::{
    content::LinkTarget,
    model::{DocumentationModule, EntityIndex, EntityKind, TypeRef, Visibility},
};

/// A piece of a rendered signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// `@Name` annotation.
    Annotation(&'a str),
    /// Visibility, modifier or kind keyword.
    Keyword(&'a str),
    /// The declared name.
    Name(&'a str),
    /// A type reference; linked when its target is.
    Type {
        name: &'a str,
        target: &'a LinkTarget,
    },
    /// Punctuation, whitespace, parameter names and default values.
    Text(&'a str),
}

/// Tokens of the signature of `index`.
pub fn signature(module: &DocumentationModule, index: EntityIndex) -> Vec<Token<'_>> {
    let entity = module.entity(index);
    let mut tokens = Vec::new();

    for annotation in entity.annotations() {
        tokens.push(Token::Annotation(annotation));
        tokens.push(Token::Text(" "));
    }
    if entity.visibility() != Visibility::Public {
        tokens.push(Token::Keyword(entity.visibility().as_str()));
        tokens.push(Token::Text(" "));
    }
    for modifier in entity.modifiers() {
        tokens.push(Token::Keyword(modifier.as_str()));
        tokens.push(Token::Text(" "));
    }
    let keyword = match entity.kind() {
        EntityKind::Property if entity.is_mutable() => "var",
        kind => kind.keyword(),
    };
    if !keyword.is_empty() {
        tokens.push(Token::Keyword(keyword));
        tokens.push(Token::Text(" "));
    }

    let type_parameters: Vec<EntityIndex> = entity
        .children()
        .iter()
        .copied()
        .filter(|&child| module.entity(child).kind() == EntityKind::TypeParameter)
        .collect();
    let generic_before_name = matches!(entity.kind(), EntityKind::Function | EntityKind::Property);
    if generic_before_name && !type_parameters.is_empty() {
        push_type_parameters(module, &type_parameters, &mut tokens);
        tokens.push(Token::Text(" "));
    }

    if let Some(receiver) = entity.receiver() {
        push_type(receiver, &mut tokens);
        tokens.push(Token::Text("."));
    }

    match entity.kind() {
        // Constructors are called by their class name.
        EntityKind::Constructor => {}
        EntityKind::Package if entity.name().is_empty() => tokens.push(Token::Name("(root)")),
        _ => tokens.push(Token::Name(entity.name())),
    }
    if !generic_before_name && !type_parameters.is_empty() {
        push_type_parameters(module, &type_parameters, &mut tokens);
    }

    if matches!(entity.kind(), EntityKind::Function | EntityKind::Constructor) {
        tokens.push(Token::Text("("));
        for (i, parameter) in entity.parameters().iter().enumerate() {
            if i > 0 {
                tokens.push(Token::Text(", "));
            }
            if parameter.is_vararg() {
                tokens.push(Token::Keyword("vararg"));
                tokens.push(Token::Text(" "));
            }
            tokens.push(Token::Text(parameter.name()));
            tokens.push(Token::Text(": "));
            push_type(parameter.type_ref(), &mut tokens);
            if let Some(default) = parameter.default_value() {
                tokens.push(Token::Text(" = "));
                tokens.push(Token::Text(default));
            }
        }
        tokens.push(Token::Text(")"));
    }

    if let Some(return_type) = entity.return_type() {
        tokens.push(Token::Text(": "));
        push_type(return_type, &mut tokens);
    }

    if !entity.supertypes().is_empty() {
        tokens.push(Token::Text(" : "));
        push_type_list(entity.supertypes(), &mut tokens);
    }

    // Keywords are followed by a space even when nothing else follows.
    while tokens.last() == Some(&Token::Text(" ")) {
        tokens.pop();
    }
    tokens
}

fn push_type_parameters<'a>(
    module: &'a DocumentationModule,
    type_parameters: &[EntityIndex],
    tokens: &mut Vec<Token<'a>>,
) {
    tokens.push(Token::Text("<"));
    for (i, &index) in type_parameters.iter().enumerate() {
        if i > 0 {
            tokens.push(Token::Text(", "));
        }
        let parameter = module.entity(index);
        tokens.push(Token::Text(parameter.name()));
        if !parameter.supertypes().is_empty() {
            tokens.push(Token::Text(" : "));
            push_type_list(parameter.supertypes(), tokens);
        }
    }
    tokens.push(Token::Text(">"));
}

fn push_type_list<'a>(types: &'a [TypeRef], tokens: &mut Vec<Token<'a>>) {
    for (i, type_ref) in types.iter().enumerate() {
        if i > 0 {
            tokens.push(Token::Text(", "));
        }
        push_type(type_ref, tokens);
    }
}

fn push_type<'a>(type_ref: &'a TypeRef, tokens: &mut Vec<Token<'a>>) {
    tokens.push(Token::Type {
        name: type_ref.name(),
        target: type_ref.target(),
    });
    if !type_ref.arguments().is_empty() {
        tokens.push(Token::Text("<"));
        push_type_list(type_ref.arguments(), tokens);
        tokens.push(Token::Text(">"));
    }
    if type_ref.is_nullable() {
        tokens.push(Token::Text("?"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tome_core::{
        declaration::{Declaration, ParameterDeclaration, SourceFragment, TypeName},
        model::Modifier,
    };

    use crate::{build::Builder, config::AppConfig};

    fn plain(tokens: &[Token<'_>]) -> String {
        let mut out = String::new();
        for token in tokens {
            match token {
                Token::Annotation(name) => {
                    out.push('@');
                    out.push_str(name);
                }
                Token::Keyword(text) | Token::Name(text) | Token::Text(text) => out.push_str(text),
                Token::Type { name, .. } => out.push_str(name),
            }
        }
        out
    }

    fn render(declaration: Declaration, dri: &str) -> String {
        let fragments = vec![SourceFragment::new("a.kt", "p").with_declaration(declaration)];
        let (module, _) = Builder::new(&AppConfig::default()).build(&fragments, &[]);
        let index = module.find(dri).unwrap();
        plain(&signature(&module, index))
    }

    fn list_of(name: &str) -> TypeName {
        TypeName {
            name: "List".to_string(),
            arguments: vec![TypeName::simple(name)],
            nullable: true,
        }
    }

    #[test]
    fn test_function_signature_order() {
        let mut declaration = Declaration::new("foo", EntityKind::Function)
            .with_child(
                Declaration::new("T", EntityKind::TypeParameter)
                    .with_supertype(TypeName::simple("Any")),
            )
            .with_parameter(
                ParameterDeclaration {
                    default_value: Some("1".to_string()),
                    ..ParameterDeclaration::new("a", TypeName::simple("Int"))
                },
            )
            .with_parameter(ParameterDeclaration {
                vararg: true,
                ..ParameterDeclaration::new("b", TypeName::simple("T"))
            })
            .with_returns(list_of("T"));
        declaration.visibility = Visibility::Protected;
        declaration.modifiers = vec![Modifier::Suspend, Modifier::Open];
        declaration.annotations = vec!["Deprecated".to_string()];
        declaration.receiver = Some(TypeName::simple("String"));

        assert_eq!(
            render(declaration, "p.foo[String](Int,T)"),
            "@Deprecated protected open suspend fun <T : Any> String.foo(a: Int = 1, vararg b: T): List<T>?"
        );
    }

    #[test]
    fn test_class_signature_lists_supertypes() {
        let declaration = Declaration::new("Box", EntityKind::Class)
            .with_child(Declaration::new("T", EntityKind::TypeParameter))
            .with_supertype(TypeName::simple("Base"))
            .with_supertype(TypeName::simple("Comparable"));
        assert_eq!(render(declaration, "p.Box"), "class Box<T> : Base, Comparable");
    }

    #[test]
    fn test_property_and_constructor() {
        let mut property = Declaration::new("size", EntityKind::Property)
            .with_returns(TypeName::simple("Int"));
        property.mutable = true;
        assert_eq!(render(property, "p.size"), "var size: Int");

        let class = Declaration::new("C", EntityKind::Class).with_child(
            Declaration::new("C", EntityKind::Constructor)
                .with_parameter(ParameterDeclaration::new("x", TypeName::simple("Int"))),
        );
        assert_eq!(render(class, "p.C.C(Int)"), "constructor(x: Int)");
    }

    #[test]
    fn test_enum_entry_has_no_keyword() {
        let declaration = Declaration::new("Color", EntityKind::Enum)
            .with_child(Declaration::new("RED", EntityKind::EnumEntry));
        assert_eq!(render(declaration, "p.Color.RED"), "RED");
    }
}
