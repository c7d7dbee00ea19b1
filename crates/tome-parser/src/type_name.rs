//! Parser for type names as written in signatures, e.g. `Map<K, List<V>?>?`.

use winnow::{
    Parser as _,
    ascii::multispace0,
    combinator::{delimited, opt, separated},
    error::ModalResult,
    token::take_while,
};

use tome_core::declaration::TypeName;

fn type_name(input: &mut &str) -> ModalResult<TypeName> {
    multispace0.parse_next(input)?;
    let name = take_while(1.., |c: char| {
        c.is_alphanumeric() || matches!(c, '_' | '.' | '*' | '$')
    })
    .parse_next(input)?;
    multispace0.parse_next(input)?;
    let arguments: Option<Vec<TypeName>> = opt(delimited(
        ('<', multispace0),
        separated(1.., type_name, (multispace0, ',', multispace0)),
        (multispace0, '>'),
    ))
    .parse_next(input)?;
    multispace0.parse_next(input)?;
    let nullable = opt('?').parse_next(input)?.is_some();
    multispace0.parse_next(input)?;

    Ok(TypeName {
        name: name.to_string(),
        arguments: arguments.unwrap_or_default(),
        nullable,
    })
}

/// Parse a type name.
///
/// Input that is not a plain or generic type name (function types, for
/// instance) is kept verbatim as a bare name.
///
/// # Example
///
/// ```
/// # use tome_parser::parse_type_name;
///
/// let type_name = parse_type_name("Map<String, List<Int>?>");
/// assert_eq!(type_name.name, "Map");
/// assert_eq!(type_name.arguments.len(), 2);
/// assert!(type_name.arguments[1].nullable);
/// ```
pub fn parse_type_name(text: &str) -> TypeName {
    let text = text.trim();
    type_name
        .parse(text)
        .unwrap_or_else(|_| TypeName::simple(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_and_qualified() {
        assert_eq!(parse_type_name("Int"), TypeName::simple("Int"));
        assert_eq!(
            parse_type_name(" kotlin.String "),
            TypeName::simple("kotlin.String")
        );
    }

    #[test]
    fn test_nested_generics_and_nullability() {
        let type_name = parse_type_name("Map<K, List<V?>>?");
        assert!(type_name.nullable);
        assert_eq!(type_name.arguments[0], TypeName::simple("K"));
        let list = &type_name.arguments[1];
        assert_eq!(list.name, "List");
        assert!(!list.nullable);
        assert!(list.arguments[0].nullable);
        assert_eq!(type_name.render(), "Map<K, List<V?>>?");
    }

    #[test]
    fn test_star_projection() {
        let type_name = parse_type_name("List<*>");
        assert_eq!(type_name.arguments[0].name, "*");
    }

    #[test]
    fn test_malformed_degrades_to_bare_name() {
        assert_eq!(
            parse_type_name("(Int) -> Unit"),
            TypeName::simple("(Int) -> Unit")
        );
        assert_eq!(parse_type_name("List<Int"), TypeName::simple("List<Int"));
    }
}
