//! Entity kinds, visibility and modifiers.

use std::{fmt, str::FromStr};

use serde::Serialize;

/// The kind of program element an entity documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Module,
    Package,
    Class,
    Interface,
    Object,
    Enum,
    EnumEntry,
    Annotation,
    TypeAlias,
    Constructor,
    Function,
    Property,
    TypeParameter,
}

impl EntityKind {
    /// Classifiers can be the target of a type reference.
    pub fn is_classifier(&self) -> bool {
        matches!(
            self,
            EntityKind::Class
                | EntityKind::Interface
                | EntityKind::Object
                | EntityKind::Enum
                | EntityKind::Annotation
                | EntityKind::TypeAlias
        )
    }

    /// Containers own a directory and render their page as its index.
    pub fn is_container(&self) -> bool {
        matches!(self, EntityKind::Module | EntityKind::Package) || self.is_classifier()
    }

    /// Addressable entities get a page of their own.
    ///
    /// Type parameters are documented on their owner's page.
    pub fn is_addressable(&self) -> bool {
        !matches!(self, EntityKind::TypeParameter)
    }

    /// Declaration keyword used in signatures, empty when none applies.
    pub fn keyword(&self) -> &'static str {
        match self {
            EntityKind::Module => "module",
            EntityKind::Package => "package",
            EntityKind::Class => "class",
            EntityKind::Interface => "interface",
            EntityKind::Object => "object",
            EntityKind::Enum => "enum class",
            EntityKind::Annotation => "annotation class",
            EntityKind::TypeAlias => "typealias",
            EntityKind::Constructor => "constructor",
            EntityKind::Function => "fun",
            EntityKind::Property => "val",
            EntityKind::EnumEntry | EntityKind::TypeParameter => "",
        }
    }

    /// Heading of the member group this kind is listed under.
    pub fn group_title(&self) -> &'static str {
        match self {
            EntityKind::Module => "Modules",
            EntityKind::Package => "Packages",
            EntityKind::Class
            | EntityKind::Interface
            | EntityKind::Object
            | EntityKind::Enum
            | EntityKind::Annotation
            | EntityKind::TypeAlias => "Types",
            EntityKind::EnumEntry => "Entries",
            EntityKind::Constructor => "Constructors",
            EntityKind::Property => "Properties",
            EntityKind::Function => "Functions",
            EntityKind::TypeParameter => "Type Parameters",
        }
    }

    /// Listing order of member groups on a page.
    pub fn group_rank(&self) -> u8 {
        match self {
            EntityKind::Module => 0,
            EntityKind::Package => 1,
            EntityKind::TypeParameter => 2,
            EntityKind::Constructor => 3,
            EntityKind::EnumEntry => 4,
            EntityKind::Property => 5,
            EntityKind::Function => 6,
            _ => 7,
        }
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "module" => Ok(Self::Module),
            "package" => Ok(Self::Package),
            "class" => Ok(Self::Class),
            "interface" => Ok(Self::Interface),
            "object" => Ok(Self::Object),
            "enum" => Ok(Self::Enum),
            "enum-entry" => Ok(Self::EnumEntry),
            "annotation" => Ok(Self::Annotation),
            "typealias" => Ok(Self::TypeAlias),
            "constructor" => Ok(Self::Constructor),
            "function" => Ok(Self::Function),
            "property" => Ok(Self::Property),
            "type-parameter" => Ok(Self::TypeParameter),
            _ => Err(format!("unknown entity kind `{s}`")),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Module => "module",
            EntityKind::Package => "package",
            EntityKind::Class => "class",
            EntityKind::Interface => "interface",
            EntityKind::Object => "object",
            EntityKind::Enum => "enum",
            EntityKind::EnumEntry => "enum-entry",
            EntityKind::Annotation => "annotation",
            EntityKind::TypeAlias => "typealias",
            EntityKind::Constructor => "constructor",
            EntityKind::Function => "function",
            EntityKind::Property => "property",
            EntityKind::TypeParameter => "type-parameter",
        };
        write!(f, "{name}")
    }
}

/// Declared visibility of an entity.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Internal,
    Private,
}

impl Visibility {
    /// Public and protected members are part of the documented API.
    pub fn is_api(&self) -> bool {
        matches!(self, Visibility::Public | Visibility::Protected)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Internal => "internal",
            Visibility::Private => "private",
        }
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "protected" => Ok(Self::Protected),
            "internal" => Ok(Self::Internal),
            "private" => Ok(Self::Private),
            _ => Err(format!("unknown visibility `{s}`")),
        }
    }
}

/// Declaration modifiers.
///
/// Variant order is the canonical order modifiers are printed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Expect,
    Actual,
    Final,
    Open,
    Abstract,
    Sealed,
    Const,
    External,
    Override,
    Lateinit,
    Tailrec,
    Suspend,
    Inner,
    Value,
    Companion,
    Inline,
    Infix,
    Operator,
    Data,
}

impl Modifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Expect => "expect",
            Modifier::Actual => "actual",
            Modifier::Final => "final",
            Modifier::Open => "open",
            Modifier::Abstract => "abstract",
            Modifier::Sealed => "sealed",
            Modifier::Const => "const",
            Modifier::External => "external",
            Modifier::Override => "override",
            Modifier::Lateinit => "lateinit",
            Modifier::Tailrec => "tailrec",
            Modifier::Suspend => "suspend",
            Modifier::Inner => "inner",
            Modifier::Value => "value",
            Modifier::Companion => "companion",
            Modifier::Inline => "inline",
            Modifier::Infix => "infix",
            Modifier::Operator => "operator",
            Modifier::Data => "data",
        }
    }
}

impl FromStr for Modifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expect" => Ok(Self::Expect),
            "actual" => Ok(Self::Actual),
            "final" => Ok(Self::Final),
            "open" => Ok(Self::Open),
            "abstract" => Ok(Self::Abstract),
            "sealed" => Ok(Self::Sealed),
            "const" => Ok(Self::Const),
            "external" => Ok(Self::External),
            "override" => Ok(Self::Override),
            "lateinit" => Ok(Self::Lateinit),
            "tailrec" => Ok(Self::Tailrec),
            "suspend" => Ok(Self::Suspend),
            "inner" => Ok(Self::Inner),
            "value" => Ok(Self::Value),
            "companion" => Ok(Self::Companion),
            "inline" => Ok(Self::Inline),
            "infix" => Ok(Self::Infix),
            "operator" => Ok(Self::Operator),
            "data" => Ok(Self::Data),
            _ => Err(format!("unknown modifier `{s}`")),
        }
    }
}
