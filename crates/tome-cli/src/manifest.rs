//! TOML declaration manifest, the frontend shipped with the CLI.
//!
//! A manifest lists the declarations of each source file and the external
//! names the documented code may refer to:
//!
//! ```toml
//! external = ["kotlin.*"]
//!
//! [[fragment]]
//! path = "src/p/C.kt"
//! package = "p"
//!
//! [[fragment.declaration]]
//! name = "C"
//! kind = "class"
//! doc = "See [D]."
//! type_parameters = [{ name = "T", bounds = ["Any"] }]
//!
//! [[fragment.declaration.children]]
//! name = "run"
//! kind = "function"
//! parameters = [{ name = "times", type = "Int", default = "1" }]
//! returns = "Unit"
//! ```
//!
//! Kinds, visibilities and modifiers are checked when the manifest is
//! loaded; the resulting [`Manifest`] is a [`SemanticSession`].

use std::{fs, io, path::Path, str::FromStr};

use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use tome::{
    TomeError,
    declaration::{
        Declaration, ExternalSymbol, ParameterDeclaration, SemanticSession, SourceFragment,
    },
    model::{EntityKind, Modifier, Visibility},
};
use tome_parser::parse_type_name;

/// Errors reading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest `{path}`: {source}")]
    Read { path: String, source: io::Error },

    #[error("Failed to parse manifest: {0}")]
    Parse(String),

    #[error("Invalid declaration `{declaration}`: {message}")]
    Invalid {
        declaration: String,
        message: String,
    },
}

impl From<ManifestError> for TomeError {
    fn from(err: ManifestError) -> Self {
        TomeError::Io(io::Error::new(io::ErrorKind::InvalidData, err.to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    #[serde(default)]
    external: Vec<String>,
    #[serde(default)]
    fragment: Vec<RawFragment>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFragment {
    path: String,
    #[serde(default)]
    package: String,
    #[serde(default)]
    declaration: Vec<RawDeclaration>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDeclaration {
    name: String,
    kind: String,
    #[serde(default)]
    doc: Option<String>,
    #[serde(default)]
    visibility: Option<String>,
    #[serde(default)]
    modifiers: Vec<String>,
    #[serde(default)]
    annotations: Vec<String>,
    #[serde(default)]
    parameters: Vec<RawParameter>,
    #[serde(default)]
    type_parameters: Vec<RawTypeParameter>,
    #[serde(default)]
    receiver: Option<String>,
    #[serde(default)]
    returns: Option<String>,
    #[serde(default)]
    supertypes: Vec<String>,
    #[serde(default)]
    mutable: bool,
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    children: Vec<RawDeclaration>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawParameter {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    default: Option<String>,
    #[serde(default)]
    vararg: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTypeParameter {
    name: String,
    #[serde(default)]
    bounds: Vec<String>,
    #[serde(default)]
    doc: Option<String>,
}

/// A loaded manifest.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    fragments: Vec<SourceFragment>,
    external: Vec<String>,
}

impl Manifest {
    /// Read and validate the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError`] if the file cannot be read, is not valid
    /// TOML, or names an unknown kind, visibility or modifier.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let manifest: Self = text.parse()?;
        info!(
            path = path.display().to_string(),
            fragments = manifest.fragments.len(),
            external = manifest.external.len();
            "Manifest loaded"
        );
        Ok(manifest)
    }
}

impl FromStr for Manifest {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: RawManifest = toml::from_str(s).map_err(|e| ManifestError::Parse(e.to_string()))?;
        let fragments = raw
            .fragment
            .into_iter()
            .map(fragment)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            fragments,
            external: raw.external,
        })
    }
}

impl SemanticSession for Manifest {
    fn fragments(&self) -> Vec<SourceFragment> {
        self.fragments.clone()
    }

    fn resolve_external(&self, name: &str) -> Option<ExternalSymbol> {
        let known = self.external.iter().any(|pattern| match pattern.strip_suffix('*') {
            Some(prefix) => name.starts_with(prefix),
            None => name == pattern,
        });
        if known {
            debug!(name; "Resolved external name");
        }
        known.then(|| ExternalSymbol {
            qualified_name: name.to_string(),
        })
    }
}

fn fragment(raw: RawFragment) -> Result<SourceFragment, ManifestError> {
    let declarations = raw
        .declaration
        .into_iter()
        .map(declaration)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SourceFragment {
        path: raw.path.into(),
        package: raw.package,
        declarations,
    })
}

fn declaration(raw: RawDeclaration) -> Result<Declaration, ManifestError> {
    let invalid = |message: String| ManifestError::Invalid {
        declaration: raw.name.clone(),
        message,
    };

    let kind = EntityKind::from_str(&raw.kind).map_err(invalid)?;
    let visibility = match &raw.visibility {
        Some(visibility) => Visibility::from_str(visibility).map_err(invalid)?,
        None => Visibility::default(),
    };
    let modifiers = raw
        .modifiers
        .iter()
        .map(|modifier| Modifier::from_str(modifier))
        .collect::<Result<Vec<_>, _>>()
        .map_err(invalid)?;

    let parameters = raw
        .parameters
        .into_iter()
        .map(|parameter| ParameterDeclaration {
            name: parameter.name,
            type_name: parse_type_name(&parameter.type_name),
            default_value: parameter.default,
            vararg: parameter.vararg,
        })
        .collect();

    let mut children: Vec<Declaration> = raw
        .type_parameters
        .into_iter()
        .map(|parameter| {
            let mut declaration = Declaration::new(parameter.name, EntityKind::TypeParameter);
            declaration.supertypes = parameter.bounds.iter().map(|b| parse_type_name(b)).collect();
            declaration.doc = parameter.doc;
            declaration
        })
        .collect();
    for child in raw.children {
        children.push(declaration(child)?);
    }

    Ok(Declaration {
        name: raw.name,
        kind,
        visibility,
        modifiers,
        annotations: raw.annotations,
        mutable: raw.mutable,
        doc: raw.doc,
        receiver: raw.receiver.as_deref().map(parse_type_name),
        parameters,
        returns: raw.returns.as_deref().map(parse_type_name),
        supertypes: raw.supertypes.iter().map(|s| parse_type_name(s)).collect(),
        line: raw.line,
        children,
    })
}
