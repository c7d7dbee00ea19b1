//! Output locations.
//!
//! Every entity gets one [`Location`]: containers (the module, packages and
//! classifiers) own a directory whose `index` page documents them, members
//! are files in their parent's directory, and type parameters are anchors on
//! their owner's page. Declarations nested in a member (enum entry bodies,
//! local classes) go to a directory named like the member's page, so
//! `p/foo.md` keeps its local class at `p/foo/-local/index.md`.
//!
//! Names are escaped into path segments injectively: lowercase ASCII, digits
//! and `_` are kept, an uppercase letter `X` becomes `-x` (so `Foo` and `foo`
//! stay apart on case-insensitive file systems), anything else becomes
//! `~<hex>~`. Dots survive only in package names. A later sibling with the
//! same segment gets `-2`, `-3`, ... and since `-` is only ever followed by a
//! lowercase letter in an escaped name, the suffixes cannot collide with
//! other names. Siblings share one counter, so a member's file `S.ext`, its
//! directory `S/` and a sibling container's directory never meet.

use std::{
    collections::{HashMap, hash_map::Entry},
    fmt::Write as _,
    path::PathBuf,
};

use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

use tome_core::model::{DocumentationModule, EntityIndex, EntityKind};
use tome_parser::error::{Diagnostic, ErrorCode};

const CONSTRUCTOR_STEM: &str = "-constructor-";
const ROOT_PACKAGE_STEM: &str = "-root-";
const INDEX_STEM: &str = "index";

/// Where an entity is written: directory segments, file name and an
/// optional anchor on that page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    directories: Vec<String>,
    file: String,
    anchor: Option<String>,
}

impl Location {
    pub fn directories(&self) -> &[String] {
        &self.directories
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    /// Path of the page relative to the output root, `/`-separated.
    pub fn page(&self) -> String {
        let mut page = String::new();
        for directory in &self.directories {
            page.push_str(directory);
            page.push('/');
        }
        page.push_str(&self.file);
        page
    }

    /// Path of the page relative to the output root.
    pub fn path(&self) -> PathBuf {
        self.directories.iter().chain([&self.file]).collect()
    }
}

/// Errors raised while assigning locations.
#[derive(Debug, Error)]
pub enum LocationError {
    /// Two entities were assigned the same page and anchor.
    #[error("location `{location}` is assigned to both `{first}` and `{second}`")]
    Collision {
        location: String,
        first: String,
        second: String,
    },
}

impl LocationError {
    /// The error as a reportable diagnostic.
    pub fn diagnostic(&self) -> Diagnostic {
        match self {
            LocationError::Collision { second, .. } => Diagnostic::error(self.to_string())
                .with_code(ErrorCode::E300)
                .with_entity(second.as_str())
                .with_help("this is a bug in location assignment; please report it"),
        }
    }
}

/// The location table of a model.
#[derive(Debug, Clone)]
pub struct LocationService {
    locations: Vec<Location>,
}

impl LocationService {
    /// Assign a location to every entity of `module`.
    ///
    /// Pure: the same model always yields the same table.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::Collision`] if two entities end up with the
    /// same location.
    pub fn new(module: &DocumentationModule, extension: &str) -> Result<Self, LocationError> {
        info!(entities = module.len(), extension = extension; "Assigning locations");

        let mut locations: Vec<Option<Location>> = vec![None; module.len()];
        let root = module.root();
        locations[root.index()] = Some(Location {
            directories: Vec::new(),
            file: format!("{INDEX_STEM}.{extension}"),
            anchor: None,
        });

        // Directory the children of each entity are placed in.
        let mut scopes: Vec<Option<Vec<String>>> = vec![None; module.len()];
        scopes[root.index()] = Some(Vec::new());

        let mut stack = vec![root];
        while let Some(parent) = stack.pop() {
            // Parents are always located before their children.
            let (Some(parent_location), Some(scope)) =
                (locations[parent.index()].clone(), scopes[parent.index()].clone())
            else {
                continue;
            };

            let mut stems: HashMap<String, usize> = HashMap::new();
            if module.entity(parent).kind().is_container() {
                stems.insert(INDEX_STEM.to_string(), 1);
            }

            for &child in module.entity(parent).children() {
                let entity = module.entity(child);
                let stem = unique_stem(&mut stems, base_stem(entity.name(), entity.kind()));
                let (location, child_scope) = if entity.kind() == EntityKind::TypeParameter {
                    let location = Location {
                        anchor: Some(stem),
                        ..parent_location.clone()
                    };
                    (location, scope.clone())
                } else if entity.kind().is_container() {
                    let mut directories = scope.clone();
                    directories.push(stem);
                    let location = Location {
                        directories: directories.clone(),
                        file: format!("{INDEX_STEM}.{extension}"),
                        anchor: None,
                    };
                    (location, directories)
                } else {
                    let location = Location {
                        directories: scope.clone(),
                        file: format!("{stem}.{extension}"),
                        anchor: None,
                    };
                    // Members nest their own declarations in a directory
                    // named after their page.
                    let mut directories = scope.clone();
                    directories.push(stem);
                    (location, directories)
                };
                locations[child.index()] = Some(location);
                scopes[child.index()] = Some(child_scope);
            }
            // Reverse so siblings are visited in declaration order.
            stack.extend(module.entity(parent).children().iter().rev());
        }

        let locations: Vec<Location> = locations.into_iter().flatten().collect();
        let mut seen: HashMap<&Location, EntityIndex> = HashMap::new();
        for (index, location) in module.indices().zip(&locations) {
            match seen.entry(location) {
                Entry::Occupied(first) => {
                    return Err(LocationError::Collision {
                        location: display(location),
                        first: module.entity(*first.get()).dri().to_string(),
                        second: module.entity(index).dri().to_string(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(index);
                }
            }
        }

        debug!(locations = locations.len(); "Locations assigned");
        Ok(Self { locations })
    }

    /// Get the location of an entity.
    pub fn location(&self, index: EntityIndex) -> &Location {
        &self.locations[index.index()]
    }

    /// Relative link from the page of `from` to the location of `to`.
    pub fn relative(&self, from: EntityIndex, to: EntityIndex) -> String {
        let from = self.location(from);
        let to = self.location(to);
        let mut link = relative_page(from, &to.directories, &to.file);
        if let Some(anchor) = &to.anchor {
            link.push('#');
            link.push_str(anchor);
        }
        link
    }

    /// Relative link from the page of `from` to a file at the output root.
    pub fn relative_to_root(&self, from: EntityIndex, file: &str) -> String {
        relative_page(self.location(from), &[], file)
    }
}

fn relative_page(from: &Location, directories: &[String], file: &str) -> String {
    let common = from
        .directories
        .iter()
        .zip(directories)
        .take_while(|(a, b)| a == b)
        .count();
    let mut link = "../".repeat(from.directories.len() - common);
    for directory in &directories[common..] {
        link.push_str(directory);
        link.push('/');
    }
    link.push_str(file);
    link
}

fn display(location: &Location) -> String {
    match &location.anchor {
        Some(anchor) => format!("{}#{anchor}", location.page()),
        None => location.page(),
    }
}

fn base_stem(name: &str, kind: EntityKind) -> String {
    match kind {
        EntityKind::Constructor => CONSTRUCTOR_STEM.to_string(),
        _ if name.is_empty() => ROOT_PACKAGE_STEM.to_string(),
        EntityKind::Package => escape(name),
        // `foo.md` would otherwise meet the directory of a class `foo.md`.
        _ => escape(name).replace('.', "~2e~"),
    }
}

/// Give `base` a per-parent suffix if a sibling already uses it.
fn unique_stem(stems: &mut HashMap<String, usize>, base: String) -> String {
    let count = stems.entry(base.clone()).or_insert(0);
    *count += 1;
    if *count == 1 {
        base
    } else {
        format!("{base}-{count}")
    }
}

/// Escape a name into a path segment.
pub fn escape(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for (i, c) in name.chars().enumerate() {
        match c {
            'a'..='z' | '0'..='9' | '_' => escaped.push(c),
            // A leading dot would make a hidden file or a `..` segment.
            '.' if i > 0 => escaped.push(c),
            'A'..='Z' => {
                escaped.push('-');
                escaped.push(c.to_ascii_lowercase());
            }
            _ => {
                let _ = write!(escaped, "~{:x}~", u32::from(c));
            }
        }
    }
    escaped
}
