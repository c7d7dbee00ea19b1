//! Reference resolution.
//!
//! Every pending reference of the model (type slots of signatures, links in
//! documentation, subjects of `@throws`/`@see`/`@sample`) is looked up in a
//! snapshot of the model taken before the walk starts, then settled in
//! place. Lookup goes from the innermost scope outwards:
//!
//! 1. children of the entity owning the reference,
//! 2. children of each of its ancestors, up to the module,
//! 3. any entity whose qualified name equals or ends with the reference.
//!
//! The first level with a match wins, so inner declarations shadow outer
//! ones. A reference matching nothing is offered to the semantic session
//! and otherwise left unresolved with an `E200` warning, whether it is a
//! link or a type in a signature. Only pending targets are touched, so
//! resolving twice changes nothing.

use std::collections::HashMap;

use log::{debug, info, trace};

use tome_core::{
    content::LinkTarget,
    declaration::SemanticSession,
    model::{DocumentationModule, EntityIndex, EntityKind, ReferenceKind},
};
use tome_parser::error::{Diagnostic, ErrorCode};

const STAR_PROJECTION: &str = "*";

/// Resolves pending references against the model and a semantic session.
pub struct Resolver<'a> {
    session: &'a dyn SemanticSession,
}

impl<'a> Resolver<'a> {
    pub fn new(session: &'a dyn SemanticSession) -> Self {
        Self { session }
    }

    /// Resolve every pending reference of `module` in place.
    ///
    /// Returns `E200` warnings for unresolved links and types, and `E201`
    /// warnings for ambiguous links.
    pub fn resolve(&self, module: &mut DocumentationModule) -> Vec<Diagnostic> {
        let pending = module.pending_references();
        info!(pending = pending; "Resolving references");
        if pending == 0 {
            return Vec::new();
        }

        let table = SymbolTable::new(module);
        let mut diagnostics = Vec::new();
        let mut stats = Stats::default();

        for index in module.indices() {
            let entity = module.entity(index);
            if entity.pending_references() == 0 {
                continue;
            }
            let dri = entity.dri().to_string();
            let raw = entity.documentation().raw().map(str::to_string);

            module
                .entity_mut(index)
                .for_each_reference_mut(&mut |reference| {
                    if !reference.target.is_pending() {
                        return;
                    }
                    let path = ReferencePath::parse(reference.text);
                    let (target, diagnostic) = match table.lookup(index, &path, reference.kind) {
                        Lookup::Found(target) => {
                            stats.resolved += 1;
                            (LinkTarget::Resolved(target), None)
                        }
                        Lookup::Ambiguous { chosen, candidates } => {
                            stats.resolved += 1;
                            let diagnostic = Diagnostic::warning(format!(
                                "reference `{}` is ambiguous",
                                reference.text
                            ))
                            .with_code(ErrorCode::E201)
                            .with_help(format!(
                                "{candidates} declarations match; linking to the first declared. \
                                 Add a parameter list such as `{}(Int)` to choose one",
                                path.segments.join(".")
                            ));
                            (LinkTarget::Resolved(chosen), Some(diagnostic))
                        }
                        Lookup::NotFound => match self.session.resolve_external(reference.text) {
                            Some(symbol) => {
                                stats.external += 1;
                                (
                                    LinkTarget::Unresolved {
                                        external: Some(symbol.qualified_name),
                                    },
                                    None,
                                )
                            }
                            None => {
                                stats.unresolved += 1;
                                let diagnostic = match reference.kind {
                                    ReferenceKind::Doc => Some(
                                        Diagnostic::warning(format!(
                                            "unresolved link `[{}]`",
                                            reference.text
                                        ))
                                        .with_code(ErrorCode::E200)
                                        .with_help(
                                            "check the spelling, qualify the name, or declare it as external",
                                        ),
                                    ),
                                    // `List<*>` projects no type.
                                    ReferenceKind::Type if reference.text == STAR_PROJECTION => {
                                        None
                                    }
                                    ReferenceKind::Type => Some(
                                        Diagnostic::warning(format!(
                                            "unresolved type `{}`",
                                            reference.text
                                        ))
                                        .with_code(ErrorCode::E200)
                                        .with_help(
                                            "declare the type in the module or list it as external",
                                        ),
                                    ),
                                };
                                (LinkTarget::Unresolved { external: None }, diagnostic)
                            }
                        },
                    };
                    trace!(reference = reference.text, outcome:? = target; "Resolved reference");
                    *reference.target = target;

                    if let Some(mut diagnostic) = diagnostic {
                        diagnostic = diagnostic.with_entity(dri.as_str());
                        if let (Some(span), Some(raw)) = (reference.span, raw.as_deref()) {
                            let label = if diagnostic.code() == Some(ErrorCode::E200) {
                                "no symbol with this name is in scope"
                            } else {
                                "matches several declarations"
                            };
                            diagnostic = diagnostic.with_source(raw).with_label(span, label);
                        }
                        diagnostics.push(diagnostic);
                    }
                });
        }

        info!(
            resolved = stats.resolved,
            external = stats.external,
            unresolved = stats.unresolved;
            "References resolved"
        );
        diagnostics
    }
}

#[derive(Debug, Default)]
struct Stats {
    resolved: usize,
    external: usize,
    unresolved: usize,
}

/// A reference split into name segments and an optional parameter list.
#[derive(Debug, PartialEq, Eq)]
struct ReferencePath<'r> {
    segments: Vec<&'r str>,
    parameters: Option<Vec<String>>,
}

impl<'r> ReferencePath<'r> {
    fn parse(text: &'r str) -> Self {
        let text = text.trim();
        let (path, parameters) = match text.find('(') {
            Some(open) if text.ends_with(')') => {
                let inner = &text[open + 1..text.len() - 1];
                let parameters = if inner.trim().is_empty() {
                    Vec::new()
                } else {
                    split_parameters(inner)
                };
                (&text[..open], Some(parameters))
            }
            _ => (text, None),
        };
        Self {
            segments: path.split('.').map(str::trim).collect(),
            parameters,
        }
    }
}

/// Split a parameter list on top-level commas, ignoring those inside `<>`.
fn split_parameters(inner: &str) -> Vec<String> {
    let mut parameters = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parameters.push(normalize(&inner[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }
    parameters.push(normalize(&inner[start..]));
    parameters
}

fn normalize(type_text: &str) -> String {
    type_text.chars().filter(|c| !c.is_whitespace()).collect()
}

#[derive(Debug, PartialEq, Eq)]
enum Lookup {
    Found(EntityIndex),
    Ambiguous {
        chosen: EntityIndex,
        candidates: usize,
    },
    NotFound,
}

#[derive(Debug)]
struct Symbol {
    name: String,
    kind: EntityKind,
    parent: Option<EntityIndex>,
    children: Vec<EntityIndex>,
    path: String,
    parameter_types: Vec<String>,
}

/// Read-only snapshot of the model used while targets are being written.
struct SymbolTable {
    symbols: Vec<Symbol>,
    /// Entities by the last segment of their qualified name.
    by_last_segment: HashMap<String, Vec<EntityIndex>>,
    root: EntityIndex,
}

impl SymbolTable {
    fn new(module: &DocumentationModule) -> Self {
        let mut symbols = Vec::with_capacity(module.len());
        let mut by_last_segment: HashMap<String, Vec<EntityIndex>> = HashMap::new();
        for (index, entity) in module.iter() {
            let path = entity.dri().path().to_string();
            let last = path.rsplit('.').next().unwrap_or_default().to_string();
            by_last_segment.entry(last).or_default().push(index);
            symbols.push(Symbol {
                name: entity.name().to_string(),
                kind: entity.kind(),
                parent: entity.parent(),
                children: entity.children().to_vec(),
                path,
                parameter_types: entity
                    .parameter_types()
                    .iter()
                    .map(|parameter| normalize(parameter))
                    .collect(),
            });
        }
        debug!(symbols = symbols.len(); "Symbol table built");
        Self {
            symbols,
            by_last_segment,
            root: module.root(),
        }
    }

    fn symbol(&self, index: EntityIndex) -> &Symbol {
        &self.symbols[index.index()]
    }

    fn accepts(&self, index: EntityIndex, kind: ReferenceKind) -> bool {
        let symbol_kind = self.symbol(index).kind;
        match kind {
            ReferenceKind::Type => {
                symbol_kind.is_classifier() || symbol_kind == EntityKind::TypeParameter
            }
            ReferenceKind::Doc => symbol_kind != EntityKind::Constructor,
        }
    }

    fn lookup(&self, scope: EntityIndex, path: &ReferencePath<'_>, kind: ReferenceKind) -> Lookup {
        if path.segments.iter().any(|segment| segment.is_empty()) {
            return Lookup::NotFound;
        }

        let mut current = Some(scope);
        while let Some(level) = current {
            let mut candidates = Vec::new();
            self.descend(level, &path.segments, &mut candidates);
            candidates.retain(|&candidate| self.accepts(candidate, kind));
            if !candidates.is_empty() {
                return self.pick(candidates, path);
            }
            current = self.symbol(level).parent;
        }

        let joined = path.segments.join(".");
        let suffix = format!(".{joined}");
        let last = path.segments.last().copied().unwrap_or_default();
        let candidates: Vec<EntityIndex> = self
            .by_last_segment
            .get(last)
            .into_iter()
            .flatten()
            .copied()
            .filter(|&candidate| candidate != self.root)
            .filter(|&candidate| {
                let symbol_path = &self.symbol(candidate).path;
                *symbol_path == joined || symbol_path.ends_with(&suffix)
            })
            .filter(|&candidate| self.accepts(candidate, kind))
            .collect();
        if candidates.is_empty() {
            Lookup::NotFound
        } else {
            self.pick(candidates, path)
        }
    }

    /// Collect children of `scope` matching `segments`, descending through
    /// intermediate segments. Names containing dots (packages) may consume
    /// several segments at once.
    fn descend(&self, scope: EntityIndex, segments: &[&str], found: &mut Vec<EntityIndex>) {
        for take in (1..=segments.len()).rev() {
            let name = segments[..take].join(".");
            for &child in &self.symbol(scope).children {
                if self.symbol(child).name != name {
                    continue;
                }
                if take == segments.len() {
                    found.push(child);
                } else {
                    self.descend(child, &segments[take..], found);
                }
            }
        }
    }

    fn pick(&self, mut candidates: Vec<EntityIndex>, path: &ReferencePath<'_>) -> Lookup {
        candidates.sort();
        candidates.dedup();
        if let Some(parameters) = &path.parameters {
            if let Some(&exact) = candidates
                .iter()
                .find(|&&candidate| self.symbol(candidate).parameter_types == *parameters)
            {
                return Lookup::Found(exact);
            }
        }
        match candidates.as_slice() {
            [only] => Lookup::Found(*only),
            [first, ..] => Lookup::Ambiguous {
                chosen: *first,
                candidates: candidates.len(),
            },
            [] => Lookup::NotFound,
        }
    }
}
