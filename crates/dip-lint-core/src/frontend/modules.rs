//! Module paths and `use` imports, for resolving qualified calls.

use std::collections::HashMap;
use std::path::{Component, Path};
use syn::UseTree;

/// Crate roots that are never part of the analysed program.
const EXTERNAL_ROOTS: &[&str] = &["std", "core", "alloc"];

/// Marks a `::`-rooted path, which always names another crate.
const EXTERN_MARKER: &str = "::";

/// Module path of a source file, derived from its location under `src/`.
///
/// `src/lib.rs` and `src/main.rs` are the crate root, `src/a/mod.rs` and
/// `src/a.rs` are module `a`. Files outside any `src/` directory use their
/// whole relative path.
#[must_use]
pub fn module_of_file(relative_path: &Path) -> Vec<String> {
    let parts: Vec<String> = relative_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str().map(str::to_string),
            _ => None,
        })
        .collect();
    let start = parts.iter().rposition(|p| p == "src").map_or(0, |i| i + 1);

    let mut module = parts[start..].to_vec();
    if let Some(file) = module.pop() {
        let stem = file.strip_suffix(".rs").unwrap_or(&file).to_string();
        if !matches!(stem.as_str(), "lib" | "main" | "mod") {
            module.push(stem);
        }
    }
    module
}

/// Names brought into scope by `use` items, innermost scope last.
#[derive(Debug, Default)]
pub(crate) struct Imports {
    frames: Vec<HashMap<String, Vec<String>>>,
}

impl Imports {
    /// Opens a scope holding the `use` items among `items`.
    pub(crate) fn push<'a>(&mut self, items: impl IntoIterator<Item = &'a syn::Item>) {
        let mut frame = HashMap::new();
        for item in items {
            if let syn::Item::Use(item) = item {
                let mut prefix = Vec::new();
                if item.leading_colon.is_some() {
                    prefix.push(EXTERN_MARKER.to_string());
                }
                collect_use(&item.tree, &mut prefix, &mut frame);
            }
        }
        self.frames.push(frame);
    }

    pub(crate) fn pop(&mut self) {
        self.frames.pop();
    }

    /// The path an imported name stands for.
    pub(crate) fn get(&self, name: &str) -> Option<&[String]> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name))
            .map(Vec::as_slice)
    }
}

fn collect_use(tree: &UseTree, prefix: &mut Vec<String>, out: &mut HashMap<String, Vec<String>>) {
    match tree {
        UseTree::Path(p) => {
            prefix.push(p.ident.to_string());
            collect_use(&p.tree, prefix, out);
            prefix.pop();
        }
        UseTree::Name(n) if n.ident == "self" => {
            if let Some(last) = prefix.last() {
                out.insert(last.clone(), prefix.clone());
            }
        }
        UseTree::Name(n) => {
            let mut full = prefix.clone();
            full.push(n.ident.to_string());
            out.insert(n.ident.to_string(), full);
        }
        UseTree::Rename(r) => {
            let mut full = prefix.clone();
            if r.ident != "self" {
                full.push(r.ident.to_string());
            }
            out.insert(r.rename.to_string(), full);
        }
        UseTree::Group(g) => g.items.iter().for_each(|t| collect_use(t, prefix, out)),
        // Glob imports are covered by the unqualified-call fallback.
        UseTree::Glob(_) => {}
    }
}

/// Makes `segments` absolute within the program, as seen from `module`.
///
/// Returns `None` for paths that leave the program: standard library roots,
/// `::`-rooted paths and `super` past the crate root.
pub(crate) fn anchor(segments: &[String], module: &[String]) -> Option<Vec<String>> {
    let (first, rest) = segments.split_first()?;
    if first == EXTERN_MARKER || EXTERNAL_ROOTS.contains(&first.as_str()) {
        return None;
    }

    match first.as_str() {
        "crate" => Some(rest.to_vec()),
        "self" => Some([module, rest].concat()),
        "super" => {
            let mut base = module.to_vec();
            let mut rest = segments;
            while let Some((head, tail)) = rest.split_first() {
                if head != "super" {
                    break;
                }
                base.pop()?;
                rest = tail;
            }
            base.extend_from_slice(rest);
            Some(base)
        }
        _ => Some([module, segments].concat()),
    }
}

/// Like [`anchor`], but a leading imported name is replaced by its import.
pub(crate) fn absolute_path(
    segments: &[String],
    module: &[String],
    imports: &Imports,
) -> Option<Vec<String>> {
    let (first, rest) = segments.split_first()?;
    match imports.get(first) {
        Some(target) => {
            let mut full = anchor(target, module)?;
            full.extend_from_slice(rest);
            Some(full)
        }
        None => anchor(segments, module),
    }
}
