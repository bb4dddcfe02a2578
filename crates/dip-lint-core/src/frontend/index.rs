//! Crate-wide table of type definitions and function signatures.

use super::display::type_display;
use super::lower::Lowerer;
use super::modules::{absolute_path, anchor, module_of_file, Imports};
use crate::model::{Declaration, ResolvedType, Shape};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use syn::visit::Visit;
use syn::{GenericArgument, PathArguments, PathSegment, ReturnType, Type};

/// Wrappers that take the shape of their single type argument.
const TRANSPARENT_WRAPPERS: &[&str] = &["Box", "Arc", "Rc", "Pin"];

/// Single-value carriers unwrapped when listing declared results.
const RESULT_CARRIERS: &[&str] = &["Result", "Option"];

const PRIMITIVES: &[&str] = &[
    "bool", "char", "str", "u8", "u16", "u32", "u64", "u128", "usize", "i8", "i16", "i32", "i64",
    "i128", "isize", "f32", "f64",
];

const MAX_ALIAS_DEPTH: usize = 16;

/// What a type name is defined as.
#[derive(Debug, Clone)]
enum TypeDef {
    Data,
    Trait,
    Alias(Box<Type>),
}

/// Type context at a point in the source: the enclosing impl's self type and
/// the generic type parameters in scope.
#[derive(Debug, Clone, Default)]
pub struct TypeScope {
    self_ty: Option<Box<Type>>,
    generics: HashSet<String>,
}

impl TypeScope {
    /// Scope of an `impl` block for `self_ty`.
    #[must_use]
    pub fn for_impl(self_ty: &Type) -> Self {
        Self {
            self_ty: Some(Box::new(self_ty.clone())),
            generics: HashSet::new(),
        }
    }

    /// Adds the type parameters of `generics` to the scope.
    pub fn add_generics(&mut self, generics: &syn::Generics) {
        self.generics
            .extend(generics.type_params().map(|p| p.ident.to_string()));
    }

    /// The enclosing impl's self type.
    #[must_use]
    pub fn self_ty(&self) -> Option<&Type> {
        self.self_ty.as_deref()
    }

    /// Short name of the enclosing impl's self type.
    #[must_use]
    pub fn owner_name(&self) -> Option<String> {
        self.self_ty().map(short_type_name)
    }

    fn is_generic(&self, name: &str) -> bool {
        self.generics.contains(name)
    }
}

/// Where a call is made from.
pub(crate) struct CallContext<'a> {
    pub(crate) module: &'a [String],
    pub(crate) imports: &'a Imports,
    pub(crate) scope: &'a TypeScope,
}

/// Resolves types and functions across every file of the analysed program.
#[derive(Debug, Default)]
pub struct ProgramIndex {
    types: HashMap<String, Vec<TypeDef>>,
    functions: HashMap<String, Vec<Declaration>>,
    modules: HashSet<Vec<String>>,
}

impl ProgramIndex {
    /// Builds the index from every parsed file of the program, each given
    /// with its path relative to the analysis root.
    #[must_use]
    pub fn build<'a>(files: impl IntoIterator<Item = (&'a Path, &'a syn::File)> + Clone) -> Self {
        let mut index = Self::default();

        let mut types = TypeCollector::default();
        for (_, file) in files.clone() {
            types.visit_file(file);
        }
        index.types = types.types;

        let mut functions: HashMap<String, Vec<Declaration>> = HashMap::new();
        let mut modules = HashSet::from([Vec::new()]);
        for (path, file) in files {
            let (declarations, file_modules) =
                Lowerer::declarations(&index, module_of_file(path), file);
            for decl in declarations {
                functions.entry(decl.name.clone()).or_default().push(decl);
            }
            for module in file_modules {
                modules.extend((1..=module.len()).map(|n| module[..n].to_vec()));
            }
        }
        index.functions = functions;
        index.modules = modules;

        tracing::debug!(
            "Indexed {} type names, {} function names and {} modules",
            index.types.len(),
            index.functions.len(),
            index.modules.len()
        );
        index
    }

    /// Resolves a type in the given scope.
    #[must_use]
    pub fn resolve(&self, ty: &Type, scope: &TypeScope) -> ResolvedType {
        let name = match (ty, scope.self_ty()) {
            (Type::Path(tp), Some(self_ty)) if tp.qself.is_none() && tp.path.is_ident("Self") => {
                type_display(self_ty)
            }
            _ => type_display(ty),
        };
        ResolvedType::new(name, self.shape(ty, scope, 0))
    }

    /// Lists the declared result types of a function's return type.
    ///
    /// `()` declares nothing, a tuple declares each element, and
    /// `Result<T, _>` / `Option<T>` declare the results of `T`.
    #[must_use]
    pub fn results(&self, output: &ReturnType, scope: &TypeScope) -> Vec<ResolvedType> {
        match output {
            ReturnType::Default => Vec::new(),
            ReturnType::Type(_, ty) => result_types(ty)
                .into_iter()
                .map(|t| self.resolve(t, scope))
                .collect(),
        }
    }

    /// Resolves a call path to an in-program function declaration.
    ///
    /// A qualified path resolves only through modules of the program:
    /// `a::f` to the free function `f` of module `a`, `T::f` and `Self::f`
    /// to an associated function of `T`. Paths into other crates never
    /// resolve. An unqualified `f` resolves to the current module's `f`,
    /// else to its import, else to the only free `f` of the program.
    pub(crate) fn lookup_function(
        &self,
        path: &syn::Path,
        ctx: &CallContext<'_>,
    ) -> Option<&Declaration> {
        if path.leading_colon.is_some() {
            return None;
        }
        let segments: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
        let (name, qualifier) = segments.split_last()?;
        let candidates = self.functions.get(name).map_or(&[][..], Vec::as_slice);

        match qualifier {
            [] => candidates
                .iter()
                .find(|d| d.owner.is_none() && d.module == ctx.module)
                .or_else(|| match ctx.imports.get(name) {
                    Some(target) => self.lookup_absolute(&anchor(target, ctx.module)?),
                    None => only(candidates.iter().filter(|d| d.owner.is_none())),
                }),
            [self_ty] if self_ty == "Self" => {
                let owner = ctx.scope.owner_name()?;
                owned_by(candidates, &owner, ctx.module)
            }
            _ => self.lookup_absolute(&absolute_path(&segments, ctx.module, ctx.imports)?),
        }
    }

    fn lookup_absolute(&self, full: &[String]) -> Option<&Declaration> {
        let (name, qualifier) = full.split_last()?;
        let candidates = self.functions.get(name)?;

        if self.modules.contains(qualifier) {
            return candidates
                .iter()
                .find(|d| d.owner.is_none() && d.module == qualifier);
        }
        let (owner, type_module) = qualifier.split_last()?;
        if !self.modules.contains(type_module) {
            tracing::trace!("{} is outside the program", full.join("::"));
            return None;
        }
        owned_by(candidates, owner, type_module)
    }

    fn shape(&self, ty: &Type, scope: &TypeScope, depth: usize) -> Shape {
        if depth > MAX_ALIAS_DEPTH {
            return Shape::Unresolved;
        }

        match ty {
            Type::TraitObject(_) | Type::ImplTrait(_) => Shape::CapabilitySet,
            Type::Reference(r) => self.shape(&r.elem, scope, depth),
            Type::Ptr(p) => self.shape(&p.elem, scope, depth),
            Type::Paren(p) => self.shape(&p.elem, scope, depth),
            Type::Group(g) => self.shape(&g.elem, scope, depth),
            Type::Tuple(_) | Type::Array(_) | Type::Slice(_) | Type::BareFn(_) | Type::Never(_) => {
                Shape::Data
            }
            Type::Path(tp) if tp.qself.is_none() => self.path_shape(&tp.path, scope, depth),
            _ => Shape::Unresolved,
        }
    }

    fn path_shape(&self, path: &syn::Path, scope: &TypeScope, depth: usize) -> Shape {
        let Some(last) = path.segments.last() else {
            return Shape::Unresolved;
        };
        let name = last.ident.to_string();
        let single = path.segments.len() == 1;

        if single && name == "Self" {
            return scope
                .self_ty()
                .map_or(Shape::Unresolved, |self_ty| {
                    self.shape(self_ty, scope, depth + 1)
                });
        }
        if single && scope.is_generic(&name) {
            return Shape::CapabilitySet;
        }
        if TRANSPARENT_WRAPPERS.contains(&name.as_str()) {
            if let Some(inner) = first_type_arg(last) {
                return self.shape(inner, scope, depth);
            }
        }
        if single && PRIMITIVES.contains(&name.as_str()) {
            return Shape::Data;
        }

        let Some(defs) = self.types.get(&name) else {
            return Shape::Unresolved;
        };
        let mut shapes = defs.iter().map(|def| match def {
            TypeDef::Data => Shape::Data,
            TypeDef::Trait => Shape::CapabilitySet,
            TypeDef::Alias(target) => self.shape(target, scope, depth + 1),
        });
        let first = shapes.next().unwrap_or(Shape::Unresolved);
        if shapes.all(|s| s == first) {
            first
        } else {
            Shape::Unresolved
        }
    }
}

/// Collects type definitions from every item, at any nesting depth.
#[derive(Debug, Default)]
struct TypeCollector {
    types: HashMap<String, Vec<TypeDef>>,
}

impl TypeCollector {
    fn add(&mut self, ident: &syn::Ident, def: TypeDef) {
        self.types.entry(ident.to_string()).or_default().push(def);
    }
}

impl<'ast> Visit<'ast> for TypeCollector {
    fn visit_item_struct(&mut self, node: &'ast syn::ItemStruct) {
        self.add(&node.ident, TypeDef::Data);
        syn::visit::visit_item_struct(self, node);
    }

    fn visit_item_enum(&mut self, node: &'ast syn::ItemEnum) {
        self.add(&node.ident, TypeDef::Data);
        syn::visit::visit_item_enum(self, node);
    }

    fn visit_item_union(&mut self, node: &'ast syn::ItemUnion) {
        self.add(&node.ident, TypeDef::Data);
        syn::visit::visit_item_union(self, node);
    }

    fn visit_item_trait(&mut self, node: &'ast syn::ItemTrait) {
        self.add(&node.ident, TypeDef::Trait);
        syn::visit::visit_item_trait(self, node);
    }

    fn visit_item_type(&mut self, node: &'ast syn::ItemType) {
        self.add(&node.ident, TypeDef::Alias(node.ty.clone()));
        syn::visit::visit_item_type(self, node);
    }
}

/// Splits a return type into its declared results.
fn result_types(ty: &Type) -> Vec<&Type> {
    match ty {
        Type::Tuple(tuple) => tuple.elems.iter().collect(),
        Type::Paren(p) => result_types(&p.elem),
        Type::Group(g) => result_types(&g.elem),
        Type::Path(tp) if tp.qself.is_none() => {
            let carried = tp
                .path
                .segments
                .last()
                .filter(|seg| RESULT_CARRIERS.iter().any(|c| seg.ident == *c))
                .and_then(first_type_arg);
            carried.map_or_else(|| vec![ty], result_types)
        }
        _ => vec![ty],
    }
}

/// Associated function of `owner`, preferring one implemented in `module`.
fn owned_by<'a>(
    candidates: &'a [Declaration],
    owner: &str,
    module: &[String],
) -> Option<&'a Declaration> {
    let mut owned = candidates
        .iter()
        .filter(|d| d.owner.as_deref() == Some(owner));
    let first = owned.next()?;
    if first.module == module {
        return Some(first);
    }
    owned.find(|d| d.module == module).or(Some(first))
}

fn only<'a>(mut iter: impl Iterator<Item = &'a Declaration>) -> Option<&'a Declaration> {
    match (iter.next(), iter.next()) {
        (Some(found), None) => Some(found),
        _ => None,
    }
}

fn first_type_arg(segment: &PathSegment) -> Option<&Type> {
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => args.args.iter().find_map(|arg| match arg {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        }),
        _ => None,
    }
}

/// Last path segment for path types, the full rendering otherwise.
fn short_type_name(ty: &Type) -> String {
    match ty {
        Type::Path(tp) if tp.qself.is_none() => tp
            .path
            .segments
            .last()
            .map_or_else(|| type_display(ty), |seg| seg.ident.to_string()),
        _ => type_display(ty),
    }
}
