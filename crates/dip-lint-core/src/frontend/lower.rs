//! Lowering of one parsed file into a [`Unit`].

use super::index::{CallContext, ProgramIndex, TypeScope};
use super::modules::Imports;
use crate::model::{BindingSite, CallSite, Declaration, Position, ResolvedType, Target, Value};
use crate::utils::path_to_string;
use std::collections::HashMap;
use syn::spanned::Spanned;
use syn::visit::Visit;
use syn::{Expr, FnArg, Pat, Type};

/// Name used for types the front end could not infer.
const UNKNOWN_TYPE: &str = "_";

/// Walks a file, collecting declarations and (optionally) binding sites.
pub(crate) struct Lowerer<'a> {
    index: &'a ProgramIndex,
    collect_bindings: bool,
    module: Vec<String>,
    modules: Vec<Vec<String>>,
    imports: Imports,
    scope: TypeScope,
    vars: Vec<HashMap<String, ResolvedType>>,
    declarations: Vec<Declaration>,
    bindings: Vec<BindingSite>,
}

impl<'a> Lowerer<'a> {
    fn new(index: &'a ProgramIndex, module: Vec<String>, collect_bindings: bool) -> Self {
        Self {
            index,
            collect_bindings,
            modules: vec![module.clone()],
            module,
            imports: Imports::default(),
            scope: TypeScope::default(),
            vars: Vec::new(),
            declarations: Vec::new(),
            bindings: Vec::new(),
        }
    }

    /// Collects the declarations of a file in `module`, and every module
    /// the file defines.
    pub(crate) fn declarations(
        index: &'a ProgramIndex,
        module: Vec<String>,
        file: &syn::File,
    ) -> (Vec<Declaration>, Vec<Vec<String>>) {
        let mut lowerer = Self::new(index, module, false);
        lowerer.visit_file(file);
        (lowerer.declarations, lowerer.modules)
    }

    /// Collects declarations and binding sites of a file in `module`.
    pub(crate) fn lower(
        index: &'a ProgramIndex,
        module: Vec<String>,
        file: &syn::File,
    ) -> (Vec<Declaration>, Vec<BindingSite>) {
        let mut lowerer = Self::new(index, module, true);
        lowerer.visit_file(file);
        (lowerer.declarations, lowerer.bindings)
    }

    fn lower_fn(
        &mut self,
        sig: &syn::Signature,
        owner: Option<String>,
        declare: bool,
        body: Option<&syn::Block>,
    ) {
        let saved_scope = self.scope.clone();
        self.scope.add_generics(&sig.generics);

        if declare {
            let mut decl = Declaration::new(
                sig.ident.to_string(),
                Position::from_span(sig.ident.span()),
                self.index.results(&sig.output, &self.scope),
            )
            .with_module(self.module.clone());
            if let Some(owner) = owner {
                decl = decl.with_owner(owner);
            }
            tracing::trace!("Declaration {} with {} result(s)", decl.name, decl.results.len());
            self.declarations.push(decl);
        }

        if let Some(body) = body {
            let saved_vars = std::mem::take(&mut self.vars);
            self.vars.push(HashMap::new());
            for input in &sig.inputs {
                match input {
                    FnArg::Receiver(receiver) => {
                        let ty = self.resolve(&receiver.ty);
                        self.define("self", ty);
                    }
                    FnArg::Typed(pat_type) => {
                        let ty = self.resolve(&pat_type.ty);
                        self.define_pattern(&pat_type.pat, Some(ty));
                    }
                }
            }
            self.visit_block(body);
            self.vars = saved_vars;
        }

        self.scope = saved_scope;
    }

    fn resolve(&self, ty: &Type) -> ResolvedType {
        self.index.resolve(ty, &self.scope)
    }

    fn define(&mut self, name: &str, ty: ResolvedType) {
        if let Some(frame) = self.vars.last_mut() {
            frame.insert(name.to_string(), ty);
        }
    }

    /// Defines every identifier bound by `pat`; only a plain identifier
    /// pattern receives `ty`, everything nested is unknown.
    fn define_pattern(&mut self, pat: &Pat, ty: Option<ResolvedType>) {
        match pat {
            Pat::Type(pt) => self.define_pattern(&pt.pat, ty),
            Pat::Ident(ident) if ident.subpat.is_none() => {
                let ty = ty.unwrap_or_else(|| ResolvedType::unresolved(UNKNOWN_TYPE));
                self.define(&ident.ident.to_string(), ty);
            }
            _ => {
                let mut names = Vec::new();
                pattern_names(pat, &mut names);
                for name in names {
                    self.define(&name, ResolvedType::unresolved(UNKNOWN_TYPE));
                }
            }
        }
    }

    fn lookup_var(&self, name: &str) -> Option<&ResolvedType> {
        self.vars.iter().rev().find_map(|frame| frame.get(name))
    }

    fn with_frame(&mut self, f: impl FnOnce(&mut Self)) {
        self.vars.push(HashMap::new());
        f(self);
        self.vars.pop();
    }

    fn value(&self, expr: &Expr) -> Value {
        match peel(expr) {
            Expr::Call(call) => match &*call.func {
                Expr::Path(func) if func.qself.is_none() => Value::Call(CallSite {
                    callee_path: path_to_string(&func.path),
                    position: Position::from_span(func.span()),
                    callee: self
                        .index
                        .lookup_function(
                            &func.path,
                            &CallContext {
                                module: &self.module,
                                imports: &self.imports,
                                scope: &self.scope,
                            },
                        )
                        .cloned(),
                }),
                _ => Value::Other,
            },
            _ => Value::Other,
        }
    }

    /// Type of target `slot` inferred from the right-hand values.
    ///
    /// A single target bound to a call with several results holds all of
    /// them as one tuple.
    fn infer(values: &[Value], slot: usize, slots: usize) -> ResolvedType {
        let (value, result) = if values.len() == 1 && slots > 1 {
            (values.first(), slot)
        } else {
            (values.get(slot), 0)
        };
        let inferred = match value {
            Some(Value::Call(CallSite {
                callee: Some(decl), ..
            })) if slots == 1 && decl.results.len() > 1 => Some(tuple_of(&decl.results)),
            Some(Value::Call(CallSite {
                callee: Some(decl), ..
            })) => decl.results.get(result).cloned(),
            _ => None,
        };
        inferred.unwrap_or_else(|| ResolvedType::unresolved(UNKNOWN_TYPE))
    }

    fn lower_local(&mut self, local: &syn::Local) {
        let declared = declared_slots(&local.pat, |ty| self.resolve(ty));

        let Some(init) = &local.init else {
            self.define_pattern(&local.pat, None);
            for (name, ty) in declared.into_iter().flatten() {
                if let Some(ty) = ty {
                    self.define(&name, ty);
                }
            }
            return;
        };

        let values = split_values(&init.expr)
            .into_iter()
            .map(|e| self.value(e))
            .collect::<Vec<_>>();
        let slots = declared.len();
        let targets: Vec<Target> = declared
            .into_iter()
            .enumerate()
            .map(|(i, slot)| match slot {
                Some((name, declared)) => Target::Ident {
                    name,
                    ty: declared.unwrap_or_else(|| Self::infer(&values, i, slots)),
                },
                None => Target::Other,
            })
            .collect();

        self.visit_expr(&init.expr);
        if let Some((_, diverge)) = &init.diverge {
            self.visit_expr(diverge);
        }

        // The pattern's names come into scope after the initializer.
        self.define_pattern(&local.pat, None);
        for target in &targets {
            if let Target::Ident { name, ty } = target {
                self.define(name, ty.clone());
            }
        }

        if self.collect_bindings {
            self.bindings.push(BindingSite {
                position: Position::from_span(local.let_token.span),
                targets,
                values,
            });
        }
    }

    fn lower_assign(&mut self, assign: &syn::ExprAssign) {
        if !self.collect_bindings {
            return;
        }

        let targets = split_values(&assign.left)
            .into_iter()
            .map(|left| match peel_parens(left) {
                Expr::Path(p) if p.qself.is_none() => p.path.get_ident().map_or(Target::Other, |ident| {
                    let name = ident.to_string();
                    let ty = self
                        .lookup_var(&name)
                        .cloned()
                        .unwrap_or_else(|| ResolvedType::unresolved(UNKNOWN_TYPE));
                    Target::Ident { name, ty }
                }),
                _ => Target::Other,
            })
            .collect();
        let values = split_values(&assign.right)
            .into_iter()
            .map(|e| self.value(e))
            .collect();

        self.bindings.push(BindingSite {
            position: Position::from_span(assign.left.span()),
            targets,
            values,
        });
    }
}

impl<'ast> Visit<'ast> for Lowerer<'_> {
    fn visit_file(&mut self, node: &'ast syn::File) {
        self.imports.push(&node.items);
        syn::visit::visit_file(self, node);
        self.imports.pop();
    }

    fn visit_item_mod(&mut self, node: &'ast syn::ItemMod) {
        // `mod x;` is lowered from its own file.
        let Some((_, items)) = &node.content else {
            return;
        };
        self.module.push(node.ident.to_string());
        self.modules.push(self.module.clone());
        let saved_imports = std::mem::take(&mut self.imports);
        let saved_scope = std::mem::take(&mut self.scope);
        let saved_vars = std::mem::take(&mut self.vars);

        self.imports.push(items);
        syn::visit::visit_item_mod(self, node);

        self.vars = saved_vars;
        self.scope = saved_scope;
        self.imports = saved_imports;
        self.module.pop();
    }

    fn visit_item_fn(&mut self, node: &'ast syn::ItemFn) {
        let saved_scope = std::mem::take(&mut self.scope);
        self.lower_fn(&node.sig, None, true, Some(&node.block));
        self.scope = saved_scope;
    }

    fn visit_item_impl(&mut self, node: &'ast syn::ItemImpl) {
        let saved_scope = std::mem::replace(&mut self.scope, TypeScope::for_impl(&node.self_ty));
        self.scope.add_generics(&node.generics);
        syn::visit::visit_item_impl(self, node);
        self.scope = saved_scope;
    }

    fn visit_impl_item_fn(&mut self, node: &'ast syn::ImplItemFn) {
        let owner = self.scope.owner_name();
        self.lower_fn(&node.sig, owner, true, Some(&node.block));
    }

    fn visit_item_trait(&mut self, node: &'ast syn::ItemTrait) {
        let saved_scope = std::mem::take(&mut self.scope);
        self.scope.add_generics(&node.generics);
        syn::visit::visit_item_trait(self, node);
        self.scope = saved_scope;
    }

    fn visit_trait_item_fn(&mut self, node: &'ast syn::TraitItemFn) {
        // Trait signatures are checked on each implementation instead.
        self.lower_fn(&node.sig, None, false, node.default.as_ref());
    }

    fn visit_block(&mut self, node: &'ast syn::Block) {
        self.imports.push(node.stmts.iter().filter_map(|stmt| match stmt {
            syn::Stmt::Item(item) => Some(item),
            _ => None,
        }));
        self.with_frame(|this| syn::visit::visit_block(this, node));
        self.imports.pop();
    }

    fn visit_local(&mut self, node: &'ast syn::Local) {
        self.lower_local(node);
    }

    fn visit_expr_assign(&mut self, node: &'ast syn::ExprAssign) {
        self.lower_assign(node);
        syn::visit::visit_expr_assign(self, node);
    }

    fn visit_expr_closure(&mut self, node: &'ast syn::ExprClosure) {
        self.with_frame(|this| {
            for input in &node.inputs {
                let ty = match input {
                    Pat::Type(pt) => Some(this.resolve(&pt.ty)),
                    _ => None,
                };
                this.define_pattern(input, ty);
            }
            this.visit_expr(&node.body);
        });
    }

    fn visit_arm(&mut self, node: &'ast syn::Arm) {
        self.with_frame(|this| {
            this.define_pattern(&node.pat, None);
            syn::visit::visit_arm(this, node);
        });
    }

    fn visit_expr_for_loop(&mut self, node: &'ast syn::ExprForLoop) {
        self.visit_expr(&node.expr);
        self.with_frame(|this| {
            this.define_pattern(&node.pat, None);
            this.visit_block(&node.body);
        });
    }

    fn visit_expr_if(&mut self, node: &'ast syn::ExprIf) {
        self.with_frame(|this| syn::visit::visit_expr_if(this, node));
    }

    fn visit_expr_while(&mut self, node: &'ast syn::ExprWhile) {
        self.with_frame(|this| syn::visit::visit_expr_while(this, node));
    }

    fn visit_expr_let(&mut self, node: &'ast syn::ExprLet) {
        self.visit_expr(&node.expr);
        self.define_pattern(&node.pat, None);
    }
}

fn tuple_of(results: &[ResolvedType]) -> ResolvedType {
    let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
    ResolvedType::data(format!("({})", names.join(", ")))
}

/// Strips wrappers that do not change which call produced a value.
fn peel(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(e) => peel(&e.expr),
        Expr::Group(e) => peel(&e.expr),
        Expr::Try(e) => peel(&e.expr),
        Expr::Await(e) => peel(&e.base),
        Expr::MethodCall(m) if m.method == "unwrap" || m.method == "expect" => peel(&m.receiver),
        other => other,
    }
}

fn peel_parens(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(e) => peel_parens(&e.expr),
        Expr::Group(e) => peel_parens(&e.expr),
        other => other,
    }
}

/// Splits a tuple expression into its elements; anything else is one value.
fn split_values(expr: &Expr) -> Vec<&Expr> {
    match peel_parens(expr) {
        Expr::Tuple(tuple) => tuple.elems.iter().collect(),
        other => vec![other],
    }
}

/// Left-hand slots of a `let` pattern: identifier name and declared type,
/// or `None` for a non-identifier slot.
fn declared_slots(
    pat: &Pat,
    resolve: impl Fn(&Type) -> ResolvedType,
) -> Vec<Option<(String, Option<ResolvedType>)>> {
    match pat {
        Pat::Type(pt) => match (&*pt.pat, &*pt.ty) {
            (Pat::Tuple(tuple), Type::Tuple(types)) if tuple.elems.len() == types.elems.len() => {
                tuple
                    .elems
                    .iter()
                    .zip(&types.elems)
                    .map(|(p, t)| ident_of(p).map(|name| (name, Some(resolve(t)))))
                    .collect()
            }
            (Pat::Tuple(tuple), _) => tuple
                .elems
                .iter()
                .map(|p| ident_of(p).map(|name| (name, None)))
                .collect(),
            (inner, ty) => vec![ident_of(inner).map(|name| (name, Some(resolve(ty))))],
        },
        Pat::Tuple(tuple) => tuple
            .elems
            .iter()
            .map(|p| ident_of(p).map(|name| (name, None)))
            .collect(),
        other => vec![ident_of(other).map(|name| (name, None))],
    }
}

fn ident_of(pat: &Pat) -> Option<String> {
    match pat {
        Pat::Ident(ident) if ident.subpat.is_none() => Some(ident.ident.to_string()),
        Pat::Paren(p) => ident_of(&p.pat),
        _ => None,
    }
}

/// Every identifier a pattern binds.
fn pattern_names(pat: &Pat, out: &mut Vec<String>) {
    match pat {
        Pat::Ident(ident) => {
            out.push(ident.ident.to_string());
            if let Some((_, sub)) = &ident.subpat {
                pattern_names(sub, out);
            }
        }
        Pat::Tuple(p) => p.elems.iter().for_each(|e| pattern_names(e, out)),
        Pat::TupleStruct(p) => p.elems.iter().for_each(|e| pattern_names(e, out)),
        Pat::Struct(p) => p.fields.iter().for_each(|f| pattern_names(&f.pat, out)),
        Pat::Slice(p) => p.elems.iter().for_each(|e| pattern_names(e, out)),
        Pat::Or(p) => p.cases.iter().for_each(|c| pattern_names(c, out)),
        Pat::Reference(p) => pattern_names(&p.pat, out),
        Pat::Paren(p) => pattern_names(&p.pat, out),
        Pat::Type(p) => pattern_names(&p.pat, out),
        _ => {}
    }
}
