//! Language-neutral program model consumed by the rules.
//!
//! A front end lowers one source file into a [`Unit`]: the function-like
//! [`Declaration`]s it defines and the [`BindingSite`]s found in their
//! bodies, with every type already resolved to a [`ResolvedType`]. Rules only
//! read this model; nothing in it is mutated after lowering.

use crate::classify::TypeShape;
use std::path::PathBuf;

/// A position inside a unit's file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl Position {
    /// Creates a position.
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Creates a position from a `proc-macro2` span start.
    #[must_use]
    pub fn from_span(span: proc_macro2::Span) -> Self {
        let start = span.start();
        Self {
            line: start.line,
            column: start.column + 1,
        }
    }
}

/// Structural shape of a resolved type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// A pure set of method signatures with no storage of its own.
    CapabilitySet,
    /// A type with its own representation (record, enum, primitive, ...).
    Data,
    /// The front end could not resolve the type.
    Unresolved,
}

/// A type as seen by the rules: a display name and its structural shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedType {
    /// Name used in messages (e.g. `Service`, `Box<dyn Store>`).
    pub name: String,
    /// Structural shape.
    pub shape: Shape,
}

impl ResolvedType {
    /// Creates a resolved type.
    #[must_use]
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }

    /// Shorthand for a capability-set type.
    #[must_use]
    pub fn capability_set(name: impl Into<String>) -> Self {
        Self::new(name, Shape::CapabilitySet)
    }

    /// Shorthand for a data type.
    #[must_use]
    pub fn data(name: impl Into<String>) -> Self {
        Self::new(name, Shape::Data)
    }

    /// Shorthand for a type the front end could not resolve.
    #[must_use]
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self::new(name, Shape::Unresolved)
    }
}

impl TypeShape for ResolvedType {
    fn is_capability_set(&self) -> bool {
        self.shape == Shape::CapabilitySet
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

/// A named function-like declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Identifier of the function.
    pub name: String,
    /// Position of the identifier.
    pub position: Position,
    /// Self type of the enclosing `impl`, for associated functions.
    pub owner: Option<String>,
    /// Module the declaration lives in, from the crate root (empty for the root).
    pub module: Vec<String>,
    /// Declared result types, in order.
    pub results: Vec<ResolvedType>,
}

impl Declaration {
    /// Creates a free-standing declaration.
    #[must_use]
    pub fn new(name: impl Into<String>, position: Position, results: Vec<ResolvedType>) -> Self {
        Self {
            name: name.into(),
            position,
            owner: None,
            module: Vec::new(),
            results,
        }
    }

    /// Sets the owning type.
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Sets the enclosing module.
    #[must_use]
    pub fn with_module(mut self, module: Vec<String>) -> Self {
        self.module = module;
        self
    }

    /// First declared result, if any.
    #[must_use]
    pub fn first_result(&self) -> Option<&ResolvedType> {
        self.results.first()
    }
}

/// A call expression on the right-hand side of a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Callee path as written (e.g. `NewService`, `Service::NewService`).
    pub callee_path: String,
    /// Position of the call.
    pub position: Position,
    /// The in-program declaration the call resolves to, if any.
    pub callee: Option<Declaration>,
}

/// Left-hand slot of a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A plain identifier with its declared or inferred type.
    Ident {
        /// Identifier name.
        name: String,
        /// Declared or inferred type.
        ty: ResolvedType,
    },
    /// Anything else: wildcards, fields, indexes, nested patterns.
    Other,
}

/// Right-hand value of a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A function call.
    Call(CallSite),
    /// Any other expression.
    Other,
}

/// An assignment or `let` binding.
///
/// Target `i` binds the result of value `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingSite {
    /// Position of the binding.
    pub position: Position,
    /// Left-hand slots.
    pub targets: Vec<Target>,
    /// Right-hand expressions.
    pub values: Vec<Value>,
}

/// One lowered source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Unit {
    /// File path relative to the analysis root.
    pub path: PathBuf,
    /// Function-like declarations, in source order.
    pub declarations: Vec<Declaration>,
    /// Binding sites, in source order.
    pub bindings: Vec<BindingSite>,
}

impl Unit {
    /// Creates an empty unit for the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}
