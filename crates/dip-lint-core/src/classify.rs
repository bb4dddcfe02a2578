//! Abstract vs concrete type classification.

/// The two facts the classifier needs about a type.
///
/// Any front end can back this with its own type information.
pub trait TypeShape {
    /// Whether the type is a pure capability set: method signatures only,
    /// no storage of its own.
    fn is_capability_set(&self) -> bool;

    /// Name used in diagnostics.
    fn display_name(&self) -> &str;
}

/// Classification of a type for dependency-inversion purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeClass {
    /// Any conforming value can substitute.
    Abstract,
    /// Has its own representation or bound implementation.
    Concrete,
}

impl TypeClass {
    /// Returns true for [`TypeClass::Concrete`].
    #[must_use]
    pub fn is_concrete(self) -> bool {
        self == Self::Concrete
    }
}

/// Classifies a type.
#[must_use]
pub fn classify<T: TypeShape + ?Sized>(ty: &T) -> TypeClass {
    if ty.is_capability_set() {
        TypeClass::Abstract
    } else {
        TypeClass::Concrete
    }
}

/// Classifies an optional type; a missing type is treated as concrete.
#[must_use]
pub fn classify_opt<T: TypeShape + ?Sized>(ty: Option<&T>) -> TypeClass {
    ty.map_or(TypeClass::Concrete, classify)
}
