//! How a type is laid out, as far as JSON conversion and call decoding care.
//!
//! Works over any [`TypeResolver`], so the same checks apply to portable registries of modern
//! runtimes and to name-based registries of historic ones.

use scale_type_resolver::{
    FieldIter, PathIter, Primitive, ResolvedTypeVisitor, TypeResolver, UnhandledKind, VariantIter,
};
use std::marker::PhantomData;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Shape<Id> {
    Composite { path: String },
    Variant { path: String },
    Sequence { element: Id },
    Array { element: Id },
    Primitive(Primitive),
    Other,
}

impl<Id> Shape<Id> {
    fn last_segment(&self) -> Option<&str> {
        match self {
            Shape::Composite { path } | Shape::Variant { path } => path.rsplit("::").next(),
            _ => None,
        }
    }

    pub(crate) fn is_account_id(&self) -> bool {
        matches!(self, Shape::Composite { .. }) && self.last_segment() == Some("AccountId32")
    }

    pub(crate) fn is_option(&self) -> bool {
        matches!(self, Shape::Variant { .. }) && self.last_segment() == Some("Option")
    }

    pub(crate) fn is_composite(&self) -> bool {
        matches!(self, Shape::Composite { .. })
    }

    /// `WrapperKeepOpaque<T>`: a `T` kept as its length-prefixed encoding
    pub(crate) fn is_opaque_wrapper(&self) -> bool {
        matches!(self, Shape::Composite { .. }) && self.last_segment() == Some("WrapperKeepOpaque")
    }

    pub(crate) fn is_variant_at(&self, expected: &str) -> bool {
        matches!(self, Shape::Variant { path } if path == expected)
    }

    /// Element type of a sequence or array
    pub(crate) fn element(&self) -> Option<&Id> {
        match self {
            Shape::Sequence { element } | Shape::Array { element } => Some(element),
            _ => None,
        }
    }
}

struct ShapeVisitor<Id>(PhantomData<Id>);

impl<'r, Id: scale_type_resolver::TypeId + 'static> ResolvedTypeVisitor<'r> for ShapeVisitor<Id> {
    type TypeId = Id;
    type Value = Shape<Id>;

    fn visit_unhandled(self, _kind: UnhandledKind) -> Self::Value {
        Shape::Other
    }

    fn visit_composite<Path, Fields>(self, path: Path, _fields: Fields) -> Self::Value
    where
        Path: PathIter<'r>,
        Fields: FieldIter<'r, Self::TypeId>,
    {
        Shape::Composite { path: join(path) }
    }

    fn visit_variant<Path, Fields, Var>(self, path: Path, _variants: Var) -> Self::Value
    where
        Path: PathIter<'r>,
        Fields: FieldIter<'r, Self::TypeId>,
        Var: VariantIter<'r, Fields>,
    {
        Shape::Variant { path: join(path) }
    }

    fn visit_sequence<Path>(self, _path: Path, type_id: Self::TypeId) -> Self::Value
    where
        Path: PathIter<'r>,
    {
        Shape::Sequence { element: type_id }
    }

    fn visit_array(self, type_id: Self::TypeId, _len: usize) -> Self::Value {
        Shape::Array { element: type_id }
    }

    fn visit_primitive(self, primitive: Primitive) -> Self::Value {
        Shape::Primitive(primitive)
    }
}

fn join<'r>(path: impl Iterator<Item = &'r str>) -> String {
    path.collect::<Vec<_>>().join("::")
}

/// Unresolvable types are [`Shape::Other`]
pub(crate) fn shape_of<R: TypeResolver>(types: &R, type_id: R::TypeId) -> Shape<R::TypeId> {
    types
        .resolve_type(type_id, ShapeVisitor(PhantomData))
        .unwrap_or(Shape::Other)
}

/// Sequence or array of `u8`
pub(crate) fn is_byte_collection<R: TypeResolver>(types: &R, shape: &Shape<R::TypeId>) -> bool {
    shape.element().is_some_and(|element| {
        matches!(
            shape_of(types, element.clone()),
            Shape::Primitive(Primitive::U8)
        )
    })
}
