//! Grammar productions, one module per syntactic area (spec.md §4.4-§4.6,
//! extended per SPEC_FULL.md). Every production follows the same shape:
//! parse and allocate children first, then allocate the parent node and
//! attach them — post-order construction, enforced by
//! [`super::ParserCore::attach_children`] rather than left to convention.

pub(crate) mod annotation;
pub(crate) mod block;
pub(crate) mod compilation_unit;
pub(crate) mod constructor;
pub(crate) mod expression;
pub(crate) mod import;
pub(crate) mod lambda;
pub(crate) mod member;
pub(crate) mod modifiers;
pub(crate) mod module_decl;
pub(crate) mod package;
pub(crate) mod pattern;
pub(crate) mod statement;
pub(crate) mod switch_;
pub(crate) mod ty;
pub(crate) mod type_decl;

pub(crate) use compilation_unit::compilation_unit;
