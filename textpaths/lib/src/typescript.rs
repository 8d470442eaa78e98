//! Scanners for TypeScript syntax trees produced by `tree-sitter-typescript`.
//!
//! tree-sitter nests a field's declared type under a `type_annotation`
//! node (`: string` becomes `type_annotation(":", predefined_type("string"))`),
//! so the field scanners test the annotation's children instead of a bare
//! type token.

use crate::pattern::{Predicate, Registry, Scanner, has_child, kind_is};

/// An `object_type` node, the inline `{ ... }` shape.
fn object_shape() -> Predicate {
    kind_is("object_type")
}

/// A `type_annotation` whose type is the `string` keyword.
pub fn textual_type() -> Predicate {
    kind_is("type_annotation")
        .and(has_child(kind_is("predefined_type").and(has_child(kind_is("string")))))
}

/// A `type_annotation` whose type is an inline object shape.
pub fn object_annotation() -> Predicate {
    kind_is("type_annotation").and(has_child(object_shape()))
}

/// The TypeScript scanners, in the order they are consulted.
///
/// 1. `interface Foo { ... }`
/// 2. `bar: string`
/// 3. `bar: { ... }`
/// 4. `type Foo = { ... }`
pub fn registry() -> Registry {
    Registry::new()
        .with(Scanner::declaration(
            kind_is("interface_declaration"),
            kind_is("type_identifier"),
        ))
        .with(Scanner::field(
            kind_is("property_signature"),
            kind_is("property_identifier"),
            textual_type(),
        ))
        .with(Scanner::field(
            kind_is("property_signature"),
            kind_is("property_identifier"),
            object_annotation(),
        ))
        .with(Scanner::alias(
            kind_is("type_alias_declaration"),
            kind_is("type_identifier"),
            object_shape(),
        ))
}
