use tracing::trace;

use crate::TokenKind;

use super::{
    ast::{LocatedString, Name, NamedType, Type, TypeReference},
    Parser,
};

// Types are soft: every production here returns `None` when the next token can't start a type,
// and the caller decides whether one was required.
impl Parser<'_> {
    pub(crate) fn optional_type_reference(&mut self) -> Option<TypeReference> {
        trace!(index = self.index, "type reference");
        self.optional_type().map(TypeReference::new)
    }

    pub(crate) fn optional_type(&mut self) -> Option<Type> {
        self.optional_named_type().map(Type::Named)
    }

    pub(crate) fn optional_named_type(&mut self) -> Option<NamedType> {
        self.optional_name().map(NamedType::new)
    }

    pub(crate) fn optional_name(&mut self) -> Option<Name> {
        if !self.next_is(0, TokenKind::Identifier, None) {
            return None;
        }

        self.next().map(|token| Name::new(LocatedString::from(token)))
    }
}
