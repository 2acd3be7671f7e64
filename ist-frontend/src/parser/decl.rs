use tracing::trace;

use crate::TokenKind;

use super::{
    ast::{Decl, LocatedString, TypeDecl, VarDecl},
    errors::{Expectations, ParseError},
    Parser,
};

impl Parser<'_> {
    /// Parses one top level declaration, trying each kind in order
    pub(crate) fn required_decl(&mut self) -> Result<Decl, ParseError> {
        trace!(index = self.index, "declaration");

        if let Some(decl) = self.optional_type_decl() {
            return decl.map(Decl::Type);
        }

        if let Some(decl) = self.optional_var_decl() {
            return decl.map(Decl::Var);
        }

        Err(self.unexpected(Expectations::Production("a declaration")))
    }

    /// Named type declarations have no grammar yet, so this never matches
    pub(crate) fn optional_type_decl(&mut self) -> Option<Result<TypeDecl, ParseError>> {
        trace!(index = self.index, "type declaration");
        None
    }

    pub(crate) fn optional_var_decl(&mut self) -> Option<Result<VarDecl, ParseError>> {
        if self.next_is(0, TokenKind::Identifier, None) {
            Some(self.required_var_decl())
        } else {
            None
        }
    }

    /// `name type [= expr]`
    pub(crate) fn required_var_decl(&mut self) -> Result<VarDecl, ParseError> {
        trace!(index = self.index, "variable declaration");

        let name = LocatedString::from(self.expect(TokenKind::Identifier)?);
        let ty = self
            .optional_type_reference()
            .ok_or_else(|| self.unexpected(Expectations::Production("a type")))?;

        let value = if self.next_is(0, TokenKind::Operator, Some("=")) {
            self.expect_text(TokenKind::Operator, "=")?;
            Some(self.required_expr()?)
        } else {
            None
        };

        Ok(VarDecl::new(name, Some(ty), value))
    }
}
