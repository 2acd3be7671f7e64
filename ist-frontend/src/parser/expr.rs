//! Expressions.
//!
//! The precedence tiers are `expr → postfix → primary → literal`. Only numeric literals exist so
//! far, so each tier hands straight down to the next.
use tracing::trace;

use crate::{Spanned, TokenKind};

use super::{
    ast::{Expr, NumberLit},
    errors::{Expectations, ParseError},
    number, Parser,
};

impl Parser<'_> {
    pub(crate) fn required_expr(&mut self) -> Result<Expr, ParseError> {
        trace!(index = self.index, "expression");
        self.required_postfix_expr()
    }

    pub(crate) fn required_postfix_expr(&mut self) -> Result<Expr, ParseError> {
        self.required_primary_expr()
    }

    pub(crate) fn required_primary_expr(&mut self) -> Result<Expr, ParseError> {
        self.required_literal_expr()
    }

    pub(crate) fn required_literal_expr(&mut self) -> Result<Expr, ParseError> {
        if self.next_is(0, TokenKind::Number, None) {
            self.required_number().map(Expr::Number)
        } else {
            Err(self.unexpected(Expectations::Production("an expression")))
        }
    }

    pub(crate) fn required_number(&mut self) -> Result<NumberLit, ParseError> {
        let token = self.expect(TokenKind::Number)?;

        let value = number::interpret(token.text()).map_err(|error| ParseError::MalformedNumber {
            token: token.clone(),
            error,
        })?;

        trace!(text = token.text(), ?value, "number");

        Ok(NumberLit::new(token.span().clone(), value))
    }
}
