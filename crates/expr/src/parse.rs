use crate::{
    BinaryOp, Constant, Expr, Func, ParseError, Variable,
    token::{Token, TokenKind, tokenize},
};

/// Maximum nesting depth accepted by the parser.
pub(crate) const MAX_DEPTH: usize = 128;

/// Parses `src` into an expression tree over the `allowed` variables.
///
/// Grammar:
///
/// ```text
/// expr    := term (('+' | '-') term)*
/// term    := unary (('*' | '/') unary)*
/// unary   := ('+' | '-') unary | power
/// power   := primary ('^' unary)?
/// primary := NUMBER | IDENT | IDENT '(' expr ')' | '(' expr ')'
/// ```
pub(crate) fn parse(src: &str, allowed: &[Variable]) -> Result<Expr, ParseError> {
    let tokens = tokenize(src)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        allowed,
    };

    let expr = parser.expr()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(ParseError::Unexpected {
            found: token.kind.to_string(),
            expected: "an operator or end of expression",
            pos: token.pos,
        }),
    }
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    allowed: &'a [Variable],
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn next(&mut self, expected: &'static str) -> Result<Token, ParseError> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(ParseError::UnexpectedEnd { expected })?;
        self.pos += 1;
        Ok(token)
    }

    fn expect(&mut self, kind: &TokenKind, expected: &'static str) -> Result<(), ParseError> {
        let token = self.next(expected)?;
        if token.kind == *kind {
            Ok(())
        } else {
            Err(ParseError::Unexpected {
                found: token.kind.to_string(),
                expected,
                pos: token.pos,
            })
        }
    }

    fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError::TooDeep { max: MAX_DEPTH });
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    fn expr(&mut self) -> Result<Expr, ParseError> {
        self.descend()?;
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => BinaryOp::Add,
                Some(TokenKind::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        self.ascend();
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => BinaryOp::Mul,
                Some(TokenKind::Slash) => BinaryOp::Div,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        self.descend()?;
        let expr = match self.peek_kind() {
            Some(TokenKind::Minus) => {
                self.pos += 1;
                Expr::neg(self.unary()?)
            }
            Some(TokenKind::Plus) => {
                self.pos += 1;
                self.unary()?
            }
            _ => self.power()?,
        };
        self.ascend();
        Ok(expr)
    }

    fn power(&mut self) -> Result<Expr, ParseError> {
        let base = self.primary()?;
        if matches!(self.peek_kind(), Some(TokenKind::Caret)) {
            self.pos += 1;
            let exponent = self.unary()?;
            return Ok(Expr::binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.next("a number, variable, function, or '('")?;
        match token.kind {
            TokenKind::Number(v) => Ok(Expr::Num(v)),
            TokenKind::LParen => {
                let inner = self.expr()?;
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::Ident(name) => self.ident(name, token.pos),
            other => Err(ParseError::Unexpected {
                found: other.to_string(),
                expected: "a number, variable, function, or '('",
                pos: token.pos,
            }),
        }
    }

    fn ident(&mut self, name: String, pos: usize) -> Result<Expr, ParseError> {
        if matches!(self.peek_kind(), Some(TokenKind::LParen)) {
            let func = Func::from_name(&name).ok_or(ParseError::UnknownFunction { name })?;
            self.pos += 1;
            let arg = self.expr()?;
            self.expect(&TokenKind::RParen, "')'")?;
            return Ok(Expr::call(func, arg));
        }

        if let Some(var) = Variable::from_name(&name).filter(|v| self.allowed.contains(v)) {
            return Ok(Expr::Var(var));
        }

        if let Some(constant) = Constant::from_name(&name) {
            return Ok(Expr::Const(constant));
        }

        if Func::from_name(&name).is_some() {
            return Err(ParseError::Unexpected {
                found: format!("function '{name}' without an argument"),
                expected: "'('",
                pos,
            });
        }

        let allowed = self
            .allowed
            .iter()
            .map(|v| v.name())
            .collect::<Vec<_>>()
            .join(", ");
        Err(ParseError::UnknownVariable { name, allowed })
    }
}
