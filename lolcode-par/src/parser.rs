//! Recursive-descent parser over the LOLCODE token stream.
//!
//! The grammar's multi-word keywords are already coalesced into single
//! tokens by the lexer, which removes the need for the grammar's own
//! backtracking between `assign` and the other `stmt` alternatives: an
//! `Identifier` can only begin an assignment or a bare variable access, and
//! one token of lookahead (`R` vs `IS NOW A` vs anything else) tells them
//! apart. Every other statement form starts on a keyword token that
//! belongs to exactly one production, so dispatch is a straight match on
//! the current token's kind rather than try-then-restore.

use lolcode_lex::{Token, TokenKind};
use lolcode_util::{LolError, LolResult, Span};

use crate::ast::{
    ArithOp, BoolBinOp, BoolTernaryOp, CompareOp, Expr, Literal, LoopCond, LoopStep, Program,
    Stmt, TypeKeyword, VarDecl,
};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0 }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn parse_program(&mut self) -> LolResult<Program> {
        self.expect(&TokenKind::Hai, "Expected HAI")?;

        let var_decls = if self.check(&TokenKind::Wazzup) {
            self.advance();
            let decls = self.parse_var_decls()?;
            self.expect(&TokenKind::Buhbye, "Expected BUHBYE")?;
            decls
        } else {
            Vec::new()
        };

        let statements = self.parse_stmts_until(&[TokenKind::KThxBye])?;
        self.expect(&TokenKind::KThxBye, "Expected KTHXBYE")?;

        tracing::debug!(
            var_decls = var_decls.len(),
            statements = statements.len(),
            "parsed program"
        );

        Ok(Program {
            var_decls,
            statements,
        })
    }

    fn parse_var_decls(&mut self) -> LolResult<Vec<VarDecl>> {
        let mut decls = Vec::new();
        while self.check(&TokenKind::IHasA) {
            self.advance();
            let name_tok = self.expect_identifier("Expected Variable Name")?;
            let span = span_of(&name_tok);
            let init = if self.check(&TokenKind::Itz) {
                self.advance();
                Some(self.parse_expr()?)
            } else {
                None
            };
            decls.push(VarDecl {
                name: name_tok.lexeme,
                init,
                span,
            });
        }
        Ok(decls)
    }

    fn parse_stmts_until(&mut self, terminators: &[TokenKind]) -> LolResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        while !self.is_at_end() && !terminators.iter().any(|t| self.check(t)) {
            stmts.push(self.parse_stmt()?);
        }
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> LolResult<Stmt> {
        match &self.current().kind {
            TokenKind::Identifier => self.parse_assign_or_var_access(),
            TokenKind::Visible => self.parse_print(),
            TokenKind::Gimmeh => self.parse_input(),
            TokenKind::Gtfo => {
                let tok = self.advance();
                Ok(Stmt::Break(span_of(&tok)))
            }
            TokenKind::ORly => self.parse_if(),
            TokenKind::Wtf => self.parse_switch(),
            TokenKind::ImInYr => self.parse_loop(),
            TokenKind::HowIzI => self.parse_func_def(),
            _ => Ok(Stmt::Expr(self.parse_expr()?)),
        }
    }

    fn parse_assign_or_var_access(&mut self) -> LolResult<Stmt> {
        let name_tok = self.advance();
        let name = name_tok.lexeme.clone();
        let span = span_of(&name_tok);

        if self.check(&TokenKind::R) {
            self.advance();
            let value = self.parse_expr()?;
            return Ok(Stmt::Assign { name, value, span });
        }

        if self.check(&TokenKind::IsNowA) {
            self.advance();
            let target = self.parse_type_keyword()?;
            let value = Expr::Typecast {
                source: Box::new(Expr::VarAccess {
                    name: name.clone(),
                    span,
                }),
                target,
                span,
            };
            return Ok(Stmt::Assign { name, value, span });
        }

        Ok(Stmt::Expr(Expr::VarAccess { name, span }))
    }

    fn parse_print(&mut self) -> LolResult<Stmt> {
        let start = self.advance(); // VISIBLE
        let span = span_of(&start);
        let mut parts = vec![self.parse_expr()?];

        loop {
            if self.check(&TokenKind::Plus) || self.check(&TokenKind::An) {
                self.advance();
                parts.push(self.parse_expr()?);
                continue;
            }

            if self.is_at_end() {
                break;
            }

            let last_consumed_line = self.tokens[self.pos - 1].line;
            if self.current().line == last_consumed_line {
                return Err(LolError::invalid_syntax(
                    self.current().lexeme.clone(),
                    self.current().line,
                    "Expected Delimiter",
                ));
            }
            break;
        }

        Ok(Stmt::Print { parts, span })
    }

    fn parse_input(&mut self) -> LolResult<Stmt> {
        let start = self.advance(); // GIMMEH
        let span = span_of(&start);
        let name_tok = self.expect_identifier("Expected Variable Name")?;
        Ok(Stmt::Input {
            name: name_tok.lexeme,
            span,
        })
    }

    fn parse_if(&mut self) -> LolResult<Stmt> {
        let start = self.advance(); // O RLY?
        let span = span_of(&start);
        self.expect(&TokenKind::YaRly, "Expected YA RLY")?;

        let then_block =
            self.parse_stmts_until(&[TokenKind::NoWai, TokenKind::Oic])?;

        let else_block = if self.check(&TokenKind::NoWai) {
            self.advance();
            Some(self.parse_stmts_until(&[TokenKind::Oic])?)
        } else {
            None
        };

        self.expect(&TokenKind::Oic, "Expected OIC")?;

        Ok(Stmt::If {
            then_block,
            else_block,
            span,
        })
    }

    fn parse_switch(&mut self) -> LolResult<Stmt> {
        let start = self.advance(); // WTF?
        let span = span_of(&start);

        if !self.check(&TokenKind::Omg) {
            return Err(LolError::invalid_syntax(
                self.current().lexeme.clone(),
                self.current().line,
                "Expected At Least One OMG Case",
            ));
        }

        let mut cases = Vec::new();
        while self.check(&TokenKind::Omg) {
            self.advance();
            let literal = self.parse_case_literal()?;
            let body = self.parse_stmts_until(&[
                TokenKind::Omg,
                TokenKind::OmgWtf,
                TokenKind::Oic,
            ])?;
            cases.push((literal, body));
        }

        self.expect(&TokenKind::OmgWtf, "Expected OMGWTF")?;
        let default = self.parse_stmts_until(&[TokenKind::Oic])?;
        self.expect(&TokenKind::Oic, "Expected OIC")?;

        Ok(Stmt::Switch {
            cases,
            default,
            span,
        })
    }

    fn parse_case_literal(&mut self) -> LolResult<Literal> {
        let tok = self.current().clone();
        let literal = match &tok.kind {
            TokenKind::Integer(v) => Literal::Integer(*v),
            TokenKind::Float(v) => Literal::Float(*v),
            TokenKind::StringLit(s) => Literal::String(s.clone()),
            TokenKind::Boolean(b) => Literal::Boolean(*b),
            TokenKind::Noob => Literal::Noob,
            _ => {
                return Err(LolError::invalid_syntax(
                    tok.lexeme,
                    tok.line,
                    "Expected Literal Case",
                ))
            }
        };
        self.advance();
        Ok(literal)
    }

    fn parse_loop(&mut self) -> LolResult<Stmt> {
        let start = self.advance(); // IM IN YR
        let span = span_of(&start);
        let label = self.expect_identifier("Expected Loop Label")?.lexeme;

        let step = match &self.current().kind {
            TokenKind::Uppin => {
                self.advance();
                LoopStep::Uppin
            }
            TokenKind::Nerfin => {
                self.advance();
                LoopStep::Nerfin
            }
            _ => {
                return Err(LolError::invalid_syntax(
                    self.current().lexeme.clone(),
                    self.current().line,
                    "Expected UPPIN or NERFIN",
                ))
            }
        };

        self.expect(&TokenKind::Yr, "Expected YR")?;
        let var_name = self.expect_identifier("Expected Loop Variable")?.lexeme;

        let condition = match &self.current().kind {
            TokenKind::Til => {
                self.advance();
                Some((LoopCond::Til, self.parse_expr()?))
            }
            TokenKind::Wile => {
                self.advance();
                Some((LoopCond::Wile, self.parse_expr()?))
            }
            _ => None,
        };

        let body = self.parse_stmts_until(&[TokenKind::ImOuttaYr])?;
        self.expect(&TokenKind::ImOuttaYr, "Expected IM OUTTA YR")?;
        let closing_tok = self.expect_identifier("Expected Loop Label")?;
        if closing_tok.lexeme != label {
            return Err(LolError::invalid_syntax(
                closing_tok.lexeme,
                closing_tok.line,
                format!("Mismatched Loop Label, Expected '{}'", label),
            ));
        }

        Ok(Stmt::Loop {
            label,
            var_name,
            step,
            condition,
            body,
            span,
        })
    }

    fn parse_func_def(&mut self) -> LolResult<Stmt> {
        let start = self.advance(); // HOW IZ I
        let span = span_of(&start);
        let name = self.expect_identifier("Expected Function Name")?.lexeme;

        let mut params = Vec::new();
        if self.check(&TokenKind::Yr) {
            self.advance();
            params.push(self.expect_identifier("Expected Parameter Name")?.lexeme);
            while self.check(&TokenKind::AnYr) {
                self.advance();
                params.push(self.expect_identifier("Expected Parameter Name")?.lexeme);
            }
        }

        let body = self.parse_stmts_until(&[TokenKind::FoundYr, TokenKind::IfUSaySo])?;

        let return_expr = if self.check(&TokenKind::FoundYr) {
            self.advance();
            Some(self.parse_expr()?)
        } else {
            None
        };

        self.expect(&TokenKind::IfUSaySo, "Expected IF U SAY SO")?;

        Ok(Stmt::FuncDef {
            name,
            params,
            body,
            return_expr,
            span,
        })
    }

    fn parse_type_keyword(&mut self) -> LolResult<TypeKeyword> {
        let tok = self.current().clone();
        let kw = match &tok.kind {
            TokenKind::TypeNumbr => TypeKeyword::Numbr,
            TokenKind::TypeNumbar => TypeKeyword::Numbar,
            TokenKind::TypeYarn => TypeKeyword::Yarn,
            TokenKind::TypeTroof => TypeKeyword::Troof,
            _ => {
                return Err(LolError::invalid_syntax(
                    tok.lexeme,
                    tok.line,
                    "Expected Type Keyword (NUMBR, NUMBAR, YARN, or TROOF)",
                ))
            }
        };
        self.advance();
        Ok(kw)
    }

    fn parse_expr(&mut self) -> LolResult<Expr> {
        let tok = self.current().clone();
        match &tok.kind {
            TokenKind::Integer(v) => {
                self.advance();
                Ok(Expr::Literal {
                    value: Literal::Integer(*v),
                    span: span_of(&tok),
                })
            }
            TokenKind::Float(v) => {
                self.advance();
                Ok(Expr::Literal {
                    value: Literal::Float(*v),
                    span: span_of(&tok),
                })
            }
            TokenKind::StringLit(s) => {
                self.advance();
                Ok(Expr::Literal {
                    value: Literal::String(s.clone()),
                    span: span_of(&tok),
                })
            }
            TokenKind::Boolean(b) => {
                self.advance();
                Ok(Expr::Literal {
                    value: Literal::Boolean(*b),
                    span: span_of(&tok),
                })
            }
            TokenKind::Noob => {
                self.advance();
                Ok(Expr::Literal {
                    value: Literal::Noob,
                    span: span_of(&tok),
                })
            }
            TokenKind::Identifier => {
                self.advance();
                let span = span_of(&tok);
                Ok(Expr::VarAccess {
                    name: tok.lexeme,
                    span,
                })
            }
            TokenKind::SumOf
            | TokenKind::DiffOf
            | TokenKind::ProduktOf
            | TokenKind::QuoshuntOf
            | TokenKind::ModOf
            | TokenKind::BiggrOf
            | TokenKind::SmallrOf => self.parse_arith_bin(),
            TokenKind::BothOf | TokenKind::EitherOf | TokenKind::WonOf => self.parse_bool_bin(),
            TokenKind::Not => self.parse_bool_unary(),
            TokenKind::AllOf | TokenKind::AnyOf => self.parse_bool_ternary(),
            TokenKind::BothSaem | TokenKind::Diffrint => self.parse_compare(),
            TokenKind::Smoosh => self.parse_str_concat(),
            TokenKind::MaekA => self.parse_typecast(),
            TokenKind::IIz => self.parse_func_call(),
            _ => Err(LolError::invalid_syntax(
                tok.lexeme,
                tok.line,
                "Expected Expression",
            )),
        }
    }

    fn parse_arith_bin(&mut self) -> LolResult<Expr> {
        let start = self.advance();
        let span = span_of(&start);
        let op = match start.kind {
            TokenKind::SumOf => ArithOp::SumOf,
            TokenKind::DiffOf => ArithOp::DiffOf,
            TokenKind::ProduktOf => ArithOp::ProduktOf,
            TokenKind::QuoshuntOf => ArithOp::QuoshuntOf,
            TokenKind::ModOf => ArithOp::ModOf,
            TokenKind::BiggrOf => ArithOp::BiggrOf,
            TokenKind::SmallrOf => ArithOp::SmallrOf,
            _ => unreachable!("dispatched only on arithmetic keywords"),
        };
        let lhs = self.parse_expr()?;
        self.expect(&TokenKind::An, "Expected AN")?;
        let rhs = self.parse_expr()?;
        Ok(Expr::ArithBin {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            span,
        })
    }

    fn parse_bool_bin(&mut self) -> LolResult<Expr> {
        let start = self.advance();
        let span = span_of(&start);
        let op = match start.kind {
            TokenKind::BothOf => BoolBinOp::BothOf,
            TokenKind::EitherOf => BoolBinOp::EitherOf,
            TokenKind::WonOf => BoolBinOp::WonOf,
            _ => unreachable!("dispatched only on boolean binary keywords"),
        };
        let lhs = self.parse_expr()?;
        self.expect(&TokenKind::An, "Expected AN")?;
        let rhs = self.parse_expr()?;
        Ok(Expr::BoolBin {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            span,
        })
    }

    fn parse_bool_unary(&mut self) -> LolResult<Expr> {
        let start = self.advance(); // NOT
        let span = span_of(&start);
        let operand = self.parse_expr()?;
        Ok(Expr::BoolUnary {
            operand: Box::new(operand),
            span,
        })
    }

    fn parse_bool_ternary(&mut self) -> LolResult<Expr> {
        let start = self.advance();
        let span = span_of(&start);
        let op = match start.kind {
            TokenKind::AllOf => BoolTernaryOp::AllOf,
            TokenKind::AnyOf => BoolTernaryOp::AnyOf,
            _ => unreachable!("dispatched only on boolean ternary keywords"),
        };
        let mut operands = vec![self.parse_expr()?];
        while self.check(&TokenKind::An) {
            self.advance();
            operands.push(self.parse_expr()?);
        }
        self.expect(&TokenKind::Mkay, "Expected MKAY")?;
        Ok(Expr::BoolTernary {
            op,
            operands,
            span,
        })
    }

    fn parse_compare(&mut self) -> LolResult<Expr> {
        let start = self.advance();
        let span = span_of(&start);
        let op = match start.kind {
            TokenKind::BothSaem => CompareOp::BothSaem,
            TokenKind::Diffrint => CompareOp::Diffrint,
            _ => unreachable!("dispatched only on comparison keywords"),
        };
        let lhs = self.parse_expr()?;
        self.expect(&TokenKind::An, "Expected AN")?;
        let rhs = self.parse_expr()?;
        Ok(Expr::Compare {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            span,
        })
    }

    fn parse_str_concat(&mut self) -> LolResult<Expr> {
        let start = self.advance(); // SMOOSH
        let span = span_of(&start);
        let mut operands = vec![self.parse_expr()?];
        while self.check(&TokenKind::An) {
            self.advance();
            operands.push(self.parse_expr()?);
        }
        Ok(Expr::StrConcat { operands, span })
    }

    fn parse_typecast(&mut self) -> LolResult<Expr> {
        let start = self.advance(); // MAEK A
        let span = span_of(&start);
        let source = self.parse_expr()?;
        let target = self.parse_type_keyword()?;
        Ok(Expr::Typecast {
            source: Box::new(source),
            target,
            span,
        })
    }

    fn parse_func_call(&mut self) -> LolResult<Expr> {
        let start = self.advance(); // I IZ
        let span = span_of(&start);
        let name = self.expect_identifier("Expected Function Name")?.lexeme;

        let mut args = Vec::new();
        if self.check(&TokenKind::Yr) {
            self.advance();
            args.push(self.parse_expr()?);
            while self.check(&TokenKind::AnYr) {
                self.advance();
                args.push(self.parse_expr()?);
            }
        }

        self.expect(&TokenKind::Mkay, "Expected MKAY")?;
        Ok(Expr::FuncCall { name, args, span })
    }

    // --- token stream primitives ---

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current().kind, TokenKind::Eof)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind)
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if !self.is_at_end() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, kind: &TokenKind, detail: &str) -> LolResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let tok = self.current();
            Err(LolError::invalid_syntax(
                tok.lexeme.clone(),
                tok.line,
                detail,
            ))
        }
    }

    fn expect_identifier(&mut self, detail: &str) -> LolResult<Token> {
        self.expect(&TokenKind::Identifier, detail)
    }
}

fn span_of(token: &Token) -> Span {
    Span::new(token.start, token.end(), token.line, token.column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lolcode_lex::Lexer;

    fn parse(source: &str) -> Program {
        let tokens = Lexer::new(source).tokenize().unwrap();
        Parser::new(tokens).parse_program().unwrap()
    }

    #[test]
    fn parses_minimal_program() {
        let program = parse("HAI\nKTHXBYE");
        assert!(program.var_decls.is_empty());
        assert!(program.statements.is_empty());
    }

    #[test]
    fn parses_var_decls_section() {
        let program = parse("HAI\nWAZZUP\nI HAS A X ITZ 5\nBUHBYE\nKTHXBYE");
        assert_eq!(program.var_decls.len(), 1);
        assert_eq!(program.var_decls[0].name, "X");
        assert!(program.var_decls[0].init.is_some());
    }

    #[test]
    fn parses_arithmetic_and_print() {
        let program = parse("HAI\nSUM OF 3 AN 4\nVISIBLE IT\nKTHXBYE");
        assert_eq!(program.statements.len(), 2);
        match &program.statements[0] {
            Stmt::Expr(Expr::ArithBin { op: ArithOp::SumOf, .. }) => {}
            other => panic!("expected SUM OF arith expr, got {other:?}"),
        }
    }

    #[test]
    fn parses_function_def_and_call() {
        let program = parse(
            "HAI\nHOW IZ I add YR a AN YR b\n  FOUND YR SUM OF a AN b\nIF U SAY SO\nI IZ add YR 2 AN YR 3 MKAY\nKTHXBYE",
        );
        assert_eq!(program.statements.len(), 2);
        match &program.statements[0] {
            Stmt::FuncDef { name, params, .. } => {
                assert_eq!(name, "add");
                assert_eq!(params, &vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("expected FuncDef, got {other:?}"),
        }
    }

    #[test]
    fn mismatched_loop_label_is_invalid_syntax() {
        let tokens = Lexer::new(
            "HAI\nWAZZUP\nI HAS A x ITZ 0\nBUHBYE\nIM IN YR lp UPPIN YR x WILE DIFFRINT x AN 3\nIM OUTTA YR other\nKTHXBYE",
        )
        .tokenize()
        .unwrap();
        let err = Parser::new(tokens).parse_program().unwrap_err();
        assert!(matches!(err, LolError::InvalidSyntax { .. }));
    }

    #[test]
    fn print_requires_a_delimiter_between_operands_on_the_same_line() {
        let tokens = Lexer::new("HAI\nVISIBLE IT IT\nKTHXBYE").tokenize().unwrap();
        let err = Parser::new(tokens).parse_program().unwrap_err();
        assert!(matches!(err, LolError::InvalidSyntax { .. }));
    }

    #[test]
    fn switch_requires_at_least_one_omg_case() {
        let tokens = Lexer::new("HAI\nWTF?\nOMGWTF\nOIC\nKTHXBYE").tokenize().unwrap();
        let err = Parser::new(tokens).parse_program().unwrap_err();
        assert!(matches!(err, LolError::InvalidSyntax { .. }));
    }

    #[test]
    fn span_of_a_non_first_token_slices_back_its_own_lexeme() {
        let source = "HAI\nSUM OF 3 AN 4\nKTHXBYE";
        let program = parse(source);
        match &program.statements[0] {
            Stmt::Expr(Expr::ArithBin { rhs, .. }) => {
                let span = rhs.span();
                assert_eq!(span.slice(source), "4");
            }
            other => panic!("expected SUM OF arith expr, got {other:?}"),
        }
    }

    #[test]
    fn switch_parses_with_the_bare_wtf_spelling_spec_md_uses() {
        let program = parse("HAI\nWTF\nOMG 1\nVISIBLE \"one\"\nOMGWTF\nOIC\nKTHXBYE");
        assert_eq!(program.statements.len(), 1);
        assert!(matches!(program.statements[0], Stmt::Switch { .. }));
    }

    proptest::proptest! {
        /// Re-parsing the same source twice yields the same AST, and the
        /// operand literals survive the round trip through lex and parse
        /// untouched.
        #[test]
        fn sum_of_round_trips_its_operands(a in -1_000i64..1_000, b in -1_000i64..1_000) {
            let source = format!("HAI\nSUM OF {a} AN {b}\nKTHXBYE");
            let first = parse(&source);
            let second = parse(&source);
            proptest::prop_assert_eq!(&first, &second);

            match &first.statements[0] {
                Stmt::Expr(Expr::ArithBin { op: ArithOp::SumOf, lhs, rhs, .. }) => {
                    proptest::prop_assert_eq!(lhs.as_ref(), &Expr::Literal {
                        value: Literal::Integer(a),
                        span: expr_span(lhs),
                    });
                    proptest::prop_assert_eq!(rhs.as_ref(), &Expr::Literal {
                        value: Literal::Integer(b),
                        span: expr_span(rhs),
                    });
                }
                other => panic!("expected SUM OF arith expr, got {other:?}"),
            }
        }
    }

    fn expr_span(expr: &Expr) -> Span {
        match expr {
            Expr::Literal { span, .. } => *span,
            _ => unreachable!(),
        }
    }
}
