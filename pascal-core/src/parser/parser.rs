use log::trace;

use crate::{
    lexer::prelude::{source_chars, LexResult, LexicalError, Lexer, Token, TokenKind},
    utils::prelude::SrcSpan
};
use super::error::{parse_error, ParseError, ParseErrorType};
use super::ast::{Argument, Ast, NodeId, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Deepest allowed nesting of parentheses, signs, blocks and procedures.
    /// Also caps the height of the tree the later passes walk recursively.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}

pub struct Parser<T: Iterator<Item = LexResult>> {
    pub current_token: Token,
    pub next_token: Token,
    pub lex_errors: Vec<LexicalError>,

    ast: Ast,
    tokens: T,
    config: ParserConfig,
    depth: usize,
}

impl<T: Iterator<Item = LexResult>> Parser<T> {
    pub fn new(input: T) -> Self {
        Self::with_config(input, ParserConfig::default())
    }

    pub fn with_config(input: T, config: ParserConfig) -> Self {
        let mut parser = Self {
            current_token: Token::new(TokenKind::Eof, "", 0),
            next_token: Token::new(TokenKind::Eof, "", 0),
            lex_errors: vec![],

            ast: Ast::new(),
            tokens: input,
            config,
            depth: 0,
        };

        parser.step();
        parser.step();

        parser
    }

    pub fn step(&mut self) -> Token {
        let next = match self.tokens.next() {
            Some(Ok(token)) => token,
            Some(Err(err)) => {
                let offset = err.location.start;
                if self.lex_errors.is_empty() {
                    self.lex_errors.push(err);
                }

                Token::new(TokenKind::Eof, "", offset)
            },
            None => Token::new(TokenKind::Eof, "", self.next_token.offset),
        };

        let next = std::mem::replace(&mut self.next_token, next);
        std::mem::replace(&mut self.current_token, next)
    }

    /// Parses a whole program. A lexical error always wins over the syntax
    /// error it caused downstream.
    pub fn parse(mut self) -> Result<Ast, ParseError> {
        let result = self.parse_program();

        if let Some(error) = self.lex_errors.first() {
            return parse_error(ParseErrorType::LexError { error: *error }, error.location);
        }

        let root = result?;
        self.ast.set_root(root)?;

        Ok(self.ast)
    }

    pub fn expect_one(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.current_token.is(kind) {
            return Ok(self.step());
        }

        self.unexpected(vec![kind.as_literal().to_string()])
    }

    pub fn expect_ident(&mut self) -> Result<Token, ParseError> {
        match self.current_token.kind {
            TokenKind::Id => Ok(self.step()),
            TokenKind::Eof => parse_error(ParseErrorType::UnexpectedEof, self.current_token.span()),
            _ => parse_error(ParseErrorType::ExpectedIdent, self.current_token.span()),
        }
    }

    fn unexpected<R>(&self, expected: Vec<String>) -> Result<R, ParseError> {
        let token = self.current_token.clone();
        let span = token.span();

        if token.is(TokenKind::Eof) {
            return parse_error(ParseErrorType::UnexpectedEof, span);
        }

        parse_error(ParseErrorType::UnexpectedToken { token, expected }, span)
    }

    fn add(&mut self, kind: NodeKind, span: SrcSpan) -> Result<NodeId, ParseError> {
        trace!("New {} node at {span}", kind.name());
        let id = self.ast.add(kind, span)?;

        // Left-leaning operator chains grow the tree without recursing here.
        if self.ast.height(id) > self.config.max_depth {
            return self.too_deep(span);
        }

        Ok(id)
    }

    fn too_deep<R>(&self, span: SrcSpan) -> Result<R, ParseError> {
        parse_error(ParseErrorType::NestingTooDeep { limit: self.config.max_depth }, span)
    }

    /// Runs `parse` one nesting level deeper.
    fn nested<R>(&mut self, parse: impl FnOnce(&mut Self) -> Result<R, ParseError>) -> Result<R, ParseError> {
        if self.depth >= self.config.max_depth {
            return self.too_deep(self.current_token.span());
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;

        result
    }

    fn span_of(&self, id: NodeId) -> SrcSpan {
        self.ast.get(id).map(|node| node.span).unwrap_or_default()
    }

    // program -> [PROGRAM variable SEMI] block DOT
    fn parse_program(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current_token.offset;

        let name = if self.current_token.is(TokenKind::Program) {
            self.step();
            let name = self.expect_ident()?;
            self.expect_one(TokenKind::Semi)?;

            Some(name)
        } else {
            None
        };

        let block = self.parse_block()?;
        let dot = self.expect_one(TokenKind::Dot)?;

        if !self.current_token.is(TokenKind::Eof) {
            return self.unexpected(vec![TokenKind::Eof.as_literal().to_string()]);
        }

        self.add(NodeKind::Program { name, block }, SrcSpan::from(start, dot.span().end))
    }

    // block -> declarations compound_statement
    fn parse_block(&mut self) -> Result<NodeId, ParseError> {
        let declarations = self.parse_declarations()?;
        let compound = self.parse_compound()?;

        let span = self.span_of(declarations).merge(self.span_of(compound));
        self.add(NodeKind::Block { declarations, compound }, span)
    }

    // declarations -> [VAR (var_decl SEMI)+] (procedure_decl SEMI)*
    fn parse_declarations(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current_token.offset;
        let mut items = vec![];

        if self.current_token.is(TokenKind::Var) {
            self.step();

            loop {
                items.extend(self.parse_var_decl()?);
                self.expect_one(TokenKind::Semi)?;

                if !self.current_token.is(TokenKind::Id) {
                    break;
                }
            }
        }

        while self.current_token.is(TokenKind::Procedure) {
            items.push(self.nested(Self::parse_procedure_decl)?);
            self.expect_one(TokenKind::Semi)?;
        }

        let end = items.last()
            .map(|item| self.span_of(*item).end)
            .unwrap_or(start);

        self.add(NodeKind::DeclList { items }, SrcSpan::from(start, end))
    }

    // var_decl -> ID (COMMA ID)* COLON TYPE
    // One VarDecl node is produced per declared name.
    fn parse_var_decl(&mut self) -> Result<Vec<NodeId>, ParseError> {
        let mut names = vec![self.expect_ident()?];

        while self.current_token.is(TokenKind::Comma) {
            self.step();
            names.push(self.expect_ident()?);
        }

        self.expect_one(TokenKind::Colon)?;

        let type_spec = match self.current_token.kind {
            TokenKind::Type => self.step(),
            TokenKind::Eof => return parse_error(ParseErrorType::UnexpectedEof, self.current_token.span()),
            _ => return parse_error(ParseErrorType::ExpectedType, self.current_token.span()),
        };

        names.into_iter()
            .map(|name| {
                let span = name.span().merge(type_spec.span());
                let variable = self.add(NodeKind::Variable(name.clone()), name.span())?;

                self.add(NodeKind::VarDecl { name: variable, type_spec: type_spec.clone() }, span)
            })
            .collect()
    }

    // procedure_decl -> PROCEDURE ID [LPAREN [var_decl (SEMI var_decl)*] RPAREN] SEMI block
    fn parse_procedure_decl(&mut self) -> Result<NodeId, ParseError> {
        let start = self.expect_one(TokenKind::Procedure)?.offset;

        let name = match self.current_token.kind {
            TokenKind::Id | TokenKind::CallId => self.step(),
            TokenKind::Eof => return parse_error(ParseErrorType::UnexpectedEof, self.current_token.span()),
            _ => return parse_error(ParseErrorType::ExpectedIdent, self.current_token.span()),
        };

        let params = if self.current_token.is(TokenKind::LParen) {
            let lparen = self.step();
            let mut params = vec![];

            if self.current_token.is(TokenKind::Id) {
                params.extend(self.parse_var_decl()?);

                while self.current_token.is(TokenKind::Semi) {
                    self.step();
                    params.extend(self.parse_var_decl()?);
                }
            }

            let rparen = self.expect_one(TokenKind::RParen)?;
            let span = lparen.span().merge(rparen.span());

            Some(self.add(NodeKind::ParamList { params }, span)?)
        } else {
            None
        };

        self.expect_one(TokenKind::Semi)?;

        let block = self.parse_block()?;
        let span = SrcSpan::from(start, self.span_of(block).end);

        self.add(NodeKind::ProcedureDecl { name, params, block }, span)
    }

    // compound_statement -> BEGIN statement_list END
    fn parse_compound(&mut self) -> Result<NodeId, ParseError> {
        let begin = self.expect_one(TokenKind::Begin)?;
        let children = self.parse_statement_list()?;
        let end = self.expect_one(TokenKind::End)?;

        self.add(NodeKind::Compound { children }, begin.span().merge(end.span()))
    }

    // statement_list -> statement (SEMI statement)*
    fn parse_statement_list(&mut self) -> Result<Vec<NodeId>, ParseError> {
        let mut statements = vec![self.parse_statement()?];

        while self.current_token.is(TokenKind::Semi) {
            self.step();
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    // statement -> compound_statement | assignment | expr | empty
    fn parse_statement(&mut self) -> Result<NodeId, ParseError> {
        match self.current_token.kind {
            TokenKind::Begin => self.nested(Self::parse_compound),
            TokenKind::Id if self.next_token.is(TokenKind::Assign) => self.parse_assignment(),
            TokenKind::Id
            | TokenKind::CallId
            | TokenKind::Integer
            | TokenKind::Float
            | TokenKind::LParen
            | TokenKind::Plus
            | TokenKind::Minus => self.parse_expr(),
            _ => {
                let span = SrcSpan::at(self.current_token.offset);
                self.add(NodeKind::Empty, span)
            }
        }
    }

    // assignment -> variable ASSIGN expr
    fn parse_assignment(&mut self) -> Result<NodeId, ParseError> {
        let name = self.expect_ident()?;
        let target = self.add(NodeKind::Variable(name.clone()), name.span())?;
        let op = self.expect_one(TokenKind::Assign)?;
        let value = self.parse_expr()?;

        let span = name.span().merge(self.span_of(value));
        self.add(NodeKind::Assign { target, op, value }, span)
    }

    pub fn parse_expr(&mut self) -> Result<NodeId, ParseError> {
        self.nested(Self::parse_sum)
    }

    // expr -> term ((PLUS | MINUS) term)*
    fn parse_sum(&mut self) -> Result<NodeId, ParseError> {
        let mut left = self.parse_term()?;

        while self.current_token.kind.is_additive() {
            let op = self.step();
            let right = self.parse_term()?;

            let span = self.span_of(left).merge(self.span_of(right));
            left = self.add(NodeKind::BinaryOp { left, op, right }, span)?;
        }

        Ok(left)
    }

    // term -> factor ((MUL | DIV | INT_DIV) factor)*
    fn parse_term(&mut self) -> Result<NodeId, ParseError> {
        let mut left = self.parse_factor()?;

        while self.current_token.kind.is_multiplicative() {
            let op = self.step();
            let right = self.parse_factor()?;

            let span = self.span_of(left).merge(self.span_of(right));
            left = self.add(NodeKind::BinaryOp { left, op, right }, span)?;
        }

        Ok(left)
    }

    // factor -> (PLUS | MINUS) factor | INTEGER | FLOAT | LPAREN expr RPAREN | variable | call
    fn parse_factor(&mut self) -> Result<NodeId, ParseError> {
        match self.current_token.kind {
            TokenKind::Plus | TokenKind::Minus => {
                let op = self.step();
                let operand = self.nested(Self::parse_factor)?;

                let span = op.span().merge(self.span_of(operand));
                self.add(NodeKind::UnaryOp { op, operand }, span)
            },
            TokenKind::Integer | TokenKind::Float => {
                let token = self.step();
                let span = token.span();
                self.add(NodeKind::Literal(token), span)
            },
            TokenKind::LParen => {
                self.step();
                let inner = self.parse_expr()?;
                self.expect_one(TokenKind::RParen)?;

                Ok(inner)
            },
            TokenKind::Id => {
                let token = self.step();
                let span = token.span();
                self.add(NodeKind::Variable(token), span)
            },
            TokenKind::CallId => self.parse_call(),
            _ => self.unexpected(
                ["INTEGER", "FLOAT", "ID", "CALL_ID", "LPAREN", "PLUS", "MINUS"]
                    .into_iter()
                    .map(String::from)
                    .collect()
            ),
        }
    }

    // call -> CALL_ID LPAREN [argument (COMMA argument)*] RPAREN
    // argument -> [ID ASSIGN] expr
    fn parse_call(&mut self) -> Result<NodeId, ParseError> {
        let name = self.expect_one(TokenKind::CallId)?;
        self.expect_one(TokenKind::LParen)?;

        let mut arguments = vec![];

        if !self.current_token.is(TokenKind::RParen) {
            loop {
                let arg_name = if self.current_token.is(TokenKind::Id) && self.next_token.is(TokenKind::Assign) {
                    let arg_name = self.step();
                    self.step();

                    Some(arg_name)
                } else {
                    None
                };

                let value = self.parse_expr()?;
                arguments.push(Argument { name: arg_name, value });

                if !self.current_token.is(TokenKind::Comma) {
                    break;
                }

                self.step();
            }
        }

        let rparen = self.expect_one(TokenKind::RParen)?;
        let span = name.span().merge(rparen.span());

        self.add(NodeKind::ProcedureCall { name, arguments }, span)
    }
}

pub fn parse_program(src: &str) -> Result<Ast, ParseError> {
    parse_program_with(src, ParserConfig::default())
}

pub fn parse_program_with(src: &str, config: ParserConfig) -> Result<Ast, ParseError> {
    let lexer = Lexer::new(source_chars(src));

    Parser::with_config(lexer, config).parse()
}

pub fn parse_program_from_stream(stream: impl Iterator<Item = char>) -> Result<Ast, ParseError> {
    let lexer = Lexer::new(stream
        .scan(0, |pos, c| {
            *pos += c.len_utf8() as u32;
            Some((*pos - c.len_utf8() as u32, c))
        })
    );

    Parser::new(lexer).parse()
}
