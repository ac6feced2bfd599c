use crate::error::{Error, ParseError};
use crate::expr::{Expr, ExprIdGen};
use crate::object::Object;
use crate::stmt::{ClassAttributes, FunModifier, FunStmt, Stmt, VarModifier, VarStmt};
use crate::token::{Token, Type};

type ParseResult<T> = Result<T, ParseError>;

/// Returns if the next token is any of the given types, consuming it if so.
macro_rules! matches {
    ( $self:ident, $( $type:expr ),+ ) => {
        {
            if $( $self.check($type) ) ||* {
                $self.advance();
                true
            } else {
                false
            }
        }
    }
}

/// Recursive-descent parser.
///
/// - program     -> declaration* EOF ;
/// - declaration -> classDecl | funDecl("function") | varDecl | statement ;
/// - classDecl   -> "class" IDENT ( "<" IDENT )? "{" classMember* "}" ;
/// - classMember -> ( "static" | "getter" | "setter" )? ( varDecl | funDecl("method") ) ;
/// - funDecl(k)  -> IDENT "(" params? ")" block ;
/// - varDecl     -> "static"? IDENT ( "=" expression )? ";" ;
/// - statement   -> forStmt | ifStmt | printStmt | returnStmt | whileStmt | block | exprStmt ;
/// - forStmt     -> "for" "(" ( varDecl | exprStmt | ";" ) expression? ";" expression? ")" statement ;
/// - assignment  -> ( call "." )? IDENT ( "=" | "+=" | "-=" | "*=" | "/=" ) assignment | logicOr ;
/// - logicOr     -> logicAnd ( "or" logicAnd )* ;
/// - logicAnd    -> equality ( "and" equality )* ;
/// - equality    -> comparison ( ( "!=" | "==" ) comparison )* ;
/// - comparison  -> term ( ( ">" | ">=" | "<" | "<=" ) term )* ;
/// - term        -> factor ( ( "+" | "-" ) factor )* ;
/// - factor      -> exp ( ( "*" | "/" ) exp )* ;
/// - exp         -> unary ( "**" unary )* ;
/// - unary       -> ( "!" | "-" ) unary | postfix ;
/// - postfix     -> primary ( "++" | "--" )? ;
/// - call        -> primary ( "(" arguments? ")" | "." IDENT )* ;
/// - primary     -> NUMBER | STRING | "false" | "true" | "nil" | "this" | "(" expression ")"
///                   | IDENT | "++" IDENT | "--" IDENT | "super" "." IDENT ;
pub struct Parser {
    tokens: Vec<Token>,
    current: u32,
    ids: ExprIdGen,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, current: 0, ids: ExprIdGen::new() }
    }

    pub fn parse(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        statements
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current as usize]
    }

    fn previous(&self) -> &Token {
        &self.tokens[(self.current - 1) as usize]
    }

    fn is_at_end(&self) -> bool {
        self.peek().r#type == Type::EOF
    }

    fn check(&self, r#type: Type) -> bool {
        !self.is_at_end() && self.peek().r#type == r#type
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn consume(&mut self, r#type: Type, message: &str) -> ParseResult<&Token> {
        if self.check(r#type) {
            return Ok(self.advance());
        }

        Err(ParseError {
            token: self.peek().clone(),
            message: message.to_string(),
        })
    }

    // --- declarations -----------------------------------------------------

    fn declaration(&mut self) -> Option<Stmt> {
        let statement = if matches!(self, Type::Class) {
            self.class_declaration()
        } else if matches!(self, Type::Fun) {
            self.function_declaration(FunModifier::None)
        } else if matches!(self, Type::Var) {
            self.var_declaration(VarModifier::None)
        } else {
            self.statement()
        };

        match statement {
            Ok(stmt) => Some(stmt),
            Err(error) => {
                error.throw();
                self.synchronize();
                None
            }
        }
    }

    fn class_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(Type::Identifier, "Expect class name.")?.clone();

        let superclass = if matches!(self, Type::Less) {
            self.consume(Type::Identifier, "Expect superclass name.")?;
            Some(Expr::Variable(self.ids.next(), self.previous().clone()))
        } else {
            None
        };

        self.consume(Type::LeftBrace, "Expect '{' before class body.")?;

        let mut instance = ClassAttributes::default();
        let mut statics = ClassAttributes::default();

        while !self.check(Type::RightBrace) && !self.is_at_end() {
            let is_static = matches!(self, Type::Static);
            let modifier = if is_static {
                FunModifier::Static
            } else if matches!(self, Type::Getter) {
                FunModifier::Getter
            } else if matches!(self, Type::Setter) {
                FunModifier::Setter
            } else {
                FunModifier::None
            };

            // Lookahead: an identifier followed by `;`, `=`, or EOF before `{` is a
            // variable; otherwise it's a method. This mirrors how the member list is
            // routed into instance vs. static attribute buckets.
            let is_variable = {
                let checkpoint = self.current;
                let mut is_var = false;
                if self.check(Type::Identifier) {
                    self.advance();
                    is_var = self.check(Type::Semicolon) || self.check(Type::Equal);
                }
                self.current = checkpoint;
                is_var
            };

            if is_variable {
                let var_modifier = if is_static { VarModifier::Static } else { VarModifier::None };
                let var_stmt = self.var_declaration_inner(var_modifier)?;
                if is_static {
                    statics.variables.push(var_stmt);
                } else {
                    instance.variables.push(var_stmt);
                }
            } else {
                let fun_stmt = self.function_declaration_inner("method", modifier)?;
                if modifier == FunModifier::Static {
                    statics.methods.push(fun_stmt);
                } else {
                    instance.methods.push(fun_stmt);
                }
            }
        }

        self.consume(Type::RightBrace, "Expect '}' after class body.")?;

        Ok(Stmt::Class { name, superclass, instance, statics })
    }

    fn var_declaration(&mut self, modifier: VarModifier) -> ParseResult<Stmt> {
        Ok(Stmt::Var(self.var_declaration_inner(modifier)?))
    }

    fn var_declaration_inner(&mut self, modifier: VarModifier) -> ParseResult<VarStmt> {
        let name = self.consume(Type::Identifier, "Expect variable name.")?.clone();

        let mut initializer: Option<Expr> = None;
        if matches!(self, Type::Equal) {
            initializer = Some(self.expression()?);
        }

        self.consume(Type::Semicolon, "Expect ';' after variable declaration.")?;
        Ok(VarStmt { name, initializer, modifier })
    }

    fn while_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(Type::RightParen, "Expect ')' after condition.")?;
        let body = self.statement()?;

        Ok(Stmt::While(condition, Box::new(body)))
    }

    fn expression(&mut self) -> ParseResult<Expr> {
        self.assignment()
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        if matches!(self, Type::For) {
            return self.for_statement();
        }
        if matches!(self, Type::If) {
            return self.if_statement();
        }
        if matches!(self, Type::Print) {
            return self.print_statement();
        }
        if matches!(self, Type::Return) {
            return self.return_statement();
        }
        if matches!(self, Type::While) {
            return self.while_statement();
        }
        if matches!(self, Type::LeftBrace) {
            return Ok(Stmt::Block(self.block()?));
        }

        self.expression_statement()
    }

    fn for_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' after 'for'.")?;

        let initializer: Option<Stmt> = if matches!(self, Type::Semicolon) {
            None
        } else if matches!(self, Type::Var) {
            Some(self.var_declaration(VarModifier::None)?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = if !self.check(Type::Semicolon) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(Type::Semicolon, "Expect ';' after loop condition.")?;

        let increment = if !self.check(Type::RightParen) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(Type::RightParen, "Expect ')' after loop clauses.")?;

        let mut body = self.statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block(vec![body, Stmt::Expression(increment)]);
        }

        body = Stmt::While(
            condition.unwrap_or_else(|| Expr::Literal(self.ids.next(), Object::Bool(true))),
            Box::new(body),
        );

        if let Some(initializer) = initializer {
            body = Stmt::Block(vec![initializer, body]);
        }

        Ok(body)
    }

    fn if_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(Type::RightParen, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if matches!(self, Type::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If(condition, then_branch, else_branch))
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(Type::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print(expr))
    }

    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().to_owned();

        let value = if !self.check(Type::Semicolon) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(Type::Semicolon, "Expect ';' after return value.")?;
        Ok(Stmt::Return(keyword, value))
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(Type::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression(expr))
    }

    fn function_declaration(&mut self, modifier: FunModifier) -> ParseResult<Stmt> {
        Ok(Stmt::Fun(self.function_declaration_inner("function", modifier)?))
    }

    fn function_declaration_inner(&mut self, kind: &str, modifier: FunModifier) -> ParseResult<FunStmt> {
        let name = self.consume(Type::Identifier, &format!("Expect {kind} name."))?.to_owned();

        if modifier == FunModifier::Static && name.lexeme == "init" {
            return Err(ParseError {
                token: name,
                message: "Constructors cannot be static.".to_string(),
            });
        }

        self.consume(Type::LeftParen, &format!("Expect '(' after {kind} name."))?;

        let mut params = vec![];

        if !self.check(Type::RightParen) {
            loop {
                if params.len() >= 255 {
                    return Err(ParseError {
                        token: self.peek().to_owned(),
                        message: "Cannot have more than 255 parameters.".to_string(),
                    });
                }

                params.push(self.consume(Type::Identifier, "Expect parameter name.")?.to_owned());

                if !matches!(self, Type::Comma) {
                    break;
                }
            }
        }

        self.consume(Type::RightParen, "Expect ')' after parameters.")?;

        if modifier == FunModifier::Getter && !params.is_empty() {
            return Err(ParseError {
                token: name,
                message: "A getter method should have no parameters.".to_string(),
            });
        }
        if modifier == FunModifier::Setter && params.len() != 1 {
            return Err(ParseError {
                token: name,
                message: "A setter method should have only one parameter.".to_string(),
            });
        }

        self.consume(Type::LeftBrace, &format!("Expect '{{' before {kind} body."))?;

        let body = self.block()?;

        Ok(FunStmt { name, params, body, modifier })
    }

    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.check(Type::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        self.consume(Type::RightBrace, "Expect '}' after block.")?;

        Ok(statements)
    }

    // --- expressions --------------------------------------------------------

    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.or()?;

        let compound_op = if matches!(self, Type::PlusEqual) {
            Some(Type::Plus)
        } else if matches!(self, Type::MinusEqual) {
            Some(Type::Minus)
        } else if matches!(self, Type::StarEqual) {
            Some(Type::Star)
        } else if matches!(self, Type::SlashEqual) {
            Some(Type::Slash)
        } else {
            None
        };

        if let Some(op_type) = compound_op {
            let equals = self.previous().to_owned();
            let rhs = self.assignment()?;
            let op_token = Token::new(op_type, equals.lexeme.clone(), None, equals.location);
            let synthesized = Expr::Binary(self.ids.next(), Box::new(expr.clone()), op_token, Box::new(rhs));
            return self.finish_assignment_target(expr, synthesized, equals, false);
        }

        if matches!(self, Type::Equal) {
            let equals = self.previous().to_owned();
            let value = self.assignment()?;
            return self.finish_assignment_target(expr, value, equals, false);
        }

        Ok(expr)
    }

    fn finish_assignment_target(
        &mut self,
        target: Expr,
        value: Expr,
        equals: Token,
        return_original: bool,
    ) -> ParseResult<Expr> {
        match target {
            Expr::Variable(_, name) => {
                Ok(Expr::Assign(self.ids.next(), name, Box::new(value), return_original))
            }
            Expr::Get(_, object, name) => {
                Ok(Expr::Set(self.ids.next(), object, name, Box::new(value), return_original))
            }
            _ => Err(ParseError {
                token: equals,
                message: "Invalid assignment target.".to_string(),
            }),
        }
    }

    fn or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.and()?;

        while matches!(self, Type::Or) {
            let operator = self.previous().clone();
            let right = self.and()?;
            expr = Expr::Logical(self.ids.next(), Box::new(expr), operator, Box::new(right));
        }

        Ok(expr)
    }

    fn and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.equality()?;

        while matches!(self, Type::And) {
            let operator = self.previous().clone();
            let right = self.equality()?;
            expr = Expr::Logical(self.ids.next(), Box::new(expr), operator, Box::new(right));
        }

        Ok(expr)
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.comparison()?;

        while matches!(self, Type::BangEqual, Type::EqualEqual) {
            let operator = self.previous().clone();
            let right = self.comparison()?;
            expr = Expr::Binary(self.ids.next(), Box::new(expr), operator, Box::new(right));
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.term()?;

        while matches!(self, Type::Greater, Type::GreaterEqual, Type::Less, Type::LessEqual) {
            let operator = self.previous().clone();
            let right = self.term()?;
            expr = Expr::Binary(self.ids.next(), Box::new(expr), operator, Box::new(right));
        }

        Ok(expr)
    }

    fn term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.factor()?;

        while matches!(self, Type::Minus, Type::Plus) {
            let operator = self.previous().clone();
            let right = self.factor()?;
            expr = Expr::Binary(self.ids.next(), Box::new(expr), operator, Box::new(right));
        }

        Ok(expr)
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.exp()?;

        while matches!(self, Type::Slash, Type::Star) {
            let operator = self.previous().clone();
            let right = self.exp()?;
            expr = Expr::Binary(self.ids.next(), Box::new(expr), operator, Box::new(right));
        }

        Ok(expr)
    }

    fn exp(&mut self) -> ParseResult<Expr> {
        let mut expr = self.unary()?;

        while matches!(self, Type::StarStar) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            expr = Expr::Binary(self.ids.next(), Box::new(expr), operator, Box::new(right));
        }

        Ok(expr)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        if matches!(self, Type::Bang, Type::Minus) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            return Ok(Expr::Unary(self.ids.next(), operator, Box::new(right)));
        }

        if matches!(self, Type::PlusPlus, Type::MinusMinus) {
            let operator = self.previous().clone();
            let operand = self.unary()?;
            return self.unary_convert(operand, operator, false);
        }

        self.postfix()
    }

    fn postfix(&mut self) -> ParseResult<Expr> {
        let expr = self.call()?;

        if matches!(self, Type::PlusPlus, Type::MinusMinus) {
            let operator = self.previous().clone();
            return self.unary_convert(expr, operator, true);
        }

        Ok(expr)
    }

    /// Desugars `++x`/`--x`/`x++`/`x--` into `x = x ± 1`, returning the pre- or
    /// post-mutation value according to `return_original`.
    fn unary_convert(&mut self, operand: Expr, operator: Token, return_original: bool) -> ParseResult<Expr> {
        let op_type = if operator.r#type == Type::PlusPlus { Type::Plus } else { Type::Minus };

        let one = Expr::Literal(self.ids.next(), Object::Number(1.0));
        let op_token = Token::new(op_type, operator.lexeme.clone(), None, operator.location);
        let synthesized = Expr::Binary(self.ids.next(), Box::new(operand.clone()), op_token, Box::new(one));

        let operator_for_error = operator.clone();
        self.finish_assignment_target(operand, synthesized, operator, return_original)
            .map_err(move |_| ParseError {
                token: operator_for_error.clone(),
                message: format!(
                    "Expect variable {} '{}'.",
                    if return_original { "before" } else { "after" },
                    operator_for_error.lexeme
                ),
            })
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = vec![];

        if !self.check(Type::RightParen) {
            loop {
                if arguments.len() >= 255 {
                    ParseError {
                        token: self.peek().to_owned(),
                        message: "Cannot have more than 255 arguments.".to_string(),
                    }
                    .throw();
                }

                arguments.push(self.expression()?);

                if !matches!(self, Type::Comma) {
                    break;
                }
            }
        }

        let paren = self.consume(Type::RightParen, "Expect ')' after arguments.")?.to_owned();

        Ok(Expr::Call(self.ids.next(), Box::new(callee), paren, arguments))
    }

    fn call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;

        loop {
            if matches!(self, Type::LeftParen) {
                expr = self.finish_call(expr)?;
            } else if matches!(self, Type::Dot) {
                let name = self.consume(Type::Identifier, "Expected property name after '.'.")?.clone();
                expr = Expr::Get(self.ids.next(), Box::new(expr), name);
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        if matches!(self, Type::False) {
            return Ok(Expr::Literal(self.ids.next(), Object::Bool(false)));
        }
        if matches!(self, Type::True) {
            return Ok(Expr::Literal(self.ids.next(), Object::Bool(true)));
        }
        if matches!(self, Type::Nil) {
            return Ok(Expr::Literal(self.ids.next(), Object::Nil));
        }

        if matches!(self, Type::Number, Type::String) {
            let literal = self.previous().clone().literal.expect("number or string to have a literal value");
            let value = match literal {
                crate::literal::Literal::Number(n) => Object::Number(n),
                crate::literal::Literal::String(s) => Object::String(s),
            };
            return Ok(Expr::Literal(self.ids.next(), value));
        }

        if matches!(self, Type::Super) {
            let keyword = self.previous().clone();
            self.consume(Type::Dot, "Expect '.' after 'super'.")?;
            let method = self.consume(Type::Identifier, "Expect superclass method name.")?.clone();
            return Ok(Expr::Super(self.ids.next(), keyword, method));
        }

        if matches!(self, Type::This) {
            return Ok(Expr::This(self.ids.next(), self.previous().clone()));
        }

        if matches!(self, Type::Identifier) {
            return Ok(Expr::Variable(self.ids.next(), self.previous().clone()));
        }

        if matches!(self, Type::LeftParen) {
            let expr = self.expression()?;
            self.consume(Type::RightParen, "Expected ')' after expression.")?;
            return Ok(Expr::Grouping(self.ids.next(), Box::new(expr)));
        }

        Err(ParseError {
            token: self.peek().clone(),
            message: "Expect expression.".to_string(),
        })
    }

    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().r#type == Type::Semicolon {
                return;
            }

            match self.peek().r#type {
                Type::Class | Type::Fun | Type::Var | Type::For | Type::If | Type::While
                | Type::Print | Type::Return => return,
                _ => {
                    self.advance();
                }
            };
        }
    }
}
