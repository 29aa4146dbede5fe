//! # Jack Compilation Engine
//!
//! A recursive-descent compiler with one token of lookahead that translates
//! a Jack class directly into VM code, without building an intermediate
//! syntax tree. Each `compile_*` method corresponds to one production of
//! the Jack grammar and emits its VM code inline as it recognizes the
//! production, in the same syntax-directed style as the reference
//! compilation engine.

#[cfg(test)]
mod tests;

use crate::error::{CompileError, ErrorKind, Span};
use crate::jack::symbol_table::{Kind, SymbolTable};
use crate::jack::token::{Keyword, Token, TokenKind};
use crate::jack::vm_writer::VmWriter;

pub struct CompiledClass {
    pub vm_code: String,
    pub errors: Vec<CompileError>,
}

#[must_use]
pub fn compile_class(tokens: &[Token], file: &str) -> CompiledClass {
    let mut compiler = Compiler::new(tokens, file);
    let mut errors = Vec::new();

    if let Err(err) = compiler.compile_class() {
        errors.push(err);
    }
    errors.extend(compiler.errors);

    CompiledClass {
        vm_code: compiler.writer.finish(),
        errors,
    }
}

struct Compiler<'a> {
    tokens: &'a [Token],
    pos: usize,
    file: &'a str,
    symbols: SymbolTable,
    writer: VmWriter,
    class_name: String,
    label_id: usize,
    is_void: bool,
    errors: Vec<CompileError>,
}

type CResult<T> = Result<T, CompileError>;

impl<'a> Compiler<'a> {
    fn new(tokens: &'a [Token], file: &'a str) -> Self {
        Self {
            tokens,
            pos: 0,
            file,
            symbols: SymbolTable::new(),
            writer: VmWriter::new(),
            class_name: String::new(),
            label_id: 0,
            is_void: false,
            errors: Vec::new(),
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn unexpected(&self, expected: &str) -> CompileError {
        let tok = self.peek();
        CompileError::new(
            ErrorKind::UnexpectedToken,
            format!("expected {}, found '{}'", expected, tok.lexeme),
            self.file,
            tok.span,
        )
    }

    fn expect_symbol(&mut self, c: char) -> CResult<()> {
        if self.peek().kind.is_symbol(c) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", c)))
        }
    }

    fn expect_keyword(&mut self, k: Keyword) -> CResult<()> {
        if self.peek().kind.is_keyword(k) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(k.as_str()))
        }
    }

    fn expect_identifier(&mut self) -> CResult<String> {
        match self.advance().kind {
            TokenKind::Identifier(name) => Ok(name),
            _ => {
                self.pos -= 1;
                Err(self.unexpected("an identifier"))
            }
        }
    }

    fn next_label_id(&mut self) -> usize {
        let id = self.label_id;
        self.label_id += 1;
        id
    }

    /// Define a symbol, raising `DuplicateDeclaration` if `name` is already
    /// defined in the scope its `kind` belongs to.
    fn define_symbol(&mut self, name: &str, type_name: &str, kind: Kind, span: Span) -> CResult<()> {
        if self.symbols.define(name, type_name, kind) {
            Ok(())
        } else {
            Err(CompileError::new(
                ErrorKind::DuplicateDeclaration,
                format!("'{}' is already defined in this scope", name),
                self.file,
                span,
            ))
        }
    }

    // class: 'class' className '{' classVarDec* subroutineDec* '}'
    fn compile_class(&mut self) -> CResult<()> {
        self.expect_keyword(Keyword::Class)?;
        self.class_name = self.expect_identifier()?;
        self.expect_symbol('{')?;

        while self.starts_class_var_dec() {
            self.compile_class_var_dec()?;
        }
        while self.starts_subroutine_dec() {
            self.compile_subroutine_dec()?;
        }

        self.expect_symbol('}')?;
        Ok(())
    }

    fn starts_class_var_dec(&self) -> bool {
        self.peek().kind.is_keyword(Keyword::Static) || self.peek().kind.is_keyword(Keyword::Field)
    }

    fn starts_subroutine_dec(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Keyword(Keyword::Constructor | Keyword::Function | Keyword::Method)
        )
    }

    // classVarDec: ('static'|'field') type varName (',' varName)* ';'
    fn compile_class_var_dec(&mut self) -> CResult<()> {
        let kind = match self.advance().kind {
            TokenKind::Keyword(Keyword::Static) => Kind::Static,
            TokenKind::Keyword(Keyword::Field) => Kind::Field,
            _ => unreachable!("guarded by starts_class_var_dec"),
        };
        let type_name = self.compile_type()?;
        let span = self.peek().span;
        let name = self.expect_identifier()?;
        self.define_symbol(&name, &type_name, kind, span)?;

        while self.peek().kind.is_symbol(',') {
            self.advance();
            let span = self.peek().span;
            let name = self.expect_identifier()?;
            self.define_symbol(&name, &type_name, kind, span)?;
        }
        self.expect_symbol(';')?;
        Ok(())
    }

    // type: 'int'|'char'|'boolean'|className
    fn compile_type(&mut self) -> CResult<String> {
        match self.advance().kind {
            TokenKind::Keyword(Keyword::Int) => Ok("int".into()),
            TokenKind::Keyword(Keyword::Char) => Ok("char".into()),
            TokenKind::Keyword(Keyword::Boolean) => Ok("boolean".into()),
            TokenKind::Identifier(name) => Ok(name),
            _ => {
                self.pos -= 1;
                Err(self.unexpected("a type"))
            }
        }
    }

    // subroutineDec: ('constructor'|'function'|'method') (void|type) subroutineName
    //                '(' parameterList ')' subroutineBody
    fn compile_subroutine_dec(&mut self) -> CResult<()> {
        let kind = match self.advance().kind {
            TokenKind::Keyword(k @ (Keyword::Constructor | Keyword::Function | Keyword::Method)) => k,
            _ => unreachable!("guarded by starts_subroutine_dec"),
        };

        self.is_void = self.peek().kind.is_keyword(Keyword::Void);
        if self.is_void {
            self.advance();
        } else {
            self.compile_type()?;
        }
        let name = self.expect_identifier()?;

        self.symbols.start_subroutine();
        if kind == Keyword::Method {
            let _ = self.symbols.define("this", &self.class_name.clone(), Kind::Argument);
        }

        self.expect_symbol('(')?;
        self.compile_parameter_list()?;
        self.expect_symbol(')')?;

        self.expect_symbol('{')?;
        while self.peek().kind.is_keyword(Keyword::Var) {
            self.compile_var_dec()?;
        }

        let n_locals = self.symbols.var_count(Kind::Var);
        self.writer
            .write_function(&format!("{}.{}", self.class_name, name), n_locals);

        match kind {
            Keyword::Constructor => {
                let n_fields = self.symbols.var_count(Kind::Field);
                self.writer.write_push("constant", n_fields);
                self.writer.write_call("Memory.alloc", 1);
                self.writer.write_pop("pointer", 0);
            }
            Keyword::Method => {
                self.writer.write_push("argument", 0);
                self.writer.write_pop("pointer", 0);
            }
            Keyword::Function => {}
            _ => unreachable!(),
        }

        self.compile_statements()?;
        self.expect_symbol('}')?;
        Ok(())
    }

    // parameterList: ((type varName) (',' type varName)*)?
    fn compile_parameter_list(&mut self) -> CResult<()> {
        if self.peek().kind.is_symbol(')') {
            return Ok(());
        }
        loop {
            let type_name = self.compile_type()?;
            let span = self.peek().span;
            let name = self.expect_identifier()?;
            self.define_symbol(&name, &type_name, Kind::Argument, span)?;
            if self.peek().kind.is_symbol(',') {
                self.advance();
                continue;
            }
            break;
        }
        Ok(())
    }

    // varDec: 'var' type varName (',' varName)* ';'
    fn compile_var_dec(&mut self) -> CResult<()> {
        self.expect_keyword(Keyword::Var)?;
        let type_name = self.compile_type()?;
        let span = self.peek().span;
        let name = self.expect_identifier()?;
        self.define_symbol(&name, &type_name, Kind::Var, span)?;

        while self.peek().kind.is_symbol(',') {
            self.advance();
            let span = self.peek().span;
            let name = self.expect_identifier()?;
            self.define_symbol(&name, &type_name, Kind::Var, span)?;
        }
        self.expect_symbol(';')?;
        Ok(())
    }

    fn compile_statements(&mut self) -> CResult<()> {
        loop {
            match &self.peek().kind {
                TokenKind::Keyword(Keyword::Let) => self.compile_let()?,
                TokenKind::Keyword(Keyword::If) => self.compile_if()?,
                TokenKind::Keyword(Keyword::While) => self.compile_while()?,
                TokenKind::Keyword(Keyword::Do) => self.compile_do()?,
                TokenKind::Keyword(Keyword::Return) => self.compile_return()?,
                _ => break,
            }
        }
        Ok(())
    }

    // letStatement: 'let' varName ('[' expression ']')? '=' expression ';'
    fn compile_let(&mut self) -> CResult<()> {
        self.expect_keyword(Keyword::Let)?;
        let name = self.expect_identifier()?;

        let is_array = self.peek().kind.is_symbol('[');
        if is_array {
            self.advance();
            self.compile_expression()?;
            self.expect_symbol(']')?;
            self.push_variable(&name)?;
            self.writer.write_arithmetic("add");
        }

        self.expect_symbol('=')?;
        self.compile_expression()?;
        self.expect_symbol(';')?;

        if is_array {
            self.writer.write_pop("temp", 0);
            self.writer.write_pop("pointer", 1);
            self.writer.write_push("temp", 0);
            self.writer.write_pop("that", 0);
        } else {
            self.pop_variable(&name)?;
        }
        Ok(())
    }

    // ifStatement: 'if' '(' expression ')' '{' statements '}' ('else' '{' statements '}')?
    fn compile_if(&mut self) -> CResult<()> {
        self.expect_keyword(Keyword::If)?;
        let k = self.next_label_id();
        let label_true = format!("IF_TRUE_{}", k);
        let label_false = format!("IF_FALSE_{}", k);
        let label_end = format!("IF_END_{}", k);

        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;

        self.writer.write_if(&label_true);
        self.writer.write_goto(&label_false);
        self.writer.write_label(&label_true);

        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;

        let has_else = self.peek().kind.is_keyword(Keyword::Else);
        if has_else {
            self.writer.write_goto(&label_end);
        }
        self.writer.write_label(&label_false);

        if has_else {
            self.advance();
            self.expect_symbol('{')?;
            self.compile_statements()?;
            self.expect_symbol('}')?;
            self.writer.write_label(&label_end);
        }

        Ok(())
    }

    // whileStatement: 'while' '(' expression ')' '{' statements '}'
    fn compile_while(&mut self) -> CResult<()> {
        self.expect_keyword(Keyword::While)?;
        let k = self.next_label_id();
        let label_exp = format!("WHILE_EXP_{}", k);
        let label_end = format!("WHILE_END_{}", k);

        self.writer.write_label(&label_exp);

        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;

        self.writer.write_arithmetic("not");
        self.writer.write_if(&label_end);

        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;

        self.writer.write_goto(&label_exp);
        self.writer.write_label(&label_end);
        Ok(())
    }

    // doStatement: 'do' subroutineCall ';'
    fn compile_do(&mut self) -> CResult<()> {
        self.expect_keyword(Keyword::Do)?;
        self.compile_subroutine_call()?;
        self.expect_symbol(';')?;
        // A `do` call discards its return value, which every Jack
        // subroutine produces (void functions return 0 by convention).
        self.writer.write_pop("temp", 0);
        Ok(())
    }

    // returnStatement: 'return' expression? ';'
    fn compile_return(&mut self) -> CResult<()> {
        let return_span = self.peek().span;
        self.expect_keyword(Keyword::Return)?;
        let has_value = !self.peek().kind.is_symbol(';');
        if has_value {
            self.compile_expression()?;
        } else {
            self.writer.write_push("constant", 0);
        }
        self.expect_symbol(';')?;
        self.writer.write_return();

        if self.is_void && has_value {
            return Err(CompileError::new(
                ErrorKind::InvalidReturn,
                "cannot return a value from a void subroutine",
                self.file,
                return_span,
            ));
        }
        if !self.is_void && !has_value {
            return Err(CompileError::new(
                ErrorKind::InvalidReturn,
                "non-void subroutine must return a value",
                self.file,
                return_span,
            ));
        }
        Ok(())
    }

    // expression: term (op term)*
    fn compile_expression(&mut self) -> CResult<()> {
        self.compile_term()?;
        while let TokenKind::Symbol(op @ ('+' | '-' | '*' | '/' | '&' | '|' | '<' | '>' | '=')) =
            self.peek().kind
        {
            self.advance();
            self.compile_term()?;
            self.write_binary_op(op);
        }
        Ok(())
    }

    fn write_binary_op(&mut self, op: char) {
        match op {
            '+' => self.writer.write_arithmetic("add"),
            '-' => self.writer.write_arithmetic("sub"),
            '*' => self.writer.write_call("Math.multiply", 2),
            '/' => self.writer.write_call("Math.divide", 2),
            '&' => self.writer.write_arithmetic("and"),
            '|' => self.writer.write_arithmetic("or"),
            '<' => self.writer.write_arithmetic("lt"),
            '>' => self.writer.write_arithmetic("gt"),
            '=' => self.writer.write_arithmetic("eq"),
            _ => unreachable!("guarded by compile_expression"),
        }
    }

    // term: integerConstant | stringConstant | keywordConstant | varName
    //     | varName '[' expression ']' | subroutineCall | '(' expression ')'
    //     | unaryOp term
    fn compile_term(&mut self) -> CResult<()> {
        match self.peek().kind.clone() {
            TokenKind::IntegerConstant(value) => {
                self.advance();
                self.writer.write_push("constant", value as usize);
            }
            TokenKind::StringConstant(value) => {
                self.advance();
                self.compile_string_constant(&value);
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                self.writer.write_push("constant", 0);
                self.writer.write_arithmetic("not");
            }
            TokenKind::Keyword(Keyword::False) | TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                self.writer.write_push("constant", 0);
            }
            TokenKind::Keyword(Keyword::This) => {
                self.advance();
                self.writer.write_push("pointer", 0);
            }
            TokenKind::Symbol('(') => {
                self.advance();
                self.compile_expression()?;
                self.expect_symbol(')')?;
            }
            TokenKind::Symbol(op @ ('-' | '~' | '^' | '#')) => {
                self.advance();
                self.compile_term()?;
                let command = match op {
                    '-' => "neg",
                    '~' => "not",
                    '^' => "shiftleft",
                    '#' => "shiftright",
                    _ => unreachable!(),
                };
                self.writer.write_arithmetic(command);
            }
            TokenKind::Identifier(_) => self.compile_identifier_term()?,
            _ => return Err(self.unexpected("a term")),
        }
        Ok(())
    }

    fn compile_string_constant(&mut self, value: &str) {
        self.writer.write_push("constant", value.len());
        self.writer.write_call("String.new", 1);
        for byte in value.bytes() {
            self.writer.write_push("constant", byte as usize);
            self.writer.write_call("String.appendChar", 2);
        }
    }

    /// Disambiguates `varName`, `varName[expr]`, and `subroutineCall` once
    /// the lookahead past the identifier is known.
    fn compile_identifier_term(&mut self) -> CResult<()> {
        let name = self.expect_identifier()?;

        if self.peek().kind.is_symbol('[') {
            self.advance();
            self.compile_expression()?;
            self.expect_symbol(']')?;
            self.push_variable(&name)?;
            self.writer.write_arithmetic("add");
            self.writer.write_pop("pointer", 1);
            self.writer.write_push("that", 0);
        } else if self.peek().kind.is_symbol('(') || self.peek().kind.is_symbol('.') {
            self.compile_subroutine_call_from(name)?;
        } else {
            self.push_variable(&name)?;
        }
        Ok(())
    }

    // subroutineCall: subroutineName '(' expressionList ')'
    //               | (className|varName) '.' subroutineName '(' expressionList ')'
    fn compile_subroutine_call(&mut self) -> CResult<()> {
        let name = self.expect_identifier()?;
        self.compile_subroutine_call_from(name)
    }

    fn compile_subroutine_call_from(&mut self, name: String) -> CResult<()> {
        if self.peek().kind.is_symbol('.') {
            self.advance();
            let method_name = self.expect_identifier()?;

            if let Some(entry) = self.symbols.lookup(&name).cloned() {
                self.writer.write_push(entry.kind.segment(), entry.index);
                self.expect_symbol('(')?;
                let n_args = self.compile_expression_list()?;
                self.expect_symbol(')')?;
                self.writer
                    .write_call(&format!("{}.{}", entry.type_name, method_name), n_args + 1);
            } else {
                self.expect_symbol('(')?;
                let n_args = self.compile_expression_list()?;
                self.expect_symbol(')')?;
                self.writer.write_call(&format!("{}.{}", name, method_name), n_args);
            }
        } else {
            self.writer.write_push("pointer", 0);
            self.expect_symbol('(')?;
            let n_args = self.compile_expression_list()?;
            self.expect_symbol(')')?;
            self.writer
                .write_call(&format!("{}.{}", self.class_name, name), n_args + 1);
        }
        Ok(())
    }

    // expressionList: (expression (',' expression)*)?
    fn compile_expression_list(&mut self) -> CResult<usize> {
        if self.peek().kind.is_symbol(')') {
            return Ok(0);
        }
        let mut n = 1;
        self.compile_expression()?;
        while self.peek().kind.is_symbol(',') {
            self.advance();
            self.compile_expression()?;
            n += 1;
        }
        Ok(n)
    }

    fn push_variable(&mut self, name: &str) -> CResult<()> {
        let entry = self.symbols.lookup(name).cloned().ok_or_else(|| {
            CompileError::new(
                ErrorKind::UndefinedSymbol,
                format!("undefined identifier '{}'", name),
                self.file,
                Span::unknown(),
            )
        })?;
        self.writer.write_push(entry.kind.segment(), entry.index);
        Ok(())
    }

    fn pop_variable(&mut self, name: &str) -> CResult<()> {
        let entry = self.symbols.lookup(name).cloned().ok_or_else(|| {
            CompileError::new(
                ErrorKind::UndefinedSymbol,
                format!("undefined identifier '{}'", name),
                self.file,
                Span::unknown(),
            )
        })?;
        self.writer.write_pop(entry.kind.segment(), entry.index);
        Ok(())
    }
}
