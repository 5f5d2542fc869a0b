//! The tree-walking evaluator.
//!
//! One method per [`Stmt`]/[`Expr`] variant, mirroring the reference
//! interpreter's `visit_<NodeType>` dispatch but as an exhaustive `match`
//! instead of reflective method-name lookup. Every fallible step returns
//! `LolResult<_>`; the first error short-circuits the whole walk via `?`.

use std::rc::Rc;

use lolcode_par::ast::{
    ArithOp, BoolBinOp, BoolTernaryOp, CompareOp, Expr, Literal, LoopCond, LoopStep, Program,
    Stmt, TypeKeyword,
};
use lolcode_util::{LolError, LolResult};

use crate::io::{InputProvider, PrintSink, StdinProvider, StdoutSink};
use crate::scope::{ContextArena, ContextId};
use crate::value::{FunctionData, Number, Value};

const IT: &str = "IT";

/// Whether a statement/body finished normally or was cut short by `GTFO`.
/// Kept as a distinct type from `Value` — a `Break` is never a value the
/// language can observe, only a control signal the walker threads back
/// up through `?`-free return values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    Continue,
    Break,
}

/// The outcome of executing a single statement: whether it produced a
/// value (for top-level `IT` rebinding) and whether it signaled `GTFO`.
struct StmtOutcome {
    value: Option<Value>,
    signal: Signal,
}

impl StmtOutcome {
    fn value(value: Value) -> Self {
        StmtOutcome {
            value: Some(value),
            signal: Signal::Continue,
        }
    }

    fn none() -> Self {
        StmtOutcome {
            value: None,
            signal: Signal::Continue,
        }
    }

    fn broke() -> Self {
        StmtOutcome {
            value: None,
            signal: Signal::Break,
        }
    }
}

/// Drives one LOLCODE program to completion. Owns the context arena for
/// the run; print sink and input provider are injected so the same walker
/// serves a terminal driver or a GUI host.
pub struct Interpreter {
    arena: ContextArena,
    root: ContextId,
    sink: Box<dyn PrintSink>,
    input: Box<dyn InputProvider>,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter::with_io(Box::new(StdoutSink), Box::new(StdinProvider))
    }

    pub fn with_io(sink: Box<dyn PrintSink>, input: Box<dyn InputProvider>) -> Self {
        let (arena, root) = ContextArena::new();
        let mut interpreter = Interpreter {
            arena,
            root,
            sink,
            input,
        };
        // `examples/original_source/lolcode.py` seeds the root symbol table
        // with `IT` bound to `Number(0)` before the program ever runs; spec.md
        // is silent on IT's pre-program value, so the original governs here.
        interpreter.arena.set(interpreter.root, IT, Value::integer(0));
        interpreter
    }

    /// The root context's final name→value snapshot, for frontend display.
    pub fn symbol_snapshot(&self) -> Vec<(String, Value)> {
        self.arena.snapshot(self.root)
    }

    #[tracing::instrument(level = "debug", skip(self, program))]
    pub fn run(&mut self, program: &Program) -> LolResult<()> {
        for decl in &program.var_decls {
            let value = match &decl.init {
                Some(expr) => self.eval_expr(expr, self.root)?,
                None => Value::Noob,
            };
            self.arena.set(self.root, &decl.name, value);
        }

        self.exec_top_level(&program.statements, self.root)?;
        tracing::debug!("program finished");
        Ok(())
    }

    /// Runs the program's top-level statement list, rebinding `IT` after
    /// every statement that produced a value — the one place in the walk
    /// that happens; nested if/loop/switch/function bodies run their own
    /// statements without touching `IT`. A bare top-level `GTFO` is inert
    /// here, matching `visit_StatementListNode` in
    /// `examples/original_source/interpreter/lolcode_interpreter.py`, which
    /// never inspects the `Break` sentinel its own top-level loop produces —
    /// only `loop`/`switch` bodies (`exec_body` below) stop early on it.
    fn exec_top_level(&mut self, stmts: &[Stmt], ctx: ContextId) -> LolResult<()> {
        for stmt in stmts {
            let outcome = self.exec_stmt(stmt, ctx)?;
            if let Some(value) = outcome.value {
                self.arena.set(ctx, IT, value);
            }
        }
        Ok(())
    }

    /// Runs a nested statement list (if/loop/switch/function body),
    /// stopping early on `GTFO` but never touching `IT`.
    fn exec_body(&mut self, stmts: &[Stmt], ctx: ContextId) -> LolResult<Signal> {
        for stmt in stmts {
            let outcome = self.exec_stmt(stmt, ctx)?;
            if outcome.signal == Signal::Break {
                return Ok(Signal::Break);
            }
        }
        Ok(Signal::Continue)
    }

    fn exec_stmt(&mut self, stmt: &Stmt, ctx: ContextId) -> LolResult<StmtOutcome> {
        match stmt {
            Stmt::Expr(expr) => {
                let value = self.eval_expr(expr, ctx)?;
                Ok(StmtOutcome::value(value))
            }
            Stmt::Assign { name, value, span } => {
                let _ = span;
                let value = self.eval_expr(value, ctx)?;
                self.arena.set(ctx, name, value.clone());
                Ok(StmtOutcome::value(value))
            }
            Stmt::Print { parts, span } => {
                let line = span.line;
                let mut text = String::new();
                for part in parts {
                    let value = self.eval_expr(part, ctx)?;
                    text.push_str(&value.printable());
                }
                self.sink.print_line(&text);
                let _ = line;
                Ok(StmtOutcome::value(Value::String(text)))
            }
            Stmt::Input { name, span } => self.exec_input(name, span.line, ctx),
            Stmt::Break(_) => Ok(StmtOutcome::broke()),
            Stmt::If {
                then_block,
                else_block,
                span,
            } => self.exec_if(then_block, else_block.as_deref(), span.line, ctx),
            Stmt::Switch {
                cases,
                default,
                span,
            } => self.exec_switch(cases, default, span.line, ctx),
            Stmt::Loop {
                label,
                var_name,
                step,
                condition,
                body,
                span,
            } => self.exec_loop(label, var_name, *step, condition.as_ref(), body, span.line, ctx),
            Stmt::FuncDef {
                name,
                params,
                body,
                return_expr,
                span,
            } => {
                let _ = span;
                let function = Value::Function(Rc::new(FunctionData {
                    name: name.clone(),
                    params: params.clone(),
                    body: body.clone(),
                    return_expr: return_expr.clone(),
                    captured: ctx,
                }));
                self.arena.set(ctx, name, function.clone());
                Ok(StmtOutcome::value(function))
            }
        }
    }

    fn exec_input(&mut self, name: &str, line: u32, ctx: ContextId) -> LolResult<StmtOutcome> {
        if !self.arena.found(ctx, name) {
            return Err(LolError::runtime(
                name,
                line,
                format!("'{name}' Is Not Defined"),
            ));
        }
        let raw = self.input.read_input();
        let padded = format!(" {raw} ");
        let value = Value::String(padded);
        self.arena.set(ctx, name, value.clone());
        Ok(StmtOutcome::value(value))
    }

    fn exec_if(
        &mut self,
        then_block: &[Stmt],
        else_block: Option<&[Stmt]>,
        line: u32,
        ctx: ContextId,
    ) -> LolResult<StmtOutcome> {
        let basis = self.current_it(ctx, line)?;
        let condition = basis.to_boolean(line)?;
        // exec_body stops the chosen block early on a nested GTFO, but the
        // resulting Break is never forwarded past this statement: visit_IfNode
        // in examples/original_source/interpreter/lolcode_interpreter.py never
        // inspects its block's return value for Break, so GTFO inside an O RLY?
        // cannot reach past it to break an enclosing loop.
        if condition {
            self.exec_body(then_block, ctx)?;
        } else if let Some(else_block) = else_block {
            self.exec_body(else_block, ctx)?;
        }
        Ok(StmtOutcome {
            value: Some(basis),
            signal: Signal::Continue,
        })
    }

    fn exec_switch(
        &mut self,
        cases: &[(Literal, Vec<Stmt>)],
        default: &[Stmt],
        line: u32,
        ctx: ContextId,
    ) -> LolResult<StmtOutcome> {
        let basis = self.current_it(ctx, line)?;
        for (literal, body) in cases {
            let candidate = literal_value(literal);
            if basis.is_equal(&candidate, line)? {
                self.exec_body(body, ctx)?;
                return Ok(StmtOutcome::value(basis));
            }
        }
        self.exec_body(default, ctx)?;
        Ok(StmtOutcome::value(basis))
    }

    #[allow(clippy::too_many_arguments)]
    fn exec_loop(
        &mut self,
        label: &str,
        var_name: &str,
        step: LoopStep,
        condition: Option<&(LoopCond, Expr)>,
        body: &[Stmt],
        line: u32,
        ctx: ContextId,
    ) -> LolResult<StmtOutcome> {
        loop {
            if let Some((kind, expr)) = condition {
                let value = self.eval_expr(expr, ctx)?;
                let truthy = value.to_boolean(line)?;
                let should_exit = match kind {
                    LoopCond::Til => truthy,
                    LoopCond::Wile => !truthy,
                };
                if should_exit {
                    break;
                }
            }

            let signal = self.exec_body(body, ctx)?;
            if signal == Signal::Break {
                break;
            }

            let current = self
                .arena
                .get(ctx, var_name)
                .ok_or_else(|| LolError::runtime(var_name, line, format!("'{var_name}' Is Not Defined")))?
                .to_number(line)?;
            let current_int = match current {
                Number::Integer(i) => i,
                Number::Float(f) => f as i64,
            };
            let next = match step {
                LoopStep::Uppin => current_int + 1,
                LoopStep::Nerfin => current_int - 1,
            };
            self.arena.set(ctx, var_name, Value::integer(next));
        }

        Ok(StmtOutcome::value(Value::String(label.to_string())))
    }

    fn current_it(&self, ctx: ContextId, line: u32) -> LolResult<Value> {
        self.arena
            .get(ctx, IT)
            .cloned()
            .ok_or_else(|| LolError::runtime(IT, line, "'IT' Is Not Defined"))
    }

    fn eval_expr(&mut self, expr: &Expr, ctx: ContextId) -> LolResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(literal_value(value)),
            Expr::VarAccess { name, span } => self
                .arena
                .get(ctx, name)
                .cloned()
                .ok_or_else(|| LolError::runtime(name, span.line, format!("'{name}' Is Not Defined"))),
            Expr::ArithBin { op, lhs, rhs, span } => {
                let line = span.line;
                let l = self.eval_expr(lhs, ctx)?;
                let r = self.eval_expr(rhs, ctx)?;
                match op {
                    ArithOp::SumOf => l.add(&r, line),
                    ArithOp::DiffOf => l.subtract(&r, line),
                    ArithOp::ProduktOf => l.multiply(&r, line),
                    ArithOp::QuoshuntOf => l.divide(&r, line),
                    ArithOp::ModOf => l.modulo(&r, line),
                    ArithOp::BiggrOf => l.max(&r, line),
                    ArithOp::SmallrOf => l.min(&r, line),
                }
            }
            Expr::BoolBin { op, lhs, rhs, span } => {
                let line = span.line;
                let l = self.eval_expr(lhs, ctx)?;
                let r = self.eval_expr(rhs, ctx)?;
                match op {
                    BoolBinOp::BothOf => l.and(&r, line),
                    BoolBinOp::EitherOf => l.or(&r, line),
                    BoolBinOp::WonOf => l.xor(&r, line),
                }
            }
            Expr::BoolUnary { operand, span } => {
                let value = self.eval_expr(operand, ctx)?;
                value.not(span.line)
            }
            Expr::BoolTernary { op, operands, span } => {
                let line = span.line;
                let mut result = match op {
                    BoolTernaryOp::AllOf => true,
                    BoolTernaryOp::AnyOf => false,
                };
                for operand in operands {
                    let value = self.eval_expr(operand, ctx)?;
                    let truthy = value.to_boolean(line)?;
                    result = match op {
                        BoolTernaryOp::AllOf => result && truthy,
                        BoolTernaryOp::AnyOf => result || truthy,
                    };
                }
                Ok(Value::Boolean(result))
            }
            Expr::Compare { op, lhs, rhs, span } => {
                let line = span.line;
                let l = self.eval_expr(lhs, ctx)?;
                let r = self.eval_expr(rhs, ctx)?;
                let equal = l.is_equal(&r, line)?;
                Ok(Value::Boolean(match op {
                    CompareOp::BothSaem => equal,
                    CompareOp::Diffrint => !equal,
                }))
            }
            Expr::StrConcat { operands, .. } => {
                let mut text = String::new();
                for operand in operands {
                    let value = self.eval_expr(operand, ctx)?;
                    text.push_str(&value.printable());
                }
                Ok(Value::String(text))
            }
            Expr::Typecast { source, target, span } => {
                let value = self.eval_expr(source, ctx)?;
                cast_explicit(&value, *target, span.line)
            }
            Expr::FuncCall { name, args, span } => self.eval_func_call(name, args, span.line, ctx),
        }
    }

    fn eval_func_call(
        &mut self,
        name: &str,
        args: &[Expr],
        line: u32,
        ctx: ContextId,
    ) -> LolResult<Value> {
        let callee = self
            .arena
            .get(ctx, name)
            .cloned()
            .ok_or_else(|| LolError::runtime(name, line, format!("'{name}' Is Not Defined")))?;

        let function = match callee {
            Value::Function(f) => f,
            _ => {
                return Err(LolError::runtime(
                    name,
                    line,
                    format!("'{name}' Is Not A Function"),
                ))
            }
        };

        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args {
            arg_values.push(self.eval_expr(arg, ctx)?);
        }

        if arg_values.len() != function.params.len() {
            return Err(LolError::runtime(
                name,
                line,
                format!(
                    "Expected {} Parameter(s), Got {}",
                    function.params.len(),
                    arg_values.len()
                ),
            ));
        }

        let call_ctx = self.arena.push_child(function.captured);
        for (param, value) in function.params.iter().zip(arg_values) {
            self.arena.set(call_ctx, param, value);
        }

        let signal = self.exec_body(&function.body, call_ctx)?;
        if signal == Signal::Break {
            return Ok(Value::Noob);
        }

        match &function.return_expr {
            Some(expr) => self.eval_expr(expr, call_ctx),
            None => Ok(Value::Noob),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Integer(i) => Value::integer(*i),
        Literal::Float(f) => Value::float(*f),
        Literal::String(s) => Value::String(s.clone()),
        Literal::Boolean(b) => Value::Boolean(*b),
        Literal::Noob => Value::Noob,
    }
}

fn cast_explicit(value: &Value, target: TypeKeyword, line: u32) -> LolResult<Value> {
    value.cast_to(target, true, line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{BufferSink, ScriptedInput};
    use lolcode_lex::Lexer;
    use lolcode_par::Parser;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn run_and_capture_output(source: &str) -> String {
        let tokens = Lexer::new(source).tokenize().unwrap();
        let program = Parser::new(tokens).parse_program().unwrap();
        let sink = Rc::new(RefCell::new(BufferSink::new()));
        let mut interpreter =
            Interpreter::with_io(Box::new(sink.clone()), Box::new(ScriptedInput::new(Vec::<String>::new())));
        interpreter.run(&program).unwrap();
        sink.borrow().joined()
    }

    #[test]
    fn arithmetic_and_it() {
        let output = run_and_capture_output("HAI\nSUM OF 3 AN 4\nVISIBLE IT\nKTHXBYE");
        assert_eq!(output, "7\n");
    }

    #[test]
    fn implicit_string_to_number_in_sum_of() {
        let output = run_and_capture_output("HAI\nSUM OF \"10\" AN 5\nVISIBLE IT\nKTHXBYE");
        assert_eq!(output, "15\n");
    }

    #[test]
    fn boolean_ternary_all_of() {
        let output = run_and_capture_output("HAI\nALL OF WIN AN WIN AN FAIL MKAY\nVISIBLE IT\nKTHXBYE");
        assert_eq!(output, "FAIL\n");
    }

    #[test]
    fn loop_with_wile_and_gtfo() {
        let source = "HAI\nWAZZUP\nI HAS A x ITZ 0\nBUHBYE\nIM IN YR lp UPPIN YR x WILE DIFFRINT x AN 3\nVISIBLE x\nIM OUTTA YR lp\nKTHXBYE";
        let output = run_and_capture_output(source);
        assert_eq!(output, "0\n1\n2\n");
    }

    #[test]
    fn function_definition_and_call() {
        let source = "HAI\nHOW IZ I add YR a AN YR b\n  FOUND YR SUM OF a AN b\nIF U SAY SO\nI IZ add YR 2 AN YR 3 MKAY\nVISIBLE IT\nKTHXBYE";
        let output = run_and_capture_output(source);
        assert_eq!(output, "5\n");
    }

    #[test]
    fn division_by_zero_is_a_runtime_error() {
        let tokens = Lexer::new("HAI\nQUOSHUNT OF 10 AN 0\nKTHXBYE").tokenize().unwrap();
        let program = Parser::new(tokens).parse_program().unwrap();
        let mut interpreter = Interpreter::new();
        let err = interpreter.run(&program).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Runtime Error: '0' at line 2\nDetails: Division by Zero\n"
        );
    }

    #[test]
    fn undeclared_variable_access_is_a_runtime_error() {
        let tokens = Lexer::new("HAI\nVISIBLE x\nKTHXBYE").tokenize().unwrap();
        let program = Parser::new(tokens).parse_program().unwrap();
        let mut interpreter = Interpreter::new();
        assert!(interpreter.run(&program).is_err());
    }

    #[test]
    fn gimmeh_pads_input_with_surrounding_spaces() {
        let tokens = Lexer::new("HAI\nWAZZUP\nI HAS A x\nBUHBYE\nGIMMEH x\nVISIBLE x\nKTHXBYE")
            .tokenize()
            .unwrap();
        let program = Parser::new(tokens).parse_program().unwrap();
        let mut interpreter =
            Interpreter::with_io(Box::new(BufferSink::new()), Box::new(ScriptedInput::new(["hi"])));
        interpreter.run(&program).unwrap();
        let value = interpreter
            .symbol_snapshot()
            .into_iter()
            .find(|(name, _)| name == "x")
            .map(|(_, value)| value.printable());
        assert_eq!(value, Some(" hi ".to_string()));
    }

    #[test]
    fn switch_matched_case_terminates_without_fallthrough() {
        let source = "HAI\nWAZZUP\nI HAS A x ITZ 1\nBUHBYE\nx\nWTF?\nOMG 1\nVISIBLE \"one\"\nOMG 2\nVISIBLE \"two\"\nOMGWTF\nVISIBLE \"other\"\nOIC\nKTHXBYE";
        let output = run_and_capture_output(source);
        assert_eq!(output, "one\n");
    }

    #[test]
    fn if_else_branches_on_cast_it() {
        let source = "HAI\nWIN\nO RLY?\nYA RLY\nVISIBLE \"yes\"\nNO WAI\nVISIBLE \"no\"\nOIC\nKTHXBYE";
        let output = run_and_capture_output(source);
        assert_eq!(output, "yes\n");
    }

    #[test]
    fn nested_function_closures_resolve_through_captured_context() {
        let source = "HAI\nWAZZUP\nI HAS A g ITZ 10\nBUHBYE\nHOW IZ I addg YR a\n  FOUND YR SUM OF a AN g\nIF U SAY SO\nI IZ addg YR 5 MKAY\nVISIBLE IT\nKTHXBYE";
        let output = run_and_capture_output(source);
        assert_eq!(output, "15\n");
    }

    #[test]
    fn it_starts_as_number_zero_before_any_statement_runs() {
        let output = run_and_capture_output("HAI\nVISIBLE IT\nKTHXBYE");
        assert_eq!(output, "0\n");
    }

    #[test]
    fn bare_top_level_gtfo_is_inert() {
        let source = "HAI\nVISIBLE \"one\"\nGTFO\nVISIBLE \"two\"\nKTHXBYE";
        let output = run_and_capture_output(source);
        assert_eq!(output, "one\ntwo\n");
    }

    #[test]
    fn gtfo_nested_in_if_block_does_not_escape_the_enclosing_loop() {
        let source = "HAI\nWAZZUP\nI HAS A x ITZ 0\nBUHBYE\nIM IN YR lp UPPIN YR x WILE DIFFRINT x AN 3\nWIN\nO RLY?\nYA RLY\nGTFO\nOIC\nVISIBLE x\nIM OUTTA YR lp\nKTHXBYE";
        let output = run_and_capture_output(source);
        assert_eq!(output, "0\n1\n2\n");
    }

}
