//! # VM Translator
//!
//! Lowers VM [`Command`](crate::vm::command::Command) sequences into Hack
//! assembly text. This is the codegen backend of the toolchain: it never
//! parses text itself, only emits it, one `Command` at a time, tracking the
//! counters and current-function context that give generated labels their
//! scope.


use crate::vm::command::{ArithmeticOp, Command, Segment, SourceCommand};

pub struct Translator {
    lines: Vec<String>,
    current_function: String,
    call_counter: usize,
    compare_counter: usize,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            current_function: String::new(),
            call_counter: 0,
            compare_counter: 0,
        }
    }

    /// Emit the `SP=256` preamble followed by `call Sys.init 0`, required
    /// before any file's code in a multi-file translation unit. Single-file
    /// translations (unit tests) omit this.
    pub fn write_bootstrap(&mut self) {
        self.emit("@256");
        self.emit("D=A");
        self.emit("@SP");
        self.emit("M=D");
        self.emit_call("Sys.init", 0);
    }

    /// Reset per-file state; the current function name and line counters
    /// are process-global so labels stay unique across an entire batch,
    /// but `current_function` must be re-established by the first
    /// `function` command of the new file.
    pub fn start_file(&mut self) {
        self.current_function.clear();
    }

    pub fn translate_command(&mut self, source: &SourceCommand) {
        match &source.command {
            Command::Arithmetic(op) => self.translate_arithmetic(*op),
            Command::Push { segment, index } => self.translate_push(*segment, *index, &source.file),
            Command::Pop { segment, index } => self.translate_pop(*segment, *index, &source.file),
            Command::Label(name) => self.emit_label(&self.scoped_label(name)),
            Command::Goto(name) => {
                let label = self.scoped_label(name);
                self.emit(&format!("@{}", label));
                self.emit("0;JMP");
            }
            Command::IfGoto(name) => {
                let label = self.scoped_label(name);
                self.emit_pop_to_d();
                self.emit(&format!("@{}", label));
                self.emit("D;JNE");
            }
            Command::Function { name, n_locals } => self.translate_function(name, *n_locals),
            Command::Call { name, n_args } => self.emit_call(name, *n_args),
            Command::Return => self.translate_return(),
        }
    }

    pub fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    fn scoped_label(&self, name: &str) -> String {
        if self.current_function.is_empty() {
            name.to_string()
        } else {
            format!("{}${}", self.current_function, name)
        }
    }

    fn emit(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn emit_label(&mut self, label: &str) {
        self.lines.push(format!("({})", label));
    }

    /// `@SP; AM=M-1; D=M` — pop top of stack into D, leaving SP decremented.
    fn emit_pop_to_d(&mut self) {
        self.emit("@SP");
        self.emit("AM=M-1");
        self.emit("D=M");
    }

    /// `@SP; A=M; M=D; @SP; M=M+1` — push D onto the stack.
    fn emit_push_d(&mut self) {
        self.emit("@SP");
        self.emit("A=M");
        self.emit("M=D");
        self.emit("@SP");
        self.emit("M=M+1");
    }

    fn translate_push(&mut self, segment: Segment, index: u32, file: &str) {
        match segment {
            Segment::Constant => {
                self.emit(&format!("@{}", index));
                self.emit("D=A");
            }
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                self.emit(&format!("@{}", index));
                self.emit("D=A");
                self.emit(&format!("@{}", segment_base(segment)));
                self.emit("A=D+M");
                self.emit("D=M");
            }
            Segment::Pointer | Segment::Temp => {
                let base = fixed_base(segment);
                self.emit(&format!("@{}", base + index));
                self.emit("D=M");
            }
            Segment::Static => {
                self.emit(&format!("@{}", static_symbol(file, index)));
                self.emit("D=M");
            }
        }
        self.emit_push_d();
    }

    fn translate_pop(&mut self, segment: Segment, index: u32, file: &str) {
        match segment {
            Segment::Constant => unreachable!("pop constant is not a legal VM command"),
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                self.emit(&format!("@{}", index));
                self.emit("D=A");
                self.emit(&format!("@{}", segment_base(segment)));
                self.emit("D=D+M");
                self.emit("@R13");
                self.emit("M=D");
                self.emit_pop_to_d();
                self.emit("@R13");
                self.emit("A=M");
                self.emit("M=D");
            }
            Segment::Pointer | Segment::Temp => {
                let base = fixed_base(segment);
                self.emit_pop_to_d();
                self.emit(&format!("@{}", base + index));
                self.emit("M=D");
            }
            Segment::Static => {
                self.emit_pop_to_d();
                self.emit(&format!("@{}", static_symbol(file, index)));
                self.emit("M=D");
            }
        }
    }

    fn translate_arithmetic(&mut self, op: ArithmeticOp) {
        if op.is_unary() {
            self.emit("@SP");
            self.emit("A=M-1");
            let comp = match op {
                ArithmeticOp::Neg => "M=-M",
                ArithmeticOp::Not => "M=!M",
                ArithmeticOp::Shiftleft => "M=M<<",
                ArithmeticOp::Shiftright => "M=M>>",
                _ => unreachable!("guarded by is_unary"),
            };
            self.emit(comp);
            return;
        }

        match op {
            ArithmeticOp::Add | ArithmeticOp::Sub | ArithmeticOp::And | ArithmeticOp::Or => {
                self.emit_pop_to_d();
                self.emit("@SP");
                self.emit("A=M-1");
                let comp = match op {
                    ArithmeticOp::Add => "M=M+D",
                    ArithmeticOp::Sub => "M=M-D",
                    ArithmeticOp::And => "M=M&D",
                    ArithmeticOp::Or => "M=M|D",
                    _ => unreachable!(),
                };
                self.emit(comp);
            }
            ArithmeticOp::Eq | ArithmeticOp::Gt | ArithmeticOp::Lt => self.translate_comparison(op),
            _ => unreachable!("unary ops handled above"),
        }
    }

    /// Sign-split comparison: never emits a naive `D=M-D; D;JGT`, since
    /// that overflows for operands of opposite sign near the 16-bit
    /// extremes (e.g. `MIN_INT - 1`). The signs of both operands are
    /// examined first; only when they agree is a same-sign subtraction,
    /// which cannot overflow, used to decide the result. When the signs
    /// differ the result is determined directly from which operand was
    /// negative, without subtracting at all.
    fn translate_comparison(&mut self, op: ArithmeticOp) {
        let k = self.compare_counter;
        self.compare_counter += 1;

        let first_pos = format!("FIRST_POS_{}", k);
        let second_pos = format!("SECOND_POS_{}", k);
        let second_neg = format!("SECOND_NEG_{}", k);
        let compare = format!("COMPARE_{}", k);
        let truth = format!("TRUE_{}", k);
        let end = format!("END_{}", k);

        // Pop y (top of stack) into R13, then pop x into R14. Both pops
        // together leave SP at x's original slot, where the boolean
        // result will be written back.
        self.emit_pop_to_d();
        self.emit("@R13");
        self.emit("M=D"); // R13 = y
        self.emit_pop_to_d();
        self.emit("@R14");
        self.emit("M=D"); // R14 = x

        // x >= 0 ?
        self.emit(&format!("@{}", first_pos));
        self.emit("D;JGE");

        // x < 0: if y is also negative, same sign, fall through to a safe
        // subtraction; otherwise x < 0 <= y, which decides eq/gt/lt outright.
        self.emit("@R13");
        self.emit("D=M");
        self.emit(&format!("@{}", second_neg));
        self.emit("D;JLT");
        self.write_definite_result(op, false, &truth, &end);

        self.emit_label(&first_pos);
        // x >= 0: if y is also non-negative, same sign, fall through;
        // otherwise y < 0 <= x, which decides eq/gt/lt outright.
        self.emit("@R13");
        self.emit("D=M");
        self.emit(&format!("@{}", second_pos));
        self.emit("D;JGE");
        self.write_definite_result(op, true, &truth, &end);

        self.emit_label(&second_pos);
        self.emit(&format!("@{}", compare));
        self.emit("0;JMP");
        self.emit_label(&second_neg);
        self.emit(&format!("@{}", compare));
        self.emit("0;JMP");

        // Same-sign case: x - y cannot overflow, so a direct subtraction
        // and comparison-to-zero is safe here.
        self.emit_label(&compare);
        self.emit("@R14");
        self.emit("D=M");
        self.emit("@R13");
        self.emit("D=D-M"); // D = x - y
        let jump = match op {
            ArithmeticOp::Eq => "D;JEQ",
            ArithmeticOp::Gt => "D;JGT",
            ArithmeticOp::Lt => "D;JLT",
            _ => unreachable!("guarded by caller"),
        };
        self.emit(&format!("@{}", truth));
        self.emit(jump);
        self.write_result(false, &end);

        self.emit_label(&truth);
        self.write_result_inline(true);

        self.emit_label(&end);
    }

    /// One of the two operands' sign alone decides the comparison: `x < 0
    /// <= y` (`x_positive = false`) or `y < 0 <= x` (`x_positive = true`).
    /// In either case the relation is strict and equality is impossible.
    fn write_definite_result(&mut self, op: ArithmeticOp, x_positive: bool, truth: &str, end: &str) {
        let result_is_true = match op {
            ArithmeticOp::Eq => false,
            ArithmeticOp::Gt => x_positive,
            ArithmeticOp::Lt => !x_positive,
            _ => unreachable!("guarded by caller"),
        };
        if result_is_true {
            self.emit(&format!("@{}", truth));
            self.emit("0;JMP");
        } else {
            self.write_result(false, end);
        }
    }

    /// Write the boolean result (`-1` or `0`) to the slot left by the two
    /// pops, then jump past the rest of the comparison sequence.
    fn write_result(&mut self, value: bool, end: &str) {
        self.write_result_inline(value);
        self.emit(&format!("@{}", end));
        self.emit("0;JMP");
    }

    fn write_result_inline(&mut self, value: bool) {
        self.emit("@SP");
        self.emit("A=M");
        self.emit(if value { "M=-1" } else { "M=0" });
        self.emit("@SP");
        self.emit("M=M+1");
    }

    fn translate_function(&mut self, name: &str, n_locals: u32) {
        self.current_function = name.to_string();
        self.emit_label(name);
        for _ in 0..n_locals {
            self.emit("@SP");
            self.emit("A=M");
            self.emit("M=0");
            self.emit("@SP");
            self.emit("M=M+1");
        }
    }

    fn emit_call(&mut self, name: &str, n_args: u32) {
        let return_label = format!("{}$ret.{}", name, self.call_counter);
        self.call_counter += 1;

        self.emit(&format!("@{}", return_label));
        self.emit("D=A");
        self.emit_push_d();
        for reg in ["@LCL", "@ARG", "@THIS", "@THAT"] {
            self.emit(reg);
            self.emit("D=M");
            self.emit_push_d();
        }

        self.emit("@SP");
        self.emit("D=M");
        self.emit(&format!("@{}", n_args + 5));
        self.emit("D=D-A");
        self.emit("@ARG");
        self.emit("M=D");

        self.emit("@SP");
        self.emit("D=M");
        self.emit("@LCL");
        self.emit("M=D");

        self.emit(&format!("@{}", name));
        self.emit("0;JMP");

        self.emit_label(&return_label);
    }

    fn translate_return(&mut self) {
        // R13 := LCL
        self.emit("@LCL");
        self.emit("D=M");
        self.emit("@R13");
        self.emit("M=D");

        // R14 := *(R13 - 5), the saved return address, captured before
        // the frame-pointer restores below can overwrite it (this matters
        // when n_args = 0, since ARG then aliases this very slot).
        self.emit("@5");
        self.emit("A=D-A");
        self.emit("D=M");
        self.emit("@R14");
        self.emit("M=D");

        // *ARG := return value (top of stack)
        self.emit_pop_to_d();
        self.emit("@ARG");
        self.emit("A=M");
        self.emit("M=D");

        // SP := ARG + 1
        self.emit("@ARG");
        self.emit("D=M+1");
        self.emit("@SP");
        self.emit("M=D");

        for reg in ["@THAT", "@THIS", "@ARG", "@LCL"] {
            self.emit("@R13");
            self.emit("AM=M-1");
            self.emit("D=M");
            self.emit(reg);
            self.emit("M=D");
        }

        self.emit("@R14");
        self.emit("A=M");
        self.emit("0;JMP");
    }
}

fn segment_base(segment: Segment) -> &'static str {
    match segment {
        Segment::Local => "LCL",
        Segment::Argument => "ARG",
        Segment::This => "THIS",
        Segment::That => "THAT",
        _ => unreachable!("only the four pointer-indirect segments have a base register"),
    }
}

fn fixed_base(segment: Segment) -> u32 {
    match segment {
        Segment::Pointer => 3,
        Segment::Temp => 5,
        _ => unreachable!("only pointer/temp have a fixed base"),
    }
}

fn static_symbol(file: &str, index: u32) -> String {
    format!("{}.{}", file, index)
}
