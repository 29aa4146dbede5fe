//! # VM Writer
//!
//! A thin textual emitter for VM commands, used by the Compilation Engine
//! instead of building an intermediate tree. Each method appends one line
//! of VM code; the engine calls these in the order the Jack grammar
//! dictates, mirroring the syntax-directed style of the reference
//! compilation engine.

#[derive(Debug, Default)]
pub struct VmWriter {
    lines: Vec<String>,
}

impl VmWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_push(&mut self, segment: &str, index: usize) {
        self.lines.push(format!("push {} {}", segment, index));
    }

    pub fn write_pop(&mut self, segment: &str, index: usize) {
        self.lines.push(format!("pop {} {}", segment, index));
    }

    pub fn write_arithmetic(&mut self, command: &str) {
        self.lines.push(command.to_string());
    }

    pub fn write_label(&mut self, label: &str) {
        self.lines.push(format!("label {}", label));
    }

    pub fn write_goto(&mut self, label: &str) {
        self.lines.push(format!("goto {}", label));
    }

    pub fn write_if(&mut self, label: &str) {
        self.lines.push(format!("if-goto {}", label));
    }

    pub fn write_call(&mut self, name: &str, n_args: usize) {
        self.lines.push(format!("call {} {}", name, n_args));
    }

    pub fn write_function(&mut self, name: &str, n_locals: usize) {
        self.lines.push(format!("function {} {}", name, n_locals));
    }

    pub fn write_return(&mut self) {
        self.lines.push("return".to_string());
    }

    pub fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}
