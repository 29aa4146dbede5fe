//! # First Pass
//!
//! Walks the instruction stream once, tracking a ROM address counter that
//! increments for every A- or C-instruction and *not* for `(label)`
//! pseudo-instructions. Each label binds to the ROM address of the
//! instruction immediately following it.

#[cfg(test)]
mod tests;

use crate::asm::ast::{Line, LineContent};
use crate::asm::symbol_table::SymbolTable;
use crate::error::{CompileError, ErrorKind};

pub struct FirstPassResult {
    pub symbol_table: SymbolTable,
    pub errors: Vec<CompileError>,
}

#[must_use]
pub fn first_pass(lines: &[Line], file: &str) -> FirstPassResult {
    let mut symbol_table = SymbolTable::new();
    let mut errors = Vec::new();
    let mut rom_address: u16 = 0;

    for line in lines {
        match &line.content {
            LineContent::Label(name) => {
                if symbol_table.contains(name) {
                    errors.push(CompileError::new(
                        ErrorKind::DuplicateDeclaration,
                        format!("label '{}' is already defined", name),
                        file,
                        line.span,
                    ));
                    continue;
                }
                symbol_table.insert(name.clone(), rom_address);
            }
            LineContent::AInstruction(_) | LineContent::CInstruction { .. } => {
                rom_address += 1;
            }
        }
    }

    FirstPassResult { symbol_table, errors }
}
