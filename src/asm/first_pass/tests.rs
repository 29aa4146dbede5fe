use crate::asm::ast::{AOperand, Line, LineContent};
use crate::asm::first_pass::first_pass;
use crate::error::Span;

fn line(content: LineContent) -> Line {
    Line { content, line_number: 1, span: Span::unknown() }
}

#[test]
fn labels_bind_to_the_following_instruction_address() {
    let lines = vec![
        line(LineContent::AInstruction(AOperand::Number(1))),
        line(LineContent::Label("LOOP".into())),
        line(LineContent::AInstruction(AOperand::Number(2))),
        line(LineContent::CInstruction { dest: None, comp: "0".into(), jump: Some("JMP".into()) }),
    ];
    let result = first_pass(&lines, "Test.asm");
    assert!(result.errors.is_empty());
    assert_eq!(result.symbol_table.get("LOOP"), Some(1));
}

#[test]
fn labels_do_not_consume_a_rom_address() {
    let lines = vec![
        line(LineContent::Label("START".into())),
        line(LineContent::Label("ALSO_START".into())),
        line(LineContent::AInstruction(AOperand::Number(0))),
    ];
    let result = first_pass(&lines, "Test.asm");
    assert_eq!(result.symbol_table.get("START"), Some(0));
    assert_eq!(result.symbol_table.get("ALSO_START"), Some(0));
}

#[test]
fn duplicate_label_is_an_error() {
    let lines = vec![
        line(LineContent::Label("LOOP".into())),
        line(LineContent::AInstruction(AOperand::Number(0))),
        line(LineContent::Label("LOOP".into())),
    ];
    let result = first_pass(&lines, "Test.asm");
    assert_eq!(result.errors.len(), 1);
}

#[test]
fn predefined_symbols_survive_into_the_result() {
    let result = first_pass(&[], "Test.asm");
    assert_eq!(result.symbol_table.get("SCREEN"), Some(16384));
}
