use crate::asm::ast::{AOperand, Line, LineContent};
use crate::asm::encoder::encode;
use crate::asm::symbol_table::SymbolTable;
use crate::error::Span;

fn line(content: LineContent) -> Line {
    Line { content, line_number: 1, span: Span::unknown() }
}

#[test]
fn a_instruction_with_literal_number() {
    let mut table = SymbolTable::new();
    let result = encode(&[line(LineContent::AInstruction(AOperand::Number(7)))], &mut table, "t.asm");
    assert!(result.errors.is_empty());
    assert_eq!(result.words, vec!["0000000000000111"]);
}

#[test]
fn a_instruction_with_predefined_symbol() {
    let mut table = SymbolTable::new();
    let result = encode(&[line(LineContent::AInstruction(AOperand::Symbol("SCREEN".into())))], &mut table, "t.asm");
    assert_eq!(result.words, vec![format!("0{:015b}", 16384)]);
}

#[test]
fn new_variables_allocate_from_sixteen_in_first_use_order() {
    let mut table = SymbolTable::new();
    let lines = vec![
        line(LineContent::AInstruction(AOperand::Symbol("foo".into()))),
        line(LineContent::AInstruction(AOperand::Symbol("bar".into()))),
        line(LineContent::AInstruction(AOperand::Symbol("foo".into()))),
    ];
    let result = encode(&lines, &mut table, "t.asm");
    assert_eq!(result.words[0], format!("0{:015b}", 16));
    assert_eq!(result.words[1], format!("0{:015b}", 17));
    assert_eq!(result.words[2], format!("0{:015b}", 16));
}

#[test]
fn c_instruction_full_form() {
    let mut table = SymbolTable::new();
    let result = encode(
        &[line(LineContent::CInstruction { dest: Some("D".into()), comp: "D+1".into(), jump: Some("JGT".into()) })],
        &mut table,
        "t.asm",
    );
    assert_eq!(result.words, vec!["1110011111010001"]);
}

#[test]
fn c_instruction_without_dest_or_jump() {
    let mut table = SymbolTable::new();
    let result = encode(
        &[line(LineContent::CInstruction { dest: None, comp: "0".into(), jump: None })],
        &mut table,
        "t.asm",
    );
    assert_eq!(result.words, vec!["1110101010000000"]);
}

#[test]
fn shift_computations_use_the_101_opcode_prefix() {
    let mut table = SymbolTable::new();
    let result = encode(
        &[line(LineContent::CInstruction { dest: Some("M".into()), comp: "M<<".into(), jump: None })],
        &mut table,
        "t.asm",
    );
    assert_eq!(result.words[0], "1011100000001000");
}

#[test]
fn unknown_comp_mnemonic_is_an_error() {
    let mut table = SymbolTable::new();
    let result = encode(
        &[line(LineContent::CInstruction { dest: None, comp: "D^A".into(), jump: None })],
        &mut table,
        "t.asm",
    );
    assert_eq!(result.words.len(), 0);
    assert_eq!(result.errors.len(), 1);
}

#[test]
fn label_pseudo_instruction_emits_nothing() {
    let mut table = SymbolTable::new();
    let result = encode(&[line(LineContent::Label("LOOP".into()))], &mut table, "t.asm");
    assert!(result.words.is_empty());
}
