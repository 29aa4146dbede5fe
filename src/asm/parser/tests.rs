use crate::asm::ast::{AOperand, LineContent};
use crate::asm::lexer::tokenize;
use crate::asm::parser::parse;

fn parse_ok(source: &str) -> Vec<LineContent> {
    let lexed = tokenize(source, "Test.asm");
    assert!(lexed.errors.is_empty());
    let parsed = parse(&lexed.tokens, "Test.asm");
    assert!(parsed.errors.is_empty(), "parse errors: {:?}", parsed.errors);
    parsed.lines.into_iter().map(|l| l.content).collect()
}

#[test]
fn a_instruction_with_number() {
    assert_eq!(parse_ok("@256"), vec![LineContent::AInstruction(AOperand::Number(256))]);
}

#[test]
fn a_instruction_with_symbol() {
    assert_eq!(
        parse_ok("@sum"),
        vec![LineContent::AInstruction(AOperand::Symbol("sum".into()))]
    );
}

#[test]
fn label_pseudo_instruction() {
    assert_eq!(parse_ok("(LOOP)"), vec![LineContent::Label("LOOP".into())]);
}

#[test]
fn full_c_instruction() {
    assert_eq!(
        parse_ok("D=D+1;JGT"),
        vec![LineContent::CInstruction {
            dest: Some("D".into()),
            comp: "D+1".into(),
            jump: Some("JGT".into())
        }]
    );
}

#[test]
fn c_instruction_without_dest() {
    assert_eq!(
        parse_ok("0;JMP"),
        vec![LineContent::CInstruction { dest: None, comp: "0".into(), jump: Some("JMP".into()) }]
    );
}

#[test]
fn c_instruction_without_jump() {
    assert_eq!(
        parse_ok("M=M+1"),
        vec![LineContent::CInstruction { dest: Some("M".into()), comp: "M+1".into(), jump: None }]
    );
}

#[test]
fn blank_and_comment_lines_produce_nothing() {
    assert_eq!(parse_ok("// just a comment\n\n@1\n"), vec![LineContent::AInstruction(AOperand::Number(1))]);
}

#[test]
fn shift_computation_is_a_single_comp_mnemonic() {
    assert_eq!(
        parse_ok("M=M<<"),
        vec![LineContent::CInstruction { dest: Some("M".into()), comp: "M<<".into(), jump: None }]
    );
}
