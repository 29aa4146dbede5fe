use n2t_toolchain::asm::assemble;

#[test]
fn simple_add_program_assembles_to_three_words() {
    let source = "@7\nD=A\n@8\nD=D+A\n@0\nM=D\n";
    let result = assemble(source, "Add");
    assert!(result.errors.is_empty(), "unexpected errors: {:?}", result.errors);
    assert_eq!(result.words.len(), 6);
    assert!(result.words.iter().all(|w| w.len() == 16));
}

#[test]
fn labels_resolve_to_rom_addresses_not_consuming_their_own_slot() {
    let source = "(LOOP)\n@LOOP\n0;JMP\n";
    let result = assemble(source, "Loop");
    assert!(result.errors.is_empty());
    // @LOOP resolves to ROM address 0, the (LOOP) label's own position.
    assert_eq!(result.words[0], format!("0{:015b}", 0));
}

#[test]
fn undeclared_variables_allocate_ram_starting_at_sixteen() {
    let source = "@counter\nM=0\n@counter\nM=M+1\n";
    let result = assemble(source, "Counter");
    assert!(result.errors.is_empty());
    assert_eq!(result.words[0], format!("0{:015b}", 16));
    assert_eq!(result.words[2], format!("0{:015b}", 16));
}

#[test]
fn predefined_symbols_resolve_without_allocating_ram() {
    let source = "@SCREEN\nD=A\n@KBD\nD=A\n";
    let result = assemble(source, "Predefined");
    assert!(result.errors.is_empty());
    assert_eq!(result.words[0], format!("0{:015b}", 16384));
    assert_eq!(result.words[1], format!("0{:015b}", 24576));
}

#[test]
fn shift_computation_selects_the_101_opcode_prefix() {
    let source = "@0\nM=M<<\n";
    let result = assemble(source, "Shift");
    assert!(result.errors.is_empty());
    assert!(result.words[1].starts_with("101"));
}

#[test]
fn duplicate_label_declaration_is_an_error() {
    let source = "(LOOP)\n@0\n(LOOP)\n@0\n";
    let result = assemble(source, "Dup");
    assert!(!result.errors.is_empty());
}
