use crate::jack::compiler::compile_class;
use crate::jack::tokenizer::tokenize;

fn compile(source: &str) -> String {
    let lexed = tokenize(source, "Test.jack");
    assert!(lexed.errors.is_empty(), "lex errors: {:?}", lexed.errors);
    let compiled = compile_class(&lexed.tokens, "Test.jack");
    assert!(compiled.errors.is_empty(), "compile errors: {:?}", compiled.errors);
    compiled.vm_code
}

#[test]
fn simple_add_function() {
    let vm = compile(
        "class Main {
            function int sum(int a, int b) {
                return a + b;
            }
        }",
    );
    assert_eq!(
        vm,
        "function Main.sum 0\n\
         push argument 0\n\
         push argument 1\n\
         add\n\
         return\n"
    );
}

#[test]
fn field_access_via_method() {
    let vm = compile(
        "class Point {
            field int x, y;
            method int getX() {
                return x;
            }
        }",
    );
    assert_eq!(
        vm,
        "function Point.getX 0\n\
         push argument 0\n\
         pop pointer 0\n\
         push this 0\n\
         return\n"
    );
}

#[test]
fn constructor_allocates_memory() {
    let vm = compile(
        "class Point {
            field int x, y;
            constructor Point new(int ax, int ay) {
                let x = ax;
                let y = ay;
                return this;
            }
        }",
    );
    assert!(vm.starts_with(
        "function Point.new 0\n\
         push constant 2\n\
         call Memory.alloc 1\n\
         pop pointer 0\n"
    ));
    assert!(vm.contains("push pointer 0\nreturn\n"));
}

#[test]
fn array_store_uses_temp_and_that() {
    let vm = compile(
        "class Main {
            function void set(Array a, int i, int v) {
                let a[i] = v;
                return;
            }
        }",
    );
    assert!(vm.contains(
        "push argument 0\n\
         push argument 1\n\
         add\n\
         push argument 2\n\
         pop temp 0\n\
         pop pointer 1\n\
         push temp 0\n\
         pop that 0\n"
    ));
}

#[test]
fn if_else_emits_paired_labels() {
    let vm = compile(
        "class Main {
            function int abs(int n) {
                if (n < 0) {
                    let n = -n;
                }
                else {
                    let n = n;
                }
                return n;
            }
        }",
    );
    assert!(vm.contains("if-goto IF_TRUE_0"));
    assert!(vm.contains("goto IF_FALSE_0"));
    assert!(vm.contains("label IF_TRUE_0"));
    assert!(vm.contains("goto IF_END_0"));
    assert!(vm.contains("label IF_FALSE_0"));
    assert!(vm.contains("label IF_END_0"));
}

#[test]
fn while_loop_emits_top_and_end_labels() {
    let vm = compile(
        "class Main {
            static int x;
            function void loop() {
                while (true) {
                    let x = 0;
                }
                return;
            }
        }",
    );
    assert!(vm.contains("label WHILE_EXP_0"));
    assert!(vm.contains("if-goto WHILE_END_0"));
    assert!(vm.contains("goto WHILE_EXP_0"));
    assert!(vm.contains("label WHILE_END_0"));
}

#[test]
fn method_call_pushes_receiver_before_args() {
    let vm = compile(
        "class Main {
            function void run(Point p) {
                do p.getX();
                return;
            }
        }",
    );
    assert!(vm.contains("push argument 0\ncall Point.getX 1\npop temp 0"));
}

#[test]
fn do_statement_discards_return_value() {
    let vm = compile(
        "class Main {
            function void run() {
                do Output.println();
                return;
            }
        }",
    );
    assert!(vm.contains("call Output.println 0\npop temp 0\n"));
}

#[test]
fn cross_sign_comparison_uses_vm_lt() {
    let vm = compile(
        "class Main {
            function boolean cmp(int a, int b) {
                return a < b;
            }
        }",
    );
    assert!(vm.contains("push argument 0\npush argument 1\nlt\nreturn"));
}

#[test]
fn unary_shift_operators() {
    let vm = compile(
        "class Main {
            function int shifted(int a) {
                return ^a;
            }
        }",
    );
    assert!(vm.contains("push argument 0\nshiftleft\nreturn"));
}
