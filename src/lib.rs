//! # Nand2Tetris Toolchain
//!
//! A two-tier translation toolchain for the Nand2Tetris platform: a Jack
//! compiler, a VM translator, and a Hack assembler, composed into a single
//! pipeline from object-based Jack source down to 16-bit Hack machine code.
//!
//! ## Pipeline
//!
//! ```text
//! Jack source -> jack::tokenizer -> jack::compiler (+ jack::symbol_table) -> VM text
//!             -> vm::parser -> vm::translator -> Hack assembly text
//!             -> asm::lexer -> asm::parser -> asm::symbol_table -> asm::encoder -> .hack
//! ```
//!
//! Each arrow above is a textual intermediate representation, so any two
//! adjacent stages can be exercised independently against golden files.
//!
//! ## Example
//!
//! ```rust,no_run
//! use n2t_toolchain::jack::tokenizer::tokenize;
//! use n2t_toolchain::jack::compiler::compile_class;
//!
//! let source = std::fs::read_to_string("Main.jack").unwrap();
//! let lexed = tokenize(&source, "Main.jack");
//! let compiled = compile_class(&lexed.tokens, "Main.jack");
//! if compiled.errors.is_empty() {
//!     println!("{}", compiled.vm_code);
//! }
//! ```

pub mod asm;
pub mod cursor;
pub mod driver;
pub mod error;
pub mod jack;
pub mod vm;
