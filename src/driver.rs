//! # Driver
//!
//! Thin I/O layer that sits between the CLI and the three translation
//! stages. It owns file/directory enumeration and the per-file error
//! reporting policy; it never inspects source text itself.


use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::asm;
use crate::error::CompileError;
use crate::jack::compiler::compile_class;
use crate::jack::tokenizer::tokenize as tokenize_jack;
use crate::vm::parser::parse as parse_vm;
use crate::vm::translator::Translator;

/// Outcome of a driver stage: how many input files were translated and
/// every error collected across all of them. A non-empty `errors` means
/// the caller should exit non-zero, but files unaffected by an error
/// still produced their output.
#[derive(Default)]
pub struct StageReport {
    pub files_processed: usize,
    pub errors: Vec<CompileError>,
}

/// Compile every `.jack` file at `path` (a single file or a directory,
/// non-recursive) into a sibling `.vm` file of the same base name.
pub fn compile(path: &Path) -> std::io::Result<StageReport> {
    let mut report = StageReport::default();
    for file in collect_files(path, "jack")? {
        info!("compiling {}", file.display());
        let source = fs::read_to_string(&file)?;
        let lexed = tokenize_jack(&source, &file.to_string_lossy());
        if !lexed.errors.is_empty() {
            report.errors.extend(lexed.errors);
            continue;
        }
        let compiled = compile_class(&lexed.tokens, &file.to_string_lossy());
        if !compiled.errors.is_empty() {
            report.errors.extend(compiled.errors);
            continue;
        }
        let out_path = file.with_extension("vm");
        debug!("writing {}", out_path.display());
        fs::write(&out_path, compiled.vm_code)?;
        report.files_processed += 1;
    }
    Ok(report)
}

/// Translate VM source at `path` into Hack assembly. A single file
/// produces a sibling `.asm` file; a directory's files are concatenated
/// (in one shared translation context, so labels stay globally unique)
/// into one `.asm` file named after the directory, preceded by the
/// bootstrap that calls `Sys.init`.
pub fn translate(path: &Path) -> std::io::Result<StageReport> {
    let mut report = StageReport::default();
    let files = collect_files(path, "vm")?;
    if files.is_empty() {
        return Ok(report);
    }

    let mut translator = Translator::new();
    let multi_file = path.is_dir();
    if multi_file {
        translator.write_bootstrap();
    }

    for file in &files {
        info!("translating {}", file.display());
        let source = fs::read_to_string(file)?;
        let stem = file.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        let parsed = parse_vm(&source, &stem);
        if !parsed.errors.is_empty() {
            report.errors.extend(parsed.errors);
            continue;
        }
        translator.start_file();
        for command in &parsed.commands {
            translator.translate_command(command);
        }
        report.files_processed += 1;
    }

    if report.files_processed > 0 {
        let out_path = output_path_for(path, "asm");
        debug!("writing {}", out_path.display());
        fs::write(&out_path, translator.finish())?;
    }
    Ok(report)
}

/// Assemble every `.asm` file at `path` (a single file or a directory,
/// non-recursive) into a sibling `.hack` file of the same base name. Each
/// file is its own program: assembling a directory of `.asm` files never
/// combines them into a shared address space.
pub fn assemble(path: &Path) -> std::io::Result<StageReport> {
    let mut report = StageReport::default();
    for file in collect_files(path, "asm")? {
        info!("assembling {}", file.display());
        let source = fs::read_to_string(&file)?;
        let label = file.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        let result = asm::assemble(&source, &label);
        if !result.errors.is_empty() {
            report.errors.extend(result.errors);
            continue;
        }
        let out_path = file.with_extension("hack");
        debug!("writing {}", out_path.display());
        let mut text = result.words.join("\n");
        text.push('\n');
        fs::write(&out_path, text)?;
        report.files_processed += 1;
    }
    Ok(report)
}

/// Compile `.jack` -> `.vm`, then translate every resulting `.vm` file
/// -> `.asm`, then assemble that `.asm` -> `.hack`. Stops at the first
/// stage that reports any error.
pub fn build(path: &Path) -> std::io::Result<StageReport> {
    let compiled = compile(path)?;
    if !compiled.errors.is_empty() {
        return Ok(compiled);
    }
    let translated = translate(path)?;
    if !translated.errors.is_empty() {
        return Ok(translated);
    }
    let asm_path = output_path_for(path, "asm");
    assemble(&asm_path)
}

/// Resolve `path` to a list of files with the given extension: `path`
/// itself if it is a matching file, or every immediately-contained
/// matching file if it is a directory (no recursion).
fn collect_files(path: &Path, extension: &str) -> std::io::Result<Vec<PathBuf>> {
    if path.is_dir() {
        let mut files: Vec<PathBuf> = fs::read_dir(path)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|p| p.is_file() && has_extension(p, extension))
            .collect();
        files.sort();
        Ok(files)
    } else if has_extension(path, extension) {
        Ok(vec![path.to_path_buf()])
    } else {
        Ok(Vec::new())
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|e| e.to_str()).map(|e| e.eq_ignore_ascii_case(extension)).unwrap_or(false)
}

/// The output path for a combined-output stage: `<dir>.<ext>` for a
/// directory input, `<file-stem>.<ext>` for a single file.
fn output_path_for(path: &Path, extension: &str) -> PathBuf {
    if path.is_dir() {
        let name = path.file_name().unwrap_or_default();
        path.join(name).with_extension(extension)
    } else {
        path.with_extension(extension)
    }
}
