use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use asm15::{assemble_expansion, expand, Assembly, ModuleError};
use clap::Parser;

/// Two-pass assembler for the 15-bit teaching machine.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Modules to assemble, by base name; `.as` is added if missing
    #[arg(required = true)]
    modules: Vec<PathBuf>,

    /// Directory for the generated files, defaults to next to each source
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Don't write the macro-expanded `.am` file
    #[arg(long)]
    no_expanded: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut failed = 0;
    for module in &args.modules {
        match assemble_file(module, &args) {
            Ok(true) => {}
            Ok(false) => failed += 1,
            Err(e) => {
                log::error!("{:#}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} module(s) failed", failed, args.modules.len());
    }
    Ok(())
}

/// Assemble one module and write its artifacts. `Ok(false)` means the
/// module had errors and nothing but the expanded source was written, if
/// macro expansion went through.
fn assemble_file(module: &Path, args: &Args) -> Result<bool> {
    let base = if module.extension().map_or(false, |ext| ext == "as") {
        module.with_extension("")
    } else {
        module.to_path_buf()
    };
    let output = match (&args.out_dir, base.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => base.clone(),
    };

    let source_path = with_suffix(&base, "as");
    log::info!("assembling {}", source_path.display());
    let source = fs::read_to_string(&source_path)
        .with_context(|| format!("Couldn't read {}", source_path.display()))?;

    let expansion = match expand(&source) {
        Ok(expansion) => expansion,
        Err(e) => return report(&output, &source_path, &e),
    };
    if !args.no_expanded {
        let text = expansion.is_valid().then(|| expansion.text());
        write(&with_suffix(&output, "am"), text)?;
    }

    let assembly = match assemble_expansion(&expansion) {
        Ok(assembly) => assembly,
        Err(e) => return report(&output, &source_path, &e),
    };
    write_artifacts(&output, Some(&assembly))?;

    log::info!(
        "wrote {} ({} code word(s), {} data word(s))",
        with_suffix(&output, "ob").display(),
        assembly.code.len(),
        assembly.data.len()
    );
    if !assembly.symbols.is_empty() {
        log::debug!("symbols:");
    }
    for symbol in assembly.symbols.iter() {
        log::debug!("  {} {:?} {}", symbol.name, symbol.kind, symbol.address);
    }
    Ok(true)
}

fn report(output: &Path, source_path: &Path, error: &ModuleError) -> Result<bool> {
    write_artifacts(output, None)?;
    log::error!("{}: {}, no output written", source_path.display(), error);
    Ok(false)
}

/// Write the object and listing files, or remove the ones an earlier run
/// left behind when there's no assembly.
fn write_artifacts(output: &Path, assembly: Option<&Assembly>) -> Result<()> {
    write(&with_suffix(output, "ob"), assembly.map(Assembly::object_text))?;
    write(
        &with_suffix(output, "ent"),
        assembly.and_then(Assembly::entries_text),
    )?;
    write(
        &with_suffix(output, "ext"),
        assembly.and_then(Assembly::externs_text),
    )
}

fn with_suffix(base: &Path, extension: &str) -> PathBuf {
    let mut path = OsString::from(base.as_os_str());
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}

/// Write `contents`, or remove a stale file left by an earlier run when
/// there is nothing to write.
fn write(path: &Path, contents: Option<String>) -> Result<()> {
    match contents {
        Some(contents) => fs::write(path, contents)
            .with_context(|| format!("Couldn't write {}", path.display())),
        None if path.exists() => fs::remove_file(path)
            .with_context(|| format!("Couldn't remove stale {}", path.display())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_modules_leave_no_artifacts() {
        let dir = std::env::temp_dir().join(format!("asm15-artifacts-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let base = dir.join("m");
        let args = Args {
            modules: vec![base.clone()],
            out_dir: None,
            no_expanded: false,
        };
        let program_text = ".entry MAIN\n.extern X\nMAIN: jmp X\n";

        fs::write(with_suffix(&base, "as"), program_text).unwrap();
        assert!(assemble_file(&base, &args).unwrap());
        for extension in ["am", "ob", "ent", "ext"] {
            assert!(with_suffix(&base, extension).exists(), "{}", extension);
        }

        fs::write(with_suffix(&base, "as"), format!("{}bogus line\n", program_text)).unwrap();
        assert!(!assemble_file(&base, &args).unwrap());
        for extension in ["ob", "ent", "ext"] {
            assert!(!with_suffix(&base, extension).exists(), "{}", extension);
        }
        assert!(with_suffix(&base, "am").exists());

        fs::write(with_suffix(&base, "as"), "endmacr\n").unwrap();
        assert!(!assemble_file(&base, &args).unwrap());
        assert!(!with_suffix(&base, "am").exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
