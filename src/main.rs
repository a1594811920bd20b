use std::{env, fs::read_to_string, path::Path, process::ExitCode, time::Instant};

use bminor::{analyze, render_diagnostic};
use log::info;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("usage: bminor <file>");
        return ExitCode::from(2);
    }

    let file_path: &str = &args[1];
    let file_name = Path::new(file_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_path.to_string());

    let source = match read_to_string(file_path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("failed to read {}: {}", file_path, error);
            return ExitCode::from(2);
        }
    };

    let start = Instant::now();
    let (program, diagnostics) = analyze(&source, Some(file_name.clone()));
    info!(
        "analyzed {} declarations in {:?}",
        program.body.len(),
        start.elapsed()
    );

    if diagnostics.is_empty() {
        println!("{}: ok", file_name);
        return ExitCode::SUCCESS;
    }

    for error in &diagnostics {
        eprintln!("{}\n", render_diagnostic(error, &source, &file_name));
    }
    eprintln!("{}: {} error(s)", file_name, diagnostics.len());

    ExitCode::FAILURE
}
