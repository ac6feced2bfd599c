use std::io::Write;
use std::process::ExitCode;
use std::{env, io};

use rocks_lang::{exit_code, Rocks};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    match args.len() {
        n if n > 2 => {
            eprintln!("Usage: rocks [script]");
            ExitCode::from(exit_code::USAGE)
        }
        2 => Rocks::new().run_file(&args[1]),
        _ => run_prompt(),
    }
}

/// Interactive REPL. `exit` quits, `clear` clears the screen, blank lines are
/// skipped without being sent through the pipeline.
fn run_prompt() -> ExitCode {
    let mut rocks = Rocks::new();
    let mut editor = DefaultEditor::new().expect("readline editor to initialize");

    let history_path = home::home_dir().map(|home| home.join(".rocks_history"));
    if let Some(path) = &history_path {
        let _ = editor.load_history(path);
    }

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                editor.add_history_entry(trimmed).ok();

                match trimmed {
                    "exit" => break,
                    "clear" => {
                        editor.clear_screen().ok();
                        continue;
                    }
                    _ => rocks.run_line(trimmed),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("readline error: {err}");
                break;
            }
        }
    }

    if let Some(path) = &history_path {
        let _ = editor.save_history(path);
    }

    io::stdout().flush().ok();
    ExitCode::from(exit_code::OK)
}
