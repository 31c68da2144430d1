use ansi_term::Style;
use linefeed::{Interface, ReadResult, Terminal};
use lox::mach::{disassemble, Config, Event, Runtime};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

pub const EXIT_USAGE: i32 = 64;
pub const EXIT_COMPILE: i32 = 65;
pub const EXIT_RUNTIME: i32 = 70;
pub const EXIT_IO: i32 = 74;

/// Compiles and runs a whole file. Returns the process exit code.
pub fn run_file(path: &Path, config: Config, listing: bool) -> i32 {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Could not read file \"{}\": {}", path.display(), error);
            return EXIT_IO;
        }
    };
    let mut runtime = Runtime::new(config);
    let chunk = match runtime.compile(&source) {
        Ok(chunk) => chunk,
        Err(errors) => {
            for error in errors.iter() {
                eprintln!("{}", error);
            }
            return EXIT_COMPILE;
        }
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if listing {
        let _ = write!(out, "{}", disassemble(&chunk));
    }
    let result = runtime.run(chunk, &mut out);
    let _ = out.flush();
    match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("{}", error);
            EXIT_RUNTIME
        }
    }
}

pub fn repl(config: Config, listing: bool) -> i32 {
    let interrupted = Arc::new(AtomicBool::new(false));
    let int_moved = interrupted.clone();
    if let Err(error) = ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    }) {
        warn!(%error, "Ctrl-C handler not installed");
    }
    match main_loop(config, listing, interrupted) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("{}", error);
            EXIT_IO
        }
    }
}

fn main_loop(config: Config, listing: bool, interrupted: Arc<AtomicBool>) -> io::Result<()> {
    let interface = Interface::new("lox")?;
    interface.set_prompt("> ")?;
    let mut runtime = Runtime::new(config);

    loop {
        if interrupted.swap(false, Ordering::SeqCst) {
            runtime.interrupt();
        }
        match runtime.execute(5000) {
            Event::Stopped => {
                runtime.free_objects();
                let line = match interface.read_line()? {
                    ReadResult::Input(line) => line,
                    ReadResult::Signal(_) | ReadResult::Eof => break,
                };
                // Ctrl-C while editing must not cancel the line about to run.
                interrupted.store(false, Ordering::SeqCst);
                if line.trim().is_empty() {
                    continue;
                }
                interface.add_history_unique(line.clone());
                if runtime.enter(&line) && listing {
                    interface.write_fmt(format_args!("{}", disassemble(runtime.chunk())))?;
                }
            }
            Event::Running => {}
            Event::Print(s) => {
                interface.write_fmt(format_args!("{}", s))?;
            }
            Event::Errors(errors) => {
                for error in errors.iter() {
                    write_error(&interface, &error.to_string())?;
                }
            }
        }
    }
    Ok(())
}

fn write_error<T: Terminal>(interface: &Interface<T>, message: &str) -> io::Result<()> {
    interface.write_fmt(format_args!("{}\n", Style::new().bold().paint(message)))
}
