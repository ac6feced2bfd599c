use std::cell::RefCell;
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;

use rocks_lang::Rocks;

/// A `Write` sink backed by a shared buffer, so a test can read back what a program printed
/// after handing ownership of the sink to `Rocks`.
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `source` as a whole program against an in-memory output buffer and returns whatever
/// was printed. Mirrors `Rocks::run_file`, minus the exit-code/process plumbing.
///
/// In-process only — never inspects the error latches, since those are process-wide statics
/// (see `error.rs`) that would race against other tests running concurrently in this binary.
/// Use [`assert_errors`] for anything that needs to observe an error.
#[allow(dead_code)]
pub fn run_source(source: &str) -> String {
    let buffer = SharedBuffer::default();
    let mut rocks = Rocks::with_output(Box::new(buffer.clone()));
    rocks.run(source);
    drop(rocks);

    let bytes = buffer.0.borrow();
    String::from_utf8(bytes.clone()).expect("program output to be valid utf-8")
}

/// Writes `source` to a uniquely named file under the target directory and returns its path.
/// Used only by [`assert_errors`], which must run the real binary out-of-process to read the
/// error latches without racing other tests.
#[allow(dead_code)]
pub fn write_fixture(name: &str, source: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("rocks-test-{name}-{}.rocks", std::process::id()));
    std::fs::write(&path, source).expect("fixture file to be writable");
    path
}

/// Asserts the printed output of `source` equals the given lines, one per `print`.
#[macro_export]
macro_rules! assert_prints {
    ($source:expr, $($expected:expr),* $(,)?) => {{
        let expected: Vec<&str> = vec![$($expected),*];
        let expected = if expected.is_empty() {
            String::new()
        } else {
            format!("{}\n", expected.join("\n"))
        };
        let actual = $crate::common::run_source($source);
        assert_eq!(expected, actual, "program:\n{}", $source);
    }};
}

/// Asserts running `source` as a file fails with a nonzero exit code. Runs the built `rocks`
/// binary in a subprocess (via `assert_cmd`) rather than in-process, so the check doesn't race
/// the error-latch statics against other tests in this binary.
#[macro_export]
macro_rules! assert_errors {
    ($name:expr, $source:expr) => {{
        let path = $crate::common::write_fixture($name, $source);
        let result = assert_cmd::Command::cargo_bin("rocks").unwrap().arg(&path).assert().failure();
        let _ = std::fs::remove_file(&path);
        result
    }};
}
