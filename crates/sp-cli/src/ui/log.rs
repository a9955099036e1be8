//! Diagnostic log on stderr

use parking_lot::Mutex;
use sp_core::LogSink;

/// Writes log lines to stderr.
///
/// When not echoing, lines are held back and printed only when the log is
/// shown, so quiet runs still surface them after a failure.
pub struct ConsoleLog {
    echo: bool,
    pending: Mutex<Vec<String>>,
}

impl ConsoleLog {
    pub fn new(echo: bool) -> Self {
        Self {
            echo,
            pending: Mutex::new(Vec::new()),
        }
    }
}

impl LogSink for ConsoleLog {
    fn append_line(&self, line: &str) {
        if self.echo {
            eprintln!("{}", line);
        } else {
            self.pending.lock().push(line.to_string());
        }
    }

    fn show(&self) {
        for line in self.pending.lock().drain(..) {
            eprintln!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_lines_are_flushed_on_show() {
        let log = ConsoleLog::new(false);
        log.append_line("one");
        log.append_line("two");
        assert_eq!(log.pending.lock().len(), 2);

        log.show();
        assert!(log.pending.lock().is_empty());
    }

    #[test]
    fn test_echo_holds_nothing() {
        let log = ConsoleLog::new(true);
        log.append_line("one");
        assert!(log.pending.lock().is_empty());
    }
}
