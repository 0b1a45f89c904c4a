//! User-visible notifications.
//!
//! The switcher decides what to say; a [`Notifier`] decides how it reaches
//! the user.

use tracing::debug;

/// Channel for messages meant for the user rather than the log.
pub trait Notifier {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Prints info to stdout and errors to stderr in red.
#[derive(Debug, Default)]
pub struct TerminalNotifier {
    quiet: bool,
}

impl TerminalNotifier {
    /// A quiet notifier still prints errors.
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Notifier for TerminalNotifier {
    fn info(&self, message: &str) {
        debug!(message = %message, "Notification");
        if !self.quiet {
            println!("{}", message);
        }
    }

    fn error(&self, message: &str) {
        debug!(message = %message, "Error notification");
        eprintln!("\x1b[31mError\x1b[0m: {}", message);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::Notifier;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Note {
        Info(String),
        Error(String),
    }

    /// Collects notifications for assertions.
    #[derive(Clone, Default)]
    pub struct RecordingNotifier {
        pub notes: Rc<RefCell<Vec<Note>>>,
    }

    impl RecordingNotifier {
        pub fn errors(&self) -> Vec<String> {
            self.notes
                .borrow()
                .iter()
                .filter_map(|n| match n {
                    Note::Error(m) => Some(m.clone()),
                    Note::Info(_) => None,
                })
                .collect()
        }

        pub fn infos(&self) -> Vec<String> {
            self.notes
                .borrow()
                .iter()
                .filter_map(|n| match n {
                    Note::Info(m) => Some(m.clone()),
                    Note::Error(_) => None,
                })
                .collect()
        }
    }

    impl Notifier for RecordingNotifier {
        fn info(&self, message: &str) {
            self.notes.borrow_mut().push(Note::Info(message.to_string()));
        }

        fn error(&self, message: &str) {
            self.notes.borrow_mut().push(Note::Error(message.to_string()));
        }
    }
}
