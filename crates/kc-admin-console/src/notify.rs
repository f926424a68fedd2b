//! User feedback: notifications and confirmations.

use std::io::Write;

use colored::Colorize;
use parking_lot::Mutex;

use crate::error::ConsoleError;

/// Receives success and error messages for the user.
pub trait Notifier: Send + Sync {
    /// Reports a completed operation.
    fn success(&self, message: &str);

    /// Reports a failed operation.
    fn error(&self, message: &str);
}

/// Asks the user to confirm a destructive operation.
pub trait Confirm: Send + Sync {
    /// Returns `true` if the user accepted.
    fn confirm(&self, title: &str, message: &str) -> bool;
}

/// Reports an error and hands it back for propagation.
pub(crate) fn reported(notifier: &dyn Notifier, err: ConsoleError) -> ConsoleError {
    tracing::debug!(error = %err, "operation failed");
    notifier.error(&err.to_string());
    err
}

/// Writes notifications to the terminal with coloured markers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message);
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message);
    }
}

/// Severity of a recorded notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Operation completed.
    Success,
    /// Operation failed.
    Error,
}

/// A notification captured by [`MemoryNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Message text.
    pub message: String,
}

/// Keeps notifications in memory, for embedding views that render
/// their own toasts.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    entries: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    /// Creates an empty notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all notifications received so far.
    pub fn all(&self) -> Vec<Notification> {
        self.entries.lock().clone()
    }

    /// Returns the messages of error notifications.
    pub fn errors(&self) -> Vec<String> {
        self.messages(NotificationLevel::Error)
    }

    /// Returns the messages of success notifications.
    pub fn successes(&self) -> Vec<String> {
        self.messages(NotificationLevel::Success)
    }

    /// Drains all notifications.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.lock())
    }

    fn messages(&self, level: NotificationLevel) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|n| n.level == level)
            .map(|n| n.message.clone())
            .collect()
    }

    fn push(&self, level: NotificationLevel, message: &str) {
        self.entries.lock().push(Notification {
            level,
            message: message.to_string(),
        });
    }
}

impl Notifier for MemoryNotifier {
    fn success(&self, message: &str) {
        self.push(NotificationLevel::Success, message);
    }

    fn error(&self, message: &str) {
        self.push(NotificationLevel::Error, message);
    }
}

/// Prompts on the terminal with a `[y/N]` question.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptConfirm;

impl Confirm for PromptConfirm {
    fn confirm(&self, title: &str, message: &str) -> bool {
        match prompt(title, message) {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("confirmation prompt failed: {}", e);
                false
            }
        }
    }
}

fn prompt(title: &str, message: &str) -> std::io::Result<bool> {
    println!("{}", title.bold());
    print!("{message} [y/N]: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    Ok(is_yes(&input))
}

fn is_yes(input: &str) -> bool {
    let input = input.trim();
    input.eq_ignore_ascii_case("y") || input.eq_ignore_ascii_case("yes")
}
