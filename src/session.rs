//! Interactive session — a long-lived picker loop over the persona manager.
//!
//! The picker yields one event at a time; the loop ends on quit, end of
//! input, or when the shutdown future resolves.

use std::future::Future;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::persona::{PersonaManager, SelectOutcome};

/// One user action from the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    /// Raw user input naming a persona; resolved against the catalog.
    Selected(String),
    /// Rescan the persona directory.
    Refresh,
    /// Dismissed without choosing.
    Cancelled,
    Quit,
}

/// Source of picker events.
#[async_trait(?Send)]
pub trait PersonaPicker {
    /// Offer `choices` and wait for the next event.
    async fn pick(&mut self, choices: &[String]) -> Result<PickerEvent>;
}

/// Counters reported when the session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub switches: u32,
    pub failures: u32,
    pub refreshes: u32,
    pub cancelled: u32,
}

// ─────────────────────────────────────────────────────────────────
// Line Picker
// ─────────────────────────────────────────────────────────────────

/// Picker driven by lines of text, normally stdin.
///
/// A number picks the n-th listed persona, other text is passed through as a
/// name, an empty line cancels, `r` refreshes and `q` or end of input quits.
pub struct LinePicker<R> {
    lines: Lines<R>,
    echo_menu: bool,
}

impl LinePicker<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), true)
    }
}

impl<R: AsyncBufRead + Unpin> LinePicker<R> {
    pub fn new(reader: R, echo_menu: bool) -> Self {
        Self {
            lines: reader.lines(),
            echo_menu,
        }
    }
}

/// Interpret one line of picker input.
pub fn parse_line(line: &str, choices: &[String]) -> PickerEvent {
    let line = line.trim();
    match line {
        "" => PickerEvent::Cancelled,
        "q" | "quit" => PickerEvent::Quit,
        "r" | "refresh" => PickerEvent::Refresh,
        _ => match line.parse::<usize>() {
            Ok(n) if (1..=choices.len()).contains(&n) => {
                PickerEvent::Selected(choices[n - 1].clone())
            }
            _ => PickerEvent::Selected(line.to_string()),
        },
    }
}

fn print_menu(choices: &[String]) {
    if choices.is_empty() {
        println!("No personas found. [r]efresh or [q]uit");
    } else {
        for (i, name) in choices.iter().enumerate() {
            println!("  {:>2}. {}", i + 1, name);
        }
        println!("Select a persona (number or name), [r]efresh, [q]uit:");
    }
}

#[async_trait(?Send)]
impl<R: AsyncBufRead + Unpin> PersonaPicker for LinePicker<R> {
    async fn pick(&mut self, choices: &[String]) -> Result<PickerEvent> {
        if self.echo_menu {
            print_menu(choices);
        }
        let line = self
            .lines
            .next_line()
            .await
            .map_err(|e| Error::Internal(format!("Failed to read picker input: {}", e)))?;
        Ok(match line {
            Some(line) => parse_line(&line, choices),
            None => PickerEvent::Quit,
        })
    }
}

// ─────────────────────────────────────────────────────────────────
// Session Loop
// ─────────────────────────────────────────────────────────────────

/// Drive `manager` from `picker` until quit or `shutdown` resolves.
///
/// Switch and refresh failures are already reported by the manager and do
/// not end the session. Only a picker failure is returned.
pub async fn run_session<F>(
    manager: &mut PersonaManager,
    picker: &mut dyn PersonaPicker,
    shutdown: F,
) -> Result<SessionStats>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut stats = SessionStats::default();

    info!(personas = manager.catalog().len(), "Interactive session started");

    loop {
        let choices = manager.catalog().names();

        let event = tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
            event = picker.pick(&choices) => event?,
        };

        match event {
            PickerEvent::Selected(input) => {
                let Some(name) = manager.catalog().resolve(&input).map(str::to_string) else {
                    debug!(input = %input, "Selection matched no persona");
                    manager
                        .notifier()
                        .info(&format!("No persona matches '{}'", input.trim()));
                    continue;
                };
                match manager.select(&name).await {
                    Ok(SelectOutcome::Switched(_)) => stats.switches += 1,
                    Ok(SelectOutcome::Ignored) => {}
                    Err(e) => {
                        debug!(recoverable = e.is_recoverable(), "Switch failed, session continues");
                        stats.failures += 1;
                    }
                }
            }
            PickerEvent::Refresh => {
                stats.refreshes += 1;
                if manager.refresh().await.is_err() {
                    stats.failures += 1;
                }
            }
            PickerEvent::Cancelled => {
                debug!("Picker dismissed");
                stats.cancelled += 1;
            }
            PickerEvent::Quit => break,
        }
    }

    info!(
        switches = stats.switches,
        failures = stats.failures,
        active = %manager.active(),
        "Interactive session ended"
    );
    Ok(stats)
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::testing::RecordingNotifier;
    use crate::persona::status::testing::RecordingStatus;
    use crate::persona::types::ActiveSelection;
    use crate::persona::{PersonaStore, Publisher};
    use std::collections::VecDeque;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct ScriptedPicker {
        events: VecDeque<PickerEvent>,
        offered: Vec<Vec<String>>,
    }

    impl ScriptedPicker {
        fn new(events: impl IntoIterator<Item = PickerEvent>) -> Self {
            Self {
                events: events.into_iter().collect(),
                offered: Vec::new(),
            }
        }
    }

    #[async_trait(?Send)]
    impl PersonaPicker for ScriptedPicker {
        async fn pick(&mut self, choices: &[String]) -> Result<PickerEvent> {
            self.offered.push(choices.to_vec());
            Ok(self.events.pop_front().unwrap_or(PickerEvent::Quit))
        }
    }

    struct StalledPicker;

    #[async_trait(?Send)]
    impl PersonaPicker for StalledPicker {
        async fn pick(&mut self, _choices: &[String]) -> Result<PickerEvent> {
            std::future::pending().await
        }
    }

    fn setup() -> (TempDir, PathBuf, RecordingNotifier, PersonaManager) {
        let tmp = TempDir::new().unwrap();
        let personas = tmp.path().join("vscode").join("personas");
        fs::create_dir_all(&personas).unwrap();
        fs::write(personas.join("qa-engineer.md"), "Be thorough.").unwrap();
        fs::write(personas.join("principal-engineer.md"), "Think in systems.").unwrap();

        let output = tmp.path().join(".github").join("copilot-instructions.md");
        let notifier = RecordingNotifier::default();
        let manager = PersonaManager::new(
            PersonaStore::new(&personas),
            Publisher::new(&output, "vscode/personas/"),
            Box::new(RecordingStatus::default()),
            Box::new(notifier.clone()),
        );
        (tmp, output, notifier, manager)
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_line() {
        let choices = names(&["Principal Engineer", "Qa Engineer"]);
        assert_eq!(parse_line("", &choices), PickerEvent::Cancelled);
        assert_eq!(parse_line("   ", &choices), PickerEvent::Cancelled);
        assert_eq!(parse_line("q", &choices), PickerEvent::Quit);
        assert_eq!(parse_line("r", &choices), PickerEvent::Refresh);
        assert_eq!(
            parse_line("2", &choices),
            PickerEvent::Selected("Qa Engineer".into())
        );
        assert_eq!(parse_line("7", &choices), PickerEvent::Selected("7".into()));
        assert_eq!(
            parse_line(" qa-engineer ", &choices),
            PickerEvent::Selected("qa-engineer".into())
        );
    }

    #[tokio::test]
    async fn test_line_picker_eof_quits() {
        let mut picker = LinePicker::new(&b"1\n\n"[..], false);
        let choices = names(&["Qa Engineer"]);

        assert_eq!(
            picker.pick(&choices).await.unwrap(),
            PickerEvent::Selected("Qa Engineer".into())
        );
        assert_eq!(picker.pick(&choices).await.unwrap(), PickerEvent::Cancelled);
        assert_eq!(picker.pick(&choices).await.unwrap(), PickerEvent::Quit);
    }

    #[tokio::test]
    async fn test_session_switches_and_quits() {
        let (_tmp, output, notifier, mut manager) = setup();
        manager.refresh().await.unwrap();
        let mut picker = ScriptedPicker::new([
            PickerEvent::Selected("qa engineer".into()),
            PickerEvent::Selected("principal-engineer".into()),
            PickerEvent::Quit,
        ]);

        let stats = run_session(&mut manager, &mut picker, std::future::pending())
            .await
            .unwrap();

        assert_eq!(stats.switches, 2);
        assert_eq!(
            manager.active(),
            &ActiveSelection::Persona("Principal Engineer".into())
        );
        assert!(fs::read_to_string(&output).unwrap().ends_with("Think in systems."));
        assert_eq!(
            notifier.infos(),
            vec![
                "Persona changed to: Qa Engineer",
                "Persona changed to: Principal Engineer"
            ]
        );
        assert_eq!(
            picker.offered[0],
            names(&["Principal Engineer", "Qa Engineer"])
        );
    }

    #[tokio::test]
    async fn test_cancel_never_publishes() {
        let (_tmp, output, _notifier, mut manager) = setup();
        manager.refresh().await.unwrap();
        let mut picker = ScriptedPicker::new([PickerEvent::Cancelled, PickerEvent::Cancelled]);

        let stats = run_session(&mut manager, &mut picker, std::future::pending())
            .await
            .unwrap();

        assert_eq!(stats.cancelled, 2);
        assert!(!output.exists());
        assert!(manager.status_label().ends_with("Persona: Default"));
    }

    #[tokio::test]
    async fn test_unknown_name_is_reported_as_info() {
        let (_tmp, output, notifier, mut manager) = setup();
        manager.refresh().await.unwrap();
        let mut picker = ScriptedPicker::new([PickerEvent::Selected("ghost".into())]);

        let stats = run_session(&mut manager, &mut picker, std::future::pending())
            .await
            .unwrap();

        assert_eq!(stats, SessionStats::default());
        assert!(!output.exists());
        assert!(notifier.errors().is_empty());
        assert_eq!(notifier.infos(), vec!["No persona matches 'ghost'"]);
    }

    #[tokio::test]
    async fn test_refresh_picks_up_new_files() {
        let (tmp, _output, _notifier, mut manager) = setup();
        manager.refresh().await.unwrap();
        fs::write(
            tmp.path().join("vscode/personas/tech-writer.md"),
            "Be clear.",
        )
        .unwrap();
        let mut picker = ScriptedPicker::new([
            PickerEvent::Refresh,
            PickerEvent::Selected("Tech Writer".into()),
        ]);

        let stats = run_session(&mut manager, &mut picker, std::future::pending())
            .await
            .unwrap();

        assert_eq!(stats.refreshes, 1);
        assert_eq!(stats.switches, 1);
        assert_eq!(picker.offered[1].len(), 3);
    }

    #[tokio::test]
    async fn test_switch_failure_keeps_session_alive() {
        let (tmp, _output, notifier, mut manager) = setup();
        manager.refresh().await.unwrap();
        fs::remove_file(tmp.path().join("vscode/personas/qa-engineer.md")).unwrap();
        let mut picker = ScriptedPicker::new([
            PickerEvent::Selected("Qa Engineer".into()),
            PickerEvent::Selected("Principal Engineer".into()),
        ]);

        let stats = run_session(&mut manager, &mut picker, std::future::pending())
            .await
            .unwrap();

        assert_eq!(stats.failures, 1);
        assert_eq!(stats.switches, 1);
        assert_eq!(notifier.errors().len(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_future_ends_session() {
        let (_tmp, _output, _notifier, mut manager) = setup();
        let mut picker = StalledPicker;

        let stats = run_session(&mut manager, &mut picker, async {})
            .await
            .unwrap();

        assert_eq!(stats, SessionStats::default());
        assert_eq!(manager.active(), &ActiveSelection::Default);
    }
}
