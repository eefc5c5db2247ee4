use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use plans4you_core::form::FormDraft;
use plans4you_core::household::HouseholdSummary;
use plans4you_core::{Payload, Plans4YouError, RenderedView, SubmissionTracker};
use plans4you_protocol::Submission;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Age,
    Income,
    Dependents,
    State,
    Dental,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Name,
        Field::Age,
        Field::Income,
        Field::Dependents,
        Field::State,
        Field::Dental,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Age => "Age",
            Field::Income => "Annual household income (USD)",
            Field::Dependents => "Dependents",
            Field::State => "State (e.g. FL)",
            Field::Dental => "Dental coverage (space to toggle)",
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, Field::Age | Field::Income | Field::Dependents)
    }
}

/// Form and results state, independent of the terminal.
pub struct App {
    pub running: bool,
    draft: FormDraft,
    focus: usize,
    tracker: SubmissionTracker,
    status: Option<String>,
    household: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            running: true,
            draft: FormDraft {
                dental: "no".to_string(),
                ..FormDraft::default()
            },
            focus: 0,
            tracker: SubmissionTracker::new(),
            status: None,
            household: None,
        }
    }

    pub fn focused(&self) -> Field {
        Field::ALL[self.focus]
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.draft.name,
            Field::Age => &self.draft.age,
            Field::Income => &self.draft.income,
            Field::Dependents => &self.draft.dependents,
            Field::State => &self.draft.state,
            Field::Dental => &self.draft.dental,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.draft.name,
            Field::Age => &mut self.draft.age,
            Field::Income => &mut self.draft.income,
            Field::Dependents => &mut self.draft.dependents,
            Field::State => &mut self.draft.state,
            Field::Dental => &mut self.draft.dental,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.tracker.is_busy()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn household(&self) -> Option<&str> {
        self.household.as_deref()
    }

    pub fn view(&self) -> RenderedView {
        self.tracker.view()
    }

    /// Handle a key press. Returns a submission when the form was sent.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Submission> {
        let field = self.focused();
        match key.code {
            KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }
            KeyCode::Esc => self.running = false,
            // Unbound chords never reach the fields.
            KeyCode::Char(_)
                if key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {}
            KeyCode::Tab | KeyCode::Down => self.focus = (self.focus + 1) % Field::ALL.len(),
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + Field::ALL.len() - 1) % Field::ALL.len();
            }
            KeyCode::Enter => return self.submit(),
            KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right if field == Field::Dental => {
                let next = if self.draft.dental == "yes" { "no" } else { "yes" };
                self.draft.dental = next.to_string();
            }
            KeyCode::Char(c) if field == Field::Dental => {
                match c.to_ascii_lowercase() {
                    'y' => self.draft.dental = "yes".to_string(),
                    'n' => self.draft.dental = "no".to_string(),
                    _ => {}
                }
            }
            // Numeric inputs refuse anything but digits, including e, + and -.
            KeyCode::Char(c) if field.is_numeric() && !c.is_ascii_digit() => {}
            KeyCode::Char(c) => self.value_mut(field).push(c),
            KeyCode::Backspace if field != Field::Dental => {
                self.value_mut(field).pop();
            }
            _ => {}
        }
        None
    }

    fn submit(&mut self) -> Option<Submission> {
        match self.tracker.submit(&self.draft) {
            Ok(submission) => {
                self.status = None;
                self.household = Some(
                    HouseholdSummary::from_form(&submission.form).describe(&submission.form.name),
                );
                Some(submission)
            }
            Err(Plans4YouError::Form(e)) => {
                self.status = Some(e.to_string());
                None
            }
            Err(e) => {
                tracing::warn!("submission rejected: {e}");
                None
            }
        }
    }

    /// Apply a resolved payload; responses for superseded submissions are ignored.
    pub fn apply_response(&mut self, id: &str, payload: Payload) {
        if let Err(e) = self.tracker.complete(id, &payload) {
            tracing::debug!("{e}");
        }
    }
}
