use crossterm::event::KeyEvent;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};
use tui_textarea::TextArea;

pub const MIN_TOPICS: u8 = 1;
pub const MAX_TOPICS: u8 = 5;

/// Validated search criteria emitted by the form on submit. Immutable once
/// built; the session controller keeps it around for the results header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicQuery {
    pub faculty: String,
    pub department: String,
    pub institution: String,
    pub topics_count: u8,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in all details correctly before proceeding")]
    MissingField(&'static str),
    #[error("Number of topics should be between {MIN_TOPICS} and {MAX_TOPICS}")]
    TopicsOutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Faculty,
    Department,
    Institution,
    TopicsCount,
    Keywords,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Faculty,
        Field::Department,
        Field::Institution,
        Field::TopicsCount,
        Field::Keywords,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Faculty => "Faculty",
            Field::Department => "Department",
            Field::Institution => "Institution (University, Polytechnic, College of Education, etc.)",
            Field::TopicsCount => "Number of topics to generate (5 max)",
            Field::Keywords => "Comma separated keywords to include in project topic",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            Field::Faculty => "Science, Arts, Management Sciences",
            Field::Department => "Computer Science, Economics, Sociology",
            Field::Institution => "University",
            Field::TopicsCount => "5",
            Field::Keywords => "Artificial Intelligence, Automation, History",
        }
    }

    fn index(self) -> usize {
        Field::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Field {
        Field::ALL[(self.index() + 1) % Field::ALL.len()]
    }

    pub fn previous(self) -> Field {
        Field::ALL[(self.index() + Field::ALL.len() - 1) % Field::ALL.len()]
    }
}

/// State of the search form while it is open: one single-line text area per
/// field, a focus marker, and the current validation error (if any).
pub struct FormState {
    fields: [TextArea<'static>; 5],
    pub focused: Field,
    pub error: Option<String>,
}

impl FormState {
    pub fn new() -> Self {
        let fields = Field::ALL.map(|field| {
            let mut textarea = TextArea::default();
            textarea.set_placeholder_text(field.placeholder());
            textarea.set_cursor_line_style(Style::default());
            textarea
        });

        let mut form = Self {
            fields,
            focused: Field::Faculty,
            error: None,
        };
        form.refresh_focus();
        form
    }

    /// Forwards a key press to the focused field. Any edit clears the last
    /// validation error so the user sees it only until they start fixing it.
    pub fn input(&mut self, key: KeyEvent) {
        self.error = None;
        self.fields[self.focused.index()].input(key);
    }

    pub fn focus_next(&mut self) {
        self.focused = self.focused.next();
        self.refresh_focus();
    }

    pub fn focus_previous(&mut self) {
        self.focused = self.focused.previous();
        self.refresh_focus();
    }

    pub fn value(&self, field: Field) -> String {
        self.fields[field.index()].lines().join(" ").trim().to_string()
    }

    pub fn set_value(&mut self, field: Field, value: &str) {
        let mut textarea = TextArea::new(vec![value.to_string()]);
        textarea.set_placeholder_text(field.placeholder());
        textarea.set_cursor_line_style(Style::default());
        self.fields[field.index()] = textarea;
        self.refresh_focus();
    }

    pub fn widget(&self, field: Field) -> &TextArea<'static> {
        &self.fields[field.index()]
    }

    /// Validates the current field values and emits a query, or the first
    /// validation failure. The form itself is left untouched so the user can
    /// correct it and retry.
    pub fn submit(&self) -> Result<TopicQuery, ValidationError> {
        let faculty = self.value(Field::Faculty);
        let department = self.value(Field::Department);
        let institution = self.value(Field::Institution);

        if faculty.is_empty() {
            return Err(ValidationError::MissingField("faculty"));
        }
        if department.is_empty() {
            return Err(ValidationError::MissingField("department"));
        }
        if institution.is_empty() {
            return Err(ValidationError::MissingField("institution"));
        }

        let topics_count = self
            .value(Field::TopicsCount)
            .parse::<u8>()
            .map_err(|_| ValidationError::TopicsOutOfRange)?;
        if !(MIN_TOPICS..=MAX_TOPICS).contains(&topics_count) {
            return Err(ValidationError::TopicsOutOfRange);
        }

        Ok(TopicQuery {
            faculty,
            department,
            institution,
            topics_count,
            keywords: split_keywords(&self.value(Field::Keywords)),
        })
    }

    fn refresh_focus(&mut self) {
        for field in Field::ALL {
            let style = if field == self.focused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            self.fields[field.index()].set_block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(style)
                    .title(field.label()),
            );
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits the raw keywords field on commas into trimmed, non-empty entries.
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(str::to_string)
        .collect()
}
