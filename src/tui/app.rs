use chrono::{DateTime, Duration, Utc};

use crate::tracker::{CycleReport, PlayerRow};

pub struct App {
    pub title: String,
    pub rows: Vec<PlayerRow>,
    pub warnings: Vec<String>,
    pub last_refresh: Option<DateTime<Utc>>,
    pub refresh_interval: Duration,
    pub loading_message: Option<String>,
    pub selected_row: usize,
    pub refresh_requested: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(title: impl Into<String>, refresh_interval: Duration) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
            warnings: Vec::new(),
            last_refresh: None,
            refresh_interval,
            loading_message: Some("Loading..".to_string()),
            selected_row: 0,
            refresh_requested: true,
            should_quit: false,
        }
    }

    /// A refresh is due on request, before the first cycle, or once the
    /// interval has elapsed.
    pub fn refresh_due(&self, now: DateTime<Utc>) -> bool {
        match self.last_refresh {
            None => true,
            Some(_) if self.refresh_requested => true,
            Some(last) => now - last >= self.refresh_interval,
        }
    }

    pub fn next_refresh(&self) -> Option<DateTime<Utc>> {
        self.last_refresh.map(|last| last + self.refresh_interval)
    }

    pub fn request_refresh(&mut self) {
        self.refresh_requested = true;
    }

    pub fn set_loading(&mut self, message: &str) {
        self.loading_message = Some(message.to_string());
    }

    pub fn apply_report(&mut self, report: CycleReport) {
        self.rows = report.rows;
        self.warnings = report.warnings;
        self.last_refresh = Some(report.refreshed_at);
        self.loading_message = None;
        self.refresh_requested = false;
        if self.selected_row >= self.rows.len() {
            self.selected_row = self.rows.len().saturating_sub(1);
        }
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_row > 0 {
            self.selected_row -= 1;
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_row < self.rows.len().saturating_sub(1) {
            self.selected_row += 1;
        }
    }
}
