// Named task filters

use crate::task::Task;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Predicate selecting which tasks are shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Filter {
    #[default]
    All,
    Pending,
    Completed,
    Today,
}

impl Filter {
    pub const ALL: [Filter; 4] = [Filter::All, Filter::Pending, Filter::Completed, Filter::Today];

    /// Parse a filter name; anything unrecognized falls through to `All`
    pub fn parse(name: &str) -> Self {
        match name {
            "pending" => Filter::Pending,
            "completed" => Filter::Completed,
            "today" => Filter::Today,
            _ => Filter::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Pending => "pending",
            Filter::Completed => "completed",
            Filter::Today => "today",
        }
    }

    /// Whether `task` passes this filter, with `today` as the local calendar date
    pub fn matches(self, task: &Task, today: NaiveDate) -> bool {
        match self {
            Filter::All => true,
            Filter::Pending => !task.completed,
            Filter::Completed => task.completed,
            Filter::Today => task.created_at.with_timezone(&Local).date_naive() == today,
        }
    }

    /// Matching subset, order preserved
    pub fn apply<'a>(self, tasks: &'a [Task], today: NaiveDate) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t, today)).collect()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Filter {
    fn from(name: &str) -> Self {
        Filter::parse(name)
    }
}

impl From<String> for Filter {
    fn from(name: String) -> Self {
        Filter::parse(&name)
    }
}
