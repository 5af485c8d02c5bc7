// Display strings and HTML markup for tasks

use crate::filter::Filter;
use crate::store::Stats;
use crate::task::{Task, TaskId};
use std::fmt::Write;

/// Convert a 24-hour `HH:MM` value to 12-hour `H:MM AM/PM`
///
/// Minutes are kept exactly as given. Input without a numeric hour is
/// returned unchanged.
pub fn format_time(time: &str) -> String {
    let Some((hour, minutes)) = time.split_once(':') else {
        return time.to_string();
    };
    let Ok(hour) = hour.trim().parse::<u32>() else {
        return time.to_string();
    };

    let period = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{} {}", display_hour, minutes, period)
}

/// Escape text for interpolation into HTML element content or attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Markup for one task row
///
/// A task in edit mode renders input fields prefilled with its values.
pub fn render_task(task: &Task, editing: bool) -> String {
    let text = escape_html(&task.text);
    let time = task.time.to_string();
    let mut html = String::new();

    let class = if task.completed { "task-item completed" } else { "task-item" };
    let _ = write!(html, r#"<li class="{}" data-id="{}">"#, class, task.id);

    if editing {
        let _ = write!(
            html,
            r#"<input type="text" class="edit-text" value="{}"><input type="time" class="edit-time" value="{}"><button class="save-btn">Save</button><button class="cancel-btn">Cancel</button>"#,
            text, time
        );
    } else {
        let checked = if task.completed { " checked" } else { "" };
        let _ = write!(
            html,
            r#"<input type="checkbox" class="toggle"{}><span class="task-text">{}</span><span class="task-time">{}</span><button class="edit-btn">&#9998;</button><button class="delete-btn">&times;</button>"#,
            checked,
            text,
            escape_html(&format_time(&time))
        );
    }

    html.push_str("</li>");
    html
}

/// Markup for a list of tasks, with an empty-state row when there are none
pub fn render_list(tasks: &[&Task], editing: Option<TaskId>) -> String {
    let mut html = String::from(r#"<ul class="task-list">"#);
    if tasks.is_empty() {
        html.push_str(r#"<li class="empty">No tasks</li>"#);
    }
    for task in tasks {
        html.push_str(&render_task(task, editing == Some(task.id)));
    }
    html.push_str("</ul>");
    html
}

/// Markup for the task counters
pub fn render_stats(stats: &Stats) -> String {
    format!(
        r#"<div class="stats"><span class="total">Total: {}</span><span class="completed">Completed: {}</span><span class="pending">Pending: {}</span></div>"#,
        stats.total, stats.completed, stats.pending
    )
}

/// Markup for the filter buttons, marking the current one active
pub fn render_filter_bar(current: Filter) -> String {
    let mut html = String::from(r#"<div class="filters">"#);
    for filter in Filter::ALL {
        let active = if filter == current { " active" } else { "" };
        let _ = write!(
            html,
            r#"<button class="filter-btn{}" data-filter="{}">{}</button>"#,
            active,
            filter,
            capitalize(filter.as_str())
        );
    }
    html.push_str("</div>");
    html
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
