//! Terminal output formatting.

use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use unicode_width::UnicodeWidthStr;

use tasksync_core::notify::model::{EventKind, NotificationRecord};
use tasksync_core::notify::relative_age;
use tasksync_core::session::model::Employee;
use tasksync_core::task::model::{Task, TaskStats, TaskStatus};

/// Print tasks as a table.
pub fn print_tasks_table(tasks: &[Task], now: DateTime<Utc>) {
    if tasks.is_empty() {
        println!("{}", "No tasks found.".dimmed());
        return;
    }

    println!(
        "{:<10} {:<30} {:<13} {:<14} {:<10}",
        "ID", "Title", "Status", "Due", "Assignee"
    );
    println!("{}", "─".repeat(82));

    for task in tasks {
        let due = if task.is_overdue(now) {
            format!("{} !", format_date(task.due_date)).red()
        } else {
            format_date(task.due_date).normal()
        };
        println!(
            "{:<10} {:<30} {:<13} {:<14} {:<10}",
            short_id(&task.id),
            truncate(&task.title, 28),
            status_colored(task.status),
            due,
            short_id(&task.assigned_to)
        );
    }

    println!();
    println!("{} task(s) total", tasks.len());
}

/// Print employees as a table.
pub fn print_employees_table(employees: &[Employee]) {
    if employees.is_empty() {
        println!("{}", "No employees found.".dimmed());
        return;
    }

    println!("{:<26} {:<20} {:<30}", "ID", "Name", "Email");
    println!("{}", "─".repeat(78));

    for employee in employees {
        println!(
            "{:<26} {:<20} {:<30}",
            employee.id,
            truncate(&employee.name, 18),
            employee.email
        );
    }

    println!();
    println!("{} employee(s)", employees.len());
}

/// Print the statistics block.
pub fn print_stats(stats: &TaskStats) {
    println!("{}", "Task Statistics".bold());
    println!();
    println!("  {:<12} {}", "Total", stats.total.to_string().bold());
    println!("  {:<12} {}", "Pending", stats.pending.to_string().yellow());
    println!(
        "  {:<12} {}",
        "In Progress",
        stats.in_progress.to_string().blue()
    );
    println!(
        "  {:<12} {}",
        "Completed",
        stats.completed.to_string().green()
    );
    println!("  {:<12} {}", "Overdue", stats.overdue.to_string().red());
}

/// One-line statistics summary for the watch stream.
pub fn print_stats_line(stats: &TaskStats) {
    println!(
        " {} {} tasks {} {} pending {} {} in progress {} {} completed {} {} overdue",
        "■".cyan(),
        stats.total.to_string().bold(),
        "·".dimmed(),
        stats.pending.to_string().yellow(),
        "·".dimmed(),
        stats.in_progress.to_string().blue(),
        "·".dimmed(),
        stats.completed.to_string().green(),
        "·".dimmed(),
        stats.overdue.to_string().red(),
    );
}

/// Print a single notification line.
pub fn print_notification(record: &NotificationRecord, unread: usize, now: DateTime<Utc>) {
    let badge = match record.kind {
        EventKind::TaskAssigned => "●".blue(),
        EventKind::TaskUpdated => "●".yellow(),
        EventKind::TaskCompleted => "●".green(),
        EventKind::TaskOverdue => "●".red(),
    };
    println!(
        "{} {} {} {} {}",
        badge,
        record.title.bold(),
        record.message,
        format!("({})", relative_age(record.timestamp, now)).dimmed(),
        format!("[{} unread]", unread).dimmed()
    );
}

fn status_colored(status: TaskStatus) -> ColoredString {
    match status {
        TaskStatus::Pending => "Pending".yellow(),
        TaskStatus::InProgress => "In Progress".blue(),
        TaskStatus::Completed => "Completed".green(),
    }
}

fn format_date(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// First eight characters of an id. Slices at a char boundary, never a byte.
fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// Truncate a string respecting visual width.
fn truncate(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 3 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("...");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_titled(title: &str) -> Task {
        Task {
            id: "664b2a9f1c".to_string(),
            title: title.to_string(),
            description: "desc".to_string(),
            status: TaskStatus::Pending,
            assigned_to: "u2".to_string(),
            created_by: "u1".to_string(),
            due_date: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("résumé", 10), "résumé");

        let long = "é".repeat(40);
        let cut = truncate(&long, 28);
        assert_eq!(cut, format!("{}...", "é".repeat(25)));

        // Wide characters count double, so fewer of them fit.
        let wide = "漢".repeat(20);
        assert_eq!(truncate(&wide, 10), format!("{}...", "漢".repeat(3)));
    }

    #[test]
    fn test_short_id_multibyte() {
        assert_eq!(short_id("664b2a9f1c2ab4"), "664b2a9f");
        assert_eq!(short_id("u2"), "u2");
        assert_eq!(short_id(&"é".repeat(12)), "é".repeat(8));
    }

    #[test]
    fn test_tables_render_multibyte_names() {
        let tasks = vec![task_titled(&"é".repeat(15)), task_titled(&"漢".repeat(40))];
        print_tasks_table(&tasks, Utc::now());

        let employees = vec![Employee {
            id: "u1".to_string(),
            name: "é".repeat(30),
            email: "long@example.com".to_string(),
        }];
        print_employees_table(&employees);
    }
}
