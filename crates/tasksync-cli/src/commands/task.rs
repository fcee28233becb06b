//! Task management commands.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Subcommand};
use colored::Colorize;
use dialoguer::Confirm;

use tasksync_client::{ApiClient, ClientConfig, ClientResult};
use tasksync_core::session::model::{Employee, Role, Session};
use tasksync_core::session::SessionStore;
use tasksync_core::task::model::{Task, TaskDraft, TaskPatch, TaskStatus};
use tasksync_core::task::TaskList;

use crate::output;

#[derive(Subcommand)]
pub enum TaskCommands {
    /// List your tasks
    List,

    /// Create a new task (managers)
    New(NewTaskArgs),

    /// Edit task fields (managers)
    Edit(EditTaskArgs),

    /// Move a task to a different status
    Move(MoveTaskArgs),

    /// Delete a task (managers)
    Delete(DeleteTaskArgs),
}

#[derive(Args)]
pub struct NewTaskArgs {
    /// Task title
    pub title: String,

    /// Task description
    #[arg(short, long)]
    pub description: String,

    /// Assignee (employee id, email or name)
    #[arg(short, long)]
    pub assign: String,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: String,
}

#[derive(Args)]
pub struct EditTaskArgs {
    /// Task ID
    pub task_id: String,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,

    /// New status (pending, in-progress, completed)
    #[arg(long)]
    pub status: Option<String>,

    /// New assignee (employee id, email or name)
    #[arg(long)]
    pub assign: Option<String>,

    /// New due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct MoveTaskArgs {
    /// Task ID
    pub task_id: String,

    /// Target status (pending, in-progress, completed)
    pub status: String,
}

#[derive(Args)]
pub struct DeleteTaskArgs {
    /// Task ID
    pub task_id: String,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

pub async fn execute(cmd: TaskCommands, config: &ClientConfig, store: &SessionStore) -> Result<()> {
    let session = super::signed_in(store)?;
    let api = ApiClient::new(config).with_token(&session.token);

    match cmd {
        TaskCommands::List => list(&api, session).await,
        TaskCommands::New(args) => create(args, &api, session).await,
        TaskCommands::Edit(args) => edit(args, &api, session).await,
        TaskCommands::Move(args) => move_status(args, &api, session).await,
        TaskCommands::Delete(args) => delete(args, &api, session).await,
    }
}

pub async fn employees(config: &ClientConfig, store: &SessionStore) -> Result<()> {
    let session = super::signed_in(store)?;
    let api = ApiClient::new(config).with_token(&session.token);
    let employees = api.employees().await?;
    output::print_employees_table(&employees);
    Ok(())
}

pub async fn stats(config: &ClientConfig, store: &SessionStore) -> Result<()> {
    let session = super::signed_in(store)?;
    let api = ApiClient::new(config).with_token(&session.token);
    let list = fetch_tasks(&api, session).await?;
    output::print_stats(&list.stats(Utc::now()));
    Ok(())
}

/// Fetch the role-appropriate task snapshot.
pub(crate) async fn fetch_snapshot(api: &ApiClient, session: &Session) -> ClientResult<Vec<Task>> {
    match session.user.role {
        Role::Manager => api.created_tasks().await,
        Role::Employee => api.my_tasks().await,
    }
}

async fn fetch_tasks(api: &ApiClient, session: &Session) -> Result<TaskList> {
    let mut list = TaskList::new();
    list.load(fetch_snapshot(api, session).await?);
    Ok(list)
}

async fn list(api: &ApiClient, session: &Session) -> Result<()> {
    let list = fetch_tasks(api, session).await?;
    output::print_tasks_table(list.tasks(), Utc::now());
    Ok(())
}

async fn create(args: NewTaskArgs, api: &ApiClient, session: &Session) -> Result<()> {
    let due_date = parse_due(&args.due)?;
    let assignee = resolve_assignee(&api.employees().await?, &args.assign)?;
    let draft = TaskDraft::new(args.title, args.description, assignee, due_date);

    let mut list = fetch_tasks(api, session).await?;
    let task = api.create_task(&draft).await?;
    println!(
        "{} Created task: {} {}",
        "✓".green().bold(),
        task.title.cyan(),
        format!("({})", task.id).dimmed()
    );
    list.apply_create(task)?;
    output::print_tasks_table(list.tasks(), Utc::now());
    Ok(())
}

async fn edit(args: EditTaskArgs, api: &ApiClient, session: &Session) -> Result<()> {
    let status = match args.status.as_deref() {
        Some(raw) => Some(parse_status(raw)?),
        None => None,
    };
    let due_date = match args.due.as_deref() {
        Some(raw) => Some(parse_due(raw)?),
        None => None,
    };
    let assigned_to = match args.assign.as_deref() {
        Some(needle) => Some(resolve_assignee(&api.employees().await?, needle)?),
        None => None,
    };
    let patch = TaskPatch {
        title: args.title,
        description: args.description,
        status,
        assigned_to,
        due_date,
        updated_at: None,
    };
    if patch.is_empty() {
        anyhow::bail!(
            "Nothing to update. Pass at least one of --title, --description, --status, --assign, --due."
        );
    }

    let mut list = fetch_tasks(api, session).await?;
    ensure_can_edit(&list, &args.task_id, session.user.role)?;
    let task = api.update_task(&args.task_id, &patch).await?;
    println!(
        "{} Updated task: {} {}",
        "✓".green().bold(),
        task.title.cyan(),
        format!("({})", task.id).dimmed()
    );
    list.apply_update(&task.id, &TaskPatch::from(&task));
    output::print_tasks_table(list.tasks(), Utc::now());
    Ok(())
}

async fn move_status(args: MoveTaskArgs, api: &ApiClient, session: &Session) -> Result<()> {
    let status = parse_status(&args.status)?;
    let mut list = fetch_tasks(api, session).await?;

    if let Some(task) = list.get(&args.task_id) {
        if !task.can_set_status(session.user.role) {
            anyhow::bail!("Completed tasks can only be reopened by a manager.");
        }
    }

    let task = match session.user.role {
        Role::Employee => api.update_status(&args.task_id, status).await?,
        Role::Manager => {
            api.update_task(&args.task_id, &TaskPatch::status(status))
                .await?
        }
    };
    println!(
        "{} Moved task {} to {}",
        "✓".green().bold(),
        task.title.cyan(),
        task.status.as_str().cyan()
    );
    list.apply_update(&task.id, &TaskPatch::from(&task));
    output::print_tasks_table(list.tasks(), Utc::now());
    Ok(())
}

async fn delete(args: DeleteTaskArgs, api: &ApiClient, session: &Session) -> Result<()> {
    let mut list = fetch_tasks(api, session).await?;
    ensure_can_delete(&list, &args.task_id, session.user.role)?;

    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete task {}?", args.task_id))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("{}", "Aborted.".dimmed());
            return Ok(());
        }
    }

    let task = api.delete_task(&args.task_id).await?;
    list.apply_delete(&task.id);
    println!(
        "{} Deleted task: {} {}",
        "✓".green().bold(),
        task.title.cyan(),
        format!("({})", task.id).dimmed()
    );
    output::print_tasks_table(list.tasks(), Utc::now());
    Ok(())
}

/// Reject edits the server would refuse. Unknown ids pass through; the
/// server has the final say.
fn ensure_can_edit(list: &TaskList, id: &str, role: Role) -> Result<()> {
    match list.get(id) {
        Some(task) if !task.can_edit(role) => anyhow::bail!("Only managers can edit tasks."),
        _ => Ok(()),
    }
}

fn ensure_can_delete(list: &TaskList, id: &str, role: Role) -> Result<()> {
    match list.get(id) {
        Some(task) if !task.can_delete(role) => anyhow::bail!("Only managers can delete tasks."),
        _ => Ok(()),
    }
}

fn parse_status(raw: &str) -> Result<TaskStatus> {
    TaskStatus::parse(raw).ok_or_else(|| {
        anyhow::anyhow!("Invalid status '{raw}'. Use pending, in-progress or completed.")
    })
}

fn parse_due(raw: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Invalid due date '{raw}'. Use YYYY-MM-DD."))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow::anyhow!("Invalid due date '{raw}'."))?;
    Ok(midnight.and_utc())
}

/// Match an employee by id, email or name.
fn resolve_assignee(employees: &[Employee], needle: &str) -> Result<String> {
    let lowered = needle.to_lowercase();
    employees
        .iter()
        .find(|e| {
            e.id == needle || e.email.to_lowercase() == lowered || e.name.to_lowercase() == lowered
        })
        .map(|e| e.id.clone())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No employee matches '{needle}'. Run 'tasksync employees' to list assignees."
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(id: &str, name: &str, email: &str) -> Employee {
        Employee {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    fn held_task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            title: "Ship report".to_string(),
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
    fn test_parse_due() {
        let due = parse_due("2025-06-10").unwrap();
        assert_eq!(due.to_rfc3339(), "2025-06-10T00:00:00+00:00");
        assert!(parse_due("10/06/2025").is_err());
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("in-progress").unwrap(), TaskStatus::InProgress);
        assert!(parse_status("archived").is_err());
    }

    #[test]
    fn test_employee_blocked_from_edit_and_delete() {
        let mut list = TaskList::new();
        list.apply_create(held_task("t1")).unwrap();

        assert!(ensure_can_edit(&list, "t1", Role::Employee).is_err());
        assert!(ensure_can_delete(&list, "t1", Role::Employee).is_err());
        assert!(ensure_can_edit(&list, "t1", Role::Manager).is_ok());
        assert!(ensure_can_delete(&list, "t1", Role::Manager).is_ok());
    }

    #[test]
    fn test_unknown_task_passes_role_guard() {
        let list = TaskList::new();
        assert!(ensure_can_edit(&list, "ghost", Role::Employee).is_ok());
        assert!(ensure_can_delete(&list, "ghost", Role::Employee).is_ok());
    }

    #[test]
    fn test_resolve_assignee() {
        let employees = vec![
            employee("u1", "Dana", "dana@example.com"),
            employee("u2", "Riley", "riley@example.com"),
        ];
        assert_eq!(resolve_assignee(&employees, "u2").unwrap(), "u2");
        assert_eq!(resolve_assignee(&employees, "DANA@example.com").unwrap(), "u1");
        assert_eq!(resolve_assignee(&employees, "riley").unwrap(), "u2");
        assert!(resolve_assignee(&employees, "nobody").is_err());
    }
}
