//! Authentication commands.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use dialoguer::{Input, Password};

use tasksync_client::{ApiClient, ClientConfig};
use tasksync_core::session::model::Role;
use tasksync_core::session::SessionStore;

#[derive(Args)]
pub struct LoginArgs {
    /// Account email (prompted when omitted)
    #[arg(long)]
    pub email: Option<String>,

    /// Account password (prompted when omitted)
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Args)]
pub struct RegisterArgs {
    /// Display name
    pub name: String,

    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password (prompted when omitted)
    #[arg(long)]
    pub password: Option<String>,

    /// Account role (manager, employee)
    #[arg(long, default_value = "employee")]
    pub role: String,
}

pub async fn login(args: LoginArgs, config: &ClientConfig, store: &mut SessionStore) -> Result<()> {
    let email: String = match args.email {
        Some(email) => email,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let password = match args.password {
        Some(password) => password,
        None => Password::new().with_prompt("Password").interact()?,
    };

    let session = ApiClient::new(config).login(&email, &password).await?;
    let name = session.user.name.clone();
    let role = session.user.role;
    store.set(session)?;

    println!(
        "{} Signed in as {} {}",
        "✓".green().bold(),
        name.cyan(),
        format!("({})", role.as_str()).dimmed()
    );
    Ok(())
}

pub async fn register(
    args: RegisterArgs,
    config: &ClientConfig,
    store: &mut SessionStore,
) -> Result<()> {
    let role = Role::parse(&args.role)
        .ok_or_else(|| anyhow::anyhow!("Invalid role '{}'. Use manager or employee.", args.role))?;
    let password = match args.password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };

    let session = ApiClient::new(config)
        .register(&args.name, &args.email, &password, role)
        .await?;
    let name = session.user.name.clone();
    store.set(session)?;

    println!(
        "{} Registered and signed in as {} {}",
        "✓".green().bold(),
        name.cyan(),
        format!("({})", role.as_str()).dimmed()
    );
    Ok(())
}

pub fn logout(store: &mut SessionStore) -> Result<()> {
    if store.current().is_none() {
        println!("{}", "Not signed in.".dimmed());
        return Ok(());
    }
    store.clear()?;
    println!("{} Signed out", "✓".green().bold());
    Ok(())
}

pub fn whoami(store: &SessionStore) -> Result<()> {
    match store.current() {
        Some(session) => {
            println!(
                "{} {}",
                session.user.name.cyan().bold(),
                format!("({})", session.user.role.as_str()).dimmed()
            );
            println!("{}", session.user.email);
        }
        None => println!("{}", "Not signed in.".dimmed()),
    }
    Ok(())
}
