use clap::Subcommand;
use taskify_core::{AuthError, Config, Workspace};

use super::CommandResult;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Create an account and log into it
    Register {
        /// Display name
        name: String,
        /// Email address
        email: String,
        /// At least 8 characters with a letter and a digit
        #[arg(long)]
        password: String,
    },
    /// Log into an existing account
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// End the current session
    Logout,
    /// Show the logged-in user
    Whoami,
}

pub fn run(action: AuthAction, config: Config) -> CommandResult {
    let mut ws = Workspace::open(config);
    match action {
        AuthAction::Register {
            name,
            email,
            password,
        } => {
            let user = ws.session_mut().register(&name, &email, &password)?;
            println!("Registered and logged in as {} <{}>", user.name, user.email);
        }
        AuthAction::Login { email, password } => {
            let user = ws.session_mut().login(&email, &password)?;
            println!("Welcome back, {}", user.name);
        }
        AuthAction::Logout => {
            ws.session_mut().logout();
            println!("Logged out");
        }
        AuthAction::Whoami => {
            let user = ws.session().current().ok_or(AuthError::NotAuthenticated)?;
            println!("{} <{}>", user.name, user.email);
        }
    }
    if ws.store().is_degraded() {
        eprintln!("warning: storage unavailable, changes were not saved");
    }
    Ok(())
}
