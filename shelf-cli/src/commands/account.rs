//! Account commands - register, login, logout, whoami

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Input, Password};
use shelf_core::services::LogEvent;
use shelf_core::CredentialStore;

use super::{get_context, get_logger, log_event};
use crate::output;

/// Password from --password, SHELF_PASSWORD, or an interactive prompt
fn get_password(flag: Option<String>, confirm: bool) -> Result<String> {
    if let Some(p) = flag {
        return Ok(p);
    }
    if let Ok(p) = std::env::var("SHELF_PASSWORD") {
        return Ok(p);
    }

    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    Ok(prompt.interact()?)
}

fn get_username(flag: Option<String>) -> Result<String> {
    match flag {
        Some(u) => Ok(u),
        None => Ok(Input::<String>::new().with_prompt("Username").interact_text()?),
    }
}

pub fn register(username: Option<String>, password: Option<String>, json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;

    let username = get_username(username)?;
    let password = get_password(password, true)?;

    let id = ctx.users.register(&username, &password)?;
    log_event(
        &logger,
        LogEvent::new("user_registered").with_component("credentials"),
    );

    if json {
        println!("{}", serde_json::json!({"user_id": id, "username": username.trim()}));
    } else {
        output::success(&format!(
            "Registered '{}'. Run `shelf login` to sign in.",
            username.trim()
        ));
    }
    Ok(())
}

pub fn login(username: Option<String>, password: Option<String>, json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;

    let username = get_username(username)?;
    let password = get_password(password, false)?;

    match ctx.session_service.login(&username, &password)? {
        Some(session) => {
            log_event(&logger, LogEvent::new("login").with_component("session"));
            if json {
                println!("{}", serde_json::to_string_pretty(&session)?);
            } else {
                output::success(&format!("Logged in as {}", session.username));
            }
            Ok(())
        }
        None => {
            log_event(
                &logger,
                LogEvent::new("login_failed")
                    .with_component("session")
                    .with_error("invalid credentials"),
            );
            anyhow::bail!("Invalid username or password")
        }
    }
}

pub fn logout(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let ended = ctx.session_service.logout()?;

    if json {
        println!("{}", serde_json::json!({"logged_out": ended}));
    } else if ended {
        output::success("Logged out");
    } else {
        output::info("No active session");
    }
    Ok(())
}

pub fn whoami(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let session = ctx.session_service.current()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    match session {
        Some(s) => println!(
            "{} (user {}, since {})",
            s.username.bold(),
            s.user_id,
            s.logged_in_at.format("%Y-%m-%d %H:%M")
        ),
        None => output::info("Not logged in"),
    }
    Ok(())
}
