use std::path::PathBuf;

use anyhow::Result;
use callboard_core::fields::{resolve_first, scalar_string};
use owo_colors::OwoColorize;
use serde_json::Value;

use crate::api::{Api, NewUserForm};

/// Fields that can carry a user's login, in preference order.
const USER_LOGIN_FIELDS: &[&str] = &["login", "userName", "username", "email"];

#[derive(clap::Subcommand)]
pub enum UsersCommand {
    /// List roster members
    List {
        /// artist, director or worker
        #[arg(long)]
        role: Option<String>,
    },
    /// Add a roster member
    Add(NewUserArgs),
    /// Remove a roster member by login
    Remove { login: String },
}

#[derive(clap::Args)]
pub struct NewUserArgs {
    pub login: String,

    #[arg(long)]
    pub password: String,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub surname: String,

    #[arg(long)]
    pub last_name: String,

    /// Years of experience
    #[arg(long, default_value = "0")]
    pub experience: String,

    /// artist, director or worker
    #[arg(long)]
    pub role: String,

    /// Profile photo to upload
    #[arg(long)]
    pub photo: Option<PathBuf>,
}

pub async fn run(api: Api, command: UsersCommand) -> Result<()> {
    match command {
        UsersCommand::List { role } => list(api, role.as_deref()).await,
        UsersCommand::Add(args) => add(api, args).await,
        UsersCommand::Remove { login } => remove(api, &login).await,
    }
}

async fn list(api: Api, role: Option<&str>) -> Result<()> {
    let users = api.get_users(role).await?;
    if users.is_empty() {
        println!("{}", "Нет пользователей".dimmed());
        return Ok(());
    }

    for user in &users {
        let login = user_login(user).unwrap_or_else(|| "?".to_string());
        println!("{}  {}", login.bold(), full_name(user));
    }
    Ok(())
}

async fn add(api: Api, args: NewUserArgs) -> Result<()> {
    let created = api
        .create_user(&NewUserForm {
            login: args.login,
            password: args.password,
            name: args.name,
            surname: args.surname,
            last_name: args.last_name,
            experience: args.experience,
            role: args.role,
            photo: args.photo,
        })
        .await?;

    match user_login(&created) {
        Some(login) => println!("Пользователь {login} создан"),
        None => println!("Пользователь создан"),
    }
    Ok(())
}

async fn remove(api: Api, login: &str) -> Result<()> {
    api.delete_user(login).await?;
    println!("Пользователь {login} удалён");
    Ok(())
}

fn user_login(user: &Value) -> Option<String> {
    resolve_first(user, USER_LOGIN_FIELDS).and_then(|v| scalar_string(v))
}

fn full_name(user: &Value) -> String {
    ["name", "surname", "lastName"]
        .iter()
        .filter_map(|field| user.get(*field).and_then(Value::as_str))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
