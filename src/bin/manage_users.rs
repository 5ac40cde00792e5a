//! CLI tool to manage login accounts.
//!
//! Usage:
//!   cargo run --bin manage-users -- add --username <name> --password <password>
//!   cargo run --bin manage-users -- list
//!   cargo run --bin manage-users -- passwd --username <name> --password <password>

use std::env;

use sheet_store_lib::config::Config;
use sheet_store_lib::db::DbPool;
use sheet_store_lib::services::auth;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let command = &args[1];

    if matches!(command.as_str(), "help" | "--help" | "-h") {
        print_usage();
        return;
    }

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match DbPool::new(&config).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error connecting to database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = pool.run_migrations().await {
        eprintln!("Error running migrations: {}", e);
        std::process::exit(1);
    }

    match command.as_str() {
        "add" => {
            let username = parse_flag(&args, "--username", "-u");
            let password = parse_flag(&args, "--password", "-p");
            add_user(&pool, &username, &password).await;
        }
        "list" | "ls" => list_users(&pool).await,
        "passwd" => {
            let username = parse_flag(&args, "--username", "-u");
            let password = parse_flag(&args, "--password", "-p");
            reset_password(&pool, &username, &password).await;
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            std::process::exit(1);
        }
    }

    if let Err(e) = pool.close().await {
        eprintln!("Warning: {}", e);
    }
}

fn parse_flag(args: &[String], long: &str, short: &str) -> String {
    let mut i = 2;
    while i < args.len() {
        if (args[i] == long || args[i] == short) && i + 1 < args.len() {
            return args[i + 1].clone();
        }
        i += 1;
    }
    eprintln!("Error: {} is required", long);
    std::process::exit(1);
}

async fn add_user(pool: &DbPool, username: &str, password: &str) {
    match auth::create_user(pool, username, password).await {
        Ok(user) => {
            println!("User '{}' created (id {}).", user.username, user.id);
        }
        Err(e) => {
            eprintln!("Error creating user: {}", e);
            std::process::exit(1);
        }
    }
}

async fn list_users(pool: &DbPool) {
    let users = match auth::list_users(pool).await {
        Ok(u) => u,
        Err(e) => {
            eprintln!("Error listing users: {}", e);
            std::process::exit(1);
        }
    };

    if users.is_empty() {
        println!("No users found.");
        return;
    }

    println!();
    println!("{:<8} {:<32} {:<25}", "ID", "USERNAME", "CREATED");
    println!("{}", "-".repeat(65));

    for user in users {
        let username = if user.username.chars().count() > 30 {
            format!("{}...", user.username.chars().take(27).collect::<String>())
        } else {
            user.username.clone()
        };

        println!(
            "{:<8} {:<32} {:<25}",
            user.id,
            username,
            user.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    println!();
}

async fn reset_password(pool: &DbPool, username: &str, password: &str) {
    match auth::reset_password(pool, username, password).await {
        Ok(true) => {
            println!("Password for '{}' updated.", username);
        }
        Ok(false) => {
            eprintln!("User '{}' not found.", username);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error updating password: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!();
    eprintln!("Usage: manage-users <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  add --username <u> --password <p>     Create a login account");
    eprintln!("  list, ls                              List all accounts");
    eprintln!("  passwd --username <u> --password <p>  Reset an account's password");
    eprintln!("  help                                  Show this help");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  manage-users add --username alice --password 'correct horse battery'");
    eprintln!("  manage-users passwd -u alice -p 'new long password'");
    eprintln!();
}
