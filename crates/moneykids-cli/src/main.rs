//! MoneyKids CLI - Allowance tracker for families
//!
//! Usage:
//!   moneykids init                          Initialize database
//!   moneykids users add Hana                Add a child
//!   moneykids balance deposit 1 500         Pay pocket money
//!   moneykids project --monthly 1000 --rate 3 --years 10
//!   moneykids serve --port 3000             Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                no_auth,
                cli.no_encrypt,
                static_dir.as_deref(),
            )
            .await
        }
        Commands::Users { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(UsersAction::List) => commands::cmd_users_list(&db),
                Some(UsersAction::Add { name, role }) => commands::cmd_users_add(&db, &name, &role),
                Some(UsersAction::Remove { id }) => commands::cmd_users_remove(&db, id),
            }
        }
        Commands::Balance { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                BalanceAction::Show { user } => commands::cmd_balance_show(&db, user),
                BalanceAction::Deposit {
                    user,
                    amount,
                    description,
                } => commands::cmd_balance_deposit(&db, user, amount, description.as_deref()),
                BalanceAction::Withdraw {
                    user,
                    amount,
                    description,
                } => commands::cmd_balance_withdraw(&db, user, amount, description.as_deref()),
                BalanceAction::History { user, limit } => {
                    commands::cmd_balance_history(&db, user, limit)
                }
                BalanceAction::Goal { user, amount } => {
                    commands::cmd_balance_goal(&db, user, amount)
                }
                BalanceAction::Forecast { user, days } => {
                    commands::cmd_balance_forecast(&db, user, days)
                }
            }
        }
        Commands::Tasks { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None => commands::cmd_tasks_list(&db, None, None),
                Some(TasksAction::List { user, status }) => {
                    commands::cmd_tasks_list(&db, user, status.as_deref())
                }
                Some(TasksAction::Add {
                    user,
                    title,
                    reward,
                    frequency,
                    description,
                }) => commands::cmd_tasks_add(
                    &db,
                    user,
                    &title,
                    reward,
                    &frequency,
                    description.as_deref(),
                ),
                Some(TasksAction::Quest {
                    user,
                    title,
                    reward,
                    difficulty,
                    deadline,
                    description,
                }) => commands::cmd_tasks_quest(
                    &db,
                    user,
                    &title,
                    reward,
                    &difficulty,
                    deadline.as_deref(),
                    description.as_deref(),
                ),
                Some(TasksAction::Accept { id }) => commands::cmd_tasks_accept(&db, id),
                Some(TasksAction::Complete { id }) => commands::cmd_tasks_complete(&db, id),
                Some(TasksAction::Cancel { id }) => commands::cmd_tasks_cancel(&db, id),
                Some(TasksAction::Remove { id }) => commands::cmd_tasks_remove(&db, id),
            }
        }
        Commands::Wishlist { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                WishlistAction::List { user } => commands::cmd_wishlist_list(&db, user),
                WishlistAction::Add {
                    user,
                    name,
                    price,
                    url,
                } => commands::cmd_wishlist_add(&db, user, &name, price, url.as_deref()),
                WishlistAction::Move { user, from, to } => {
                    commands::cmd_wishlist_move(&db, user, from, to)
                }
                WishlistAction::Remove { id } => commands::cmd_wishlist_remove(&db, id),
                WishlistAction::Progress {
                    user,
                    monthly,
                    rate,
                } => commands::cmd_wishlist_progress(&db, user, monthly, rate),
            }
        }
        Commands::Project {
            principal,
            monthly,
            rate,
            years,
            json,
        } => commands::cmd_project(principal, monthly, rate, years, json),
    }
}
