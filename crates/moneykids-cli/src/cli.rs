//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// MoneyKids - Pocket money, chores and savings goals for the family
#[derive(Parser)]
#[command(name = "moneykids")]
#[command(about = "Self-hosted allowance tracker with savings projections", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "moneykids.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set MONEYKIDS_DB_KEY environment variable with your passphrase.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Show database status (encryption, size, counts)
    Status,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        #[arg(long)]
        no_auth: bool,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Manage household members
    Users {
        #[command(subcommand)]
        action: Option<UsersAction>,
    },

    /// Balance, deposits, withdrawals and savings goal
    Balance {
        #[command(subcommand)]
        action: BalanceAction,
    },

    /// Manage chores and quests
    Tasks {
        #[command(subcommand)]
        action: Option<TasksAction>,
    },

    /// Manage wishlists
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },

    /// Project savings growth year by year
    Project {
        /// Starting balance
        #[arg(long, default_value = "0")]
        principal: f64,

        /// Amount saved at the end of every month
        #[arg(long, default_value = "0")]
        monthly: f64,

        /// Annual interest rate in percent (3 = 3%)
        #[arg(long, default_value = "0")]
        rate: f64,

        /// Number of years to project
        #[arg(long, default_value = "10")]
        years: u32,

        /// Print the series as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// List users
    List,

    /// Add a user
    Add {
        /// Display name
        name: String,

        /// Role: parent or child
        #[arg(short, long, default_value = "child")]
        role: String,
    },

    /// Remove a user and all of their data
    Remove {
        /// User ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum BalanceAction {
    /// Show balance and goal progress
    Show {
        /// User ID
        user: i64,
    },

    /// Pay money in
    Deposit {
        /// User ID
        user: i64,

        /// Amount to deposit
        amount: f64,

        /// Note for the transaction
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Take money out
    Withdraw {
        /// User ID
        user: i64,

        /// Amount to withdraw
        amount: f64,

        /// Note for the transaction
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Show recent transactions
    History {
        /// User ID
        user: i64,

        /// Maximum number of transactions
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Set the savings goal (omit the amount to clear it)
    Goal {
        /// User ID
        user: i64,

        /// Goal amount
        amount: Option<f64>,
    },

    /// Forecast the balance from the last 30 days of activity
    Forecast {
        /// User ID
        user: i64,

        /// Number of days to forecast
        #[arg(long, default_value = "30")]
        days: u32,
    },
}

#[derive(Subcommand)]
pub enum TasksAction {
    /// List tasks
    List {
        /// Only tasks for this user
        user: Option<i64>,

        /// Only tasks with this status (pending, in_progress, completed, cancelled)
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Add a recurring chore
    Add {
        /// User ID
        user: i64,

        /// Chore title
        title: String,

        /// Reward paid on completion
        #[arg(short, long, default_value = "0")]
        reward: f64,

        /// Frequency: daily, weekly, monthly, one_time
        #[arg(short, long, default_value = "weekly")]
        frequency: String,

        /// Longer description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Add a one-off quest
    Quest {
        /// User ID
        user: i64,

        /// Quest title
        title: String,

        /// Reward paid on completion
        #[arg(short, long, default_value = "0")]
        reward: f64,

        /// Difficulty: easy, medium, hard
        #[arg(long, default_value = "medium")]
        difficulty: String,

        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,

        /// Longer description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Accept a pending quest
    Accept {
        /// Task ID
        id: i64,
    },

    /// Complete a task and pay its reward
    Complete {
        /// Task ID
        id: i64,
    },

    /// Cancel a task
    Cancel {
        /// Task ID
        id: i64,
    },

    /// Delete a task
    Remove {
        /// Task ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum WishlistAction {
    /// Show a user's wishlist in priority order
    List {
        /// User ID
        user: i64,
    },

    /// Add an item at the bottom of the list
    Add {
        /// User ID
        user: i64,

        /// Item name
        name: String,

        /// Price
        price: f64,

        /// Link to the item
        #[arg(long)]
        url: Option<String>,
    },

    /// Move an item from one priority to another
    Move {
        /// User ID
        user: i64,

        /// Current priority (1 = top)
        from: usize,

        /// New priority
        to: usize,
    },

    /// Remove an item
    Remove {
        /// Item ID
        id: i64,
    },

    /// Show how close each item is
    Progress {
        /// User ID
        user: i64,

        /// Planned monthly savings
        #[arg(long, default_value = "0")]
        monthly: f64,

        /// Annual interest rate in percent
        #[arg(long, default_value = "0")]
        rate: f64,
    },
}
