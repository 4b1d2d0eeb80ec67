//! Domain models for MoneyKids

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum length of a task title
pub const MAX_TITLE_LEN: usize = 100;

/// Maximum length of a task description
pub const MAX_TASK_DESCRIPTION_LEN: usize = 500;

/// Maximum length of a transaction description
pub const MAX_TRANSACTION_DESCRIPTION_LEN: usize = 200;

/// Maximum length of a wishlist item name
pub const MAX_WISHLIST_NAME_LEN: usize = 100;

// ============================================================================
// Users
// ============================================================================

/// A household member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Parent,
    #[default]
    Child,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parent => "parent",
            Self::Child => "child",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "parent" => Ok(Self::Parent),
            "child" | "kid" => Ok(Self::Child),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Balance and transactions
// ============================================================================

/// Kind of money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Pocket money paid in
    Deposit,
    /// Money taken out
    Withdrawal,
    /// Reward for a regular chore
    Reward,
    /// Reward for a finished quest
    Quest,
    /// Paid job outside the chore list
    Job,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Reward => "reward",
            Self::Quest => "quest",
            Self::Job => "job",
        }
    }

    /// Whether this type adds to the balance
    pub fn is_credit(&self) -> bool {
        !matches!(self, Self::Withdrawal)
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "deposit" => Ok(Self::Deposit),
            "withdrawal" | "withdraw" => Ok(Self::Withdrawal),
            "reward" => Ok(Self::Reward),
            "quest" => Ok(Self::Quest),
            "job" | "work" => Ok(Self::Job),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded money movement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    /// Always positive; direction comes from `transaction_type`
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub description: Option<String>,
    /// Task that paid this reward, if any
    pub task_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Amount with sign applied (negative for withdrawals)
    pub fn signed_amount(&self) -> f64 {
        if self.transaction_type.is_credit() {
            self.amount
        } else {
            -self.amount
        }
    }
}

/// A transaction to be recorded (before DB insertion)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub amount: f64,
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewTransaction {
    pub fn deposit(amount: f64, description: Option<&str>) -> Self {
        Self {
            amount,
            transaction_type: TransactionType::Deposit,
            description: description.map(str::to_string),
        }
    }

    pub fn withdrawal(amount: f64, description: Option<&str>) -> Self {
        Self {
            amount,
            transaction_type: TransactionType::Withdrawal,
            description: description.map(str::to_string),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::InvalidData(
                "Amount must be greater than zero".to_string(),
            ));
        }
        if let Some(desc) = &self.description {
            if desc.chars().count() > MAX_TRANSACTION_DESCRIPTION_LEN {
                return Err(Error::InvalidData(format!(
                    "Description must be at most {} characters",
                    MAX_TRANSACTION_DESCRIPTION_LEN
                )));
            }
        }
        Ok(())
    }
}

/// Stored balance for a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balance {
    pub user_id: i64,
    pub current_amount: f64,
    pub savings_goal: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

/// Balance with the latest activity and goal progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub user_id: i64,
    pub current_balance: f64,
    pub last_transaction_amount: Option<f64>,
    pub last_transaction_type: Option<TransactionType>,
    pub last_transaction_date: Option<DateTime<Utc>>,
    pub savings_goal: Option<f64>,
    /// Percent of the savings goal reached, capped at 100
    pub achievement_rate: Option<f64>,
}

/// Percent of `goal` covered by `balance`, capped to 0..=100.
///
/// `None` when there is no positive goal.
pub fn achievement_rate(balance: f64, goal: Option<f64>) -> Option<f64> {
    match goal {
        Some(goal) if goal > 0.0 => Some((balance / goal * 100.0).clamp(0.0, 100.0)),
        _ => None,
    }
}

/// One day of a linear balance forecast
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_amount: f64,
}

// ============================================================================
// Tasks
// ============================================================================

/// Whether a task is a recurring chore or a one-off quest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Regular,
    Quest,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Quest => "quest",
        }
    }

    /// Transaction type used when this kind of task pays out
    pub fn reward_type(&self) -> TransactionType {
        match self {
            Self::Regular => TransactionType::Reward,
            Self::Quest => TransactionType::Quest,
        }
    }
}

impl std::str::FromStr for TaskKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "regular" | "chore" => Ok(Self::Regular),
            "quest" => Ok(Self::Quest),
            _ => Err(format!("Unknown task kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How often a regular chore repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskFrequency {
    Daily,
    Weekly,
    Monthly,
    OneTime,
}

impl TaskFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::OneTime => "one_time",
        }
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self, Self::OneTime)
    }
}

impl std::str::FromStr for TaskFrequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "one_time" | "onetime" | "once" => Ok(Self::OneTime),
            _ => Err(format!("Unknown frequency: {}", s)),
        }
    }
}

impl std::fmt::Display for TaskFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Quest difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(format!("Unknown difficulty: {}", s)),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Task lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Allowed moves: pending -> in_progress -> completed, pending -> completed,
    /// and any open status -> cancelled.
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::InProgress)
                | (Self::Pending, Self::Completed)
                | (Self::InProgress, Self::Completed)
                | (Self::Pending, Self::Cancelled)
                | (Self::InProgress, Self::Cancelled)
        )
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" | "not_started" | "available" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown task status: {}", s)),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A chore or quest assigned to a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub reward: f64,
    pub kind: TaskKind,
    /// Set for regular chores
    pub frequency: Option<TaskFrequency>,
    /// Set for quests
    pub difficulty: Option<Difficulty>,
    pub status: TaskStatus,
    /// Quest progress in percent (0-100)
    pub progress: u8,
    pub deadline: Option<DateTime<Utc>>,
    /// How many times this task has been completed
    pub completion_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A task to be created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub user_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub reward: f64,
    pub kind: TaskKind,
    #[serde(default)]
    pub frequency: Option<TaskFrequency>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

impl NewTask {
    /// A recurring chore
    pub fn regular(user_id: i64, title: &str, reward: f64, frequency: TaskFrequency) -> Self {
        Self {
            user_id,
            title: title.to_string(),
            description: None,
            reward,
            kind: TaskKind::Regular,
            frequency: Some(frequency),
            difficulty: None,
            deadline: None,
        }
    }

    /// A one-off quest
    pub fn quest(user_id: i64, title: &str, reward: f64, difficulty: Difficulty) -> Self {
        Self {
            user_id,
            title: title.to_string(),
            description: None,
            reward,
            kind: TaskKind::Quest,
            frequency: None,
            difficulty: Some(difficulty),
            deadline: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)?;
        validate_task_description(self.description.as_deref())?;
        validate_reward(self.reward)?;

        match self.kind {
            TaskKind::Regular => {
                if self.frequency.is_none() {
                    return Err(Error::InvalidData(
                        "Regular tasks need a frequency".to_string(),
                    ));
                }
                if self.difficulty.is_some() {
                    return Err(Error::InvalidData(
                        "Difficulty only applies to quests".to_string(),
                    ));
                }
            }
            TaskKind::Quest => {
                if self.difficulty.is_none() {
                    return Err(Error::InvalidData("Quests need a difficulty".to_string()));
                }
                if self.frequency.is_some() {
                    return Err(Error::InvalidData(
                        "Frequency only applies to regular tasks".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Partial update for a task; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reward: Option<f64>,
    #[serde(default)]
    pub frequency: Option<TaskFrequency>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

impl TaskUpdate {
    /// Validate the fields being changed against the task's kind
    pub fn validate(&self, kind: TaskKind) -> Result<()> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        validate_task_description(self.description.as_deref())?;
        if let Some(reward) = self.reward {
            validate_reward(reward)?;
        }
        if kind == TaskKind::Regular && self.difficulty.is_some() {
            return Err(Error::InvalidData(
                "Difficulty only applies to quests".to_string(),
            ));
        }
        if kind == TaskKind::Quest && self.frequency.is_some() {
            return Err(Error::InvalidData(
                "Frequency only applies to regular tasks".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<()> {
    let len = title.trim().chars().count();
    if len == 0 || len > MAX_TITLE_LEN {
        return Err(Error::InvalidData(format!(
            "Title must be between 1 and {} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(())
}

fn validate_task_description(description: Option<&str>) -> Result<()> {
    if let Some(desc) = description {
        if desc.chars().count() > MAX_TASK_DESCRIPTION_LEN {
            return Err(Error::InvalidData(format!(
                "Description must be at most {} characters",
                MAX_TASK_DESCRIPTION_LEN
            )));
        }
    }
    Ok(())
}

fn validate_reward(reward: f64) -> Result<()> {
    if !reward.is_finite() || reward < 0.0 {
        return Err(Error::InvalidData(
            "Reward must be zero or more".to_string(),
        ));
    }
    Ok(())
}

/// Result of completing a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCompletion {
    pub task: Task,
    /// Reward transaction, absent for zero-reward tasks
    pub transaction: Option<Transaction>,
    pub balance: f64,
}

// ============================================================================
// Wishlist
// ============================================================================

/// Something a user is saving up for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub price: f64,
    /// 1-based position in the user's list
    pub priority: i64,
    pub url: Option<String>,
    pub description: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A wishlist item to be added
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWishlistItem {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
}

impl NewWishlistItem {
    pub fn new(name: &str, price: f64) -> Self {
        Self {
            name: name.to_string(),
            price,
            url: None,
            description: None,
            target_date: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_wishlist_name(&self.name)?;
        validate_price(self.price)
    }
}

/// Partial update for a wishlist item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WishlistItemUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
}

impl WishlistItemUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_wishlist_name(name)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(())
    }
}

fn validate_wishlist_name(name: &str) -> Result<()> {
    let len = name.trim().chars().count();
    if len == 0 || len > MAX_WISHLIST_NAME_LEN {
        return Err(Error::InvalidData(format!(
            "Name must be between 1 and {} characters",
            MAX_WISHLIST_NAME_LEN
        )));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(Error::InvalidData("Price must be zero or more".to_string()));
    }
    Ok(())
}

/// Savings progress toward one wishlist item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistProgress {
    pub item_id: i64,
    pub name: String,
    pub price: f64,
    pub priority: i64,
    /// Percent of the price covered by the current balance (0-100)
    pub progress_percent: f64,
    /// Amount still missing
    pub remaining: f64,
    /// Months of saving until the balance covers the price, if reachable
    pub months_to_afford: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_round_trip_names() {
        for t in [
            TransactionType::Deposit,
            TransactionType::Withdrawal,
            TransactionType::Reward,
            TransactionType::Quest,
            TransactionType::Job,
        ] {
            assert_eq!(t.as_str().parse::<TransactionType>().unwrap(), t);
        }
        assert_eq!(
            "work".parse::<TransactionType>().unwrap(),
            TransactionType::Job
        );
        assert!("refund".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_only_withdrawal_is_debit() {
        assert!(TransactionType::Deposit.is_credit());
        assert!(TransactionType::Reward.is_credit());
        assert!(TransactionType::Quest.is_credit());
        assert!(TransactionType::Job.is_credit());
        assert!(!TransactionType::Withdrawal.is_credit());
    }

    #[test]
    fn test_new_transaction_validation() {
        assert!(NewTransaction::deposit(10.0, None).validate().is_ok());
        assert!(NewTransaction::deposit(0.0, None).validate().is_err());
        assert!(NewTransaction::deposit(-5.0, None).validate().is_err());
        assert!(NewTransaction::deposit(f64::NAN, None).validate().is_err());

        let long = "x".repeat(MAX_TRANSACTION_DESCRIPTION_LEN + 1);
        assert!(NewTransaction::deposit(1.0, Some(&long)).validate().is_err());
    }

    #[test]
    fn test_task_status_transitions() {
        use TaskStatus::*;
        assert!(Pending.can_transition_to(InProgress));
        assert!(Pending.can_transition_to(Completed));
        assert!(InProgress.can_transition_to(Completed));
        assert!(InProgress.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(InProgress));
        assert!(!InProgress.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_task_status_serde_names() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        assert_eq!(
            "not_started".parse::<TaskStatus>().unwrap(),
            TaskStatus::Pending
        );
    }

    #[test]
    fn test_new_task_validation() {
        assert!(NewTask::regular(1, "Feed the cat", 50.0, TaskFrequency::Daily)
            .validate()
            .is_ok());
        assert!(NewTask::quest(1, "Read a book", 500.0, Difficulty::Hard)
            .validate()
            .is_ok());

        assert!(NewTask::regular(1, "  ", 50.0, TaskFrequency::Daily)
            .validate()
            .is_err());
        assert!(NewTask::regular(1, "Dishes", -1.0, TaskFrequency::Daily)
            .validate()
            .is_err());

        let mut quest = NewTask::quest(1, "Garden", 100.0, Difficulty::Easy);
        quest.frequency = Some(TaskFrequency::Weekly);
        assert!(quest.validate().is_err());

        let mut chore = NewTask::regular(1, "Bins", 10.0, TaskFrequency::Weekly);
        chore.frequency = None;
        assert!(chore.validate().is_err());
    }

    #[test]
    fn test_task_update_validation() {
        let update = TaskUpdate {
            difficulty: Some(Difficulty::Hard),
            ..Default::default()
        };
        assert!(update.validate(TaskKind::Regular).is_err());
        assert!(update.validate(TaskKind::Quest).is_ok());

        let update = TaskUpdate {
            title: Some("x".repeat(MAX_TITLE_LEN + 1)),
            ..Default::default()
        };
        assert!(update.validate(TaskKind::Quest).is_err());
    }

    #[test]
    fn test_achievement_rate() {
        assert_eq!(achievement_rate(50.0, Some(200.0)), Some(25.0));
        assert_eq!(achievement_rate(500.0, Some(200.0)), Some(100.0));
        assert_eq!(achievement_rate(50.0, Some(0.0)), None);
        assert_eq!(achievement_rate(50.0, None), None);
    }

    #[test]
    fn test_wishlist_validation() {
        assert!(NewWishlistItem::new("Bike", 12000.0).validate().is_ok());
        assert!(NewWishlistItem::new("", 10.0).validate().is_err());
        assert!(NewWishlistItem::new("Bike", -1.0).validate().is_err());
    }
}
