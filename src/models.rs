use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub daily_goal: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct AddWaterRequest {
    pub amount: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddWaterResponse {
    pub updated_current: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResetWaterResponse {
    pub reset_current: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodayResponse {
    pub date: String,
    pub current: f64,
    pub goal: Option<f64>,
}

/// Raw form fields; empty or missing inputs are validated by the handlers.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirmation: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct GoalForm {
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub activity: String,
    #[serde(default)]
    pub age: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryDay {
    pub date: String,
    pub current: f64,
    pub percent: f64,
    pub goal_met: bool,
}

#[derive(Debug, Serialize)]
pub struct HistoryMonth {
    pub label: String,
    pub days: Vec<HistoryDay>,
}

#[derive(Debug, Serialize)]
pub struct HistoryView {
    pub goal: f64,
    pub start_date: String,
    pub end_date: String,
    pub months: Vec<HistoryMonth>,
}
