use thiserror::Error;

/// Baseline intake in millilitres per kilogram of body weight.
pub const BASE_ML_PER_KG: f64 = 35.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoalError {
    #[error("weight must be a positive number")]
    InvalidWeight,
    #[error("Invalid value for activity, please try again")]
    InvalidActivity(i64),
    #[error("Invalid value for age, please try again")]
    InvalidAge(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Sedentary => 1.0,
            Self::Light => 1.17,
            Self::Moderate => 1.33,
            Self::Active => 1.5,
            Self::VeryActive => 1.67,
        }
    }
}

impl TryFrom<i64> for ActivityLevel {
    type Error = GoalError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Sedentary),
            2 => Ok(Self::Light),
            3 => Ok(Self::Moderate),
            4 => Ok(Self::Active),
            5 => Ok(Self::VeryActive),
            other => Err(GoalError::InvalidActivity(other)),
        }
    }
}

/// Age groups offered by the goal form, youngest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBracket {
    Young,
    Adult,
    MiddleAged,
    Senior,
}

impl AgeBracket {
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Young => 1.05,
            Self::Adult => 1.0,
            Self::MiddleAged => 0.95,
            Self::Senior => 0.9,
        }
    }
}

impl TryFrom<i64> for AgeBracket {
    type Error = GoalError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Young),
            2 => Ok(Self::Adult),
            3 => Ok(Self::MiddleAged),
            4 => Ok(Self::Senior),
            other => Err(GoalError::InvalidAge(other)),
        }
    }
}

/// Daily target volume in millilitres.
pub fn compute_goal(weight_kg: f64, activity: i64, age: i64) -> Result<f64, GoalError> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(GoalError::InvalidWeight);
    }
    let activity = ActivityLevel::try_from(activity)?;
    let age = AgeBracket::try_from(age)?;

    Ok(weight_kg * BASE_ML_PER_KG * activity.multiplier() * age.multiplier())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_for_moderate_adult() {
        let goal = compute_goal(70.0, 3, 2).unwrap();
        assert!((goal - 70.0 * 35.0 * 1.33 * 1.0).abs() < 1e-9);
        assert!((goal - 3258.5).abs() < 1e-6);
    }

    #[test]
    fn goal_is_positive_for_every_valid_combination() {
        for activity in 1..=5 {
            for age in 1..=4 {
                let first = compute_goal(55.5, activity, age).unwrap();
                let second = compute_goal(55.5, activity, age).unwrap();
                assert!(first > 0.0);
                assert_eq!(first.to_bits(), second.to_bits());
            }
        }
    }

    #[test]
    fn goal_rejects_bad_weight() {
        assert_eq!(compute_goal(0.0, 1, 1), Err(GoalError::InvalidWeight));
        assert_eq!(compute_goal(-3.0, 1, 1), Err(GoalError::InvalidWeight));
        assert_eq!(compute_goal(f64::NAN, 1, 1), Err(GoalError::InvalidWeight));
        assert_eq!(compute_goal(f64::INFINITY, 1, 1), Err(GoalError::InvalidWeight));
    }

    #[test]
    fn goal_rejects_out_of_range_levels() {
        assert_eq!(compute_goal(70.0, 0, 2), Err(GoalError::InvalidActivity(0)));
        assert_eq!(compute_goal(70.0, 6, 2), Err(GoalError::InvalidActivity(6)));
        assert_eq!(compute_goal(70.0, 3, 0), Err(GoalError::InvalidAge(0)));
        assert_eq!(compute_goal(70.0, 3, 5), Err(GoalError::InvalidAge(5)));
    }

    #[test]
    fn extremes_of_the_tables() {
        let most = compute_goal(100.0, 5, 1).unwrap();
        let least = compute_goal(100.0, 1, 4).unwrap();
        assert!((most - 100.0 * 35.0 * 1.67 * 1.05).abs() < 1e-9);
        assert!((least - 100.0 * 35.0 * 0.9).abs() < 1e-9);
    }
}
