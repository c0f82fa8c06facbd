//! Five-question form behind onboarding and "edit stats"
//!
//! Numeric answers accept digits and a single decimal separator, either '.'
//! or ','. Values are parsed but never range-checked.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::i18n::Language;
use crate::profile::UserProgressSnapshot;

/// Number of questions
pub const STEP_COUNT: usize = 5;

const DAILY_COUNT: usize = 0;
const UNIT_PRICE: usize = 1;
const PACK_SIZE: usize = 2;
const GOAL_LABEL: usize = 3;
const GOAL_COST: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("\"{0}\" is not a number")]
    InvalidNumber(String),

    #[error("please enter a goal")]
    EmptyGoal,
}

/// Result of confirming a step
#[derive(Debug, Clone, PartialEq)]
pub enum FormStep {
    /// Moved to the next question
    Continue,
    /// Last question answered; the record to save
    Done(UserProgressSnapshot),
}

/// In-progress answers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingForm {
    step: usize,
    fields: [String; STEP_COUNT],
    currency_symbol: String,
    /// Set when editing; the quit timestamp survives the edit
    quit_since: Option<DateTime<Utc>>,
}

impl OnboardingForm {
    /// Blank form with the usual defaults
    pub fn new(language: Language) -> Self {
        Self {
            step: 0,
            fields: [
                "20".to_string(),
                "6.00".to_string(),
                "20".to_string(),
                String::new(),
                "1000".to_string(),
            ],
            currency_symbol: language.default_currency().to_string(),
            quit_since: None,
        }
    }

    /// Form prefilled from an existing record
    pub fn for_edit(snapshot: &UserProgressSnapshot) -> Self {
        Self {
            step: 0,
            fields: [
                snapshot.daily_count.to_string(),
                snapshot.unit_price.to_string(),
                snapshot.pack_size.to_string(),
                snapshot.goal_label.clone(),
                snapshot.goal_cost.to_string(),
            ],
            currency_symbol: snapshot.currency_symbol.clone(),
            quit_since: Some(snapshot.quit_since),
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn is_editing(&self) -> bool {
        self.quit_since.is_some()
    }

    /// Answer being typed for the current question
    pub fn input(&self) -> &str {
        &self.fields[self.step]
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    /// Whether the current question expects a number
    pub fn is_numeric_step(&self) -> bool {
        self.step != GOAL_LABEL
    }

    /// Whether the current answer is an amount of money
    pub fn is_money_step(&self) -> bool {
        matches!(self.step, UNIT_PRICE | GOAL_COST)
    }

    /// Append a typed character; returns false if it was rejected
    pub fn push_char(&mut self, c: char) -> bool {
        let numeric = self.is_numeric_step();
        let field = &mut self.fields[self.step];
        let accepted = if numeric {
            c.is_ascii_digit() || (is_separator(c) && !field.chars().any(is_separator))
        } else {
            !c.is_control()
        };
        if accepted {
            field.push(c);
        }
        accepted
    }

    /// Append pasted text, keeping only what `push_char` accepts
    pub fn push_str(&mut self, text: &str) {
        for c in text.chars() {
            self.push_char(c);
        }
    }

    pub fn backspace(&mut self) {
        self.fields[self.step].pop();
    }

    /// Go back one question; returns false on the first one
    pub fn back(&mut self) -> bool {
        if self.step == 0 {
            return false;
        }
        self.step -= 1;
        true
    }

    /// Validate the current answer and move on
    ///
    /// On the last question every answer is parsed and the snapshot is built.
    /// New profiles start counting at `now`; edits keep their quit timestamp.
    pub fn next(&mut self, now: DateTime<Utc>) -> Result<FormStep, FormError> {
        self.validate(self.step)?;
        if self.step + 1 < STEP_COUNT {
            self.step += 1;
            return Ok(FormStep::Continue);
        }

        let snapshot = UserProgressSnapshot {
            quit_since: self.quit_since.unwrap_or(now),
            daily_count: parse_number(&self.fields[DAILY_COUNT])?,
            unit_price: parse_number(&self.fields[UNIT_PRICE])?,
            pack_size: parse_number(&self.fields[PACK_SIZE])?,
            goal_label: self.fields[GOAL_LABEL].trim().to_string(),
            goal_cost: parse_number(&self.fields[GOAL_COST])?,
            currency_symbol: self.currency_symbol.clone(),
        };
        Ok(FormStep::Done(snapshot))
    }

    fn validate(&self, step: usize) -> Result<(), FormError> {
        if step == GOAL_LABEL {
            if self.fields[step].trim().is_empty() {
                return Err(FormError::EmptyGoal);
            }
            return Ok(());
        }
        parse_number(&self.fields[step]).map(|_| ())
    }
}

fn is_separator(c: char) -> bool {
    c == '.' || c == ','
}

/// Parse a number typed with either decimal separator
pub fn parse_number(text: &str) -> Result<f64, FormError> {
    text.trim()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| FormError::InvalidNumber(text.to_string()))
}
