//! A planning session: the loaded rules plus the most recent result.
//!
//! The rules are loaded once and never mutated. Each calculation replaces the
//! previous result; a failed calculation clears it so nothing stale can be
//! exported.

use std::path::Path;

use crate::calculator::{calculate_with, BufferStrategy, CalculationInput, CalculationResult};
use crate::error::{LoadError, PlannerError, Result};
use crate::ics::{reminder_event, to_ics, IcsOptions, ReminderKind};
use crate::rules::RuleSet;

/// Where a session reads its platform rules from.
#[derive(Debug, Clone, Copy)]
pub enum RulesSource<'a> {
    /// The rules bundled with the crate.
    Builtin,
    /// A JSON rules file on disk.
    File(&'a Path),
    /// JSON text already in memory.
    Json(&'a str),
}

impl RulesSource<'_> {
    fn load(&self) -> std::result::Result<RuleSet, LoadError> {
        match self {
            RulesSource::Builtin => RuleSet::builtin(),
            RulesSource::File(path) => RuleSet::from_path(path),
            RulesSource::Json(json) => RuleSet::from_json_str(json),
        }
    }
}

#[derive(Debug, Default)]
pub struct Session {
    rules: RuleSet,
    load_error: Option<LoadError>,
    strategy: BufferStrategy,
    last: Option<CalculationResult>,
}

impl Session {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    /// Load rules from `source`. A failed load is logged and kept in
    /// [`Session::load_error`]; the session continues with no platforms.
    pub fn load(source: RulesSource<'_>) -> Self {
        match source.load() {
            Ok(rules) => Self::new(rules),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load platform rules; no platforms available");
                Self {
                    load_error: Some(e),
                    ..Self::default()
                }
            }
        }
    }

    pub fn with_strategy(mut self, strategy: BufferStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn strategy(&self) -> BufferStrategy {
        self.strategy
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn load_error(&self) -> Option<&LoadError> {
        self.load_error.as_ref()
    }

    /// `(key, display name)` pairs for every loaded platform.
    pub fn platforms(&self) -> Vec<(&str, &str)> {
        self.rules.platforms()
    }

    /// Look up the platform, compute the plan, and keep it as the last result.
    ///
    /// # Errors
    /// `PlannerError::InvalidInput` for an unknown platform or bad stay,
    /// `PlannerError::InvalidRule` for a malformed platform record. On error the
    /// previous result is discarded.
    pub fn calculate(&mut self, input: &CalculationInput) -> Result<&CalculationResult> {
        self.last = None;

        let rule = self.rules.get(&input.platform_key)?;
        let result = calculate_with(&rule, input.checkout_date, input.stay_length, self.strategy)?;

        tracing::debug!(platform = %input.platform_key, "stored calculation result");
        Ok(self.last.insert(result))
    }

    pub fn last_result(&self) -> Option<&CalculationResult> {
        self.last.as_ref()
    }

    /// Serialize a reminder for the last result.
    ///
    /// # Errors
    /// `PlannerError::InvalidInput` if nothing has been calculated yet, otherwise
    /// as [`to_ics`].
    pub fn export(&self, kind: ReminderKind, options: &IcsOptions) -> Result<String> {
        let result = self.last.as_ref().ok_or_else(|| {
            PlannerError::InvalidInput("nothing to export; calculate a plan first".to_string())
        })?;
        to_ics(&reminder_event(result, kind), options)
    }
}
