//! Calculator session
//!
//! [`Session`] is the single owner of all calculator state. Every keypad,
//! converter and statistics action is a method that runs to completion and
//! leaves the session consistent:
//!
//! - a successful calculation replaces the expression with the formatted
//!   result, records history and sets the reset flag
//! - a failed calculation leaves the `Error` sentinel, sets the reset flag and
//!   records nothing
//!
//! The reset flag decides whether the next input starts a new expression or
//! continues the current one.

use chrono::Local;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::builtin_functions::{dispatch, Dispatch, ScientificFunction};
use crate::conversion::{self, Conversion, UnitCategory};
use crate::error::{CalcError, Result};
use crate::evaluator::{self, leading_number};
use crate::format::{display_number, format_result};
use crate::history::{export_file_name, Category, History};
use crate::state::{Preferences, SessionStore, Snapshot};
use crate::statistics::{Dataset, Summary};

/// Cleared expression
pub const CLEARED: &str = "0";

/// Terminal failure expression
pub const ERROR: &str = "Error";

/// Characters that end a number when scanning back for a decimal point
const NUMBER_SEPARATORS: &[char] = &['+', '-', '*', '/', '(', ')', '^', '×', '÷', '−'];

/// Physical keyboard key mapped onto a keypad action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Appended through [`Session::input`] as its display symbol
    Input(char),
    Evaluate,
    Clear,
    Backspace,
    Function(ScientificFunction),
}

impl FromStr for Key {
    type Err = CalcError;

    /// Key names as reported by the host (`"7"`, `"*"`, `"Enter"`, `"Escape"`)
    fn from_str(name: &str) -> Result<Self> {
        let key = match name {
            "Enter" | "=" => Self::Evaluate,
            "Escape" | "Delete" => Self::Clear,
            "Backspace" => Self::Backspace,
            "-" => Self::Input('−'),
            "*" => Self::Input('×'),
            "/" => Self::Input('÷'),
            "%" => Self::Function(ScientificFunction::Percent),
            "^" => Self::Function(ScientificFunction::Pow),
            "!" => Self::Function(ScientificFunction::Factorial),
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_digit() || ".+()".contains(c) => {
                        Self::Input(c)
                    },
                    _ => {
                        return Err(CalcError::invalid_input(format!("Unmapped key '{}'", name)));
                    },
                }
            },
        };
        Ok(key)
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    expression: String,
    previous_expression: String,
    reset_on_input: bool,
    memory: f64,
    history: History,
    dataset: Dataset,
    preferences: Preferences,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            expression: CLEARED.to_string(),
            previous_expression: String::new(),
            reset_on_input: false,
            memory: 0.0,
            history: History::new(),
            dataset: Dataset::new(),
            preferences: Preferences::default(),
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from persisted state with a cleared expression
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let Snapshot {
            mut history,
            memory,
            preferences,
        } = snapshot;
        history.trim();
        Self {
            memory: if memory.is_finite() { memory } else { 0.0 },
            history,
            preferences,
            ..Self::default()
        }
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Expression that produced the current result, e.g. `2+3 =`
    pub fn previous_expression(&self) -> &str {
        &self.previous_expression
    }

    pub fn reset_on_input(&self) -> bool {
        self.reset_on_input
    }

    pub fn is_error(&self) -> bool {
        self.expression == ERROR
    }

    pub fn memory(&self) -> f64 {
        self.memory
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn preferences_mut(&mut self) -> &mut Preferences {
        &mut self.preferences
    }

    /// Put the session into the `Error` state and hand the error back
    fn fail(&mut self, err: CalcError) -> CalcError {
        warn!(expression = %self.expression, error = %err, "calculation rejected");
        self.expression = ERROR.to_string();
        self.reset_on_input = true;
        err
    }

    fn current_value(&self) -> Result<f64> {
        leading_number(&self.expression)
            .ok_or_else(|| CalcError::parse(format!("'{}' is not a number", self.expression)))
    }

    // === Keypad ===

    /// Digit, decimal point, operator, parenthesis or constant symbol
    pub fn input(&mut self, token: &str) {
        if token.is_empty() {
            return;
        }

        if self.reset_on_input || self.is_error() {
            self.expression = if token == "." {
                "0.".to_string()
            } else {
                token.to_string()
            };
            self.reset_on_input = false;
            return;
        }

        if self.expression == CLEARED && token != "." {
            self.expression = token.to_string();
            return;
        }

        if token == "." {
            let last_number = self
                .expression
                .rsplit(NUMBER_SEPARATORS)
                .next()
                .unwrap_or_default();
            if last_number.contains('.') {
                return;
            }
        }

        self.expression.push_str(token);
    }

    /// Evaluate the current expression.
    ///
    /// Returns `Ok(None)` without touching state when the expression is the
    /// cleared or `Error` sentinel.
    pub fn evaluate(&mut self) -> Result<Option<String>> {
        if self.expression == CLEARED || self.is_error() {
            return Ok(None);
        }

        match evaluator::evaluate(&self.expression) {
            Ok(result) => {
                self.history
                    .record(self.expression.clone(), result.clone(), Category::Basic);
                self.previous_expression = format!("{} =", self.expression);
                self.expression = result.clone();
                self.reset_on_input = true;
                Ok(Some(result))
            },
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Apply a scientific function to the current value
    pub fn apply_function(&mut self, func: ScientificFunction) -> Result<Dispatch> {
        let value = if func.takes_value() {
            match self.current_value() {
                Ok(value) => value,
                Err(err) => return Err(self.fail(err)),
            }
        } else {
            0.0
        };

        let outcome = match dispatch(func, value) {
            Ok(outcome) => outcome,
            Err(err) => return Err(self.fail(err)),
        };

        match &outcome {
            Dispatch::Computed(result) => {
                self.history
                    .record(result.label.clone(), result.value.clone(), Category::Scientific);
                self.expression = result.value.clone();
                self.reset_on_input = true;
            },
            Dispatch::Constant(constant) => {
                self.expression = constant.clone();
                self.reset_on_input = true;
            },
            Dispatch::AppendOperator(op) => {
                self.expression.push_str(op);
                self.reset_on_input = false;
            },
        }
        Ok(outcome)
    }

    pub fn clear_all(&mut self) {
        self.expression = CLEARED.to_string();
        self.previous_expression.clear();
        self.reset_on_input = false;
    }

    /// Remove the last character; `Error` and single characters clear
    pub fn delete_last(&mut self) {
        if self.is_error() || self.expression.chars().count() <= 1 {
            self.expression = CLEARED.to_string();
            return;
        }
        self.expression.pop();
    }

    // === Memory register ===

    /// MS: store the current value
    pub fn memory_store(&mut self) -> Result<f64> {
        self.memory = self.memory_operand()?;
        Ok(self.memory)
    }

    /// MR: show the stored value
    pub fn memory_recall(&mut self) -> f64 {
        self.expression = format_result(self.memory);
        self.reset_on_input = true;
        self.memory
    }

    /// M+
    pub fn memory_add(&mut self) -> Result<f64> {
        let updated = self.memory + self.memory_operand()?;
        self.set_memory(updated)
    }

    /// M−
    pub fn memory_subtract(&mut self) -> Result<f64> {
        let updated = self.memory - self.memory_operand()?;
        self.set_memory(updated)
    }

    /// The register only ever holds finite values
    fn set_memory(&mut self, value: f64) -> Result<f64> {
        if !value.is_finite() {
            return Err(CalcError::range("Memory value out of range"));
        }
        self.memory = value;
        Ok(value)
    }

    /// MC
    pub fn memory_clear(&mut self) {
        self.memory = 0.0;
    }

    fn memory_operand(&self) -> Result<f64> {
        leading_number(&self.expression)
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                CalcError::invalid_input(format!("'{}' is not a number", self.expression))
            })
    }

    // === Keyboard ===

    /// Route a host key name to its keypad action.
    ///
    /// Returns `Ok(false)` for keys with no mapping, which are ignored.
    pub fn key(&mut self, name: &str) -> Result<bool> {
        let Ok(key) = name.parse::<Key>() else {
            return Ok(false);
        };
        debug!(key = name, action = ?key, "key pressed");
        self.press(key)?;
        Ok(true)
    }

    pub fn press(&mut self, key: Key) -> Result<()> {
        match key {
            Key::Input(c) => {
                let mut buf = [0u8; 4];
                self.input(c.encode_utf8(&mut buf));
            },
            Key::Evaluate => {
                self.evaluate()?;
            },
            Key::Clear => self.clear_all(),
            Key::Backspace => self.delete_last(),
            Key::Function(func) => {
                self.apply_function(func)?;
            },
        }
        Ok(())
    }

    // === Converters ===

    /// Convert an amount typed into the unit converter
    pub fn convert_unit(
        &mut self,
        category: UnitCategory,
        amount: &str,
        from: &str,
        to: &str,
    ) -> Result<Conversion> {
        let value = conversion::parse_amount(amount)?;
        let result = conversion::convert_unit(category, value, from, to)?;
        self.accept_conversion(&result, Category::Unit);
        Ok(result)
    }

    /// Convert an amount typed into the currency converter
    pub fn convert_currency(&mut self, amount: &str, from: &str, to: &str) -> Result<Conversion> {
        let value = conversion::parse_amount(amount)?;
        let result = conversion::convert_currency(value, from, to)?;
        self.accept_conversion(&result, Category::Currency);
        Ok(result)
    }

    fn accept_conversion(&mut self, result: &Conversion, category: Category) {
        self.history
            .record(result.expression.clone(), result.label.clone(), category);
        self.expression = result.display.clone();
        self.reset_on_input = true;
    }

    // === Statistics ===

    /// Add a value to the dataset and return the recomputed summary
    pub fn add_statistic(&mut self, text: &str) -> Result<Summary> {
        let value = leading_number(text)
            .filter(|v| v.is_finite())
            .ok_or_else(|| CalcError::invalid_input("Please enter a valid number"))?;

        let summary = self.dataset.push(value)?.clone();
        self.history.record(
            format!("add {}", display_number(value)),
            summary.describe(),
            Category::Statistical,
        );
        Ok(summary)
    }

    pub fn clear_statistics(&mut self) {
        self.dataset.clear();
    }

    // === History ===

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Write today's history export to the store, returning its file name
    pub fn export_history(&self, store: &dyn SessionStore) -> Result<String> {
        let text = self.history.export_text()?;
        let file_name = export_file_name(Local::now().date_naive());
        store.save_export(&file_name, &text)?;
        info!(file = %file_name, entries = self.history.len(), "history exported");
        Ok(file_name)
    }

    // === Persistence ===

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            history: self.history.clone(),
            memory: self.memory,
            preferences: self.preferences.clone(),
        }
    }

    /// Save history, memory and preferences. Failures are logged only.
    pub fn persist(&self, store: &dyn SessionStore) {
        if let Err(err) = store.save(&self.snapshot()) {
            warn!(error = %err, "Failed to persist session state");
        }
    }

    /// Load saved state, falling back to a fresh session
    pub fn restore(store: &dyn SessionStore) -> Self {
        match store.load() {
            Ok(Some(snapshot)) => Self::from_snapshot(snapshot),
            Ok(None) => Self::default(),
            Err(err) => {
                warn!(error = %err, "Failed to restore session state, starting fresh");
                Self::default()
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::state::{FileSessionStore, MemorySessionStore};

    fn typed(tokens: &[&str]) -> Session {
        let mut session = Session::new();
        for token in tokens {
            session.input(token);
        }
        session
    }

    #[test]
    fn test_input_replaces_cleared_zero() {
        let session = typed(&["7"]);
        assert_eq!(session.expression(), "7");

        let session = typed(&["."]);
        assert_eq!(session.expression(), "0.");

        let session = typed(&["0", "0", "5"]);
        assert_eq!(session.expression(), "5");
    }

    #[test]
    fn test_input_single_decimal_point_per_number() {
        let session = typed(&["1", ".", "5", ".", "2"]);
        assert_eq!(session.expression(), "1.52");

        let session = typed(&["1", ".", "5", "×", "2", ".", "5"]);
        assert_eq!(session.expression(), "1.5×2.5");

        let session = typed(&["1", ".", "5", "−", "."]);
        assert_eq!(session.expression(), "1.5−.");
    }

    #[test]
    fn test_evaluate_success() {
        let mut session = typed(&["2", "+", "3", "×", "4"]);
        assert_eq!(session.evaluate().unwrap().as_deref(), Some("14"));
        assert_eq!(session.expression(), "14");
        assert_eq!(session.previous_expression(), "2+3×4 =");
        assert!(session.reset_on_input());

        let entry = session.history().latest().unwrap();
        assert_eq!(entry.expression, "2+3×4");
        assert_eq!(entry.result, "14");
        assert_eq!(entry.category, Category::Basic);

        // Next digit starts a new expression
        session.input("9");
        assert_eq!(session.expression(), "9");
        assert!(!session.reset_on_input());
    }

    #[test]
    fn test_evaluate_sentinels_are_noops() {
        let mut session = Session::new();
        assert_eq!(session.evaluate().unwrap(), None);
        assert!(session.history().is_empty());
        assert!(!session.reset_on_input());
    }

    #[test]
    fn test_evaluate_failure() {
        let mut session = typed(&["5", "÷", "0"]);
        let err = session.evaluate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Evaluation);
        assert_eq!(session.expression(), ERROR);
        assert!(session.reset_on_input());
        assert!(session.history().is_empty());

        // Error state no-ops on evaluate and is replaced by input
        assert_eq!(session.evaluate().unwrap(), None);
        session.input("3");
        assert_eq!(session.expression(), "3");
    }

    #[test]
    fn test_apply_function() {
        let mut session = typed(&["4"]);
        let outcome = session.apply_function(ScientificFunction::Sqrt).unwrap();
        assert!(matches!(outcome, Dispatch::Computed(_)));
        assert_eq!(session.expression(), "2");
        assert!(session.reset_on_input());

        let entry = session.history().latest().unwrap();
        assert_eq!(entry.expression, "√(4)");
        assert_eq!(entry.category, Category::Scientific);
    }

    #[test]
    fn test_apply_function_domain_error() {
        let mut session = typed(&["-", "4"]);
        let err = session.apply_function(ScientificFunction::Sqrt).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
        assert_eq!(err.title(), "Function Error");
        assert_eq!(session.expression(), ERROR);
        assert!(session.history().is_empty());

        // Error is not a number
        let err = session.apply_function(ScientificFunction::Square).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_constants_and_pow() {
        let mut session = typed(&["9"]);
        session.apply_function(ScientificFunction::Pi).unwrap();
        assert_eq!(session.expression(), "3.141592653589793");
        assert!(session.reset_on_input());
        assert!(session.history().is_empty());

        let mut session = typed(&["2", "+", "2"]);
        session.evaluate().unwrap();
        session.apply_function(ScientificFunction::Pow).unwrap();
        assert_eq!(session.expression(), "4^");
        assert!(!session.reset_on_input());
        session.input("3");
        assert_eq!(session.evaluate().unwrap().as_deref(), Some("64"));
    }

    #[test]
    fn test_clear_and_delete() {
        let mut session = typed(&["1", "2", "3"]);
        session.delete_last();
        assert_eq!(session.expression(), "12");
        session.delete_last();
        session.delete_last();
        assert_eq!(session.expression(), CLEARED);

        let mut session = typed(&["2", "×", "π"]);
        session.delete_last();
        assert_eq!(session.expression(), "2×");

        let mut session = typed(&["1", "÷", "0"]);
        let _ = session.evaluate();
        session.delete_last();
        assert_eq!(session.expression(), CLEARED);

        let mut session = typed(&["1", "+", "1"]);
        session.evaluate().unwrap();
        session.clear_all();
        assert_eq!(session.expression(), CLEARED);
        assert_eq!(session.previous_expression(), "");
        assert!(!session.reset_on_input());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_memory_register() {
        let mut session = typed(&["1", "0"]);
        assert_eq!(session.memory_store().unwrap(), 10.0);
        session.clear_all();
        session.input("4");
        assert_eq!(session.memory_add().unwrap(), 14.0);
        assert_eq!(session.memory_subtract().unwrap(), 10.0);

        assert_eq!(session.memory_recall(), 10.0);
        assert_eq!(session.expression(), "10");
        assert!(session.reset_on_input());

        session.memory_clear();
        assert_eq!(session.memory(), 0.0);
    }

    #[test]
    fn test_memory_overflow_leaves_register_unchanged() {
        let mut session = typed(&["1", "e", "+", "3", "0", "8"]);
        assert_eq!(session.memory_store().unwrap(), 1e308);

        let err = session.memory_add().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(session.memory(), 1e308);

        session.memory = -1e308;
        assert!(session.memory_subtract().is_err());
        assert_eq!(session.memory(), -1e308);
        assert_eq!(session.expression(), "1e+308");
    }

    #[test]
    fn test_memory_recall_uses_result_format() {
        let mut session = Session::new();
        session.memory = 1e300;
        session.memory_recall();
        assert_eq!(session.expression(), "1.0000000000e+300");

        session.memory = 0.1 + 0.2;
        session.memory_recall();
        assert_eq!(session.expression(), "0.3");
    }

    #[test]
    fn test_memory_rejects_non_numeric() {
        let mut session = typed(&["1", "÷", "0"]);
        let _ = session.evaluate();
        session.memory = 5.0;
        assert_eq!(
            session.memory_add().unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(session.memory(), 5.0);
    }

    #[test]
    fn test_conversions_update_display() {
        let mut session = Session::new();
        let result = session
            .convert_unit(UnitCategory::Length, "2", "km", "m")
            .unwrap();
        assert_eq!(result.display, "2000.000000");
        assert_eq!(session.expression(), "2000.000000");
        assert!(session.reset_on_input());
        assert_eq!(session.history().latest().unwrap().category, Category::Unit);

        session.convert_currency("10", "EUR", "EUR").unwrap();
        assert_eq!(session.expression(), "10.00");
        assert_eq!(
            session.history().latest().unwrap().category,
            Category::Currency
        );
    }

    #[test]
    fn test_conversion_failure_keeps_display() {
        let mut session = typed(&["5"]);
        let err = session.convert_currency("abc", "USD", "EUR").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(session.expression(), "5");
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_add_statistic() {
        let mut session = Session::new();
        for value in ["2", "4", "4", "4", "5", "5", "7", "9"] {
            session.add_statistic(value).unwrap();
        }
        let summary = session.dataset().summary().unwrap();
        assert_eq!(summary.mean, 5.0);
        assert_eq!(session.history().len(), 8);

        let entry = session.history().latest().unwrap();
        assert_eq!(entry.expression, "add 9");
        assert_eq!(entry.result, "mean 5.0000 (n=8)");
        assert_eq!(entry.category, Category::Statistical);

        assert_eq!(
            session.add_statistic("x").unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
        session.clear_statistics();
        assert!(session.dataset().is_empty());
    }

    #[test]
    fn test_export_history() {
        let store = MemorySessionStore::new();
        let mut session = Session::new();
        assert_eq!(
            session.export_history(&store).unwrap_err().kind(),
            ErrorKind::History
        );

        session.input("6");
        session.input("×");
        session.input("7");
        session.evaluate().unwrap();

        let name = session.export_history(&store).unwrap();
        assert!(name.starts_with("calculator-history-"));
        let text = store.export(&name).unwrap();
        assert!(text.contains("1. 6×7 = 42"));
    }

    #[test]
    fn test_key_names() {
        let cases = [
            ("7", Key::Input('7')),
            ("0", Key::Input('0')),
            (".", Key::Input('.')),
            ("+", Key::Input('+')),
            ("(", Key::Input('(')),
            (")", Key::Input(')')),
            ("-", Key::Input('−')),
            ("*", Key::Input('×')),
            ("/", Key::Input('÷')),
            ("Enter", Key::Evaluate),
            ("=", Key::Evaluate),
            ("Escape", Key::Clear),
            ("Delete", Key::Clear),
            ("Backspace", Key::Backspace),
            ("%", Key::Function(ScientificFunction::Percent)),
            ("^", Key::Function(ScientificFunction::Pow)),
            ("!", Key::Function(ScientificFunction::Factorial)),
        ];
        for (name, expected) in cases {
            assert_eq!(name.parse::<Key>().unwrap(), expected, "{}", name);
        }

        for name in ["a", "Tab", "12", "", "×"] {
            assert!(name.parse::<Key>().is_err(), "{}", name);
        }
    }

    #[test]
    fn test_keyboard_session() {
        let mut session = Session::new();
        for name in ["(", "2", "+", "3", ")", "*", "4", "-", "1", "/", "2"] {
            assert!(session.key(name).unwrap());
        }
        assert_eq!(session.expression(), "(2+3)×4−1÷2");
        assert!(session.key("Enter").unwrap());
        assert_eq!(session.expression(), "19.5");

        // Unmapped keys are ignored
        assert!(!session.key("Shift").unwrap());
        assert_eq!(session.expression(), "19.5");

        session.key("Escape").unwrap();
        assert_eq!(session.expression(), CLEARED);

        for name in ["1", "2", "Backspace"] {
            session.key(name).unwrap();
        }
        assert_eq!(session.expression(), "1");
        session.key("Delete").unwrap();
        assert_eq!(session.expression(), CLEARED);
    }

    #[test]
    fn test_keyboard_functions() {
        let mut session = typed(&["5"]);
        session.key("!").unwrap();
        assert_eq!(session.expression(), "120");

        session.key("^").unwrap();
        session.key("2").unwrap();
        session.key("=").unwrap();
        assert_eq!(session.expression(), "14400");

        let mut session = typed(&["5", "0"]);
        session.key("%").unwrap();
        assert_eq!(session.expression(), "0.5");

        let mut session = typed(&["0", "."]);
        session.input("5");
        let err = session.key("!").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
        assert_eq!(session.expression(), ERROR);
    }

    #[test]
    fn test_persist_and_restore() {
        let store = MemorySessionStore::new();
        let mut session = typed(&["8", "+", "1"]);
        session.evaluate().unwrap();
        session.memory_store().unwrap();
        session.preferences_mut().theme = 2;
        session.persist(&store);

        let restored = Session::restore(&store);
        assert_eq!(restored.expression(), CLEARED);
        assert_eq!(restored.memory(), 9.0);
        assert_eq!(restored.preferences().theme, 2);
        assert_eq!(restored.history(), session.history());
    }
    #[test]
    fn test_overflowed_memory_never_reaches_the_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("state.json"), dir.path());

        let mut session = typed(&["8", "e", "+", "3", "0", "7"]);
        session.memory_store().unwrap();
        assert_eq!(session.memory_add().unwrap(), 1.6e308);
        assert!(session.memory_add().is_err());

        session.clear_all();
        for token in ["2", "+", "2"] {
            session.input(token);
        }
        session.evaluate().unwrap();
        session.persist(&store);

        let restored = Session::restore(&store);
        assert_eq!(restored.memory(), session.memory());
        assert_eq!(restored.history().latest().unwrap().expression, "2+2");
    }
}
