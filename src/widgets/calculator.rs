//! Calculator: a text-expression evaluator and a keypad
//!
//! Both evaluate strictly left to right: every operator is applied to the
//! running value as soon as its right operand arrives, so `2+3*4` is 20.

use std::sync::OnceLock;

use regex_lite::Regex;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CalcError {
    #[error("Error")]
    Malformed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl Op {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Sub),
            '*' => Some(Self::Mul),
            '/' => Some(Self::Div),
            _ => None,
        }
    }

    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Sub => lhs - rhs,
            Self::Mul => lhs * rhs,
            Self::Div => lhs / rhs,
        }
    }
}

fn token_regex() -> &'static Regex {
    static TOKENS: OnceLock<Regex> = OnceLock::new();
    TOKENS.get_or_init(|| Regex::new(r"([+\-*/])|([0-9.]+%?)|%").expect("token pattern"))
}

/// Longest leading decimal number, e.g. `1.2` out of `1.2.3`
fn parse_number_prefix(text: &str) -> Option<f64> {
    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_digit = false;
    for (i, c) in text.char_indices() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    text[..end].trim_end_matches('.').parse().ok()
}

/// Evaluate a typed expression such as `10+50%`
pub fn calc_simple(expr: &str) -> Result<f64, CalcError> {
    let cleaned: String = expr
        .chars()
        .filter(|c| c.is_ascii_digit() || "+-*/.%".contains(*c))
        .collect();

    let mut stack: Vec<f64> = Vec::new();
    let mut pending: Option<Op> = None;
    let mut any_token = false;

    for token in token_regex().find_iter(&cleaned) {
        any_token = true;
        let token = token.as_str();
        if let Some(op) = token.chars().next().and_then(Op::from_char) {
            pending = Some(op);
            continue;
        }

        let is_percent = token.ends_with('%');
        let mut value = parse_number_prefix(token.trim_end_matches('%')).ok_or(CalcError::Malformed)?;
        if is_percent {
            let base = *stack.last().ok_or(CalcError::Malformed)?;
            value = match pending {
                Some(Op::Mul) | Some(Op::Div) => value / 100.0,
                Some(Op::Add) | Some(Op::Sub) => base * value / 100.0,
                None => value,
            };
        }

        match pending.take() {
            None => stack.push(value),
            Some(op) => {
                // No sign handling: `-5` has no left operand
                let lhs = stack.pop().ok_or(CalcError::Malformed)?;
                stack.push(op.apply(lhs, value));
            }
        }
    }

    if !any_token {
        return Err(CalcError::Malformed);
    }
    stack.first().copied().ok_or(CalcError::Malformed)
}

/// Render a result the way the widget shows it
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// Text shown under the input: `= 20` or `Error`
pub fn display(result: Result<f64, CalcError>) -> String {
    match result {
        Ok(value) => format!("= {}", format_number(value)),
        Err(e) => e.to_string(),
    }
}

/// Button-driven calculator state
#[derive(Debug, Clone, PartialEq)]
pub struct Keypad {
    display: String,
    previous: Option<f64>,
    operation: Option<char>,
    waiting_for_operand: bool,
}

impl Default for Keypad {
    fn default() -> Self {
        Self {
            display: "0".to_string(),
            previous: None,
            operation: None,
            waiting_for_operand: false,
        }
    }
}

impl Keypad {
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn digit(&mut self, digit: char) {
        if !digit.is_ascii_digit() {
            return;
        }
        if self.waiting_for_operand {
            self.display = digit.to_string();
            self.waiting_for_operand = false;
        } else if self.display == "0" {
            self.display = digit.to_string();
        } else {
            self.display.push(digit);
        }
    }

    pub fn decimal(&mut self) {
        if self.waiting_for_operand {
            self.display = "0.".to_string();
            self.waiting_for_operand = false;
        } else if !self.display.contains('.') {
            self.display.push('.');
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn current_value(&self) -> f64 {
        parse_number_prefix(self.display.trim_start_matches('-'))
            .map(|v| if self.display.starts_with('-') { -v } else { v })
            .unwrap_or(0.0)
    }

    /// Press `+ - * /`; applies any pending operation first
    pub fn operation(&mut self, next: char) {
        let input = self.current_value();
        match (self.previous, self.operation.and_then(Op::from_char)) {
            (None, _) => self.previous = Some(input),
            (Some(previous), Some(op)) if !self.waiting_for_operand => {
                let result = op.apply(previous, input);
                self.display = format_number(result);
                self.previous = Some(result);
            }
            _ => {}
        }
        self.waiting_for_operand = true;
        self.operation = Op::from_char(next).map(|_| next);
    }

    /// Press `=`
    pub fn equals(&mut self) {
        if let (Some(previous), Some(op)) = (self.previous, self.operation.and_then(Op::from_char)) {
            if !self.waiting_for_operand {
                self.display = format_number(op.apply(previous, self.current_value()));
            }
        }
        self.previous = None;
        self.operation = None;
        self.waiting_for_operand = true;
    }

    /// Route a typed key; returns false for keys the keypad ignores
    pub fn key(&mut self, key: char) -> bool {
        match key {
            '0'..='9' => self.digit(key),
            '.' | ',' => self.decimal(),
            '+' | '-' | '*' | '/' => self.operation(key),
            '=' => self.equals(),
            'c' | 'C' => self.clear(),
            _ => return false,
        }
        true
    }
}
