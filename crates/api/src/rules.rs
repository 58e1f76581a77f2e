//! Field-rule validator.
//!
//! The repository's stand-in for the opaque schema capability: a small rule
//! set evaluated against dotted paths into the `{body, params, query}`
//! candidate. All failing constraints are reported, across all three groups.

use async_trait::async_trait;
use serde_json::Value;

use orgkit_gateway::{FieldIssue, ValidationOutcome, Validator};

#[derive(Debug, Clone)]
enum Constraint {
    Required,
    Email,
    MinLen(usize),
    MaxLen(usize),
    OneOf(&'static [&'static str]),
    Numeric,
}

#[derive(Debug, Clone)]
struct FieldRule {
    path: String,
    constraint: Constraint,
}

/// An ordered list of per-field constraints forming a route's declared shape.
#[derive(Debug, Clone, Default)]
pub struct FieldRules {
    rules: Vec<FieldRule>,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(self, path: &str) -> Self {
        self.rule(path, Constraint::Required)
    }

    pub fn email(self, path: &str) -> Self {
        self.rule(path, Constraint::Email)
    }

    pub fn min_len(self, path: &str, min: usize) -> Self {
        self.rule(path, Constraint::MinLen(min))
    }

    pub fn max_len(self, path: &str, max: usize) -> Self {
        self.rule(path, Constraint::MaxLen(max))
    }

    pub fn one_of(self, path: &str, options: &'static [&'static str]) -> Self {
        self.rule(path, Constraint::OneOf(options))
    }

    pub fn numeric(self, path: &str) -> Self {
        self.rule(path, Constraint::Numeric)
    }

    fn rule(mut self, path: &str, constraint: Constraint) -> Self {
        self.rules.push(FieldRule {
            path: path.to_string(),
            constraint,
        });
        self
    }
}

#[async_trait]
impl Validator for FieldRules {
    async fn validate(&self, candidate: &Value) -> ValidationOutcome {
        let mut issues = Vec::new();

        for rule in &self.rules {
            let value = lookup(candidate, &rule.path);
            check(&rule.path, &rule.constraint, value, &mut issues);
        }

        if issues.is_empty() {
            ValidationOutcome::Valid(candidate.clone())
        } else {
            ValidationOutcome::Invalid(issues)
        }
    }
}

fn check(path: &str, constraint: &Constraint, value: Option<&Value>, issues: &mut Vec<FieldIssue>) {
    let present = matches!(value, Some(v) if !v.is_null());

    match constraint {
        Constraint::Required => {
            let empty_string = matches!(value, Some(Value::String(s)) if s.is_empty());
            if !present || empty_string {
                issues.push(FieldIssue::new(path, "is required", "required"));
            }
        }
        // Every other constraint only applies when a value is present;
        // `required` owns the presence check.
        _ if !present => {}
        Constraint::Email => match value.and_then(Value::as_str) {
            Some(text) if is_email(text) => {}
            Some(_) => issues.push(FieldIssue::new(
                path,
                "must be a valid email",
                "invalid_email",
            )),
            None => issues.push(FieldIssue::new(path, "must be a string", "invalid_type")),
        },
        Constraint::MinLen(min) => match value.and_then(Value::as_str) {
            Some(text) if text.chars().count() >= *min => {}
            Some(_) => issues.push(FieldIssue::new(
                path,
                format!("must be at least {min} characters"),
                "too_short",
            )),
            None => issues.push(FieldIssue::new(path, "must be a string", "invalid_type")),
        },
        Constraint::MaxLen(max) => match value.and_then(Value::as_str) {
            Some(text) if text.chars().count() <= *max => {}
            Some(_) => issues.push(FieldIssue::new(
                path,
                format!("must be at most {max} characters"),
                "too_long",
            )),
            None => issues.push(FieldIssue::new(path, "must be a string", "invalid_type")),
        },
        Constraint::OneOf(options) => match value.and_then(Value::as_str) {
            Some(text) if options.contains(&text) => {}
            Some(_) => issues.push(FieldIssue::new(
                path,
                format!("must be one of: {}", options.join(", ")),
                "invalid_option",
            )),
            None => issues.push(FieldIssue::new(path, "must be a string", "invalid_type")),
        },
        Constraint::Numeric => {
            let ok = match value {
                Some(Value::String(text)) => text.parse::<u64>().is_ok(),
                Some(Value::Number(_)) => true,
                _ => false,
            };
            if !ok {
                issues.push(FieldIssue::new(path, "must be a number", "invalid_number"));
            }
        }
    }
}

fn lookup<'a>(candidate: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(candidate, |value, key| value.get(key))
}

/// Deliberately loose: non-empty local part, one `@`, a dot in the domain.
/// Real address verification belongs to the mail provider.
fn is_email(text: &str) -> bool {
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
}
