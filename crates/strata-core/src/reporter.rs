//! Operator-facing reporting sink.
//!
//! Deploy output (headers, migration messages, endpoints) goes through a
//! [`Reporter`] so frontends decide how it is rendered. Diagnostic logging
//! uses `tracing` instead.

use tracing::{error, info, warn};

use crate::remote::{MigrationError, MigrationMessage};

pub trait Reporter: Send + Sync {
    fn log(&self, text: &str);

    fn warn(&self, text: &str);

    fn error(&self, error: &dyn std::error::Error);

    /// Start a pending action (spinner, progress line).
    fn action_start(&self, text: &str);

    /// Finish the pending action started last.
    fn action_stop(&self);

    fn print_messages(&self, messages: &[MigrationMessage]);

    fn print_errors(&self, errors: &[MigrationError]);
}

/// Render migration messages as indented lines, sub-descriptions nested below.
pub fn message_lines(messages: &[MigrationMessage]) -> Vec<String> {
    let mut lines = Vec::new();
    for message in messages {
        push_message(&mut lines, message, 1);
    }
    lines
}

fn push_message(lines: &mut Vec<String>, message: &MigrationMessage, depth: usize) {
    let indent = "  ".repeat(depth);
    let marker = match message.action.as_deref() {
        Some("Create") => "+",
        Some("Delete") => "-",
        Some("Update") => "~",
        _ => "*",
    };
    lines.push(format!("{indent}{marker} {}", message.description));
    for sub in &message.sub_descriptions {
        push_message(lines, sub, depth + 1);
    }
}

/// Render migration errors, one line per error with its location when known.
pub fn error_lines(errors: &[MigrationError]) -> Vec<String> {
    errors
        .iter()
        .map(|e| match (e.kind.as_deref(), e.field.as_deref()) {
            (Some(kind), Some(field)) => format!("  ✗ {}.{}: {}", kind, field, e.description),
            (Some(kind), None) => format!("  ✗ {}: {}", kind, e.description),
            _ => format!("  ✗ {}", e.description),
        })
        .collect()
}

/// Reporter that forwards everything to `tracing`, keeping stdout free.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn log(&self, text: &str) {
        info!("{}", text);
    }

    fn warn(&self, text: &str) {
        warn!("{}", text);
    }

    fn error(&self, err: &dyn std::error::Error) {
        error!("{}", err);
    }

    fn action_start(&self, text: &str) {
        info!("{}...", text);
    }

    fn action_stop(&self) {}

    fn print_messages(&self, messages: &[MigrationMessage]) {
        for line in message_lines(messages) {
            info!("{}", line);
        }
    }

    fn print_errors(&self, errors: &[MigrationError]) {
        for line in error_lines(errors) {
            warn!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_lines_nest_sub_descriptions() {
        let messages = vec![MigrationMessage {
            action: Some("Create".to_string()),
            description: "A new type with the name `Post` is created.".to_string(),
            sub_descriptions: vec![MigrationMessage {
                action: Some("Create".to_string()),
                description: "A new field with the name `title` is created.".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }];

        assert_eq!(
            message_lines(&messages),
            vec![
                "  + A new type with the name `Post` is created.",
                "    + A new field with the name `title` is created.",
            ]
        );
    }

    #[test]
    fn test_error_lines() {
        let errors = vec![
            MigrationError {
                description: "Unknown type".to_string(),
                kind: Some("Post".to_string()),
                field: Some("author".to_string()),
                code: None,
            },
            MigrationError {
                description: "Something failed".to_string(),
                ..Default::default()
            },
        ];

        assert_eq!(
            error_lines(&errors),
            vec!["  ✗ Post.author: Unknown type", "  ✗ Something failed"]
        );
    }
}
