//! Terminal rendering for turns, the operation list and health checks.
//!
//! Everything returns a `String` so the REPL can write to any sink.

use crate::health::LlmHealth;
use crate::Result;
use chirp_core::{OperationRegistry, Requirement, ResponseEnvelope, TurnReport};
use colored::Colorize;
use std::fmt::Write as _;

/// The generated request, the envelope and the cache size for one turn.
pub fn render_turn(report: &TurnReport, cached_users: usize) -> Result<String> {
    let mut out = String::new();

    match &report.request {
        Some(request) => {
            let _ = writeln!(
                out,
                "\n{} {}",
                "Generated request".cyan().bold(),
                format!("({} attempt(s))", report.attempts).dimmed()
            );
            let _ = writeln!(out, "{}", serde_json::to_string_pretty(request)?);
        }
        None => {
            let _ = writeln!(
                out,
                "\n{}",
                format!("Not understood after {} attempt(s)", report.attempts)
                    .yellow()
                    .bold()
            );
        }
    }

    out.push_str(&render_envelope(&report.envelope)?);
    let _ = writeln!(
        out,
        "{}",
        format!("Cached user ids: {}", cached_users).dimmed()
    );
    Ok(out)
}

/// The envelope as pretty JSON under a status heading.
pub fn render_envelope(envelope: &ResponseEnvelope) -> Result<String> {
    let heading = if envelope.is_success() {
        "✓ Response".green().bold()
    } else {
        "✗ Response".red().bold()
    };
    Ok(format!(
        "{}\n{}\n",
        heading,
        serde_json::to_string_pretty(envelope)?
    ))
}

/// The enabled operations with their parameters.
pub fn render_operations(registry: &OperationRegistry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Available operations".bold());
    let _ = writeln!(out, "{}", "=".repeat(20));

    for spec in registry.specs() {
        let marker = if spec.operation.is_mutating() {
            "*".yellow().to_string()
        } else {
            " ".to_string()
        };
        let _ = writeln!(
            out,
            "\n{}{:<10} {}",
            marker,
            spec.name().green().bold(),
            spec.description
        );

        for param in spec.params {
            let requirement = match param.requirement {
                Requirement::Required => "required".to_string(),
                Requirement::Optional => "optional".to_string(),
                Requirement::Default(n) => format!("default {}", n),
            };
            let _ = writeln!(
                out,
                "    {:<12} {:<9} {:<11} {}",
                param.name,
                param.ty.type_name(),
                requirement,
                param.ty.constraint().dimmed()
            );
        }
    }

    let _ = writeln!(out, "\n{} changes account state", "*".yellow());
    out
}

/// Result of probing the model server.
pub fn render_health(health: &LlmHealth) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "LLM Health Check");
    let _ = writeln!(out, "================");
    let _ = writeln!(out, "Server: {}", health.base_url);
    let _ = writeln!(out, "Model:  {}", health.model);
    let _ = writeln!(out);

    if health.reachable {
        let _ = writeln!(out, "{}", "✓ Ollama is reachable".green().bold());
    } else {
        let _ = writeln!(out, "{}", "✗ Ollama is not reachable".red().bold());
    }

    match health.model_installed {
        Some(true) => {
            let _ = writeln!(out, "{}", "✓ Model is installed".green().bold());
        }
        Some(false) => {
            let _ = writeln!(
                out,
                "{} (run `ollama pull {}`)",
                "✗ Model is not installed".red().bold(),
                health.model
            );
        }
        None => {}
    }

    if let Some(error) = &health.error {
        let _ = writeln!(out, "{}", error.dimmed());
    }
    out
}
