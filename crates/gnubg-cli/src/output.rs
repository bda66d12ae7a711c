//! Hint output formatting.

use crate::OutputFormat;
use anyhow::Result;
use lib_types::{HintRequest, HintResult, Recommendation};
use std::fmt::Write;

/// Render one evaluated request.
pub fn render(request: &HintRequest, result: &HintResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => render_text(request, result),
        OutputFormat::Json => {
            let json = serde_json::json!({
                "position": request.position_id,
                "depth": request.depth,
                "result": result.as_value(),
            });
            Ok(serde_json::to_string(&json)?)
        }
    }
}

/// Render the outcome of a successful `check`.
pub fn render_check(library: &str, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format!("Engine OK: {library}")),
        OutputFormat::Json => {
            let json = serde_json::json!({
                "library": library,
                "status": "ok",
            });
            Ok(serde_json::to_string(&json)?)
        }
    }
}

fn render_text(request: &HintRequest, result: &HintResult) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "Position: {}", request.position_id)?;
    writeln!(out, "Depth:    {} ply", request.depth)?;

    let Some(value) = result.as_value() else {
        writeln!(out, "no result")?;
        return Ok(out);
    };

    match result.recommendation() {
        Some(Recommendation::Error { code }) => {
            writeln!(out, "Engine error {code}")?;
        }
        Some(Recommendation::Cube { action, equity, .. }) => {
            writeln!(out, "Action:   {}", action.as_str())?;
            writeln!(out, "  No double: {:+.4}", equity.no_double)?;
            writeln!(out, "  Take:      {:+.4}", equity.take)?;
            writeln!(out, "  Drop:      {:+.4}", equity.drop)?;
            writeln!(out, "  Optimal:   {:+.4}", equity.optimal)?;
        }
        Some(Recommendation::Simple { action }) => {
            writeln!(out, "Action:   {}", action.as_str())?;
        }
        Some(Recommendation::Play { moves }) => {
            writeln!(out, "Action:   play")?;
            if moves.is_empty() {
                writeln!(out, "  (no legal move)")?;
            }
            for (i, m) in moves.iter().enumerate() {
                let p = &m.probabilities;
                writeln!(
                    out,
                    "  {:>2}. {:<24} Eq {:+.4} ({:+.4})  W {:.1}% G {:.1}% B {:.1}%  L {:.1}% G {:.1}% B {:.1}%",
                    i + 1,
                    m.notation,
                    m.equity,
                    m.cubeless_equity,
                    p.win * 100.0,
                    p.win_gammon * 100.0,
                    p.win_backgammon * 100.0,
                    p.lose() * 100.0,
                    p.lose_gammon * 100.0,
                    p.lose_backgammon * 100.0,
                )?;
            }
        }
        None => {
            writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
        }
    }

    Ok(out)
}
