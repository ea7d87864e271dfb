// Markdown renderer: produces `faultline-report.md`.
//
// Sections: Overview, Architecture, Hubs, Layers, Hypotheses, Assumptions,
// Stress Tests. Stress results that could not run are counted, not shown.

use std::fmt::Write as _;

use tracing::{info, instrument};

use crate::error::{RenderError, Result};
use crate::pipeline::AnalysisReport;
use crate::stress::StressResult;

use super::traits::Renderer;

const PATH_SEPARATOR: &str = " → ";

#[derive(Debug, Default)]
pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn output_path(&self) -> &'static str {
        "faultline-report.md"
    }

    #[instrument(skip_all, name = "markdown_render")]
    fn render(&self, report: &AnalysisReport) -> Result<String> {
        let out = render_markdown(report).map_err(|e| RenderError::Template(e.to_string()))?;
        info!(bytes = out.len(), "Markdown report rendered");
        Ok(out)
    }
}

fn render_markdown(report: &AnalysisReport) -> std::result::Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "# Faultline Report")?;
    writeln!(out)?;
    writeln!(
        out,
        "Generated {} from {} files.",
        report.generated_at.format("%Y-%m-%d %H:%M UTC"),
        report.file_count
    )?;
    writeln!(out)?;

    write_overview(&mut out, report)?;
    write_architecture(&mut out, report)?;
    write_hubs(&mut out, report)?;
    write_layers(&mut out, report)?;
    write_hypotheses(&mut out, report)?;
    write_assumptions(&mut out, report)?;
    write_stress(&mut out, report)?;
    Ok(out)
}

fn write_overview(out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
    let m = &report.metrics;
    writeln!(out, "## Overview")?;
    writeln!(out)?;
    writeln!(out, "| Metric | Value |")?;
    writeln!(out, "|--------|-------|")?;
    writeln!(out, "| Graph nodes | {} |", m.total_nodes)?;
    writeln!(out, "| Import edges | {} |", m.total_edges)?;
    writeln!(out, "| Avg fan-in / fan-out | {:.2} / {:.2} |", m.avg_fan_in, m.avg_fan_out)?;
    writeln!(out, "| Coupling score | {:.2} |", m.coupling_score)?;
    match &m.max_fan_in_module {
        Some(module) => writeln!(out, "| Max fan-in | {} (`{module}`) |", m.max_fan_in)?,
        None => writeln!(out, "| Max fan-in | 0 |")?,
    }
    writeln!(out, "| Import cycles | {} |", m.cycles.len())?;
    writeln!(out)?;
    Ok(())
}

fn write_architecture(out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
    let d = &report.detection;
    writeln!(out, "## Architecture")?;
    writeln!(out)?;
    writeln!(
        out,
        "**{}** ({} category, confidence {:.2})",
        d.architecture_type, d.archetype, d.confidence
    )?;
    writeln!(out)?;

    let stack = &d.tech_stack;
    let entries = [
        ("Framework", stack.framework.as_deref()),
        ("Language", stack.language.as_deref()),
        ("Backend", stack.backend.as_deref()),
        ("Database", stack.database.as_deref()),
        ("ORM", stack.orm.as_deref()),
    ];
    for (label, value) in entries {
        if let Some(value) = value {
            writeln!(out, "- {label}: {value}")?;
        }
    }
    let mut flags = Vec::new();
    if stack.has_ssr {
        flags.push("server-side rendering");
    }
    if stack.has_api_routes {
        flags.push("API routes");
    }
    if stack.is_static {
        flags.push("static output");
    }
    if !flags.is_empty() {
        writeln!(out, "- Traits: {}", flags.join(", "))?;
    }
    writeln!(out)?;

    if !d.evidence.is_empty() {
        writeln!(out, "Evidence:")?;
        writeln!(out)?;
        for line in &d.evidence {
            writeln!(out, "- {line}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_hubs(out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
    let m = &report.metrics;
    if m.hubs_with_counts.is_empty() {
        return Ok(());
    }
    writeln!(out, "## Hubs")?;
    writeln!(out)?;
    writeln!(out, "| Module | Fan-in | Fan-out | Blast radius |")?;
    writeln!(out, "|--------|--------|---------|--------------|")?;
    for (module, fan_in) in &m.hubs_with_counts {
        let (fan_out, blast) = m
            .hub_details
            .get(module)
            .map_or((m.fan_out(module), 0.0), |d| (d.fan_out, d.blast_radius_pct));
        writeln!(out, "| `{module}` | {fan_in} | {fan_out} | {blast:.1}% |")?;
    }
    writeln!(out)?;

    if !m.god_modules.is_empty() {
        let names: Vec<String> = m.god_modules.iter().map(|g| format!("`{g}`")).collect();
        writeln!(out, "God modules: {}", names.join(", "))?;
        writeln!(out)?;
    }
    for cycle in &m.cycles {
        writeln!(out, "- Cycle: {}", cycle.join(PATH_SEPARATOR))?;
    }
    if !m.cycles.is_empty() {
        writeln!(out)?;
    }
    Ok(())
}

fn write_layers(out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
    writeln!(out, "## Layers")?;
    writeln!(out)?;
    writeln!(out, "| Layer | Files |")?;
    writeln!(out, "|-------|-------|")?;
    for (layer, files) in report.layers.iter().filter(|(_, files)| !files.is_empty()) {
        writeln!(out, "| {layer} | {} |", files.len())?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_hypotheses(out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
    if report.hypotheses.is_empty() {
        return Ok(());
    }
    writeln!(out, "## Hypotheses")?;
    writeln!(out)?;
    for h in &report.hypotheses {
        writeln!(out, "- **{}** ({}, {:.2})", h.claim, h.pattern_type, h.confidence)?;
        if let Some(warning) = &h.warning {
            writeln!(out, "  - Warning: {warning}")?;
        }
    }
    writeln!(out)?;
    Ok(())
}

fn write_assumptions(out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
    if report.assumptions.is_empty() {
        return Ok(());
    }
    writeln!(out, "## Assumptions")?;
    writeln!(out)?;
    writeln!(out, "| Risk | Assumption | Impact |")?;
    writeln!(out, "|------|------------|--------|")?;
    for a in &report.assumptions {
        writeln!(out, "| {} | {} | {} |", a.risk_level, a.assumption, a.impact)?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_stress(out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
    writeln!(out, "## Stress Tests")?;
    writeln!(out)?;

    let skipped = report.stress_results.len() - report.applicable_results().count();
    let mut any = false;
    for result in report.applicable_results() {
        any = true;
        write_stress_result(out, result)?;
    }
    if !any {
        writeln!(out, "No stress scenario applied to this repository.")?;
        writeln!(out)?;
    }
    if skipped > 0 {
        writeln!(out, "_{skipped} scenario(s) not applicable._")?;
        writeln!(out)?;
    }
    Ok(())
}

fn write_stress_result(out: &mut String, r: &StressResult) -> std::fmt::Result {
    writeln!(out, "### {}", r.stress)?;
    writeln!(out)?;
    writeln!(
        out,
        "{} propagation, severity {:.2}, confidence {:.2}",
        r.propagation_type, r.severity, r.confidence
    )?;
    writeln!(out)?;
    writeln!(out, "**Failure mode:** {}", r.failure_mode)?;
    writeln!(out)?;
    writeln!(out, "Impact path: {}", r.impact_path.join(PATH_SEPARATOR))?;
    writeln!(out, "Affected files: {}", r.affected_files.len())?;
    writeln!(out)?;

    if !r.bottlenecks.is_empty() {
        writeln!(out, "| Component | Severity | Reason |")?;
        writeln!(out, "|-----------|----------|--------|")?;
        for b in &r.bottlenecks {
            writeln!(out, "| `{}` | {} | {} |", b.component, b.severity, b.reason)?;
        }
        writeln!(out)?;
    }
    if !r.recommendations.is_empty() {
        writeln!(out, "Recommendations:")?;
        writeln!(out)?;
        for rec in &r.recommendations {
            writeln!(out, "- {rec}")?;
        }
        writeln!(out)?;
    }
    if !r.violated_assumptions.is_empty() {
        writeln!(out, "Violated assumptions:")?;
        writeln!(out)?;
        for a in &r.violated_assumptions {
            writeln!(out, "- {}", a.assumption)?;
        }
        writeln!(out)?;
    }
    if !r.safe_components.is_empty() {
        writeln!(out, "Unaffected layers: {}", r.safe_components.join(", "))?;
        writeln!(out)?;
    }
    Ok(())
}
