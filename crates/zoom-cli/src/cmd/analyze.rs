use crate::output::print_json;
use anyhow::Context;
use std::path::Path;
use std::time::Duration;
use zoom_core::analysis::{gather_context, Analysis};
use zoom_core::changes::ChangeOutcome;
use zoom_core::FsStorage;
use zoom_server::analysis::{analyze, apply, client_from_config, ApplyReport};

pub fn run(
    root: &Path,
    prompt: &str,
    project: Option<&str>,
    apply_changes: bool,
    json: bool,
) -> anyhow::Result<()> {
    let (config, projects) = super::load(root)?;
    let context = gather_context(&FsStorage, &projects, project)
        .context("failed to gather task context")?;
    let client = client_from_config(&config.llm).context("failed to set up LLM backend")?;
    let timeout = Duration::from_secs(config.llm.timeout_secs);

    let rt = tokio::runtime::Runtime::new()?;
    let analysis = rt
        .block_on(analyze(client.as_ref(), prompt, &context, timeout))
        .with_context(|| format!("analysis via {} failed", client.name()))?;

    let report = if apply_changes && !analysis.proposed_changes.is_empty() {
        Some(apply(root, &analysis.proposed_changes).context("failed to apply changes")?)
    } else {
        None
    };

    if json {
        return print_json(&serde_json::json!({
            "analysis": analysis,
            "applied": report,
        }));
    }

    print_analysis(&analysis);
    if let Some(report) = &report {
        print_report(report);
    } else if !analysis.proposed_changes.is_empty() {
        println!("\nRe-run with --apply to make these changes.");
    }
    Ok(())
}

fn print_analysis(a: &Analysis) {
    println!("{}", a.analysis);

    if !a.suggestions.is_empty() {
        println!("\nSuggestions:");
        for s in &a.suggestions {
            println!("  - {s}");
        }
    }

    if !a.reasoning.is_empty() {
        println!("\nReasoning: {}", a.reasoning);
    }

    if !a.proposed_changes.is_empty() {
        println!("\nProposed changes:");
        for c in &a.proposed_changes {
            println!("  {:<6}  {}", c.change_type.as_str(), c.file_path);
            if let Some(diff) = &c.diff {
                for line in diff.lines() {
                    println!("          {line}");
                }
            }
        }
    }
}

fn print_report(report: &ApplyReport) {
    println!("\nApplied {} of {} changes:", report.applied(), report.results.len());
    for r in &report.results {
        match &r.outcome {
            ChangeOutcome::Applied { .. } => {
                println!("  applied  {} {}", r.change_type.as_str(), r.file_path)
            }
            ChangeOutcome::Skipped { reason } => {
                println!("  skipped  {} {} ({reason})", r.change_type.as_str(), r.file_path)
            }
        }
    }
    if let Some(dir) = &report.snapshot_dir {
        println!("Previous versions saved to {dir}");
    }
}
