//! `pomwright check` command

use anyhow::Result;

use crate::cli::CheckArgs;
use pomwright::ops::{self, CheckViolation};
use pomwright::util::diagnostic::{self, ManifestParseError};

pub fn execute(args: CheckArgs, no_color: bool) -> Result<()> {
    let workspace = super::open_workspace()?;
    let report = ops::check(&workspace)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for violation in &report.violations {
            emit_violation(workspace.root(), violation, no_color);
        }
        println!(
            "checked {} files, {} targets, {} edges: {}",
            report.files,
            report.targets,
            report.edges,
            if report.ok() {
                "ok".to_string()
            } else {
                format!("{} problems", report.violations.len())
            }
        );
    }

    if !report.ok() {
        std::process::exit(1);
    }
    Ok(())
}

/// Syntax errors get a source snippet; everything else renders as a plain
/// diagnostic.
fn emit_violation(root: &std::path::Path, violation: &CheckViolation, no_color: bool) {
    if let CheckViolation::SyntaxError {
        file,
        message,
        offset,
        len,
    } = violation
    {
        // Violation paths are workspace-relative, not cwd-relative.
        if let Ok(contents) = std::fs::read_to_string(root.join(file)) {
            let report =
                miette::Report::new(ManifestParseError::new(file, contents, message, *offset, *len));
            eprintln!("{report:?}");
            return;
        }
    }
    diagnostic::emit(&violation.to_diagnostic(), !no_color);
}
