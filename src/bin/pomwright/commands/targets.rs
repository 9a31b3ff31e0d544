//! `pomwright targets` command

use anyhow::{bail, Result};

use crate::cli::TargetsArgs;
use pomwright::core::TargetKind;
use pomwright::ops::{self, ListFilter};

pub fn execute(args: TargetsArgs) -> Result<()> {
    let kind = match args.kind.as_deref() {
        Some(form) => match TargetKind::from_declaration_form(form) {
            Some(kind) => Some(kind),
            None => bail!(
                "unknown target kind `{form}`\n\
                 help: one of target, python_library, python_binary, python_tests"
            ),
        },
        None => None,
    };

    let workspace = super::open_workspace()?;
    let rows = ops::list(
        &workspace,
        &ListFilter {
            kind,
            package_prefix: args.package,
        },
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for row in &rows {
            println!("{} ({})", row.address, row.kind.declaration_form());
        }
    }
    Ok(())
}
