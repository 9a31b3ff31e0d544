//! `pomwright gen` command

use anyhow::Result;

use crate::cli::GenArgs;
use pomwright::ops::{self, GenOptions};
use pomwright::ops::generate::GenStatus;

pub fn execute(args: GenArgs) -> Result<()> {
    let workspace = super::open_workspace()?;
    let report = ops::generate(
        &workspace,
        GenOptions {
            dry_run: args.dry_run,
        },
    )?;

    for file in &report.files {
        match file.status {
            GenStatus::Written if args.dry_run => {
                println!("would write {}", file.path.display());
                print!("{}", file.contents);
                println!();
            }
            GenStatus::Written => println!("wrote {}", file.path.display()),
            GenStatus::Unchanged => println!("unchanged {}", file.path.display()),
            GenStatus::Skipped => println!("skipped {} (no pom.xml)", file.module),
        }
    }
    println!(
        "{} written, {} unchanged, {} skipped",
        report.written(),
        report.unchanged(),
        report.skipped()
    );
    Ok(())
}
