//! `pomwright tree` command

use anyhow::Result;

use crate::cli::TreeArgs;
use pomwright::ops;

pub fn execute(args: TreeArgs) -> Result<()> {
    let workspace = super::open_workspace()?;
    print!("{}", ops::tree(&workspace, &args.target)?);
    Ok(())
}
