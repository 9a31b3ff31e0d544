//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// pomwright - BUILD manifest tooling for Maven-shaped repos
#[derive(Parser)]
#[command(name = "pomwright")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse every BUILD file and verify the target graph
    Check(CheckArgs),

    /// Generate BUILD files from the Maven module poms
    Gen(GenArgs),

    /// List declared targets
    Targets(TargetsArgs),

    /// Display the dependency tree under a target
    Tree(TreeArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct CheckArgs {
    /// Emit the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct GenArgs {
    /// Print generated manifests instead of writing them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct TargetsArgs {
    /// Only list targets declared under this package prefix
    pub package: Option<String>,

    /// Only list targets of this declaration form
    #[arg(long)]
    pub kind: Option<String>,

    /// Emit the listing as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct TreeArgs {
    /// Target address to expand (`service/http:lib`)
    pub target: String,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
