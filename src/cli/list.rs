use clap::Parser;

/// Arguments for the list command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List every discovered command:\n    cmdweave list\n\n\
                  List the subcommands of deploy:\n    cmdweave list deploy\n\n\
                  Emit machine-readable output:\n    cmdweave list --json\n\n\
                  List commands visible from another directory:\n    cmdweave -C ../project list")]
pub struct ListArgs {
    /// Only list commands whose name starts with this prefix
    pub prefix: Option<String>,

    /// Print the command set as JSON
    #[arg(long)]
    pub json: bool,
}
