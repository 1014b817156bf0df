use clap::Parser;

/// Arguments for the show command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show a top-level command:\n    cmdweave show build\n\n\
                  Show a subcommand:\n    cmdweave show deploy staging\n\n\
                  Show a command from a specific module:\n    cmdweave show tools lint")]
pub struct ShowArgs {
    /// Command name; multiple words address a subcommand
    #[arg(required = true, num_args = 1..)]
    pub name: Vec<String>,
}

impl ShowArgs {
    /// The space-joined command name
    pub fn full_name(&self) -> String {
        self.name.join(" ")
    }
}
