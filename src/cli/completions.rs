use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    cmdweave completions bash > ~/.bash_completion.d/cmdweave\n\n\
                  Generate zsh completions:\n    cmdweave completions zsh > ~/.zfunc/_cmdweave\n\n\
                  Generate fish completions:\n    cmdweave completions fish > ~/.config/fish/completions/cmdweave.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
