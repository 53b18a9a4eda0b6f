use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    scriptshell completions bash > ~/.bash_completion.d/scriptshell\n\n\
                  Generate zsh completions:\n    scriptshell completions zsh > ~/.zfunc/_scriptshell\n\n\
                  Generate fish completions:\n    scriptshell completions fish > ~/.config/fish/completions/scriptshell.fish\n\n\
                  Generate PowerShell completions:\n    scriptshell completions powershell")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
