use clap::Parser;

/// Arguments for the repl command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Start a session in the current workspace:\n    scriptshell repl\n\n\
                  Pass arguments to scripts (Env.ScriptArgs):\n    scriptshell repl -- --fast input.txt")]
pub struct ReplArgs {
    /// Arguments made available to scripts
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub script_args: Vec<String>,
}
