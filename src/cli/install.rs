use clap::Parser;

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Install the newest stable version:\n    scriptshell install Acme.Json\n\n\
                   Install an exact version:\n    scriptshell install Acme.Json --version 2.1.0\n\n\
                   Allow prereleases:\n    scriptshell install Acme.Json --prerelease\n\n\
                   Target another framework:\n    scriptshell install Acme.Json --framework netstandard2.0")]
pub struct InstallArgs {
    /// Package id
    pub id: String,

    /// Exact version to install (newest matching version when omitted)
    #[arg(long)]
    pub version: Option<String>,

    /// Target framework (defaults to the workspace framework)
    #[arg(long, short = 'f')]
    pub framework: Option<String>,

    /// Consider prerelease versions
    #[arg(long)]
    pub prerelease: bool,
}

#[cfg(test)]
mod tests {
    use super::super::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_cli_parsing_install() {
        let cli = Cli::try_parse_from(["scriptshell", "install", "Acme.Json"]).unwrap();
        match cli.command {
            Commands::Install(args) => {
                assert_eq!(args.id, "Acme.Json");
                assert!(args.version.is_none());
                assert!(args.framework.is_none());
                assert!(!args.prerelease);
            }
            _ => panic!("Expected Install command"),
        }
    }

    #[test]
    fn test_cli_parsing_install_with_options() {
        let cli = Cli::try_parse_from([
            "scriptshell",
            "install",
            "Acme.Json",
            "--version",
            "2.0.0-beta",
            "-f",
            "net45",
            "--prerelease",
        ])
        .unwrap();
        match cli.command {
            Commands::Install(args) => {
                assert_eq!(args.version.as_deref(), Some("2.0.0-beta"));
                assert_eq!(args.framework.as_deref(), Some("net45"));
                assert!(args.prerelease);
            }
            _ => panic!("Expected Install command"),
        }
    }

    #[test]
    fn test_cli_install_requires_id() {
        assert!(Cli::try_parse_from(["scriptshell", "install"]).is_err());
    }
}
