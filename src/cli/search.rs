use clap::Parser;

/// Arguments for the search command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List the most downloaded packages:\n    scriptshell search\n\n\
                  Search by text:\n    scriptshell search json\n\n\
                  Second page of 10:\n    scriptshell search json --page 1 --page-size 10")]
pub struct SearchArgs {
    /// Text matched against package id, title and description
    pub filter: Option<String>,

    /// Zero-based result page
    #[arg(long, default_value_t = 0)]
    pub page: usize,

    /// Maximum number of results
    #[arg(long, default_value_t = 15)]
    pub page_size: usize,
}
