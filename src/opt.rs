use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(version, about)]
pub struct Options {
    /// Config file for the http server
    #[arg(long, default_value = "short.config")]
    pub config: PathBuf,

    /// The file we should log to
    #[arg(long, default_value = "short.log")]
    pub logfile: PathBuf,

    /// Log to STDOUT/STDERR instead of file
    #[arg(long)]
    pub foreground: bool,

    /// Load the config and mapping files, print "ok", and exit
    #[arg(long)]
    pub validate: bool,

    /// Logging verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}
