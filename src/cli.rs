use std::fmt::Display;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::build::CLAP_LONG_VERSION;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[clap(long_version = CLAP_LONG_VERSION)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Parser, Debug)]
pub enum Command {
    /// Assemble a new root filesystem tree from the package repositories.
    #[command(name = "build")]
    Build(BuildOptions),

    /// Check for a newer signed kernel release and apply it.
    #[command(name = "update")]
    Update(UpdateOptions),

    /// Show the installed build and kernel versions.
    #[command(name = "status")]
    Status(StatusOptions),
}

#[derive(Parser, Debug)]
pub struct BuildOptions {
    /// Directory to bootstrap the root filesystem into.
    pub directory: PathBuf,

    /// Package set variant to install.
    #[clap(long, value_enum, default_value_t = Flavor::Lite)]
    pub flavor: Flavor,

    /// Also install the debugging tool set.
    #[clap(long, default_value = "false")]
    pub debug: bool,
}

#[derive(Parser, Debug)]
pub struct UpdateOptions {}

#[derive(Parser, Debug)]
pub struct StatusOptions {}

/// Exclusive choice of package-set variant.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum Flavor {
    #[clap(name = "lite")]
    Lite,

    #[clap(name = "desktop")]
    Desktop,
}

impl Display for Flavor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Flavor::Lite => write!(f, "lite"),
            Flavor::Desktop => write!(f, "desktop"),
        }
    }
}
