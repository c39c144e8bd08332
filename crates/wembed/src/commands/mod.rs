mod build;
mod info;
mod lookup;

/// Subcommands for wembed
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Describe an embedding file.
    Info(info::InfoArgs),

    /// Resolve words and print their ids (and optionally vectors).
    Lookup(lookup::LookupArgs),

    /// Build an embedding file from a text table.
    Build(build::BuildArgs),
}

impl Commands {
    /// Run the subcommand.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Commands::Info(cmd) => cmd.run(),
            Commands::Lookup(cmd) => cmd.run(),
            Commands::Build(cmd) => cmd.run(),
        }
    }
}
