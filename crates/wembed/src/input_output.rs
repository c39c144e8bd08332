use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

/// A path argument, where `None` and "-" both select the standard stream.
fn file_path(path: &Option<PathBuf>) -> Option<&Path> {
    path.as_deref().filter(|p| p.as_os_str() != "-")
}

fn describe(
    path: &Option<PathBuf>,
    stream: &'static str,
) -> String {
    match file_path(path) {
        Some(p) => p.display().to_string(),
        None => stream.to_string(),
    }
}

/// Text input argument group.
#[derive(clap::Args, Debug)]
pub struct InputArgs {
    /// Input file; "-" or absent reads stdin.
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,
}

impl InputArgs {
    /// Open a buffered reader for the input.
    pub fn open_reader(&self) -> Result<Box<dyn BufRead>, Box<dyn std::error::Error>> {
        log::debug!("input: {}", describe(&self.input, "<stdin>"));
        Ok(match file_path(&self.input) {
            Some(p) => Box::new(BufReader::new(File::open(p)?)),
            None => Box::new(std::io::stdin().lock()),
        })
    }
}

/// Output argument group.
#[derive(clap::Args, Debug)]
pub struct OutputArgs {
    /// Output file; "-" or absent writes stdout.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl OutputArgs {
    /// A printable name for the output.
    pub fn describe(&self) -> String {
        describe(&self.output, "<stdout>")
    }

    /// Open a buffered writer for the output.
    pub fn open_writer(&self) -> Result<Box<dyn Write>, Box<dyn std::error::Error>> {
        Ok(match file_path(&self.output) {
            Some(p) => Box::new(BufWriter::new(File::create(p)?)),
            None => Box::new(BufWriter::new(std::io::stdout().lock())),
        })
    }
}
