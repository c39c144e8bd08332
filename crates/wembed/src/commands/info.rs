use std::io::Write;

use crate::{input_output::OutputArgs, logging::LogArgs, model_args::ModelArgs};

/// Args for the info command.
#[derive(clap::Args, Debug)]
pub struct InfoArgs {
    #[command(flatten)]
    model: ModelArgs,

    #[clap(flatten)]
    logging: LogArgs,

    #[command(flatten)]
    output: OutputArgs,
}

impl InfoArgs {
    /// Run the info command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(2)?;

        let embedding = self.model.load_embedding()?;
        let mut writer = self.output.open_writer()?;

        writeln!(writer, "dimension:  {}", embedding.dimension())?;
        writeln!(writer, "words:      {}", embedding.dictionary().len())?;
        match embedding.unknown_id() {
            Some(id) => writeln!(writer, "unknown id: {id}")?,
            None => writeln!(writer, "unknown id: none")?,
        }
        writeln!(writer, "mode:       {:?}", embedding.mode())?;
        writer.flush()?;

        Ok(())
    }
}
