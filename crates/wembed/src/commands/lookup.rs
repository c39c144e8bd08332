use std::io::{BufRead, Write};

use wordembed::WordEmbedding;

use crate::{
    input_output::{InputArgs, OutputArgs},
    logging::LogArgs,
    model_args::ModelArgs,
};

/// Args for the lookup command.
#[derive(clap::Args, Debug)]
pub struct LookupArgs {
    #[command(flatten)]
    model: ModelArgs,

    #[clap(flatten)]
    logging: LogArgs,

    /// Also print the row vector of each word.
    #[arg(long)]
    vectors: bool,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    output: OutputArgs,
}

impl LookupArgs {
    /// Run the lookup command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(2)?;

        let mut embedding = self.model.load_embedding()?;
        let mut reader = self.input.open_reader()?;
        let mut writer = self.output.open_writer()?;

        run_lookup(&mut embedding, &mut reader, &mut writer, self.vectors)?;

        log::info!(
            "{} rows after lookup ({} loaded)",
            embedding.rows(),
            embedding.dictionary().len() + embedding.unknown_id().is_some() as usize
        );
        Ok(())
    }
}

/// Resolve every whitespace-separated word of `reader`.
///
/// Writes ``word<TAB>kind<TAB>id`` lines, with the row values appended when
/// `vectors` is set. Unresolved words print ``-`` as their id.
fn run_lookup(
    embedding: &mut WordEmbedding<u32>,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
    vectors: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    for line in reader.lines() {
        let line = line?;
        for word in line.split_whitespace() {
            let lookup = embedding.lookup(word)?;
            write!(writer, "{word}\t{}", lookup.kind())?;
            match lookup.id() {
                Some(id) => {
                    write!(writer, "\t{id}")?;
                    if vectors && let Some(row) = embedding.get_row(id) {
                        for v in row {
                            write!(writer, " {v}")?;
                        }
                    }
                }
                None => write!(writer, "\t-")?,
            }
            writeln!(writer)?;
        }
        writer.flush()?;
    }
    Ok(())
}
