use std::io::{BufRead, Write};

use wordembed::{LookupMode, WordEmbedding, WordembedError};

use crate::{
    input_output::{InputArgs, OutputArgs},
    logging::LogArgs,
};

/// Word which marks the unknown row in a text table.
const UNKNOWN_WORD: &str = "<unk>";

/// Args for the build command.
#[derive(clap::Args, Debug)]
pub struct BuildArgs {
    #[clap(flatten)]
    logging: LogArgs,

    /// Reserve an unknown row; taken from the `<unk>` line, or zeros.
    #[arg(long)]
    unknown: bool,

    /// Enable subform (character n-gram) mode.
    #[arg(long)]
    subform: bool,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    output: OutputArgs,
}

impl BuildArgs {
    /// Run the build command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(3)?;

        let mut reader = self.input.open_reader()?;
        let embedding = read_text_table(&mut reader, self.unknown, self.subform)?;
        log::info!(
            "built embedding: {} words of dimension {}",
            embedding.dictionary().len(),
            embedding.dimension()
        );

        log::info!("output: {}", self.output.describe());
        let mut writer = self.output.open_writer()?;
        embedding.write_to(&mut writer)?;
        writer.flush()?;

        Ok(())
    }
}

/// Parse a ``word v1 v2 ...`` text table into an embedding.
///
/// Blank lines are skipped. All rows must have the same width.
/// With `unknown`, a `<unk>` line supplies the unknown row (zeros otherwise);
/// without it, `<unk>` is an ordinary word.
fn read_text_table(
    reader: &mut dyn BufRead,
    unknown: bool,
    subform: bool,
) -> Result<WordEmbedding<u32>, WordembedError> {
    let mut words: Vec<String> = Vec::new();
    let mut weights: Vec<f32> = Vec::new();
    let mut unknown_row: Option<Vec<f32>> = None;
    let mut dimension: Option<usize> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let mut fields = line.split_whitespace();
        let Some(word) = fields.next() else {
            continue;
        };

        let row = fields
            .map(|v| {
                v.parse::<f32>()
                    .map_err(|e| WordembedError::Parse(format!("line {}: {v:?}: {e}", idx + 1)))
            })
            .collect::<Result<Vec<f32>, _>>()?;

        match dimension {
            None => dimension = Some(row.len()),
            Some(dim) if dim != row.len() => {
                return Err(WordembedError::Parse(format!(
                    "line {}: expected {dim} values, found {}",
                    idx + 1,
                    row.len()
                )));
            }
            _ => {}
        }

        if unknown && word == UNKNOWN_WORD {
            unknown_row = Some(row);
        } else {
            words.push(word.to_string());
            weights.extend(row);
        }
    }

    let dimension =
        dimension.ok_or_else(|| WordembedError::Parse("empty embedding table".to_string()))?;
    if unknown {
        weights.extend(unknown_row.unwrap_or_else(|| vec![0.0; dimension]));
    }

    WordEmbedding::from_parts(
        dimension,
        words,
        weights,
        unknown,
        LookupMode::from_subform_flag(subform),
    )
}
