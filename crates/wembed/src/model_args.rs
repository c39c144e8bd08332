use wordembed::{EmbeddingOptions, WordEmbedding};

/// Embedding file arg group.
#[derive(clap::Args, Debug)]
pub struct ModelArgs {
    /// Embedding section file.
    #[arg(long)]
    model: String,

    /// Decompose dictionary words too, in subform mode.
    #[arg(long)]
    compose_known_words: bool,

    /// Cap on the number of composed rows.
    #[arg(long)]
    max_composed_rows: Option<usize>,
}

impl ModelArgs {
    /// Get the model path.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The runtime options selected by the flags.
    pub fn options(&self) -> EmbeddingOptions {
        EmbeddingOptions::default()
            .with_compose_known_words(self.compose_known_words)
            .with_max_composed_rows(self.max_composed_rows)
    }

    /// Load the embedding.
    pub fn load_embedding(&self) -> Result<WordEmbedding<u32>, Box<dyn std::error::Error>> {
        log::info!("loading embedding: {}", self.model());
        let embedding = WordEmbedding::load_path(self.model())?.with_options(self.options());
        Ok(embedding)
    }
}
