use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "urag-backend")]
#[command(version)]
#[command(about = "Tiered FAQ, document-RAG and fallback question answering", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (address from API_ADDRESS)
    Serve,

    /// Build the FAQ and document indexes from the prepared artifacts
    Index {
        /// Drop and recreate both collections before upserting
        #[arg(long)]
        recreate: bool,
    },

    /// Run one or more questions through the engine and print the answers
    Ask {
        /// Questions to answer, each as a separate argument
        #[arg(required = true)]
        questions: Vec<String>,
    },

    /// Print index statistics
    Stats,
}
