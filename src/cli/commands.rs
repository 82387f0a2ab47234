use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Args, Subcommand};
use eyre::{Result, WrapErr, bail};
use serde_json::Value;
use tracing::info;

use codeq_nlp_api::blocking::Client;
use codeq_nlp_api::{Annotator, ClientConfig};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send text to the service and print the resulting document as JSON
    Analyze(AnalyzeArgs),

    /// List the annotator stages that can be requested
    Annotators,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Text to analyze, joined by spaces. Read from --file or stdin when omitted
    pub text: Vec<String>,

    /// Read the text from a file
    #[arg(short, long, value_name = "FILE", conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Comma-separated stages, e.g. "pos, ner". Runs the full pipeline when omitted
    #[arg(short, long, value_name = "STAGES")]
    pub pipeline: Option<String>,

    /// Keep per-annotator run times and error messages
    #[arg(long)]
    pub benchmark: bool,

    /// Print JSON on a single line
    #[arg(long)]
    pub compact: bool,
}

impl AnalyzeArgs {
    pub fn execute(&self, config: ClientConfig) -> Result<()> {
        let text = self.read_text()?;
        if text.trim().is_empty() {
            bail!("no text to analyze");
        }

        let client = Client::new(config)?;
        info!(endpoint = client.endpoint(), "sending {} bytes", text.len());
        let document = client.analyze(&text, self.pipeline.as_deref(), self.benchmark)?;

        if self.compact {
            println!("{}", Value::Object(document.to_presentable_mapping()));
        } else {
            println!("{}", document.render_json());
        }
        Ok(())
    }

    fn read_text(&self) -> Result<String> {
        if !self.text.is_empty() {
            return Ok(self.text.join(" "));
        }
        if let Some(path) = &self.file {
            return fs::read_to_string(path)
                .wrap_err_with(|| format!("failed to read {}", path.display()));
        }
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .wrap_err("failed to read stdin")?;
        Ok(text)
    }
}

pub fn list_annotators() -> Result<()> {
    for annotator in Annotator::ALL {
        println!("{annotator}");
    }
    Ok(())
}
