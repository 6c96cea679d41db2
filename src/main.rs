mod enrich;
mod extract;
mod page;
mod text;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::page::{Page, StaticPage};

#[derive(Parser)]
#[command(name = "prospect_scraper", about = "Extract prospect fields from Sales Navigator profile pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract name, title, company and biography from a profile page
    Extract {
        /// Path to a saved HTML page ("-" for stdin)
        input: Option<String>,
        /// Fetch the page from a URL instead of a file
        #[arg(long, conflicts_with = "input")]
        url: Option<String>,
        /// Summarize the biography via the note-generator backend
        #[arg(long)]
        summarize: bool,
        /// Base URL of the note-generator backend
        #[arg(long, default_value = "http://localhost:8000")]
        api_base: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Dump the flattened text lines the biography scanner sees
    Lines {
        /// Path to a saved HTML page ("-" for stdin)
        input: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { input, url, summarize, api_base, json } => {
            let mut page = load_page(input.as_deref(), url.as_deref()).await?;
            let mut prospect = extract::extract_prospect(&mut page).await;

            if !prospect.is_valid() {
                anyhow::bail!(
                    "Could not extract prospect data: name and company are required \
                     (make sure this is a profile page). Got name={:?}, company={:?}",
                    prospect.name,
                    prospect.company
                );
            }

            if summarize && prospect.biography.len() > extract::bio::MIN_BIO_LEN {
                let summarizer = enrich::Summarizer::new(api_base);
                if let Some(summary) = summarizer
                    .summarize(&prospect.biography, &prospect.name, &prospect.title)
                    .await
                {
                    prospect.biography = summary;
                }
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&prospect)?);
            } else {
                println!("Name:    {}", prospect.name);
                println!("Title:   {}", or_dash(&prospect.title));
                println!("Company: {}", prospect.company);
                println!("Bio:     {}", or_dash(&prospect.biography));
            }
            Ok(())
        }
        Commands::Lines { input } => {
            let page = load_from_input(&input)?;
            let flat = page.visible_text();
            for (i, line) in text::text_lines(&flat).iter().enumerate() {
                println!("{:>4}  {}", i, line);
            }
            Ok(())
        }
    }
}

async fn load_page(input: Option<&str>, url: Option<&str>) -> anyhow::Result<StaticPage> {
    match (input, url) {
        (_, Some(url)) => page::fetch_page(url).await,
        (Some(input), None) => load_from_input(input),
        (None, None) => anyhow::bail!("Provide a page file, \"-\" for stdin, or --url"),
    }
}

fn load_from_input(input: &str) -> anyhow::Result<StaticPage> {
    if input == "-" {
        let html = std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")?;
        Ok(StaticPage::new(html))
    } else {
        StaticPage::from_file(input)
    }
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}
