mod classifier;
mod config;
mod export;
mod fetcher;
mod model;
mod parser;
mod preview;
mod retry;
#[cfg(test)]
mod testing;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use classifier::Classifier;
use config::PipelineConfig;
use export::FrameworkKey;
use fetcher::ReqwestTransport;
use model::ExtractionResult;
use parser::Analyzer;

#[derive(Parser)]
#[command(
    name = "site_inspector",
    about = "Extract a site's HTML, CSS, JS and animation libraries through a CORS proxy"
)]
struct Cli {
    #[command(flatten)]
    pipeline: PipelineArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct PipelineArgs {
    /// Proxy endpoint answering `?url=<target>` with a JSON `contents` envelope
    #[arg(long, global = true, default_value = config::DEFAULT_PROXY_ENDPOINT)]
    proxy: String,
    /// Outer attempts at fetching the root page
    #[arg(long, global = true, default_value_t = config::PAGE_MAX_ATTEMPTS)]
    page_attempts: u32,
    /// Attempts per fetched resource
    #[arg(long, global = true, default_value_t = config::ASSET_MAX_ATTEMPTS)]
    asset_attempts: u32,
    /// Timeout for a single proxy request, in seconds
    #[arg(
        long,
        global = true,
        default_value_t = config::ATTEMPT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_secs: u64,
}

impl PipelineArgs {
    fn config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::default()
            .with_proxy(&self.proxy)
            .with_attempt_timeout(Duration::from_secs(self.timeout_secs));
        config.page_retry = config.page_retry.with_max_attempts(self.page_attempts);
        config.asset_retry = config.asset_retry.with_max_attempts(self.asset_attempts);
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a page and print what was found
    Analyze {
        url: String,
        /// Print the full extraction result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a self-contained preview document
    Preview {
        url: String,
        #[arg(short, long, default_value = "preview.html")]
        output: PathBuf,
    },
    /// Generate a single-file component for a framework
    Export {
        url: String,
        #[arg(short, long, value_enum)]
        framework: FrameworkKey,
        /// Directory the file is written to
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
        /// Print the code instead of writing a file
        #[arg(long)]
        stdout: bool,
    },
    /// List export targets
    Frameworks,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let config = cli.pipeline.config();

    let result = match cli.command {
        Commands::Analyze { url, json } => {
            let result = analyze(&url, &config).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_summary(&result);
            }
            Ok(())
        }
        Commands::Preview { url, output } => {
            let result = analyze(&url, &config).await?;
            let doc = preview::build_preview_document(&result);
            std::fs::write(&output, doc)
                .with_context(|| format!("writing preview to {}", output.display()))?;
            println!("Preview written to {}", output.display());
            Ok(())
        }
        Commands::Export {
            url,
            framework,
            output,
            stdout,
        } => {
            let result = analyze(&url, &config).await?;
            let artifact = export::generate(&result, framework);
            if stdout {
                print!("{}", artifact.code);
            } else {
                std::fs::create_dir_all(&output)
                    .with_context(|| format!("creating {}", output.display()))?;
                let path = output.join(&artifact.filename);
                std::fs::write(&path, &artifact.code)
                    .with_context(|| format!("writing export to {}", path.display()))?;
                println!("{} export written to {}", framework.label(), path.display());
            }
            Ok(())
        }
        Commands::Frameworks => {
            for key in FrameworkKey::ALL {
                println!("{:<11} {:<28} {}", key.key(), key.label(), key.filename());
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    result
}

async fn analyze(url: &str, config: &PipelineConfig) -> anyhow::Result<ExtractionResult> {
    let timeout = config
        .asset_retry
        .attempt_timeout()
        .unwrap_or(Duration::from_secs(config::ATTEMPT_TIMEOUT_SECS));
    let transport = ReqwestTransport::new(timeout).context("building HTTP client")?;
    let analyzer = Analyzer::new(transport, Classifier::shared(), config);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(120));

    let result = analyzer.analyze(url, &pb).await;
    pb.finish_and_clear();
    Ok(result?)
}

fn print_summary(r: &ExtractionResult) {
    println!("Title:          {}", r.title);
    println!("Description:    {}", truncate(&r.description, 100));
    println!("Base URL:       {}", r.base_url);
    println!("Links:          {} internal, {} external", r.internal_links, r.external_links);
    println!("Images:         {}", r.images.len());
    println!("Stylesheets:    {}", r.stylesheets);
    println!("Open Graph:     {}", r.open_graph_tags);
    println!(
        "Captured:       {} bytes HTML, {} bytes CSS, {} bytes JS",
        r.full_html.len(),
        r.full_css.len(),
        r.full_js.len()
    );

    let tech: Vec<&str> = r.tech_guesses.iter().map(String::as_str).collect();
    println!(
        "Tech:           {}",
        if tech.is_empty() { "-".to_string() } else { tech.join(", ") }
    );

    let files = r.animation_files();
    if files.is_empty() {
        println!("\nNo animation files detected.");
        return;
    }

    println!("\n{:>3} | {:<18} | {:>5} | {:<4} | {}", "#", "Library", "Conf", "Type", "Source");
    println!("{}", "-".repeat(90));
    for (i, f) in files.iter().enumerate() {
        let library = f.library.map(|l| l.name()).unwrap_or("-");
        let kind = match f.kind {
            model::AssetKind::Css => "css",
            model::AssetKind::Js => "js",
        };
        println!(
            "{:>3} | {:<18} | {:>4.0}% | {:<4} | {}",
            i + 1,
            library,
            f.confidence,
            kind,
            truncate(&f.url, 56)
        );
    }

    println!("\n--- CDN requirements ---");
    for url in r.required_cdn_urls() {
        println!("  {}", url);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_config() {
        let cli = Cli::parse_from([
            "site_inspector",
            "--page-attempts",
            "3",
            "--asset-attempts",
            "0",
            "--proxy",
            "https://proxy.test/get",
            "frameworks",
        ]);
        let config = cli.pipeline.config();
        assert_eq!(config.page_retry.max_attempts(), 3);
        assert_eq!(config.asset_retry.max_attempts(), 1);
        assert_eq!(config.proxy_endpoint, "https://proxy.test/get");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let parsed = Cli::try_parse_from(["site_inspector", "--timeout-secs", "0", "frameworks"]);
        assert!(parsed.is_err());
        let cli = Cli::try_parse_from(["site_inspector", "--timeout-secs", "5", "frameworks"]).unwrap();
        assert_eq!(
            cli.pipeline.config().asset_retry.attempt_timeout(),
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn defaults_match_pipeline_defaults() {
        let cli = Cli::parse_from(["site_inspector", "analyze", "example.com"]);
        let config = cli.pipeline.config();
        let defaults = PipelineConfig::default();
        assert_eq!(config.page_retry, defaults.page_retry);
        assert_eq!(config.asset_retry, defaults.asset_retry);
    }

    #[test]
    fn export_parses_framework_key() {
        let cli = Cli::parse_from(["site_inspector", "export", "x.test", "-f", "vite-react"]);
        match cli.command {
            Commands::Export { framework, output, stdout, .. } => {
                assert_eq!(framework, FrameworkKey::ViteReact);
                assert_eq!(output, PathBuf::from("."));
                assert!(!stdout);
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("héllo", 10), "héllo");
        assert_eq!(truncate("héllo world", 5), "héllo...");
    }
}
