use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use helmish::{format, Chart, RenderOptions};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the chart directory to preview
    #[arg(long, env = "HELMISH_CHART_PATH", default_value = ".")]
    chart_path: PathBuf,

    /// Name of the profile to render with
    #[arg(long, env = "HELMISH_PROFILE", default_value = "default")]
    profile: String,

    /// Extra values files, merged over values.yaml in the order given
    #[arg(short = 'f', long = "values")]
    values: Vec<PathBuf>,

    /// Only render this template file (e.g. deployment.yaml)
    #[arg(short, long)]
    template: Option<String>,

    #[arg(long, value_enum, default_value_t = Format::Raw)]
    format: Format,

    /// Leave actions that cannot be resolved in the output instead of failing
    #[arg(long)]
    lenient: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// The rendered text
    Raw,
    /// Tokens grouped by source line
    Tokens,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut chart = Chart::load(&cli.chart_path)
        .and_then(|chart| chart.with_values_files(&cli.values))
        .with_context(|| format!("unable to load chart `{}`", cli.chart_path.display()))?;

    if let Some(template) = &cli.template {
        chart.templates.retain(|name, _| name == template);
        if chart.templates.is_empty() {
            anyhow::bail!("chart has no template named `{template}`");
        }
    }

    log::info!(
        "rendering {} template(s) with profile `{}`",
        chart.templates.len(),
        cli.profile
    );

    let options = RenderOptions {
        lenient: cli.lenient,
    };

    let mut failures = 0;
    for (name, documents) in chart.render(&options) {
        let mut rendered = Vec::new();
        for document in documents {
            match document.result {
                Ok(tokens) => rendered.push(tokens),
                Err(e) => {
                    failures += 1;
                    eprintln!("error: {name} (document at line {}): {e}", document.line);
                }
            }
        }

        if rendered.is_empty() {
            continue;
        }

        println!("# Source: {name}");
        let output = match cli.format {
            Format::Raw => format::raw(&rendered),
            Format::Tokens => format::tokens(&rendered),
        };
        println!("{}", output.trim_end_matches('\n'));
    }

    if failures > 0 {
        anyhow::bail!("{failures} document(s) failed to render");
    }

    Ok(())
}
