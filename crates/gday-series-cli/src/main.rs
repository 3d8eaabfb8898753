//! gday-series CLI - derive, smooth and plot GDAY model output

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gday_series::aggregate::{trim_offsets, DEFAULT_PERCENTILES, DEFAULT_WINDOW};
use gday_series::prelude::*;
use gday_series::to_json;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "gday-series")]
#[command(author, version, about = "Derive, smooth and plot GDAY model output")]
struct Cli {
    /// Configuration file (TOML); built-in defaults when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print or save one derived series
    Derive {
        /// Derived variable name
        variable: String,

        /// Raw output file name in the data directory
        source: SourceId,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the centred moving average of a derived series
    Annual {
        variable: String,
        source: SourceId,

        /// Window length in days
        #[arg(short, long, default_value_t = DEFAULT_WINDOW)]
        window: usize,

        /// Interpolate missing values before smoothing
        #[arg(long)]
        fill_gaps: bool,
    },

    /// Print day-of-year percentiles of a derived series
    Seasonal {
        variable: String,
        source: SourceId,

        /// Days per year (default: from config)
        #[arg(long)]
        year_length: Option<usize>,
    },

    /// Build a figure description as JSON
    Figure {
        kind: FigureKind,

        /// Model tags (default: all configured models)
        #[arg(short, long, value_delimiter = ',')]
        models: Vec<String>,

        /// Experiment tags (default: all four)
        #[arg(short, long, value_delimiter = ',')]
        experiments: Vec<Experiment>,

        /// Derived variables, one panel each
        #[arg(short, long, value_delimiter = ',', required = true)]
        variables: Vec<String>,

        /// Moving-average window for annual figures
        #[arg(short, long, default_value_t = DEFAULT_WINDOW)]
        window: usize,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List configured formulas
    Formulas,

    /// Remove every cached artifact
    ClearCache,
}

#[derive(Clone, Copy, ValueEnum)]
enum FigureKind {
    Annual,
    Seasonal,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => Config::default(),
    };
    let cache = DerivedCache::new(config);

    match cli.command {
        Commands::Derive {
            variable,
            source,
            output,
        } => derive(&cache, &variable, &source, output.as_deref()),
        Commands::Annual {
            variable,
            source,
            window,
            fill_gaps,
        } => annual(&cache, &variable, &source, window, fill_gaps),
        Commands::Seasonal {
            variable,
            source,
            year_length,
        } => seasonal(&cache, &variable, &source, year_length),
        Commands::Figure {
            kind,
            models,
            experiments,
            variables,
            window,
            output,
        } => figure(
            &cache,
            kind,
            models,
            experiments,
            &variables,
            window,
            output.as_deref(),
        ),
        Commands::Formulas => list_formulas(cache.config()),
        Commands::ClearCache => {
            let removed = cache.clear().context("Failed to clear cache")?;
            eprintln!(
                "Removed {} artifacts from '{}'",
                removed,
                cache.config().cache_dir.display()
            );
            Ok(())
        }
    }?;

    tracing::debug!(stats = ?cache.stats(), "done");
    Ok(())
}

fn get(cache: &DerivedCache, variable: &str, source: &SourceId) -> Result<DerivedSeries> {
    cache
        .get_variable(variable, source)
        .with_context(|| format!("Failed to derive '{}' from '{}'", variable, source))
}

fn derive(
    cache: &DerivedCache,
    variable: &str,
    source: &SourceId,
    output: Option<&Path>,
) -> Result<()> {
    let series = get(cache, variable, source)?;

    if let Some(output_path) = output {
        series
            .save(output_path)
            .with_context(|| format!("Failed to write '{}'", output_path.display()))?;
        eprintln!("Wrote {} values to '{}'", series.len(), output_path.display());
    } else {
        write_values(series.values())?;
    }

    Ok(())
}

fn annual(
    cache: &DerivedCache,
    variable: &str,
    source: &SourceId,
    window: usize,
    fill_gaps: bool,
) -> Result<()> {
    let series = get(cache, variable, source)?;
    let smoothed = moving_average(series.values(), window, fill_gaps)?;
    let (lead, trail) = trim_offsets(window.max(1));
    eprintln!(
        "{} values, trimmed {} leading and {} trailing",
        smoothed.len(),
        lead,
        trail
    );
    write_values(&smoothed)
}

fn seasonal(
    cache: &DerivedCache,
    variable: &str,
    source: &SourceId,
    year_length: Option<usize>,
) -> Result<()> {
    let series = get(cache, variable, source)?;
    let year_length = year_length.unwrap_or(cache.config().year_length);
    let bands = seasonal_bands(series.values(), year_length, &DEFAULT_PERCENTILES)?;

    let mut out = BufWriter::new(io::stdout().lock());
    write!(out, "day,samples")?;
    for p in &bands.percentiles {
        write!(out, ",p{}", p)?;
    }
    writeln!(out)?;
    for day in &bands.days {
        write!(out, "{},{}", day.day, day.samples)?;
        for v in &day.values {
            write!(out, ",{}", v)?;
        }
        writeln!(out)?;
    }
    out.flush().context("Failed to write to stdout")?;

    eprintln!("{} complete years", bands.years);
    Ok(())
}

fn figure(
    cache: &DerivedCache,
    kind: FigureKind,
    models: Vec<String>,
    experiments: Vec<Experiment>,
    variables: &[String],
    window: usize,
    output: Option<&Path>,
) -> Result<()> {
    let models = if models.is_empty() {
        cache.config().models.clone()
    } else {
        models
    };
    let experiments = if experiments.is_empty() {
        Experiment::ALL.to_vec()
    } else {
        experiments
    };

    let figure = match kind {
        FigureKind::Annual => {
            let options = AnnualOptions {
                window,
                ..Default::default()
            };
            annual_figure(cache, &models, &experiments, variables, &options)?
        }
        FigureKind::Seasonal => {
            seasonal_figure(cache, &models, &experiments, variables, &SeasonalOptions::default())?
        }
    };
    let json = to_json(&figure)?;

    if let Some(output_path) = output {
        std::fs::write(output_path, &json)
            .with_context(|| format!("Failed to write '{}'", output_path.display()))?;
        eprintln!(
            "Wrote {} panels to '{}'",
            figure.panels.len(),
            output_path.display()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn list_formulas(config: &Config) -> Result<()> {
    for (name, formula) in config.formulas.iter() {
        let info = config.metadata.variable(name);
        println!("{}\t{}\t{}", name, formula, info.axis_label());
    }
    Ok(())
}

fn write_values(values: &[f64]) -> Result<()> {
    let mut out = BufWriter::new(io::stdout().lock());
    for v in values {
        writeln!(out, "{}", v)?;
    }
    out.flush().context("Failed to write to stdout")
}
