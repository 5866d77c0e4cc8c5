use anyhow::{Context, Result};
use clap::Parser;
use detect_sp::cli::{Cli, OutputFormat};
use detect_sp::config::AnalysisConfig;
use detect_sp::csv_output;
use detect_sp::dataset::Dataset;
use detect_sp::engine;
use detect_sp::json_output::{JsonOutput, JsonSummary};
use detect_sp::results::{LabeledResults, ResultTable, View, DEFAULT_TREND_COLUMNS};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Configuration file (if any) with command-line overrides applied
fn load_config(cli: &Cli) -> Result<AnalysisConfig> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_toml(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    cli.apply_to(&mut config);
    config.validate().context("Invalid analysis configuration")?;
    Ok(config)
}

enum Report {
    Rows(ResultTable),
    Views(Vec<View>),
}

fn print_text(report: &Report, summary: &JsonSummary) {
    match report {
        Report::Rows(rows) => print!("{}", rows.to_report_string()),
        Report::Views(views) => {
            for view in views {
                println!("{}", view);
            }
        }
    }
    eprintln!(
        "{} rows, {} flagged, {} views",
        summary.total_rows, summary.flagged_rows, summary.views
    );
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let data = Dataset::from_json_file(&cli.data)
        .with_context(|| format!("Failed to load dataset: {}", cli.data.display()))?;
    tracing::info!(
        rows = data.n_rows(),
        columns = data.n_columns(),
        "dataset loaded"
    );

    let table = engine::analyze(&data, &config).context("Analysis failed")?;
    let total_rows = table.len();

    let policy = config.paradox_policy();
    let mut results = LabeledResults::new(table);
    let flagged = results.get_sp_rows(policy.as_ref(), DEFAULT_TREND_COLUMNS);
    let views =
        results.get_sp_views(policy.as_ref(), DEFAULT_TREND_COLUMNS, config.colored_views)?;

    let summary = JsonSummary {
        total_rows,
        flagged_rows: flagged.len(),
        views: views.len(),
    };

    let report = if cli.wants_views(&config) {
        Report::Views(views)
    } else if cli.all_rows {
        Report::Rows(results.into_table())
    } else {
        Report::Rows(flagged)
    };

    match cli.format {
        OutputFormat::Text => print_text(&report, &summary),
        OutputFormat::Json => {
            let mut output = JsonOutput::new(policy.name());
            output.set_summary(summary);
            match report {
                Report::Rows(rows) => output.set_rows(rows),
                Report::Views(views) => output.set_views(views),
            }
            println!("{}", output.to_json()?);
        }
        OutputFormat::Csv => match &report {
            Report::Rows(rows) => print!("{}", csv_output::table_to_csv(rows)),
            Report::Views(views) => {
                print!("{}", csv_output::views_to_csv(views, config.colored_views))
            }
        },
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    run(&cli)
}
