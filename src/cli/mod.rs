mod report;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use seasoncost::config::AnalysisConfig;
use seasoncost::services::{Analysis, DataLoaderService, LoadRequest};

/// Seasonal product-cost comparison
#[derive(Parser)]
#[command(name = "seasoncost")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Analysis config JSON (default: ~/.seasoncost/config.json if present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show per-item prior vs current comparison
    Items(ReportArgs),

    /// Show per-category subtotals
    Categories(ReportArgs),

    /// Show the total row (summary total when given)
    Total(ReportArgs),

    /// Show headline metrics: YoY, FX effect, markup
    Metrics(ReportArgs),
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Cost CSV file or a directory of them
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Pre-computed summary JSON; its total wins over the derived one
    #[arg(long)]
    summary: Option<PathBuf>,

    /// FX table CSV (needs --brand, --prior-season and --current-season)
    #[arg(long)]
    fx_table: Option<PathBuf>,

    /// Dashboard id for FX lookup (e.g. 26SS-M)
    #[arg(long)]
    brand: Option<String>,

    /// Prior season code (e.g. 25SS)
    #[arg(long)]
    prior_season: Option<String>,

    /// Current season code (e.g. 26SS)
    #[arg(long)]
    current_season: Option<String>,

    /// Prior-period KRW per USD
    #[arg(long)]
    fx_prior: Option<f64>,

    /// Current-period KRW per USD
    #[arg(long)]
    fx_current: Option<f64>,

    /// Tag price divisor used for cost rate
    #[arg(long)]
    tax_factor: Option<f64>,

    /// Keep SHOES/BAG/HEADWEAR as separate categories
    #[arg(long)]
    no_fold: bool,

    /// Only show this category (items)
    #[arg(long)]
    category: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

impl ReportArgs {
    fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(season) = &self.prior_season {
            config.prior_season = Some(season.clone());
        }
        if let Some(season) = &self.current_season {
            config.current_season = Some(season.clone());
        }
        if let Some(rate) = self.fx_prior {
            config.fx.prior = rate;
        }
        if let Some(rate) = self.fx_current {
            config.fx.current = rate;
        }
        if let Some(factor) = self.tax_factor {
            config.tax_factor = factor;
        }
        if self.no_fold {
            config.fold_accessories = false;
        }
    }

    fn request(&self) -> LoadRequest {
        LoadRequest {
            input: self.input.clone(),
            summary: self.summary.clone(),
            fx_table: self.fx_table.clone(),
            brand: self.brand.clone(),
        }
    }

    fn load(&self, config_path: Option<&std::path::Path>) -> anyhow::Result<Analysis> {
        let mut config = AnalysisConfig::load(config_path)?;
        self.apply(&mut config);
        config.validate()?;
        let service = DataLoaderService::new(config);
        Ok(service.load(&self.request())?)
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let config_path = self.config.as_deref();
        match &self.command {
            Commands::Items(args) => {
                let analysis = args.load(config_path)?;
                let items: Vec<_> = analysis
                    .items
                    .iter()
                    .filter(|i| args.category.as_deref().is_none_or(|c| i.category == c))
                    .cloned()
                    .collect();
                if args.json {
                    print_json(&items)
                } else {
                    print!("{}", report::render_items(&items));
                    Ok(())
                }
            }
            Commands::Categories(args) => {
                let analysis = args.load(config_path)?;
                if args.json {
                    print_json(&analysis.categories)
                } else {
                    print!("{}", report::render_categories(&analysis.categories));
                    Ok(())
                }
            }
            Commands::Total(args) => {
                let analysis = args.load(config_path)?;
                let Some(total) = analysis.total else {
                    anyhow::bail!("no cost rows and no summary total in input");
                };
                if args.json {
                    print_json(&total)
                } else {
                    print!("{}", report::render_total(&total));
                    Ok(())
                }
            }
            Commands::Metrics(args) => {
                let analysis = args.load(config_path)?;
                let Some(metrics) = analysis.metrics else {
                    anyhow::bail!("no cost rows and no summary total in input");
                };
                if args.json {
                    print_json(&metrics)
                } else {
                    print!("{}", report::render_metrics(&metrics));
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["seasoncost"]).is_err());
    }

    #[test]
    fn test_cli_parse_items() {
        let cli = Cli::try_parse_from(["seasoncost", "items", "data.csv"]).unwrap();
        let Commands::Items(args) = cli.command else {
            panic!("expected items");
        };
        assert_eq!(args.input, PathBuf::from("data.csv"));
        assert!(!args.json);
    }

    #[test]
    fn test_cli_parse_total_with_options() {
        let cli = Cli::try_parse_from([
            "seasoncost",
            "total",
            "data",
            "--summary",
            "summary.json",
            "--tax-factor",
            "1.0",
            "--json",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Commands::Total(args) = cli.command else {
            panic!("expected total");
        };
        assert_eq!(args.summary, Some(PathBuf::from("summary.json")));
        assert_eq!(args.tax_factor, Some(1.0));
        assert!(args.json);
    }

    #[test]
    fn test_report_args_apply_overrides() {
        let cli = Cli::try_parse_from([
            "seasoncost",
            "metrics",
            "data.csv",
            "--prior-season",
            "25SS",
            "--current-season",
            "26SS",
            "--fx-prior",
            "1350",
            "--no-fold",
        ])
        .unwrap();
        let Commands::Metrics(args) = cli.command else {
            panic!("expected metrics");
        };

        let mut config = AnalysisConfig::default();
        args.apply(&mut config);
        assert_eq!(config.prior_season.as_deref(), Some("25SS"));
        assert_eq!(config.current_season.as_deref(), Some("26SS"));
        assert!((config.fx.prior - 1350.0).abs() < f64::EPSILON);
        assert!((config.fx.current - 1415.0).abs() < f64::EPSILON);
        assert!(!config.fold_accessories);
    }

    #[test]
    fn test_report_args_load_fixture() {
        let cli = Cli::try_parse_from([
            "seasoncost",
            "categories",
            "tests/fixtures/cost-sample.csv",
        ])
        .unwrap();
        let Commands::Categories(args) = cli.command else {
            panic!("expected categories");
        };
        let analysis = args.load(None).unwrap();
        assert!(!analysis.categories.is_empty());
    }
}
