use std::fs;
use std::path::PathBuf;

use anyhow::{format_err, Context, Error};
use serde::Deserialize;
use structopt::StructOpt;

use crate::workflow::{OptimizationInputs, Variant};

pub fn resolve_opts() -> Result<Opts, Error> {
    let opts = get_cli_opts();

    let opts = match get_config_opts()? {
        Some(config_opts) => merge(opts, config_opts),
        None => opts,
    };

    if opts.user_id.as_deref().map_or(true, str::is_empty) {
        return Err(format_err!(
            "A user id is required, pass --user-id or set `user_id` in {}",
            config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "the config file".into())
        ));
    }

    Ok(opts)
}

/// Command line values win, flags are OR-ed
fn merge(mut opts: Opts, config_opts: Opts) -> Opts {
    // Options
    opts.server = opts.server.or(config_opts.server);
    opts.user_id = opts.user_id.or(config_opts.user_id);
    opts.file = opts.file.or(config_opts.file);
    opts.variant = opts.variant.or(config_opts.variant);
    opts.target_cagr = opts.target_cagr.or(config_opts.target_cagr);
    opts.monthly_contribution = opts
        .monthly_contribution
        .or(config_opts.monthly_contribution);
    opts.years = opts.years.or(config_opts.years);
    opts.log_file = opts.log_file.or(config_opts.log_file);

    // Flags
    opts.upload = opts.upload || config_opts.upload;
    opts.auto_optimize = opts.auto_optimize || config_opts.auto_optimize;
    opts.hide_help = opts.hide_help || config_opts.hide_help;

    opts
}

fn get_cli_opts() -> Opts {
    Opts::from_args()
}

fn config_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|dir| dir.join("foliodash").join("config.yml"))
}

/// A missing config file is fine, an unreadable one is not
fn get_config_opts() -> Result<Option<Opts>, Error> {
    let config_path = match config_path() {
        Some(path) if path.exists() => path,
        _ => return Ok(None),
    };

    let config = fs::read_to_string(&config_path)
        .with_context(|| format!("Could not read {}", config_path.display()))?;

    let opts = serde_yaml::from_str(&config)
        .with_context(|| format!("Invalid config file {}", config_path.display()))?;

    Ok(Some(opts))
}

#[derive(Debug, StructOpt, Clone, Deserialize, Default)]
#[structopt(
    name = "foliodash",
    about = "Portfolio optimization and DCA simulation in your terminal",
    version = env!("CARGO_PKG_VERSION")
)]
#[serde(default)]
pub struct Opts {
    // Options
    //
    #[structopt(short, long)]
    /// Backend server, e.g. http://localhost:8000 [default: http://localhost:8000]
    pub server: Option<String>,
    #[structopt(short, long)]
    /// Identity sent with every request
    pub user_id: Option<String>,
    #[structopt(short, long, parse(from_os_str))]
    /// Transactions CSV to select on start
    pub file: Option<PathBuf>,
    #[structopt(long, possible_values(&["classic", "tabbed"]), case_insensitive = true)]
    /// Dashboard layout [default: tabbed]
    pub variant: Option<Variant>,
    #[structopt(short = "t", long)]
    /// Target CAGR in percent [default: 10 classic, 30 tabbed]
    pub target_cagr: Option<f64>,
    #[structopt(short = "m", long)]
    /// Monthly contribution for the DCA simulation [default: 500]
    pub monthly_contribution: Option<f64>,
    #[structopt(short = "y", long)]
    /// Years to simulate [default: 10]
    pub years: Option<u32>,
    #[structopt(long, parse(from_os_str))]
    /// Log file [default: <data dir>/foliodash/foliodash.log]
    pub log_file: Option<PathBuf>,

    // Flags
    //
    #[structopt(long)]
    /// Upload the selected file on start
    pub upload: bool,
    #[structopt(short = "a", long)]
    /// Optimize after each upload while optimisation results are shown, and
    /// when the optimisation tab opens
    pub auto_optimize: bool,
    #[structopt(long)]
    /// Hide help icon in top right
    pub hide_help: bool,
}

pub const DEFAULT_SERVER: &str = "http://localhost:8000";

impl Opts {
    pub fn server(&self) -> &str {
        self.server.as_deref().unwrap_or(DEFAULT_SERVER)
    }

    pub fn variant(&self) -> Variant {
        self.variant.unwrap_or_default()
    }

    pub fn auto_optimize(&self) -> bool {
        self.auto_optimize || self.variant().auto_optimize()
    }

    pub fn inputs(&self) -> OptimizationInputs {
        let defaults = OptimizationInputs::for_variant(self.variant());

        OptimizationInputs {
            target_cagr: self.target_cagr.unwrap_or(defaults.target_cagr),
            monthly_contribution: self
                .monthly_contribution
                .unwrap_or(defaults.monthly_contribution),
            years: self.years.unwrap_or(defaults.years),
        }
    }
}
