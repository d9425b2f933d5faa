//! CLI command definitions and handlers

mod clean;
mod doctor;
mod graph;
mod run;

pub use run::{mine_repo, mine_repos};

use crate::analysis::NonFinitePolicy;
use crate::config::{load_config, CgmConfig, MiningOptions, DEFAULT_OUTPUT};
use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// cgm - coupling graph metrics for software repositories
#[derive(Parser, Debug)]
#[command(name = "cgm")]
#[command(
    version,
    about = "Mine repositories and estimate size and complexity of their coupling graphs",
    long_about = "cgm clones every repository listed in an input file, builds it, runs the \
StaticCouplingTool and the GitCouplingTool on it and turns the commit graph and both coupling \
graphs into information-theoretic size and complexity estimates.\n\n\
The input file lists pairs of lines: a repository URL, then its build command.",
    args_conflicts_with_subcommands = true,
    after_help = "\
Examples:
  cgm repos.txt                          Mine every repository in repos.txt
  cgm repos.txt -o out.json --workers 4  Four repositories at a time
  cgm repos.txt --skip-build --skip-sct  Commit and co-change metrics only
  cgm graph .mp/gct/demo/result.json --tool gct
  cgm clean --dry-run"
)]
pub struct Cli {
    /// Verbosity: 0 errors only, 1 status, 2 debug, 3 trace and tool output
    #[arg(
        short,
        long,
        global = true,
        default_value_t = 1,
        value_parser = clap::value_parser!(u8).range(0..=3)
    )]
    pub verbosity: u8,

    /// Number of repositories analysed in parallel (1-64)
    #[arg(long, global = true, value_parser = parse_workers)]
    pub workers: Option<usize>,

    /// Directory for clones and tool outputs (default: .mp)
    #[arg(long, global = true)]
    pub work_dir: Option<PathBuf>,

    /// Configuration file (default: ./cgm.toml, then the user config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Mine the repositories listed in an input file (the default command)
    Run(RunArgs),

    /// Compute coupling metrics for an existing tool result
    #[command(after_help = "\
Examples:
  cgm graph .mp/sct/demo/0/results.json --tool sct
  cgm graph .mp/gct/demo/result.json --tool gct")]
    Graph {
        /// JSON graph written by the StaticCouplingTool or the GitCouplingTool
        file: PathBuf,

        /// Which tool wrote the file (decides the metric names)
        #[arg(long, value_enum)]
        tool: ToolKind,
    },

    /// Remove the work directory (clones and cached tool outputs)
    Clean {
        /// Preview what would be removed without deleting
        #[arg(long)]
        dry_run: bool,
    },

    /// Check that git, sh and the coupling tools can be found
    Doctor {
        #[command(flatten)]
        tools: ToolArgs,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ToolKind {
    Sct,
    Gct,
}

/// How to invoke the coupling tools.
#[derive(Args, Debug, Default, Clone)]
pub struct ToolArgs {
    /// StaticCouplingTool command
    #[arg(long, env = "CGM_SCT")]
    pub sct: Option<String>,

    /// GitCouplingTool command
    #[arg(long, env = "CGM_GCT")]
    pub gct: Option<String>,

    /// Source language passed to the StaticCouplingTool
    #[arg(long)]
    pub sct_language: Option<String>,

    /// File types passed to the GitCouplingTool
    #[arg(long, num_args = 1..)]
    pub gct_file_types: Option<Vec<String>>,

    /// Minimum number of co-changes for a GitCouplingTool edge
    #[arg(long)]
    pub min_cochanges: Option<u32>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Input file: repository URL and build command, one pair of lines per repository
    pub input: Option<PathBuf>,

    /// Output file (default: ./result.json)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub tools: ToolArgs,

    /// Do not run the build commands
    #[arg(long)]
    pub skip_build: bool,

    /// Skip the commit-history analysis
    #[arg(long)]
    pub skip_git: bool,

    /// Skip the StaticCouplingTool analysis
    #[arg(long)]
    pub skip_sct: bool,

    /// Skip the GitCouplingTool analysis
    #[arg(long)]
    pub skip_gct: bool,

    /// Reclone repositories ignoring existing clones
    #[arg(long)]
    pub force_git: bool,

    /// Rerun the StaticCouplingTool ignoring old outputs
    #[arg(long)]
    pub force_sct: bool,

    /// Rerun the GitCouplingTool ignoring old outputs
    #[arg(long)]
    pub force_gct: bool,

    /// Charge a source->sink pipe once instead of at both ends
    #[arg(long)]
    pub charge_pipes_once: bool,

    /// Let a node adjacent to every other node contribute 0 for the empty remainder instead of -inf
    #[arg(long)]
    pub empty_remainder_zero: bool,

    /// Fail instead of recording null when a metric is NaN or infinite
    #[arg(long)]
    pub fail_on_non_finite: bool,
}

/// Config file defaults, then global flags.
fn base_options(cli: &Cli, config: &CgmConfig) -> MiningOptions {
    let mut opts = MiningOptions::from_config(config);
    opts.verbosity = cli.verbosity;
    if let Some(workers) = cli.workers {
        opts.workers = workers;
    }
    if let Some(work_dir) = &cli.work_dir {
        opts.work_dir = work_dir.clone();
    }
    opts
}

fn apply_tool_args(opts: &mut MiningOptions, tools: &ToolArgs) {
    if let Some(sct) = &tools.sct {
        opts.tools.sct = sct.clone();
    }
    if let Some(gct) = &tools.gct {
        opts.tools.gct = gct.clone();
    }
    if let Some(language) = &tools.sct_language {
        opts.tools.sct_language = language.clone();
    }
    if let Some(types) = &tools.gct_file_types {
        opts.tools.gct_file_types = types.clone();
    }
    if let Some(min) = tools.min_cochanges {
        opts.tools.gct_min_cochanges = min;
    }
}

fn apply_run_args(opts: &mut MiningOptions, args: &RunArgs) {
    apply_tool_args(opts, &args.tools);
    opts.skip_build |= args.skip_build;
    opts.skip_git |= args.skip_git;
    opts.skip_sct |= args.skip_sct;
    opts.skip_gct |= args.skip_gct;
    opts.force_git |= args.force_git;
    opts.force_sct |= args.force_sct;
    opts.force_gct |= args.force_gct;
    opts.metrics.estimator.charge_pipes_once |= args.charge_pipes_once;
    opts.metrics.estimator.empty_remainder_is_zero |= args.empty_remainder_zero;
    if args.fail_on_non_finite {
        opts.metrics.non_finite = NonFinitePolicy::Fail;
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let mut opts = base_options(&cli, &config);

    match &cli.command {
        Some(Commands::Graph { file, tool }) => graph::run(file, *tool, &opts),
        Some(Commands::Clean { dry_run }) => clean::run(&opts.work_dir, *dry_run),
        Some(Commands::Doctor { tools }) => {
            apply_tool_args(&mut opts, tools);
            doctor::run(&opts)
        }
        Some(Commands::Run(args)) => run_mining(args, &config, opts),
        None => run_mining(&cli.run, &config, opts),
    }
}

fn run_mining(args: &RunArgs, config: &CgmConfig, mut opts: MiningOptions) -> Result<()> {
    let Some(input) = &args.input else {
        bail!("No input file given. Usage: cgm <INPUT> [-o <OUTPUT>]");
    };
    apply_run_args(&mut opts, args);

    let output = args
        .output
        .clone()
        .or_else(|| config.defaults.output.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    run::run(input, &output, &opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_takes_input() {
        let cli =
            Cli::try_parse_from(["cgm", "repos.txt", "-o", "out.json", "--skip-sct"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.run.input, Some(PathBuf::from("repos.txt")));
        assert_eq!(cli.run.output, Some(PathBuf::from("out.json")));
        assert!(cli.run.skip_sct);
        assert_eq!(cli.verbosity, 1);
    }

    #[test]
    fn test_empty_remainder_help_describes_remainder_term() {
        let command = Cli::command();
        let arg = command
            .get_arguments()
            .find(|a| a.get_id() == "empty_remainder_zero")
            .unwrap();
        let help = arg.get_help().unwrap().to_string();
        assert!(help.contains("empty remainder"), "{}", help);
        assert!(help.contains("adjacent to every other node"), "{}", help);
    }

    #[test]
    fn test_verbosity_range() {
        assert!(Cli::try_parse_from(["cgm", "-v", "3", "repos.txt"]).is_ok());
        assert!(Cli::try_parse_from(["cgm", "-v", "4", "repos.txt"]).is_err());
    }

    #[test]
    fn test_workers_validation() {
        assert!(Cli::try_parse_from(["cgm", "--workers", "0", "repos.txt"]).is_err());
        assert!(Cli::try_parse_from(["cgm", "--workers", "65", "repos.txt"]).is_err());
        let cli = Cli::try_parse_from(["cgm", "--workers", "4", "repos.txt"]).unwrap();
        assert_eq!(cli.workers, Some(4));
    }

    #[test]
    fn test_graph_subcommand() {
        let cli = Cli::try_parse_from(["cgm", "graph", "r.json", "--tool", "gct"]).unwrap();
        match cli.command {
            Some(Commands::Graph { file, tool }) => {
                assert_eq!(file, PathBuf::from("r.json"));
                assert_eq!(tool, ToolKind::Gct);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let config: CgmConfig =
            toml::from_str("[tools]\nsct = \"from-config\"\n[defaults]\nworkers = 2\n").unwrap();
        let cli = Cli::try_parse_from([
            "cgm",
            "repos.txt",
            "--sct",
            "from-flag",
            "--workers",
            "3",
            "--fail-on-non-finite",
            "--charge-pipes-once",
        ])
        .unwrap();

        let mut opts = base_options(&cli, &config);
        apply_run_args(&mut opts, &cli.run);

        assert_eq!(opts.tools.sct, "from-flag");
        assert_eq!(opts.workers, 3);
        assert_eq!(opts.metrics.non_finite, NonFinitePolicy::Fail);
        assert!(opts.metrics.estimator.charge_pipes_once);
        assert!(!opts.metrics.estimator.empty_remainder_is_zero);
    }
}
