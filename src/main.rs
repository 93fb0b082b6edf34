use branchflow::commands;
use branchflow::core::context::{ContextOptions, FlowContext};
use branchflow::core::error::{FlowError, print_error};
use branchflow::core::logging::{init_logging, level_from_flags};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Branch-driven release promotion: classify, enforce, crosswalk, catalog and promote
#[derive(Parser)]
#[command(name = "branchflow")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Path to flow.toml (default: search flow.toml, .flow.toml, .config/flow.toml)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Branch name to use instead of detecting it
  #[arg(long, global = true)]
  branch: Option<String>,

  /// Process-scope property (repeatable): -D key=value
  #[arg(short = 'D', value_name = "KEY=VALUE", global = true)]
  define: Vec<String>,

  /// More log output (-v debug, -vv trace)
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  verbose: u8,

  /// Only warnings and errors on stderr
  #[arg(short, long, global = true, conflicts_with = "verbose")]
  quiet: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Branch
  // ============================================================================
  /// Classify the current branch
  Classify {
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Print properties derived from the current branch
  Properties {
    /// Output in JSON format
    #[arg(long)]
    json: bool,
    /// Write to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
  },

  // ============================================================================
  // Versions
  // ============================================================================
  /// Check module versions against the branch rules
  Enforce {
    /// Graph snapshot (JSON: reactor + siblings)
    #[arg(long)]
    graph: PathBuf,
    /// Only check this module (group:artifact)
    #[arg(long)]
    module: Option<String>,
  },

  /// Rewrite versions for deployable ad-hoc branches across the graph
  Crosswalk {
    /// Graph snapshot (JSON: reactor + siblings)
    #[arg(long)]
    graph: PathBuf,
    /// Write the rewritten snapshot here
    #[arg(long)]
    write: Option<PathBuf>,
    /// Output the plan in JSON format
    #[arg(long)]
    json: bool,
  },

  // ============================================================================
  // Artifacts
  // ============================================================================
  /// Show the deploy repository for the current branch
  Retarget {
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Write the artifact catalog of a module
  Catalog {
    /// group:artifact:version
    #[arg(long)]
    module: String,
    #[arg(long, default_value = "jar")]
    packaging: String,
    /// Build directory receiving <artifactId>.txt
    #[arg(long)]
    output_dir: PathBuf,
    /// Primary artifact file
    #[arg(long)]
    primary: Option<PathBuf>,
    /// Attached artifact (repeatable): ext[:classifier]=FILE
    #[arg(long)]
    attach: Vec<String>,
  },

  /// Resolve the module's catalog and re-attach every listed artifact
  Promote {
    /// group:artifact:version
    #[arg(long)]
    module: String,
    #[arg(long, default_value = "jar")]
    packaging: String,
    /// Directory receiving the resolved files
    #[arg(long)]
    output_dir: PathBuf,
    /// Use the normal local cache instead of a temporary one
    #[arg(long)]
    keep_cache: bool,
    /// Fail when the catalog itself cannot be resolved
    #[arg(long)]
    require_catalog: bool,
    /// Show a progress bar while resolving
    #[arg(long)]
    progress: bool,
    /// Output the promotion report in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Purge cached release dependencies that stage provides and re-resolve them
  RefreshStage {
    /// Graph snapshot (JSON: reactor + siblings)
    #[arg(long)]
    graph: PathBuf,
    /// Only this module's dependencies (group:artifact)
    #[arg(long)]
    module: Option<String>,
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();
  init_logging(level_from_flags(cli.verbose, cli.quiet));

  let root = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => {
      eprintln!("Error: Failed to get current directory: {}", e);
      std::process::exit(1);
    }
  };

  // Classify once; every command sees the same branch
  let ctx = match FlowContext::build(&ContextOptions {
    root,
    config: cli.config,
    branch: cli.branch,
    defines: cli.define,
  }) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    Commands::Classify { json } => commands::run_classify(&ctx, json),
    Commands::Properties { json, output } => commands::run_properties(&ctx, json, output.as_deref()),
    Commands::Enforce { graph, module } => commands::run_enforce(&ctx, &graph, module.as_deref()),
    Commands::Crosswalk { graph, write, json } => commands::run_crosswalk(&ctx, &graph, write.as_deref(), json),
    Commands::Retarget { json } => commands::run_retarget(&ctx, json),
    Commands::Catalog {
      module,
      packaging,
      output_dir,
      primary,
      attach,
    } => commands::run_catalog(&ctx, &module, &packaging, &output_dir, primary.as_deref(), &attach),
    Commands::Promote {
      module,
      packaging,
      output_dir,
      keep_cache,
      require_catalog,
      progress,
      json,
    } => commands::run_promote(
      &ctx,
      &module,
      &packaging,
      &output_dir,
      commands::PromoteOptions {
        keep_cache,
        require_catalog,
        json,
        progress,
      },
    ),
    Commands::RefreshStage { graph, module, json } => {
      commands::run_refresh_stage(&ctx, &graph, module.as_deref(), json)
    }
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: FlowError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
