use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

use moontpl::{BuildMode, CompilationState, CompileOptions, Compiler, Delimiters, OutputMode};

#[derive(Parser)]
#[command(name = "moontpl")]
#[command(author, version, about = "The Moon template compiler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Splice expressions into a string literal (default)
    #[value(name = "string")]
    String,
    /// Insert expressions as raw code
    #[value(name = "code")]
    Code,
}

impl From<Mode> for OutputMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::String => OutputMode::StringLiteral,
            Mode::Code => OutputMode::Code,
        }
    }
}

#[derive(Args)]
struct TemplateArgs {
    /// Template files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Opening delimiter
    #[arg(long, default_value = "{{")]
    open: String,

    /// Closing delimiter
    #[arg(long, default_value = "}}")]
    close: String,

    /// Output form
    #[arg(long, value_enum, default_value = "string")]
    mode: Mode,

    /// Do not report unclosed tags (also enabled by MOONTPL_ENV=production)
    #[arg(long)]
    production: bool,
}

impl TemplateArgs {
    fn compiler(&self) -> Result<Compiler> {
        let build = if self.production {
            BuildMode::Production
        } else {
            BuildMode::from_env()
        };
        let options = CompileOptions {
            delimiters: Delimiters::new(self.open.clone(), self.close.clone()),
            mode: self.mode.into(),
            build,
        };
        Compiler::new(options).context("Invalid delimiter configuration")
    }

    fn load(&self) -> Result<CompilationState> {
        let mut state = CompilationState::new();
        for input in &self.inputs {
            state
                .add_file(input)
                .with_context(|| format!("Failed to load template: {:?}", input))?;
        }
        Ok(state)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compile templates and print the generated expressions
    Compile {
        #[command(flatten)]
        args: TemplateArgs,

        /// Print a JSON report instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Print the identifiers read by the templates
    Deps {
        #[command(flatten)]
        args: TemplateArgs,
    },

    /// Check templates for unclosed tags without printing output
    Check {
        #[command(flatten)]
        args: TemplateArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // --verbose overrides RUST_LOG
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let result = match cli.command {
        Commands::Compile { args, json } => compile(&args, json),
        Commands::Deps { args } => deps(&args),
        Commands::Check { args } => check(&args),
    };

    if let Err(e) = result {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

fn compile(args: &TemplateArgs, json: bool) -> Result<()> {
    let compiler = args.compiler()?;
    let mut state = args.load()?;
    let report = state.run(&compiler);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for file in &report.outputs {
            if let Some(output) = &file.output {
                println!("{}", output);
            }
        }
    }

    state.report_diagnostics()?;
    if report.has_failures() {
        anyhow::bail!("{} template(s) failed to compile", failures(&report));
    }
    Ok(())
}

fn deps(args: &TemplateArgs) -> Result<()> {
    let compiler = args.compiler()?;
    let mut state = args.load()?;
    let report = state.run(&compiler);

    for name in &report.dependencies {
        println!("{}", name);
    }

    state.report_diagnostics()?;
    if report.has_failures() {
        anyhow::bail!("{} template(s) failed to compile", failures(&report));
    }
    Ok(())
}

fn check(args: &TemplateArgs) -> Result<()> {
    log::info!("Checking {} template(s)", args.inputs.len());

    let compiler = args.compiler()?;
    let mut state = args.load()?;
    let report = state.run(&compiler);

    state.report_diagnostics()?;
    if report.has_failures() {
        anyhow::bail!("{} template(s) failed to compile", failures(&report));
    }

    println!("{}: No errors found", "success".green().bold());
    Ok(())
}

fn failures(report: &moontpl::CompileReport) -> usize {
    report.outputs.iter().filter(|file| file.error.is_some()).count()
}
