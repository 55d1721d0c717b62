//! qplan CLI: format, validate and explain logical plan documents.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use qplan_core::prelude::{InputFormat, LogicalPlan, NodeId, PlanConfig};
use qplan_ops::builtin_registry;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qplan", version = qplan_core::VERSION)]
#[command(about = "Format, validate and explain logical query plan documents", long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG wins if set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct InputArgs {
    /// Path to the plan document
    #[arg(short, long)]
    plan: PathBuf,

    /// Input syntax (json or yaml); defaults to the file extension
    #[arg(long)]
    format: Option<InputFormat>,

    /// Reject comments, unquoted keys and trailing commas in JSON input
    #[arg(long)]
    strict: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite a plan in canonical form (sources by name, operators in execution order)
    Fmt {
        #[command(flatten)]
        input: InputArgs,

        /// Spaces per indentation level (overrides QPLAN_INDENT_WIDTH)
        #[arg(long)]
        indent: Option<usize>,

        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail if the file is not already canonical; write nothing
        #[arg(long)]
        check: bool,
    },

    /// Check that a plan resolves and has an execution order
    Validate {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Show sources and the operator execution order
    Explain {
        #[command(flatten)]
        input: InputArgs,
    },

    /// List the registered source and operator kinds
    Variants,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Fmt {
            input,
            indent,
            output,
            check,
        } => {
            if let Err(e) = format_plan(&input, indent, output, check) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Validate { input } => match validate_plan(&input) {
            Ok(plan) => println!(
                "✓ Plan is valid ({} sources, {} operators)",
                plan.source_registry().len(),
                plan.graph().len()
            ),
            Err(e) => {
                eprintln!("Validation failed: {}", e);
                std::process::exit(1);
            }
        },
        Commands::Explain { input } => {
            if let Err(e) = explain_plan(&input) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Variants => {
            if let Err(e) = list_variants() {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Flags beat the environment, which beats the defaults.
fn apply_overrides(config: &mut PlanConfig, input: &InputArgs, indent: Option<usize>) {
    if input.strict {
        config.lenient_input = false;
    }
    if let Some(width) = indent {
        config.indent_width = width;
    }
}

fn load_plan(
    input: &InputArgs,
    config: &PlanConfig,
) -> Result<(String, LogicalPlan), Box<dyn std::error::Error>> {
    let text = fs::read_to_string(&input.plan)?;
    let format = input
        .format
        .unwrap_or_else(|| InputFormat::from_path(&input.plan));
    debug!(path = %input.plan.display(), ?format, "reading plan");

    let registry = builtin_registry()?;
    let plan = LogicalPlan::parse_with(&text, format, &registry, config)?;
    Ok((text, plan))
}

fn format_plan(
    input: &InputArgs,
    indent: Option<usize>,
    output: Option<PathBuf>,
    check: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = PlanConfig::from_env();
    apply_overrides(&mut config, input, indent);
    config.validate()?;

    let (text, plan) = load_plan(input, &config)?;
    let rendered = plan.to_json_with(&config)?;

    if check {
        if text != rendered {
            return Err(format!("{} is not in canonical form", input.plan.display()).into());
        }
        info!(path = %input.plan.display(), "already canonical");
        return Ok(());
    }

    match output {
        Some(path) => {
            fs::write(&path, &rendered)?;
            info!(path = %path.display(), bytes = rendered.len(), "wrote canonical plan");
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

fn validate_plan(input: &InputArgs) -> Result<LogicalPlan, Box<dyn std::error::Error>> {
    let mut config = PlanConfig::from_env();
    apply_overrides(&mut config, input, None);
    let (_, plan) = load_plan(input, &config)?;
    plan.validate()?;
    Ok(plan)
}

fn explain_plan(input: &InputArgs) -> Result<(), Box<dyn std::error::Error>> {
    let plan = validate_plan(input)?;
    print!("{}", render_explain(&plan)?);
    Ok(())
}

fn render_explain(plan: &LogicalPlan) -> Result<String, Box<dyn std::error::Error>> {
    let graph = plan.graph();
    let mut out = String::new();

    writeln!(out, "Logical Plan")?;
    writeln!(out, "============")?;
    writeln!(out)?;
    writeln!(out, "Fingerprint: {}", plan.fingerprint()?.short())?;
    writeln!(out, "Head: {}", serde_json::to_string(plan.properties())?)?;
    writeln!(out)?;

    writeln!(out, "Data Sources:")?;
    for source in plan.data_sources() {
        writeln!(out, "  {} ({})", source.name(), source.kind())?;
    }
    writeln!(out)?;

    writeln!(out, "Execution Order:")?;
    for (i, node_id) in plan.execution_order()?.iter().enumerate() {
        let Some(node) = graph.node(*node_id) else {
            continue;
        };
        let op = node.operator();
        let handle = op
            .id()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        let inputs: Vec<String> = op.inputs().iter().map(|id| id.to_string()).collect();
        write!(out, "  {}. {} {} at {}", i + 1, op.kind(), handle, node_id)?;
        if inputs.is_empty() {
            writeln!(out)?;
        } else {
            writeln!(out, " <- {}", inputs.join(", "))?;
        }
    }
    writeln!(out)?;

    let names = |ids: Vec<NodeId>| -> String {
        ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(", ")
    };
    writeln!(out, "Inputs: {}", names(graph.leaves()))?;
    writeln!(out, "Outputs: {}", names(graph.roots()))?;
    Ok(out)
}

fn list_variants() -> Result<(), Box<dyn std::error::Error>> {
    let registry = builtin_registry()?;
    println!("Data sources (\"type\"):");
    for kind in registry.source_kinds() {
        println!("  {}", kind);
    }
    println!("Operators (\"op\"):");
    for kind in registry.operator_kinds() {
        println!("  {}", kind);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(strict: bool) -> InputArgs {
        InputArgs {
            plan: PathBuf::from("plan.json"),
            format: None,
            strict,
        }
    }

    #[test]
    fn flags_override_environment_config() {
        let mut config = PlanConfig::from_lookup(|key| match key {
            "QPLAN_INDENT_WIDTH" => Some("8".into()),
            _ => None,
        });
        assert_eq!(config.indent_width, 8);

        apply_overrides(&mut config, &input(true), Some(4));
        assert_eq!(config.indent_width, 4);
        assert!(!config.lenient_input);
    }

    #[test]
    fn absent_flags_leave_config_alone() {
        let mut config = PlanConfig::default();
        apply_overrides(&mut config, &input(false), None);
        assert_eq!(config, PlanConfig::default());
    }

    #[test]
    fn parses_format_flag() {
        let cli = Cli::try_parse_from(["qplan", "-vv", "validate", "--plan", "p.txt", "--format", "yaml"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Validate { input } => assert_eq!(input.format, Some(InputFormat::Yaml)),
            _ => panic!("expected validate"),
        }
        assert!(Cli::try_parse_from(["qplan", "validate", "--plan", "p", "--format", "xml"]).is_err());
    }

    #[test]
    fn explain_lists_operators_in_execution_order() {
        let registry = builtin_registry().unwrap();
        let plan = LogicalPlan::parse(
            r#"{
                head: { version: 1 },
                sources: [{ type: "file", name: "in", path: "/in" }],
                query: [
                    { op: "store", "@id": 3, input: 2, sink: "in" },
                    { op: "filter", "@id": 2, input: 1, expr: "x > 1" },
                    { op: "scan", "@id": 1, source: "in" },
                ],
            }"#,
            &registry,
        )
        .unwrap();
        let text = render_explain(&plan).unwrap();
        assert!(text.contains("  in (file)"), "{text}");
        assert!(text.contains("  1. scan #1 at query[2]\n"), "{text}");
        assert!(text.contains("  2. filter #2 at query[1] <- #1\n"), "{text}");
        assert!(text.contains("  3. store #3 at query[0] <- #2\n"), "{text}");
        assert!(text.contains("Inputs: query[2]\n"), "{text}");
        assert!(text.contains("Outputs: query[0]\n"), "{text}");
    }
}
