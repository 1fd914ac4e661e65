use std::f64::consts::TAU;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use num_complex::Complex64;
use serde::Serialize;

use complex_graph::engine::ZOrder;
use complex_graph::error::GraphError;
use complex_graph::expr::error::{ParseError, Span};
use complex_graph::expr::{self, ops};
use complex_graph::model::{Area, Function, FunctionName};
use complex_graph::plot::Plot;
use complex_graph::settings::{self, RenderSettings};

const EXPRESSION_HELP: &str = "\
The function to draw, as an expression over the argument 'z'.

Operations: + - * / ^ and the prefix functions exp, ln, sin, cos, tan.
Constants are written as <real>, <imaginary>i or {<real>,<imaginary>i},
e.g. 1, 2i, {3,0.5i}.

Prefix functions bind tighter than any operator: ln z^2 means (ln z)^2.
Use parentheses to change that, e.g. ln (z^2).

Examples:
    2 * (sin exp z^3 / tan ln z^z)
    (sin z)^2i + cos(z * {3,0.1i} + z*z)";

// ── CLI argument parsing ─────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "complex-graph",
    about = "Domain-coloring plots of complex-valued functions",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Render settings file (JSON). Flags below override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Width of each plot panel in pixels
    #[arg(short = 'W', long, global = true)]
    width: Option<usize>,

    /// Height of each plot panel in pixels
    #[arg(short = 'H', long, global = true)]
    height: Option<usize>,

    /// Samples per axis when drawing the image panel
    #[arg(short = 'q', long, global = true)]
    quality: Option<usize>,

    /// Which part of the source point wins when samples collide
    #[arg(long, global = true, value_enum)]
    z_order: Option<ZOrder>,

    /// Render threads (default: one per core)
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// Print a JSON summary instead of log lines
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw a complex-valued function
    Func {
        #[arg(help = EXPRESSION_HELP, allow_hyphen_values = true)]
        expression: String,
        /// Left side of the preimage area (min Re z)
        #[arg(short = 'l', long, default_value_t = -1.0, allow_hyphen_values = true)]
        left: f64,
        /// Right side of the preimage area (max Re z)
        #[arg(short = 'r', long, default_value_t = 1.0, allow_hyphen_values = true)]
        right: f64,
        /// Bottom side of the preimage area (min Im z)
        #[arg(short = 'b', long, default_value_t = -1.0, allow_hyphen_values = true)]
        bottom: f64,
        /// Top side of the preimage area (max Im z)
        #[arg(short = 't', long, default_value_t = 1.0, allow_hyphen_values = true)]
        top: f64,
        /// Output PNG file
        #[arg(short = 'f', long = "file-name", default_value = "plot.png")]
        file: PathBuf,
    },
    /// Draw a series of power functions z^p
    Pows {
        /// Starting power
        #[arg(short = 'o', long, default_value_t = 2.0, allow_hyphen_values = true)]
        origin: f64,
        /// Power change between plots
        #[arg(short = 's', long, default_value_t = -0.1, allow_hyphen_values = true)]
        step: f64,
        /// Number of plots
        #[arg(short = 'c', long, default_value_t = 30)]
        count: usize,
        /// Side of the centered square area
        #[arg(short = 'a', long, default_value_t = 6.0)]
        area_size: f64,
        /// Output directory
        #[arg(short = 'd', long, default_value = "pows")]
        directory: PathBuf,
    },
    /// Draw exp z over a series of shrinking areas
    Exps {
        /// Starting side of the centered square area
        #[arg(short = 'o', long, default_value_t = TAU)]
        origin: f64,
        /// Area side change between plots
        #[arg(short = 's', long, default_value_t = -0.2, allow_hyphen_values = true)]
        step: f64,
        /// Number of plots
        #[arg(short = 'c', long, default_value_t = 30)]
        count: usize,
        /// Output directory
        #[arg(short = 'd', long, default_value = "exps")]
        directory: PathBuf,
    },
    /// Draw the basic elementary functions
    Examples {
        /// Side of the centered square area
        #[arg(short = 'a', long, default_value_t = TAU)]
        area_size: f64,
        /// Output directory
        #[arg(short = 'd', long, default_value = "examples")]
        directory: PathBuf,
    },
    /// Print the JSON schema of the settings file
    ConfigSchema,
}

// ── Output ───────────────────────────────────────────────────────

/// One written plot.
#[derive(Serialize)]
struct PlotSummary {
    file: PathBuf,
    function: String,
    area: Area,
    width: usize,
    height: usize,
    quality: usize,
    elapsed_ms: u128,
}

fn report_error(err: &GraphError, cli: &Cli) {
    if cli.json {
        let json = serde_json::json!({ "error": err });
        println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        return;
    }
    match (err, &cli.command) {
        (GraphError::Parse { message, start, end }, Commands::Func { expression, .. }) => {
            let parse = ParseError::new(message.clone(), Span::new(*start, *end));
            eprintln!("error: {}", parse.format_with_source(expression));
        }
        _ => eprintln!("error: {err}"),
    }
}

// ── Commands ─────────────────────────────────────────────────────

fn resolve_settings(cli: &Cli) -> Result<RenderSettings, GraphError> {
    let mut settings = settings::load_settings_or_default(cli.config.as_deref())?;
    if let Some(width) = cli.width {
        settings.width = width;
    }
    if let Some(height) = cli.height {
        settings.height = height;
    }
    if let Some(quality) = cli.quality {
        settings.quality = quality;
    }
    if let Some(z_order) = cli.z_order {
        settings.z_order = z_order;
    }
    if cli.threads.is_some() {
        settings.threads = cli.threads;
    }
    settings.validate()?;
    Ok(settings)
}

fn draw(
    function: &Function,
    area: &Area,
    file: &Path,
    settings: &RenderSettings,
    z_order: ZOrder,
) -> Result<PlotSummary, GraphError> {
    let started = Instant::now();
    let mut plot = Plot::new(settings.width, settings.height, settings.background)?;
    let options = settings.render_options().with_z_order(z_order);
    plot.draw(function, area, settings.quality, &options)?;
    plot.save_png(file)?;
    Ok(PlotSummary {
        file: file.to_path_buf(),
        function: function.name().value(),
        area: *area,
        width: settings.width,
        height: settings.height,
        quality: settings.quality,
        elapsed_ms: started.elapsed().as_millis(),
    })
}

/// `1.9`, `2`, `-0.3`: at most two decimals, no trailing zeros.
fn short_number(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn power_function(p: f64) -> Function {
    let exponent = Complex64::new(p, 0.0);
    Function::identity().right_compose(
        &FunctionName::wrap("", &format!("^{}", short_number(p))),
        move |z| ops::pow(z, exponent),
    )
}

fn elementary_functions() -> IndexMap<&'static str, Function> {
    let id = Function::identity();
    let mut functions = IndexMap::new();
    functions.insert("sqrt", id.right_compose(&FunctionName::wrap("sqrt(", ")"), Complex64::sqrt));
    functions.insert("exp", id.right_compose(&FunctionName::wrap("exp(", ")"), Complex64::exp));
    functions.insert("ln", id.right_compose(&FunctionName::wrap("ln ", ""), Complex64::ln));
    functions.insert("sin", id.right_compose(&FunctionName::wrap("sin ", ""), Complex64::sin));
    functions.insert("cos", id.right_compose(&FunctionName::wrap("cos ", ""), Complex64::cos));
    functions.insert("tan", id.right_compose(&FunctionName::wrap("tan ", ""), Complex64::tan));
    functions
}

#[allow(clippy::cast_precision_loss)]
fn series(origin: f64, step: f64, count: usize) -> impl Iterator<Item = (usize, f64)> {
    (0..count).map(move |i| (i, origin + step * i as f64))
}

fn run(cli: &Cli, settings: &RenderSettings) -> Result<Vec<PlotSummary>, GraphError> {
    match &cli.command {
        Commands::Func {
            expression,
            left,
            right,
            bottom,
            top,
            file,
        } => {
            let area = Area::new(Complex64::new(*left, *bottom), Complex64::new(*right, *top))?;
            let function = expr::parse_function(expression)?;
            log::info!("Drawing {}...", function.name());
            Ok(vec![draw(&function, &area, file, settings, settings.z_order)?])
        }
        Commands::Pows {
            origin,
            step,
            count,
            area_size,
            directory,
        } => {
            let area = Area::centered(*area_size)?;
            fs::create_dir_all(directory)?;
            series(*origin, *step, *count)
                .map(|(i, p)| {
                    log::info!("Drawing power [{i}]: {}...", short_number(p));
                    let file = directory.join(format!("pow{i}.png"));
                    draw(&power_function(p), &area, &file, settings, ZOrder::Real)
                })
                .collect()
        }
        Commands::Exps {
            origin,
            step,
            count,
            directory,
        } => {
            let exp = Function::identity().right_compose(&FunctionName::wrap("exp(", ")"), Complex64::exp);
            fs::create_dir_all(directory)?;
            series(*origin, *step, *count)
                .map(|(i, size)| {
                    log::info!("Drawing size [{i}]: {size}...");
                    let area = Area::centered(size)?;
                    let file = directory.join(format!("exp{i}.png"));
                    draw(&exp, &area, &file, settings, settings.z_order)
                })
                .collect()
        }
        Commands::Examples {
            area_size,
            directory,
        } => {
            let area = Area::centered(*area_size)?;
            fs::create_dir_all(directory)?;
            elementary_functions()
                .iter()
                .map(|(name, function)| {
                    log::info!("Drawing {name}...");
                    let file = directory.join(format!("{name}.png"));
                    draw(function, &area, &file, settings, settings.z_order)
                })
                .collect()
        }
        Commands::ConfigSchema => Ok(Vec::new()),
    }
}

fn execute(cli: &Cli) -> Result<(), GraphError> {
    if let Commands::ConfigSchema = cli.command {
        println!("{}", settings::settings_schema()?);
        return Ok(());
    }

    let settings = resolve_settings(cli)?;
    let summaries = match settings.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
            log::debug!("rendering on {threads} threads");
            pool.install(|| run(cli, &settings))?
        }
        None => run(cli, &settings)?,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        for summary in &summaries {
            log::info!(
                "{} -> {} ({} ms)",
                summary.function,
                summary.file.display(),
                summary.elapsed_ms
            );
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if let Err(e) = execute(&cli) {
        report_error(&e, &cli);
        process::exit(1);
    }
}
