use anyhow::{Context, Result};
use clap::Parser;
use salesdash::runtime::{self, Controls, ViewModel, WidgetState};
use salesdash::{graph, vegalite, AgeRange, Dataset, OutputFormat, RenderOptions};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "salesdash")]
#[command(about = "Filter retail transactions and render a sales summary, charts and table", long_about = None)]
struct Args {
    /// Transactions CSV file
    #[arg(default_value = "customer_shopping_data.csv")]
    data: PathBuf,

    /// Shopping mall to show (defaults to the first one in the file)
    #[arg(long)]
    mall: Option<String>,

    /// Product category to show (defaults to the first one in the file)
    #[arg(long)]
    category: Option<String>,

    /// Payment method to include; repeat for several
    #[arg(long = "payment", value_name = "METHOD")]
    payments: Vec<String>,

    /// Lower handle of the age slider
    #[arg(long)]
    age_min: Option<u32>,

    /// Upper handle of the age slider
    #[arg(long)]
    age_max: Option<u32>,

    /// Show the filtered data table
    #[arg(long)]
    show_table: bool,

    /// Display the age vs. price scatter plot
    #[arg(long)]
    scatter: bool,

    /// Display the payment method bar chart
    #[arg(long)]
    bar: bool,

    /// JSON widget state; other flags override its fields
    #[arg(long, value_name = "FILE")]
    state: Option<PathBuf>,

    /// Print the selector options and exit
    #[arg(long)]
    list_options: bool,

    /// Print the view model as JSON
    #[arg(long)]
    json: bool,

    /// Write enabled charts as images into this directory
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Image format for --out-dir
    #[arg(long, value_enum, default_value_t = OutputFormat::Png)]
    format: OutputFormat,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Write enabled charts as Vega-Lite specs into this directory
    #[arg(long, value_name = "DIR")]
    vega: Option<PathBuf>,

    /// Read one JSON widget state per stdin line, answer with one JSON view model per line
    #[arg(long)]
    stdio: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let dataset = Dataset::from_path(&args.data)?;
    let controls = Controls::from_dataset(&dataset)?;

    if args.list_options {
        return print_options(&controls);
    }

    if args.stdio {
        return run_stdio(&dataset, &controls);
    }

    let state = widget_state(&args, &controls)?;
    let view = runtime::render(&dataset, &state);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut handle, &view).context("Failed to serialize view")?;
        writeln!(handle)?;
    } else {
        write_text(&mut handle, &view)?;
    }
    handle.flush().context("Failed to flush stdout")?;

    if let Some(dir) = &args.out_dir {
        let options = RenderOptions {
            width: args.width,
            height: args.height,
            format: args.format,
        };
        write_images(dir, &view, &options)?;
    }

    if let Some(dir) = &args.vega {
        write_vega(dir, &view)?;
    }

    Ok(())
}

/// Merge the state file (or the initial page state) with the CLI flags
fn widget_state(args: &Args, controls: &Controls) -> Result<WidgetState> {
    let mut state = match &args.state {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read state file '{}'", path.display()))?;
            let mut state: WidgetState = serde_json::from_str(&text)
                .with_context(|| format!("Invalid state file '{}'", path.display()))?;
            controls.fill_selections(&mut state);
            state
        }
        None => controls.default_state(),
    };

    if let Some(mall) = &args.mall {
        state.mall = Some(mall.clone());
    }
    if let Some(category) = &args.category {
        state.category = Some(category.clone());
    }
    if !args.payments.is_empty() {
        state.payment_methods = args.payments.clone();
    }
    if args.age_min.is_some() || args.age_max.is_some() {
        state.age_range = AgeRange::new(
            args.age_min.unwrap_or(state.age_range.lower()),
            args.age_max.unwrap_or(state.age_range.upper()),
        )?;
    }
    state.show_table |= args.show_table;
    state.show_scatter |= args.scatter;
    state.show_bar |= args.bar;

    Ok(state)
}

fn print_options(controls: &Controls) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "Shopping malls: {}", controls.malls.join(", "))?;
    writeln!(handle, "Categories: {}", controls.categories.join(", "))?;
    writeln!(handle, "Payment methods: {}", controls.payment_methods.join(", "))?;
    writeln!(
        handle,
        "Age range: {}-{}",
        controls.age_bounds.0, controls.age_bounds.1
    )?;
    Ok(())
}

fn run_stdio(dataset: &Dataset, controls: &Controls) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    runtime::serve(dataset, controls, stdin.lock(), stdout.lock())
}

fn write_text(out: &mut impl Write, view: &ViewModel) -> Result<()> {
    writeln!(out, "{}", view.title)?;
    writeln!(out, "{}", "=".repeat(view.title.chars().count()))?;
    writeln!(out, "{}", view.caption)?;
    writeln!(out, "{}", view.summary)?;

    if let Some(scatter) = &view.scatter {
        writeln!(out)?;
        writeln!(out, "{}: {} point(s)", scatter.title, scatter.points.len())?;
    }

    if let Some(bar) = &view.bar {
        writeln!(out)?;
        writeln!(out, "{}", bar.title)?;
        let width = bar
            .bars
            .iter()
            .map(|b| b.category.chars().count())
            .max()
            .unwrap_or(0);
        for b in &bar.bars {
            writeln!(out, "  {:<width$}  {:.2}", b.category, b.value)?;
        }
    }

    if let Some(table) = &view.table {
        writeln!(out)?;
        writeln!(out, "Filtered Data")?;
        writeln!(out, "{}", table)?;
    }

    Ok(())
}

fn write_images(dir: &Path, view: &ViewModel, options: &RenderOptions) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory '{}'", dir.display()))?;
    let ext = options.format.extension();

    if let Some(scatter) = &view.scatter {
        let bytes = graph::render_scatter(scatter, options).context("Failed to render scatter plot")?;
        write_file(&dir.join(format!("scatter.{}", ext)), &bytes)?;
    }
    if let Some(bar) = &view.bar {
        let bytes = graph::render_bar(bar, options).context("Failed to render bar chart")?;
        write_file(&dir.join(format!("bar.{}", ext)), &bytes)?;
    }
    Ok(())
}

fn write_vega(dir: &Path, view: &ViewModel) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory '{}'", dir.display()))?;

    if let Some(scatter) = &view.scatter {
        let spec = serde_json::to_vec_pretty(&vegalite::scatter_spec(scatter))?;
        write_file(&dir.join("scatter.vl.json"), &spec)?;
    }
    if let Some(bar) = &view.bar {
        let spec = serde_json::to_vec_pretty(&vegalite::bar_spec(bar))?;
        write_file(&dir.join("bar.vl.json"), &spec)?;
    }
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("Failed to write '{}'", path.display()))?;
    log::info!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
