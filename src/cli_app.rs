//! Top-level CLI definition and dispatch.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use colored::{Colorize, control};

use reservation_grid::core::config::CalendarConfig;
use reservation_grid::core::errors::{GridError, Result};
use reservation_grid::feed::model::Mark;
use reservation_grid::feed::parser::parse_feed;
use reservation_grid::grid::navigator::WeekNavigator;
use reservation_grid::grid::render::CellGrid;
use reservation_grid::grid::{PageView, build_page};
use reservation_grid::logger::jsonl::{EventType, JsonlLogger, LogEntry, Severity};

/// Reservation availability grid — renders weekly booking calendars.
#[derive(Debug, Parser)]
#[command(
    name = "rgrid",
    author,
    version,
    about = "Reservation Grid - Availability Calendar Engine",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Increase verbosity.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Quiet mode (errors only).
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Validate a status feed payload.
    Check(CheckArgs),
    /// Render the merged availability table for the configured week.
    Render(RenderArgs),
    /// Show the week selector and prev/next navigation state.
    Weeks,
}

#[derive(Debug, Clone, Args)]
struct CheckArgs {
    /// Feed JSON file.
    feed: PathBuf,
}

#[derive(Debug, Clone, Args)]
struct RenderArgs {
    /// Feed JSON file.
    feed: PathBuf,
}

/// Dispatch a parsed command line.
pub fn run(args: &Cli) -> Result<()> {
    if args.no_color {
        control::set_override(false);
    }
    let config = CalendarConfig::load(args.config.as_deref())?;
    let logger = JsonlLogger::new(config.logging.jsonl_log.as_deref());

    match &args.command {
        Command::Check(check) => run_check(args, &config, &logger, check),
        Command::Render(render) => run_render(args, &config, &logger, render),
        Command::Weeks => run_weeks(args, &config, &logger),
    }
}

fn read_feed_file(path: &PathBuf) -> Result<String> {
    fs::read_to_string(path).map_err(|source| GridError::Io {
        path: path.clone(),
        source,
    })
}

fn run_check(args: &Cli, _config: &CalendarConfig, logger: &JsonlLogger, check: &CheckArgs) -> Result<()> {
    let raw = read_feed_file(&check.feed)?;
    match parse_feed(&raw) {
        Ok(feed) => {
            logger.log(
                &LogEntry::new(EventType::FeedParsed, Severity::Info)
                    .with_grid_shape(feed.rows(), feed.rows() * 7),
            );
            if !args.quiet {
                println!(
                    "feed ok: 7 days from {}, {} timeslot rows",
                    feed.start_date(),
                    feed.rows()
                );
            }
            Ok(())
        }
        Err(error) => {
            logger.log(
                &LogEntry::new(EventType::FeedRejected, Severity::Warning)
                    .with_error_code(error.code()),
            );
            Err(error)
        }
    }
}

fn run_render(args: &Cli, config: &CalendarConfig, logger: &JsonlLogger, render: &RenderArgs) -> Result<()> {
    let raw = read_feed_file(&render.feed)?;
    let page = build_page(config, &raw);

    // Events are emitted for both output formats.
    match &page {
        PageView::Suppressed { error_code, .. } => {
            logger.log(
                &LogEntry::new(EventType::FeedRejected, Severity::Warning)
                    .with_error_code(error_code.clone()),
            );
        }
        PageView::Chart(chart) => {
            logger.log(
                &LogEntry::new(EventType::GridRendered, Severity::Info)
                    .with_week(chart.window.week_number)
                    .with_grid_shape(
                        chart.rendered.grid.rows(),
                        chart.rendered.grid.iter_cells().count(),
                    ),
            );
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    match &page {
        PageView::Suppressed { details, .. } => {
            if !args.quiet {
                println!("(no chart: {details})");
            }
        }
        PageView::Chart(chart) => {
            print_headers(chart);
            print_grid(&chart.rendered.grid);
            if args.verbose {
                println!(
                    "week {}/{} starting {}",
                    chart.window.week_number,
                    chart.window.total_weeks,
                    chart.window.start_date()
                );
            }
        }
    }
    Ok(())
}

fn run_weeks(args: &Cli, config: &CalendarConfig, logger: &JsonlLogger) -> Result<()> {
    let navigator = WeekNavigator::new(config);
    logger.log(
        &LogEntry::new(EventType::WeekNavigated, Severity::Info)
            .with_week(navigator.window().week_number),
    );

    if args.json {
        let payload = serde_json::json!({
            "window": navigator.window(),
            "options": navigator.options(),
            "prev": navigator.prev(),
            "next": navigator.next(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    for option in navigator.options() {
        let marker = if option.selected { "*" } else { " " };
        println!("{marker} week {}  {}  {}", option.week, option.label, option.url);
    }
    let prev = navigator.prev();
    let next = navigator.next();
    println!(
        "prev: {}  next: {}",
        prev.url.as_deref().unwrap_or("(disabled)"),
        next.url.as_deref().unwrap_or("(disabled)")
    );
    Ok(())
}

fn print_headers(chart: &reservation_grid::grid::ChartView) {
    let mut line = String::from("      ");
    for header in &chart.rendered.headers {
        line.push_str(&format!(
            "{:>2}({}) ",
            header.day_of_month, header.weekday_label
        ));
    }
    println!("{line}");
}

/// Column widths are fixed; absorbed cells print as continuation marks so
/// spans stay visible in plain text.
fn print_grid(grid: &CellGrid) {
    for row in 0..grid.rows() {
        let mut line = format!("r{row:<4} ");
        for column in 0..7 {
            let text = grid.cell(row, column).map_or_else(
                || "    ·".to_string(),
                |cell| format!("{:>5}", paint(&cell_text(cell))),
            );
            line.push_str(&text);
            line.push(' ');
        }
        println!("{line}");
    }
}

fn cell_text(cell: &reservation_grid::grid::render::RenderedCell) -> String {
    if let Some(notice) = &cell.overflow_notice {
        if cell.column_all_unavailable && notice != "－" {
            return "※".to_string();
        }
    }
    cell.label_text().replace('\n', "/")
}

fn paint(text: &str) -> String {
    let mark = Mark::from_label(text.split('/').next().unwrap_or(text));
    match mark {
        m if m.is_available() => text.green().to_string(),
        Mark::Waitlist => text.cyan().to_string(),
        Mark::PhoneOnly => text.red().to_string(),
        _ => text.dimmed().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    fn week_feed_json() -> String {
        let buckets: Vec<serde_json::Value> = (1..=7)
            .map(|day| {
                let date = format!("2024-04-{day:02}");
                serde_json::json!({ date.clone(): [
                    { "acp_status_mark": "○", "have_start": "", "date": date },
                ]})
            })
            .collect();
        serde_json::json!({ "commu_acp_status": buckets }).to_string()
    }

    #[test]
    fn json_render_still_logs_events() {
        let dir = tempfile::tempdir().unwrap();
        let feed_path = dir.path().join("feed.json");
        fs::write(&feed_path, week_feed_json()).unwrap();
        let log_path = dir.path().join("events.jsonl");
        let logger = JsonlLogger::new(Some(&log_path));

        let args = Cli::parse_from([
            "rgrid",
            "--json",
            "render",
            feed_path.to_str().unwrap(),
        ]);
        let Command::Render(render) = args.command.clone() else {
            panic!("expected render subcommand");
        };
        run_render(&args, &CalendarConfig::default(), &logger, &render).unwrap();

        let raw = fs::read_to_string(&log_path).unwrap();
        assert!(raw.contains("\"event\":\"grid_rendered\""), "log: {raw}");
    }

    #[test]
    fn json_render_logs_rejection_for_bad_feed() {
        let dir = tempfile::tempdir().unwrap();
        let feed_path = dir.path().join("feed.json");
        fs::write(&feed_path, "{\"commu_acp_status\": []}").unwrap();
        let log_path = dir.path().join("events.jsonl");
        let logger = JsonlLogger::new(Some(&log_path));

        let args = Cli::parse_from([
            "rgrid",
            "--json",
            "render",
            feed_path.to_str().unwrap(),
        ]);
        let Command::Render(render) = args.command.clone() else {
            panic!("expected render subcommand");
        };
        run_render(&args, &CalendarConfig::default(), &logger, &render).unwrap();

        let raw = fs::read_to_string(&log_path).unwrap();
        assert!(raw.contains("\"event\":\"feed_rejected\""), "log: {raw}");
        assert!(raw.contains("RGD-2001"), "log: {raw}");
    }

    #[test]
    fn cell_text_flattens_advance_tag() {
        use reservation_grid::grid::render::RenderedCell;
        let cell = RenderedCell::label("－".to_string());
        assert_eq!(cell_text(&cell), "－");
    }
}
