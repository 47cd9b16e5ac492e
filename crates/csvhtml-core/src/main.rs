//! csvhtml - render CSV/TSV as a sortable HTML table
//!
//! Writes one document to stdout, or with `--serve` re-renders the input on
//! every request and reloads open pages when the input file changes.

use clap::{ArgAction, Parser};
use csvhtml_core::exit_codes::ExitCode;
use csvhtml_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use csvhtml_core::{run, ServiceOptions};
use csvhtml_render::InputSource;
use std::path::PathBuf;

/// Render delimited text as an HTML table
#[derive(Parser, Debug)]
#[command(name = "csvhtml")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input file. If not specified, stdin is used.
    #[arg(long, short = 'i')]
    input: Option<PathBuf>,

    /// Field separator. Defaults to comma, unless --input has a .tsv extension. Use '\t' for tab.
    #[arg(long, short = 's')]
    separator: Option<String>,

    /// Use first row as header
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    header: bool,

    /// Detect links in cells and wrap them in <a> tags
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    detect_links: bool,

    /// HTML-escape cell text (cells are inserted verbatim otherwise)
    #[arg(long)]
    escape_cells: bool,

    /// Minify the generated HTML
    #[arg(long)]
    minify: bool,

    /// Serve the HTML at the given address instead of writing to stdout
    #[arg(long, env = "CSVHTML_SERVE")]
    serve: Option<String>,

    /// In serve mode, reload open pages when the --input file changes
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    watch: bool,

    /// Log level
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,

    /// Log format
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            input: self
                .input
                .clone()
                .map_or(InputSource::Stdin, InputSource::File),
            separator: self.separator.clone(),
            header: self.header,
            detect_links: self.detect_links,
            escape_cells: self.escape_cells,
            minify: self.minify,
            serve: self.serve.clone(),
            watch: self.watch,
        }
    }

    fn log_config(&self) -> LogConfig {
        let level = self
            .log_level
            .or_else(|| LogLevel::from_verbosity(self.verbose, self.quiet));
        LogConfig::from_env(level, self.log_format)
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_config());

    let options = cli.service_options();
    let exit_code = match run(&options) {
        Ok(()) => ExitCode::Clean,
        Err(e) => {
            let code = ExitCode::from(&e);
            tracing::error!(code = code.code_name(), "{e}");
            code
        }
    };

    std::process::exit(exit_code.as_i32());
}
