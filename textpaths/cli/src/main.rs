use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Generator, Shell};
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use owo_colors::{OwoColorize, Style};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use textpaths_lib::{
    Category, DeclarationSummary, FieldPath, FileSummary, PackageSummary, Registry, SourceFile,
    SourceLanguage, SyntaxDiagnostic, SyntaxNode, TextPathsError, TreeWalker, WalkEvent,
    typescript,
};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "tpaths",
    version,
    about = "Find the textual fields of TypeScript interfaces and type aliases"
)]
struct Cli {
    /// Glob patterns for files to ignore
    #[arg(long, value_name = "GLOB", global = true)]
    ignore: Vec<String>,

    /// Force a specific language
    #[arg(long, value_enum, global = true)]
    language: Option<LanguageArg>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Disable colors and hyperlinks (plain text output)
    #[arg(long, global = true)]
    plain: bool,

    /// Separator placed between path segments
    #[arg(long, value_name = "SEP", default_value = ".", global = true)]
    separator: String,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    /// Returns the output format based on flags.
    fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.plain {
            OutputFormat::Plain
        } else {
            OutputFormat::Pretty
        }
    }
}

/// Common arguments for file-based subcommands
#[derive(clap::Args, Debug, Clone)]
struct CommonArgs {
    /// Glob patterns for files to include
    #[arg(value_name = "GLOB", num_args = 1..)]
    inputs: Vec<String>,
}

/// Arguments for the completions command
#[derive(clap::Args, Debug, Clone)]
struct CompletionsArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// List the dotted paths of textual fields in the file(s)
    Paths(CommonArgs),
    /// Print the node kinds visited while walking the file(s)
    Walk(CommonArgs),
    /// List the registered scanners in the order they are tried
    Patterns,
    /// Generate shell completions
    Completions(CompletionsArgs),
}

impl Command {
    /// Returns the input glob patterns from the subcommand.
    fn inputs(&self) -> &[String] {
        match self {
            Self::Paths(args) | Self::Walk(args) => &args.inputs,
            Self::Patterns | Self::Completions(_) => &[],
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum OutputFormat {
    /// Colored output with hyperlinks (default when TTY)
    Pretty,
    /// Plain text without colors or hyperlinks
    Plain,
    /// JSON output
    Json,
}

/// Configuration for output styling.
struct OutputConfig {
    use_colors: bool,
    use_hyperlinks: bool,
    separator: String,
}

impl OutputConfig {
    fn new(format: OutputFormat, separator: &str) -> Self {
        let separator = separator.to_string();
        match format {
            OutputFormat::Pretty => {
                let no_color = std::env::var("NO_COLOR").is_ok();
                let is_tty = std::io::stdout().is_terminal();
                let use_colors = !no_color && is_tty;
                Self {
                    use_colors,
                    use_hyperlinks: use_colors && is_tty,
                    separator,
                }
            }
            OutputFormat::Plain | OutputFormat::Json => Self {
                use_colors: false,
                use_hyperlinks: false,
                separator,
            },
        }
    }
}

/// Returns the color style for a match category.
fn style_for_category(category: Category) -> Style {
    match category {
        Category::Declaration => Style::new().magenta(),
        Category::Alias => Style::new().cyan(),
        Category::Field => Style::new().green(),
    }
}

/// Creates an OSC8 hyperlink for a file path with line number.
fn hyperlink(path: &Path, line: usize, text: &str) -> String {
    const FILE_URL_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'/').remove(b':');
    let absolute_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|root| root.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    let path_str = absolute_path.to_string_lossy();
    let encoded = utf8_percent_encode(&path_str, FILE_URL_ENCODE_SET);
    format!(
        "\x1b]8;;file://{}#L{}\x1b\\{}\x1b]8;;\x1b\\",
        encoded, line, text
    )
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|ancestor| ancestor.join(".git").is_dir())
        .map(Path::to_path_buf)
}

fn display_path(path: &Path, root: Option<&Path>) -> String {
    if let Some(root) = root
        && let Ok(relative) = path.strip_prefix(root)
    {
        return relative.display().to_string();
    }
    path.display().to_string()
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum LanguageArg {
    TypeScript,
    Tsx,
}

impl From<LanguageArg> for SourceLanguage {
    fn from(value: LanguageArg) -> Self {
        match value {
            LanguageArg::TypeScript => Self::TypeScript,
            LanguageArg::Tsx => Self::Tsx,
        }
    }
}

/// One visited node in a walk trace.
#[derive(Debug, Clone, Serialize)]
struct TraceLine {
    depth: usize,
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scanner: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<Category>,
}

#[derive(Debug, Clone, Serialize)]
struct WalkTrace {
    file: PathBuf,
    language: SourceLanguage,
    nodes: Vec<TraceLine>,
}

#[derive(Debug, Clone, Serialize)]
struct ScannerRow {
    index: usize,
    category: Category,
    node: String,
    children: Vec<String>,
}

fn main() -> Result<(), TextPathsError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output_format = cli.output_format();
    let output_config = OutputConfig::new(output_format, &cli.separator);
    let registry = typescript::registry();

    match &cli.command {
        Command::Completions(args) => {
            print_completions(args.shell, &mut Cli::command());
            return Ok(());
        }
        Command::Patterns => return render_patterns(&registry, output_format, &output_config),
        Command::Paths(_) | Command::Walk(_) => {}
    }

    let language = cli.language.map(SourceLanguage::from);
    let root_dir = current_dir()?;
    let display_root = find_repo_root(&root_dir);
    let files = collect_files(&root_dir, cli.command.inputs(), &cli.ignore, language)?;
    info!(files = files.len(), root = %root_dir.display(), "collected source files");

    if let Command::Walk(_) = &cli.command {
        let mut traces = Vec::new();
        for file in files {
            let source_file = SourceFile::with_language(&file, language)?;
            traces.push(trace_file(&source_file, &registry));
        }

        match output_format {
            OutputFormat::Json => print_json(&traces)?,
            OutputFormat::Pretty | OutputFormat::Plain => {
                for trace in &traces {
                    render_trace(trace, &output_config, display_root.as_deref());
                }
            }
        }
        return Ok(());
    }

    let mut summaries = Vec::new();
    for file in files {
        let source_file = SourceFile::with_language(&file, language)?;
        let summary = source_file.summary();
        if !summary.syntax.is_empty() {
            warn!(
                file = %summary.file.display(),
                errors = summary.syntax.len(),
                "file has syntax errors; paths may be incomplete"
            );
        }
        summaries.push(summary);
    }

    match output_format {
        OutputFormat::Json => print_json(&PackageSummary {
            root_dir,
            files: summaries,
        })?,
        OutputFormat::Pretty | OutputFormat::Plain => {
            for summary in &summaries {
                render_summary(summary, &output_config, display_root.as_deref());
            }
        }
    }

    Ok(())
}

/// Initializes the tracing subscriber when verbose output is requested.
///
/// `RUST_LOG` takes precedence over the `-v` count.
fn init_tracing(verbose: u8) {
    if verbose == 0 {
        return;
    }

    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            1 => "warn,tpaths=info,textpaths_lib=info".to_string(),
            2 => "warn,tpaths=debug,textpaths_lib=debug".to_string(),
            _ => "warn,tpaths=trace,textpaths_lib=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_file(verbose >= 4)
                .with_line_number(verbose >= 4)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn current_dir() -> Result<PathBuf, TextPathsError> {
    std::env::current_dir().map_err(|source| TextPathsError::Io {
        path: PathBuf::from("."),
        source,
    })
}

/// Prints shell completions to stdout.
fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    clap_complete::generate(generator, cmd, cmd.get_name().to_string(), &mut std::io::stdout());
}

fn print_json<T: Serialize>(value: &T) -> Result<(), TextPathsError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| TextPathsError::Io {
        path: PathBuf::from("<stdout>"),
        source: std::io::Error::other(source),
    })?;
    println!("{json}");
    Ok(())
}

fn collect_files(
    root: &Path,
    inputs: &[String],
    ignores: &[String],
    language: Option<SourceLanguage>,
) -> Result<Vec<PathBuf>, TextPathsError> {
    let mut overrides = OverrideBuilder::new(root);
    for input in inputs {
        overrides.add(input)?;
    }
    for ignore in ignores {
        overrides.add(&format!("!{ignore}"))?;
    }

    let overrides = overrides.build()?;
    let mut files = Vec::new();

    let walker = WalkBuilder::new(root)
        .standard_filters(true)
        .hidden(false)
        .overrides(overrides)
        .build();

    for entry in walker {
        let entry = entry.map_err(TextPathsError::Ignore)?;

        let is_file = entry
            .file_type()
            .map(|file| file.is_file())
            .unwrap_or(false);

        if !is_file {
            continue;
        }

        let detected = SourceLanguage::from_path(entry.path());
        let wanted = match language {
            Some(language) => detected == Some(language),
            None => detected.is_some(),
        };
        if !wanted {
            debug!(path = %entry.path().display(), "skipping unsupported file");
            continue;
        }

        files.push(entry.into_path());
    }

    files.sort();

    if files.is_empty() {
        return Err(TextPathsError::NoSourceFiles {
            path: root.to_path_buf(),
        });
    }

    Ok(files)
}

/// Walks `file`, recording every visit and annotating the nodes that matched.
fn trace_file(file: &SourceFile, registry: &Registry) -> WalkTrace {
    let mut nodes: Vec<TraceLine> = Vec::new();

    TreeWalker::new(registry).walk_observed(file.root(), |event| match event {
        WalkEvent::Enter { node, depth, .. } => nodes.push(TraceLine {
            depth,
            kind: node.kind().to_string(),
            text: node
                .text()
                .filter(|text| *text != node.kind())
                .map(str::to_string),
            scanner: None,
            category: None,
        }),
        WalkEvent::Match {
            ordinal,
            scanner,
            category,
            ..
        } => {
            if let Some(line) = nodes.get_mut(ordinal) {
                line.scanner = Some(scanner);
                line.category = Some(category);
            }
        }
    });

    WalkTrace {
        file: file.file.clone(),
        language: file.language,
        nodes,
    }
}

fn render_file_header(
    file: &Path,
    language: SourceLanguage,
    config: &OutputConfig,
    display_root: Option<&Path>,
) {
    let file_display = display_path(file, display_root);
    let header = if config.use_hyperlinks {
        hyperlink(file, 1, &file_display)
    } else {
        file_display
    };

    if config.use_colors {
        println!("{} ({})", header.bold(), language.to_string().dimmed());
    } else {
        println!("{} ({})", header, language);
    }
}

fn render_trace(trace: &WalkTrace, config: &OutputConfig, display_root: Option<&Path>) {
    render_file_header(&trace.file, trace.language, config, display_root);

    for line in &trace.nodes {
        let indent = "  ".repeat(line.depth + 1);
        let text = line
            .text
            .as_deref()
            .map(|text| format!(" {text:?}"))
            .unwrap_or_default();
        let tag = match (line.category, line.scanner) {
            (Some(category), Some(scanner)) if config.use_colors => format!(
                "  {}",
                format!("[{category} #{scanner}]").style(style_for_category(category))
            ),
            (Some(category), Some(scanner)) => format!("  [{category} #{scanner}]"),
            _ => String::new(),
        };

        if config.use_colors {
            println!("{indent}{}{}{tag}", line.kind, text.dimmed());
        } else {
            println!("{indent}{}{text}{tag}", line.kind);
        }
    }

    println!();
}

fn render_summary(summary: &FileSummary, config: &OutputConfig, display_root: Option<&Path>) {
    render_file_header(&summary.file, summary.language, config, display_root);

    let mut printed = 0;
    for declaration in &summary.declarations {
        if declaration.paths.is_empty() {
            continue;
        }
        render_declaration(declaration, &summary.file, config);
        printed += declaration.paths.len();
    }

    if printed == 0 {
        if config.use_colors {
            println!("  {}", "no textual fields".dimmed());
        } else {
            println!("  no textual fields");
        }
    }

    render_syntax(&summary.syntax, config);
    println!();
}

fn render_declaration(declaration: &DeclarationSummary, file: &Path, config: &OutputConfig) {
    let line = declaration.range.start_line;
    let label = format!("L{line}");
    let location = if config.use_hyperlinks {
        hyperlink(file, line, &label)
    } else {
        label
    };

    if config.use_colors {
        println!(
            "  {} {} {}",
            declaration
                .name
                .style(style_for_category(declaration.category).bold()),
            declaration.category.to_string().dimmed(),
            location.dimmed()
        );
    } else {
        println!(
            "  {} {} {}",
            declaration.name, declaration.category, location
        );
    }

    for path in &declaration.paths {
        println!("    {}", format_path(path, config));
    }
}

fn format_path(path: &FieldPath, config: &OutputConfig) -> String {
    let joined = path.join(&config.separator);
    if !config.use_colors {
        return joined;
    }

    match path.segments().split_last() {
        Some((last, [])) => last.green().to_string(),
        Some((last, parents)) => format!(
            "{}{}",
            format!("{}{}", parents.join(config.separator.as_str()), config.separator).dimmed(),
            last.green()
        ),
        None => joined,
    }
}

fn render_syntax(syntax: &[SyntaxDiagnostic], config: &OutputConfig) {
    for diagnostic in syntax {
        let location = format!(
            "{}:{}",
            diagnostic.range.start_line, diagnostic.range.start_column
        );
        if config.use_colors {
            println!(
                "  {} {} {}",
                "!".yellow().bold(),
                diagnostic.message.yellow(),
                location.dimmed()
            );
        } else {
            println!("  ! {} {}", diagnostic.message, location);
        }
    }
}

fn render_patterns(
    registry: &Registry,
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<(), TextPathsError> {
    match format {
        OutputFormat::Json => {
            let rows: Vec<ScannerRow> = registry
                .scanners()
                .iter()
                .enumerate()
                .map(|(index, scanner)| ScannerRow {
                    index,
                    category: scanner.category(),
                    node: scanner.node_predicate().to_string(),
                    children: scanner
                        .pattern()
                        .child_predicates()
                        .into_iter()
                        .map(ToString::to_string)
                        .collect(),
                })
                .collect();
            print_json(&rows)?;
        }
        OutputFormat::Pretty | OutputFormat::Plain => {
            for (index, scanner) in registry.scanners().iter().enumerate() {
                if config.use_colors {
                    println!(
                        "{} {}",
                        format!("#{index}").dimmed(),
                        scanner.to_string().style(style_for_category(scanner.category()))
                    );
                } else {
                    println!("#{index} {scanner}");
                }
            }
        }
    }
    Ok(())
}
