//! CLI entry point for `mailboard`.

use std::path::{Path, PathBuf};

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use mailboard::codec::{self, DragCarrier};
use mailboard::config::{self, Config};
use mailboard::engine::{self, Outcome};
use mailboard::feedback;
use mailboard::i18n;
use mailboard::ingest::{self, SourceFormat};
use mailboard::model::{Board, ColumnId};
use mailboard::session::{DragSession, DropResult, Gesture};
use mailboard::store::BoardStore;

#[derive(Parser)]
#[command(name = "mailboard", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Board snapshot (JSON) to start from
    #[arg(short, long, global = true, value_name = "FILE")]
    board: Option<PathBuf>,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Language (en, es). Defaults to system locale.
    #[arg(long, value_name = "LANG")]
    lang: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the board
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Import emails as one card each
    Import {
        file: PathBuf,
        #[arg(short, long)]
        column: Option<String>,
        #[arg(long)]
        gmail: bool,
        #[arg(long)]
        json: bool,
    },
    /// Replay a JSON-lines script of drag gestures
    Replay {
        script: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Decode a drag carrier
    Decode {
        carrier: String,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

/// Detect language early from --lang arg or system env, before clap processes --help.
fn detect_lang_early() -> i18n::Lang {
    let args: Vec<String> = std::env::args().collect();
    for (i, arg) in args.iter().enumerate() {
        let code = if arg == "--lang" {
            args.get(i + 1).map(String::as_str)
        } else {
            arg.strip_prefix("--lang=")
        };
        if let Some(lang) = code.and_then(i18n::Lang::from_code) {
            return lang;
        }
    }
    i18n::detect_system_lang()
}

/// Build a localized clap Command using i18n strings.
fn build_localized_command() -> clap::Command {
    let mut cmd = Cli::command()
        .about(i18n::app_about())
        .long_about(i18n::app_long_about())
        .mut_arg("board", |a| a.help(i18n::help_board()))
        .mut_arg("verbose", |a| a.help(i18n::help_verbose()))
        .mut_arg("lang", |a| a.help(i18n::help_lang()));

    let subcommands: Vec<clap::Command> = cmd
        .get_subcommands()
        .map(|sub| {
            let s = sub.clone();
            match s.get_name() {
                "show" => s
                    .about(i18n::help_cmd_show())
                    .mut_arg("json", |a| a.help(i18n::help_output_json())),
                "import" => s
                    .about(i18n::help_cmd_import())
                    .mut_arg("file", |a| a.help(i18n::help_import_file()))
                    .mut_arg("column", |a| a.help(i18n::help_import_column()))
                    .mut_arg("gmail", |a| a.help(i18n::help_import_gmail()))
                    .mut_arg("json", |a| a.help(i18n::help_output_json())),
                "replay" => s
                    .about(i18n::help_cmd_replay())
                    .mut_arg("script", |a| a.help(i18n::help_replay_script()))
                    .mut_arg("json", |a| a.help(i18n::help_output_json())),
                "decode" => s
                    .about(i18n::help_cmd_decode())
                    .mut_arg("carrier", |a| a.help(i18n::help_decode_carrier())),
                "completions" => s.about(i18n::help_cmd_completions()),
                "manpage" => s.about(i18n::help_cmd_manpage()),
                _ => s,
            }
        })
        .collect();

    for sub in subcommands {
        cmd = cmd.mut_subcommand(sub.get_name(), |_| sub.clone());
    }

    cmd
}

fn main() -> anyhow::Result<()> {
    // Detect language BEFORE clap parsing so --help is localized
    i18n::set_lang(detect_lang_early());

    let matches = build_localized_command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    let config = config::load_config();

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    match cli.command {
        None => cmd_show(cli.board.as_deref(), &config, false),
        Some(Commands::Show { json }) => cmd_show(cli.board.as_deref(), &config, json),
        Some(Commands::Import {
            file,
            column,
            gmail,
            json,
        }) => cmd_import(cli.board.as_deref(), &config, &file, column, gmail, json),
        Some(Commands::Replay { script, json }) => {
            cmd_replay(cli.board.as_deref(), &config, &script, json)
        }
        Some(Commands::Decode { carrier }) => cmd_decode(&carrier),
        Some(Commands::Completions { shell }) => cmd_completions(shell),
        Some(Commands::Manpage) => cmd_manpage(),
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_path = config::log_file_path(config);
    let file_target = match (log_path.parent(), log_path.file_name()) {
        (Some(dir), Some(name)) if std::fs::create_dir_all(dir).is_ok() => Some((dir, name)),
        _ => None,
    };

    if let Some((dir, name)) = file_target {
        let file_appender = tracing_appender::rolling::never(dir, name);
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        // Fall back to stderr only
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Load the board snapshot, or seed one from the configured columns.
fn load_board(path: Option<&Path>, config: &Config) -> anyhow::Result<Board> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("{}: {}", i18n::err_file_not_found(), path.display());
            }
            Ok(Board::from_json_file(path)?)
        }
        None => Ok(config.board.seed_board()),
    }
}

/// Print the board.
fn cmd_show(board_path: Option<&Path>, config: &Config, json: bool) -> anyhow::Result<()> {
    let board = load_board(board_path, config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&board)?);
    } else {
        print_board_table(&board);
    }
    Ok(())
}

/// Import a file of email records, one card per email.
fn cmd_import(
    board_path: Option<&Path>,
    config: &Config,
    file: &Path,
    column: Option<String>,
    gmail: bool,
    json: bool,
) -> anyhow::Result<()> {
    if !file.exists() {
        anyhow::bail!("{}: {}", i18n::err_file_not_found(), file.display());
    }
    let mut store = BoardStore::new(load_board(board_path, config)?);

    let format = if gmail {
        SourceFormat::Gmail
    } else {
        SourceFormat::Normalized
    };
    let mut records = ingest::load_records(file, format, chrono::Utc::now())?;
    if records.len() > config.import.max_results {
        tracing::debug!(
            total = records.len(),
            kept = config.import.max_results,
            "Truncating import batch"
        );
        records.truncate(config.import.max_results);
    }

    let column_id = column.map(ColumnId::from).unwrap_or_else(|| config.import.target());
    let mut report = engine::ImportReport::default();
    let outcome = store.apply(|board| {
        let (reconciliation, r) = engine::import_emails(board, &column_id, &records);
        report = r;
        reconciliation
    });
    if outcome == Outcome::NotFound {
        anyhow::bail!("{}: {}", i18n::err_unknown_column(), column_id);
    }

    let board = store.get_board();
    if json {
        let output = serde_json::json!({
            "created": report.created,
            "skipped": report.skipped,
            "outcome": outcome,
            "board": &*board,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let title = board
        .column(&column_id)
        .map(|c| c.title.as_str())
        .unwrap_or(column_id.as_str());
    println!();
    println!(
        "  {} {} {} {}",
        i18n::cli_imported(),
        report.created,
        i18n::cli_cards_into(),
        title
    );
    if !report.skipped.is_empty() {
        println!(
            "  {} {} {}",
            i18n::cli_skipped(),
            report.skipped.len(),
            i18n::cli_already_on_board()
        );
    }
    print_board_table(&board);
    Ok(())
}

/// Replay a script of drag gestures against the board.
fn cmd_replay(
    board_path: Option<&Path>,
    config: &Config,
    script: &Path,
    json: bool,
) -> anyhow::Result<()> {
    if !script.exists() {
        anyhow::bail!("{}: {}", i18n::err_file_not_found(), script.display());
    }
    let contents = std::fs::read_to_string(script)?;
    let mut store = BoardStore::new(load_board(board_path, config)?);
    let mut session = DragSession::new();
    let mut steps = Vec::new();

    for (idx, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_no = idx + 1;
        let gesture: Gesture = serde_json::from_str(line)
            .map_err(|e| anyhow::anyhow!("{} {line_no}: {e}", i18n::err_script_line()))?;
        let result = gesture.play(&mut session, &mut store)?;
        let board = store.get_board();
        let notice = result.as_ref().and_then(|r| feedback::for_drop(r, &board));

        if json {
            steps.push(serde_json::json!({
                "line": line_no,
                "status": status_label(result.as_ref()),
                "outcome": result.as_ref().and_then(DropResult::outcome),
                "feedback": notice,
                "revision": store.revision(),
            }));
        } else {
            let mut text = format!(
                "  {} {line_no}: {}",
                i18n::cli_gesture(),
                status_text(result.as_ref())
            );
            if let Some(notice) = notice {
                text.push_str(&format!("  [{}] {}", notice.title, notice.description));
            }
            println!("{text}");
        }
    }

    let board = store.get_board();
    if json {
        let output = serde_json::json!({
            "steps": steps,
            "revision": store.revision(),
            "board": &*board,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!();
        println!("  {} {}", i18n::msg_revision(), store.revision());
        print_board_table(&board);
    }
    Ok(())
}

fn status_label(result: Option<&DropResult>) -> &'static str {
    match result {
        None => "cancelled",
        Some(DropResult::NotDragging) => "not_dragging",
        Some(DropResult::Malformed(_)) => "malformed",
        Some(DropResult::Settled { .. }) => "settled",
    }
}

fn status_text(result: Option<&DropResult>) -> String {
    match result {
        None => i18n::cli_cancelled().to_string(),
        Some(DropResult::NotDragging) => i18n::cli_no_drag().to_string(),
        Some(DropResult::Malformed(e)) => e.to_string(),
        Some(DropResult::Settled { payload, outcome }) => {
            format!("{} {}", payload.kind(), outcome_label(outcome))
        }
    }
}

fn outcome_label(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Unchanged => "unchanged".to_string(),
        Outcome::Reconciled => "reconciled".to_string(),
        Outcome::Duplicate(card_id) => format!("duplicate ({card_id})"),
        Outcome::NotFound => "not_found".to_string(),
        Outcome::Rejected => "rejected".to_string(),
    }
}

/// Decode a carrier in wire form and print the payload.
fn cmd_decode(wire: &str) -> anyhow::Result<()> {
    let carrier = DragCarrier::from_wire(wire);
    let payload = codec::decode(&carrier)?;
    println!("  {:<10} {}", i18n::cli_kind(), payload.kind());
    println!("  {}:", i18n::cli_payload());
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "mailboard", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}

/// Print the board as one table per column.
fn print_board_table(board: &Board) {
    println!();
    println!(
        "  {}: {} {}, {} {}, {} {}",
        i18n::msg_board(),
        board.columns.len(),
        i18n::msg_columns(),
        board.card_count(),
        i18n::msg_cards(),
        board.email_count(),
        i18n::msg_emails()
    );

    for column in &board.columns {
        println!();
        println!("  {} ({}) [{}]", column.title, column.id, column.cards.len());
        if column.cards.is_empty() {
            println!("    {}", i18n::msg_empty_column());
            continue;
        }
        println!(
            "    {} {} {:>6} {:>6} {} {}",
            fit(i18n::col_card(), 20),
            fit(i18n::col_subject(), 36),
            i18n::col_emails(),
            i18n::col_unread(),
            fit(i18n::col_priority(), 9),
            i18n::col_labels()
        );
        println!("    {}", "-".repeat(90));
        for card in &column.cards {
            println!(
                "    {} {} {:>6} {:>6} {} {}",
                fit(card.id.as_str(), 20),
                fit(&card.subject, 36),
                card.emails.len(),
                card.unread_count(),
                fit(card.priority.as_str(), 9),
                card.labels.join(", ")
            );
        }
    }
    println!();
}

/// Truncate or pad `s` to exactly `width` terminal columns.
fn fit(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    if UnicodeWidthStr::width(s) <= width {
        out.push_str(s);
        used = UnicodeWidthStr::width(s);
    } else {
        for ch in s.chars() {
            let w = UnicodeWidthChar::width(ch).unwrap_or(0);
            if used + w + 3 > width {
                break;
            }
            out.push(ch);
            used += w;
        }
        out.push_str("...");
        used += 3;
    }
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}
