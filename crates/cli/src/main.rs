use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use fdir_organizer_core::{
    app_paths, compile_pattern, execute_creations, execute_plan, generate_plan, load_config,
    plan_creations, save_config, BatchPlan, BatchReport, CreateOptions, CreatePlan, CreateReport,
    ExecutionMode, MatchRule, NamingRule, OutcomeStatus, PlanOptions,
};

#[derive(Debug, Parser)]
#[command(name = "fdir-organizer-cli")]
#[command(about = "1つのフォルダ内のファイルを一括作成・リネーム・移動します")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Create(CreateArgs),
    Rename(RenameArgs),
    Move(MoveArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    Show,
    Init,
}

#[derive(Debug, Args)]
struct CreateArgs {
    #[arg(long)]
    directory: String,
    #[arg(long)]
    count: Option<usize>,
    #[arg(long)]
    exts: Option<String>,
    #[arg(long)]
    start: Option<usize>,
    #[arg(long, default_value_t = false)]
    apply: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Debug, Args)]
struct RenameArgs {
    #[arg(long)]
    directory: String,
    #[arg(long)]
    exts: String,
    #[arg(long)]
    prefix: String,
    #[arg(long)]
    start: Option<usize>,
    #[arg(long, default_value_t = false)]
    apply: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Debug, Args)]
struct MoveArgs {
    #[arg(long)]
    source: String,
    #[arg(long)]
    destination: String,
    #[arg(long)]
    pattern: String,
    #[arg(long)]
    replace: Option<String>,
    #[arg(long, default_value_t = false)]
    apply: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Create(args) => cmd_create(args),
        Commands::Rename(args) => cmd_rename(args),
        Commands::Move(args) => cmd_move(args),
        Commands::Config(config) => match config.action {
            ConfigAction::Show => cmd_config_show(),
            ConfigAction::Init => cmd_config_init(),
        },
    }
}

fn cmd_create(args: CreateArgs) -> Result<()> {
    let config = load_config()?;
    let extensions = match args.exts.as_deref() {
        Some(raw) => split_comma_list(raw),
        None => config.create_extensions.clone(),
    };

    let options = CreateOptions {
        directory: args.directory.into(),
        extensions,
        count: args.count.unwrap_or(config.create_count),
        start: args.start.unwrap_or(config.counter_start),
    };

    let plan = plan_creations(&options)?;
    let report = execute_creations(&plan, execution_mode(args.apply))?;

    match args.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => {
            print_create_table(&plan, &report);
        }
    }

    match report.mode {
        ExecutionMode::Dry => print_dry_run_notice(),
        ExecutionMode::Apply => {
            if report.failed > 0 {
                eprintln!("作成完了: {}件 (失敗 {}件)", report.created, report.failed);
            } else {
                eprintln!("作成完了: {}件", report.created);
            }
        }
    }

    Ok(())
}

fn cmd_rename(args: RenameArgs) -> Result<()> {
    let config = load_config()?;
    let extensions = split_comma_list(&args.exts);

    let options = PlanOptions {
        source_dir: args.directory.into(),
        dest_dir: None,
        match_rule: MatchRule::extensions(&extensions)?,
        naming_rule: NamingRule::Counter {
            prefix: args.prefix,
            start: args.start.unwrap_or(config.counter_start),
        },
    };

    run_batch(&options, args.apply, args.output)
}

fn cmd_move(args: MoveArgs) -> Result<()> {
    let pattern = compile_pattern(&args.pattern)?;

    let options = PlanOptions {
        source_dir: args.source.into(),
        dest_dir: Some(args.destination.into()),
        match_rule: MatchRule::Stem(pattern.clone()),
        naming_rule: NamingRule::Substitution {
            pattern,
            replacement: args.replace,
        },
    };

    run_batch(&options, args.apply, args.output)
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let paths = app_paths()?;
    println!("設定ファイル: {}", paths.config_path.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let config = load_config()?;
    save_config(&config)?;
    let paths = app_paths()?;
    println!("設定ファイルを書き込みました: {}", paths.config_path.display());
    Ok(())
}

fn run_batch(options: &PlanOptions, apply: bool, output: OutputFormat) -> Result<()> {
    let plan = generate_plan(options)?;
    let report = execute_plan(&plan, execution_mode(apply))?;

    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => {
            print_batch_table(&plan, &report);
        }
    }

    match report.mode {
        ExecutionMode::Dry => print_dry_run_notice(),
        ExecutionMode::Apply => {
            if report.failed > 0 {
                eprintln!(
                    "適用完了: {}件 (変更なし {}件, 失敗 {}件)",
                    report.applied, report.stats.unchanged, report.failed
                );
            } else {
                eprintln!(
                    "適用完了: {}件 (変更なし {}件)",
                    report.applied, report.stats.unchanged
                );
            }
        }
    }

    Ok(())
}

fn execution_mode(apply: bool) -> ExecutionMode {
    if apply {
        ExecutionMode::Apply
    } else {
        ExecutionMode::Dry
    }
}

fn split_comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

fn print_dry_run_notice() {
    eprintln!(
        "dry-runモード: 実ファイルは変更していません。適用するには --apply を指定してください。"
    );
}

fn print_batch_table(plan: &BatchPlan, report: &BatchReport) {
    if report.no_matches {
        println!(
            "一致するファイルがありませんでした: {}",
            plan.source_dir.display()
        );
        return;
    }

    println!("元ファイル -> 新ファイル");
    for outcome in &report.outcomes {
        match &outcome.status {
            OutcomeStatus::Previewed => {
                println!("[dry] {} -> {}", outcome.source_name, outcome.destination_name);
            }
            OutcomeStatus::Applied => {
                println!("{} -> {}", outcome.source_name, outcome.destination_name);
            }
            OutcomeStatus::Unchanged => {
                println!("変更なし: {}", outcome.source_name);
            }
            OutcomeStatus::Failed { message } => {
                println!(
                    "失敗: {} -> {}: {}",
                    outcome.source_name, outcome.destination_name, message
                );
            }
        }
    }

    println!(
        "\n集計: scanned={} non_file_skip={} matched={} unmatched_skip={} planned={} unchanged={}",
        report.stats.scanned_entries,
        report.stats.skipped_non_files,
        report.stats.matched,
        report.stats.skipped_unmatched,
        report.stats.planned,
        report.stats.unchanged
    );
}

fn print_create_table(plan: &CreatePlan, report: &CreateReport) {
    println!("作成先: {}", plan.directory.display());
    for outcome in &report.outcomes {
        match &outcome.status {
            OutcomeStatus::Previewed => {
                println!("[dry] 作成予定: {}", outcome.name);
            }
            OutcomeStatus::Applied => {
                println!("作成しました: {}", outcome.name);
            }
            OutcomeStatus::Unchanged => {}
            OutcomeStatus::Failed { message } => {
                println!("失敗: {}: {}", outcome.name, message);
            }
        }
    }

    println!(
        "\n集計: planned={} created={} failed={}",
        plan.file_names.len(),
        report.created,
        report.failed
    );
}
