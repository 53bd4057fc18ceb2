use chrono::{FixedOffset, NaiveDate, Utc};
use clap::Parser;
use dialoguer::Confirm;
use junkai_common::{date_label, City, CityStore, Counts, ListController, RowView, Status, Summary};
use junkai_sync::{cli, config, error, file_store, pipeline, redirect, status, transport};
use cli::{Cli, Commands};
use config::Config;
use error::{Result, SyncError};
use file_store::FileStore;
use pipeline::{ClientSettings, PullOutcome, SyncClient};
use status::TerminalSink;
use tracing_subscriber::EnvFilter;
use transport::ReqwestTransport;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Init => {
            println!("🔄 junkai - 初期同期\n");
            if !confirm(cli.yes, "ローカルのデータをリセットして全体管理から取り込みます。よろしいですか？")? {
                println!("中止しました");
                return Ok(());
            }

            let mut client = build_client(&config)?;
            let sink = TerminalSink::new(cli.verbose);
            let outcome = client.initial_sync(&sink).await;
            finish_pull(&outcome, client.store());
        }

        Commands::Sync => {
            println!("🔄 junkai - 同期\n");
            let mut client = build_client(&config)?;
            let sink = TerminalSink::new(cli.verbose);
            let (pushed, pulled) = client.sync(&sink).await;
            if !pushed.ok {
                println!("⚠ 送信に失敗しました（取り込みは続行）");
            }
            finish_pull(&pulled, client.store());
        }

        Commands::Pull { sheet, label } => {
            println!("📥 junkai - 取り込み: {}\n", sheet);
            let mut client = build_client(&config)?;
            let sink = TerminalSink::new(cli.verbose);
            let outcome = client.pull(&sheet, &label, &sink).await;
            finish_pull(&outcome, client.store());
        }

        Commands::Push => {
            println!("📤 junkai - データ送信\n");
            let client = build_client(&config)?;
            let sink = TerminalSink::new(cli.verbose);
            let outcome = client.push(&sink).await;
            if !outcome.ok {
                std::process::exit(1);
            }
        }

        Commands::Summary => {
            let store = open_store(&config)?;
            print_summary(&store);
        }

        Commands::List { city } => {
            let city = City::lookup(&city)?;
            let offset = config.utc_offset()?;
            let mut store = open_store(&config)?;
            let list = ListController::new(&mut store, city);

            println!("📋 {} （{}）\n", city, list.hint());
            for row in list.rows(Utc::now()) {
                print_row(&row, offset);
            }
        }

        Commands::Check { city, key, off } => {
            let city = City::lookup(&city)?;
            let offset = config.utc_offset()?;
            let mut store = open_store(&config)?;
            let mut list = ListController::new(&mut store, city);

            let record = list.find(&key)?;
            let message = if off {
                "チェックを外します。よろしいですか？"
            } else {
                "チェックを付けます。よろしいですか？"
            };
            if !confirm(cli.yes, &format!("{} {} {}", record.ui_index, record.station, message))? {
                println!("中止しました");
                return Ok(());
            }

            let row = list.set_checked(&key, !off, Utc::now())?;
            print_row(&row, offset);
        }

        Commands::Status { city, key, state } => {
            let city = City::lookup(&city)?;
            let status: Status = state.parse()?;
            let offset = config.utc_offset()?;
            let mut store = open_store(&config)?;
            let mut list = ListController::new(&mut store, city);

            let row = list.set_status(&key, status, Utc::now())?;
            print_row(&row, offset);
        }

        Commands::Date { city, key, date } => {
            let city = City::lookup(&city)?;
            let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
                .map_err(|_| junkai_common::Error::InvalidDate(date.clone()))?;
            let offset = config.utc_offset()?;
            let mut store = open_store(&config)?;
            let mut list = ListController::new(&mut store, city);

            let record = list.find(&key)?;
            if !confirm(cli.yes, &format!("{} {} の点検日を {} にします。よろしいですか？", record.ui_index, record.station, date))? {
                println!("中止しました");
                return Ok(());
            }

            let row = list.set_date(&key, date, Utc::now())?;
            print_row(&row, offset);
        }

        Commands::Inspect { city, key } => {
            let city = City::lookup(&city)?;
            let mut store = open_store(&config)?;
            let list = ListController::new(&mut store, city);

            let record = list.find(&key)?;
            println!("{}", redirect::inspection_url(&config.tire_app_url, &record)?);
        }

        Commands::Reset => {
            if !confirm(cli.yes, "ローカルのデータをすべて削除します。よろしいですか？")? {
                println!("中止しました");
                return Ok(());
            }
            let mut store = open_store(&config)?;
            store.reset_all()?;
            println!("✔ ローカルのデータを削除しました");
        }

        Commands::Config { set_endpoint, set_tire_app_url, show } => {
            let mut config = config;

            if let Some(url) = set_endpoint {
                config.set_endpoint(url)?;
                println!("✔ エンドポイントを設定しました");
            }

            if let Some(url) = set_tire_app_url {
                config.set_tire_app_url(url)?;
                println!("✔ 点検アプリURLを設定しました");
            }

            if show {
                println!("設定:");
                println!("  エンドポイント: {}", config.endpoint_url);
                println!("  点検アプリ: {}", config.tire_app_url);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  リトライ: {}回 ({}ms刻み)", config.retries, config.backoff_step_ms);
                println!("  UTCオフセット: {}分", config.utc_offset_minutes);
                println!("  保存先: {}", config.store_path()?.display());
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "info,junkai_sync=debug,junkai_common=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn confirm(yes: bool, prompt: &str) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

fn open_store(config: &Config) -> Result<CityStore<FileStore>> {
    let path = config.store_path()?;
    Ok(CityStore::with_namespace(FileStore::open(path), config.namespace.clone()))
}

fn build_client(config: &Config) -> Result<SyncClient<ReqwestTransport, FileStore>> {
    if config.endpoint_url.trim().is_empty() {
        return Err(SyncError::Config("エンドポイントが設定されていません。`junkai config --set-endpoint URL` で設定してください".into()));
    }
    let settings = ClientSettings::from_config(config)?;
    Ok(SyncClient::new(ReqwestTransport::new(), open_store(config)?, settings))
}

fn finish_pull(outcome: &PullOutcome, store: &CityStore<FileStore>) {
    if outcome.is_success() {
        println!();
        print_summary(store);
    } else {
        std::process::exit(1);
    }
}

fn print_counts(name: &str, counts: &Counts) {
    println!(
        "  {:<6} 完了 {:>4}  停止 {:>4}  不要 {:>4}  残り {:>4}  / 総数 {:>4}",
        name,
        counts.done,
        counts.stop,
        counts.skip,
        counts.remaining(),
        counts.total
    );
}

fn print_summary(store: &CityStore<FileStore>) {
    let summary = Summary::from_store(store);
    println!("📊 集計");
    for (city, counts) in &summary.cities {
        print_counts(city.short_label(), counts);
    }
    print_counts("全体", &summary.overall);
    println!("  {}", summary.hint());
}

fn print_row(row: &RowView, offset: FixedOffset) {
    let record = &row.record;
    let date = date_label(&record.last_inspected_at, offset)
        .map(|d| format!("{} {}", d.year, d.month_day))
        .unwrap_or_else(|| " ".repeat(10));
    println!(
        "{:<5} [{}] {:<9} {:<4} {} {} / {} / {}",
        record.ui_index,
        if record.checked { "x" } else { " " },
        row.tone.css_class(),
        record.status.label(),
        date,
        record.station,
        record.model,
        record.number
    );
}
