use bbox_viewer::{browse, cli, error, logging, report};
use bbox_viewer_common::{
    current_row, fetch_image, parse_boxes_lenient, Config, RecordTable, S3ObjectStore, S3Settings,
    Session,
};
use clap::Parser;
use cli::{Cli, Commands};
use error::{Result, ViewerError};
use indicatif::ProgressBar;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("❌ {}", err);
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::List { csv, json } => {
            let table = RecordTable::load(&csv)?;

            if json {
                let records = (0..table.len())
                    .map(|i| table.record(i))
                    .collect::<bbox_viewer_common::Result<Vec<_>>>()?;
                println!("{}", serde_json::to_string_pretty(&records)?);
                return Ok(());
            }

            println!("📄 {} ({}件)\n", csv.display(), table.len());
            for index in 0..table.len() {
                let record = table.record(index)?;
                let parsed = parse_boxes_lenient(&record.coordinates);
                println!("{}", report::present_record_line(index, &record, &parsed));
                if let Some(warning) = &parsed.warning {
                    println!("  ⚠ {}", warning);
                }
            }
        }

        Commands::Show { csv, index, store, output } => {
            let table = load_non_empty(&csv)?;
            if index >= table.len() {
                return Err(bbox_viewer_common::Error::RowOutOfRange {
                    index,
                    len: table.len(),
                }
                .into());
            }

            let mut session = Session::new();
            while session.index() < index && session.next(table.len()) {}

            let row = current_row(&table, &session)?;
            for line in report::present_row_header(&row) {
                println!("{}", line);
            }

            let (bucket, region) = store.resolve(&config);
            let object_store = open_store(&config, &region)?;

            let spinner = ProgressBar::new_spinner();
            spinner.set_message(format!("s3://{}/{} を取得中...", bucket, row.record.s3_path));
            spinner.enable_steady_tick(Duration::from_millis(100));
            let fetched = fetch_image(&object_store, &bucket, &row.record.s3_path);
            spinner.finish_and_clear();

            let image = fetched?;
            for line in report::present_image(&row, &image) {
                println!("{}", line);
            }

            if let Some(path) = output {
                image
                    .save(&path)
                    .map_err(|e| ViewerError::ImageSave(format!("{}: {}", path.display(), e)))?;
                println!("✔ 画像を保存: {}", path.display());
            }
        }

        Commands::Browse { csv, store } => {
            let table = load_non_empty(&csv)?;
            let (bucket, region) = store.resolve(&config);
            let object_store = open_store(&config, &region)?;

            println!("🔍 {} ({}件) s3://{}\n", csv.display(), table.len(), bucket);
            browse::run_browse(&table, &object_store, &bucket)?;
        }

        Commands::Config {
            bucket,
            region,
            endpoint_url,
            set_access_key_id,
            set_secret_access_key,
            show,
        } => {
            let mut config = config;
            let mut changed = false;

            if let Some(bucket) = bucket {
                config.bucket = bucket;
                changed = true;
            }
            if let Some(region) = region {
                config.region = region;
                changed = true;
            }
            if let Some(endpoint) = endpoint_url {
                config.endpoint_url = Some(endpoint).filter(|e| !e.is_empty());
                changed = true;
            }
            if let Some(key) = set_access_key_id {
                config.access_key_id = Some(key);
                changed = true;
            }
            if let Some(secret) = set_secret_access_key {
                config.secret_access_key = Some(secret);
                changed = true;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("設定:");
                println!("  バケット: {}", config.bucket);
                println!("  リージョン: {}", config.region);
                println!(
                    "  エンドポイント: {}",
                    config.endpoint_url.as_deref().unwrap_or("(AWS)")
                );
                println!(
                    "  認証情報: {}",
                    if config.has_credentials() { "設定済み" } else { "未設定" }
                );
            }
        }
    }

    Ok(())
}

fn load_non_empty(csv: &Path) -> Result<RecordTable> {
    let table = RecordTable::load(csv)?;
    if table.is_empty() {
        return Err(ViewerError::EmptyTable(csv.display().to_string()));
    }
    Ok(table)
}

fn open_store(config: &Config, region: &str) -> Result<S3ObjectStore> {
    let settings = S3Settings::from_config(config, region)?;
    Ok(S3ObjectStore::new(&settings)?)
}
