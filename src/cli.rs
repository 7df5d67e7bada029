use bbox_viewer_common::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bbox-viewer")]
#[command(about = "CSVの検出結果レコードとS3上の画像を1件ずつ確認するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// バケット・リージョンの一時的な上書き
#[derive(clap::Args, Clone, Debug, Default)]
pub struct StoreArgs {
    /// S3バケット（省略時は設定ファイルの値）
    #[arg(short, long)]
    pub bucket: Option<String>,

    /// AWSリージョン（省略時は設定ファイルの値）
    #[arg(short, long)]
    pub region: Option<String>,
}

impl StoreArgs {
    /// (bucket, region) を決定する。引数 > 設定ファイル
    pub fn resolve(&self, config: &Config) -> (String, String) {
        (
            self.bucket.clone().unwrap_or_else(|| config.bucket.clone()),
            self.region.clone().unwrap_or_else(|| config.region.clone()),
        )
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// CSVのレコード一覧を表示
    List {
        /// 入力CSVファイル
        #[arg(required = true)]
        csv: PathBuf,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 指定行の画像を取得して表示
    Show {
        /// 入力CSVファイル
        #[arg(required = true)]
        csv: PathBuf,

        /// 行番号（0始まり）
        #[arg(short, long, default_value = "0")]
        index: usize,

        #[command(flatten)]
        store: StoreArgs,

        /// デコードした画像の保存先
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 前へ/次へで対話的にレコードを確認
    Browse {
        /// 入力CSVファイル
        #[arg(required = true)]
        csv: PathBuf,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// 設定を表示/編集
    Config {
        /// 既定のS3バケットを設定
        #[arg(long)]
        bucket: Option<String>,

        /// 既定のAWSリージョンを設定
        #[arg(long)]
        region: Option<String>,

        /// S3互換エンドポイントを設定（空文字で解除）
        #[arg(long)]
        endpoint_url: Option<String>,

        /// アクセスキーIDを設定
        #[arg(long)]
        set_access_key_id: Option<String>,

        /// シークレットアクセスキーを設定
        #[arg(long)]
        set_secret_access_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_show_with_overrides() {
        let cli = Cli::parse_from([
            "bbox-viewer",
            "show",
            "records.csv",
            "--index",
            "3",
            "--bucket",
            "other",
            "-r",
            "us-east-1",
        ]);
        match cli.command {
            Commands::Show { csv, index, store, output } => {
                assert_eq!(csv, PathBuf::from("records.csv"));
                assert_eq!(index, 3);
                assert_eq!(store.bucket.as_deref(), Some("other"));
                assert_eq!(store.region.as_deref(), Some("us-east-1"));
                assert!(output.is_none());
            }
            _ => panic!("expected show"),
        }
    }

    #[test]
    fn test_show_index_defaults_to_zero() {
        let cli = Cli::parse_from(["bbox-viewer", "show", "records.csv"]);
        assert!(matches!(cli.command, Commands::Show { index: 0, .. }));
    }

    #[test]
    fn test_global_verbose() {
        let cli = Cli::parse_from(["bbox-viewer", "list", "records.csv", "-v"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_list_json_flag() {
        let cli = Cli::parse_from(["bbox-viewer", "list", "records.csv", "--json"]);
        assert!(matches!(cli.command, Commands::List { json: true, .. }));

        let cli = Cli::parse_from(["bbox-viewer", "list", "records.csv"]);
        assert!(matches!(cli.command, Commands::List { json: false, .. }));
    }

    #[test]
    fn test_list_requires_csv() {
        assert!(Cli::try_parse_from(["bbox-viewer", "list"]).is_err());
    }

    #[test]
    fn test_store_args_resolve() {
        let config = Config::default();
        let args = StoreArgs {
            bucket: Some("override".into()),
            region: None,
        };
        assert_eq!(
            args.resolve(&config),
            ("override".to_string(), "eu-central-1".to_string())
        );
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
