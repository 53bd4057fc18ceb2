use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "junkai")]
#[command(about = "巡回チェックリスト同期クライアント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 確認をすべて「はい」で進める
    #[arg(short, long, global = true)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 初期同期（ローカルをリセットして全体管理から取り込む）
    Init,

    /// 同期（ローカルの変更を送信してから点検ログを取り込む）
    Sync,

    /// 指定シートを取り込む
    Pull {
        /// シート名
        #[arg(short, long, default_value = "InspectionLog")]
        sheet: String,

        /// ステータス表示のラベル
        #[arg(short, long, default_value = "同期")]
        label: String,
    },

    /// ローカルの変更を送信のみ
    Push,

    /// 件数の集計を表示
    Summary,

    /// 市の一覧を表示
    List {
        /// 市（大和市/大和/Y など）
        #[arg(required = true)]
        city: String,
    },

    /// 点検済みチェックを付ける/外す
    Check {
        /// 市（大和市/大和/Y など）
        #[arg(required = true)]
        city: String,

        /// UIインデックス（例: Y3）またはナンバー
        #[arg(required = true)]
        key: String,

        /// チェックを外す
        #[arg(long)]
        off: bool,
    },

    /// 状態を変更（normal/stop/skip）
    Status {
        /// 市（大和市/大和/Y など）
        #[arg(required = true)]
        city: String,

        /// UIインデックス（例: Y3）またはナンバー
        #[arg(required = true)]
        key: String,

        /// 状態（normal/stop/skip または 通常/停止/不要）
        #[arg(required = true)]
        state: String,
    },

    /// 最終点検日を変更
    Date {
        /// 市（大和市/大和/Y など）
        #[arg(required = true)]
        city: String,

        /// UIインデックス（例: Y3）またはナンバー
        #[arg(required = true)]
        key: String,

        /// 日付（YYYY-MM-DD）
        #[arg(required = true)]
        date: String,
    },

    /// 点検アプリのURLを表示
    Inspect {
        /// 市（大和市/大和/Y など）
        #[arg(required = true)]
        city: String,

        /// UIインデックス（例: Y3）またはナンバー
        #[arg(required = true)]
        key: String,
    },

    /// ローカル保存をすべて削除
    Reset,

    /// 設定を表示/編集
    Config {
        /// エンドポイントURLを設定
        #[arg(long)]
        set_endpoint: Option<String>,

        /// 点検アプリURLを設定
        #[arg(long)]
        set_tire_app_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
