use clap::{Parser, Subcommand};
use memory_book_common::SliceBoundary;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "memory-book")]
#[command(about = "同期会サイトのメモリーブック（PDF）生成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// データ取得からPDF出力まで一括実行
    Generate {
        /// 集約済みJSON（省略時はAPIから取得）
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// 静的コンテンツJSON（卒業行事・歴史グループ）
        #[arg(short, long)]
        extras: Option<PathBuf>,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// ファイル名の接頭辞
        #[arg(short, long)]
        name: Option<String>,

        /// ページ分割の境界判定 (strict/inclusive)
        #[arg(long)]
        boundary: Option<SliceBoundary>,
    },

    /// APIからデータを取得してJSONに保存
    Fetch {
        /// 出力JSONファイル
        #[arg(short, long, default_value = "memory-book.json")]
        output: PathBuf,

        /// 静的コンテンツJSON
        #[arg(short, long)]
        extras: Option<PathBuf>,
    },

    /// 組版HTMLだけを出力（描画しない）
    Compose {
        /// 集約済みJSON（省略時はAPIから取得）
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// 静的コンテンツJSON
        #[arg(short, long)]
        extras: Option<PathBuf>,

        /// 出力HTMLファイル
        #[arg(short, long, default_value = "memory-book.html")]
        output: PathBuf,
    },

    /// 既存HTMLをPDF化
    ExportHtml {
        /// 入力HTMLファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 対象要素のid（省略時は文書全体）
        #[arg(short = 'e', long)]
        element: Option<String>,

        /// 出力PDFファイル
        #[arg(short, long, default_value = "memory-book.pdf")]
        output: PathBuf,
    },

    /// 設定の表示・変更
    Config {
        /// APIベースURLを設定
        #[arg(long)]
        set_api_base: Option<String>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}
