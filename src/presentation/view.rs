/// プレゼンテーション層: 端末上のアップロード画面
///
/// `UploadView` の実装。フォーム内容はコマンド引数から事前に組み立てて保持する。
/// 出力先は人間向けなら stderr、`--machine` なら JSON行で stdout。
use crate::domain::ports::{LectureForm, UploadView};
use crate::domain::progress::UploadProgress;
use crate::presentation::progress::DisplayProgress;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use url::Url;

pub struct ConsoleView {
    form: LectureForm,
    base_url: String,
    show_progress: bool,
    machine_output: bool,
    inputs_enabled: AtomicBool,
    redirect_target: Mutex<Option<String>>,
}

impl ConsoleView {
    /// # Arguments
    /// * `form` - 講義作成時に送るフォーム内容
    /// * `base_url` - 相対リダイレクト先を解決するためのサーバーURL
    /// * `show_progress` - 進捗を表示するか（`--progress`）
    /// * `machine_output` - JSON行で出力するか（`--machine`）
    pub fn new(
        form: LectureForm,
        base_url: impl Into<String>,
        show_progress: bool,
        machine_output: bool,
    ) -> Self {
        Self {
            form,
            base_url: base_url.into(),
            show_progress,
            machine_output,
            inputs_enabled: AtomicBool::new(true),
            redirect_target: Mutex::new(None),
        }
    }

    pub fn inputs_enabled(&self) -> bool {
        self.inputs_enabled.load(Ordering::SeqCst)
    }

    /// 遷移先の絶対URL（遷移済みの場合のみ）
    pub fn redirect_target(&self) -> Option<String> {
        self.redirect_target
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 相対URLをサーバーURL基準の絶対URLにする
    fn absolute_url(&self, redirect_url: &str) -> String {
        Url::parse(&self.base_url)
            .and_then(|base| base.join(redirect_url))
            .map(String::from)
            .unwrap_or_else(|_| redirect_url.to_string())
    }
}

impl UploadView for ConsoleView {
    fn report(&self, progress: &UploadProgress) {
        if !self.show_progress {
            return;
        }

        if self.machine_output {
            // 1イベント1行のJSON
            match serde_json::to_string(progress) {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::warn!(error = %e, "failed to serialize progress event"),
            }
        } else if let Some(display) = Option::<DisplayProgress>::from(progress) {
            eprintln!("{}", display.render());
        }
    }

    fn show_error(&self, message: &str) {
        // 最終的なエラーは main が出力する。ここでは進捗表示中の人間向け出力のみ
        if self.show_progress && !self.machine_output {
            eprintln!("✗ {}", message);
        }
    }

    fn set_inputs_enabled(&self, enabled: bool) {
        self.inputs_enabled.store(enabled, Ordering::SeqCst);
    }

    fn lecture_form(&self) -> LectureForm {
        self.form.clone()
    }

    fn navigate(&self, redirect_url: &str) {
        let target = self.absolute_url(redirect_url);
        if self.show_progress && !self.machine_output {
            eprintln!("Redirecting to {}", target);
        }
        tracing::debug!(%target, "navigation requested");
        *self
            .redirect_target
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(target);
    }
}
