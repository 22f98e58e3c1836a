/// ドメインサービス: アップロードセッションコントローラ
///
/// ファイル選択から講義作成までの1回のアップロードを制御する。
///
/// # 処理の流れ
/// 1. `select_file` でファイルを検証し、Validated のセッションを作る
/// 2. `submit` でチャンクを先頭から1つずつ送信する（同時に送るのは常に1つ）
/// 3. サーバーが complete を返した時点でループを抜け、講義作成を1回だけ呼ぶ
/// 4. 成功メッセージを表示し、一定時間後にリダイレクト先へ遷移する
///
/// 失敗はすべてセッションを Failed にし、入力を再度有効にする。
/// 自動リトライは行わない。
use crate::domain::error::{DomainError, UploadError};
use crate::domain::formatter::{format_file_size, progress_text};
use crate::domain::ports::{
    ChunkAck, ChunkUpload, FinalizeRequest, LectureBackend, LectureCreated, UploadView,
};
use crate::domain::progress::{UploadPhase, UploadProgress};
use crate::domain::session::{SelectedFile, UploadSession, UploadStatus, UploaderConfig};
use crate::domain::validator;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// `select_file` の結果として画面に返す情報
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub upload_id: String,
    pub file_name: String,
    pub size_bytes: u64,
    pub display_size: String,
    pub mime_type: String,
    pub chunk_size: u64,
    pub total_chunks: u64,
}

/// `submit` が何もしなかった理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    /// 検証済みのファイルが無い
    NoSelection,
    /// 別の送信が進行中
    AlreadyUploading,
    /// このセッションは既に成功している
    AlreadyCompleted,
}

/// `submit` の結果
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Succeeded(LectureCreated),
    Ignored(IgnoredReason),
}

#[derive(Default)]
struct ControllerState {
    session: Option<UploadSession>,
    uploading: bool,
}

/// アップロードセッションコントローラ
///
/// アップロード画面1つにつき1インスタンス。`submit` は `&self` で呼べるが、
/// 送信中に呼ばれた2回目以降は無視される（キューには積まない）。
pub struct UploadController<B, V> {
    backend: B,
    view: V,
    config: UploaderConfig,
    state: Mutex<ControllerState>,
}

impl<B: LectureBackend, V: UploadView> UploadController<B, V> {
    pub fn new(backend: B, view: V, config: UploaderConfig) -> Self {
        Self {
            backend,
            view,
            config,
            state: Mutex::new(ControllerState::default()),
        }
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// 現在のセッション状態。セッションが無ければ Idle
    pub fn status(&self) -> UploadStatus {
        self.lock_state()
            .session
            .as_ref()
            .map(UploadSession::status)
            .unwrap_or(UploadStatus::Idle)
    }

    /// 現在のセッションのスナップショット
    #[cfg(test)]
    pub fn session(&self) -> Option<UploadSession> {
        self.lock_state().session.clone()
    }

    /// ファイル選択ハンドラ
    ///
    /// 検証に成功すると新しいセッション（新しい upload_id）に置き換え、
    /// ファイル情報を画面に表示する。検証に失敗した場合はエラーを表示し、
    /// 既存のセッションはそのまま残す。送信中は何もせず `Ok(None)` を返す。
    pub fn select_file(&self, file: SelectedFile) -> Result<Option<SessionSummary>, DomainError> {
        if self.lock_state().uploading {
            tracing::warn!(file = %file.name, "file selection ignored while an upload is running");
            return Ok(None);
        }

        let session = match validator::validate_selection(file, &self.config) {
            Ok(session) => session,
            Err(e) => {
                tracing::info!(error = %e, "file selection rejected");
                self.view.show_error(&e.user_message());
                return Err(e);
            }
        };

        let file = session.file();
        let summary = SessionSummary {
            upload_id: session.upload_id().to_string(),
            file_name: file.name.clone(),
            size_bytes: file.size,
            display_size: format_file_size(file.size),
            mime_type: file.mime_type.clone(),
            chunk_size: session.chunk_size(),
            total_chunks: session.total_chunks(),
        };

        if !self.store_selection(session) {
            tracing::warn!(file = %summary.file_name, "file selection ignored while an upload is running");
            return Ok(None);
        }

        tracing::info!(
            upload_id = %summary.upload_id,
            file = %summary.file_name,
            size = summary.size_bytes,
            total_chunks = summary.total_chunks,
            "file selected"
        );

        self.view.report(&UploadProgress::new(UploadPhase::FileSelected {
            file_name: summary.file_name.clone(),
            size_bytes: summary.size_bytes,
            display_size: summary.display_size.clone(),
            mime_type: summary.mime_type.clone(),
        }));

        Ok(Some(summary))
    }

    /// 検証済みセッションを保存する。送信中なら保存せず false
    ///
    /// 送信中かどうかの確認と保存は同じロックの中で行う。
    fn store_selection(&self, session: UploadSession) -> bool {
        let mut state = self.lock_state();
        if state.uploading {
            return false;
        }
        state.session = Some(session);
        true
    }

    /// 送信ハンドラ
    ///
    /// 前回のセッションが Failed の場合は、同じファイルで新しいセッションを作ってやり直す。
    ///
    /// # エラー
    /// チャンク送信・講義作成の失敗。どちらもセッションは Failed になり、入力は再度有効になる。
    pub async fn submit(&self) -> Result<SubmitOutcome, UploadError> {
        let mut session = match self.claim_session() {
            Ok(session) => session,
            Err(reason) => {
                if reason == IgnoredReason::NoSelection {
                    self.view.show_error("Please select a video file");
                }
                tracing::debug!(?reason, "submit ignored");
                return Ok(SubmitOutcome::Ignored(reason));
            }
        };

        session.transition(UploadStatus::Uploading);
        self.publish(&session);
        self.view.set_inputs_enabled(false);

        tracing::info!(
            upload_id = %session.upload_id(),
            total_chunks = session.total_chunks(),
            "upload started"
        );
        self.view.report(&UploadProgress::new(UploadPhase::UploadStarted {
            upload_id: session.upload_id().to_string(),
            file_name: session.file().name.clone(),
            total_chunks: session.total_chunks(),
        }));

        match self.run(&mut session).await {
            Ok(created) => {
                session.transition(UploadStatus::Succeeded);
                self.publish(&session);
                tracing::info!(
                    upload_id = %session.upload_id(),
                    redirect_url = %created.redirect_url,
                    "lecture created"
                );

                self.view.report(&UploadProgress::new(UploadPhase::Completed {
                    message: created.message.clone(),
                    redirect_url: created.redirect_url.clone(),
                }));

                // 入力は無効のまま。メッセージを見せてから遷移する
                tokio::time::sleep(self.config.redirect_delay).await;
                self.view.navigate(&created.redirect_url);

                self.lock_state().uploading = false;
                Ok(SubmitOutcome::Succeeded(created))
            }
            Err(e) => {
                session.transition(UploadStatus::Failed);
                {
                    let mut state = self.lock_state();
                    state.session = Some(session.clone());
                    state.uploading = false;
                }
                tracing::warn!(
                    upload_id = %session.upload_id(),
                    chunks_sent = session.current_chunk_index(),
                    error = %e,
                    "upload failed"
                );

                self.view.show_error(&e.user_message());
                self.view.set_inputs_enabled(true);
                Err(e)
            }
        }
    }

    /// 送信可能なセッションを取り出し、送信中フラグを立てる
    fn claim_session(&self) -> Result<UploadSession, IgnoredReason> {
        let mut state = self.lock_state();
        if state.uploading {
            return Err(IgnoredReason::AlreadyUploading);
        }

        let session = match state.session.as_ref() {
            None => return Err(IgnoredReason::NoSelection),
            Some(s) => match s.status() {
                UploadStatus::Validated => s.clone(),
                UploadStatus::Failed => {
                    let fresh = s.restart();
                    tracing::info!(
                        previous = %s.upload_id(),
                        upload_id = %fresh.upload_id(),
                        "restarting failed upload with a new session"
                    );
                    fresh
                }
                UploadStatus::Succeeded => return Err(IgnoredReason::AlreadyCompleted),
                UploadStatus::Idle => return Err(IgnoredReason::NoSelection),
                UploadStatus::Uploading | UploadStatus::Finalizing => {
                    return Err(IgnoredReason::AlreadyUploading);
                }
            },
        };

        state.uploading = true;
        Ok(session)
    }

    async fn run(&self, session: &mut UploadSession) -> Result<LectureCreated, UploadError> {
        let video_filename = self.transmit_chunks(session).await?;
        self.finalize(session, video_filename).await
    }

    /// チャンクを順番に1つずつ送る。サーバーが complete を返したらそのファイル名を返す
    async fn transmit_chunks(&self, session: &mut UploadSession) -> Result<String, UploadError> {
        let total_chunks = session.total_chunks();

        while let Some((chunk_number, range)) = session.take_next_chunk() {
            let data = session
                .file()
                .source
                .slice(range)
                .await
                .map_err(|source| UploadError::SourceRead {
                    chunk_number,
                    source,
                })?;

            tracing::debug!(
                upload_id = %session.upload_id(),
                chunk_number,
                total_chunks,
                bytes = data.len(),
                "sending chunk"
            );

            let chunk = ChunkUpload {
                upload_id: session.upload_id().to_string(),
                chunk_number,
                total_chunks,
                filename: session.file().name.clone(),
                data,
                csrf_token: self.config.csrf_token(),
            };

            let ack = self.backend.upload_chunk(chunk).await.map_err(|failure| {
                UploadError::ChunkTransport {
                    chunk_number,
                    message: failure.message,
                    status_code: failure.status_code,
                }
            })?;

            match ack {
                ChunkAck::Complete { filename } => {
                    // チャンク数ではなくサーバーの完了通知を信じる
                    tracing::info!(
                        upload_id = %session.upload_id(),
                        chunk_number,
                        total_chunks,
                        filename = %filename,
                        "assembly complete"
                    );
                    return Ok(filename);
                }
                ChunkAck::Progress {
                    percentage,
                    message,
                } => {
                    self.view.report(&UploadProgress::new(UploadPhase::ChunkAccepted {
                        chunk_number,
                        total_chunks,
                        percentage,
                        text: progress_text(percentage, message.as_deref()),
                    }));
                }
            }
        }

        Err(UploadError::AssemblyIncomplete {
            chunks_sent: session.current_chunk_index(),
        })
    }

    /// 講義作成を1回だけ呼ぶ。フォームはこの時点の内容を使う
    async fn finalize(
        &self,
        session: &mut UploadSession,
        video_filename: String,
    ) -> Result<LectureCreated, UploadError> {
        session.transition(UploadStatus::Finalizing);
        self.publish(session);
        self.view.report(&UploadProgress::new(UploadPhase::Finalizing {
            video_filename: video_filename.clone(),
        }));

        let request = FinalizeRequest {
            form: self.view.lecture_form(),
            video_filename,
            csrf_token: self.config.csrf_token(),
        };

        self.backend
            .create_lecture(request)
            .await
            .map_err(|failure| UploadError::Finalize {
                message: failure.message,
                status_code: failure.status_code,
            })
    }

    fn publish(&self, session: &UploadSession) {
        self.lock_state().session = Some(session.clone());
    }

    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{LectureForm, TransportFailure};
    use crate::domain::source::FileSource;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::Instant;

    const CHUNK: u64 = 4;

    #[derive(Debug, Clone)]
    struct SentChunk {
        upload_id: String,
        chunk_number: u64,
        total_chunks: u64,
        filename: String,
        data: Vec<u8>,
        csrf_token: String,
    }

    /// 台本どおりに応答するバックエンド
    struct ScriptedBackend {
        complete_on: Option<u64>,
        fail_on: Option<(u64, u16, String)>,
        finalize: Result<LectureCreated, TransportFailure>,
        chunks: Mutex<Vec<SentChunk>>,
        finalizes: Mutex<Vec<FinalizeRequest>>,
    }

    impl ScriptedBackend {
        fn completing_on(chunk_number: u64) -> Self {
            Self {
                complete_on: Some(chunk_number),
                fail_on: None,
                finalize: Ok(LectureCreated {
                    message: "Lecture created successfully".to_string(),
                    redirect_url: "/instructor/courses/7".to_string(),
                }),
                chunks: Mutex::new(Vec::new()),
                finalizes: Mutex::new(Vec::new()),
            }
        }

        fn never_completing() -> Self {
            Self {
                complete_on: None,
                ..Self::completing_on(0)
            }
        }

        fn failing_on(mut self, chunk_number: u64, status: u16, body: &str) -> Self {
            self.fail_on = Some((chunk_number, status, body.to_string()));
            self
        }

        fn with_finalize_error(mut self, message: &str, status: u16) -> Self {
            self.finalize = Err(TransportFailure::new(message, Some(status)));
            self
        }

        fn chunks(&self) -> Vec<SentChunk> {
            self.chunks.lock().unwrap().clone()
        }

        fn finalizes(&self) -> Vec<FinalizeRequest> {
            self.finalizes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LectureBackend for ScriptedBackend {
        async fn upload_chunk(&self, chunk: ChunkUpload) -> Result<ChunkAck, TransportFailure> {
            // 呼び出し側に制御を返し、並行する submit が割り込めるようにする
            tokio::task::yield_now().await;

            let number = chunk.chunk_number;
            let total = chunk.total_chunks;
            let filename = chunk.filename.clone();
            self.chunks.lock().unwrap().push(SentChunk {
                upload_id: chunk.upload_id,
                chunk_number: chunk.chunk_number,
                total_chunks: chunk.total_chunks,
                filename: chunk.filename,
                data: chunk.data,
                csrf_token: chunk.csrf_token,
            });

            if let Some((fail_on, status, body)) = &self.fail_on {
                if *fail_on == number {
                    return Err(TransportFailure::new(body.clone(), Some(*status)));
                }
            }

            if self.complete_on == Some(number) {
                Ok(ChunkAck::Complete {
                    filename: format!("assembled_{}", filename),
                })
            } else {
                Ok(ChunkAck::Progress {
                    percentage: (number + 1) as f64 * 100.0 / total as f64,
                    message: None,
                })
            }
        }

        async fn create_lecture(
            &self,
            request: FinalizeRequest,
        ) -> Result<LectureCreated, TransportFailure> {
            tokio::task::yield_now().await;
            self.finalizes.lock().unwrap().push(request);
            self.finalize.clone()
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum ViewEvent {
        Report(UploadPhase),
        Error(String),
        InputsEnabled(bool),
        FormRead,
        Navigate(String),
    }

    #[derive(Default)]
    struct RecordingView {
        events: Mutex<Vec<(ViewEvent, Instant)>>,
    }

    impl RecordingView {
        fn record(&self, event: ViewEvent) {
            self.events.lock().unwrap().push((event, Instant::now()));
        }

        fn events(&self) -> Vec<ViewEvent> {
            self.events.lock().unwrap().iter().map(|(e, _)| e.clone()).collect()
        }

        fn timed_events(&self) -> Vec<(ViewEvent, Instant)> {
            self.events.lock().unwrap().clone()
        }

        fn navigations(&self) -> Vec<String> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    ViewEvent::Navigate(url) => Some(url),
                    _ => None,
                })
                .collect()
        }

        fn errors(&self) -> Vec<String> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    ViewEvent::Error(message) => Some(message),
                    _ => None,
                })
                .collect()
        }

        fn last_inputs_enabled(&self) -> Option<bool> {
            self.events().into_iter().rev().find_map(|e| match e {
                ViewEvent::InputsEnabled(enabled) => Some(enabled),
                _ => None,
            })
        }
    }

    impl UploadView for RecordingView {
        fn report(&self, progress: &UploadProgress) {
            self.record(ViewEvent::Report(progress.phase.clone()));
        }

        fn show_error(&self, message: &str) {
            self.record(ViewEvent::Error(message.to_string()));
        }

        fn set_inputs_enabled(&self, enabled: bool) {
            self.record(ViewEvent::InputsEnabled(enabled));
        }

        fn lecture_form(&self) -> LectureForm {
            self.record(ViewEvent::FormRead);
            LectureForm {
                title: "Week 1".to_string(),
                description: "Introduction".to_string(),
                course_id: "7".to_string(),
                is_published: true,
                thumbnail: None,
            }
        }

        fn navigate(&self, redirect_url: &str) {
            self.record(ViewEvent::Navigate(redirect_url.to_string()));
        }
    }

    fn config() -> UploaderConfig {
        UploaderConfig {
            token_provider: Arc::new(|| "csrf-token".to_string()),
            chunk_size: CHUNK,
            max_file_size: 500 * 1024 * 1024,
            allowed_types: ["video/mp4", "video/webm"].into_iter().map(String::from).collect(),
            redirect_delay: Duration::from_millis(2000),
        }
    }

    fn video(size: usize) -> (SelectedFile, Vec<u8>) {
        let bytes: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
        let file = SelectedFile {
            name: "week1.mp4".to_string(),
            mime_type: "video/mp4".to_string(),
            size: size as u64,
            source: FileSource::memory(bytes.clone()),
        };
        (file, bytes)
    }

    fn controller(backend: ScriptedBackend) -> UploadController<ScriptedBackend, RecordingView> {
        UploadController::new(backend, RecordingView::default(), config())
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_upload_sends_every_chunk_in_order() {
        // 18 bytes / 4 = 5 chunks, complete on the last one
        let controller = controller(ScriptedBackend::completing_on(4));
        let (file, bytes) = video(18);
        let summary = controller.select_file(file).unwrap().unwrap();
        assert_eq!(summary.total_chunks, 5);
        assert_eq!(controller.status(), UploadStatus::Validated);

        let outcome = controller.submit().await.unwrap();

        assert!(matches!(outcome, SubmitOutcome::Succeeded(_)));
        assert_eq!(controller.status(), UploadStatus::Succeeded);

        let chunks = controller.backend().chunks();
        let numbers: Vec<u64> = chunks.iter().map(|c| c.chunk_number).collect();
        assert_eq!(numbers, vec![0, 1, 2, 3, 4]);
        assert!(chunks.iter().all(|c| c.upload_id == summary.upload_id));
        assert!(chunks.iter().all(|c| c.total_chunks == 5));
        assert!(chunks.iter().all(|c| c.filename == "week1.mp4"));
        assert!(chunks.iter().all(|c| c.csrf_token == "csrf-token"));

        // チャンクを連結すると元のファイルになる
        let reassembled: Vec<u8> = chunks.iter().flat_map(|c| c.data.clone()).collect();
        assert_eq!(reassembled, bytes);
        assert_eq!(chunks.last().unwrap().data.len(), 2);

        let finalizes = controller.backend().finalizes();
        assert_eq!(finalizes.len(), 1);
        assert_eq!(finalizes[0].video_filename, "assembled_week1.mp4");
        assert_eq!(finalizes[0].form.course_id, "7");
        assert_eq!(finalizes[0].csrf_token, "csrf-token");
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigation_happens_once_two_seconds_after_success_message() {
        let controller = controller(ScriptedBackend::completing_on(2));
        controller.select_file(video(12).0).unwrap();

        controller.submit().await.unwrap();

        let events = controller.view().timed_events();
        let shown_at = events
            .iter()
            .find_map(|(e, at)| match e {
                ViewEvent::Report(UploadPhase::Completed { .. }) => Some(*at),
                _ => None,
            })
            .expect("success message should be shown");
        let navigated: Vec<_> = events
            .iter()
            .filter_map(|(e, at)| match e {
                ViewEvent::Navigate(url) => Some((url.clone(), *at)),
                _ => None,
            })
            .collect();

        assert_eq!(navigated.len(), 1);
        assert_eq!(navigated[0].0, "/instructor/courses/7");
        assert_eq!(navigated[0].1 - shown_at, Duration::from_millis(2000));
        // 成功時は入力を無効のままにする
        assert_eq!(controller.view().last_inputs_enabled(), Some(false));
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_completion_stops_loop_early() {
        // 5 chunk file, server says complete on chunk 2
        let controller = controller(ScriptedBackend::completing_on(2));
        controller.select_file(video(20).0).unwrap();

        controller.submit().await.unwrap();

        let numbers: Vec<u64> = controller
            .backend()
            .chunks()
            .iter()
            .map(|c| c.chunk_number)
            .collect();
        assert_eq!(numbers, vec![0, 1, 2]);
        assert_eq!(controller.backend().finalizes().len(), 1);
        assert_eq!(controller.status(), UploadStatus::Succeeded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_chunk_failure_aborts_and_reenables_inputs() {
        let backend = ScriptedBackend::completing_on(4).failing_on(1, 500, "Internal Server Error");
        let controller = controller(backend);
        controller.select_file(video(20).0).unwrap();

        let err = controller.submit().await.unwrap_err();

        assert!(matches!(
            err,
            UploadError::ChunkTransport {
                chunk_number: 1,
                status_code: Some(500),
                ..
            }
        ));
        assert_eq!(controller.status(), UploadStatus::Failed);
        assert_eq!(controller.backend().chunks().len(), 2);
        assert!(controller.backend().finalizes().is_empty());
        assert_eq!(
            controller.view().errors(),
            vec!["Upload failed: Internal Server Error".to_string()]
        );
        assert_eq!(controller.view().last_inputs_enabled(), Some(true));
        assert!(controller.view().navigations().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_finalize_failure_does_not_resend_chunks() {
        let backend = ScriptedBackend::completing_on(1).with_finalize_error("Course not found", 404);
        let controller = controller(backend);
        controller.select_file(video(8).0).unwrap();

        let err = controller.submit().await.unwrap_err();

        assert!(matches!(err, UploadError::Finalize { .. }));
        assert_eq!(controller.status(), UploadStatus::Failed);
        assert_eq!(controller.backend().chunks().len(), 2);
        assert_eq!(controller.backend().finalizes().len(), 1);
        assert_eq!(
            controller.view().errors(),
            vec!["Upload failed: Course not found".to_string()]
        );
        assert_eq!(controller.view().last_inputs_enabled(), Some(true));
        assert!(controller.view().navigations().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_form_is_read_after_assembly_completes() {
        let controller = controller(ScriptedBackend::completing_on(2));
        controller.select_file(video(12).0).unwrap();

        controller.submit().await.unwrap();

        let events = controller.view().events();
        let form_read = events.iter().position(|e| *e == ViewEvent::FormRead).unwrap();
        let last_chunk = events
            .iter()
            .rposition(|e| matches!(e, ViewEvent::Report(UploadPhase::ChunkAccepted { .. })))
            .unwrap();
        assert!(form_read > last_chunk);
        assert_eq!(events.iter().filter(|e| **e == ViewEvent::FormRead).count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_reports_use_fallback_text() {
        let controller = controller(ScriptedBackend::completing_on(3));
        controller.select_file(video(16).0).unwrap();

        controller.submit().await.unwrap();

        let texts: Vec<String> = controller
            .view()
            .events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Report(UploadPhase::ChunkAccepted { text, .. }) => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["25% uploaded", "50% uploaded", "75% uploaded"]);
    }

    #[tokio::test]
    async fn test_invalid_type_never_reaches_network() {
        let controller = controller(ScriptedBackend::completing_on(0));
        let (mut file, _) = video(10);
        file.mime_type = "application/pdf".to_string();

        let err = controller.select_file(file).unwrap_err();

        assert!(matches!(err, DomainError::InvalidType { .. }));
        assert_eq!(controller.status(), UploadStatus::Idle);

        let outcome = controller.submit().await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Ignored(IgnoredReason::NoSelection));
        assert!(controller.backend().chunks().is_empty());
        assert_eq!(controller.view().errors().len(), 2);
    }

    #[tokio::test]
    async fn test_too_large_file_is_rejected() {
        let controller = controller(ScriptedBackend::completing_on(0));
        let file = SelectedFile {
            name: "huge.mp4".to_string(),
            mime_type: "video/mp4".to_string(),
            size: 500 * 1024 * 1024 + 1,
            source: FileSource::memory(Vec::new()),
        };

        let err = controller.select_file(file).unwrap_err();

        assert!(matches!(err, DomainError::TooLarge { .. }));
        assert_eq!(
            controller.view().errors(),
            vec!["File size must be less than 500MB".to_string()]
        );
        assert!(controller.backend().chunks().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_selection_keeps_previous_session() {
        let controller = controller(ScriptedBackend::completing_on(2));
        let first = controller.select_file(video(12).0).unwrap().unwrap();

        let (mut bad, _) = video(12);
        bad.mime_type = "image/png".to_string();
        assert!(controller.select_file(bad).is_err());

        assert_eq!(controller.session().unwrap().upload_id(), first.upload_id);
        assert_eq!(controller.status(), UploadStatus::Validated);
    }

    #[tokio::test(start_paused = true)]
    async fn test_selection_is_not_stored_once_upload_is_claimed() {
        let controller = controller(ScriptedBackend::completing_on(2));
        let first = controller.select_file(video(12).0).unwrap().unwrap();

        // 検証後、保存前に送信が始まった状態
        let claimed = controller.claim_session().unwrap();
        assert_eq!(claimed.upload_id(), first.upload_id);

        let (replacement, _) = video(8);
        let session = validator::validate_selection(replacement, &controller.config).unwrap();
        assert!(!controller.store_selection(session));
        assert_eq!(controller.session().unwrap().upload_id(), first.upload_id);

        assert_eq!(controller.select_file(video(8).0).unwrap(), None);
        assert_eq!(controller.session().unwrap().upload_id(), first.upload_id);
        assert!(controller.view().events().iter().all(|e| !matches!(
            e,
            ViewEvent::Report(UploadPhase::FileSelected { size_bytes: 8, .. })
        )));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_submit_is_ignored() {
        let controller = controller(ScriptedBackend::completing_on(2));
        controller.select_file(video(12).0).unwrap();

        let (first, second) = tokio::join!(controller.submit(), controller.submit());

        assert!(matches!(first.unwrap(), SubmitOutcome::Succeeded(_)));
        assert_eq!(
            second.unwrap(),
            SubmitOutcome::Ignored(IgnoredReason::AlreadyUploading)
        );
        assert_eq!(controller.backend().chunks().len(), 3);
        assert_eq!(controller.backend().finalizes().len(), 1);
        assert_eq!(controller.view().navigations().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_after_success_is_ignored() {
        let controller = controller(ScriptedBackend::completing_on(0));
        controller.select_file(video(4).0).unwrap();
        controller.submit().await.unwrap();

        let outcome = controller.submit().await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Ignored(IgnoredReason::AlreadyCompleted));
        assert_eq!(controller.backend().chunks().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubmit_after_failure_starts_fresh_session() {
        let backend = ScriptedBackend::completing_on(2).failing_on(1, 502, "Bad Gateway");
        let controller = controller(backend);
        controller.select_file(video(12).0).unwrap();
        let first_id = controller.session().unwrap().upload_id().to_string();

        assert!(controller.submit().await.is_err());
        // 2回目も同じ台本なので chunk 1 で再び失敗する
        assert!(controller.submit().await.is_err());

        let chunks = controller.backend().chunks();
        let numbers: Vec<u64> = chunks.iter().map(|c| c.chunk_number).collect();
        assert_eq!(numbers, vec![0, 1, 0, 1]);
        assert_eq!(chunks[0].upload_id, first_id);
        assert_eq!(chunks[1].upload_id, first_id);
        assert_ne!(chunks[2].upload_id, first_id);
        assert_eq!(chunks[2].upload_id, chunks[3].upload_id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_completion_fails_session() {
        let controller = controller(ScriptedBackend::never_completing());
        controller.select_file(video(12).0).unwrap();

        let err = controller.submit().await.unwrap_err();

        assert!(matches!(err, UploadError::AssemblyIncomplete { chunks_sent: 3 }));
        assert_eq!(controller.status(), UploadStatus::Failed);
        assert!(controller.backend().finalizes().is_empty());
        assert_eq!(controller.view().last_inputs_enabled(), Some(true));
    }

    #[tokio::test]
    async fn test_chunk_order_for_many_sizes() {
        for size in [1usize, 3, 4, 5, 17, 64] {
            let total = (size as u64).div_ceil(CHUNK);
            let mut cfg = config();
            cfg.redirect_delay = Duration::ZERO;
            let controller = UploadController::new(
                ScriptedBackend::completing_on(total - 1),
                RecordingView::default(),
                cfg,
            );
            controller.select_file(video(size).0).unwrap();
            controller.submit().await.unwrap();

            let numbers: Vec<u64> = controller
                .backend()
                .chunks()
                .iter()
                .map(|c| c.chunk_number)
                .collect();
            assert_eq!(numbers, (0..total).collect::<Vec<_>>(), "size {}", size);
        }
    }
}
