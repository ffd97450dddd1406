use std::cell::RefCell;

use rateme_client_core::catalog::most_recent_user_model;
use rateme_client_core::{
    ApiError, AppConfig, ConfigError, LinkPrediction, LoginOutcome, LoginRequest, ModelKey,
    ModelOption, PredictionApi, RegisterRequest, RemoteId, SessionContext, SessionStore,
    ViewerLinks, validate_link,
};

use crate::messages::{
    ApiAction, FILL_ALL_FIELDS, LOGIN_REJECTED, PREDICT_SUCCESS, REGISTER_SUCCESS, SELECT_MODEL,
    UNSUPPORTED_SOURCE, api_failure_message,
};
use crate::modal::{
    FIELD_KEY_LOGIN, FIELD_KEY_NAME, FIELD_KEY_PASSWORD, FormValues, Modal, ModalKind,
};
use crate::state::{Notice, ViewAction, ViewState, apply_action};

/// Side effects the controller cannot perform itself.
pub trait Shell {
    fn render(&self, state: &ViewState);
    fn notify(&self, notice: Notice);
    /// Opens `url` in a new tab without handing it a reference to this page.
    fn open_external(&self, url: &str);
    fn reload(&self);
}

/// Every user interaction the page can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    SelectModel { key: ModelKey },
    InputChanged { value: String },
    Submit,
    OpenRegister,
    OpenLogin,
    OpenHistory,
    SubmitModal { values: FormValues },
    OpenHistoryEntry { id: RemoteId },
    OpenUploadPage,
    CloseModal,
    Logout,
}

impl UiCommand {
    /// Stable name for logs; payloads may carry passwords.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SelectModel { .. } => "select_model",
            Self::InputChanged { .. } => "input_changed",
            Self::Submit => "submit",
            Self::OpenRegister => "open_register",
            Self::OpenLogin => "open_login",
            Self::OpenHistory => "open_history",
            Self::SubmitModal { .. } => "submit_modal",
            Self::OpenHistoryEntry { .. } => "open_history_entry",
            Self::OpenUploadPage => "open_upload_page",
            Self::CloseModal => "close_modal",
            Self::Logout => "logout",
        }
    }
}

pub struct ViewController<A, S, H> {
    api: A,
    session: SessionContext<S>,
    shell: H,
    viewer: ViewerLinks,
    guest_login: String,
    state: RefCell<ViewState>,
}

impl<A, S, H> ViewController<A, S, H>
where
    A: PredictionApi,
    S: SessionStore,
    H: Shell,
{
    pub fn new(config: &AppConfig, api: A, store: S, shell: H) -> Result<Self, ConfigError> {
        let viewer = ViewerLinks::from_config(config)?;
        let session = SessionContext::init(store);
        let state = ViewState::new(
            session.state(),
            config.default_model.as_ref(),
            config.upload_page_enabled,
        );
        Ok(Self {
            api,
            session,
            shell,
            viewer,
            guest_login: config.guest_login.clone(),
            state: RefCell::new(state),
        })
    }

    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn session(&self) -> &SessionContext<S> {
        &self.session
    }

    pub fn shell(&self) -> &H {
        &self.shell
    }

    /// First render, then the user-model check when a session survived a reload.
    pub async fn bootstrap(&self) {
        let snapshot = self.state();
        self.shell.render(&snapshot);
        if snapshot.session.is_authenticated() {
            self.check_user_models().await;
        }
    }

    pub async fn handle(&self, command: UiCommand) {
        tracing::debug!(command = command.name(), "ui command");
        match command {
            UiCommand::SelectModel { key } => self.select_model(key),
            UiCommand::InputChanged { value } => self.input_changed(value),
            UiCommand::Submit => self.submit().await,
            UiCommand::OpenRegister => self.open_modal(Modal::register()),
            UiCommand::OpenLogin => self.open_modal(Modal::login()),
            UiCommand::OpenHistory => self.open_history().await,
            UiCommand::SubmitModal { values } => self.submit_modal(&values).await,
            UiCommand::OpenHistoryEntry { id } => self.open_history_entry(&id),
            UiCommand::OpenUploadPage => self.open_upload_page(),
            UiCommand::CloseModal => self.close_modal(),
            UiCommand::Logout => self.logout(),
        }
    }

    pub fn select_model(&self, key: ModelKey) {
        self.dispatch(ViewAction::ModelSelected { key });
    }

    pub fn input_changed(&self, value: String) {
        self.dispatch(ViewAction::InputChanged { value });
    }

    pub async fn submit(&self) {
        let (input, selected) = {
            let state = self.state.borrow();
            (
                state.input.trim().to_string(),
                state.selected_option().cloned(),
            )
        };
        let login = self.session.login();

        if input.is_empty() {
            let url = self.viewer.landing(login.as_deref());
            self.shell.open_external(&url);
            return;
        }

        let link = match validate_link(&input) {
            Ok(link) => link,
            Err(error) => {
                tracing::info!(%error, "link rejected before submission");
                self.notify(Notice::error(UNSUPPORTED_SOURCE));
                return;
            }
        };
        let Some(ModelOption { key: model, .. }) = selected else {
            self.notify(Notice::error(SELECT_MODEL));
            return;
        };

        let prediction = LinkPrediction {
            link,
            login: login.unwrap_or_else(|| self.guest_login.clone()),
            model,
        };
        tracing::info!(
            source = prediction.link.source.as_str(),
            model = %prediction.model,
            "submitting link for prediction"
        );
        let result = {
            let _loading = self.loading();
            self.api.predict_by_link(&prediction).await
        };

        match result {
            Ok(data_id) => {
                tracing::info!(%data_id, "prediction accepted");
                self.notify(Notice::success(PREDICT_SUCCESS));
                let url = self.viewer.submission(&prediction.login, &data_id);
                self.shell.open_external(&url);
            }
            Err(error) => self.report_failure(ApiAction::Predict, &error),
        }
    }

    pub fn open_modal(&self, modal: Modal) {
        self.dispatch(ViewAction::ModalOpened { modal });
    }

    pub fn close_modal(&self) {
        self.dispatch(ViewAction::ModalClosed);
    }

    /// Routes a form submission to whichever form modal is open.
    pub async fn submit_modal(&self, values: &FormValues) {
        let kind = self.state.borrow().modal.as_ref().map(|modal| modal.kind);
        match kind {
            Some(ModalKind::Register) => self.register(values).await,
            Some(ModalKind::Login) => self.login(values).await,
            Some(ModalKind::History) | None => {
                tracing::debug!("form submission without an open form modal");
            }
        }
    }

    async fn register(&self, values: &FormValues) {
        let request = match RegisterRequest::new(
            values.get(FIELD_KEY_NAME),
            values.get(FIELD_KEY_LOGIN),
            values.get(FIELD_KEY_PASSWORD),
        ) {
            Ok(request) => request,
            Err(error) => {
                tracing::debug!(%error, "registration form incomplete");
                self.notify(Notice::error(FILL_ALL_FIELDS));
                return;
            }
        };

        let result = {
            let _loading = self.loading();
            self.api.register(&request).await
        };
        self.close_modal();

        match result {
            Ok(()) => {
                tracing::info!(login = %request.login, "registered");
                self.notify(Notice::success(REGISTER_SUCCESS));
            }
            Err(error) => self.report_failure(ApiAction::Register, &error),
        }
    }

    async fn login(&self, values: &FormValues) {
        let request =
            match LoginRequest::new(values.get(FIELD_KEY_LOGIN), values.get(FIELD_KEY_PASSWORD)) {
                Ok(request) => request,
                Err(error) => {
                    tracing::debug!(%error, "login form incomplete");
                    self.notify(Notice::error(FILL_ALL_FIELDS));
                    return;
                }
            };

        let result = {
            let _loading = self.loading();
            self.api.login(&request).await
        };
        self.close_modal();

        match result {
            Ok(LoginOutcome::Accepted) => {
                self.establish_session(&request.login);
                self.check_user_models().await;
            }
            Ok(LoginOutcome::Rejected) => {
                tracing::info!(login = %request.login, "login rejected");
                self.notify(Notice::error(LOGIN_REJECTED));
            }
            Err(error) => self.report_failure(ApiAction::Login, &error),
        }
    }

    fn establish_session(&self, login: &str) {
        if let Err(error) = self.session.establish(login) {
            tracing::warn!(%error, "failed to persist session login");
        }
        tracing::info!(%login, "session established");
        self.dispatch(ViewAction::SessionEstablished {
            login: login.to_string(),
        });
    }

    pub async fn open_history(&self) {
        let Some(login) = self.session.login() else {
            tracing::debug!("history requested without a session");
            return;
        };
        let result = {
            let _loading = self.loading();
            self.api.history(&login).await
        };
        match result {
            Ok(entries) => {
                tracing::debug!(entries = entries.len(), "history loaded");
                self.open_modal(Modal::history(&entries));
            }
            Err(error) => self.report_failure(ApiAction::History, &error),
        }
    }

    pub fn open_history_entry(&self, id: &RemoteId) {
        let login = self
            .session
            .login()
            .unwrap_or_else(|| self.guest_login.clone());
        let url = self.viewer.submission(&login, id);
        self.shell.open_external(&url);
    }

    pub fn open_upload_page(&self) {
        let Some(login) = self.session.login() else {
            return;
        };
        let url = self.viewer.upload_page(&login);
        self.shell.open_external(&url);
    }

    pub fn logout(&self) {
        if let Err(error) = self.session.teardown() {
            tracing::warn!(%error, "failed to clear session login");
        }
        tracing::info!("session cleared");
        self.dispatch(ViewAction::SessionCleared);
        self.shell.reload();
    }

    /// Offers the user's newest trained model next to the built-in ones.
    pub async fn check_user_models(&self) {
        let Some(login) = self.session.login() else {
            return;
        };
        match self.api.user_models(&login).await {
            Ok(models) => {
                if let Some(latest) = most_recent_user_model(&models) {
                    self.dispatch(ViewAction::UserModelDiscovered {
                        option: ModelOption::from_user_model(latest),
                    });
                }
            }
            Err(error) => self.report_failure(ApiAction::Models, &error),
        }
    }

    fn report_failure(&self, action: ApiAction, error: &ApiError) {
        tracing::warn!(?action, %error, "prediction api call failed");
        self.notify(Notice::error(api_failure_message(action, error)));
    }

    fn notify(&self, notice: Notice) {
        self.shell.notify(notice);
    }

    fn dispatch(&self, action: ViewAction) -> bool {
        dispatch_into(&self.state, &self.shell, action)
    }

    fn loading(&self) -> LoadingGuard<'_> {
        LoadingGuard::start(&self.state, &self.shell)
    }
}

fn dispatch_into(state: &RefCell<ViewState>, shell: &dyn Shell, action: ViewAction) -> bool {
    let changed = apply_action(&mut state.borrow_mut(), action);
    if changed {
        // Render from a snapshot so the shell may call back into the controller.
        let snapshot = state.borrow().clone();
        shell.render(&snapshot);
    }
    changed
}

/// Keeps the loading overlay up for as long as it lives.
struct LoadingGuard<'a> {
    state: &'a RefCell<ViewState>,
    shell: &'a dyn Shell,
}

impl<'a> LoadingGuard<'a> {
    fn start(state: &'a RefCell<ViewState>, shell: &'a dyn Shell) -> Self {
        dispatch_into(state, shell, ViewAction::LoadingStarted);
        Self { state, shell }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        dispatch_into(self.state, self.shell, ViewAction::LoadingFinished);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rateme_client_core::{
        HistoryEntry, MemorySessionStore, SessionState, SessionStore, UserModel,
    };

    use crate::modal::ModalBody;
    use crate::state::{HeaderControl, NoticeLevel};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Register { name: String, login: String },
        Login { login: String },
        History { login: String },
        UserModels { login: String },
        Predict { link: String, login: String, model: String },
    }

    struct FakeApi {
        calls: RefCell<Vec<Call>>,
        register: Result<(), ApiError>,
        login: Result<LoginOutcome, ApiError>,
        history: Result<Vec<HistoryEntry>, ApiError>,
        user_models: Result<Vec<UserModel>, ApiError>,
        predict: Result<RemoteId, ApiError>,
    }

    impl Default for FakeApi {
        fn default() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                register: Ok(()),
                login: Ok(LoginOutcome::Accepted),
                history: Ok(Vec::new()),
                user_models: Ok(Vec::new()),
                predict: Ok(RemoteId::Number(42)),
            }
        }
    }

    impl FakeApi {
        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }
    }

    #[async_trait(?Send)]
    impl PredictionApi for FakeApi {
        async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
            self.calls.borrow_mut().push(Call::Register {
                name: request.name.clone(),
                login: request.login.clone(),
            });
            self.register.clone()
        }

        async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome, ApiError> {
            self.calls.borrow_mut().push(Call::Login {
                login: request.login.clone(),
            });
            self.login.clone()
        }

        async fn history(&self, login: &str) -> Result<Vec<HistoryEntry>, ApiError> {
            self.calls.borrow_mut().push(Call::History {
                login: login.to_string(),
            });
            self.history.clone()
        }

        async fn user_models(&self, login: &str) -> Result<Vec<UserModel>, ApiError> {
            self.calls.borrow_mut().push(Call::UserModels {
                login: login.to_string(),
            });
            self.user_models.clone()
        }

        async fn predict_by_link(&self, prediction: &LinkPrediction) -> Result<RemoteId, ApiError> {
            self.calls.borrow_mut().push(Call::Predict {
                link: prediction.link.url.clone(),
                login: prediction.login.clone(),
                model: prediction.model.to_string(),
            });
            self.predict.clone()
        }
    }

    #[derive(Default)]
    struct RecordingShell {
        renders: RefCell<Vec<ViewState>>,
        notices: RefCell<Vec<Notice>>,
        opened: RefCell<Vec<String>>,
        reloads: RefCell<u32>,
    }

    impl RecordingShell {
        fn notices(&self) -> Vec<Notice> {
            self.notices.borrow().clone()
        }

        fn opened(&self) -> Vec<String> {
            self.opened.borrow().clone()
        }

        fn loading_history(&self) -> Vec<bool> {
            self.renders
                .borrow()
                .iter()
                .map(ViewState::is_loading)
                .collect()
        }
    }

    impl Shell for RecordingShell {
        fn render(&self, state: &ViewState) {
            self.renders.borrow_mut().push(state.clone());
        }

        fn notify(&self, notice: Notice) {
            self.notices.borrow_mut().push(notice);
        }

        fn open_external(&self, url: &str) {
            self.opened.borrow_mut().push(url.to_string());
        }

        fn reload(&self) {
            *self.reloads.borrow_mut() += 1;
        }
    }

    type TestController = ViewController<FakeApi, MemorySessionStore, RecordingShell>;

    fn config() -> AppConfig {
        AppConfig {
            viewer_base_url: "https://viewer.rateme.example".to_string(),
            ..AppConfig::default()
        }
    }

    fn controller(api: FakeApi, store: MemorySessionStore) -> TestController {
        ViewController::new(&config(), api, store, RecordingShell::default())
            .expect("valid controller config")
    }

    fn anonymous(api: FakeApi) -> TestController {
        controller(api, MemorySessionStore::default())
    }

    fn signed_in(api: FakeApi, login: &str) -> TestController {
        controller(api, MemorySessionStore::with_login(login))
    }

    fn login_values(login: &str, password: &str) -> FormValues {
        FormValues::new()
            .with(FIELD_KEY_LOGIN, login)
            .with(FIELD_KEY_PASSWORD, password)
    }

    fn server_error(status: u16, detail: &str) -> ApiError {
        ApiError::Server {
            status,
            detail: detail.to_string(),
        }
    }

    fn last_notice(controller: &TestController) -> Notice {
        controller
            .shell()
            .notices()
            .last()
            .cloned()
            .expect("a notice")
    }

    #[tokio::test]
    async fn unsupported_source_never_reaches_the_api() {
        for input in ["https://example.com/x", "not a url", "ftp://mustapp.com/a"] {
            let controller = signed_in(FakeApi::default(), "alice");
            controller.input_changed(input.to_string());
            controller.submit().await;

            assert!(controller.api().calls().is_empty(), "{input}");
            assert_eq!(
                controller.shell().notices(),
                vec![Notice::error(UNSUPPORTED_SOURCE)]
            );
            assert!(controller.shell().opened().is_empty());
        }
    }

    #[tokio::test]
    async fn empty_submit_opens_viewer_with_login_only_when_signed_in() {
        let controller = signed_in(FakeApi::default(), "alice");
        controller.input_changed("   ".to_string());
        controller.submit().await;
        assert_eq!(
            controller.shell().opened(),
            vec!["https://viewer.rateme.example/?login=alice".to_string()]
        );

        let controller = anonymous(FakeApi::default());
        controller.submit().await;
        assert_eq!(
            controller.shell().opened(),
            vec!["https://viewer.rateme.example/".to_string()]
        );
        assert!(controller.api().calls().is_empty());
    }

    #[tokio::test]
    async fn films_submission_posts_link_and_opens_result() {
        let controller = signed_in(FakeApi::default(), "alice");
        controller.select_model(ModelKey::new("films"));
        controller.input_changed("https://mustapp.com/abc".to_string());
        controller.submit().await;

        assert_eq!(
            controller.api().calls(),
            vec![Call::Predict {
                link: "https://mustapp.com/abc".to_string(),
                login: "alice".to_string(),
                model: "films".to_string(),
            }]
        );
        assert_eq!(last_notice(&controller), Notice::success(PREDICT_SUCCESS));
        assert_eq!(
            controller.shell().opened(),
            vec!["https://viewer.rateme.example/?login=alice&data_id=42".to_string()]
        );
        assert_eq!(controller.shell().loading_history().last(), Some(&false));
        assert!(controller.shell().loading_history().contains(&true));
        assert!(!controller.state().is_loading());
    }

    #[tokio::test]
    async fn anonymous_submission_uses_guest_login() {
        let controller = anonymous(FakeApi::default());
        controller.input_changed("https://mustapp.com/abc".to_string());
        controller.submit().await;

        assert_eq!(
            controller.api().calls(),
            vec![Call::Predict {
                link: "https://mustapp.com/abc".to_string(),
                login: "guest".to_string(),
                model: "goods".to_string(),
            }]
        );
        assert_eq!(
            controller.shell().opened(),
            vec!["https://viewer.rateme.example/?login=guest&data_id=42".to_string()]
        );
    }

    #[tokio::test]
    async fn submission_without_model_is_rejected_locally() {
        let config = AppConfig {
            default_model: None,
            ..config()
        };
        let controller = ViewController::new(
            &config,
            FakeApi::default(),
            MemorySessionStore::default(),
            RecordingShell::default(),
        )
        .expect("valid controller config");
        controller.input_changed("https://mustapp.com/abc".to_string());
        controller.submit().await;

        assert!(controller.api().calls().is_empty());
        assert_eq!(last_notice(&controller), Notice::error(SELECT_MODEL));
    }

    #[tokio::test]
    async fn prediction_failure_surfaces_detail_and_clears_loading() {
        let api = FakeApi {
            predict: Err(server_error(500, "parser unavailable")),
            ..FakeApi::default()
        };
        let controller = signed_in(api, "alice");
        controller.input_changed("https://mustapp.com/abc".to_string());
        controller.submit().await;

        assert_eq!(
            last_notice(&controller),
            Notice::error("Ошибка анализа: parser unavailable")
        );
        assert!(controller.shell().opened().is_empty());
        assert!(controller.shell().loading_history().contains(&true));
        assert_eq!(controller.shell().loading_history().last(), Some(&false));

        let api = FakeApi {
            predict: Err(ApiError::Network {
                message: "connection refused".to_string(),
            }),
            ..FakeApi::default()
        };
        let controller = signed_in(api, "alice");
        controller.input_changed("https://mustapp.com/abc".to_string());
        controller.submit().await;
        assert_eq!(
            last_notice(&controller),
            Notice::error("Ошибка сети при отправке ссылки.")
        );
        assert!(!controller.state().is_loading());
    }

    #[tokio::test]
    async fn login_success_stores_session_and_flips_header() {
        let api = FakeApi {
            user_models: Ok(vec![
                UserModel {
                    id: RemoteId::Number(1),
                    name: "old".to_string(),
                },
                UserModel {
                    id: RemoteId::Number(2),
                    name: "new".to_string(),
                },
            ]),
            ..FakeApi::default()
        };
        let controller = anonymous(api);
        controller.handle(UiCommand::OpenLogin).await;
        controller
            .handle(UiCommand::SubmitModal {
                values: login_values(" alice ", "pw"),
            })
            .await;

        assert_eq!(
            controller
                .session()
                .store()
                .load_login()
                .expect("memory store")
                .as_deref(),
            Some("alice")
        );
        let state = controller.state();
        assert!(state.modal.is_none());
        assert_eq!(
            state.header_controls(),
            vec![
                HeaderControl::History,
                HeaderControl::UploadModel,
                HeaderControl::Logout
            ]
        );
        assert_eq!(
            state.models.last().map(|option| option.label.as_str()),
            Some("new")
        );
        assert_eq!(
            controller.api().calls(),
            vec![
                Call::Login {
                    login: "alice".to_string()
                },
                Call::UserModels {
                    login: "alice".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn login_failures_never_store_a_session() {
        let cases = [
            (Ok(LoginOutcome::Rejected), LOGIN_REJECTED.to_string()),
            (
                Err(server_error(404, "Login not found")),
                "Ошибка входа: Login not found".to_string(),
            ),
            (
                Err(ApiError::Network {
                    message: "offline".to_string(),
                }),
                "Ошибка сети при входе.".to_string(),
            ),
        ];
        for (outcome, message) in cases {
            let api = FakeApi {
                login: outcome,
                ..FakeApi::default()
            };
            let controller = anonymous(api);
            controller.open_modal(Modal::login());
            controller
                .submit_modal(&login_values("alice", "wrong"))
                .await;

            assert_eq!(
                controller.session().store().load_login().expect("memory store"),
                None
            );
            assert_eq!(controller.state().session, SessionState::Anonymous);
            assert_eq!(last_notice(&controller), Notice::error(message));
            assert!(controller.state().modal.is_none());
            assert!(!controller.state().is_loading());
        }
    }

    #[tokio::test]
    async fn incomplete_forms_alert_and_keep_modal_open() {
        let controller = anonymous(FakeApi::default());
        controller.open_modal(Modal::register());
        controller
            .submit_modal(
                &FormValues::new()
                    .with(FIELD_KEY_NAME, "Alice")
                    .with(FIELD_KEY_LOGIN, "alice"),
            )
            .await;

        assert!(controller.api().calls().is_empty());
        assert_eq!(last_notice(&controller), Notice::error(FILL_ALL_FIELDS));
        assert!(controller.state().modal.is_some());
    }

    #[tokio::test]
    async fn register_reports_success_and_server_detail() {
        let controller = anonymous(FakeApi::default());
        controller.open_modal(Modal::register());
        let values = FormValues::new()
            .with(FIELD_KEY_NAME, "Alice")
            .with(FIELD_KEY_LOGIN, "alice")
            .with(FIELD_KEY_PASSWORD, "pw");
        controller.submit_modal(&values).await;
        assert_eq!(last_notice(&controller), Notice::success(REGISTER_SUCCESS));
        assert_eq!(controller.state().session, SessionState::Anonymous);

        let api = FakeApi {
            register: Err(server_error(423, "Login already in use")),
            ..FakeApi::default()
        };
        let controller = anonymous(api);
        controller.open_modal(Modal::register());
        controller.submit_modal(&values).await;
        let notice = last_notice(&controller);
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "Ошибка регистрации: Login already in use");
    }

    #[tokio::test]
    async fn history_rows_open_viewer_for_entry() {
        let api = FakeApi {
            history: Ok(vec![HistoryEntry {
                id: RemoteId::Number(7),
                created_at: "2024-05-01".to_string(),
            }]),
            ..FakeApi::default()
        };
        let controller = signed_in(api, "alice");
        controller.handle(UiCommand::OpenHistory).await;

        let modal = controller.state().modal.expect("history modal");
        assert_eq!(modal.kind, ModalKind::History);
        assert!(matches!(&modal.body, ModalBody::History { rows } if rows.len() == 1));

        controller
            .handle(UiCommand::OpenHistoryEntry {
                id: RemoteId::Number(7),
            })
            .await;
        assert_eq!(
            controller.shell().opened(),
            vec!["https://viewer.rateme.example/?login=alice&data_id=7".to_string()]
        );
        assert!(controller.state().modal.is_some());
    }

    #[tokio::test]
    async fn history_failure_is_reported() {
        let api = FakeApi {
            history: Err(ApiError::Decode {
                message: "bad json".to_string(),
            }),
            ..FakeApi::default()
        };
        let controller = signed_in(api, "alice");
        controller.open_history().await;
        assert_eq!(
            last_notice(&controller),
            Notice::error("Ошибка сети при получении истории.")
        );
        assert!(controller.state().modal.is_none());
        assert!(!controller.state().is_loading());
    }

    #[tokio::test]
    async fn logout_clears_session_and_reloads() {
        let controller = signed_in(FakeApi::default(), "alice");
        controller.handle(UiCommand::Logout).await;

        assert_eq!(
            controller.session().store().load_login().expect("memory store"),
            None
        );
        assert_eq!(
            controller.state().header_controls(),
            vec![HeaderControl::Register, HeaderControl::Login]
        );
        assert_eq!(*controller.shell().reloads.borrow(), 1);
    }

    #[tokio::test]
    async fn bootstrap_checks_user_models_only_with_session() {
        let controller = anonymous(FakeApi::default());
        controller.bootstrap().await;
        assert!(controller.api().calls().is_empty());

        let api = FakeApi {
            user_models: Ok(vec![UserModel {
                id: RemoteId::Number(9),
                name: "mine".to_string(),
            }]),
            ..FakeApi::default()
        };
        let controller = signed_in(api, "alice");
        controller.bootstrap().await;
        assert_eq!(
            controller.api().calls(),
            vec![Call::UserModels {
                login: "alice".to_string()
            }]
        );
        controller.select_model(ModelKey::new("9"));
        assert_eq!(
            controller
                .state()
                .selected_option()
                .map(|option| option.label.clone()),
            Some("mine".to_string())
        );
    }

    #[tokio::test]
    async fn upload_page_requires_session() {
        let controller = anonymous(FakeApi::default());
        controller.open_upload_page();
        assert!(controller.shell().opened().is_empty());

        let controller = signed_in(FakeApi::default(), "alice");
        controller.handle(UiCommand::OpenUploadPage).await;
        assert_eq!(
            controller.shell().opened(),
            vec!["https://viewer.rateme.example/upload?login=alice".to_string()]
        );
    }
}
