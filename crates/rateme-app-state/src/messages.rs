//! User-facing copy. The product ships in Russian only.

use rateme_client_core::ApiError;

pub const FILL_ALL_FIELDS: &str = "Заполните все поля!";
pub const REGISTER_SUCCESS: &str = "Регистрация прошла успешно!";
pub const LOGIN_REJECTED: &str = "Неверный логин или пароль";
pub const UNSUPPORTED_SOURCE: &str = "Поддерживаются только ссылки на mustapp.com";
pub const SELECT_MODEL: &str = "Выберите модель";
pub const PREDICT_SUCCESS: &str = "Ссылка отправлена на анализ!";

pub const HEADER_REGISTER: &str = "Регистрация";
pub const HEADER_LOGIN: &str = "Вход";
pub const HEADER_HISTORY: &str = "История";
pub const HEADER_UPLOAD_MODEL: &str = "Загрузить модель";
pub const HEADER_LOGOUT: &str = "Выйти";

pub const REGISTER_TITLE: &str = "Регистрация";
pub const REGISTER_SUBMIT: &str = "Создать аккаунт";
pub const LOGIN_TITLE: &str = "Вход";
pub const LOGIN_SUBMIT: &str = "Войти";
pub const HISTORY_TITLE: &str = "История";
pub const HISTORY_EMPTY: &str = "История пуста";

pub const FIELD_NAME: &str = "Имя";
pub const FIELD_LOGIN: &str = "Логин";
pub const FIELD_PASSWORD: &str = "Пароль";

/// The remote call a failure message is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiAction {
    Register,
    Login,
    History,
    Models,
    Predict,
}

impl ApiAction {
    const fn server_prefix(self) -> &'static str {
        match self {
            Self::Register => "Ошибка регистрации: ",
            Self::Login => "Ошибка входа: ",
            Self::History => "Ошибка загрузки истории: ",
            Self::Models => "Ошибка загрузки моделей: ",
            Self::Predict => "Ошибка анализа: ",
        }
    }

    const fn network_message(self) -> &'static str {
        match self {
            Self::Register => "Ошибка сети при регистрации.",
            Self::Login => "Ошибка сети при входе.",
            Self::History => "Ошибка сети при получении истории.",
            Self::Models => "Ошибка сети при получении моделей.",
            Self::Predict => "Ошибка сети при отправке ссылки.",
        }
    }
}

/// Server errors carry their `detail` verbatim; everything that never got a
/// server answer collapses into the action's generic network message.
pub fn api_failure_message(action: ApiAction, error: &ApiError) -> String {
    match error.server_detail() {
        Some(detail) => format!("{}{detail}", action.server_prefix()),
        None => action.network_message().to_string(),
    }
}

pub fn history_row_label(created_at: &str, id: &str) -> String {
    format!("📅 {created_at}, ID {id}")
}
