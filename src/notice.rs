//! Avisos que la capa de presentación muestra al usuario.
//!
//! Los textos están en ruso, igual que el resto de la aplicación.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    /// Título de la alerta
    pub fn title(self) -> &'static str {
        match self {
            NoticeKind::Success => "Успех",
            NoticeKind::Error => "Ошибка",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    SelectEmployeeAndTime,
    UserNotFound,
    InvalidTime,
    AppointmentConfirmed,
    AppointmentFailed,
    ReviewAdded,
    ReviewAlreadyExists,
    ReviewFailed,
    ReviewIncomplete,
    ReviewNotAvailable,
    AuthFailed,
    ProfileLoadFailed,
    DataLoadFailed,
}

impl Notice {
    pub fn kind(self) -> NoticeKind {
        match self {
            Notice::AppointmentConfirmed | Notice::ReviewAdded => NoticeKind::Success,
            _ => NoticeKind::Error,
        }
    }

    pub fn is_success(self) -> bool {
        self.kind() == NoticeKind::Success
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::SelectEmployeeAndTime => "Выберите доступное время и сотрудника",
            Notice::UserNotFound => "Пользователь не найден",
            Notice::InvalidTime => "Некорректное время",
            Notice::AppointmentConfirmed => "Запись успешно подтверждена",
            Notice::AppointmentFailed => "Не удалось создать запись",
            Notice::ReviewAdded => "Ваш отзыв успешно добавлен!",
            Notice::ReviewAlreadyExists => {
                "Вы уже оставили отзыв на данную услугу, большое вам спасибо"
            }
            Notice::ReviewFailed => "Не удалось отправить отзыв",
            Notice::ReviewIncomplete => "Поставьте оценку от 1 до 5 и напишите отзыв",
            Notice::ReviewNotAvailable => "Отзыв можно оставить только после приёма",
            Notice::AuthFailed => "Ошибка при аутентификации",
            Notice::ProfileLoadFailed => "Ошибка при загрузке данных профиля",
            Notice::DataLoadFailed => "Ошибка при загрузке данных",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind().title(), self.message())
    }
}
