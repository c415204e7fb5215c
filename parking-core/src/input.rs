use std::collections::VecDeque;

use crate::error::InputError;
use crate::types::ParkingType;

/// Источник пользовательского ввода: консоль, запрос API или тестовый дублёр.
pub trait InputSource {
    /// Категория транспорта
    fn read_selection(&mut self) -> Result<ParkingType, InputError>;

    /// Госномер, уже нормализованный (см. [`normalize_registration`])
    fn read_registration_number(&mut self) -> Result<String, InputError>;
}

/// trim + проверка на пустоту
pub fn normalize_registration(raw: &str) -> Result<String, InputError> {
    let reg = raw.trim();
    if reg.is_empty() {
        return Err(InputError::EmptyRegistration);
    }
    Ok(reg.to_string())
}

/// Ввод из заранее подготовленных строк, по очереди.
///
/// Строки разбираются так же, как консольный ввод: категория — пункт меню
/// (`1`/`2`), номер — trim + непустой. Кончились строки => `InputError::Closed`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    /// Ввод из готовых строк
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Сколько строк ещё не прочитано
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }

    fn next_line(&mut self) -> Result<String, InputError> {
        self.lines.pop_front().ok_or(InputError::Closed)
    }
}

impl InputSource for ScriptedInput {
    fn read_selection(&mut self) -> Result<ParkingType, InputError> {
        ParkingType::from_selection(&self.next_line()?)
    }

    fn read_registration_number(&mut self) -> Result<String, InputError> {
        normalize_registration(&self.next_line()?)
    }
}
