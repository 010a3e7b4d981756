//! Localization for Amanda Search
//!
//! Two interface languages are supported, Russian and English. The locale
//! also drives the `lr`/`hl` hints sent to the search provider.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Interface and search language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ru,
    En,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Ru, Locale::En];

    /// Two-letter language code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Ru => "ru",
            Self::En => "en",
        }
    }

    /// Language restriction value understood by Google (`lr=lang_xx`)
    pub fn language_restrict(&self) -> String {
        format!("lang_{}", self.code())
    }

    pub fn native_name(&self) -> &'static str {
        match self {
            Self::Ru => "Русский",
            Self::En => "English",
        }
    }

    /// The other supported language
    pub fn toggled(&self) -> Self {
        match self {
            Self::Ru => Self::En,
            Self::En => Self::Ru,
        }
    }

    /// Match a code like `en`, `en-US` or `RU`
    pub fn from_code(code: &str) -> Option<Self> {
        let base = code.split(|c| c == '-' || c == '_').next().unwrap_or(code);
        Self::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(base.trim()))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("unsupported locale: {s}"))
    }
}

/// Parse Accept-Language header and return best matching locale
pub fn parse_accept_language(header: &str) -> Option<Locale> {
    // Parse header like "en-US,en;q=0.9,ru;q=0.8"
    let mut locales: Vec<(String, f32)> = header
        .split(',')
        .filter_map(|part| {
            let mut parts = part.trim().split(';');
            let lang = parts.next()?.trim().to_string();
            if lang.is_empty() {
                return None;
            }

            let quality = parts
                .next()
                .and_then(|q| q.trim().strip_prefix("q=").and_then(|v| v.parse().ok()))
                .unwrap_or(1.0);

            Some((lang, quality))
        })
        .collect();

    // Sort by quality descending; stable so ties keep header order
    locales.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    locales
        .iter()
        .find_map(|(lang, _)| Locale::from_code(lang))
}

/// Format a history timestamp the way each locale writes short dates
pub fn format_date(locale: Locale, at: &DateTime<Utc>) -> String {
    match locale {
        Locale::Ru => at.format("%d.%m.%Y").to_string(),
        Locale::En => at.format("%m/%d/%Y").to_string(),
    }
}

/// Interface strings
pub struct Translations {
    translations: HashMap<Locale, HashMap<&'static str, &'static str>>,
}

impl Translations {
    pub fn new() -> Self {
        let mut translations = HashMap::new();

        let ru: HashMap<_, _> = [
            ("title", "Amanda Search"),
            ("subtitle", "Найди своё в интернете"),
            ("author", "Создано для поиска"),
            ("placeholder", "Найди своё.."),
            ("search", "Поиск"),
            ("web", "Веб"),
            ("images", "Картинки"),
            ("history", "История поиска"),
            ("clear_history", "Очистить историю"),
            ("no_history", "История поиска пуста"),
            ("searching", "Поиск..."),
            ("searching_for", "Поиск для"),
            ("web_results", "Результаты веб-поиска"),
            ("image_results", "Результаты поиска изображений"),
            ("no_results", "Результаты не найдены"),
            ("visit_site", "Перейти на сайт"),
            ("search_error", "Ошибка поиска"),
            ("search_failed", "Не удалось выполнить поиск"),
            ("retry_hint", "Попробуйте перезагрузить страницу"),
            ("incognito", "Инкогнито"),
            ("incognito_active", "Режим инкогнито активен"),
            ("language", "Язык"),
            ("theme", "Тема"),
            ("sign_in", "Войти"),
            ("sign_out", "Выйти"),
            ("email", "Email"),
            ("password", "Пароль"),
            ("invalid_email", "Введите корректный email адрес"),
            ("short_password", "Пароль должен содержать минимум 6 символов"),
            ("popular", "Популярные сайты"),
        ]
        .into_iter()
        .collect();
        translations.insert(Locale::Ru, ru);

        let en: HashMap<_, _> = [
            ("title", "Amanda Search"),
            ("subtitle", "Find yours on the internet"),
            ("author", "Created for search"),
            ("placeholder", "Find yours.."),
            ("search", "Search"),
            ("web", "Web"),
            ("images", "Images"),
            ("history", "Search History"),
            ("clear_history", "Clear History"),
            ("no_history", "Search history is empty"),
            ("searching", "Searching..."),
            ("searching_for", "Searching for"),
            ("web_results", "Web search results"),
            ("image_results", "Image search results"),
            ("no_results", "No results found"),
            ("visit_site", "Visit site"),
            ("search_error", "Search error"),
            ("search_failed", "Failed to perform search"),
            ("retry_hint", "Try refreshing the page"),
            ("incognito", "Incognito"),
            ("incognito_active", "Incognito mode active"),
            ("language", "Language"),
            ("theme", "Theme"),
            ("sign_in", "Sign In"),
            ("sign_out", "Sign Out"),
            ("email", "Email"),
            ("password", "Password"),
            ("invalid_email", "Enter a valid email address"),
            ("short_password", "Password must be at least 6 characters"),
            ("popular", "Popular Sites"),
        ]
        .into_iter()
        .collect();
        translations.insert(Locale::En, en);

        Self { translations }
    }

    /// Get a translation for a key, falling back to English, then to the key
    pub fn get(&self, locale: Locale, key: &'static str) -> &'static str {
        self.translations
            .get(&locale)
            .and_then(|t| t.get(key))
            .or_else(|| self.translations.get(&Locale::En).and_then(|t| t.get(key)))
            .copied()
            .unwrap_or(key)
    }

    /// Whole table for one locale, handed to templates as `t`
    pub fn table(&self, locale: Locale) -> HashMap<&'static str, &'static str> {
        self.translations.get(&locale).cloned().unwrap_or_default()
    }
}

impl Default for Translations {
    fn default() -> Self {
        Self::new()
    }
}

static TRANSLATIONS: Lazy<Translations> = Lazy::new(Translations::new);

/// Shorthand for [`Translations::get`] on the built-in table
pub fn tr(locale: Locale, key: &'static str) -> &'static str {
    TRANSLATIONS.get(locale, key)
}

/// Shorthand for [`Translations::table`] on the built-in table
pub fn table(locale: Locale) -> HashMap<&'static str, &'static str> {
    TRANSLATIONS.table(locale)
}
