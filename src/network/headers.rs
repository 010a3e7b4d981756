//! Default request headers

use crate::locales::Locale;

/// User agent sent when none is configured
pub fn default_user_agent() -> String {
    format!("amanda-search/{}", crate::VERSION)
}

/// Accept header for JSON and JSONP requests
pub fn accept_json() -> &'static str {
    "application/json,text/javascript,*/*;q=0.01"
}

/// Accept-Language header preferring the given locale
pub fn accept_language(locale: Locale) -> String {
    match locale {
        Locale::En => "en-US,en;q=0.9".to_string(),
        other => format!("{},en-US;q=0.9,en;q=0.8", other.code()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_user_agent() {
        let ua = default_user_agent();
        assert!(ua.starts_with("amanda-search/"));
    }

    #[test]
    fn test_accept_language() {
        assert_eq!(accept_language(Locale::Ru), "ru,en-US;q=0.9,en;q=0.8");
        assert_eq!(accept_language(Locale::En), "en-US,en;q=0.9");
    }
}
