//! Build-time deployment settings.
//!
//! `PUBLIC_URL` (e.g. `/tickets` when hosted under a subdirectory) sets the
//! router base; `CINEBOOK_API_URL` points at the booking backend and
//! `CINEBOOK_OMDB_KEY` enables poster and plot lookups.

/// Base path for the router; `None` when the app is served from the root.
#[must_use]
pub fn router_base() -> Option<String> {
    non_blank(option_env!("PUBLIC_URL").unwrap_or(""))
        .map(|base| base.trim_end_matches('/').to_string())
}

/// Backend address baked in at build time, if any.
#[must_use]
pub fn api_base_url() -> Option<&'static str> {
    option_env!("CINEBOOK_API_URL")
}

#[must_use]
pub fn omdb_api_key() -> Option<String> {
    non_blank(option_env!("CINEBOOK_OMDB_KEY").unwrap_or("")).map(str::to_string)
}

fn non_blank(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "/" {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::non_blank;

    #[test]
    fn blank_and_root_bases_are_ignored() {
        assert_eq!(non_blank(""), None);
        assert_eq!(non_blank("  / "), None);
        assert_eq!(non_blank(" /tickets/ "), Some("/tickets/"));
    }
}
