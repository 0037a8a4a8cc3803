use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// `CHEMSEED_QUIET=1` (or `true`) suppresses decorative terminal output.
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("CHEMSEED_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}
