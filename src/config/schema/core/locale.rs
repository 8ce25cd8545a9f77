use super::Config;

impl Config {
    /// Point `rust_i18n` at the configured notification language.
    pub fn apply_locale(&self) {
        rust_i18n::set_locale(self.notify.language.locale());
    }
}
