use super::session::AccountSession;

/// Aggregated outcome of one run over a site's accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub site: String,
    pub total: usize,
    pub succeeded: usize,
    pub lines: Vec<String>,
}

impl RunSummary {
    pub fn new(site: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            ..Self::default()
        }
    }

    pub fn failed(&self) -> usize {
        self.total - self.succeeded
    }

    pub fn all_succeeded(&self) -> bool {
        self.succeeded == self.total
    }

    /// Append the line for a settled session.
    pub fn record(&mut self, session: &AccountSession, locale: &str) {
        self.total += 1;
        let name = session.account().display_name();
        let detail = session.notes().join("; ");

        let line = if session.succeeded() {
            self.succeeded += 1;
            if detail.is_empty() {
                t!("summary.line_ok", locale = locale, name = name).to_string()
            } else {
                t!("summary.line_ok_detail", locale = locale, name = name, detail = detail)
                    .to_string()
            }
        } else {
            let reason = session.failure().unwrap_or_default();
            t!("summary.line_failed", locale = locale, name = name, reason = reason).to_string()
        };
        self.lines.push(line);
    }

    pub fn title(&self, locale: &str) -> String {
        t!(
            "summary.title",
            locale = locale,
            site = &self.site,
            total = self.total,
            succeeded = self.succeeded,
            failed = self.failed()
        )
        .to_string()
    }

    pub fn body(&self) -> String {
        self.lines.join("\n")
    }
}
