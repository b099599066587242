//! Terminal notifier.

use tracing::{info, warn};

use crate::application::ports::{Notice, NoticeKind, Notifier};

const SOURCE: &str = "infra::notify";

/// Prints notices for a terminal user and mirrors them into the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn line(notice: &Notice) -> String {
        format!("[{}] {}", notice.kind.as_str(), notice.text)
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Warning | NoticeKind::Error => {
                warn!(target = SOURCE, kind = notice.kind.as_str(), text = %notice.text, "notice");
            }
            NoticeKind::Success | NoticeKind::Info => {
                info!(target = SOURCE, kind = notice.kind.as_str(), text = %notice.text, "notice");
            }
        }
        eprintln!("{}", Self::line(&notice));
    }
}
