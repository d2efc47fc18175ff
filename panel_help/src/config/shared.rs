//! The process-wide configuration used when callers pass none explicitly.

use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;

use super::StyleConfig;

static SHARED: LazyLock<RwLock<Arc<StyleConfig>>> =
    LazyLock::new(|| RwLock::new(Arc::new(StyleConfig::default())));

/// Returns a snapshot of the shared configuration.
///
/// The snapshot is unaffected by later calls to [`install`].
#[must_use]
pub fn shared() -> Arc<StyleConfig> {
    Arc::clone(&*SHARED.read())
}

/// Replaces the shared configuration.
///
/// Renders already holding a snapshot keep using it.
pub fn install(config: StyleConfig) {
    *SHARED.write() = Arc::new(config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn snapshots_survive_replacement() {
        let mut custom = StyleConfig::default();
        custom.strings.options_panel_title = "Flags".to_owned();
        let previous = shared();
        install(custom);
        let snapshot = shared();
        assert_eq!(snapshot.strings.options_panel_title, "Flags");

        install((*previous).clone());
        assert_eq!(snapshot.strings.options_panel_title, "Flags");
        assert_eq!(
            shared().strings.options_panel_title,
            previous.strings.options_panel_title
        );
    }
}
