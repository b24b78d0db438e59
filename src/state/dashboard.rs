use crate::storage::Storage;
use log::warn;
use serde::{Deserialize, Serialize};

const LAYOUT_FILE: &str = "dashboard.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WidgetKind {
    Stats,
    PendingBases,
    Tournaments,
    RecentOrders,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 4] = [
        WidgetKind::Stats,
        WidgetKind::PendingBases,
        WidgetKind::Tournaments,
        WidgetKind::RecentOrders,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            WidgetKind::Stats => "Platform Stats",
            WidgetKind::PendingBases => "Pending Base Layouts",
            WidgetKind::Tournaments => "Tournament Management",
            WidgetKind::RecentOrders => "Recent Orders",
        }
    }

    /// (width, height) a freshly added widget starts with.
    pub fn default_size(&self) -> (WidgetSize, WidgetSize) {
        match self {
            WidgetKind::Stats => (WidgetSize::Large, WidgetSize::Small),
            WidgetKind::PendingBases => (WidgetSize::Medium, WidgetSize::Medium),
            WidgetKind::Tournaments => (WidgetSize::Small, WidgetSize::Small),
            WidgetKind::RecentOrders => (WidgetSize::Medium, WidgetSize::Medium),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetSize {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetEntry {
    pub key: WidgetKind,
    pub width: WidgetSize,
    pub height: WidgetSize,
}

/// The admin dashboard's widget arrangement. Every mutation persists
/// immediately; `load` rehydrates the saved arrangement or falls back to the
/// starter layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardLayout {
    pub widgets: Vec<WidgetEntry>,
}

impl Default for DashboardLayout {
    fn default() -> Self {
        Self::starter()
    }
}

impl DashboardLayout {
    pub fn starter() -> Self {
        Self {
            widgets: vec![
                WidgetEntry {
                    key: WidgetKind::Stats,
                    width: WidgetSize::Medium,
                    height: WidgetSize::Small,
                },
                WidgetEntry {
                    key: WidgetKind::Tournaments,
                    width: WidgetSize::Small,
                    height: WidgetSize::Small,
                },
                WidgetEntry {
                    key: WidgetKind::PendingBases,
                    width: WidgetSize::Medium,
                    height: WidgetSize::Small,
                },
                WidgetEntry {
                    key: WidgetKind::RecentOrders,
                    width: WidgetSize::Small,
                    height: WidgetSize::Medium,
                },
            ],
        }
    }

    pub fn load(storage: &Storage) -> Self {
        storage.load(LAYOUT_FILE).unwrap_or_else(Self::starter)
    }

    fn save(&self, storage: &Storage) {
        if let Err(e) = storage.save(LAYOUT_FILE, self) {
            warn!("failed to persist dashboard layout: {e:#}");
        }
    }

    pub fn contains(&self, kind: WidgetKind) -> bool {
        self.widgets.iter().any(|w| w.key == kind)
    }

    /// Widget kinds not currently placed, in a stable order.
    pub fn available(&self) -> Vec<WidgetKind> {
        WidgetKind::ALL
            .into_iter()
            .filter(|k| !self.contains(*k))
            .collect()
    }

    /// Append a widget with its default size. No-op when already placed.
    pub fn add(&mut self, storage: &Storage, kind: WidgetKind) -> bool {
        if self.contains(kind) {
            return false;
        }
        let (width, height) = kind.default_size();
        self.widgets.push(WidgetEntry { key: kind, width, height });
        self.save(storage);
        true
    }

    pub fn remove(&mut self, storage: &Storage, kind: WidgetKind) {
        self.widgets.retain(|w| w.key != kind);
        self.save(storage);
    }

    pub fn set_width(&mut self, storage: &Storage, kind: WidgetKind, width: WidgetSize) {
        if let Some(w) = self.widgets.iter_mut().find(|w| w.key == kind) {
            w.width = width;
            self.save(storage);
        }
    }

    pub fn set_height(&mut self, storage: &Storage, kind: WidgetKind, height: WidgetSize) {
        if let Some(w) = self.widgets.iter_mut().find(|w| w.key == kind) {
            w.height = height;
            self.save(storage);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_storage(tag: &str) -> Storage {
        let dir = std::env::temp_dir().join(format!(
            "clashhub-dashboard-{tag}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        Storage::at(dir)
    }

    #[test]
    fn layout_round_trips_exactly_through_storage() {
        let storage = temp_storage("roundtrip");
        let mut layout = DashboardLayout::starter();
        layout.remove(&storage, WidgetKind::Tournaments);
        layout.set_width(&storage, WidgetKind::Stats, WidgetSize::Large);

        assert_eq!(DashboardLayout::load(&storage), layout);
    }

    #[test]
    fn widget_keys_serialize_as_camel_case() {
        let entry = WidgetEntry {
            key: WidgetKind::PendingBases,
            width: WidgetSize::Medium,
            height: WidgetSize::Small,
        };
        assert_eq!(
            serde_json::to_string(&entry).unwrap(),
            r#"{"key":"pendingBases","width":"medium","height":"small"}"#
        );
    }

    #[test]
    fn load_falls_back_to_the_starter_layout() {
        let storage = temp_storage("fallback");
        assert_eq!(DashboardLayout::load(&storage), DashboardLayout::starter());
    }

    #[test]
    fn add_uses_defaults_and_rejects_duplicates() {
        let storage = temp_storage("add");
        let mut layout = DashboardLayout::starter();
        layout.remove(&storage, WidgetKind::RecentOrders);
        assert_eq!(layout.available(), vec![WidgetKind::RecentOrders]);

        assert!(layout.add(&storage, WidgetKind::RecentOrders));
        let added = layout.widgets.last().unwrap();
        assert_eq!(added.width, WidgetSize::Medium);
        assert_eq!(added.height, WidgetSize::Medium);

        assert!(!layout.add(&storage, WidgetKind::RecentOrders));
        assert!(layout.available().is_empty());
    }

    #[test]
    fn resize_replaces_one_dimension() {
        let storage = temp_storage("resize");
        let mut layout = DashboardLayout::starter();
        layout.set_height(&storage, WidgetKind::Stats, WidgetSize::Large);
        let stats = layout.widgets.iter().find(|w| w.key == WidgetKind::Stats).unwrap();
        assert_eq!(stats.width, WidgetSize::Medium);
        assert_eq!(stats.height, WidgetSize::Large);
    }
}
