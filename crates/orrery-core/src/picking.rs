use tracing::debug;

use crate::world::CategoryId;

/// What a single click did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Selected(CategoryId),
    Deselected(CategoryId),
    /// Pick miss: clicking empty space never deselects.
    Ignored,
}

/// Owns the one-place selection state. At most one category is selected at a
/// time; re-clicking the selected category is the only way to deselect.
#[derive(Debug, Default)]
pub struct PickingCoordinator {
    selected: Option<CategoryId>,
}

impl PickingCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<CategoryId> {
        self.selected
    }

    pub fn click(&mut self, hit: Option<CategoryId>) -> ClickOutcome {
        match hit {
            None => {
                debug!("pick miss; selection unchanged");
                ClickOutcome::Ignored
            }
            Some(id) if self.selected == Some(id) => {
                self.selected = None;
                debug!(?id, "re-click deselected category");
                ClickOutcome::Deselected(id)
            }
            Some(id) => {
                self.selected = Some(id);
                debug!(?id, "selected category");
                ClickOutcome::Selected(id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> CategoryId {
        let mut world = crate::world::World::with_seed(0);
        world
            .create_category("probe", "category", &[])
            .expect("create category")
    }

    #[test]
    fn click_selects_then_reclick_deselects() {
        let mut picking = PickingCoordinator::new();
        let a = id();

        assert_eq!(picking.click(Some(a)), ClickOutcome::Selected(a));
        assert_eq!(picking.selected(), Some(a));
        assert_eq!(picking.click(Some(a)), ClickOutcome::Deselected(a));
        assert_eq!(picking.selected(), None);
    }

    #[test]
    fn click_on_other_category_switches_selection() {
        let mut picking = PickingCoordinator::new();
        let (a, b) = (id(), id());

        picking.click(Some(a));
        assert_eq!(picking.click(Some(b)), ClickOutcome::Selected(b));
        assert_eq!(picking.selected(), Some(b));
    }

    #[test]
    fn miss_never_touches_selection() {
        let mut picking = PickingCoordinator::new();
        let a = id();

        assert_eq!(picking.click(None), ClickOutcome::Ignored);
        assert_eq!(picking.selected(), None);

        picking.click(Some(a));
        assert_eq!(picking.click(None), ClickOutcome::Ignored);
        assert_eq!(picking.selected(), Some(a));
    }
}
