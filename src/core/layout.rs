//! Widget placement within the active page's zones

use thiserror::Error;

use super::document::{Document, WidgetId, WidgetRef, ZONE_COUNT};
use crate::widgets::WidgetKind;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("zone {0} does not exist")]
    NoSuchZone(usize),
    #[error("widget {0} is not on the current page")]
    WidgetNotFound(WidgetId),
    #[error("index {index} is out of range for zone {zone}")]
    IndexOutOfRange { zone: usize, index: usize },
}

fn check_zone(zone: usize) -> Result<(), LayoutError> {
    if zone < ZONE_COUNT {
        Ok(())
    } else {
        Err(LayoutError::NoSuchZone(zone))
    }
}

impl Document {
    /// Append a new widget to a zone of the current page
    pub fn add_widget(&mut self, zone: usize, kind: WidgetKind) -> Result<WidgetId, LayoutError> {
        check_zone(zone)?;
        let id = self.allocate_widget_id();
        self.current_page_mut().zone_widgets[zone].push(WidgetRef::new(id.clone(), kind));
        tracing::debug!("Added {} widget {} to zone {}", kind, id, zone);
        Ok(id)
    }

    /// Remove a widget and everything stored for it
    pub fn remove_widget(&mut self, id: &WidgetId) -> Result<WidgetRef, LayoutError> {
        let page = self.current_page_mut();
        let (zone, index) = page
            .find_widget(id)
            .ok_or_else(|| LayoutError::WidgetNotFound(id.clone()))?;
        let removed = page.zone_widgets[zone].remove(index);
        if removed.kind.has_side_table() {
            self.drop_side_tables(id);
        }
        tracing::debug!("Removed {} widget {}", removed.kind, id);
        Ok(removed)
    }

    /// Move a widget within one zone so it ends up at position `to`
    pub fn reorder(&mut self, zone: usize, from: usize, to: usize) -> Result<(), LayoutError> {
        check_zone(zone)?;
        let widgets = &mut self.current_page_mut().zone_widgets[zone];
        for index in [from, to] {
            if index >= widgets.len() {
                return Err(LayoutError::IndexOutOfRange { zone, index });
            }
        }
        let widget = widgets.remove(from);
        widgets.insert(to, widget);
        Ok(())
    }

    /// Drop a widget into any zone
    ///
    /// `to_index` counts positions in the target zone without the moved
    /// widget and is clamped to the end.
    pub fn move_widget(&mut self, id: &WidgetId, to_zone: usize, to_index: usize) -> Result<(), LayoutError> {
        check_zone(to_zone)?;
        let page = self.current_page_mut();
        let (zone, index) = page
            .find_widget(id)
            .ok_or_else(|| LayoutError::WidgetNotFound(id.clone()))?;
        let widget = page.zone_widgets[zone].remove(index);
        let target = &mut page.zone_widgets[to_zone];
        let at = to_index.min(target.len());
        target.insert(at, widget);
        tracing::debug!("Moved widget {} to zone {} at {}", id, to_zone, at);
        Ok(())
    }

    /// Set a widget's title; a blank title restores the default
    pub fn rename_widget(&mut self, id: &WidgetId, title: &str) -> Result<(), LayoutError> {
        let page = self.current_page_mut();
        let (zone, index) = page
            .find_widget(id)
            .ok_or_else(|| LayoutError::WidgetNotFound(id.clone()))?;
        let widget = &mut page.zone_widgets[zone][index];
        let title = title.trim();
        widget.title = if title.is_empty() || title == widget.kind.default_title() {
            None
        } else {
            Some(title.to_string())
        };
        Ok(())
    }
}

/// Vertical extent of a rendered widget card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub top: f32,
    pub height: f32,
}

impl Slot {
    fn midpoint(self) -> f32 {
        self.top + self.height / 2.0
    }
}

/// Insertion index for a dragged widget released at `pointer_y`
///
/// `slots` are the other cards of the zone, top to bottom. The widget goes
/// before the first card whose midpoint is below the pointer, else at the end.
pub fn drop_index(slots: &[Slot], pointer_y: f32) -> usize {
    slots
        .iter()
        .position(|slot| pointer_y < slot.midpoint())
        .unwrap_or(slots.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(doc: &Document, zone: usize) -> Vec<WidgetKind> {
        doc.current_page().zone_widgets[zone].iter().map(|w| w.kind).collect()
    }

    #[test]
    fn test_add_widget_assigns_fresh_ids() {
        let mut doc = Document::seed();
        let a = doc.add_widget(0, WidgetKind::Notes).unwrap();
        let b = doc.add_widget(0, WidgetKind::Notes).unwrap();
        assert_ne!(a, b);
        assert_eq!(kinds(&doc, 0), vec![WidgetKind::Notes, WidgetKind::Notes]);
        assert_eq!(doc.add_widget(3, WidgetKind::Clock), Err(LayoutError::NoSuchZone(3)));
    }

    #[test]
    fn test_remove_drops_side_tables() {
        let mut doc = Document::seed();
        let todo = doc.add_widget(1, WidgetKind::Todo).unwrap();
        doc.todo_list_mut(&todo).add("write tests").unwrap();
        assert_eq!(doc.todos(&todo).len(), 1);

        let removed = doc.remove_widget(&todo).unwrap();
        assert_eq!(removed.kind, WidgetKind::Todo);
        assert!(doc.todos(&todo).is_empty());
        assert!(doc.todo_lists.is_empty());
        assert_eq!(
            doc.remove_widget(&todo),
            Err(LayoutError::WidgetNotFound(todo.clone()))
        );
    }

    #[test]
    fn test_identity_survives_reorder() {
        let mut doc = Document::seed();
        let first = doc.add_widget(0, WidgetKind::Todo).unwrap();
        let second = doc.add_widget(0, WidgetKind::Todo).unwrap();
        doc.todo_list_mut(&second).add("belongs to second").unwrap();

        doc.reorder(0, 1, 0).unwrap();
        let page = doc.current_page();
        assert_eq!(page.zone_widgets[0][0].id, second);
        assert_eq!(page.zone_widgets[0][1].id, first);
        assert_eq!(doc.todos(&second)[0].text, "belongs to second");
        assert!(doc.todos(&first).is_empty());
    }

    #[test]
    fn test_reorder_bounds() {
        let mut doc = Document::seed();
        doc.add_widget(2, WidgetKind::Clock).unwrap();
        assert_eq!(
            doc.reorder(2, 0, 1),
            Err(LayoutError::IndexOutOfRange { zone: 2, index: 1 })
        );
        assert_eq!(doc.reorder(5, 0, 0), Err(LayoutError::NoSuchZone(5)));
    }

    #[test]
    fn test_move_across_zones() {
        let mut doc = Document::seed();
        let clock = doc.add_widget(0, WidgetKind::Clock).unwrap();
        doc.add_widget(1, WidgetKind::Notes).unwrap();
        doc.add_widget(1, WidgetKind::Calculator).unwrap();

        doc.move_widget(&clock, 1, 1).unwrap();
        assert!(kinds(&doc, 0).is_empty());
        assert_eq!(
            kinds(&doc, 1),
            vec![WidgetKind::Notes, WidgetKind::Clock, WidgetKind::Calculator]
        );

        doc.move_widget(&clock, 2, 99).unwrap();
        assert_eq!(kinds(&doc, 2), vec![WidgetKind::Clock]);
    }

    #[test]
    fn test_rename_widget() {
        let mut doc = Document::seed();
        let id = doc.add_widget(0, WidgetKind::Calendar).unwrap();
        doc.rename_widget(&id, "  Team ").unwrap();
        assert_eq!(doc.current_page().widget(&id).unwrap().display_title(), "Team");
        doc.rename_widget(&id, "").unwrap();
        assert_eq!(doc.current_page().widget(&id).unwrap().title, None);
        assert_eq!(doc.current_page().widget(&id).unwrap().display_title(), "Calendar");
    }

    #[test]
    fn test_drop_index_by_midpoint() {
        let slots = [
            Slot { top: 0.0, height: 100.0 },
            Slot { top: 110.0, height: 100.0 },
        ];
        assert_eq!(drop_index(&slots, 10.0), 0);
        assert_eq!(drop_index(&slots, 60.0), 1);
        assert_eq!(drop_index(&slots, 159.0), 1);
        assert_eq!(drop_index(&slots, 161.0), 2);
        assert_eq!(drop_index(&[], 0.0), 0);
    }
}
