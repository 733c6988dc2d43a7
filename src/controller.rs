//! Region-editing controller.
//!
//! Interprets pointer and keyboard input against normalized image space,
//! owns the region list, the selection/focus/in-progress region and the undo
//! history, and renders the result onto a host-supplied [`Surface`].
//!
//! All state changes replace the region list wholesale (`Rc<Vec<Region>>`),
//! so a list the host captured earlier is never mutated behind its back.

use std::cmp::Ordering;
use std::rc::Rc;

use crate::config::EditorConfig;
use crate::constants::{
    DEFAULT_LABEL, FINE_TICK_FACTOR, MARKER_LENGTH, MARKER_THICKNESS, NEIGHBOR_THRESHOLD, TICK,
};
use crate::history::{EditHistory, HistoryStack, RegionList};
use crate::input::{Direction, KeyEvent, MouseButton, PointerEvent};
use crate::keybindings::{EditMode, EditorAction, KeyBindings};
use crate::model::{Category, Rectangle, Region, RegionHandle};
use crate::render::{ImageSize, Palette, Surface};
use crate::viewport::{Letterbox, PixelRect};

/// Notifications from the controller to its host.
///
/// Every method has an empty default so hosts implement only what they need.
pub trait EditorCallback {
    /// Selection changed (also fired after a click that selects nothing).
    fn on_selected_region(&mut self, _region: Option<&Region>) {}

    /// A drawn region was committed.
    fn on_added_region(&mut self, _region: &Region, _regions: &RegionList) {}

    /// The selected region was deleted.
    fn on_deleted_region(&mut self, _region: &Region, _regions: &RegionList) {}

    /// The selected region got a new label.
    fn on_changed_label(&mut self, _region: &Region, _regions: &RegionList) {}

    /// The selected region was moved, expanded or shrunk.
    fn on_deform_region(&mut self, _region: &Region, _regions: &RegionList) {}

    /// The whole list was replaced by undo or an undoable list replacement.
    fn on_region_list_restored(&mut self, _regions: &RegionList) {}

    /// Undo history grew, shrank or was cleared.
    fn on_history_updated(&mut self, _depth: usize) {}
}

/// Callback that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCallback;

impl EditorCallback for NoopCallback {}

/// Interactive rectangle editor for one image.
pub struct RegionEditorController<S: Surface> {
    surface: S,
    image: Option<S::Image>,
    callback: Box<dyn EditorCallback>,

    /// Category stamped on newly drawn regions
    category: Category,
    /// Label stamped on newly drawn regions
    label: u32,

    mode: EditMode,
    keybindings: KeyBindings,
    palette: Palette,

    regions: RegionList,
    history: HistoryStack,

    selected: Option<RegionHandle>,
    focused: Option<RegionHandle>,
    /// Region being drawn, not yet in `regions`
    editing: Option<Region>,
    /// Pointer is down
    clicking: bool,

    letterbox: Letterbox,
    next_handle: u64,
}

impl<S: Surface> RegionEditorController<S> {
    pub fn new(surface: S, callback: impl EditorCallback + 'static) -> Self {
        Self {
            surface,
            image: None,
            callback: Box::new(callback),
            category: Category::unknown(),
            label: DEFAULT_LABEL,
            mode: EditMode::Move,
            keybindings: KeyBindings::default(),
            palette: Palette::default(),
            regions: Rc::new(Vec::new()),
            history: HistoryStack::new(),
            selected: None,
            focused: None,
            editing: None,
            clicking: false,
            letterbox: Letterbox::default(),
            next_handle: 1,
        }
    }

    /// Create a controller with keybindings, palette, default label and
    /// history limit taken from `config`.
    pub fn with_config(
        surface: S,
        callback: impl EditorCallback + 'static,
        config: &EditorConfig,
    ) -> Self {
        let mut controller = Self::new(surface, callback);
        controller.keybindings = config.keybindings;
        controller.palette = config.palette;
        controller.label = config.preferences.default_label;
        controller.history = HistoryStack::with_limit(config.preferences.history_limit);
        controller
    }

    // ------------------------------------------------------------------
    // Host-facing state
    // ------------------------------------------------------------------

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable surface access, e.g. to resize it. Call [`calc_margin`]
    /// afterwards.
    ///
    /// [`calc_margin`]: Self::calc_margin
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Give the surface back to the host.
    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn image(&self) -> Option<&S::Image> {
        self.image.as_ref()
    }

    /// Swap the base image.
    ///
    /// Pending interaction state (in-progress region, hover focus, pointer
    /// press) is discarded. Call [`calc_margin`](Self::calc_margin) before
    /// relying on hit-testing again.
    pub fn set_image(&mut self, image: Option<S::Image>) {
        if let Some(img) = &image {
            let (w, h) = img.dimensions();
            log::debug!("Image set ({}x{})", w, h);
        } else {
            log::debug!("Image cleared");
        }
        self.image = image;
        self.reset_interaction();
        self.letterbox = Letterbox::default();
    }

    /// Release the image and any pending interaction state.
    pub fn destroy(&mut self) {
        self.image = None;
        self.reset_interaction();
    }

    fn reset_interaction(&mut self) {
        self.editing = None;
        self.focused = None;
        self.clicking = false;
    }

    pub fn set_callback(&mut self, callback: impl EditorCallback + 'static) {
        self.callback = Box::new(callback);
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }

    pub fn label(&self) -> u32 {
        self.label
    }

    pub fn set_label(&mut self, label: u32) {
        self.label = label;
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EditMode) {
        self.mode = mode;
    }

    pub fn keybindings(&self) -> &KeyBindings {
        &self.keybindings
    }

    pub fn set_keybindings(&mut self, keybindings: KeyBindings) {
        self.keybindings = keybindings;
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    pub fn letterbox(&self) -> &Letterbox {
        &self.letterbox
    }

    /// Current region list. Cloning the `Rc` gives a stable snapshot.
    pub fn regions(&self) -> &RegionList {
        &self.regions
    }

    /// Replace the region list without recording history (remote load,
    /// import, host-side undo).
    ///
    /// Regions without a handle are adopted. Selection and focus are kept
    /// only if their region is still present.
    pub fn set_region_list(&mut self, regions: RegionList) {
        self.regions = self.adopt(regions);
        self.drop_stale_references();
        log::debug!("Region list set ({} regions)", self.regions.len());
    }

    /// Replace the region list as an undoable edit (e.g. reordering or
    /// recategorizing from a side panel).
    pub fn apply_region_list(&mut self, regions: RegionList) {
        self.record_history();
        self.set_region_list(regions);
        self.callback.on_region_list_restored(&self.regions);
    }

    pub fn selected_handle(&self) -> Option<RegionHandle> {
        self.selected
    }

    pub fn selected_region(&self) -> Option<&Region> {
        self.find(self.selected?)
    }

    /// Select a region from the host side (e.g. a click in a list panel).
    ///
    /// Unknown handles clear the selection. No callback fires.
    pub fn set_selected_region(&mut self, handle: Option<RegionHandle>) {
        self.selected = handle.filter(|h| self.find(*h).is_some());
    }

    pub fn focused_region(&self) -> Option<&Region> {
        self.find(self.focused?)
    }

    /// Region being drawn, if any.
    pub fn editing_region(&self) -> Option<&Region> {
        self.editing.as_ref()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Unsaved edits exist.
    pub fn is_dirty(&self) -> bool {
        self.history.can_undo()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.callback.on_history_updated(0);
    }

    // ------------------------------------------------------------------
    // Coordinate mapping
    // ------------------------------------------------------------------

    /// Recompute the letterbox for the current surface and image.
    ///
    /// No-op without an image.
    pub fn calc_margin(&mut self, min_margin_px: f64) {
        let Some(image) = &self.image else {
            return;
        };
        let (image_width, image_height) = image.dimensions();
        let (surface_width, surface_height) = self.surface.size();

        if let Some(letterbox) = Letterbox::compute(
            surface_width,
            surface_height,
            f64::from(image_width),
            f64::from(image_height),
            min_margin_px,
        ) {
            self.letterbox = letterbox;
        }
    }

    pub fn calc_x_ratio(&self, offset_x: f64) -> f64 {
        self.letterbox.x_ratio(offset_x)
    }

    pub fn calc_y_ratio(&self, offset_y: f64) -> f64 {
        self.letterbox.y_ratio(offset_y)
    }

    // ------------------------------------------------------------------
    // Hit testing
    // ------------------------------------------------------------------

    /// Regions containing `(x, y)` whose edge is within
    /// [`NEIGHBOR_THRESHOLD`], closest edge first. Ties keep list order.
    pub fn nearest_region(&self, x: f64, y: f64) -> Vec<&Region> {
        let mut hits: Vec<(&Region, f64)> = self
            .regions
            .iter()
            .filter(|r| r.contains_point(x, y))
            .map(|r| (r, r.neighbor_score(x, y)))
            .filter(|(_, score)| *score < NEIGHBOR_THRESHOLD)
            .collect();

        hits.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        hits.into_iter().map(|(r, _)| r).collect()
    }

    fn nearest_handle(&self, x: f64, y: f64) -> Option<RegionHandle> {
        self.nearest_region(x, y).first().map(|r| r.handle)
    }

    // ------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------

    pub fn handle_pointer_down(&mut self, event: &PointerEvent) {
        if event.button != MouseButton::Left {
            return;
        }
        self.clicking = true;

        let x = self.calc_x_ratio(event.x);
        let y = self.calc_y_ratio(event.y);

        if let Some(handle) = self.nearest_handle(x, y) {
            log::debug!("Selected region {} at ({:.3}, {:.3})", handle.get(), x, y);
            self.selected = Some(handle);
            self.editing = None;
        } else {
            self.selected = None;
            self.editing = Some(self.create_region(x, y));
        }

        let selected = self.selected.and_then(|h| self.regions.iter().find(|r| r.handle == h));
        self.callback.on_selected_region(selected);
        self.redraw();
    }

    pub fn handle_pointer_move(&mut self, event: &PointerEvent) {
        let x = self.calc_x_ratio(event.x);
        let y = self.calc_y_ratio(event.y);

        if self.clicking {
            if let Some(editing) = &mut self.editing {
                editing.rectangle.set_right(x);
                editing.rectangle.set_bottom(y);
                self.redraw();
            }
            return;
        }

        let focused = self.nearest_handle(x, y);
        if focused != self.focused {
            log::trace!("Focus {:?} -> {:?}", self.focused, focused);
            self.focused = focused;
            self.redraw();
        }
    }

    pub fn handle_pointer_up(&mut self, event: &PointerEvent) {
        if event.button != MouseButton::Left {
            return;
        }
        self.clicking = false;

        let Some(mut region) = self.editing.take() else {
            return;
        };
        region.rectangle.validate();

        if region.rectangle.width() < TICK && region.rectangle.height() < TICK {
            log::trace!("Discarded degenerate region {}", region.rectangle);
            self.redraw();
            return;
        }

        self.add_region(region);
        self.redraw();
    }

    fn create_region(&self, x: f64, y: f64) -> Region {
        Region::new(self.category.id, self.label, Rectangle::at_point(x, y))
    }

    // ------------------------------------------------------------------
    // Keyboard input
    // ------------------------------------------------------------------

    /// Handle a key press. Returns `true` if the editor consumed the key, in
    /// which case the host should suppress its default behavior.
    pub fn handle_key_down(&mut self, event: &KeyEvent) -> bool {
        let Some(action) = self.keybindings.resolve(event) else {
            log::trace!("Unhandled key {:?}", event.key);
            return false;
        };

        match action {
            EditorAction::Deform {
                mode,
                direction,
                fine,
            } => {
                let dist = if fine { TICK * FINE_TICK_FACTOR } else { TICK };
                match mode {
                    EditMode::Move => self.move_region(direction, dist),
                    EditMode::Expand => self.expand(direction, dist),
                    EditMode::Shrink => self.shrink(direction, dist),
                };
            }
            EditorAction::Delete => {
                if let Some(handle) = self.selected {
                    self.delete_region(handle);
                }
            }
            EditorAction::SetLabel(label) => {
                if let Some(handle) = self.selected {
                    self.change_region_label(handle, label);
                }
            }
            EditorAction::Cancel => self.cancel_editing(),
            EditorAction::SelectNext => {
                self.select_next_region();
            }
            EditorAction::SelectPrev => {
                self.select_prev_region();
            }
            EditorAction::Undo => {
                self.undo();
            }
            EditorAction::EnterMode(mode) => self.mode = mode,
        }

        self.redraw();
        true
    }

    pub fn handle_key_up(&mut self, event: &KeyEvent) -> bool {
        let Some(mode) = self.keybindings.mode_after_release(event) else {
            return false;
        };
        self.mode = mode;
        self.redraw();
        true
    }

    // ------------------------------------------------------------------
    // Edit operations
    // ------------------------------------------------------------------

    /// Abort the region being drawn. Nothing was committed, so history is
    /// untouched.
    pub fn cancel_editing(&mut self) {
        if self.editing.take().is_some() {
            log::debug!("Cancelled region drawing");
        }
    }

    /// Commit a region to the list and select it.
    pub fn add_region(&mut self, region: Region) {
        self.record_history();

        let region = self.adopt_one(region);
        let handle = region.handle;
        let mut list = self.regions.as_ref().clone();
        list.push(region);
        self.regions = Rc::new(list);
        self.selected = Some(handle);

        if let Some(added) = self.regions.iter().find(|r| r.handle == handle) {
            log::debug!("Added region {}: {}", handle.get(), added.rectangle);
            self.callback.on_added_region(added, &self.regions);
            self.callback.on_selected_region(Some(added));
        }
    }

    /// Remove a region. Returns `false` if it isn't in the list.
    pub fn delete_region(&mut self, handle: RegionHandle) -> bool {
        let Some(index) = self.index_of(handle) else {
            return false;
        };
        self.record_history();

        let mut list = self.regions.as_ref().clone();
        let removed = list.remove(index);
        self.regions = Rc::new(list);
        self.selected = None;
        if self.focused == Some(handle) {
            self.focused = None;
        }

        log::debug!("Deleted region {}", handle.get());
        self.callback.on_deleted_region(&removed, &self.regions);
        self.callback.on_selected_region(None);
        true
    }

    /// Set a region's label and select it. Returns `false` if it isn't in
    /// the list.
    pub fn change_region_label(&mut self, handle: RegionHandle, label: u32) -> bool {
        let Some(index) = self.index_of(handle) else {
            return false;
        };
        self.record_history();

        let relabeled = self.regions[index].with_label(label);
        self.replace_at(index, relabeled);
        self.selected = Some(handle);

        log::debug!("Region {} label -> {}", handle.get(), label);
        self.callback
            .on_changed_label(&self.regions[index], &self.regions);
        true
    }

    /// Translate the selected region.
    pub fn move_region(&mut self, direction: Direction, dist: f64) -> bool {
        self.mode = EditMode::Move;
        match direction {
            Direction::Left => self.deform(-dist, 0.0, -dist, 0.0),
            Direction::Up => self.deform(0.0, -dist, 0.0, -dist),
            Direction::Right => self.deform(dist, 0.0, dist, 0.0),
            Direction::Down => self.deform(0.0, dist, 0.0, dist),
        }
    }

    /// Push the edge facing `direction` outward.
    pub fn expand(&mut self, direction: Direction, dist: f64) -> bool {
        self.mode = EditMode::Expand;
        match direction {
            Direction::Left => self.deform(-dist, 0.0, 0.0, 0.0),
            Direction::Up => self.deform(0.0, -dist, 0.0, 0.0),
            Direction::Right => self.deform(0.0, 0.0, dist, 0.0),
            Direction::Down => self.deform(0.0, 0.0, 0.0, dist),
        }
    }

    /// Pull the edge opposite `direction` inward.
    pub fn shrink(&mut self, direction: Direction, dist: f64) -> bool {
        self.mode = EditMode::Shrink;
        match direction {
            Direction::Left => self.deform(0.0, 0.0, -dist, 0.0),
            Direction::Up => self.deform(0.0, 0.0, 0.0, -dist),
            Direction::Right => self.deform(dist, 0.0, 0.0, 0.0),
            Direction::Down => self.deform(0.0, dist, 0.0, 0.0),
        }
    }

    /// Shift the selected region's edges by the given deltas.
    ///
    /// Edges clamp to `[0, 1]`. If clamping leaves the rectangle unchanged
    /// nothing happens and no history is recorded.
    pub fn deform(&mut self, left: f64, top: f64, right: f64, bottom: f64) -> bool {
        let Some(handle) = self.selected else {
            return false;
        };
        let Some(index) = self.index_of(handle) else {
            return false;
        };

        let current = self.regions[index].rectangle;
        let mut deformed = current.offset_edges(left, top, right, bottom);
        if deformed == current {
            return false;
        }
        deformed.validate();

        self.record_history();
        let region = self.regions[index].with_rectangle(deformed);
        self.replace_at(index, region);

        log::trace!("Deformed region {}: {}", handle.get(), deformed);
        let region = &self.regions[index];
        self.callback.on_deform_region(region, &self.regions);
        self.callback.on_selected_region(Some(region));
        true
    }

    /// Select the region before the current one (no wraparound).
    pub fn select_prev_region(&mut self) -> bool {
        self.step_selection(-1)
    }

    /// Select the region after the current one (no wraparound). With nothing
    /// selected, selects the first region.
    pub fn select_next_region(&mut self) -> bool {
        self.step_selection(1)
    }

    fn step_selection(&mut self, step: isize) -> bool {
        if self.regions.is_empty() {
            return false;
        }

        let target = match self.selected.and_then(|h| self.index_of(h)) {
            None if self.selected.is_none() => 0,
            None => return false,
            Some(index) => match index.checked_add_signed(step) {
                Some(to) if to < self.regions.len() => to,
                _ => return false,
            },
        };

        let region = &self.regions[target];
        self.selected = Some(region.handle);
        self.callback.on_selected_region(Some(region));
        true
    }

    /// Restore the most recent snapshot. Returns `false` if history is empty.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.pop() else {
            return false;
        };

        self.regions = entry.regions;
        self.selected = entry.selected;
        self.drop_stale_references();

        log::debug!(
            "Undo restored {} regions ({} snapshots left)",
            self.regions.len(),
            self.history.len()
        );
        self.callback.on_region_list_restored(&self.regions);
        let selected = self.selected.and_then(|h| self.regions.iter().find(|r| r.handle == h));
        self.callback.on_selected_region(selected);
        self.callback.on_history_updated(self.history.len());
        true
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Repaint the surface. No-op without an image.
    pub fn redraw(&mut self) {
        let Some(image) = &self.image else {
            return;
        };

        let lb = self.letterbox;
        self.surface.clear();
        self.surface.draw_image(image, lb.image_bounds());

        for region in self.regions.iter() {
            let color = if Some(region.handle) == self.selected {
                for marker in markers(&lb, &region.rectangle, self.mode) {
                    self.surface.fill_rect(marker, self.palette.selected);
                }
                self.palette.selected
            } else if Some(region.handle) == self.focused {
                self.palette.focused
            } else {
                self.palette.neutral
            };
            self.surface.stroke_rect(lb.project(&region.rectangle), color);
        }

        if let Some(editing) = &self.editing {
            self.surface
                .stroke_rect(lb.project(&editing.rectangle), self.palette.editing);
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn find(&self, handle: RegionHandle) -> Option<&Region> {
        self.regions.iter().find(|r| r.handle == handle)
    }

    fn index_of(&self, handle: RegionHandle) -> Option<usize> {
        self.regions.iter().position(|r| r.handle == handle)
    }

    fn replace_at(&mut self, index: usize, region: Region) {
        let mut list = self.regions.as_ref().clone();
        list[index] = region;
        self.regions = Rc::new(list);
    }

    fn record_history(&mut self) {
        self.history
            .push(EditHistory::new(self.selected, Rc::clone(&self.regions)));
        self.callback.on_history_updated(self.history.len());
    }

    fn drop_stale_references(&mut self) {
        if self.selected.is_some_and(|h| self.find(h).is_none()) {
            self.selected = None;
        }
        if self.focused.is_some_and(|h| self.find(h).is_none()) {
            self.focused = None;
        }
    }

    fn adopt_one(&mut self, mut region: Region) -> Region {
        if !region.handle.is_set() {
            region.handle = RegionHandle(self.next_handle);
            self.next_handle += 1;
        }
        region
    }

    /// Give every region a unique handle, keeping existing ones where possible.
    fn adopt(&mut self, regions: RegionList) -> RegionList {
        if let Some(max) = regions.iter().map(|r| r.handle.get()).max() {
            self.next_handle = self.next_handle.max(max + 1);
        }

        let mut seen = std::collections::HashSet::new();
        let needs_adoption = regions
            .iter()
            .any(|r| !r.handle.is_set() || !seen.insert(r.handle));
        if !needs_adoption {
            return regions;
        }

        let mut seen = std::collections::HashSet::new();
        let adopted = regions
            .iter()
            .cloned()
            .map(|mut r| {
                if !r.handle.is_set() || !seen.insert(r.handle) {
                    r.handle = RegionHandle::UNSET;
                    r = self.adopt_one(r);
                    seen.insert(r.handle);
                }
                r
            })
            .collect();
        Rc::new(adopted)
    }
}

/// Edge-midpoint markers for the selected region.
///
/// None in move mode; outward-pointing in expand mode, inward in shrink mode.
fn markers(lb: &Letterbox, rect: &Rectangle, mode: EditMode) -> Vec<PixelRect> {
    let sign = match mode {
        EditMode::Move => return Vec::new(),
        EditMode::Expand => 1.0,
        EditMode::Shrink => -1.0,
    };
    let len = MARKER_LENGTH * sign;
    let t = MARKER_THICKNESS;

    let center_x = lb.surface_x(rect.center_x());
    let center_y = lb.surface_y(rect.center_y());

    vec![
        PixelRect::from_signed(center_x, lb.surface_y(rect.top()), t, -len),
        PixelRect::from_signed(lb.surface_x(rect.left()), center_y, -len, t),
        PixelRect::from_signed(lb.surface_x(rect.right()), center_y, len, t),
        PixelRect::from_signed(center_x, lb.surface_y(rect.bottom()), t, len),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Key, Modifiers};
    use crate::render::{ImageInfo, RecordingSurface};

    const EPSILON: f64 = 1e-9;

    /// 100x100 image on a 120x120 surface with a 10px margin: surface pixel
    /// `10 + 100 * n` maps to normalized `n`.
    fn controller() -> RegionEditorController<RecordingSurface> {
        let mut c = RegionEditorController::new(RecordingSurface::new(120.0, 120.0), NoopCallback);
        c.set_image(Some(ImageInfo::new(100, 100)));
        c.calc_margin(10.0);
        c
    }

    fn px(n: f64) -> f64 {
        10.0 + 100.0 * n
    }

    fn draw(c: &mut RegionEditorController<RecordingSurface>, from: (f64, f64), to: (f64, f64)) {
        c.handle_pointer_down(&PointerEvent::new(px(from.0), px(from.1)));
        c.handle_pointer_move(&PointerEvent::new(px(to.0), px(to.1)));
        c.handle_pointer_up(&PointerEvent::new(px(to.0), px(to.1)));
    }

    #[test]
    fn test_margin_mapping() {
        let c = controller();
        assert!((c.calc_x_ratio(px(0.25)) - 0.25).abs() < EPSILON);
        assert!((c.calc_y_ratio(px(0.8)) - 0.8).abs() < EPSILON);
    }

    #[test]
    fn test_calc_margin_without_image_is_noop() {
        let mut c = RegionEditorController::new(RecordingSurface::new(120.0, 120.0), NoopCallback);
        c.calc_margin(10.0);
        assert_eq!(*c.letterbox(), Letterbox::default());
    }

    #[test]
    fn test_draw_region() {
        let mut c = controller();
        draw(&mut c, (0.1, 0.1), (0.4, 0.4));

        assert_eq!(c.regions().len(), 1);
        let rect = c.regions()[0].rectangle;
        assert!((rect.left() - 0.1).abs() < EPSILON);
        assert!((rect.bottom() - 0.4).abs() < EPSILON);
        assert!((rect.width() - 0.3).abs() < EPSILON);
        assert_eq!(c.selected_handle(), Some(c.regions()[0].handle));
        assert_eq!(c.history_len(), 1);
    }

    #[test]
    fn test_draw_backwards_is_normalized() {
        let mut c = controller();
        draw(&mut c, (0.5, 0.6), (0.2, 0.3));

        let rect = c.regions()[0].rectangle;
        assert!(!rect.is_inverted());
        assert!((rect.left() - 0.2).abs() < EPSILON);
        assert!((rect.top() - 0.3).abs() < EPSILON);
        assert!((rect.right() - 0.5).abs() < EPSILON);
        assert!((rect.bottom() - 0.6).abs() < EPSILON);
    }

    #[test]
    fn test_click_without_drag_adds_nothing() {
        let mut c = controller();
        draw(&mut c, (0.3, 0.3), (0.3, 0.3));

        assert!(c.regions().is_empty());
        assert_eq!(c.history_len(), 0);
        assert!(c.editing_region().is_none());
    }

    #[test]
    fn test_thin_region_is_kept() {
        // Only one dimension below a tick: still a region
        let mut c = controller();
        draw(&mut c, (0.3, 0.3), (0.6, 0.305));
        assert_eq!(c.regions().len(), 1);
    }

    #[test]
    fn test_new_region_uses_category_and_label_defaults() {
        let mut c = controller();
        c.set_category(Category::new(7, "balloon", 1));
        c.set_label(2);
        draw(&mut c, (0.1, 0.1), (0.3, 0.3));

        assert_eq!(c.regions()[0].category_id, 7);
        assert_eq!(c.regions()[0].label, 2);
    }

    #[test]
    fn test_click_on_edge_selects_existing() {
        let mut c = controller();
        draw(&mut c, (0.2, 0.2), (0.6, 0.6));
        let handle = c.regions()[0].handle;
        c.set_selected_region(None);

        // Just inside the left edge
        c.handle_pointer_down(&PointerEvent::new(px(0.202), px(0.4)));
        assert_eq!(c.selected_handle(), Some(handle));
        assert!(c.editing_region().is_none());
        c.handle_pointer_up(&PointerEvent::new(px(0.202), px(0.4)));
        assert_eq!(c.regions().len(), 1);
    }

    #[test]
    fn test_click_in_middle_starts_new_region() {
        let mut c = controller();
        draw(&mut c, (0.2, 0.2), (0.6, 0.6));

        c.handle_pointer_down(&PointerEvent::new(px(0.4), px(0.4)));
        assert!(c.selected_handle().is_none());
        assert!(c.editing_region().is_some());
    }

    #[test]
    fn test_nearest_region_sorted_by_score() {
        let mut c = controller();
        let far = Region::new(0, 0, Rectangle::new(0.1, 0.1, 0.503, 0.9));
        let near = Region::new(0, 0, Rectangle::new(0.2, 0.2, 0.501, 0.8));
        c.set_region_list(Rc::new(vec![far, near]));

        let hits = c.nearest_region(0.5, 0.5);
        assert_eq!(hits.len(), 2);
        assert!((hits[0].rectangle.right() - 0.501).abs() < EPSILON);
        assert!((hits[1].rectangle.right() - 0.503).abs() < EPSILON);
    }

    #[test]
    fn test_hover_sets_focus_without_selecting() {
        let mut c = controller();
        draw(&mut c, (0.2, 0.2), (0.6, 0.6));
        c.set_selected_region(None);

        c.handle_pointer_move(&PointerEvent::new(px(0.599), px(0.4)));
        assert_eq!(c.focused_region().map(|r| r.handle), Some(c.regions()[0].handle));
        assert!(c.selected_handle().is_none());

        c.handle_pointer_move(&PointerEvent::new(px(0.4), px(0.4)));
        assert!(c.focused_region().is_none());
    }

    #[test]
    fn test_move_with_arrow_keys() {
        let mut c = controller();
        draw(&mut c, (0.2, 0.2), (0.4, 0.4));

        assert!(c.handle_key_down(&KeyEvent::plain(Key::Right)));
        let rect = c.selected_region().unwrap().rectangle;
        assert!((rect.left() - 0.21).abs() < EPSILON);
        assert!((rect.right() - 0.41).abs() < EPSILON);
        assert_eq!(c.mode(), EditMode::Move);
        assert_eq!(c.history_len(), 2);
    }

    #[test]
    fn test_fine_step_with_shift() {
        let mut c = controller();
        draw(&mut c, (0.2, 0.2), (0.4, 0.4));

        c.handle_key_down(&KeyEvent::new(Key::Down, Modifiers::shift()));
        let rect = c.selected_region().unwrap().rectangle;
        assert!((rect.top() - 0.201).abs() < EPSILON);
        assert!((rect.bottom() - 0.401).abs() < EPSILON);
    }

    #[test]
    fn test_expand_and_shrink() {
        let mut c = controller();
        draw(&mut c, (0.2, 0.2), (0.4, 0.4));

        c.handle_key_down(&KeyEvent::new(Key::Left, Modifiers::meta()));
        let rect = c.selected_region().unwrap().rectangle;
        assert!((rect.left() - 0.19).abs() < EPSILON);
        assert!((rect.right() - 0.4).abs() < EPSILON);
        assert_eq!(c.mode(), EditMode::Expand);

        c.handle_key_down(&KeyEvent::new(Key::Left, Modifiers::alt()));
        let rect = c.selected_region().unwrap().rectangle;
        assert!((rect.left() - 0.19).abs() < EPSILON);
        assert!((rect.right() - 0.39).abs() < EPSILON);
        assert_eq!(c.mode(), EditMode::Shrink);
    }

    #[test]
    fn test_deform_at_boundary_records_nothing() {
        let mut c = controller();
        c.set_region_list(Rc::new(vec![Region::new(
            0,
            0,
            Rectangle::new(0.0, 0.2, 0.5, 0.5),
        )]));
        c.select_next_region();
        let before = Rc::clone(c.regions());

        assert!(!c.expand(Direction::Left, TICK));
        assert_eq!(c.history_len(), 0);
        assert!(Rc::ptr_eq(&before, c.regions()));
    }

    #[test]
    fn test_deform_without_selection_is_noop() {
        let mut c = controller();
        draw(&mut c, (0.2, 0.2), (0.4, 0.4));
        c.set_selected_region(None);

        assert!(!c.move_region(Direction::Up, TICK));
        assert_eq!(c.history_len(), 1);
    }

    #[test]
    fn test_deform_replaces_list() {
        let mut c = controller();
        draw(&mut c, (0.2, 0.2), (0.4, 0.4));
        let before = Rc::clone(c.regions());

        c.move_region(Direction::Up, TICK);
        assert!(!Rc::ptr_eq(&before, c.regions()));
        assert!((before[0].rectangle.top() - 0.2).abs() < EPSILON);
    }

    #[test]
    fn test_label_digit() {
        let mut c = controller();
        draw(&mut c, (0.2, 0.2), (0.4, 0.4));

        c.handle_key_down(&KeyEvent::plain(Key::Char('3')));
        assert_eq!(c.selected_region().unwrap().label, 3);
        assert_eq!(c.history_len(), 2);
    }

    #[test]
    fn test_label_without_selection_is_noop() {
        let mut c = controller();
        draw(&mut c, (0.2, 0.2), (0.4, 0.4));
        c.set_selected_region(None);

        c.handle_key_down(&KeyEvent::plain(Key::Char('5')));
        assert_eq!(c.regions()[0].label, 0);
        assert_eq!(c.history_len(), 1);
    }

    #[test]
    fn test_delete_selected() {
        let mut c = controller();
        draw(&mut c, (0.2, 0.2), (0.4, 0.4));

        assert!(c.handle_key_down(&KeyEvent::plain(Key::Char('d'))));
        assert!(c.regions().is_empty());
        assert!(c.selected_handle().is_none());
        assert_eq!(c.history_len(), 2);
    }

    #[test]
    fn test_escape_cancels_drawing() {
        let mut c = controller();
        c.handle_pointer_down(&PointerEvent::new(px(0.1), px(0.1)));
        c.handle_pointer_move(&PointerEvent::new(px(0.5), px(0.5)));
        c.handle_key_down(&KeyEvent::plain(Key::Escape));
        c.handle_pointer_up(&PointerEvent::new(px(0.5), px(0.5)));

        assert!(c.regions().is_empty());
        assert_eq!(c.history_len(), 0);
    }

    #[test]
    fn test_enter_cycles_without_wraparound() {
        let mut c = controller();
        draw(&mut c, (0.1, 0.1), (0.2, 0.2));
        draw(&mut c, (0.5, 0.5), (0.6, 0.6));
        let first = c.regions()[0].handle;
        let second = c.regions()[1].handle;
        c.set_selected_region(None);

        c.handle_key_down(&KeyEvent::plain(Key::Enter));
        assert_eq!(c.selected_handle(), Some(first));
        c.handle_key_down(&KeyEvent::plain(Key::Enter));
        assert_eq!(c.selected_handle(), Some(second));
        c.handle_key_down(&KeyEvent::plain(Key::Enter));
        assert_eq!(c.selected_handle(), Some(second));

        c.handle_key_down(&KeyEvent::new(Key::Enter, Modifiers::shift()));
        assert_eq!(c.selected_handle(), Some(first));
        c.handle_key_down(&KeyEvent::new(Key::Enter, Modifiers::shift()));
        assert_eq!(c.selected_handle(), Some(first));
    }

    #[test]
    fn test_select_on_empty_list_is_noop() {
        let mut c = controller();
        assert!(!c.select_next_region());
        assert!(c.selected_handle().is_none());
    }

    #[test]
    fn test_undo_restores_previous_state() {
        let mut c = controller();
        draw(&mut c, (0.2, 0.2), (0.4, 0.4));
        let handle = c.regions()[0].handle;
        c.move_region(Direction::Right, TICK);

        assert!(c.handle_key_down(&KeyEvent::new(Key::Char('z'), Modifiers::ctrl())));
        let rect = c.regions()[0].rectangle;
        assert!((rect.left() - 0.2).abs() < EPSILON);
        assert_eq!(c.selected_handle(), Some(handle));
        assert_eq!(c.history_len(), 1);
    }

    #[test]
    fn test_undo_on_empty_history_is_noop() {
        let mut c = controller();
        draw(&mut c, (0.2, 0.2), (0.4, 0.4));
        c.clear_history();
        let before = Rc::clone(c.regions());
        let selected = c.selected_handle();

        assert!(!c.undo());
        assert!(Rc::ptr_eq(&before, c.regions()));
        assert_eq!(c.selected_handle(), selected);
    }

    #[test]
    fn test_mode_follows_modifier_keys() {
        let mut c = controller();
        c.handle_key_down(&KeyEvent::new(Key::Meta, Modifiers::meta()));
        assert_eq!(c.mode(), EditMode::Expand);
        c.handle_key_up(&KeyEvent::plain(Key::Meta));
        assert_eq!(c.mode(), EditMode::Move);

        c.handle_key_down(&KeyEvent::new(Key::Alt, Modifiers::alt()));
        assert_eq!(c.mode(), EditMode::Shrink);
        c.handle_key_up(&KeyEvent::plain(Key::Alt));
        assert_eq!(c.mode(), EditMode::Move);
    }

    #[test]
    fn test_unknown_key_not_consumed() {
        let mut c = controller();
        assert!(!c.handle_key_down(&KeyEvent::plain(Key::Char('q'))));
        assert!(!c.handle_key_up(&KeyEvent::plain(Key::Char('q'))));
    }

    #[test]
    fn test_set_image_discards_pending_state() {
        let mut c = controller();
        c.handle_pointer_down(&PointerEvent::new(px(0.1), px(0.1)));
        c.handle_pointer_move(&PointerEvent::new(px(0.5), px(0.5)));

        c.set_image(Some(ImageInfo::new(200, 100)));
        assert!(c.editing_region().is_none());

        c.calc_margin(10.0);
        c.handle_pointer_up(&PointerEvent::new(px(0.5), px(0.5)));
        assert!(c.regions().is_empty());
    }

    #[test]
    fn test_set_region_list_adopts_handles() {
        let mut c = controller();
        let r = Region::new(0, 0, Rectangle::new(0.1, 0.1, 0.2, 0.2));
        c.set_region_list(Rc::new(vec![r.clone(), r]));

        let handles: Vec<_> = c.regions().iter().map(|r| r.handle).collect();
        assert!(handles.iter().all(|h| h.is_set()));
        assert_ne!(handles[0], handles[1]);
    }

    #[test]
    fn test_set_region_list_keeps_adopted_list() {
        let mut c = controller();
        draw(&mut c, (0.1, 0.1), (0.2, 0.2));
        let list = Rc::clone(c.regions());

        c.set_region_list(Rc::clone(&list));
        assert!(Rc::ptr_eq(&list, c.regions()));
    }

    #[test]
    fn test_set_region_list_drops_stale_selection() {
        let mut c = controller();
        draw(&mut c, (0.1, 0.1), (0.2, 0.2));
        c.set_region_list(Rc::new(Vec::new()));
        assert!(c.selected_handle().is_none());
    }

    #[test]
    fn test_apply_region_list_is_undoable() {
        let mut c = controller();
        draw(&mut c, (0.1, 0.1), (0.2, 0.2));
        c.apply_region_list(Rc::new(Vec::new()));
        assert!(c.regions().is_empty());

        c.undo();
        assert_eq!(c.regions().len(), 1);
    }

    #[test]
    fn test_markers_by_mode() {
        let lb = Letterbox::compute(120.0, 120.0, 100.0, 100.0, 10.0).unwrap();
        let rect = Rectangle::new(0.2, 0.2, 0.4, 0.4);

        assert!(markers(&lb, &rect, EditMode::Move).is_empty());

        let expand = markers(&lb, &rect, EditMode::Expand);
        assert_eq!(expand.len(), 4);
        // Top marker points up from the top edge
        assert!((expand[0].bottom() - lb.surface_y(0.2)).abs() < EPSILON);
        assert!((expand[0].height - MARKER_LENGTH).abs() < EPSILON);

        let shrink = markers(&lb, &rect, EditMode::Shrink);
        // Top marker points down from the top edge
        assert!((shrink[0].y - lb.surface_y(0.2)).abs() < EPSILON);
    }
}
