//! One editing session: a controller bound to a single image.
//!
//! The session carries what the host needs around the controller: the image
//! name and identifiers for export, an idempotency key for remote
//! submission, and whether the regions changed since the last save.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use uuid::Uuid;

use crate::config::EditorConfig;
use crate::controller::{EditorCallback, RegionEditorController};
use crate::format::{FormatError, ImageIds, RegionDocument};
use crate::history::RegionList;
use crate::render::Surface;

pub struct EditSession<S: Surface> {
    controller: RegionEditorController<S>,
    image_name: String,
    image_ids: Option<ImageIds>,
    /// Sent with every submission of this session so retries are deduplicated
    idempotency_key: Uuid,
    min_margin: f64,
    /// Region list as of the last save
    saved: RegionList,
}

impl<S: Surface> EditSession<S> {
    /// Start a session on `image` with an empty region list.
    pub fn new(
        surface: S,
        image: S::Image,
        image_name: impl Into<String>,
        callback: impl EditorCallback + 'static,
        config: &EditorConfig,
    ) -> Self {
        let mut controller = RegionEditorController::with_config(surface, callback, config);
        controller.set_image(Some(image));
        controller.calc_margin(config.preferences.min_margin_px);
        controller.redraw();

        let saved = Rc::clone(controller.regions());
        let session = Self {
            controller,
            image_name: image_name.into(),
            image_ids: None,
            idempotency_key: Uuid::new_v4(),
            min_margin: config.preferences.min_margin_px,
            saved,
        };
        log::info!(
            "Started session {} for {}",
            session.idempotency_key,
            session.image_name
        );
        session
    }

    pub fn controller(&self) -> &RegionEditorController<S> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut RegionEditorController<S> {
        &mut self.controller
    }

    pub fn image_name(&self) -> &str {
        &self.image_name
    }

    pub fn image_ids(&self) -> Option<&ImageIds> {
        self.image_ids.as_ref()
    }

    pub fn set_image_ids(&mut self, image_ids: Option<ImageIds>) {
        self.image_ids = image_ids;
    }

    pub fn idempotency_key(&self) -> Uuid {
        self.idempotency_key
    }

    /// Regions changed since the session started or was last saved.
    pub fn is_dirty(&self) -> bool {
        !Rc::ptr_eq(&self.saved, self.controller.regions())
    }

    /// Record the current regions as saved.
    pub fn mark_saved(&mut self) {
        self.saved = Rc::clone(self.controller.regions());
        log::debug!("Session {} marked saved", self.idempotency_key);
    }

    /// Load regions fetched from elsewhere (e.g. a remote store). Not
    /// undoable, and the result counts as saved.
    pub fn load_regions(&mut self, regions: RegionList) {
        self.controller.set_region_list(regions);
        self.saved = Rc::clone(self.controller.regions());
        self.controller.redraw();
    }

    /// Replace the regions with the contents of an export document.
    ///
    /// The whole document is parsed and converted before anything changes,
    /// so on error the current regions are untouched. A successful import is
    /// undoable.
    pub fn import_json(&mut self, json: &str) -> Result<usize, FormatError> {
        let regions = match RegionDocument::from_json(json).and_then(|doc| doc.to_regions()) {
            Ok(regions) => regions,
            Err(e) => {
                log::warn!("Rejected import for {}: {}", self.image_name, e);
                return Err(e);
            }
        };

        let count = regions.len();
        self.controller.apply_region_list(Rc::new(regions));
        self.controller.redraw();
        log::info!("Imported {} regions into {}", count, self.image_name);
        Ok(count)
    }

    pub fn import_file(&mut self, path: &Path) -> Result<usize, FormatError> {
        let json = std::fs::read_to_string(path)?;
        self.import_json(&json)
    }

    /// Current regions as an export document.
    pub fn export_document(&self) -> RegionDocument {
        let document = RegionDocument::new(self.image_name.clone(), self.controller.regions());
        match &self.image_ids {
            Some(ids) => document.with_image_ids(ids.clone()),
            None => document,
        }
    }

    /// Write the export document into `dir` under its default file name.
    pub fn export_to_dir(&self, dir: &Path) -> Result<PathBuf, FormatError> {
        let path = dir.join(RegionDocument::default_file_name(&self.image_name));
        self.export_document().write(&path)?;
        Ok(path)
    }

    /// Switch to another image.
    ///
    /// Pending interaction state, the region list and the undo history are
    /// dropped, and a fresh idempotency key is generated.
    pub fn swap_image(&mut self, image: S::Image, image_name: impl Into<String>) {
        self.controller.set_image(Some(image));
        self.controller.calc_margin(self.min_margin);
        self.controller.set_region_list(Rc::new(Vec::new()));
        self.controller.set_selected_region(None);
        self.controller.clear_history();

        self.image_name = image_name.into();
        self.image_ids = None;
        self.idempotency_key = Uuid::new_v4();
        self.saved = Rc::clone(self.controller.regions());

        self.controller.redraw();
        log::info!(
            "Session {} switched to {}",
            self.idempotency_key,
            self.image_name
        );
    }

    /// Recompute the letterbox after the surface was resized, then repaint.
    pub fn refresh_layout(&mut self) {
        self.controller.calc_margin(self.min_margin);
        self.controller.redraw();
    }

    /// End the session, releasing the image and handing the surface back.
    pub fn dispose(self) -> S {
        log::debug!("Disposing session {}", self.idempotency_key);
        let mut controller = self.controller;
        controller.destroy();
        controller.into_surface()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::NoopCallback;
    use crate::model::{Rectangle, Region};
    use crate::render::{DrawCommand, ImageInfo, RecordingSurface};

    fn session() -> EditSession<RecordingSurface> {
        let mut config = EditorConfig::default();
        config.preferences.min_margin_px = 10.0;
        EditSession::new(
            RecordingSurface::new(120.0, 120.0),
            ImageInfo::new(100, 100),
            "page.png",
            NoopCallback,
            &config,
        )
    }

    fn sample_json() -> String {
        let regions = vec![
            Region::new(1, 2, Rectangle::new(0.1, 0.1, 0.4, 0.4)),
            Region::new(1, 3, Rectangle::new(0.5, 0.5, 0.9, 0.7)),
        ];
        RegionDocument::new("page.png", &regions).to_json().unwrap()
    }

    #[test]
    fn test_new_session_is_clean_and_drawn() {
        let s = session();
        assert!(!s.is_dirty());
        assert_eq!(s.controller().surface().commands()[0], DrawCommand::Clear);
    }

    #[test]
    fn test_import_replaces_regions_and_is_undoable() {
        let mut s = session();
        assert_eq!(s.import_json(&sample_json()).unwrap(), 2);
        assert_eq!(s.controller().regions().len(), 2);
        assert!(s.is_dirty());

        s.controller_mut().undo();
        assert!(s.controller().regions().is_empty());
        assert!(!s.is_dirty());
    }

    #[test]
    fn test_failed_import_leaves_regions_untouched() {
        let mut s = session();
        s.import_json(&sample_json()).unwrap();
        let before = Rc::clone(s.controller().regions());
        let depth = s.controller().history_len();

        let bad = r#"{"regions": [{"category_id": 0, "label": 0, "points": []}]}"#;
        assert!(s.import_json(bad).is_err());
        assert!(s.import_json("{oops").is_err());

        assert!(Rc::ptr_eq(&before, s.controller().regions()));
        assert_eq!(s.controller().history_len(), depth);
    }

    #[test]
    fn test_mark_saved_clears_dirty() {
        let mut s = session();
        s.import_json(&sample_json()).unwrap();
        s.mark_saved();
        assert!(!s.is_dirty());
    }

    #[test]
    fn test_load_regions_is_clean() {
        let mut s = session();
        s.load_regions(Rc::new(vec![Region::new(
            0,
            0,
            Rectangle::new(0.1, 0.1, 0.2, 0.2),
        )]));
        assert!(!s.is_dirty());
        assert!(!s.controller().can_undo());
    }

    #[test]
    fn test_export_document_includes_ids() {
        let mut s = session();
        s.import_json(&sample_json()).unwrap();
        s.set_image_ids(Some(ImageIds {
            dhash8: "1".into(),
            dhash12: "2".into(),
            dhash16: "3".into(),
        }));

        let doc = s.export_document();
        assert_eq!(doc.file, "page.png");
        assert_eq!(doc.regions.len(), 2);
        assert!(doc.image_ids.is_some());
    }

    #[test]
    fn test_export_to_dir_uses_default_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session();
        s.import_json(&sample_json()).unwrap();

        let path = s.export_to_dir(dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "page.png.json");

        let mut other = session();
        assert_eq!(other.import_file(&path).unwrap(), 2);
    }

    #[test]
    fn test_swap_image_resets_session() {
        let mut s = session();
        s.import_json(&sample_json()).unwrap();
        let key = s.idempotency_key();

        s.swap_image(ImageInfo::new(300, 200), "next.png");
        assert_ne!(s.idempotency_key(), key);
        assert_eq!(s.image_name(), "next.png");
        assert!(s.controller().regions().is_empty());
        assert!(!s.controller().can_undo());
        assert!(!s.is_dirty());
    }

    #[test]
    fn test_dispose_returns_surface() {
        let s = session();
        let surface = s.dispose();
        assert_eq!(surface.size(), (120.0, 120.0));
    }
}
