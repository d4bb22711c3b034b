//! Circular project gallery: frames placed flat on a ring, viewed from above.
//!
//! Placement is decided up front from the candidate list; a frame only joins
//! the pickable set once its image has loaded and its aspect ratio is known.

use std::f32::consts::TAU;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::Ray;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GalleryItem {
    pub title: String,
    pub images: Vec<String>,
    pub medium: Option<String>,
    #[serde(deserialize_with = "crate::content::lenient_string")]
    pub year: Option<String>,
    pub location: Option<String>,
    pub exhibition: Option<String>,
    pub detail: Option<String>,
    pub technical_detail: Option<String>,
    pub conceptual_detail: Option<String>,
    pub conclusion: Option<String>,
    pub photography: Option<String>,
    pub videography: Option<String>,
    pub collaboration: Option<String>,
    pub dimensions: Option<String>,
}

impl GalleryItem {
    pub fn is_group_project(&self) -> bool {
        self.dimensions
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains("team"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryParams {
    pub radius: f32,
    pub frame_width: f32,
    pub frame_opacity: f32,
    pub camera_height: f32,
    pub fov_y_degrees: f32,
    /// Leading path segment removed from image references before loading.
    pub asset_prefix: Option<String>,
}

impl Default for GalleryParams {
    fn default() -> Self {
        Self {
            radius: 4.5,
            frame_width: 1.2,
            frame_opacity: 0.9,
            camera_height: 8.0,
            fov_y_degrees: 60.0,
            asset_prefix: None,
        }
    }
}

impl GalleryParams {
    pub fn image_url<'a>(&self, path: &'a str) -> &'a str {
        match &self.asset_prefix {
            Some(prefix) => path.strip_prefix(prefix.as_str()).unwrap_or(path),
            None => path,
        }
    }
}

/// Where a candidate will sit once its image loads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub item: usize,
    pub angle: f32,
    pub position: Vec3,
}

/// A loaded, visible, pickable frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalleryFrame {
    pub item: usize,
    pub position: Vec3,
    pub width: f32,
    pub height: f32,
}

impl GalleryFrame {
    /// Footprint test on the frame's plane. The frame lies flat, so its
    /// height runs along world Z.
    pub fn contains(&self, point: Vec3) -> bool {
        (point.x - self.position.x).abs() <= self.width * 0.5
            && (point.z - self.position.z).abs() <= self.height * 0.5
    }

    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let t = ray.hit_horizontal_plane(self.position.y)?;
        self.contains(ray.point_at(t)).then_some(t)
    }
}

/// Angles are spaced over every candidate, including ones that are skipped
/// for having no images, which leaves gaps on the ring.
pub fn layout(items: &[GalleryItem], radius: f32) -> Vec<Placement> {
    let total = items.len();
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| !item.images.is_empty())
        .map(|(i, _)| {
            let angle = (i as f32 / total as f32) * TAU;
            Placement {
                item: i,
                angle,
                position: Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius),
            }
        })
        .collect()
}

pub struct Gallery {
    params: GalleryParams,
    items: Vec<GalleryItem>,
    placements: Vec<Placement>,
    frames: Vec<GalleryFrame>,
}

impl Gallery {
    pub fn new(items: Vec<GalleryItem>, params: GalleryParams) -> Self {
        let placements = layout(&items, params.radius);
        for (i, item) in items.iter().enumerate() {
            if item.images.is_empty() {
                log::warn!("project {i} ({:?}) has no images, not placed", item.title);
            }
        }
        Self {
            params,
            items,
            placements,
            frames: Vec::new(),
        }
    }

    pub fn params(&self) -> &GalleryParams {
        &self.params
    }

    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&GalleryItem> {
        self.items.get(index)
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn frames(&self) -> &[GalleryFrame] {
        &self.frames
    }

    /// URL of the cover image for a placement.
    pub fn cover_url(&self, placement: &Placement) -> Option<&str> {
        let item = self.items.get(placement.item)?;
        item.images.first().map(|p| self.params.image_url(p))
    }

    /// The frame `item` would get for an image of the given size, without
    /// attaching it.
    pub fn frame_for(&self, item: usize, image_width: u32, image_height: u32) -> Result<GalleryFrame, String> {
        if self.frames.iter().any(|f| f.item == item) {
            return Err(format!("frame {item} already attached"));
        }
        let placement = self
            .placements
            .iter()
            .find(|p| p.item == item)
            .ok_or_else(|| format!("project {item} has no placement"))?;
        if image_width == 0 || image_height == 0 {
            return Err(format!("image for project {item} has no size"));
        }
        let aspect = image_width as f32 / image_height as f32;
        Ok(GalleryFrame {
            item,
            position: placement.position,
            width: self.params.frame_width,
            height: self.params.frame_width / aspect,
        })
    }

    /// Add the frame for `item` once its image has loaded. Loads finish in any
    /// order; attaching twice keeps the first frame.
    pub fn attach(&mut self, item: usize, image_width: u32, image_height: u32) -> Option<GalleryFrame> {
        self.attach_with(item, image_width, image_height, |_| Ok::<_, String>(()))
            .ok()
            .map(|(frame, ())| frame)
    }

    /// Like [`Self::attach`], but the frame only becomes pickable once `build`
    /// (typically the texture upload) succeeds.
    pub fn attach_with<T, E, F>(
        &mut self,
        item: usize,
        image_width: u32,
        image_height: u32,
        build: F,
    ) -> Result<(GalleryFrame, T), String>
    where
        E: std::fmt::Display,
        F: FnOnce(&GalleryFrame) -> Result<T, E>,
    {
        let frame = self.frame_for(item, image_width, image_height)?;
        let built = build(&frame).map_err(|err| err.to_string())?;
        log::debug!(
            "frame {item} attached at ({:.2}, {:.2}, {:.2})",
            frame.position.x,
            frame.position.y,
            frame.position.z
        );
        self.frames.push(frame);
        Ok((frame, built))
    }

    /// Nearest attached frame hit by `ray`.
    pub fn pick(&self, ray: &Ray) -> Option<&GalleryFrame> {
        self.frames
            .iter()
            .filter_map(|f| f.intersect(ray).map(|t| (t, f)))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, f)| f)
    }
}

/// Outcome of every frame's image load once all of them have settled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: Vec<usize>,
    pub failed: Vec<(usize, String)>,
}

/// Counts independent image loads so callers can await the whole batch
/// without any load waiting on another.
#[derive(Debug, Default)]
pub struct LoadTracker {
    expected: usize,
    summary: LoadSummary,
}

impl LoadTracker {
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            summary: LoadSummary::default(),
        }
    }

    pub fn settled(&self) -> usize {
        self.summary.loaded.len() + self.summary.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.settled() >= self.expected
    }

    /// Record one load. Returns the summary when this was the last one.
    pub fn record(&mut self, item: usize, outcome: Result<(), String>) -> Option<LoadSummary> {
        if self.is_complete() {
            return None;
        }
        match outcome {
            Ok(()) => self.summary.loaded.push(item),
            Err(reason) => self.summary.failed.push((item, reason)),
        }
        self.is_complete().then(|| self.summary.clone())
    }
}

/// `index + delta` wrapped into `0..len`.
pub fn wrap_index(index: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (index as isize + delta).rem_euclid(len as isize) as usize
}

/// Image carousel state of the project detail view.
#[derive(Debug, Clone, Default)]
pub struct DetailNavigator {
    current: Option<GalleryItem>,
    index: usize,
}

impl DetailNavigator {
    pub fn open(&mut self, item: GalleryItem) {
        self.current = Some(item);
        self.index = 0;
    }

    pub fn close(&mut self) -> Option<GalleryItem> {
        self.index = 0;
        self.current.take()
    }

    pub fn current(&self) -> Option<&GalleryItem> {
        self.current.as_ref()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_image(&self) -> Option<&str> {
        self.current.as_ref()?.images.get(self.index).map(String::as_str)
    }

    /// Move by `delta` images with wraparound. No-op without an open item.
    pub fn step(&mut self, delta: isize) -> Option<&str> {
        let len = self.current.as_ref()?.images.len();
        self.index = wrap_index(self.index, delta, len);
        self.current_image()
    }

    /// Prev/next stay visible but are disabled with one image or fewer.
    pub fn controls_enabled(&self) -> bool {
        self.current.as_ref().is_some_and(|item| item.images.len() > 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn item(title: &str, images: usize) -> GalleryItem {
        GalleryItem {
            title: title.into(),
            images: (0..images).map(|i| format!("img/{title}-{i}.jpg")).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn skipped_items_leave_gaps() {
        let items = vec![item("a", 1), item("b", 0), item("c", 2), item("d", 1)];
        let placements = layout(&items, 4.5);
        let ids: Vec<usize> = placements.iter().map(|p| p.item).collect();
        assert_eq!(ids, vec![0, 2, 3]);
        assert_relative_eq!(placements[1].angle, std::f32::consts::PI);
        assert_relative_eq!(placements[2].angle, 1.5 * std::f32::consts::PI);
    }

    #[test]
    fn frame_height_follows_aspect() {
        let mut gallery = Gallery::new(vec![item("a", 1)], GalleryParams::default());
        let frame = gallery.attach(0, 1600, 800).unwrap();
        assert_relative_eq!(frame.width, 1.2);
        assert_relative_eq!(frame.height, 0.6);
        assert!(gallery.attach(0, 1600, 800).is_none());
        assert_eq!(gallery.frames().len(), 1);
    }

    #[test]
    fn unknown_or_degenerate_attach_is_ignored() {
        let mut gallery = Gallery::new(vec![item("a", 1), item("b", 0)], GalleryParams::default());
        assert!(gallery.attach(1, 10, 10).is_none());
        assert!(gallery.attach(7, 10, 10).is_none());
        assert!(gallery.attach(0, 0, 10).is_none());
        assert!(gallery.frames().is_empty());
    }

    #[test]
    fn failed_build_keeps_frame_unpickable() {
        let mut gallery = Gallery::new(vec![item("a", 1), item("b", 1)], GalleryParams::default());
        let failed = gallery.attach_with(0, 800, 600, |_| Err::<(), _>("texture upload failed"));
        assert_eq!(failed.unwrap_err(), "texture upload failed");
        assert!(gallery.frames().is_empty());

        let above = gallery.placements()[0].position + Vec3::Y * 5.0;
        assert!(gallery.pick(&Ray::new(above, -Vec3::Y)).is_none());

        let mut called = false;
        let empty = gallery.attach_with(1, 0, 600, |_| {
            called = true;
            Ok::<_, String>(())
        });
        assert!(empty.is_err());
        assert!(!called);

        let (frame, quad) = gallery.attach_with(0, 800, 600, |f| Ok::<_, String>(f.item * 10)).unwrap();
        assert_eq!((frame.item, quad), (0, 0));
        assert_eq!(gallery.pick(&Ray::new(above, -Vec3::Y)).map(|f| f.item), Some(0));
    }

    #[test]
    fn asset_prefix_is_stripped() {
        let params = GalleryParams {
            asset_prefix: Some("site/".into()),
            ..Default::default()
        };
        assert_eq!(params.image_url("site/img/a.jpg"), "img/a.jpg");
        assert_eq!(params.image_url("img/b.jpg"), "img/b.jpg");
    }

    #[test]
    fn tracker_reports_once_all_settle() {
        let mut tracker = LoadTracker::new(3);
        assert_eq!(tracker.record(2, Ok(())), None);
        assert_eq!(tracker.record(0, Err("404".into())), None);
        let summary = tracker.record(1, Ok(())).unwrap();
        assert_eq!(summary.loaded, vec![2, 1]);
        assert_eq!(summary.failed, vec![(0, "404".to_string())]);
        assert!(tracker.is_complete());
        assert_eq!(tracker.record(5, Ok(())), None);
    }

    #[test]
    fn wrap_index_both_ways() {
        assert_eq!(wrap_index(2, 1, 3), 0);
        assert_eq!(wrap_index(0, -1, 3), 2);
        assert_eq!(wrap_index(1, 1, 3), 2);
        assert_eq!(wrap_index(0, 1, 0), 0);
    }

    #[test]
    fn navigator_controls() {
        let mut nav = DetailNavigator::default();
        assert!(!nav.controls_enabled());
        assert_eq!(nav.step(1), None);

        nav.open(item("solo", 1));
        assert!(!nav.controls_enabled());
        assert_eq!(nav.step(1), Some("img/solo-0.jpg"));

        nav.open(item("multi", 3));
        assert!(nav.controls_enabled());
        assert_eq!(nav.step(-1), Some("img/multi-2.jpg"));
        assert_eq!(nav.step(1), Some("img/multi-0.jpg"));
        assert_eq!(nav.close().map(|i| i.title), Some("multi".to_string()));
        assert_eq!(nav.current_image(), None);
    }

    #[test]
    fn group_project_detection() {
        let mut it = item("x", 1);
        assert!(!it.is_group_project());
        it.dimensions = Some("Team of 4".into());
        assert!(it.is_group_project());
    }
}
