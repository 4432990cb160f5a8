use std::cell::RefCell;
use std::rc::Rc;

use cgmath::Point3;

/// Screen-marker collaborator for the snapping aid. The host projects the
/// world point and positions its 2D widget; `hide` removes it from view.
pub trait SnapMarker {
    fn place(&mut self, point: Point3<f64>);
    fn hide(&mut self);
}

// Lets a host keep a handle on a marker it hands to a controller; the model
// is single-threaded, so shared ownership stays Rc.
impl<M: SnapMarker> SnapMarker for Rc<RefCell<M>> {
    fn place(&mut self, point: Point3<f64>) {
        self.borrow_mut().place(point);
    }

    fn hide(&mut self) {
        self.borrow_mut().hide();
    }
}

/// Records marker updates for tests and headless runs.
#[derive(Debug, Default)]
pub struct RecordingMarker {
    pub position: Option<Point3<f64>>,
    pub visible: bool,
    pub placements: usize,
}

impl SnapMarker for RecordingMarker {
    fn place(&mut self, point: Point3<f64>) {
        self.position = Some(point);
        self.visible = true;
        self.placements += 1;
    }

    fn hide(&mut self) {
        self.position = None;
        self.visible = false;
    }
}

/// Marker that ignores all updates.
#[derive(Debug, Default)]
pub struct NullMarker;

impl SnapMarker for NullMarker {
    fn place(&mut self, _point: Point3<f64>) {}

    fn hide(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_marker_tracks_state() {
        let mut marker = RecordingMarker::default();
        marker.place(Point3::new(1.0, 2.0, 3.0));
        assert!(marker.visible);
        assert_eq!(marker.placements, 1);
        marker.hide();
        assert!(!marker.visible);
        assert!(marker.position.is_none());
    }
}
