use teamboard_domain::CardId;

/// Vertical grace, in pixels, within which the pointer still snaps to a
/// marker above it.
pub const DISTANCE_OFFSET: f32 = 50.0;

/// One insertion point of the target column, in top-to-bottom scan order.
/// `before` is the card the drop would land in front of; `None` marks the
/// trailing end-of-column slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropMarker {
    pub top: f32,
    pub before: Option<CardId>,
}

/// Resolve which marker a drop at `pointer_y` lands on.
///
/// A marker qualifies when its top edge sits above the pointer once the
/// grace offset is spent (`top - pointer_y - DISTANCE_OFFSET < 0`); the
/// qualifier nearest the pointer wins, and equidistant markers resolve to
/// the later one in scan order. When no marker qualifies the drop falls to
/// the last marker, the end of the column. `None` only for an empty slice.
pub fn nearest_marker(pointer_y: f32, markers: &[DropMarker]) -> Option<DropMarker> {
    let last = markers.last().copied()?;
    let nearest = markers
        .iter()
        .fold((f32::NEG_INFINITY, last), |closest, marker| {
            let offset = marker.top - pointer_y - DISTANCE_OFFSET;
            if offset < 0.0 && offset >= closest.0 {
                (offset, *marker)
            } else {
                closest
            }
        });
    Some(nearest.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    /// Markers at the given tops, each before a fresh card id except the
    /// trailing end-of-column slot.
    fn markers_at(tops: &[f32]) -> Vec<DropMarker> {
        let mut markers: Vec<DropMarker> = tops
            .iter()
            .map(|&top| DropMarker {
                top,
                before: Some(Uuid::new_v4()),
            })
            .collect();
        if let Some(end) = markers.last_mut() {
            end.before = None;
        }
        markers
    }

    #[test]
    fn test_snaps_to_nearest_marker_above_pointer() {
        let markers = markers_at(&[100.0, 200.0, 300.0]);
        let hit = nearest_marker(225.0, &markers).unwrap();
        assert_eq!(hit, markers[1]);
    }

    #[test]
    fn test_pointer_above_all_markers_falls_to_end_of_column() {
        let markers = markers_at(&[100.0, 200.0, 300.0]);
        let hit = nearest_marker(10.0, &markers).unwrap();
        assert_eq!(hit, markers[2]);
        assert_eq!(hit.before, None);
    }

    #[test]
    fn test_grace_band_boundary_is_exclusive() {
        let markers = markers_at(&[100.0, 300.0]);

        // 100 - 60 - 50 < 0: still snaps to the first marker.
        assert_eq!(nearest_marker(60.0, &markers).unwrap(), markers[0]);
        // 100 - 50 - 50 == 0: out of grace, falls through to the end.
        assert_eq!(nearest_marker(50.0, &markers).unwrap(), markers[1]);
    }

    #[test]
    fn test_equidistant_markers_resolve_to_later_one() {
        let markers = markers_at(&[100.0, 100.0, 300.0]);
        let hit = nearest_marker(200.0, &markers).unwrap();
        assert_eq!(hit, markers[1]);
    }

    #[test]
    fn test_no_markers_resolve_to_none() {
        assert_eq!(nearest_marker(100.0, &[]), None);
    }
}
